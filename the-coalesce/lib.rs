//! # the-coalesce
//!
//! Last-intent-wins dispatch for rapid-fire UI mutations.
//!
//! A user can click a toggle ("equip"/"unequip", "follow"/"unfollow") many
//! times before the network round-trip of the first click completes. Firing
//! one request per click races: responses land out of order, the server can
//! end up disagreeing with the last click, and the extra requests burn rate
//! limit for nothing. A [`Coalescer`] turns that burst into the minimal
//! sequence of calls:
//!
//! - **Trailing-edge debounce**: a flurry of submissions collapses to one
//!   call once the stream has been quiet for the debounce window (350 ms by
//!   default).
//! - **Single-flight**: at most one [`Perform::perform`] call is ever in
//!   flight.
//! - **Queued-next**: a command submitted during a call waits, possibly
//!   being overwritten by yet newer ones, and the final value is flushed the
//!   moment the call settles with no second debounce wait.
//! - **No lost final intent**: the last command of any burst is always the
//!   one performed; superseded commands are never sent.
//!
//! The dispatcher knows nothing about networks, cookies, or rendering. The
//! caller injects the mutation behind the [`Perform`] trait and drives a
//! disabled-control state off [`Coalescer::is_pending`].
//!
//! ```
//! use the_coalesce::Perform;
//!
//! struct EquipApi;
//!
//! impl Perform for EquipApi {
//!   type Command = (u64, bool);
//!   type Outcome = Result<(), String>;
//!
//!   async fn perform(&mut self, (item, equip): Self::Command) -> Self::Outcome {
//!     // the real REST mutation goes here
//!     Ok(())
//!   }
//! }
//!
//! let rt = tokio::runtime::Runtime::new().unwrap();
//! rt.block_on(async {
//!   let toggle = EquipApi.spawn();
//!   toggle.submit((17, true));
//!   toggle.submit((17, false)); // supersedes the first click
//!   assert!(toggle.is_pending());
//! });
//! ```
//!
//! One dispatcher per logical toggle target; [`CoalescerSet`] manages a slot
//! per key when targets are discovered dynamically. Retries, offline
//! queueing, and prioritization between command kinds are deliberately the
//! caller's business.

mod config;
mod dispatcher;
mod set;

pub use config::{
  CoalesceConfig,
  DEFAULT_DEBOUNCE,
};
pub use dispatcher::{
  Coalescer,
  Disposed,
  Perform,
};
pub use set::CoalescerSet;
