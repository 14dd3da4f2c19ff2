//! The coalescing dispatcher: a three-phase state machine (idle, debouncing,
//! flushing) behind a mutex, plus a background tokio worker that owns the
//! debounce timer and the single in-flight `perform` call.

use std::{
  fmt,
  future::Future,
  sync::Arc,
};

use parking_lot::Mutex;
use thiserror::Error;
use tokio::{
  sync::Notify,
  time::{
    self,
    Instant,
  },
};

use crate::config::CoalesceConfig;

/// The injected collaborator that executes a command for real.
///
/// Implementors provide the actual mutation (usually a network call) behind
/// [`Perform::perform`]. The dispatcher treats the outcome as opaque: it does
/// not retry, classify, or interpret it. [`Perform::settled`] fires once per
/// **executed** call, never once per submit, so a UI can surface exactly one
/// toast per mutation that actually ran.
///
/// `perform` is only ever invoked with the most recent command known at the
/// moment a flush starts; commands superseded before their turn are dropped
/// without a call, so implementations must not assume every submission
/// reaches them.
pub trait Perform: Send + Sized + 'static {
  type Command: Send + 'static;
  type Outcome: Send + 'static;

  /// Execute the mutation. Failures are reported through the returned
  /// outcome; the dispatcher continues either way.
  fn perform(&mut self, command: Self::Command) -> impl Future<Output = Self::Outcome> + Send;

  /// Called once per executed call with its outcome, success or failure.
  /// Outcomes of calls still in flight when the dispatcher is disposed are
  /// discarded without this notification.
  fn settled(&mut self, outcome: Self::Outcome) {
    let _ = outcome;
  }

  /// Spawn a dispatcher around this performer with the default debounce.
  fn spawn(self) -> Coalescer<Self::Command> {
    self.spawn_with(CoalesceConfig::default())
  }

  /// Spawn a dispatcher around this performer with an explicit config.
  fn spawn_with(self, config: CoalesceConfig) -> Coalescer<Self::Command> {
    Coalescer::new(self, config)
  }
}

/// Error returned by [`Coalescer::try_submit`] on a disposed dispatcher,
/// handing the rejected command back to the caller.
#[derive(Error)]
#[error("coalescer disposed")]
pub struct Disposed<C>(pub C);

impl<C> fmt::Debug for Disposed<C> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("Disposed(..)")
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
  /// No queued command, no timer, no call in flight.
  Idle,
  /// A command is queued and the debounce timer is running.
  Debouncing,
  /// Exactly one `perform` call is in flight.
  Flushing,
}

/// State shared between the handle and the worker. The mutex makes `submit`
/// bookkeeping atomic with respect to `is_pending`, so the pending flag can
/// never read false while a command is queued or in flight.
struct Slots<C> {
  phase:    Phase,
  /// Most recent submission not yet handed to `perform`. While flushing this
  /// doubles as the queued-next slot.
  latest:   Option<C>,
  /// Debounce deadline; meaningful only while `Phase::Debouncing`.
  deadline: Instant,
  disposed: bool,
}

struct Shared<C> {
  slots:    Mutex<Slots<C>>,
  wake:     Notify,
  debounce: std::time::Duration,
}

/// Handle to a coalescing dispatcher for a single logical command slot.
///
/// Serializes a bursty stream of last-write-wins commands into a minimal,
/// strictly ordered sequence of `perform` invocations: rapid submissions are
/// debounced to their trailing edge, at most one call is ever in flight, and
/// a command submitted during a call is flushed immediately once that call
/// settles, with no second debounce wait.
///
/// One instance per independent toggle target; do not share a dispatcher
/// across unrelated toggles. Dropping the handle disposes it.
pub struct Coalescer<C> {
  shared: Arc<Shared<C>>,
}

impl<C: Send + 'static> Coalescer<C> {
  /// Create a dispatcher and spawn its worker task.
  ///
  /// The usual entry points are [`Perform::spawn`] and
  /// [`Perform::spawn_with`].
  pub fn new<P>(hook: P, config: CoalesceConfig) -> Self
  where
    P: Perform<Command = C>,
  {
    let shared = Arc::new(Shared {
      slots:    Mutex::new(Slots {
        phase:    Phase::Idle,
        latest:   None,
        deadline: Instant::now(),
        disposed: false,
      }),
      wake:     Notify::new(),
      debounce: config.debounce(),
    });
    // only spawn the worker if we are inside a runtime to avoid having to
    // spawn one for unrelated unit tests
    if tokio::runtime::Handle::try_current().is_ok() {
      tokio::spawn(run(Arc::clone(&shared), hook));
    }
    Coalescer { shared }
  }

  /// Record `command` as the latest intent, replacing any queued
  /// predecessor.
  ///
  /// Pure bookkeeping: never blocks and performs no I/O. From idle this arms
  /// the debounce timer; while debouncing it re-arms it (trailing-edge
  /// debounce); while a call is in flight the command waits as queued-next
  /// and is flushed as soon as that call settles. A submission after
  /// [`dispose`](Self::dispose) is dropped with a warning.
  pub fn submit(&self, command: C) {
    if self.try_submit(command).is_err() {
      log::warn!("command submitted after dispose was dropped");
    }
  }

  /// Like [`submit`](Self::submit), but hands the command back instead of
  /// dropping it when the dispatcher is disposed.
  pub fn try_submit(&self, command: C) -> Result<(), Disposed<C>> {
    {
      let mut slots = self.shared.slots.lock();
      if slots.disposed {
        return Err(Disposed(command));
      }
      slots.latest = Some(command);
      match slots.phase {
        Phase::Idle => {
          slots.phase = Phase::Debouncing;
          slots.deadline = Instant::now() + self.shared.debounce;
        },
        Phase::Debouncing => {
          slots.deadline = Instant::now() + self.shared.debounce;
        },
        // Picked up as queued-next when the in-flight call settles.
        Phase::Flushing => {},
      }
    }
    self.shared.wake.notify_one();
    Ok(())
  }
}

impl<C> Coalescer<C> {
  /// True from the first submission after an idle period until the
  /// dispatcher drains back to idle, covering the debounce window, the
  /// in-flight call, and any queued-next command.
  ///
  /// Callers typically disable the triggering control while this is true so
  /// a user cannot queue an unbounded backlog of contradictory toggles.
  pub fn is_pending(&self) -> bool {
    let slots = self.shared.slots.lock();
    slots.latest.is_some() || slots.phase != Phase::Idle
  }

  /// Cancel any scheduled flush and drop the queued command, leaving the
  /// dispatcher idle. A call already in flight runs to completion but its
  /// outcome is discarded. Idempotent; a no-op while idle.
  pub fn dispose(&self) {
    {
      let mut slots = self.shared.slots.lock();
      if slots.disposed {
        return;
      }
      slots.disposed = true;
      slots.latest = None;
      slots.phase = Phase::Idle;
    }
    self.shared.wake.notify_one();
  }
}

impl<C> Drop for Coalescer<C> {
  fn drop(&mut self) {
    self.dispose();
  }
}

enum Step<C> {
  /// Nothing to do; wait for a wakeup.
  Park,
  /// Debouncing; sleep until the deadline unless a submission moves it.
  Doze(Instant),
  /// Quiet period elapsed; execute the taken command.
  Flush(C),
}

/// Worker loop. All transitions happen here or in `submit`/`dispose`, each
/// under the state mutex, so mutual exclusion is structural: the loop below
/// is the only code that ever invokes `perform`.
async fn run<P: Perform>(shared: Arc<Shared<P::Command>>, mut hook: P) {
  loop {
    let step = {
      let mut slots = shared.slots.lock();
      if slots.disposed {
        return;
      }
      match slots.phase {
        Phase::Idle => Step::Park,
        Phase::Debouncing => {
          if Instant::now() < slots.deadline {
            Step::Doze(slots.deadline)
          } else {
            match slots.latest.take() {
              Some(command) => {
                slots.phase = Phase::Flushing;
                Step::Flush(command)
              },
              // submit always refills `latest` before arming the timer
              None => {
                slots.phase = Phase::Idle;
                Step::Park
              },
            }
          }
        },
        // the flush branch below owns this phase
        Phase::Flushing => Step::Park,
      }
    };

    match step {
      Step::Park => shared.wake.notified().await,
      Step::Doze(deadline) => {
        // a newer submission can move the deadline; wake and re-read it
        tokio::select! {
          _ = time::sleep_until(deadline) => {},
          _ = shared.wake.notified() => {},
        }
      },
      Step::Flush(mut command) => {
        loop {
          let outcome = hook.perform(command).await;
          let next = {
            let mut slots = shared.slots.lock();
            if slots.disposed {
              // disposed mid-flight: discard the outcome
              return;
            }
            let next = slots.latest.take();
            if next.is_none() {
              slots.phase = Phase::Idle;
            }
            next
          };
          hook.settled(outcome);
          match next {
            // queued-next: flush immediately, no second debounce wait
            Some(next) => command = next,
            None => break,
          }
        }
      },
    }
  }
}
