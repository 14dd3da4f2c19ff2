//! Keyed dispatcher slots, one per independent toggle target.

use std::hash::Hash;

use hashbrown::HashMap;

use crate::{
  config::CoalesceConfig,
  dispatcher::{
    Coalescer,
    Perform,
  },
};

type RandomState = foldhash::fast::RandomState;

/// A collection of independent [`Coalescer`]s keyed by toggle target (an
/// inventory item id, say). Each slot coalesces its own command stream, so
/// hammering one toggle never delays or supersedes another.
pub struct CoalescerSet<K, C> {
  config: CoalesceConfig,
  slots:  HashMap<K, Coalescer<C>, RandomState>,
}

impl<K, C> CoalescerSet<K, C>
where
  K: Eq + Hash,
  C: Send + 'static,
{
  pub fn new(config: CoalesceConfig) -> Self {
    Self {
      config,
      slots: HashMap::default(),
    }
  }

  /// Submit to the slot for `key`, creating its dispatcher from `make` on
  /// first use.
  pub fn submit_with<P>(&mut self, key: K, command: C, make: impl FnOnce() -> P)
  where
    P: Perform<Command = C>,
  {
    let config = self.config;
    self
      .slots
      .entry(key)
      .or_insert_with(|| Coalescer::new(make(), config))
      .submit(command);
  }

  /// Pending state of a single slot; false for keys never submitted to.
  pub fn is_pending(&self, key: &K) -> bool {
    self.slots.get(key).is_some_and(Coalescer::is_pending)
  }

  /// True while any slot is still coalescing or flushing.
  pub fn any_pending(&self) -> bool {
    self.slots.values().any(Coalescer::is_pending)
  }

  /// Dispose and remove a single slot. Dropping the dispatcher cancels its
  /// scheduled flush; an in-flight call settles unobserved.
  pub fn dispose(&mut self, key: &K) {
    self.slots.remove(key);
  }

  /// Dispose every slot, e.g. when the owning surface goes away.
  pub fn dispose_all(&mut self) {
    self.slots.clear();
  }

  pub fn len(&self) -> usize {
    self.slots.len()
  }

  pub fn is_empty(&self) -> bool {
    self.slots.is_empty()
  }
}

impl<K, C> Default for CoalescerSet<K, C>
where
  K: Eq + Hash,
  C: Send + 'static,
{
  fn default() -> Self {
    Self::new(CoalesceConfig::default())
  }
}
