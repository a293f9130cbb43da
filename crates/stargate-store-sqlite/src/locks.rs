//! Advisory locks keyed by person.
//!
//! Writers for the same person queue on one async mutex; writers for
//! different persons never share a lock. Entries are held weakly and pruned
//! once no guard references them.

use std::{
  collections::HashMap,
  sync::{Arc, Mutex, PoisonError, Weak},
};

use stargate_core::person::PersonId;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

#[derive(Debug, Default)]
pub struct PersonLocks {
  slots: Mutex<HashMap<PersonId, Weak<AsyncMutex<()>>>>,
}

impl PersonLocks {
  /// Wait for exclusive access to `person_id`'s duty chain.
  pub async fn lock(&self, person_id: PersonId) -> OwnedMutexGuard<()> {
    let slot = {
      let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
      slots.retain(|_, weak| weak.strong_count() > 0);
      match slots.get(&person_id).and_then(Weak::upgrade) {
        Some(slot) => slot,
        None => {
          let slot = Arc::new(AsyncMutex::new(()));
          slots.insert(person_id, Arc::downgrade(&slot));
          slot
        }
      }
    };
    slot.lock_owned().await
  }

  #[cfg(test)]
  fn tracked(&self) -> usize {
    self.slots.lock().unwrap_or_else(PoisonError::into_inner).len()
  }
}
