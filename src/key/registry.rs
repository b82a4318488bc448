//! The process-wide registry of key-allocation counters.

use std::any::TypeId;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::atomic::AtomicU64;
use std::sync::{Arc, PoisonError, RwLock};

use once_cell::sync::Lazy;

use super::{Key, KeyError};
use crate::entity::Entity;

static REGISTRY: Lazy<KeyRegistry> = Lazy::new(KeyRegistry::new);

/// The registry used by every [`KeyAccessor`] in this process. Initialized
/// lazily on first use and never torn down.
pub fn key_registry() -> &'static KeyRegistry {
    &REGISTRY
}

/// Maps entity types to their shared key-allocation counters.
///
/// Counters are per entity type, not per repository instance: two
/// independently constructed repositories of the same entity type draw from
/// the same sequence, so a key allocated in one is never reused by the
/// other.
pub struct KeyRegistry {
    counters: RwLock<HashMap<TypeId, Arc<AtomicU64>>>,
}

impl KeyRegistry {
    fn new() -> Self {
        KeyRegistry {
            counters: RwLock::new(HashMap::new()),
        }
    }

    /// The shared counter for entity type `E`, created at zero on first
    /// request.
    pub fn counter<E: Entity>(&self) -> Arc<AtomicU64> {
        // The map only ever grows, one Arc per entity type, so a poisoned
        // lock cannot leave it inconsistent; recover instead of failing.
        if let Some(counter) = self
            .counters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&TypeId::of::<E>())
        {
            return Arc::clone(counter);
        }

        let mut counters = self
            .counters
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            counters
                .entry(TypeId::of::<E>())
                .or_insert_with(|| Arc::new(AtomicU64::new(0))),
        )
    }
}

/// Reads, writes, and allocates keys for one entity type.
///
/// Stateless apart from the shared counter handle; cheap to construct and
/// safe for concurrent use. Every repository owns one.
pub struct KeyAccessor<E: Entity> {
    counter: Arc<AtomicU64>,
    _marker: PhantomData<fn() -> E>,
}

impl<E: Entity> KeyAccessor<E> {
    /// Resolves the shared counter for `E` from the process-wide registry.
    pub fn new() -> Self {
        KeyAccessor {
            counter: key_registry().counter::<E>(),
            _marker: PhantomData,
        }
    }

    /// The value of the entity's key field.
    pub fn get_key(&self, entity: &E) -> E::Key {
        entity.key()
    }

    /// Sets the entity's key field, returning the new value.
    pub fn set_key(&self, entity: &mut E, key: E::Key) -> E::Key {
        entity.set_key(key);
        key
    }

    /// Allocates a new unique key value.
    pub fn next_key(&self) -> Result<E::Key, KeyError> {
        E::Key::mint(&self.counter)
    }
}

impl<E: Entity> Default for KeyAccessor<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> Clone for KeyAccessor<E> {
    fn clone(&self) -> Self {
        KeyAccessor {
            counter: Arc::clone(&self.counter),
            _marker: PhantomData,
        }
    }
}
