//! Keys and key allocation.
//!
//! A [`Key`] is the unique-identity value of an entity: any integer width
//! up to 64 bits, or a [`Uuid`]. The default value (`0`, nil UUID) is the
//! "unassigned" sentinel a repository replaces on insert.
//!
//! Integer keys are minted from a process-wide counter shared by every
//! repository of the same entity type (see [`KeyRegistry`]); UUID keys are
//! freshly generated random values.

mod registry;

use std::fmt::{self, Display};
use std::hash::Hash;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

pub use registry::{key_registry, KeyAccessor, KeyRegistry};

/// Error type for key allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// Every representable key value has been allocated.
    Exhausted { key_type: &'static str },
}

impl fmt::Display for KeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyError::Exhausted { key_type } => {
                write!(f, "all possible {} key values have been used", key_type)
            }
        }
    }
}

impl std::error::Error for KeyError {}

/// A value usable as an entity key.
///
/// Implemented for `i8`–`i64`, `u8`–`u64`, and [`Uuid`]. A type outside
/// this set simply has no implementation, so an unsupported key type is
/// rejected when the entity type is declared, not at first use.
pub trait Key:
    Copy + Default + Eq + Hash + Display + FromStr + Send + Sync + 'static
{
    /// Name used in diagnostics, e.g. `"u32"`.
    const NAME: &'static str;

    /// Whether this value is the unassigned sentinel.
    fn is_unassigned(&self) -> bool;

    /// Mints the next key from the shared counter for the entity type.
    fn mint(counter: &AtomicU64) -> Result<Self, KeyError>;
}

macro_rules! counter_key {
    ($($t:ty),* $(,)?) => {$(
        impl Key for $t {
            const NAME: &'static str = stringify!($t);

            fn is_unassigned(&self) -> bool {
                *self == 0
            }

            fn mint(counter: &AtomicU64) -> Result<Self, KeyError> {
                let max = <$t>::MAX as u64;
                let mut current = counter.load(Ordering::Relaxed);
                loop {
                    // Saturated counters stay saturated: the CAS never runs
                    // once the maximum has been handed out, so the sequence
                    // cannot wrap back to reused values.
                    if current >= max {
                        return Err(KeyError::Exhausted { key_type: Self::NAME });
                    }
                    match counter.compare_exchange_weak(
                        current,
                        current + 1,
                        Ordering::Relaxed,
                        Ordering::Relaxed,
                    ) {
                        Ok(previous) => return Ok((previous + 1) as $t),
                        Err(actual) => current = actual,
                    }
                }
            }
        }
    )*};
}

counter_key!(i8, i16, i32, i64, u8, u16, u32, u64);

impl Key for Uuid {
    const NAME: &'static str = "uuid";

    fn is_unassigned(&self) -> bool {
        self.is_nil()
    }

    fn mint(_counter: &AtomicU64) -> Result<Self, KeyError> {
        // Random v4; collision probability is treated as negligible and is
        // not checked against the store.
        Ok(Uuid::new_v4())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_keys_are_distinct_and_increasing() {
        let counter = AtomicU64::new(0);
        let mut previous = 0;
        for _ in 0..100 {
            let key = i32::mint(&counter).unwrap();
            assert!(key > previous);
            previous = key;
        }
    }

    #[test]
    fn first_minted_key_is_one() {
        let counter = AtomicU64::new(0);
        assert_eq!(u16::mint(&counter).unwrap(), 1);
        assert_eq!(u16::mint(&counter).unwrap(), 2);
    }

    #[test]
    fn every_supported_width_mints_from_one() {
        macro_rules! check {
            ($($t:ty),*) => {$(
                let counter = AtomicU64::new(0);
                assert_eq!(<$t>::mint(&counter).unwrap(), 1);
                assert_eq!(<$t>::mint(&counter).unwrap(), 2);
            )*};
        }
        check!(i8, i16, i32, i64, u8, u16, u32, u64);
    }

    #[test]
    fn exhausted_counter_fails_and_stays_failed() {
        let counter = AtomicU64::new(u8::MAX as u64 - 1);
        assert_eq!(u8::mint(&counter).unwrap(), u8::MAX);

        let err = u8::mint(&counter).unwrap_err();
        assert_eq!(err, KeyError::Exhausted { key_type: "u8" });

        // Still failing on the next call, not wrapped around.
        assert!(u8::mint(&counter).is_err());
    }

    #[test]
    fn exhaustion_applies_to_every_integer_width() {
        let counter = AtomicU64::new(i8::MAX as u64);
        assert!(matches!(
            i8::mint(&counter),
            Err(KeyError::Exhausted { key_type: "i8" })
        ));

        let counter = AtomicU64::new(u64::MAX);
        assert!(matches!(
            u64::mint(&counter),
            Err(KeyError::Exhausted { key_type: "u64" })
        ));
    }

    #[test]
    fn uuid_keys_are_random_and_assigned() {
        let counter = AtomicU64::new(0);
        let a = Uuid::mint(&counter).unwrap();
        let b = Uuid::mint(&counter).unwrap();
        assert_ne!(a, b);
        assert!(!a.is_unassigned());
        // The counter is never touched for UUID keys.
        assert_eq!(counter.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn default_values_are_unassigned() {
        assert!(0i32.is_unassigned());
        assert!(Uuid::nil().is_unassigned());
        assert!(!7u64.is_unassigned());
    }
}
