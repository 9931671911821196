//! Clock port.

use crate::domain::foundation::Timestamp;

/// Source of the current time for time-dependent rules (cart expiry,
/// promotion windows). Injected so tests can pin it.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}
