//! Unified error type for the recoverable (non-fatal) allocator paths.
//!
//! Corruption and precondition violations (`spec.md` §7's "fatal" taxonomy)
//! are not represented here — those are `panic!`s, never a `Result`.

use core::fmt;

/// Recoverable failure from a pool operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolError {
    /// No free block large enough to satisfy the request.
    OutOfMemory,
    /// The pool's lock reported a failure (unreachable with `TicketLock`,
    /// kept so a future blocking-primitive swap doesn't change the API).
    LockFailed,
    /// The pool descriptor was used before `init` or after `detach`.
    Uninitialized,
    /// `init` was called with a region too small to hold a tailer, a big
    /// free block, and `MIN_PAYLOAD` bytes of usable space.
    RegionTooSmall,
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory => write!(f, "no free block satisfies the request"),
            Self::LockFailed => write!(f, "pool lock acquisition failed"),
            Self::Uninitialized => write!(f, "pool is not initialized"),
            Self::RegionTooSmall => write!(f, "region too small for two headers and a tailer"),
        }
    }
}

/// Convenience result type for pool operations.
pub type PoolResult<T = ()> = Result<T, PoolError>;
