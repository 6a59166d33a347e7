//! An intrusive boundary-tag heap allocator for a single caller-provided
//! region of memory, modeled on RT-Thread's `memheap`: in-band block
//! headers forming an address-ordered block list and a free-block list,
//! first-fit search with eager split/coalesce, and a sentinel tailer that
//! bounds forward merging without a branch.
//!
//! ```
//! use core::ptr::NonNull;
//! use poolheap::Pool;
//!
//! let mut region = [0u8; 4096];
//! let mut pool = Pool::new("demo");
//! unsafe {
//!     pool.init(NonNull::new(region.as_mut_ptr()).unwrap(), region.len()).unwrap();
//! }
//!
//! let p = pool.alloc(128).expect("pool has room");
//! unsafe { Pool::free(Some(p)); }
//! ```

#![no_std]

mod block;
pub mod config;
pub mod error;
mod list;
pub mod pool;

#[cfg(feature = "dump")]
mod dump;
#[cfg(feature = "system-heap")]
pub mod facade;

pub use config::Pool;
pub use error::{PoolError, PoolResult};
