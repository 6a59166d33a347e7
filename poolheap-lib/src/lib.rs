//! Shared primitives used by the `poolheap` crate: a FIFO ticket lock, a
//! one-shot lazy-init cell, alignment helpers, and a small structured
//! logging facade. Kept as its own crate the way a kernel workspace keeps
//! its synchronization/alignment/logging primitives in a common `lib`
//! crate shared by every subsystem, rather than duplicated per-consumer.

#![no_std]

pub mod alignment;
pub mod klog;
pub mod sync;

pub use alignment::{align_down_u64, align_down_usize, align_up_u64, align_up_usize};
pub use sync::{OnceLock, TicketLock, TicketLockGuard};
