//! Structured logging facade.
//!
//! All log output funnels through a single **backend** function pointer,
//! the same shape as a kernel's klog subsystem: a host registers a backend
//! once (e.g. to print to a console, or to forward into a real logger),
//! and every `klog_*!` call site stays decoupled from where the bytes end
//! up. With no backend registered, log lines are silently dropped — this
//! crate has no default console to fall back to the way a kernel has
//! COM1 during early boot.

use core::fmt;
use core::sync::atomic::{AtomicPtr, AtomicU8, Ordering};

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KlogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl KlogLevel {
    fn from_raw(raw: u8) -> Self {
        match raw {
            0 => KlogLevel::Error,
            1 => KlogLevel::Warn,
            2 => KlogLevel::Info,
            3 => KlogLevel::Debug,
            _ => KlogLevel::Trace,
        }
    }
}

static CURRENT_LEVEL: AtomicU8 = AtomicU8::new(KlogLevel::Info as u8);

#[inline(always)]
fn is_enabled(level: KlogLevel) -> bool {
    level as u8 <= CURRENT_LEVEL.load(Ordering::Relaxed)
}

/// Signature of a klog backend: receives one fully-formatted log line
/// (no trailing newline) and is responsible for emitting it atomically.
pub type KlogBackend = fn(fmt::Arguments<'_>);

/// Stored as a raw pointer; `null` means "no backend registered".
static BACKEND: AtomicPtr<()> = AtomicPtr::new(core::ptr::null_mut());

#[inline]
fn dispatch(args: fmt::Arguments<'_>) {
    let ptr = BACKEND.load(Ordering::Acquire);
    if ptr.is_null() {
        return;
    }
    // SAFETY: `klog_register_backend` only stores valid `KlogBackend` fn
    // pointers, which are the same size as `*mut ()` on all supported targets.
    let backend: KlogBackend = unsafe { core::mem::transmute(ptr) };
    backend(args);
}

/// Register a backend. Overwrites any previously registered backend.
pub fn klog_register_backend(backend: KlogBackend) {
    BACKEND.store(backend as *mut (), Ordering::Release);
}

/// Unregister the backend; subsequent log calls are dropped.
pub fn klog_clear_backend() {
    BACKEND.store(core::ptr::null_mut(), Ordering::Release);
}

pub fn klog_set_level(level: KlogLevel) {
    CURRENT_LEVEL.store(level as u8, Ordering::Relaxed);
}

pub fn klog_get_level() -> KlogLevel {
    KlogLevel::from_raw(CURRENT_LEVEL.load(Ordering::Relaxed))
}

/// Emit a formatted log line at the given level, if enabled and a backend
/// is registered.
pub fn log_args(level: KlogLevel, args: fmt::Arguments<'_>) {
    if !is_enabled(level) {
        return;
    }
    dispatch(args);
}

#[macro_export]
macro_rules! klog {
    ($level:expr, $($arg:tt)*) => {{
        $crate::klog::log_args($level, ::core::format_args!($($arg)*));
    }};
}

#[macro_export]
macro_rules! klog_error {
    ($($arg:tt)*) => {
        $crate::klog::log_args($crate::klog::KlogLevel::Error, ::core::format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! klog_warn {
    ($($arg:tt)*) => {
        $crate::klog::log_args($crate::klog::KlogLevel::Warn, ::core::format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! klog_info {
    ($($arg:tt)*) => {
        $crate::klog::log_args($crate::klog::KlogLevel::Info, ::core::format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! klog_debug {
    ($($arg:tt)*) => {
        $crate::klog::log_args($crate::klog::KlogLevel::Debug, ::core::format_args!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::AtomicUsize;

    static HITS: AtomicUsize = AtomicUsize::new(0);

    fn counting_backend(_args: fmt::Arguments<'_>) {
        HITS.fetch_add(1, Ordering::Relaxed);
    }

    #[test]
    fn no_backend_drops_silently() {
        klog_clear_backend();
        klog_info!("hello {}", 1);
    }

    #[test]
    fn registered_backend_receives_enabled_levels() {
        HITS.store(0, Ordering::Relaxed);
        klog_register_backend(counting_backend);
        klog_set_level(KlogLevel::Info);
        klog_info!("visible");
        klog_debug!("suppressed, debug > info");
        assert_eq!(HITS.load(Ordering::Relaxed), 1);
        klog_clear_backend();
    }
}
