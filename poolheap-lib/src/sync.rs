//! Synchronization primitives: a FIFO ticket lock and a one-shot lazy-init
//! cell. Both are hand-rolled rather than pulled from the `spin` crate —
//! the same call the teacher workspace made when it replaced `spin::Once`
//! and `spin::Mutex` with `OnceLock`/`IrqMutex`: a pool allocator's lock
//! discipline (`spec.md` §5 — FIFO ordering among waiters, never held
//! across a call into user code) is part of the allocator's contract, not
//! an incidental implementation detail to borrow from elsewhere.

use core::cell::UnsafeCell;
use core::hint::spin_loop;
use core::mem::MaybeUninit;
use core::ops::{Deref, DerefMut};
use core::sync::atomic::{AtomicU8, AtomicU16, Ordering};

/// A FIFO ticket lock guarding `T`.
///
/// Each acquirer takes a monotonically-increasing ticket and spins until
/// `now_serving` matches it, guaranteeing callers are served in the order
/// they requested the lock — the "binary counting semaphore with FIFO
/// wait-ordering" `spec.md` §5 describes, minus the OS-level blocking
/// (there is no scheduler here to park a waiter on, so waiters spin).
pub struct TicketLock<T> {
    next_ticket: AtomicU16,
    now_serving: AtomicU16,
    data: UnsafeCell<T>,
}

// SAFETY: TicketLock provides exclusive access through ticket-lock
// acquisition, making it safe to share across threads.
unsafe impl<T: Send> Send for TicketLock<T> {}
unsafe impl<T: Send> Sync for TicketLock<T> {}

pub struct TicketLockGuard<'a, T> {
    lock: &'a TicketLock<T>,
}

impl<T> TicketLock<T> {
    #[inline]
    pub const fn new(data: T) -> Self {
        Self {
            next_ticket: AtomicU16::new(0),
            now_serving: AtomicU16::new(0),
            data: UnsafeCell::new(data),
        }
    }

    /// Returns true if the lock is currently held (or has waiters).
    #[inline]
    pub fn is_locked(&self) -> bool {
        self.next_ticket.load(Ordering::Relaxed) != self.now_serving.load(Ordering::Relaxed)
    }

    /// Acquire the lock, blocking (by spinning) until it is our turn.
    #[inline]
    pub fn lock(&self) -> TicketLockGuard<'_, T> {
        let my_ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);

        loop {
            let serving = self.now_serving.load(Ordering::Acquire);
            if serving == my_ticket {
                break;
            }
            let distance = my_ticket.wrapping_sub(serving) as u32;
            for _ in 0..distance.min(64) {
                spin_loop();
            }
        }

        TicketLockGuard { lock: self }
    }

    /// Try to acquire the lock without waiting. Fails if another holder
    /// (or queued waiter) already owns the next ticket.
    #[inline]
    pub fn try_lock(&self) -> Option<TicketLockGuard<'_, T>> {
        let current = self.now_serving.load(Ordering::Relaxed);
        if self
            .next_ticket
            .compare_exchange(
                current,
                current.wrapping_add(1),
                Ordering::Acquire,
                Ordering::Relaxed,
            )
            .is_ok()
        {
            Some(TicketLockGuard { lock: self })
        } else {
            None
        }
    }

    /// Obtain a mutable reference to the guarded data without taking the
    /// lock. Safe because `&mut self` already proves exclusive access.
    #[inline]
    pub fn get_mut(&mut self) -> &mut T {
        self.data.get_mut()
    }

    /// Force the lock open without going through a guard's `Drop`.
    ///
    /// # Safety
    /// Only safe when the caller knows no thread is currently executing
    /// with this lock held — e.g. recovering a lock whose owning thread
    /// was torn down.
    #[inline]
    pub unsafe fn force_unlock(&self) {
        self.now_serving
            .store(self.next_ticket.load(Ordering::Relaxed), Ordering::Release);
    }
}

impl<'a, T> Deref for TicketLockGuard<'a, T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        unsafe { &*self.lock.data.get() }
    }
}

impl<'a, T> DerefMut for TicketLockGuard<'a, T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut T {
        unsafe { &mut *self.lock.data.get() }
    }
}

impl<'a, T> Drop for TicketLockGuard<'a, T> {
    #[inline]
    fn drop(&mut self) {
        self.lock.now_serving.fetch_add(1, Ordering::Release);
    }
}

// =============================================================================
// OnceLock - one-shot lazy initialization
// =============================================================================

const STATE_UNINIT: u8 = 0;
const STATE_RUNNING: u8 = 1;
const STATE_COMPLETE: u8 = 2;

/// A thread-safe container for one-time initialization.
///
/// The value is lazily initialized on the first call to [`call_once`].
/// Concurrent callers spin until initialization completes; subsequent
/// callers are no-ops.
///
/// [`call_once`]: OnceLock::call_once
pub struct OnceLock<T> {
    state: AtomicU8,
    data: UnsafeCell<MaybeUninit<T>>,
}

// SAFETY: OnceLock ensures exclusive write access during initialization
// through atomic state transitions (only one thread can CAS UNINIT->RUNNING),
// and shared read access thereafter (state == COMPLETE is immutable).
unsafe impl<T: Send + Sync> Send for OnceLock<T> {}
unsafe impl<T: Send + Sync> Sync for OnceLock<T> {}

impl<T> OnceLock<T> {
    #[inline]
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(STATE_UNINIT),
            data: UnsafeCell::new(MaybeUninit::uninit()),
        }
    }

    /// Initialize the value if not yet initialized.
    #[inline]
    pub fn call_once(&self, f: impl FnOnce() -> T) {
        if self.state.load(Ordering::Acquire) == STATE_COMPLETE {
            return;
        }

        if self
            .state
            .compare_exchange(
                STATE_UNINIT,
                STATE_RUNNING,
                Ordering::Acquire,
                Ordering::Acquire,
            )
            .is_ok()
        {
            let value = f();
            // SAFETY: we are the sole writer (STATE_RUNNING guarantees exclusivity).
            unsafe { (*self.data.get()).write(value) };
            self.state.store(STATE_COMPLETE, Ordering::Release);
        } else {
            while self.state.load(Ordering::Acquire) != STATE_COMPLETE {
                core::hint::spin_loop();
            }
        }
    }

    /// Returns a reference to the value if initialized, or `None`.
    #[inline]
    pub fn get(&self) -> Option<&T> {
        if self.state.load(Ordering::Acquire) == STATE_COMPLETE {
            // SAFETY: state == COMPLETE guarantees the value was fully
            // written with Release ordering, synchronized by our Acquire load.
            Some(unsafe { (*self.data.get()).assume_init_ref() })
        } else {
            None
        }
    }

    #[inline]
    pub fn is_completed(&self) -> bool {
        self.state.load(Ordering::Acquire) == STATE_COMPLETE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticket_lock_serializes_access() {
        let lock = TicketLock::new(0u32);
        {
            let mut guard = lock.lock();
            *guard += 1;
        }
        assert_eq!(*lock.lock(), 1);
        assert!(!lock.is_locked());
    }

    #[test]
    fn try_lock_fails_while_held() {
        let lock = TicketLock::new(());
        let guard = lock.lock();
        assert!(lock.try_lock().is_none());
        drop(guard);
        assert!(lock.try_lock().is_some());
    }

    #[test]
    fn once_lock_runs_initializer_exactly_once() {
        static COUNTER: core::sync::atomic::AtomicU32 = core::sync::atomic::AtomicU32::new(0);
        let once: OnceLock<u32> = OnceLock::new();
        assert!(once.get().is_none());

        once.call_once(|| {
            COUNTER.fetch_add(1, Ordering::Relaxed);
            42
        });
        once.call_once(|| {
            COUNTER.fetch_add(1, Ordering::Relaxed);
            99
        });

        assert_eq!(*once.get().unwrap(), 42);
        assert_eq!(COUNTER.load(Ordering::Relaxed), 1);
    }
}
