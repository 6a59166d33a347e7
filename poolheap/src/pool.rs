//! The allocator core: pool initialization, first-fit `alloc`, bidirectional
//! coalescing `free`, and in-place-grow `realloc` (`spec.md` §4). This is
//! the bulk of the crate — everything else exists to support this module.

use core::ptr::{self, NonNull};

use poolheap_lib::{align_down_usize, align_up_usize, klog_debug, TicketLock};

use crate::block::{header_of, header_size, payload_of, payload_size, write_header, Header};
use crate::config::assert_valid_config;
use crate::error::{PoolError, PoolResult};
use crate::list::{block_list_insert_after, block_list_unlink, free_list_insert_head, free_list_remove};

pub(crate) struct PoolState<const A: usize, const MIN_PAYLOAD: usize> {
    available_size: usize,
    max_used_size: usize,
    /// Lives inside the descriptor, never in the managed region
    /// (`spec.md` §3.2/§3.3).
    free_list: Header<A, MIN_PAYLOAD>,
}

/// A single contiguous managed region with its own free list, block list,
/// counters, and lock.
///
/// `A` is the payload alignment in bytes (power of two, at least pointer
/// sized); `MIN_PAYLOAD` is the minimum payload a block will ever report
/// (`spec.md` §6). Use [`crate::config::Pool`] for the common defaults.
///
/// # Pinning
/// The free-list sentinel is self-referential: once [`Pool::init`] has run,
/// `Pool` must never be moved (no `mem::swap`, no moving out of a `Vec`,
/// no relocation by value). Place it in a `static`, leave it on the stack
/// for its full lifetime, or box it and never move the box's pointee.
pub struct Pool<const A: usize, const MIN_PAYLOAD: usize> {
    name: &'static str,
    start: usize,
    pool_size: usize,
    block_list: *mut Header<A, MIN_PAYLOAD>,
    pub(crate) state: TicketLock<PoolState<A, MIN_PAYLOAD>>,
    initialized: bool,
}

// SAFETY: all mutable state lives either behind `TicketLock` or is
// write-once-at-init (`start`, `pool_size`, `block_list`, `initialized`),
// and the region itself is caller-owned memory the pool never aliases
// with anything outside itself.
unsafe impl<const A: usize, const MIN_PAYLOAD: usize> Send for Pool<A, MIN_PAYLOAD> {}
unsafe impl<const A: usize, const MIN_PAYLOAD: usize> Sync for Pool<A, MIN_PAYLOAD> {}

impl<const A: usize, const MIN_PAYLOAD: usize> Pool<A, MIN_PAYLOAD> {
    /// A not-yet-initialized pool descriptor. Call [`Pool::init`] before
    /// using it; every other method panics or no-ops on an uninitialized
    /// pool per `spec.md` §7's precondition-violation taxonomy.
    pub const fn new(name: &'static str) -> Self {
        assert_valid_config(A, MIN_PAYLOAD);
        Self {
            name,
            start: 0,
            pool_size: 0,
            block_list: ptr::null_mut(),
            state: TicketLock::new(PoolState {
                available_size: 0,
                max_used_size: 0,
                free_list: Header::placeholder(),
            }),
            initialized: false,
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    #[inline]
    pub fn total_size(&self) -> usize {
        self.pool_size
    }

    pub fn available_size(&self) -> usize {
        self.state.lock().available_size
    }

    pub fn max_used_size(&self) -> usize {
        self.state.lock().max_used_size
    }

    pub fn used_size(&self) -> usize {
        self.pool_size - self.available_size()
    }

    /// Build the initial block topology inside `region` (`spec.md` §4.1):
    /// one big free block spanning the region minus two headers, and a
    /// zero-payload USED tailer bounding forward coalescing/iteration.
    ///
    /// # Safety
    /// `region` must be valid for reads and writes of `size` bytes for the
    /// entire lifetime of the pool, and must not be accessed through any
    /// other pointer while the pool is alive.
    pub unsafe fn init(&mut self, region: NonNull<u8>, size: usize) -> PoolResult<()> {
        let h = header_size::<A, MIN_PAYLOAD>();
        let pool_size = align_down_usize(size, A);
        if pool_size < 3 * h + MIN_PAYLOAD {
            return Err(PoolError::RegionTooSmall);
        }

        let available_size = pool_size - 2 * h;
        self.start = region.as_ptr() as usize;
        self.pool_size = pool_size;

        let self_ptr: *mut Self = self;

        let big_addr = region;
        let tailer_addr =
            NonNull::new_unchecked((big_addr.as_ptr() as usize + h + available_size) as *mut u8);

        let big: NonNull<Header<A, MIN_PAYLOAD>> = big_addr.cast();
        let tailer: NonNull<Header<A, MIN_PAYLOAD>> = tailer_addr.cast();

        // Tailer: USED, next/prev both point back to the big block, so the
        // block list is circular; zero payload.
        write_header::<A, MIN_PAYLOAD>(tailer_addr, self_ptr, true, big, big);
        // Big block: FREE, next/prev point to the tailer.
        write_header::<A, MIN_PAYLOAD>(big_addr, self_ptr, false, tailer, tailer);

        self.block_list = big.as_ptr();

        let state = self.state.get_mut();
        state.available_size = available_size;
        state.max_used_size = pool_size - available_size;

        // Free-list sentinel: self-referential, lives in the descriptor.
        let sentinel: NonNull<Header<A, MIN_PAYLOAD>> =
            NonNull::new_unchecked(ptr::addr_of_mut!(state.free_list));
        state.free_list.mark_free();
        state.free_list.set_pool(self_ptr);
        state.free_list.set_next(sentinel);
        state.free_list.set_prev(sentinel);
        state.free_list.set_next_free(sentinel);
        state.free_list.set_prev_free(sentinel);

        free_list_insert_head(sentinel, big);

        self.initialized = true;
        klog_debug!(
            "poolheap: {} initialized at {:#x}, size {}, available {}",
            self.name,
            self.start,
            pool_size,
            available_size
        );
        Ok(())
    }

    /// Tear down the lock and registry linkage. The region itself remains
    /// owned by the caller (`spec.md` §3.4); this does not zero or free it.
    pub fn detach(&mut self) -> PoolResult<()> {
        if !self.initialized {
            return Err(PoolError::Uninitialized);
        }
        self.initialized = false;
        Ok(())
    }

    fn normalize(size: usize) -> usize {
        let aligned = align_up_usize(size, A);
        if aligned < MIN_PAYLOAD {
            MIN_PAYLOAD
        } else {
            aligned
        }
    }

    /// First-fit allocate `size` bytes (`spec.md` §4.2).
    pub fn alloc(&self, size: usize) -> Option<NonNull<u8>> {
        #[cfg(feature = "memtrace")]
        {
            self.alloc_tagged(size, b"")
        }
        #[cfg(not(feature = "memtrace"))]
        {
            self.alloc_inner(size)
        }
    }

    /// Like [`Pool::alloc`], but also stamps the block's owner tag
    /// (`spec.md` §3.1) once it becomes USED. Only meaningful with the
    /// `memtrace` feature, which is the only build that has storage for a
    /// tag at all.
    #[cfg(feature = "memtrace")]
    pub fn alloc_tagged(&self, size: usize, tag: &[u8]) -> Option<NonNull<u8>> {
        let p = self.alloc_inner(size)?;
        let mut header = header_of::<A, MIN_PAYLOAD>(p);
        unsafe { header.as_mut() }.set_owner_tag(tag);
        Some(p)
    }

    fn alloc_inner(&self, size: usize) -> Option<NonNull<u8>> {
        if !self.initialized {
            return None;
        }
        let n = Self::normalize(size);

        // Early-reject test uses strict `<`, matching the source: a
        // request exactly equal to `available_size` is never attempted
        // even if it would theoretically fit (`spec.md` §9 open question,
        // preserved deliberately).
        if n >= self.available_size() {
            return None;
        }

        let mut state = self.state.lock();
        let sentinel: NonNull<Header<A, MIN_PAYLOAD>> =
            unsafe { NonNull::new_unchecked(ptr::addr_of_mut!(state.free_list)) };

        let mut candidate = unsafe { sentinel.as_ref() }.next_free();
        let mut found_size = 0usize;
        while candidate != sentinel {
            let s = payload_size(candidate);
            if s >= n {
                found_size = s;
                break;
            }
            candidate = unsafe { candidate.as_ref() }.next_free();
        }

        if candidate == sentinel {
            return None;
        }

        let h = header_size::<A, MIN_PAYLOAD>();
        if found_size >= n + h + MIN_PAYLOAD {
            // Split: carve a new FREE block out of the tail of `candidate`.
            let remainder_addr =
                unsafe { NonNull::new_unchecked((candidate.as_ptr() as usize + h + n) as *mut u8) };
            let next = unsafe { candidate.as_ref() }.next();
            let remainder = unsafe {
                write_header::<A, MIN_PAYLOAD>(remainder_addr, self as *const _ as *mut _, false, next, candidate)
            };
            unsafe { block_list_insert_after(candidate, remainder) };
            unsafe { free_list_remove(candidate) };
            unsafe { free_list_insert_head(sentinel, remainder) };
            state.available_size -= n + h;
        } else {
            unsafe { free_list_remove(candidate) };
            state.available_size -= found_size;
        }

        unsafe { candidate.as_mut() }.mark_used();
        let used_now = self.pool_size - state.available_size;
        if used_now > state.max_used_size {
            state.max_used_size = used_now;
        }

        Some(payload_of(candidate))
    }

    /// Free a previously allocated payload pointer (`spec.md` §4.3).
    ///
    /// # Safety
    /// `p`, if non-null, must be a live payload pointer previously returned
    /// by `alloc`/`realloc` on this exact pool, not already freed.
    pub unsafe fn free(p: Option<NonNull<u8>>) {
        let Some(p) = p else { return };

        let mut header = header_of::<A, MIN_PAYLOAD>(p);
        assert!(
            header.as_ref().magic_valid() && header.as_ref().is_used(),
            "poolheap: free() on a block with a bad or non-USED magic — corruption or double free"
        );
        let neighbor = header.as_ref().next();
        assert!(
            neighbor.as_ref().magic_valid(),
            "poolheap: free() neighbor has a bad magic — heap corruption"
        );

        let pool_ptr = header.as_ref().pool();
        assert!(!pool_ptr.is_null(), "poolheap: free() on a block with no owning pool");
        let pool = &*pool_ptr;

        let mut state = pool.state.lock();
        let sentinel: NonNull<Header<A, MIN_PAYLOAD>> =
            NonNull::new_unchecked(ptr::addr_of_mut!(state.free_list));

        header.as_mut().mark_free();
        state.available_size += payload_size(header);

        let h = header_size::<A, MIN_PAYLOAD>();
        let mut insert_header = true;

        // Left coalesce.
        let prev = header.as_ref().prev();
        if !prev.as_ref().is_used() {
            block_list_unlink(header);
            state.available_size += h;
            header = prev;
            insert_header = false;
        }

        // Right coalesce.
        let next = header.as_ref().next();
        if !next.as_ref().is_used() {
            free_list_remove(next);
            block_list_unlink(next);
            state.available_size += h;
        }

        if insert_header {
            free_list_insert_head(sentinel, header);
        }
    }

    /// Reallocate `p` to `newsize` bytes (`spec.md` §4.4).
    ///
    /// # Safety
    /// `p`, if non-null, must be a live payload pointer previously returned
    /// by `alloc`/`realloc` on this pool.
    pub unsafe fn realloc(&self, p: Option<NonNull<u8>>, newsize: usize) -> Option<NonNull<u8>> {
        let Some(p) = p else {
            return self.alloc(newsize);
        };
        if newsize == 0 {
            Self::free(Some(p));
            return None;
        }

        let n = Self::normalize(newsize);
        let mut header = header_of::<A, MIN_PAYLOAD>(p);
        let old = payload_size(header);
        let h = header_size::<A, MIN_PAYLOAD>();

        if n > old {
            let mut state = self.state.lock();
            let sentinel: NonNull<Header<A, MIN_PAYLOAD>> =
                NonNull::new_unchecked(ptr::addr_of_mut!(state.free_list));

            // Pre-read the physical successor before taking any action on
            // it. Safe only because a well-formed client never frees or
            // reallocates this block concurrently with this call
            // (`spec.md` §9, third open question).
            let next = header.as_ref().next();
            if !next.as_ref().is_used() {
                let next_size = payload_size(next);
                if next_size + old > n + MIN_PAYLOAD {
                    free_list_remove(next);
                    let after_next = next.as_ref().next();
                    block_list_unlink(next);

                    let remainder_addr = NonNull::new_unchecked((p.as_ptr() as usize + n) as *mut u8);
                    let remainder = write_header::<A, MIN_PAYLOAD>(
                        remainder_addr,
                        self as *const _ as *mut _,
                        false,
                        after_next,
                        header,
                    );
                    block_list_insert_after(header, remainder);
                    free_list_insert_head(sentinel, remainder);

                    state.available_size -= n - old;
                    let used_now = self.pool_size - state.available_size;
                    if used_now > state.max_used_size {
                        state.max_used_size = used_now;
                    }
                    return Some(p);
                }
            }
            drop(state);

            let new_ptr = self.alloc(n)?;
            let copy_len = old.min(n);
            ptr::copy_nonoverlapping(p.as_ptr(), new_ptr.as_ptr(), copy_len);
            Self::free(Some(p));
            return Some(new_ptr);
        }

        // Shrink / same-size: no profitable split exists.
        if old - n < h + MIN_PAYLOAD {
            return Some(p);
        }

        let mut state = self.state.lock();
        let sentinel: NonNull<Header<A, MIN_PAYLOAD>> =
            NonNull::new_unchecked(ptr::addr_of_mut!(state.free_list));

        let remainder_addr = NonNull::new_unchecked((p.as_ptr() as usize + n) as *mut u8);
        let old_next = header.as_ref().next();
        let mut remainder = write_header::<A, MIN_PAYLOAD>(
            remainder_addr,
            self as *const _ as *mut _,
            false,
            old_next,
            header,
        );
        block_list_insert_after(header, remainder);

        // The new block's right neighbor (the split's old physical
        // successor) may itself be FREE; merge eagerly (`spec.md` §4.4
        // shrink step 3). Unlike `free`'s left-merge, `remainder` never
        // has a live left neighbor to merge with — its left is `header`,
        // still USED.
        //
        // `old_next`'s payload is already counted in `available_size`
        // (it was a live FREE block, per I6) — subtract it before the
        // merge absorbs its span into `remainder`, or the merged bytes
        // get double-counted. Mirrors the net-delta the grow path above
        // already applies (`state.available_size -= n - old`).
        if !old_next.as_ref().is_used() {
            state.available_size -= payload_size(old_next);
            free_list_remove(old_next);
            block_list_unlink(old_next);
        }

        free_list_insert_head(sentinel, remainder);
        state.available_size += payload_size(remainder);

        Some(p)
    }

    #[cfg(any(feature = "dump", test))]
    pub(crate) fn first_block(&self) -> NonNull<Header<A, MIN_PAYLOAD>> {
        unsafe { NonNull::new_unchecked(self.block_list) }
    }

    #[cfg(any(feature = "dump", test))]
    pub(crate) fn region_end(&self) -> usize {
        self.start + self.pool_size
    }
}

#[cfg(test)]
mod tests {
    extern crate alloc;

    use super::*;

    const TEST_A: usize = 8;
    const TEST_MIN_PAYLOAD: usize = 16;
    type TestPool = Pool<TEST_A, TEST_MIN_PAYLOAD>;

    #[repr(align(8))]
    struct Region([u8; 4096]);

    fn new_pool() -> (TestPool, Region) {
        (TestPool::new("test"), Region([0u8; 4096]))
    }

    unsafe fn init(pool: &mut TestPool, region: &mut Region) {
        let start = NonNull::new(region.0.as_mut_ptr()).unwrap();
        pool.init(start, region.0.len()).unwrap();
    }

    #[test]
    fn init_reports_expected_capacity() {
        let (mut pool, mut region) = new_pool();
        unsafe { init(&mut pool, &mut region) };

        let h = header_size::<TEST_A, TEST_MIN_PAYLOAD>();
        assert_eq!(pool.total_size(), 4096);
        assert_eq!(pool.available_size(), 4096 - 2 * h);
        assert_eq!(pool.used_size(), 2 * h);
    }

    #[test]
    fn simple_alloc_then_free_restores_pool() {
        let (mut pool, mut region) = new_pool();
        unsafe { init(&mut pool, &mut region) };

        let initial_available = pool.available_size();
        let p = pool.alloc(100).expect("alloc should succeed");
        assert_eq!(p.as_ptr() as usize % TEST_A, 0);
        assert!(pool.available_size() < initial_available);

        unsafe { TestPool::free(Some(p)) };
        assert_eq!(pool.available_size(), initial_available);
    }

    #[test]
    fn tight_fit_consumes_block_whole() {
        let (mut pool, mut region) = new_pool();
        unsafe { init(&mut pool, &mut region) };

        let h = header_size::<TEST_A, TEST_MIN_PAYLOAD>();
        let p1 = pool.alloc(100).unwrap();
        let remainder = pool.available_size();

        // Request leaves less than h + MIN_PAYLOAD slack: whole-block consume.
        let tight = remainder - (h + TEST_MIN_PAYLOAD) + 4;
        let _p2 = pool.alloc(tight).expect("tight alloc should succeed");
        assert_eq!(pool.available_size(), 0);

        unsafe { TestPool::free(Some(p1)) };
    }

    #[cfg(feature = "memtrace")]
    #[test]
    fn owner_tag_round_trips_without_disturbing_the_free_list() {
        let (mut pool, mut region) = new_pool();
        unsafe { init(&mut pool, &mut region) };

        let a = pool.alloc_tagged(40, b"workerA").unwrap();
        let header = header_of::<TEST_A, TEST_MIN_PAYLOAD>(a);
        let tag = unsafe { header.as_ref() }.owner_tag();
        assert!(core::str::from_utf8(&tag).unwrap().starts_with("workerA"));

        // Free it, then allocate again: the free list must still be intact
        // (the tag storage overlaps the free-list link fields while FREE).
        unsafe { TestPool::free(Some(a)) };
        let b = pool.alloc(40).expect("free list must not be corrupted by the owner tag");
        unsafe { TestPool::free(Some(b)) };
    }

    #[test]
    fn free_coalesces_both_neighbors() {
        let (mut pool, mut region) = new_pool();
        unsafe { init(&mut pool, &mut region) };

        let initial = pool.available_size();
        let a = pool.alloc(100).unwrap();
        let b = pool.alloc(100).unwrap();

        unsafe { TestPool::free(Some(a)) };
        unsafe { TestPool::free(Some(b)) };

        assert_eq!(pool.available_size(), initial);
    }

    #[test]
    fn realloc_grows_in_place_into_free_neighbor() {
        let (mut pool, mut region) = new_pool();
        unsafe { init(&mut pool, &mut region) };

        let p = pool.alloc(100).unwrap();
        let before = pool.available_size();
        let grown = unsafe { pool.realloc(Some(p), 150) }.unwrap();
        assert_eq!(grown, p, "in-place grow must return the same pointer");
        assert!(pool.available_size() < before);
    }

    #[test]
    fn realloc_grows_via_copy_when_neighbor_is_used() {
        let (mut pool, mut region) = new_pool();
        unsafe { init(&mut pool, &mut region) };

        let a = pool.alloc(100).unwrap();
        let _b = pool.alloc(100).unwrap();

        unsafe {
            ptr::write_bytes(a.as_ptr(), 0xAB, 100);
        }

        let moved = unsafe { pool.realloc(Some(a), 200) }.unwrap();
        assert_ne!(moved, a, "no free neighbor: must allocate elsewhere");
        unsafe {
            assert_eq!(*moved.as_ptr(), 0xAB);
            assert_eq!(*moved.as_ptr().add(99), 0xAB);
        }
    }

    #[test]
    fn realloc_shrink_with_free_right_neighbor_keeps_available_size_accurate() {
        let (mut pool, mut region) = new_pool();
        unsafe { init(&mut pool, &mut region) };

        // `a`'s physical right neighbor is the leftover FREE block from
        // the initial split, so shrinking `a` triggers the shrink path's
        // right-coalesce (spec.md §4.4 shrink step 3).
        let a = pool.alloc(200).unwrap();
        let shrunk = unsafe { pool.realloc(Some(a), 50) }.unwrap();
        assert_eq!(shrunk, a, "shrink never moves the block");

        // `old_next`'s payload was already counted in `available_size`
        // before the merge; summing the free blocks independently (a
        // fresh physical-list walk) must match the counter exactly, or
        // a double-count/drop in the merge arithmetic would go unnoticed.
        let tailer_addr = pool.region_end() - header_size::<TEST_A, TEST_MIN_PAYLOAD>();
        let mut current = pool.first_block();
        let mut free_payload_total = 0usize;
        loop {
            let addr = current.as_ptr() as usize;
            if addr >= tailer_addr {
                break;
            }
            let header = unsafe { current.as_ref() };
            if !header.is_used() {
                free_payload_total += payload_size(current);
            }
            current = header.next();
        }
        assert_eq!(free_payload_total, pool.available_size());
        assert!(pool.available_size() <= pool.total_size(), "available_size must never exceed the pool");
    }

    #[test]
    fn realloc_null_is_alloc_and_zero_is_free() {
        let (mut pool, mut region) = new_pool();
        unsafe { init(&mut pool, &mut region) };

        let p = unsafe { pool.realloc(None, 64) }.expect("realloc(NULL, n) == alloc(n)");
        let before = pool.available_size();
        let freed = unsafe { pool.realloc(Some(p), 0) };
        assert!(freed.is_none());
        assert!(pool.available_size() > before);
    }

    #[test]
    fn alloc_fails_when_request_exceeds_available() {
        let (mut pool, mut region) = new_pool();
        unsafe { init(&mut pool, &mut region) };

        let too_big = pool.available_size() + 1;
        assert!(pool.alloc(too_big).is_none());
    }

    #[test]
    fn alloc_rejects_request_exactly_equal_to_available() {
        // spec.md §9 open question: strict `<` preserved deliberately.
        let (mut pool, mut region) = new_pool();
        unsafe { init(&mut pool, &mut region) };

        let exact = pool.available_size();
        assert!(pool.alloc(exact).is_none());
    }

    #[test]
    fn max_used_size_is_a_high_water_mark() {
        let (mut pool, mut region) = new_pool();
        unsafe { init(&mut pool, &mut region) };

        let a = pool.alloc(200).unwrap();
        let high = pool.max_used_size();
        unsafe { TestPool::free(Some(a)) };

        let _b = pool.alloc(50).unwrap();
        assert_eq!(pool.max_used_size(), high, "max_used_size must not decrease on free");
    }

    #[test]
    fn init_rejects_undersized_region() {
        let mut pool: TestPool = TestPool::new("tiny");
        let mut tiny = [0u8; 4];
        let start = NonNull::new(tiny.as_mut_ptr()).unwrap();
        assert_eq!(
            unsafe { pool.init(start, tiny.len()) },
            Err(PoolError::RegionTooSmall)
        );
    }

    #[test]
    fn invariants_hold_after_a_mixed_operation_sequence() {
        let (mut pool, mut region) = new_pool();
        unsafe { init(&mut pool, &mut region) };

        let mut live = alloc::vec::Vec::new();
        let sizes = [40usize, 8, 200, 16, 64, 1, 500, 24];
        for (i, &size) in sizes.iter().cycle().take(40).enumerate() {
            if let Some(p) = pool.alloc(size) {
                live.push(p);
            }
            if i % 3 == 0 {
                if let Some(p) = live.pop() {
                    unsafe { TestPool::free(Some(p)) };
                }
            }
            if i % 5 == 0 {
                if let Some(&p) = live.first() {
                    if let Some(grown) = unsafe { pool.realloc(Some(p), size + 10) } {
                        live[0] = grown;
                    }
                }
            }
        }
        for p in live {
            unsafe { TestPool::free(Some(p)) };
        }

        // Walk the physical block list: every header has a valid magic, and
        // no two adjacent blocks are both FREE. Stop one header-width
        // before the region end, at the tailer, the same way `Pool::dump`
        // does.
        let tailer_addr = pool.region_end() - header_size::<TEST_A, TEST_MIN_PAYLOAD>();
        let mut current = pool.first_block();
        let mut free_payload_total = 0usize;
        let mut prev_was_free = false;
        loop {
            let addr = current.as_ptr() as usize;
            if addr >= tailer_addr {
                break;
            }
            let header = unsafe { current.as_ref() };
            assert!(header.magic_valid());
            let this_free = !header.is_used();
            assert!(!(prev_was_free && this_free), "two adjacent FREE blocks");
            if this_free {
                free_payload_total += payload_size(current);
            }
            prev_was_free = this_free;
            current = header.next();
        }
        assert_eq!(free_payload_total, pool.available_size());

        // Pool is fully coalesced back to a single free block spanning
        // the whole region.
        assert_eq!(pool.available_size(), pool.total_size() - 2 * header_size::<TEST_A, TEST_MIN_PAYLOAD>());
    }

    #[test]
    #[should_panic(expected = "bad or non-USED magic")]
    fn double_free_panics() {
        let (mut pool, mut region) = new_pool();
        unsafe { init(&mut pool, &mut region) };

        let p = pool.alloc(32).unwrap();
        unsafe {
            TestPool::free(Some(p));
            TestPool::free(Some(p));
        }
    }
}
