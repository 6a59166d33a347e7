//! Diagnostic surface (`spec.md` §6, feature `dump`): a per-pool walk of
//! the physical block list, and a registry-wide `trace_all` when the
//! `system-heap` facade is also enabled. Modeled on `rt_memheap_dump` /
//! `memheaptrace`, but taking a sink closure instead of hard-wiring to a
//! console print function — callers wire it to `poolheap_lib::klog!` (the
//! crate's own default sink, mirrored in the tests below) or to whatever
//! console surface their target provides.

use core::fmt::Arguments;

use crate::block::{header_size, payload_size};
use crate::pool::Pool;

impl<const A: usize, const MIN_PAYLOAD: usize> Pool<A, MIN_PAYLOAD> {
    /// Emit one line per physical block: address, size, used/free marker,
    /// and (under `memtrace`) the owner tag. Runs under the pool's lock,
    /// matching `spec.md`'s "dump... acquires the lock" diagnostic rule.
    pub fn dump(&self, mut sink: impl FnMut(Arguments<'_>)) {
        if !self.is_initialized() {
            return;
        }

        let _guard = self.state.lock();
        let h = header_size::<A, MIN_PAYLOAD>();
        // The tailer's header occupies the last `h` bytes of the region
        // (its payload is zero-sized), so its own address never satisfies
        // `addr >= end` — stop one header-width early instead, matching
        // `spec.md` §3.3's "iteration checks the address against the pool
        // end" (the tailer is the first block whose header would span
        // outside the region).
        let tailer_addr = self.region_end() - h;
        let mut current = self.first_block();

        loop {
            let header_addr = current.as_ptr() as usize;
            if header_addr >= tailer_addr {
                break;
            }
            let header = unsafe { current.as_ref() };
            if !header.magic_valid() {
                sink(format_args!("{:#010x}: corrupt magic, stopping walk", header_addr));
                break;
            }

            let payload_addr = header_addr + h;
            let size = payload_size(current);

            if header.is_used() {
                #[cfg(feature = "memtrace")]
                {
                    let tag = header.owner_tag();
                    let tag = core::str::from_utf8(&tag).unwrap_or("????????");
                    sink(format_args!("{:#010x}: {:<8} {}", payload_addr, size, tag));
                }
                #[cfg(not(feature = "memtrace"))]
                sink(format_args!("{:#010x}: {:<8}", payload_addr, size));
            } else {
                sink(format_args!("{:#010x}: {:<8} <F>", payload_addr, size));
            }

            current = header.next();
        }
    }
}

#[cfg(feature = "system-heap")]
impl<'p, const A: usize, const MIN_PAYLOAD: usize, R> crate::facade::SystemHeap<'p, A, MIN_PAYLOAD, R>
where
    R: crate::facade::PoolRegistry<A, MIN_PAYLOAD>,
{
    /// Dump the default pool followed by every registered pool, in
    /// registry order.
    pub fn trace_all(&self, mut sink: impl FnMut(Arguments<'_>) + Copy) {
        self.default_pool().dump(sink);
        self.others().try_for_each(&mut |pool| {
            pool.dump(sink);
            false
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::RefCell;
    use core::ptr::NonNull;

    type TestPool = Pool<8, 16>;

    #[test]
    fn dump_emits_one_line_per_block() {
        let mut pool = TestPool::new("dump-test");
        let mut region = [0u8; 512];
        unsafe {
            pool.init(NonNull::new(region.as_mut_ptr()).unwrap(), region.len())
                .unwrap();
        }
        let _p = pool.alloc(32).unwrap();

        let lines = RefCell::new(0usize);
        pool.dump(|_args| {
            *lines.borrow_mut() += 1;
        });

        // One used block + one remainder free block.
        assert_eq!(*lines.borrow(), 2);
    }
}
