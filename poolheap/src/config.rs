//! Compile-time knobs from `spec.md` §6: the payload alignment `A` and the
//! minimum payload size `MIN_PAYLOAD`, expressed as const generic
//! parameters on [`crate::pool::Pool`] rather than as `#define`s, so a
//! misconfigured alignment (not a power of two, smaller than a pointer) is
//! a compile-time error at the monomorphization site instead of a runtime
//! assumption baked into pointer arithmetic.

/// Default payload alignment in bytes. Must be a power of two and at
/// least `size_of::<usize>()`.
pub const DEFAULT_ALIGN: usize = 8;

/// Default minimum payload size in bytes. Must be at least
/// `2 * size_of::<usize>()` so a free block can hold its free-list links.
pub const DEFAULT_MIN_PAYLOAD: usize = 16;

/// A pool using the default alignment and minimum payload. Most callers
/// never need anything else; reach for `Pool::<A, MIN_PAYLOAD>` directly
/// to customize.
pub type Pool = crate::pool::Pool<DEFAULT_ALIGN, DEFAULT_MIN_PAYLOAD>;

pub(crate) const fn assert_valid_config(align: usize, min_payload: usize) {
    assert!(align.is_power_of_two(), "alignment must be a power of two");
    assert!(
        align >= core::mem::size_of::<usize>(),
        "alignment must be at least pointer-sized"
    );
    assert!(
        min_payload >= 2 * core::mem::size_of::<usize>(),
        "MIN_PAYLOAD must hold two free-list link pointers"
    );
}
