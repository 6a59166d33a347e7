//! Primitive insert/remove/splice operations over the two intrusive
//! doubly-linked lists (`spec.md` §2 component 3): the free list (anchored
//! at the descriptor's sentinel) and the block list (physical address
//! order, circular through the tailer). Every higher-level operation in
//! `pool.rs` is built out of these four primitives; none of them touch
//! `available_size` or any other pool-level bookkeeping.

use core::ptr::NonNull;

use crate::block::Header;

/// Insert `node` immediately after `sentinel` in the free list (i.e. at the
/// head, matching the first-fit scan's LIFO preference for recently freed
/// blocks).
///
/// # Safety
/// `sentinel` and `node` must be distinct, valid, initialized headers, and
/// `sentinel`'s free-list pointers must form a valid circular list.
pub(crate) unsafe fn free_list_insert_head<const A: usize, const MIN_PAYLOAD: usize>(
    mut sentinel: NonNull<Header<A, MIN_PAYLOAD>>,
    mut node: NonNull<Header<A, MIN_PAYLOAD>>,
) {
    let mut first = sentinel.as_ref().next_free();
    node.as_mut().set_next_free(first);
    node.as_mut().set_prev_free(sentinel);
    first.as_mut().set_prev_free(node);
    sentinel.as_mut().set_next_free(node);
}

/// Remove `node` from whatever free list it currently sits in, closing the
/// gap between its neighbors. Clears `node`'s own free-list pointers.
///
/// # Safety
/// `node` must currently be linked into a valid circular free list.
pub(crate) unsafe fn free_list_remove<const A: usize, const MIN_PAYLOAD: usize>(
    mut node: NonNull<Header<A, MIN_PAYLOAD>>,
) {
    let mut next = node.as_ref().next_free();
    let mut prev = node.as_ref().prev_free();
    prev.as_mut().set_next_free(next);
    next.as_mut().set_prev_free(prev);
    node.as_mut().clear_free_links();
}

/// Splice `new_node` into the block list physically between `node` and
/// `node.next()` (used by split, which always inserts to the right of the
/// block being split).
///
/// # Safety
/// `node` must be a valid, linked header; `new_node` must not already be
/// linked into the block list.
pub(crate) unsafe fn block_list_insert_after<const A: usize, const MIN_PAYLOAD: usize>(
    mut node: NonNull<Header<A, MIN_PAYLOAD>>,
    mut new_node: NonNull<Header<A, MIN_PAYLOAD>>,
) {
    let mut next = node.as_ref().next();
    new_node.as_mut().set_prev(node);
    new_node.as_mut().set_next(next);
    next.as_mut().set_prev(new_node);
    node.as_mut().set_next(new_node);
}

/// Splice `node` out of the block list, stitching its physical neighbors
/// together (used when coalescing absorbs `node` entirely).
///
/// # Safety
/// `node` must be a valid, linked, non-tailer header.
pub(crate) unsafe fn block_list_unlink<const A: usize, const MIN_PAYLOAD: usize>(
    node: NonNull<Header<A, MIN_PAYLOAD>>,
) {
    let mut prev = node.as_ref().prev();
    let mut next = node.as_ref().next();
    prev.as_mut().set_next(next);
    next.as_mut().set_prev(prev);
}
