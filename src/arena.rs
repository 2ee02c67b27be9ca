/*!
# Cost Arena

A pooled allocator of cost-vector slots. Cost vectors are created, combined
and dropped very frequently along the Dijkstra frontier, so rather than
allocate a fresh `Vec<T>` per combine, [`CostArena`] hands out opaque
[`CostHandle`]/[`PartialCost`] tokens into a dense backing store and recycles
slots through a free-list on drop.

Two handle kinds share one backing store:

- [`CostHandle<T>`] names a whole, lexicographically-comparable cost vector.
- [`PartialCost<T>`] names a vector where only one coordinate was just
  combined and every other coordinate holds identity. It can only be
  compared or combined one coordinate at a time — see
  [`MonoidVectorProps::op_at`]. This is a static guard against the confusion
  a single untyped cost-handle type would allow.

Both handle kinds release their slot back to the arena's free-list on
`Drop`. The arena is referenced by `Weak`, so handles outliving their arena
(a caller bug) simply leak their index rather than panicking.
*/

use std::cell::RefCell;
use std::cmp::Ordering;
use std::rc::{Rc, Weak};

use tracing::trace;

use crate::monoid::MonoidVectorProps;

struct ArenaInner<T> {
    props: MonoidVectorProps<T>,
    slots: Vec<Vec<T>>,
    free_list: Vec<u32>,
}

/// Pooled allocator of cost-vector slots for one [`MonoidVectorProps`].
pub struct CostArena<T> {
    inner: Rc<RefCell<ArenaInner<T>>>,
}

impl<T> Clone for CostArena<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

/// Token granting access to a coordinate of a cost slot, whether the slot
/// is a whole (`CostHandle`) or single-coordinate (`PartialCost`) result.
/// Sealed: only the two handle types in this module implement it.
pub trait CostSlot: sealed::Sealed {
    #[doc(hidden)]
    fn slot_index(&self) -> u32;
}

mod sealed {
    pub trait Sealed {}
}

/// An owning handle to a whole cost-vector slot. Every coordinate is a
/// genuine monoid value (not padding), so it may be passed to
/// [`CostArena::compare`] and [`CostArena::op`].
pub struct CostHandle<T> {
    idx: u32,
    arena: Weak<RefCell<ArenaInner<T>>>,
}

/// An owning handle to a cost-vector slot in which only coordinate
/// [`PartialCost::coordinate`] was just combined; every other coordinate is
/// identity. May only be read or combined one coordinate at a time.
pub struct PartialCost<T> {
    idx: u32,
    coordinate: usize,
    arena: Weak<RefCell<ArenaInner<T>>>,
}

impl<T> PartialCost<T> {
    /// The coordinate that was actually combined when this handle was
    /// produced.
    pub fn coordinate(&self) -> usize {
        self.coordinate
    }
}

impl<T> sealed::Sealed for CostHandle<T> {}
impl<T> sealed::Sealed for PartialCost<T> {}

impl<T> CostSlot for CostHandle<T> {
    fn slot_index(&self) -> u32 {
        self.idx
    }
}

impl<T> CostSlot for PartialCost<T> {
    fn slot_index(&self) -> u32 {
        self.idx
    }
}

fn release<T>(arena: &Weak<RefCell<ArenaInner<T>>>, idx: u32) {
    if let Some(inner) = arena.upgrade() {
        inner.borrow_mut().free_list.push(idx);
        trace!(idx, "cost slot released");
    }
}

impl<T> Drop for CostHandle<T> {
    fn drop(&mut self) {
        release(&self.arena, self.idx);
    }
}

impl<T> Drop for PartialCost<T> {
    fn drop(&mut self) {
        release(&self.arena, self.idx);
    }
}

impl<T: Clone> CostArena<T> {
    /// Creates an arena for the given monoid vector configuration.
    pub fn new(props: MonoidVectorProps<T>) -> Self {
        Self::with_capacity(props, 0)
    }

    /// Creates an arena for the given monoid vector configuration,
    /// pre-reserving space for `capacity` slots.
    pub fn with_capacity(props: MonoidVectorProps<T>, capacity: usize) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ArenaInner {
                props,
                slots: Vec::with_capacity(capacity),
                free_list: Vec::new(),
            })),
        }
    }

    fn alloc(&self, value: Vec<T>) -> u32 {
        let mut inner = self.inner.borrow_mut();
        if let Some(idx) = inner.free_list.pop() {
            inner.slots[idx as usize] = value;
            trace!(idx, "cost slot reused from free-list");
            idx
        } else {
            inner.slots.push(value);
            let idx = (inner.slots.len() - 1) as u32;
            trace!(idx, "cost slot allocated");
            idx as u32
        }
    }

    fn handle(&self, idx: u32) -> CostHandle<T> {
        CostHandle {
            idx,
            arena: Rc::downgrade(&self.inner),
        }
    }

    fn partial(&self, idx: u32, coordinate: usize) -> PartialCost<T> {
        PartialCost {
            idx,
            coordinate,
            arena: Rc::downgrade(&self.inner),
        }
    }

    fn debug_check_owned(&self, a: &impl CostSlot) {
        debug_assert!(
            (a.slot_index() as usize) < self.inner.borrow().slots.len(),
            "cost handle does not belong to this arena"
        );
    }

    /// Returns a handle whose slot equals the monoid identity vector.
    pub fn identity(&self) -> CostHandle<T> {
        let value = self.inner.borrow().props.identity();
        let idx = self.alloc(value);
        self.handle(idx)
    }

    /// Returns `a ⊕ b` (every coordinate combined).
    pub fn op(&self, a: &CostHandle<T>, b: &CostHandle<T>) -> CostHandle<T> {
        self.debug_check_owned(a);
        self.debug_check_owned(b);
        let value = {
            let inner = self.inner.borrow();
            inner.props.op(&inner.slots[a.idx as usize], &inner.slots[b.idx as usize])
        };
        let idx = self.alloc(value);
        self.handle(idx)
    }

    /// Returns a single-coordinate identity value: every coordinate is
    /// identity, tagged as coordinate `i`. Used to seed a Dijkstra pass's
    /// tentative-distance heap at the source.
    pub fn identity_at(&self, i: usize) -> PartialCost<T> {
        let value = self.inner.borrow().props.identity();
        let idx = self.alloc(value);
        self.partial(idx, i)
    }

    /// Returns a coordinate-`i`-only combine of `a` and `b`; every other
    /// coordinate of the result is identity.
    pub fn op_at(&self, a: &impl CostSlot, b: &impl CostSlot, i: usize) -> PartialCost<T> {
        self.debug_check_owned(a);
        self.debug_check_owned(b);
        let value = {
            let inner = self.inner.borrow();
            inner
                .props
                .op_at(&inner.slots[a.slot_index() as usize], &inner.slots[b.slot_index() as usize], i)
        };
        let idx = self.alloc(value);
        self.partial(idx, i)
    }

    /// Writes `a[i] ⊕ b[i]` into the existing slot `dst`, coordinate `i`
    /// only. Clones only the two scalar operands (so `dst` may alias `a` or
    /// `b`'s slot); never clones or allocates a whole cost vector.
    pub fn op_at_into(&self, a: &impl CostSlot, b: &impl CostSlot, dst: &impl CostSlot, i: usize) {
        self.debug_check_owned(a);
        self.debug_check_owned(b);
        self.debug_check_owned(dst);
        let mut inner = self.inner.borrow_mut();
        let a_val = inner.slots[a.slot_index() as usize][i].clone();
        let b_val = inner.slots[b.slot_index() as usize][i].clone();
        let combined = inner.props.combine_at(&a_val, &b_val, i);
        inner.slots[dst.slot_index() as usize][i] = combined;
    }

    /// Overwrites coordinate `i` of `dst` with a freshly computed value,
    /// leaving every other coordinate untouched. Used when a [`crate::graph`]
    /// edge cost is first computed, rather than combined from two existing
    /// handles.
    pub fn set_at(&self, dst: &impl CostSlot, i: usize, value: T) {
        self.debug_check_owned(dst);
        self.inner.borrow_mut().slots[dst.slot_index() as usize][i] = value;
    }

    /// Deep-copies the slot referenced by `a`.
    pub fn copy(&self, a: &CostHandle<T>) -> CostHandle<T> {
        self.debug_check_owned(a);
        let value = self.inner.borrow().slots[a.idx as usize].clone();
        let idx = self.alloc(value);
        self.handle(idx)
    }

    /// Lexicographic comparison of two whole cost vectors.
    pub fn compare(&self, a: &CostHandle<T>, b: &CostHandle<T>) -> Ordering {
        self.debug_check_owned(a);
        self.debug_check_owned(b);
        let inner = self.inner.borrow();
        inner.props.compare(&inner.slots[a.idx as usize], &inner.slots[b.idx as usize])
    }

    /// Comparison restricted to coordinate `i`; valid on whole or partial
    /// handles.
    pub fn compare_at(&self, a: &impl CostSlot, b: &impl CostSlot, i: usize) -> Ordering {
        self.debug_check_owned(a);
        self.debug_check_owned(b);
        let inner = self.inner.borrow();
        inner
            .props
            .compare_at(&inner.slots[a.slot_index() as usize], &inner.slots[b.slot_index() as usize], i)
    }

    /// Whether `a` equals the identity vector under every coordinate.
    pub fn is_identity(&self, a: &CostHandle<T>) -> bool {
        self.debug_check_owned(a);
        let inner = self.inner.borrow();
        inner.props.is_identity(&inner.slots[a.idx as usize])
    }

    /// Whether coordinate `i` of `a` equals identity coordinate `i`; valid
    /// on whole or partial handles.
    pub fn is_identity_at(&self, a: &impl CostSlot, i: usize) -> bool {
        self.debug_check_owned(a);
        let inner = self.inner.borrow();
        inner.props.is_identity_at(&inner.slots[a.slot_index() as usize], i)
    }

    /// Number of monoid coordinates `k`.
    pub fn num_monoids(&self) -> usize {
        self.inner.borrow().props.arity()
    }

    /// Total backing-vector length (live handles plus free-listed slots).
    pub fn allocated_size(&self) -> usize {
        self.inner.borrow().slots.len()
    }

    /// Number of slots currently referenced by a live handle.
    pub fn live_handles(&self) -> usize {
        let inner = self.inner.borrow();
        inner.slots.len() - inner.free_list.len()
    }
}
