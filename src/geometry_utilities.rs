use arrayvec::ArrayVec;
use types::*;

pub mod types {
    pub struct ScreenSpace;
    pub struct CanvasSpace;
    pub type ScreenPoint = euclid::Point2D<f32, ScreenSpace>;
    pub type CanvasPoint = euclid::Point2D<f32, CanvasSpace>;
}

/// Maps any (possibly negative) index onto `0..len`.
///
/// The predecessor of index 0 is `len - 1` and the successor of `len - 1` is 0.
#[inline]
pub fn wrap_index(index: isize, len: usize) -> usize {
    debug_assert!(len > 0, "cannot wrap an index into an empty sequence");
    index.rem_euclid(len as isize) as usize
}

/// A read-only view of a closed sequence where every index wraps around.
#[derive(Clone, Copy)]
pub struct CyclicSlice<'a, T> {
    items: &'a [T],
}

impl<'a, T> CyclicSlice<'a, T> {
    pub fn new(items: &'a [T]) -> Self {
        CyclicSlice { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item at `index` modulo the length. Panics if the slice is empty.
    pub fn get(&self, index: isize) -> &'a T {
        &self.items[wrap_index(index, self.items.len())]
    }

    /// Item `offset` steps away from `index`, in either direction.
    pub fn neighbour(&self, index: usize, offset: isize) -> &'a T {
        self.get(index as isize + offset)
    }
}

pub fn midpoint<U>(a: euclid::Point2D<f32, U>, b: euclid::Point2D<f32, U>) -> euclid::Point2D<f32, U> {
    a.lerp(b, 0.5)
}

/// Evaluates a cubic bezier at `t` by repeated linear interpolation.
///
/// Every call starts from a private copy of `control`, so evaluating the same
/// segment at several parameters never sees the intermediate points of an
/// earlier evaluation.
pub fn de_casteljau<U>(control: &[euclid::Point2D<f32, U>; 4], t: f32) -> euclid::Point2D<f32, U> {
    let mut scratch: ArrayVec<euclid::Point2D<f32, U>, 4> = control.iter().copied().collect();
    // 4 -> 3 -> 2 -> 1
    while scratch.len() > 1 {
        for i in 0..scratch.len() - 1 {
            scratch[i] = scratch[i].lerp(scratch[i + 1], t);
        }
        scratch.pop();
    }
    scratch[0]
}
