//! Ping-pong storage for time stepping.

use super::Solution;

/// The previous and the current global solution.
///
/// Each step reads `previous` and produces a fresh vector that becomes
/// `current`; [`DoubleBuffer::swap`] then exchanges the two so the new state
/// is read on the next step. The two vectors are separate allocations and
/// are never aliased.
#[derive(Clone, Debug)]
pub struct DoubleBuffer {
    previous: Solution,
    current: Solution,
}

impl DoubleBuffer {
    /// Start from `initial` in both slots.
    pub fn new(initial: Solution) -> Self {
        Self {
            current: initial.clone(),
            previous: initial,
        }
    }

    /// State read by the next step.
    #[inline]
    pub fn previous(&self) -> &Solution {
        &self.previous
    }

    /// Most recently written state (before [`swap`](Self::swap), the result of the last step).
    #[inline]
    pub fn current(&self) -> &Solution {
        &self.current
    }

    /// Store a freshly computed state in the write slot.
    pub fn store(&mut self, next: Solution) {
        debug_assert_eq!(next.len(), self.previous.len());
        self.current = next;
    }

    /// Make the write slot the read slot.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.previous, &mut self.current);
    }

    /// Latest state after a completed store-and-swap.
    pub fn into_latest(self) -> Solution {
        self.previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_then_swap() {
        let initial = Solution::from_data(vec![1.0, 2.0], 1, 2).unwrap();
        let mut buffers = DoubleBuffer::new(initial.clone());

        let next = Solution::from_data(vec![3.0, 4.0], 1, 2).unwrap();
        buffers.store(next.clone());
        assert_eq!(buffers.previous(), &initial);
        assert_eq!(buffers.current(), &next);

        buffers.swap();
        assert_eq!(buffers.previous(), &next);
        assert_eq!(buffers.current(), &initial);
        assert_eq!(buffers.into_latest(), next);
    }
}
