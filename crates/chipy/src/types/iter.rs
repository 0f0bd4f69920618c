use crate::error::{ValueError, ValueResult};

/// Lazy iterator over `start..end` in increments of `step`.
///
/// This is a generator: values are produced on demand by
/// [`Arena::iter_next`](crate::Arena::iter_next) rather than stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeIter {
    start: i32,
    end: i32,
    step: i32,
    pos: i32,
}

impl RangeIter {
    pub(crate) fn new(start: i32, end: i32, step: i32) -> ValueResult<Self> {
        if step <= 0 {
            return Err(ValueError::InvalidRange { step });
        }
        Ok(Self {
            start,
            end,
            step,
            pos: start,
        })
    }

    #[must_use]
    pub fn start(&self) -> i32 {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> i32 {
        self.end
    }

    #[must_use]
    pub fn step(&self) -> i32 {
        self.step
    }

    /// The next value that `advance` would yield.
    #[must_use]
    pub fn position(&self) -> i32 {
        self.pos
    }

    /// Yields the current position and moves past it, or `None` once exhausted.
    pub fn advance(&mut self) -> Option<i32> {
        if self.pos >= self.end {
            return None;
        }
        let current = self.pos;
        self.pos = self.pos.saturating_add(self.step);
        Some(current)
    }

    /// Rewinds to `start`. Copies of a range iterator begin from the start.
    pub(crate) fn restart(&mut self) {
        self.pos = self.start;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_stops_at_end() {
        let mut range = RangeIter::new(0, 7, 3).unwrap();
        assert_eq!(range.advance(), Some(0));
        assert_eq!(range.advance(), Some(3));
        assert_eq!(range.advance(), Some(6));
        assert_eq!(range.advance(), None);
        assert_eq!(range.advance(), None);
    }

    #[test]
    fn advance_does_not_overflow_near_max() {
        let mut range = RangeIter::new(i32::MAX - 1, i32::MAX, 5).unwrap();
        assert_eq!(range.advance(), Some(i32::MAX - 1));
        assert_eq!(range.advance(), None);
    }

    #[test]
    fn non_positive_step_is_rejected() {
        assert_eq!(RangeIter::new(0, 3, 0), Err(ValueError::InvalidRange { step: 0 }));
        assert_eq!(RangeIter::new(3, 0, -1), Err(ValueError::InvalidRange { step: -1 }));
    }
}
