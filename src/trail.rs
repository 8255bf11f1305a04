// trail.rs

use std::collections::VecDeque;

use crate::render::ScreenPoint;

/// Recent screen positions of the outer mass, oldest first.
///
/// Holds at most `capacity` points. Pushing onto a full trail drops the
/// oldest point.
#[derive(Debug, Clone, PartialEq)]
pub struct TrailBuffer {
    points: VecDeque<ScreenPoint>,
    capacity: usize,
}

impl TrailBuffer {
    pub fn new(capacity: usize) -> TrailBuffer {
        TrailBuffer { points: VecDeque::with_capacity(capacity), capacity }
    }

    pub fn push(&mut self, point: ScreenPoint) {
        self.points.push_back(point);
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn newest(&self) -> Option<ScreenPoint> {
        self.points.back().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = ScreenPoint> + '_ {
        self.points.iter().copied()
    }

    // consecutive pairs, oldest segment first
    pub fn segments(&self) -> impl Iterator<Item = (ScreenPoint, ScreenPoint)> + '_ {
        self.points.iter().copied().zip(self.points.iter().copied().skip(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i32) -> ScreenPoint {
        ScreenPoint::new(x, -x)
    }

    #[test]
    fn never_exceeds_capacity() {
        let mut trail = TrailBuffer::new(8);
        for i in 0..100 {
            trail.push(p(i));
            assert!(trail.len() <= 8);
        }
        assert_eq!(trail.len(), 8);
    }

    #[test]
    fn evicts_oldest_first() {
        let mut trail = TrailBuffer::new(3);
        for i in 0..5 {
            trail.push(p(i));
        }
        assert_eq!(trail.iter().collect::<Vec<_>>(), vec![p(2), p(3), p(4)]);
        assert_eq!(trail.newest(), Some(p(4)));
    }

    #[test]
    fn segments_join_neighbours() {
        let mut trail = TrailBuffer::new(10);
        for i in 0..4 {
            trail.push(p(i));
        }
        let segs: Vec<_> = trail.segments().collect();
        assert_eq!(segs, vec![(p(0), p(1)), (p(1), p(2)), (p(2), p(3))]);
    }

    #[test]
    fn single_point_has_no_segments() {
        let mut trail = TrailBuffer::new(10);
        trail.push(p(1));
        assert_eq!(trail.segments().count(), 0);
    }

    #[test]
    fn clear_empties_but_keeps_capacity() {
        let mut trail = TrailBuffer::new(4);
        trail.push(p(1));
        trail.push(p(2));
        trail.clear();
        assert!(trail.is_empty());
        assert_eq!(trail.capacity(), 4);
    }

    #[test]
    fn zero_capacity_keeps_nothing() {
        let mut trail = TrailBuffer::new(0);
        trail.push(p(1));
        assert!(trail.is_empty());
    }
}
