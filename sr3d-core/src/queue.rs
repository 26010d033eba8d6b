//! Bounded FIFO of triangles for one clip cascade
use std::collections::VecDeque;

use log::warn;

use crate::error::{Error, Result};
use crate::geometry::Triangle;

/// Largest number of fragments one triangle can become across the four
/// screen-edge planes.
pub const MAX_CLIP_FANOUT: usize = 16;

/// Fixed-capacity queue scoped to a single source triangle.
///
/// Pushing past capacity drops the triangle and counts it rather than
/// growing; call [`TriangleQueue::reset`] before each new cascade.
#[derive(Debug, Clone)]
pub struct TriangleQueue {
    items: VecDeque<Triangle>,
    capacity: usize,
    dropped: usize,
}

impl TriangleQueue {
    pub fn new() -> Self {
        Self::with_capacity(MAX_CLIP_FANOUT)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
            dropped: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Triangles rejected because the queue was full since the last reset
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn push_back(&mut self, triangle: Triangle) -> Result<()> {
        if self.items.len() >= self.capacity {
            self.dropped += 1;
            warn!(
                "Clip queue full ({} triangles), dropping fragment",
                self.capacity
            );
            return Err(Error::QueueFull {
                capacity: self.capacity,
            });
        }
        self.items.push_back(triangle);
        Ok(())
    }

    pub fn pop_front(&mut self) -> Option<Triangle> {
        self.items.pop_front()
    }

    /// Empty the queue and zero the drop counter
    pub fn reset(&mut self) {
        self.items.clear();
        self.dropped = 0;
    }

    /// Remove and yield every queued triangle in FIFO order
    pub fn drain(&mut self) -> impl Iterator<Item = Triangle> + '_ {
        self.items.drain(..)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triangle> {
        self.items.iter()
    }
}

impl Default for TriangleQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec3;

    fn tri(z: f32) -> Triangle {
        Triangle::new(vec3(0.0, 0.0, z), vec3(1.0, 0.0, z), vec3(0.0, 1.0, z))
    }

    #[test]
    fn test_fifo_order() {
        let mut q = TriangleQueue::new();
        q.push_back(tri(1.0)).unwrap();
        q.push_back(tri(2.0)).unwrap();
        assert_eq!(q.len(), 2);
        assert_eq!(q.pop_front().unwrap().vertex(0).z, 1.0);
        assert_eq!(q.pop_front().unwrap().vertex(0).z, 2.0);
        assert!(q.pop_front().is_none());
        assert!(q.is_empty());
    }

    #[test]
    fn test_full_queue_counts_drops() {
        let mut q = TriangleQueue::with_capacity(2);
        q.push_back(tri(1.0)).unwrap();
        q.push_back(tri(2.0)).unwrap();
        let err = q.push_back(tri(3.0)).unwrap_err();
        assert!(matches!(err, Error::QueueFull { capacity: 2 }));
        assert_eq!(q.len(), 2);
        assert_eq!(q.dropped(), 1);

        // Popping frees a slot again
        q.pop_front();
        assert!(q.push_back(tri(4.0)).is_ok());
        let zs: Vec<f32> = q.iter().map(|t| t.vertex(0).z).collect();
        assert_eq!(zs, vec![2.0, 4.0]);
    }

    #[test]
    fn test_reset() {
        let mut q = TriangleQueue::with_capacity(1);
        q.push_back(tri(1.0)).unwrap();
        let _ = q.push_back(tri(2.0));
        q.reset();
        assert!(q.is_empty());
        assert_eq!(q.dropped(), 0);
        assert_eq!(q.capacity(), 1);
    }

    #[test]
    fn test_drain() {
        let mut q = TriangleQueue::new();
        for z in [1.0, 2.0, 3.0] {
            q.push_back(tri(z)).unwrap();
        }
        let drained: Vec<Triangle> = q.drain().collect();
        assert_eq!(drained.len(), 3);
        assert!(q.is_empty());
    }
}
