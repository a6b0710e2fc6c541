//! Bounded trail of recent positions.

use std::collections::VecDeque;

use glam::DVec2;

/// The two independent bounds a [`PathBuffer`] enforces.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathLimits {
    /// Most points the buffer may hold.
    pub max_points: usize,
    /// Longest polyline the buffer may hold, in model lengths.
    pub max_distance: f64,
}

/// Recent positions of a body, oldest first.
///
/// Keeps a running total of the polyline length so that eviction does not
/// have to walk the whole buffer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathBuffer {
    points: VecDeque<DVec2>,
    length: f64,
}

impl PathBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `point`, then evicts from the front until both limits hold.
    ///
    /// A point equal to the newest one is ignored, so a body at rest does
    /// not grow its trail. Returns whether the point was appended.
    pub fn push(&mut self, point: DVec2, limits: &PathLimits) -> bool {
        let Some(&last) = self.points.back() else {
            self.points.push_back(point);
            return true;
        };

        if last == point {
            return false;
        }

        self.points.push_back(point);
        self.length += last.distance(point);

        while self.points.len() > limits.max_points || self.length > limits.max_distance {
            // Indices shift after every eviction, so look at the front again.
            match (self.points.front().copied(), self.points.get(1).copied()) {
                (Some(oldest), Some(next)) => {
                    self.length -= oldest.distance(next);
                    self.points.pop_front();
                }
                (Some(_), None) => {
                    self.points.pop_front();
                }
                (None, _) => break,
            }

            if self.points.len() <= 1 {
                // No segments left; drop accumulated rounding error.
                self.length = 0.0;
            }
        }

        log::trace!(
            "path holds {} points over {:.3} model lengths",
            self.points.len(),
            self.length
        );
        true
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.length = 0.0;
    }

    /// Cumulative length of the polyline through the buffered points.
    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> impl ExactSizeIterator<Item = DVec2> + '_ {
        self.points.iter().copied()
    }

    pub fn last(&self) -> Option<DVec2> {
        self.points.back().copied()
    }
}
