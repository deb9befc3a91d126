use lyon_path::iterator::PathIterator;
use lyon_path::PathEvent;

use super::flatten::{to_lyon_path, Segment};
use crate::Point;

/// Maximum distance between a curve and the polyline used to measure it.
const TOLERANCE: f32 = 0.01;

/// Arc-length measurement over the contours of a flattened path.
///
/// Contours of zero length (a lone moveto, or the empty contour left
/// behind after a close) are skipped, so contour indices only count
/// contours that can actually be walked along.
#[derive(Debug, Clone)]
pub struct PathMeasure {
    contours: Vec<Contour>,
}

#[derive(Debug, Clone)]
struct Contour {
    points: Vec<Point>,
    // Distance from the contour start to each point.
    distances: Vec<f32>,
}

impl Contour {
    fn starting_at(at: Point) -> Self {
        Contour {
            points: vec![at],
            distances: vec![0.0],
        }
    }

    fn push(&mut self, to: Point) {
        let last = self.points[self.points.len() - 1];
        let distance = self.length() + (to - last).length();
        self.points.push(to);
        self.distances.push(distance);
    }

    fn length(&self) -> f32 {
        self.distances[self.distances.len() - 1]
    }

    fn position(&self, distance: f32) -> Point {
        let distance = distance.max(0.0).min(self.length());
        let index = self.distances.partition_point(|d| *d < distance);
        if index == 0 {
            return self.points[0];
        }
        let (d0, d1) = (self.distances[index - 1], self.distances[index]);
        let t = if d1 > d0 { (distance - d0) / (d1 - d0) } else { 0.0 };
        self.points[index - 1].lerp(self.points[index], t)
    }
}

impl PathMeasure {
    pub fn new(segments: &[Segment]) -> Self {
        let path = to_lyon_path(segments);
        let mut contours = vec![];
        let mut current: Option<Contour> = None;
        for event in path.iter().flattened(TOLERANCE) {
            match event {
                PathEvent::Begin { at } => current = Some(Contour::starting_at(at)),
                PathEvent::Line { to, .. } => {
                    if let Some(contour) = current.as_mut() {
                        contour.push(to);
                    }
                }
                PathEvent::End { first, close, .. } => {
                    if let Some(mut contour) = current.take() {
                        if close {
                            contour.push(first);
                        }
                        if contour.length() > 0.0 {
                            contours.push(contour);
                        }
                    }
                }
                // Flattening never yields curves.
                PathEvent::Quadratic { .. } | PathEvent::Cubic { .. } => {}
            }
        }
        PathMeasure { contours }
    }

    pub fn contour_count(&self) -> usize {
        self.contours.len()
    }

    pub fn contour_lengths(&self) -> impl Iterator<Item = f32> + '_ {
        self.contours.iter().map(Contour::length)
    }

    pub fn length(&self) -> f32 {
        self.contour_lengths().sum()
    }

    /// Position at `distance` along contour `contour`, with the distance
    /// clamped to the contour's extent.
    pub fn position(&self, contour: usize, distance: f32) -> Option<Point> {
        self.contours.get(contour).map(|c| c.position(distance))
    }
}
