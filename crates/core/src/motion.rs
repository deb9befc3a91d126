use crate::keyframe::Keyframes;
use crate::path::{PathMeasure, Segment};
use crate::{Error, PathData, Point};

const MAX_NUM_POINTS: usize = 100;

/// Largest gap between two samples, in path units, before the sample
/// count cap kicks in.
const ACCEPTABLE_ERROR: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Distance travelled along the whole path, as a fraction of its
    /// length.
    pub fraction: f32,
    pub position: Point,
}

/// Positions along a path, parameterized by travelled length. Used to
/// animate a point along a path.
#[derive(Debug, Clone)]
pub struct PathKeyframeSet {
    samples: Vec<Sample>,
    current: Point,
}

impl PathKeyframeSet {
    pub fn new(path: &PathData) -> Result<Self, Error> {
        Self::from_segments(&path.flatten())
    }

    pub fn from_segments(segments: &[Segment]) -> Result<Self, Error> {
        let samples = approximate(&PathMeasure::new(segments))?;
        Ok(PathKeyframeSet {
            current: samples[0].position,
            samples,
        })
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Position at `fraction` of the way along the path. Fractions outside
    /// [0, 1] extend the first or last sampled chord. A NaN fraction
    /// leaves the position where it was.
    pub fn position(&mut self, fraction: f32) -> Point {
        let count = self.samples.len();
        self.current = if fraction.is_nan() {
            self.current
        } else if fraction < 0.0 {
            self.interpolate_in_range(fraction, 0, 1)
        } else if fraction > 1.0 {
            self.interpolate_in_range(fraction, count - 2, count - 1)
        } else if fraction == 0.0 {
            self.samples[0].position
        } else if fraction == 1.0 {
            self.samples[count - 1].position
        } else {
            match self
                .samples
                .binary_search_by(|s| s.fraction.total_cmp(&fraction))
            {
                Ok(index) => self.samples[index].position,
                // The first sample sits at 0, so the insertion point is never 0.
                Err(index) => self.interpolate_in_range(fraction, index - 1, index),
            }
        };
        self.current
    }

    fn interpolate_in_range(&self, fraction: f32, start: usize, end: usize) -> Point {
        let (from, to) = (&self.samples[start], &self.samples[end]);
        let t = (fraction - from.fraction) / (to.fraction - from.fraction);
        Point::new(
            from.position.x + (to.position.x - from.position.x) * t,
            from.position.y + (to.position.y - from.position.y) * t,
        )
    }
}

impl Keyframes<Point> for PathKeyframeSet {
    fn value_at(&mut self, fraction: f32) -> Result<&Point, Error> {
        self.position(fraction);
        Ok(&self.current)
    }

    fn fill_missing_values(&mut self, _value: &Point) {}

    fn missing_value(&self) -> Option<usize> {
        None
    }
}

/// Walks the path in equal steps of length, moving on to the next contour
/// once the travelled distance passes the end of the current one.
fn approximate(measure: &PathMeasure) -> Result<Vec<Sample>, Error> {
    let mut summed = vec![0.0];
    let mut total = 0.0;
    for length in measure.contour_lengths() {
        total += length;
        summed.push(total);
    }
    if total <= 0.0 {
        return Err(Error::EmptyPath);
    }

    let count = MAX_NUM_POINTS.min((total / ACCEPTABLE_ERROR) as usize + 1).max(2);
    let step = total / (count - 1) as f32;
    let mut samples = Vec::with_capacity(count);
    let mut contour = 0;
    let mut distance = 0.0f32;
    let mut last = Point::origin();
    for _ in 0..count {
        let position = measure
            .position(contour, distance - summed[contour])
            .unwrap_or(last);
        samples.push(Sample {
            fraction: distance / total,
            position,
        });
        last = position;

        distance = (distance + step).min(total);
        while contour + 1 < measure.contour_count() && summed[contour + 1] < distance {
            contour += 1;
        }
    }
    if let Some(sample) = samples.last_mut() {
        sample.fraction = 1.0;
    }
    Ok(samples)
}
