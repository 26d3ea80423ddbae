//! Statistics over a batch of generated training examples.
//!
//! Operates on scaled ground-truth targets, i.e. the regression labels the
//! generator hands to a trainer.

mod report;

pub use report::{AugmentationStats, FieldSummary, RotationBucket, RotationDistribution};

use crate::bbox::{BoundingBox, ROTATION_RANGE_DEGREES};

/// Lower edges (exclusive, in degrees) of the rotation-target buckets.
pub const ROTATION_BUCKET_EDGES: [f64; 5] = [40.0, 11.0, 3.0, 1.1, 0.4];

/// Options for batch statistics.
#[derive(Clone, Debug)]
pub struct StatsOptions {
    /// Width of histogram bars (in characters).
    pub bar_width: usize,
}

impl Default for StatsOptions {
    fn default() -> Self {
        Self { bar_width: 20 }
    }
}

/// Compute statistics for a batch of scaled targets.
pub fn stats_targets<'a, T>(targets: T, opts: &StatsOptions) -> AugmentationStats
where
    T: IntoIterator<Item = &'a BoundingBox>,
{
    let mut examples = 0usize;
    let mut non_finite = 0usize;
    let mut fields: [Accumulator; 5] = Default::default();
    let mut rotation = RotationDistribution::empty();

    for target in targets {
        examples += 1;
        if !target.is_finite() {
            non_finite += 1;
            continue;
        }

        let values = [
            target.x1,
            target.y1,
            target.x2,
            target.y2,
            target.rot_speed,
        ];
        for (acc, value) in fields.iter_mut().zip(values) {
            acc.push(value);
        }

        rotation.record(rotation_degrees(target));
    }

    let [x1, y1, x2, y2, rot_speed] = fields.map(Accumulator::finish);

    AugmentationStats {
        examples,
        non_finite,
        x1,
        y1,
        x2,
        y2,
        rot_speed,
        rotation,
        bar_width: opts.bar_width,
    }
}

/// Rotation target of a scaled box, converted back to degrees.
pub fn rotation_degrees(target: &BoundingBox) -> f64 {
    target.rot_speed * ROTATION_RANGE_DEGREES / target.scale_factor()
}

#[derive(Clone, Copy, Debug, Default)]
struct Accumulator {
    count: usize,
    sum: f64,
    min: Option<f64>,
    max: Option<f64>,
}

impl Accumulator {
    fn push(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.min = Some(self.min.map_or(value, |m| m.min(value)));
        self.max = Some(self.max.map_or(value, |m| m.max(value)));
    }

    fn finish(self) -> FieldSummary {
        FieldSummary {
            mean: (self.count > 0).then(|| self.sum / self.count as f64),
            min: self.min,
            max: self.max,
        }
    }
}
