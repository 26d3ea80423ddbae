//! Stats report types and terminal formatting.

use serde::Serialize;
use std::fmt;

use super::ROTATION_BUCKET_EDGES;

/// Summary of a batch of scaled training targets.
#[derive(Clone, Debug, Serialize)]
pub struct AugmentationStats {
    /// Number of targets seen.
    pub examples: usize,
    /// Targets with a NaN or infinite field. Excluded from the summaries.
    pub non_finite: usize,
    pub x1: FieldSummary,
    pub y1: FieldSummary,
    pub x2: FieldSummary,
    pub y2: FieldSummary,
    pub rot_speed: FieldSummary,
    /// Distribution of the rotation target, in degrees.
    pub rotation: RotationDistribution,
    /// Display-only option for histogram rendering width.
    #[serde(skip)]
    pub(crate) bar_width: usize,
}

/// Mean and extremes of one field. `None` when nothing was summarized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct FieldSummary {
    pub mean: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// A single rotation bucket.
#[derive(Clone, Debug, Serialize)]
pub struct RotationBucket {
    pub name: String,
    pub count: usize,
}

/// Rotation-target bucket counts, largest magnitude first.
#[derive(Clone, Debug, Default, Serialize)]
pub struct RotationDistribution {
    pub buckets: Vec<RotationBucket>,
}

impl RotationDistribution {
    pub(crate) fn empty() -> Self {
        let mut buckets: Vec<RotationBucket> = ROTATION_BUCKET_EDGES
            .iter()
            .map(|edge| RotationBucket {
                name: format!(">{edge}°"),
                count: 0,
            })
            .collect();
        buckets.push(RotationBucket {
            name: "rest".to_string(),
            count: 0,
        });
        Self { buckets }
    }

    /// Counts one rotation (in degrees) into the first bucket it exceeds.
    pub(crate) fn record(&mut self, degrees: f64) {
        let magnitude = degrees.abs();
        let index = ROTATION_BUCKET_EDGES
            .iter()
            .position(|&edge| magnitude > edge)
            .unwrap_or(ROTATION_BUCKET_EDGES.len());
        if let Some(bucket) = self.buckets.get_mut(index) {
            bucket.count += 1;
        }
    }
}

impl fmt::Display for AugmentationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "┌─ Targets ─────────────────────────────────────────────────┐"
        )?;
        writeln!(
            f,
            "│   Examples:      {:>8}   non-finite: {:>8}           │",
            self.examples, self.non_finite
        )?;
        writeln!(
            f,
            "│   field        mean         min         max             │"
        )?;
        for (name, summary) in [
            ("x1", &self.x1),
            ("y1", &self.y1),
            ("x2", &self.x2),
            ("y2", &self.y2),
            ("rot", &self.rot_speed),
        ] {
            writeln!(
                f,
                "│   {:<6} {:>10} {:>11} {:>11}             │",
                name,
                fmt_opt(summary.mean),
                fmt_opt(summary.min),
                fmt_opt(summary.max)
            )?;
        }
        writeln!(
            f,
            "└───────────────────────────────────────────────────────────┘"
        )?;

        let max_count = self
            .rotation
            .buckets
            .iter()
            .map(|b| b.count)
            .max()
            .unwrap_or(1);

        writeln!(
            f,
            "┌─ Rotation target (|deg|) ────────────────────────────────┐"
        )?;
        for bucket in &self.rotation.buckets {
            writeln!(
                f,
                "│   {:<8} {:>7}  {}│",
                bucket.name,
                bucket.count,
                pad_bar(
                    &render_bar(bucket.count, max_count, self.bar_width),
                    self.bar_width
                )
            )?;
        }
        writeln!(
            f,
            "└───────────────────────────────────────────────────────────┘"
        )
    }
}

fn fmt_opt(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.3}"))
        .unwrap_or_else(|| "n/a".to_string())
}

/// Render a horizontal bar using Unicode block characters.
fn render_bar(count: usize, max_count: usize, width: usize) -> String {
    if max_count == 0 || width == 0 {
        return String::new();
    }

    let filled = (count * width) / max_count;
    let filled = filled.min(width);
    "█".repeat(filled) + &"░".repeat(width - filled)
}

/// Pad a bar string to ensure consistent column alignment.
fn pad_bar(bar: &str, width: usize) -> String {
    let visual_len = bar.chars().count();
    let padding = (width + 2).saturating_sub(visual_len);
    format!("{}{}", bar, " ".repeat(padding))
}
