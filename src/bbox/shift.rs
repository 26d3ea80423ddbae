//! Random perturbation of a box into a new crop window.
//!
//! Width, height, x and y are sampled by independent bounded-retry loops.
//! Each loop gives up after [`MAX_NUM_TRIES`] draws and keeps its last
//! clamped candidate, so a call always finishes in constant time.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{BoundingBox, CONTEXT_FACTOR, ROTATION_RANGE_DEGREES};
use crate::error::TrackaugError;
use crate::image::ImageSize;
use crate::sampling::Sampler;
use crate::validation;

/// Number of draws each sampling stage may take.
pub const MAX_NUM_TRIES: usize = 10;

/// Sampling parameters for [`BoundingBox::shift`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BBParams {
    /// Rate of the two-sided exponential for center translation.
    pub lambda_shift: f64,
    /// Rate of the two-sided exponential for width/height change.
    pub lambda_scale: f64,
    /// Lower bound on the relative size change.
    pub min_scale: f64,
    /// Upper bound on the relative size change.
    pub max_scale: f64,
    /// Rate of the two-sided exponential for rotation.
    pub lambda_rotation: f64,
}

impl Default for BBParams {
    fn default() -> Self {
        Self {
            lambda_shift: 5.0,
            lambda_scale: 15.0,
            min_scale: -0.4,
            max_scale: 0.4,
            lambda_rotation: 24.0,
        }
    }
}

impl BBParams {
    /// Checks that the parameters describe usable distributions.
    ///
    /// # Errors
    /// Returns [`TrackaugError::InvalidParams`] naming the first problem found.
    pub fn validate(&self) -> Result<(), TrackaugError> {
        let mut report = validation::ValidationReport::new();
        validation::validate_params(self, &mut report);

        match report
            .issues
            .iter()
            .find(|issue| issue.severity == validation::Severity::Error)
        {
            Some(issue) => Err(TrackaugError::InvalidParams {
                message: issue.message.clone(),
            }),
            None => Ok(()),
        }
    }
}

/// Which distribution drives the perturbation.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ShiftMode {
    /// Two-sided exponential centered at no change: small motions dominate.
    #[default]
    MotionModel,
    /// Uniform over the allowed range.
    Uniform,
}

/// Half-extents of the axis-aligned hull of a `width` x `height` rectangle
/// rotated by `rotation_degrees` about its center.
pub fn rotation_padding(width: f64, height: f64, rotation_degrees: f64) -> (f64, f64) {
    let (sin, cos) = rotation_degrees.to_radians().sin_cos();
    let half_w = width / 2.0;
    let half_h = height / 2.0;
    let padding_x = (half_w * cos).abs() + (half_h * sin).abs();
    let padding_y = (half_w * sin).abs() + (half_h * cos).abs();
    (padding_x, padding_y)
}

/// Draws until `accept` holds or the retry budget runs out, returning the
/// last candidate either way.
fn sample_bounded<S, D, A>(sampler: &mut S, stage: &'static str, mut draw: D, accept: A) -> f64
where
    S: Sampler + ?Sized,
    D: FnMut(&mut S) -> f64,
    A: Fn(f64) -> bool,
{
    let mut candidate = draw(sampler);
    let mut tries = 1;
    while !accept(candidate) && tries < MAX_NUM_TRIES {
        candidate = draw(sampler);
        tries += 1;
    }

    if !accept(candidate) {
        trace!(stage, candidate, "retry budget exhausted, keeping last candidate");
    }
    candidate
}

fn sample_scale_factor<S: Sampler + ?Sized>(
    sampler: &mut S,
    params: &BBParams,
    mode: ShiftMode,
) -> f64 {
    match mode {
        ShiftMode::MotionModel => sampler
            .sample_exp_two_sided(params.lambda_scale)
            .min(params.max_scale)
            .max(params.min_scale),
        ShiftMode::Uniform => {
            sampler.sample_uniform() * (params.max_scale - params.min_scale) + params.min_scale
        }
    }
}

fn sample_extent<S: Sampler + ?Sized>(
    sampler: &mut S,
    stage: &'static str,
    extent: f64,
    image_extent: f64,
    params: &BBParams,
    mode: ShiftMode,
) -> f64 {
    sample_bounded(
        sampler,
        stage,
        |s| {
            let new_extent = extent * (1.0 + sample_scale_factor(s, params, mode));
            new_extent.min(image_extent - 1.0).max(1.0)
        },
        |v| (0.0..=image_extent - 1.0).contains(&v),
    )
}

/// Samples a center along one axis.
///
/// `center`/`extent` describe the original box, `new_extent` the sampled
/// window, and `padding` the rotated half-extent that must stay on-image.
#[allow(clippy::too_many_arguments)]
fn sample_center<S: Sampler + ?Sized>(
    sampler: &mut S,
    stage: &'static str,
    center: f64,
    extent: f64,
    new_extent: f64,
    padding: f64,
    image_extent: f64,
    lambda_shift: f64,
    mode: ShiftMode,
) -> f64 {
    let reach = extent * CONTEXT_FACTOR / 2.0;
    sample_bounded(
        sampler,
        stage,
        |s| {
            let raw = match mode {
                ShiftMode::MotionModel => center + extent * s.sample_exp_two_sided(lambda_shift),
                ShiftMode::Uniform => center + s.sample_uniform() * (2.0 * new_extent) - new_extent,
            };
            raw.max(padding).min(image_extent - padding)
        },
        |c| {
            // The new center must stay in the old padded window, and the new
            // window must stay on the image.
            c >= center - reach
                && c <= center + reach
                && c - new_extent / 2.0 >= 0.0
                && c + new_extent / 2.0 <= image_extent
        },
    )
}

fn sample_rotation<S: Sampler + ?Sized>(sampler: &mut S, lambda_rotation: f64) -> f64 {
    let magnitude = sampler.sample_exp_two_sided(lambda_rotation).clamp(-1.0, 1.0);
    let rotation = ROTATION_RANGE_DEGREES * magnitude;
    // Bias toward small rotations.
    if sampler.sample_uniform() < 0.5 {
        rotation / 2.0
    } else {
        rotation
    }
}

impl BoundingBox {
    /// Samples a perturbed crop window around this box.
    ///
    /// The result has a randomly rescaled size, a randomly translated center
    /// that keeps the old center inside the new context window, and a
    /// sampled rotation stored in `rot_speed`. The window is placed so that
    /// even the rotated rectangle would stay within `image`, as far as the
    /// retry budget allows.
    pub fn shift<I, S>(
        &self,
        image: &I,
        params: &BBParams,
        mode: ShiftMode,
        sampler: &mut S,
    ) -> BoundingBox
    where
        I: ImageSize + ?Sized,
        S: Sampler + ?Sized,
    {
        let image_width = f64::from(image.width());
        let image_height = f64::from(image.height());
        let width = self.width();
        let height = self.height();

        let new_width = sample_extent(sampler, "width", width, image_width, params, mode);
        let new_height = sample_extent(sampler, "height", height, image_height, params, mode);

        let rotation = sample_rotation(sampler, params.lambda_rotation);
        let (padding_x, padding_y) = rotation_padding(new_width, new_height, rotation);

        let new_center_x = sample_center(
            sampler,
            "center_x",
            self.center_x(),
            width,
            new_width,
            padding_x,
            image_width,
            params.lambda_shift,
            mode,
        );
        let new_center_y = sample_center(
            sampler,
            "center_y",
            self.center_y(),
            height,
            new_height,
            padding_y,
            image_height,
            params.lambda_shift,
            mode,
        );

        BoundingBox {
            x1: new_center_x - new_width / 2.0,
            y1: new_center_y - new_height / 2.0,
            x2: new_center_x + new_width / 2.0,
            y2: new_center_y + new_height / 2.0,
            rot_speed: rotation,
            scale_factor: self.scale_factor,
        }
    }
}
