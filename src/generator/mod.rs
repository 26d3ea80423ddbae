//! Training-example generation for a pair of consecutive frames.
//!
//! An [`ExampleGenerator`] is reset with a previous/current frame pair and
//! their ground-truth boxes. From then on it produces examples made of:
//!
//! - the context-padded crop of the previous frame around the previous box
//!   (the *target*, fixed for the pair),
//! - a crop of the current frame around a box sampled with
//!   [`BoundingBox::shift`] (the *search region*),
//! - the current ground-truth box expressed in the search region's frame
//!   and scaled to `[0, scale_factor)`.
//!
//! Generation reads the stored pair and never mutates it, so any number of
//! examples can be drawn between resets.

use serde::Serialize;
use tracing::debug;

use crate::bbox::{BBParams, BoundingBox, ShiftMode};
use crate::error::TrackaugError;
use crate::image::{Crop, CropPad, CropWindow};
use crate::sampling::Sampler;

/// One training (or evaluation) example.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrainingExample<I> {
    /// Crop of the current frame the tracker searches in.
    pub search_region: I,
    /// Crop of the previous frame around the previous box.
    pub target: I,
    /// Current ground truth in the search region's frame, scaled.
    pub bbox_gt_scaled: BoundingBox,
    /// Where the search region was cut from the current frame.
    pub window: CropWindow,
}

#[derive(Clone, Debug)]
struct FramePair<I> {
    target_pad: I,
    curr_image: I,
    prev_box: BoundingBox,
    curr_box: BoundingBox,
}

/// Produces training examples for one frame pair at a time.
#[derive(Debug)]
pub struct ExampleGenerator<C: CropPad> {
    cropper: C,
    params: BBParams,
    mode: ShiftMode,
    state: Option<FramePair<C::Image>>,
}

impl<C: CropPad> ExampleGenerator<C> {
    /// Creates a generator with fixed sampling parameters.
    ///
    /// # Errors
    /// Returns [`TrackaugError::InvalidParams`] if `params` fail validation.
    pub fn new(cropper: C, params: BBParams) -> Result<Self, TrackaugError> {
        params.validate()?;
        Ok(Self {
            cropper,
            params,
            mode: ShiftMode::default(),
            state: None,
        })
    }

    /// Selects the distribution used to perturb crop boxes.
    pub fn with_mode(mut self, mode: ShiftMode) -> Self {
        self.mode = mode;
        self
    }

    /// The sampling parameters the generator was created with.
    pub fn default_params(&self) -> &BBParams {
        &self.params
    }

    pub fn mode(&self) -> ShiftMode {
        self.mode
    }

    /// Returns true once [`reset`](Self::reset) has been called.
    pub fn is_ready(&self) -> bool {
        self.state.is_some()
    }

    /// Replaces the frame pair.
    ///
    /// The previous frame is cropped around `prev_box` once, here; every
    /// example drawn afterwards shares that target crop.
    pub fn reset(
        &mut self,
        prev_box: &BoundingBox,
        curr_box: &BoundingBox,
        prev_image: &C::Image,
        curr_image: &C::Image,
    ) {
        let Crop {
            image: target_pad,
            window,
        } = self.cropper.crop_pad(prev_box, prev_image);

        debug!(
            prev_box = %prev_box,
            curr_box = %curr_box,
            target_width = window.output_width,
            target_height = window.output_height,
            "generator reset"
        );

        self.state = Some(FramePair {
            target_pad,
            curr_image: curr_image.clone(),
            prev_box: *prev_box,
            curr_box: *curr_box,
        });
    }

    /// Draws one training example with the generator's own parameters.
    ///
    /// # Errors
    /// Returns [`TrackaugError::GeneratorNotReady`] before the first reset.
    pub fn make_training_example<S>(
        &self,
        sampler: &mut S,
    ) -> Result<TrainingExample<C::Image>, TrackaugError>
    where
        S: Sampler + ?Sized,
    {
        self.make_training_example_with(&self.params, sampler)
    }

    /// Draws one training example with explicit sampling parameters.
    ///
    /// `params` are used as given; validate them first if they come from
    /// outside.
    ///
    /// # Errors
    /// Returns [`TrackaugError::GeneratorNotReady`] before the first reset.
    pub fn make_training_example_with<S>(
        &self,
        params: &BBParams,
        sampler: &mut S,
    ) -> Result<TrainingExample<C::Image>, TrackaugError>
    where
        S: Sampler + ?Sized,
    {
        let state = self.state()?;
        let crop_box = state
            .curr_box
            .shift(&state.curr_image, params, self.mode, sampler);
        Ok(self.example_around(state, &crop_box))
    }

    /// Draws `count` independent training examples.
    ///
    /// # Errors
    /// Returns [`TrackaugError::GeneratorNotReady`] before the first reset.
    pub fn make_training_examples<S>(
        &self,
        count: usize,
        sampler: &mut S,
    ) -> Result<Vec<TrainingExample<C::Image>>, TrackaugError>
    where
        S: Sampler + ?Sized,
    {
        let examples = (0..count)
            .map(|_| self.make_training_example(sampler))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(count, mode = ?self.mode, "generated training examples");
        Ok(examples)
    }

    /// Builds the example a tracker would see at inference time: the search
    /// region is cut around the previous box instead of a sampled one.
    ///
    /// # Errors
    /// Returns [`TrackaugError::GeneratorNotReady`] before the first reset.
    pub fn make_true_example(&self) -> Result<TrainingExample<C::Image>, TrackaugError> {
        let state = self.state()?;
        Ok(self.example_around(state, &state.prev_box))
    }

    fn state(&self) -> Result<&FramePair<C::Image>, TrackaugError> {
        self.state.as_ref().ok_or(TrackaugError::GeneratorNotReady)
    }

    fn example_around(
        &self,
        state: &FramePair<C::Image>,
        crop_box: &BoundingBox,
    ) -> TrainingExample<C::Image> {
        let Crop {
            image: search_region,
            window,
        } = self.cropper.crop_pad(crop_box, &state.curr_image);

        let bbox_gt_scaled = state
            .curr_box
            .recenter(
                &window.location,
                window.edge_spacing_x,
                window.edge_spacing_y,
            )
            .scale(&search_region);

        TrainingExample {
            search_region,
            target: state.target_pad.clone(),
            bbox_gt_scaled,
            window,
        }
    }
}
