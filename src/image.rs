//! Image-side collaborators of the augmentation pipeline.
//!
//! The pipeline never touches pixels. It only needs to know how large an
//! image is ([`ImageSize`]) and to ask a [`CropPad`] implementation for a
//! context-padded crop around a box. [`GeometryCropper`] is a crop/pad
//! implementation over [`Frame`], a dimension-only image, which is enough
//! to drive the full pipeline when the pixel work happens elsewhere.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::bbox::BoundingBox;
use crate::error::TrackaugError;

/// Width and height queries on an image.
pub trait ImageSize {
    /// Image width in pixels (number of columns).
    fn width(&self) -> u32;

    /// Image height in pixels (number of rows).
    fn height(&self) -> u32;
}

/// An image known only by its dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
}

impl Frame {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl ImageSize for Frame {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Parses `WIDTHxHEIGHT`, e.g. `640x480`.
impl FromStr for Frame {
    type Err = TrackaugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            TrackaugError::InvalidArgument(format!(
                "frame size '{}' must look like WIDTHxHEIGHT",
                s
            ))
        };
        let (w, h) = s.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
        let width = w.trim().parse::<u32>().map_err(|_| invalid())?;
        let height = h.trim().parse::<u32>().map_err(|_| invalid())?;
        Ok(Frame::new(width, height))
    }
}

/// Where a context-padded crop landed on its source image.
///
/// `location` is the on-image region that was copied (clamped to the image
/// borders). It carries the rotation of the box the crop was taken around.
/// `edge_spacing_x`/`edge_spacing_y` give the offset of that region inside
/// the padded output when the window hung off the left or top edge.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CropWindow {
    pub location: BoundingBox,
    pub edge_spacing_x: f64,
    pub edge_spacing_y: f64,
    pub output_width: u32,
    pub output_height: u32,
}

/// The result of a crop/pad call.
#[derive(Clone, Debug, PartialEq)]
pub struct Crop<I> {
    pub image: I,
    pub window: CropWindow,
}

/// The crop/pad primitive.
///
/// Given an image and a box, produces the context-padded crop around the box
/// together with the crop geometry needed to map boxes into its frame.
pub trait CropPad {
    type Image: ImageSize + Clone;

    fn crop_pad(&self, bbox: &BoundingBox, image: &Self::Image) -> Crop<Self::Image>;
}

/// Crop/pad over [`Frame`]s: computes the crop geometry and returns a frame
/// of the padded output size.
#[derive(Clone, Copy, Debug, Default)]
pub struct GeometryCropper;

impl CropPad for GeometryCropper {
    type Image = Frame;

    fn crop_pad(&self, bbox: &BoundingBox, image: &Frame) -> Crop<Frame> {
        let window = bbox.crop_window(image);
        Crop {
            image: Frame::new(window.output_width, window.output_height),
            window,
        }
    }
}
