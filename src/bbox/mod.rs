//! Bounding boxes with a rotation-speed target and the coordinate-frame
//! transforms used to turn a ground-truth box into a regression target.
//!
//! A [`BoundingBox`] lives in one of three frames during augmentation:
//!
//! 1. **Image frame**: raw pixel coordinates on the full frame.
//! 2. **Crop frame**: coordinates relative to a context-padded crop, reached
//!    with [`BoundingBox::recenter`] and left with [`BoundingBox::uncenter`].
//! 3. **Scaled frame**: coordinates normalized to `[0, scale_factor)` by the
//!    size of the image they live in, reached with [`BoundingBox::scale`] and
//!    left with [`BoundingBox::unscale`].
//!
//! Rotation is never applied to the box corners. `rot_speed` is a scalar
//! target that travels alongside the rectangle.

mod region;
mod shift;
mod vector;

pub use region::Region;
pub use shift::{rotation_padding, BBParams, ShiftMode, MAX_NUM_TRIES};
pub use vector::{VectorLayout, BOX_VECTOR_LEN};

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::image::{CropWindow, ImageSize};

/// How much context to pad the crop with, relative to the box size.
pub const CONTEXT_FACTOR: f64 = 2.0;

/// Upper bound of the scaled coordinate range.
pub const SCALE_FACTOR: f64 = 10.0;

/// Degree span that `scale` maps onto `[0, scale_factor)` for rotation.
pub const ROTATION_RANGE_DEGREES: f64 = 180.0;

fn default_scale_factor() -> f64 {
    SCALE_FACTOR
}

/// An axis-aligned box (top-left `x1, y1`, bottom-right `x2, y2`) plus the
/// object's clockwise rotation speed in degrees per frame.
///
/// Note: the constructor does NOT enforce `x1 <= x2` or `y1 <= y2`. Zero
/// and negative extents are representable; callers keep boxes ordered.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    /// Clockwise object rotation per frame, in degrees.
    #[serde(default)]
    pub rot_speed: f64,
    #[serde(default = "default_scale_factor")]
    scale_factor: f64,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0, 0.0)
    }
}

impl BoundingBox {
    /// Creates a box from corners and a rotation speed.
    #[inline]
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64, rot_speed: f64) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            rot_speed,
            scale_factor: SCALE_FACTOR,
        }
    }

    /// Creates a non-rotating box from corners.
    #[inline]
    pub fn from_xyxy(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(x1, y1, x2, y2, 0.0)
    }

    /// Returns this box with a different normalization constant.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    #[inline]
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Width of the box. Non-positive if the box is malformed.
    #[inline]
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    /// Height of the box. Non-positive if the box is malformed.
    #[inline]
    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    #[inline]
    pub fn center_x(&self) -> f64 {
        (self.x1 + self.x2) / 2.0
    }

    #[inline]
    pub fn center_y(&self) -> f64 {
        (self.y1 + self.y2) / 2.0
    }

    /// Width of the context-padded crop around this box, at least 1 pixel.
    pub fn compute_output_width(&self) -> f64 {
        (CONTEXT_FACTOR * self.width()).max(1.0)
    }

    /// Height of the context-padded crop around this box, at least 1 pixel.
    pub fn compute_output_height(&self) -> f64 {
        (CONTEXT_FACTOR * self.height()).max(1.0)
    }

    /// How far the padded crop would stick out past the left image edge.
    pub fn edge_spacing_x(&self) -> f64 {
        (self.compute_output_width() / 2.0 - self.center_x()).max(0.0)
    }

    /// How far the padded crop would stick out past the top image edge.
    pub fn edge_spacing_y(&self) -> f64 {
        (self.compute_output_height() / 2.0 - self.center_y()).max(0.0)
    }

    pub fn compute_area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Area of overlap with `other`; 0 when the boxes are disjoint on either axis.
    pub fn compute_intersection(&self, other: &BoundingBox) -> f64 {
        let overlap_x = (self.x2.min(other.x2) - self.x1.max(other.x1)).max(0.0);
        let overlap_y = (self.y2.min(other.y2) - self.y1.max(other.y1)).max(0.0);
        overlap_x * overlap_y
    }

    /// Returns true if all coordinates and the rotation are finite.
    pub fn is_finite(&self) -> bool {
        self.x1.is_finite()
            && self.y1.is_finite()
            && self.x2.is_finite()
            && self.y2.is_finite()
            && self.rot_speed.is_finite()
    }

    /// Returns true if the corners are ordered (`x1 <= x2`, `y1 <= y2`).
    pub fn is_ordered(&self) -> bool {
        self.x1 <= self.x2 && self.y1 <= self.y2
    }

    /// Normalizes coordinates by the image size into `[0, scale_factor)`.
    ///
    /// Rotation is mapped from degrees into the same numeric range so that a
    /// combined regression loss weighs both kinds of output alike.
    pub fn scale<I: ImageSize + ?Sized>(&self, image: &I) -> BoundingBox {
        let width = f64::from(image.width());
        let height = f64::from(image.height());
        let sf = self.scale_factor;

        BoundingBox {
            x1: self.x1 / width * sf,
            y1: self.y1 / height * sf,
            x2: self.x2 / width * sf,
            y2: self.y2 / height * sf,
            rot_speed: self.rot_speed / ROTATION_RANGE_DEGREES * sf,
            scale_factor: sf,
        }
    }

    /// Inverse of [`scale`](Self::scale) for the same image.
    pub fn unscale<I: ImageSize + ?Sized>(&self, image: &I) -> BoundingBox {
        let width = f64::from(image.width());
        let height = f64::from(image.height());
        let sf = self.scale_factor;

        BoundingBox {
            x1: self.x1 / sf * width,
            y1: self.y1 / sf * height,
            x2: self.x2 / sf * width,
            y2: self.y2 / sf * height,
            rot_speed: self.rot_speed / sf * ROTATION_RANGE_DEGREES,
            scale_factor: sf,
        }
    }

    /// Expresses this box in the frame of a crop taken at `search_location`.
    ///
    /// The edge spacings shift the box by the padding that was inserted when
    /// the crop window hung off the image. Rotation is shifted by plain
    /// subtraction; the corners are not rotated.
    pub fn recenter(
        &self,
        search_location: &BoundingBox,
        edge_spacing_x: f64,
        edge_spacing_y: f64,
    ) -> BoundingBox {
        BoundingBox {
            x1: self.x1 - search_location.x1 + edge_spacing_x,
            y1: self.y1 - search_location.y1 + edge_spacing_y,
            x2: self.x2 - search_location.x1 + edge_spacing_x,
            y2: self.y2 - search_location.y1 + edge_spacing_y,
            rot_speed: self.rot_speed - search_location.rot_speed,
            scale_factor: self.scale_factor,
        }
    }

    /// Inverse of [`recenter`](Self::recenter), clamped to the raw image.
    pub fn uncenter<I: ImageSize + ?Sized>(
        &self,
        raw_image: &I,
        search_location: &BoundingBox,
        edge_spacing_x: f64,
        edge_spacing_y: f64,
    ) -> BoundingBox {
        let image_width = f64::from(raw_image.width());
        let image_height = f64::from(raw_image.height());

        BoundingBox {
            x1: (self.x1 + search_location.x1 - edge_spacing_x).max(0.0),
            y1: (self.y1 + search_location.y1 - edge_spacing_y).max(0.0),
            x2: (self.x2 + search_location.x1 - edge_spacing_x).min(image_width),
            y2: (self.y2 + search_location.y1 - edge_spacing_y).min(image_height),
            rot_speed: self.rot_speed + search_location.rot_speed,
            scale_factor: self.scale_factor,
        }
    }

    /// Computes where the context-padded crop around this box falls on `image`.
    ///
    /// The on-image region is clamped to the image borders and is at least
    /// one pixel in each direction. The padded output is never smaller than
    /// the on-image region.
    pub fn crop_window<I: ImageSize + ?Sized>(&self, image: &I) -> CropWindow {
        let image_width = f64::from(image.width());
        let image_height = f64::from(image.height());
        let center_x = self.center_x();
        let center_y = self.center_y();
        let output_width = self.compute_output_width();
        let output_height = self.compute_output_height();

        let roi_left = (center_x - output_width / 2.0).max(0.0);
        let roi_top = (center_y - output_height / 2.0).max(0.0);

        let left_half = (output_width / 2.0).min(center_x);
        let right_half = (output_width / 2.0).min(image_width - center_x);
        let roi_width = (left_half + right_half).max(1.0);

        let top_half = (output_height / 2.0).min(center_y);
        let bottom_half = (output_height / 2.0).min(image_height - center_y);
        let roi_height = (top_half + bottom_half).max(1.0);

        let location = BoundingBox {
            x1: roi_left,
            y1: roi_top,
            x2: roi_left + roi_width,
            y2: roi_top + roi_height,
            rot_speed: self.rot_speed,
            scale_factor: self.scale_factor,
        };

        let padded_width = output_width.ceil().max(roi_width);
        let padded_height = output_height.ceil().max(roi_height);

        CropWindow {
            location,
            edge_spacing_x: self.edge_spacing_x().min(padded_width - 1.0),
            edge_spacing_y: self.edge_spacing_y().min(padded_height - 1.0),
            output_width: padded_width as u32,
            output_height: padded_height as u32,
        }
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "bbox: {}, {}, {}, {}, rot_speed: {}",
            self.x1, self.y1, self.x2, self.y2, self.rot_speed
        )
    }
}
