//! Flat 5-element vector encoding of a box, used as the regression target.
//!
//! The vector is not self-describing: producer and consumer must agree on
//! the [`VectorLayout`].

use serde::{Deserialize, Serialize};

use super::BoundingBox;
use crate::error::TrackaugError;

/// Number of values in a box vector.
pub const BOX_VECTOR_LEN: usize = 5;

/// Order of the first four values in a box vector. The fifth is always
/// the rotation speed.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum VectorLayout {
    /// `(x1, y1, x2, y2, rot_speed)`
    #[default]
    Corners,
    /// `(center_x, center_y, width, height, rot_speed)`
    CenterSize,
}

impl BoundingBox {
    /// Builds a box from a 5-element vector in the given layout.
    ///
    /// # Errors
    /// Returns [`TrackaugError::InvalidVectorLength`] unless `values` has
    /// exactly 5 elements. Zero-area boxes are accepted.
    pub fn from_vector(values: &[f32], layout: VectorLayout) -> Result<Self, TrackaugError> {
        let [a, b, c, d, rot]: [f32; BOX_VECTOR_LEN] = values
            .try_into()
            .map_err(|_| TrackaugError::InvalidVectorLength { len: values.len() })?;
        let (a, b, c, d) = (f64::from(a), f64::from(b), f64::from(c), f64::from(d));

        let bbox = match layout {
            VectorLayout::Corners => BoundingBox::from_xyxy(a, b, c, d),
            VectorLayout::CenterSize => {
                BoundingBox::from_xyxy(a - c / 2.0, b - d / 2.0, a + c / 2.0, b + d / 2.0)
            }
        };

        Ok(BoundingBox {
            rot_speed: f64::from(rot),
            ..bbox
        })
    }

    /// Encodes the box as a 5-element vector in the given layout.
    pub fn to_vector(&self, layout: VectorLayout) -> Vec<f32> {
        let head = match layout {
            VectorLayout::Corners => [self.x1, self.y1, self.x2, self.y2],
            VectorLayout::CenterSize => [
                self.center_x(),
                self.center_y(),
                self.width(),
                self.height(),
            ],
        };

        head.iter()
            .chain(std::iter::once(&self.rot_speed))
            .map(|&v| v as f32)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_layout_reads_values_in_order() {
        let bbox = BoundingBox::from_vector(&[1.0, 2.0, 3.0, 4.0, 5.0], VectorLayout::Corners)
            .expect("valid vector");
        assert_eq!(bbox, BoundingBox::new(1.0, 2.0, 3.0, 4.0, 5.0));
    }

    #[test]
    fn center_size_layout_converts_to_corners() {
        let bbox =
            BoundingBox::from_vector(&[50.0, 40.0, 20.0, 10.0, -3.0], VectorLayout::CenterSize)
                .expect("valid vector");
        assert_eq!(bbox, BoundingBox::new(40.0, 35.0, 60.0, 45.0, -3.0));
    }

    #[test]
    fn to_vector_matches_layout() {
        let bbox = BoundingBox::new(40.0, 35.0, 60.0, 45.0, -3.0);
        assert_eq!(
            bbox.to_vector(VectorLayout::Corners),
            vec![40.0, 35.0, 60.0, 45.0, -3.0]
        );
        assert_eq!(
            bbox.to_vector(VectorLayout::CenterSize),
            vec![50.0, 40.0, 20.0, 10.0, -3.0]
        );
    }

    #[test]
    fn wrong_length_is_rejected() {
        for values in [&[][..], &[1.0, 2.0, 3.0, 4.0][..], &[0.0; 6][..]] {
            let err = BoundingBox::from_vector(values, VectorLayout::Corners).unwrap_err();
            assert!(
                matches!(err, TrackaugError::InvalidVectorLength { len } if len == values.len())
            );
        }
    }

    #[test]
    fn degenerate_box_is_valid_input() {
        let bbox = BoundingBox::from_vector(&[10.0, 10.0, 10.0, 10.0, 0.0], VectorLayout::Corners)
            .expect("zero-area box is valid");
        assert_eq!(bbox.compute_area(), 0.0);
    }
}
