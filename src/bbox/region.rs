//! Conversion to and from the `(left, top, width, height)` region format
//! used by tracking benchmark protocols.

use serde::{Deserialize, Serialize};

use super::BoundingBox;

/// A rectangle given by its top-left corner and size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Region {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

impl BoundingBox {
    /// Converts from a region, attaching the given rotation speed.
    #[inline]
    pub fn from_region(region: &Region, rot_speed: f64) -> Self {
        BoundingBox::new(
            region.left,
            region.top,
            region.left + region.width,
            region.top + region.height,
            rot_speed,
        )
    }

    /// Converts to a region. The rotation speed is dropped.
    #[inline]
    pub fn to_region(&self) -> Region {
        Region::new(self.x1, self.y1, self.width(), self.height())
    }
}

impl From<Region> for BoundingBox {
    fn from(region: Region) -> Self {
        BoundingBox::from_region(&region, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_region() {
        let bbox = BoundingBox::from_region(&Region::new(10.0, 20.0, 90.0, 60.0), 4.0);
        assert_eq!(bbox.x1, 10.0);
        assert_eq!(bbox.y1, 20.0);
        assert_eq!(bbox.x2, 100.0);
        assert_eq!(bbox.y2, 80.0);
        assert_eq!(bbox.rot_speed, 4.0);
    }

    #[test]
    fn test_rotation_defaults_to_zero() {
        let bbox: BoundingBox = Region::new(1.0, 2.0, 3.0, 4.0).into();
        assert_eq!(bbox.rot_speed, 0.0);
    }

    #[test]
    fn test_region_roundtrip() {
        let original = Region::new(15.0, 25.0, 50.0, 30.0);
        let restored = BoundingBox::from_region(&original, 0.0).to_region();
        assert_eq!(original, restored);
    }
}
