//! Wrap-around scalars with a continuous two-value encoding.
//!
//! Angles and times of day wrap: 179.9 degrees is next to -180 degrees. A raw
//! scalar regression target has a jump at the wrap point, so the value is
//! stored as a phase `theta` in `[0, 2*pi)` and encoded as
//! `(sin(theta), cos(theta))`, which is continuous everywhere.
//!
//! # Example
//!
//! ```
//! use trackaug::cyclic::CyclicEncodable;
//!
//! let angle = CyclicEncodable::new(90.0, -180.0, 180.0).unwrap();
//! let mut features = vec![0.0f32; 2];
//! angle.encode_vector(&mut features, 0).unwrap();
//!
//! let mut decoded = CyclicEncodable::new(0.0, -180.0, 180.0).unwrap();
//! decoded.decode_vector(&features, 0).unwrap();
//! assert!((decoded.value() - 90.0).abs() < 1e-4);
//! ```

use std::f64::consts::TAU;
use std::fmt;

use crate::error::TrackaugError;

/// Ranges at or below this size are almost certainly a unit mistake.
pub const MIN_RANGE: f64 = 0.9;

/// A scalar in `[range_min, range_max)` that wraps around.
///
/// The range is fixed at construction. Cloning keeps it; use
/// [`assign`](Self::assign) to copy a value between existing instances, which
/// refuses to mix ranges (e.g. writing a time of day into an angle).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CyclicEncodable {
    theta: f64,
    range_min: f64,
    range_max: f64,
}

impl CyclicEncodable {
    /// Creates a value in `[range_min, range_max)`, e.g. `(90, -180, 180)`
    /// for an angle.
    ///
    /// # Errors
    /// Fails if the range is not finite, inverted, no larger than
    /// [`MIN_RANGE`], or does not contain `value`.
    pub fn new(value: f64, range_min: f64, range_max: f64) -> Result<Self, TrackaugError> {
        let finite = range_min.is_finite() && range_max.is_finite();
        if !(finite && (range_max - range_min).is_finite()) {
            return Err(TrackaugError::NonFiniteRange {
                min: range_min,
                max: range_max,
            });
        }
        if !(range_min < range_max) {
            return Err(TrackaugError::InvertedRange {
                min: range_min,
                max: range_max,
            });
        }
        let range = range_max - range_min;
        if !(range > MIN_RANGE) {
            return Err(TrackaugError::RangeTooSmall {
                range,
                minimum: MIN_RANGE,
            });
        }

        let mut cyclic = Self {
            theta: 0.0,
            range_min,
            range_max,
        };
        cyclic.set_value(value)?;
        Ok(cyclic)
    }

    /// Creates a value in `[0, range_max)`, e.g. `(13.5, 24)` for 1:30pm.
    pub fn new_with_max(value: f64, range_max: f64) -> Result<Self, TrackaugError> {
        Self::new(value, 0.0, range_max)
    }

    pub fn range(&self) -> f64 {
        self.range_max - self.range_min
    }

    pub fn range_min(&self) -> f64 {
        self.range_min
    }

    pub fn range_max(&self) -> f64 {
        self.range_max
    }

    /// The internal phase, in `[0, 2*pi)`.
    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// Current value, in `[range_min, range_max)`.
    pub fn value(&self) -> f64 {
        let value = (self.theta / TAU) * self.range() + self.range_min;
        let value = value.clamp(self.range_min, self.range_max);
        if value == self.range_max {
            self.range_min
        } else {
            value
        }
    }

    /// Sets the value. `range_max` itself is accepted and wraps to `range_min`.
    ///
    /// # Errors
    /// Returns [`TrackaugError::ValueOutOfRange`] outside `[range_min, range_max]`.
    pub fn set_value(&mut self, value: f64) -> Result<(), TrackaugError> {
        if !(self.range_min..=self.range_max).contains(&value) {
            return Err(TrackaugError::ValueOutOfRange {
                value,
                min: self.range_min,
                max: self.range_max,
            });
        }

        let wrapped = (value - self.range_min) % self.range();
        let theta = wrapped / self.range() * TAU;
        self.theta = if theta >= TAU { 0.0 } else { theta };
        Ok(())
    }

    /// Copies the value of `other` into `self`.
    ///
    /// # Errors
    /// Returns [`TrackaugError::RangeMismatch`] if the ranges differ.
    pub fn assign(&mut self, other: &CyclicEncodable) -> Result<(), TrackaugError> {
        if self.range_min != other.range_min || self.range_max != other.range_max {
            return Err(TrackaugError::RangeMismatch {
                from_min: other.range_min,
                from_max: other.range_max,
                to_min: self.range_min,
                to_max: self.range_max,
            });
        }
        self.theta = other.theta;
        Ok(())
    }

    /// Writes `sin(theta)` and `cos(theta)` at `features[index]` and
    /// `features[index + 1]`, leaving the rest of the buffer untouched.
    pub fn encode_vector(&self, features: &mut [f32], index: usize) -> Result<(), TrackaugError> {
        check_room(features.len(), index)?;
        let (sin, cos) = self.theta.sin_cos();
        features[index] = sin as f32;
        features[index + 1] = cos as f32;
        Ok(())
    }

    /// Reads the encoding written by [`encode_vector`](Self::encode_vector).
    ///
    /// The two values need not be unit length; only their direction counts.
    /// A NaN or infinite component is rejected and the value is unchanged.
    pub fn decode_vector(&mut self, features: &[f32], index: usize) -> Result<(), TrackaugError> {
        check_room(features.len(), index)?;
        let sin = f64::from(features[index]);
        let cos = f64::from(features[index + 1]);
        if !sin.is_finite() {
            return Err(TrackaugError::NonFiniteFeature { index });
        }
        if !cos.is_finite() {
            return Err(TrackaugError::NonFiniteFeature { index: index + 1 });
        }

        let mut theta = sin.atan2(cos);
        if theta < 0.0 {
            theta += TAU;
        }
        self.theta = if theta >= TAU { 0.0 } else { theta };
        Ok(())
    }
}

fn check_room(len: usize, index: usize) -> Result<(), TrackaugError> {
    match index.checked_add(1) {
        Some(last) if last < len => Ok(()),
        _ => Err(TrackaugError::BufferTooSmall { index, len }),
    }
}

impl fmt::Display for CyclicEncodable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "value: {:>6.2}, theta: {:>3.2}, range: [{:.2} .. {:.2})",
            self.value(),
            self.theta(),
            self.range_min(),
            self.range_max()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn angle(value: f64) -> CyclicEncodable {
        CyclicEncodable::new(value, -180.0, 180.0).expect("valid angle")
    }

    #[test]
    fn constructor_with_max_starts_at_zero() {
        let time = CyclicEncodable::new_with_max(13.5, 24.0).expect("valid time");
        assert_eq!(time.range_min(), 0.0);
        assert_eq!(time.range_max(), 24.0);
        assert_abs_diff_eq!(time.value(), 13.5, epsilon = 1e-9);
    }

    #[test]
    fn constructor_rejects_inverted_range() {
        assert!(matches!(
            CyclicEncodable::new_with_max(13.5, -24.0),
            Err(TrackaugError::InvertedRange { .. })
        ));
        assert!(matches!(
            CyclicEncodable::new(13.5, -16.0, -24.0),
            Err(TrackaugError::InvertedRange { .. })
        ));
    }

    #[test]
    fn constructor_rejects_small_range() {
        assert!(matches!(
            CyclicEncodable::new_with_max(0.2, 0.5),
            Err(TrackaugError::RangeTooSmall { .. })
        ));
        assert!(matches!(
            CyclicEncodable::new(13.5, 13.2, 14.0),
            Err(TrackaugError::RangeTooSmall { .. })
        ));
        assert!(CyclicEncodable::new_with_max(0.5, 1.0).is_ok());
    }

    #[test]
    fn constructor_rejects_non_finite_range() {
        assert!(matches!(
            CyclicEncodable::new(0.0, -1e308, 1e308),
            Err(TrackaugError::NonFiniteRange { .. })
        ));
        assert!(matches!(
            CyclicEncodable::new(0.0, f64::NEG_INFINITY, 10.0),
            Err(TrackaugError::NonFiniteRange { .. })
        ));
        assert!(matches!(
            CyclicEncodable::new_with_max(0.0, f64::NAN),
            Err(TrackaugError::NonFiniteRange { .. })
        ));
        assert!(matches!(
            CyclicEncodable::new_with_max(0.0, f64::INFINITY),
            Err(TrackaugError::NonFiniteRange { .. })
        ));
    }

    #[test]
    fn constructor_rejects_value_outside_range() {
        assert!(matches!(
            CyclicEncodable::new(200.0, -180.0, 180.0),
            Err(TrackaugError::ValueOutOfRange { .. })
        ));
    }

    #[test]
    fn three_param_constructor() {
        let a = angle(90.0);
        assert_eq!(a.range_min(), -180.0);
        assert_eq!(a.range_max(), 180.0);
        assert_eq!(a.range(), 360.0);
        assert_abs_diff_eq!(a.value(), 90.0, epsilon = 1e-9);
    }

    #[test]
    fn clone_keeps_range_and_value() {
        let original = angle(90.0);
        let copy = original;
        assert_eq!(copy.range_min(), -180.0);
        assert_eq!(copy.range_max(), 180.0);
        assert_abs_diff_eq!(copy.value(), 90.0, epsilon = 1e-9);
    }

    #[test]
    fn assign_copies_value_between_equal_ranges() {
        let mut a = angle(90.0);
        let b = angle(50.0);
        a.assign(&b).expect("same range");
        assert_abs_diff_eq!(a.value(), 50.0, epsilon = 1e-9);
    }

    #[test]
    fn assign_rejects_different_ranges() {
        let mut a = angle(5.0);
        let other_min = CyclicEncodable::new(5.0, -10.0, 180.0).expect("valid");
        let other_max = CyclicEncodable::new(5.0, -180.0, 10.0).expect("valid");

        assert!(matches!(
            a.assign(&other_min),
            Err(TrackaugError::RangeMismatch { .. })
        ));
        assert!(matches!(
            a.assign(&other_max),
            Err(TrackaugError::RangeMismatch { .. })
        ));
        assert_abs_diff_eq!(a.value(), 5.0, epsilon = 1e-9);
    }

    #[test]
    fn set_value_wraps_at_range_max() {
        let mut a = angle(20.0);
        a.set_value(180.0).expect("range max is accepted");
        assert_eq!(a.value(), -180.0);
        assert_eq!(a.theta(), 0.0);
    }

    #[test]
    fn set_value_limits() {
        let mut a = angle(20.0);
        a.set_value(-180.0).expect("in range");
        assert_abs_diff_eq!(a.value(), -180.0, epsilon = 1e-9);
        a.set_value(179.9).expect("in range");
        assert_relative_eq!(a.value(), 179.9, max_relative = 1e-12);
        a.set_value(179.999).expect("in range");
        assert_relative_eq!(a.value(), 179.999, max_relative = 1e-12);
    }

    #[test]
    fn set_value_rejects_out_of_range() {
        let mut a = angle(90.0);
        assert!(a.set_value(200.0).is_err());
        assert!(a.set_value(-200.0).is_err());
        assert_abs_diff_eq!(a.value(), 90.0, epsilon = 1e-9);
    }

    #[test]
    fn encode_writes_sin_cos_at_index() {
        let a = angle(50.0);
        let mut vec = vec![0.0f32; 6];
        a.encode_vector(&mut vec, 4).expect("room for two");

        assert_eq!(&vec[..4], &[0.0, 0.0, 0.0, 0.0]);
        assert_abs_diff_eq!(vec[4], -0.766_044_4, epsilon = 1e-6);
        assert_abs_diff_eq!(vec[5], -0.642_787_6, epsilon = 1e-6);
    }

    #[test]
    fn encode_is_continuous_across_wrap() {
        let before = angle(-179.999);
        let after = angle(179.999);
        let mut vec_before = [0.0f32; 2];
        let mut vec_after = [0.0f32; 2];
        before.encode_vector(&mut vec_before, 0).expect("room");
        after.encode_vector(&mut vec_after, 0).expect("room");

        assert_abs_diff_eq!(vec_before[0], vec_after[0], epsilon = 1e-4);
        assert_abs_diff_eq!(vec_before[1], vec_after[1], epsilon = 1e-4);
    }

    #[test]
    fn encode_rejects_index_without_room() {
        let a = angle(50.0);
        let mut vec = vec![0.0f32; 6];
        assert!(matches!(
            a.encode_vector(&mut vec, 5),
            Err(TrackaugError::BufferTooSmall { index: 5, len: 6 })
        ));
        assert!(a.encode_vector(&mut vec, usize::MAX).is_err());
        assert!(a.encode_vector(&mut [], 0).is_err());
    }

    #[test]
    fn decode_reads_at_index() {
        let mut a = angle(0.0);
        let mut vec = vec![0.0f32; 6];
        vec[4] = -0.766_044_4;
        vec[5] = -0.642_787_6;
        a.decode_vector(&vec, 4).expect("room");
        assert_abs_diff_eq!(a.value(), 50.0, epsilon = 1e-4);
    }

    #[test]
    fn decode_time_of_day() {
        let encoder = CyclicEncodable::new_with_max(13.5, 24.0).expect("valid");
        let mut decoder = CyclicEncodable::new_with_max(0.0, 24.0).expect("valid");
        let mut vec = [0.0f32; 2];

        encoder.encode_vector(&mut vec, 0).expect("room");
        assert_abs_diff_eq!(vec[0], -0.382_683_43, epsilon = 1e-6);
        assert_abs_diff_eq!(vec[1], -0.923_879_5, epsilon = 1e-6);

        decoder.decode_vector(&vec, 0).expect("room");
        assert_abs_diff_eq!(decoder.value(), 13.5, epsilon = 1e-4);
    }

    #[test]
    fn decode_all_quadrants() {
        let mut encoder = angle(0.0);
        let mut decoder = angle(0.0);
        let mut vec = [0.0f32; 2];

        // Off-diagonal values catch a swapped sin/cos.
        for value in [-180.0, -140.0, -90.0, -45.0, 0.0, 53.0, 90.0, 137.0, 179.9] {
            encoder.set_value(value).expect("in range");
            encoder.encode_vector(&mut vec, 0).expect("room");
            decoder.decode_vector(&vec, 0).expect("room");
            assert_abs_diff_eq!(decoder.value(), value, epsilon = 1e-4);
        }
    }

    #[test]
    fn decode_keeps_theta_in_range() {
        let mut a = angle(0.0);
        a.decode_vector(&[-1e-9, 1.0], 0).expect("room");
        assert!((0.0..TAU).contains(&a.theta()));
        a.decode_vector(&[0.0, 0.0], 0).expect("room");
        assert!((0.0..TAU).contains(&a.theta()));
    }

    #[test]
    fn decode_rejects_non_finite_features() {
        let mut a = angle(90.0);
        let before = a.theta();

        assert!(matches!(
            a.decode_vector(&[f32::NAN, 1.0], 0),
            Err(TrackaugError::NonFiniteFeature { index: 0 })
        ));
        assert!(matches!(
            a.decode_vector(&[0.0, 0.0, 0.5, f32::INFINITY], 2),
            Err(TrackaugError::NonFiniteFeature { index: 3 })
        ));
        assert!(a.decode_vector(&[f32::NEG_INFINITY, f32::NAN], 0).is_err());

        assert_eq!(a.theta(), before);
        assert_abs_diff_eq!(a.value(), 90.0, epsilon = 1e-9);
    }

    #[test]
    fn display_format() {
        let a = angle(50.0);
        assert_eq!(
            a.to_string(),
            "value:  50.00, theta: 4.01, range: [-180.00 .. 180.00)"
        );
    }
}
