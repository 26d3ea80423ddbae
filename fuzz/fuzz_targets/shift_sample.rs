//! Fuzz target for crop-window sampling.
//!
//! Builds a frame, a box and a seed from the input and checks that `shift`
//! terminates with finite output for any validated input.

#![no_main]

use libfuzzer_sys::fuzz_target;
use rand::{rngs::StdRng, SeedableRng};
use trackaug::validation::{validate_request, AugmentRequest, ValidateOptions};
use trackaug::{BBParams, BoundingBox, Frame, ShiftMode};

fuzz_target!(|data: &[u8]| {
    if data.len() < 49 {
        return;
    }

    let word = |i: usize| u32::from_le_bytes(data[i..i + 4].try_into().unwrap());
    let float = |i: usize| f64::from_le_bytes(data[i..i + 8].try_into().unwrap());

    let frame = Frame::new(word(0) % 8192, word(4) % 8192);
    let bbox = BoundingBox::new(float(8), float(16), float(24), float(32), 0.0);
    let seed = u64::from_le_bytes(data[40..48].try_into().unwrap());
    let mode = if data[48] & 1 == 0 {
        ShiftMode::MotionModel
    } else {
        ShiftMode::Uniform
    };

    let params = BBParams::default();
    let request = AugmentRequest {
        prev_image: &frame,
        curr_image: &frame,
        prev_box: &bbox,
        curr_box: &bbox,
        params: &params,
    };
    if !validate_request(&request, &ValidateOptions::default()).is_ok() {
        return;
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let shifted = bbox.shift(&frame, &params, mode, &mut rng);
    assert!(shifted.is_finite());
});
