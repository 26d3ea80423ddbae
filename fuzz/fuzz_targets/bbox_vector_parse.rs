//! Fuzz target for building boxes from flat vectors.
//!
//! Reinterprets the input as little-endian f32s and feeds them to
//! `BoundingBox::from_vector` in both layouts, checking for panics.

#![no_main]

use libfuzzer_sys::fuzz_target;
use trackaug::{BoundingBox, VectorLayout};

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let values: Vec<f32> = data
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();

    for layout in [VectorLayout::Corners, VectorLayout::CenterSize] {
        if let Ok(bbox) = BoundingBox::from_vector(&values, layout) {
            let _ = bbox.to_vector(layout);
            let _ = bbox.compute_area();
        }
    }
});
