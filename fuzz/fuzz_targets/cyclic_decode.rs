//! Fuzz target for cyclic decoding.
//!
//! The first 16 bytes pick the range, the rest is the feature buffer. Any
//! decoded value must stay inside the range, and a rejected buffer must
//! leave the value untouched.

#![no_main]

use libfuzzer_sys::fuzz_target;
use trackaug::CyclicEncodable;

fuzz_target!(|data: &[u8]| {
    if data.len() < 17 || data.len() > 10 * 1024 * 1024 {
        return;
    }

    let min = f64::from_le_bytes(data[0..8].try_into().unwrap());
    let max = f64::from_le_bytes(data[8..16].try_into().unwrap());
    let Ok(mut cyclic) = CyclicEncodable::new(min, min, max) else {
        return;
    };

    let index = usize::from(data[16]);
    let features: Vec<f32> = data[17..]
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();

    let before = cyclic.theta();
    match cyclic.decode_vector(&features, index) {
        Ok(()) => {
            let value = cyclic.value();
            assert!(value >= cyclic.range_min() && value < cyclic.range_max());
            assert!((0.0..std::f64::consts::TAU).contains(&cyclic.theta()));
        }
        Err(_) => assert_eq!(cyclic.theta().to_bits(), before.to_bits()),
    }
});
