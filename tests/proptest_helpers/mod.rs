#![allow(dead_code)]

use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};
use trackaug::{BoundingBox, Frame};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

pub fn arb_frame() -> BoxedStrategy<Frame> {
    (2u32..=4096, 2u32..=4096)
        .prop_map(|(width, height)| Frame::new(width, height))
        .boxed()
}

/// A frame together with an ordered box of at least one pixel inside it.
pub fn arb_frame_and_box() -> BoxedStrategy<(Frame, BoundingBox)> {
    arb_frame()
        .prop_flat_map(|frame| {
            (
                Just(frame),
                box_within(frame.width, frame.height),
                -180.0f64..180.0,
            )
        })
        .prop_map(|(frame, bbox, rot)| {
            (
                frame,
                BoundingBox::new(bbox.x1, bbox.y1, bbox.x2, bbox.y2, rot),
            )
        })
        .boxed()
}

fn box_within(width: u32, height: u32) -> impl Strategy<Value = BoundingBox> {
    let (w, h) = (f64::from(width), f64::from(height));
    (0.0..1.0f64, 0.0..1.0f64, 0.0..1.0f64, 0.0..1.0f64).prop_map(move |(a, b, c, d)| {
        let x1 = a * (w - 1.0);
        let y1 = b * (h - 1.0);
        let x2 = x1 + 1.0 + c * (w - x1 - 1.0);
        let y2 = y1 + 1.0 + d * (h - y1 - 1.0);
        BoundingBox::from_xyxy(x1, y1, x2, y2)
    })
}

pub fn arb_box() -> BoxedStrategy<BoundingBox> {
    (
        -500.0f64..500.0,
        -500.0f64..500.0,
        0.0f64..300.0,
        0.0f64..300.0,
    )
        .prop_map(|(x1, y1, w, h)| BoundingBox::from_xyxy(x1, y1, x1 + w, y1 + h))
        .boxed()
}

pub fn close(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps
}

pub fn boxes_close(a: &BoundingBox, b: &BoundingBox, eps: f64) -> bool {
    close(a.x1, b.x1, eps)
        && close(a.y1, b.y1, eps)
        && close(a.x2, b.x2, eps)
        && close(a.y2, b.y2, eps)
        && close(a.rot_speed, b.rot_speed, eps)
}
