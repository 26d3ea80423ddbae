//! End-to-end generation with a crop/pad implementation that moves pixels.

use rand::{rngs::StdRng, SeedableRng};
use trackaug::{
    BBParams, BoundingBox, Crop, CropPad, ExampleGenerator, ImageSize, ShiftMode, TrackaugError,
};

const OBJECT: u8 = 255;

/// Single-channel image, row-major.
#[derive(Clone, Debug, PartialEq)]
struct Gray {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Gray {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width * height) as usize],
        }
    }

    fn with_object(width: u32, height: u32, bbox: &BoundingBox) -> Self {
        let mut image = Self::new(width, height);
        for y in bbox.y1 as u32..bbox.y2 as u32 {
            for x in bbox.x1 as u32..bbox.x2 as u32 {
                image.set(x, y, OBJECT);
            }
        }
        image
    }

    fn get(&self, x: u32, y: u32) -> Option<u8> {
        (x < self.width && y < self.height).then(|| self.pixels[(y * self.width + x) as usize])
    }

    fn set(&mut self, x: u32, y: u32, value: u8) {
        if x < self.width && y < self.height {
            self.pixels[(y * self.width + x) as usize] = value;
        }
    }
}

impl ImageSize for Gray {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}

/// Copies the on-image part of the crop window into a zero-padded output.
struct PixelCropper;

impl CropPad for PixelCropper {
    type Image = Gray;

    fn crop_pad(&self, bbox: &BoundingBox, image: &Gray) -> Crop<Gray> {
        let window = bbox.crop_window(image);
        let mut out = Gray::new(window.output_width, window.output_height);

        let loc = window.location;
        let (x0, y0) = (loc.x1 as u32, loc.y1 as u32);
        let (ex, ey) = (window.edge_spacing_x as u32, window.edge_spacing_y as u32);
        for dy in 0..loc.height() as u32 {
            for dx in 0..loc.width() as u32 {
                if let Some(value) = image.get(x0 + dx, y0 + dy) {
                    out.set(ex + dx, ey + dy, value);
                }
            }
        }

        Crop { image: out, window }
    }
}

fn generator() -> ExampleGenerator<PixelCropper> {
    ExampleGenerator::new(PixelCropper, BBParams::default()).expect("default params")
}

/// Pixel under the center of the unscaled ground truth in the search region.
fn pixel_under_target(search_region: &Gray, gt_scaled: &BoundingBox) -> Option<u8> {
    let gt = gt_scaled.unscale(search_region);
    search_region.get(gt.center_x() as u32, gt.center_y() as u32)
}

#[test]
fn target_patch_contains_the_object() {
    let bbox = BoundingBox::from_xyxy(20.0, 20.0, 40.0, 40.0);
    let frame = Gray::with_object(100, 100, &bbox);

    let mut generator = generator();
    generator.reset(&bbox, &bbox, &frame, &frame);
    let example = generator.make_true_example().expect("ready");

    assert_eq!((example.target.width, example.target.height), (40, 40));
    assert_eq!(example.target.get(15, 15), Some(OBJECT));
    assert_eq!(example.target.get(5, 5), Some(0));
    assert_eq!(
        pixel_under_target(&example.search_region, &example.bbox_gt_scaled),
        Some(OBJECT)
    );
}

#[test]
fn target_patch_is_padded_at_the_image_corner() {
    let bbox = BoundingBox::from_xyxy(0.0, 0.0, 20.0, 20.0);
    let frame = Gray::with_object(100, 100, &bbox);

    let mut generator = generator();
    generator.reset(&bbox, &bbox, &frame, &frame);
    let example = generator.make_true_example().expect("ready");

    // The window hangs 10px off the top-left corner; that strip is padding.
    assert_eq!((example.target.width, example.target.height), (40, 40));
    assert_eq!(example.target.get(5, 5), Some(0));
    assert_eq!(example.target.get(15, 15), Some(OBJECT));

    let gt = example.bbox_gt_scaled.unscale(&example.search_region);
    assert!((gt.x1 - 10.0).abs() < 1e-9 && (gt.x2 - 30.0).abs() < 1e-9);
}

#[test]
fn sampled_search_regions_see_the_object_under_the_target() {
    let prev = BoundingBox::from_xyxy(60.0, 50.0, 100.0, 90.0);
    let curr = BoundingBox::from_xyxy(64.0, 52.0, 104.0, 92.0);
    let prev_frame = Gray::with_object(200, 160, &prev);
    let curr_frame = Gray::with_object(200, 160, &curr);

    for mode in [ShiftMode::MotionModel, ShiftMode::Uniform] {
        let mut generator = generator().with_mode(mode);
        generator.reset(&prev, &curr, &prev_frame, &curr_frame);
        let mut rng = StdRng::seed_from_u64(11);

        let mut checked = 0;
        for example in generator
            .make_training_examples(100, &mut rng)
            .expect("ready")
        {
            let true_example = generator.make_true_example().expect("ready");
            assert_eq!(example.target, true_example.target);

            // Only judge examples whose copied region holds the object center
            // with some margin; the rest saw padding by construction.
            let loc = example.window.location;
            let margin = 3.0;
            if curr.center_x() < loc.x1 + margin
                || curr.center_x() > loc.x2 - margin
                || curr.center_y() < loc.y1 + margin
                || curr.center_y() > loc.y2 - margin
            {
                continue;
            }
            checked += 1;
            assert_eq!(
                pixel_under_target(&example.search_region, &example.bbox_gt_scaled),
                Some(OBJECT),
                "{:?} lost the object",
                example.window
            );
        }
        assert!(checked > 50, "only {} examples were checked", checked);
    }
}

#[test]
fn generation_requires_reset() {
    let generator = generator();
    let mut rng = StdRng::seed_from_u64(0);
    assert!(matches!(
        generator.make_training_example(&mut rng),
        Err(TrackaugError::GeneratorNotReady)
    ));
}
