//! Input validation for augmentation requests.
//!
//! This module checks:
//! - Sampling parameters (positive finite rates, a sane scale range)
//! - Frame dimensions
//! - Box geometry (finite, ordered, non-degenerate, inside the frame)

mod report;

pub use report::{IssueCode, IssueContext, Severity, ValidationIssue, ValidationReport};

use crate::bbox::{BBParams, BoundingBox};
use crate::image::ImageSize;

/// Options for validation behavior.
#[derive(Clone, Debug, Default)]
pub struct ValidateOptions {
    /// If true, treat warnings as errors.
    pub strict: bool,
}

/// A frame pair with its ground-truth boxes, as handed to the generator.
#[derive(Clone, Copy, Debug)]
pub struct AugmentRequest<'a, I> {
    pub prev_image: &'a I,
    pub curr_image: &'a I,
    pub prev_box: &'a BoundingBox,
    pub curr_box: &'a BoundingBox,
    pub params: &'a BBParams,
}

/// Validates a request and returns a report of all issues found.
pub fn validate_request<I: ImageSize>(
    request: &AugmentRequest<'_, I>,
    _opts: &ValidateOptions,
) -> ValidationReport {
    let mut report = ValidationReport::new();

    validate_params(request.params, &mut report);

    validate_frame(request.prev_image, IssueContext::PreviousFrame, &mut report);
    validate_frame(request.curr_image, IssueContext::CurrentFrame, &mut report);

    validate_box(
        request.prev_box,
        request.prev_image,
        IssueContext::PreviousBox,
        &mut report,
    );
    validate_box(
        request.curr_box,
        request.curr_image,
        IssueContext::CurrentBox,
        &mut report,
    );

    report
}

/// Validates sampling parameters.
pub fn validate_params(params: &BBParams, report: &mut ValidationReport) {
    let rates = [
        ("lambda_shift", params.lambda_shift),
        ("lambda_scale", params.lambda_scale),
        ("lambda_rotation", params.lambda_rotation),
    ];
    for (name, rate) in rates {
        if !rate.is_finite() || rate <= 0.0 {
            report.add(ValidationIssue::error(
                IssueCode::InvalidRate,
                format!("{} must be positive and finite, got {}", name, rate),
                IssueContext::Params,
            ));
        }
    }

    if !params.min_scale.is_finite() || !params.max_scale.is_finite() {
        report.add(ValidationIssue::error(
            IssueCode::ScaleBoundNotFinite,
            format!(
                "Scale bounds must be finite, got [{}, {}]",
                params.min_scale, params.max_scale
            ),
            IssueContext::Params,
        ));
        return;
    }

    if params.min_scale > params.max_scale {
        report.add(ValidationIssue::error(
            IssueCode::InvertedScaleRange,
            format!(
                "min_scale ({}) is greater than max_scale ({})",
                params.min_scale, params.max_scale
            ),
            IssueContext::Params,
        ));
    }

    if params.min_scale <= -1.0 {
        report.add(ValidationIssue::error(
            IssueCode::ScaleCollapsesBox,
            format!(
                "min_scale ({}) must be greater than -1 to keep extents positive",
                params.min_scale
            ),
            IssueContext::Params,
        ));
    }
}

fn validate_frame<I: ImageSize>(image: &I, context: IssueContext, report: &mut ValidationReport) {
    if image.width() == 0 || image.height() == 0 {
        report.add(ValidationIssue::error(
            IssueCode::InvalidFrameDimensions,
            format!(
                "Invalid dimensions {}x{} (must be positive)",
                image.width(),
                image.height()
            ),
            context,
        ));
    }
}

fn validate_box<I: ImageSize>(
    bbox: &BoundingBox,
    image: &I,
    context: IssueContext,
    report: &mut ValidationReport,
) {
    if !bbox.is_finite() {
        report.add(ValidationIssue::error(
            IssueCode::BoxNotFinite,
            format!(
                "Non-finite coordinates ({}, {}, {}, {})",
                bbox.x1, bbox.y1, bbox.x2, bbox.y2
            ),
            context,
        ));
        return;
    }

    if !bbox.is_ordered() {
        report.add(ValidationIssue::error(
            IssueCode::InvalidBoxOrdering,
            format!(
                "Invalid ordering: ({}, {}) should be <= ({}, {})",
                bbox.x1, bbox.y1, bbox.x2, bbox.y2
            ),
            context,
        ));
    } else if bbox.compute_area() <= 0.0 {
        report.add(ValidationIssue::warning(
            IssueCode::DegenerateBox,
            format!(
                "Zero area box ({}, {}, {}, {})",
                bbox.x1, bbox.y1, bbox.x2, bbox.y2
            ),
            context,
        ));
    }

    let (w, h) = (f64::from(image.width()), f64::from(image.height()));

    // Allow small tolerance for floating point
    let tolerance = 0.5;

    if bbox.x1 < -tolerance
        || bbox.y1 < -tolerance
        || bbox.x2 > w + tolerance
        || bbox.y2 > h + tolerance
    {
        report.add(ValidationIssue::warning(
            IssueCode::BoxOutOfBounds,
            format!(
                "Box ({:.1}, {:.1}, {:.1}, {:.1}) extends outside frame bounds (0, 0, {}, {})",
                bbox.x1,
                bbox.y1,
                bbox.x2,
                bbox.y2,
                image.width(),
                image.height()
            ),
            context,
        ));
    }
}
