//! Validation report types for structured error reporting.
//!
//! Reports are collected before any sampling happens so that bad input is
//! described once, in full, instead of surfacing as a clamped box later.
//! They print as text for people and serialize to JSON for scripts.

use std::fmt;

use serde::Serialize;

/// The result of validating an augmentation request.
///
/// Issues are listed in the order they were found: parameters first, then
/// each frame and box of the pair.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ValidationReport {
    /// All issues found during validation.
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Creates a new empty report.
    pub fn new() -> Self {
        Self { issues: Vec::new() }
    }

    /// Adds an issue to the report.
    pub fn add(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    /// Returns the number of errors in the report.
    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }

    /// Returns the number of warnings in the report.
    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }

    /// Returns true if there are no errors.
    pub fn is_ok(&self) -> bool {
        self.error_count() == 0
    }

    /// Returns true if there are no issues at all.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.issues.is_empty() {
            return writeln!(f, "Validation passed: no issues found");
        }

        writeln!(
            f,
            "Validation completed with {} error(s) and {} warning(s):",
            self.error_count(),
            self.warning_count()
        )?;
        writeln!(f)?;

        for issue in &self.issues {
            writeln!(f, "  {}", issue)?;
        }

        Ok(())
    }
}

/// A single validation issue (error or warning).
#[derive(Clone, Debug, Serialize)]
pub struct ValidationIssue {
    /// Whether the issue blocks sampling.
    pub severity: Severity,

    /// A stable code for the issue type.
    pub code: IssueCode,

    /// What is wrong, with the offending numbers.
    pub message: String,

    /// Which input the issue was found in.
    pub context: IssueContext,
}

impl ValidationIssue {
    /// Creates an issue with an explicit severity.
    pub fn new(
        severity: Severity,
        code: IssueCode,
        message: impl Into<String>,
        context: IssueContext,
    ) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            context,
        }
    }

    /// Creates an issue that stops the request.
    pub fn error(code: IssueCode, message: impl Into<String>, context: IssueContext) -> Self {
        Self::new(Severity::Error, code, message, context)
    }

    /// Creates an issue that is reported but only fatal in strict mode.
    pub fn warning(code: IssueCode, message: impl Into<String>, context: IssueContext) -> Self {
        Self::new(Severity::Warning, code, message, context)
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARN ",
        };
        write!(
            f,
            "[{}] {:?} in {}: {}",
            severity, self.code, self.context, self.message
        )
    }
}

/// The severity of a validation issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Severity {
    /// Sampling will still run but the result may be surprising.
    Warning,
    /// The input cannot be sampled from.
    Error,
}

/// A stable code identifying the type of validation issue.
///
/// Codes are grouped by the input they describe. Parameter and frame codes
/// are always errors, since sampling from them yields NaN or empty crops.
/// Box codes are errors when the geometry is unusable and warnings when the
/// box merely sits partly off-image or has no area, which the sampler
/// tolerates by clamping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum IssueCode {
    // Parameter issues
    /// A distribution rate is zero, negative or not finite.
    InvalidRate,
    /// A scale bound is not finite.
    ScaleBoundNotFinite,
    /// `min_scale` is greater than `max_scale`.
    InvertedScaleRange,
    /// `min_scale` would allow zero or negative extents.
    ScaleCollapsesBox,

    // Frame issues
    /// A frame has a zero dimension.
    InvalidFrameDimensions,

    // Box issues
    /// A box has non-finite coordinates (NaN or Infinity).
    BoxNotFinite,
    /// A box has `x1 > x2` or `y1 > y2`.
    InvalidBoxOrdering,
    /// A box has zero area.
    DegenerateBox,
    /// A box extends outside its frame.
    BoxOutOfBounds,
}

/// Which input a validation issue refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueContext {
    Params,
    PreviousFrame,
    CurrentFrame,
    PreviousBox,
    CurrentBox,
}

impl fmt::Display for IssueContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueContext::Params => write!(f, "params"),
            IssueContext::PreviousFrame => write!(f, "previous frame"),
            IssueContext::CurrentFrame => write!(f, "current frame"),
            IssueContext::PreviousBox => write!(f, "previous box"),
            IssueContext::CurrentBox => write!(f, "current box"),
        }
    }
}
