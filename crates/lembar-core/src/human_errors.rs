// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the people printing documents and for
// the HTTP layer in front of the renderer.
//
// Every error maps to a plain message, a suggestion and an HTTP-equivalent
// status. Caller errors are 4xx, defects in the calling layer are 500.

use crate::error::LembarError;

/// Who has to act on an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The request itself is wrong (unknown variant, unknown document).
    CallerError,
    /// A bug in the code driving the renderer. Never patched silently.
    Defect,
    /// Disk, template file, or PDF backend trouble.
    Environment,
}

/// A human-readable error with plain message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain summary (shown as a heading).
    pub message: String,
    /// What to try next (shown as body text).
    pub suggestion: String,
    /// HTTP-equivalent status code.
    pub status: u16,
    pub severity: Severity,
}

/// Convert a `LembarError` into a `HumanError`.
pub fn humanize_error(err: &LembarError) -> HumanError {
    match err {
        LembarError::UnsupportedVariant(variant) => HumanError {
            message: "This print format is not available.".into(),
            suggestion: format!(
                "Choose \"standard\" or \"dot-matrix\" instead of {variant:?}."
            ),
            status: 400,
            severity: Severity::CallerError,
        },

        LembarError::DocumentNotFound(key) => HumanError {
            message: "We couldn't find that document.".into(),
            suggestion: format!(
                "Check that document {key} exists and belongs to your organization."
            ),
            status: 404,
            severity: Severity::CallerError,
        },

        LembarError::InvalidCapacity { .. }
        | LembarError::MalformedChunk(_)
        | LembarError::PageOutOfSequence { .. } => HumanError {
            message: "The document could not be laid out.".into(),
            suggestion: format!("This is a bug in the print service, please report it. ({err})"),
            status: 500,
            severity: Severity::Defect,
        },

        LembarError::InvalidTemplate(detail) => HumanError {
            message: "The print template is not set up correctly.".into(),
            suggestion: format!("Ask an administrator to fix the template. ({detail})"),
            status: 500,
            severity: Severity::Environment,
        },

        LembarError::PdfError(detail) => HumanError {
            message: "The PDF could not be produced.".into(),
            suggestion: format!("Try again in a moment. ({detail})"),
            status: 500,
            severity: Severity::Environment,
        },

        LembarError::ImageError(detail) => HumanError {
            message: "The logo image could not be used.".into(),
            suggestion: format!("Upload the logo again as a PNG or JPEG. ({detail})"),
            status: 500,
            severity: Severity::Environment,
        },

        LembarError::Io(io) => HumanError {
            message: "A file could not be read or written.".into(),
            suggestion: format!("Check the file path and permissions. ({io})"),
            status: 500,
            severity: Severity::Environment,
        },

        LembarError::Serialization(detail) => HumanError {
            message: "The document data is not in the expected format.".into(),
            suggestion: format!("Check the request body. ({detail})"),
            status: 400,
            severity: Severity::CallerError,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_variant_is_caller_error() {
        let human = humanize_error(&LembarError::UnsupportedVariant("inkjet".into()));
        assert_eq!(human.severity, Severity::CallerError);
        assert_eq!(human.status, 400);
        assert!(human.suggestion.contains("inkjet"));
    }

    #[test]
    fn missing_document_is_not_found() {
        let human = humanize_error(&LembarError::DocumentNotFound("sj-42".into()));
        assert_eq!(human.status, 404);
    }

    #[test]
    fn layout_violations_are_defects() {
        for err in [
            LembarError::InvalidCapacity { capacity: 0 },
            LembarError::MalformedChunk("11 rows on a 10-row page".into()),
            LembarError::PageOutOfSequence { expected: 1, actual: 2 },
        ] {
            let human = humanize_error(&err);
            assert_eq!(human.severity, Severity::Defect);
            assert_eq!(human.status, 500);
        }
    }

    #[test]
    fn bad_request_body_is_caller_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let human = humanize_error(&LembarError::Serialization(json_err));
        assert_eq!(human.severity, Severity::CallerError);
    }
}
