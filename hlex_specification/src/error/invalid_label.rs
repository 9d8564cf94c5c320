//! Unknown bracketed keyword error data structure.

use codespan::Span;
use codespan_reporting::diagnostic::{Diagnostic, Label};
use thiserror::Error;

use super::ToDiagnostic;
use crate::parser::ToSpan;

/// Error that occurs when a `[label]` statement names an unknown label.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("invalid rule label: `{label}`")]
pub struct InvalidLabelError {
  /// The label as written.
  pub label: String,
  /// Location of the label in the source file.
  pub span: Span,
}

impl InvalidLabelError {
  /// Constructs a new `InvalidLabelError`.
  pub fn new<T, S>(label: T, span: S) -> Self
    where T: Into<String>,
          S: ToSpan,
  {
    InvalidLabelError {
      label: label.into(),
      span: span.to_span(),
    }
  }
}

impl ToDiagnostic for InvalidLabelError {
  fn to_diagnostic<F: Copy>(&self, file: F) -> Diagnostic<F> {
    let primary = Label::primary(file, self.span).with_message("invalid rule label");
    Diagnostic::error()
        .with_message(self.to_string())
        .with_labels(vec![primary])
        .with_notes(vec!["expected one of `keywords`, `ignore`, `user_def`".to_string()])
  }
}
