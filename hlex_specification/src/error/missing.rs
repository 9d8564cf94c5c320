//! Premature end of input error data structure.

use codespan::Span;
use codespan_reporting::diagnostic::{Diagnostic, Label};
use thiserror::Error;

use super::ToDiagnostic;
use crate::parser::ToSpan;

/// Error that occurs when the input ends while something specific was still required.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("unexpected end of input, expected {expected}")]
pub struct MissingError {
  /// Printable name of the item that was expected.
  pub expected: String,
  /// The (empty) span at the end of the input.
  pub span: Span,
}

impl MissingError {
  /// Constructs a new `MissingError`.
  pub fn new<T, S>(expected: T, span: S) -> Self
    where T: Into<String>,
          S: ToSpan,
  {
    MissingError {
      expected: expected.into(),
      span: span.to_span(),
    }
  }
}

impl ToDiagnostic for MissingError {
  fn to_diagnostic<F: Copy>(&self, file: F) -> Diagnostic<F> {
    let label = Label::primary(file, self.span)
                    .with_message(format!("expected {} here", self.expected));
    Diagnostic::error().with_message(self.to_string()).with_labels(vec![label])
  }
}
