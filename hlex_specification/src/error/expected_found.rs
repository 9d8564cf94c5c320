//! Expected/found error data structure.

use codespan::Span;
use codespan_reporting::diagnostic::{Diagnostic, Label};
use thiserror::Error;

use super::ToDiagnostic;
use crate::parser::ToSpan;

/// Error that occurs when a character was found, but something else was expected.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("expected {expected}, found {found:?}")]
pub struct ExpectedFoundError {
  /// Printable name of the item that was expected.
  pub expected: String,
  /// The character that was found instead.
  pub found: char,
  /// Span of the found character.
  pub span: Span,
}

impl ExpectedFoundError {
  /// Constructs a new `ExpectedFoundError`.
  pub fn new<T, S>(expected: T, found: char, span: S) -> Self
    where T: Into<String>,
          S: ToSpan,
  {
    ExpectedFoundError {
      expected: expected.into(),
      found,
      span: span.to_span(),
    }
  }
}

impl ToDiagnostic for ExpectedFoundError {
  fn to_diagnostic<F: Copy>(&self, file: F) -> Diagnostic<F> {
    let label = Label::primary(file, self.span)
                    .with_message(format!("expected {} here", self.expected));
    Diagnostic::error().with_message(self.to_string()).with_labels(vec![label])
  }
}
