//! Unexpected character error data structure.

use codespan::Span;
use codespan_reporting::diagnostic::{Diagnostic, Label};
use thiserror::Error;

use super::ToDiagnostic;
use crate::parser::ToSpan;

/// Error that occurs when a statement starts with a character that cannot begin any statement.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("unexpected character {found:?} at start of rule")]
pub struct UnexpectedError {
  /// The offending character.
  pub found: char,
  /// Span of the offending character.
  pub span: Span,
}

impl UnexpectedError {
  /// Constructs a new `UnexpectedError`.
  pub fn new<S>(found: char, span: S) -> Self
    where S: ToSpan,
  {
    UnexpectedError {
      found,
      span: span.to_span(),
    }
  }
}

impl ToDiagnostic for UnexpectedError {
  fn to_diagnostic<F: Copy>(&self, file: F) -> Diagnostic<F> {
    let labels = vec![
      Label::primary(file, self.span).with_message("found unexpected character here")
    ];
    Diagnostic::error()
        .with_message(self.to_string())
        .with_labels(labels)
        .with_notes(vec![
          "a rule starts with a NAME or with `[keywords]`, `[ignore]` or `[user_def, NAME]`"
              .to_string()
        ])
  }
}
