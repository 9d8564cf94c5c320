//! Unterminated raw text error data structure.

use codespan::Span;
use codespan_reporting::diagnostic::{Diagnostic, Label};
use thiserror::Error;

use super::ToDiagnostic;
use crate::parser::ToSpan;

/// Error that occurs when a regex or user code block is never closed by an unescaped `$`.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("unterminated rule body: `$` not found")]
pub struct UnterminatedError {
  /// Where the raw text starts.
  pub start: Span,
  /// Span from the start of the raw text to EOF.
  pub unclosed_span: Span,
}

impl UnterminatedError {
  /// Constructs a new `UnterminatedError`.
  pub fn new<S>(start: S, unclosed: S) -> Self
    where S: ToSpan,
  {
    UnterminatedError {
      start: start.to_span(),
      unclosed_span: unclosed.to_span(),
    }
  }
}

impl ToDiagnostic for UnterminatedError {
  fn to_diagnostic<F: Copy>(&self, file: F) -> Diagnostic<F> {
    let primary = Label::primary(file, self.start).with_message("rule body starts here");
    let unclosed = Label::secondary(file, self.unclosed_span)
                       .with_message("no unescaped `$` before the end of the file");
    Diagnostic::error().with_message(self.to_string()).with_labels(vec![primary, unclosed])
  }
}
