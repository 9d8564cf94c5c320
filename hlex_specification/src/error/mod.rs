/*!
Errors produced while reading a rule file.

Each kind of error has its own data structure that knows how to render itself as a
`codespan_reporting` diagnostic. `RuleError` gathers them so a parser can return any of them.
*/

mod expected_found;
mod invalid_label;
mod missing;
mod unexpected;
mod unterminated;

use codespan::Span;
use codespan_reporting::diagnostic::Diagnostic;
use codespan_reporting::files::{Files, SimpleFile};
use nom::error::{ErrorKind, ParseError};
use thiserror::Error;

pub use expected_found::ExpectedFoundError;
pub use invalid_label::InvalidLabelError;
pub use missing::MissingError;
pub use unexpected::UnexpectedError;
pub use unterminated::UnterminatedError;

use crate::parser::{point, InputType, ToSpan};

/// Anything that can be rendered against a source file.
pub trait ToDiagnostic {
  fn to_diagnostic<F: Copy>(&self, file: F) -> Diagnostic<F>;
}

/// A grammar error in a rule file. All of them are fatal.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum RuleError {
  #[error(transparent)]
  Missing(#[from] MissingError),
  #[error(transparent)]
  ExpectedFound(#[from] ExpectedFoundError),
  #[error(transparent)]
  Unexpected(#[from] UnexpectedError),
  #[error(transparent)]
  InvalidLabel(#[from] InvalidLabelError),
  #[error(transparent)]
  Unterminated(#[from] UnterminatedError),
}

impl RuleError {
  /// Reports that `expected` was required at the start of `input`. Distinguishes running out of
  /// input from finding the wrong character.
  pub fn expected<T: Into<String>>(expected: T, input: &InputType) -> Self {
    match input.fragment().chars().next() {
      None => MissingError::new(expected, point(input)).into(),
      Some(found) => {
        let at = input.location_offset() as u32;
        let span = Span::new(at, at + found.len_utf8() as u32);
        ExpectedFoundError::new(expected, found, span).into()
      }
    }
  }

  /// The primary location of the error in the rule file.
  pub fn span(&self) -> Span {
    match self {
      RuleError::Missing(e)       => e.span,
      RuleError::ExpectedFound(e) => e.span,
      RuleError::Unexpected(e)    => e.span,
      RuleError::InvalidLabel(e)  => e.span,
      RuleError::Unterminated(e)  => e.start,
    }
  }

  /// One-based `(line, column)` of the error within `source`.
  pub fn line_column(&self, source: &str) -> (usize, usize) {
    let file = SimpleFile::new("", source);
    file.location((), self.span().start().to_usize())
        .map(|location| (location.line_number, location.column_number))
        .unwrap_or((1, 1))
  }
}

impl ToSpan for RuleError {
  fn to_span(&self) -> Span {
    self.span()
  }
}

impl ToDiagnostic for RuleError {
  fn to_diagnostic<F: Copy>(&self, file: F) -> Diagnostic<F> {
    match self {
      RuleError::Missing(e)       => e.to_diagnostic(file),
      RuleError::ExpectedFound(e) => e.to_diagnostic(file),
      RuleError::Unexpected(e)    => e.to_diagnostic(file),
      RuleError::InvalidLabel(e)  => e.to_diagnostic(file),
      RuleError::Unterminated(e)  => e.to_diagnostic(file),
    }
  }
}

impl<'a> ParseError<InputType<'a>> for RuleError {
  fn from_error_kind(input: InputType<'a>, _kind: ErrorKind) -> Self {
    RuleError::expected("valid rule syntax", &input)
  }

  fn append(_input: InputType<'a>, _kind: ErrorKind, other: Self) -> Self {
    other
  }

  fn from_char(input: InputType<'a>, c: char) -> Self {
    RuleError::expected(format!("{:?}", c), &input)
  }
}
