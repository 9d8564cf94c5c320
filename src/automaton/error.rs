use thiserror::Error;

use super::Index32;

/// A malformed regex. The payload is the byte position within the regex source at which the
/// problem was found.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Error)]
pub enum RegexError {
  #[error("empty class at character {0}")]
  EmptyClass(Index32),          //< class `[...]` matches nothing, e.g. `[^\x00-\u{10FFFF}]`
  #[error("empty expression at character {0}")]
  EmptyExpression(Index32),     //< regex (sub)expression should not be empty
  #[error("exceeds limits at character {0}")]
  ExceedsLimits(Index32),       //< a repeat count or the automaton grew too large
  #[error("invalid class range at character {0}")]
  InvalidClassRange(Index32),   //< invalid character class range, e.g. `[Z-A]`
  #[error("invalid escape at character {0}")]
  InvalidEscape(Index32),
  #[error("invalid repeat at character {0}")]
  InvalidRepeat(Index32),       //< invalid repeat range, e.g. `{10,1}`
  #[error("invalid syntax at character {0}")]
  InvalidSyntax(Index32),       //< e.g. a quantifier with nothing to repeat
  #[error("mismatched braces at character {0}")]
  MismatchedBraces(Index32),
  #[error("mismatched brackets at character {0}")]
  MismatchedBrackets(Index32),
  #[error("mismatched parentheses at character {0}")]
  MismatchedParens(Index32),
}

impl RegexError {
  /// The byte position at which the error occurred.
  pub fn idx(&self) -> Index32 {
    *match self {
      | RegexError::EmptyClass(loc)
      | RegexError::EmptyExpression(loc)
      | RegexError::ExceedsLimits(loc)
      | RegexError::InvalidClassRange(loc)
      | RegexError::InvalidEscape(loc)
      | RegexError::InvalidRepeat(loc)
      | RegexError::InvalidSyntax(loc)
      | RegexError::MismatchedBraces(loc)
      | RegexError::MismatchedBrackets(loc)
      | RegexError::MismatchedParens(loc) => loc,
    }
  }

  /// A short description without the position, for diagnostic labels.
  pub fn to_message(&self) -> &'static str {
    match self {
      RegexError::EmptyClass(_)         => "this class matches no character",
      RegexError::EmptyExpression(_)    => "expected an expression here",
      RegexError::ExceedsLimits(_)      => "too large",
      RegexError::InvalidClassRange(_)  => "range bounds are out of order",
      RegexError::InvalidEscape(_)      => "unknown escape",
      RegexError::InvalidRepeat(_)      => "invalid repeat",
      RegexError::InvalidSyntax(_)      => "nothing to repeat",
      RegexError::MismatchedBraces(_)   => "unbalanced brace",
      RegexError::MismatchedBrackets(_) => "unbalanced bracket",
      RegexError::MismatchedParens(_)   => "unbalanced parenthesis",
    }
  }
}
