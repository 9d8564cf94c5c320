use nom::{
  branch::alt,
  bytes::complete::take_till,
  character::complete::{char as char1, multispace1},
  combinator::value,
  multi::many0_count,
  sequence::pair,
  IResult as NomResult,
};

use super::InputType;
use crate::error::RuleError;


// region Nom Whitespace

/// Noms whitespace, including newlines and comments, returning `()`.
pub fn skip(i: InputType) -> NomResult<InputType, (), RuleError> {
  value(
    (),
    many0_count(
      alt((value((), multispace1), eol_comment))
    ),
  )(i)
}


/// Noms a `#` comment, excluding the newline, returning `()`.
pub fn eol_comment(i: InputType) -> NomResult<InputType, (), RuleError> {
  value(
    (), // Output is thrown away.
    pair(char1('#'), take_till(|c: char| c == '\n')),
  )(i)
}

/// Surrounds `inner` with `skip`, so whitespace and comments before it are insignificant.
pub fn ws<'a, O, F>(mut inner: F) -> impl FnMut(InputType<'a>) -> NomResult<InputType<'a>, O, RuleError>
  where F: FnMut(InputType<'a>) -> NomResult<InputType<'a>, O, RuleError>
{
  move |i| {
    let (i, _) = skip(i)?;
    inner(i)
  }
}

// endregion


#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn skips_spaces_and_comments() {
    let input = InputType::new("  # a comment\n\t# another\n  NAME");
    let (rest, _) = skip(input).unwrap();
    assert_eq!(*rest.fragment(), "NAME");
    assert_eq!(rest.location_line(), 3);
  }

  #[test]
  fn comment_at_end_of_input() {
    let (rest, _) = skip(InputType::new("# trailing")).unwrap();
    assert!(rest.fragment().is_empty());
  }

  #[test]
  fn nothing_to_skip() {
    let (rest, _) = skip(InputType::new("A: a$")).unwrap();
    assert_eq!(rest.location_offset(), 0);
  }
}
