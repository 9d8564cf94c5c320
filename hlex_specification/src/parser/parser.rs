/*!
Recursive descent reader for rule files.

Every parser here takes a located span and returns the remaining input together with what it
recognized. Insignificant whitespace and `#` comments are skipped before every token. Once a
statement has been identified, any mismatch is a hard failure: there is no backtracking between
statement kinds.
*/

use log::trace;
use nom::{
  bytes::complete::{take_while, take_while1},
  character::complete::{char as char1, satisfy},
  combinator::{cut, recognize},
  sequence::pair,
  Err as NomErr,
  IResult as NomResult,
  InputTake,
};
use phf::phf_map;

use super::span::{consumed, point, Span, ToSpan};
use super::whitespace::{skip, ws};
use super::InputType;
use crate::declaration::{RuleDeclaration, RuleKind};
use crate::error::{InvalidLabelError, RuleError, UnexpectedError, UnterminatedError};

pub type PResult<'a, O> = NomResult<InputType<'a>, O, RuleError>;


/// The statements introduced by `[label]`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Label {
  Keywords,
  Ignore,
  UserDef,
}

static LABELS: phf::Map<&'static str, Label> = phf_map! {
  "keywords" => Label::Keywords,
  "ignore"   => Label::Ignore,
  "user_def" => Label::UserDef,
};


// region Character Classes

fn is_name_start(c: char) -> bool {
  c.is_ascii_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
  c.is_ascii_alphanumeric() || c == '_'
}

fn is_word_char(c: char) -> bool {
  !c.is_whitespace() && !matches!(c, ',' | '}' | '$' | '#')
}

// endregion


fn fail<'a, O, E: Into<RuleError>>(error: E) -> PResult<'a, O> {
  Err(NomErr::Failure(error.into()))
}

fn peek_char(i: &InputType) -> Option<char> {
  i.fragment().chars().next()
}

/// Consumes the character `c`, which must be the next significant character.
fn expect<'a>(c: char) -> impl FnMut(InputType<'a>) -> PResult<'a, InputType<'a>> {
  ws(cut(recognize(char1(c))))
}

/// A `NAME`: `[A-Za-z_][A-Za-z0-9_]*`.
fn name(i: InputType) -> PResult<InputType> {
  let (i, _) = skip(i)?;
  let parsed: PResult<InputType> =
      recognize(pair(satisfy(is_name_start), take_while(is_name_char)))(i);

  parsed.or_else(|_| fail(RuleError::expected("a name", &i)))
}

/// A keyword literal: anything up to whitespace or one of `,}$#`.
fn word(i: InputType) -> PResult<InputType> {
  let (i, _) = skip(i)?;
  let parsed: PResult<InputType> = take_while1(is_word_char)(i);

  parsed.or_else(|_| fail(RuleError::expected("a keyword", &i)))
}


/**
Reads raw text up to the first unescaped `$`, consuming the `$`. A backslash immediately before a
`$` escapes it and is dropped; every other character is kept verbatim. Returns the text and the
span it occupies in the source, excluding the terminator.
*/
fn raw_text(i: InputType) -> PResult<(String, Span)> {
  let mut body = String::new();
  let mut chars = i.fragment().char_indices().peekable();

  while let Some((idx, c)) = chars.next() {
    match c {
      '\\' if matches!(chars.peek(), Some((_, '$'))) => {
        chars.next();
        body.push('$');
      }

      '$' => {
        let (rest, text) = i.take_split(idx + 1);
        let start = text.location_offset();
        let span = Span::new(start as u32, (start + idx) as u32);
        return Ok((rest, (body, span)));
      }

      c => body.push(c),
    }
  }

  fail(UnterminatedError::new(point(&i), i.to_span()))
}


/// Reads `{ entry, entry, ... }`. The list may be empty and may end with a comma.
fn braced_list<'a, O, F>(i: InputType<'a>, mut entry: F) -> PResult<'a, Vec<O>>
  where F: FnMut(InputType<'a>) -> PResult<'a, O>
{
  let (mut i, _) = expect('{')(i)?;
  let mut entries = Vec::new();

  loop {
    let (rest, _) = skip(i)?;
    if peek_char(&rest) == Some('}') {
      return Ok((rest.take_split(1).0, entries));
    }

    let (rest, item) = entry(rest)?;
    entries.push(item);

    let (rest, _) = skip(rest)?;
    match peek_char(&rest) {
      Some(',') => i = rest.take_split(1).0,
      Some('}') => return Ok((rest.take_split(1).0, entries)),
      _ => return fail(RuleError::expected("',' or '}'", &rest)),
    }
  }
}

/// `NAME : word`, returned as `(word, NAME)`.
fn keyword_entry(i: InputType) -> PResult<(String, String)> {
  let (i, tag) = name(i)?;
  let (i, _) = expect(':')(i)?;
  let (i, literal) = word(i)?;

  Ok((i, (literal.fragment().to_string(), tag.fragment().to_string())))
}

fn ignore_entry(i: InputType) -> PResult<String> {
  let (i, tag) = name(i)?;
  Ok((i, tag.fragment().to_string()))
}


/// `NAME : regex$`
fn pattern(i: InputType) -> PResult<RuleDeclaration> {
  let start = i;
  let (i, tag) = name(i)?;
  let (i, _) = expect(':')(i)?;
  let (i, _) = skip(i)?;
  let (i, (body, body_span)) = raw_text(i)?;

  let kind = RuleKind::Pattern {
    tag: tag.fragment().to_string(),
    body,
    body_span,
  };
  Ok((i, RuleDeclaration::new(kind, consumed(&start, &i))))
}


/// `[keywords] {...}$`, `[ignore] {...}$` or `[user_def, NAME] code$`
fn bracketed(i: InputType) -> PResult<RuleDeclaration> {
  let start = i;
  let (i, _) = expect('[')(i)?;
  let (i, label) = name(i)?;

  let kind = match LABELS.get(*label.fragment()) {
    Some(kind) => *kind,
    None => {
      return fail(InvalidLabelError::new(*label.fragment(), label));
    }
  };

  let (i, kind) =
      match kind {
        Label::Keywords => {
          let (i, _) = expect(']')(i)?;
          let (i, entries) = braced_list(i, keyword_entry)?;
          let (i, _) = expect('$')(i)?;
          (i, RuleKind::Keywords { entries })
        }

        Label::Ignore => {
          let (i, _) = expect(']')(i)?;
          let (i, tags) = braced_list(i, ignore_entry)?;
          let (i, _) = expect('$')(i)?;
          (i, RuleKind::Ignore { tags })
        }

        Label::UserDef => {
          let (i, _) = expect(',')(i)?;
          let (i, tag) = name(i)?;
          let (i, _) = expect(']')(i)?;
          // The code starts right after the `]`, whitespace included.
          let (i, (body, _)) = raw_text(i)?;
          (i, RuleKind::UserCode { tag: tag.fragment().to_string(), body })
        }
      };

  Ok((i, RuleDeclaration::new(kind, consumed(&start, &i))))
}


/// Reads the next statement, or `RuleKind::End` when only whitespace and comments remain.
fn declaration(i: InputType) -> PResult<RuleDeclaration> {
  let (i, _) = skip(i)?;

  match peek_char(&i) {
    None => Ok((i, RuleDeclaration::new(RuleKind::End, point(&i)))),

    Some(c) if is_name_start(c) => pattern(i),

    Some('[') => bracketed(i),

    Some(c) => {
      let at = i.location_offset() as u32;
      fail(UnexpectedError::new(c, Span::new(at, at + c.len_utf8() as u32)))
    }
  }
}


/**
Reads a rule file one declaration at a time.

`next_declaration` returns an `End` declaration once the input is exhausted, and keeps returning
it on further calls. As an iterator the scanner yields every declaration up to, not including,
`End`, and stops after the first error.
*/
pub struct RuleScanner<'a> {
  rest     : InputType<'a>, //< input not yet consumed
  finished : bool,          //< set after `End` or an error has been yielded
}

impl<'a> RuleScanner<'a> {
  pub fn new(source: &'a str) -> Self {
    RuleScanner {
      rest: InputType::new(source),
      finished: false,
    }
  }

  pub fn next_declaration(&mut self) -> Result<RuleDeclaration, RuleError> {
    match declaration(self.rest) {
      Ok((rest, rule)) => {
        trace!("rule scanner: {}", rule);
        self.rest = rest;
        Ok(rule)
      }

      | Err(NomErr::Error(error))
      | Err(NomErr::Failure(error)) => Err(error),

      Err(NomErr::Incomplete(_)) => Err(RuleError::expected("more input", &self.rest)),
    }
  }
}

impl<'a> Iterator for RuleScanner<'a> {
  type Item = Result<RuleDeclaration, RuleError>;

  fn next(&mut self) -> Option<Self::Item> {
    if self.finished {
      return None;
    }

    match self.next_declaration() {
      Ok(rule) if rule.is_end() => {
        self.finished = true;
        None
      }
      Ok(rule) => Some(Ok(rule)),
      Err(error) => {
        self.finished = true;
        Some(Err(error))
      }
    }
  }
}

/// Reads every declaration of `source`, in order.
pub fn parse_rules(source: &str) -> Result<Vec<RuleDeclaration>, RuleError> {
  RuleScanner::new(source).collect()
}


#[cfg(test)]
mod test {
  use super::*;
  use crate::error::{ExpectedFoundError, MissingError};

  fn kinds(source: &str) -> Vec<RuleKind> {
    parse_rules(source).unwrap().into_iter().map(|rule| rule.kind).collect()
  }

  fn pattern_kind(tag: &str, body: &str, body_span: Span) -> RuleKind {
    RuleKind::Pattern { tag: tag.to_string(), body: body.to_string(), body_span }
  }

  #[test]
  fn single_pattern() {
    let rules = parse_rules("IDENT : [a-z]+$").unwrap();
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].kind, pattern_kind("IDENT", "[a-z]+", Span::new(8, 14)));
    assert_eq!(rules[0].span, Span::new(0, 15));
  }

  #[test]
  fn pattern_body_is_verbatim() {
    // Leading whitespace is skipped, trailing whitespace belongs to the regex.
    assert_eq!(kinds("A:   a b $")[0], pattern_kind("A", "a b ", Span::new(5, 9)));
  }

  #[test]
  fn escaped_dollar_does_not_terminate() {
    assert_eq!(kinds("A: a\\$b$")[0], pattern_kind("A", "a$b", Span::new(3, 7)));
  }

  #[test]
  fn other_escapes_pass_through() {
    assert_eq!(kinds("A: \\n\\.$")[0], pattern_kind("A", "\\n\\.", Span::new(3, 7)));
  }

  #[test]
  fn comments_and_whitespace_between_rules() {
    let source = "# numbers\nNUM: [0-9]+$\n\n  # names\nID: [a-z]+$ # trailing\n";
    let tags: Vec<_> =
        parse_rules(source).unwrap().iter().map(|r| r.tag().unwrap().to_string()).collect();
    assert_eq!(tags, vec!["NUM", "ID"]);
  }

  #[test]
  fn hash_inside_body_is_not_a_comment() {
    assert_eq!(kinds("H: [0-9]#$")[0], pattern_kind("H", "[0-9]#", Span::new(3, 9)));
  }

  #[test]
  fn keywords_block() {
    let kinds = kinds("[keywords] { IF:if, ELSE : else }$");
    assert_eq!(
      kinds,
      vec![RuleKind::Keywords {
        entries: vec![
          ("if".to_string(), "IF".to_string()),
          ("else".to_string(), "ELSE".to_string()),
        ]
      }]
    );
  }

  #[test]
  fn keywords_trailing_comma_and_empty() {
    let kinds = kinds("[keywords]{A:a,}$ [keywords] { } $");
    assert_eq!(
      kinds,
      vec![
        RuleKind::Keywords { entries: vec![("a".to_string(), "A".to_string())] },
        RuleKind::Keywords { entries: vec![] },
      ]
    );
  }

  #[test]
  fn ignore_block() {
    assert_eq!(
      kinds("[ignore] {WS, COMMENT}$"),
      vec![RuleKind::Ignore { tags: vec!["WS".to_string(), "COMMENT".to_string()] }]
    );
  }

  #[test]
  fn user_code() {
    assert_eq!(
      kinds("[user_def, STR] { *pos += 1; }$"),
      vec![RuleKind::UserCode { tag: "STR".to_string(), body: " { *pos += 1; }".to_string() }]
    );
  }

  #[test]
  fn end_is_sticky() {
    let mut scanner = RuleScanner::new("A: a$");
    assert!(!scanner.next_declaration().unwrap().is_end());
    assert!(scanner.next_declaration().unwrap().is_end());
    assert!(scanner.next_declaration().unwrap().is_end());
  }

  #[test]
  fn empty_file_has_no_rules() {
    assert!(parse_rules("  # nothing here\n").unwrap().is_empty());
  }

  #[test]
  fn unexpected_start_character() {
    let error = parse_rules("A: a$\n?B: b$").unwrap_err();
    assert_eq!(error, UnexpectedError::new('?', Span::new(6, 7)).into());
    assert_eq!(error.line_column("A: a$\n?B: b$"), (2, 1));
  }

  #[test]
  fn invalid_label() {
    let error = parse_rules("[bogus] {}$").unwrap_err();
    assert_eq!(error, InvalidLabelError::new("bogus", Span::new(1, 6)).into());
  }

  #[test]
  fn unterminated_body() {
    let error = parse_rules("A: abc").unwrap_err();
    assert_eq!(error, UnterminatedError::new(Span::new(3, 3), Span::new(3, 6)).into());
  }

  #[test]
  fn missing_colon() {
    let error = parse_rules("A abc$").unwrap_err();
    assert_eq!(error, ExpectedFoundError::new("':'", 'a', Span::new(2, 3)).into());
  }

  #[test]
  fn unexpected_end_in_block() {
    let error = parse_rules("[keywords] { A:a").unwrap_err();
    assert_eq!(error, MissingError::new("',' or '}'", Span::new(16, 16)).into());

    let error = parse_rules("[ignore] { A }").unwrap_err();
    assert_eq!(error, MissingError::new("'$'", Span::new(14, 14)).into());
  }

  #[test]
  fn iterator_stops_after_error() {
    let mut scanner = RuleScanner::new("A: a$ ! B: b$");
    assert!(scanner.next().unwrap().is_ok());
    assert!(scanner.next().unwrap().is_err());
    assert!(scanner.next().is_none());
  }
}
