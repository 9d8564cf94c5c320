/*!
Reads tables written by `emit` back into `LexerTables`.

Only the generated part of the text is read: the last header line that opens a `tables` module
starts it, everything before is the template, and the user code table is skipped.
*/

use std::collections::{BTreeMap, BTreeSet};

use nom::{
  branch::alt,
  bytes::complete::{tag, take_while_m_n},
  character::complete::{char as char1, digit1, multispace0, none_of},
  combinator::{map_opt, map_res, opt, value},
  multi::{fold_many0, separated_list0},
  sequence::{delimited, preceded, terminated, tuple},
  IResult,
};
use thiserror::Error;

use super::emit::HEADER;
use crate::generator::LexerTables;
use crate::table::{Edge, StateTable, TableError};

type PResult<'a, O> = IResult<&'a str, O>;


#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ReloadError {
  #[error("no generated tables found")]
  MissingHeader,
  #[error("malformed generated tables at byte {offset}")]
  Syntax { offset: usize },
  #[error(transparent)]
  Table(#[from] TableError),
}


// region Literals

/// `inner`, after optional whitespace.
fn lexeme<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> PResult<'a, O>
  where F: FnMut(&'a str) -> PResult<'a, O>
{
  preceded(multispace0, inner)
}

fn number(i: &str) -> PResult<u32> {
  map_res(digit1, |digits: &str| digits.parse::<u32>())(i)
}

fn unicode_escape(i: &str) -> PResult<char> {
  map_opt(
    delimited(tag("u{"), take_while_m_n(1, 6, |c: char| c.is_ascii_hexdigit()), char1('}')),
    |hex: &str| u32::from_str_radix(hex, 16).ok().and_then(char::from_u32),
  )(i)
}

fn escape(i: &str) -> PResult<char> {
  preceded(
    char1('\\'),
    alt((
      value('\n', char1('n')),
      value('\t', char1('t')),
      value('\r', char1('r')),
      value('\0', char1('0')),
      value('\\', char1('\\')),
      value('\'', char1('\'')),
      value('"', char1('"')),
      unicode_escape,
    )),
  )(i)
}

fn char_literal(i: &str) -> PResult<char> {
  delimited(char1('\''), alt((escape, none_of("\\'"))), char1('\''))(i)
}

fn string_literal(i: &str) -> PResult<String> {
  delimited(
    char1('"'),
    fold_many0(alt((escape, none_of("\\\""))), String::new, |mut s: String, c: char| {
      s.push(c);
      s
    }),
    char1('"'),
  )(i)
}

// endregion


/// `&[item, item, ...]` with an optional trailing comma.
fn list<'a, O, F>(item: F) -> impl FnMut(&'a str) -> PResult<'a, Vec<O>>
  where F: FnMut(&'a str) -> PResult<'a, O>
{
  delimited(
    lexeme(tag("&[")),
    terminated(separated_list0(lexeme(char1(',')), lexeme(item)), opt(lexeme(char1(',')))),
    lexeme(char1(']')),
  )
}

/// `(a, b)`
fn pair<'a, A, B, FA, FB>(first: FA, second: FB) -> impl FnMut(&'a str) -> PResult<'a, (A, B)>
  where FA: FnMut(&'a str) -> PResult<'a, A>,
        FB: FnMut(&'a str) -> PResult<'a, B>
{
  delimited(
    char1('('),
    tuple((lexeme(first), preceded(lexeme(char1(',')), lexeme(second)))),
    lexeme(char1(')')),
  )
}

fn edge(i: &str) -> PResult<Edge> {
  let (i, _) = char1('(')(i)?;
  let (i, lo) = lexeme(char_literal)(i)?;
  let (i, _) = lexeme(char1(','))(i)?;
  let (i, hi) = lexeme(char_literal)(i)?;
  let (i, _) = lexeme(char1(','))(i)?;
  let (i, target) = lexeme(number)(i)?;
  let (i, _) = lexeme(char1(')'))(i)?;
  Ok((i, Edge::new(lo, hi, target)))
}

/// `pub static NAME: TYPE = VALUE;`, where `declaration` is everything up to the `=`.
fn item<'a, O, F>(declaration: &'static str, value: F) -> impl FnMut(&'a str) -> PResult<'a, O>
  where F: FnMut(&'a str) -> PResult<'a, O>
{
  delimited(
    preceded(lexeme(tag(declaration)), lexeme(char1('='))),
    value,
    lexeme(char1(';')),
  )
}


struct Parts {
  entry       : u32,
  accepting   : Vec<(u32, String)>,
  transitions : Vec<Vec<Edge>>,
  ignore      : Vec<String>,
  keywords    : Vec<(String, String)>,
}

fn tables(i: &str) -> PResult<Parts> {
  let (i, _) = lexeme(tag("pub mod tables {"))(i)?;
  let (i, _) = lexeme(tag("#![allow(dead_code, unused_variables)]"))(i)?;
  let (i, entry) = item("pub const ENTRY: u32", lexeme(number))(i)?;
  let (i, accepting) =
      item("pub static ACCEPTING: &[(u32, &str)]", list(pair(number, string_literal)))(i)?;
  let (i, transitions) =
      item("pub static TRANSITIONS: &[&[(char, char, u32)]]", list(list(edge)))(i)?;
  let (i, ignore) = item("pub static IGNORE: &[&str]", list(string_literal))(i)?;
  let (i, keywords) =
      item("pub static KEYWORDS: &[(&str, &str)]", list(pair(string_literal, string_literal)))(i)?;

  Ok((i, Parts { entry, accepting, transitions, ignore, keywords }))
}


/// Reads the tables of a generated source text.
pub fn reload(text: &str) -> Result<LexerTables, ReloadError> {
  // A template may itself be generated output, so the last opening wins.
  let opening = format!("{}\n\npub mod tables {{", HEADER);
  let start = text.rfind(&opening).ok_or(ReloadError::MissingHeader)? + HEADER.len();

  let parts =
      match tables(&text[start..]) {
        Ok((_, parts)) => parts,
        | Err(nom::Err::Error(error))
        | Err(nom::Err::Failure(error)) => {
          return Err(ReloadError::Syntax { offset: text.len() - error.input.len() });
        }
        Err(nom::Err::Incomplete(_)) => return Err(ReloadError::Syntax { offset: text.len() }),
      };

  let table = StateTable::new(parts.entry, parts.transitions, parts.accepting)?;
  let keywords: BTreeMap<String, String> = parts.keywords.into_iter().collect();
  let ignore: BTreeSet<String> = parts.ignore.into_iter().collect();

  Ok(LexerTables { table, keywords, ignore })
}
