/*!
The runtime scanner: maximal munch over a compiled `StateTable`.

From the current position the scanner follows transitions for as long as there are any,
remembering the end of the most recent accepting state it passed through. When it can go no
further it falls back to that end, emits the token, and restarts from there. Keyword override and
ignore filtering are applied only when a token is emitted.
*/

use codespan::Span;
use codespan_reporting::diagnostic::{Diagnostic, Label};
use hlex_specification::ToDiagnostic;
use log::trace;
use thiserror::Error;

use crate::generator::LexerTables;


#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Token<'a> {
  pub tag  : &'a str,
  pub text : &'a str,
  pub span : Span,    //< byte range of `text` within the input
}

impl<'a> Token<'a> {
  /// Fails when the token ends beyond the 4 GiB a `Span` can address.
  pub fn new(tag: &'a str, text: &'a str, start: usize) -> Result<Self, ScanError> {
    let too_long = ScanError::InputTooLong { position: start };
    let end = start.checked_add(text.len()).ok_or(too_long)?;
    let span_start = u32::try_from(start).map_err(|_| too_long)?;
    let span_end = u32::try_from(end).map_err(|_| too_long)?;

    Ok(Token { tag, text, span: Span::new(span_start, span_end) })
  }
}


/// Tokenization failures. Positions are byte offsets into the input.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum ScanError {
  #[error("no rule matches {found:?} at byte {position}")]
  NoMatch { position: usize, found: char },

  #[error("input ends inside an unfinished token starting at byte {start}")]
  UnexpectedEnd { start: usize },

  #[error("token at byte {position} lies beyond the 4 GiB a span can address")]
  InputTooLong { position: usize },
}

impl ScanError {
  pub fn position(&self) -> usize {
    match self {
      ScanError::NoMatch { position, .. } => *position,
      ScanError::UnexpectedEnd { start } => *start,
      ScanError::InputTooLong { position } => *position,
    }
  }
}

impl ToDiagnostic for ScanError {
  fn to_diagnostic<F: Copy>(&self, file: F) -> Diagnostic<F> {
    let label =
        match self {
          ScanError::NoMatch { position, found } => {
            Label::primary(file, *position..*position + found.len_utf8())
                .with_message("no rule matches here")
          }
          ScanError::UnexpectedEnd { start } => {
            Label::primary(file, *start..*start).with_message("unfinished token starts here")
          }
          ScanError::InputTooLong { position } => {
            Label::primary(file, *position..*position).with_message("token starts here")
          }
        };
    Diagnostic::error().with_message(self.to_string()).with_labels(vec![label])
  }
}


/// Tokenizes input against a set of compiled tables. Cheap to copy; holds no per-scan state.
#[derive(Copy, Clone, Debug)]
pub struct Scanner<'t> {
  tables: &'t LexerTables,
}

impl<'t> Scanner<'t> {
  pub fn new(tables: &'t LexerTables) -> Self {
    Scanner { tables }
  }

  /// Lazily tokenizes `input`. The iterator yields at most one error, and nothing after it.
  pub fn tokens<'a>(&self, input: &'a str) -> Tokens<'a>
    where 't: 'a
  {
    Tokens {
      tables: self.tables,
      input,
      position: 0,
      finished: false,
    }
  }

  pub fn tokenize<'a>(&self, input: &'a str) -> Result<Vec<Token<'a>>, ScanError>
    where 't: 'a
  {
    self.tokens(input).collect()
  }
}


pub struct Tokens<'a> {
  tables   : &'a LexerTables,
  input    : &'a str,
  position : usize,  //< byte offset where the next match starts
  finished : bool,
}

impl<'a> Tokens<'a> {
  /**
  Finds the longest match starting at `start`. Returns the end of the match and the tag that was
  active when it was accepted. An accepting state with the empty tag keeps the tag of the shorter
  match it extends.
  */
  fn munch(&self, start: usize) -> Result<(usize, &'a str), ScanError> {
    let tables: &'a LexerTables = self.tables;
    let table = &tables.table;
    let mut state = table.entry();
    let mut active: &'a str = "";
    let mut candidate: Option<(usize, &'a str)> = None;

    for (offset, c) in self.input[start..].char_indices() {
      match table.next_state(state, c) {
        Some(next) => {
          state = next;
          if let Some(tag) = table.accepting_tag(state) {
            if !tag.is_empty() {
              active = tag;
            }
            candidate = Some((start + offset + c.len_utf8(), active));
          }
        }

        None => {
          let position = start + offset;
          return match candidate {
            Some((end, tag)) => {
              if end < position {
                trace!("rolling back from byte {} to byte {}", position, end);
              }
              Ok((end, tag))
            }
            None => Err(ScanError::NoMatch { position, found: c }),
          };
        }
      }
    }

    // The input ran out in the middle of a match. Anything after the candidate is scanned again.
    candidate.ok_or(ScanError::UnexpectedEnd { start })
  }

  /// Applies the keyword override to a matched token.
  fn resolve(&self, tag: &'a str, text: &str) -> &'a str {
    let tables: &'a LexerTables = self.tables;
    tables.keywords.get(text).map_or(tag, String::as_str)
  }
}

impl<'a> Iterator for Tokens<'a> {
  type Item = Result<Token<'a>, ScanError>;

  fn next(&mut self) -> Option<Self::Item> {
    while !self.finished && self.position < self.input.len() {
      let start = self.position;

      match self.munch(start) {
        Ok((end, tag)) => {
          self.position = end;
          let text = &self.input[start..end];
          let tag = self.resolve(tag, text);

          if self.tables.ignore.contains(tag) {
            trace!("ignoring {} {:?}", tag, text);
            continue;
          }
          let token = Token::new(tag, text, start);
          self.finished = token.is_err();
          return Some(token);
        }

        Err(error) => {
          self.finished = true;
          return Some(Err(error));
        }
      }
    }

    self.finished = true;
    None
  }
}

impl<'a> std::iter::FusedIterator for Tokens<'a> {}
