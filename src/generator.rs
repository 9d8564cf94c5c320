/*!
Drives the rule scanner and the automaton compiler.

Declarations are consumed in order. Each pattern is compiled to a fragment, stamped with its tag
and its declaration order as priority, and unioned into the combined automaton. Keyword, ignore
and user code declarations fill side tables. Once every declaration has been read, the combined
automaton is determinized and minimized.
*/

use std::collections::{BTreeMap, BTreeSet};

use codespan_reporting::diagnostic::{Diagnostic, Label};
use hlex_specification::{parse_rules, RuleDeclaration, RuleError, RuleKind, Span, ToDiagnostic};
use log::{debug, info};
use thiserror::Error;

use crate::automaton::{self, Fragment, Priority, RegexError};
use crate::codegen;
use crate::scanner::{ScanError, Scanner, Token};
use crate::table::StateTable;


#[derive(Debug, Error)]
pub enum GenerateError {
  #[error(transparent)]
  Rule(#[from] RuleError),

  #[error("invalid pattern `{tag}`: {error}")]
  Regex {
    tag   : String,
    span  : Span,       //< location of the offending character in the rule file
    error : RegexError,
  },

  #[error("the combined automaton is too large: {0}")]
  Automaton(RegexError),

  #[error("no patterns were declared")]
  NoPatterns,
}

impl ToDiagnostic for GenerateError {
  fn to_diagnostic<F: Copy>(&self, file: F) -> Diagnostic<F> {
    match self {
      GenerateError::Rule(error) => error.to_diagnostic(file),

      GenerateError::Regex { span, error, .. } => {
        let label = Label::primary(file, *span).with_message(error.to_message());
        Diagnostic::error().with_message(self.to_string()).with_labels(vec![label])
      }

      GenerateError::Automaton(_) => Diagnostic::error().with_message(self.to_string()),

      GenerateError::NoPatterns => {
        Diagnostic::error()
            .with_message(self.to_string())
            .with_notes(vec!["declare at least one rule of the form `NAME : regex$`".to_string()])
      }
    }
  }
}


/// Everything the runtime scanner needs.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LexerTables {
  pub table    : StateTable,
  pub keywords : BTreeMap<String, String>, //< literal text -> override tag
  pub ignore   : BTreeSet<String>,         //< tags whose tokens are dropped
}

impl LexerTables {
  pub fn new(table: StateTable) -> Self {
    LexerTables {
      table,
      keywords: BTreeMap::new(),
      ignore: BTreeSet::new(),
    }
  }

  pub fn scanner(&self) -> Scanner<'_> {
    Scanner::new(self)
  }

  pub fn tokenize<'a>(&'a self, input: &'a str) -> Result<Vec<Token<'a>>, ScanError> {
    self.scanner().tokenize(input)
  }
}


#[derive(Clone, Debug)]
pub struct Generator {
  tables    : LexerTables,
  user_code : BTreeMap<String, String>, //< tag -> opaque code
}

impl Generator {
  /// Reads the rule file `source` and compiles it.
  pub fn new(source: &str) -> Result<Generator, GenerateError> {
    let rules = parse_rules(source)?;
    Generator::from_declarations(rules)
  }

  /// Compiles already-read declarations. `End` declarations are ignored.
  pub fn from_declarations<I>(rules: I) -> Result<Generator, GenerateError>
    where I: IntoIterator<Item = RuleDeclaration>
  {
    let mut combined: Option<Fragment> = None;
    let mut keywords = BTreeMap::new();
    let mut ignore = BTreeSet::new();
    let mut user_code = BTreeMap::new();
    let mut next_priority: Priority = 0;

    for rule in rules {
      match rule.kind {
        RuleKind::Pattern { tag, body, body_span } => {
          info!("Read RE {} -- {}", tag, body);

          let mut fragment = automaton::compile(&body).map_err(|error| {
            let span = regex_error_span(&body, body_span, error.idx());
            GenerateError::Regex { tag: tag.clone(), span, error }
          })?;
          automaton::stamp_tag(&mut fragment, &tag, next_priority);
          next_priority += 1;

          combined = Some(
            match combined {
              None => fragment,
              Some(previous) => automaton::union(previous, fragment),
            }
          );
        }

        RuleKind::Keywords { entries } => {
          info!("Read KEYWORDS {}", entries.len());
          for (word, tag) in entries {
            keywords.insert(word, tag);
          }
        }

        RuleKind::Ignore { tags } => {
          info!("Read IGNORE {}", tags.join(", "));
          ignore.extend(tags);
        }

        RuleKind::UserCode { tag, body } => {
          info!("Read USER_DEF {}", tag);
          user_code.insert(tag, body);
        }

        RuleKind::End => {}
      }
    }

    let combined = combined.ok_or(GenerateError::NoPatterns)?;
    debug!("combined automaton: {} NFA states from {} patterns", combined.len(), next_priority);
    let table = automaton::compile_dfa(&combined).map_err(GenerateError::Automaton)?;

    Ok(Generator {
      tables: LexerTables { table, keywords, ignore },
      user_code,
    })
  }

  pub fn tables(&self) -> &LexerTables {
    &self.tables
  }

  pub fn into_tables(self) -> LexerTables {
    self.tables
  }

  pub fn table(&self) -> &StateTable {
    &self.tables.table
  }

  pub fn keywords(&self) -> &BTreeMap<String, String> {
    &self.tables.keywords
  }

  pub fn ignore(&self) -> &BTreeSet<String> {
    &self.tables.ignore
  }

  pub fn user_code(&self) -> &BTreeMap<String, String> {
    &self.user_code
  }

  pub fn scanner(&self) -> Scanner<'_> {
    self.tables.scanner()
  }

  pub fn tokenize<'a>(&'a self, input: &'a str) -> Result<Vec<Token<'a>>, ScanError> {
    self.tables.tokenize(input)
  }

  /// Generated source: `template` followed by the compiled tables.
  pub fn emit(&self, template: &str) -> String {
    codegen::emit(&self.tables, &self.user_code, template)
  }
}


/**
Maps a byte position in an unescaped pattern body back into the rule file. Every `$` in the body
was written `\$`, one byte longer.
*/
fn regex_error_span(body: &str, body_span: Span, idx: u32) -> Span {
  let idx = (idx as usize).min(body.len());
  let escapes = body.as_bytes()[..idx].iter().filter(|&&b| b == b'$').count();
  let start = (body_span.start().to_usize() + idx + escapes) as u32;
  let width = body[idx..].chars().next().map_or(0, char::len_utf8) as u32;
  let end = (start + width).min(body_span.end().to_usize() as u32);

  Span::new(start.min(end), end)
}
