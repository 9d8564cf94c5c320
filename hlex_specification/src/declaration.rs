/*!
Representations of the statements that can appear in a rule file.
*/

use std::fmt::{Display, Formatter};

use crate::parser::{Span, ToSpan};

/// The payload of one statement of the rule file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RuleKind {
  /// `NAME : regex$`
  Pattern {
    tag       : String, //< the name stamped on tokens this pattern recognizes
    body      : String, //< regex source, `\$` already unescaped
    body_span : Span,   //< where the regex source sits in the rule file
  },
  /// `[keywords] { NAME:word, ... }$`, stored as `(word, NAME)` pairs in declaration order.
  Keywords {
    entries: Vec<(String, String)>,
  },
  /// `[ignore] { NAME, ... }$`
  Ignore {
    tags: Vec<String>,
  },
  /// `[user_def, NAME] code$`. The code is never interpreted.
  UserCode {
    tag  : String,
    body : String,
  },
  /// End of input. Never materialized into a rule list.
  End,
}

/// One parsed statement together with its location in the rule file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RuleDeclaration {
  pub kind : RuleKind,
  pub span : Span,
}

impl RuleDeclaration {
  pub fn new<S: ToSpan>(kind: RuleKind, span: S) -> Self {
    RuleDeclaration {
      kind,
      span: span.to_span(),
    }
  }

  pub fn is_end(&self) -> bool {
    self.kind == RuleKind::End
  }

  /// The tag named by a pattern or user code declaration.
  pub fn tag(&self) -> Option<&str> {
    match &self.kind {
      | RuleKind::Pattern { tag, .. }
      | RuleKind::UserCode { tag, .. } => Some(tag),

      | RuleKind::Keywords { .. }
      | RuleKind::Ignore { .. }
      | RuleKind::End => None,
    }
  }
}

impl ToSpan for RuleDeclaration {
  fn to_span(&self) -> Span {
    self.span
  }
}

impl Display for RuleKind {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      RuleKind::Pattern { tag, body, .. } => write!(f, "Pattern({} -- {})", tag, body),
      RuleKind::Keywords { entries } => {
        let pairs: Vec<String> =
            entries.iter().map(|(word, tag)| format!("{}:{}", tag, word)).collect();
        write!(f, "Keywords{{ {} }}", pairs.join(", "))
      }
      RuleKind::Ignore { tags } => write!(f, "Ignore{{ {} }}", tags.join(", ")),
      RuleKind::UserCode { tag, .. } => write!(f, "UserCode({})", tag),
      RuleKind::End => write!(f, "End"),
    }
  }
}

impl Display for RuleDeclaration {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{} at {}", self.kind, self.span)
  }
}
