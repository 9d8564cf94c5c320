/*!

Reads an hlex rule file and produces the ordered sequence of rule declarations it contains.

A rule file is a list of statements, each terminated by `$`:

```text
# comments run to the end of the line
IDENT : [a-zA-Z_][a-zA-Z0-9_]*$
NUM   : [0-9]+$
WS    : [ \t\n]+$
[keywords] { IF:if, ELSE:else }$
[ignore]   { WS }$
[user_def, IDENT] { *pos += 1; }$
```

The reader is a hand-written recursive descent parser over a located span, so every
declaration and every error knows where in the file it came from.

*/

mod declaration;
mod error;
mod parser;

pub use declaration::{RuleDeclaration, RuleKind};
pub use error::{
  ExpectedFoundError,
  InvalidLabelError,
  MissingError,
  RuleError,
  ToDiagnostic,
  UnexpectedError,
  UnterminatedError,
};
pub use parser::{parse_rules, RuleScanner, Span, ToSpan};
