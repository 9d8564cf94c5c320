/*!

A lex-style lexer generator.

A rule file names token patterns, keyword overrides, ignored tags and opaque user code. The
generator compiles every pattern into one minimal deterministic automaton, which can then either
tokenize text directly or be written out as Rust source.

```
use hlex::Generator;

let generator = Generator::new(
  "IDENT: [a-z]+$  NUM: [0-9]+$  WS: [ ]+$\n\
   [keywords] { LET: let }$\n\
   [ignore] { WS }$",
).unwrap();

let tokens: Vec<_> =
    generator.tokenize("let x 42").unwrap().iter().map(|t| (t.tag, t.text)).collect();
assert_eq!(tokens, vec![("LET", "let"), ("IDENT", "x"), ("NUM", "42")]);
```

*/

pub mod automaton;
pub mod codegen;
pub mod generator;
pub mod scanner;
pub mod table;

pub use generator::{GenerateError, Generator, LexerTables};
pub use hlex_specification::{RuleDeclaration, RuleError, RuleKind, ToDiagnostic};
pub use scanner::{ScanError, Scanner, Token, Tokens};
pub use table::{Edge, StateTable, TableError};
