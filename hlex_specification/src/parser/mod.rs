mod parser;
mod span;
mod whitespace;

pub use parser::{parse_rules, RuleScanner};
pub use span::*;

pub type InputType<'a> = LSpan<'a>;
