/*!
The automaton compiler: regex source to NFA fragments, and fragments to a minimal deterministic
`StateTable`.

```
use hlex::automaton::{compile, compile_dfa, union};

let mut number = compile("[0-9]+").unwrap();
number.stamp_tag("NUM", 0);
let mut name = compile("[a-z]+").unwrap();
name.stamp_tag("NAME", 1);

let table = compile_dfa(&union(number, name)).unwrap();
let state = table.next_state(table.entry(), '7').unwrap();
assert_eq!(table.accepting_tag(state), Some("NUM"));
```
*/

mod chars;
mod compiler;
pub mod error;
pub mod limits;
mod nfa;
mod parser;

// We alias types to enforce size restrictions on their values.
pub type StateId  = u32; //< Index of a state in a fragment or table
pub type Priority = u32; //< Declaration order of a rule; lower wins
pub type Index32  = u32; //< A byte index into the regex string

pub use chars::CharSet;
pub use compiler::compile_dfa;
pub use error::RegexError;
pub use nfa::{Accept, Fragment, NfaState};

use parser::Parser;

/// Compiles one regex into a fragment with a single, untagged accepting state.
pub fn compile(regex: &str) -> Result<Fragment, RegexError> {
  let node = Parser::new(regex).parse()?;
  Fragment::from_node(&node)
}

/// A fragment accepting whatever either operand accepts.
pub fn union(a: Fragment, b: Fragment) -> Fragment {
  a.union(b)
}

/// Stamps `tag` on every accepting state of `fragment`. Lower priorities win when accepting states
/// merge during `compile_dfa`.
pub fn stamp_tag(fragment: &mut Fragment, tag: &str, priority: Priority) {
  fragment.stamp_tag(tag, priority);
}
