/*!
Turns compiled tables into Rust source, and reads that source back.

`emit` writes the state table, the keyword and ignore tables and the user code as statics, after a
caller-supplied template that is expected to define `Lexer::with_entry`. `reload` recovers the
scanner tables from such text; scanning with them gives the same tokens as scanning with the
tables they were emitted from.
*/

mod emit;
mod reload;

pub use emit::{char_literal, emit, escape_into, string_literal, HEADER};
pub use reload::{reload, ReloadError};
