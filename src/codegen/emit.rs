/*!
Renders compiled tables as Rust source.

The output is the template, then a header line, then a `tables` module holding every table as a
static, then a constructor for the template's `Lexer`. Maps and sets are written in key order, so
the same rules always produce the same text.
*/

use std::collections::BTreeMap;

use crate::generator::LexerTables;

/// First line of the generated part of the output.
pub const HEADER: &str = "// @generated by hlex. Do not edit.";

const INDENT: &str = "  ";


/// Appends `c` to `out` as it would appear inside a Rust char or string literal.
pub fn escape_into(out: &mut String, c: char) {
  match c {
    '\n' => out.push_str("\\n"),
    '\t' => out.push_str("\\t"),
    '\r' => out.push_str("\\r"),
    '\0' => out.push_str("\\0"),
    '\\' => out.push_str("\\\\"),
    '\'' => out.push_str("\\'"),
    '"'  => out.push_str("\\\""),
    c if c.is_control() => out.push_str(&format!("\\u{{{:x}}}", c as u32)),
    c => out.push(c),
  }
}

pub fn char_literal(c: char) -> String {
  let mut out = String::from("'");
  escape_into(&mut out, c);
  out.push('\'');
  out
}

pub fn string_literal(s: &str) -> String {
  let mut out = String::from("\"");
  for c in s.chars() {
    escape_into(&mut out, c);
  }
  out.push('"');
  out
}


pub fn emit(tables: &LexerTables, user_code: &BTreeMap<String, String>, template: &str) -> String {
  let table = &tables.table;
  let mut out = String::with_capacity(template.len() + 64 * table.len());

  out.push_str(template);
  out.push('\n');
  out.push_str(HEADER);
  out.push_str("\n\npub mod tables {\n");
  out.push_str(INDENT);
  out.push_str("#![allow(dead_code, unused_variables)]\n\n");

  // ENTRY
  out.push_str(&format!("{}pub const ENTRY: u32 = {};\n\n", INDENT, table.entry()));

  // ACCEPTING
  out.push_str(&format!("{}pub static ACCEPTING: &[(u32, &str)] = &[\n", INDENT));
  for (state, tag) in table.accepting_tags() {
    out.push_str(&format!("{0}{0}({1}, {2}),\n", INDENT, state, string_literal(tag)));
  }
  out.push_str(&format!("{}];\n\n", INDENT));

  // TRANSITIONS
  out.push_str(&format!("{}pub static TRANSITIONS: &[&[(char, char, u32)]] = &[\n", INDENT));
  for state in 0..table.len() as u32 {
    let edges: Vec<String> =
        table.edges(state)
             .iter()
             .map(|edge| {
               format!("({}, {}, {})", char_literal(edge.lo), char_literal(edge.hi), edge.target)
             })
             .collect();
    out.push_str(&format!("{0}{0}&[{1}],\n", INDENT, edges.join(", ")));
  }
  out.push_str(&format!("{}];\n\n", INDENT));

  // IGNORE
  out.push_str(&format!("{}pub static IGNORE: &[&str] = &[\n", INDENT));
  for tag in tables.ignore.iter() {
    out.push_str(&format!("{0}{0}{1},\n", INDENT, string_literal(tag)));
  }
  out.push_str(&format!("{}];\n\n", INDENT));

  // KEYWORDS
  out.push_str(&format!("{}pub static KEYWORDS: &[(&str, &str)] = &[\n", INDENT));
  for (word, tag) in tables.keywords.iter() {
    out.push_str(&format!("{0}{0}({1}, {2}),\n", INDENT, string_literal(word), string_literal(tag)));
  }
  out.push_str(&format!("{}];\n\n", INDENT));

  // USER_DEFS
  out.push_str(&format!("{}pub static USER_DEFS: &[(&str, fn(&str, &mut usize))] = &[\n", INDENT));
  for (tag, body) in user_code.iter() {
    out.push_str(&format!(
      "{0}{0}({1}, |s: &str, pos: &mut usize| {2}),\n",
      INDENT,
      string_literal(tag),
      body
    ));
  }
  out.push_str(&format!("{}];\n", INDENT));
  out.push_str("}\n\n");

  // Constructor
  out.push_str("impl<'a> Lexer<'a> {\n");
  out.push_str(&format!("{}pub fn new(content: &'a str) -> Self {{\n", INDENT));
  out.push_str(&format!("{0}{0}Lexer::with_entry(content, {1})\n", INDENT, table.entry()));
  out.push_str(&format!("{}}}\n", INDENT));
  out.push_str("}\n");

  out
}


#[cfg(test)]
mod test {
  use super::*;
  use crate::table::{Edge, StateTable};

  #[test]
  fn escapes() {
    assert_eq!(char_literal('\''), "'\\''");
    assert_eq!(char_literal('\n'), "'\\n'");
    assert_eq!(char_literal('\u{7f}'), "'\\u{7f}'");
    assert_eq!(char_literal('λ'), "'λ'");
    assert_eq!(string_literal("a\"b\\c\0"), "\"a\\\"b\\\\c\\0\"");
  }

  #[test]
  fn layout() {
    let table = StateTable::new(
      0,
      vec![vec![Edge::new('a', 'z', 1)], vec![Edge::new('a', 'z', 1)]],
      vec![(1, "ID".to_string())],
    ).unwrap();
    let mut tables = LexerTables::new(table);
    tables.keywords.insert("if".to_string(), "IF".to_string());
    tables.ignore.insert("WS".to_string());
    let mut user_code = BTreeMap::new();
    user_code.insert("ID".to_string(), "{ *pos += 1; }".to_string());

    let expected = "\
// template
// @generated by hlex. Do not edit.

pub mod tables {
  #![allow(dead_code, unused_variables)]

  pub const ENTRY: u32 = 0;

  pub static ACCEPTING: &[(u32, &str)] = &[
    (1, \"ID\"),
  ];

  pub static TRANSITIONS: &[&[(char, char, u32)]] = &[
    &[('a', 'z', 1)],
    &[('a', 'z', 1)],
  ];

  pub static IGNORE: &[&str] = &[
    \"WS\",
  ];

  pub static KEYWORDS: &[(&str, &str)] = &[
    (\"if\", \"IF\"),
  ];

  pub static USER_DEFS: &[(&str, fn(&str, &mut usize))] = &[
    (\"ID\", |s: &str, pos: &mut usize| { *pos += 1; }),
  ];
}

impl<'a> Lexer<'a> {
  pub fn new(content: &'a str) -> Self {
    Lexer::with_entry(content, 0)
  }
}
";
    assert_eq!(emit(&tables, &user_code, "// template"), expected);
  }
}
