/*!
Parses regex source into a `Node` tree.

```text
alternation := concat ('|' concat)*
concat      := repeat+
repeat      := atom ('*' | '+' | '?' | '{' m '}' | '{' m ',' '}' | '{' m ',' n '}')*
atom        := '(' alternation ')' | '[' class ']' | '.' | '\' escape | literal
```

Positions reported in errors are byte offsets into the regex source.
*/

use super::chars::CharSet;
use super::error::RegexError;
use super::limits::{MAX_DEPTH, MAX_INDEX, MAX_REPEAT};
use super::Index32;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Node {
  /// Any one character of the set.
  Set(CharSet),
  Concat(Vec<Node>),
  Alternate(Vec<Node>),
  /// `node{min,max}`; `max == None` is unbounded.
  Repeat {
    node : Box<Node>,
    min  : u32,
    max  : Option<u32>,
    at   : Index32, //< position of the quantifier
  },
}


pub struct Parser<'a> {
  regex   : &'a str,
  chars   : Vec<(Index32, char)>, //< `regex` decoded, with byte positions
  idx     : usize,                //< Cursor into `self.chars`
  depth   : u32,                  //< Groups currently open
  stacked : u32,                  //< Quantifiers applied to a quantified node so far
}

impl<'a> Parser<'a> {

  pub fn new(regex: &'a str) -> Parser<'a> {
    Parser {
      regex,
      chars: regex.char_indices().map(|(i, c)| (i as Index32, c)).collect(),
      idx: 0,
      depth: 0,
      stacked: 0,
    }
  }

  pub fn parse(mut self) -> Result<Node, RegexError> {
    if self.regex.len() as u64 > MAX_INDEX as u64 {
      return Err(RegexError::ExceedsLimits(0));
    }
    if self.regex.is_empty() {
      return Err(RegexError::EmptyExpression(0));
    }

    let node = self.parse_alternation()?;
    match self.c() {
      None => Ok(node),
      // The only thing that stops an alternation early is a `)` with no `(`.
      Some(_) => Err(RegexError::MismatchedParens(self.pos())),
    }
  }

  // region Inlined Methods

  /// The current character, or `None` at the end of the regex.
  #[must_use]
  fn c(&self) -> Option<char> {
    self.chars.get(self.idx).map(|&(_, c)| c)
  }

  /// The character after the current one.
  #[must_use]
  fn peek(&self) -> Option<char> {
    self.chars.get(self.idx + 1).map(|&(_, c)| c)
  }

  /// Same as `c()` but post-increments the cursor.
  fn ci(&mut self) -> Option<char> {
    let c = self.c();
    if c.is_some() {
      self.idx += 1;
    }
    c
  }

  /// Byte position of the current character, or the length of the regex at the end.
  #[must_use]
  fn pos(&self) -> Index32 {
    self.chars.get(self.idx).map_or(self.regex.len() as Index32, |&(i, _)| i)
  }

  // endregion

  fn parse_alternation(&mut self) -> Result<Node, RegexError> {
    let mut branches = vec![self.parse_concat()?];

    while self.c() == Some('|') {
      self.idx += 1;
      branches.push(self.parse_concat()?);
    }

    Ok(
      if branches.len() == 1 {
        branches.remove(0)
      } else {
        Node::Alternate(branches)
      }
    )
  }

  fn parse_concat(&mut self) -> Result<Node, RegexError> {
    let mut items = Vec::new();

    loop {
      match self.c() {
        None | Some('|') | Some(')') => break,
        Some(_) => items.push(self.parse_repeat()?),
      }
    }

    match items.len() {
      0 => Err(RegexError::EmptyExpression(self.pos())),
      1 => Ok(items.remove(0)),
      _ => Ok(Node::Concat(items)),
    }
  }

  fn parse_repeat(&mut self) -> Result<Node, RegexError> {
    let mut node = self.parse_atom()?;
    let mut quantified = false;

    loop {
      let at = self.pos();
      let (min, max) =
          match self.c() {
            Some('*') => { self.idx += 1; (0, None)    }
            Some('+') => { self.idx += 1; (1, None)    }
            Some('?') => { self.idx += 1; (0, Some(1)) }
            Some('{') => self.parse_bounds()?,
            _ => break,
          };
      if quantified {
        self.stacked += 1;
        if self.stacked > MAX_DEPTH {
          return Err(RegexError::ExceedsLimits(at));
        }
      }
      quantified = true;
      node = Node::Repeat { node: Box::new(node), min, max, at };
    }

    Ok(node)
  }

  /// Parses `{m}`, `{m,}` or `{m,n}` with the cursor on the `{`.
  fn parse_bounds(&mut self) -> Result<(u32, Option<u32>), RegexError> {
    let open = self.pos();
    self.idx += 1;

    let min = self.parse_count(open)?.ok_or(RegexError::InvalidRepeat(open))?;
    let max =
        match self.ci() {
          Some('}') => return Ok((min, Some(min))),
          Some(',') => self.parse_count(open)?,
          Some(_) => return Err(RegexError::InvalidRepeat(open)),
          None => return Err(RegexError::MismatchedBraces(open)),
        };

    match self.ci() {
      Some('}') => {}
      Some(_) => return Err(RegexError::InvalidRepeat(open)),
      None => return Err(RegexError::MismatchedBraces(open)),
    }

    match max {
      Some(max) if max < min => Err(RegexError::InvalidRepeat(open)),
      _ => Ok((min, max)),
    }
  }

  /// A decimal count no larger than `MAX_REPEAT`, or `None` if there are no digits.
  fn parse_count(&mut self, open: Index32) -> Result<Option<u32>, RegexError> {
    let mut count: Option<u32> = None;

    while let Some(digit) = self.c().and_then(|c| c.to_digit(10)) {
      self.idx += 1;
      let value = count.unwrap_or(0).saturating_mul(10).saturating_add(digit);
      if value > MAX_REPEAT {
        return Err(RegexError::ExceedsLimits(open));
      }
      count = Some(value);
    }

    Ok(count)
  }

  fn parse_atom(&mut self) -> Result<Node, RegexError> {
    let at = self.pos();

    match self.c() {
      Some('(') => {
        self.idx += 1;
        if self.c() == Some(')') {
          return Err(RegexError::EmptyExpression(self.pos()));
        }
        self.depth += 1;
        if self.depth > MAX_DEPTH {
          return Err(RegexError::ExceedsLimits(at));
        }
        let inner = self.parse_alternation()?;
        self.depth -= 1;
        match self.ci() {
          Some(')') => Ok(inner),
          _ => Err(RegexError::MismatchedParens(at)),
        }
      }

      Some('[') => self.parse_class().map(Node::Set),

      Some(']') => Err(RegexError::MismatchedBrackets(at)),

      Some('}') => Err(RegexError::MismatchedBraces(at)),

      Some('*') | Some('+') | Some('?') | Some('{') => Err(RegexError::InvalidSyntax(at)),

      Some('.') => {
        self.idx += 1;
        Ok(Node::Set(CharSet::dot()))
      }

      Some('\\') => self.parse_escape().map(Node::Set),

      Some(c) => {
        self.idx += 1;
        Ok(Node::Set(CharSet::from_char(c)))
      }

      // `parse_concat` never asks for an atom at the end of the regex.
      None => Err(RegexError::EmptyExpression(at)),
    }
  }

  /// Parses an escape with the cursor on the `\`.
  fn parse_escape(&mut self) -> Result<CharSet, RegexError> {
    let at = self.pos();
    self.idx += 1;

    let c = self.ci().ok_or(RegexError::InvalidEscape(at))?;
    let set =
        match c {
          'n' => CharSet::from_char('\n'),
          't' => CharSet::from_char('\t'),
          'r' => CharSet::from_char('\r'),
          'f' => CharSet::from_char('\x0C'),
          'v' => CharSet::from_char('\x0B'),
          '0' => CharSet::from_char('\0'),
          'x' => CharSet::from_char(self.parse_hex_pair(at)?),
          'u' => CharSet::from_char(self.parse_unicode(at)?),
          'd' => CharSet::digit(),
          'D' => CharSet::digit().negate(),
          'w' => CharSet::word(),
          'W' => CharSet::word().negate(),
          's' => CharSet::space(),
          'S' => CharSet::space().negate(),
          c if c.is_alphanumeric() => return Err(RegexError::InvalidEscape(at)),
          c => CharSet::from_char(c),
        };

    Ok(set)
  }

  /// `\xHH`, exactly two hex digits.
  fn parse_hex_pair(&mut self, at: Index32) -> Result<char, RegexError> {
    let mut value = 0;
    for _ in 0..2 {
      let digit = self.ci().and_then(|c| c.to_digit(16)).ok_or(RegexError::InvalidEscape(at))?;
      value = value * 16 + digit;
    }
    char::from_u32(value).ok_or(RegexError::InvalidEscape(at))
  }

  /// `\u{H..}`, one to six hex digits naming a scalar value.
  fn parse_unicode(&mut self, at: Index32) -> Result<char, RegexError> {
    if self.ci() != Some('{') {
      return Err(RegexError::InvalidEscape(at));
    }

    let mut value: u32 = 0;
    let mut digits = 0;
    loop {
      match self.ci() {
        Some('}') if digits > 0 => break,
        Some(c) if digits < 6 && c.is_ascii_hexdigit() => {
          value = value * 16 + c.to_digit(16).unwrap_or(0);
          digits += 1;
        }
        _ => return Err(RegexError::InvalidEscape(at)),
      }
    }

    char::from_u32(value).ok_or(RegexError::InvalidEscape(at))
  }

  /// Parses a bracket class with the cursor on the `[`.
  fn parse_class(&mut self) -> Result<CharSet, RegexError> {
    let open = self.pos();
    self.idx += 1;

    let negated = self.c() == Some('^');
    if negated {
      self.idx += 1;
    }

    let mut set = CharSet::new();
    let mut first = true;

    loop {
      let at = self.pos();
      match self.c() {
        None => return Err(RegexError::MismatchedBrackets(open)),
        Some(']') if !first => {
          self.idx += 1;
          break;
        }
        Some(_) => {}
      }
      first = false;

      let lo = self.parse_class_atom()?;
      let is_range = self.c() == Some('-') && !matches!(self.peek(), None | Some(']'));

      match lo {
        ClassAtom::Char(lo) if is_range => {
          self.idx += 1;
          match self.parse_class_atom()? {
            ClassAtom::Char(hi) if lo <= hi => set.add_range(lo, hi),
            _ => return Err(RegexError::InvalidClassRange(at)),
          }
        }
        ClassAtom::Char(c) => set.add_char(c),
        ClassAtom::Set(class) => set.add_set(&class),
      }
    }

    if negated {
      set = set.negate();
    }
    if set.is_empty() {
      return Err(RegexError::EmptyClass(open));
    }
    Ok(set)
  }

  fn parse_class_atom(&mut self) -> Result<ClassAtom, RegexError> {
    match self.c() {
      Some('\\') => {
        let set = self.parse_escape()?;
        match set.ranges() {
          [(lo, hi)] if lo == hi => Ok(ClassAtom::Char(*lo)),
          _ => Ok(ClassAtom::Set(set)),
        }
      }
      Some(c) => {
        self.idx += 1;
        Ok(ClassAtom::Char(c))
      }
      None => Err(RegexError::MismatchedBrackets(self.pos())),
    }
  }
}

enum ClassAtom {
  Char(char),
  Set(CharSet),
}


#[cfg(test)]
mod test {
  use super::*;

  fn parse(regex: &str) -> Result<Node, RegexError> {
    Parser::new(regex).parse()
  }

  fn lit(c: char) -> Node {
    Node::Set(CharSet::from_char(c))
  }

  #[test]
  fn literals_concatenate() {
    assert_eq!(parse("ab").unwrap(), Node::Concat(vec![lit('a'), lit('b')]));
    assert_eq!(parse("a").unwrap(), lit('a'));
  }

  #[test]
  fn alternation_binds_loosest() {
    assert_eq!(
      parse("ab|c").unwrap(),
      Node::Alternate(vec![Node::Concat(vec![lit('a'), lit('b')]), lit('c')])
    );
  }

  #[test]
  fn quantifiers() {
    assert_eq!(
      parse("a*").unwrap(),
      Node::Repeat { node: Box::new(lit('a')), min: 0, max: None, at: 1 }
    );
    assert_eq!(
      parse("a{2,5}").unwrap(),
      Node::Repeat { node: Box::new(lit('a')), min: 2, max: Some(5), at: 1 }
    );
    assert_eq!(
      parse("a{3}").unwrap(),
      Node::Repeat { node: Box::new(lit('a')), min: 3, max: Some(3), at: 1 }
    );
    assert_eq!(
      parse("a{3,}").unwrap(),
      Node::Repeat { node: Box::new(lit('a')), min: 3, max: None, at: 1 }
    );
  }

  #[test]
  fn classes() {
    let expected = CharSet::from_ranges(&[('-', '-'), ('0', '9'), ('a', 'f')]);
    assert_eq!(parse("[a-f0-9-]").unwrap(), Node::Set(expected));
    assert_eq!(parse("[]]").unwrap(), lit(']'));
    assert_eq!(parse("[^\\n]").unwrap(), Node::Set(CharSet::dot()));
    assert_eq!(parse("[\\d_]").unwrap(), Node::Set(CharSet::from_ranges(&[('0', '9'), ('_', '_')])));
  }

  #[test]
  fn escapes() {
    assert_eq!(parse("\\.").unwrap(), lit('.'));
    assert_eq!(parse("\\x41").unwrap(), lit('A'));
    assert_eq!(parse("\\u{3bb}").unwrap(), lit('λ'));
    assert_eq!(parse("\\t").unwrap(), lit('\t'));
    assert_eq!(parse("\\q"), Err(RegexError::InvalidEscape(0)));
    assert_eq!(parse("a\\"), Err(RegexError::InvalidEscape(1)));
    assert_eq!(parse("\\u{110000}"), Err(RegexError::InvalidEscape(0)));
  }

  #[test]
  fn positions_are_byte_offsets() {
    assert_eq!(parse("λ)"), Err(RegexError::MismatchedParens(2)));
  }

  #[test]
  fn errors() {
    assert_eq!(parse(""), Err(RegexError::EmptyExpression(0)));
    assert_eq!(parse("a|"), Err(RegexError::EmptyExpression(2)));
    assert_eq!(parse("()"), Err(RegexError::EmptyExpression(1)));
    assert_eq!(parse("(a"), Err(RegexError::MismatchedParens(0)));
    assert_eq!(parse("a)"), Err(RegexError::MismatchedParens(1)));
    assert_eq!(parse("[a-"), Err(RegexError::MismatchedBrackets(0)));
    assert_eq!(parse("a]"), Err(RegexError::MismatchedBrackets(1)));
    assert_eq!(parse("[z-a]"), Err(RegexError::InvalidClassRange(1)));
    assert_eq!(parse("[^\\x00-\\u{10FFFF}]"), Err(RegexError::EmptyClass(0)));
    assert_eq!(parse("*a"), Err(RegexError::InvalidSyntax(0)));
    assert_eq!(parse("a{5,2}"), Err(RegexError::InvalidRepeat(1)));
    assert_eq!(parse("a{,2}"), Err(RegexError::InvalidRepeat(1)));
    assert_eq!(parse("a{2"), Err(RegexError::MismatchedBraces(1)));
    assert_eq!(parse("a}"), Err(RegexError::MismatchedBraces(1)));
    assert_eq!(parse("a{1001}"), Err(RegexError::ExceedsLimits(1)));
  }

  #[test]
  fn nesting_is_limited() {
    let depth = MAX_DEPTH as usize;
    let nested = |n: usize| format!("{}a{}", "(".repeat(n), ")".repeat(n));

    assert!(parse(&nested(depth)).is_ok());
    assert_eq!(parse(&nested(depth + 1)), Err(RegexError::ExceedsLimits(depth as Index32)));
    assert_eq!(parse(&nested(50_000)), Err(RegexError::ExceedsLimits(depth as Index32)));

    // The first quantifier is free; every further one on the same atom counts.
    let starred = format!("a{}", "*".repeat(depth + 1));
    assert!(parse(&starred).is_ok());
    let starred = format!("a{}", "*".repeat(depth + 2));
    assert_eq!(parse(&starred), Err(RegexError::ExceedsLimits(depth as Index32 + 2)));
  }
}
