/*!

  A `CharSet` is a subset of the Unicode scalar values, stored as a sorted list of disjoint,
  non-adjacent inclusive ranges. Sets are always kept normalized, so two sets are equal exactly when
  their range lists are equal.

  The surrogate block `U+D800..=U+DFFF` contains no `char`s. `'\u{D7FF}'` and `'\u{E000}'` are
  therefore adjacent, and a range spanning them contains no surrogates.

*/

use smallvec::SmallVec;

const SURROGATE_START: u32 = 0xD800;
const SURROGATE_END  : u32 = 0xDFFF;


// region Stepping Through Scalar Values

/// The scalar value immediately after `c`, if any.
pub fn next_char(c: char) -> Option<char> {
  match c as u32 {
    0xD7FF => Some('\u{E000}'),
    n => char::from_u32(n + 1),
  }
}

/// The scalar value immediately before `c`, if any.
pub fn prev_char(c: char) -> Option<char> {
  match c as u32 {
    0 => None,
    0xE000 => Some('\u{D7FF}'),
    n => char::from_u32(n - 1),
  }
}

/// The first `char` at or after the code point `n`.
pub fn char_at_or_after(n: u32) -> Option<char> {
  if (SURROGATE_START..=SURROGATE_END).contains(&n) {
    Some('\u{E000}')
  } else {
    char::from_u32(n)
  }
}

/// The last `char` at or before the code point `n`.
pub fn char_at_or_before(n: u32) -> Option<char> {
  if (SURROGATE_START..=SURROGATE_END).contains(&n) {
    Some('\u{D7FF}')
  } else {
    char::from_u32(n.min(char::MAX as u32))
  }
}

// endregion


type Ranges = SmallVec<[(char, char); 4]>;

#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct CharSet {
  ranges: Ranges,
}

impl CharSet {
  pub fn new() -> Self {
    CharSet::default()
  }

  pub fn from_char(c: char) -> Self {
    CharSet::from_range(c, c)
  }

  /// The set `lo..=hi`, empty if `lo > hi`.
  pub fn from_range(lo: char, hi: char) -> Self {
    let mut set = CharSet::new();
    set.add_range(lo, hi);
    set
  }

  pub fn from_ranges(ranges: &[(char, char)]) -> Self {
    let mut set = CharSet::new();
    for &(lo, hi) in ranges {
      set.add_range(lo, hi);
    }
    set
  }

  /// `.`: every scalar value except `\n`.
  pub fn dot() -> Self {
    CharSet::from_char('\n').negate()
  }

  /// `\d`
  pub fn digit() -> Self {
    CharSet::from_range('0', '9')
  }

  /// `\w`
  pub fn word() -> Self {
    CharSet::from_ranges(&[('0', '9'), ('A', 'Z'), ('_', '_'), ('a', 'z')])
  }

  /// `\s`: tab, newline, vertical tab, form feed, carriage return and space.
  pub fn space() -> Self {
    CharSet::from_ranges(&[('\t', '\r'), (' ', ' ')])
  }

  pub fn ranges(&self) -> &[(char, char)] {
    &self.ranges
  }

  pub fn is_empty(&self) -> bool {
    self.ranges.is_empty()
  }

  pub fn add_char(&mut self, c: char) {
    self.add_range(c, c);
  }

  pub fn add_range(&mut self, lo: char, hi: char) {
    if lo > hi {
      return;
    }
    self.ranges.push((lo, hi));
    self.normalize();
  }

  pub fn add_set(&mut self, other: &CharSet) {
    self.ranges.extend(other.ranges.iter().copied());
    self.normalize();
  }

  /// The complement of this set within all scalar values.
  pub fn negate(&self) -> CharSet {
    let mut result = CharSet::new();
    let mut next: Option<char> = Some('\0');

    for &(lo, hi) in self.ranges.iter() {
      if let Some(start) = next {
        if start < lo {
          if let Some(end) = prev_char(lo) {
            result.ranges.push((start, end));
          }
        }
      }
      next = next_char(hi);
    }

    if let Some(start) = next {
      result.ranges.push((start, char::MAX));
    }

    result
  }

  /// Sorts the ranges and merges overlapping or adjacent ones.
  fn normalize(&mut self) {
    self.ranges.sort_unstable();

    let mut merged: Ranges = SmallVec::with_capacity(self.ranges.len());
    for &(lo, hi) in self.ranges.iter() {
      match merged.last_mut() {
        Some((_, last_hi)) if next_char(*last_hi).map_or(true, |n| lo <= n) => {
          if hi > *last_hi {
            *last_hi = hi;
          }
        }
        _ => merged.push((lo, hi)),
      }
    }

    self.ranges = merged;
  }
}
