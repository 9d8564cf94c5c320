/*!
The compiled automaton.

State identifiers are contiguous, `0..len()`. Each state owns a sorted slice of disjoint character
range edges, so a transition is a binary search. A state accepts when it carries a tag; the empty
tag marks a state that accepts without naming a rule, in which case the scanner keeps whichever
tag was already active.
*/

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use thiserror::Error;

use crate::automaton::StateId;

/// `lo..=hi -> target`
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Edge {
  pub lo     : char,
  pub hi     : char,
  pub target : StateId,
}

impl Edge {
  pub fn new(lo: char, hi: char, target: StateId) -> Self {
    Edge { lo, hi, target }
  }

  pub fn contains(&self, c: char) -> bool {
    self.lo <= c && c <= self.hi
  }
}


#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum TableError {
  #[error("a state table needs at least one state")]
  Empty,
  #[error("entry state {entry} is out of range for {len} states")]
  EntryOutOfRange { entry: StateId, len: usize },
  #[error("state {state} has an edge to state {target}, but there are only {len} states")]
  TargetOutOfRange { state: StateId, target: StateId, len: usize },
  #[error("state {state} has an edge with an empty range {lo:?}..={hi:?}")]
  InvalidRange { state: StateId, lo: char, hi: char },
  #[error("edges of state {state} are unsorted or overlap")]
  UnorderedEdges { state: StateId },
  #[error("accepting state {state} is out of range for {len} states")]
  AcceptingOutOfRange { state: StateId, len: usize },
}


#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StateTable {
  entry       : StateId,
  transitions : Vec<Box<[Edge]>>,   //< indexed by state
  accepting   : Vec<Option<String>>, //< indexed by state
}

impl StateTable {
  /**
  Builds a table from its parts, checking that the entry, every edge target and every accepting
  state are valid state ids, and that the edges of each state are sorted and disjoint. A repeated
  accepting state keeps the last tag given for it.
  */
  pub fn new<I>(entry: StateId, transitions: Vec<Vec<Edge>>, accepting_tags: I)
    -> Result<StateTable, TableError>
    where I: IntoIterator<Item = (StateId, String)>
  {
    let len = transitions.len();
    if len == 0 {
      return Err(TableError::Empty);
    }
    if entry as usize >= len {
      return Err(TableError::EntryOutOfRange { entry, len });
    }

    for (state, edges) in transitions.iter().enumerate() {
      let state = state as StateId;
      for edge in edges {
        if edge.lo > edge.hi {
          return Err(TableError::InvalidRange { state, lo: edge.lo, hi: edge.hi });
        }
        if edge.target as usize >= len {
          return Err(TableError::TargetOutOfRange { state, target: edge.target, len });
        }
      }
      if edges.windows(2).any(|pair| pair[0].hi >= pair[1].lo) {
        return Err(TableError::UnorderedEdges { state });
      }
    }

    let mut accepting = vec![None; len];
    for (state, tag) in accepting_tags {
      let slot = accepting
          .get_mut(state as usize)
          .ok_or(TableError::AcceptingOutOfRange { state, len })?;
      *slot = Some(tag);
    }

    Ok(StateTable {
      entry,
      transitions: transitions.into_iter().map(Vec::into_boxed_slice).collect(),
      accepting,
    })
  }

  /// Assembles a table the automaton compiler has already shaped correctly.
  pub(crate) fn from_parts(
    entry: StateId,
    transitions: Vec<Box<[Edge]>>,
    accepting: Vec<Option<String>>,
  ) -> StateTable {
    debug_assert_eq!(transitions.len(), accepting.len());
    StateTable { entry, transitions, accepting }
  }

  pub fn entry(&self) -> StateId {
    self.entry
  }

  /// Number of states.
  pub fn len(&self) -> usize {
    self.transitions.len()
  }

  pub fn is_empty(&self) -> bool {
    self.transitions.is_empty()
  }

  pub fn edges(&self, state: StateId) -> &[Edge] {
    self.transitions.get(state as usize).map(|edges| &edges[..]).unwrap_or(&[])
  }

  /// The successor of `state` on `c`, if any.
  pub fn next_state(&self, state: StateId, c: char) -> Option<StateId> {
    let edges = self.edges(state);
    edges
        .binary_search_by(|edge| {
          if edge.hi < c {
            Ordering::Less
          } else if edge.lo > c {
            Ordering::Greater
          } else {
            Ordering::Equal
          }
        })
        .ok()
        .map(|idx| edges[idx].target)
  }

  /// The tag of `state` if it accepts. May be the empty tag.
  pub fn accepting_tag(&self, state: StateId) -> Option<&str> {
    self.accepting.get(state as usize).and_then(|tag| tag.as_deref())
  }

  pub fn is_accepting(&self, state: StateId) -> bool {
    self.accepting_tag(state).is_some()
  }

  /// Every accepting state with its tag, ordered by state id.
  pub fn accepting_tags(&self) -> impl Iterator<Item = (StateId, &str)> + '_ {
    self.accepting
        .iter()
        .enumerate()
        .filter_map(|(state, tag)| tag.as_deref().map(|tag| (state as StateId, tag)))
  }
}

impl Display for StateTable {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    writeln!(f, "entry: {}", self.entry)?;
    for (state, edges) in self.transitions.iter().enumerate() {
      write!(f, "state {}", state)?;
      match self.accepting_tag(state as StateId) {
        Some("") => write!(f, " accepts")?,
        Some(tag) => write!(f, " accepts {}", tag)?,
        None => {}
      }
      writeln!(f)?;

      for edge in edges.iter() {
        if edge.lo == edge.hi {
          writeln!(f, "  {:?} -> {}", edge.lo, edge.target)?;
        } else {
          writeln!(f, "  {:?}..={:?} -> {}", edge.lo, edge.hi, edge.target)?;
        }
      }
    }
    Ok(())
  }
}


#[cfg(test)]
mod test {
  use super::*;

  fn two_states() -> StateTable {
    StateTable::new(
      0,
      vec![vec![Edge::new('0', '9', 1), Edge::new('a', 'z', 1)], vec![Edge::new('0', '9', 1)]],
      vec![(1, "NUM".to_string())],
    ).unwrap()
  }

  #[test]
  fn lookup() {
    let table = two_states();
    assert_eq!(table.next_state(0, '5'), Some(1));
    assert_eq!(table.next_state(0, 'q'), Some(1));
    assert_eq!(table.next_state(0, '_'), None);
    assert_eq!(table.next_state(1, 'a'), None);
    assert_eq!(table.accepting_tag(1), Some("NUM"));
    assert_eq!(table.accepting_tag(0), None);
    assert!(table.is_accepting(1) && !table.is_accepting(0));
    assert!(table.edges(0)[1].contains('q'));
    assert!(table.edges(7).is_empty());
    assert_eq!(table.accepting_tags().collect::<Vec<_>>(), vec![(1, "NUM")]);
  }

  #[test]
  fn rejects_bad_entry() {
    let error = StateTable::new(2, vec![vec![], vec![]], vec![]).unwrap_err();
    assert_eq!(error, TableError::EntryOutOfRange { entry: 2, len: 2 });
    assert_eq!(StateTable::new(0, vec![], vec![]).unwrap_err(), TableError::Empty);
  }

  #[test]
  fn rejects_bad_target() {
    let error = StateTable::new(0, vec![vec![Edge::new('a', 'a', 5)]], vec![]).unwrap_err();
    assert_eq!(error, TableError::TargetOutOfRange { state: 0, target: 5, len: 1 });
  }

  #[test]
  fn rejects_overlapping_edges() {
    let edges = vec![Edge::new('a', 'm', 0), Edge::new('k', 'z', 0)];
    let error = StateTable::new(0, vec![edges], vec![]).unwrap_err();
    assert_eq!(error, TableError::UnorderedEdges { state: 0 });
  }

  #[test]
  fn rejects_inverted_range() {
    let error = StateTable::new(0, vec![vec![Edge::new('z', 'a', 0)]], vec![]).unwrap_err();
    assert_eq!(error, TableError::InvalidRange { state: 0, lo: 'z', hi: 'a' });
  }

  #[test]
  fn rejects_bad_accepting_state() {
    let error = StateTable::new(0, vec![vec![]], vec![(3, "X".to_string())]).unwrap_err();
    assert_eq!(error, TableError::AcceptingOutOfRange { state: 3, len: 1 });
  }

  #[test]
  fn display() {
    let expected = "entry: 0\nstate 0\n  '0'..='9' -> 1\n  'a'..='z' -> 1\nstate 1 accepts NUM\n  '0'..='9' -> 1\n";
    assert_eq!(two_states().to_string(), expected);
  }

  #[test]
  fn shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<StateTable>();
  }
}
