/*!
Compiles an NFA fragment into a minimal `StateTable`.

  1. Subset construction over character ranges. The alphabet is every Unicode scalar value; the
     outgoing edges of a subset are computed on the elementary intervals cut out by the bounds of
     its members' edges.
  2. Trimming: edges into states from which no accepting state is reachable are dropped.
  3. Moore partition refinement, seeded by the resolved accepting tag.
  4. Breadth-first renumbering from the entry, so the entry is state 0.

A subset accepts when any member accepts. Its tag is the tag of the member with the lowest
priority, i.e. the rule declared first.
*/

use std::collections::{BTreeSet, HashMap};

use log::{debug, info};
use quanta::Clock;

use super::chars::{char_at_or_after, char_at_or_before, next_char};
use super::error::RegexError;
use super::limits::MAX_STATES;
use super::nfa::Fragment;
use super::{Priority, StateId};
use crate::table::{Edge, StateTable};

type DfaEdge = (char, char, usize);


/// A deterministic automaton under construction. State 0 is the entry.
#[derive(Debug, Default)]
struct Dfa {
  edges  : Vec<Vec<DfaEdge>>,
  accept : Vec<Option<(Priority, String)>>,
}

impl Dfa {
  fn len(&self) -> usize {
    self.edges.len()
  }

  fn tag(&self, state: usize) -> Option<&str> {
    self.accept[state].as_ref().map(|(_, tag)| tag.as_str())
  }
}


pub fn compile_dfa(fragment: &Fragment) -> Result<StateTable, RegexError> {
  let clock = Clock::new();
  let started = clock.now();

  let mut dfa = SubsetBuilder::new(fragment).build()?;
  debug!("subset construction: {} NFA states -> {} DFA states", fragment.len(), dfa.len());

  trim(&mut dfa);
  let (dfa, entry) = minimize(&dfa);
  debug!("minimization: {} DFA states", dfa.len());

  let table = renumber(&dfa, entry);

  let elapsed = clock.now().duration_since(started);
  info!("Compiled automaton with {} states in {}µs", table.len(), elapsed.as_micros());
  Ok(table)
}


/// Appends `lo..=hi -> target` to `edges`, merging it into the last edge when they are adjacent
/// and share a target. Ranges must arrive in increasing order.
fn push_coalesced(edges: &mut Vec<DfaEdge>, lo: char, hi: char, target: usize) {
  if let Some(last) = edges.last_mut() {
    if last.2 == target && next_char(last.1) == Some(lo) {
      last.1 = hi;
      return;
    }
  }
  edges.push((lo, hi, target));
}


struct SubsetBuilder<'f> {
  fragment : &'f Fragment,
  index    : HashMap<Vec<StateId>, usize>, //< subset -> DFA state
  subsets  : Vec<Vec<StateId>>,            //< DFA state -> subset
}

impl<'f> SubsetBuilder<'f> {
  fn new(fragment: &'f Fragment) -> Self {
    SubsetBuilder {
      fragment,
      index: HashMap::new(),
      subsets: Vec::new(),
    }
  }

  /// The epsilon closure of `seeds`, sorted.
  fn closure<I: IntoIterator<Item = StateId>>(&self, seeds: I) -> Vec<StateId> {
    let mut closed = BTreeSet::new();
    let mut stack: Vec<StateId> = seeds.into_iter().collect();

    while let Some(state) = stack.pop() {
      if closed.insert(state) {
        stack.extend(self.fragment.state(state).epsilons.iter().copied());
      }
    }

    closed.into_iter().collect()
  }

  fn intern(&mut self, subset: Vec<StateId>) -> Result<usize, RegexError> {
    if let Some(&id) = self.index.get(&subset) {
      return Ok(id);
    }
    if self.subsets.len() >= MAX_STATES {
      return Err(RegexError::ExceedsLimits(0));
    }

    let id = self.subsets.len();
    self.index.insert(subset.clone(), id);
    self.subsets.push(subset);
    Ok(id)
  }

  fn build(mut self) -> Result<Dfa, RegexError> {
    let mut dfa = Dfa::default();
    let entry = self.closure([self.fragment.start()]);
    self.intern(entry)?;

    let mut next = 0;
    while next < self.subsets.len() {
      let members = self.subsets[next].clone();

      let accept =
          members.iter()
                 .filter_map(|&state| self.fragment.state(state).accept.as_ref())
                 .min_by_key(|accept| accept.priority)
                 .map(|accept| (accept.priority, accept.tag.clone()));

      let edges: Vec<(char, char, StateId)> =
          members.iter()
                 .flat_map(|&state| self.fragment.state(state).edges.iter().copied())
                 .collect();

      let mut cuts: Vec<u32> =
          edges.iter().flat_map(|&(lo, hi, _)| [lo as u32, hi as u32 + 1]).collect();
      cuts.sort_unstable();
      cuts.dedup();

      let mut out: Vec<DfaEdge> = Vec::new();
      for window in cuts.windows(2) {
        let (lo, hi) =
            match (char_at_or_after(window[0]), char_at_or_before(window[1] - 1)) {
              (Some(lo), Some(hi)) if lo <= hi => (lo, hi),
              _ => continue,
            };

        let targets: Vec<StateId> =
            edges.iter()
                 .filter(|&&(edge_lo, edge_hi, _)| edge_lo <= lo && hi <= edge_hi)
                 .map(|&(_, _, target)| target)
                 .collect();
        if targets.is_empty() {
          continue;
        }

        let subset = self.closure(targets);
        let target = self.intern(subset)?;
        push_coalesced(&mut out, lo, hi, target);
      }

      dfa.edges.push(out);
      dfa.accept.push(accept);
      next += 1;
    }

    Ok(dfa)
  }
}


/// Drops every edge into a state from which no accepting state can be reached.
fn trim(dfa: &mut Dfa) {
  let n = dfa.len();
  let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
  for (state, edges) in dfa.edges.iter().enumerate() {
    for &(_, _, target) in edges {
      predecessors[target].push(state);
    }
  }

  let mut live = vec![false; n];
  let mut stack: Vec<usize> = (0..n).filter(|&state| dfa.accept[state].is_some()).collect();
  for &state in &stack {
    live[state] = true;
  }
  while let Some(state) = stack.pop() {
    for &predecessor in &predecessors[state] {
      if !live[predecessor] {
        live[predecessor] = true;
        stack.push(predecessor);
      }
    }
  }

  let dead = live.iter().filter(|&&is_live| !is_live).count();
  if dead > 0 {
    debug!("trimming {} dead states", dead);
    for edges in dfa.edges.iter_mut() {
      edges.retain(|&(_, _, target)| live[target]);
    }
  }
}


/// Merges equivalent states. Returns the minimized automaton and its entry state.
fn minimize(dfa: &Dfa) -> (Dfa, usize) {
  let n = dfa.len();

  let mut seeds: HashMap<Option<&str>, usize> = HashMap::new();
  let mut class: Vec<usize> = Vec::with_capacity(n);
  for state in 0..n {
    let len = seeds.len();
    class.push(*seeds.entry(dfa.tag(state)).or_insert(len));
  }
  let mut class_count = seeds.len();

  let signature = |state: usize, class: &[usize]| -> Vec<DfaEdge> {
    let mut edges = Vec::with_capacity(dfa.edges[state].len());
    for &(lo, hi, target) in &dfa.edges[state] {
      push_coalesced(&mut edges, lo, hi, class[target]);
    }
    edges
  };

  loop {
    let mut signatures: HashMap<(usize, Vec<DfaEdge>), usize> = HashMap::new();
    let mut refined = Vec::with_capacity(n);
    for state in 0..n {
      let len = signatures.len();
      let key = (class[state], signature(state, &class));
      refined.push(*signatures.entry(key).or_insert(len));
    }

    let stable = signatures.len() == class_count;
    class_count = signatures.len();
    class = refined;
    if stable {
      break;
    }
  }

  let mut representative: Vec<Option<usize>> = vec![None; class_count];
  for state in 0..n {
    representative[class[state]].get_or_insert(state);
  }

  let mut minimal = Dfa::default();
  for state in representative.into_iter().flatten() {
    minimal.edges.push(signature(state, &class));
    minimal.accept.push(dfa.accept[state].clone());
  }

  (minimal, class[0])
}


/// Numbers the states reachable from `entry` in breadth-first order.
fn renumber(dfa: &Dfa, entry: usize) -> StateTable {
  let mut ids: Vec<Option<StateId>> = vec![None; dfa.len()];
  let mut order = vec![entry];
  ids[entry] = Some(0);

  let mut next = 0;
  while next < order.len() {
    for &(_, _, target) in &dfa.edges[order[next]] {
      if ids[target].is_none() {
        ids[target] = Some(order.len() as StateId);
        order.push(target);
      }
    }
    next += 1;
  }

  let transitions: Vec<Box<[Edge]>> =
      order.iter()
           .map(|&state| {
             dfa.edges[state]
                .iter()
                .filter_map(|&(lo, hi, target)| ids[target].map(|id| Edge::new(lo, hi, id)))
                .collect()
           })
           .collect();

  let accepting: Vec<Option<String>> =
      order.iter().map(|&state| dfa.tag(state).map(str::to_string)).collect();

  StateTable::from_parts(0, transitions, accepting)
}


#[cfg(test)]
mod test {
  use super::*;
  use crate::automaton::{compile, union};

  fn tagged(regex: &str, tag: &str, priority: Priority) -> Fragment {
    let mut fragment = compile(regex).unwrap();
    fragment.stamp_tag(tag, priority);
    fragment
  }

  /// Runs the table over the whole of `input` and returns the tag of the final state.
  fn run<'t>(table: &'t StateTable, input: &str) -> Option<&'t str> {
    let mut state = table.entry();
    for c in input.chars() {
      state = table.next_state(state, c)?;
    }
    table.accepting_tag(state)
  }

  #[test]
  fn single_literal() {
    let table = compile_dfa(&tagged("ab", "AB", 0)).unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(run(&table, "ab"), Some("AB"));
    assert_eq!(run(&table, "a"), None);
    assert_eq!(run(&table, "abc"), None);
  }

  #[test]
  fn minimization_merges_equivalent_states() {
    // Both branches end in the same accepting state.
    let table = compile_dfa(&tagged("ac|bc", "X", 0)).unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(table.edges(0), &[Edge::new('a', 'b', 1)]);
  }

  #[test]
  fn adjacent_ranges_are_coalesced() {
    let table = compile_dfa(&tagged("[a-m]|[n-z]", "L", 0)).unwrap();
    assert_eq!(table.edges(0), &[Edge::new('a', 'z', 1)]);
  }

  #[test]
  fn first_declared_wins() {
    let ident_first = union(tagged("[a-z]+", "IDENT", 0), tagged("if", "IF", 1));
    let table = compile_dfa(&ident_first).unwrap();
    assert_eq!(run(&table, "if"), Some("IDENT"));
    assert_eq!(run(&table, "i"), Some("IDENT"));

    let if_first = union(tagged("if", "IF", 0), tagged("[a-z]+", "IDENT", 1));
    let table = compile_dfa(&if_first).unwrap();
    assert_eq!(run(&table, "if"), Some("IF"));
    assert_eq!(run(&table, "iff"), Some("IDENT"));
  }

  #[test]
  fn untagged_accepting_state_gets_empty_tag() {
    let table = compile_dfa(&compile("a").unwrap()).unwrap();
    assert_eq!(run(&table, "a"), Some(""));
  }

  #[test]
  fn entry_is_zero_and_edges_are_sorted() {
    let joined = union(tagged("[0-9]+", "NUM", 0), tagged("[a-z]+", "ID", 1));
    let table = compile_dfa(&joined).unwrap();
    assert_eq!(table.entry(), 0);
    for state in 0..table.len() as StateId {
      let edges = table.edges(state);
      assert!(edges.windows(2).all(|pair| pair[0].hi < pair[1].lo));
    }
  }

  #[test]
  fn unicode_ranges() {
    let table = compile_dfa(&tagged("[^a]", "NOT_A", 0)).unwrap();
    assert_eq!(run(&table, "λ"), Some("NOT_A"));
    assert_eq!(run(&table, "\u{10FFFF}"), Some("NOT_A"));
    assert_eq!(run(&table, "a"), None);
  }
}
