/*!
Nondeterministic automaton fragments, built from a regex tree by Thompson's construction.

A `Fragment` is an arena of states addressed by contiguous `StateId`s. States carry character range
edges, epsilon edges, and optionally an `Accept` marker recording which rule the state accepts for
and that rule's priority.
*/

use smallvec::SmallVec;

use super::error::RegexError;
use super::limits::MAX_NFA_STATES;
use super::parser::Node;
use super::{Priority, StateId};

/// Marks an accepting NFA state. Lower priorities win when accepting states are merged.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Accept {
  pub tag      : String,
  pub priority : Priority,
}

impl Accept {
  /// The marker `compile` places before any tag is stamped.
  pub fn untagged() -> Self {
    Accept {
      tag: String::new(),
      priority: Priority::MAX,
    }
  }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct NfaState {
  pub edges    : SmallVec<[(char, char, StateId); 2]>, //< inclusive character range, target
  pub epsilons : SmallVec<[StateId; 2]>,
  pub accept   : Option<Accept>,
}


#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Fragment {
  states : Vec<NfaState>,
  start  : StateId,
}

impl Fragment {

  /// Builds the fragment for `node`. It has exactly one accepting state, untagged.
  pub(crate) fn from_node(node: &Node) -> Result<Fragment, RegexError> {
    let mut fragment = Fragment {
      states: Vec::new(),
      start: 0,
    };

    let start = fragment.add_state();
    let exit = fragment.build(node, start)?;
    fragment.states[exit as usize].accept = Some(Accept::untagged());

    Ok(fragment)
  }

  pub fn start(&self) -> StateId {
    self.start
  }

  pub fn states(&self) -> &[NfaState] {
    &self.states
  }

  pub fn len(&self) -> usize {
    self.states.len()
  }

  pub fn is_empty(&self) -> bool {
    self.states.is_empty()
  }

  pub fn state(&self, id: StateId) -> &NfaState {
    &self.states[id as usize]
  }

  /// Every accepting state, in id order.
  pub fn accepting(&self) -> impl Iterator<Item = (StateId, &Accept)> + '_ {
    self.states
        .iter()
        .enumerate()
        .filter_map(|(id, state)| state.accept.as_ref().map(|accept| (id as StateId, accept)))
  }

  /// Stamps `tag` and `priority` on every accepting state.
  pub fn stamp_tag(&mut self, tag: &str, priority: Priority) {
    for accept in self.states.iter_mut().filter_map(|state| state.accept.as_mut()) {
      accept.tag = tag.to_string();
      accept.priority = priority;
    }
  }

  /// A fragment accepting whatever `self` or `other` accepts. Accepting states keep their tags and
  /// priorities.
  pub fn union(mut self, other: Fragment) -> Fragment {
    let offset = self.states.len() as StateId;

    self.states.extend(other.states.into_iter().map(|mut state| {
      for edge in state.edges.iter_mut() {
        edge.2 += offset;
      }
      for target in state.epsilons.iter_mut() {
        *target += offset;
      }
      state
    }));

    let start = self.add_state();
    let left = self.start;
    self.states[start as usize].epsilons.push(left);
    self.states[start as usize].epsilons.push(other.start + offset);
    self.start = start;

    self
  }

  fn add_state(&mut self) -> StateId {
    self.states.push(NfaState::default());
    (self.states.len() - 1) as StateId
  }

  fn add_epsilon(&mut self, from: StateId, to: StateId) {
    self.states[from as usize].epsilons.push(to);
  }

  /// Adds the states for `node`, entered from `entry`, and returns the state reached after a
  /// match of `node`.
  fn build(&mut self, node: &Node, entry: StateId) -> Result<StateId, RegexError> {
    match node {
      Node::Set(set) => {
        let exit = self.add_state();
        self.states[entry as usize]
            .edges
            .extend(set.ranges().iter().map(|&(lo, hi)| (lo, hi, exit)));
        Ok(exit)
      }

      Node::Concat(items) => {
        let mut current = entry;
        for item in items {
          current = self.build(item, current)?;
        }
        Ok(current)
      }

      Node::Alternate(branches) => {
        let exit = self.add_state();
        for branch in branches {
          let branch_entry = self.add_state();
          self.add_epsilon(entry, branch_entry);
          let branch_exit = self.build(branch, branch_entry)?;
          self.add_epsilon(branch_exit, exit);
        }
        Ok(exit)
      }

      Node::Repeat { node, min, max, at } => {
        let mut current = entry;
        for _ in 0..*min {
          current = self.build(node, current)?;
          self.check_size(*at)?;
        }

        match max {
          None => {
            let loop_head = self.add_state();
            self.add_epsilon(current, loop_head);
            let body_exit = self.build(node, loop_head)?;
            self.add_epsilon(body_exit, loop_head);
            Ok(loop_head)
          }

          Some(max) => {
            let exit = self.add_state();
            for _ in *min..*max {
              self.add_epsilon(current, exit);
              current = self.build(node, current)?;
              self.check_size(*at)?;
            }
            self.add_epsilon(current, exit);
            Ok(exit)
          }
        }
      }
    }
  }

  fn check_size(&self, at: u32) -> Result<(), RegexError> {
    if self.states.len() > MAX_NFA_STATES {
      Err(RegexError::ExceedsLimits(at))
    } else {
      Ok(())
    }
  }
}
