/**
  Constants specifying limits.

*/

use super::Index32;

/// Max number of iterations of a bounded repeat, e.g. `a{3,5}`.
pub const MAX_REPEAT: u32 = 1000;

/// Max nesting of groups in a regex, and max number of quantifiers applied directly to another
/// quantifier, e.g. `a**`, across the whole regex.
pub const MAX_DEPTH: u32 = 128;

/// Max number of NFA states a single pattern may expand to.
pub const MAX_NFA_STATES: usize = 100_000;

/// Max number of states of the deterministic automaton, before minimization.
pub const MAX_STATES: usize = 65_536;

/// Max length of a regex, in bytes. Positions must fit an `Index32`.
pub const MAX_INDEX: Index32 = u32::MAX;
