/*!

The variable environment threaded through matching and substitution: a binding from pattern
variable names to either a single `Term` (point variables) or an ordered slice of `Term`s
(sequence variables).

*/

use smallvec::SmallVec;
use syma_abs::{HashMap, IString};

use crate::term::Term;

#[derive(Debug, Clone)]
pub enum Binding {
  Single(Term),
  Sequence(SmallVec<[Term; 4]>),
}

/// Bindings accumulated while matching a pattern against a subject (§4.1), later consulted by the
/// substituter (§4.2).
#[derive(Debug, Clone, Default)]
pub struct Env {
  bindings: HashMap<IString, Binding>,
}

impl Env {
  pub fn new() -> Self {
    Env::default()
  }

  pub fn get(&self, name: &str) -> Option<&Binding> {
    self.bindings.get(name)
  }

  pub fn get_single(&self, name: &str) -> Option<&Term> {
    match self.bindings.get(name)? {
      Binding::Single(t) => Some(t),
      Binding::Sequence(_) => None,
    }
  }

  pub fn get_sequence(&self, name: &str) -> Option<&[Term]> {
    match self.bindings.get(name)? {
      Binding::Single(_) => None,
      Binding::Sequence(s) => Some(s.as_slice()),
    }
  }

  pub fn bind_single(&mut self, name: IString, value: Term) {
    self.bindings.insert(name, Binding::Single(value));
  }

  pub fn bind_sequence(&mut self, name: IString, values: SmallVec<[Term; 4]>) {
    self.bindings.insert(name, Binding::Sequence(values));
  }
}
