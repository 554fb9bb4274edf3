/*!

`Splice` — a transient, non-persistable value produced only by substituting a sequence variable
(§3.6, §9). A `Splice` is never a variant of [`Term`](super::Term) itself; it exists only inside
the substituter, which is the sole producer, and the `Call` constructor logic, which is the sole
consumer: every substituter that builds a `Call`'s argument list must flatten any `Splice` it
encounters into the surrounding list. A `Splice` that survives to a finished `Term` is a bug.

*/

use smallvec::SmallVec;

use super::Term;

/// The result of substituting one template position: either a single `Term` or the (possibly
/// empty) flattened contents of a sequence-variable binding.
#[derive(Debug, Clone)]
pub enum Spliced {
  One(Term),
  Splice(SmallVec<[Term; 4]>),
}

impl Spliced {
  /// Flatten a list of per-argument substitution results into a final argument vector, splicing
  /// any `Splice` values in place. This is the one function in the engine that is allowed to make
  /// a `Splice` disappear; everywhere else, a bare `Splice` reaching a `Term` constructor is a
  /// logic error.
  pub fn flatten(items: impl IntoIterator<Item = Spliced>) -> SmallVec<[Term; 4]> {
    let mut out = SmallVec::new();
    for item in items {
      match item {
        Spliced::One(t) => out.push(t),
        Spliced::Splice(seq) => out.extend(seq),
      }
    }
    out
  }

  /// This substitution result used in a position where splicing is not legal (a `Call`'s head).
  /// Returns the single term, or `None` if it was actually a splice.
  pub fn into_single(self) -> Option<Term> {
    match self {
      Spliced::One(t) => Some(t),
      Spliced::Splice(_) => None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn flatten_splices_sequences_in_place() {
    let items = vec![
      Spliced::One(Term::number(1.0)),
      Spliced::Splice(SmallVec::from_vec(vec![Term::number(2.0), Term::number(3.0)])),
      Spliced::One(Term::number(4.0)),
    ];
    let flat = Spliced::flatten(items);
    assert_eq!(flat.len(), 4);
    assert_eq!(flat[1].as_number(), Some(2.0));
    assert_eq!(flat[2].as_number(), Some(3.0));
  }
}
