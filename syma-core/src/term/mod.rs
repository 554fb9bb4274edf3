/*!

`Term` — the immutable, recursive value that every expression, pattern, rule, and program in the
runtime is built from.

A `Term` is exactly one of: a `Symbol`, a `Number`, a `String`, or a `Call` of a head term applied
to an ordered list of argument terms (§3.1). Terms are value types: equality is full structural
equality, and a rewrite never mutates a `Term` in place — it builds a new one. Implementations are
free to share subtrees, which is exactly what the `Rc` wrapper here buys us for free.

*/

pub mod pattern;
pub mod splice;

use std::fmt::{Display, Formatter};
use std::rc::Rc;

use ordered_float::OrderedFloat;
use smallvec::SmallVec;
use syma_abs::IString;

/// Most calls in practice have a handful of arguments; inline storage for up to four avoids a
/// heap allocation for the common case.
pub type Args = SmallVec<[Term; 4]>;

#[derive(Debug, Eq, PartialEq, Hash)]
enum TermNode {
  Symbol(IString),
  Number(OrderedFloat<f64>),
  Str(Rc<str>),
  Call(Term, Args),
}

/// A reference-counted, structurally-compared handle to a [`TermNode`].
///
/// Cloning a `Term` is a refcount bump, never a deep copy. Two `Term`s compare equal iff their
/// trees are structurally identical (§3.1), regardless of whether they share the underlying
/// allocation.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Term(Rc<TermNode>);

impl Term {
  pub fn symbol(name: impl Into<IString>) -> Term {
    Term(Rc::new(TermNode::Symbol(name.into())))
  }

  pub fn number(value: f64) -> Term {
    Term(Rc::new(TermNode::Number(OrderedFloat(value))))
  }

  pub fn string(value: impl Into<Rc<str>>) -> Term {
    Term(Rc::new(TermNode::Str(value.into())))
  }

  pub fn call(head: Term, args: impl IntoIterator<Item = Term>) -> Term {
    Term(Rc::new(TermNode::Call(head, args.into_iter().collect())))
  }

  /// Convenience constructor for `Call(Sym(name), args)`, the overwhelmingly common shape.
  pub fn named(name: impl Into<IString>, args: impl IntoIterator<Item = Term>) -> Term {
    Term::call(Term::symbol(name), args)
  }

  pub fn as_symbol(&self) -> Option<IString> {
    match &*self.0 {
      TermNode::Symbol(s) => Some(*s),
      _ => None,
    }
  }

  pub fn as_number(&self) -> Option<f64> {
    match &*self.0 {
      TermNode::Number(n) => Some(n.0),
      _ => None,
    }
  }

  pub fn as_str(&self) -> Option<&str> {
    match &*self.0 {
      TermNode::Str(s) => Some(s),
      _ => None,
    }
  }

  pub fn as_call(&self) -> Option<(&Term, &[Term])> {
    match &*self.0 {
      TermNode::Call(head, args) => Some((head, args.as_slice())),
      _ => None,
    }
  }

  pub fn is_call(&self) -> bool {
    matches!(&*self.0, TermNode::Call(..))
  }

  /// The symbol name at the head of this term, if this is a `Call` whose head is itself a
  /// bare `Symbol`. Most calls in this system have symbol heads; a call with a non-symbol head
  /// (e.g. a variable used as a higher-order head) returns `None` here.
  pub fn head_symbol(&self) -> Option<IString> {
    self.as_call().and_then(|(head, _)| head.as_symbol())
  }

  /// True iff this term is `Call(Sym(name), _)` for the given `name`, or a bare `Symbol(name)`
  /// with no arguments expected — i.e. whether `name` names this term's head.
  pub fn is_named_call(&self, name: &str) -> bool {
    self.head_symbol().map_or(false, |s| s.as_str() == name)
  }

  pub fn is_symbol_named(&self, name: &str) -> bool {
    self.as_symbol().map_or(false, |s| s.as_str() == name)
  }

  /// True iff this term contains no `Call` nodes anywhere beneath it other than itself being an
  /// atom, i.e. it is fully evaluated data: a `Symbol`, `Number`, or `String`. Used by the
  /// primitive folder to decide whether a call's arguments are "fully ground" (§4.3).
  pub fn is_ground_atom(&self) -> bool {
    !matches!(&*self.0, TermNode::Call(..))
  }

  fn node(&self) -> &TermNode {
    &self.0
  }
}

impl Display for Term {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match &*self.0 {
      TermNode::Symbol(s) => write!(f, "{s}"),
      TermNode::Number(n) => write!(f, "{}", n.0),
      TermNode::Str(s) => write!(f, "{:?}", s.as_ref()),
      TermNode::Call(head, args) => {
        write!(f, "{head}[")?;
        for (i, a) in args.iter().enumerate() {
          if i > 0 {
            write!(f, ", ")?;
          }
          write!(f, "{a}")?;
        }
        write!(f, "]")
      }
    }
  }
}

impl std::fmt::Debug for Term {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{self}")
  }
}
