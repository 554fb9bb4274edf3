/*!

The primitive folder (§4.3): after every rewrite, the resulting term is walked bottom-up, and any
`Call` whose head names one of the built-in operations and whose arguments are fully-ground atoms
of the expected kind is replaced by its computed value.

Folding never changes the outer structure of a rule — it only ever touches *values* inside a
reducing expression — and it never turns a `Call` it doesn't recognize, or one with non-ground or
wrongly-typed arguments, into anything but itself.

*/

mod arithmetic;
mod boolean;
mod comparison;
mod predicate;
mod strings;

use once_cell::sync::Lazy;
use syma_abs::HashMap;

use crate::error::EngineResult;
use crate::term::Term;

/// A primitive implementation: given the (already-folded) argument list of a call to its symbol,
/// return `Some(value)` if it applies and could compute a result, `None` if the arguments aren't
/// of the shape this primitive wants (left unchanged by the caller), or `Err` for a primitive that
/// matched but failed outright (division by zero, for instance).
pub type PrimitiveFn = fn(&[Term]) -> EngineResult<Option<Term>>;

static PRIMITIVES: Lazy<HashMap<&'static str, PrimitiveFn>> = Lazy::new(|| {
  let mut table: HashMap<&'static str, PrimitiveFn> = HashMap::new();
  arithmetic::register(&mut table);
  comparison::register(&mut table);
  boolean::register(&mut table);
  strings::register(&mut table);
  predicate::register(&mut table);
  table
});

/// The names of every symbol the folder recognizes as a primitive head. Used by the module
/// compiler's symbol qualifier (§4.9) to keep built-in operation names from being qualified.
pub fn primitive_names() -> impl Iterator<Item = &'static str> {
  PRIMITIVES.keys().copied()
}

/// Fold `term` bottom-up against the primitive table, returning a new term with every
/// recognized, fully-ground primitive call replaced by its value.
pub fn fold(term: &Term) -> EngineResult<Term> {
  let Some((head, args)) = term.as_call() else {
    return Ok(term.clone());
  };

  let folded_head = fold(head)?;
  let mut folded_args = Vec::with_capacity(args.len());
  for arg in args {
    folded_args.push(fold(arg)?);
  }
  let rebuilt = Term::call(folded_head, folded_args);

  let Some((rebuilt_head, rebuilt_args)) = rebuilt.as_call() else {
    return Ok(rebuilt);
  };
  let Some(name) = rebuilt_head.as_symbol() else {
    return Ok(rebuilt);
  };
  let Some(primitive) = PRIMITIVES.get(name.as_str()) else {
    return Ok(rebuilt);
  };

  match primitive(rebuilt_args)? {
    Some(value) => Ok(value),
    None => Ok(rebuilt),
  }
}

fn is_ground_args(args: &[Term]) -> bool {
  args.iter().all(Term::is_ground_atom)
}

pub(crate) use is_ground_args as ground;
