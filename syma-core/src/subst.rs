/*!

The substituter (§4.2): produces a new `Term` from a template and an environment, expanding
sequence variables into in-place argument splices.

*/

use crate::env::Env;
use crate::error::{EngineError, EngineResult};
use crate::term::pattern::{as_var, as_var_rest};
use crate::term::splice::Spliced;
use crate::term::Term;

/// Substitute `env` into `template`, producing a finished `Term`.
///
/// A bare sequence variable at the template root (or anywhere a single `Term` is required, such
/// as a `Call`'s head) is an error: splicing is legal only in argument-list position (§4.2).
pub fn subst(template: &Term, env: &Env) -> EngineResult<Term> {
  match subst_value(template, env)? {
    Spliced::One(t) => Ok(t),
    Spliced::Splice(_) => Err(EngineError::invalid_pattern(
      "sequence variable substituted outside of an argument-list position",
    )),
  }
}

fn subst_value(template: &Term, env: &Env) -> EngineResult<Spliced> {
  if let Some(name) = as_var(template) {
    return match env.get_single(name) {
      Some(t) => Ok(Spliced::One(t.clone())),
      None => Err(EngineError::unbound_variable(name)),
    };
  }

  if let Some(name) = as_var_rest(template) {
    // An absent sequence-variable binding substitutes as an empty splice rather than failing:
    // this makes rest-variables idempotent in their empty case (§4.2, §9).
    return Ok(Spliced::Splice(
      env.get_sequence(name).map(|s| s.iter().cloned().collect()).unwrap_or_default(),
    ));
  }

  let Some((head, args)) = template.as_call() else {
    // Atom: Symbol, Number, or String — copied unchanged.
    return Ok(Spliced::One(template.clone()));
  };

  let new_head = subst_value(head, env)?
    .into_single()
    .ok_or_else(|| EngineError::invalid_pattern("a Call's head cannot substitute to a sequence splice"))?;

  let mut substituted_args = Vec::with_capacity(args.len());
  for arg in args {
    substituted_args.push(subst_value(arg, env)?);
  }
  let flat_args = Spliced::flatten(substituted_args);

  Ok(Spliced::One(Term::call(new_head, flat_args)))
}
