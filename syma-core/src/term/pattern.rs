/*!

The pattern sub-language (§3.2): two distinguished `Call` shapes layered on top of `Term`.

* A **point variable**, `Var["name"]`, binds to exactly one `Term`.
* A **sequence (rest) variable**, `VarRest["name"]`, binds to a (possibly empty) ordered slice of
  sibling arguments, and is legal only as a direct argument of a `Call`.

The engine never needs a separate `Pattern` type: these are ordinary `Term`s that the matcher and
substituter recognize by shape. `"_"` is the anonymous/wildcard name — its binding is not checked
for cross-occurrence consistency.

*/

use syma_abs::IString;

use super::Term;

pub const VAR: &str = "Var";
pub const VAR_REST: &str = "VarRest";
pub const WILDCARD: &str = "_";

/// Build the canonical point-variable term `Var["name"]`.
pub fn var(name: impl Into<IString>) -> Term {
  Term::call(Term::symbol(VAR), [Term::string(name.into().as_str())])
}

/// Build the canonical sequence-variable term `VarRest["name"]`.
pub fn var_rest(name: impl Into<IString>) -> Term {
  Term::call(Term::symbol(VAR_REST), [Term::string(name.into().as_str())])
}

/// If `term` is `Var["name"]`, return `name`.
pub fn as_var(term: &Term) -> Option<&str> {
  let (head, args) = term.as_call()?;
  if !head.is_symbol_named(VAR) || args.len() != 1 {
    return None;
  }
  args[0].as_str()
}

/// If `term` is `VarRest["name"]`, return `name`.
pub fn as_var_rest(term: &Term) -> Option<&str> {
  let (head, args) = term.as_call()?;
  if !head.is_symbol_named(VAR_REST) || args.len() != 1 {
    return None;
  }
  args[0].as_str()
}

pub fn is_wildcard(name: &str) -> bool {
  name == WILDCARD
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn recognizes_var_shapes() {
    let v = var("x");
    assert_eq!(as_var(&v), Some("x"));
    assert_eq!(as_var_rest(&v), None);

    let vr = var_rest("xs");
    assert_eq!(as_var_rest(&vr), Some("xs"));
    assert_eq!(as_var(&vr), None);
  }

  #[test]
  fn ordinary_calls_are_not_variables() {
    let t = Term::named("Var", [Term::number(1.0)]);
    assert_eq!(as_var(&t), None);
  }
}
