/*!

Comparison primitives (§4.3): `Eq` and `Neq` are defined on any pair of terms via structural
equality; `Lt Gt Lte Gte` are defined on two `Number`s or two `String`s.

*/

use syma_abs::HashMap;

use super::{ground, PrimitiveFn};
use crate::error::EngineResult;
use crate::term::Term;

fn bool_term(b: bool) -> Term {
  Term::symbol(if b { "True" } else { "False" })
}

fn ordered<T: PartialOrd>(a: T, b: T) -> std::cmp::Ordering {
  a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Equal)
}

pub(crate) fn register(table: &mut HashMap<&'static str, PrimitiveFn>) {
  table.insert("Eq", |args| {
    if args.len() != 2 || !ground(args) {
      return Ok(None);
    }
    Ok(Some(bool_term(args[0] == args[1])))
  });
  table.insert("Neq", |args| {
    if args.len() != 2 || !ground(args) {
      return Ok(None);
    }
    Ok(Some(bool_term(args[0] != args[1])))
  });

  table.insert("Lt", |args| numeric_or_string_cmp(args, |o| o.is_lt()));
  table.insert("Gt", |args| numeric_or_string_cmp(args, |o| o.is_gt()));
  table.insert("Lte", |args| numeric_or_string_cmp(args, |o| o.is_le()));
  table.insert("Gte", |args| numeric_or_string_cmp(args, |o| o.is_ge()));
}

fn numeric_or_string_cmp(args: &[Term], holds: impl Fn(std::cmp::Ordering) -> bool) -> EngineResult<Option<Term>> {
  if args.len() != 2 || !ground(args) {
    return Ok(None);
  }
  if let (Some(a), Some(b)) = (args[0].as_number(), args[1].as_number()) {
    return Ok(Some(bool_term(holds(ordered(a, b)))));
  }
  if let (Some(a), Some(b)) = (args[0].as_str(), args[1].as_str()) {
    return Ok(Some(bool_term(holds(a.cmp(b)))));
  }
  Ok(None)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn eq_is_structural_on_any_pair() {
    let mut table = HashMap::new();
    register(&mut table);
    let result = (table["Eq"])(&[Term::symbol("A"), Term::symbol("A")]).unwrap();
    assert_eq!(result.unwrap().as_symbol().unwrap().as_str(), "True");
  }

  #[test]
  fn lt_compares_numbers() {
    let mut table = HashMap::new();
    register(&mut table);
    let result = (table["Lt"])(&[Term::number(1.0), Term::number(2.0)]).unwrap();
    assert_eq!(result.unwrap().as_symbol().unwrap().as_str(), "True");
  }

  #[test]
  fn lt_compares_strings_lexicographically() {
    let mut table = HashMap::new();
    register(&mut table);
    let result = (table["Lt"])(&[Term::string("abc"), Term::string("abd")]).unwrap();
    assert_eq!(result.unwrap().as_symbol().unwrap().as_str(), "True");
  }
}
