/*!

Predicate primitives on arbitrary `Term`s (§4.3): `IsNum IsStr IsSym IsTrue IsFalse`.

*/

use syma_abs::HashMap;

use super::PrimitiveFn;
use crate::term::Term;

fn bool_term(b: bool) -> Term {
  Term::symbol(if b { "True" } else { "False" })
}

pub(crate) fn register(table: &mut HashMap<&'static str, PrimitiveFn>) {
  table.insert("IsNum", |args| unary_predicate(args, |t| t.as_number().is_some()));
  table.insert("IsStr", |args| unary_predicate(args, |t| t.as_str().is_some()));
  table.insert("IsSym", |args| unary_predicate(args, |t| t.as_symbol().is_some()));
  table.insert("IsTrue", |args| unary_predicate(args, |t| t.is_symbol_named("True")));
  table.insert("IsFalse", |args| unary_predicate(args, |t| t.is_symbol_named("False")));
}

fn unary_predicate(args: &[Term], pred: impl Fn(&Term) -> bool) -> crate::error::EngineResult<Option<Term>> {
  if args.len() != 1 {
    return Ok(None);
  }
  Ok(Some(bool_term(pred(&args[0]))))
}
