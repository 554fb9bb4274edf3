/*!

Boolean primitives on the `True`/`False` symbols (§4.3): `And Or Not`.

*/

use syma_abs::HashMap;

use super::PrimitiveFn;
use crate::error::EngineResult;
use crate::term::Term;

fn as_bool(t: &Term) -> Option<bool> {
  match t.as_symbol()?.as_str() {
    "True" => Some(true),
    "False" => Some(false),
    _ => None,
  }
}

fn bool_term(b: bool) -> Term {
  Term::symbol(if b { "True" } else { "False" })
}

pub(crate) fn register(table: &mut HashMap<&'static str, PrimitiveFn>) {
  table.insert("And", |args| binary_bool(args, |a, b| a && b));
  table.insert("Or", |args| binary_bool(args, |a, b| a || b));
  table.insert("Not", |args| {
    if args.len() != 1 {
      return Ok(None);
    }
    Ok(as_bool(&args[0]).map(|a| bool_term(!a)))
  });
}

fn binary_bool(args: &[Term], op: impl Fn(bool, bool) -> bool) -> EngineResult<Option<Term>> {
  if args.len() != 2 {
    return Ok(None);
  }
  let (Some(a), Some(b)) = (as_bool(&args[0]), as_bool(&args[1])) else {
    return Ok(None);
  };
  Ok(Some(bool_term(op(a, b))))
}
