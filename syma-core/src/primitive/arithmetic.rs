/*!

Arithmetic primitives on `Number`s (§4.3): `Add Sub Mul Div Mod Pow` (binary) and
`Sqrt Abs Floor Ceil Round` (unary).

*/

use syma_abs::HashMap;

use super::{ground, PrimitiveFn};
use crate::error::{EngineError, EngineResult};
use crate::term::Term;

fn binary_numeric(args: &[Term], op: impl Fn(f64, f64) -> EngineResult<Option<f64>>) -> EngineResult<Option<Term>> {
  if args.len() != 2 || !ground(args) {
    return Ok(None);
  }
  let (Some(a), Some(b)) = (args[0].as_number(), args[1].as_number()) else {
    return Ok(None);
  };
  Ok(op(a, b)?.map(Term::number))
}

fn unary_numeric(args: &[Term], op: impl Fn(f64) -> f64) -> EngineResult<Option<Term>> {
  if args.len() != 1 || !ground(args) {
    return Ok(None);
  }
  let Some(a) = args[0].as_number() else {
    return Ok(None);
  };
  Ok(Some(Term::number(op(a))))
}

pub(crate) fn register(table: &mut HashMap<&'static str, PrimitiveFn>) {
  table.insert("Add", |args| binary_numeric(args, |a, b| Ok(Some(a + b))));
  table.insert("Sub", |args| binary_numeric(args, |a, b| Ok(Some(a - b))));
  table.insert("Mul", |args| binary_numeric(args, |a, b| Ok(Some(a * b))));
  table.insert("Div", |args| {
    binary_numeric(args, |a, b| {
      if b == 0.0 {
        Err(EngineError::primitive("division by zero"))
      } else {
        Ok(Some(a / b))
      }
    })
  });
  table.insert("Mod", |args| {
    binary_numeric(args, |a, b| {
      if b == 0.0 {
        Err(EngineError::primitive("modulo by zero"))
      } else {
        Ok(Some(a % b))
      }
    })
  });
  table.insert("Pow", |args| binary_numeric(args, |a, b| Ok(Some(a.powf(b)))));

  table.insert("Sqrt", |args| unary_numeric(args, f64::sqrt));
  table.insert("Abs", |args| unary_numeric(args, f64::abs));
  table.insert("Floor", |args| unary_numeric(args, f64::floor));
  table.insert("Ceil", |args| unary_numeric(args, f64::ceil));
  table.insert("Round", |args| unary_numeric(args, f64::round));
}
