/*!

The JSON wire format (§3.5): a `Term` serializes to one of four tagged shapes —

```text
{"k":"Sym",  "v":"Name"}
{"k":"Num",  "v":1.5}
{"k":"Str",  "v":"text"}
{"k":"Call", "h":<Term>, "a":[<Term>, ...]}
```

and a [`crate::universe::Universe`] serializes as its `Universe[...]` term under the same encoding.
This is the only format hosts exchange with the engine (§3.5, §6); nothing else about `Term`'s
in-memory representation is exposed across that boundary.

*/

use serde_json::{json, Value};

use crate::error::{EngineError, EngineResult};
use crate::term::Term;
use crate::universe::Universe;

const KIND: &str = "k";
const VALUE: &str = "v";
const HEAD: &str = "h";
const ARGS: &str = "a";

const SYM: &str = "Sym";
const NUM: &str = "Num";
const STR: &str = "Str";
const CALL: &str = "Call";

/// Encode a `Term` into its four-shape JSON representation.
pub fn to_json(term: &Term) -> Value {
  if let Some(s) = term.as_symbol() {
    return json!({ KIND: SYM, VALUE: s.as_str() });
  }
  if let Some(n) = term.as_number() {
    return json!({ KIND: NUM, VALUE: n });
  }
  if let Some(s) = term.as_str() {
    return json!({ KIND: STR, VALUE: s });
  }
  let (head, args) = term.as_call().expect("Term is Symbol, Number, String, or Call");
  json!({
    KIND: CALL,
    HEAD: to_json(head),
    ARGS: args.iter().map(to_json).collect::<Vec<_>>(),
  })
}

/// Decode a `Term` from its four-shape JSON representation, rejecting anything malformed with a
/// `Parse` error.
pub fn from_json(value: &Value) -> EngineResult<Term> {
  let obj = value.as_object().ok_or_else(|| EngineError::parse("expected a JSON object"))?;
  let kind = obj
    .get(KIND)
    .and_then(Value::as_str)
    .ok_or_else(|| EngineError::parse("missing or non-string \"k\""))?;

  match kind {
    SYM => {
      let s = obj.get(VALUE).and_then(Value::as_str).ok_or_else(|| EngineError::parse("Sym missing string \"v\""))?;
      Ok(Term::symbol(s))
    }
    NUM => {
      let n = obj.get(VALUE).and_then(Value::as_f64).ok_or_else(|| EngineError::parse("Num missing numeric \"v\""))?;
      Ok(Term::number(n))
    }
    STR => {
      let s = obj.get(VALUE).and_then(Value::as_str).ok_or_else(|| EngineError::parse("Str missing string \"v\""))?;
      Ok(Term::string(s))
    }
    CALL => {
      let head = obj.get(HEAD).ok_or_else(|| EngineError::parse("Call missing \"h\""))?;
      let args = obj
        .get(ARGS)
        .and_then(Value::as_array)
        .ok_or_else(|| EngineError::parse("Call missing array \"a\""))?;
      let head = from_json(head)?;
      let args = args.iter().map(from_json).collect::<EngineResult<Vec<_>>>()?;
      Ok(Term::call(head, args))
    }
    other => Err(EngineError::parse(format!("unrecognized term kind: {other}"))),
  }
}

/// Serialize a `Universe` to its JSON wire representation.
pub fn universe_to_json(universe: &Universe) -> Value {
  to_json(&universe.to_term())
}

/// Parse a `Universe` from its JSON wire representation.
pub fn universe_from_json(value: &Value) -> EngineResult<Universe> {
  Universe::from_term(&from_json(value)?)
}
