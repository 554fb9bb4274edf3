/*!

String primitives (§4.3): `Concat` (variadic, coercing `Number`/`Symbol` via stringification),
`ToString ToUpper ToLower Trim StrLen Substring IndexOf Replace`.

*/

use syma_abs::HashMap;

use super::PrimitiveFn;
use crate::error::EngineResult;
use crate::term::Term;

/// Render any ground atom the way `Concat`/`ToString` do: symbols and strings as their text,
/// numbers via their default `Display`.
fn stringify(t: &Term) -> Option<String> {
  if let Some(s) = t.as_str() {
    return Some(s.to_string());
  }
  if let Some(s) = t.as_symbol() {
    return Some(s.to_string());
  }
  if let Some(n) = t.as_number() {
    return Some(format!("{n}"));
  }
  None
}

fn index_arg(t: &Term) -> Option<usize> {
  let n = t.as_number()?;
  if n < 0.0 || n.fract() != 0.0 {
    return None;
  }
  Some(n as usize)
}

pub(crate) fn register(table: &mut HashMap<&'static str, PrimitiveFn>) {
  table.insert("Concat", |args| {
    let mut out = String::new();
    for a in args {
      match stringify(a) {
        Some(s) => out.push_str(&s),
        None => return Ok(None),
      }
    }
    Ok(Some(Term::string(out)))
  });

  table.insert("ToString", |args| {
    if args.len() != 1 {
      return Ok(None);
    }
    Ok(stringify(&args[0]).map(Term::string))
  });

  table.insert("ToUpper", |args| string_unary(args, |s| s.to_uppercase()));
  table.insert("ToLower", |args| string_unary(args, |s| s.to_lowercase()));
  table.insert("Trim", |args| string_unary(args, |s| s.trim().to_string()));

  table.insert("StrLen", |args| {
    if args.len() != 1 {
      return Ok(None);
    }
    Ok(args[0].as_str().map(|s| Term::number(s.chars().count() as f64)))
  });

  table.insert("Substring", |args| {
    if args.len() != 3 {
      return Ok(None);
    }
    let (Some(s), Some(start), Some(end)) = (args[0].as_str(), index_arg(&args[1]), index_arg(&args[2])) else {
      return Ok(None);
    };
    let chars: Vec<char> = s.chars().collect();
    if start > end || end > chars.len() {
      return Ok(None);
    }
    Ok(Some(Term::string(chars[start..end].iter().collect::<String>())))
  });

  table.insert("IndexOf", |args| {
    if args.len() != 2 {
      return Ok(None);
    }
    let (Some(haystack), Some(needle)) = (args[0].as_str(), args[1].as_str()) else {
      return Ok(None);
    };
    let index = match haystack.find(needle) {
      Some(byte_idx) => haystack[..byte_idx].chars().count() as f64,
      None => -1.0,
    };
    Ok(Some(Term::number(index)))
  });

  table.insert("Replace", |args| {
    if args.len() != 3 {
      return Ok(None);
    }
    let (Some(s), Some(from), Some(to)) = (args[0].as_str(), args[1].as_str(), args[2].as_str()) else {
      return Ok(None);
    };
    Ok(Some(Term::string(s.replace(from, to))))
  });
}

fn string_unary(args: &[Term], op: impl Fn(&str) -> String) -> EngineResult<Option<Term>> {
  if args.len() != 1 {
    return Ok(None);
  }
  Ok(args[0].as_str().map(|s| Term::string(op(s))))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn table() -> HashMap<&'static str, PrimitiveFn> {
    let mut table = HashMap::new();
    register(&mut table);
    table
  }

  #[test]
  fn concat_coerces_numbers_and_symbols() {
    let t = table();
    let result = (t["Concat"])(&[Term::string("n="), Term::number(3.0), Term::symbol("!")]).unwrap();
    assert_eq!(result.unwrap().as_str(), Some("n=3!"));
  }

  #[test]
  fn substring_slices_by_character_index() {
    let t = table();
    let result = (t["Substring"])(&[Term::string("hello"), Term::number(1.0), Term::number(3.0)]).unwrap();
    assert_eq!(result.unwrap().as_str(), Some("el"));
  }

  #[test]
  fn index_of_returns_negative_one_when_absent() {
    let t = table();
    let result = (t["IndexOf"])(&[Term::string("hello"), Term::string("z")]).unwrap();
    assert_eq!(result.unwrap().as_number(), Some(-1.0));
  }

  #[test]
  fn replace_substitutes_all_occurrences() {
    let t = table();
    let result = (t["Replace"])(&[Term::string("a-b-c"), Term::string("-"), Term::string("+")]).unwrap();
    assert_eq!(result.unwrap().as_str(), Some("a+b+c"));
  }
}
