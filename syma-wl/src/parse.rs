/*!

A small recursive-descent parser for the brace-delimited surface syntax sketched informatively in
the core runtime's design notes (§6.2): `{Head a b c}` is a Call, `;` and `/* */` are comments,
double-quoted strings use `\n \r \t \" \\` escapes, numbers are optionally signed with an optional
decimal point, and `x_`/`xs___`/`xs...`/`_`/`...` lower to the canonical `Var`/`VarRest` shapes.

This parser is a demo convenience for this binary only — the core runtime consumes already-built
`Term`s and is agnostic to how a host produces them (§1).

*/

use syma_core::term::pattern::{var, var_rest};
use syma_core::term::Term;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
  #[error("unexpected end of input")]
  Eof,
  #[error("unexpected character `{0}` at byte {1}")]
  Unexpected(char, usize),
  #[error("unterminated string literal starting at byte {0}")]
  UnterminatedString(usize),
  #[error("trailing input after a complete term, starting at byte {0}")]
  TrailingInput(usize),
}

type Result<T> = std::result::Result<T, ParseError>;

/// Parse exactly one surface term from `input`, erroring if anything but whitespace/comments
/// follows it.
pub fn parse_term(input: &str) -> Result<Term> {
  let mut p = Parser { chars: input.char_indices().peekable() };
  p.skip_trivia();
  let term = p.parse_one()?;
  p.skip_trivia();
  if let Some(&(pos, _)) = p.chars.peek() {
    return Err(ParseError::TrailingInput(pos));
  }
  Ok(term)
}

struct Parser<'a> {
  chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl<'a> Parser<'a> {
  fn skip_trivia(&mut self) {
    loop {
      match self.chars.peek() {
        Some((_, c)) if c.is_whitespace() => {
          self.chars.next();
        }
        Some((_, ';')) => {
          while let Some((_, c)) = self.chars.peek() {
            if *c == '\n' {
              break;
            }
            self.chars.next();
          }
        }
        Some((start, '/')) => {
          let start = *start;
          let mut lookahead = self.chars.clone();
          lookahead.next();
          if lookahead.peek().map(|(_, c)| *c) == Some('*') {
            self.chars.next();
            self.chars.next();
            loop {
              match self.chars.next() {
                None => {
                  // An unterminated block comment just runs to end of input; the next parse
                  // step reports Eof, which is diagnostic enough for a demo parser.
                  let _ = start;
                  return;
                }
                Some((_, '*')) if self.chars.peek().map(|(_, c)| *c) == Some('/') => {
                  self.chars.next();
                  break;
                }
                _ => {}
              }
            }
          } else {
            return;
          }
        }
        _ => return,
      }
    }
  }

  fn parse_one(&mut self) -> Result<Term> {
    self.skip_trivia();
    match self.chars.peek().copied() {
      None => Err(ParseError::Eof),
      Some((_, '{')) => self.parse_call(),
      Some((_, '"')) => self.parse_string(),
      Some((pos, c)) if c == '-' || c.is_ascii_digit() => self.parse_number_or_atom(pos),
      Some((_, c)) if is_atom_start(c) => self.parse_atom(),
      Some((pos, c)) => Err(ParseError::Unexpected(c, pos)),
    }
  }

  fn parse_call(&mut self) -> Result<Term> {
    self.chars.next(); // '{'
    self.skip_trivia();
    let head = self.parse_one()?;
    let mut args = Vec::new();
    loop {
      self.skip_trivia();
      match self.chars.peek().copied() {
        Some((_, '}')) => {
          self.chars.next();
          break;
        }
        Some((_, ':')) => {
          // `:attr value` pairs are collected into a leading Props[KV[...], ...] argument
          // (§6.2); implementations may choose either representation, and this one always
          // emits the Props form.
          let mut props = Vec::new();
          while let Some((_, ':')) = self.chars.peek().copied() {
            self.chars.next();
            let key = self.parse_bare_identifier()?;
            self.skip_trivia();
            let value = self.parse_one()?;
            props.push(Term::named("KV", [Term::symbol(key), value]));
            self.skip_trivia();
          }
          args.insert(0, Term::named("Props", props));
        }
        None => return Err(ParseError::Eof),
        _ => args.push(self.parse_one()?),
      }
    }
    Ok(Term::call(head, args))
  }

  fn parse_string(&mut self) -> Result<Term> {
    let (start, _) = self.chars.next().unwrap(); // opening quote
    let mut out = String::new();
    loop {
      match self.chars.next() {
        None => return Err(ParseError::UnterminatedString(start)),
        Some((_, '"')) => break,
        Some((_, '\\')) => match self.chars.next() {
          Some((_, 'n')) => out.push('\n'),
          Some((_, 'r')) => out.push('\r'),
          Some((_, 't')) => out.push('\t'),
          Some((_, '"')) => out.push('"'),
          Some((_, '\\')) => out.push('\\'),
          Some((pos, c)) => return Err(ParseError::Unexpected(c, pos)),
          None => return Err(ParseError::UnterminatedString(start)),
        },
        Some((_, c)) => out.push(c),
      }
    }
    Ok(Term::string(out))
  }

  fn parse_number_or_atom(&mut self, start: usize) -> Result<Term> {
    let mut text = String::new();
    if self.chars.peek().map(|(_, c)| *c) == Some('-') {
      text.push('-');
      self.chars.next();
    }
    let digits_start = text.len();
    while let Some((_, c)) = self.chars.peek().copied() {
      if c.is_ascii_digit() || c == '.' {
        text.push(c);
        self.chars.next();
      } else {
        break;
      }
    }
    if text[digits_start..].is_empty() {
      return Err(ParseError::Unexpected('-', start));
    }
    text.parse::<f64>().map(Term::number).map_err(|_| ParseError::Unexpected('-', start))
  }

  fn parse_bare_identifier(&mut self) -> Result<String> {
    let mut text = String::new();
    while let Some((_, c)) = self.chars.peek().copied() {
      if is_atom_char(c) {
        text.push(c);
        self.chars.next();
      } else {
        break;
      }
    }
    if text.is_empty() {
      return Err(ParseError::Eof);
    }
    Ok(text)
  }

  fn parse_atom(&mut self) -> Result<Term> {
    let text = self.parse_bare_identifier()?;
    Ok(lower_atom(&text))
  }
}

fn is_atom_start(c: char) -> bool {
  c.is_alphanumeric() || c == '_' || c == '/' || c == '.' || c == '@'
}

fn is_atom_char(c: char) -> bool {
  c.is_alphanumeric() || c == '_' || c == '/' || c == '.' || c == '@'
}

/// Lower a bare identifier per §6.2's shorthand rules: `x_` -> `Var["x"]`, `xs___`/`xs...` ->
/// `VarRest["xs"]`, `_` -> `Var["_"]`, `...` -> `VarRest["_"]`; anything else is a plain `Symbol`.
fn lower_atom(text: &str) -> Term {
  if text == "..." {
    return var_rest("_");
  }
  if text == "_" {
    return var("_");
  }
  if let Some(name) = text.strip_suffix("___").or_else(|| text.strip_suffix("...")) {
    if !name.is_empty() {
      return var_rest(name);
    }
  }
  if let Some(name) = text.strip_suffix('_') {
    if !name.is_empty() && !name.ends_with('_') {
      return var(name);
    }
  }
  Term::symbol(text)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_a_nested_call() {
    let term = parse_term("{Add 1 {Mul 2 3}}").unwrap();
    assert_eq!(format!("{term}"), "Add[1, Mul[2, 3]]");
  }

  #[test]
  fn parses_strings_with_escapes() {
    let term = parse_term(r#"{Concat "a\nb"}"#).unwrap();
    let (_, args) = term.as_call().unwrap();
    assert_eq!(args[0].as_str(), Some("a\nb"));
  }

  #[test]
  fn lowers_point_and_rest_variable_shorthands() {
    let term = parse_term("{L x_ xs___}").unwrap();
    let (_, args) = term.as_call().unwrap();
    assert_eq!(syma_core::term::pattern::as_var(&args[0]), Some("x"));
    assert_eq!(syma_core::term::pattern::as_var_rest(&args[1]), Some("xs"));
  }

  #[test]
  fn lowers_wildcard_and_ellipsis() {
    let term = parse_term("{L _ ...}").unwrap();
    let (_, args) = term.as_call().unwrap();
    assert_eq!(syma_core::term::pattern::as_var(&args[0]), Some("_"));
    assert_eq!(syma_core::term::pattern::as_var_rest(&args[1]), Some("_"));
  }

  #[test]
  fn skips_line_and_block_comments() {
    let term = parse_term("{F 1 ; a comment\n /* another */ 2}").unwrap();
    assert_eq!(format!("{term}"), "F[1, 2]");
  }

  #[test]
  fn lowers_attribute_pairs_into_a_leading_props_argument() {
    let term = parse_term(r#"{Div :onClick Inc "hi"}"#).unwrap();
    let (_, args) = term.as_call().unwrap();
    assert!(args[0].is_named_call("Props"));
  }

  #[test]
  fn rejects_trailing_input() {
    assert!(parse_term("{F 1} {G 2}").is_err());
  }

  #[test]
  fn parses_the_projection_envelope_symbol() {
    let term = parse_term("{/@ Count {App {State {KV Count 0}} ui_}}").unwrap();
    let (head, _) = term.as_call().unwrap();
    assert_eq!(head.as_symbol().unwrap().as_str(), "/@");
  }
}
