/*!

The parsed shape of a `Module[...]` Term (§3.5): extraction and validation only — surface source
parsing into this `Module[...]` shape happens outside the core (§1).

*/

use syma_abs::IString;

use crate::error::{EngineError, EngineResult};
use crate::rules::Rule;
use crate::term::Term;

pub const MODULE: &str = "Module";
pub const EXPORT: &str = "Export";
pub const IMPORT: &str = "Import";
pub const DEFS: &str = "Defs";
pub const RULES: &str = "Rules";
pub const RULE_RULES: &str = "RuleRules";
pub const PROGRAM: &str = "Program";

/// One `Import[...]` entry: `{ module, alias, fromPath?, open, macro }` (§3.5).
///
/// The concrete Term shape for an import declaration is not fixed by the specification; this
/// implementation uses `Imp[Sym(module), Sym(alias), Props[KV(flag, Sym(module_or_bool))...]]`,
/// recognizing the flags `"Open"` and `"Macro"` as bare presence markers and an optional
/// `"From"` key carrying a path String.
#[derive(Debug, Clone)]
pub struct ImportDecl {
  pub module: IString,
  pub alias: IString,
  pub from_path: Option<String>,
  pub open: bool,
  pub macro_visible: bool,
}

/// The extracted structure of one module (§3.5, §4.9 step 2).
///
/// `rules` holds the raw `Rules[...]` entries as-is: an entry need not already be `R[name, lhs,
/// rhs, priority?]`-shaped, since it may be macro-sugar a `RuleRules` meta-rule turns into one or
/// more real rules once normalized (§4.6). Shape validation happens later, in
/// [`crate::rules::extract_rules`], after that meta-rewriting has had a chance to run.
/// `rule_rules`, by contrast, are meta-rules themselves — used directly as matcher/substituter
/// rules during that normalization — so they must already be rule-shaped and are parsed as such
/// here.
#[derive(Debug, Clone)]
pub struct ModuleDecl {
  pub name: IString,
  pub exports: syma_abs::HashSet<IString>,
  pub imports: Vec<ImportDecl>,
  pub defs: syma_abs::HashMap<IString, Term>,
  pub rules: Vec<Term>,
  pub rule_rules: Vec<Rule>,
  pub program: Option<Term>,
}

const IMP: &str = "Imp";
const PROPS: &str = "Props";
const KV: &str = "KV";
const OPEN_FLAG: &str = "Open";
const MACRO_FLAG: &str = "Macro";
const FROM_KEY: &str = "From";

fn parse_import(term: &Term) -> EngineResult<ImportDecl> {
  let (head, args) = term
    .as_call()
    .ok_or_else(|| EngineError::invalid_module(format!("malformed Import entry: {term}")))?;
  if !head.is_symbol_named(IMP) || args.is_empty() {
    return Err(EngineError::invalid_module(format!("malformed Import entry: {term}")));
  }
  let module = args[0]
    .as_symbol()
    .ok_or_else(|| EngineError::invalid_module("Import module must be a Symbol"))?;
  let alias = match args.get(1).and_then(Term::as_symbol) {
    Some(alias) => alias,
    None => module,
  };

  let mut open = false;
  let mut macro_visible = false;
  let mut from_path = None;

  if let Some(props) = args.get(2) {
    let (props_head, entries) = props
      .as_call()
      .ok_or_else(|| EngineError::invalid_module("Import properties must be a Props[...] term"))?;
    if !props_head.is_symbol_named(PROPS) {
      return Err(EngineError::invalid_module("Import properties must be a Props[...] term"));
    }
    for entry in entries {
      let (kv_head, kv_args) = entry
        .as_call()
        .ok_or_else(|| EngineError::invalid_module("malformed Import property"))?;
      if !kv_head.is_symbol_named(KV) || kv_args.len() != 2 {
        return Err(EngineError::invalid_module("malformed Import property"));
      }
      let key = kv_args[0]
        .as_symbol()
        .ok_or_else(|| EngineError::invalid_module("Import property key must be a Symbol"))?;
      match key.as_str() {
        OPEN_FLAG => open = true,
        MACRO_FLAG => macro_visible = true,
        FROM_KEY => {
          from_path = Some(
            kv_args[1]
              .as_str()
              .ok_or_else(|| EngineError::invalid_module("Import From path must be a String"))?
              .to_string(),
          )
        }
        other => return Err(EngineError::invalid_module(format!("unknown Import property: {other}"))),
      }
    }
  }

  Ok(ImportDecl { module, alias, from_path, open, macro_visible })
}

fn section_entries<'a>(section: &'a Term, list_head: &str) -> EngineResult<&'a [Term]> {
  let (head, entries) = section
    .as_call()
    .ok_or_else(|| EngineError::invalid_module(format!("expected {list_head}[...]")))?;
  if !head.is_symbol_named(list_head) {
    return Err(EngineError::invalid_module(format!("expected {list_head}[...], found {head}")));
  }
  Ok(entries)
}

/// Parse a `RuleRules[...]` section: every entry is a meta-rule, used directly as a
/// matcher/substituter rule, so it must already be `R[...]`-shaped.
fn parse_rule_terms(section: &Term, list_head: &str) -> EngineResult<Vec<Rule>> {
  section_entries(section, list_head)?.iter().map(Rule::from_term).collect()
}

/// Parse a `Rules[...]` section into its raw entry terms, without assuming any entry is already
/// `R[...]`-shaped (§4.6 second bullet) — an entry may be macro-sugar awaiting meta-rewriting.
fn parse_rule_section_terms(section: &Term, list_head: &str) -> EngineResult<Vec<Term>> {
  Ok(section_entries(section, list_head)?.to_vec())
}

/// Extract and validate a `Module[...]` Term's structure (§3.5, §4.9 steps 1-2), checking that the
/// declared name matches `expected_name` when one is given.
pub fn parse_module(term: &Term, expected_name: Option<&str>) -> EngineResult<ModuleDecl> {
  let (head, children) = term.as_call().ok_or_else(|| EngineError::invalid_module("expected a Module[...] term"))?;
  if !head.is_symbol_named(MODULE) || children.is_empty() {
    return Err(EngineError::invalid_module("expected Module[name, sections...]"));
  }

  let name = children[0]
    .as_symbol()
    .ok_or_else(|| EngineError::invalid_module("Module name must be a Symbol"))?;
  if let Some(expected) = expected_name {
    if name.as_str() != expected {
      return Err(EngineError::invalid_module(format!(
        "module declares name `{name}` but was loaded as `{expected}`"
      )));
    }
  }

  let mut exports = syma_abs::HashSet::new();
  let mut imports = Vec::new();
  let mut defs = syma_abs::HashMap::new();
  let mut rules = Vec::new();
  let mut rule_rules = Vec::new();
  let mut program = None;

  for section in &children[1..] {
    let (section_head, section_args) = section
      .as_call()
      .ok_or_else(|| EngineError::invalid_module(format!("malformed module section: {section}")))?;
    let section_name = section_head
      .as_symbol()
      .ok_or_else(|| EngineError::invalid_module("module section head must be a Symbol"))?;

    match section_name.as_str() {
      EXPORT => {
        for name in section_args {
          exports.insert(
            name
              .as_symbol()
              .ok_or_else(|| EngineError::invalid_module("Export entries must be Symbols"))?,
          );
        }
      }
      IMPORT => {
        for entry in section_args {
          imports.push(parse_import(entry)?);
        }
      }
      DEFS => {
        for entry in section_args {
          let (kv_head, kv_args) = entry
            .as_call()
            .ok_or_else(|| EngineError::invalid_module(format!("malformed Defs entry: {entry}")))?;
          if !kv_head.is_symbol_named(KV) || kv_args.len() != 2 {
            return Err(EngineError::invalid_module(format!("malformed Defs entry: {entry}")));
          }
          let def_name = kv_args[0]
            .as_symbol()
            .ok_or_else(|| EngineError::invalid_module("Defs key must be a Symbol"))?;
          defs.insert(def_name, kv_args[1].clone());
        }
      }
      RULES => rules = parse_rule_section_terms(section, RULES)?,
      RULE_RULES => rule_rules = parse_rule_terms(section, RULE_RULES)?,
      PROGRAM => program = Some(section_args.first().cloned().unwrap_or_else(|| section.clone())),
      other => return Err(EngineError::invalid_module(format!("unknown module section: {other}"))),
    }
  }

  Ok(ModuleDecl { name, exports, imports, defs, rules, rule_rules, program })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_exports_and_imports() {
    let term = Term::named(
      MODULE,
      [
        Term::symbol("M"),
        Term::named(EXPORT, [Term::symbol("Foo")]),
        Term::named(
          IMPORT,
          [Term::named(
            IMP,
            [
              Term::symbol("Other"),
              Term::symbol("O"),
              Term::named(PROPS, [Term::named(KV, [Term::symbol(OPEN_FLAG), Term::symbol("True")])]),
            ],
          )],
        ),
      ],
    );
    let decl = parse_module(&term, Some("M")).unwrap();
    assert!(decl.exports.contains(&IString::from("Foo")));
    assert_eq!(decl.imports.len(), 1);
    assert!(decl.imports[0].open);
    assert!(!decl.imports[0].macro_visible);
  }

  #[test]
  fn mismatched_name_is_an_error() {
    let term = Term::named(MODULE, [Term::symbol("M")]);
    assert!(parse_module(&term, Some("Other")).is_err());
  }

  #[test]
  fn rules_section_accepts_non_rule_shaped_macro_sugar() {
    // Def[...] is not R[...]-shaped; parsing must not reject it, since a RuleRules meta-rule may
    // still turn it into real rules later (§4.6).
    let def_term = Term::named("Def", [Term::symbol("Double")]);
    let term = Term::named(MODULE, [Term::symbol("M"), Term::named(RULES, [def_term.clone()])]);
    let decl = parse_module(&term, Some("M")).unwrap();
    assert_eq!(decl.rules, vec![def_term]);
  }

  #[test]
  fn rule_rules_section_still_requires_rule_shaped_entries() {
    let def_term = Term::named("Def", [Term::symbol("Double")]);
    let term = Term::named(MODULE, [Term::symbol("M"), Term::named(RULE_RULES, [def_term])]);
    assert!(parse_module(&term, Some("M")).is_err());
  }
}
