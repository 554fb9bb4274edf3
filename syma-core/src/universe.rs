/*!

`Universe` (§3.4): the top-level container of program, rules, meta-rules, and macro scopes. A
`Universe` is constructed by the module compiler, mutated only by `dispatch`/`project` replacing
`Program`, and torn down at shutdown.

*/

use crate::error::{EngineError, EngineResult};
use crate::term::Term;

pub const UNIVERSE: &str = "Universe";
pub const PROGRAM: &str = "Program";
pub const RULES: &str = "Rules";
pub const RULE_RULES: &str = "RuleRules";
pub const MACRO_SCOPES: &str = "MacroScopes";

/// A `Universe` value, held apart in typed fields for convenience even though its canonical form
/// is a single `Universe[...]` term (see [`Universe::to_term`] / [`Universe::from_term`]).
#[derive(Debug, Clone)]
pub struct Universe {
  pub program: Option<Term>,
  pub rules: Term,
  pub rule_rules: Term,
  pub macro_scopes: Term,
}

impl Universe {
  pub fn new(program: Option<Term>, rules: Term, rule_rules: Term, macro_scopes: Term) -> Self {
    Universe { program, rules, rule_rules, macro_scopes }
  }

  pub fn empty() -> Self {
    Universe {
      program: None,
      rules: Term::named(RULES, []),
      rule_rules: Term::named(RULE_RULES, []),
      macro_scopes: Term::named(MACRO_SCOPES, []),
    }
  }

  /// Fold the `Universe`'s fields back into the single `Universe[...]` term that is its canonical,
  /// serializable representation.
  pub fn to_term(&self) -> Term {
    let mut children = Vec::new();
    if let Some(program) = &self.program {
      children.push(program.clone());
    }
    children.push(self.rules.clone());
    children.push(self.rule_rules.clone());
    children.push(self.macro_scopes.clone());
    Term::named(UNIVERSE, children)
  }

  /// Parse a `Universe[...]` term (in any child order, per §3.4) into its typed fields.
  pub fn from_term(term: &Term) -> EngineResult<Universe> {
    let (head, children) = term
      .as_call()
      .ok_or_else(|| EngineError::invalid_module("expected a Universe[...] term"))?;
    if !head.is_symbol_named(UNIVERSE) {
      return Err(EngineError::invalid_module(format!("expected Universe, found {head}")));
    }

    let mut program = None;
    let mut rules = None;
    let mut rule_rules = None;
    let mut macro_scopes = None;

    for child in children {
      match child.head_symbol().as_deref() {
        Some(PROGRAM) => program = Some(child.clone()),
        Some(RULES) => rules = Some(child.clone()),
        Some(RULE_RULES) => rule_rules = Some(child.clone()),
        Some(MACRO_SCOPES) => macro_scopes = Some(child.clone()),
        _ => return Err(EngineError::invalid_module(format!("unexpected Universe child: {child}"))),
      }
    }

    Ok(Universe {
      program,
      rules: rules.unwrap_or_else(|| Term::named(RULES, [])),
      rule_rules: rule_rules.unwrap_or_else(|| Term::named(RULE_RULES, [])),
      macro_scopes: macro_scopes.unwrap_or_else(|| Term::named(MACRO_SCOPES, [])),
    })
  }

  pub fn with_program(&self, program: Term) -> Universe {
    Universe { program: Some(program), ..self.clone() }
  }
}
