/*!

The runtime facade (§4.8, §6.3): `dispatch` and `project`, the two entry points the UI/effects
layers call. Both re-extract the rule set on every call so that a prior `dispatch` which rewrote
the rules themselves (via `RuleRules`) is honored immediately.

*/

use tracing::info_span;

use crate::error::{EngineError, EngineResult};
use crate::normalize::{normalize, normalize_with_trace, DEFAULT_MAX_STEPS};
use crate::rules::extract_rules;
use crate::term::Term;
use crate::trace::get_trace;
use crate::universe::Universe;

/// The stable projection envelope (§9 Open Question: the source project supports both `/@` and a
/// `__SYMA_PROJECT_WRAPPER__` sibling-of-`App` form; this implementation picks `/@` and documents
/// the choice — see DESIGN.md).
pub const PROJECT_ENVELOPE: &str = "/@";

const APPLY: &str = "Apply";
const APP: &str = "App";
const PLACEHOLDER: &str = "_";

/// `dispatch(universe, action) -> universe'` (§4.8): normalize `Apply[action, Program]` against the
/// current rule set and reinsert the result as the new `Program`.
pub fn dispatch(universe: &Universe, action: Term) -> EngineResult<Universe> {
  let program = universe
    .program
    .clone()
    .ok_or_else(|| EngineError::invalid_module("dispatch requires a Universe with a Program"))?;
  let rules = extract_rules(universe)?;
  let apply_term = Term::named(APPLY, [action, program]);

  let new_program = if get_trace() {
    let span = info_span!("dispatch");
    let _enter = span.enter();
    let (result, steps) = normalize_with_trace(&apply_term, &rules, DEFAULT_MAX_STEPS)?;
    for step in &steps {
      tracing::trace!(rule = step.rule_name.as_ref().map(|n| n.as_str()), path = %step.path, "dispatch step");
    }
    result
  } else {
    normalize(&apply_term, &rules, DEFAULT_MAX_STEPS)?
  };

  Ok(universe.with_program(new_program))
}

/// `project(universe, part) -> term'` (§4.8): normalize `/@[part, App[State, _]]` against the
/// current rule set. Fails with `Unmatchable` if the result is still rooted at the envelope,
/// meaning no user rule fired.
pub fn project(universe: &Universe, part: Term) -> EngineResult<Term> {
  let rules = extract_rules(universe)?;
  let state = match &universe.program {
    Some(program) => program_state(program)?,
    None => Term::symbol("None"),
  };
  let envelope = Term::named(PROJECT_ENVELOPE, [part, Term::named(APP, [state, Term::symbol(PLACEHOLDER)])]);

  let result = if get_trace() {
    let span = info_span!("project");
    let _enter = span.enter();
    let (result, steps) = normalize_with_trace(&envelope, &rules, DEFAULT_MAX_STEPS)?;
    for step in &steps {
      tracing::trace!(rule = step.rule_name.as_ref().map(|n| n.as_str()), path = %step.path, "project step");
    }
    result
  } else {
    normalize(&envelope, &rules, DEFAULT_MAX_STEPS)?
  };

  if result.is_named_call(PROJECT_ENVELOPE) {
    return Err(EngineError::unmatchable());
  }
  Ok(result)
}

/// Pull the `State` child out of a `Program[App[State, UI], ...]` term, if shaped as expected;
/// falls back to the whole program term otherwise, so odd but well-formed programs still project.
fn program_state(program: &Term) -> EngineResult<Term> {
  let Some((_, program_args)) = program.as_call() else {
    return Ok(program.clone());
  };
  let Some(app) = program_args.first() else {
    return Ok(program.clone());
  };
  let Some((app_head, app_args)) = app.as_call() else {
    return Ok(program.clone());
  };
  if app_head.is_symbol_named(APP) {
    if let Some(state) = app_args.first() {
      return Ok(state.clone());
    }
  }
  Ok(program.clone())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::rules::Rule;
  use crate::term::pattern::var;

  fn universe_with_rule(rule: Rule, program: Term) -> Universe {
    Universe::new(
      Some(program),
      Term::named("Rules", [rule.to_term()]),
      Term::named("RuleRules", []),
      Term::named("MacroScopes", []),
    )
  }

  #[test]
  fn dispatch_rewrites_counter_state() {
    let rule = Rule {
      name: "inc".into(),
      lhs: Term::named(
        APPLY,
        [
          Term::symbol("Inc"),
          Term::named(
            APP,
            [
              Term::named("State", [Term::named("KV", [Term::symbol("Count"), var("n")])]),
              var("ui"),
            ],
          ),
        ],
      ),
      rhs: Term::named(
        APP,
        [
          Term::named(
            "State",
            [Term::named(
              "KV",
              [Term::symbol("Count"), Term::named("Add", [var("n"), Term::number(1.0)])],
            )],
          ),
          var("ui"),
        ],
      ),
      priority: 0.0,
    };

    let program = Term::named(
      "App",
      [
        Term::named("State", [Term::named("KV", [Term::symbol("Count"), Term::number(0.0)])]),
        Term::named("UI", [Term::symbol("Empty")]),
      ],
    );

    let universe = universe_with_rule(rule, program);
    let after = dispatch(&universe, Term::symbol("Inc")).unwrap();
    let (_, after_args) = after.program.as_ref().unwrap().as_call().unwrap();
    let (_, state_args) = after_args[0].as_call().unwrap();
    let (_, kv_args) = state_args[0].as_call().unwrap();
    assert_eq!(kv_args[1].as_number(), Some(1.0));
  }

  #[test]
  fn project_without_a_matching_rule_is_unmatchable() {
    let universe = Universe::empty().with_program(Term::named(APP, [Term::symbol("S"), Term::symbol("UI")]));
    let err = project(&universe, Term::symbol("Part")).unwrap_err();
    assert_eq!(err.kind, crate::error::ErrorKind::Unmatchable);
  }

  #[test]
  fn dispatch_without_a_program_is_an_error() {
    let universe = Universe::empty();
    assert!(dispatch(&universe, Term::symbol("Inc")).is_err());
  }
}
