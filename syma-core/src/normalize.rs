/*!

Fixed-point normalization (§4.5): repeatedly [`crate::rewrite::apply_once`] the term, primitive-fold
the result, and stop once a step changes nothing — or fail with `NonTermination` once a step budget
is exhausted rather than looping forever (§4.5, §9).

*/

use tracing::trace;

use crate::error::{EngineError, EngineResult};
use crate::primitive;
use crate::rewrite::{apply_once, render_path};
use crate::rules::Rule;
use crate::term::Term;

pub const DEFAULT_MAX_STEPS: u64 = 10_000;

/// One recorded rewrite step, for callers that want a trace of how a term reached its normal form.
#[derive(Debug, Clone)]
pub struct StepRecord {
  pub before: Term,
  pub after: Term,
  pub rule_name: Option<syma_abs::IString>,
  pub path: String,
}

/// One rewrite-and-fold iteration: `applyOnce` then primitive-fold the result (§4.5). Folding can
/// make a term that `applyOnce` left unchanged different from its input, so `changed` reflects
/// either side having moved.
fn step_and_fold(term: &Term, rules: &[Rule]) -> EngineResult<(bool, Term, Option<Rule>, String)> {
  let step = apply_once(term, rules)?;
  let folded = primitive::fold(&step.term)?;
  let changed = step.changed || folded != *term;
  Ok((changed, folded, step.rule, render_path(&step.path)))
}

/// Normalize `term` under `rules`, failing with `NonTermination` after `max_steps` rewrites.
pub fn normalize(term: &Term, rules: &[Rule], max_steps: u64) -> EngineResult<Term> {
  let mut current = term.clone();
  for _ in 0..max_steps {
    let (changed, next, rule, path) = step_and_fold(&current, rules)?;
    if !changed {
      return Ok(current);
    }
    trace!(rule = rule.as_ref().map(|r| r.name.as_str()), %path, "rewrite step");
    current = next;
  }
  Err(EngineError::non_termination(max_steps))
}

/// As [`normalize`], but additionally returns every intermediate step taken. Callers pay the cost
/// of building the trace only when they ask for it.
pub fn normalize_with_trace(term: &Term, rules: &[Rule], max_steps: u64) -> EngineResult<(Term, Vec<StepRecord>)> {
  let mut current = term.clone();
  let mut trace = Vec::new();
  for _ in 0..max_steps {
    let (changed, next, rule_name, path) = step_and_fold(&current, rules)?;
    if !changed {
      return Ok((current, trace));
    }
    trace.push(StepRecord { before: current.clone(), after: next.clone(), rule_name: rule_name.map(|r| r.name), path });
    current = next;
  }
  Err(EngineError::non_termination(max_steps))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::term::pattern::var;

  fn rule(name: &str, lhs: Term, rhs: Term) -> Rule {
    Rule { name: name.into(), lhs, rhs, priority: 0.0 }
  }

  #[test]
  fn normalizes_to_a_fixed_point() {
    // Count[n] -> Count[n+1] would never terminate; instead use a rule that halts at a marker.
    let r = rule("step", Term::named("Inc", [var("n")]), Term::symbol("Done"));
    let result = normalize(&Term::named("Inc", [Term::number(1.0)]), &[r], 10).unwrap();
    assert_eq!(result, Term::symbol("Done"));
  }

  #[test]
  fn folds_primitives_even_with_no_rules_at_all() {
    let result = normalize(&Term::named("Add", [Term::number(1.0), Term::number(2.0)]), &[], 10).unwrap();
    assert_eq!(result.as_number(), Some(3.0));
  }

  #[test]
  fn exceeding_the_step_budget_is_non_termination() {
    // Loop -> Loop never stops matching, so this must hit the budget instead of looping forever.
    let r = rule("loop", Term::symbol("Loop"), Term::symbol("Loop"));
    let err = normalize(&Term::symbol("Loop"), &[r], 5).unwrap_err();
    assert!(matches!(err.kind, crate::error::ErrorKind::NonTermination(5)));
  }

  #[test]
  fn trace_records_every_step() {
    let r1 = rule("a", Term::symbol("A"), Term::symbol("B"));
    let r2 = rule("b", Term::symbol("B"), Term::symbol("C"));
    let (result, steps) = normalize_with_trace(&Term::symbol("A"), &[r1, r2], 10).unwrap();
    assert_eq!(result, Term::symbol("C"));
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0].rule_name.unwrap().as_str(), "a");
    assert_eq!(steps[1].rule_name.unwrap().as_str(), "b");
  }
}
