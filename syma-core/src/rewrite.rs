/*!

The single-step rewriter (§4.4): outermost-leftmost rule application. At the current node, every
rule is tried in priority-then-source order; the first whose LHS matches wins. If nothing matches
at this node and the node is a `Call`, the rewriter recurses into the head first, then the
arguments left to right, stopping at the first descendant that changes.

Outermost-first is deliberate (§9): projection and dispatch rely on rules that fire at the root of
an envelope expression before their children are touched.

*/

use crate::env::Env;
use crate::error::EngineResult;
use crate::matcher::{match_term, MatchBudget, DEFAULT_MATCH_BUDGET};
use crate::rules::Rule;
use crate::subst::subst;
use crate::term::Term;

/// One step of the matching position, from the root down to where a rewrite happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathStep {
  Head,
  Index(usize),
}

impl std::fmt::Display for PathStep {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      PathStep::Head => write!(f, "head"),
      PathStep::Index(i) => write!(f, "[{i}]"),
    }
  }
}

pub fn render_path(path: &[PathStep]) -> String {
  path.iter().map(PathStep::to_string).collect::<Vec<_>>().join(".")
}

#[derive(Debug, Clone)]
pub struct StepResult {
  pub changed: bool,
  pub term: Term,
  pub rule: Option<Rule>,
  pub path: Vec<PathStep>,
}

impl StepResult {
  fn unchanged(term: Term) -> Self {
    StepResult { changed: false, term, rule: None, path: Vec::new() }
  }
}

/// Apply the first matching rule at the outermost-leftmost applicable position of `term`.
pub fn apply_once(term: &Term, rules: &[Rule]) -> EngineResult<StepResult> {
  try_at_node(term, rules)
}

fn try_at_node(term: &Term, rules: &[Rule]) -> EngineResult<StepResult> {
  for rule in rules {
    let mut budget = MatchBudget::new(DEFAULT_MATCH_BUDGET);
    if let Some(env) = match_term(&rule.lhs, term, Env::new(), &mut budget)? {
      let rewritten = subst(&rule.rhs, &env)?;
      return Ok(StepResult { changed: true, term: rewritten, rule: Some(rule.clone()), path: Vec::new() });
    }
  }

  let Some((head, args)) = term.as_call() else {
    return Ok(StepResult::unchanged(term.clone()));
  };

  let head_step = try_at_node(head, rules)?;
  if head_step.changed {
    let mut path = vec![PathStep::Head];
    path.extend(head_step.path);
    let rebuilt = Term::call(head_step.term, args.to_vec());
    return Ok(StepResult { changed: true, term: rebuilt, rule: head_step.rule, path });
  }

  for (i, arg) in args.iter().enumerate() {
    let arg_step = try_at_node(arg, rules)?;
    if arg_step.changed {
      let mut path = vec![PathStep::Index(i)];
      path.extend(arg_step.path);
      let mut new_args = args.to_vec();
      new_args[i] = arg_step.term;
      let rebuilt = Term::call(head.clone(), new_args);
      return Ok(StepResult { changed: true, term: rebuilt, rule: arg_step.rule, path });
    }
  }

  Ok(StepResult::unchanged(term.clone()))
}
