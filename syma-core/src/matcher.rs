/*!

The matcher (§4.1): binds pattern variables from a pattern against a subject term, backtracking
over where a sequence variable's slice begins and ends when more than one split is possible.

Match failure is not an error — it is a local `None`. Only a genuine resource failure
(backtracking budget exhausted, §5) or a malformed pattern propagates as an [`EngineError`].

*/

use smallvec::SmallVec;
use syma_abs::IString;

use crate::env::Env;
use crate::error::{EngineError, EngineResult};
use crate::term::pattern::{as_var, as_var_rest, is_wildcard};
use crate::term::Term;

/// Matcher backtracking is bounded by the product of sequence-variable choices considered while
/// matching one LHS (§5). Each candidate split counts against the budget.
pub struct MatchBudget {
  remaining: u64,
}

impl MatchBudget {
  pub fn new(limit: u64) -> Self {
    MatchBudget { remaining: limit }
  }

  fn spend(&mut self) -> EngineResult<()> {
    if self.remaining == 0 {
      return Err(EngineError::pattern_explosion());
    }
    self.remaining -= 1;
    Ok(())
  }
}

pub const DEFAULT_MATCH_BUDGET: u64 = 100_000;

/// Attempt to match `pattern` against `subject` under `env`, returning an extended environment on
/// success or `None` on local failure.
pub fn match_term(
  pattern: &Term,
  subject: &Term,
  env: Env,
  budget: &mut MatchBudget,
) -> EngineResult<Option<Env>> {
  if let Some(name) = as_var(pattern) {
    return Ok(match_var(name, subject, env));
  }

  if as_var_rest(pattern).is_some() {
    return Err(EngineError::invalid_pattern(
      "VarRest used outside a Call argument list",
    ));
  }

  match (pattern.as_call(), subject.as_call()) {
    (Some((p_head, p_args)), Some((s_head, s_args))) => {
      let Some(env) = match_term(p_head, s_head, env, budget)? else {
        return Ok(None);
      };
      match_args(p_args, s_args, env, budget)
    }
    (None, None) => Ok((pattern == subject).then_some(env)),
    _ => Ok(None),
  }
}

fn match_var(name: &str, subject: &Term, mut env: Env) -> Option<Env> {
  if is_wildcard(name) {
    return Some(env);
  }
  match env.get_single(name) {
    Some(bound) => (bound == subject).then_some(env),
    None => {
      env.bind_single(IString::from(name), subject.clone());
      Some(env)
    }
  }
}

/// The sequence-aware argument matching procedure of §4.1.
fn match_args(
  patterns: &[Term],
  subjects: &[Term],
  env: Env,
  budget: &mut MatchBudget,
) -> EngineResult<Option<Env>> {
  let rest_index = patterns.iter().position(|p| as_var_rest(p).is_some());

  let Some(i) = rest_index else {
    if patterns.len() != subjects.len() {
      return Ok(None);
    }
    let mut env = env;
    for (p, s) in patterns.iter().zip(subjects.iter()) {
      let Some(next_env) = match_term(p, s, env, budget)? else {
        return Ok(None);
      };
      env = next_env;
    }
    return Ok(Some(env));
  };

  let prefix = &patterns[..i];
  let name = as_var_rest(&patterns[i]).unwrap().to_string();
  let suffix = &patterns[i + 1..];

  if prefix.len() > subjects.len() {
    return Ok(None);
  }
  let Some(mut env) = match_args(prefix, &subjects[..i], env, budget)? else {
    return Ok(None);
  };

  let tail_subjects = &subjects[i..];
  let min_tail = suffix.iter().filter(|p| as_var_rest(p).is_none()).count();
  if tail_subjects.len() < min_tail {
    return Ok(None);
  }
  let max_take = tail_subjects.len() - min_tail;

  for take in 0..=max_take {
    budget.spend()?;
    let middle: SmallVec<[Term; 4]> = tail_subjects[..take].iter().cloned().collect();

    let mut candidate_env = env.clone();
    let consistent = if is_wildcard(&name) {
      true
    } else {
      match candidate_env.get_sequence(&name) {
        Some(existing) => existing == middle.as_slice(),
        None => {
          candidate_env.bind_sequence(IString::from(name.as_str()), middle.clone());
          true
        }
      }
    };

    if consistent {
      if let Some(result_env) = match_args(suffix, &tail_subjects[take..], candidate_env, budget)? {
        return Ok(Some(result_env));
      }
    }
  }

  Ok(None)
}
