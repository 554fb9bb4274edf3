//! End-to-end integration tests mirroring the concrete scenarios in §8 of the design notes.

use syma_core::error::ErrorKind;
use syma_core::normalize::{normalize, DEFAULT_MAX_STEPS};
use syma_core::rules::Rule;
use syma_core::term::pattern::{var, var_rest};
use syma_core::term::Term;
use syma_core::universe::Universe;
use syma_core::{dispatch, extract_rules};

fn rule(name: &str, lhs: Term, rhs: Term, priority: f64) -> Rule {
  Rule { name: name.into(), lhs, rhs, priority }
}

#[test]
fn arithmetic_expressions_fold_to_a_single_number() {
  // {Add 1 {Mul 2 3}} -> 7, purely via the primitive folder, no rules needed.
  let expr = Term::named("Add", [Term::number(1.0), Term::named("Mul", [Term::number(2.0), Term::number(3.0)])]);
  let result = normalize(&expr, &[], DEFAULT_MAX_STEPS).unwrap();
  assert_eq!(result.as_number(), Some(7.0));
}

#[test]
fn rest_variables_reverse_a_list_via_accumulator() {
  // Rev[L[1,2,3]] -> L[3,2,1], built from RevAcc[rest..., L[accumulated...]] the way a
  // rest-variable-driven list reversal rule set is written: peel one element off the front of
  // the input list, prepend it to an accumulator, recurse; base case hands back the accumulator.
  let rev_base = rule(
    "rev-base",
    Term::named("RevAcc", [Term::named("L", []), var("acc")]),
    var("acc"),
    10.0,
  );
  let rev_step = rule(
    "rev-step",
    Term::named("RevAcc", [Term::named("L", [var("x"), var_rest("rest")]), Term::named("L", [var_rest("acc_args")])]),
    Term::named(
      "RevAcc",
      [Term::named("L", [var_rest("rest")]), Term::named("L", [var("x"), var_rest("acc_args")])],
    ),
    0.0,
  );
  let rev_entry = rule(
    "rev-entry",
    Term::named("Rev", [var("xs")]),
    Term::named("RevAcc", [var("xs"), Term::named("L", [])]),
    0.0,
  );

  let input = Term::named("Rev", [Term::named("L", [Term::number(1.0), Term::number(2.0), Term::number(3.0)])]);
  let rules = [rev_entry, rev_step, rev_base];
  let result = normalize(&input, &rules, DEFAULT_MAX_STEPS).unwrap();

  let expected = Term::named("L", [Term::number(3.0), Term::number(2.0), Term::number(1.0)]);
  assert_eq!(result, expected);
}

#[test]
fn a_higher_priority_rule_wins_over_an_overlapping_lower_priority_one() {
  // Two rules both match F[1]; the higher-priority one must fire regardless of source order.
  let low = rule("generic", Term::named("F", [var("x")]), Term::symbol("Generic"), 0.0);
  let high = rule("specific", Term::named("F", [Term::number(1.0)]), Term::symbol("Specific"), 10.0);

  let rules = [low, high];
  let result = normalize(&Term::named("F", [Term::number(1.0)]), &rules, DEFAULT_MAX_STEPS).unwrap();
  assert_eq!(result, Term::symbol("Specific"));
}

#[test]
fn dispatching_an_action_advances_a_counter_program() {
  let inc_rule = rule(
    "inc",
    Term::named(
      "Apply",
      [
        Term::symbol("Inc"),
        Term::named(
          "App",
          [Term::named("State", [Term::named("KV", [Term::symbol("Count"), var("n")])]), var("ui")],
        ),
      ],
    ),
    Term::named(
      "App",
      [
        Term::named("State", [Term::named("KV", [Term::symbol("Count"), Term::named("Add", [var("n"), Term::number(1.0)])])]),
        var("ui"),
      ],
    ),
    0.0,
  );

  let program = Term::named(
    "App",
    [Term::named("State", [Term::named("KV", [Term::symbol("Count"), Term::number(41.0)])]), Term::symbol("UI")],
  );
  let universe = Universe::new(
    Some(program),
    Term::named("Rules", [inc_rule.to_term()]),
    Term::named("RuleRules", []),
    Term::named("MacroScopes", []),
  );

  let after = dispatch(&universe, Term::symbol("Inc")).unwrap();
  let (_, app_args) = after.program.as_ref().unwrap().as_call().unwrap();
  let (_, state_args) = app_args[0].as_call().unwrap();
  let (_, kv_args) = state_args[0].as_call().unwrap();
  assert_eq!(kv_args[1].as_number(), Some(42.0));
}

#[test]
fn a_meta_rule_rewrites_the_rule_set_before_it_is_used() {
  // A RuleRules entry that turns any R[...] whose name starts with "auto-" into a doubled
  // priority, exercised by normalizing a meta-rule over a rule-shaped term directly (the same
  // path extract_rules takes internally).
  let raw_rule = rule("auto-double", Term::named("X", []), Term::symbol("Y"), 5.0);

  let bump_priority = rule(
    "bump",
    Term::named(
      "R",
      [var("name"), var("lhs"), var("rhs"), var("p")],
    ),
    Term::named(
      "R",
      [var("name"), var("lhs"), var("rhs"), Term::named("Mul", [var("p"), Term::number(2.0)])],
    ),
    0.0,
  );

  let rules = Term::named("Rules", [raw_rule.to_term()]);
  let rule_rules = Term::named("RuleRules", [bump_priority.to_term()]);
  let universe = Universe::new(None, rules, rule_rules, Term::named("MacroScopes", []));

  let extracted = extract_rules(&universe).unwrap();
  assert_eq!(extracted.len(), 1);
  assert_eq!(extracted[0].priority, 10.0);
}

#[test]
fn splat_expands_a_meta_rewrite_into_several_sibling_rules() {
  let raw = rule("seed", Term::named("Seed", []), Term::symbol("Unused"), 0.0);

  let expand = rule(
    "expand-seed",
    Term::named("R", [var("name"), Term::named("Seed", []), var("rhs"), var("p")]),
    Term::named(
      "Splat",
      [
        Term::named("R", [Term::string("seed-a"), Term::named("SeedA", []), Term::symbol("A"), Term::number(0.0)]),
        Term::named("R", [Term::string("seed-b"), Term::named("SeedB", []), Term::symbol("B"), Term::number(0.0)]),
      ],
    ),
    0.0,
  );

  let rules = Term::named("Rules", [raw.to_term()]);
  let rule_rules = Term::named("RuleRules", [expand.to_term()]);
  let universe = Universe::new(None, rules, rule_rules, Term::named("MacroScopes", []));

  let mut names: Vec<String> = extract_rules(&universe).unwrap().into_iter().map(|r| r.name.to_string()).collect();
  names.sort();
  assert_eq!(names, vec!["seed-a".to_string(), "seed-b".to_string()]);
}

#[test]
fn a_nonterminating_rule_fails_with_nontermination_after_the_step_budget() {
  let loop_rule = rule("loop", Term::named("Loop", []), Term::named("Loop", []), 0.0);
  let err = normalize(&Term::named("Loop", []), &[loop_rule], 16).unwrap_err();
  assert_eq!(err.kind, ErrorKind::NonTermination(16));
}
