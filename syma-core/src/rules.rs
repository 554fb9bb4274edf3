/*!

Rules (§3.3) and the rule-set extractor, including the meta-rule (RuleRules) stage and `Splat`
expansion (§4.6, §4.7).

A [`Rule`] is `(name, lhs, rhs, priority)`. Rules live inside the `Universe`'s `Rules[...]` term,
each possibly wrapped in `TaggedRule[Sym(module), entry]` by the module compiler (§4.9) so that
macro scoping can tell which module an entry came from. An entry need not already be `R[name, lhs,
rhs, priority?]`-shaped: it may be arbitrary macro-sugar (e.g. `Def[...]`) that a `RuleRules`
meta-rule turns into one or more real rules, possibly via `Splat`, once normalized (§4.6, §4.7).
Extraction normalizes each entry against its eligible meta-rules first, *then* requires the result
to be rule-shaped, and finally strips the `TaggedRule`/`TaggedRuleRule` envelopes.

*/

use syma_abs::{HashMap, HashSet, IString};

use crate::error::{EngineError, EngineResult};
use crate::normalize::normalize;
use crate::term::Term;
use crate::universe::Universe;

pub const R: &str = "R";
pub const TAGGED_RULE: &str = "TaggedRule";
pub const TAGGED_RULE_RULE: &str = "TaggedRuleRule";
pub const SPLAT: &str = "Splat";
pub const SPLAT_ALIAS: &str = "...!";

/// Meta-rewriting a rule set is itself bounded, separately from the runtime normalization budget.
pub const META_MAX_STEPS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
  pub name: IString,
  pub lhs: Term,
  pub rhs: Term,
  pub priority: f64,
}

impl Rule {
  /// Render this rule back into its canonical `R[name, lhs, rhs, priority]` term.
  pub fn to_term(&self) -> Term {
    Term::named(
      R,
      [
        Term::string(self.name.as_str()),
        self.lhs.clone(),
        self.rhs.clone(),
        Term::number(self.priority),
      ],
    )
  }

  /// Parse a rule from its canonical `R[name, lhs, rhs, priority?]` term; `priority` defaults to 0.
  pub fn from_term(term: &Term) -> EngineResult<Rule> {
    let (head, args) = term
      .as_call()
      .ok_or_else(|| EngineError::invalid_pattern(format!("expected R[...], found {term}")))?;
    if !head.is_symbol_named(R) || args.len() < 3 || args.len() > 4 {
      return Err(EngineError::invalid_pattern(format!("expected R[name, lhs, rhs, priority?], found {term}")));
    }
    let name = args[0]
      .as_str()
      .ok_or_else(|| EngineError::invalid_pattern("rule name must be a String"))?;
    let priority = match args.get(3) {
      Some(p) => p.as_number().ok_or_else(|| EngineError::invalid_pattern("rule priority must be a Number"))?,
      None => 0.0,
    };
    Ok(Rule { name: IString::from(name), lhs: args[1].clone(), rhs: args[2].clone(), priority })
  }
}

/// A rule (or meta-rule) paired with the module it was compiled from, if any. Untagged rules
/// (`module: None`) are treated as globally visible to every module's meta-rewrite (§4.6).
struct Tagged {
  module: Option<IString>,
  rule: Rule,
}

/// An entry of a `Rules[...]` section paired with its origin module, *before* shape validation.
/// A `Rules[...]` entry is not required to already be `R[...]`-shaped (§4.6 second bullet): it may
/// be arbitrary macro-sugar (e.g. `Def[...]`) that only resolves to one or more real rules once
/// normalized against the eligible `RuleRules`.
struct TaggedTerm {
  module: Option<IString>,
  term: Term,
}

/// Split a `Rules[...]`/`RuleRules[...]` list into its entries, unwrapping an optional
/// `TaggedRule`/`TaggedRuleRule` envelope, without assuming anything about the inner term's shape.
fn split_tagged_entries(list_term: &Term, list_head: &str, tag_head: &str) -> EngineResult<Vec<TaggedTerm>> {
  let (head, entries) = list_term
    .as_call()
    .ok_or_else(|| EngineError::invalid_module(format!("expected {list_head}[...]")))?;
  if !head.is_symbol_named(list_head) {
    return Err(EngineError::invalid_module(format!("expected {list_head}[...], found {head}")));
  }

  let mut out = Vec::with_capacity(entries.len());
  for entry in entries {
    let (entry_head, entry_args) = entry
      .as_call()
      .ok_or_else(|| EngineError::invalid_module(format!("malformed entry in {list_head}: {entry}")))?;

    if entry_head.is_symbol_named(tag_head) {
      if entry_args.len() != 2 {
        return Err(EngineError::invalid_module(format!("malformed {tag_head}: {entry}")));
      }
      let module = entry_args[0]
        .as_symbol()
        .ok_or_else(|| EngineError::invalid_module(format!("{tag_head} module must be a Symbol")))?;
      out.push(TaggedTerm { module: Some(module), term: entry_args[1].clone() });
    } else {
      out.push(TaggedTerm { module: None, term: entry.clone() });
    }
  }
  Ok(out)
}

/// Parse a `RuleRules[...]` list into actual [`Rule`]s: unlike `Rules[...]` entries, a meta-rule
/// must already be `R[...]`-shaped, since it is used directly as a matcher/substituter rule.
fn parse_tagged_list(list_term: &Term, list_head: &str, tag_head: &str) -> EngineResult<Vec<Tagged>> {
  split_tagged_entries(list_term, list_head, tag_head)?
    .into_iter()
    .map(|t| Ok(Tagged { module: t.module, rule: Rule::from_term(&t.term)? }))
    .collect()
}

/// Stable sort by priority descending; ties preserve source (list) order (§4.6, invariant 6/7 of
/// the testable properties).
fn sort_by_priority(rules: &mut [Rule]) {
  rules.sort_by(|a, b| b.priority.partial_cmp(&a.priority).unwrap_or(std::cmp::Ordering::Equal));
}

/// Which source modules' `RuleRules` are visible to a rule tagged with `module` (§4.6, §4.9).
fn macro_scope_of(
  module: &IString,
  scopes: &HashMap<IString, HashSet<IString>>,
  candidate: &Option<IString>,
) -> bool {
  match candidate {
    None => true,
    Some(candidate_module) => {
      candidate_module == module || scopes.get(module).map_or(false, |scope| scope.contains(candidate_module))
    }
  }
}

/// Parse the `MacroScopes[ Module[Name, RuleRulesFrom[...]] ... ]` term into a lookup table.
fn parse_macro_scopes(term: &Term) -> EngineResult<HashMap<IString, HashSet<IString>>> {
  let (head, entries) = term
    .as_call()
    .ok_or_else(|| EngineError::invalid_module("expected MacroScopes[...]"))?;
  if !head.is_symbol_named("MacroScopes") {
    return Err(EngineError::invalid_module("expected MacroScopes[...]"));
  }

  let mut scopes = HashMap::new();
  for entry in entries {
    let (entry_head, entry_args) = entry
      .as_call()
      .ok_or_else(|| EngineError::invalid_module(format!("malformed MacroScopes entry: {entry}")))?;
    if !entry_head.is_symbol_named("Module") || entry_args.len() != 2 {
      return Err(EngineError::invalid_module(format!("malformed MacroScopes entry: {entry}")));
    }
    let module = entry_args[0]
      .as_symbol()
      .ok_or_else(|| EngineError::invalid_module("MacroScopes module name must be a Symbol"))?;
    let (from_head, from_args) = entry_args[1]
      .as_call()
      .ok_or_else(|| EngineError::invalid_module("expected RuleRulesFrom[...]"))?;
    if !from_head.is_symbol_named("RuleRulesFrom") {
      return Err(EngineError::invalid_module("expected RuleRulesFrom[...]"));
    }
    let visible: HashSet<IString> = from_args
      .iter()
      .map(|t| t.as_symbol().ok_or_else(|| EngineError::invalid_module("RuleRulesFrom entries must be Symbols")))
      .collect::<EngineResult<_>>()?;
    scopes.insert(module, visible);
  }
  Ok(scopes)
}

/// Expand any `Splat[r1, r2, ...]` occurring directly in a meta-normalized rule term into its
/// sibling `R[...]` rules, recursively (§4.7).
fn flatten_splat(term: &Term, out: &mut Vec<Rule>) -> EngineResult<()> {
  if let Some((head, args)) = term.as_call() {
    if head.is_symbol_named(SPLAT) || head.is_symbol_named(SPLAT_ALIAS) {
      for arg in args {
        flatten_splat(arg, out)?;
      }
      return Ok(());
    }
    if head.is_symbol_named(R) {
      out.push(Rule::from_term(term)?);
      return Ok(());
    }
  }
  Err(EngineError::invalid_pattern(format!(
    "meta-rewrite produced a non-rule, non-Splat term: {term}"
  )))
}

/// Extract the effective, priority-sorted rule set of a `Universe` (§4.6): normalize each
/// `Rules[...]` entry — which need not already be `R[...]`-shaped, it may be arbitrary macro-sugar
/// such as `Def[...]` — against the eligible `RuleRules` to obtain its effective rule-shaped form,
/// expand any `Splat`s, then sort by priority with ties preserving source order.
pub fn extract_rules(universe: &Universe) -> EngineResult<Vec<Rule>> {
  let raw_rules = split_tagged_entries(&universe.rules, "Rules", TAGGED_RULE)?;

  let has_meta_rules = universe
    .rule_rules
    .as_call()
    .map_or(false, |(_, entries)| !entries.is_empty());

  if !has_meta_rules {
    // No meta-rules means no term can be rewritten into rule shape; every entry must already be
    // `R[...]`-shaped.
    let mut rules: Vec<Rule> = raw_rules.into_iter().map(|t| Rule::from_term(&t.term)).collect::<EngineResult<_>>()?;
    sort_by_priority(&mut rules);
    return Ok(rules);
  }

  let raw_meta = parse_tagged_list(&universe.rule_rules, "RuleRules", TAGGED_RULE_RULE)?;
  let macro_scopes = parse_macro_scopes(&universe.macro_scopes)?;

  let mut effective = Vec::new();
  for tagged in &raw_rules {
    let mut eligible: Vec<Rule> = raw_meta
      .iter()
      .filter(|m| match &tagged.module {
        None => true,
        Some(module) => macro_scope_of(module, &macro_scopes, &m.module),
      })
      .map(|m| m.rule.clone())
      .collect();
    sort_by_priority(&mut eligible);

    if eligible.is_empty() {
      effective.push(tagged.term.clone());
      continue;
    }

    let rewritten = normalize(&tagged.term, &eligible, META_MAX_STEPS)?;
    effective.push(rewritten);
  }

  let mut rules = Vec::new();
  for term in &effective {
    flatten_splat(term, &mut rules)?;
  }
  sort_by_priority(&mut rules);
  Ok(rules)
}
