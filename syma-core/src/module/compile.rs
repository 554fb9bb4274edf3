/*!

The module compiler/linker (§4.9): collects every module transitively reachable from an entry
module, topologically sorts them, qualifies symbols, expands definitions into rules, tags rules by
origin, computes macro scopes, and emits a `Universe`.

Surface source parsing happens outside the core (§1); this pipeline's input is a map of module name
to already-parsed `Module[...]` Terms — as if a host had run its own parser over source files and
hands the resulting ASTs to the linker.

*/

use syma_abs::{tracing, HashMap, HashSet, IString};

use super::ast::{parse_module, ModuleDecl};
use super::qualify::{qualify_term, QualifyContext};
use crate::error::{EngineError, EngineResult};
use crate::rules::{Rule, TAGGED_RULE, TAGGED_RULE_RULE};
use crate::term::Term;
use crate::universe::Universe;

/// The well-known module whose `RuleRules` are implicitly visible to every other module (§4.9
/// step 4, step 8).
pub const CORE_MODULE: &str = "Core/Syntax/Global";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileMode {
  /// The entry module's `Program` becomes the emitted `Universe`'s `Program`; missing one is an
  /// error.
  Entry,
  /// `Program` is always omitted from the emitted `Universe`, even if the entry module has one.
  Library,
}

/// A host-provided source of already-parsed `Module[...]` Terms, keyed by module name, used to
/// resolve imports during the reachability walk.
pub trait ModuleSource {
  fn load(&self, name: &str) -> Option<Term>;
}

impl ModuleSource for HashMap<IString, Term> {
  fn load(&self, name: &str) -> Option<Term> {
    self.get(&IString::from(name)).cloned()
  }
}

/// Step 3: collect every module transitively reachable from `entry`, detecting missing modules and
/// import cycles along the way.
fn collect_reachable(
  entry: &str,
  source: &dyn ModuleSource,
) -> EngineResult<HashMap<IString, ModuleDecl>> {
  let mut collected = HashMap::new();
  let mut stack = Vec::new();
  collect_one(entry, source, &mut collected, &mut stack)?;
  Ok(collected)
}

fn collect_one(
  name: &str,
  source: &dyn ModuleSource,
  collected: &mut HashMap<IString, ModuleDecl>,
  stack: &mut Vec<IString>,
) -> EngineResult<()> {
  let name_istr = IString::from(name);
  if collected.contains_key(&name_istr) {
    return Ok(());
  }
  if stack.contains(&name_istr) {
    let mut cycle: Vec<String> = stack.iter().map(|m| m.to_string()).collect();
    cycle.push(name.to_string());
    return Err(EngineError::circular_dependency(cycle.join(" -> ")));
  }

  let term = source
    .load(name)
    .ok_or_else(|| EngineError::unknown_module(format!("cannot resolve module `{name}`")))?;
  let decl = parse_module(&term, Some(name))?;

  stack.push(name_istr);
  for import in &decl.imports {
    collect_one(import.module.as_str(), source, collected, stack)?;
  }
  stack.pop();

  collected.insert(name_istr, decl);
  Ok(())
}

/// Step 4: topologically sort modules (imports before importers), always placing [`CORE_MODULE`]
/// first if it is present in the loaded set.
fn topological_sort(modules: &HashMap<IString, ModuleDecl>) -> EngineResult<Vec<IString>> {
  let mut in_degree: HashMap<IString, usize> = modules.keys().map(|m| (*m, 0)).collect();
  let mut dependents: HashMap<IString, Vec<IString>> = HashMap::new();

  for decl in modules.values() {
    for import in &decl.imports {
      *in_degree.get_mut(&decl.name).unwrap() += 1;
      dependents.entry(import.module).or_default().push(decl.name);
    }
  }

  let mut ready: Vec<IString> = in_degree.iter().filter(|(_, d)| **d == 0).map(|(m, _)| *m).collect();
  ready.sort_by_key(|m| m.as_str() != CORE_MODULE); // Core module first among the initially-ready.

  let mut order = Vec::with_capacity(modules.len());
  while let Some(next) = ready.pop() {
    order.push(next);
    if let Some(affected) = dependents.get(&next) {
      for dependent in affected {
        let degree = in_degree.get_mut(dependent).unwrap();
        *degree -= 1;
        if *degree == 0 {
          ready.push(*dependent);
        }
      }
    }
  }

  if order.len() != modules.len() {
    return Err(EngineError::circular_dependency("import graph contains a cycle not on the entry path"));
  }

  if let Some(core_pos) = order.iter().position(|m| m.as_str() == CORE_MODULE) {
    let core = order.remove(core_pos);
    order.insert(0, core);
  }

  Ok(order)
}

/// Step 6: expand one `defs[name] = expr` entry into its symbol-form and nullary-call-form rules.
fn expand_definition(module: &str, name: &str, expr: &Term) -> (Rule, Rule) {
  let qualified = format!("{module}/{name}");
  let symbol_rule = Rule {
    name: format!("{qualified}/Def").into(),
    lhs: Term::symbol(qualified.clone()),
    rhs: expr.clone(),
    priority: 1000.0,
  };
  let call_rule = Rule {
    name: format!("{qualified}/DefCall").into(),
    lhs: Term::named(qualified.clone(), []),
    rhs: expr.clone(),
    priority: 999.0,
  };
  (symbol_rule, call_rule)
}

/// Step 8: per module, the set of source modules whose `RuleRules` may rewrite this module's
/// rules — itself, [`CORE_MODULE`] if loaded, and every module imported with `macro`.
fn macro_scope_of(decl: &ModuleDecl, modules: &HashMap<IString, ModuleDecl>) -> HashSet<IString> {
  let mut scope = HashSet::new();
  scope.insert(decl.name);
  if modules.contains_key(&IString::from(CORE_MODULE)) {
    scope.insert(IString::from(CORE_MODULE));
  }
  for import in &decl.imports {
    if import.macro_visible {
      scope.insert(import.module);
    }
  }
  scope
}

/// Run the full compiler/linker pipeline (§4.9 steps 3-9) starting from `entry`.
pub fn compile(entry: &str, source: &dyn ModuleSource, mode: CompileMode) -> EngineResult<Universe> {
  let modules = collect_reachable(entry, source)?;
  let order = topological_sort(&modules)?;

  tracing::debug!(module_count = modules.len(), "linking module graph");

  let exports_by_module: HashMap<IString, HashSet<IString>> =
    modules.iter().map(|(name, decl)| (*name, decl.exports.clone())).collect();

  let mut tagged_rules = Vec::new();
  let mut tagged_rule_rules = Vec::new();
  let mut macro_scopes = Vec::new();
  let mut entry_program = None;

  for module_name in &order {
    let decl = &modules[module_name];
    let ctx = QualifyContext::build(decl, &exports_by_module);

    // Step 6: high-priority def rules come first, so they sort ahead of ordinary rules at equal
    // source position. Def-expansion always produces genuine rule-shaped terms; a `Rules[...]`
    // entry need not be rule-shaped yet, since it may be macro-sugar a `RuleRules` meta-rule turns
    // into real rules only once normalized (§4.6) — so it is qualified as a raw term rather than
    // assumed to already have `.lhs`/`.rhs`/`.priority` fields.
    let mut module_rule_terms = Vec::new();
    let mut def_names: Vec<&IString> = decl.defs.keys().collect();
    def_names.sort();
    for def_name in def_names {
      let expr = &decl.defs[def_name];
      let qualified_expr = qualify_term(expr, &ctx);
      let (symbol_rule, call_rule) = expand_definition(decl.name.as_str(), def_name.as_str(), &qualified_expr);
      module_rule_terms.push(symbol_rule.to_term());
      module_rule_terms.push(call_rule.to_term());
    }
    for term in &decl.rules {
      module_rule_terms.push(qualify_term(term, &ctx));
    }

    for term in module_rule_terms {
      tagged_rules.push(Term::named(TAGGED_RULE, [Term::symbol(*module_name), term]));
    }

    for rule in &decl.rule_rules {
      let tagged = Rule {
        name: rule.name,
        lhs: qualify_term(&rule.lhs, &ctx),
        rhs: qualify_term(&rule.rhs, &ctx),
        priority: rule.priority,
      };
      tagged_rule_rules.push(Term::named(TAGGED_RULE_RULE, [Term::symbol(*module_name), tagged.to_term()]));
    }

    let scope = macro_scope_of(decl, &modules);
    if !scope.is_empty() {
      let scope_terms: Vec<Term> = scope.into_iter().map(Term::symbol).collect();
      macro_scopes.push(Term::named("Module", [Term::symbol(*module_name), Term::named("RuleRulesFrom", scope_terms)]));
    }

    if module_name.as_str() == entry {
      entry_program = decl.program.as_ref().map(|p| qualify_term(p, &ctx));
    }
  }

  let program = match mode {
    CompileMode::Library => None,
    CompileMode::Entry => Some(
      entry_program
        .ok_or_else(|| EngineError::invalid_module(format!("entry module `{entry}` has no Program section")))?,
    ),
  };

  Ok(Universe::new(
    program,
    Term::named("Rules", tagged_rules),
    Term::named("RuleRules", tagged_rule_rules),
    Term::named("MacroScopes", macro_scopes),
  ))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::module::ast::{DEFS, EXPORT, MODULE, PROGRAM, RULES, RULE_RULES};
  use crate::rules::{R, SPLAT};
  use crate::term::pattern::var;

  fn simple_module(name: &str, rules: Vec<Term>) -> Term {
    Term::named(MODULE, std::iter::once(Term::symbol(name)).chain(std::iter::once(Term::named(RULES, rules))))
  }

  #[test]
  fn compiles_a_single_module_in_entry_mode() {
    let rule = Term::named(R, [Term::string("m/r"), Term::symbol("A"), Term::symbol("B"), Term::number(0.0)]);
    let module = Term::named(
      MODULE,
      [
        Term::symbol("M"),
        Term::named(RULES, [rule]),
        Term::named(PROGRAM, [Term::named("App", [Term::symbol("S"), Term::symbol("UI")])]),
      ],
    );
    let mut modules = HashMap::new();
    modules.insert(IString::from("M"), module);

    let universe = compile("M", &modules, CompileMode::Entry).unwrap();
    assert!(universe.program.is_some());
    let (_, rules) = universe.rules.as_call().unwrap();
    assert_eq!(rules.len(), 1);
  }

  #[test]
  fn entry_mode_requires_a_program() {
    let module = simple_module("M", vec![]);
    let mut modules = HashMap::new();
    modules.insert(IString::from("M"), module);
    assert!(compile("M", &modules, CompileMode::Entry).is_err());
  }

  #[test]
  fn library_mode_omits_the_program_even_if_present() {
    let module = Term::named(
      MODULE,
      [Term::symbol("M"), Term::named(PROGRAM, [Term::symbol("S")])],
    );
    let mut modules = HashMap::new();
    modules.insert(IString::from("M"), module);
    let universe = compile("M", &modules, CompileMode::Library).unwrap();
    assert!(universe.program.is_none());
  }

  #[test]
  fn unknown_import_is_an_error() {
    let module = Term::named(
      MODULE,
      [
        Term::symbol("M"),
        Term::named(
          "Import",
          [Term::named("Imp", [Term::symbol("Missing"), Term::symbol("Missing")])],
        ),
        Term::named(PROGRAM, [Term::symbol("S")]),
      ],
    );
    let mut modules = HashMap::new();
    modules.insert(IString::from("M"), module);
    assert!(compile("M", &modules, CompileMode::Entry).is_err());
  }

  #[test]
  fn import_cycle_is_detected() {
    let a = Term::named(
      MODULE,
      [
        Term::symbol("A"),
        Term::named("Import", [Term::named("Imp", [Term::symbol("B"), Term::symbol("B")])]),
      ],
    );
    let b = Term::named(
      MODULE,
      [
        Term::symbol("B"),
        Term::named("Import", [Term::named("Imp", [Term::symbol("A"), Term::symbol("A")])]),
      ],
    );
    let mut modules = HashMap::new();
    modules.insert(IString::from("A"), a);
    modules.insert(IString::from("B"), b);
    assert!(compile("A", &modules, CompileMode::Library).is_err());
  }

  #[test]
  fn definitions_expand_into_high_priority_rules() {
    let module = Term::named(
      MODULE,
      [Term::symbol("M"), Term::named(DEFS, [Term::named("KV", [Term::symbol("Greeting"), Term::string("hi")])])],
    );
    let mut modules = HashMap::new();
    modules.insert(IString::from("M"), module);
    let universe = compile("M", &modules, CompileMode::Library).unwrap();
    let rules = crate::rules::extract_rules(&universe).unwrap();
    assert!(rules.iter().any(|r| r.name.as_str() == "M/Greeting/Def" && r.priority == 1000.0));
    assert!(rules.iter().any(|r| r.name.as_str() == "M/Greeting/DefCall" && r.priority == 999.0));
  }

  #[test]
  fn exported_names_are_qualified_on_open_import() {
    let provider = Term::named(
      MODULE,
      [Term::symbol("Provider"), Term::named(EXPORT, [Term::symbol("Helper")])],
    );
    let consumer = Term::named(
      MODULE,
      [
        Term::symbol("Consumer"),
        Term::named(
          "Import",
          [Term::named(
            "Imp",
            [
              Term::symbol("Provider"),
              Term::symbol("Provider"),
              Term::named("Props", [Term::named("KV", [Term::symbol("Open"), Term::symbol("True")])]),
            ],
          )],
        ),
        Term::named(RULES, [Term::named(R, [Term::string("c/r"), Term::symbol("Helper"), Term::symbol("Helper"), Term::number(0.0)])]),
      ],
    );
    let mut modules = HashMap::new();
    modules.insert(IString::from("Provider"), provider);
    modules.insert(IString::from("Consumer"), consumer);
    let universe = compile("Consumer", &modules, CompileMode::Library).unwrap();
    let rules = crate::rules::extract_rules(&universe).unwrap();
    assert_eq!(rules[0].lhs.as_symbol().unwrap().as_str(), "Provider/Helper");
  }

  #[test]
  fn bare_macro_sugar_rule_survives_compilation_and_meta_rewriting() {
    // A Rules[...] entry that is not R[...]-shaped (Def[Sym]) is carried through parsing and
    // qualification untouched, then expanded into real rules once the module's own RuleRules meta-
    // rule runs during extraction (§4.6).
    let def_term = Term::named("Def", [Term::symbol("Double")]);
    let r1 = Term::named(R, [Term::string("double/sym"), Term::symbol("Double"), Term::number(2.0), Term::number(0.0)]);
    let r2 = Term::named(
      R,
      [Term::string("double/call"), Term::named("Double", []), Term::number(2.0), Term::number(0.0)],
    );
    let meta_rule = Term::named(
      R,
      [
        Term::string("expand-def"),
        Term::named("Def", [var("name")]),
        Term::named(SPLAT, [r1, r2]),
        Term::number(0.0),
      ],
    );
    let module = Term::named(
      MODULE,
      [Term::symbol("M"), Term::named(RULES, [def_term]), Term::named(RULE_RULES, [meta_rule])],
    );
    let mut modules = HashMap::new();
    modules.insert(IString::from("M"), module);

    let universe = compile("M", &modules, CompileMode::Library).unwrap();
    let rules = crate::rules::extract_rules(&universe).unwrap();
    assert_eq!(rules.len(), 2);
    assert!(rules.iter().any(|r| r.name.as_str() == "double/sym"));
    assert!(rules.iter().any(|r| r.name.as_str() == "double/call"));
  }
}
