/*!

Symbol qualification (§4.9 step 5): rewriting unqualified identifiers in a module's rules, defs,
and program to their fully-qualified `module/name` form, following imports and exports.

*/

use syma_abs::{HashMap, HashSet, IString};

use super::ast::ModuleDecl;
use super::builtins::{is_builtin, EVENT_HANDLER_KEYS};
use crate::term::pattern::{VAR, VAR_REST};
use crate::term::Term;

const KV: &str = "KV";
const R: &str = "R";
const APPLY: &str = "Apply";

/// Precomputed lookups a module's qualification pass needs, built once before walking any term.
pub struct QualifyContext<'a> {
  this_module: IString,
  /// alias -> real module name, for every import.
  aliases: HashMap<IString, IString>,
  /// exported name -> exporting module, for every import brought in with `open`.
  open_exports: HashMap<IString, IString>,
  /// exports ∪ defs.keys() ∪ {call-head symbols used anywhere in this module's rules/program} —
  /// the "appears elsewhere" heuristic of §4.9 step 5, resolved concretely (§9 Open Question).
  appears_elsewhere: HashSet<IString>,
  /// Exports of modules this one imports, needed to resolve an `open` import's name set. Keyed by
  /// module name.
  exports_by_module: &'a HashMap<IString, HashSet<IString>>,
}

impl<'a> QualifyContext<'a> {
  pub fn build(decl: &ModuleDecl, exports_by_module: &'a HashMap<IString, HashSet<IString>>) -> QualifyContext<'a> {
    let mut aliases = HashMap::new();
    let mut open_exports = HashMap::new();
    for import in &decl.imports {
      aliases.insert(import.alias, import.module);
      if import.open {
        if let Some(exported) = exports_by_module.get(&import.module) {
          for name in exported {
            open_exports.insert(*name, import.module);
          }
        }
      }
    }

    let mut appears_elsewhere: HashSet<IString> = decl.exports.iter().copied().collect();
    appears_elsewhere.extend(decl.defs.keys().copied());
    for term in &decl.rules {
      collect_call_heads(term, &mut appears_elsewhere);
    }
    for rule in &decl.rule_rules {
      collect_call_heads(&rule.lhs, &mut appears_elsewhere);
      collect_call_heads(&rule.rhs, &mut appears_elsewhere);
    }
    if let Some(program) = &decl.program {
      collect_call_heads(program, &mut appears_elsewhere);
    }

    QualifyContext { this_module: decl.name, aliases, open_exports, appears_elsewhere, exports_by_module }
  }
}

fn collect_call_heads(term: &Term, out: &mut HashSet<IString>) {
  if let Some((head, args)) = term.as_call() {
    if let Some(name) = head.as_symbol() {
      out.insert(name);
    } else {
      collect_call_heads(head, out);
    }
    for arg in args {
      collect_call_heads(arg, out);
    }
  }
}

fn qualify_symbol(name: &str, ctx: &QualifyContext) -> IString {
  if let Some((prefix, rest)) = name.split_once('/') {
    return match ctx.aliases.get(&IString::from(prefix)) {
      Some(real_module) => IString::from(format!("{real_module}/{rest}")),
      None => IString::from(name),
    };
  }

  if name.starts_with(':') {
    return IString::from(name);
  }

  if is_builtin(name) {
    return IString::from(name);
  }

  let name_istr = IString::from(name);
  if let Some(exporting_module) = ctx.open_exports.get(&name_istr) {
    return IString::from(format!("{exporting_module}/{name}"));
  }

  if ctx.aliases.contains_key(&name_istr) {
    return name_istr;
  }

  if ctx.appears_elsewhere.contains(&name_istr) {
    return IString::from(format!("{}/{name}", ctx.this_module));
  }

  name_istr
}

/// Qualify every free symbol in `term` per §4.9 step 5. `preserve_head` skips qualifying a head
/// symbol verbatim at this call site only (used for `R`'s name argument and `Apply`'s action head,
/// which callers pass down via the recursive shape below instead of via this flag directly).
pub fn qualify_term(term: &Term, ctx: &QualifyContext) -> Term {
  if let Some(name) = term.as_symbol() {
    return Term::symbol(qualify_symbol(name.as_str(), ctx));
  }
  if term.as_number().is_some() || term.as_str().is_some() {
    return term.clone();
  }

  let (head, args) = term.as_call().expect("Term is Symbol, Number, String, or Call");
  let head_name = head.as_symbol();

  // Var[name] / VarRest[name]: the inner String is never touched (it isn't a Symbol), and the
  // head itself is builtin vocabulary, so the generic path already does the right thing — but
  // spelling it out keeps the intent visible.
  if head_name.map_or(false, |h| h.as_str() == VAR || h.as_str() == VAR_REST) {
    return term.clone();
  }

  // R[name, lhs, rhs, priority?]: the rule-name String in position 0 is a String, already
  // preserved verbatim by construction; qualify the rest normally.
  if head_name.map_or(false, |h| h.as_str() == R) {
    let qualified_args: Vec<Term> = args.iter().map(|a| qualify_term(a, ctx)).collect();
    return Term::call(Term::symbol(R), qualified_args);
  }

  // Apply[action, program]: the action head (args[0]) is preserved verbatim.
  if head_name.map_or(false, |h| h.as_str() == APPLY) && !args.is_empty() {
    let mut qualified_args = vec![args[0].clone()];
    qualified_args.extend(args[1..].iter().map(|a| qualify_term(a, ctx)));
    return Term::call(Term::symbol(APPLY), qualified_args);
  }

  // KV[key, value] where key is a recognized event-handler key: the value is left untouched.
  if head_name.map_or(false, |h| h.as_str() == KV) && args.len() == 2 {
    if let Some(key) = args[0].as_symbol() {
      if EVENT_HANDLER_KEYS.contains(&key.as_str()) {
        return Term::named(KV, [Term::symbol(key), args[1].clone()]);
      }
    }
  }

  let qualified_head = qualify_term(head, ctx);
  let qualified_args: Vec<Term> = args.iter().map(|a| qualify_term(a, ctx)).collect();
  Term::call(qualified_head, qualified_args)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::module::ast::{ImportDecl, ModuleDecl};
  use crate::rules::Rule;

  fn decl(name: &str, imports: Vec<ImportDecl>, rules: Vec<Term>) -> ModuleDecl {
    ModuleDecl {
      name: name.into(),
      exports: HashSet::new(),
      imports,
      defs: HashMap::new(),
      rules,
      rule_rules: Vec::new(),
      program: None,
    }
  }

  #[test]
  fn qualifies_a_symbol_used_elsewhere_in_the_module() {
    let rule = Rule { name: "r".into(), lhs: Term::named("Helper", []), rhs: Term::symbol("Helper"), priority: 0.0 };
    let module = decl("M", vec![], vec![rule.to_term()]);
    let exports_by_module = HashMap::new();
    let ctx = QualifyContext::build(&module, &exports_by_module);
    let qualified = qualify_term(&Term::symbol("Helper"), &ctx);
    assert_eq!(qualified.as_symbol().unwrap().as_str(), "M/Helper");
  }

  #[test]
  fn leaves_a_free_symbol_unqualified() {
    let module = decl("M", vec![], vec![]);
    let exports_by_module = HashMap::new();
    let ctx = QualifyContext::build(&module, &exports_by_module);
    let qualified = qualify_term(&Term::symbol("Unrelated"), &ctx);
    assert_eq!(qualified.as_symbol().unwrap().as_str(), "Unrelated");
  }

  #[test]
  fn qualifies_open_imported_names() {
    let import = ImportDecl { module: "Other".into(), alias: "Other".into(), from_path: None, open: true, macro_visible: false };
    let module = decl("M", vec![import], vec![]);
    let mut exports_by_module = HashMap::new();
    exports_by_module.insert(IString::from("Other"), HashSet::from_iter([IString::from("Helper")]));
    let ctx = QualifyContext::build(&module, &exports_by_module);
    let qualified = qualify_term(&Term::symbol("Helper"), &ctx);
    assert_eq!(qualified.as_symbol().unwrap().as_str(), "Other/Helper");
  }

  #[test]
  fn rewrites_alias_prefixed_symbols_to_the_real_module() {
    let import = ImportDecl { module: "Other".into(), alias: "O".into(), from_path: None, open: false, macro_visible: false };
    let module = decl("M", vec![import], vec![]);
    let exports_by_module = HashMap::new();
    let ctx = QualifyContext::build(&module, &exports_by_module);
    let qualified = qualify_term(&Term::symbol("O/Thing"), &ctx);
    assert_eq!(qualified.as_symbol().unwrap().as_str(), "Other/Thing");
  }

  #[test]
  fn builtins_are_never_qualified() {
    let rule = Rule { name: "r".into(), lhs: Term::named("Add", []), rhs: Term::symbol("Add"), priority: 0.0 };
    let module = decl("M", vec![], vec![rule.to_term()]);
    let exports_by_module = HashMap::new();
    let ctx = QualifyContext::build(&module, &exports_by_module);
    assert_eq!(qualify_term(&Term::symbol("Add"), &ctx).as_symbol().unwrap().as_str(), "Add");
  }

  #[test]
  fn preserves_rule_name_and_apply_action_verbatim() {
    let module = decl("M", vec![], vec![]);
    let exports_by_module = HashMap::new();
    let ctx = QualifyContext::build(&module, &exports_by_module);

    let rule_term = Term::named(R, [Term::string("my/rule"), Term::symbol("Foo"), Term::symbol("Foo"), Term::number(0.0)]);
    let qualified = qualify_term(&rule_term, &ctx);
    let (_, args) = qualified.as_call().unwrap();
    assert_eq!(args[0].as_str(), Some("my/rule"));

    let apply_term = Term::named(APPLY, [Term::symbol("Inc"), Term::symbol("Program")]);
    let qualified = qualify_term(&apply_term, &ctx);
    let (_, args) = qualified.as_call().unwrap();
    assert_eq!(args[0].as_symbol().unwrap().as_str(), "Inc");
  }

  #[test]
  fn event_handler_values_are_left_untouched() {
    let module = decl("M", vec![], vec![]);
    let exports_by_module = HashMap::new();
    let ctx = QualifyContext::build(&module, &exports_by_module);
    let handler = Term::named(KV, [Term::symbol("onClick"), Term::named("Seq", [Term::symbol("FreeAction")])]);
    let qualified = qualify_term(&handler, &ctx);
    assert_eq!(qualified, handler);
  }
}
