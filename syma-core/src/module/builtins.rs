/*!

The frozen built-in vocabulary (§4.9 step 5, §9 Open Question): symbols that are never qualified
regardless of where they appear, because the runtime itself attaches meaning to them. Versioned
here as a single source of truth rather than scattered through the qualifier.

*/

use once_cell::sync::Lazy;
use syma_abs::HashSet;

use crate::primitive::primitive_names;

const ENGINE_CORE: &[&str] = &[
  "R",
  "Universe",
  "Program",
  "Rules",
  "RuleRules",
  "App",
  "State",
  "UI",
  "Apply",
  "Bundle",
  "Module",
  "Import",
  "Export",
  "Defs",
  "Effects",
  "Pending",
  "Inbox",
  "Var",
  "VarRest",
  "/@",
  "Show",
  "Project",
  "MacroScopes",
  "RuleRulesFrom",
  "Imp",
  "Props",
  "KV",
];

/// DOM-like tag symbols a string/DOM projector would recognize; kept here rather than in a
/// projector crate this core doesn't depend on, since qualification must still leave them alone.
const DOM_TAGS: &[&str] = &[
  "Div", "Span", "Button", "Input", "Text", "Ul", "Li", "A", "Img", "P", "H1", "H2", "H3",
];

const SPLICE_ALIASES: &[&str] = &["Splat", "...!"];

/// Event-handler KV keys (§4.9 step 5); the handler's value is skipped entirely by the qualifier
/// rather than these being consulted, but the keys themselves still go through the generic
/// never-qualify check, so they are frozen here too.
pub const EVENT_HANDLER_KEYS: &[&str] =
  &["onClick", "onKeydown", "onSubmit", "onChange", "onInput", "onFocus", "onBlur"];

/// Combinators recognized inside event-handler values (§4.9 step 5). Folded into the frozen
/// vocabulary rather than given bespoke handling: since handler values are never descended into by
/// the qualifier, treating these as always-builtin is behaviorally equivalent and simpler.
const EVENT_COMBINATORS: &[&str] =
  &["Seq", "When", "If", "PreventDefault", "StopPropagation", "ClearInput", "SetInput", "KeyIs"];

pub static BUILTIN_VOCABULARY: Lazy<HashSet<&'static str>> = Lazy::new(|| {
  let mut set: HashSet<&'static str> = HashSet::new();
  set.extend(ENGINE_CORE.iter().copied());
  set.extend(DOM_TAGS.iter().copied());
  set.extend(SPLICE_ALIASES.iter().copied());
  set.extend(EVENT_HANDLER_KEYS.iter().copied());
  set.extend(EVENT_COMBINATORS.iter().copied());
  set.extend(primitive_names());
  set
});

pub fn is_builtin(name: &str) -> bool {
  BUILTIN_VOCABULARY.contains(name)
}
