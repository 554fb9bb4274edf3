/*!

A symbolic term-rewriting runtime: a small language whose programs are S-expression trees and
whose behavior is defined entirely by ordered rewrite rules (§1). A `Universe` bundles an initial
program state with a set of rules; execution repeatedly rewrites the state to a fixed point,
interleaved with event dispatch from a host.

This crate is the core: the expression representation and its pattern sub-language, the matcher,
the substituter, the primitive folder, the normalizer, the meta-rule stage, the module
compiler/linker, and the `dispatch`/`project` runtime facade. Surface parsing, concrete UI
projectors, the effects processor, and storage all live outside this crate, as external
collaborators that consume its fixed interfaces.

*/

pub mod env;
pub mod error;
pub mod facade;
pub mod matcher;
pub mod module;
pub mod normalize;
pub mod primitive;
pub mod rewrite;
pub mod rules;
pub mod subst;
pub mod term;
pub mod trace;
pub mod universe;
pub mod wire;

pub use error::{EngineError, EngineResult, ErrorKind};
pub use facade::{dispatch, project};
pub use rules::{extract_rules, Rule};
pub use term::Term;
pub use universe::Universe;
