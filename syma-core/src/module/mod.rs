/*!

The module compiler/linker (§4.9): turns a graph of parsed `Module[...]` Terms into a single
`Universe`. Surface source parsing is out of scope (§1) — [`ast::parse_module`] only extracts and
validates the structure of an already-parsed `Module[...]` Term.

*/

pub mod ast;
pub mod builtins;
pub mod compile;
pub mod qualify;

pub use ast::{ImportDecl, ModuleDecl};
pub use compile::{compile, CompileMode, ModuleSource};
