/*!

The error types propagated by every engine operation (§7 of the design notes).

Match failure is *not* an error — it is a local `None` returned by the matcher. Everything else
that can go wrong synchronously aborts the call with an [`EngineError`], carrying enough context
(rule name, path, before/after rendering) for a host to show a useful diagnostic.

*/

use std::fmt::{Display, Formatter};

use syma_abs::IString;

/// The distinguishable failure modes of the engine, matching the `Kind` column of the design
/// notes' error table one-to-one.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ErrorKind {
  #[error("parse error: {0}")]
  Parse(String),

  #[error("invalid module: {0}")]
  InvalidModule(String),

  #[error("circular dependency: {0}")]
  CircularDependency(String),

  #[error("unknown module: {0}")]
  UnknownModule(String),

  #[error("unbound variable: {0}")]
  UnboundVariable(String),

  #[error("projection unmatchable: no rule applied to the projection envelope")]
  Unmatchable,

  #[error("primitive error: {0}")]
  Primitive(String),

  #[error("non-termination: exceeded {0} rewrite steps")]
  NonTermination(u64),

  #[error("pattern explosion: backtracking budget exceeded")]
  PatternExplosion,

  #[error("term too large: {0}")]
  TermTooLarge(String),

  #[error("invalid pattern: {0}")]
  InvalidPattern(String),
}

/// A synchronous engine failure, carrying the [`ErrorKind`] plus whatever diagnostic context was
/// available at the point of failure.
///
/// Propagation policy: a [`EngineError`] aborts the call that produced it (`dispatch`, `project`,
/// `normalize`, ...). The caller's previous `Universe` is never mutated by a failed call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineError {
  pub kind: ErrorKind,
  pub rule_name: Option<IString>,
  pub path: Option<String>,
}

impl EngineError {
  pub fn new(kind: ErrorKind) -> Self {
    EngineError { kind, rule_name: None, path: None }
  }

  pub fn with_rule(mut self, rule_name: IString) -> Self {
    self.rule_name = Some(rule_name);
    self
  }

  pub fn with_path(mut self, path: impl Into<String>) -> Self {
    self.path = Some(path.into());
    self
  }

  pub fn parse(msg: impl Into<String>) -> Self {
    Self::new(ErrorKind::Parse(msg.into()))
  }

  pub fn invalid_module(msg: impl Into<String>) -> Self {
    Self::new(ErrorKind::InvalidModule(msg.into()))
  }

  pub fn circular_dependency(msg: impl Into<String>) -> Self {
    Self::new(ErrorKind::CircularDependency(msg.into()))
  }

  pub fn unknown_module(msg: impl Into<String>) -> Self {
    Self::new(ErrorKind::UnknownModule(msg.into()))
  }

  pub fn unbound_variable(name: impl Into<String>) -> Self {
    Self::new(ErrorKind::UnboundVariable(name.into()))
  }

  pub fn unmatchable() -> Self {
    Self::new(ErrorKind::Unmatchable)
  }

  pub fn primitive(msg: impl Into<String>) -> Self {
    Self::new(ErrorKind::Primitive(msg.into()))
  }

  pub fn non_termination(steps: u64) -> Self {
    Self::new(ErrorKind::NonTermination(steps))
  }

  pub fn pattern_explosion() -> Self {
    Self::new(ErrorKind::PatternExplosion)
  }

  pub fn term_too_large(msg: impl Into<String>) -> Self {
    Self::new(ErrorKind::TermTooLarge(msg.into()))
  }

  pub fn invalid_pattern(msg: impl Into<String>) -> Self {
    Self::new(ErrorKind::InvalidPattern(msg.into()))
  }
}

impl Display for EngineError {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.kind)?;
    if let Some(rule_name) = &self.rule_name {
      write!(f, " (in rule `{}`)", rule_name)?;
    }
    if let Some(path) = &self.path {
      write!(f, " at {}", path)?;
    }
    Ok(())
  }
}

impl std::error::Error for EngineError {}

impl From<ErrorKind> for EngineError {
  fn from(kind: ErrorKind) -> Self {
    EngineError::new(kind)
  }
}

pub type EngineResult<T> = Result<T, EngineError>;
