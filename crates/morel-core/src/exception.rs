//! Runtime exception taxonomy and propagation.
//!
//! Exceptions are not native unwinding here: the evaluator is a tree-walk
//! over `Code`/`Applicable`/`RowSink`, so `eval`/`apply`/`accept` all return
//! `RunResult<T> = Result<T, RunError>` and propagate failure with `?`
//! rather than unwinding the host stack directly.

use std::fmt;

use strum::{Display, EnumString, IntoStaticStr};

use crate::position::Pos;

pub type RunResult<T> = Result<T, RunError>;

/// The built-in exception kinds, exact for compatibility with ML's basis
/// library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
pub enum BuiltInExn {
    /// `List.Empty`
    Empty,
    /// `General.Bind`
    Bind,
    /// `General.Chr`
    Chr,
    /// `General.Div`
    Div,
    /// `General.Domain`
    Domain,
    /// `Option.Option`
    Option,
    /// `General.Overflow`
    Overflow,
    /// `Interact.Error`
    Error,
    /// `General.Size`
    Size,
    /// `General.Subscript`
    Subscript,
    /// `ListPair.UnequalLengths`
    UnequalLengths,
    /// `IEEEReal.Unordered`
    Unordered,
}

impl BuiltInExn {
    /// The ML basis structure this exception is declared in, used to
    /// render the `"uncaught exception <Structure>.<Name>"` message.
    #[must_use]
    pub fn structure(self) -> &'static str {
        match self {
            Self::Empty => "List",
            Self::Bind | Self::Chr | Self::Div | Self::Domain | Self::Overflow | Self::Size | Self::Subscript => {
                "General"
            }
            Self::Option => "Option",
            Self::Error => "Interact",
            Self::UnequalLengths => "ListPair",
            Self::Unordered => "IEEEReal",
        }
    }
}

/// A positioned runtime error: the exception kind plus the source
/// position of the expression that raised it (or `None` if it was raised
/// before any position was attached, e.g. deep inside comparator
/// construction).
#[derive(Debug, Clone)]
pub struct RunError {
    pub kind: BuiltInExn,
    pub pos: Option<Pos>,
    /// Extra human-readable detail, e.g. `"subscript out of bounds"` for
    /// `Subscript` — this exact text is part of the REPL's observable
    /// output and must be preserved verbatim.
    pub detail: Option<&'static str>,
}

impl RunError {
    #[must_use]
    pub fn new(kind: BuiltInExn) -> Self {
        Self { kind, pos: None, detail: None }
    }

    #[must_use]
    pub fn with_pos(mut self, pos: Pos) -> Self {
        self.pos = Some(pos);
        self
    }

    #[must_use]
    pub fn with_detail(mut self, detail: &'static str) -> Self {
        self.detail = Some(detail);
        self
    }

    #[must_use]
    pub fn subscript() -> Self {
        Self::new(BuiltInExn::Subscript).with_detail("subscript out of bounds")
    }

    /// Formats the "uncaught exception" message a top-level shell would
    /// print. The core itself never prints this; it is
    /// exposed so `morel-cli` (the harness binary) and tests can render
    /// it.
    #[must_use]
    pub fn uncaught_message(&self) -> String {
        let mut msg = format!("uncaught exception {}.{}", self.kind.structure(), self.kind);
        if let Some(detail) = self.detail {
            msg.push_str(": ");
            msg.push_str(detail);
        }
        if let Some(pos) = self.pos {
            msg.push_str(&format!(" at {pos}"));
        }
        msg
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uncaught_message())
    }
}

impl std::error::Error for RunError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_includes_structure_and_name() {
        let err = RunError::new(BuiltInExn::Empty);
        assert_eq!(err.uncaught_message(), "uncaught exception List.Empty");
    }

    #[test]
    fn subscript_detail_is_preserved_verbatim() {
        let err = RunError::subscript();
        assert!(err.uncaught_message().contains("subscript out of bounds"));
    }
}
