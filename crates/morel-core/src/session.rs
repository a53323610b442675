//! Session/property surface.
//!
//! A `Session` is scoped to one evaluation, never shared across threads or
//! process-global. The evaluator core only reads these properties
//! indirectly through its collaborators; it never branches on them
//! itself.

use indexmap::IndexMap;

use crate::describer::Describer;

/// A session property value. Properties are read back by name from `Sys.env`
/// and written by `Sys.set`/`Sys.unset`.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Int(i64),
    Bool(bool),
    Str(String),
}

/// Escape hatch for the `use` built-in: the core never performs
/// I/O itself, but hands file-loading requests to this collaborator.
pub trait ShellCallback {
    fn use_file(&mut self, path: &str) -> Result<String, String>;
}

/// A callback that always fails; the default for sessions built without a
/// shell (e.g. the `morel-cli` harness, which has no REPL `use` command).
pub struct NoShell;

impl ShellCallback for NoShell {
    fn use_file(&mut self, path: &str) -> Result<String, String> {
        Err(format!("use is not supported in this session: {path}"))
    }
}

/// The nine property keys the core's collaborators are known to read; the
/// core reads none of them directly, but exposes typed accessors so
/// collaborators (the compiler, the describer, the REPL driver) can avoid
/// re-parsing string values.
pub const PRINT_DEPTH: &str = "printDepth";
pub const PRINT_LENGTH: &str = "printLength";
pub const STRING_DEPTH: &str = "stringDepth";
pub const LINE_WIDTH: &str = "lineWidth";
pub const MATCH_COVERAGE_ENABLED: &str = "matchCoverageEnabled";
pub const HYBRID: &str = "hybrid";
pub const RELATIONALIZE: &str = "relationalize";
pub const INLINE_PASS_COUNT: &str = "inlinePassCount";

pub struct Session {
    properties: IndexMap<String, PropValue>,
    /// The most recent `Sys.plan` rendering, kept so a REPL-style driver
    /// could diff successive plans; the core itself never reads this back.
    previous_plan: Option<String>,
    shell: Box<dyn ShellCallback>,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        let mut properties = IndexMap::new();
        properties.insert(PRINT_DEPTH.to_owned(), PropValue::Int(5));
        properties.insert(PRINT_LENGTH.to_owned(), PropValue::Int(12));
        properties.insert(STRING_DEPTH.to_owned(), PropValue::Int(70));
        properties.insert(LINE_WIDTH.to_owned(), PropValue::Int(79));
        properties.insert(MATCH_COVERAGE_ENABLED.to_owned(), PropValue::Bool(false));
        properties.insert(HYBRID.to_owned(), PropValue::Bool(false));
        properties.insert(RELATIONALIZE.to_owned(), PropValue::Bool(true));
        properties.insert(INLINE_PASS_COUNT.to_owned(), PropValue::Int(5));
        Self { properties, previous_plan: None, shell: Box::new(NoShell) }
    }

    #[must_use]
    pub fn with_shell(shell: Box<dyn ShellCallback>) -> Self {
        let mut session = Self::new();
        session.shell = shell;
        session
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.properties.get(key)
    }

    /// `Sys.set`.
    pub fn set(&mut self, key: impl Into<String>, value: PropValue) {
        self.properties.insert(key.into(), value);
    }

    /// `Sys.unset`.
    pub fn unset(&mut self, key: &str) {
        self.properties.shift_remove(key);
    }

    /// `Sys.show`: renders the whole property bag, in insertion order.
    #[must_use]
    pub fn show(&self) -> Vec<(String, PropValue)> {
        self.properties.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    pub fn record_plan(&mut self, describer: Describer) {
        self.previous_plan = Some(describer.finish());
    }

    #[must_use]
    pub fn previous_plan(&self) -> Option<&str> {
        self.previous_plan.as_deref()
    }

    pub fn use_file(&mut self, path: &str) -> Result<String, String> {
        self.shell.use_file(path)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
