//! Plan description.
//!
//! A `Describer` walks a `Code`/`Applicable` tree and renders it as a
//! human-readable plan, used by `Sys.plan` and test snapshots. Each node
//! calls `start(name, ...)` and then issues `arg(name, value)` or
//! `arg_node(name, describable)` for each piece of state. `CodeVisitor`
//! specializes the traversal to collect start-actions without emitting
//! anything (used to gather ordinal resets before the sink pipeline's
//! first `start`, see `sink::collect_start_actions`).

use std::fmt::Write as _;

/// Something that can render itself into a [`Describer`].
pub trait Describable {
    fn describe(&self, d: &mut Describer);
}

/// An indented-text plan renderer.
pub struct Describer {
    buf: String,
    depth: usize,
}

impl Describer {
    #[must_use]
    pub fn new() -> Self {
        Self { buf: String::new(), depth: 0 }
    }

    /// Starts a node named `name`; `body` issues `arg`/`arg_node` calls
    /// for the node's fields.
    pub fn start(&mut self, name: &str, body: impl FnOnce(&mut Self)) {
        let _ = writeln!(self.buf, "{:indent$}{name}", "", indent = self.depth * 2);
        self.depth += 1;
        body(self);
        self.depth -= 1;
    }

    pub fn arg(&mut self, name: &str, value: impl std::fmt::Debug) {
        let _ = writeln!(self.buf, "{:indent$}{name}: {value:?}", "", indent = self.depth * 2);
    }

    pub fn arg_node(&mut self, name: &str, node: &dyn Describable) {
        let _ = writeln!(self.buf, "{:indent$}{name}:", "", indent = self.depth * 2);
        self.depth += 1;
        node.describe(self);
        self.depth -= 1;
    }

    #[must_use]
    pub fn finish(self) -> String {
        self.buf
    }
}

impl Default for Describer {
    fn default() -> Self {
        Self::new()
    }
}

/// A traversal that visits a `Code` tree without emitting anything,
/// collecting every node's declared start-action so the `from`-owned sink
/// chain can run them once, before the first real `start`.
#[derive(Default)]
pub struct CodeVisitor {
    pub saw_ordinal_reset: bool,
}

impl CodeVisitor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn note_ordinal_reset(&mut self) {
        self.saw_ordinal_reset = true;
    }
}
