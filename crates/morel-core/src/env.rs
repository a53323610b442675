//! `EvalEnv`: the name-to-value environment chain.
//!
//! Three variants share one `Rc`-linked chain: a map-backed root, an
//! immutable one-slot frame, and a mutable one-slot frame. `bind` always
//! prepends a new node; it never mutates an existing one. The mutable
//! variant exists so the inner loop of a relational pipeline (one row per
//! `accept`) can rebind a single slot instead of allocating a fresh frame
//! per row — a typed `Cell<Value>` inside an otherwise-immutable
//! environment node, with exactly one writer and any number of readers.

use std::{cell::Cell, collections::HashMap, rc::Rc};

use crate::{
    pattern::{Pattern, bind_recurse},
    value::Value,
};

enum Node {
    /// The root frame: built-ins and session state, looked up by name.
    Root(HashMap<&'static str, Value>),
    /// One immutable `(name, value)` binding plus a parent pointer.
    Frame { name: Rc<str>, value: Value, parent: EvalEnv },
    /// One binding whose value may be replaced in place. The slot is
    /// written by exactly one owner (the sink that created it) and read
    /// by any number of downstream `Code` evaluations.
    MutableFrame { name: Rc<str>, value: Cell<Value>, parent: EvalEnv },
    /// A frame binding several names at once from a backing array, used
    /// by group/set-op result rows (`bindMutableArray`). Each name maps
    /// to an index into the shared `Rc<RefCell<Vec<Value>>>`-free array:
    /// since rows are produced once per bucket and never re-entered
    /// concurrently, a plain `Vec<Cell<Value>>` is enough.
    MutableArray { names: Vec<Rc<str>>, values: Vec<Cell<Value>>, parent: EvalEnv },
}

/// An immutable, `Rc`-shared environment chain. Cloning an `EvalEnv` is a
/// refcount bump, never a deep copy.
#[derive(Clone)]
pub struct EvalEnv(Rc<Node>);

impl EvalEnv {
    #[must_use]
    pub fn root(builtins: HashMap<&'static str, Value>) -> Self {
        Self(Rc::new(Node::Root(builtins)))
    }

    /// Looks up `name`, searching from the innermost frame outward. The
    /// first hit wins.
    #[must_use]
    pub fn get_opt(&self, name: &str) -> Option<Value> {
        match &*self.0 {
            Node::Root(map) => map.get(name).cloned(),
            Node::Frame { name: n, value, parent } => {
                if &**n == name { Some(value.clone()) } else { parent.get_opt(name) }
            }
            Node::MutableFrame { name: n, value, parent } => {
                if &**n == name {
                    let v = value.take();
                    let out = v.clone();
                    value.set(v);
                    Some(out)
                } else {
                    parent.get_opt(name)
                }
            }
            Node::MutableArray { names, values, parent } => {
                for (n, cell) in names.iter().zip(values.iter()) {
                    if &**n == name {
                        let v = cell.take();
                        let out = v.clone();
                        cell.set(v);
                        return Some(out);
                    }
                }
                parent.get_opt(name)
            }
        }
    }

    /// Prepends a new immutable binding. Never mutates `self`.
    #[must_use]
    pub fn bind(&self, name: impl Into<Rc<str>>, value: Value) -> Self {
        Self(Rc::new(Node::Frame { name: name.into(), value, parent: self.clone() }))
    }

    /// Prepends a one-slot frame whose value may later be overwritten via
    /// [`MutableEvalEnv::set`]/[`MutableEvalEnv::set_opt`].
    #[must_use]
    pub fn bind_mutable(&self, name: impl Into<Rc<str>>, value: Value) -> MutableEvalEnv {
        let env = Self(Rc::new(Node::MutableFrame { name: name.into(), value: Cell::new(value), parent: self.clone() }));
        MutableEvalEnv::Single(env)
    }

    /// Prepends a frame binding several names at once from a backing
    /// array (`bindMutableArray`); used by group and set-op output rows.
    #[must_use]
    pub fn bind_mutable_array(&self, names: Vec<Rc<str>>, values: Vec<Value>) -> MutableEvalEnv {
        let cells = values.into_iter().map(Cell::new).collect();
        let env = Self(Rc::new(Node::MutableArray { names, values: cells, parent: self.clone() }));
        MutableEvalEnv::Array(env)
    }

    /// Binds from a sequence value, used on the result path of set ops
    /// where the key is already a sequence (`bindMutableList`).
    #[must_use]
    pub fn bind_mutable_list(&self, names: Vec<Rc<str>>, values: &Value) -> MutableEvalEnv {
        let items = match values {
            Value::Seq(items) => items.as_ref().clone(),
            other => vec![other.clone()],
        };
        self.bind_mutable_array(names, items)
    }

    /// Binds against a whole pattern (`bindMutablePat`). Starts the slots
    /// out `Value::Unit` (overwritten on the first `set_opt`).
    #[must_use]
    pub fn bind_mutable_pat(&self, pat: &Pattern) -> MutableEvalEnv {
        let mut names = Vec::new();
        collect_names(pat, &mut names);
        let len = names.len();
        self.bind_mutable_array(names, vec![Value::Unit; len])
    }

    /// Visits every binding, innermost first; when a name is shadowed the
    /// shadowed binding is still visited afterward.
    pub fn visit(&self, consumer: &mut impl FnMut(&str, &Value)) {
        match &*self.0 {
            Node::Root(map) => {
                for (k, v) in map {
                    consumer(k, v);
                }
            }
            Node::Frame { name, value, parent } => {
                consumer(name, value);
                parent.visit(consumer);
            }
            Node::MutableFrame { name, value, parent } => {
                let v = value.take();
                consumer(name, &v);
                value.set(v);
                parent.visit(consumer);
            }
            Node::MutableArray { names, values, parent } => {
                for (n, cell) in names.iter().zip(values.iter()) {
                    let v = cell.take();
                    consumer(n, &v);
                    cell.set(v);
                }
                parent.visit(consumer);
            }
        }
    }

    /// Collapses any outstanding mutable last-slot so downstream consumers
    /// see a stable, purely-immutable view — used when an environment is
    /// captured into a closure. Idempotent.
    #[must_use]
    pub fn fix(&self) -> Self {
        match &*self.0 {
            Node::MutableFrame { name, value, parent } => {
                let v = value.take();
                let frozen = v.clone();
                value.set(v);
                parent.bind(name.clone(), frozen)
            }
            Node::MutableArray { names, values, parent } => {
                let mut env = parent.clone();
                for (n, cell) in names.iter().zip(values.iter()) {
                    let v = cell.take();
                    let frozen = v.clone();
                    cell.set(v);
                    env = env.bind(n.clone(), frozen);
                }
                env
            }
            Node::Root(_) | Node::Frame { .. } => self.clone(),
        }
    }
}

fn collect_names(pat: &Pattern, out: &mut Vec<Rc<str>>) {
    match pat {
        Pattern::Ident(name) => out.push(name.clone()),
        Pattern::Wildcard | Pattern::Literal(_) => {}
        Pattern::As(name, inner) => {
            out.push(name.clone());
            collect_names(inner, out);
        }
        Pattern::Tuple(pats) | Pattern::Record(pats) | Pattern::List(pats) => {
            for p in pats {
                collect_names(p, out);
            }
        }
        Pattern::Cons(head, tail) => {
            collect_names(head, out);
            collect_names(tail, out);
        }
        Pattern::ConstructorNullary(_) => {}
        Pattern::ConstructorUnary(_, inner) => collect_names(inner, out),
    }
}

/// A freshly-bound mutable frame, returned by the `bindMutable*` family.
/// Wraps the underlying [`EvalEnv`] so callers get both the extended
/// environment (to evaluate downstream code in) and `set`/`set_opt` to
/// rebind it per row.
#[derive(Clone)]
pub enum MutableEvalEnv {
    Single(EvalEnv),
    Array(EvalEnv),
}

impl MutableEvalEnv {
    #[must_use]
    pub fn env(&self) -> &EvalEnv {
        match self {
            Self::Single(e) | Self::Array(e) => e,
        }
    }

    /// Overwrites the slot(s) unconditionally with a single value
    /// (`Single` variant) — panics (internal assertion) if called on an
    /// `Array` variant, which requires [`MutableEvalEnv::set_array`].
    pub fn set(&self, value: Value) {
        match self {
            Self::Single(env) => {
                let Node::MutableFrame { value: cell, .. } = &*env.0 else {
                    unreachable!("Single variant always wraps a MutableFrame node")
                };
                cell.set(value);
            }
            Self::Array(_) => unreachable!("set() called on an Array mutable env; use set_array"),
        }
    }

    pub fn set_array(&self, values: Vec<Value>) {
        match self {
            Self::Array(env) => {
                let Node::MutableArray { values: cells, .. } = &*env.0 else {
                    unreachable!("Array variant always wraps a MutableArray node")
                };
                for (cell, v) in cells.iter().zip(values) {
                    cell.set(v);
                }
            }
            Self::Single(_) => unreachable!("set_array() called on a Single mutable env; use set"),
        }
    }

    /// Runs `bind_recurse` against the whole pattern this mutable frame
    /// was created from, returning `false` (and leaving slots from a
    /// failed prefix match stale) when the value does not match the
    /// pattern's shape.
    #[must_use]
    pub fn set_opt(&self, pat: &Pattern, value: &Value) -> bool {
        let Self::Array(env) = self else {
            unreachable!("set_opt is only meaningful for bind_mutable_pat environments")
        };
        let Node::MutableArray { names, values: cells, .. } = &*env.0 else { unreachable!() };
        let mut slot = 0usize;
        let matched = bind_recurse(pat, value, &mut |_name, v| {
            if slot < cells.len() {
                cells[slot].set(v.clone());
                slot += 1;
            }
        });
        matched && slot == names.len()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn root() -> EvalEnv {
        EvalEnv::root(HashMap::new())
    }

    #[test]
    fn innermost_binding_wins() {
        let env = root().bind("x", Value::Int(1)).bind("x", Value::Int(2));
        assert_eq!(env.get_opt("x").unwrap().as_int(), Some(2));
    }

    #[test]
    fn bind_never_mutates_parent() {
        let base = root().bind("x", Value::Int(1));
        let _extended = base.bind("x", Value::Int(2));
        assert_eq!(base.get_opt("x").unwrap().as_int(), Some(1));
    }

    #[test]
    fn mutable_frame_rebinds_in_place() {
        let base = root();
        let m = base.bind_mutable("row", Value::Int(0));
        assert_eq!(m.env().get_opt("row").unwrap().as_int(), Some(0));
        m.set(Value::Int(42));
        assert_eq!(m.env().get_opt("row").unwrap().as_int(), Some(42));
    }

    #[test]
    fn visit_sees_shadowed_bindings_after_shadower() {
        let env = root().bind("x", Value::Int(1)).bind("x", Value::Int(2));
        let mut seen = Vec::new();
        env.visit(&mut |name, value| seen.push((name.to_owned(), value.as_int())));
        assert_eq!(seen, vec![("x".to_owned(), Some(2)), ("x".to_owned(), Some(1))]);
    }

    #[test]
    fn fix_is_idempotent_and_freezes_mutable_slot() {
        let m = root().bind_mutable("row", Value::Int(7));
        let fixed = m.env().fix();
        let fixed_again = fixed.fix();
        assert_eq!(fixed.get_opt("row").unwrap().as_int(), Some(7));
        assert_eq!(fixed_again.get_opt("row").unwrap().as_int(), Some(7));
    }
}
