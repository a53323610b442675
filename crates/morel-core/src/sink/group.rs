//! `group key... compute aggregate...`.
//!
//! `accept` buffers a snapshot of each row under its key; `result` rebuilds
//! a per-row environment for each buffered snapshot so every aggregate's
//! projection expression can be re-evaluated against it, then applies the
//! aggregate function to the resulting sequence.

use std::rc::Rc;

use indexmap::IndexMap;

use crate::{
    applicable::Applicable,
    code::Code,
    env::EvalEnv,
    exception::RunResult,
    sink::RowSink,
    value::{Value, ValueKey},
};

/// A row snapshot taken at `accept` time: a single value when exactly one
/// input name is in scope, otherwise a defensive clone of the named
/// values in order.
#[derive(Clone)]
enum RowSnapshot {
    Single(Value),
    Array(Vec<Value>),
}

/// One `compute name = agg of expr` clause: `project` builds the element
/// the aggregate consumes from each bucketed row, `function` is applied to
/// the resulting sequence of those elements.
pub struct Aggregate {
    pub name: Rc<str>,
    pub project: Rc<dyn Code>,
    pub function: Rc<dyn Applicable>,
}

pub struct GroupSink {
    pub key_names: Vec<Rc<str>>,
    pub key_code: Rc<dyn Code>,
    pub input_names: Vec<Rc<str>>,
    pub aggregates: Vec<Aggregate>,
    base_env: Option<EvalEnv>,
    buckets: IndexMap<ValueKey, Vec<RowSnapshot>>,
    pub downstream: Box<dyn RowSink>,
}

impl GroupSink {
    #[must_use]
    pub fn new(
        key_names: Vec<Rc<str>>,
        key_code: Rc<dyn Code>,
        input_names: Vec<Rc<str>>,
        aggregates: Vec<Aggregate>,
        downstream: Box<dyn RowSink>,
    ) -> Self {
        assert!(
            downstream_output_starts_with_keys(&key_names, &aggregates),
            "the output-name list must begin with the key-name list"
        );
        Self { key_names, key_code, input_names, aggregates, base_env: None, buckets: IndexMap::new(), downstream }
    }

    fn snapshot(&self, env: &EvalEnv) -> RowSnapshot {
        if self.input_names.len() == 1 {
            RowSnapshot::Single(env.get_opt(&self.input_names[0]).expect("input name bound by the scan"))
        } else {
            let values = self
                .input_names
                .iter()
                .map(|n| env.get_opt(n).expect("input name bound by the scan"))
                .collect();
            RowSnapshot::Array(values)
        }
    }

    fn row_env(&self, snapshot: &RowSnapshot, base: &EvalEnv) -> EvalEnv {
        match snapshot {
            RowSnapshot::Single(v) => base.bind(self.input_names[0].clone(), v.clone()),
            RowSnapshot::Array(values) => {
                let mut env = base.clone();
                for (name, v) in self.input_names.iter().zip(values.iter()) {
                    env = env.bind(name.clone(), v.clone());
                }
                env
            }
        }
    }
}

/// Checks that the output row this sink builds (`out_env` in `result`,
/// bound key-names first, then aggregate names in order) actually is a
/// name list that begins with the key-name list: no key name repeats, no
/// aggregate name repeats, and no aggregate name shadows a key name
/// (which would make the "begins with" claim false — the aggregate's
/// bind would overwrite, not follow, the key's).
fn downstream_output_starts_with_keys(key_names: &[Rc<str>], aggregates: &[Aggregate]) -> bool {
    let mut seen: std::collections::HashSet<&str> = std::collections::HashSet::new();
    for name in key_names {
        if !seen.insert(name.as_ref()) {
            return false;
        }
    }
    for agg in aggregates {
        if !seen.insert(agg.name.as_ref()) {
            return false;
        }
    }
    true
}

impl RowSink for GroupSink {
    fn start(&mut self, env: &EvalEnv) -> RunResult<()> {
        self.base_env = Some(env.clone());
        self.buckets.clear();
        self.downstream.start(env)
    }

    fn accept(&mut self, env: &EvalEnv) -> RunResult<()> {
        let key = self.key_code.eval(env)?;
        let snapshot = self.snapshot(env);
        self.buckets.entry(ValueKey(key)).or_default().push(snapshot);
        Ok(())
    }

    fn result(&mut self, env: &EvalEnv) -> RunResult<Value> {
        let base = self.base_env.clone().unwrap_or_else(|| env.clone());
        if self.buckets.is_empty() && self.key_names.is_empty() {
            self.buckets.insert(ValueKey(Value::Unit), Vec::new());
        }
        for (key, rows) in std::mem::take(&mut self.buckets) {
            let key_values = match &key.0 {
                Value::Seq(items) if self.key_names.len() > 1 => items.as_ref().clone(),
                other => vec![other.clone()],
            };
            let key_env = base.bind_mutable_array(self.key_names.clone(), key_values);
            let mut out_env = key_env.env().clone();
            for agg in &self.aggregates {
                let elements = rows
                    .iter()
                    .map(|snap| {
                        let env = self.row_env(snap, &base);
                        agg.project.eval(&env)
                    })
                    .collect::<RunResult<Vec<_>>>()?;
                let result = agg.function.apply(&Value::seq(elements))?;
                out_env = out_env.bind(agg.name.clone(), result);
            }
            self.downstream.accept(&out_env)?;
        }
        self.downstream.result(env)
    }
}
