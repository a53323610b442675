//! `union`/`except`/`intersect` with `distinct`/`all` variants. Input 0 flows through the ordinary `accept` protocol (it is the
//! upstream scan driving this sink); inputs 1..N are full relation
//! expressions evaluated directly against the outer environment at
//! `result` time and streamed through the same counting map.

use std::rc::Rc;

use indexmap::IndexMap;

use crate::{
    code::Code,
    env::EvalEnv,
    exception::RunResult,
    sink::RowSink,
    value::{Value, ValueKey},
};

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    UnionDistinct,
    UnionAll,
    ExceptDistinct,
    ExceptAll,
    IntersectDistinct,
    IntersectAll,
}

pub struct SetOpSink {
    pub kind: Kind,
    pub input_names: Vec<Rc<str>>,
    pub others: Vec<Rc<dyn Code>>,
    base_env: Option<EvalEnv>,
    /// Generic per-key counter pair; which slot(s) are meaningful depends
    /// on `kind` (see the algorithms in the module doc comment).
    counts: IndexMap<ValueKey, (i64, i64)>,
    intersect_distinct_first_pass: bool,
    pub downstream: Box<dyn RowSink>,
}

impl SetOpSink {
    #[must_use]
    pub fn new(kind: Kind, input_names: Vec<Rc<str>>, others: Vec<Rc<dyn Code>>, downstream: Box<dyn RowSink>) -> Self {
        Self {
            kind,
            input_names,
            others,
            base_env: None,
            counts: IndexMap::new(),
            intersect_distinct_first_pass: true,
            downstream,
        }
    }

    fn row_key(&self, env: &EvalEnv) -> Value {
        if self.input_names.len() == 1 {
            env.get_opt(&self.input_names[0]).expect("input name bound upstream")
        } else {
            Value::seq(self.input_names.iter().map(|n| env.get_opt(n).expect("input name bound upstream")).collect())
        }
    }

    fn bind_row_env(&self, base: &EvalEnv, key: &Value) -> EvalEnv {
        if self.input_names.len() == 1 {
            base.bind(self.input_names[0].clone(), key.clone())
        } else {
            let values = match key {
                Value::Seq(items) => items.as_ref().clone(),
                other => vec![other.clone()],
            };
            let mut env = base.clone();
            for (name, v) in self.input_names.iter().zip(values) {
                env = env.bind(name.clone(), v);
            }
            env
        }
    }
}

impl RowSink for SetOpSink {
    fn start(&mut self, env: &EvalEnv) -> RunResult<()> {
        self.base_env = Some(env.clone());
        self.counts.clear();
        self.intersect_distinct_first_pass = true;
        self.downstream.start(env)
    }

    fn accept(&mut self, env: &EvalEnv) -> RunResult<()> {
        let key = self.row_key(env);
        match self.kind {
            Kind::UnionDistinct => {
                let value_key = ValueKey(key);
                if !self.counts.contains_key(&value_key) {
                    self.counts.insert(value_key, (0, 0));
                    self.downstream.accept(env)?;
                }
            }
            Kind::UnionAll => {
                self.downstream.accept(env)?;
            }
            Kind::ExceptDistinct | Kind::IntersectDistinct => {
                self.counts.entry(ValueKey(key)).or_insert((0, 0));
            }
            Kind::ExceptAll | Kind::IntersectAll => {
                self.counts.entry(ValueKey(key)).or_insert((0, 0)).0 += 1;
            }
        }
        Ok(())
    }

    fn result(&mut self, env: &EvalEnv) -> RunResult<Value> {
        let base = self.base_env.clone().unwrap_or_else(|| env.clone());
        for other in self.others.clone() {
            let value = other.eval(&base)?;
            let Value::Seq(rows) = value else { unreachable!("a set-op input always evaluates to a sequence") };
            match self.kind {
                Kind::UnionDistinct => {
                    for row in rows.iter() {
                        let value_key = ValueKey(row.clone());
                        if !self.counts.contains_key(&value_key) {
                            self.counts.insert(value_key, (0, 0));
                            let row_env = self.bind_row_env(&base, row);
                            self.downstream.accept(&row_env)?;
                        }
                    }
                }
                Kind::UnionAll => {
                    for row in rows.iter() {
                        let row_env = self.bind_row_env(&base, row);
                        self.downstream.accept(&row_env)?;
                    }
                }
                Kind::ExceptDistinct => {
                    for row in rows.iter() {
                        self.counts.shift_remove(&ValueKey(row.clone()));
                    }
                }
                Kind::ExceptAll => {
                    for row in rows.iter() {
                        self.counts.entry(ValueKey(row.clone())).or_insert((0, 0)).0 -= 1;
                    }
                }
                Kind::IntersectDistinct => {
                    if !self.intersect_distinct_first_pass {
                        self.counts.retain(|_, c| c.0 != 0);
                        for c in self.counts.values_mut() {
                            c.0 = 0;
                        }
                    }
                    for row in rows.iter() {
                        if let Some(c) = self.counts.get_mut(&ValueKey(row.clone())) {
                            c.0 += 1;
                        }
                    }
                    self.intersect_distinct_first_pass = false;
                }
                Kind::IntersectAll => {
                    for row in rows.iter() {
                        if let Some(c) = self.counts.get_mut(&ValueKey(row.clone())) {
                            c.1 += 1;
                        }
                    }
                    for c in self.counts.values_mut() {
                        c.0 = c.0.min(c.1);
                    }
                    self.counts.retain(|_, c| {
                        if c.1 == 0 {
                            false
                        } else {
                            c.1 = 0;
                            true
                        }
                    });
                }
            }
        }
        match self.kind {
            Kind::ExceptDistinct => {
                for key in self.counts.keys().cloned().collect::<Vec<_>>() {
                    let row_env = self.bind_row_env(&base, &key.0);
                    self.downstream.accept(&row_env)?;
                }
            }
            Kind::ExceptAll => {
                for (key, count) in self.counts.clone() {
                    for _ in 0..count.0.max(0) {
                        let row_env = self.bind_row_env(&base, &key.0);
                        self.downstream.accept(&row_env)?;
                    }
                }
            }
            Kind::IntersectDistinct => {
                for (key, count) in self.counts.clone() {
                    if count.0 > 0 {
                        let row_env = self.bind_row_env(&base, &key.0);
                        self.downstream.accept(&row_env)?;
                    }
                }
            }
            Kind::IntersectAll => {
                for (key, count) in self.counts.clone() {
                    for _ in 0..count.0 {
                        let row_env = self.bind_row_env(&base, &key.0);
                        self.downstream.accept(&row_env)?;
                    }
                }
            }
            Kind::UnionDistinct | Kind::UnionAll => {}
        }
        self.downstream.result(env)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::{code::Constant, sink::collect::CollectSink};

    fn ints(xs: &[i64]) -> Rc<dyn Code> {
        Rc::new(Constant(Value::seq(xs.iter().map(|&i| Value::Int(i)).collect())))
    }

    fn run(kind: Kind, input0: &[i64], others: &[&[i64]]) -> Vec<i64> {
        let collect = CollectSink::new(Rc::new(crate::code::Get(Rc::from("x"))));
        let others_code: Vec<Rc<dyn Code>> = others.iter().map(|xs| ints(xs)).collect();
        let mut sink = SetOpSink::new(kind, vec![Rc::from("x")], others_code, Box::new(collect));
        let env = EvalEnv::root(HashMap::new());
        sink.start(&env).unwrap();
        for &x in input0 {
            sink.accept(&env.bind("x", Value::Int(x))).unwrap();
        }
        let result = sink.result(&env).unwrap();
        result.as_seq().unwrap().iter().map(|v| v.as_int().unwrap()).collect()
    }

    #[test]
    fn union_distinct_collapses_duplicates_across_inputs() {
        let mut out = run(Kind::UnionDistinct, &[1, 2, 3], &[&[2, 3, 4]]);
        out.sort_unstable();
        assert_eq!(out, vec![1, 2, 3, 4]);
    }

    #[test]
    fn intersect_all_respects_multiplicities() {
        let mut out = run(Kind::IntersectAll, &[1, 1, 2, 3], &[&[1, 1, 1, 3]]);
        out.sort_unstable();
        assert_eq!(out, vec![1, 1, 3]);
    }

    #[test]
    fn except_distinct_removes_any_row_seen_on_the_right() {
        let mut out = run(Kind::ExceptDistinct, &[1, 2, 3], &[&[2]]);
        out.sort_unstable();
        assert_eq!(out, vec![1, 3]);
    }

    #[test]
    fn union_all_keeps_every_row_from_every_input() {
        let mut out = run(Kind::UnionAll, &[1, 2], &[&[2, 3]]);
        out.sort_unstable();
        assert_eq!(out, vec![1, 2, 2, 3]);
    }
}
