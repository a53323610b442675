//! `order key...`: buffers rows, then sorts them against
//! the supplied comparator at `result` time.

use std::rc::Rc;

use crate::{code::Code, comparator::Comparator, env::EvalEnv, exception::RunResult, sink::RowSink, value::Value};

#[derive(Clone)]
enum RowSnapshot {
    Single(Value),
    Array(Vec<Value>),
}

pub struct OrderSink {
    pub input_names: Vec<Rc<str>>,
    pub sort_key: Rc<dyn Code>,
    pub comparator: Comparator,
    base_env: Option<EvalEnv>,
    rows: Vec<RowSnapshot>,
    pub downstream: Box<dyn RowSink>,
}

impl OrderSink {
    #[must_use]
    pub fn new(input_names: Vec<Rc<str>>, sort_key: Rc<dyn Code>, comparator: Comparator, downstream: Box<dyn RowSink>) -> Self {
        Self { input_names, sort_key, comparator, base_env: None, rows: Vec::new(), downstream }
    }

    fn snapshot(&self, env: &EvalEnv) -> RowSnapshot {
        if self.input_names.len() == 1 {
            RowSnapshot::Single(env.get_opt(&self.input_names[0]).expect("input name bound upstream"))
        } else {
            let values = self.input_names.iter().map(|n| env.get_opt(n).expect("input name bound upstream")).collect();
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

impl RowSink for OrderSink {
    fn start(&mut self, env: &EvalEnv) -> RunResult<()> {
        self.base_env = Some(env.clone());
        self.rows.clear();
        self.downstream.start(env)
    }

    fn accept(&mut self, env: &EvalEnv) -> RunResult<()> {
        self.rows.push(self.snapshot(env));
        Ok(())
    }

    fn result(&mut self, env: &EvalEnv) -> RunResult<Value> {
        let base = self.base_env.clone().unwrap_or_else(|| env.clone());
        let rows = std::mem::take(&mut self.rows);
        let mut keyed = rows
            .into_iter()
            .map(|snap| {
                let row_env = self.row_env(&snap, &base);
                let key = self.sort_key.eval(&row_env)?;
                Ok((key, snap))
            })
            .collect::<RunResult<Vec<_>>>()?;
        keyed.sort_by(|(a, _), (b, _)| (self.comparator)(a, b));
        for (_, snap) in keyed {
            let row_env = self.row_env(&snap, &base);
            self.downstream.accept(&row_env)?;
        }
        self.downstream.result(env)
    }
}

#[cfg(test)]
mod tests {
    use std::{cmp::Ordering, collections::HashMap, rc::Rc};

    use super::*;
    use crate::{code::Get, sink::collect::CollectSink};

    #[test]
    fn order_sorts_rows_by_the_supplied_comparator() {
        let collect = CollectSink::new(Rc::new(Get(Rc::from("n"))));
        let comparator: Comparator = Rc::new(|a: &Value, b: &Value| a.as_int().cmp(&b.as_int()));
        let mut sink = OrderSink::new(vec![Rc::from("n")], Rc::new(Get(Rc::from("n"))), comparator, Box::new(collect));
        let env = EvalEnv::root(HashMap::new());
        sink.start(&env).unwrap();
        for n in [3, 1, 2] {
            sink.accept(&env.bind("n", Value::Int(n))).unwrap();
        }
        let result = sink.result(&env).unwrap();
        let values: Vec<i64> = result.as_seq().unwrap().iter().map(|v| v.as_int().unwrap()).collect();
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[test]
    fn comparator_result_type_is_ordering() {
        let cmp: Comparator = Rc::new(|_: &Value, _: &Value| Ordering::Equal);
        assert_eq!(cmp(&Value::Int(1), &Value::Int(2)), Ordering::Equal);
    }
}
