//! `skip n` and `take n` pipeline steps. The count
//! expression is evaluated once, at `start`, against the outer environment
//! — not re-evaluated per row.

use std::{cell::Cell, rc::Rc};

use crate::{code::Code, env::EvalEnv, exception::RunResult, sink::RowSink, value::Value};

pub struct SkipSink {
    pub count: Rc<dyn Code>,
    remaining: Cell<i64>,
    pub downstream: Box<dyn RowSink>,
}

impl SkipSink {
    #[must_use]
    pub fn new(count: Rc<dyn Code>, downstream: Box<dyn RowSink>) -> Self {
        Self { count, remaining: Cell::new(0), downstream }
    }
}

impl RowSink for SkipSink {
    fn start(&mut self, env: &EvalEnv) -> RunResult<()> {
        let n = self.count.eval(env)?;
        self.remaining.set(n.as_int().expect("skip count evaluates to an int"));
        self.downstream.start(env)
    }

    fn accept(&mut self, env: &EvalEnv) -> RunResult<()> {
        let left = self.remaining.get();
        if left > 0 {
            self.remaining.set(left - 1);
            return Ok(());
        }
        self.downstream.accept(env)
    }

    fn result(&mut self, env: &EvalEnv) -> RunResult<Value> {
        self.downstream.result(env)
    }
}

pub struct TakeSink {
    pub count: Rc<dyn Code>,
    remaining: Cell<i64>,
    pub downstream: Box<dyn RowSink>,
}

impl TakeSink {
    #[must_use]
    pub fn new(count: Rc<dyn Code>, downstream: Box<dyn RowSink>) -> Self {
        Self { count, remaining: Cell::new(0), downstream }
    }
}

impl RowSink for TakeSink {
    fn start(&mut self, env: &EvalEnv) -> RunResult<()> {
        let n = self.count.eval(env)?;
        self.remaining.set(n.as_int().expect("take count evaluates to an int"));
        self.downstream.start(env)
    }

    fn accept(&mut self, env: &EvalEnv) -> RunResult<()> {
        let left = self.remaining.get();
        if left <= 0 {
            return Ok(());
        }
        self.remaining.set(left - 1);
        self.downstream.accept(env)
    }

    fn result(&mut self, env: &EvalEnv) -> RunResult<Value> {
        self.downstream.result(env)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::{code::Constant, sink::collect::CollectSink};

    #[test]
    fn take_passes_through_only_the_first_n_rows() {
        let collect = CollectSink::new(Rc::new(Constant(Value::Int(1))));
        let mut sink = TakeSink::new(Rc::new(Constant(Value::Int(2))), Box::new(collect));
        let env = EvalEnv::root(HashMap::new());
        sink.start(&env).unwrap();
        for _ in 0..5 {
            sink.accept(&env).unwrap();
        }
        let result = sink.result(&env).unwrap();
        assert_eq!(result.as_seq().unwrap().len(), 2);
    }

    #[test]
    fn skip_drops_the_first_n_rows() {
        let collect = CollectSink::new(Rc::new(Constant(Value::Int(1))));
        let mut sink = SkipSink::new(Rc::new(Constant(Value::Int(3))), Box::new(collect));
        let env = EvalEnv::root(HashMap::new());
        sink.start(&env).unwrap();
        for _ in 0..5 {
            sink.accept(&env).unwrap();
        }
        let result = sink.result(&env).unwrap();
        assert_eq!(result.as_seq().unwrap().len(), 2);
    }
}
