//! `where cond` as a standalone pipeline step, distinct
//! from the inline condition a [`super::scan::ScanSink`] can carry — a
//! `from` clause may have any number of `where` steps interleaved with
//! other steps, each becoming its own sink in the chain.

use crate::{code::Code, env::EvalEnv, exception::RunResult, sink::RowSink, value::Value};
use std::rc::Rc;

pub struct WhereSink {
    pub condition: Rc<dyn Code>,
    pub downstream: Box<dyn RowSink>,
}

impl RowSink for WhereSink {
    fn start(&mut self, env: &EvalEnv) -> RunResult<()> {
        self.downstream.start(env)
    }

    fn accept(&mut self, env: &EvalEnv) -> RunResult<()> {
        let keep = self.condition.eval(env)?;
        if keep.as_bool() == Some(true) {
            self.downstream.accept(env)?;
        }
        Ok(())
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
    fn where_drops_rows_failing_the_condition() {
        let collect = CollectSink::new(Rc::new(Constant(Value::Int(1))));
        let mut sink = WhereSink { condition: Rc::new(Constant(Value::Bool(false))), downstream: Box::new(collect) };
        let env = EvalEnv::root(HashMap::new());
        sink.start(&env).unwrap();
        sink.accept(&env).unwrap();
        let result = sink.result(&env).unwrap();
        assert!(result.as_seq().unwrap().is_empty());
    }
}
