//! `yield e`: a non-terminal sink that changes the row
//! shape mid-pipeline by rebinding a fresh set of named outputs, built
//! from the current row, for everything downstream to see instead of the
//! original scan bindings.

use std::rc::Rc;

use crate::{code::Code, env::EvalEnv, exception::RunResult, sink::RowSink, value::Value};

pub struct YieldSink {
    pub names: Vec<Rc<str>>,
    pub exprs: Vec<Rc<dyn Code>>,
    pub downstream: Box<dyn RowSink>,
}

impl RowSink for YieldSink {
    fn start(&mut self, env: &EvalEnv) -> RunResult<()> {
        self.downstream.start(env)
    }

    fn accept(&mut self, env: &EvalEnv) -> RunResult<()> {
        let values = self.exprs.iter().map(|e| e.eval(env)).collect::<RunResult<Vec<_>>>()?;
        let mutable = env.bind_mutable_array(self.names.clone(), values);
        self.downstream.accept(mutable.env())
    }

    fn result(&mut self, env: &EvalEnv) -> RunResult<Value> {
        self.downstream.result(env)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::{code::{Constant, Get}, sink::collect::CollectSink};

    #[test]
    fn yield_rebinds_a_new_named_output_for_downstream_to_read() {
        let collect = CollectSink::new(Rc::new(Get(Rc::from("doubled"))));
        let mut sink = YieldSink {
            names: vec![Rc::from("doubled")],
            exprs: vec![Rc::new(Constant(Value::Int(8)))],
            downstream: Box::new(collect),
        };
        let env = EvalEnv::root(HashMap::new());
        sink.start(&env).unwrap();
        sink.accept(&env).unwrap();
        let result = sink.result(&env).unwrap();
        assert_eq!(result.as_seq().unwrap()[0].as_int(), Some(8));
    }
}
