//! `collect`: the terminal sink of every pipeline,
//! accumulating one projected value per accepted row into the output bag.

use std::{cell::RefCell, rc::Rc};

use crate::{code::Code, env::EvalEnv, exception::RunResult, sink::RowSink, value::Value};

pub struct CollectSink {
    pub project: Rc<dyn Code>,
    rows: RefCell<Vec<Value>>,
}

impl CollectSink {
    #[must_use]
    pub fn new(project: Rc<dyn Code>) -> Self {
        Self { project, rows: RefCell::new(Vec::new()) }
    }
}

impl RowSink for CollectSink {
    fn start(&mut self, _env: &EvalEnv) -> RunResult<()> {
        self.rows.borrow_mut().clear();
        Ok(())
    }

    fn accept(&mut self, env: &EvalEnv) -> RunResult<()> {
        let row = self.project.eval(env)?;
        self.rows.borrow_mut().push(row);
        Ok(())
    }

    fn result(&mut self, _env: &EvalEnv) -> RunResult<Value> {
        Ok(Value::seq(self.rows.borrow_mut().drain(..).collect()))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::code::Constant;

    #[test]
    fn collect_accumulates_one_projected_value_per_row() {
        let mut sink = CollectSink::new(Rc::new(Constant(Value::Int(5))));
        let env = EvalEnv::root(HashMap::new());
        sink.start(&env).unwrap();
        sink.accept(&env).unwrap();
        sink.accept(&env).unwrap();
        let result = sink.result(&env).unwrap();
        let items = result.as_seq().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_int(), Some(5));
    }
}
