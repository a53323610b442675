//! Scan/join sink: `from pat in expr where cond`.
//!
//! Left/right/full joins are out of scope here; the current op is always
//! inner. `Scan` is always the head of a pipeline, so its single
//! `accept` call is the one that actually drives per-row iteration over
//! the source sequence.

use std::rc::Rc;

use crate::{
    code::Code,
    env::EvalEnv,
    exception::RunResult,
    pattern::Pattern,
    sink::{OrdinalSlot, RowSink},
    value::Value,
};

pub struct ScanSink {
    pub pat: Pattern,
    pub source: Rc<dyn Code>,
    /// The inline join condition (`where cond` in `from pat in expr where
    /// cond`); `None` when the scan has no filter.
    pub condition: Option<Rc<dyn Code>>,
    pub ordinal: OrdinalSlot,
    pub downstream: Box<dyn RowSink>,
}

impl RowSink for ScanSink {
    fn start(&mut self, env: &EvalEnv) -> RunResult<()> {
        // The only start action this core has: reset the row ordinal so
        // the first `accept` increments it to 0.
        self.ordinal.reset();
        self.downstream.start(env)
    }

    fn accept(&mut self, env: &EvalEnv) -> RunResult<()> {
        let source = self.source.eval(env)?;
        let Value::Seq(rows) = source else { unreachable!("a scan source always evaluates to a sequence") };
        for row in rows.iter() {
            let mutable = env.bind_mutable_pat(&self.pat);
            if !mutable.set_opt(&self.pat, row) {
                continue;
            }
            let row_env = mutable.env();
            if let Some(cond) = &self.condition {
                let keep = cond.eval(row_env)?;
                if keep.as_bool() != Some(true) {
                    continue;
                }
            }
            self.ordinal.increment();
            self.downstream.accept(row_env)?;
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
    use crate::sink::collect::CollectSink;

    #[test]
    fn scan_forwards_only_rows_matching_the_inline_condition() {
        let pat = Pattern::Ident(Rc::from("x"));
        let source = Rc::new(crate::code::Constant(Value::seq(vec![
            Value::Int(1),
            Value::Int(2),
            Value::Int(3),
        ])));
        let condition: Rc<dyn Code> = Rc::new(GreaterThanOne);
        let collect = CollectSink::new(Rc::new(crate::code::Get(Rc::from("x"))));
        let mut scan = ScanSink {
            pat,
            source,
            condition: Some(condition),
            ordinal: OrdinalSlot::new(),
            downstream: Box::new(collect),
        };
        let env = EvalEnv::root(HashMap::new());
        scan.start(&env).unwrap();
        scan.accept(&env).unwrap();
        let result = scan.result(&env).unwrap();
        let items = result.as_seq().unwrap();
        assert_eq!(items.iter().map(|v| v.as_int().unwrap()).collect::<Vec<_>>(), vec![2, 3]);
    }

    struct GreaterThanOne;
    impl Code for GreaterThanOne {
        fn eval(&self, env: &EvalEnv) -> RunResult<Value> {
            let x = env.get_opt("x").unwrap().as_int().unwrap();
            Ok(Value::Bool(x > 1))
        }
        fn describe(&self, _d: &mut crate::describer::Describer) {}
    }
}
