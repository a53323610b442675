//! `Closure`: a captured environment paired with an ordered list of
//! (pattern, body) clauses.

use std::rc::Rc;

use crate::{
    applicable::Applicable1,
    code::Code,
    describer::Describer,
    env::EvalEnv,
    exception::{BuiltInExn, RunError, RunResult},
    pattern::{Pattern, bind_recurse},
    position::Pos,
    value::Value,
};

pub struct Clause {
    pub pat: Pattern,
    pub body: Rc<dyn Code>,
}

pub struct Closure {
    pub captured: EvalEnv,
    pub clauses: Vec<Clause>,
    pub pos: Pos,
}

impl Closure {
    #[must_use]
    pub fn new(captured: EvalEnv, clauses: Vec<Clause>, pos: Pos) -> Self {
        assert!(!clauses.is_empty(), "a closure always has at least one (pattern, body) clause");
        Self { captured, clauses, pos }
    }

    fn find_clause(&self, arg: &Value) -> RunResult<(&Clause, EvalEnv)> {
        for clause in &self.clauses {
            let mut env = self.captured.clone();
            let mut bindings = Vec::new();
            let matched = bind_recurse(&clause.pat, arg, &mut |pat, v| {
                if let Pattern::Ident(name) | Pattern::As(name, _) = pat {
                    bindings.push((name.clone(), v.clone()));
                }
            });
            if matched {
                for (name, value) in bindings {
                    env = env.bind(name, value);
                }
                return Ok((clause, env));
            }
        }
        Err(RunError::new(BuiltInExn::Bind).with_pos(self.pos))
    }

    /// Returns the extended environment without evaluating the body —
    /// used when the caller wants to sequence evaluation itself.
    pub fn bind(&self, arg: &Value) -> RunResult<EvalEnv> {
        self.find_clause(arg).map(|(_, env)| env)
    }

    /// `bindEval`: finds the matching clause and evaluates its body in
    /// the extended environment, raising the `Bind` basis-library
    /// exception at the closure's stored position on exhaustion, rather
    /// than an internal assertion.
    pub fn apply(&self, arg: &Value) -> RunResult<Value> {
        let (clause, env) = self.find_clause(arg)?;
        clause.body.eval(&env)
    }

    /// `let`-style binding: the single clause's body is evaluated against
    /// `env` to obtain the value that is then matched against the
    /// pattern, rather than matching a pre-supplied argument.
    pub fn eval_bind(&self, env: &EvalEnv) -> RunResult<EvalEnv> {
        assert_eq!(self.clauses.len(), 1, "evalBind is only used for single-clause let bindings");
        let clause = &self.clauses[0];
        let value = clause.body.eval(env)?;
        let mut out = self.captured.clone();
        let mut bindings = Vec::new();
        let matched = bind_recurse(&clause.pat, &value, &mut |pat, v| {
            if let Pattern::Ident(name) | Pattern::As(name, _) = pat {
                bindings.push((name.clone(), v.clone()));
            }
        });
        if !matched {
            return Err(RunError::new(BuiltInExn::Bind).with_pos(self.pos));
        }
        for (name, value) in bindings {
            out = out.bind(name, value);
        }
        Ok(out)
    }
}

impl Applicable1 for Closure {
    fn apply1(&self, arg: &Value) -> RunResult<Value> {
        self.apply(arg)
    }

    fn describe(&self, d: &mut Describer) {
        d.start("closure", |d| d.arg("clauses", self.clauses.len()));
    }
}
