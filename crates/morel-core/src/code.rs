//! `Code`: the general compiled-expression abstraction.
//!
//! `Code::eval(env)` evaluates against an environment and returns a value.
//! `from` (the relational query) is `sink::FromCode` in the `sink` module
//! since it owns a whole `RowSink` chain; the other concrete node types
//! live here.

use std::rc::Rc;

use crate::{
    applicable::{Applicable, Applicable1, Applicable2, Applicable3},
    closure::{Clause, Closure},
    describer::Describer,
    env::EvalEnv,
    exception::RunResult,
    pattern::Pattern,
    position::Pos,
    value::Value,
};

/// The general compiled-expression contract.
pub trait Code {
    fn eval(&self, env: &EvalEnv) -> RunResult<Value>;

    /// True for nodes whose value never depends on the environment
    /// (literal constants, and an `Applicable` lifted via
    /// [`crate::applicable::ApplicableAsCode`]).
    fn is_constant(&self) -> bool {
        false
    }

    fn describe(&self, d: &mut Describer);
}

pub struct Constant(pub Value);

impl Code for Constant {
    fn eval(&self, _env: &EvalEnv) -> RunResult<Value> {
        Ok(self.0.clone())
    }

    fn is_constant(&self) -> bool {
        true
    }

    fn describe(&self, d: &mut Describer) {
        d.start("constant", |d| d.arg("value", &self.0));
    }
}

pub struct Get(pub Rc<str>);

impl Code for Get {
    fn eval(&self, env: &EvalEnv) -> RunResult<Value> {
        Ok(env
            .get_opt(&self.0)
            .unwrap_or_else(|| unreachable!("unbound variable '{}' — the compiler guarantees well-scoped code", self.0)))
    }

    fn describe(&self, d: &mut Describer) {
        d.start("get", |d| d.arg("name", &*self.0));
    }
}

/// Reads several named bindings into a single sequence value — used for
/// tuple/list "get" nodes that gather more than one variable at once.
pub struct GetMulti(pub Vec<Rc<str>>);

impl Code for GetMulti {
    fn eval(&self, env: &EvalEnv) -> RunResult<Value> {
        let items = self
            .0
            .iter()
            .map(|name| {
                env.get_opt(name)
                    .unwrap_or_else(|| unreachable!("unbound variable '{name}' in GetMulti"))
            })
            .collect();
        Ok(Value::seq(items))
    }

    fn describe(&self, d: &mut Describer) {
        d.start("get_multi", |d| d.arg("names", self.0.iter().map(|n| &**n).collect::<Vec<_>>()));
    }
}

pub struct TupleConstruct(pub Vec<Rc<dyn Code>>);

impl Code for TupleConstruct {
    fn eval(&self, env: &EvalEnv) -> RunResult<Value> {
        let items = self.0.iter().map(|c| c.eval(env)).collect::<RunResult<Vec<_>>>()?;
        Ok(Value::seq(items))
    }

    fn describe(&self, d: &mut Describer) {
        d.start("tuple", |d| {
            for (i, c) in self.0.iter().enumerate() {
                d.arg_node(&i.to_string(), &CodeDescribable(c.as_ref()));
            }
        });
    }
}

struct CodeDescribable<'a>(&'a dyn Code);
impl crate::describer::Describable for CodeDescribable<'_> {
    fn describe(&self, d: &mut Describer) {
        self.0.describe(d);
    }
}

/// Short-circuit `andalso`: the right operand is evaluated only if the
/// left is `true`.
pub struct AndAlso(pub Rc<dyn Code>, pub Rc<dyn Code>);

impl Code for AndAlso {
    fn eval(&self, env: &EvalEnv) -> RunResult<Value> {
        let left = self.0.eval(env)?;
        if left.as_bool() == Some(false) {
            return Ok(Value::Bool(false));
        }
        self.1.eval(env)
    }

    fn describe(&self, d: &mut Describer) {
        d.start("andalso", |d| {
            d.arg_node("left", &CodeDescribable(self.0.as_ref()));
            d.arg_node("right", &CodeDescribable(self.1.as_ref()));
        });
    }
}

/// Short-circuit `orelse`: the right operand is evaluated only if the
/// left is `false`.
pub struct OrElse(pub Rc<dyn Code>, pub Rc<dyn Code>);

impl Code for OrElse {
    fn eval(&self, env: &EvalEnv) -> RunResult<Value> {
        let left = self.0.eval(env)?;
        if left.as_bool() == Some(true) {
            return Ok(Value::Bool(true));
        }
        self.1.eval(env)
    }

    fn describe(&self, d: &mut Describer) {
        d.start("orelse", |d| {
            d.arg_node("left", &CodeDescribable(self.0.as_ref()));
            d.arg_node("right", &CodeDescribable(self.1.as_ref()));
        });
    }
}

/// A single-clause `let val pat = e1 in e2 end`.
pub struct Let {
    pub pat_clause: Clause,
    pub body: Rc<dyn Code>,
    pub pos: Pos,
}

impl Code for Let {
    fn eval(&self, env: &EvalEnv) -> RunResult<Value> {
        let closure = Closure::new(env.clone(), vec![clone_clause(&self.pat_clause)], self.pos);
        let extended = closure.eval_bind(env)?;
        self.body.eval(&extended)
    }

    fn describe(&self, d: &mut Describer) {
        d.start("let", |d| d.arg_node("body", &CodeDescribable(self.body.as_ref())));
    }
}

fn clone_clause(c: &Clause) -> Clause {
    Clause { pat: c.pat.clone(), body: c.body.clone() }
}

/// A multi-clause `let` (several successive `val`/`fun` bindings,
/// desugared into nested single-clause lets by the compiler in practice,
/// but modeled directly here for the cases where the compiler emits one
/// node covering all of them).
pub struct LetMulti {
    pub bindings: Vec<(Clause, Pos)>,
    pub body: Rc<dyn Code>,
}

impl Code for LetMulti {
    fn eval(&self, env: &EvalEnv) -> RunResult<Value> {
        let mut current = env.clone();
        for (clause, pos) in &self.bindings {
            let closure = Closure::new(current.clone(), vec![clone_clause(clause)], *pos);
            current = closure.eval_bind(&current)?;
        }
        self.body.eval(&current)
    }

    fn describe(&self, d: &mut Describer) {
        d.start("let_multi", |d| d.arg("bindings", self.bindings.len()));
    }
}

/// Function application, applicable-to-code: the function is a
/// statically-known `Applicable1`, the argument is computed.
pub struct Apply1 {
    pub func: Rc<dyn Applicable>,
    pub arg: Rc<dyn Code>,
}

impl Code for Apply1 {
    fn eval(&self, env: &EvalEnv) -> RunResult<Value> {
        let arg = self.arg.eval(env)?;
        self.func.apply(&arg)
    }

    fn describe(&self, d: &mut Describer) {
        d.start("apply1", |d| d.arg_node("arg", &CodeDescribable(self.arg.as_ref())));
    }
}

/// Function application, applicable-to-two-codes.
pub struct Apply2<F: Applicable2> {
    pub func: Rc<F>,
    pub arg0: Rc<dyn Code>,
    pub arg1: Rc<dyn Code>,
}

impl<F: Applicable2> Code for Apply2<F> {
    fn eval(&self, env: &EvalEnv) -> RunResult<Value> {
        let a0 = self.arg0.eval(env)?;
        let a1 = self.arg1.eval(env)?;
        self.func.apply2(&a0, &a1)
    }

    fn describe(&self, d: &mut Describer) {
        Applicable2::describe(self.func.as_ref(), d);
    }
}

/// Function application, applicable-to-three-codes.
pub struct Apply3<F: Applicable3> {
    pub func: Rc<F>,
    pub arg0: Rc<dyn Code>,
    pub arg1: Rc<dyn Code>,
    pub arg2: Rc<dyn Code>,
}

impl<F: Applicable3> Code for Apply3<F> {
    fn eval(&self, env: &EvalEnv) -> RunResult<Value> {
        let a0 = self.arg0.eval(env)?;
        let a1 = self.arg1.eval(env)?;
        let a2 = self.arg2.eval(env)?;
        self.func.apply3(&a0, &a1, &a2)
    }

    fn describe(&self, d: &mut Describer) {
        Applicable3::describe(self.func.as_ref(), d);
    }
}

/// Function application, code-to-code: the function itself is computed
/// (the general case — e.g. `(if b then f else g) x`).
pub struct ApplyDynamic {
    pub func: Rc<dyn Code>,
    pub arg: Rc<dyn Code>,
}

impl Code for ApplyDynamic {
    fn eval(&self, env: &EvalEnv) -> RunResult<Value> {
        let func = self.func.eval(env)?;
        let arg = self.arg.eval(env)?;
        match func {
            Value::Applicable(a) => a.apply(&arg),
            Value::Closure(c) => c.apply(&arg),
            _ => unreachable!("ApplyDynamic's func must evaluate to a function value — a compiler invariant"),
        }
    }

    fn describe(&self, d: &mut Describer) {
        d.start("apply_dynamic", |d| {
            d.arg_node("func", &CodeDescribable(self.func.as_ref()));
            d.arg_node("arg", &CodeDescribable(self.arg.as_ref()));
        });
    }
}

/// Builds a closure value from an ordered, non-empty list of (pattern,
/// body) clauses, capturing `env`.
pub struct MakeClosure {
    pub clauses: Vec<(Pattern, Rc<dyn Code>)>,
    pub pos: Pos,
}

impl Code for MakeClosure {
    fn eval(&self, env: &EvalEnv) -> RunResult<Value> {
        let clauses = self.clauses.iter().map(|(pat, body)| Clause { pat: pat.clone(), body: body.clone() }).collect();
        Ok(Value::Closure(Rc::new(Closure::new(env.clone(), clauses, self.pos))))
    }

    fn describe(&self, d: &mut Describer) {
        d.start("closure_literal", |d| d.arg("clauses", self.clauses.len()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{env::EvalEnv, pattern::Literal};
    use std::collections::HashMap;

    fn root() -> EvalEnv {
        EvalEnv::root(HashMap::new())
    }

    #[test]
    fn constant_is_constant_and_evaluates_to_itself() {
        let c = Constant(Value::Int(7));
        assert!(c.is_constant());
        assert_eq!(c.eval(&root()).unwrap().as_int(), Some(7));
    }

    #[test]
    fn andalso_short_circuits() {
        struct Panics;
        impl Code for Panics {
            fn eval(&self, _env: &EvalEnv) -> RunResult<Value> {
                panic!("right operand must not be evaluated")
            }
            fn describe(&self, _d: &mut Describer) {}
        }
        let expr = AndAlso(Rc::new(Constant(Value::Bool(false))), Rc::new(Panics));
        assert_eq!(expr.eval(&root()).unwrap().as_bool(), Some(false));
    }

    #[test]
    fn orelse_short_circuits() {
        struct Panics;
        impl Code for Panics {
            fn eval(&self, _env: &EvalEnv) -> RunResult<Value> {
                panic!("right operand must not be evaluated")
            }
            fn describe(&self, _d: &mut Describer) {}
        }
        let expr = OrElse(Rc::new(Constant(Value::Bool(true))), Rc::new(Panics));
        assert_eq!(expr.eval(&root()).unwrap().as_bool(), Some(true));
    }

    #[test]
    fn apply_dynamic_calls_a_closure_value() {
        let identity = MakeClosure {
            clauses: vec![(Pattern::Ident(Rc::from("x")), Rc::new(Get(Rc::from("x"))))],
            pos: Pos::synthetic(),
        };
        let apply = ApplyDynamic { func: Rc::new(identity), arg: Rc::new(Constant(Value::Int(9))) };
        assert_eq!(apply.eval(&root()).unwrap().as_int(), Some(9));
    }

    #[test]
    fn let_binds_pattern_then_evaluates_body() {
        let let_code = Let {
            pat_clause: Clause { pat: Pattern::Ident(Rc::from("x")), body: Rc::new(Constant(Value::Int(3))) },
            body: Rc::new(Get(Rc::from("x"))),
            pos: Pos::synthetic(),
        };
        assert_eq!(let_code.eval(&root()).unwrap().as_int(), Some(3));
    }

    #[test]
    fn literal_pattern_mismatch_in_let_raises_bind() {
        let let_code = Let {
            pat_clause: Clause {
                pat: Pattern::Literal(Literal::Int(5)),
                body: Rc::new(Constant(Value::Int(3))),
            },
            body: Rc::new(Constant(Value::Unit)),
            pos: Pos::synthetic(),
        };
        let err = let_code.eval(&root()).unwrap_err();
        assert_eq!(err.kind, crate::exception::BuiltInExn::Bind);
    }
}
