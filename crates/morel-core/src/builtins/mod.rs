//! The built-in operator library.
//!
//! A flat registry from identifier to value: either a plain [`Value`]
//! constant, an [`Applicable`], or (for the handful of compile-time
//! overloaded operators `+ - * /`, `negate`, `sum`) a pre-specialized pair
//! of `Applicable`s the CLI harness picks between directly, since this
//! crate has no compiler to perform the real macro-expansion a type
//! checker would normally drive.
//!
//! One module per ML structure (`Int`, `Real`, `List`, ...), installed
//! into a single flat identifier -> `Applicable` table.

pub mod bag;
pub mod bool_;
pub mod char_;
pub mod int_;
pub mod list;
pub mod list_pair;
pub mod math;
pub mod option;
pub mod real;
pub mod relational;
pub mod string;
pub mod sys;
pub mod vector;

use std::{collections::HashMap, rc::Rc};

use crate::{applicable::Applicable, describer::Describer, exception::RunResult, value::Value};

/// Wraps a plain Rust closure as an `Applicable1` so most built-ins need no
/// bespoke struct.
pub struct Unary<F> {
    pub name: &'static str,
    pub func: F,
}

impl<F: Fn(&Value) -> RunResult<Value>> crate::applicable::Applicable1 for Unary<F> {
    fn apply1(&self, arg: &Value) -> RunResult<Value> {
        (self.func)(arg)
    }

    fn describe(&self, d: &mut Describer) {
        d.start(self.name, |_d| {});
    }
}

/// Wraps a plain Rust closure as an `Applicable2`.
pub struct Binary<F> {
    pub name: &'static str,
    pub func: F,
}

impl<F: Fn(&Value, &Value) -> RunResult<Value>> crate::applicable::Applicable2 for Binary<F> {
    fn apply2(&self, arg0: &Value, arg1: &Value) -> RunResult<Value> {
        (self.func)(arg0, arg1)
    }

    fn describe(&self, d: &mut Describer) {
        d.start(self.name, |_d| {});
    }
}

/// Wraps a plain Rust closure as an `Applicable3`.
pub struct Ternary<F> {
    pub name: &'static str,
    pub func: F,
}

impl<F: Fn(&Value, &Value, &Value) -> RunResult<Value>> crate::applicable::Applicable3 for Ternary<F> {
    fn apply3(&self, arg0: &Value, arg1: &Value, arg2: &Value) -> RunResult<Value> {
        (self.func)(arg0, arg1, arg2)
    }

    fn describe(&self, d: &mut Describer) {
        d.start(self.name, |_d| {});
    }
}

pub(crate) fn unary1(name: &'static str, func: fn(&Value) -> RunResult<Value>) -> Rc<dyn Applicable> {
    Rc::new(Unary { name, func })
}

pub(crate) fn binary2(name: &'static str, func: fn(&Value, &Value) -> RunResult<Value>) -> Rc<dyn Applicable> {
    use crate::applicable::Applicable2;
    Rc::new(Binary { name, func }).curry()
}

/// A positioned or plain ternary built-in curried one argument at a time,
/// for call sites (like `String.extract`) that only have a 1-ary
/// `Applicable` slot available.
pub(crate) fn curry_ternary(name: &'static str, inner: Rc<dyn crate::applicable::Applicable3>) -> Rc<dyn Applicable> {
    struct Stage0 {
        name: &'static str,
        inner: Rc<dyn crate::applicable::Applicable3>,
    }
    struct Stage1 {
        name: &'static str,
        inner: Rc<dyn crate::applicable::Applicable3>,
        arg0: Value,
    }
    struct Stage2 {
        inner: Rc<dyn crate::applicable::Applicable3>,
        arg0: Value,
        arg1: Value,
    }
    impl Applicable for Stage0 {
        fn apply(&self, arg: &Value) -> RunResult<Value> {
            Ok(Value::Applicable(Rc::new(Stage1 { name: self.name, inner: self.inner.clone(), arg0: arg.clone() })))
        }
        fn describe(&self, d: &mut Describer) {
            d.start(self.name, |_d| {});
        }
    }
    impl Applicable for Stage1 {
        fn apply(&self, arg: &Value) -> RunResult<Value> {
            Ok(Value::Applicable(Rc::new(Stage2 { inner: self.inner.clone(), arg0: self.arg0.clone(), arg1: arg.clone() })))
        }
        fn describe(&self, d: &mut Describer) {
            d.start(self.name, |_d| {});
        }
    }
    impl Applicable for Stage2 {
        fn apply(&self, arg: &Value) -> RunResult<Value> {
            self.inner.apply3(&self.arg0, &self.arg1, arg)
        }
        fn describe(&self, d: &mut Describer) {
            self.inner.describe(d);
        }
    }
    Rc::new(Stage0 { name, inner })
}

pub(crate) fn ternary3(name: &'static str, func: fn(&Value, &Value, &Value) -> RunResult<Value>) -> Rc<dyn Applicable> {
    curry_ternary(name, Rc::new(Ternary { name, func }))
}

/// Curries a 4-ary built-in (`ListPair.foldl`/`foldr`) one argument at a
/// time, mirroring [`curry_ternary`].
pub(crate) fn curry_quaternary(
    name: &'static str,
    inner: Rc<dyn crate::applicable::Applicable4>,
) -> Rc<dyn Applicable> {
    struct Stage0 {
        name: &'static str,
        inner: Rc<dyn crate::applicable::Applicable4>,
    }
    struct Stage1 {
        name: &'static str,
        inner: Rc<dyn crate::applicable::Applicable4>,
        arg0: Value,
    }
    struct Stage2 {
        name: &'static str,
        inner: Rc<dyn crate::applicable::Applicable4>,
        arg0: Value,
        arg1: Value,
    }
    struct Stage3 {
        inner: Rc<dyn crate::applicable::Applicable4>,
        arg0: Value,
        arg1: Value,
        arg2: Value,
    }
    impl Applicable for Stage0 {
        fn apply(&self, arg: &Value) -> RunResult<Value> {
            Ok(Value::Applicable(Rc::new(Stage1 { name: self.name, inner: self.inner.clone(), arg0: arg.clone() })))
        }
        fn describe(&self, d: &mut Describer) {
            d.start(self.name, |_d| {});
        }
    }
    impl Applicable for Stage1 {
        fn apply(&self, arg: &Value) -> RunResult<Value> {
            Ok(Value::Applicable(Rc::new(Stage2 {
                name: self.name,
                inner: self.inner.clone(),
                arg0: self.arg0.clone(),
                arg1: arg.clone(),
            })))
        }
        fn describe(&self, d: &mut Describer) {
            d.start(self.name, |_d| {});
        }
    }
    impl Applicable for Stage2 {
        fn apply(&self, arg: &Value) -> RunResult<Value> {
            Ok(Value::Applicable(Rc::new(Stage3 {
                inner: self.inner.clone(),
                arg0: self.arg0.clone(),
                arg1: self.arg1.clone(),
                arg2: arg.clone(),
            })))
        }
        fn describe(&self, d: &mut Describer) {
            d.start(self.name, |_d| {});
        }
    }
    impl Applicable for Stage3 {
        fn apply(&self, arg: &Value) -> RunResult<Value> {
            self.inner.apply4(&self.arg0, &self.arg1, &self.arg2, arg)
        }
        fn describe(&self, d: &mut Describer) {
            self.inner.describe(d);
        }
    }
    Rc::new(Stage0 { name, inner })
}

/// Applies an arbitrary function value (a closure or a built-in) to an
/// argument — used by higher-order built-ins (`List.map`, `Option.app`,
/// `ListPair.zip`'s callers, ...) that receive their function as a plain
/// [`Value`] rather than a compiled call site.
pub(crate) fn call(f: &Value, arg: &Value) -> RunResult<Value> {
    match f {
        Value::Closure(c) => c.apply(arg),
        Value::Applicable(a) => a.apply(arg),
        _ => panic!("attempted to call a non-function value"),
    }
}

/// Builds the root environment's built-in table.
#[must_use]
pub fn registry() -> HashMap<&'static str, Value> {
    let mut m = HashMap::new();
    m.insert("true", Value::Bool(true));
    m.insert("false", Value::Bool(false));
    bool_::install(&mut m);
    int_::install(&mut m);
    real::install(&mut m);
    char_::install(&mut m);
    string::install(&mut m);
    list::install(&mut m);
    bag::install(&mut m);
    vector::install(&mut m);
    option::install(&mut m);
    list_pair::install(&mut m);
    math::install(&mut m);
    relational::install(&mut m);
    m
}

/// [`registry`] plus the `Sys` structure, for callers that have a session
/// to bind built-ins against.
#[must_use]
pub fn registry_with_session(session: Rc<std::cell::RefCell<crate::session::Session>>) -> HashMap<&'static str, Value> {
    let mut m = registry();
    sys::install(&mut m, session);
    m
}
