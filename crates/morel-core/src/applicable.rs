//! `Applicable`: the efficient, environment-free compiled function value
//!.
//!
//! `Applicable` takes an argument and returns a value, with no environment
//! lookup required — cheaper than a general [`Code`](crate::code::Code)
//! for the common case of a statically-known function (a built-in, or a
//! closure reused as a 1-ary applicable). `Applicable1`/`2`/`3`/`4` avoid
//! constructing an ephemeral tuple value for the common strict,
//! environment-free case.

use std::rc::Rc;

use crate::{describer::Describer, exception::RunResult, position::Pos, value::Value};

/// The general `Applicable` contract: takes an argument, returns a value.
pub trait Applicable {
    fn apply(&self, arg: &Value) -> RunResult<Value>;

    fn describe(&self, d: &mut Describer);
}

/// A specialized 1-argument `Applicable` that avoids boxing its single
/// argument into a tuple `Value` first.
pub trait Applicable1 {
    fn apply1(&self, arg0: &Value) -> RunResult<Value>;

    fn describe(&self, d: &mut Describer);
}

/// Blanket bridge: every `Applicable1` is usable wherever the more general
/// `Applicable` is expected.
impl<T: Applicable1> Applicable for T {
    fn apply(&self, arg: &Value) -> RunResult<Value> {
        self.apply1(arg)
    }

    fn describe(&self, d: &mut Describer) {
        Applicable1::describe(self, d);
    }
}

pub trait Applicable2 {
    fn apply2(&self, arg0: &Value, arg1: &Value) -> RunResult<Value>;

    fn describe(&self, d: &mut Describer);

    /// Produces a chain of single-argument applications with equivalent
    /// semantics, for call sites that only have a 1-ary `Applicable` slot
    /// available.
    fn curry(self: Rc<Self>) -> Rc<dyn Applicable>
    where
        Self: 'static + Sized,
    {
        Rc::new(CurriedArg2 { inner: self, arg0: None })
    }
}

pub trait Applicable3 {
    fn apply3(&self, arg0: &Value, arg1: &Value, arg2: &Value) -> RunResult<Value>;

    fn describe(&self, d: &mut Describer);
}

pub trait Applicable4 {
    fn apply4(&self, arg0: &Value, arg1: &Value, arg2: &Value, arg3: &Value) -> RunResult<Value>;

    fn describe(&self, d: &mut Describer);
}

/// Intermediate state for a curried `Applicable2`: the first call
/// supplies `arg0` and returns a new `Applicable` waiting for `arg1`.
struct CurriedArg2<A: Applicable2> {
    inner: Rc<A>,
    arg0: Option<Value>,
}

impl<A: Applicable2 + 'static> Applicable for CurriedArg2<A> {
    fn apply(&self, arg: &Value) -> RunResult<Value> {
        match &self.arg0 {
            None => Ok(Value::Applicable(Rc::new(CurriedArg2 { inner: self.inner.clone(), arg0: Some(arg.clone()) }))),
            Some(arg0) => self.inner.apply2(arg0, arg),
        }
    }

    fn describe(&self, d: &mut Describer) {
        Applicable2::describe(self.inner.as_ref(), d);
    }
}

/// An `Applicable` that can re-attach a source position to itself. Used by
/// built-ins that can fail (`chr`, `sub`, `hd`, ...): the compiler calls
/// `with_pos` once per call site so the resulting runtime exception
/// reports the right location.
pub trait Positioned {
    #[must_use]
    fn with_pos(&self, pos: Pos) -> Rc<dyn Applicable>;
}

/// Lifts an `Applicable` to a [`Code`](crate::code::Code) that, when
/// evaluated, returns the `Applicable` itself and reports `is_constant() ==
/// true`.
pub struct ApplicableAsCode(pub Rc<dyn Applicable>);

impl crate::code::Code for ApplicableAsCode {
    fn eval(&self, _env: &crate::env::EvalEnv) -> RunResult<Value> {
        Ok(Value::Applicable(self.0.clone()))
    }

    fn is_constant(&self) -> bool {
        true
    }

    fn describe(&self, d: &mut Describer) {
        self.0.describe(d);
    }
}
