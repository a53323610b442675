#![doc = include_str!("../../../README.md")]

pub mod applicable;
pub mod builtins;
pub mod closure;
pub mod code;
pub mod comparator;
pub mod describer;
pub mod env;
pub mod exception;
pub mod pattern;
pub mod position;
pub mod session;
pub mod sink;
pub mod type_descriptor;
pub mod value;

pub use crate::{
    applicable::{Applicable, Applicable1, Applicable2, Applicable3, Applicable4, Positioned},
    closure::{Clause, Closure},
    code::Code,
    comparator::{Comparator, ComparatorBuilder},
    describer::{Describable, Describer},
    env::{EvalEnv, MutableEvalEnv},
    exception::{BuiltInExn, RunError, RunResult},
    pattern::Pattern,
    position::Pos,
    session::Session,
    sink::{FromCode, RowSink},
    type_descriptor::{TypeDescriptor, TypeKey},
    value::{Value, ValueKey},
};
