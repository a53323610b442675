//! `Option` structure. `valOf` raises `Option` on
//! `NONE`.

use std::collections::HashMap;

use crate::{exception::{BuiltInExn, RunError, RunResult}, value::Value};

fn opt(v: &Value) -> Option<&Value> {
    v.as_option().expect("Option operator applied to a non-option")
}

fn is_some(a: &Value) -> RunResult<Value> {
    Ok(Value::Bool(opt(a).is_some()))
}

fn is_none(a: &Value) -> RunResult<Value> {
    Ok(Value::Bool(opt(a).is_none()))
}

fn val_of(a: &Value) -> RunResult<Value> {
    opt(a).cloned().ok_or_else(|| RunError::new(BuiltInExn::Option))
}

fn get_opt(a: &Value, default: &Value) -> RunResult<Value> {
    Ok(opt(a).cloned().unwrap_or_else(|| default.clone()))
}

fn map(f: &Value, a: &Value) -> RunResult<Value> {
    match opt(a) {
        None => Ok(Value::none()),
        Some(v) => Ok(Value::some(super::call(f, v)?)),
    }
}

fn map_partial(f: &Value, a: &Value) -> RunResult<Value> {
    match opt(a) {
        None => Ok(Value::none()),
        Some(v) => super::call(f, v),
    }
}

fn compose(f: &Value, g: &Value, a: &Value) -> RunResult<Value> {
    match opt(a) {
        None => Ok(Value::none()),
        Some(v) => Ok(Value::some(super::call(f, &super::call(g, v)?)?)),
    }
}

fn join(a: &Value) -> RunResult<Value> {
    match opt(a) {
        None => Ok(Value::none()),
        Some(inner) => Ok(inner.clone()),
    }
}

fn app(f: &Value, a: &Value) -> RunResult<Value> {
    if let Some(v) = opt(a) {
        super::call(f, v)?;
    }
    Ok(Value::Unit)
}

fn filter(f: &Value, a: &Value) -> RunResult<Value> {
    match opt(a) {
        None => Ok(Value::none()),
        Some(v) => {
            if super::call(f, v)?.as_bool().expect("Option.filter predicate must return a bool") {
                Ok(Value::some(v.clone()))
            } else {
                Ok(Value::none())
            }
        }
    }
}

pub fn install(m: &mut HashMap<&'static str, Value>) {
    m.insert("Option.isSome", Value::Applicable(super::unary1("Option.isSome", is_some)));
    m.insert("Option.isNone", Value::Applicable(super::unary1("Option.isNone", is_none)));
    m.insert("Option.valOf", Value::Applicable(super::unary1("Option.valOf", val_of)));
    m.insert("Option.getOpt", Value::Applicable(super::binary2("Option.getOpt", get_opt)));
    m.insert("Option.map", Value::Applicable(super::binary2("Option.map", map)));
    m.insert("Option.mapPartial", Value::Applicable(super::binary2("Option.mapPartial", map_partial)));
    m.insert("Option.compose", Value::Applicable(super::ternary3("Option.compose", compose)));
    m.insert("Option.join", Value::Applicable(super::unary1("Option.join", join)));
    m.insert("Option.app", Value::Applicable(super::binary2("Option.app", app)));
    m.insert("Option.filter", Value::Applicable(super::binary2("Option.filter", filter)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn val_of_raises_option_on_none() {
        let err = val_of(&Value::none()).unwrap_err();
        assert_eq!(err.kind, BuiltInExn::Option);
    }

    #[test]
    fn get_opt_substitutes_default_on_none() {
        assert_eq!(get_opt(&Value::none(), &Value::Int(5)).unwrap().as_int(), Some(5));
        assert_eq!(get_opt(&Value::some(Value::Int(1)), &Value::Int(5)).unwrap().as_int(), Some(1));
    }

    #[test]
    fn join_flattens_one_layer() {
        let nested = Value::some(Value::some(Value::Int(3)));
        let flat = join(&nested).unwrap();
        assert_eq!(flat.as_option().unwrap().unwrap().as_int(), Some(3));
    }
}
