//! `Int` structure.
//!
//! Division/modulo use floor semantics (`div`/`mod`); `quot`/`rem` use
//! truncated semantics —  "Arithmetic semantics".

use std::{collections::HashMap, rc::Rc};

use crate::{
    applicable::Applicable,
    exception::{BuiltInExn, RunError, RunResult},
    value::Value,
};

fn i(v: &Value) -> i64 {
    v.as_int().expect("Int operator applied to a non-int")
}

pub fn add(a: &Value, b: &Value) -> RunResult<Value> {
    Ok(Value::Int(i(a) + i(b)))
}

pub fn sub(a: &Value, b: &Value) -> RunResult<Value> {
    Ok(Value::Int(i(a) - i(b)))
}

pub fn mul(a: &Value, b: &Value) -> RunResult<Value> {
    Ok(Value::Int(i(a) * i(b)))
}

pub fn div(a: &Value, b: &Value) -> RunResult<Value> {
    let (a, b) = (i(a), i(b));
    if b == 0 {
        return Err(RunError::new(BuiltInExn::Div));
    }
    Ok(Value::Int(floor_div(a, b)))
}

fn floor_div(a: i64, b: i64) -> i64 {
    let q = a / b;
    let r = a % b;
    if (r != 0) && ((r < 0) != (b < 0)) { q - 1 } else { q }
}

pub fn modulo(a: &Value, b: &Value) -> RunResult<Value> {
    let (a, b) = (i(a), i(b));
    if b == 0 {
        return Err(RunError::new(BuiltInExn::Div));
    }
    let r = a % b;
    Ok(Value::Int(if r != 0 && (r < 0) != (b < 0) { r + b } else { r }))
}

pub fn quot(a: &Value, b: &Value) -> RunResult<Value> {
    let (a, b) = (i(a), i(b));
    if b == 0 {
        return Err(RunError::new(BuiltInExn::Div));
    }
    Ok(Value::Int(a / b))
}

pub fn rem(a: &Value, b: &Value) -> RunResult<Value> {
    let (a, b) = (i(a), i(b));
    if b == 0 {
        return Err(RunError::new(BuiltInExn::Div));
    }
    Ok(Value::Int(a % b))
}

pub fn abs(a: &Value) -> RunResult<Value> {
    Ok(Value::Int(i(a).abs()))
}

pub fn negate(a: &Value) -> RunResult<Value> {
    Ok(Value::Int(-i(a)))
}

pub fn min(a: &Value, b: &Value) -> RunResult<Value> {
    Ok(Value::Int(i(a).min(i(b))))
}

pub fn max(a: &Value, b: &Value) -> RunResult<Value> {
    Ok(Value::Int(i(a).max(i(b))))
}

pub fn compare(a: &Value, b: &Value) -> RunResult<Value> {
    Ok(ordering_value(i(a).cmp(&i(b))))
}

pub(crate) fn ordering_value(o: std::cmp::Ordering) -> Value {
    let tag = match o {
        std::cmp::Ordering::Less => "LESS",
        std::cmp::Ordering::Equal => "EQUAL",
        std::cmp::Ordering::Greater => "GREATER",
    };
    Value::seq(vec![Value::Str(Rc::from(tag))])
}

fn to_string(a: &Value) -> RunResult<Value> {
    let n = i(a);
    let text = if n < 0 { format!("~{}", -n) } else { n.to_string() };
    Ok(Value::Str(Rc::from(text)))
}

fn from_string(a: &Value) -> RunResult<Value> {
    let s = a.as_str().expect("Int.fromString applied to a non-string");
    let normalized = s.replacen('~', "-", 1);
    match normalized.parse::<i64>() {
        Ok(n) => Ok(Value::some(Value::Int(n))),
        Err(_) => Ok(Value::none()),
    }
}

pub fn install(m: &mut HashMap<&'static str, Value>) {
    m.insert("Int.+", Value::Applicable(super::binary2("Int.+", add)));
    m.insert("Int.-", Value::Applicable(super::binary2("Int.-", sub)));
    m.insert("Int.*", Value::Applicable(super::binary2("Int.*", mul)));
    m.insert("Int.div", Value::Applicable(super::binary2("Int.div", div)));
    m.insert("Int.mod", Value::Applicable(super::binary2("Int.mod", modulo)));
    m.insert("Int.quot", Value::Applicable(super::binary2("Int.quot", quot)));
    m.insert("Int.rem", Value::Applicable(super::binary2("Int.rem", rem)));
    m.insert("Int.abs", Value::Applicable(super::unary1("Int.abs", abs)));
    m.insert("Int.~", Value::Applicable(super::unary1("Int.~", negate)));
    m.insert("Int.min", Value::Applicable(super::binary2("Int.min", min)));
    m.insert("Int.max", Value::Applicable(super::binary2("Int.max", max)));
    m.insert("Int.compare", Value::Applicable(super::binary2("Int.compare", compare)));
    m.insert("Int.toString", Value::Applicable(super::unary1("Int.toString", to_string)));
    m.insert("Int.fromString", Value::Applicable(super::unary1("Int.fromString", from_string)));
    // `LargeInt` is not a distinct type in this data model; toLarge/fromLarge are identity stand-ins.
    m.insert("Int.toLarge", Value::Applicable(identity()));
    m.insert("Int.fromLarge", Value::Applicable(identity()));
    m.insert("Int.maxInt", Value::Int(i64::MAX));
    m.insert("Int.minInt", Value::Int(i64::MIN));
    m.insert("Int.precision", Value::some(Value::Int(64)));
}

fn identity() -> Rc<dyn Applicable> {
    super::unary1("Int.id", |v| Ok(v.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn div_and_mod_use_floor_semantics() {
        assert_eq!(div(&Value::Int(-7), &Value::Int(2)).unwrap().as_int(), Some(-4));
        assert_eq!(modulo(&Value::Int(-7), &Value::Int(2)).unwrap().as_int(), Some(1));
    }

    #[test]
    fn quot_and_rem_truncate_toward_zero() {
        assert_eq!(quot(&Value::Int(-7), &Value::Int(2)).unwrap().as_int(), Some(-3));
        assert_eq!(rem(&Value::Int(-7), &Value::Int(2)).unwrap().as_int(), Some(-1));
    }

    #[test]
    fn div_by_zero_raises_div() {
        let err = div(&Value::Int(1), &Value::Int(0)).unwrap_err();
        assert_eq!(err.kind, BuiltInExn::Div);
    }

    #[test]
    fn to_string_uses_tilde_for_negative() {
        assert_eq!(to_string(&Value::Int(-3)).unwrap().as_str(), Some("~3"));
    }

    #[test]
    fn from_string_round_trips_to_string() {
        let s = to_string(&Value::Int(-42)).unwrap();
        let round = from_string(&s).unwrap();
        assert_eq!(round.as_option().unwrap().unwrap().as_int(), Some(-42));
    }
}
