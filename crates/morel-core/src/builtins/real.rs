//! `Real` structure: reals are 32-bit floats. NaN handling is exact:
//! `compare` raises `Unordered` on NaN, `sign` raises `Domain` on NaN, and
//! the ordered comparison operators return `false` whenever either
//! operand is NaN.

use std::collections::HashMap;

use crate::{
    exception::{BuiltInExn, RunError, RunResult},
    value::Value,
};

fn r(v: &Value) -> f32 {
    v.as_real().expect("Real operator applied to a non-real")
}

pub fn add(a: &Value, b: &Value) -> RunResult<Value> {
    Ok(Value::real(r(a) + r(b)))
}
pub fn sub(a: &Value, b: &Value) -> RunResult<Value> {
    Ok(Value::real(r(a) - r(b)))
}
pub fn mul(a: &Value, b: &Value) -> RunResult<Value> {
    Ok(Value::real(r(a) * r(b)))
}
pub fn div(a: &Value, b: &Value) -> RunResult<Value> {
    Ok(Value::real(r(a) / r(b)))
}
pub fn negate(a: &Value) -> RunResult<Value> {
    Ok(Value::real_raw(-r(a)))
}
pub fn abs(a: &Value) -> RunResult<Value> {
    Ok(Value::real(r(a).abs()))
}
pub fn min(a: &Value, b: &Value) -> RunResult<Value> {
    let (a, b) = (r(a), r(b));
    Ok(Value::real(if a.is_nan() || b.is_nan() { f32::NAN } else { a.min(b) }))
}
pub fn max(a: &Value, b: &Value) -> RunResult<Value> {
    let (a, b) = (r(a), r(b));
    Ok(Value::real(if a.is_nan() || b.is_nan() { f32::NAN } else { a.max(b) }))
}

pub fn compare(a: &Value, b: &Value) -> RunResult<Value> {
    let (a, b) = (r(a), r(b));
    if a.is_nan() || b.is_nan() {
        return Err(RunError::new(BuiltInExn::Unordered));
    }
    Ok(super::int_::ordering_value(a.partial_cmp(&b).expect("non-NaN f32 always compares")))
}

pub fn eq(a: &Value, b: &Value) -> RunResult<Value> {
    Ok(Value::Bool(r(a) == r(b)))
}
pub fn ne(a: &Value, b: &Value) -> RunResult<Value> {
    Ok(Value::Bool(r(a) != r(b)))
}
pub fn lt(a: &Value, b: &Value) -> RunResult<Value> {
    Ok(Value::Bool(r(a) < r(b)))
}
pub fn le(a: &Value, b: &Value) -> RunResult<Value> {
    Ok(Value::Bool(r(a) <= r(b)))
}
pub fn gt(a: &Value, b: &Value) -> RunResult<Value> {
    Ok(Value::Bool(r(a) > r(b)))
}
pub fn ge(a: &Value, b: &Value) -> RunResult<Value> {
    Ok(Value::Bool(r(a) >= r(b)))
}

fn to_string(a: &Value) -> RunResult<Value> {
    let x = r(a);
    let text = if x.is_nan() {
        "nan".to_owned()
    } else if x.is_infinite() {
        if x > 0.0 { "inf".to_owned() } else { "~inf".to_owned() }
    } else {
        let mut buf = ryu::Buffer::new();
        let formatted = buf.format(x);
        formatted.strip_prefix('-').map_or_else(|| formatted.to_owned(), |rest| format!("~{rest}"))
    };
    Ok(Value::Str(std::rc::Rc::from(text)))
}

fn from_string(a: &Value) -> RunResult<Value> {
    let s = a.as_str().expect("Real.fromString applied to a non-string");
    let normalized = s.replacen('~', "-", 1);
    match normalized.parse::<f32>() {
        Ok(n) => Ok(Value::some(Value::real(n))),
        Err(_) => Ok(Value::none()),
    }
}

fn floor(a: &Value) -> RunResult<Value> {
    Ok(Value::Int(r(a).floor() as i64))
}
fn ceil(a: &Value) -> RunResult<Value> {
    Ok(Value::Int(r(a).ceil() as i64))
}
fn trunc(a: &Value) -> RunResult<Value> {
    Ok(Value::Int(r(a).trunc() as i64))
}
fn round(a: &Value) -> RunResult<Value> {
    Ok(Value::Int(r(a).round() as i64))
}
fn is_nan(a: &Value) -> RunResult<Value> {
    Ok(Value::Bool(r(a).is_nan()))
}
fn is_finite(a: &Value) -> RunResult<Value> {
    Ok(Value::Bool(r(a).is_finite()))
}
fn sign(a: &Value) -> RunResult<Value> {
    let x = r(a);
    if x.is_nan() {
        return Err(RunError::new(BuiltInExn::Domain));
    }
    Ok(Value::Int(if x > 0.0 {
        1
    } else if x < 0.0 {
        -1
    } else {
        0
    }))
}
fn sign_bit(a: &Value) -> RunResult<Value> {
    Ok(Value::Bool(r(a).is_sign_negative()))
}
fn copy_sign(a: &Value, b: &Value) -> RunResult<Value> {
    Ok(Value::real_raw(r(a).copysign(r(b))))
}
fn next_after(a: &Value, b: &Value) -> RunResult<Value> {
    let (x, y) = (r(a), r(b));
    Ok(Value::real(if x == y {
        x
    } else if y > x {
        f32::from_bits(x.to_bits() + 1)
    } else {
        f32::from_bits(x.to_bits() - 1)
    }))
}
fn from_int(a: &Value) -> RunResult<Value> {
    Ok(Value::real(a.as_int().expect("Real.fromInt applied to a non-int") as f32))
}
fn to_int(a: &Value) -> RunResult<Value> {
    Ok(Value::Int(r(a) as i64))
}

pub fn install(m: &mut HashMap<&'static str, Value>) {
    m.insert("Real.+", Value::Applicable(super::binary2("Real.+", add)));
    m.insert("Real.-", Value::Applicable(super::binary2("Real.-", sub)));
    m.insert("Real.*", Value::Applicable(super::binary2("Real.*", mul)));
    m.insert("Real./", Value::Applicable(super::binary2("Real./", div)));
    m.insert("Real.~", Value::Applicable(super::unary1("Real.~", negate)));
    m.insert("Real.abs", Value::Applicable(super::unary1("Real.abs", abs)));
    m.insert("Real.min", Value::Applicable(super::binary2("Real.min", min)));
    m.insert("Real.max", Value::Applicable(super::binary2("Real.max", max)));
    m.insert("Real.compare", Value::Applicable(super::binary2("Real.compare", compare)));
    m.insert("Real.==", Value::Applicable(super::binary2("Real.==", eq)));
    m.insert("Real.!=", Value::Applicable(super::binary2("Real.!=", ne)));
    m.insert("Real.<", Value::Applicable(super::binary2("Real.<", lt)));
    m.insert("Real.<=", Value::Applicable(super::binary2("Real.<=", le)));
    m.insert("Real.>", Value::Applicable(super::binary2("Real.>", gt)));
    m.insert("Real.>=", Value::Applicable(super::binary2("Real.>=", ge)));
    m.insert("Real.toString", Value::Applicable(super::unary1("Real.toString", to_string)));
    m.insert("Real.fromString", Value::Applicable(super::unary1("Real.fromString", from_string)));
    m.insert("Real.floor", Value::Applicable(super::unary1("Real.floor", floor)));
    m.insert("Real.ceil", Value::Applicable(super::unary1("Real.ceil", ceil)));
    m.insert("Real.trunc", Value::Applicable(super::unary1("Real.trunc", trunc)));
    m.insert("Real.round", Value::Applicable(super::unary1("Real.round", round)));
    m.insert("Real.isNan", Value::Applicable(super::unary1("Real.isNan", is_nan)));
    m.insert("Real.isFinite", Value::Applicable(super::unary1("Real.isFinite", is_finite)));
    m.insert("Real.sign", Value::Applicable(super::unary1("Real.sign", sign)));
    m.insert("Real.signBit", Value::Applicable(super::unary1("Real.signBit", sign_bit)));
    m.insert("Real.copySign", Value::Applicable(super::binary2("Real.copySign", copy_sign)));
    m.insert("Real.nextAfter", Value::Applicable(super::binary2("Real.nextAfter", next_after)));
    m.insert("Real.fromInt", Value::Applicable(super::unary1("Real.fromInt", from_int)));
    m.insert("Real.toInt", Value::Applicable(super::unary1("Real.toInt", to_int)));
    m.insert("Real.posInf", Value::real_raw(f32::INFINITY));
    m.insert("Real.negInf", Value::real_raw(f32::NEG_INFINITY));
    m.insert("Real.maxFinite", Value::real(f32::MAX));
    m.insert("Real.minPos", Value::real(f32::MIN_POSITIVE));
    m.insert("Real.epsilon", Value::real(f32::EPSILON));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compare_raises_unordered_on_nan() {
        let err = compare(&Value::real(f32::NAN), &Value::real(1.0)).unwrap_err();
        assert_eq!(err.kind, BuiltInExn::Unordered);
    }

    #[test]
    fn sign_raises_domain_on_nan() {
        let err = sign(&Value::real(f32::NAN)).unwrap_err();
        assert_eq!(err.kind, BuiltInExn::Domain);
    }

    #[test]
    fn ordered_comparisons_are_false_on_nan() {
        let nan = Value::real(f32::NAN);
        let one = Value::real(1.0);
        assert_eq!(lt(&one, &nan).unwrap().as_bool(), Some(false));
        assert_eq!(gt(&one, &nan).unwrap().as_bool(), Some(false));
    }

    #[test]
    fn to_string_replaces_minus_with_tilde() {
        assert_eq!(to_string(&Value::real(-2.5)).unwrap().as_str(), Some("~2.5"));
    }

    #[test]
    fn to_string_renders_infinities_and_nan() {
        assert_eq!(to_string(&Value::real_raw(f32::INFINITY)).unwrap().as_str(), Some("inf"));
        assert_eq!(to_string(&Value::real_raw(f32::NEG_INFINITY)).unwrap().as_str(), Some("~inf"));
        assert_eq!(to_string(&Value::real(f32::NAN)).unwrap().as_str(), Some("nan"));
    }
}
