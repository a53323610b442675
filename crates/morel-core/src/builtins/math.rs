//! `Math` structure: transcendental functions over `real` (32-bit float).

use std::collections::HashMap;

use crate::{exception::RunResult, value::Value};

fn r(v: &Value) -> f32 {
    v.as_real().expect("Math operator applied to a non-real")
}

fn sqrt(a: &Value) -> RunResult<Value> {
    Ok(Value::real(r(a).sqrt()))
}
fn sin(a: &Value) -> RunResult<Value> {
    Ok(Value::real(r(a).sin()))
}
fn cos(a: &Value) -> RunResult<Value> {
    Ok(Value::real(r(a).cos()))
}
fn tan(a: &Value) -> RunResult<Value> {
    Ok(Value::real(r(a).tan()))
}
fn asin(a: &Value) -> RunResult<Value> {
    Ok(Value::real(r(a).asin()))
}
fn acos(a: &Value) -> RunResult<Value> {
    Ok(Value::real(r(a).acos()))
}
fn atan(a: &Value) -> RunResult<Value> {
    Ok(Value::real(r(a).atan()))
}
fn atan2(a: &Value, b: &Value) -> RunResult<Value> {
    Ok(Value::real(r(a).atan2(r(b))))
}
fn exp(a: &Value) -> RunResult<Value> {
    Ok(Value::real(r(a).exp()))
}
fn ln(a: &Value) -> RunResult<Value> {
    Ok(Value::real(r(a).ln()))
}
fn pow(a: &Value, b: &Value) -> RunResult<Value> {
    Ok(Value::real(r(a).powf(r(b))))
}

pub fn install(m: &mut HashMap<&'static str, Value>) {
    m.insert("Math.pi", Value::real(std::f32::consts::PI));
    m.insert("Math.e", Value::real(std::f32::consts::E));
    m.insert("Math.sqrt", Value::Applicable(super::unary1("Math.sqrt", sqrt)));
    m.insert("Math.sin", Value::Applicable(super::unary1("Math.sin", sin)));
    m.insert("Math.cos", Value::Applicable(super::unary1("Math.cos", cos)));
    m.insert("Math.tan", Value::Applicable(super::unary1("Math.tan", tan)));
    m.insert("Math.asin", Value::Applicable(super::unary1("Math.asin", asin)));
    m.insert("Math.acos", Value::Applicable(super::unary1("Math.acos", acos)));
    m.insert("Math.atan", Value::Applicable(super::unary1("Math.atan", atan)));
    m.insert("Math.atan2", Value::Applicable(super::binary2("Math.atan2", atan2)));
    m.insert("Math.exp", Value::Applicable(super::unary1("Math.exp", exp)));
    m.insert("Math.ln", Value::Applicable(super::unary1("Math.ln", ln)));
    m.insert("Math.pow", Value::Applicable(super::binary2("Math.pow", pow)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqrt_of_four_is_two() {
        assert_eq!(sqrt(&Value::real(4.0)).unwrap().as_real(), Some(2.0));
    }

    #[test]
    fn pow_matches_repeated_multiplication() {
        assert_eq!(pow(&Value::real(2.0), &Value::real(10.0)).unwrap().as_real(), Some(1024.0));
    }

    #[test]
    fn atan2_respects_quadrant() {
        let result = atan2(&Value::real(1.0), &Value::real(-1.0)).unwrap().as_real().unwrap();
        assert!((result - std::f32::consts::FRAC_PI_4 * 3.0).abs() < 1e-5);
    }
}
