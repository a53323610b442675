//! `Bool` structure: `not`.

use std::collections::HashMap;

use crate::{exception::RunResult, value::Value};

fn not(a: &Value) -> RunResult<Value> {
    Ok(Value::Bool(!a.as_bool().expect("Bool.not applied to a bool")))
}

pub fn install(m: &mut HashMap<&'static str, Value>) {
    m.insert("Bool.not", Value::Applicable(super::unary1("Bool.not", not)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_flips_the_bool() {
        assert_eq!(not(&Value::Bool(true)).unwrap().as_bool(), Some(false));
    }
}
