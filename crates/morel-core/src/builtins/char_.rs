//! `Char` structure: an 8-bit character.

use std::collections::HashMap;

use crate::{
    applicable::{Applicable1, Positioned},
    describer::Describer,
    exception::{BuiltInExn, RunError, RunResult},
    position::Pos,
    value::Value,
};

fn c(v: &Value) -> u8 {
    v.as_char().expect("Char operator applied to a non-char")
}

fn ord(a: &Value) -> RunResult<Value> {
    Ok(Value::Int(i64::from(c(a))))
}

/// `chr`: positioned, raises `Chr` outside `[0, 255]`.
pub struct Chr {
    pub pos: Pos,
}

impl crate::applicable::Applicable1 for Chr {
    fn apply1(&self, arg: &Value) -> RunResult<Value> {
        let n = arg.as_int().expect("Char.chr applied to a non-int");
        if !(0..=255).contains(&n) {
            return Err(RunError::new(BuiltInExn::Chr).with_pos(self.pos));
        }
        Ok(Value::Char(n as u8))
    }

    fn describe(&self, d: &mut Describer) {
        d.start("Char.chr", |_d| {});
    }
}

pub struct ChrTemplate;
impl Positioned for ChrTemplate {
    fn with_pos(&self, pos: Pos) -> std::rc::Rc<dyn crate::applicable::Applicable> {
        std::rc::Rc::new(Chr { pos })
    }
}

/// `pred`: raises `Chr` on the minimum character.
pub struct Pred {
    pub pos: Pos,
}
impl crate::applicable::Applicable1 for Pred {
    fn apply1(&self, arg: &Value) -> RunResult<Value> {
        let n = c(arg);
        n.checked_sub(1).map(Value::Char).ok_or_else(|| RunError::new(BuiltInExn::Chr).with_pos(self.pos))
    }
    fn describe(&self, d: &mut Describer) {
        d.start("Char.pred", |_d| {});
    }
}

/// `succ`: raises `Chr` on the maximum character.
pub struct Succ {
    pub pos: Pos,
}
impl crate::applicable::Applicable1 for Succ {
    fn apply1(&self, arg: &Value) -> RunResult<Value> {
        let n = c(arg);
        n.checked_add(1).map(Value::Char).ok_or_else(|| RunError::new(BuiltInExn::Chr).with_pos(self.pos))
    }
    fn describe(&self, d: &mut Describer) {
        d.start("Char.succ", |_d| {});
    }
}

fn is_alpha(a: &Value) -> RunResult<Value> {
    Ok(Value::Bool((c(a) as char).is_ascii_alphabetic()))
}
fn is_digit(a: &Value) -> RunResult<Value> {
    Ok(Value::Bool((c(a) as char).is_ascii_digit()))
}
fn is_space(a: &Value) -> RunResult<Value> {
    Ok(Value::Bool((c(a) as char).is_ascii_whitespace()))
}
fn is_upper(a: &Value) -> RunResult<Value> {
    Ok(Value::Bool((c(a) as char).is_ascii_uppercase()))
}
fn is_lower(a: &Value) -> RunResult<Value> {
    Ok(Value::Bool((c(a) as char).is_ascii_lowercase()))
}
fn to_upper(a: &Value) -> RunResult<Value> {
    Ok(Value::Char(c(a).to_ascii_uppercase()))
}
fn to_lower(a: &Value) -> RunResult<Value> {
    Ok(Value::Char(c(a).to_ascii_lowercase()))
}
fn compare(a: &Value, b: &Value) -> RunResult<Value> {
    Ok(super::int_::ordering_value(c(a).cmp(&c(b))))
}

pub fn install(m: &mut HashMap<&'static str, Value>) {
    m.insert("Char.ord", Value::Applicable(super::unary1("Char.ord", ord)));
    m.insert("Char.chr", Value::Applicable(std::rc::Rc::new(Chr { pos: Pos::synthetic() })));
    m.insert("Char.pred", Value::Applicable(std::rc::Rc::new(Pred { pos: Pos::synthetic() })));
    m.insert("Char.succ", Value::Applicable(std::rc::Rc::new(Succ { pos: Pos::synthetic() })));
    m.insert("Char.isAlpha", Value::Applicable(super::unary1("Char.isAlpha", is_alpha)));
    m.insert("Char.isDigit", Value::Applicable(super::unary1("Char.isDigit", is_digit)));
    m.insert("Char.isSpace", Value::Applicable(super::unary1("Char.isSpace", is_space)));
    m.insert("Char.isUpper", Value::Applicable(super::unary1("Char.isUpper", is_upper)));
    m.insert("Char.isLower", Value::Applicable(super::unary1("Char.isLower", is_lower)));
    m.insert("Char.toUpper", Value::Applicable(super::unary1("Char.toUpper", to_upper)));
    m.insert("Char.toLower", Value::Applicable(super::unary1("Char.toLower", to_lower)));
    m.insert("Char.compare", Value::Applicable(super::binary2("Char.compare", compare)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chr_boundaries() {
        assert_eq!(Chr { pos: Pos::synthetic() }.apply1(&Value::Int(0)).unwrap().as_char(), Some(0));
        assert_eq!(Chr { pos: Pos::synthetic() }.apply1(&Value::Int(255)).unwrap().as_char(), Some(255));
        let err = Chr { pos: Pos::synthetic() }.apply1(&Value::Int(256)).unwrap_err();
        assert_eq!(err.kind, BuiltInExn::Chr);
    }

    #[test]
    fn pred_on_minimum_raises_chr() {
        let err = Pred { pos: Pos::synthetic() }.apply1(&Value::Char(0)).unwrap_err();
        assert_eq!(err.kind, BuiltInExn::Chr);
    }
}
