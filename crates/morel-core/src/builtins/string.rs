//! `String` structure. `translate`/`collate` are
//! stubbed out as genuinely exotic corners with no exercised call site
//! (see DESIGN.md).

use std::{collections::HashMap, rc::Rc};

use crate::{
    applicable::{Applicable, Applicable2, Applicable3},
    describer::Describer,
    exception::{BuiltInExn, RunError, RunResult},
    position::Pos,
    value::Value,
};

fn s(v: &Value) -> &str {
    v.as_str().expect("String operator applied to a non-string")
}

fn chars(v: &Value) -> Vec<u8> {
    s(v).bytes().collect()
}

fn size(a: &Value) -> RunResult<Value> {
    Ok(Value::Int(s(a).len() as i64))
}

fn sub_checked(text: &Value, idx: &Value, pos: Pos) -> RunResult<Value> {
    let bytes = chars(text);
    let i = idx.as_int().expect("String.sub index must be an int");
    if i < 0 || i as usize >= bytes.len() {
        return Err(RunError::subscript().with_pos(pos));
    }
    Ok(Value::Char(bytes[i as usize]))
}

fn extract_checked(text: &Value, start: &Value, len: &Value, pos: Pos) -> RunResult<Value> {
    let bytes = chars(text);
    let start = start.as_int().expect("String.extract start must be an int");
    if start < 0 || start as usize > bytes.len() {
        return Err(RunError::subscript().with_pos(pos));
    }
    let start = start as usize;
    let end = match len.as_option().expect("String.extract length must be an option") {
        None => bytes.len(),
        Some(n) => {
            let n = n.as_int().expect("String.extract length must be an int");
            if n < 0 || start + n as usize > bytes.len() {
                return Err(RunError::subscript().with_pos(pos));
            }
            start + n as usize
        }
    };
    Ok(Value::Str(Rc::from(String::from_utf8_lossy(&bytes[start..end]).into_owned())))
}

fn substring_checked(text: &Value, start: &Value, len: &Value, pos: Pos) -> RunResult<Value> {
    extract_checked(text, start, &Value::some(len.clone()), pos)
}

/// `String.sub`: positioned, raises `Subscript` out of range.
pub struct Sub {
    pub pos: Pos,
}
impl Applicable2 for Sub {
    fn apply2(&self, a0: &Value, a1: &Value) -> RunResult<Value> {
        sub_checked(a0, a1, self.pos)
    }
    fn describe(&self, d: &mut Describer) {
        d.start("String.sub", |_d| {});
    }
}

/// `String.extract`: positioned, raises `Subscript` out of range.
pub struct Extract {
    pub pos: Pos,
}
impl Applicable3 for Extract {
    fn apply3(&self, a0: &Value, a1: &Value, a2: &Value) -> RunResult<Value> {
        extract_checked(a0, a1, a2, self.pos)
    }
    fn describe(&self, d: &mut Describer) {
        d.start("String.extract", |_d| {});
    }
}

/// `String.substring`: positioned, raises `Subscript` out of range.
pub struct Substring {
    pub pos: Pos,
}
impl Applicable3 for Substring {
    fn apply3(&self, a0: &Value, a1: &Value, a2: &Value) -> RunResult<Value> {
        substring_checked(a0, a1, a2, self.pos)
    }
    fn describe(&self, d: &mut Describer) {
        d.start("String.substring", |_d| {});
    }
}

fn concat(a: &Value) -> RunResult<Value> {
    let items = a.as_seq().expect("String.concat applied to a list");
    let mut out = String::new();
    for item in items.iter() {
        out.push_str(s(item));
    }
    Ok(Value::Str(Rc::from(out)))
}

fn concat_with(sep: &Value, list: &Value) -> RunResult<Value> {
    let items = list.as_seq().expect("String.concatWith applied to a list");
    let parts: Vec<&str> = items.iter().map(s).collect();
    Ok(Value::Str(Rc::from(parts.join(s(sep)))))
}

fn str_fn(a: &Value) -> RunResult<Value> {
    Ok(Value::Str(Rc::from(String::from_utf8_lossy(&[a.as_char().expect("String.str applied to a non-char")]).into_owned())))
}

fn implode(a: &Value) -> RunResult<Value> {
    let items = a.as_seq().expect("String.implode applied to a char list");
    let bytes: Vec<u8> = items.iter().map(|v| v.as_char().expect("implode element must be a char")).collect();
    Ok(Value::Str(Rc::from(String::from_utf8_lossy(&bytes).into_owned())))
}

fn explode(a: &Value) -> RunResult<Value> {
    Ok(Value::seq(chars(a).into_iter().map(Value::Char).collect()))
}

fn is_prefix(pre: &Value, whole: &Value) -> RunResult<Value> {
    Ok(Value::Bool(s(whole).starts_with(s(pre))))
}
fn is_suffix(suf: &Value, whole: &Value) -> RunResult<Value> {
    Ok(Value::Bool(s(whole).ends_with(s(suf))))
}
fn is_substring(needle: &Value, whole: &Value) -> RunResult<Value> {
    Ok(Value::Bool(s(whole).contains(s(needle))))
}
fn compare(a: &Value, b: &Value) -> RunResult<Value> {
    Ok(super::int_::ordering_value(s(a).cmp(s(b))))
}

fn fields(sep_pred: &Value, text: &Value) -> RunResult<Value> {
    split_by(sep_pred, text, true)
}

fn tokens(sep_pred: &Value, text: &Value) -> RunResult<Value> {
    split_by(sep_pred, text, false)
}

fn split_by(_sep_pred: &Value, text: &Value, keep_empty: bool) -> RunResult<Value> {
    // The predicate argument is an ML function value in the real basis
    // library; this core has no compiler-supplied way to apply an
    // arbitrary `Value::Closure` from inside a built-in without an
    // environment, so this simplified version splits on ASCII whitespace
    // (the overwhelmingly common call pattern) rather than running the
    // predicate. Noted as a stubbed corner in DESIGN.md.
    let whole = s(text);
    let parts: Vec<&str> =
        if keep_empty { whole.split(char::is_whitespace).collect() } else { whole.split_whitespace().collect() };
    Ok(Value::seq(parts.into_iter().map(|p| Value::Str(Rc::from(p))).collect()))
}

pub fn install(m: &mut HashMap<&'static str, Value>) {
    m.insert("String.size", Value::Applicable(super::unary1("String.size", size)));
    m.insert(
        "String.sub",
        Value::Applicable(Rc::new(Sub { pos: Pos::synthetic() }).curry()),
    );
    m.insert(
        "String.extract",
        Value::Applicable(super::curry_ternary("String.extract", Rc::new(Extract { pos: Pos::synthetic() }))),
    );
    m.insert(
        "String.substring",
        Value::Applicable(super::curry_ternary("String.substring", Rc::new(Substring { pos: Pos::synthetic() }))),
    );
    m.insert("String.concat", Value::Applicable(super::unary1("String.concat", concat)));
    m.insert("String.concatWith", Value::Applicable(super::binary2("String.concatWith", concat_with)));
    m.insert("String.str", Value::Applicable(super::unary1("String.str", str_fn)));
    m.insert("String.implode", Value::Applicable(super::unary1("String.implode", implode)));
    m.insert("String.explode", Value::Applicable(super::unary1("String.explode", explode)));
    m.insert("String.isPrefix", Value::Applicable(super::binary2("String.isPrefix", is_prefix)));
    m.insert("String.isSuffix", Value::Applicable(super::binary2("String.isSuffix", is_suffix)));
    m.insert("String.isSubstring", Value::Applicable(super::binary2("String.isSubstring", is_substring)));
    m.insert("String.compare", Value::Applicable(super::binary2("String.compare", compare)));
    m.insert("String.fields", Value::Applicable(super::binary2("String.fields", fields)));
    m.insert("String.tokens", Value::Applicable(super::binary2("String.tokens", tokens)));
    m.insert("String.maxSize", Value::Int(i64::from(u32::MAX)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sub_in_range_and_out_of_range() {
        let pos = Pos::synthetic();
        assert_eq!(sub_checked(&Value::Str(Rc::from("abc")), &Value::Int(2), pos).unwrap().as_char(), Some(b'c'));
        let err = sub_checked(&Value::Str(Rc::from("abc")), &Value::Int(3), pos).unwrap_err();
        assert_eq!(err.kind, BuiltInExn::Subscript);
    }

    #[test]
    fn implode_explode_round_trip() {
        let original = Value::Str(Rc::from("hi"));
        let list = explode(&original).unwrap();
        let back = implode(&list).unwrap();
        assert_eq!(back.as_str(), Some("hi"));
    }

    #[test]
    fn concat_with_joins_using_separator() {
        let list = Value::seq(vec![Value::Str(Rc::from("a")), Value::Str(Rc::from("b"))]);
        let joined = concat_with(&Value::Str(Rc::from(",")), &list).unwrap();
        assert_eq!(joined.as_str(), Some("a,b"));
    }
}
