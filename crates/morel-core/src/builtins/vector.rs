//! `Vector` structure. Vectors share `List`'s `Seq`
//! representation in this data model; the distinct structure
//! exists only so call sites that need fixed-size, index-oriented access
//! get `Subscript`-raising positioned operators instead of `List`'s.

use std::{collections::HashMap, rc::Rc};

use crate::{
    applicable::{Applicable, Applicable3},
    describer::Describer,
    exception::{BuiltInExn, RunError, RunResult},
    position::Pos,
    value::Value,
};

fn items(v: &Value) -> &Rc<Vec<Value>> {
    v.as_seq().expect("Vector operator applied to a non-vector")
}

fn from_list(a: &Value) -> RunResult<Value> {
    Ok(a.clone())
}

fn length(a: &Value) -> RunResult<Value> {
    Ok(Value::Int(items(a).len() as i64))
}

/// `tabulate`: positioned, raises `Size` for a negative count.
pub struct Tabulate {
    pub pos: Pos,
}
impl crate::applicable::Applicable2 for Tabulate {
    fn apply2(&self, n: &Value, f: &Value) -> RunResult<Value> {
        let n = n.as_int().expect("Vector.tabulate count must be an int");
        if n < 0 {
            return Err(RunError::new(BuiltInExn::Size).with_pos(self.pos));
        }
        let mut out = Vec::with_capacity(n as usize);
        for i in 0..n {
            out.push(super::call(f, &Value::Int(i))?);
        }
        Ok(Value::seq(out))
    }
    fn describe(&self, d: &mut Describer) {
        d.start("Vector.tabulate", |_d| {});
    }
}

/// `sub`: positioned, raises `Subscript` out of range.
pub struct Sub {
    pub pos: Pos,
}
impl crate::applicable::Applicable2 for Sub {
    fn apply2(&self, vec: &Value, idx: &Value) -> RunResult<Value> {
        let xs = items(vec);
        let i = idx.as_int().expect("Vector.sub index must be an int");
        if i < 0 || i as usize >= xs.len() {
            return Err(RunError::subscript().with_pos(self.pos));
        }
        Ok(xs[i as usize].clone())
    }
    fn describe(&self, d: &mut Describer) {
        d.start("Vector.sub", |_d| {});
    }
}

/// `update`: positioned, raises `Subscript` out of range.
pub struct Update {
    pub pos: Pos,
}
impl Applicable3 for Update {
    fn apply3(&self, vec: &Value, idx: &Value, value: &Value) -> RunResult<Value> {
        let xs = items(vec);
        let i = idx.as_int().expect("Vector.update index must be an int");
        if i < 0 || i as usize >= xs.len() {
            return Err(RunError::subscript().with_pos(self.pos));
        }
        let mut out = xs.as_ref().clone();
        out[i as usize] = value.clone();
        Ok(Value::seq(out))
    }
    fn describe(&self, d: &mut Describer) {
        d.start("Vector.update", |_d| {});
    }
}

fn app(f: &Value, vec: &Value) -> RunResult<Value> {
    for x in items(vec).iter() {
        super::call(f, x)?;
    }
    Ok(Value::Unit)
}

fn map(f: &Value, vec: &Value) -> RunResult<Value> {
    let mut out = Vec::with_capacity(items(vec).len());
    for x in items(vec).iter() {
        out.push(super::call(f, x)?);
    }
    Ok(Value::seq(out))
}

fn foldl(f: &Value, init: &Value, vec: &Value) -> RunResult<Value> {
    let mut acc = init.clone();
    for x in items(vec).iter() {
        acc = super::call(f, &Value::seq(vec![x.clone(), acc]))?;
    }
    Ok(acc)
}

fn foldr(f: &Value, init: &Value, vec: &Value) -> RunResult<Value> {
    let mut acc = init.clone();
    for x in items(vec).iter().rev() {
        acc = super::call(f, &Value::seq(vec![x.clone(), acc]))?;
    }
    Ok(acc)
}

fn appi(f: &Value, vec: &Value) -> RunResult<Value> {
    for (i, x) in items(vec).iter().enumerate() {
        super::call(f, &Value::seq(vec![Value::Int(i as i64), x.clone()]))?;
    }
    Ok(Value::Unit)
}

fn mapi(f: &Value, vec: &Value) -> RunResult<Value> {
    let mut out = Vec::with_capacity(items(vec).len());
    for (i, x) in items(vec).iter().enumerate() {
        out.push(super::call(f, &Value::seq(vec![Value::Int(i as i64), x.clone()]))?);
    }
    Ok(Value::seq(out))
}

pub fn install(m: &mut HashMap<&'static str, Value>) {
    m.insert("Vector.fromList", Value::Applicable(super::unary1("Vector.fromList", from_list)));
    m.insert("Vector.length", Value::Applicable(super::unary1("Vector.length", length)));
    m.insert("Vector.tabulate", Value::Applicable(Rc::new(Tabulate { pos: Pos::synthetic() }).curry()));
    m.insert("Vector.sub", Value::Applicable(Rc::new(Sub { pos: Pos::synthetic() }).curry()));
    m.insert("Vector.update", Value::Applicable(super::curry_ternary("Vector.update", Rc::new(Update { pos: Pos::synthetic() }))));
    m.insert("Vector.app", Value::Applicable(super::binary2("Vector.app", app)));
    m.insert("Vector.map", Value::Applicable(super::binary2("Vector.map", map)));
    m.insert("Vector.foldl", Value::Applicable(super::ternary3("Vector.foldl", foldl)));
    m.insert("Vector.foldr", Value::Applicable(super::ternary3("Vector.foldr", foldr)));
    m.insert("Vector.appi", Value::Applicable(super::binary2("Vector.appi", appi)));
    m.insert("Vector.mapi", Value::Applicable(super::binary2("Vector.mapi", mapi)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_out_of_range_raises_subscript() {
        let vec = Value::seq(vec![Value::Int(1), Value::Int(2)]);
        let err = Update { pos: Pos::synthetic() }.apply3(&vec, &Value::Int(9), &Value::Int(0)).unwrap_err();
        assert_eq!(err.kind, BuiltInExn::Subscript);
    }

    #[test]
    fn update_leaves_original_untouched() {
        let vec = Value::seq(vec![Value::Int(1), Value::Int(2)]);
        let updated = Update { pos: Pos::synthetic() }.apply3(&vec, &Value::Int(0), &Value::Int(9)).unwrap();
        assert_eq!(items(&vec)[0].as_int(), Some(1));
        assert_eq!(items(&updated)[0].as_int(), Some(9));
    }
}
