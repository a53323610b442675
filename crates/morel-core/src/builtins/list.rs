//! `List` structure. `collate` is omitted as an exotic
//! corner with no exercised call site (see DESIGN.md).

use std::{collections::HashMap, rc::Rc};

use crate::{
    applicable::Applicable,
    describer::Describer,
    exception::{BuiltInExn, RunError, RunResult},
    position::Pos,
    value::Value,
};

fn items(v: &Value) -> &Rc<Vec<Value>> {
    v.as_seq().expect("List operator applied to a non-list")
}

fn null(a: &Value) -> RunResult<Value> {
    Ok(Value::Bool(items(a).is_empty()))
}

fn length(a: &Value) -> RunResult<Value> {
    Ok(Value::Int(items(a).len() as i64))
}

/// `hd`: positioned, raises `Empty` on `[]`.
pub struct Hd {
    pub pos: Pos,
}
impl crate::applicable::Applicable1 for Hd {
    fn apply1(&self, arg: &Value) -> RunResult<Value> {
        items(arg).first().cloned().ok_or_else(|| RunError::new(BuiltInExn::Empty).with_pos(self.pos))
    }
    fn describe(&self, d: &mut Describer) {
        d.start("List.hd", |_d| {});
    }
}

/// `tl`: positioned, raises `Empty` on `[]`.
pub struct Tl {
    pub pos: Pos,
}
impl crate::applicable::Applicable1 for Tl {
    fn apply1(&self, arg: &Value) -> RunResult<Value> {
        let xs = items(arg);
        if xs.is_empty() {
            return Err(RunError::new(BuiltInExn::Empty).with_pos(self.pos));
        }
        Ok(Value::seq(xs[1..].to_vec()))
    }
    fn describe(&self, d: &mut Describer) {
        d.start("List.tl", |_d| {});
    }
}

/// `last`: positioned, raises `Empty` on `[]`.
pub struct Last {
    pub pos: Pos,
}
impl crate::applicable::Applicable1 for Last {
    fn apply1(&self, arg: &Value) -> RunResult<Value> {
        items(arg).last().cloned().ok_or_else(|| RunError::new(BuiltInExn::Empty).with_pos(self.pos))
    }
    fn describe(&self, d: &mut Describer) {
        d.start("List.last", |_d| {});
    }
}

/// `nth`: positioned, raises `Subscript` out of range.
pub struct Nth {
    pub pos: Pos,
}
impl crate::applicable::Applicable2 for Nth {
    fn apply2(&self, list: &Value, idx: &Value) -> RunResult<Value> {
        let xs = items(list);
        let i = idx.as_int().expect("List.nth index must be an int");
        if i < 0 || i as usize >= xs.len() {
            return Err(RunError::subscript().with_pos(self.pos));
        }
        Ok(xs[i as usize].clone())
    }
    fn describe(&self, d: &mut Describer) {
        d.start("List.nth", |_d| {});
    }
}

/// `take`: positioned, raises `Subscript` if `n` exceeds the list length.
pub struct Take {
    pub pos: Pos,
}
impl crate::applicable::Applicable2 for Take {
    fn apply2(&self, list: &Value, n: &Value) -> RunResult<Value> {
        let xs = items(list);
        let n = n.as_int().expect("List.take count must be an int");
        if n < 0 || n as usize > xs.len() {
            return Err(RunError::subscript().with_pos(self.pos));
        }
        Ok(Value::seq(xs[..n as usize].to_vec()))
    }
    fn describe(&self, d: &mut Describer) {
        d.start("List.take", |_d| {});
    }
}

/// `drop`: positioned, raises `Subscript` if `n` exceeds the list length.
pub struct Drop {
    pub pos: Pos,
}
impl crate::applicable::Applicable2 for Drop {
    fn apply2(&self, list: &Value, n: &Value) -> RunResult<Value> {
        let xs = items(list);
        let n = n.as_int().expect("List.drop count must be an int");
        if n < 0 || n as usize > xs.len() {
            return Err(RunError::subscript().with_pos(self.pos));
        }
        Ok(Value::seq(xs[n as usize..].to_vec()))
    }
    fn describe(&self, d: &mut Describer) {
        d.start("List.drop", |_d| {});
    }
}

fn rev(a: &Value) -> RunResult<Value> {
    let mut xs = items(a).as_ref().clone();
    xs.reverse();
    Ok(Value::seq(xs))
}

fn append(a: &Value, b: &Value) -> RunResult<Value> {
    let mut xs = items(a).as_ref().clone();
    xs.extend(items(b).iter().cloned());
    Ok(Value::seq(xs))
}

fn concat(a: &Value) -> RunResult<Value> {
    let lists = items(a);
    let mut out = Vec::new();
    for l in lists.iter() {
        out.extend(items(l).iter().cloned());
    }
    Ok(Value::seq(out))
}

fn rev_append(a: &Value, b: &Value) -> RunResult<Value> {
    let mut xs = items(a).as_ref().clone();
    xs.reverse();
    xs.extend(items(b).iter().cloned());
    Ok(Value::seq(xs))
}

fn app(f: &Value, list: &Value) -> RunResult<Value> {
    for x in items(list).iter() {
        super::call(f, x)?;
    }
    Ok(Value::Unit)
}

fn map(f: &Value, list: &Value) -> RunResult<Value> {
    let mut out = Vec::with_capacity(items(list).len());
    for x in items(list).iter() {
        out.push(super::call(f, x)?);
    }
    Ok(Value::seq(out))
}

fn map_partial(f: &Value, list: &Value) -> RunResult<Value> {
    let mut out = Vec::new();
    for x in items(list).iter() {
        if let Some(inner) = super::call(f, x)?.as_option().expect("List.mapPartial function must return an option") {
            out.push(inner.clone());
        }
    }
    Ok(Value::seq(out))
}

fn find(f: &Value, list: &Value) -> RunResult<Value> {
    for x in items(list).iter() {
        if super::call(f, x)?.as_bool().expect("List.find predicate must return a bool") {
            return Ok(Value::some(x.clone()));
        }
    }
    Ok(Value::none())
}

fn filter(f: &Value, list: &Value) -> RunResult<Value> {
    let mut out = Vec::new();
    for x in items(list).iter() {
        if super::call(f, x)?.as_bool().expect("List.filter predicate must return a bool") {
            out.push(x.clone());
        }
    }
    Ok(Value::seq(out))
}

fn partition(f: &Value, list: &Value) -> RunResult<Value> {
    let mut yes = Vec::new();
    let mut no = Vec::new();
    for x in items(list).iter() {
        if super::call(f, x)?.as_bool().expect("List.partition predicate must return a bool") {
            yes.push(x.clone());
        } else {
            no.push(x.clone());
        }
    }
    Ok(Value::seq(vec![Value::seq(yes), Value::seq(no)]))
}

fn foldl(f: &Value, init: &Value, list: &Value) -> RunResult<Value> {
    let mut acc = init.clone();
    for x in items(list).iter() {
        acc = super::call(f, &Value::seq(vec![x.clone(), acc]))?;
    }
    Ok(acc)
}

fn foldr(f: &Value, init: &Value, list: &Value) -> RunResult<Value> {
    let mut acc = init.clone();
    for x in items(list).iter().rev() {
        acc = super::call(f, &Value::seq(vec![x.clone(), acc]))?;
    }
    Ok(acc)
}

fn exists(f: &Value, list: &Value) -> RunResult<Value> {
    for x in items(list).iter() {
        if super::call(f, x)?.as_bool().expect("List.exists predicate must return a bool") {
            return Ok(Value::Bool(true));
        }
    }
    Ok(Value::Bool(false))
}

fn all(f: &Value, list: &Value) -> RunResult<Value> {
    for x in items(list).iter() {
        if !super::call(f, x)?.as_bool().expect("List.all predicate must return a bool") {
            return Ok(Value::Bool(false));
        }
    }
    Ok(Value::Bool(true))
}

/// `tabulate`: positioned, raises `Size` for a negative count.
fn tabulate_checked(n: &Value, f: &Value, pos: Pos) -> RunResult<Value> {
    let n = n.as_int().expect("List.tabulate count must be an int");
    if n < 0 {
        return Err(RunError::new(BuiltInExn::Size).with_pos(pos));
    }
    let mut out = Vec::with_capacity(n as usize);
    for i in 0..n {
        out.push(super::call(f, &Value::Int(i))?);
    }
    Ok(Value::seq(out))
}

pub struct TabulatePositioned {
    pub pos: Pos,
}
impl crate::applicable::Applicable2 for TabulatePositioned {
    fn apply2(&self, n: &Value, f: &Value) -> RunResult<Value> {
        tabulate_checked(n, f, self.pos)
    }
    fn describe(&self, d: &mut Describer) {
        d.start("List.tabulate", |_d| {});
    }
}

pub fn install(m: &mut HashMap<&'static str, Value>) {
    m.insert("List.null", Value::Applicable(super::unary1("List.null", null)));
    m.insert("List.length", Value::Applicable(super::unary1("List.length", length)));
    m.insert("List.hd", Value::Applicable(Rc::new(Hd { pos: Pos::synthetic() })));
    m.insert("List.tl", Value::Applicable(Rc::new(Tl { pos: Pos::synthetic() })));
    m.insert("List.last", Value::Applicable(Rc::new(Last { pos: Pos::synthetic() })));
    m.insert("List.nth", Value::Applicable(Rc::new(Nth { pos: Pos::synthetic() }).curry()));
    m.insert("List.take", Value::Applicable(Rc::new(Take { pos: Pos::synthetic() }).curry()));
    m.insert("List.drop", Value::Applicable(Rc::new(Drop { pos: Pos::synthetic() }).curry()));
    m.insert("List.rev", Value::Applicable(super::unary1("List.rev", rev)));
    m.insert("List.@", Value::Applicable(super::binary2("List.@", append)));
    m.insert("List.concat", Value::Applicable(super::unary1("List.concat", concat)));
    m.insert("List.revAppend", Value::Applicable(super::binary2("List.revAppend", rev_append)));
    m.insert("List.app", Value::Applicable(super::binary2("List.app", app)));
    m.insert("List.map", Value::Applicable(super::binary2("List.map", map)));
    m.insert("List.mapPartial", Value::Applicable(super::binary2("List.mapPartial", map_partial)));
    m.insert("List.find", Value::Applicable(super::binary2("List.find", find)));
    m.insert("List.filter", Value::Applicable(super::binary2("List.filter", filter)));
    m.insert("List.partition", Value::Applicable(super::binary2("List.partition", partition)));
    m.insert("List.foldl", Value::Applicable(super::ternary3("List.foldl", foldl)));
    m.insert("List.foldr", Value::Applicable(super::ternary3("List.foldr", foldr)));
    m.insert("List.exists", Value::Applicable(super::binary2("List.exists", exists)));
    m.insert("List.all", Value::Applicable(super::binary2("List.all", all)));
    m.insert("List.tabulate", Value::Applicable(Rc::new(TabulatePositioned { pos: Pos::synthetic() }).curry()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hd_and_tl_on_empty_raise_empty() {
        let empty = Value::seq(vec![]);
        assert_eq!(Hd { pos: Pos::synthetic() }.apply1(&empty).unwrap_err().kind, BuiltInExn::Empty);
        assert_eq!(Tl { pos: Pos::synthetic() }.apply1(&empty).unwrap_err().kind, BuiltInExn::Empty);
    }

    #[test]
    fn nth_out_of_range_raises_subscript() {
        let list = Value::seq(vec![Value::Int(1), Value::Int(2)]);
        let err = Nth { pos: Pos::synthetic() }.apply2(&list, &Value::Int(5)).unwrap_err();
        assert_eq!(err.kind, BuiltInExn::Subscript);
    }

    #[test]
    fn foldl_accumulates_left_to_right() {
        struct Add;
        impl crate::applicable::Applicable1 for Add {
            fn apply1(&self, arg: &Value) -> RunResult<Value> {
                let pair = arg.as_seq().unwrap();
                Ok(Value::Int(pair[0].as_int().unwrap() + pair[1].as_int().unwrap()))
            }
            fn describe(&self, _d: &mut Describer) {}
        }
        let list = Value::seq(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        let result = foldl(&Value::Applicable(Rc::new(Add)), &Value::Int(0), &list).unwrap();
        assert_eq!(result.as_int(), Some(6));
    }

    #[test]
    fn tabulate_builds_n_elements() {
        struct Square;
        impl crate::applicable::Applicable1 for Square {
            fn apply1(&self, arg: &Value) -> RunResult<Value> {
                let n = arg.as_int().unwrap();
                Ok(Value::Int(n * n))
            }
            fn describe(&self, _d: &mut Describer) {}
        }
        let result = tabulate_checked(&Value::Int(4), &Value::Applicable(Rc::new(Square)), Pos::synthetic()).unwrap();
        let xs = result.as_seq().unwrap();
        assert_eq!(xs.iter().map(|v| v.as_int().unwrap()).collect::<Vec<_>>(), vec![0, 1, 4, 9]);
    }
}
