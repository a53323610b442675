//! `ListPair` structure. The `*Eq` variants raise
//! `UnequalLengths` when their two lists differ in length; the plain
//! variants truncate to the shorter list per the basis library.

use std::collections::HashMap;

use crate::{exception::{BuiltInExn, RunError, RunResult}, value::Value};

fn items(v: &Value) -> &std::rc::Rc<Vec<Value>> {
    v.as_seq().expect("ListPair operator applied to a non-list")
}

fn zip(a: &Value, b: &Value) -> RunResult<Value> {
    let (xs, ys) = (items(a), items(b));
    let pairs = xs.iter().zip(ys.iter()).map(|(x, y)| Value::seq(vec![x.clone(), y.clone()])).collect();
    Ok(Value::seq(pairs))
}

fn zip_eq(a: &Value, b: &Value) -> RunResult<Value> {
    let (xs, ys) = (items(a), items(b));
    if xs.len() != ys.len() {
        return Err(RunError::new(BuiltInExn::UnequalLengths));
    }
    zip(a, b)
}

fn unzip(pairs: &Value) -> RunResult<Value> {
    let mut xs = Vec::with_capacity(items(pairs).len());
    let mut ys = Vec::with_capacity(items(pairs).len());
    for p in items(pairs).iter() {
        let fields = p.as_seq().expect("ListPair.unzip element must be a pair");
        xs.push(fields[0].clone());
        ys.push(fields[1].clone());
    }
    Ok(Value::seq(vec![Value::seq(xs), Value::seq(ys)]))
}

fn shorter_len(a: &Value, b: &Value) -> usize {
    items(a).len().min(items(b).len())
}

fn map(f: &Value, a: &Value, b: &Value) -> RunResult<Value> {
    let n = shorter_len(a, b);
    let (xs, ys) = (items(a), items(b));
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        out.push(super::call(f, &Value::seq(vec![xs[i].clone(), ys[i].clone()]))?);
    }
    Ok(Value::seq(out))
}

fn map_eq(f: &Value, a: &Value, b: &Value) -> RunResult<Value> {
    if items(a).len() != items(b).len() {
        return Err(RunError::new(BuiltInExn::UnequalLengths));
    }
    map(f, a, b)
}

fn app(f: &Value, a: &Value, b: &Value) -> RunResult<Value> {
    let n = shorter_len(a, b);
    let (xs, ys) = (items(a), items(b));
    for i in 0..n {
        super::call(f, &Value::seq(vec![xs[i].clone(), ys[i].clone()]))?;
    }
    Ok(Value::Unit)
}

fn app_eq(f: &Value, a: &Value, b: &Value) -> RunResult<Value> {
    if items(a).len() != items(b).len() {
        return Err(RunError::new(BuiltInExn::UnequalLengths));
    }
    app(f, a, b)
}

fn foldl(f: &Value, init: &Value, a: &Value, b: &Value) -> RunResult<Value> {
    let n = shorter_len(a, b);
    let (xs, ys) = (items(a), items(b));
    let mut acc = init.clone();
    for i in 0..n {
        acc = super::call(f, &Value::seq(vec![xs[i].clone(), ys[i].clone(), acc]))?;
    }
    Ok(acc)
}

fn foldr(f: &Value, init: &Value, a: &Value, b: &Value) -> RunResult<Value> {
    let n = shorter_len(a, b);
    let (xs, ys) = (items(a), items(b));
    let mut acc = init.clone();
    for i in (0..n).rev() {
        acc = super::call(f, &Value::seq(vec![xs[i].clone(), ys[i].clone(), acc]))?;
    }
    Ok(acc)
}

fn all(f: &Value, a: &Value, b: &Value) -> RunResult<Value> {
    let n = shorter_len(a, b);
    let (xs, ys) = (items(a), items(b));
    for i in 0..n {
        if !super::call(f, &Value::seq(vec![xs[i].clone(), ys[i].clone()]))?
            .as_bool()
            .expect("ListPair.all predicate must return a bool")
        {
            return Ok(Value::Bool(false));
        }
    }
    Ok(Value::Bool(true))
}

fn all_eq(f: &Value, a: &Value, b: &Value) -> RunResult<Value> {
    if items(a).len() != items(b).len() {
        return Err(RunError::new(BuiltInExn::UnequalLengths));
    }
    all(f, a, b)
}

fn exists(f: &Value, a: &Value, b: &Value) -> RunResult<Value> {
    let n = shorter_len(a, b);
    let (xs, ys) = (items(a), items(b));
    for i in 0..n {
        if super::call(f, &Value::seq(vec![xs[i].clone(), ys[i].clone()]))?
            .as_bool()
            .expect("ListPair.exists predicate must return a bool")
        {
            return Ok(Value::Bool(true));
        }
    }
    Ok(Value::Bool(false))
}

/// Wraps a three-argument function `(f, a, b)` as a curried `Applicable`.
/// `ListPair`'s higher-order operators are the only ones in this registry
/// whose arity is genuinely 3 *plain* arguments rather than a 2-ary one
/// plus an aggregate; reuse the shared curry-by-one-arg-at-a-time helper.
fn ternary(
    name: &'static str,
    func: fn(&Value, &Value, &Value) -> RunResult<Value>,
) -> std::rc::Rc<dyn crate::applicable::Applicable> {
    super::ternary3(name, func)
}

fn quaternary(
    name: &'static str,
    func: fn(&Value, &Value, &Value, &Value) -> RunResult<Value>,
) -> std::rc::Rc<dyn crate::applicable::Applicable> {
    use crate::applicable::Applicable4;
    struct Wrap<F> {
        name: &'static str,
        func: F,
    }
    impl<F: Fn(&Value, &Value, &Value, &Value) -> RunResult<Value>> Applicable4 for Wrap<F> {
        fn apply4(&self, a0: &Value, a1: &Value, a2: &Value, a3: &Value) -> RunResult<Value> {
            (self.func)(a0, a1, a2, a3)
        }
        fn describe(&self, d: &mut crate::describer::Describer) {
            d.start(self.name, |_d| {});
        }
    }
    super::curry_quaternary(name, std::rc::Rc::new(Wrap { name, func }))
}

pub fn install(m: &mut HashMap<&'static str, Value>) {
    m.insert("ListPair.zip", Value::Applicable(super::binary2("ListPair.zip", zip)));
    m.insert("ListPair.zipEq", Value::Applicable(super::binary2("ListPair.zipEq", zip_eq)));
    m.insert("ListPair.unzip", Value::Applicable(super::unary1("ListPair.unzip", unzip)));
    m.insert("ListPair.map", Value::Applicable(ternary("ListPair.map", map)));
    m.insert("ListPair.mapEq", Value::Applicable(ternary("ListPair.mapEq", map_eq)));
    m.insert("ListPair.app", Value::Applicable(ternary("ListPair.app", app)));
    m.insert("ListPair.appEq", Value::Applicable(ternary("ListPair.appEq", app_eq)));
    m.insert("ListPair.all", Value::Applicable(ternary("ListPair.all", all)));
    m.insert("ListPair.allEq", Value::Applicable(ternary("ListPair.allEq", all_eq)));
    m.insert("ListPair.exists", Value::Applicable(ternary("ListPair.exists", exists)));
    m.insert("ListPair.foldl", Value::Applicable(quaternary("ListPair.foldl", foldl)));
    m.insert("ListPair.foldr", Value::Applicable(quaternary("ListPair.foldr", foldr)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zip_truncates_to_shorter_list() {
        let a = Value::seq(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        let b = Value::seq(vec![Value::Int(10), Value::Int(20)]);
        let zipped = zip(&a, &b).unwrap();
        assert_eq!(zipped.as_seq().unwrap().len(), 2);
    }

    #[test]
    fn zip_eq_raises_on_mismatched_lengths() {
        let a = Value::seq(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        let b = Value::seq(vec![Value::Int(10), Value::Int(20)]);
        let err = zip_eq(&a, &b).unwrap_err();
        assert_eq!(err.kind, BuiltInExn::UnequalLengths);
    }

    #[test]
    fn unzip_splits_pairs_back_into_two_lists() {
        let pairs = Value::seq(vec![Value::seq(vec![Value::Int(1), Value::Int(2)])]);
        let result = unzip(&pairs).unwrap();
        let fields = result.as_seq().unwrap();
        assert_eq!(fields[0].as_seq().unwrap()[0].as_int(), Some(1));
        assert_eq!(fields[1].as_seq().unwrap()[0].as_int(), Some(2));
    }
}
