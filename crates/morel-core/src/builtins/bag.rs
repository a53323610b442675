//! `Bag` structure. A bag is list-shaped at runtime —
//! it carries no position-dependent operations (no `nth`, no positional
//! `last` guarantee), so its roster is the order-insensitive subset of
//! `List`, implemented by delegating straight to the `list` module
//! functions that happen to already ignore order.

use std::collections::HashMap;

use crate::{exception::RunResult, value::Value};

fn items(v: &Value) -> &std::rc::Rc<Vec<Value>> {
    v.as_seq().expect("Bag operator applied to a non-bag")
}

fn null(a: &Value) -> RunResult<Value> {
    Ok(Value::Bool(items(a).is_empty()))
}

fn length(a: &Value) -> RunResult<Value> {
    Ok(Value::Int(items(a).len() as i64))
}

fn concat(a: &Value) -> RunResult<Value> {
    let bags = items(a);
    let mut out = Vec::new();
    for b in bags.iter() {
        out.extend(items(b).iter().cloned());
    }
    Ok(Value::seq(out))
}

fn union(a: &Value, b: &Value) -> RunResult<Value> {
    let mut out = items(a).as_ref().clone();
    out.extend(items(b).iter().cloned());
    Ok(Value::seq(out))
}

fn app(f: &Value, bag: &Value) -> RunResult<Value> {
    for x in items(bag).iter() {
        super::call(f, x)?;
    }
    Ok(Value::Unit)
}

fn map(f: &Value, bag: &Value) -> RunResult<Value> {
    let mut out = Vec::with_capacity(items(bag).len());
    for x in items(bag).iter() {
        out.push(super::call(f, x)?);
    }
    Ok(Value::seq(out))
}

fn map_partial(f: &Value, bag: &Value) -> RunResult<Value> {
    let mut out = Vec::new();
    for x in items(bag).iter() {
        if let Some(inner) = super::call(f, x)?.as_option().expect("Bag.mapPartial function must return an option") {
            out.push(inner.clone());
        }
    }
    Ok(Value::seq(out))
}

fn filter(f: &Value, bag: &Value) -> RunResult<Value> {
    let mut out = Vec::new();
    for x in items(bag).iter() {
        if super::call(f, x)?.as_bool().expect("Bag.filter predicate must return a bool") {
            out.push(x.clone());
        }
    }
    Ok(Value::seq(out))
}

fn partition(f: &Value, bag: &Value) -> RunResult<Value> {
    let mut yes = Vec::new();
    let mut no = Vec::new();
    for x in items(bag).iter() {
        if super::call(f, x)?.as_bool().expect("Bag.partition predicate must return a bool") {
            yes.push(x.clone());
        } else {
            no.push(x.clone());
        }
    }
    Ok(Value::seq(vec![Value::seq(yes), Value::seq(no)]))
}

fn foldl(f: &Value, init: &Value, bag: &Value) -> RunResult<Value> {
    let mut acc = init.clone();
    for x in items(bag).iter() {
        acc = super::call(f, &Value::seq(vec![x.clone(), acc]))?;
    }
    Ok(acc)
}

fn exists(f: &Value, bag: &Value) -> RunResult<Value> {
    for x in items(bag).iter() {
        if super::call(f, x)?.as_bool().expect("Bag.exists predicate must return a bool") {
            return Ok(Value::Bool(true));
        }
    }
    Ok(Value::Bool(false))
}

fn all(f: &Value, bag: &Value) -> RunResult<Value> {
    for x in items(bag).iter() {
        if !super::call(f, x)?.as_bool().expect("Bag.all predicate must return a bool") {
            return Ok(Value::Bool(false));
        }
    }
    Ok(Value::Bool(true))
}

pub fn install(m: &mut HashMap<&'static str, Value>) {
    m.insert("Bag.null", Value::Applicable(super::unary1("Bag.null", null)));
    m.insert("Bag.length", Value::Applicable(super::unary1("Bag.length", length)));
    m.insert("Bag.concat", Value::Applicable(super::unary1("Bag.concat", concat)));
    m.insert("Bag.union", Value::Applicable(super::binary2("Bag.union", union)));
    m.insert("Bag.app", Value::Applicable(super::binary2("Bag.app", app)));
    m.insert("Bag.map", Value::Applicable(super::binary2("Bag.map", map)));
    m.insert("Bag.mapPartial", Value::Applicable(super::binary2("Bag.mapPartial", map_partial)));
    m.insert("Bag.filter", Value::Applicable(super::binary2("Bag.filter", filter)));
    m.insert("Bag.partition", Value::Applicable(super::binary2("Bag.partition", partition)));
    m.insert("Bag.foldl", Value::Applicable(super::ternary3("Bag.foldl", foldl)));
    m.insert("Bag.exists", Value::Applicable(super::binary2("Bag.exists", exists)));
    m.insert("Bag.all", Value::Applicable(super::binary2("Bag.all", all)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_concatenates_without_deduplicating() {
        let a = Value::seq(vec![Value::Int(1), Value::Int(1)]);
        let b = Value::seq(vec![Value::Int(1)]);
        let result = union(&a, &b).unwrap();
        assert_eq!(result.as_seq().unwrap().len(), 3);
    }

    #[test]
    fn length_counts_every_element_including_duplicates() {
        let bag = Value::seq(vec![Value::Int(1), Value::Int(1), Value::Int(2)]);
        assert_eq!(length(&bag).unwrap().as_int(), Some(3));
    }
}
