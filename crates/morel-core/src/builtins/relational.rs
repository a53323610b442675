//! `Relational` structure: the small library of
//! collection-level operators `from` queries and `compute` clauses reach
//! for directly, as opposed to the [`crate::sink`] pipeline that drives
//! the query itself. `sum`/`count`/`max`/`min`/`only` double as the
//! aggregate functions [`crate::sink::group::Aggregate::function`] applies
//! to a bucket's rows.
//!
//! `max`/`min`/`compare` dispatch on the runtime shape of their argument
//! rather than a compile-time type (this registry has no macro-expansion
//! stage — see DESIGN.md); they cover the numeric/text/tuple shapes the
//! comparator builder (`comparator.rs`) also handles, but are not
//! memoized or cycle-safe since `Relational` only ever sees already
//! fully-evaluated values, never a recursive type descriptor.

use std::{cmp::Ordering, collections::HashMap, rc::Rc};

use crate::{
    applicable::Applicable,
    describer::Describer,
    exception::{BuiltInExn, RunError, RunResult},
    position::Pos,
    value::Value,
};

fn items(v: &Value) -> &Rc<Vec<Value>> {
    v.as_seq().expect("Relational operator applied to a non-sequence")
}

fn count(a: &Value) -> RunResult<Value> {
    Ok(Value::Int(items(a).len() as i64))
}

fn non_empty(a: &Value) -> RunResult<Value> {
    Ok(Value::Bool(!items(a).is_empty()))
}

fn exists(a: &Value) -> RunResult<Value> {
    Ok(Value::Bool(!items(a).is_empty()))
}

fn not_exists(a: &Value) -> RunResult<Value> {
    Ok(Value::Bool(items(a).is_empty()))
}

/// Dispatches on the element's own runtime shape, since this registry has
/// no compile-time type to macro-expand on.
fn value_cmp(a: &Value, b: &Value) -> RunResult<Ordering> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Ok(x.cmp(y)),
        (Value::Real(x), Value::Real(y)) => {
            if x.is_nan() || y.is_nan() {
                return Err(RunError::new(BuiltInExn::Unordered));
            }
            Ok(x.partial_cmp(y).expect("non-NaN f32 always compares"))
        }
        (Value::Char(x), Value::Char(y)) => Ok(x.cmp(y)),
        (Value::Str(x), Value::Str(y)) => Ok(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Ok(x.cmp(y)),
        (Value::Seq(x), Value::Seq(y)) => {
            for (u, v) in x.iter().zip(y.iter()) {
                match value_cmp(u, v)? {
                    Ordering::Equal => continue,
                    other => return Ok(other),
                }
            }
            Ok(x.len().cmp(&y.len()))
        }
        _ => panic!("Relational.compare applied to incomparable values"),
    }
}

fn sum(a: &Value) -> RunResult<Value> {
    let xs = items(a);
    if xs.iter().any(|v| matches!(v, Value::Real(_))) {
        let total: f32 = xs.iter().map(|v| v.as_real().expect("sum of a mixed int/real list")).sum();
        Ok(Value::real(total))
    } else {
        let total: i64 = xs.iter().map(|v| v.as_int().expect("Relational.sum applied to a non-numeric list")).sum();
        Ok(Value::Int(total))
    }
}

fn compare(a: &Value, b: &Value) -> RunResult<Value> {
    Ok(super::int_::ordering_value(value_cmp(a, b)?))
}

/// `only`: positioned, raises `Empty` on `[]` and `Size` on more than one
/// element.
pub struct Only {
    pub pos: Pos,
}
impl crate::applicable::Applicable1 for Only {
    fn apply1(&self, arg: &Value) -> RunResult<Value> {
        match items(arg).as_slice() {
            [] => Err(RunError::new(BuiltInExn::Empty).with_pos(self.pos)),
            [x] => Ok(x.clone()),
            _ => Err(RunError::new(BuiltInExn::Size).with_pos(self.pos)),
        }
    }
    fn describe(&self, d: &mut Describer) {
        d.start("Relational.only", |_d| {});
    }
}

/// `max`/`min`: positioned, raise `Empty` on `[]`.
pub struct Extreme {
    pub pos: Pos,
    pub want_max: bool,
}
impl crate::applicable::Applicable1 for Extreme {
    fn apply1(&self, arg: &Value) -> RunResult<Value> {
        let xs = items(arg);
        let mut it = xs.iter();
        let Some(first) = it.next() else {
            return Err(RunError::new(BuiltInExn::Empty).with_pos(self.pos));
        };
        let mut best = first.clone();
        for candidate in it {
            let ord = value_cmp(candidate, &best).map_err(|e| e.with_pos(self.pos))?;
            let replace = if self.want_max { ord == Ordering::Greater } else { ord == Ordering::Less };
            if replace {
                best = candidate.clone();
            }
        }
        Ok(best)
    }
    fn describe(&self, d: &mut Describer) {
        d.start(if self.want_max { "Relational.max" } else { "Relational.min" }, |_d| {});
    }
}

/// `iterate (initial, step)`: repeatedly calls `step (all, delta)` until
/// it returns `[]`, accumulating every non-empty result into `all` —
/// the fixpoint combinator recursive `from` queries compile into.
fn iterate(initial: &Value, step: &Value) -> RunResult<Value> {
    let mut all: Vec<Value> = items(initial).as_ref().clone();
    let mut delta = all.clone();
    loop {
        let arg = Value::seq(vec![Value::seq(all.clone()), Value::seq(delta.clone())]);
        let next = super::call(step, &arg)?;
        let next_items = items(&next);
        if next_items.is_empty() {
            break;
        }
        delta = next_items.as_ref().clone();
        all.extend(delta.iter().cloned());
    }
    Ok(Value::seq(all))
}

pub fn install(m: &mut HashMap<&'static str, Value>) {
    m.insert("Relational.count", Value::Applicable(super::unary1("Relational.count", count)));
    m.insert("Relational.sum", Value::Applicable(super::unary1("Relational.sum", sum)));
    m.insert("Relational.nonEmpty", Value::Applicable(super::unary1("Relational.nonEmpty", non_empty)));
    m.insert("Relational.exists", Value::Applicable(super::unary1("Relational.exists", exists)));
    m.insert("Relational.notExists", Value::Applicable(super::unary1("Relational.notExists", not_exists)));
    m.insert("Relational.compare", Value::Applicable(super::binary2("Relational.compare", compare)));
    m.insert("Relational.iterate", Value::Applicable(super::binary2("Relational.iterate", iterate)));
    m.insert("Relational.only", Value::Applicable(Rc::new(Only { pos: Pos::synthetic() })));
    m.insert("Relational.max", Value::Applicable(Rc::new(Extreme { pos: Pos::synthetic(), want_max: true })));
    m.insert("Relational.min", Value::Applicable(Rc::new(Extreme { pos: Pos::synthetic(), want_max: false })));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::applicable::Applicable1;

    fn ints(xs: &[i64]) -> Value {
        Value::seq(xs.iter().map(|&i| Value::Int(i)).collect())
    }

    #[test]
    fn sum_adds_ints() {
        assert_eq!(sum(&ints(&[1, 2, 3])).unwrap().as_int(), Some(6));
    }

    #[test]
    fn count_matches_length() {
        assert_eq!(count(&ints(&[1, 2, 3])).unwrap().as_int(), Some(3));
    }

    #[test]
    fn only_raises_empty_then_size() {
        let only = Only { pos: Pos::synthetic() };
        assert_eq!(only.apply1(&ints(&[])).unwrap_err().kind, BuiltInExn::Empty);
        assert_eq!(only.apply1(&ints(&[1, 2])).unwrap_err().kind, BuiltInExn::Size);
        assert_eq!(only.apply1(&ints(&[7])).unwrap().as_int(), Some(7));
    }

    #[test]
    fn max_and_min_over_ints() {
        let max = Extreme { pos: Pos::synthetic(), want_max: true };
        let min = Extreme { pos: Pos::synthetic(), want_max: false };
        assert_eq!(max.apply1(&ints(&[3, 1, 4, 1, 5])).unwrap().as_int(), Some(5));
        assert_eq!(min.apply1(&ints(&[3, 1, 4, 1, 5])).unwrap().as_int(), Some(1));
    }

    #[test]
    fn iterate_accumulates_until_fixpoint() {
        struct DoubleOnce;
        impl crate::applicable::Applicable2 for DoubleOnce {
            fn apply2(&self, all: &Value, delta: &Value) -> RunResult<Value> {
                let _ = all;
                let xs = items(delta);
                if xs.len() == 1 { Ok(Value::seq(vec![])) } else { Ok(Value::seq(vec![Value::Int(99)])) }
            }
            fn describe(&self, _d: &mut Describer) {}
        }
        use crate::applicable::Applicable2;
        let step = Value::Applicable(Rc::new(DoubleOnce).curry());
        let result = iterate(&ints(&[1, 2]), &step).unwrap();
        let xs = items(&result);
        assert_eq!(xs.len(), 3);
    }
}
