//! `Sys` structure: the session-surface built-ins
//! (`Sys.set`/`Sys.unset`/`Sys.show`/`Sys.plan`/`Sys.env`).
//!
//! Every other built-in in this registry is a free function over
//! [`Value`]s — `Sys`'s built-ins are the one place the evaluator's
//! built-in table needs access to mutable session state, so they are
//! small `Applicable` structs that close over an
//! `Rc<RefCell<Session>>` instead. The value model has no variant for an
//! opaque host handle (it only names the value shapes ML code can itself
//! construct and match), so the session is threaded to these built-ins
//! directly by [`super::registry_with_session`] rather than round-tripped
//! through an `EvalEnv` lookup.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::{
    applicable::{Applicable1, Applicable2},
    describer::Describer,
    exception::RunResult,
    session::{PropValue, Session},
    value::Value,
};

fn prop_to_value(p: &PropValue) -> Value {
    match p {
        PropValue::Int(i) => Value::Int(*i),
        PropValue::Bool(b) => Value::Bool(*b),
        PropValue::Str(s) => Value::Str(Rc::from(s.as_str())),
    }
}

fn value_to_prop(v: &Value) -> PropValue {
    match v {
        Value::Int(i) => PropValue::Int(*i),
        Value::Bool(b) => PropValue::Bool(*b),
        Value::Str(s) => PropValue::Str(s.to_string()),
        other => PropValue::Str(format!("{other:?}")),
    }
}

/// `Sys.set (key, value)`.
struct Set(Rc<RefCell<Session>>);
impl Applicable2 for Set {
    fn apply2(&self, key: &Value, value: &Value) -> RunResult<Value> {
        let key = key.as_str().expect("Sys.set key must be a string").to_owned();
        self.0.borrow_mut().set(key, value_to_prop(value));
        Ok(Value::Unit)
    }
    fn describe(&self, d: &mut Describer) {
        d.start("Sys.set", |_d| {});
    }
}

/// `Sys.unset key`.
struct Unset(Rc<RefCell<Session>>);
impl Applicable1 for Unset {
    fn apply1(&self, key: &Value) -> RunResult<Value> {
        let key = key.as_str().expect("Sys.unset key must be a string");
        self.0.borrow_mut().unset(key);
        Ok(Value::Unit)
    }
    fn describe(&self, d: &mut Describer) {
        d.start("Sys.unset", |_d| {});
    }
}

/// `Sys.get key`: `NONE` if unset.
struct Get(Rc<RefCell<Session>>);
impl Applicable1 for Get {
    fn apply1(&self, key: &Value) -> RunResult<Value> {
        let key = key.as_str().expect("Sys.get key must be a string");
        Ok(self.0.borrow().get(key).map_or_else(Value::none, |p| Value::some(prop_to_value(p))))
    }
    fn describe(&self, d: &mut Describer) {
        d.start("Sys.get", |_d| {});
    }
}

/// `Sys.show ()` / `Sys.env ()`: the whole property bag as `(string *
/// string) list`, in insertion order.
struct Show(Rc<RefCell<Session>>);
impl Applicable1 for Show {
    fn apply1(&self, _arg: &Value) -> RunResult<Value> {
        let rows = self
            .0
            .borrow()
            .show()
            .into_iter()
            .map(|(k, v)| Value::seq(vec![Value::Str(Rc::from(k)), Value::Str(Rc::from(format!("{v:?}")))]))
            .collect();
        Ok(Value::seq(rows))
    }
    fn describe(&self, d: &mut Describer) {
        d.start("Sys.show", |_d| {});
    }
}

/// `Sys.plan ()`: the most recently recorded plan rendering, or `""` if
/// none has been recorded yet this session.
struct Plan(Rc<RefCell<Session>>);
impl Applicable1 for Plan {
    fn apply1(&self, _arg: &Value) -> RunResult<Value> {
        Ok(Value::Str(Rc::from(self.0.borrow().previous_plan().unwrap_or(""))))
    }
    fn describe(&self, d: &mut Describer) {
        d.start("Sys.plan", |_d| {});
    }
}

/// Installs `Sys` on top of the session-independent registry. Kept
/// separate from [`super::registry`] (see [`super::registry_with_session`])
/// so call sites with no session at hand — unit tests, the comparator
/// builder — can build a plain registry without fabricating one.
pub fn install(m: &mut HashMap<&'static str, Value>, session: Rc<RefCell<Session>>) {
    m.insert("Sys.set", Value::Applicable(Rc::new(Set(session.clone())).curry()));
    m.insert("Sys.unset", Value::Applicable(Rc::new(Unset(session.clone()))));
    m.insert("Sys.get", Value::Applicable(Rc::new(Get(session.clone()))));
    m.insert("Sys.show", Value::Applicable(Rc::new(Show(session.clone()))));
    m.insert("Sys.env", Value::Applicable(Rc::new(Show(session.clone()))));
    m.insert("Sys.plan", Value::Applicable(Rc::new(Plan(session))));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_round_trips() {
        let session = Rc::new(RefCell::new(Session::new()));
        let set = Set(session.clone());
        let get = Get(session.clone());
        set.apply2(&Value::Str(Rc::from("lineWidth")), &Value::Int(100)).unwrap();
        let got = get.apply1(&Value::Str(Rc::from("lineWidth"))).unwrap();
        assert_eq!(got.as_option().unwrap().unwrap().as_int(), Some(100));
    }

    #[test]
    fn unset_removes_the_key() {
        let session = Rc::new(RefCell::new(Session::new()));
        let set = Set(session.clone());
        let unset = Unset(session.clone());
        let get = Get(session.clone());
        set.apply2(&Value::Str(Rc::from("hybrid")), &Value::Bool(true)).unwrap();
        unset.apply1(&Value::Str(Rc::from("hybrid"))).unwrap();
        assert!(matches!(get.apply1(&Value::Str(Rc::from("hybrid"))).unwrap().as_option(), Some(None)));
    }

    #[test]
    fn plan_is_empty_before_any_plan_is_recorded() {
        let session = Rc::new(RefCell::new(Session::new()));
        let plan = Plan(session);
        assert_eq!(plan.apply1(&Value::Unit).unwrap().as_str(), Some(""));
    }
}
