//! Pattern IR and the structural pattern binder.

use std::rc::Rc;

use crate::value::Value;

/// A literal pattern payload.
#[derive(Debug, Clone)]
pub enum Literal {
    Bool(bool),
    Char(u8),
    Str(Rc<str>),
    Int(i64),
    Real(f32),
}

/// A compiled pattern IR node.
#[derive(Debug, Clone)]
pub enum Pattern {
    Ident(Rc<str>),
    Wildcard,
    Literal(Literal),
    /// `name as inner`
    As(Rc<str>, Box<Pattern>),
    Tuple(Vec<Pattern>),
    Record(Vec<Pattern>),
    List(Vec<Pattern>),
    /// head-pat `::` tail-pat
    Cons(Box<Pattern>, Box<Pattern>),
    /// a zero-arity constructor, e.g. `NONE`, `NIL`
    ConstructorNullary(Rc<str>),
    /// a unary constructor, e.g. `SOME x`, `Cons (h, t)`
    ConstructorUnary(Rc<str>, Box<Pattern>),
}

/// Attempts to match `pat` against `arg`, invoking `consumer(name, value)`
/// for every name bound along the way. Returns `true` iff the whole
/// pattern matched.
///
/// On a `false` return, `consumer` may already have been invoked for a
/// successfully-matched prefix; those writes are speculative and callers
/// must discard them (the `MutableEvalEnv` callers
/// in `env.rs` rely on this: a failed `set_opt` leaves stale slots that
/// are never read because the row is dropped).
pub fn bind_recurse(pat: &Pattern, arg: &Value, consumer: &mut impl FnMut(&Pattern, &Value)) -> bool {
    match pat {
        Pattern::Ident(_) => {
            consumer(pat, arg);
            true
        }
        Pattern::Wildcard => true,
        Pattern::As(_, inner) => {
            consumer(pat, arg);
            bind_recurse(inner, arg, consumer)
        }
        Pattern::Literal(Literal::Bool(b)) => arg.as_bool() == Some(*b),
        Pattern::Literal(Literal::Char(c)) => arg.as_char() == Some(*c),
        Pattern::Literal(Literal::Str(s)) => arg.as_str() == Some(&**s),
        Pattern::Literal(Literal::Int(i)) => arg.as_int() == Some(*i),
        Pattern::Literal(Literal::Real(r)) => arg.as_real().is_some_and(|a| a == *r),
        Pattern::Tuple(pats) | Pattern::Record(pats) => {
            let Some(items) = arg.as_seq() else { return false };
            if items.len() != pats.len() {
                return false;
            }
            pats.iter().zip(items.iter()).all(|(p, v)| bind_recurse(p, v, consumer))
        }
        Pattern::List(pats) => {
            let Some(items) = arg.as_seq() else { return false };
            if items.len() != pats.len() {
                return false;
            }
            pats.iter().zip(items.iter()).all(|(p, v)| bind_recurse(p, v, consumer))
        }
        Pattern::Cons(head_pat, tail_pat) => {
            let Some(items) = arg.as_seq() else { return false };
            let Some((head, tail)) = items.split_first() else { return false };
            bind_recurse(head_pat, head, consumer) && bind_recurse(tail_pat, &Value::seq(tail.to_vec()), consumer)
        }
        Pattern::ConstructorNullary(tag) => {
            let Some(items) = arg.as_seq() else { return false };
            matches!(items.as_slice(), [Value::Str(t)] if &**t == &**tag)
        }
        Pattern::ConstructorUnary(tag, inner) => {
            let Some(items) = arg.as_seq() else { return false };
            match items.as_slice() {
                [Value::Str(t), payload] if &**t == &**tag => bind_recurse(inner, payload, consumer),
                _ => false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_always_matches() {
        let mut seen = Vec::new();
        assert!(bind_recurse(&Pattern::Wildcard, &Value::Int(5), &mut |_, _| seen.push(())));
        assert!(seen.is_empty());
    }

    #[test]
    fn ident_binds_and_matches() {
        let mut bound = None;
        let ok = bind_recurse(&Pattern::Ident(Rc::from("x")), &Value::Int(5), &mut |_, v| bound = Some(v.as_int()));
        assert!(ok);
        assert_eq!(bound, Some(Some(5)));
    }

    #[test]
    fn cons_destructures_head_and_tail() {
        let pat = Pattern::Cons(Box::new(Pattern::Ident(Rc::from("h"))), Box::new(Pattern::Ident(Rc::from("t"))));
        let list = Value::seq(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        let mut bindings = Vec::new();
        assert!(bind_recurse(&pat, &list, &mut |p, v| {
            if let Pattern::Ident(name) = p {
                bindings.push((name.to_string(), v.clone()));
            }
        }));
        assert_eq!(bindings[0].0, "h");
        assert_eq!(bindings[0].1.as_int(), Some(1));
        assert_eq!(bindings[1].0, "t");
        let tail = bindings[1].1.as_seq().unwrap();
        assert_eq!(tail.len(), 2);
    }

    #[test]
    fn cons_fails_on_empty_list() {
        let pat = Pattern::Cons(Box::new(Pattern::Wildcard), Box::new(Pattern::Wildcard));
        assert!(!bind_recurse(&pat, &Value::seq(vec![]), &mut |_, _| {}));
    }

    #[test]
    fn zero_arity_constructor_compares_tag() {
        let pat = Pattern::ConstructorNullary(Rc::from("NIL"));
        let nil = Value::seq(vec![Value::Str(Rc::from("NIL"))]);
        let cons = Value::seq(vec![Value::Str(Rc::from("CONS")), Value::Int(1)]);
        assert!(bind_recurse(&pat, &nil, &mut |_, _| {}));
        assert!(!bind_recurse(&pat, &cons, &mut |_, _| {}));
    }

    #[test]
    fn unary_constructor_matches_tag_then_payload() {
        let pat = Pattern::ConstructorUnary(Rc::from("SOME"), Box::new(Pattern::Literal(Literal::Int(3))));
        assert!(bind_recurse(&pat, &Value::some(Value::Int(3)), &mut |_, _| {}));
        assert!(!bind_recurse(&pat, &Value::some(Value::Int(4)), &mut |_, _| {}));
        assert!(!bind_recurse(&pat, &Value::none(), &mut |_, _| {}));
    }

    #[test]
    fn failed_match_still_invokes_consumer_for_matched_prefix() {
        let pat = Pattern::Tuple(vec![Pattern::Ident(Rc::from("a")), Pattern::Literal(Literal::Int(9))]);
        let arg = Value::seq(vec![Value::Int(1), Value::Int(2)]);
        let mut seen = Vec::new();
        let ok = bind_recurse(&pat, &arg, &mut |_, v| seen.push(v.clone()));
        assert!(!ok);
        assert_eq!(seen.len(), 1); // `a` bound speculatively before the literal sub-pattern failed
    }
}
