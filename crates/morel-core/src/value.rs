//! The universal runtime value.
//!
//! Every Morel value — whether it is a tuple, a record, a list, a bag, a
//! vector, an option, or a datatype constructor instance — is represented
//! uniformly as an ordered [`Seq`] of values. The record's field order and
//! the constructor's tag position are conventions enforced by the compiler
//! that produced the `Code`, not by this type.
//!
//! There is no heap arena here: sequences are reference-counted (`Rc`) so
//! that cloning a row into a group bucket or a sort buffer is O(1), but
//! there is no generational GC or manual drop bookkeeping. The evaluator
//! does not allocate arenas (spec Non-goal); ordinary `Rc` is enough
//! because Morel values form no reference cycles (closures capture
//! environments, environments never point back at the values that close
//! over them in a way that matters for drop order).

use std::{fmt, rc::Rc};

use crate::{applicable::Applicable, closure::Closure};

/// A single Morel runtime value.
///
/// `Clone` is cheap: immediates copy, `Seq`/`Str` bump a refcount, and
/// `Closure`/`Applicable` are themselves `Rc`-backed.
#[derive(Clone)]
pub enum Value {
    Bool(bool),
    Int(i64),
    /// ML reals are 32-bit floats. `0.0 / 0.0` is canonicalized to the
    /// positive-sign NaN bit pattern on construction; see [`Value::real`].
    Real(f32),
    /// An 8-bit character.
    Char(u8),
    Str(Rc<str>),
    /// The single value of type `unit`, written `()`. Represented as a
    /// zero-length sequence so that "unit is the empty tuple" falls out
    /// of the data model rather than needing a special case.
    Unit,
    /// Tuples, records, lists, bags, vectors, option values, and
    /// constructor instances are all ordered sequences; see the module
    /// doc comment.
    Seq(Rc<Vec<Value>>),
    Closure(Rc<Closure>),
    Applicable(Rc<dyn Applicable>),
}

impl Value {
    pub const NONE_TAG: &'static str = "NONE";
    pub const SOME_TAG: &'static str = "SOME";
    pub const DESC_TAG: &'static str = "DESC";

    /// Builds a real, canonicalizing `0.0 / 0.0` (and any other NaN
    /// produced by arithmetic) to the positive-sign bit pattern. Use
    /// [`Value::real_raw`] to construct `~nan`, the distinguished
    /// negative-sign NaN literal.
    #[must_use]
    pub fn real(r: f32) -> Self {
        if r.is_nan() { Self::Real(f32::NAN) } else { Self::Real(r) }
    }

    /// Builds a real without canonicalizing NaN. Used for the `~nan`
    /// literal and by `Real.copySign`/`Real.~`.
    #[must_use]
    pub fn real_raw(r: f32) -> Self {
        Self::Real(r)
    }

    #[must_use]
    pub fn seq(items: Vec<Value>) -> Self {
        Self::Seq(Rc::new(items))
    }

    #[must_use]
    pub fn none() -> Self {
        Self::seq(vec![Self::Str(Rc::from(Self::NONE_TAG))])
    }

    #[must_use]
    pub fn some(v: Value) -> Self {
        Self::seq(vec![Self::Str(Rc::from(Self::SOME_TAG)), v])
    }

    /// Returns `Some(SOME inner)`, `Some(NONE)`, or `None` if this value
    /// isn't shaped like an option at all (wrong tag, or a length outside
    /// 1..=2).
    #[must_use]
    pub fn as_option(&self) -> Option<Option<&Value>> {
        let Self::Seq(items) = self else { return None };
        match items.as_slice() {
            [Self::Str(tag)] if &**tag == Self::NONE_TAG => Some(None),
            [Self::Str(tag), v] if &**tag == Self::SOME_TAG => Some(Some(v)),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_seq(&self) -> Option<&Rc<Vec<Value>>> {
        match self {
            Self::Seq(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_real(&self) -> Option<f32> {
        match self {
            Self::Real(r) => Some(*r),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_char(&self) -> Option<u8> {
        match self {
            Self::Char(c) => Some(*c),
            _ => None,
        }
    }

    /// Structural equality per ML `=`. NaN is never equal to anything,
    /// including itself.
    #[must_use]
    pub fn value_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Real(a), Self::Real(b)) => a == b, // NaN != NaN via IEEE semantics
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Unit, Self::Unit) => true,
            (Self::Seq(a), Self::Seq(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.value_eq(y))
            }
            _ => false,
        }
    }

    /// A total, reflexive key comparison used by the row-sink hash maps
    /// (group, order's buffer identity, set ops) — unlike [`Value::value_eq`]
    /// this treats NaN as equal to itself. Kept as a dedicated hash-key
    /// helper rather than folded into `PartialEq`/`Eq`, which would make
    /// NaN reflexive everywhere, including user-visible `=`.
    #[must_use]
    pub fn key_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Real(a), Self::Real(b)) => a.to_bits() == b.to_bits(),
            (Self::Seq(a), Self::Seq(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.key_eq(y))
            }
            _ => self.value_eq(other),
        }
    }

    pub fn key_hash<H: std::hash::Hasher>(&self, state: &mut H) {
        use std::hash::Hash;
        match self {
            Self::Bool(b) => b.hash(state),
            Self::Int(i) => i.hash(state),
            Self::Real(r) => r.to_bits().hash(state),
            Self::Char(c) => c.hash(state),
            Self::Str(s) => s.hash(state),
            Self::Unit => {}
            Self::Seq(items) => {
                for item in items.iter() {
                    item.key_hash(state);
                }
            }
            Self::Closure(c) => (Rc::as_ptr(c) as usize).hash(state),
            Self::Applicable(a) => (Rc::as_ptr(a) as *const () as usize).hash(state),
        }
    }
}

/// A key wrapper giving [`Value`] the `Hash`/`Eq` the `indexmap`-backed
/// row-sink maps in the group/order/set-op sinks need.
#[derive(Clone)]
pub struct ValueKey(pub Value);

impl PartialEq for ValueKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.key_eq(&other.0)
    }
}
impl Eq for ValueKey {}
impl std::hash::Hash for ValueKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.key_hash(state);
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Real(r) => write!(f, "{r}"),
            Self::Char(c) => write!(f, "#\"{}\"", *c as char),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Unit => write!(f, "()"),
            Self::Seq(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item:?}")?;
                }
                write!(f, ")")
            }
            Self::Closure(_) => write!(f, "<closure>"),
            Self::Applicable(_) => write!(f, "<builtin>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_is_canonicalized_on_construction() {
        let nan = Value::real(0.0_f32 / 0.0_f32);
        let Value::Real(r) = nan else { panic!("not a real") };
        assert!(r.is_sign_positive());
        assert!(r.is_nan());
    }

    #[test]
    fn nan_never_value_equal() {
        let a = Value::real(f32::NAN);
        let b = Value::real(f32::NAN);
        assert!(!a.value_eq(&b));
    }

    #[test]
    fn nan_key_equal_to_itself_by_bit_pattern() {
        let a = Value::real(f32::NAN);
        let b = Value::real(f32::NAN);
        assert!(a.key_eq(&b));
    }

    #[test]
    fn option_round_trip() {
        let none = Value::none();
        assert!(matches!(none.as_option(), Some(None)));
        let some = Value::some(Value::Int(3));
        match some.as_option() {
            Some(Some(v)) => assert_eq!(v.as_int(), Some(3)),
            _ => panic!("expected SOME"),
        }
    }
}
