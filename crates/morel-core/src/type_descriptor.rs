//! The type descriptor the external type system hands the core. The evaluator only consumes it to (a) build comparators and
//! (b) drive a few type-dispatched built-ins; it never performs
//! typechecking itself.

use std::rc::Rc;

use indexmap::IndexMap;

/// A stable key used to memoize comparators and describers across a
/// single build session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeKey(pub u64);

/// The top-level shape of a type, as the compiler's type system reports
/// it.
#[derive(Debug, Clone)]
pub enum TypeDescriptor {
    /// A primitive or otherwise-opaque named type (`int`, `string`, a
    /// type alias, ...).
    Id { key: TypeKey, name: Rc<str> },
    /// An unresolved type variable.
    TyVar { key: TypeKey },
    Tuple { key: TypeKey, args: Vec<TypeDescriptor> },
    Record { key: TypeKey, fields: IndexMap<Rc<str>, TypeDescriptor> },
    List { key: TypeKey, elem: Box<TypeDescriptor> },
    /// A sum (datatype) type: constructor name -> payload type (`None`
    /// for nullary constructors), in declaration order (the order backs
    /// the comparator's ordinal tie-break).
    ///
    /// `args` carries the type-argument list for the two datatypes the
    /// comparator special-cases structurally rather than via the
    /// constructor table: `bag` (`args = [elem]`, `constructors` empty)
    /// and `descending` (`args = [elem]`, `constructors` empty). General
    /// sum types leave `args` empty and populate `constructors` instead.
    DataType {
        key: TypeKey,
        name: Rc<str>,
        args: Vec<TypeDescriptor>,
        constructors: IndexMap<Rc<str>, Option<Box<TypeDescriptor>>>,
    },
}

impl TypeDescriptor {
    #[must_use]
    pub fn key(&self) -> TypeKey {
        match self {
            Self::Id { key, .. }
            | Self::TyVar { key }
            | Self::Tuple { key, .. }
            | Self::Record { key, .. }
            | Self::List { key, .. }
            | Self::DataType { key, .. } => *key,
        }
    }

    /// True for the `bag` datatype, which the comparator treats
    /// identically to `list` over its element type.
    #[must_use]
    pub fn is_bag(&self) -> bool {
        matches!(self, Self::DataType { name, .. } if &**name == "bag")
    }

    /// True for the `descending` wrapper datatype.
    #[must_use]
    pub fn is_descending(&self) -> bool {
        matches!(self, Self::DataType { name, .. } if &**name == "descending")
    }

    /// The single element/payload type for `bag`/`descending` wrappers.
    #[must_use]
    pub fn single_arg(&self) -> Option<&TypeDescriptor> {
        match self {
            Self::DataType { args, .. } => args.first(),
            _ => None,
        }
    }
}
