#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! # `TypeFill` shapes
//!
//! Declared type shapes for fillable fields. A [`TypeShape`] is a pure
//! descriptor tree: it names what a field should hold, not how a value
//! gets there. Fillers interpret shapes; this package only describes
//! them.
//!
//! ```rust
//! use typefill_shapes::{ShapeOrigin, TypeShape};
//!
//! let shape = TypeShape::List(Box::new(TypeShape::Int.optional()));
//!
//! assert_eq!(shape.origin(), ShapeOrigin::List);
//! assert_eq!(shape.to_string(), "list<int | null>");
//! ```

use typefill_values::ValueKind;

/// The declared shape of a fillable field.
///
/// `List` and `Map` carry their element shape (map keys are always
/// strings). `Union` carries its variants in declaration order, which is
/// also the order fillers arbitrate them in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeShape {
    /// Admits any value without inspection.
    Any,
    Null,
    Bool,
    Int,
    Float,
    Str,
    DateTime,
    List(Box<TypeShape>),
    Map(Box<TypeShape>),
    Union(Vec<TypeShape>),
}

/// The outer constructor of a [`TypeShape`], with parameters erased.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeOrigin {
    Any,
    Null,
    Bool,
    Int,
    Float,
    Str,
    DateTime,
    List,
    Map,
    Union,
}

impl std::fmt::Display for ShapeOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Any => "any",
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "str",
            Self::DateTime => "datetime",
            Self::List => "list",
            Self::Map => "map",
            Self::Union => "union",
        })
    }
}

impl TypeShape {
    /// The outer constructor of this shape.
    #[must_use]
    pub const fn origin(&self) -> ShapeOrigin {
        match self {
            Self::Any => ShapeOrigin::Any,
            Self::Null => ShapeOrigin::Null,
            Self::Bool => ShapeOrigin::Bool,
            Self::Int => ShapeOrigin::Int,
            Self::Float => ShapeOrigin::Float,
            Self::Str => ShapeOrigin::Str,
            Self::DateTime => ShapeOrigin::DateTime,
            Self::List(_) => ShapeOrigin::List,
            Self::Map(_) => ShapeOrigin::Map,
            Self::Union(_) => ShapeOrigin::Union,
        }
    }

    /// The shape parameters of this shape, in declaration order.
    ///
    /// Scalars have none, `List` and `Map` have exactly one, and `Union`
    /// has one per variant.
    #[must_use]
    pub fn args(&self) -> &[Self] {
        match self {
            Self::List(inner) | Self::Map(inner) => std::slice::from_ref(inner),
            Self::Union(variants) => variants,
            _ => &[],
        }
    }

    /// Builds a union of `self` and `Null`.
    ///
    /// ```rust
    /// use typefill_shapes::TypeShape;
    ///
    /// assert_eq!(TypeShape::Int.optional().to_string(), "int | null");
    /// ```
    #[must_use]
    pub fn optional(self) -> Self {
        Self::union(vec![self, Self::Null])
    }

    /// Builds a union of `variants`.
    ///
    /// Nested unions flatten into the parent and duplicate variants keep
    /// only their first occurrence. A union left with a single variant
    /// collapses to that variant. An empty `variants` yields a union that
    /// admits nothing.
    #[must_use]
    pub fn union(variants: Vec<Self>) -> Self {
        let mut flattened: Vec<Self> = Vec::with_capacity(variants.len());

        for variant in variants {
            match variant {
                Self::Union(inner) => {
                    for variant in inner {
                        if !flattened.contains(&variant) {
                            flattened.push(variant);
                        }
                    }
                }
                variant => {
                    if !flattened.contains(&variant) {
                        flattened.push(variant);
                    }
                }
            }
        }

        if flattened.len() == 1 {
            flattened.remove(0)
        } else {
            Self::Union(flattened)
        }
    }

    /// Whether this shape names exactly one runtime kind at every level.
    ///
    /// `Any` and `Union` are abstract, and a container is only as
    /// concrete as its element shape.
    #[must_use]
    pub fn is_concrete(&self) -> bool {
        match self {
            Self::Any | Self::Union(_) => false,
            Self::List(inner) | Self::Map(inner) => inner.is_concrete(),
            _ => true,
        }
    }

    /// Whether this shape is a single non-container kind.
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        matches!(
            self,
            Self::Null | Self::Bool | Self::Int | Self::Float | Self::Str | Self::DateTime
        )
    }

    /// The runtime kind a value of this shape presents as, if the shape
    /// pins one down. `Any` and `Union` do not.
    #[must_use]
    pub const fn expected_kind(&self) -> Option<ValueKind> {
        match self {
            Self::Any | Self::Union(_) => None,
            Self::Null => Some(ValueKind::Null),
            Self::Bool => Some(ValueKind::Bool),
            Self::Int => Some(ValueKind::Int),
            Self::Float => Some(ValueKind::Float),
            Self::Str => Some(ValueKind::Str),
            Self::DateTime => Some(ValueKind::DateTime),
            Self::List(_) => Some(ValueKind::List),
            Self::Map(_) => Some(ValueKind::Map),
        }
    }
}

impl std::fmt::Display for TypeShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::List(inner) => write!(f, "list<{inner}>"),
            Self::Map(inner) => write!(f, "map<{inner}>"),
            Self::Union(variants) => {
                if variants.is_empty() {
                    return f.write_str("union<>");
                }
                for (i, variant) in variants.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    variant.fmt(f)?;
                }
                Ok(())
            }
            shape => shape.origin().fmt(f),
        }
    }
}
