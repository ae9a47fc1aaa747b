//! The Brio type system.
//!
//! A closed set of type terms plus the compatibility relations every checker
//! decision flows through. Equality is structural; assignability admits
//! `null` into reference-like destinations only.

use std::fmt;

/// A type in the Brio type system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    /// Primitive integer type
    Integer,
    /// Primitive string type (reference-like: accepts null)
    String,
    /// Primitive boolean type
    Boolean,
    /// The type of the `null` literal
    Null,
    /// Absence of a value; also the recovery type for failed checks
    Void,
    /// Array type; `dims` counts bracket pairs and `elem` is never itself
    /// an `Array` (nesting is encoded by `dims`, not by wrapping)
    Array { elem: Box<Type>, dims: u32 },
    /// Function type `(params) -> ret`
    Function { params: Vec<Type>, ret: Box<Type> },
    /// Class type, identified by declared class name
    Class(String),
}

impl Type {
    /// Build an array type, maintaining the flat-element invariant: an
    /// array of arrays folds into a single `Array` with summed dims.
    pub fn array(elem: Type, dims: u32) -> Type {
        match elem {
            Type::Array {
                elem: inner,
                dims: inner_dims,
            } => Type::Array {
                elem: inner,
                dims: inner_dims + dims,
            },
            other => Type::Array {
                elem: Box::new(other),
                dims,
            },
        }
    }

    /// Build a function type from parameter types and a return type.
    pub fn function(params: Vec<Type>, ret: Type) -> Type {
        Type::Function {
            params,
            ret: Box::new(ret),
        }
    }

    /// The type obtained by indexing once: peels one bracket pair.
    pub fn element_type(&self) -> Option<Type> {
        match self {
            Type::Array { elem, dims } if *dims > 1 => Some(Type::Array {
                elem: elem.clone(),
                dims: dims - 1,
            }),
            Type::Array { elem, .. } => Some((**elem).clone()),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Integer)
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Type::Boolean)
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Type::String)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Type::Null)
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Void)
    }

    /// Reference-like types admit `null`.
    pub fn is_reference_like(&self) -> bool {
        matches!(
            self,
            Type::Array { .. } | Type::Class(_) | Type::Function { .. } | Type::String
        )
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Integer => f.write_str("integer"),
            Type::String => f.write_str("string"),
            Type::Boolean => f.write_str("boolean"),
            Type::Null => f.write_str("null"),
            Type::Void => f.write_str("void"),
            Type::Array { elem, dims } => {
                write!(f, "{elem}")?;
                for _ in 0..*dims {
                    f.write_str("[]")?;
                }
                Ok(())
            }
            Type::Function { params, ret } => {
                f.write_str("(")?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{param}")?;
                }
                write!(f, ") -> {ret}")
            }
            Type::Class(name) => f.write_str(name),
        }
    }
}

/// Structural type equality.
///
/// Arrays are equal iff same dims and equal element types; functions iff
/// equal return types and pointwise equal parameters; primitives and classes
/// iff same name. The derived `PartialEq` implements exactly this relation.
pub fn equal(a: &Type, b: &Type) -> bool {
    a == b
}

/// Assignability: `src` may flow into `dst` without conversion.
///
/// Equal types are assignable; `null` is assignable into reference-like
/// destinations (arrays, classes, functions, string); nothing else is.
pub fn can_assign(dst: &Type, src: &Type) -> bool {
    if equal(dst, src) {
        return true;
    }
    src.is_null() && dst.is_reference_like()
}

/// Result type of `- * / %` (and the numeric case of `+`).
pub fn arithmetic_type(lhs: &Type, rhs: &Type) -> Option<Type> {
    if lhs.is_numeric() && rhs.is_numeric() {
        return Some(Type::Integer);
    }
    None
}

/// Result type of `+`: numeric addition or string concatenation.
///
/// `string + string`, `string + integer`, and `integer + string` all
/// concatenate to `string`.
pub fn addition_type(lhs: &Type, rhs: &Type) -> Option<Type> {
    if let Some(t) = arithmetic_type(lhs, rhs) {
        return Some(t);
    }
    match (lhs, rhs) {
        (Type::String, Type::String)
        | (Type::String, Type::Integer)
        | (Type::Integer, Type::String) => Some(Type::String),
        _ => None,
    }
}

/// Result type of `&&` and `||`.
pub fn logical_type(lhs: &Type, rhs: &Type) -> Option<Type> {
    if lhs.is_boolean() && rhs.is_boolean() {
        return Some(Type::Boolean);
    }
    None
}

/// Result type of `==` and `!=`: operands of equal type compare to boolean.
pub fn equality_type(lhs: &Type, rhs: &Type) -> Option<Type> {
    if equal(lhs, rhs) {
        return Some(Type::Boolean);
    }
    None
}

/// Result type of `< <= > >=`: only numeric operands are ordered.
pub fn ordering_type(lhs: &Type, rhs: &Type) -> Option<Type> {
    if lhs.is_numeric() && rhs.is_numeric() {
        return Some(Type::Boolean);
    }
    None
}
