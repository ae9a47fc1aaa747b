//! Symbol records.
//!
//! Each declared name becomes one tagged [`Symbol`] living in the scope
//! where it was declared. Class members live inside their [`ClassSymbol`]'s
//! `fields`/`methods` maps (insertion-ordered), and nested functions are
//! additionally recorded in their enclosing function's `nested` map.

use brioc_util::Span;
use indexmap::IndexMap;

use crate::scope::ScopeId;
use crate::types::Type;

/// A variable or constant.
#[derive(Debug, Clone)]
pub struct VarSymbol {
    pub name: String,
    pub ty: Type,
    pub is_const: bool,
    pub is_initialized: bool,
    pub span: Span,
}

/// A function parameter, with its zero-based position.
#[derive(Debug, Clone)]
pub struct ParamSymbol {
    pub name: String,
    pub ty: Type,
    pub index: usize,
    pub span: Span,
}

/// A function.
///
/// `ty` is always a [`Type::Function`] built from `params`. `closure_scope`
/// is the scope the function was declared in, kept as an arena index so it
/// is a back-reference, never an ownership edge.
#[derive(Debug, Clone)]
pub struct FuncSymbol {
    pub name: String,
    pub ty: Type,
    pub params: Vec<ParamSymbol>,
    pub closure_scope: Option<ScopeId>,
    pub nested: IndexMap<String, FuncSymbol>,
    pub span: Span,
}

impl FuncSymbol {
    /// The declared return type.
    pub fn return_type(&self) -> Type {
        match &self.ty {
            Type::Function { ret, .. } => (**ret).clone(),
            _ => Type::Void,
        }
    }
}

/// A class, with its members in declaration order.
#[derive(Debug, Clone)]
pub struct ClassSymbol {
    pub name: String,
    pub ty: Type,
    pub fields: IndexMap<String, VarSymbol>,
    pub methods: IndexMap<String, FuncSymbol>,
    pub base: Option<String>,
    pub span: Span,
}

/// A declared name.
#[derive(Debug, Clone)]
pub enum Symbol {
    Variable(VarSymbol),
    Parameter(ParamSymbol),
    Function(FuncSymbol),
    Class(ClassSymbol),
}

impl Symbol {
    pub fn name(&self) -> &str {
        match self {
            Symbol::Variable(sym) => &sym.name,
            Symbol::Parameter(sym) => &sym.name,
            Symbol::Function(sym) => &sym.name,
            Symbol::Class(sym) => &sym.name,
        }
    }

    pub fn ty(&self) -> &Type {
        match self {
            Symbol::Variable(sym) => &sym.ty,
            Symbol::Parameter(sym) => &sym.ty,
            Symbol::Function(sym) => &sym.ty,
            Symbol::Class(sym) => &sym.ty,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Symbol::Variable(sym) => sym.span,
            Symbol::Parameter(sym) => sym.span,
            Symbol::Function(sym) => sym.span,
            Symbol::Class(sym) => sym.span,
        }
    }

    /// The category label used in symbol-table output.
    pub fn category(&self) -> &'static str {
        match self {
            Symbol::Variable(sym) if sym.is_const => "const",
            Symbol::Variable(_) => "variable",
            Symbol::Parameter(_) => "param",
            Symbol::Function(_) => "function",
            Symbol::Class(_) => "class",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_var_symbol() {
        let sym = VarSymbol {
            name: "x".into(),
            ty: Type::Integer,
            is_const: false,
            is_initialized: true,
            span: Span::DUMMY,
        };
        let tagged = Symbol::Variable(sym);
        assert_eq!(tagged.name(), "x");
        assert_eq!(tagged.ty(), &Type::Integer);
        assert_eq!(tagged.category(), "variable");
    }

    #[test]
    fn test_const_category() {
        let sym = Symbol::Variable(VarSymbol {
            name: "PI".into(),
            ty: Type::Integer,
            is_const: true,
            is_initialized: true,
            span: Span::DUMMY,
        });
        assert_eq!(sym.category(), "const");
    }

    #[test]
    fn test_func_symbol_return_type() {
        let params = vec![
            ParamSymbol {
                name: "a".into(),
                ty: Type::Integer,
                index: 0,
                span: Span::DUMMY,
            },
            ParamSymbol {
                name: "b".into(),
                ty: Type::String,
                index: 1,
                span: Span::DUMMY,
            },
        ];
        let func = FuncSymbol {
            name: "foo".into(),
            ty: Type::function(vec![Type::Integer, Type::String], Type::Integer),
            params,
            closure_scope: None,
            nested: IndexMap::new(),
            span: Span::DUMMY,
        };
        assert_eq!(func.return_type(), Type::Integer);
        assert_eq!(func.params.len(), 2);
        assert_eq!(func.params[1].index, 1);
        assert_eq!(Symbol::Function(func).category(), "function");
    }

    #[test]
    fn test_class_symbol_fields_keep_insertion_order() {
        let mut class = ClassSymbol {
            name: "Point".into(),
            ty: Type::Class("Point".into()),
            fields: IndexMap::new(),
            methods: IndexMap::new(),
            base: None,
            span: Span::DUMMY,
        };
        for field in ["y", "x", "z"] {
            class.fields.insert(
                field.into(),
                VarSymbol {
                    name: field.into(),
                    ty: Type::Integer,
                    is_const: false,
                    is_initialized: false,
                    span: Span::DUMMY,
                },
            );
        }
        let order: Vec<_> = class.fields.keys().map(String::as_str).collect();
        assert_eq!(order, ["y", "x", "z"]);
        assert_eq!(Symbol::Class(class).category(), "class");
    }
}
