//! The tree walker / type checker.
//!
//! Visits every node of the parse tree, building scopes and symbols as it
//! goes and typing every expression. Each expression visit returns a
//! [`Type`], defaulting to `void` when a rule fails or a name does not
//! resolve; statements return nothing. The walker never stops on an error:
//! it reports the diagnostic and keeps visiting, so one run surfaces every
//! problem the tree has.
//!
//! The walker owns both the [`ScopeStack`] and the [`ErrorReporter`]; one
//! walker processes one tree, and independent walkers share no state.

use brioc_par::ast::*;
use brioc_util::{ErrorCode, ErrorReporter, Span};
use indexmap::IndexMap;

use crate::scope::{ScopeKind, ScopeStack};
use crate::symbols::{ClassSymbol, FuncSymbol, ParamSymbol, Symbol, VarSymbol};
use crate::types::{
    addition_type, arithmetic_type, can_assign, equality_type, logical_type, ordering_type, Type,
};

/// Result of one analysis run: the scope tree and the diagnostics.
#[derive(Debug)]
pub struct Analysis {
    pub scopes: ScopeStack,
    pub reporter: ErrorReporter,
}

/// Analyze a whole program with a fresh checker.
pub fn analyze(program: &Program) -> Analysis {
    let mut checker = TypeChecker::new();
    checker.check_program(program);
    checker.finish()
}

/// The semantic analyzer.
pub struct TypeChecker {
    scopes: ScopeStack,
    reporter: ErrorReporter,
    current_class: Option<String>,
}

impl TypeChecker {
    /// Create a checker whose scope stack holds the global scope.
    pub fn new() -> Self {
        Self {
            scopes: ScopeStack::new(),
            reporter: ErrorReporter::new(),
            current_class: None,
        }
    }

    /// Visit every top-level statement.
    pub fn check_program(&mut self, program: &Program) {
        for stmt in &program.stmts {
            self.check_stmt(stmt);
        }
    }

    /// Hand over the scope tree and the diagnostics.
    pub fn finish(self) -> Analysis {
        Analysis {
            scopes: self.scopes,
            reporter: self.reporter,
        }
    }

    pub fn reporter(&self) -> &ErrorReporter {
        &self.reporter
    }

    pub fn scopes(&self) -> &ScopeStack {
        &self.scopes
    }

    // =========================================================================
    // HELPERS
    // =========================================================================

    fn report(&mut self, span: Span, code: ErrorCode, message: impl Into<String>) {
        self.reporter.report(span.line, span.column, code, message);
    }

    /// Define in the current scope; duplicates get `E_REDECL`.
    fn define_symbol(&mut self, sym: Symbol) {
        let name = sym.name().to_string();
        let span = sym.span();
        if !self.scopes.define(sym) {
            self.report(span, ErrorCode::Redecl, format!("Redeclaración de {name}"));
        }
    }

    /// Resolve through the scope chain; unresolved names get `E_UNDEF`.
    ///
    /// The primitive type words resolve to nothing, silently: in expression
    /// position they are handled before this point, and they never name a
    /// symbol.
    fn resolve_symbol(&mut self, name: &str, span: Span) -> Option<Symbol> {
        if matches!(name, "integer" | "string" | "boolean" | "void") {
            return None;
        }
        match self.scopes.resolve(name) {
            Some(sym) => Some(sym.clone()),
            None => {
                self.report(span, ErrorCode::Undef, format!("Símbolo no definido: {name}"));
                None
            }
        }
    }

    /// Turn a type annotation into a semantic type.
    fn resolve_type_node(&self, node: &TypeNode) -> Type {
        let base = match &node.base {
            TypeBase::Integer => Type::Integer,
            TypeBase::String => Type::String,
            TypeBase::Boolean => Type::Boolean,
            TypeBase::Void => Type::Void,
            TypeBase::Named(name) => Type::Class(name.clone()),
        };
        if node.dims > 0 {
            Type::array(base, node.dims)
        } else {
            base
        }
    }

    /// Annotation type, or `void` when the annotation is absent.
    fn declared_type(&self, annotation: &Option<TypeNode>) -> Type {
        annotation
            .as_ref()
            .map(|node| self.resolve_type_node(node))
            .unwrap_or(Type::Void)
    }

    fn build_params(&self, params: &[Param]) -> Vec<ParamSymbol> {
        params
            .iter()
            .enumerate()
            .map(|(index, param)| ParamSymbol {
                name: param.name.name.clone(),
                ty: self.declared_type(&param.ty),
                index,
                span: param.span,
            })
            .collect()
    }

    fn function_type(params: &[ParamSymbol], ret: Type) -> Type {
        Type::function(params.iter().map(|p| p.ty.clone()).collect(), ret)
    }

    // =========================================================================
    // STATEMENTS
    // =========================================================================

    fn check_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::VarDecl(decl) => self.check_var_decl(decl),
            Stmt::ConstDecl(decl) => self.check_const_decl(decl),
            Stmt::FnDecl(decl) => self.check_fn_decl(decl),
            Stmt::ClassDecl(decl) => self.check_class_decl(decl),
            Stmt::If(s) => self.check_if(s),
            Stmt::While(s) => self.check_while(s),
            Stmt::DoWhile(s) => self.check_do_while(s),
            Stmt::For(s) => self.check_for(s),
            Stmt::Foreach(s) => self.check_foreach(s),
            Stmt::Switch(s) => self.check_switch(s),
            Stmt::TryCatch(s) => self.check_try_catch(s),
            Stmt::Break(span) => self.check_break(*span),
            Stmt::Continue(span) => self.check_continue(*span),
            Stmt::Return(ret) => {
                self.check_return(ret);
            }
            Stmt::Block(block) => {
                self.check_block_stmts(&block.stmts);
            }
            Stmt::Expr(stmt) => {
                self.check_expr(&stmt.expr);
            }
        }
    }

    /// Walk a statement list with dead-code detection, collecting the types
    /// of direct-child `return` statements.
    ///
    /// Once a `return`, `break`, or `continue` is seen, every following
    /// statement in the same list gets `E_DEADCODE` but is still visited
    /// for further diagnostics.
    fn check_block_stmts(&mut self, stmts: &[Stmt]) -> Vec<Type> {
        let mut returns = Vec::new();
        let mut terminated = false;
        for stmt in stmts {
            if terminated {
                self.report(
                    stmt.span(),
                    ErrorCode::DeadCode,
                    "Código muerto: esta instrucción nunca se ejecutará",
                );
            }
            match stmt {
                Stmt::Return(ret) => {
                    returns.push(self.check_return(ret));
                    terminated = true;
                }
                Stmt::Break(_) | Stmt::Continue(_) => {
                    self.check_stmt(stmt);
                    terminated = true;
                }
                _ => self.check_stmt(stmt),
            }
        }
        returns
    }

    /// Type the returned value; `void` when bare. A `return` with no
    /// function scope anywhere on the stack is a context error.
    fn check_return(&mut self, ret: &ReturnStmt) -> Type {
        if self.scopes.inside(ScopeKind::Function) {
            self.scopes.mark_return();
        } else {
            self.report(ret.span, ErrorCode::Return, "return fuera de función");
        }
        ret.value
            .as_ref()
            .map(|expr| self.check_expr(expr))
            .unwrap_or(Type::Void)
    }

    fn check_var_decl(&mut self, decl: &VarDecl) {
        let vtype = self.declared_type(&decl.ty);
        let mut sym = VarSymbol {
            name: decl.name.name.clone(),
            ty: vtype.clone(),
            is_const: false,
            is_initialized: false,
            span: decl.span,
        };

        if let Some(init) = &decl.init {
            let init_t = self.check_expr(init);
            if can_assign(&vtype, &init_t) {
                sym.is_initialized = true;
            } else {
                self.report(
                    decl.span,
                    ErrorCode::Assign,
                    format!("No se puede asignar {init_t} a {vtype}"),
                );
            }
        }

        self.define_symbol(Symbol::Variable(sym));
    }

    fn check_const_decl(&mut self, decl: &ConstDecl) {
        let vtype = self.declared_type(&decl.ty);
        let init_t = self.check_expr(&decl.init);
        if !can_assign(&vtype, &init_t) {
            self.report(
                decl.span,
                ErrorCode::Assign,
                format!("No se puede asignar {init_t} a {vtype}"),
            );
        }
        self.define_symbol(Symbol::Variable(VarSymbol {
            name: decl.name.name.clone(),
            ty: vtype,
            is_const: true,
            is_initialized: true,
            span: decl.span,
        }));
    }

    fn check_fn_decl(&mut self, decl: &FnDecl) {
        let name = decl.name.name.clone();
        let ret = self.declared_type(&decl.ret);
        let params = self.build_params(&decl.params);
        let fsym = FuncSymbol {
            name: name.clone(),
            ty: Self::function_type(&params, ret.clone()),
            params: params.clone(),
            closure_scope: Some(self.scopes.current_id()),
            nested: IndexMap::new(),
            span: decl.span,
        };
        self.define_symbol(Symbol::Function(fsym));

        // A function declared directly inside another function's scope is
        // also recorded in the enclosing function's `nested` map.
        let enclosing_fn = {
            let current = self.scopes.current();
            if current.kind == ScopeKind::Function {
                current.name.clone()
            } else {
                None
            }
        };

        self.check_function_body(&name, &ret, &params, &decl.body, decl.span);

        if let Some(parent_name) = enclosing_fn {
            let snapshot = match self.scopes.resolve(&name) {
                Some(Symbol::Function(func)) => Some(func.clone()),
                _ => None,
            };
            if let (Some(snapshot), Some(Symbol::Function(parent))) =
                (snapshot, self.scopes.resolve_mut(&parent_name))
            {
                parent.nested.insert(name, snapshot);
            }
        }
    }

    /// Push a function scope, define the parameters, walk the body, and
    /// enforce the return contract against the collected return types.
    fn check_function_body(
        &mut self,
        name: &str,
        ret: &Type,
        params: &[ParamSymbol],
        body: &Block,
        span: Span,
    ) {
        self.scopes.push_function(ret.clone(), name);
        for param in params {
            self.define_symbol(Symbol::Parameter(param.clone()));
        }
        let returns = self.check_block_stmts(&body.stmts);
        self.scopes.pop();

        if returns.is_empty() && *ret != Type::Void {
            self.report(
                span,
                ErrorCode::Return,
                format!("Función {name} sin return pero declarada {ret}"),
            );
        }
        for ret_t in &returns {
            if !can_assign(ret, ret_t) {
                self.report(
                    span,
                    ErrorCode::Return,
                    format!("Return {ret_t} incompatible con {ret}"),
                );
            }
        }
    }

    fn check_class_decl(&mut self, decl: &ClassDecl) {
        let name = decl.name.name.clone();
        self.define_symbol(Symbol::Class(ClassSymbol {
            name: name.clone(),
            ty: Type::Class(name.clone()),
            fields: IndexMap::new(),
            methods: IndexMap::new(),
            base: decl.base.as_ref().map(|base| base.name.clone()),
            span: decl.span,
        }));

        let prev_class = self.current_class.replace(name.clone());
        self.scopes.push_class(&name);

        // First sweep: collect fields into the class scope and method
        // signatures into the member maps.
        let mut fields: IndexMap<String, VarSymbol> = IndexMap::new();
        let mut methods: IndexMap<String, FuncSymbol> = IndexMap::new();
        for member in &decl.members {
            match member {
                ClassMember::Field(field) => {
                    let vsym = VarSymbol {
                        name: field.name.name.clone(),
                        ty: self.declared_type(&field.ty),
                        is_const: false,
                        is_initialized: field.init.is_some(),
                        span: field.span,
                    };
                    fields.insert(vsym.name.clone(), vsym.clone());
                    self.define_symbol(Symbol::Variable(vsym));
                }
                ClassMember::Const(constant) => {
                    let vsym = VarSymbol {
                        name: constant.name.name.clone(),
                        ty: self.declared_type(&constant.ty),
                        is_const: true,
                        is_initialized: true,
                        span: constant.span,
                    };
                    fields.insert(vsym.name.clone(), vsym.clone());
                    self.define_symbol(Symbol::Variable(vsym));
                }
                ClassMember::Method(method) => {
                    let params = self.build_params(&method.params);
                    let ret = self.declared_type(&method.ret);
                    methods.insert(
                        method.name.name.clone(),
                        FuncSymbol {
                            name: method.name.name.clone(),
                            ty: Self::function_type(&params, ret),
                            params,
                            closure_scope: None,
                            nested: IndexMap::new(),
                            span: method.span,
                        },
                    );
                }
            }
        }

        // Publish the members before walking bodies, so methods can use
        // every field and call every sibling regardless of order.
        if let Some(Symbol::Class(stored)) = self.scopes.resolve_mut(&name) {
            stored.fields = fields;
            stored.methods = methods.clone();
        }

        // Second sweep: method bodies, walked exactly like top-level
        // function bodies.
        for member in &decl.members {
            if let ClassMember::Method(method) = member {
                if let Some(sig) = methods.get(&method.name.name) {
                    let ret = sig.return_type();
                    let params = sig.params.clone();
                    self.check_function_body(&method.name.name, &ret, &params, &method.body, method.span);
                }
            }
        }

        self.scopes.pop();
        self.current_class = prev_class;
    }

    // =========================================================================
    // CONTROL FLOW
    // =========================================================================

    fn check_if(&mut self, stmt: &IfStmt) {
        let cond_t = self.check_expr(&stmt.cond);
        if cond_t != Type::Boolean {
            self.report(
                stmt.span,
                ErrorCode::If,
                format!("Condición de if debe ser boolean, no {cond_t}"),
            );
        }
        // Branch bodies do not open a scope: declarations land in the
        // enclosing scope.
        self.check_block_stmts(&stmt.then_block.stmts);
        if let Some(else_block) = &stmt.else_block {
            self.check_block_stmts(&else_block.stmts);
        }
    }

    fn check_while(&mut self, stmt: &WhileStmt) {
        let cond_t = self.check_expr(&stmt.cond);
        if cond_t != Type::Boolean {
            self.report(
                stmt.span,
                ErrorCode::While,
                format!("Condición de while debe ser boolean, no {cond_t}"),
            );
        }
        self.scopes.push(ScopeKind::Loop);
        self.check_block_stmts(&stmt.body.stmts);
        self.scopes.pop();
    }

    fn check_do_while(&mut self, stmt: &DoWhileStmt) {
        self.scopes.push(ScopeKind::Loop);
        self.check_block_stmts(&stmt.body.stmts);
        self.scopes.pop();
        let cond_t = self.check_expr(&stmt.cond);
        if cond_t != Type::Boolean {
            self.report(
                stmt.span,
                ErrorCode::DoWhile,
                format!("Condición de do-while debe ser boolean, no {cond_t}"),
            );
        }
    }

    fn check_for(&mut self, stmt: &ForStmt) {
        self.scopes.push(ScopeKind::Loop);

        if let Some(init) = &stmt.init {
            self.check_stmt(init);
        }
        if let Some(cond) = &stmt.cond {
            let cond_t = self.check_expr(cond);
            if cond_t != Type::Boolean {
                self.report(
                    stmt.span,
                    ErrorCode::For,
                    format!("Condición de for debe ser boolean, no {cond_t}"),
                );
            }
        }
        if let Some(step) = &stmt.step {
            self.check_expr(step);
        }

        self.check_block_stmts(&stmt.body.stmts);
        self.scopes.pop();
    }

    fn check_foreach(&mut self, stmt: &ForeachStmt) {
        let iter_t = self.check_expr(&stmt.iter);
        let elem_t = match iter_t.element_type() {
            Some(elem) => elem,
            None => {
                self.report(
                    stmt.span,
                    ErrorCode::Foreach,
                    format!("foreach requiere un arreglo, no {iter_t}"),
                );
                Type::Void
            }
        };

        // The iteration variable lands in the enclosing scope.
        self.define_symbol(Symbol::Variable(VarSymbol {
            name: stmt.var.name.clone(),
            ty: elem_t,
            is_const: false,
            is_initialized: true,
            span: stmt.var.span,
        }));

        self.scopes.push(ScopeKind::Loop);
        self.check_block_stmts(&stmt.body.stmts);
        self.scopes.pop();
    }

    fn check_switch(&mut self, stmt: &SwitchStmt) {
        let control_t = self.check_expr(&stmt.control);
        self.scopes.push(ScopeKind::Switch);

        for case in &stmt.cases {
            let case_t = self.check_expr(&case.value);
            if !can_assign(&control_t, &case_t) {
                self.report(
                    case.span,
                    ErrorCode::Switch,
                    format!("case {case_t} incompatible con switch {control_t}"),
                );
            }
            self.check_block_stmts(&case.body);
        }
        if let Some(default) = &stmt.default {
            self.check_block_stmts(default);
        }

        self.scopes.pop();
    }

    fn check_break(&mut self, span: Span) {
        if !self.scopes.inside(ScopeKind::Loop) && !self.scopes.inside(ScopeKind::Switch) {
            self.report(
                span,
                ErrorCode::Break,
                "break solo se permite en bucles o switch",
            );
        }
    }

    fn check_continue(&mut self, span: Span) {
        if !self.scopes.inside(ScopeKind::Loop) {
            self.report(span, ErrorCode::Continue, "continue solo se permite en bucles");
        }
    }

    fn check_try_catch(&mut self, stmt: &TryCatchStmt) {
        // The try body runs in the enclosing scope.
        self.check_block_stmts(&stmt.try_block.stmts);

        self.scopes.push(ScopeKind::Catch);
        self.define_symbol(Symbol::Variable(VarSymbol {
            name: stmt.err_name.name.clone(),
            ty: Type::String,
            is_const: false,
            is_initialized: true,
            span: stmt.err_name.span,
        }));
        self.check_block_stmts(&stmt.catch_block.stmts);
        self.scopes.pop();
    }

    // =========================================================================
    // EXPRESSIONS
    // =========================================================================

    /// Type an expression. Never returns "no type": failed rules recover
    /// with `void`.
    fn check_expr(&mut self, expr: &Expr) -> Type {
        match expr {
            Expr::Literal { value, .. } => match value {
                Literal::Int(_) => Type::Integer,
                Literal::Str(_) => Type::String,
                Literal::Bool(_) => Type::Boolean,
                Literal::Null => Type::Null,
            },
            Expr::Array { elems, span } => self.check_array_literal(elems, *span),
            Expr::Ident(ident) => self.check_ident(ident),
            Expr::This { span } => self.check_this(*span),
            Expr::New { class, args, span } => self.check_new(class, args, *span),
            Expr::Unary { op, operand, span } => self.check_unary(*op, operand, *span),
            Expr::Binary { op, lhs, rhs, span } => self.check_binary(*op, lhs, rhs, *span),
            Expr::Ternary {
                cond,
                then_expr,
                else_expr,
                span,
            } => self.check_ternary(cond, then_expr, else_expr, *span),
            Expr::Assign { target, value, span } => self.check_assign(target, value, *span),
            Expr::Property { object, name, span } => self.check_property(object, name, *span),
            Expr::Index { object, index, span } => self.check_index(object, index, *span),
            Expr::Call { callee, args, span } => self.check_call(callee, args, *span),
        }
    }

    fn check_array_literal(&mut self, elems: &[Expr], span: Span) -> Type {
        let elem_types: Vec<Type> = elems.iter().map(|elem| self.check_expr(elem)).collect();
        let Some(first) = elem_types.first() else {
            return Type::array(Type::Void, 1);
        };

        for elem_t in &elem_types[1..] {
            if !(can_assign(first, elem_t) && can_assign(elem_t, first)) {
                self.report(
                    span,
                    ErrorCode::ArrayElem,
                    format!("Tipos incompatibles en arreglo: {first} y {elem_t}"),
                );
            }
        }

        // `Type::array` folds an array-of-arrays element into dims + 1.
        Type::array(first.clone(), 1)
    }

    fn check_ident(&mut self, ident: &Ident) -> Type {
        // A bare type word in expression position is the primitive type,
        // not an undefined symbol.
        match ident.name.as_str() {
            "integer" => return Type::Integer,
            "string" => return Type::String,
            "boolean" => return Type::Boolean,
            "void" => return Type::Void,
            _ => {}
        }

        match self.resolve_symbol(&ident.name, ident.span) {
            // A function identifier carries its full function type; call
            // handling unwraps the return type.
            Some(sym) => sym.ty().clone(),
            None => Type::Void,
        }
    }

    fn check_this(&mut self, span: Span) -> Type {
        match &self.current_class {
            Some(name) => Type::Class(name.clone()),
            None => {
                self.report(span, ErrorCode::This, "Uso de 'this' fuera de una clase");
                Type::Void
            }
        }
    }

    fn check_new(&mut self, class: &Ident, args: &[Expr], span: Span) -> Type {
        let arg_types: Vec<Type> = args.iter().map(|arg| self.check_expr(arg)).collect();

        match self.resolve_symbol(&class.name, span) {
            Some(Symbol::Class(_)) => {}
            _ => {
                self.report(
                    span,
                    ErrorCode::New,
                    format!("Clase no definida: {}", class.name),
                );
                return Type::Void;
            }
        }

        // Constructor lookup walks the base chain.
        match self.find_method(&class.name, "constructor", span) {
            Some(ctor) => {
                let site = format!("el constructor de {}", class.name);
                self.check_call_args(ErrorCode::New, &site, &ctor.params, &arg_types, span);
            }
            None => {
                if !arg_types.is_empty() {
                    self.report(
                        span,
                        ErrorCode::New,
                        format!("Clase {} no tiene constructor que reciba argumentos", class.name),
                    );
                }
            }
        }

        Type::Class(class.name.clone())
    }

    fn check_unary(&mut self, op: UnOp, operand: &Expr, span: Span) -> Type {
        let operand_t = self.check_expr(operand);
        match op {
            UnOp::Neg if operand_t == Type::Integer => Type::Integer,
            UnOp::Not if operand_t == Type::Boolean => Type::Boolean,
            UnOp::Neg => {
                self.report(
                    span,
                    ErrorCode::Unary,
                    format!("Operador '-' solo válido para integer, no {operand_t}"),
                );
                Type::Void
            }
            UnOp::Not => {
                self.report(
                    span,
                    ErrorCode::Unary,
                    format!("Operador '!' solo válido para boolean, no {operand_t}"),
                );
                Type::Void
            }
        }
    }

    fn check_binary(&mut self, op: BinOp, lhs: &Expr, rhs: &Expr, span: Span) -> Type {
        let lhs_t = self.check_expr(lhs);
        let rhs_t = self.check_expr(rhs);

        let (result, code) = match op {
            BinOp::Add => (addition_type(&lhs_t, &rhs_t), ErrorCode::Add),
            BinOp::Sub => (arithmetic_type(&lhs_t, &rhs_t), ErrorCode::Add),
            BinOp::Mul | BinOp::Div | BinOp::Mod => {
                (arithmetic_type(&lhs_t, &rhs_t), ErrorCode::Mul)
            }
            BinOp::Eq | BinOp::Ne => (equality_type(&lhs_t, &rhs_t), ErrorCode::Eq),
            BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => {
                (ordering_type(&lhs_t, &rhs_t), ErrorCode::Rel)
            }
            BinOp::And => (logical_type(&lhs_t, &rhs_t), ErrorCode::And),
            BinOp::Or => (logical_type(&lhs_t, &rhs_t), ErrorCode::Or),
        };

        match result {
            Some(ty) => ty,
            None => {
                self.report(
                    span,
                    code,
                    format!("No se puede aplicar '{op}' a {lhs_t} y {rhs_t}"),
                );
                Type::Void
            }
        }
    }

    fn check_ternary(&mut self, cond: &Expr, then_expr: &Expr, else_expr: &Expr, span: Span) -> Type {
        let cond_t = self.check_expr(cond);
        if cond_t != Type::Boolean {
            self.report(
                span,
                ErrorCode::Ternary,
                format!("Condición de operador ternario debe ser boolean, no {cond_t}"),
            );
        }
        let then_t = self.check_expr(then_expr);
        let else_t = self.check_expr(else_expr);
        if can_assign(&then_t, &else_t) {
            then_t
        } else if can_assign(&else_t, &then_t) {
            else_t
        } else {
            Type::Void
        }
    }

    fn check_assign(&mut self, target: &Expr, value: &Expr, span: Span) -> Type {
        let target_t = self.check_expr(target);
        let value_t = self.check_expr(value);
        // Writes through a property that did not resolve stay silent, like
        // property reads; the object expression already reported whatever
        // was wrong with it.
        let unresolved_property =
            matches!(target, Expr::Property { .. }) && target_t == Type::Void;
        if !unresolved_property && !can_assign(&target_t, &value_t) {
            self.report(
                span,
                ErrorCode::Assign,
                format!("No se puede asignar {value_t} a {target_t}"),
            );
        }
        target_t
    }

    fn check_property(&mut self, object: &Expr, name: &Ident, span: Span) -> Type {
        let object_t = self.check_expr(object);
        self.property_type(&object_t, &name.name, span)
    }

    /// Field or method type, walking the base chain. Unknown properties
    /// resolve to `void` without a diagnostic.
    fn property_type(&mut self, object_t: &Type, prop: &str, span: Span) -> Type {
        let Type::Class(class_name) = object_t else {
            return Type::Void;
        };
        let mut current = self.resolve_symbol(class_name, span);
        while let Some(Symbol::Class(class)) = current {
            if let Some(field) = class.fields.get(prop) {
                return field.ty.clone();
            }
            if let Some(method) = class.methods.get(prop) {
                return method.ty.clone();
            }
            match &class.base {
                Some(base) => current = self.resolve_symbol(base, span),
                None => break,
            }
        }
        Type::Void
    }

    fn check_index(&mut self, object: &Expr, index: &Expr, span: Span) -> Type {
        let object_t = self.check_expr(object);
        let index_t = self.check_expr(index);

        let mut valid = true;
        if index_t != Type::Integer {
            self.report(
                span,
                ErrorCode::Index,
                format!("Índice debe ser integer, no {index_t}"),
            );
            valid = false;
        }

        match object_t.element_type() {
            Some(elem) if valid => elem,
            Some(_) => Type::Void,
            None => {
                self.report(
                    span,
                    ErrorCode::Index,
                    format!("El objeto {object_t} no es indexable"),
                );
                Type::Void
            }
        }
    }

    fn check_call(&mut self, callee: &Expr, args: &[Expr], span: Span) -> Type {
        let arg_types: Vec<Type> = args.iter().map(|arg| self.check_expr(arg)).collect();

        match callee {
            Expr::Ident(ident) => self.check_free_call(ident, &arg_types, span),
            Expr::Property { object, name, .. } => {
                self.check_method_call(object, name, &arg_types, span)
            }
            other => {
                self.check_expr(other);
                self.report(span, ErrorCode::Call, "Llamada inválida");
                Type::Void
            }
        }
    }

    fn check_free_call(&mut self, ident: &Ident, args: &[Type], span: Span) -> Type {
        let Some(Symbol::Function(func)) = self.resolve_symbol(&ident.name, span) else {
            self.report(
                span,
                ErrorCode::Call,
                format!("{} no es una función", ident.name),
            );
            return Type::Void;
        };

        // Re-enter the declaration environment so captured names stay
        // resolvable during the parameter checks.
        if let Some(closure) = func.closure_scope {
            self.scopes.push_existing(closure);
        }
        self.check_call_args(ErrorCode::Call, &ident.name, &func.params, args, span);
        if func.closure_scope.is_some() {
            self.scopes.pop();
        }

        func.return_type()
    }

    fn check_method_call(&mut self, object: &Expr, method: &Ident, args: &[Type], span: Span) -> Type {
        let object_t = self.check_expr(object);
        let Type::Class(class_name) = object_t else {
            self.report(
                span,
                ErrorCode::Call,
                format!("{object_t} no es un objeto válido"),
            );
            return Type::Void;
        };

        let Some(found) = self.find_method(&class_name, &method.name, span) else {
            self.report(
                span,
                ErrorCode::Call,
                format!("Método {} no definido en {class_name}", method.name),
            );
            return Type::Void;
        };

        let site = format!("{class_name}.{}", method.name);
        self.check_call_args(ErrorCode::Call, &site, &found.params, args, span);
        found.return_type()
    }

    /// Look up a method by name in a class, walking the base chain.
    fn find_method(&mut self, class_name: &str, method: &str, span: Span) -> Option<FuncSymbol> {
        let mut current = self.resolve_symbol(class_name, span);
        while let Some(Symbol::Class(class)) = current {
            if let Some(found) = class.methods.get(method) {
                return Some(found.clone());
            }
            match &class.base {
                Some(base) => current = self.resolve_symbol(base, span),
                None => break,
            }
        }
        None
    }

    /// Arity plus per-argument assignability against the parameter list.
    fn check_call_args(
        &mut self,
        code: ErrorCode,
        site: &str,
        params: &[ParamSymbol],
        args: &[Type],
        span: Span,
    ) {
        if args.len() != params.len() {
            self.report(
                span,
                code,
                format!("Número incorrecto de argumentos en {site}"),
            );
            return;
        }
        for (i, (arg_t, param)) in args.iter().zip(params).enumerate() {
            if !can_assign(&param.ty, arg_t) {
                self.report(
                    span,
                    code,
                    format!(
                        "Argumento {i} incompatible en {site}: {arg_t}, se esperaba {}",
                        param.ty
                    ),
                );
            }
        }
    }
}

impl Default for TypeChecker {
    fn default() -> Self {
        Self::new()
    }
}
