//! Lexical scopes and the scope stack.
//!
//! Scopes form a tree rooted at the global scope. The tree is stored in an
//! arena owned by [`ScopeStack`]; a [`ScopeId`] is an index into that arena,
//! so `parent` links and function `closure_scope` references are plain
//! back-references and cannot form ownership cycles.
//!
//! The stack itself is a separate list of ids: pushing appends, popping
//! removes from the stack only. The arena keeps every scope alive, which is
//! what lets closure scopes be re-entered during call checking and lets the
//! driver render the scope tree after analysis.

use indexmap::IndexMap;

use crate::symbols::Symbol;
use crate::types::Type;

/// Index of a scope in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(u32);

impl ScopeId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Kind of scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// Root scope; parent = none
    Global,
    /// Compound statement
    Block,
    /// Function body
    Function,
    /// Class body
    Class,
    /// Loop body (statement-context queries only)
    Loop,
    /// Switch body (statement-context queries only)
    Switch,
    /// Catch handler
    Catch,
}

impl ScopeKind {
    /// Lowercase label used in symbol-table output.
    pub const fn as_str(self) -> &'static str {
        match self {
            ScopeKind::Global => "global",
            ScopeKind::Block => "block",
            ScopeKind::Function => "function",
            ScopeKind::Class => "class",
            ScopeKind::Loop => "loop",
            ScopeKind::Switch => "switch",
            ScopeKind::Catch => "catch",
        }
    }
}

/// One lexical scope: a name→symbol map chained to a parent.
#[derive(Debug)]
pub struct Scope {
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    symbols: IndexMap<String, Symbol>,
    /// Declared return type; function scopes only.
    pub return_type: Option<Type>,
    /// Function or class name; named scopes only.
    pub name: Option<String>,
    /// Whether a `return` was observed; function scopes only.
    pub has_return: bool,
}

impl Scope {
    fn new(kind: ScopeKind, parent: Option<ScopeId>) -> Self {
        Self {
            kind,
            parent,
            symbols: IndexMap::new(),
            return_type: None,
            name: None,
            has_return: false,
        }
    }

    /// Register `sym` in this scope.
    ///
    /// Returns `false` if the name already exists *in this scope*
    /// (redeclaration); shadowing an outer scope is allowed and succeeds.
    pub fn define(&mut self, sym: Symbol) -> bool {
        if self.symbols.contains_key(sym.name()) {
            return false;
        }
        self.symbols.insert(sym.name().to_string(), sym);
        true
    }

    /// Look up a name in this scope only (no parent walk).
    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    /// Symbols in declaration order.
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Arena of scopes plus the active stack.
///
/// The stack is never empty after construction: the root `global` scope is
/// created up front. `current`/`pop` fail hard on an empty stack, which can
/// only happen through unbalanced `pop` calls, a walker bug.
#[derive(Debug)]
pub struct ScopeStack {
    arena: Vec<Scope>,
    stack: Vec<ScopeId>,
}

impl ScopeStack {
    /// Create a stack holding the root global scope.
    pub fn new() -> Self {
        let mut stack = Self {
            arena: Vec::new(),
            stack: Vec::new(),
        };
        let root = stack.alloc(Scope::new(ScopeKind::Global, None));
        stack.stack.push(root);
        stack
    }

    fn alloc(&mut self, scope: Scope) -> ScopeId {
        let id = ScopeId(self.arena.len() as u32);
        self.arena.push(scope);
        id
    }

    /// The root global scope's id.
    pub fn global_id(&self) -> ScopeId {
        ScopeId(0)
    }

    /// The root global scope.
    pub fn global(&self) -> &Scope {
        &self.arena[0]
    }

    /// Read a scope by id.
    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.arena[id.index()]
    }

    /// Children of a scope, in creation order.
    pub fn children_of(&self, id: ScopeId) -> Vec<ScopeId> {
        (0..self.arena.len() as u32)
            .map(ScopeId)
            .filter(|child| self.arena[child.index()].parent == Some(id))
            .collect()
    }

    /// Current stack depth.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Id of the scope on top of the stack.
    pub fn current_id(&self) -> ScopeId {
        *self
            .stack
            .last()
            .expect("pila de scopes vacía: push(global) antes de usarla")
    }

    /// The scope on top of the stack.
    pub fn current(&self) -> &Scope {
        &self.arena[self.current_id().index()]
    }

    pub fn current_mut(&mut self) -> &mut Scope {
        let id = self.current_id();
        &mut self.arena[id.index()]
    }

    /// Create a scope of `kind` under the current top and enter it.
    pub fn push(&mut self, kind: ScopeKind) -> ScopeId {
        let parent = self.stack.last().copied();
        let id = self.alloc(Scope::new(kind, parent));
        self.stack.push(id);
        id
    }

    /// Create and enter a function scope carrying its return type and name.
    pub fn push_function(&mut self, ret: Type, name: &str) -> ScopeId {
        let id = self.push(ScopeKind::Function);
        let scope = &mut self.arena[id.index()];
        scope.return_type = Some(ret);
        scope.name = Some(name.to_string());
        id
    }

    /// Create and enter a class scope carrying its class name.
    pub fn push_class(&mut self, name: &str) -> ScopeId {
        let id = self.push(ScopeKind::Class);
        self.arena[id.index()].name = Some(name.to_string());
        id
    }

    /// Re-enter an existing scope (a closure's declaration environment).
    ///
    /// Resolution from the top of the stack then walks that scope's own
    /// parent chain, i.e. the chain captured at declaration time.
    pub fn push_existing(&mut self, id: ScopeId) {
        assert!(
            id.index() < self.arena.len(),
            "scope fuera del arena: {id:?}"
        );
        self.stack.push(id);
    }

    /// Leave the current scope. The scope stays alive in the arena.
    pub fn pop(&mut self) -> ScopeId {
        self.stack.pop().expect("pop en pila de scopes vacía")
    }

    /// True iff any scope on the stack, innermost outward, has `kind`.
    pub fn inside(&self, kind: ScopeKind) -> bool {
        self.stack
            .iter()
            .rev()
            .any(|id| self.arena[id.index()].kind == kind)
    }

    /// Name of the innermost function scope on the stack, if any.
    pub fn enclosing_function_name(&self) -> Option<&str> {
        self.stack
            .iter()
            .rev()
            .map(|id| &self.arena[id.index()])
            .find(|scope| scope.kind == ScopeKind::Function)
            .and_then(|scope| scope.name.as_deref())
    }

    /// Mark the innermost function scope as having observed a `return`.
    pub fn mark_return(&mut self) {
        let target = self
            .stack
            .iter()
            .rev()
            .copied()
            .find(|id| self.arena[id.index()].kind == ScopeKind::Function);
        if let Some(id) = target {
            self.arena[id.index()].has_return = true;
        }
    }

    /// Define `sym` in the current scope; false on redeclaration.
    pub fn define(&mut self, sym: Symbol) -> bool {
        self.current_mut().define(sym)
    }

    /// Resolve `name` from the current scope outward through parents.
    pub fn resolve(&self, name: &str) -> Option<&Symbol> {
        let mut id = Some(self.current_id());
        while let Some(scope_id) = id {
            let scope = &self.arena[scope_id.index()];
            if let Some(sym) = scope.get(name) {
                return Some(sym);
            }
            id = scope.parent;
        }
        None
    }

    /// Like [`resolve`](Self::resolve), but yields the symbol mutably.
    pub fn resolve_mut(&mut self, name: &str) -> Option<&mut Symbol> {
        let mut id = Some(self.current_id());
        let mut found = None;
        while let Some(scope_id) = id {
            let scope = &self.arena[scope_id.index()];
            if scope.contains(name) {
                found = Some(scope_id);
                break;
            }
            id = scope.parent;
        }
        let scope_id = found?;
        self.arena[scope_id.index()].symbols.get_mut(name)
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::VarSymbol;
    use brioc_util::Span;

    fn var(name: &str) -> Symbol {
        Symbol::Variable(VarSymbol {
            name: name.into(),
            ty: Type::Integer,
            is_const: false,
            is_initialized: false,
            span: Span::DUMMY,
        })
    }

    #[test]
    fn test_root_is_global() {
        let scopes = ScopeStack::new();
        assert_eq!(scopes.current().kind, ScopeKind::Global);
        assert_eq!(scopes.depth(), 1);
    }

    #[test]
    fn test_define_and_resolve_basic() {
        let mut scopes = ScopeStack::new();
        assert!(scopes.define(var("x")));
        assert!(scopes.resolve("x").is_some());
        assert!(scopes.resolve("y").is_none());
    }

    #[test]
    fn test_redeclaration_same_scope_fails() {
        let mut scopes = ScopeStack::new();
        assert!(scopes.define(var("x")));
        assert!(!scopes.define(var("x")));
    }

    #[test]
    fn test_shadowing_in_child_scope_ok() {
        let mut scopes = ScopeStack::new();
        assert!(scopes.define(var("x")));
        scopes.push(ScopeKind::Block);
        // Shadowing the outer scope is allowed.
        assert!(scopes.define(Symbol::Variable(VarSymbol {
            name: "x".into(),
            ty: Type::String,
            is_const: false,
            is_initialized: false,
            span: Span::DUMMY,
        })));

        // Resolution in the child finds the child's symbol first.
        assert_eq!(scopes.resolve("x").unwrap().ty(), &Type::String);
        scopes.pop();
        assert_eq!(scopes.resolve("x").unwrap().ty(), &Type::Integer);
    }

    #[test]
    fn test_cascading_resolution_parent_visible_in_child() {
        let mut scopes = ScopeStack::new();
        assert!(scopes.define(var("z")));
        scopes.push(ScopeKind::Block);
        assert!(scopes.resolve("z").is_some());
    }

    #[test]
    fn test_no_cross_resolution_between_siblings() {
        let mut scopes = ScopeStack::new();
        scopes.push(ScopeKind::Block);
        assert!(scopes.define(var("x")));
        scopes.pop();
        scopes.push(ScopeKind::Block);
        assert!(scopes.resolve("x").is_none());
    }

    #[test]
    fn test_function_scope_records_ret_and_name() {
        let mut scopes = ScopeStack::new();
        scopes.push_function(Type::Void, "f");
        assert_eq!(scopes.current().kind, ScopeKind::Function);
        assert_eq!(scopes.current().return_type, Some(Type::Void));
        assert_eq!(scopes.current().name.as_deref(), Some("f"));
        assert!(!scopes.current().has_return);
        assert_eq!(scopes.enclosing_function_name(), Some("f"));

        scopes.mark_return();
        assert!(scopes.current().has_return);

        scopes.pop();
        assert_eq!(scopes.current().kind, ScopeKind::Global);
    }

    #[test]
    fn test_class_scope_records_name() {
        let mut scopes = ScopeStack::new();
        scopes.push_class("C");
        assert_eq!(scopes.current().kind, ScopeKind::Class);
        assert_eq!(scopes.current().name.as_deref(), Some("C"));
        scopes.pop();
        assert_eq!(scopes.current().kind, ScopeKind::Global);
    }

    #[test]
    fn test_inside_scans_whole_stack() {
        let mut scopes = ScopeStack::new();
        scopes.push(ScopeKind::Loop);
        scopes.push(ScopeKind::Switch);
        assert!(scopes.inside(ScopeKind::Loop));
        assert!(scopes.inside(ScopeKind::Switch));
        assert!(scopes.inside(ScopeKind::Global));
        assert!(!scopes.inside(ScopeKind::Catch));
        scopes.pop();
        scopes.pop();
        assert!(!scopes.inside(ScopeKind::Loop));
    }

    #[test]
    fn test_push_existing_resolves_captured_chain() {
        let mut scopes = ScopeStack::new();
        assert!(scopes.define(var("captured")));
        let declaration_site = scopes.push(ScopeKind::Function);
        scopes.pop();

        // Enter an unrelated sibling scope, then re-enter the closure scope.
        scopes.push(ScopeKind::Block);
        assert!(scopes.define(var("local")));
        scopes.push_existing(declaration_site);
        assert!(scopes.resolve("captured").is_some());
        // The captured chain does not see the caller's locals.
        assert!(scopes.resolve("local").is_none());
        scopes.pop();
        assert!(scopes.resolve("local").is_some());
    }

    #[test]
    fn test_arena_retains_popped_scopes() {
        let mut scopes = ScopeStack::new();
        let id = scopes.push(ScopeKind::Loop);
        scopes.define(var("i"));
        scopes.pop();
        assert_eq!(scopes.get(id).kind, ScopeKind::Loop);
        assert!(scopes.get(id).get("i").is_some());
        assert_eq!(scopes.children_of(scopes.global_id()), vec![id]);
    }

    #[test]
    fn test_resolve_mut_reaches_outer_scope() {
        let mut scopes = ScopeStack::new();
        scopes.define(var("x"));
        scopes.push(ScopeKind::Block);
        let Some(Symbol::Variable(sym)) = scopes.resolve_mut("x") else {
            panic!("expected variable");
        };
        sym.is_initialized = true;
        scopes.pop();
        let Some(Symbol::Variable(sym)) = scopes.resolve("x") else {
            panic!("expected variable");
        };
        assert!(sym.is_initialized);
    }

    #[test]
    #[should_panic]
    fn test_pop_on_empty_stack_fails_hard() {
        let mut scopes = ScopeStack::new();
        scopes.pop();
        scopes.pop();
    }
}
