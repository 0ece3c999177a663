use log::debug;
use model::TypeSpec;
use std::collections::HashMap;
use std::fmt;

/// Declared type of a symbol: a base type, optionally array-of.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct DeclType {
    pub base: TypeSpec,
    pub array_size: Option<i64>,
}

impl DeclType {
    pub fn scalar(base: TypeSpec) -> Self {
        Self { base, array_size: None }
    }

    pub fn array(base: TypeSpec, size: i64) -> Self {
        Self { base, array_size: Some(size) }
    }

    pub fn is_array(&self) -> bool {
        self.array_size.is_some()
    }
}

impl fmt::Display for DeclType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.array_size {
            Some(n) => write!(f, "{}[{}]", self.base, n),
            None => write!(f, "{}", self.base),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SymbolKind {
    Variable,
    Parameter,
    Function,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub decl_type: DeclType, // return type for functions
    pub depth: usize,
    pub line: usize,
    pub used: bool,
}

/// A name declared twice in the same scope.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Redeclaration {
    pub name: String,
    pub depth: usize,
    pub previous_line: usize,
}

impl fmt::Display for Redeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "redeclaration of '{}' (previously declared on line {})",
            self.name, self.previous_line
        )
    }
}

/// Nested-scope symbol table. Depth 0 is the global scope and is always
/// present; lookups search from the innermost scope outwards so inner
/// declarations shadow outer ones.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    scopes: Vec<HashMap<String, Symbol>>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            scopes: vec![HashMap::new()],
        }
    }

    /// Current scope depth (0 = global)
    pub fn depth(&self) -> usize {
        self.scopes.len() - 1
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
        debug!("entering scope depth {}", self.depth());
    }

    /// Drop the innermost scope and everything declared in it. The global
    /// scope is never popped.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            debug!("leaving scope depth {}", self.depth());
            self.scopes.pop();
        }
    }

    /// Declare `name` in the current scope and return the depth it landed at.
    /// A name already present at this depth is left untouched.
    pub fn insert(
        &mut self,
        name: &str,
        kind: SymbolKind,
        decl_type: DeclType,
        line: usize,
    ) -> Result<usize, Redeclaration> {
        let depth = self.depth();
        let scope = &mut self.scopes[depth];

        if let Some(existing) = scope.get(name) {
            return Err(Redeclaration {
                name: name.to_string(),
                depth,
                previous_line: existing.line,
            });
        }

        debug!("declaring {} '{}' at depth {}", decl_type, name, depth);
        scope.insert(
            name.to_string(),
            Symbol {
                name: name.to_string(),
                kind,
                decl_type,
                depth,
                line,
                used: false,
            },
        );
        Ok(depth)
    }

    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    pub fn lookup_current(&self, name: &str) -> Option<&Symbol> {
        self.scopes.last().and_then(|scope| scope.get(name))
    }

    /// Flag the innermost visible `name` as referenced. Returns false when
    /// nothing by that name is in scope.
    pub fn mark_used(&mut self, name: &str) -> bool {
        for scope in self.scopes.iter_mut().rev() {
            if let Some(symbol) = scope.get_mut(name) {
                symbol.used = true;
                return true;
            }
        }
        false
    }

    /// Symbols declared at `depth`, ordered by declaration line.
    pub fn symbols_in_scope(&self, depth: usize) -> Vec<&Symbol> {
        let mut symbols: Vec<&Symbol> = match self.scopes.get(depth) {
            Some(scope) => scope.values().collect(),
            None => Vec::new(),
        };
        symbols.sort_by(|a, b| a.line.cmp(&b.line).then_with(|| a.name.cmp(&b.name)));
        symbols
    }

    pub fn scope_len(&self, depth: usize) -> usize {
        self.scopes.get(depth).map_or(0, HashMap::len)
    }

    pub fn unused_in_current_scope(&self) -> Vec<&Symbol> {
        self.symbols_in_scope(self.depth())
            .into_iter()
            .filter(|s| !s.used)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_lookup_global() {
        let mut table = SymbolTable::new();
        assert_eq!(table.insert("x", SymbolKind::Variable, DeclType::scalar(TypeSpec::Int), 1), Ok(0));
        let sym = table.lookup("x").expect("x should be declared");
        assert_eq!(sym.depth, 0);
        assert_eq!(sym.decl_type.base, TypeSpec::Int);
        assert!(!sym.used);
    }

    #[test]
    fn duplicate_in_same_scope_keeps_first() {
        let mut table = SymbolTable::new();
        table.insert("x", SymbolKind::Variable, DeclType::scalar(TypeSpec::Int), 1).unwrap();
        let err = table.insert("x", SymbolKind::Variable, DeclType::scalar(TypeSpec::Float), 2).unwrap_err();
        assert_eq!(err.previous_line, 1);
        assert_eq!(err.to_string(), "redeclaration of 'x' (previously declared on line 1)");
        assert_eq!(table.scope_len(0), 1);
        assert_eq!(table.lookup("x").unwrap().decl_type.base, TypeSpec::Int);
    }

    #[test]
    fn inner_scope_shadows_outer() {
        let mut table = SymbolTable::new();
        table.insert("x", SymbolKind::Variable, DeclType::scalar(TypeSpec::Int), 1).unwrap();
        table.push_scope();
        assert_eq!(table.insert("x", SymbolKind::Variable, DeclType::array(TypeSpec::Char, 4), 2), Ok(1));
        assert_eq!(table.lookup("x").unwrap().depth, 1);
        assert!(table.lookup("x").unwrap().decl_type.is_array());

        table.pop_scope();
        assert_eq!(table.depth(), 0);
        assert_eq!(table.lookup("x").unwrap().depth, 0);
    }

    #[test]
    fn global_scope_is_never_popped() {
        let mut table = SymbolTable::new();
        table.insert("g", SymbolKind::Variable, DeclType::scalar(TypeSpec::Double), 1).unwrap();
        table.pop_scope();
        table.pop_scope();
        assert_eq!(table.depth(), 0);
        assert!(table.lookup("g").is_some());
    }

    #[test]
    fn popped_entries_are_unreachable() {
        let mut table = SymbolTable::new();
        table.push_scope();
        table.insert("tmp", SymbolKind::Variable, DeclType::scalar(TypeSpec::Int), 3).unwrap();
        assert!(table.lookup_current("tmp").is_some());
        table.pop_scope();
        assert!(table.lookup("tmp").is_none());
    }

    #[test]
    fn mark_used_hits_innermost() {
        let mut table = SymbolTable::new();
        table.insert("x", SymbolKind::Variable, DeclType::scalar(TypeSpec::Int), 1).unwrap();
        table.push_scope();
        table.insert("x", SymbolKind::Variable, DeclType::scalar(TypeSpec::Int), 2).unwrap();
        table.insert("y", SymbolKind::Variable, DeclType::scalar(TypeSpec::Int), 3).unwrap();
        assert!(table.mark_used("x"));
        assert!(!table.mark_used("nope"));

        let unused: Vec<&str> = table.unused_in_current_scope().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(unused, vec!["y"]);
        table.pop_scope();
        assert!(!table.lookup("x").unwrap().used);
    }

    #[test]
    fn symbols_in_scope_ordered_by_line() {
        let mut table = SymbolTable::new();
        table.insert("b", SymbolKind::Variable, DeclType::scalar(TypeSpec::Int), 2).unwrap();
        table.insert("a", SymbolKind::Variable, DeclType::scalar(TypeSpec::Int), 5).unwrap();
        table.insert("c", SymbolKind::Variable, DeclType::scalar(TypeSpec::Int), 1).unwrap();
        let names: Vec<&str> = table.symbols_in_scope(0).iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["c", "b", "a"]);
        assert!(table.symbols_in_scope(7).is_empty());
    }

    #[test]
    fn decl_type_display() {
        assert_eq!(DeclType::array(TypeSpec::Int, 10).to_string(), "int[10]");
        assert_eq!(DeclType::scalar(TypeSpec::Void).to_string(), "void");
    }
}
