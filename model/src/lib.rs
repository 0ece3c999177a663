mod diagnostics;
mod token;

pub use diagnostics::{AnalysisError, Diagnostic, Diagnostics, Severity};
pub use token::{Token, TokenKind};

use std::fmt;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TypeSpec {
    Int,
    Char,
    Double,
    Void,
    Float,
}

impl TypeSpec {
    pub fn from_token_kind(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Int => Some(TypeSpec::Int),
            TokenKind::Char => Some(TypeSpec::Char),
            TokenKind::Double => Some(TypeSpec::Double),
            TokenKind::Void => Some(TypeSpec::Void),
            TokenKind::Float => Some(TypeSpec::Float),
            _ => None,
        }
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeSpec::Int => "int",
            TypeSpec::Char => "char",
            TypeSpec::Double => "double",
            TypeSpec::Void => "void",
            TypeSpec::Float => "float",
        };
        f.write_str(name)
    }
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct Program {
    pub items: Vec<TopLevel>,
}

impl Program {
    pub fn functions(&self) -> impl Iterator<Item = &FunctionDef> {
        self.items.iter().filter_map(|item| match item {
            TopLevel::Function(f) => Some(f),
            _ => None,
        })
    }

    /// File-scope variable declarations, flattened across declaration lists.
    pub fn globals(&self) -> impl Iterator<Item = &VarDecl> {
        self.items
            .iter()
            .filter_map(|item| match item {
                TopLevel::Declaration(decls) => Some(decls.iter()),
                _ => None,
            })
            .flatten()
    }

    /// Number of nodes in the tree, counting the program itself.
    pub fn node_count(&self) -> usize {
        1 + self
            .items
            .iter()
            .map(|item| match item {
                TopLevel::Declaration(decls) => decls.len(),
                TopLevel::Function(f) => 1 + f.params.len() + f.body.node_count(),
                TopLevel::Block(block) => block.node_count(),
            })
            .sum::<usize>()
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum TopLevel {
    Declaration(Vec<VarDecl>),
    Function(FunctionDef),
    // Free-standing `{ ... }` at file scope
    Block(Block),
}

#[derive(Debug, PartialEq, Clone)]
pub struct FunctionDef {
    pub return_type: TypeSpec,
    pub name: String,
    pub params: Vec<Param>,
    pub body: Block,
    pub line: usize,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Param {
    pub type_spec: TypeSpec,
    pub name: String,
    pub is_array: bool,
    pub line: usize,
}

#[derive(Debug, PartialEq, Clone)]
pub struct VarDecl {
    pub type_spec: TypeSpec,
    pub name: String,
    pub array_size: Option<i64>,
    pub depth: usize, // scope depth the symbol was inserted at
    pub line: usize,
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct Block {
    pub statements: Vec<Stmt>,
}

impl Block {
    pub fn node_count(&self) -> usize {
        1 + self.statements.iter().map(Stmt::node_count).sum::<usize>()
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Stmt {
    If {
        cond: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    While {
        cond: Expr,
        body: Box<Stmt>,
    },
    DoWhile {
        body: Box<Stmt>,
        cond: Expr,
    },
    For {
        init: Option<Expr>,
        cond: Option<Expr>,
        post: Option<Expr>,
        body: Box<Stmt>,
    },
    Switch {
        cond: Expr,
        body: Box<Stmt>,
    },
    Case(i64),
    Default,
    Break,
    Continue,
    Goto(String),
    Return(Option<Expr>),
    Print(Vec<Expr>),
    Expr(Expr),
    Empty,
    Block(Block),
    Label {
        name: String,
        body: Box<Stmt>,
    },
    Declaration(Vec<VarDecl>),
}

impl Stmt {
    pub fn node_count(&self) -> usize {
        let children = match self {
            Stmt::If { cond, then_branch, else_branch } => {
                cond.node_count()
                    + then_branch.node_count()
                    + else_branch.as_ref().map_or(0, |s| s.node_count())
            }
            Stmt::While { cond, body } | Stmt::DoWhile { body, cond } | Stmt::Switch { cond, body } => {
                cond.node_count() + body.node_count()
            }
            Stmt::For { init, cond, post, body } => {
                init.as_ref().map_or(0, Expr::node_count)
                    + cond.as_ref().map_or(0, Expr::node_count)
                    + post.as_ref().map_or(0, Expr::node_count)
                    + body.node_count()
            }
            Stmt::Return(expr) => expr.as_ref().map_or(0, Expr::node_count),
            Stmt::Print(args) => args.iter().map(Expr::node_count).sum(),
            Stmt::Expr(expr) => expr.node_count(),
            // The block statement and its Block are one node
            Stmt::Block(block) => block.node_count() - 1,
            Stmt::Label { body, .. } => body.node_count(),
            Stmt::Declaration(decls) => decls.len(),
            Stmt::Case(_)
            | Stmt::Default
            | Stmt::Break
            | Stmt::Continue
            | Stmt::Goto(_)
            | Stmt::Empty => 0,
        };
        1 + children
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Expr {
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Call {
        name: String,
        args: Vec<Expr>,
    },
    Constant(i64),
    FloatConstant(f64),
    Identifier(String),
    ArrayAccess {
        base: Box<Expr>,
        index: Box<Expr>,
    },
}

impl Expr {
    pub fn node_count(&self) -> usize {
        let children = match self {
            Expr::Binary { left, right, .. } => left.node_count() + right.node_count(),
            Expr::Unary { operand, .. } => operand.node_count(),
            Expr::Assign { target, value } => target.node_count() + value.node_count(),
            Expr::Call { args, .. } => args.iter().map(Expr::node_count).sum(),
            Expr::ArrayAccess { base, index } => base.node_count() + index.node_count(),
            Expr::Constant(_) | Expr::FloatConstant(_) | Expr::Identifier(_) => 0,
        };
        1 + children
    }

    /// Valid left-hand sides of `=`.
    pub fn is_lvalue(&self) -> bool {
        matches!(self, Expr::Identifier(_) | Expr::ArrayAccess { .. })
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    EqualEqual,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    LogicalAnd,
    LogicalOr,
}

impl BinaryOp {
    /// Maps an operator-class token's lexeme to its operator.
    pub fn from_lexeme(lexeme: &str) -> Option<Self> {
        let op = match lexeme {
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Sub,
            "*" => BinaryOp::Mul,
            "/" => BinaryOp::Div,
            "%" => BinaryOp::Mod,
            "==" => BinaryOp::EqualEqual,
            "!=" => BinaryOp::NotEqual,
            "<" => BinaryOp::Less,
            "<=" => BinaryOp::LessEqual,
            ">" => BinaryOp::Greater,
            ">=" => BinaryOp::GreaterEqual,
            "&&" => BinaryOp::LogicalAnd,
            "||" => BinaryOp::LogicalOr,
            _ => return None,
        };
        Some(op)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum UnaryOp {
    Minus,
    LogicalNot,
    PrefixIncrement,
    PrefixDecrement,
    PostfixIncrement,
    PostfixDecrement,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> Box<Expr> {
        Box::new(Expr::Identifier(name.to_string()))
    }

    #[test]
    fn binary_op_from_lexeme() {
        assert_eq!(BinaryOp::from_lexeme("<="), Some(BinaryOp::LessEqual));
        assert_eq!(BinaryOp::from_lexeme("||"), Some(BinaryOp::LogicalOr));
        assert_eq!(BinaryOp::from_lexeme("="), None);
    }

    #[test]
    fn expr_node_count_covers_children() {
        // a = b + 1
        let expr = Expr::Assign {
            target: ident("a"),
            value: Box::new(Expr::Binary {
                op: BinaryOp::Add,
                left: ident("b"),
                right: Box::new(Expr::Constant(1)),
            }),
        };
        assert_eq!(expr.node_count(), 4);
        assert!(!expr.is_lvalue());
        assert!(Expr::Identifier("a".into()).is_lvalue());
    }

    #[test]
    fn program_node_count() {
        let program = Program {
            items: vec![
                TopLevel::Declaration(vec![VarDecl {
                    type_spec: TypeSpec::Int,
                    name: "x".into(),
                    array_size: None,
                    depth: 0,
                    line: 1,
                }]),
                TopLevel::Function(FunctionDef {
                    return_type: TypeSpec::Void,
                    name: "f".into(),
                    params: vec![],
                    body: Block {
                        statements: vec![Stmt::Return(None), Stmt::Block(Block::default())],
                    },
                    line: 2,
                }),
            ],
        };
        // program + decl + function + body + return + inner block
        assert_eq!(program.node_count(), 6);
        assert_eq!(program.globals().count(), 1);
        assert_eq!(program.functions().next().map(|f| f.name.as_str()), Some("f"));
    }

    #[test]
    fn type_spec_from_keyword() {
        assert_eq!(TypeSpec::from_token_kind(TokenKind::Double), Some(TypeSpec::Double));
        assert_eq!(TypeSpec::from_token_kind(TokenKind::Id), None);
        assert_eq!(TypeSpec::Float.to_string(), "float");
    }
}
