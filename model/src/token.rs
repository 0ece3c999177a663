use std::fmt;

/// Terminal categories of the grammar. Operator classes group several
/// operators; the concrete operator is kept in [`Token::lexeme`].
#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
pub enum TokenKind {
    // Keywords
    If,
    Else,
    For,
    While,
    Do,
    Switch,
    Case,
    Default,
    Break,
    Continue,
    Goto,
    Return,
    Int,
    Char,
    Double,
    Void,
    Float,
    Printf,
    // Operator classes
    AddOp,    // + -
    MulOp,    // * / %
    RelOp,    // < <= > >= == !=
    AssignOp, // =
    LogicOp,  // && ||
    Not,      // !
    // Punctuation
    LParen,
    RParen,
    LCurl,
    RCurl,
    LThird,
    RThird,
    Comma,
    Semicolon,
    Colon,
    // Identifiers and literals
    Id,
    ConstInt,
    ConstFloat,
    IncOp, // ++
    DecOp, // --
    EndOfInput,
}

impl TokenKind {
    /// Token number used by the yacc grammar this language was defined with.
    pub fn code(self) -> u16 {
        use TokenKind::*;
        match self {
            EndOfInput => 0,
            If => 258,
            Else => 259,
            For => 260,
            While => 261,
            Do => 262,
            Switch => 263,
            Case => 264,
            Default => 265,
            Break => 266,
            Continue => 267,
            Goto => 268,
            Return => 269,
            Int => 270,
            Char => 271,
            Double => 272,
            Void => 273,
            Float => 274,
            Printf => 275,
            AddOp => 276,
            MulOp => 277,
            RelOp => 278,
            AssignOp => 279,
            LogicOp => 280,
            Not => 281,
            LParen => 282,
            RParen => 283,
            LCurl => 284,
            RCurl => 285,
            LThird => 286,
            RThird => 287,
            Comma => 288,
            Semicolon => 289,
            Colon => 290,
            Id => 291,
            ConstInt => 292,
            ConstFloat => 293,
            IncOp => 294,
            DecOp => 295,
        }
    }

    pub fn name(self) -> &'static str {
        use TokenKind::*;
        match self {
            If => "IF",
            Else => "ELSE",
            For => "FOR",
            While => "WHILE",
            Do => "DO",
            Switch => "SWITCH",
            Case => "CASE",
            Default => "DEFAULT",
            Break => "BREAK",
            Continue => "CONTINUE",
            Goto => "GOTO",
            Return => "RETURN",
            Int => "INT",
            Char => "CHAR",
            Double => "DOUBLE",
            Void => "VOID",
            Float => "FLOAT",
            Printf => "PRINTF",
            AddOp => "ADDOP",
            MulOp => "MULOP",
            RelOp => "RELOP",
            AssignOp => "ASSIGNOP",
            LogicOp => "LOGICOP",
            Not => "NOT",
            LParen => "LPAREN",
            RParen => "RPAREN",
            LCurl => "LCURL",
            RCurl => "RCURL",
            LThird => "LTHIRD",
            RThird => "RTHIRD",
            Comma => "COMMA",
            Semicolon => "SEMICOLON",
            Colon => "COLON",
            Id => "ID",
            ConstInt => "CONST_INT",
            ConstFloat => "CONST_FLOAT",
            IncOp => "INCOP",
            DecOp => "DECOP",
            EndOfInput => "EOF",
        }
    }

    pub fn is_type_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::Int | TokenKind::Char | TokenKind::Double | TokenKind::Void | TokenKind::Float
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize, column: usize) -> Self {
        Token {
            kind,
            lexeme: lexeme.into(),
            line,
            column,
        }
    }

    /// True when the token is of `kind` and carries exactly `lexeme`,
    /// e.g. `is_op(TokenKind::RelOp, "<=")`.
    pub fn is_op(&self, kind: TokenKind, lexeme: &str) -> bool {
        self.kind == kind && self.lexeme == lexeme
    }

    pub fn is_end(&self) -> bool {
        self.kind == TokenKind::EndOfInput
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_end() {
            write!(f, "<EOF>")
        } else {
            write!(f, "<{}, {}>", self.kind.name(), self.lexeme)
        }
    }
}
