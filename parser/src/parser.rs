use lexer::Lexer;
use log::debug;
use model::{Diagnostics, Severity, Token, TokenKind};
use semantic::{DeclType, SymbolKind, SymbolTable};
use std::collections::VecDeque;

/// Statement and expression nesting allowed before the parser gives up on
/// a construct. Keeps recursion well inside the default thread stack.
const MAX_NESTING: usize = 64;

/// Core parser struct that maintains parsing state.
///
/// Tokens are pulled from the lexer only when the grammar needs them. The
/// lookahead buffer always holds at least one token, so `peek` never has to
/// touch the lexer.
pub(crate) struct Parser<'src, 'ctx> {
    lexer: Lexer<'src>,
    lookahead: VecDeque<Token>,
    depth: usize,
    pub(crate) symbols: &'ctx mut SymbolTable,
    pub(crate) diagnostics: &'ctx mut Diagnostics,
}

impl<'src, 'ctx> Parser<'src, 'ctx> {
    pub fn new(
        lexer: Lexer<'src>,
        symbols: &'ctx mut SymbolTable,
        diagnostics: &'ctx mut Diagnostics,
    ) -> Self {
        let mut parser = Parser {
            lexer,
            lookahead: VecDeque::new(),
            depth: 0,
            symbols,
            diagnostics,
        };
        parser.fill(1);
        parser
    }

    /// Make sure at least `n` tokens are buffered.
    fn fill(&mut self, n: usize) {
        while self.lookahead.len() < n {
            if self.lookahead.back().is_some_and(Token::is_end) {
                break;
            }
            let token = self.lexer.next_token(self.diagnostics);
            self.lookahead.push_back(token);
        }
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.peek().is_end()
    }

    pub(crate) fn peek(&self) -> &Token {
        // `fill` keeps the buffer non-empty
        &self.lookahead[0]
    }

    /// Token `offset` positions ahead (0 = current). Past the end of input
    /// this keeps returning the end marker.
    pub(crate) fn peek_at(&mut self, offset: usize) -> &Token {
        self.fill(offset + 1);
        let idx = offset.min(self.lookahead.len() - 1);
        &self.lookahead[idx]
    }

    /// Consume the current token. The end marker is never consumed.
    pub(crate) fn advance(&mut self) -> Token {
        if self.is_at_end() {
            return self.peek().clone();
        }
        let token = self.lookahead.pop_front();
        self.fill(1);
        token.unwrap_or_else(|| self.peek().clone())
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    pub(crate) fn check_op(&self, kind: TokenKind, lexeme: &str) -> bool {
        self.peek().is_op(kind, lexeme)
    }

    pub(crate) fn check_at(&mut self, offset: usize, kind: TokenKind) -> bool {
        self.peek_at(offset).kind == kind
    }

    pub(crate) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token, String> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(expected))
        }
    }

    /// Error message for the current token not being what the grammar wants
    pub(crate) fn unexpected(&self, expected: &str) -> String {
        format!("expected {}, found {}", expected, describe(self.peek()))
    }

    /// Run `parse` one nesting level deeper. Past `MAX_NESTING` the
    /// construct at the current token is skipped and reported as an error.
    pub(crate) fn nested<T>(
        &mut self,
        what: &str,
        parse: impl FnOnce(&mut Self) -> Result<T, String>,
    ) -> Result<T, String> {
        if self.depth >= MAX_NESTING {
            self.skip_group();
            return Err(format!("{} nested too deeply", what));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    /// Consume the current token, or the whole bracketed group it opens.
    fn skip_group(&mut self) {
        let mut open = 0usize;
        loop {
            match self.peek().kind {
                TokenKind::EndOfInput => break,
                TokenKind::LParen | TokenKind::LThird | TokenKind::LCurl => open += 1,
                TokenKind::RParen | TokenKind::RThird | TokenKind::RCurl => {
                    open = open.saturating_sub(1)
                }
                _ => {}
            }
            self.advance();
            if open == 0 {
                break;
            }
        }
    }

    /// Record a syntax error at the current token and skip to the next
    /// statement boundary: past a `;`, or up to a `{` / `}`.
    pub(crate) fn recover(&mut self, message: String) {
        let line = self.peek().line;
        debug!("syntax error on line {}: {}", line, message);
        self.diagnostics.report(Severity::Syntax, message, line);

        loop {
            match self.peek().kind {
                TokenKind::EndOfInput | TokenKind::LCurl | TokenKind::RCurl => break,
                TokenKind::Semicolon => {
                    self.advance();
                    break;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Insert a declaration into the current scope, reporting a duplicate as
    /// a semantic error. Returns the depth the name belongs to.
    pub(crate) fn declare(&mut self, name: &str, kind: SymbolKind, decl_type: DeclType, line: usize) -> usize {
        match self.symbols.insert(name, kind, decl_type, line) {
            Ok(depth) => depth,
            Err(redeclaration) => {
                debug!("semantic error on line {}: {}", line, redeclaration);
                self.diagnostics.report(Severity::Semantic, redeclaration.to_string(), line);
                redeclaration.depth
            }
        }
    }
}

/// Human-readable form of a token for error messages
pub(crate) fn describe(token: &Token) -> String {
    if token.is_end() {
        "end of input".to_string()
    } else {
        format!("'{}'", token.lexeme)
    }
}
