use lexer::parse_int_constant;
use log::trace;
use model::{Block, Stmt, TokenKind};
use crate::declarations::DeclarationParser;
use crate::expressions::ExpressionParser;
use crate::parser::Parser;

/// Statement parsing functionality
pub(crate) trait StatementParser {
    fn parse_stmt(&mut self) -> Result<Stmt, String>;
    /// Parse a `{ ... }` compound statement in a fresh scope.
    fn parse_block(&mut self) -> Result<Block, String>;
    /// Statements up to and including the closing `}`. The caller has
    /// already consumed `{` and owns the scope.
    fn parse_block_body(&mut self) -> Block;
}

impl<'src, 'ctx> StatementParser for Parser<'src, 'ctx> {
    fn parse_block(&mut self) -> Result<Block, String> {
        self.expect(TokenKind::LCurl, "'{'")?;
        self.symbols.push_scope();
        let block = self.parse_block_body();
        self.symbols.pop_scope();
        Ok(block)
    }

    fn parse_block_body(&mut self) -> Block {
        let mut statements = Vec::new();
        while !self.check(TokenKind::RCurl) && !self.is_at_end() {
            match self.parse_stmt() {
                Ok(stmt) => statements.push(stmt),
                Err(message) => self.recover(message),
            }
        }
        if !self.match_token(TokenKind::RCurl) {
            let message = self.unexpected("'}'");
            self.recover(message);
        }
        Block { statements }
    }

    fn parse_stmt(&mut self) -> Result<Stmt, String> {
        self.nested("statement", Self::parse_statement)
    }
}

impl<'src, 'ctx> Parser<'src, 'ctx> {
    fn parse_statement(&mut self) -> Result<Stmt, String> {
        let kind = self.peek().kind;
        // `ID :` starts a label; telling it from an expression takes a second
        // token of lookahead
        let is_label = kind == TokenKind::Id && self.check_at(1, TokenKind::Colon);

        match kind {
            // Empty statement: a lone semicolon
            TokenKind::Semicolon => {
                self.advance();
                Ok(Stmt::Empty)
            }
            TokenKind::LCurl => Ok(Stmt::Block(self.parse_block()?)),
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::While => self.parse_while_stmt(),
            TokenKind::Do => self.parse_do_while_stmt(),
            TokenKind::For => self.parse_for_stmt(),
            TokenKind::Switch => self.parse_switch_stmt(),
            TokenKind::Case => self.parse_case_label(),
            TokenKind::Default => {
                self.advance();
                self.expect(TokenKind::Colon, "':' after 'default'")?;
                Ok(Stmt::Default)
            }
            TokenKind::Break => {
                self.advance();
                self.expect(TokenKind::Semicolon, "';' after 'break'")?;
                Ok(Stmt::Break)
            }
            TokenKind::Continue => {
                self.advance();
                self.expect(TokenKind::Semicolon, "';' after 'continue'")?;
                Ok(Stmt::Continue)
            }
            TokenKind::Goto => {
                self.advance();
                let label = self.expect(TokenKind::Id, "label name after 'goto'")?;
                self.expect(TokenKind::Semicolon, "';'")?;
                Ok(Stmt::Goto(label.lexeme))
            }
            TokenKind::Return => self.parse_return_stmt(),
            TokenKind::Printf => self.parse_print_stmt(),
            _ if kind.is_type_keyword() => Ok(Stmt::Declaration(self.parse_local_declaration()?)),
            _ if is_label => {
                let name = self.advance().lexeme;
                self.advance(); // ':'
                let body = self.parse_stmt()?;
                Ok(Stmt::Label {
                    name,
                    body: Box::new(body),
                })
            }
            _ => {
                let expr = self.parse_expr()?;
                self.expect(TokenKind::Semicolon, "';'")?;
                Ok(Stmt::Expr(expr))
            }
        }
    }

    /// `( expression )` as used by if/while/switch headers
    fn parse_condition(&mut self, keyword: &str) -> Result<model::Expr, String> {
        self.expect(TokenKind::LParen, &format!("'(' after '{}'", keyword))?;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::RParen, "')'")?;
        Ok(cond)
    }

    fn parse_if_stmt(&mut self) -> Result<Stmt, String> {
        trace!("if statement on line {}", self.peek().line);
        self.advance();
        let cond = self.parse_condition("if")?;
        let then_branch = Box::new(self.parse_stmt()?);
        // A dangling else binds to the nearest if
        let else_branch = if self.match_token(TokenKind::Else) {
            Some(Box::new(self.parse_stmt()?))
        } else {
            None
        };
        Ok(Stmt::If {
            cond,
            then_branch,
            else_branch,
        })
    }

    fn parse_while_stmt(&mut self) -> Result<Stmt, String> {
        self.advance();
        let cond = self.parse_condition("while")?;
        let body = Box::new(self.parse_stmt()?);
        Ok(Stmt::While { cond, body })
    }

    fn parse_do_while_stmt(&mut self) -> Result<Stmt, String> {
        self.advance();
        let body = Box::new(self.parse_stmt()?);
        self.expect(TokenKind::While, "'while' after do body")?;
        let cond = self.parse_condition("while")?;
        self.expect(TokenKind::Semicolon, "';' after do-while")?;
        Ok(Stmt::DoWhile { body, cond })
    }

    fn parse_for_stmt(&mut self) -> Result<Stmt, String> {
        self.advance();
        self.expect(TokenKind::LParen, "'(' after 'for'")?;

        let init = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(TokenKind::Semicolon, "';' in for header")?;

        let cond = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(TokenKind::Semicolon, "';' in for header")?;

        let post = if self.check(TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(TokenKind::RParen, "')'")?;

        let body = Box::new(self.parse_stmt()?);
        Ok(Stmt::For {
            init,
            cond,
            post,
            body,
        })
    }

    fn parse_switch_stmt(&mut self) -> Result<Stmt, String> {
        self.advance();
        let cond = self.parse_condition("switch")?;
        let body = Box::new(self.parse_stmt()?);
        Ok(Stmt::Switch { cond, body })
    }

    fn parse_case_label(&mut self) -> Result<Stmt, String> {
        self.advance();
        let negative = if self.check_op(TokenKind::AddOp, "-") {
            self.advance();
            true
        } else {
            false
        };
        let value = self.expect(TokenKind::ConstInt, "integer constant after 'case'")?;
        self.expect(TokenKind::Colon, "':' after case value")?;

        let value = parse_int_constant(&value.lexeme).unwrap_or(i64::MAX);
        Ok(Stmt::Case(if negative { -value } else { value }))
    }

    fn parse_return_stmt(&mut self) -> Result<Stmt, String> {
        self.advance();
        if self.match_token(TokenKind::Semicolon) {
            return Ok(Stmt::Return(None));
        }
        let expr = self.parse_expr()?;
        self.expect(TokenKind::Semicolon, "';' after return value")?;
        Ok(Stmt::Return(Some(expr)))
    }

    fn parse_print_stmt(&mut self) -> Result<Stmt, String> {
        self.advance();
        self.expect(TokenKind::LParen, "'(' after 'printf'")?;
        let args = self.parse_arguments()?;
        self.expect(TokenKind::RParen, "')'")?;
        self.expect(TokenKind::Semicolon, "';'")?;
        Ok(Stmt::Print(args))
    }
}
