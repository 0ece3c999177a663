use lexer::{float_value_lossy, parse_int_constant};
use model::{BinaryOp, Expr, TokenKind, UnaryOp};
use crate::parser::Parser;

/// Expression parsing functionality using precedence climbing.
///
/// Precedence, lowest first: assignment, `||`, `&&`, equality, relational,
/// additive, multiplicative, unary, postfix.
pub(crate) trait ExpressionParser {
    fn parse_expr(&mut self) -> Result<Expr, String>;
    fn parse_arguments(&mut self) -> Result<Vec<Expr>, String>;
}

impl<'src, 'ctx> ExpressionParser for Parser<'src, 'ctx> {
    fn parse_expr(&mut self) -> Result<Expr, String> {
        // Every parenthesis, subscript and argument list comes back through here
        self.nested("expression", Self::parse_assignment)
    }

    /// Comma-separated arguments up to (not including) the closing ')'
    fn parse_arguments(&mut self) -> Result<Vec<Expr>, String> {
        let mut args = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                args.push(self.parse_expr()?);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        Ok(args)
    }
}

impl<'src, 'ctx> Parser<'src, 'ctx> {
    // Assignment (lowest precedence, right-associative)
    pub(crate) fn parse_assignment(&mut self) -> Result<Expr, String> {
        let left = self.parse_logical_or()?;

        if self.check(TokenKind::AssignOp) {
            if !left.is_lvalue() {
                return Err("left-hand side of '=' is not assignable".to_string());
            }
            self.advance();
            let value = self.parse_expr()?;
            Ok(Expr::Assign {
                target: Box::new(left),
                value: Box::new(value),
            })
        } else {
            Ok(left)
        }
    }

    /// One left-associative binary level: `next (op next)*` where `op` is a
    /// token of `kind` whose lexeme is one of `ops`.
    fn parse_binary_level(
        &mut self,
        kind: TokenKind,
        ops: &[&str],
        next: fn(&mut Self) -> Result<Expr, String>,
    ) -> Result<Expr, String> {
        let mut expr = next(self)?;

        while self.check(kind) && ops.contains(&self.peek().lexeme.as_str()) {
            let token = self.advance();
            let op = BinaryOp::from_lexeme(&token.lexeme)
                .ok_or_else(|| format!("unknown operator '{}'", token.lexeme))?;
            let right = next(self)?;
            expr = Expr::Binary {
                op,
                left: Box::new(expr),
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    // Logical OR
    pub(crate) fn parse_logical_or(&mut self) -> Result<Expr, String> {
        self.parse_binary_level(TokenKind::LogicOp, &["||"], Self::parse_logical_and)
    }

    // Logical AND
    pub(crate) fn parse_logical_and(&mut self) -> Result<Expr, String> {
        self.parse_binary_level(TokenKind::LogicOp, &["&&"], Self::parse_equality)
    }

    // Equality (== !=)
    pub(crate) fn parse_equality(&mut self) -> Result<Expr, String> {
        self.parse_binary_level(TokenKind::RelOp, &["==", "!="], Self::parse_relational)
    }

    // Relational (< <= > >=)
    pub(crate) fn parse_relational(&mut self) -> Result<Expr, String> {
        self.parse_binary_level(TokenKind::RelOp, &["<", "<=", ">", ">="], Self::parse_additive)
    }

    // Additive (+ -)
    pub(crate) fn parse_additive(&mut self) -> Result<Expr, String> {
        self.parse_binary_level(TokenKind::AddOp, &["+", "-"], Self::parse_multiplicative)
    }

    // Multiplicative (* / %)
    pub(crate) fn parse_multiplicative(&mut self) -> Result<Expr, String> {
        self.parse_binary_level(TokenKind::MulOp, &["*", "/", "%"], Self::parse_unary)
    }

    // Unary (! - + ++ --)
    pub(crate) fn parse_unary(&mut self) -> Result<Expr, String> {
        let kind = self.peek().kind;
        let op = match kind {
            TokenKind::Not => Some(UnaryOp::LogicalNot),
            TokenKind::IncOp => Some(UnaryOp::PrefixIncrement),
            TokenKind::DecOp => Some(UnaryOp::PrefixDecrement),
            TokenKind::AddOp if self.peek().lexeme == "-" => Some(UnaryOp::Minus),
            TokenKind::AddOp => {
                // Unary plus leaves its operand unchanged
                self.advance();
                return self.nested("expression", Self::parse_unary);
            }
            _ => None,
        };

        match op {
            Some(op) => {
                self.advance();
                let operand = self.nested("expression", Self::parse_unary)?;
                Ok(Expr::Unary {
                    op,
                    operand: Box::new(operand),
                })
            }
            None => self.parse_postfix(),
        }
    }

    // Postfix ([] () ++ --)
    pub(crate) fn parse_postfix(&mut self) -> Result<Expr, String> {
        // Only a bare name can be called. Parentheses leave no node behind, so
        // `(f)(x)` has to be caught before the primary is parsed.
        let callable = self.check(TokenKind::Id);
        let mut expr = self.parse_primary()?;

        loop {
            if self.match_token(TokenKind::LThird) {
                // Array subscript
                let index = self.parse_expr()?;
                self.expect(TokenKind::RThird, "']'")?;
                expr = Expr::ArrayAccess {
                    base: Box::new(expr),
                    index: Box::new(index),
                };
            } else if self.check(TokenKind::LParen) {
                let name = match expr {
                    Expr::Identifier(name) if callable => name,
                    _ => return Err("called object is not a function name".to_string()),
                };
                self.advance();
                let args = self.parse_arguments()?;
                self.expect(TokenKind::RParen, "')'")?;
                expr = Expr::Call { name, args };
            } else if self.match_token(TokenKind::IncOp) {
                expr = Expr::Unary {
                    op: UnaryOp::PostfixIncrement,
                    operand: Box::new(expr),
                };
            } else if self.match_token(TokenKind::DecOp) {
                expr = Expr::Unary {
                    op: UnaryOp::PostfixDecrement,
                    operand: Box::new(expr),
                };
            } else {
                break;
            }
        }

        Ok(expr)
    }

    // Primary (identifiers, literals, parenthesized expressions)
    pub(crate) fn parse_primary(&mut self) -> Result<Expr, String> {
        let kind = self.peek().kind;
        match kind {
            TokenKind::Id => {
                let token = self.advance();
                self.symbols.mark_used(&token.lexeme);
                Ok(Expr::Identifier(token.lexeme))
            }
            TokenKind::ConstInt => {
                let token = self.advance();
                // Out-of-range constants were already reported by the lexer
                Ok(Expr::Constant(parse_int_constant(&token.lexeme).unwrap_or(i64::MAX)))
            }
            TokenKind::ConstFloat => {
                let token = self.advance();
                Ok(Expr::FloatConstant(float_value_lossy(&token.lexeme)))
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(expr)
            }
            _ => Err(self.unexpected("expression")),
        }
    }
}
