use log::{debug, trace};
use model::{Diagnostics, Severity, Token, TokenKind};
use crate::keywords::keyword_or_identifier;
use crate::literals::{classify_number, parse_int_constant, NumberClass};

/// Demand-driven scanner over an in-memory source buffer.
///
/// Each call to [`Lexer::next_token`] skips whitespace and comments and
/// returns the next token. Lexical errors are reported into the caller's
/// [`Diagnostics`] and the offending input is skipped, so the scanner never
/// stops early. Once the input is exhausted every call returns an
/// `EndOfInput` token.
pub struct Lexer<'a> {
    src: &'a str,
    input: &'a [u8],
    pos: usize,
    token_start: usize,
    line: usize,
    line_start: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            src: input,
            input: input.as_bytes(),
            pos: 0,
            token_start: 0,
            line: 1,
            line_start: 0,
        }
    }

    pub fn next_token(&mut self, diagnostics: &mut Diagnostics) -> Token {
        loop {
            self.skip_trivia(diagnostics);

            self.token_start = self.pos;
            let line = self.line;
            let column = self.column();

            if self.is_at_end() {
                return Token::new(TokenKind::EndOfInput, "", line, column);
            }

            let kind = match self.current_char() {
                '0'..='9' => self.lex_number(diagnostics),
                'a'..='z' | 'A'..='Z' | '_' => Some(self.lex_identifier()),
                _ => self.lex_operator_or_punctuation(diagnostics),
            };

            // None means the input was skipped after an error
            if let Some(kind) = kind {
                let token = Token::new(kind, self.current_slice(), line, column);
                trace!("{}:{} {}", line, column, token);
                return token;
            }
        }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn current_char(&self) -> char {
        self.input[self.pos] as char
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.input.get(self.pos + offset).map(|&b| b as char)
    }

    fn column(&self) -> usize {
        self.pos - self.line_start + 1
    }

    fn current_slice(&self) -> &'a str {
        &self.src[self.token_start..self.pos]
    }

    /// Consume one byte, keeping line bookkeeping in sync.
    fn bump(&mut self) {
        if self.input[self.pos] == b'\n' {
            self.line += 1;
            self.line_start = self.pos + 1;
        }
        self.pos += 1;
    }

    fn report(&self, diagnostics: &mut Diagnostics, message: String, line: usize) {
        debug!("lexical error on line {}: {}", line, message);
        diagnostics.report(Severity::Lexical, message, line);
    }

    fn skip_trivia(&mut self, diagnostics: &mut Diagnostics) {
        while !self.is_at_end() {
            match self.current_char() {
                ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c' => self.bump(),
                '/' if self.peek(1) == Some('/') => self.skip_line_comment(),
                '/' if self.peek(1) == Some('*') => self.skip_block_comment(diagnostics),
                _ => break,
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while !self.is_at_end() && self.current_char() != '\n' {
            self.bump();
        }
    }

    fn skip_block_comment(&mut self, diagnostics: &mut Diagnostics) {
        let start_line = self.line;
        self.bump();
        self.bump();

        while !self.is_at_end() {
            if self.current_char() == '*' && self.peek(1) == Some('/') {
                self.bump();
                self.bump();
                return;
            }
            self.bump();
        }

        self.report(diagnostics, "unterminated comment".to_string(), start_line);
    }

    fn consume_digits(&mut self) {
        while !self.is_at_end() && self.current_char().is_ascii_digit() {
            self.bump();
        }
    }

    fn lex_number(&mut self, diagnostics: &mut Diagnostics) -> Option<TokenKind> {
        self.consume_digits();

        // Decimal points are taken greedily so that `1.2.3` is one bad literal
        while !self.is_at_end() && self.current_char() == '.' {
            self.bump();
            self.consume_digits();
        }

        if matches!(self.peek(0), Some('e' | 'E')) {
            let digit_at = if matches!(self.peek(1), Some('+' | '-')) { 2 } else { 1 };
            if self.peek(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                for _ in 0..digit_at {
                    self.bump();
                }
                self.consume_digits();
            }
        }

        let text = self.current_slice();
        let line = self.line;
        match classify_number(text) {
            NumberClass::Int => {
                if let Err(message) = parse_int_constant(text) {
                    self.report(diagnostics, message, line);
                }
                Some(TokenKind::ConstInt)
            }
            NumberClass::Float => Some(TokenKind::ConstFloat),
            NumberClass::TooManyDecimalPoints => {
                self.report(diagnostics, format!("too many decimal points in number '{}'", text), line);
                Some(TokenKind::ConstFloat)
            }
            NumberClass::IllFormed => {
                self.report(diagnostics, format!("ill-formed number '{}'", text), line);
                Some(TokenKind::ConstFloat)
            }
        }
    }

    fn lex_identifier(&mut self) -> TokenKind {
        while !self.is_at_end() {
            match self.current_char() {
                'a'..='z' | 'A'..='Z' | '0'..='9' | '_' => self.bump(),
                _ => break,
            }
        }

        keyword_or_identifier(self.current_slice())
    }

    fn lex_operator_or_punctuation(&mut self, diagnostics: &mut Diagnostics) -> Option<TokenKind> {
        let ch = self.current_char();
        let next = self.peek(1);

        // Two-character operators win over their one-character prefixes
        let two_char_kind = match (ch, next) {
            ('+', Some('+')) => Some(TokenKind::IncOp),
            ('-', Some('-')) => Some(TokenKind::DecOp),
            ('<', Some('=')) | ('>', Some('=')) | ('=', Some('=')) | ('!', Some('=')) => {
                Some(TokenKind::RelOp)
            }
            ('&', Some('&')) | ('|', Some('|')) => Some(TokenKind::LogicOp),
            _ => None,
        };

        if let Some(kind) = two_char_kind {
            self.bump();
            self.bump();
            return Some(kind);
        }

        let kind = match ch {
            '+' | '-' => TokenKind::AddOp,
            '*' | '/' | '%' => TokenKind::MulOp,
            '<' | '>' => TokenKind::RelOp,
            '=' => TokenKind::AssignOp,
            '!' => TokenKind::Not,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LCurl,
            '}' => TokenKind::RCurl,
            '[' => TokenKind::LThird,
            ']' => TokenKind::RThird,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            ':' => TokenKind::Colon,
            _ => {
                // Skip the whole character, which may span several bytes
                let line = self.line;
                let bad = self.src[self.pos..].chars().next().unwrap_or(ch);
                for _ in 0..bad.len_utf8() {
                    self.bump();
                }
                self.report(diagnostics, format!("unrecognized character '{}'", bad), line);
                return None;
            }
        };

        self.bump();
        Some(kind)
    }
}
