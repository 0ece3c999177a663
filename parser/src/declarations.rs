use lexer::parse_int_constant;
use log::{debug, trace};
use model::{FunctionDef, Param, Program, Token, TokenKind, TopLevel, TypeSpec, VarDecl};
use semantic::{DeclType, SymbolKind};
use crate::parser::Parser;
use crate::statements::StatementParser;

pub(crate) trait DeclarationParser {
    /// Parse the whole translation unit. Never fails: every error is
    /// recorded in the diagnostics and parsing resumes at the next item.
    fn parse_program(&mut self) -> Program;
    /// `type declarator (, declarator)* ;` inside a block
    fn parse_local_declaration(&mut self) -> Result<Vec<VarDecl>, String>;
}

impl<'src, 'ctx> DeclarationParser for Parser<'src, 'ctx> {
    fn parse_program(&mut self) -> Program {
        let mut items = Vec::new();

        while !self.is_at_end() {
            let kind = self.peek().kind;
            match kind {
                TokenKind::RCurl => {
                    let message = self.unexpected("declaration or function definition");
                    self.recover(message);
                    // recover stops in front of braces
                    self.advance();
                }
                TokenKind::LCurl => match self.parse_block() {
                    Ok(block) => items.push(TopLevel::Block(block)),
                    Err(message) => self.recover(message),
                },
                _ => match self.parse_top_level_item() {
                    Ok(item) => items.push(item),
                    Err(message) => self.recover(message),
                },
            }
        }

        debug!("parsed {} top-level items", items.len());
        Program { items }
    }

    fn parse_local_declaration(&mut self) -> Result<Vec<VarDecl>, String> {
        let type_spec = self.parse_type_specifier("type specifier")?;
        let name = self.expect(TokenKind::Id, "identifier")?;
        self.parse_declarators(type_spec, name)
    }
}

impl<'src, 'ctx> Parser<'src, 'ctx> {
    fn parse_type_specifier(&mut self, expected: &str) -> Result<TypeSpec, String> {
        match TypeSpec::from_token_kind(self.peek().kind) {
            Some(type_spec) => {
                self.advance();
                Ok(type_spec)
            }
            None => Err(self.unexpected(expected)),
        }
    }

    /// A global declaration or a function definition; both start with
    /// `type ID`, the next token decides which.
    fn parse_top_level_item(&mut self) -> Result<TopLevel, String> {
        let type_spec = self.parse_type_specifier("declaration or function definition")?;
        let name = self.expect(TokenKind::Id, "identifier")?;

        if self.check(TokenKind::LParen) {
            Ok(TopLevel::Function(self.parse_function(type_spec, name)?))
        } else {
            Ok(TopLevel::Declaration(self.parse_declarators(type_spec, name)?))
        }
    }

    /// Declarators after `type ID` has been consumed, through the final `;`.
    /// Each name is entered into the current scope as soon as it is seen.
    fn parse_declarators(&mut self, type_spec: TypeSpec, first: Token) -> Result<Vec<VarDecl>, String> {
        let mut decls = Vec::new();
        let mut name = first;

        loop {
            let array_size = if self.match_token(TokenKind::LThird) {
                let size = self.expect(TokenKind::ConstInt, "array size")?;
                self.expect(TokenKind::RThird, "']'")?;
                Some(parse_int_constant(&size.lexeme).unwrap_or(i64::MAX))
            } else {
                None
            };

            let decl_type = match array_size {
                Some(size) => DeclType::array(type_spec, size),
                None => DeclType::scalar(type_spec),
            };
            let depth = self.declare(&name.lexeme, SymbolKind::Variable, decl_type, name.line);
            trace!("declarator '{}' at depth {}", name.lexeme, depth);

            decls.push(VarDecl {
                type_spec,
                name: name.lexeme,
                array_size,
                depth,
                line: name.line,
            });

            if !self.match_token(TokenKind::Comma) {
                break;
            }
            name = self.expect(TokenKind::Id, "identifier")?;
        }

        self.expect(TokenKind::Semicolon, "';'")?;
        Ok(decls)
    }

    fn parse_function(&mut self, return_type: TypeSpec, name: Token) -> Result<FunctionDef, String> {
        debug!("function '{}' on line {}", name.lexeme, name.line);
        self.expect(TokenKind::LParen, "'('")?;
        let params = self.parse_params()?;
        self.expect(TokenKind::RParen, "')'")?;
        self.expect(TokenKind::LCurl, "'{'")?;

        // Nothing is declared until the header is complete. The name goes in
        // before the body so recursive calls resolve.
        self.declare(&name.lexeme, SymbolKind::Function, DeclType::scalar(return_type), name.line);

        // Parameters and body share one scope
        self.symbols.push_scope();
        for param in &params {
            // Unsized parameter arrays are recorded with size 0
            let decl_type = if param.is_array {
                DeclType::array(param.type_spec, 0)
            } else {
                DeclType::scalar(param.type_spec)
            };
            self.declare(&param.name, SymbolKind::Parameter, decl_type, param.line);
        }
        let body = self.parse_block_body();
        self.symbols.pop_scope();

        Ok(FunctionDef {
            return_type,
            name: name.lexeme,
            params,
            body,
            line: name.line,
        })
    }

    fn parse_params(&mut self) -> Result<Vec<Param>, String> {
        let mut params = Vec::new();

        // `()` and `(void)` both mean no parameters
        if self.check(TokenKind::RParen) {
            return Ok(params);
        }
        if self.check(TokenKind::Void) && self.check_at(1, TokenKind::RParen) {
            self.advance();
            return Ok(params);
        }

        loop {
            let type_spec = self.parse_type_specifier("parameter type")?;
            let name = self.expect(TokenKind::Id, "parameter name")?;
            let is_array = if self.match_token(TokenKind::LThird) {
                self.expect(TokenKind::RThird, "']'")?;
                true
            } else {
                false
            };

            params.push(Param {
                type_spec,
                name: name.lexeme,
                is_array,
                line: name.line,
            });

            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }

        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexer::Lexer;
    use model::{Diagnostics, Severity};
    use semantic::SymbolTable;

    fn parse_program_str(src: &str) -> (Program, Diagnostics, SymbolTable) {
        let mut symbols = SymbolTable::new();
        let mut diagnostics = Diagnostics::new();
        let program = {
            let mut parser = Parser::new(Lexer::new(src), &mut symbols, &mut diagnostics);
            parser.parse_program()
        };
        (program, diagnostics, symbols)
    }

    #[test]
    fn global_declaration_list() {
        let (program, diagnostics, symbols) = parse_program_str("int a, b[10]; float c;");
        assert!(diagnostics.is_empty());
        let globals: Vec<&VarDecl> = program.globals().collect();
        assert_eq!(globals.len(), 3);
        assert_eq!(globals[1].array_size, Some(10));
        assert_eq!(globals[2].type_spec, TypeSpec::Float);
        assert_eq!(symbols.scope_len(0), 3);
        assert_eq!(symbols.lookup("b").unwrap().decl_type, DeclType::array(TypeSpec::Int, 10));
    }

    #[test]
    fn function_with_params() {
        let (program, diagnostics, symbols) = parse_program_str("int add(int a, int b[]) { return a; }");
        assert!(diagnostics.is_empty(), "{:?}", diagnostics.all());
        let func = program.functions().next().unwrap();
        assert_eq!(func.name, "add");
        assert_eq!(func.params.len(), 2);
        assert!(func.params[1].is_array);
        assert_eq!(func.body.statements.len(), 1);

        // Parameters go away with the function scope
        assert_eq!(symbols.lookup("add").unwrap().kind, SymbolKind::Function);
        assert!(symbols.lookup("a").is_none());
    }

    #[test]
    fn void_parameter_list_is_empty() {
        let (program, diagnostics, _) = parse_program_str("void f(void) { }");
        assert!(diagnostics.is_empty());
        assert!(program.functions().next().unwrap().params.is_empty());
    }

    #[test]
    fn local_shadowing_param_name_is_redeclaration() {
        let (_, diagnostics, _) = parse_program_str("int f(int a) { int a; }");
        assert_eq!(diagnostics.count(Severity::Semantic), 1);
        assert_eq!(diagnostics.all()[0].message, "redeclaration of 'a' (previously declared on line 1)");
    }

    #[test]
    fn stray_closing_brace_is_reported_and_skipped() {
        let (program, diagnostics, _) = parse_program_str("int a; } int b;");
        assert_eq!(diagnostics.count(Severity::Syntax), 1);
        assert_eq!(program.globals().count(), 2);
    }

    #[test]
    fn non_type_at_top_level_is_error() {
        let (program, diagnostics, _) = parse_program_str("x = 1; int y;");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics.all()[0].message,
            "expected declaration or function definition, found 'x'"
        );
        assert_eq!(program.globals().count(), 1);
    }

    #[test]
    fn broken_parameter_list_still_parses_body() {
        let (program, diagnostics, _) = parse_program_str("int f(int) { return 0; } int g;");
        assert_eq!(diagnostics.count(Severity::Syntax), 1);
        assert_eq!(diagnostics.all()[0].message, "expected parameter name, found ')'");
        assert!(matches!(program.items[0], TopLevel::Block(_)));
        assert_eq!(program.globals().count(), 1);
    }

    #[test]
    fn failed_header_declares_nothing() {
        let (program, diagnostics, symbols) =
            parse_program_str("int f(int a);\nint f(int a) { return a; }\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.all()[0].message, "expected '{', found ';'");
        assert_eq!(program.functions().count(), 1);
        assert_eq!(symbols.lookup("f").unwrap().line, 2);
    }

    #[test]
    fn duplicate_parameter_is_redeclaration() {
        let (_, diagnostics, _) = parse_program_str("int f(int a,\n int a) { return a; }");
        assert_eq!(diagnostics.count(Severity::Semantic), 1);
        assert_eq!(diagnostics.all()[0].line, 2);
    }
}
