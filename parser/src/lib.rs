// Parser module: pulls tokens from the lexer on demand and builds the AST,
// maintaining the symbol table and recording diagnostics as it goes.
//
// Module organization:
// - parser.rs: Core Parser struct, token lookahead, error recovery
// - declarations.rs: Top-level items, declarations, functions and parameters
// - statements.rs: Statement parsing (if, while, for, switch, return, etc.)
// - expressions.rs: Expression parsing with precedence climbing

mod parser;
mod expressions;
mod statements;
mod declarations;

use lexer::Lexer;
use log::info;
use model::{AnalysisError, Diagnostics, Program};
use semantic::SymbolTable;
use parser::Parser;
use declarations::DeclarationParser;

/// Everything produced by one front-end pass over a source buffer.
#[derive(Debug)]
pub struct Analysis {
    pub program: Program,
    pub diagnostics: Diagnostics,
    /// Table state after parsing; only the global scope is left.
    pub symbols: SymbolTable,
}

impl Analysis {
    pub fn is_ok(&self) -> bool {
        !self.diagnostics.has_errors()
    }
}

/// Parse everything `lexer` produces into a Program AST
///
/// # Arguments
/// * `lexer` - Token source; it is driven by the parser one token at a time
/// * `symbols` - Table that receives every declaration
/// * `diagnostics` - Sink for lexical, syntax and semantic errors
///
/// # Returns
/// The (possibly partial) program. Errors never abort the parse; check
/// `diagnostics` to find out whether the input was clean.
pub fn parse(lexer: Lexer<'_>, symbols: &mut SymbolTable, diagnostics: &mut Diagnostics) -> Program {
    let mut parser = Parser::new(lexer, symbols, diagnostics);
    parser.parse_program()
}

/// Run the whole front end over `source`.
///
/// Returns `AnalysisError::InvalidInput` for an empty or whitespace-only
/// buffer. Any other input yields an `Analysis`, with or without errors.
pub fn parse_source(source: &str) -> Result<Analysis, AnalysisError> {
    if source.trim().is_empty() {
        return Err(AnalysisError::InvalidInput("source buffer is empty".to_string()));
    }

    let mut symbols = SymbolTable::new();
    let mut diagnostics = Diagnostics::new();
    let program = parse(Lexer::new(source), &mut symbols, &mut diagnostics);

    info!(
        "analysis finished: {} items, {} diagnostics",
        program.items.len(),
        diagnostics.len()
    );

    Ok(Analysis {
        program,
        diagnostics,
        symbols,
    })
}
