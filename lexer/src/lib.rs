mod keywords;
mod literals;
mod state_machine;

use model::{Diagnostics, Token};
pub use literals::{float_value_lossy, parse_float_literal, parse_int_constant};
pub use state_machine::Lexer;

/// Tokenize a whole buffer eagerly. The trailing `EndOfInput` marker is not
/// included in the returned tokens.
pub fn lex(input: &str) -> (Vec<Token>, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();

    loop {
        let token = lexer.next_token(&mut diagnostics);
        if token.is_end() {
            break;
        }
        tokens.push(token);
    }

    (tokens, diagnostics)
}
