use model::TokenKind;

/// Classify a scanned word as a reserved word or a plain identifier
pub fn keyword_or_identifier(text: &str) -> TokenKind {
    match text {
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "for" => TokenKind::For,
        "while" => TokenKind::While,
        "do" => TokenKind::Do,
        "switch" => TokenKind::Switch,
        "case" => TokenKind::Case,
        "default" => TokenKind::Default,
        "break" => TokenKind::Break,
        "continue" => TokenKind::Continue,
        "goto" => TokenKind::Goto,
        "return" => TokenKind::Return,
        "int" => TokenKind::Int,
        "char" => TokenKind::Char,
        "double" => TokenKind::Double,
        "void" => TokenKind::Void,
        "float" => TokenKind::Float,
        "printf" => TokenKind::Printf,
        _ => TokenKind::Id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_are_case_sensitive() {
        assert_eq!(keyword_or_identifier("while"), TokenKind::While);
        assert_eq!(keyword_or_identifier("While"), TokenKind::Id);
        assert_eq!(keyword_or_identifier("printf"), TokenKind::Printf);
        assert_eq!(keyword_or_identifier("integer"), TokenKind::Id);
    }
}
