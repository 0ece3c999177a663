use std::fmt;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Severity {
    Lexical,
    Syntax,
    Semantic,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Lexical => "lexical",
            Severity::Syntax => "syntax",
            Severity::Semantic => "semantic",
        };
        f.write_str(name)
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub line: usize,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {} error: {}", self.line, self.severity, self.message)
    }
}

/// Ordered, append-only collection of everything that went wrong during an
/// analysis. Reporting never fails; callers decide what counts as failure.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    records: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, severity: Severity, message: impl Into<String>, line: usize) {
        self.records.push(Diagnostic {
            severity,
            message: message.into(),
            line,
        });
    }

    /// All records in the order they were reported
    pub fn all(&self) -> &[Diagnostic] {
        &self.records
    }

    pub fn has_errors(&self) -> bool {
        !self.records.is_empty()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.records.iter().filter(|d| d.severity == severity).count()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Conditions that stop an analysis before the first token is produced.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalysisError {
    InvalidInput(String),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::InvalidInput(reason) => write!(f, "invalid input: {}", reason),
        }
    }
}

impl std::error::Error for AnalysisError {}
