use chumsky::error::Rich;
use chumsky::span::SimpleSpan;
use companion_lexer::Token;
use companion_syntax::Span;
use strsim::levenshtein;

use crate::parsers::DECLARATION_KEYWORDS;

/// Error categories for parse failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("unexpected token")]
    UnexpectedToken,
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("invalid token")]
    InvalidToken,
    #[error("expected exactly one declaration")]
    NotASingleDeclaration,
}

/// A syntax error with the span it was found at.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at {span}: {message}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
    pub message: String,
    /// Descriptions of what would have been accepted, sorted.
    pub expected: Vec<String>,
    /// A keyword close to the offending identifier.
    pub suggestion: Option<String>,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
            expected: Vec::new(),
            suggestion: None,
        }
    }

    pub(crate) fn from_rich(src: &str, error: &Rich<'_, Token<'_>, SimpleSpan>) -> Self {
        let span = Span::new(error.span().start, error.span().end);
        let (kind, found) = match error.found() {
            None => (ParseErrorKind::UnexpectedEnd, "end of input".to_string()),
            Some(Token::Error) => (
                ParseErrorKind::InvalidToken,
                format!("`{}`", src.get(span.into_range()).unwrap_or_default()),
            ),
            Some(token) => (ParseErrorKind::UnexpectedToken, format!("`{}`", token)),
        };

        let mut expected: Vec<String> = error.expected().map(|e| e.to_string()).collect();
        expected.sort();
        expected.dedup();

        let suggestion = match error.found() {
            Some(Token::Identifier(name)) => suggest_keyword(name),
            _ => None,
        };

        let mut message = format!("found {}", found);
        if !expected.is_empty() {
            message.push_str(&format!(", expected {}", expected.join(" or ")));
        }
        if let Some(keyword) = &suggestion {
            message.push_str(&format!(" (did you mean `{}`?)", keyword));
        }

        Self {
            kind,
            span,
            message,
            expected,
            suggestion,
        }
    }
}

/// Closest declaration keyword to a misspelled identifier.
fn suggest_keyword(name: &str) -> Option<String> {
    if DECLARATION_KEYWORDS.contains(&name) {
        return None;
    }
    DECLARATION_KEYWORDS
        .iter()
        .map(|keyword| (levenshtein(name, keyword), keyword))
        .filter(|(distance, _)| *distance <= 2)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, keyword)| keyword.to_string())
}
