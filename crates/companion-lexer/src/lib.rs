pub use logos::Logos;

/// Tokens of the declaration language.
///
/// Keywords are lexed as [`Token::Identifier`] and recognised by the parser,
/// the same way contextual keywords (`get`, `set`, `async`, ...) are.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip(r"//[^\n\r]*", allow_greedy = true))]
#[logos(skip r"/\*([^*]|\*+[^*/])*\*+/")]
pub enum Token<'src> {
    Error,
    /// ```ignore
    /// <identifier>
    /// ```
    #[regex(r"[\p{XID_Start}_][\p{XID_Continue}]*")]
    Identifier(&'src str),
    /// ```ignore
    /// @<attribute>
    /// ```
    #[regex(r"@[\p{XID_Start}_][\p{XID_Continue}]*", |lex| &lex.slice()[1..])]
    Attribute(&'src str),
    /// An attribute immediately followed by its argument list:
    ///
    /// ```ignore
    /// @<attribute>(
    /// ```
    ///
    /// `@escaping (Int) -> Void` keeps the space and lexes as
    /// [`Token::Attribute`] followed by [`Token::LParen`].
    #[regex(r"@[\p{XID_Start}_][\p{XID_Continue}]*\(", |lex| {
        let slice = lex.slice();
        &slice[1..slice.len() - 1]
    })]
    AttributeCall(&'src str),

    #[regex(r"[0-9][0-9_]*")]
    Int(&'src str),
    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9]+)?")]
    Float(&'src str),
    /// The literal including its quotes.
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    StringLit(&'src str),

    // --- Delimiters & Punctuation ---
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("<")]
    LAngle,
    #[token(">")]
    RAngle,

    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token("=")]
    Equal,
    #[token("->")]
    Arrow,
    #[token(".")]
    Dot,
    #[token("...")]
    Ellipsis,
    #[token("?")]
    QuestionMark,
    #[token("!")]
    Bang,
    #[token("&")]
    Ampersand,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Asterisk,
    #[token("/")]
    Slash,
}

impl std::fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Error => write!(f, "error"),
            Token::Identifier(name) => write!(f, "{}", name),
            Token::Attribute(name) => write!(f, "@{}", name),
            Token::AttributeCall(name) => write!(f, "@{}(", name),
            Token::Int(value) => write!(f, "{}", value),
            Token::Float(value) => write!(f, "{}", value),
            Token::StringLit(value) => write!(f, "{}", value),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::LAngle => write!(f, "<"),
            Token::RAngle => write!(f, ">"),
            Token::Colon => write!(f, ":"),
            Token::Comma => write!(f, ","),
            Token::Semicolon => write!(f, ";"),
            Token::Equal => write!(f, "="),
            Token::Arrow => write!(f, "->"),
            Token::Dot => write!(f, "."),
            Token::Ellipsis => write!(f, "..."),
            Token::QuestionMark => write!(f, "?"),
            Token::Bang => write!(f, "!"),
            Token::Ampersand => write!(f, "&"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Asterisk => write!(f, "*"),
            Token::Slash => write!(f, "/"),
        }
    }
}

impl Token<'_> {
    /// Whether this token opens a bracketed group.
    pub fn is_open_delimiter(&self) -> bool {
        matches!(
            self,
            Token::LParen | Token::LBrace | Token::LBracket | Token::AttributeCall(_)
        )
    }

    /// Whether this token closes a bracketed group.
    pub fn is_close_delimiter(&self) -> bool {
        matches!(self, Token::RParen | Token::RBrace | Token::RBracket)
    }
}

/// Lex `input`, turning unrecognised characters into [`Token::Error`].
///
/// Function bodies may contain operators the grammar never inspects, so
/// lexing does not fail; the parser decides whether an error token matters.
pub fn lex<'src>(input: &'src str) -> impl Iterator<Item = (Token<'src>, std::ops::Range<usize>)> + 'src {
    Token::lexer(input)
        .spanned()
        .map(|(token, span)| (token.unwrap_or(Token::Error), span))
}

#[cfg(test)]
mod tests {
    use super::*;
    use Token::*;

    fn tokens(input: &str) -> Vec<Token<'_>> {
        lex(input).map(|(token, _)| token).collect()
    }

    #[test]
    fn test_function_signature() {
        assert_eq!(
            tokens("func foo(bar: String, baz: Int) async throws -> String"),
            vec![
                Identifier("func"),
                Identifier("foo"),
                LParen,
                Identifier("bar"),
                Colon,
                Identifier("String"),
                Comma,
                Identifier("baz"),
                Colon,
                Identifier("Int"),
                RParen,
                Identifier("async"),
                Identifier("throws"),
                Arrow,
                Identifier("String"),
            ]
        );
    }

    #[test]
    fn test_attributes_and_types() {
        assert_eq!(
            tokens("@escaping (Int...) -> [String: User.Profile]?"),
            vec![
                Attribute("escaping"),
                LParen,
                Identifier("Int"),
                Ellipsis,
                RParen,
                Arrow,
                LBracket,
                Identifier("String"),
                Colon,
                Identifier("User"),
                Dot,
                Identifier("Profile"),
                RBracket,
                QuestionMark,
            ]
        );
    }

    #[test]
    fn test_attribute_arguments_need_adjacent_paren() {
        assert_eq!(
            tokens("@available(iOS 13, *) @escaping (Int)"),
            vec![
                AttributeCall("available"),
                Identifier("iOS"),
                Int("13"),
                Comma,
                Asterisk,
                RParen,
                Attribute("escaping"),
                LParen,
                Identifier("Int"),
                RParen,
            ]
        );
    }

    #[test]
    fn test_literals() {
        assert_eq!(
            tokens(r#"return "bar" + 42 * 1.5"#),
            vec![
                Identifier("return"),
                StringLit("\"bar\""),
                Plus,
                Int("42"),
                Asterisk,
                Float("1.5"),
            ]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            tokens("case nobody // no payload\n/* the\nrest */ case user"),
            vec![
                Identifier("case"),
                Identifier("nobody"),
                Identifier("case"),
                Identifier("user"),
            ]
        );
    }

    #[test]
    fn test_unknown_characters_become_error_tokens() {
        assert_eq!(
            tokens("a | b"),
            vec![Identifier("a"), Error, Identifier("b")]
        );
    }

    #[test]
    fn test_spans() {
        let spans: Vec<_> = lex("@EnumCodable enum").map(|(_, span)| span).collect();
        assert_eq!(spans, vec![0..12, 13..17]);
    }
}
