//! Parser combinators shared by the type and declaration grammars.

use chumsky::prelude::*;
use companion_lexer::Token;
use companion_syntax::{
    AccessLevel, Attribute, CodeBlock, Effects, Expr, GenericParam, Ident, Modifier, Span,
};

use crate::traits::{ParserError, TokenInput};

/// Identifiers that start a new declaration. An unbracketed initializer
/// expression ends before any of them.
pub(crate) const DECLARATION_KEYWORDS: &[&str] = &[
    "func",
    "var",
    "let",
    "init",
    "deinit",
    "subscript",
    "case",
    "struct",
    "class",
    "actor",
    "enum",
    "protocol",
    "extension",
    "typealias",
    "import",
    "public",
    "private",
    "fileprivate",
    "internal",
    "static",
    "override",
    "mutating",
    "nonisolated",
    "convenience",
];

pub(crate) fn span_of(span: SimpleSpan) -> Span {
    Span::new(span.start, span.end)
}

pub(crate) fn slice(src: &str, span: SimpleSpan) -> &str {
    src.get(span.start..span.end).unwrap_or_default()
}

/// Parses a specific identifier keyword, returning its span.
pub fn keyword<'tokens, 'src: 'tokens, I>(
    name: &'static str,
) -> impl Parser<'tokens, I, Span, ParserError<'tokens, 'src>> + Clone
where
    I: TokenInput<'tokens, 'src>,
{
    select! { Token::Identifier(id) = e if id == name => span_of(e.span()) }
        .labelled(format!("'{}'", name))
}

/// Parses any identifier.
pub fn ident<'tokens, 'src: 'tokens, I>()
-> impl Parser<'tokens, I, Ident, ParserError<'tokens, 'src>> + Clone
where
    I: TokenInput<'tokens, 'src>,
{
    select! { Token::Identifier(id) = e => Ident::spanned(id, span_of(e.span())) }
        .labelled("identifier")
}

/// Parses a balanced token tree: a single non-bracket token or a bracketed
/// group with everything inside it.
pub fn token_tree<'tokens, 'src: 'tokens, I>()
-> impl Parser<'tokens, I, (), ParserError<'tokens, 'src>> + Clone
where
    I: TokenInput<'tokens, 'src>,
{
    recursive(|tree| {
        let attribute_call = tree
            .clone()
            .repeated()
            .collect::<Vec<_>>()
            .delimited_by(
                select! { Token::AttributeCall(_) => () },
                just(Token::RParen),
            )
            .ignored();
        let leaf = any()
            .filter(|token: &Token<'src>| {
                !token.is_open_delimiter() && !token.is_close_delimiter()
            })
            .ignored();
        choice((bracketed(tree), attribute_call, leaf))
    })
}

fn bracketed<'tokens, 'src: 'tokens, I>(
    tree: impl Parser<'tokens, I, (), ParserError<'tokens, 'src>> + Clone,
) -> impl Parser<'tokens, I, (), ParserError<'tokens, 'src>> + Clone
where
    I: TokenInput<'tokens, 'src>,
{
    let parens = tree
        .clone()
        .repeated()
        .collect::<Vec<_>>()
        .delimited_by(just(Token::LParen), just(Token::RParen));
    let braces = tree
        .clone()
        .repeated()
        .collect::<Vec<_>>()
        .delimited_by(just(Token::LBrace), just(Token::RBrace));
    let brackets = tree
        .repeated()
        .collect::<Vec<_>>()
        .delimited_by(just(Token::LBracket), just(Token::RBracket));
    choice((parens, braces, brackets)).ignored()
}

/// Parses a `{ ... }` body, keeping its contents verbatim.
pub fn code_block<'tokens, 'src: 'tokens, I>(
    src: &'src str,
) -> impl Parser<'tokens, I, CodeBlock, ParserError<'tokens, 'src>> + Clone
where
    I: TokenInput<'tokens, 'src>,
{
    token_tree()
        .repeated()
        .collect::<Vec<_>>()
        .delimited_by(just(Token::LBrace), just(Token::RBrace))
        .map_with(move |_, e| {
            let span: SimpleSpan = e.span();
            let inner = src.get(span.start + 1..span.end - 1).unwrap_or_default();
            CodeBlock::verbatim(inner)
        })
        .labelled("code block")
}

/// Parses an expression as verbatim text, up to the first unbracketed
/// token for which `stop` holds or the enclosing closing bracket.
pub fn verbatim_expr<'tokens, 'src: 'tokens, I>(
    src: &'src str,
    stop: fn(&Token<'_>) -> bool,
) -> impl Parser<'tokens, I, Expr, ParserError<'tokens, 'src>> + Clone
where
    I: TokenInput<'tokens, 'src>,
{
    let leaf = any()
        .filter(move |token: &Token<'src>| {
            !token.is_open_delimiter()
                && !token.is_close_delimiter()
                && !matches!(token, Token::Attribute(_))
                && !stop(token)
        })
        .ignored();
    choice((bracketed(token_tree()), leaf))
        .repeated()
        .at_least(1)
        .collect::<Vec<_>>()
        .map_with(move |_, e| Expr::Verbatim(slice(src, e.span()).trim().to_string()))
        .labelled("expression")
}

/// `,` ends a parameter default or an associated value default.
pub(crate) fn ends_argument(token: &Token<'_>) -> bool {
    matches!(token, Token::Comma)
}

/// A property initializer or raw value also ends at `;` and at the next
/// declaration.
pub(crate) fn ends_initializer(token: &Token<'_>) -> bool {
    match token {
        Token::Comma | Token::Semicolon => true,
        Token::Identifier(id) => DECLARATION_KEYWORDS.contains(id),
        _ => false,
    }
}

/// Parses `@name` or `@name(arguments)`.
pub fn attribute<'tokens, 'src: 'tokens, I>(
    src: &'src str,
) -> impl Parser<'tokens, I, Attribute, ParserError<'tokens, 'src>> + Clone
where
    I: TokenInput<'tokens, 'src>,
{
    let bare = select! { Token::Attribute(name) = e => Attribute {
        name: Ident::spanned(name, span_of(e.span())),
        arguments: None,
        span: span_of(e.span()),
    }};
    let call = select! { Token::AttributeCall(name) = e => Ident::spanned(name, span_of(e.span())) }
        .then(
            token_tree()
                .repeated()
                .collect::<Vec<_>>()
                .map_with(|_, e| e.span()),
        )
        .then_ignore(just(Token::RParen))
        .map_with(move |(name, arguments), e| Attribute {
            name,
            arguments: Some(slice(src, arguments).trim().to_string()),
            span: span_of(e.span()),
        });
    choice((call, bare)).labelled("attribute")
}

/// Parses a bare `@name` in type position.
pub fn type_attribute<'tokens, 'src: 'tokens, I>()
-> impl Parser<'tokens, I, Attribute, ParserError<'tokens, 'src>> + Clone
where
    I: TokenInput<'tokens, 'src>,
{
    select! { Token::Attribute(name) = e => Attribute {
        name: Ident::spanned(name, span_of(e.span())),
        arguments: None,
        span: span_of(e.span()),
    }}
    .labelled("type attribute")
}

fn access_level<'tokens, 'src: 'tokens, I>()
-> impl Parser<'tokens, I, AccessLevel, ParserError<'tokens, 'src>> + Clone
where
    I: TokenInput<'tokens, 'src>,
{
    select! {
        Token::Identifier("private") => AccessLevel::Private,
        Token::Identifier("fileprivate") => AccessLevel::Fileprivate,
        Token::Identifier("internal") => AccessLevel::Internal,
        Token::Identifier("package") => AccessLevel::Package,
        Token::Identifier("public") => AccessLevel::Public,
        Token::Identifier("open") => AccessLevel::Open,
    }
    .labelled("access level")
}

/// Parses one declaration modifier.
///
/// Matches:
/// - `public`, `private(set)`, ...
/// - `static`, `final`, `mutating`, ...
/// - `class`, only when a member declaration follows
pub fn modifier<'tokens, 'src: 'tokens, I>()
-> impl Parser<'tokens, I, Modifier, ParserError<'tokens, 'src>> + Clone
where
    I: TokenInput<'tokens, 'src>,
{
    let access = access_level()
        .then(
            just(Token::LParen)
                .ignore_then(keyword("set"))
                .then_ignore(just(Token::RParen))
                .or_not(),
        )
        .map(|(level, setter)| match setter {
            Some(_) => Modifier::SetterAccess(level),
            None => Modifier::Access(level),
        });
    let class = keyword("class")
        .then_ignore(choice((keyword("func"), keyword("var"), keyword("let"))).rewind())
        .to(Modifier::Class);
    let simple = select! {
        Token::Identifier("final") => Modifier::Final,
        Token::Identifier("static") => Modifier::Static,
        Token::Identifier("mutating") => Modifier::Mutating,
        Token::Identifier("nonmutating") => Modifier::Nonmutating,
        Token::Identifier("nonisolated") => Modifier::Nonisolated,
        Token::Identifier("override") => Modifier::Override,
        Token::Identifier("lazy") => Modifier::Lazy,
        Token::Identifier("weak") => Modifier::Weak,
        Token::Identifier("unowned") => Modifier::Unowned,
        Token::Identifier("convenience") => Modifier::Convenience,
        Token::Identifier("required") => Modifier::Required,
        Token::Identifier("indirect") => Modifier::Indirect,
    };
    choice((access, class, simple)).labelled("modifier")
}

/// Parses optional `async` and `throws` specifiers, in that order.
pub fn effects<'tokens, 'src: 'tokens, I>()
-> impl Parser<'tokens, I, Effects, ParserError<'tokens, 'src>> + Clone
where
    I: TokenInput<'tokens, 'src>,
{
    keyword("async")
        .or_not()
        .then(keyword("throws").or_not())
        .map(|(is_async, is_throws)| Effects::new(is_async.is_some(), is_throws.is_some()))
}

/// Parses `<A, B: Constraint>`, or nothing.
pub fn generic_params<'tokens, 'src: 'tokens, I>()
-> impl Parser<'tokens, I, Vec<GenericParam>, ParserError<'tokens, 'src>> + Clone
where
    I: TokenInput<'tokens, 'src>,
{
    ident()
        .then(just(Token::Colon).ignore_then(crate::types::type_parser()).or_not())
        .map(|(name, constraint)| GenericParam { name, constraint })
        .separated_by(just(Token::Comma))
        .at_least(1)
        .collect::<Vec<_>>()
        .delimited_by(just(Token::LAngle), just(Token::RAngle))
        .or_not()
        .map(Option::unwrap_or_default)
        .labelled("generic parameters")
}
