//! Parser from source text to the [`companion_syntax`] tree.
//!
//! The grammar covers declarations and types. Function bodies, initializer
//! expressions and attribute arguments are kept verbatim.

mod decl;
mod error;
mod parsers;
mod traits;
mod types;

use chumsky::input::Stream;
use chumsky::prelude::*;
use companion_syntax::{Decl, SourceFile, Span, TypeRef};

pub use companion_lexer::Token;
pub use decl::{accessor_block, decl_parser, param, source_file_parser};
pub use error::{ParseError, ParseErrorKind};
pub use parsers::{attribute, code_block, effects, generic_params, ident, keyword, modifier};
pub use traits::{BoxedParser, ParserError, TokenInput};
pub use types::{type_parser, where_clause};

/// Lex `src` into spanned tokens.
pub fn tokenize(src: &str) -> Vec<(Token<'_>, SimpleSpan)> {
    companion_lexer::lex(src)
        .map(|(token, range)| (token, SimpleSpan::from(range)))
        .collect()
}

fn token_stream<'src>(src: &'src str) -> impl TokenInput<'src, 'src> {
    let eoi = SimpleSpan::from(src.len()..src.len());
    Stream::from_iter(tokenize(src)).map(eoi, |(token, span)| (token, span))
}

/// Parse a whole source file.
pub fn parse_source(src: &str) -> Result<SourceFile, ParseError> {
    source_file_parser(src)
        .parse(token_stream(src))
        .into_result()
        .map_err(|errors| first_error(src, &errors))
}

/// Parse exactly one declaration.
pub fn parse_decl(src: &str) -> Result<Decl, ParseError> {
    let mut file = parse_source(src)?;
    match file.decls.len() {
        1 => Ok(file.decls.remove(0)),
        n => Err(ParseError::new(
            ParseErrorKind::NotASingleDeclaration,
            Span::new(0, src.len()),
            format!("found {} declarations", n),
        )),
    }
}

/// Parse a type expression.
pub fn parse_type(src: &str) -> Result<TypeRef, ParseError> {
    type_parser()
        .parse(token_stream(src))
        .into_result()
        .map_err(|errors| first_error(src, &errors))
}

fn first_error(src: &str, errors: &[Rich<'_, Token<'_>, SimpleSpan>]) -> ParseError {
    match errors.first() {
        Some(error) => ParseError::from_rich(src, error),
        None => ParseError::new(
            ParseErrorKind::UnexpectedToken,
            Span::new(0, src.len()),
            "parse failed",
        ),
    }
}
