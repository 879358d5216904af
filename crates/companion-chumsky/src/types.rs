use chumsky::prelude::*;
use companion_lexer::Token;
use companion_syntax::{
    FunctionType, TupleTypeElement, TypeRef, TypeSegment, WhereClause, WhereRequirement,
};

use crate::parsers::{effects, ident, keyword, type_attribute};
use crate::traits::{ParserError, TokenInput};

#[derive(Clone, Copy)]
enum Postfix {
    Optional,
    ImplicitlyUnwrapped,
}

/// Parses a type expression.
///
/// Matches:
/// - `Int`, `User.Profile`, `Result<User, Error>`
/// - `T?`, `T!`, `[T]`, `[K: V]`, `(a: Int, String)`
/// - `(Int...) async throws -> String`
/// - `@escaping () -> Void`, `@unchecked Sendable`
/// - `some P`, `any P`, `inout T`, `A & B`
pub fn type_parser<'tokens, 'src: 'tokens, I>()
-> impl Parser<'tokens, I, TypeRef, ParserError<'tokens, 'src>> + Clone
where
    I: TokenInput<'tokens, 'src>,
{
    recursive(|ty| {
        let generic_args = ty
            .clone()
            .separated_by(just(Token::Comma))
            .at_least(1)
            .collect::<Vec<_>>()
            .delimited_by(just(Token::LAngle), just(Token::RAngle));
        let segment = ident()
            .then(generic_args.or_not())
            .map(|(name, generic_args)| TypeSegment {
                name,
                generic_args: generic_args.unwrap_or_default(),
            });
        let named = segment
            .separated_by(just(Token::Dot))
            .at_least(1)
            .collect::<Vec<_>>()
            .map(TypeRef::Named)
            .labelled("type name");

        let element = ident()
            .then_ignore(just(Token::Colon))
            .or_not()
            .then(ty.clone())
            .then(just(Token::Ellipsis).or_not())
            .map(|((label, ty), ellipsis)| TupleTypeElement {
                label,
                ty,
                variadic: ellipsis.is_some(),
            });
        let elements = element
            .separated_by(just(Token::Comma))
            .allow_trailing()
            .collect::<Vec<_>>()
            .delimited_by(just(Token::LParen), just(Token::RParen));
        let parenthesized = elements
            .then(
                effects()
                    .then_ignore(just(Token::Arrow))
                    .then(ty.clone())
                    .or_not(),
            )
            .map(|(mut elements, function)| match function {
                Some((effects, output)) => TypeRef::Function(FunctionType {
                    params: elements,
                    effects,
                    output: Box::new(output),
                }),
                None if is_parenthesized_type(&elements) => elements.remove(0).ty,
                None => TypeRef::Tuple(elements),
            })
            .labelled("tuple or function type");

        let bracketed = ty
            .clone()
            .then(just(Token::Colon).ignore_then(ty.clone()).or_not())
            .delimited_by(just(Token::LBracket), just(Token::RBracket))
            .map(|(key, value)| match value {
                Some(value) => TypeRef::Dictionary {
                    key: Box::new(key),
                    value: Box::new(value),
                },
                None => TypeRef::Array(Box::new(key)),
            })
            .labelled("collection type");

        let prefixed = choice((
            keyword("some")
                .ignore_then(ty.clone())
                .map(|inner| TypeRef::Opaque(Box::new(inner))),
            keyword("any")
                .ignore_then(ty.clone())
                .map(|inner| TypeRef::Existential(Box::new(inner))),
            keyword("inout")
                .ignore_then(ty.clone())
                .map(|inner| TypeRef::Inout(Box::new(inner))),
        ));

        let attributed = type_attribute()
            .repeated()
            .at_least(1)
            .collect::<Vec<_>>()
            .then(ty)
            .map(|(attributes, inner)| TypeRef::attributed(attributes, inner));

        let primary = choice((attributed, prefixed, parenthesized, bracketed, named));

        let postfix = primary
            .then(
                choice((
                    just(Token::QuestionMark).to(Postfix::Optional),
                    just(Token::Bang).to(Postfix::ImplicitlyUnwrapped),
                ))
                .repeated()
                .collect::<Vec<_>>(),
            )
            .map(|(ty, postfixes)| {
                postfixes.into_iter().fold(ty, |ty, postfix| match postfix {
                    Postfix::Optional => TypeRef::Optional(Box::new(ty)),
                    Postfix::ImplicitlyUnwrapped => TypeRef::ImplicitlyUnwrapped(Box::new(ty)),
                })
            });

        postfix
            .separated_by(just(Token::Ampersand))
            .at_least(1)
            .collect::<Vec<_>>()
            .map(|mut parts| {
                if parts.len() == 1 {
                    parts.remove(0)
                } else {
                    TypeRef::Composition(parts)
                }
            })
    })
    .labelled("type")
}

/// `(T)` is `T`, not a one-element tuple.
fn is_parenthesized_type(elements: &[TupleTypeElement]) -> bool {
    matches!(elements, [element] if element.label.is_none() && !element.variadic)
}

/// Parses `where A: B, C == D`.
pub fn where_clause<'tokens, 'src: 'tokens, I>()
-> impl Parser<'tokens, I, WhereClause, ParserError<'tokens, 'src>> + Clone
where
    I: TokenInput<'tokens, 'src>,
{
    let conformance = type_parser()
        .then_ignore(just(Token::Colon))
        .then(type_parser())
        .map(|(subject, constraint)| WhereRequirement::Conformance {
            subject,
            constraint,
        });
    let same_type = type_parser()
        .then_ignore(just(Token::Equal).then(just(Token::Equal)))
        .then(type_parser())
        .map(|(lhs, rhs)| WhereRequirement::SameType { lhs, rhs });

    keyword("where")
        .ignore_then(
            choice((conformance, same_type))
                .separated_by(just(Token::Comma))
                .at_least(1)
                .collect::<Vec<_>>(),
        )
        .map(WhereClause::new)
        .labelled("where clause")
}
