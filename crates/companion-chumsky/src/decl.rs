use chumsky::prelude::*;
use companion_lexer::Token;
use companion_syntax::{
    Accessor, AccessorBlock, AccessorKind, Attribute, BindingKind, Decl, EnumCaseDecl,
    EnumCaseElement, EnumCaseParam, FunctionDecl, Ident, ImportDecl, InitializerDecl, Modifier,
    Param, PatternBinding, SourceFile, TypeAliasDecl, TypeDecl, TypeKind, VariableDecl,
};

use crate::parsers::{
    attribute, code_block, effects, ends_argument, ends_initializer, generic_params, ident,
    keyword, modifier, span_of, verbatim_expr,
};
use crate::traits::{BoxedParser, ParserError, TokenInput};
use crate::types::{type_parser, where_clause};

/// Parses the attributes and modifiers in front of a declaration.
fn decl_prefix<'tokens, 'src: 'tokens, I>(
    src: &'src str,
) -> impl Parser<'tokens, I, (Vec<Attribute>, Vec<Modifier>), ParserError<'tokens, 'src>> + Clone
where
    I: TokenInput<'tokens, 'src>,
{
    attribute(src)
        .repeated()
        .collect::<Vec<_>>()
        .then(modifier().repeated().collect::<Vec<_>>())
}

/// Parses a function or initializer parameter.
///
/// Matches:
/// - `bar: String`
/// - `_ input: Input`
/// - `values: Int...`
/// - `foo: @escaping () -> String = unimplemented()`
pub fn param<'tokens, 'src: 'tokens, I>(
    src: &'src str,
) -> impl Parser<'tokens, I, Param, ParserError<'tokens, 'src>> + Clone
where
    I: TokenInput<'tokens, 'src>,
{
    ident()
        .then(ident().or_not())
        .then_ignore(just(Token::Colon))
        .then(type_parser())
        .then(just(Token::Ellipsis).or_not())
        .then(
            just(Token::Equal)
                .ignore_then(verbatim_expr(src, ends_argument))
                .or_not(),
        )
        .map_with(
            |((((first_name, second_name), ty), ellipsis), default), e| Param {
                first_name,
                second_name,
                ty,
                variadic: ellipsis.is_some(),
                default,
                span: span_of(e.span()),
            },
        )
        .labelled("parameter")
}

fn param_list<'tokens, 'src: 'tokens, I>(
    src: &'src str,
) -> impl Parser<'tokens, I, Vec<Param>, ParserError<'tokens, 'src>> + Clone
where
    I: TokenInput<'tokens, 'src>,
{
    param(src)
        .separated_by(just(Token::Comma))
        .allow_trailing()
        .collect::<Vec<_>>()
        .delimited_by(just(Token::LParen), just(Token::RParen))
        .labelled("parameter list")
}

fn function_decl<'tokens, 'src: 'tokens, I>(
    src: &'src str,
) -> BoxedParser<'tokens, 'src, I, Decl>
where
    I: TokenInput<'tokens, 'src>,
{
    decl_prefix(src)
        .then_ignore(keyword("func"))
        .then(ident())
        .then(generic_params())
        .then(param_list(src))
        .then(effects())
        .then(just(Token::Arrow).ignore_then(type_parser()).or_not())
        .then(where_clause().or_not())
        .then(code_block(src).or_not())
        .map_with(
            |(
                ((((((prefix, name), generic_params), params), effects), output), where_clause),
                body,
            ),
             e| {
                let (attributes, modifiers) = prefix;
                Decl::Function(FunctionDecl {
                    attributes,
                    modifiers,
                    name,
                    generic_params,
                    params,
                    effects,
                    output,
                    where_clause,
                    body,
                    span: span_of(e.span()),
                })
            },
        )
        .labelled("function declaration")
        .boxed()
}

fn initializer_decl<'tokens, 'src: 'tokens, I>(
    src: &'src str,
) -> BoxedParser<'tokens, 'src, I, Decl>
where
    I: TokenInput<'tokens, 'src>,
{
    decl_prefix(src)
        .then_ignore(keyword("init"))
        .then(just(Token::QuestionMark).or_not())
        .then(generic_params())
        .then(param_list(src))
        .then(effects())
        .then(where_clause().or_not())
        .then(code_block(src).or_not())
        .map_with(
            |((((((prefix, failable), generic_params), params), effects), where_clause), body),
             e| {
                let (attributes, modifiers) = prefix;
                Decl::Initializer(InitializerDecl {
                    attributes,
                    modifiers,
                    failable: failable.is_some(),
                    generic_params,
                    params,
                    effects,
                    where_clause,
                    body,
                    span: span_of(e.span()),
                })
            },
        )
        .labelled("initializer declaration")
        .boxed()
}

/// Parses the `{ ... }` after a property.
///
/// Matches:
/// - `{ get set }`, `{ get async throws }`
/// - `{ get { ... } set(newName) { ... } }`
/// - `{ return 42 }`, an implicit getter
pub fn accessor_block<'tokens, 'src: 'tokens, I>(
    src: &'src str,
) -> impl Parser<'tokens, I, AccessorBlock, ParserError<'tokens, 'src>> + Clone
where
    I: TokenInput<'tokens, 'src>,
{
    let kind = select! {
        Token::Identifier("get") => AccessorKind::Get,
        Token::Identifier("set") => AccessorKind::Set,
        Token::Identifier("willSet") => AccessorKind::WillSet,
        Token::Identifier("didSet") => AccessorKind::DidSet,
    }
    .labelled("accessor");
    let accessor = kind
        .then(
            ident()
                .delimited_by(just(Token::LParen), just(Token::RParen))
                .or_not(),
        )
        .then(effects())
        .then(code_block(src).or_not())
        .map(|(((kind, parameter), effects), body)| Accessor {
            kind,
            effects,
            parameter,
            body,
        });
    let accessors = accessor
        .repeated()
        .at_least(1)
        .collect::<Vec<_>>()
        .delimited_by(just(Token::LBrace), just(Token::RBrace))
        .map(AccessorBlock::Accessors);
    let getter = code_block(src).map(AccessorBlock::Getter);
    choice((accessors, getter)).labelled("accessor block")
}

fn variable_decl<'tokens, 'src: 'tokens, I>(
    src: &'src str,
) -> BoxedParser<'tokens, 'src, I, Decl>
where
    I: TokenInput<'tokens, 'src>,
{
    let binding_kind = choice((
        keyword("var").to(BindingKind::Var),
        keyword("let").to(BindingKind::Let),
    ));
    let binding = ident()
        .then(just(Token::Colon).ignore_then(type_parser()).or_not())
        .then(
            just(Token::Equal)
                .ignore_then(verbatim_expr(src, ends_initializer))
                .or_not(),
        )
        .then(accessor_block(src).or_not())
        .map_with(
            |(((name, ty), initializer), accessors), e| PatternBinding {
                name,
                ty,
                initializer,
                accessors,
                span: span_of(e.span()),
            },
        );

    decl_prefix(src)
        .then(binding_kind)
        .then(
            binding
                .separated_by(just(Token::Comma))
                .at_least(1)
                .collect::<Vec<_>>(),
        )
        .map_with(|(((attributes, modifiers), binding), bindings), e| {
            Decl::Variable(VariableDecl {
                attributes,
                modifiers,
                binding,
                bindings,
                span: span_of(e.span()),
            })
        })
        .labelled("variable declaration")
        .boxed()
}

/// Parses one associated value of an enum case.
///
/// Matches:
/// - `user: User`
/// - `_ user: User`
/// - `User`
fn enum_case_param<'tokens, 'src: 'tokens, I>(
    src: &'src str,
) -> impl Parser<'tokens, I, EnumCaseParam, ParserError<'tokens, 'src>> + Clone
where
    I: TokenInput<'tokens, 'src>,
{
    ident()
        .then(ident().or_not())
        .then_ignore(just(Token::Colon))
        .or_not()
        .then(type_parser())
        .then(
            just(Token::Equal)
                .ignore_then(verbatim_expr(src, ends_argument))
                .or_not(),
        )
        .map_with(|((names, ty), default), e| {
            let (first_name, second_name) = match names {
                Some((first, second)) => (Some(first), second),
                None => (None, None),
            };
            EnumCaseParam {
                first_name,
                second_name,
                ty,
                default,
                span: span_of(e.span()),
            }
        })
        .labelled("associated value")
}

fn enum_case_decl<'tokens, 'src: 'tokens, I>(
    src: &'src str,
) -> BoxedParser<'tokens, 'src, I, Decl>
where
    I: TokenInput<'tokens, 'src>,
{
    let payload = enum_case_param(src)
        .separated_by(just(Token::Comma))
        .allow_trailing()
        .collect::<Vec<_>>()
        .delimited_by(just(Token::LParen), just(Token::RParen));
    let element = ident()
        .then(payload.or_not())
        .then(
            just(Token::Equal)
                .ignore_then(verbatim_expr(src, ends_initializer))
                .or_not(),
        )
        .map_with(|((name, payload), raw_value), e| EnumCaseElement {
            name,
            payload,
            raw_value,
            span: span_of(e.span()),
        });

    decl_prefix(src)
        .then_ignore(keyword("case"))
        .then(
            element
                .separated_by(just(Token::Comma))
                .at_least(1)
                .collect::<Vec<_>>(),
        )
        .map_with(|((attributes, modifiers), elements), e| {
            Decl::EnumCase(EnumCaseDecl {
                attributes,
                modifiers,
                elements,
                span: span_of(e.span()),
            })
        })
        .labelled("enum case declaration")
        .boxed()
}

fn type_alias_decl<'tokens, 'src: 'tokens, I>(
    src: &'src str,
) -> BoxedParser<'tokens, 'src, I, Decl>
where
    I: TokenInput<'tokens, 'src>,
{
    decl_prefix(src)
        .then_ignore(keyword("typealias"))
        .then(ident())
        .then(generic_params())
        .then_ignore(just(Token::Equal))
        .then(type_parser())
        .map_with(
            |((((attributes, modifiers), name), generic_params), target), e| {
                Decl::TypeAlias(TypeAliasDecl {
                    attributes,
                    modifiers,
                    name,
                    generic_params,
                    target,
                    span: span_of(e.span()),
                })
            },
        )
        .labelled("typealias declaration")
        .boxed()
}

fn import_decl<'tokens, 'src: 'tokens, I>(
    src: &'src str,
) -> BoxedParser<'tokens, 'src, I, Decl>
where
    I: TokenInput<'tokens, 'src>,
{
    attribute(src)
        .repeated()
        .collect::<Vec<_>>()
        .ignore_then(keyword("import"))
        .ignore_then(
            ident()
                .separated_by(just(Token::Dot))
                .at_least(1)
                .collect::<Vec<_>>(),
        )
        .map_with(|path, e| {
            Decl::Import(ImportDecl {
                path,
                span: span_of(e.span()),
            })
        })
        .labelled("import declaration")
        .boxed()
}

/// Parses a type declaration, with `decl` parsing its members.
fn type_decl<'tokens, 'src: 'tokens, I>(
    src: &'src str,
    decl: impl Parser<'tokens, I, Decl, ParserError<'tokens, 'src>> + Clone + 'tokens,
) -> BoxedParser<'tokens, 'src, I, Decl>
where
    I: TokenInput<'tokens, 'src>,
{
    let nominal = select! {
        Token::Identifier("struct") => TypeKind::Struct,
        Token::Identifier("class") => TypeKind::Class,
        Token::Identifier("actor") => TypeKind::Actor,
        Token::Identifier("enum") => TypeKind::Enum,
        Token::Identifier("protocol") => TypeKind::Protocol,
    }
    .then(ident());
    let extension = keyword("extension")
        .to(TypeKind::Extension)
        .then(
            type_parser()
                .map_with(|ty, e| Ident::spanned(ty.to_string(), span_of(e.span()))),
        );
    let inheritance = just(Token::Colon).ignore_then(
        type_parser()
            .separated_by(just(Token::Comma))
            .at_least(1)
            .collect::<Vec<_>>(),
    );
    let members = decl
        .then_ignore(just(Token::Semicolon).repeated())
        .repeated()
        .collect::<Vec<_>>()
        .delimited_by(just(Token::LBrace), just(Token::RBrace))
        .map_with(|members, e| (members, span_of(e.span())));

    decl_prefix(src)
        .then(choice((nominal, extension)))
        .then(generic_params())
        .then(inheritance.or_not())
        .then(where_clause().or_not())
        .then(members)
        .map_with(
            |(
                (((((attributes, modifiers), (kind, name)), generic_params), inheritance), where_clause),
                (members, body_span),
            ),
             e| {
                Decl::Type(TypeDecl {
                    attributes,
                    modifiers,
                    kind,
                    name,
                    generic_params,
                    inheritance: inheritance.unwrap_or_default(),
                    where_clause,
                    members,
                    span: span_of(e.span()),
                    body_span,
                })
            },
        )
        .labelled("type declaration")
        .boxed()
}

/// Parses any declaration, recursing into type members.
pub fn decl_parser<'tokens, 'src: 'tokens, I>(
    src: &'src str,
) -> impl Parser<'tokens, I, Decl, ParserError<'tokens, 'src>> + Clone
where
    I: TokenInput<'tokens, 'src>,
{
    recursive(move |decl| {
        choice((
            type_decl(src, decl),
            function_decl(src),
            initializer_decl(src),
            variable_decl(src),
            enum_case_decl(src),
            type_alias_decl(src),
            import_decl(src),
        ))
        .labelled("declaration")
    })
}

/// Parses a whole file.
pub fn source_file_parser<'tokens, 'src: 'tokens, I>(
    src: &'src str,
) -> impl Parser<'tokens, I, SourceFile, ParserError<'tokens, 'src>> + Clone
where
    I: TokenInput<'tokens, 'src>,
{
    decl_parser(src)
        .then_ignore(just(Token::Semicolon).repeated())
        .repeated()
        .collect::<Vec<_>>()
        .map(|decls| SourceFile { decls })
}
