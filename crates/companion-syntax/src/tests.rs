use crate::*;

fn escaping(ty: TypeRef) -> TypeRef {
    TypeRef::attributed(vec![Attribute::new("escaping")], ty)
}

#[test]
fn test_function_type_display() {
    let ty = TypeRef::function(
        vec![
            TupleTypeElement::new(TypeRef::named("String")),
            TupleTypeElement::new(TypeRef::named("Int")),
        ],
        Effects::new(true, true),
        TypeRef::named("String"),
    );
    assert_eq!(ty.to_string(), "(String, Int) async throws -> String");
    assert_eq!(
        escaping(ty).to_string(),
        "@escaping (String, Int) async throws -> String"
    );
}

#[test]
fn test_postfix_types_parenthesize_function_types() {
    let function = TypeRef::function(vec![], Effects::NONE, TypeRef::void());
    assert_eq!(
        TypeRef::Optional(Box::new(function)).to_string(),
        "(() -> Void)?"
    );
    let array = TypeRef::Array(Box::new(TypeRef::Optional(Box::new(TypeRef::named("Int")))));
    assert_eq!(array.to_string(), "[Int?]");
}

#[test]
fn test_named_types() {
    let nested = TypeRef::path(["User", "Profile"]);
    assert_eq!(nested.to_string(), "User.Profile");
    assert!(nested.is_simple_named());

    let generic = TypeRef::Named(vec![TypeSegment {
        name: "Result".into(),
        generic_args: vec![TypeRef::named("User"), TypeRef::named("Error")],
    }]);
    assert_eq!(generic.to_string(), "Result<User, Error>");
    assert!(!generic.is_simple_named());
    assert_eq!(generic.last_name().map(Ident::as_str), Some("Result"));

    let dictionary = TypeRef::Dictionary {
        key: Box::new(TypeRef::named("String")),
        value: Box::new(TypeRef::Existential(Box::new(TypeRef::named("Codable")))),
    };
    assert_eq!(dictionary.to_string(), "[String: any Codable]");
}

#[test]
fn test_where_clause_and_generics() {
    let params = vec![
        GenericParam::new("Input"),
        GenericParam::constrained("Output", TypeRef::named("Decodable")),
    ];
    assert_eq!(GenericParams(&params).to_string(), "<Input, Output: Decodable>");
    assert_eq!(GenericParams(&[]).to_string(), "");

    let clause = WhereClause::new(vec![
        WhereRequirement::Conformance {
            subject: TypeRef::named("Input"),
            constraint: TypeRef::named("CustomStringConvertible"),
        },
        WhereRequirement::SameType {
            lhs: TypeRef::path(["Output", "Element"]),
            rhs: TypeRef::named("Int"),
        },
    ]);
    assert_eq!(
        clause.to_string(),
        "where Input: CustomStringConvertible, Output.Element == Int"
    );
}

#[test]
fn test_param_names() {
    let labeled = Param::new("bar", TypeRef::named("String"));
    assert_eq!(labeled.label().map(Ident::as_str), Some("bar"));
    assert_eq!(labeled.binding_name().as_str(), "bar");
    assert_eq!(labeled.to_string(), "bar: String");

    let mut unlabeled = Param::new("_", TypeRef::named("Input"));
    unlabeled.second_name = Some("input".into());
    assert_eq!(unlabeled.label(), None);
    assert_eq!(unlabeled.binding_name().as_str(), "input");
    assert_eq!(unlabeled.to_string(), "_ input: Input");

    let defaulted = Param::new("foo", escaping(TypeRef::function(vec![], Effects::NONE, TypeRef::named("String"))))
        .with_default(Expr::ident("unimplemented").call(vec![]));
    assert_eq!(
        defaulted.to_string(),
        "foo: @escaping () -> String = unimplemented()"
    );
}

#[test]
fn test_expr_effects() {
    let call = Expr::ident("_foo").call(vec![
        Argument::unlabeled(Expr::ident("bar")),
        Argument::unlabeled(Expr::ident("baz")),
    ]);
    assert_eq!(call.clone().with_effects(Effects::NONE).to_string(), "_foo(bar, baz)");
    assert_eq!(call.clone().with_effects(Effects::new(true, false)).to_string(), "await _foo(bar, baz)");
    assert_eq!(call.clone().with_effects(Effects::new(false, true)).to_string(), "try _foo(bar, baz)");
    assert_eq!(call.with_effects(Effects::new(true, true)).to_string(), "try await _foo(bar, baz)");
}

#[test]
fn test_patterns_and_statements() {
    let pattern = Pattern::enum_case_binding("user", vec!["user".into(), "role".into()]);
    assert_eq!(pattern.to_string(), ".user(let user, let role)");
    assert_eq!(SwitchLabel::Case(vec![Pattern::enum_case("nobody")]).to_string(), "case .nobody:");

    let encode = Expr::ident("container").member("encode").call(vec![
        Argument::unlabeled(Expr::ident("user")),
        Argument::labeled("forKey", Expr::implicit_member("user")),
    ]);
    assert_eq!(
        Stmt::Expr(Expr::Try(Box::new(encode))).to_string(),
        "try container.encode(user, forKey: .user)"
    );
    assert_eq!(
        Stmt::assign(
            Expr::ident("_foo"),
            Expr::closure(vec![], Expr::ident("newValue"))
        )
        .to_string(),
        "_foo = { newValue }"
    );
}

#[test]
fn test_verbatim_block_is_dedented() {
    let block = CodeBlock::verbatim("\n        let x = 1\n            return x\n\n    ");
    assert_eq!(
        block.statements,
        vec![
            Stmt::Verbatim("let x = 1".into()),
            Stmt::Verbatim("    return x".into()),
        ]
    );
    assert!(CodeBlock::verbatim("   \n ").is_empty());
}

#[test]
fn test_modifier_queries() {
    let modifiers = vec![
        Modifier::Access(AccessLevel::Public),
        Modifier::SetterAccess(AccessLevel::Private),
        Modifier::Static,
    ];
    assert_eq!(modifiers.access_level(), Some(AccessLevel::Public));
    assert_eq!(modifiers.setter_access_level(), Some(AccessLevel::Private));
    assert!(modifiers.is_public());
    assert!(modifiers.is_type_level());
    assert_eq!(Modifier::SetterAccess(AccessLevel::Private).to_string(), "private(set)");
    assert!(AccessLevel::Open.is_public());
    assert!(!AccessLevel::Package.is_public());
}

#[test]
fn test_type_decl_builder() {
    let decl = TypeDecl::builder()
        .kind(TypeKind::Class)
        .name("MyDependency")
        .inheritance(vec![TypeRef::attributed(
            vec![Attribute::new("unchecked")],
            TypeRef::named("Sendable"),
        )])
        .build();
    assert!(decl.inherits("Sendable"));
    assert!(!decl.inherits("Codable"));
    assert!(decl.members.is_empty());
    assert!(decl.span.is_detached());
}

#[test]
fn test_ident_compares_text_only() {
    let parsed = Ident::spanned("foo", Span::new(4, 7));
    assert_eq!(parsed, Ident::new("foo"));
    assert_eq!(parsed.prefixed("_").as_str(), "_foo");
    assert_eq!(parsed.prefixed("_").span, Span::new(4, 7));
    assert!(Ident::new("_").is_wildcard());
}

#[test]
fn test_span_line_col() {
    let src = "struct A {\n    func foo()\n}";
    assert_eq!(Span::new(0, 6).line_col(src), (1, 1));
    assert_eq!(Span::new(15, 19).line_col(src), (2, 5));
    assert_eq!(Span::new(4, 2).join(Span::DETACHED), Span::new(4, 2));
}
