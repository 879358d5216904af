use companion_chumsky::{parse_decl, parse_source};
use companion_syntax::*;
use prettyless::DocAllocator;

use crate::{Config, Document, PrettyPrintExt};

fn unimplemented() -> Expr {
    Expr::ident("unimplemented").call(vec![])
}

fn foo_type() -> TypeRef {
    TypeRef::function(
        vec![TupleTypeElement::new(TypeRef::named("String"))],
        Effects::new(true, true),
        TypeRef::named("String"),
    )
}

fn reprint(src: &str) -> String {
    match parse_decl(src) {
        Ok(decl) => decl.sprint(),
        Err(err) => panic!("failed to parse: {}", err),
    }
}

#[test]
fn test_document_list() {
    let doc = Document::new(Config::default());
    let items = vec![1, 2, 3];
    let result = doc.list(items.iter(), ", ", |i| doc.text(format!("{}", i)));
    let mut buf = String::new();
    result.render_fmt(80, &mut buf).unwrap();
    insta::assert_snapshot!(buf, @"1, 2, 3");
}

#[test]
fn test_empty_braced_block() {
    let doc = Document::new(Config::default());
    let mut buf = String::new();
    (doc.text("struct A ") + doc.braced(std::iter::empty()))
        .render_fmt(80, &mut buf)
        .unwrap();
    assert_eq!(buf, "struct A {\n}");
}

#[test]
fn test_protocol_requirements() {
    let protocol = TypeDecl::builder()
        .kind(TypeKind::Protocol)
        .name("MyDependencyProtocol")
        .inheritance(vec![TypeRef::named("AnyObject")])
        .members(vec![
            Decl::Function(
                FunctionDecl::builder()
                    .name("foo")
                    .params(vec![Param::new("bar", TypeRef::named("String"))])
                    .effects(Effects::new(true, true))
                    .output(TypeRef::named("String"))
                    .build(),
            ),
            Decl::Variable(
                VariableDecl::builder()
                    .binding(BindingKind::Var)
                    .name("count")
                    .ty(TypeRef::named("Int"))
                    .accessors(AccessorBlock::Accessors(vec![
                        Accessor::requirement(AccessorKind::Get, Effects::new(true, false)),
                        Accessor::requirement(AccessorKind::Set, Effects::NONE),
                    ]))
                    .build(),
            ),
        ])
        .build();

    insta::assert_snapshot!(protocol.sprint(), @r"
    protocol MyDependencyProtocol: AnyObject {
        func foo(bar: String) async throws -> String
        var count: Int { get async set }
    }
    ");
}

#[test]
fn test_mock_members() {
    let slot = VariableDecl::builder()
        .binding(BindingKind::Var)
        .name("_foo")
        .ty(foo_type())
        .initializer(unimplemented())
        .build();
    let forward = FunctionDecl::builder()
        .name("foo")
        .params(vec![Param::new("bar", TypeRef::named("String"))])
        .effects(Effects::new(true, true))
        .output(TypeRef::named("String"))
        .body(CodeBlock::new(vec![Stmt::Return(Some(
            Expr::ident("_foo")
                .call(vec![Argument::unlabeled(Expr::ident("bar"))])
                .with_effects(Effects::new(true, true)),
        ))]))
        .build();
    let init = InitializerDecl::builder()
        .params(vec![
            Param::new(
                "foo",
                TypeRef::attributed(vec![Attribute::new("escaping")], foo_type()),
            )
            .with_default(unimplemented()),
        ])
        .body(CodeBlock::new(vec![Stmt::assign(
            Expr::ident("self").member("_foo"),
            Expr::ident("foo"),
        )]))
        .build();
    let mock = TypeDecl::builder()
        .kind(TypeKind::Class)
        .name("MyDependencyMock")
        .inheritance(vec![TypeRef::named("MyDependencyProtocol")])
        .members(vec![
            Decl::Variable(slot),
            Decl::Function(forward),
            Decl::Initializer(init),
        ])
        .build();

    insta::assert_snapshot!(mock.sprint(), @r"
    class MyDependencyMock: MyDependencyProtocol {
        var _foo: (String) async throws -> String = unimplemented()
        func foo(bar: String) async throws -> String {
            return try await _foo(bar)
        }
        init(foo: @escaping (String) async throws -> String = unimplemented()) {
            self._foo = foo
        }
    }
    ");
}

#[test]
fn test_switch_cases_align_with_switch() {
    let encode_type = |case: &str| {
        Stmt::Verbatim(format!(
            "try container.encode(SubType.{}, forKey: .type)",
            case
        ))
    };
    let encode = FunctionDecl::builder()
        .name("encode")
        .params(vec![Param {
            second_name: Some(Ident::new("encoder")),
            ..Param::new("to", TypeRef::named("Encoder"))
        }])
        .effects(Effects::new(false, true))
        .body(CodeBlock::new(vec![
            Stmt::binding(
                BindingKind::Var,
                "container",
                Expr::ident("encoder").member("container").call(vec![
                    Argument::labeled("keyedBy", Expr::ident("CodingKeys").member("self")),
                ]),
            ),
            Stmt::Switch {
                subject: Expr::ident("self"),
                cases: vec![
                    SwitchCase::new(vec![Pattern::enum_case("nobody")], vec![encode_type("nobody")]),
                    SwitchCase::new(
                        vec![Pattern::enum_case_binding("user", vec![Ident::new("user")])],
                        vec![
                            encode_type("user"),
                            Stmt::Verbatim("try container.encode(user, forKey: .user)".into()),
                        ],
                    ),
                ],
            },
        ]))
        .build();

    insta::assert_snapshot!(encode.sprint(), @r"
    func encode(to encoder: Encoder) throws {
        var container = encoder.container(keyedBy: CodingKeys.self)
        switch self {
        case .nobody:
            try container.encode(SubType.nobody, forKey: .type)
        case .user(let user):
            try container.encode(SubType.user, forKey: .type)
            try container.encode(user, forKey: .user)
        }
    }
    ");
}

#[test]
fn test_enum_case_list() {
    let keys = TypeDecl::builder()
        .kind(TypeKind::Enum)
        .name("CodingKeys")
        .modifiers(vec![Modifier::Access(AccessLevel::Private)])
        .inheritance(vec![TypeRef::named("String"), TypeRef::named("CodingKey")])
        .members(vec![Decl::EnumCase(EnumCaseDecl::new(vec![
            EnumCaseElement::new("user"),
            EnumCaseElement::new("type"),
        ]))])
        .build();

    insta::assert_snapshot!(keys.sprint(), @r"
    private enum CodingKeys: String, CodingKey {
        case user, type
    }
    ");
}

#[test]
fn test_parsed_declaration_reprints() {
    let src = "\
public final class Service {
    private(set) var count: Int
    var label: String {
        get {
            return name
        }
        set {
            update(newValue)
        }
    }
    func run(_ input: Input, retries: Int = 3) async throws -> Output where Input: Sendable {
        let value = try await work(input)
        return value
    }
}
";
    assert_eq!(reprint(src), src);
}

#[test]
fn test_single_line_body_is_expanded() {
    insta::assert_snapshot!(reprint("var total: Int { return a + b }"), @r"
    var total: Int {
        return a + b
    }
    ");
}

#[test]
fn test_tab_spaces() {
    let decl = parse_decl("struct A { let x: Int }").unwrap();
    let output = decl.sprint_with_config(Config::default().with_tab_spaces(2));
    assert_eq!(output, "struct A {\n  let x: Int\n}\n");
}

#[test]
fn test_source_file_separates_declarations() {
    let file = parse_source("import Foundation\nstruct A {}").unwrap();
    assert_eq!(file.sprint(), "import Foundation\n\nstruct A {\n}\n");
}

#[test]
fn test_write() {
    let decl = parse_decl("typealias Handler<T> = (T) -> Void").unwrap();
    let mut out = Vec::new();
    decl.write(&mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "typealias Handler<T> = (T) -> Void\n");
}
