use companion_chumsky::parse_decl;
use companion_prettyless::PrettyPrintExt;
use companion_syntax::{Attribute, Decl, TypeRef};

use super::*;
use crate::{BasicContext, ExpansionConfig};

fn annotated(src: &str) -> (Attribute, Decl) {
    let decl = parse_decl(src).unwrap();
    let attribute = decl.attributes()[0].clone();
    (attribute, decl)
}

fn expand_with(src: &str, config: ExpansionConfig) -> String {
    let (attribute, decl) = annotated(src);
    let mut context = BasicContext::new(config);
    match AutoDependency::expand_peers(&attribute, &decl, &mut context) {
        Ok(peers) => peers.sprint(),
        Err(err) => panic!("expansion failed: {}", err),
    }
}

fn expand(src: &str) -> String {
    expand_with(src, ExpansionConfig::default())
}

fn expand_err(src: &str) -> DiagnosticsError {
    let (attribute, decl) = annotated(src);
    let mut context = BasicContext::default();
    match AutoDependency::expand_peers(&attribute, &decl, &mut context) {
        Ok(peers) => panic!("expected diagnostics, got {}", peers.sprint()),
        Err(err) => err,
    }
}

#[test]
fn test_basic_expansion() {
    let output = expand(
        r#"
@AutoDependency
final class MyDependency {
    func foo() -> String {
        return "bar"
    }
}"#,
    );
    insta::assert_snapshot!(output, @r"
    protocol MyDependencyProtocol: AnyObject {
        func foo() -> String
    }

    class MyDependencyMock: MyDependencyProtocol {
        var _foo: () -> String = unimplemented()
        func foo() -> String {
            return _foo()
        }
        init(foo: @escaping () -> String = unimplemented()) {
            self._foo = foo
        }
    }
    ");
}

#[test]
fn test_public_expansion() {
    let output = expand(
        r#"
@AutoDependency
public final class MyDependency {
    public func foo() -> String {
        return "bar"
    }
    func cantTouchMe() {}
    var meNeither = 0
}"#,
    );
    insta::assert_snapshot!(output, @r"
    public protocol MyDependencyProtocol: AnyObject {
        func foo() -> String
    }

    open class MyDependencyMock: MyDependencyProtocol {
        var _foo: () -> String = unimplemented()
        public func foo() -> String {
            return _foo()
        }
        public init(foo: @escaping () -> String = unimplemented()) {
            self._foo = foo
        }
    }
    ");
}

#[test]
fn test_multiple_requirements_keep_declaration_order() {
    let output = expand(
        r#"
@AutoDependency
final class MyDependency {
    func foo() -> String {
        return "bar"
    }
    func bar() -> String {
        return "foo"
    }
}"#,
    );
    insta::assert_snapshot!(output, @r"
    protocol MyDependencyProtocol: AnyObject {
        func foo() -> String
        func bar() -> String
    }

    class MyDependencyMock: MyDependencyProtocol {
        var _foo: () -> String = unimplemented()
        func foo() -> String {
            return _foo()
        }
        var _bar: () -> String = unimplemented()
        func bar() -> String {
            return _bar()
        }
        init(foo: @escaping () -> String = unimplemented(), bar: @escaping () -> String = unimplemented()) {
            self._foo = foo
            self._bar = bar
        }
    }
    ");
}

#[test]
fn test_forwarding_applies_effects() {
    for (effects, call) in [
        ("", "_foo(bar, baz)"),
        (" async", "await _foo(bar, baz)"),
        (" throws", "try _foo(bar, baz)"),
        (" async throws", "try await _foo(bar, baz)"),
    ] {
        let output = expand(&format!(
            "@AutoDependency
final class MyDependency {{
    func foo(bar: String, baz: Int){} -> String {{
        return bar
    }}
}}",
            effects
        ));
        assert!(
            output.contains(&format!("    func foo(bar: String, baz: Int){} -> String\n", effects)),
            "{}",
            output
        );
        assert!(
            output.contains(&format!(
                "    var _foo: (String, Int){} -> String = unimplemented()\n",
                effects
            )),
            "{}",
            output
        );
        assert!(output.contains(&format!("        return {}\n", call)), "{}", output);
        assert!(
            output.contains(&format!(
                "    init(foo: @escaping (String, Int){} -> String = unimplemented()) {{\n",
                effects
            )),
            "{}",
            output
        );
    }
}

#[test]
fn test_struct_keeps_mutating() {
    let output = expand(
        "
@AutoDependency
struct Counter {
    mutating func increment(by amount: Int) {
        value += amount
    }
}",
    );
    insta::assert_snapshot!(output, @r"
    protocol CounterProtocol {
        mutating func increment(by amount: Int)
    }

    struct CounterMock: CounterProtocol {
        var _increment: (Int) -> Void = unimplemented()
        mutating func increment(by amount: Int) {
            return _increment(amount)
        }
        init(increment: @escaping (Int) -> Void = unimplemented()) {
            self._increment = increment
        }
    }
    ");
}

#[test]
fn test_actor_expansion() {
    let output = expand(
        "
@AutoDependency
actor Cache {
    func value(for key: String) async -> Int? {
        storage[key]
    }
}",
    );
    insta::assert_snapshot!(output, @r"
    protocol CacheProtocol: Actor {
        func value(for key: String) async -> Int?
    }

    actor CacheMock: CacheProtocol {
        var _value: (String) async -> Int? = unimplemented()
        func value(for key: String) async -> Int? {
            return await _value(key)
        }
        init(value: @escaping (String) async -> Int? = unimplemented()) {
            self._value = value
        }
    }
    ");
}

#[test]
fn test_shareable_class() {
    let output = expand(
        "
@AutoDependency
final class Client: Sendable {
    func fetch() throws -> Data {
        try load()
    }
}",
    );
    assert!(output.starts_with("protocol ClientProtocol: AnyObject, Sendable {\n"));
    assert!(output.contains("\nclass ClientMock: ClientProtocol, @unchecked Sendable {\n"));
    assert!(output.contains("        return try _fetch()\n"));
}

#[test]
fn test_unchecked_sendable_counts_as_shareable() {
    let (attribute, decl) =
        annotated("@AutoDependency final class Client: Base, @unchecked Sendable {}");
    let config = DependencyConfig::default();
    let dependency = AutoDependency::new(&attribute, &decl, &config).unwrap();
    assert!(dependency.is_shareable());
    assert!(!dependency.is_public());
    assert_eq!(dependency.kind(), DependencyKind::Class);
}

#[test]
fn test_shareable_struct_mock_has_no_escape_hatch() {
    let output = expand("@AutoDependency public struct Clock: Sendable { public func now() -> Date { Date() } }");
    assert!(output.starts_with("public protocol ClockProtocol: Sendable {\n"));
    assert!(output.contains("\npublic struct ClockMock: ClockProtocol {\n"));
}

#[test]
fn test_property_mocks() {
    let output = expand(
        "
@AutoDependency
final class Store {
    let id: String
    var count: Int = 0
    private(set) var label: String = \"\"
    var total: Int { count * 2 }
    var remote: Data { get async throws { try await fetch() } }
}",
    );
    insta::assert_snapshot!(output, @r"
    protocol StoreProtocol: AnyObject {
        var id: String { get }
        var count: Int { get set }
        var label: String { get }
        var total: Int { get }
        var remote: Data { get async throws }
    }

    class StoreMock: StoreProtocol {
        var _id: () -> String = unimplemented()
        var id: String {
            return _id()
        }
        var _count: () -> Int = unimplemented()
        var count: Int {
            get {
                return _count()
            }
            set {
                _count = { newValue }
            }
        }
        var _label: () -> String = unimplemented()
        var label: String {
            return _label()
        }
        var _total: () -> Int = unimplemented()
        var total: Int {
            return _total()
        }
        var _remote: () async throws -> Data = unimplemented()
        var remote: Data {
            get async throws {
                return try await _remote()
            }
        }
        init(id: @escaping () -> String = unimplemented(), count: @escaping () -> Int = unimplemented(), label: @escaping () -> String = unimplemented(), total: @escaping () -> Int = unimplemented(), remote: @escaping () async throws -> Data = unimplemented()) {
            self._id = id
            self._count = count
            self._label = label
            self._total = total
            self._remote = remote
        }
    }
    ");
}

#[test]
fn test_generic_requirement_drops_defaults() {
    let output = expand(
        "
@AutoDependency
final class Decoder {
    func decode<T: Decodable>(_ data: Data, as type: T.Type = T.self) throws -> T where T: Sendable {
        try JSONDecoder().decode(type, from: data)
    }
}",
    );
    assert!(output.contains(
        "    func decode<T: Decodable>(_ data: Data, as type: T.Type) throws -> T where T: Sendable\n"
    ));
    assert!(output.contains("        return try _decode(data, type)\n"));
}

#[test]
fn test_static_members_and_initializers_are_skipped() {
    let output = expand(
        "
@AutoDependency
final class Service {
    static let shared: Service = Service()
    init() {}
}",
    );
    insta::assert_snapshot!(output, @r"
    protocol ServiceProtocol: AnyObject {
    }

    class ServiceMock: ServiceProtocol {
        init() {
        }
    }
    ");
}

#[test]
fn test_unsupported_declarations() {
    for (src, kind) in [
        ("@AutoDependency extension Service {}", "extension"),
        ("@AutoDependency protocol Service {}", "protocol"),
        ("@AutoDependency enum Service {}", "enum"),
        ("@AutoDependency func service() {}", "function"),
    ] {
        let err = expand_err(src);
        let [diagnostic] = err.diagnostics.as_slice() else {
            panic!("expected one diagnostic, got {:?}", err.diagnostics);
        };
        assert_eq!(diagnostic.id.to_string(), "companion.dependency.unsupported-type");
        assert_eq!(
            diagnostic.message,
            format!("@AutoDependency cannot be applied to {}", kind)
        );
        assert_eq!(diagnostic.anchor.kind, "attribute");
        assert_eq!(diagnostic.anchor.span.into_range(), 0..15);
    }
}

#[test]
fn test_property_shape_errors_abort_the_expansion() {
    let err = expand_err(
        "
@AutoDependency
final class Store {
    var count = 0
    var a: Int = 0, b: Int = 1
    func ok() {}
}",
    );
    let ids: Vec<_> = err.diagnostics.iter().map(|d| d.id.id).collect();
    assert_eq!(ids, ["missing-type-annotation", "missing-binding"]);
    assert_eq!(
        err.diagnostics[0].message,
        "property 'count' needs an explicit type annotation"
    );
}

#[test]
fn test_conformance() {
    let (attribute, decl) = annotated("@AutoDependency final class MyDependency {}");
    let mut context = BasicContext::default();
    let conformances =
        AutoDependency::expand_conformances(&attribute, &decl, &mut context).unwrap();
    assert_eq!(
        conformances,
        vec![Conformance::new(TypeRef::named("MyDependencyProtocol"))]
    );
}

#[test]
fn test_configured_names() {
    let config = ExpansionConfig::from_yaml_str(
        "dependency:\n  protocol_suffix: Interface\n  mock_suffix: Fake\n  slot_prefix: stub_\n  placeholder: fatalStub\n",
    )
    .unwrap();
    let output = expand_with("@AutoDependency struct Api { func ping() {} }", config);
    insta::assert_snapshot!(output, @r"
    protocol ApiInterface {
        func ping()
    }

    struct ApiFake: ApiInterface {
        var stub_ping: () -> Void = fatalStub()
        func ping() {
            return stub_ping()
        }
        init(ping: @escaping () -> Void = fatalStub()) {
            self.stub_ping = ping
        }
    }
    ");
}
