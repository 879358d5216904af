use companion_chumsky::parse_decl;
use companion_expand::{Analysis, AnalyzeError, analyze, synthesize};
use companion_prettyless::PrettyPrintExt;

fn requirement(member: &str) -> String {
    let decl = parse_decl(member).unwrap();
    let analysis = analyze(&decl).unwrap().expect("member is analyzable");
    synthesize(&analysis).sprint().trim_end().to_string()
}

#[test]
fn test_function_signatures_round_trip() {
    let effects = ["", " async", " throws", " async throws"];
    for generic_params in ["", "<T: Codable>"] {
        for where_clause in ["", " where T: Sendable"] {
            for effect in effects {
                let abstract_form = format!(
                    "func load{}(_ value: T, into store: inout [String: T], limit: Int...){} -> Bool{}",
                    generic_params, effect, where_clause
                );
                let concrete = format!("public {} {{\n    true\n}}", abstract_form);
                assert_eq!(requirement(&concrete), abstract_form);
            }
        }
    }
}

#[test]
fn test_defaults_and_attributes_are_dropped() {
    assert_eq!(
        requirement("@discardableResult public func run(times: Int = 1, _ body: @escaping () -> Void) -> Int { 0 }"),
        "func run(times: Int, _ body: @escaping () -> Void) -> Int"
    );
}

#[test]
fn test_property_requirements() {
    for (member, expected) in [
        ("var x: Int", "var x: Int { get set }"),
        ("var x: Int = 0", "var x: Int { get set }"),
        ("let x: Int", "var x: Int { get }"),
        ("private(set) var x: Int = 0", "var x: Int { get }"),
        ("var x: Int { 1 }", "var x: Int { get }"),
        ("var x: Int { get { 1 } }", "var x: Int { get }"),
        ("var x: Int { get { 1 } set { } }", "var x: Int { get set }"),
        ("var x: Int { get async { 1 } }", "var x: Int { get async }"),
        ("var x: Int { get async throws { 1 } }", "var x: Int { get async throws }"),
        ("var x: Int { get throws { 1 } }", "var x: Int { get throws }"),
        ("var x: Int = 0 { didSet { } }", "var x: Int { get set }"),
    ] {
        assert_eq!(requirement(member), expected, "{}", member);
    }
}

#[test]
fn test_property_shape_errors() {
    let decl = parse_decl("var x = 0").unwrap();
    assert!(matches!(
        analyze(&decl),
        Err(AnalyzeError::MissingTypeAnnotation { ref name, .. }) if name.as_str() == "x"
    ));
    let decl = parse_decl("var a: Int = 0, b: Int = 1").unwrap();
    assert!(matches!(analyze(&decl), Err(AnalyzeError::MissingBinding { .. })));
}

#[test]
fn test_forwarding_shape() {
    let decl =
        parse_decl("func foo(bar: String, baz: Int) async throws -> String { bar }").unwrap();
    let Some(Analysis::Function(signature)) = analyze(&decl).unwrap() else {
        panic!("expected a function");
    };
    assert_eq!(
        signature.function_type().to_string(),
        "(String, Int) async throws -> String"
    );
    let arguments: Vec<_> = signature
        .forwarding_arguments()
        .iter()
        .map(|a| a.to_string())
        .collect();
    assert_eq!(arguments, ["bar", "baz"]);
}

#[test]
fn test_other_members_are_not_analyzed() {
    for member in ["init() {}", "typealias Id = String", "struct Nested {}"] {
        let decl = parse_decl(member).unwrap();
        assert_eq!(analyze(&decl).unwrap(), None, "{}", member);
    }
}
