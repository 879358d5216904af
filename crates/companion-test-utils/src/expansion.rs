use companion_expand::{Host, HostOutput, analyze, synthesize};
use companion_prettyless::PrettyPrintExt;

use crate::{normalize_whitespace, parse_decl};

#[cfg(feature = "compiler")]
use crate::compiler::{assert_valid_protocol_requirement, assert_valid_source};

/// Expand `input` with the default configuration, panicking on parse
/// errors.
pub fn expand(input: &str) -> HostOutput {
    match Host::default().expand_source(input) {
        Ok(output) => output,
        Err(err) => panic!("{}", err),
    }
}

/// Assert that expanding `input` gives `expected` (whitespace-normalized)
/// and reports no diagnostics.
///
/// With the `compiler` feature the expanded source is also handed to the
/// compiler named by `COMPANION_COMPILER`, when set.
#[track_caller]
pub fn assert_expansion(input: &str, expected: &str) {
    assert_expansion_with(&Host::default(), input, expected);
}

#[track_caller]
pub fn assert_expansion_with(host: &Host, input: &str, expected: &str) {
    let output = match host.expand_source(input) {
        Ok(output) => output,
        Err(err) => panic!("{}", err),
    };
    let rendered: Vec<_> = output.diagnostics.iter().map(|d| d.render(input)).collect();
    assert!(rendered.is_empty(), "unexpected diagnostics: {:#?}", rendered);
    assert_eq!(
        normalize_whitespace(&output.source),
        normalize_whitespace(expected),
        "\nexpanded source:\n{}",
        output.source
    );
    #[cfg(feature = "compiler")]
    assert_valid_source(&output.source);
}

/// Assert that expanding `input` reports exactly `expected`, each written
/// as `error[<id>] <line>:<col>: <message>`.
#[track_caller]
pub fn assert_diagnostics(input: &str, expected: &[&str]) {
    let output = expand(input);
    let rendered: Vec<_> = output.diagnostics.iter().map(|d| d.render(input)).collect();
    assert_eq!(rendered, expected);
}

/// Assert that the requirement synthesized from `member` reads `expected`,
/// and that `expected` is a valid protocol requirement (see
/// [`assert_expansion`]).
#[track_caller]
pub fn assert_requirement(member: &str, expected: &str) {
    let decl = parse_decl(member);
    let analysis = match analyze(&decl) {
        Ok(Some(analysis)) => analysis,
        Ok(None) => panic!("{} does not produce a requirement", decl.kind_name()),
        Err(err) => panic!("{}", err),
    };
    assert_eq!(
        normalize_whitespace(&synthesize(&analysis).sprint()),
        normalize_whitespace(expected)
    );
    #[cfg(feature = "compiler")]
    assert_valid_protocol_requirement(expected);
}
