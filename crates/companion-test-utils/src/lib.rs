mod expansion;
pub mod parser;

#[cfg(feature = "compiler")]
pub mod compiler;

pub use expansion::{
    assert_diagnostics, assert_expansion, assert_expansion_with, assert_requirement, expand,
};
pub use parser::{parse_decl, parse_type};

/// Collapse every run of whitespace into one space and trim both ends.
///
/// Expansions are compared after this, so indentation and line breaks in
/// expected text do not matter.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
