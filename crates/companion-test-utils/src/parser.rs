use companion_syntax::{Decl, TypeRef};

pub use companion_chumsky::tokenize;

/// Parse exactly one declaration, panicking with the parse error and its
/// position.
pub fn parse_decl(input: &str) -> Decl {
    match companion_chumsky::parse_decl(input) {
        Ok(decl) => decl,
        Err(err) => panic!("{} at {:?} in:\n{}", err, err.span.line_col(input), input),
    }
}

pub fn parse_type(input: &str) -> TypeRef {
    match companion_chumsky::parse_type(input) {
        Ok(ty) => ty,
        Err(err) => panic!("{} at {:?} in:\n{}", err, err.span.line_col(input), input),
    }
}
