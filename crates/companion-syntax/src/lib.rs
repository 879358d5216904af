//! Syntax tree for annotated declarations and the declarations generated
//! from them.
//!
//! Inline nodes ([`TypeRef`], [`Param`], [`Expr`], clauses) print back to
//! source text through `Display`; whole declarations are laid out by the
//! pretty printer.

mod attr;
mod decl;
mod span;
mod stmt;
mod types;

pub use attr::{AccessLevel, Attribute, Modifier, ModifierList};
pub use decl::{
    Accessor, AccessorBlock, AccessorKind, Decl, EnumCaseDecl, EnumCaseElement, EnumCaseParam,
    FunctionDecl, ImportDecl, InitializerDecl, Param, PatternBinding, TypeAliasDecl, TypeDecl,
    TypeKind, VariableDecl,
};
pub use span::{Ident, Span, Spanned};
pub use stmt::{Argument, BindingKind, CodeBlock, Expr, Pattern, Stmt, SwitchCase, SwitchLabel};
pub use types::{
    Effects, FunctionType, GenericParam, GenericParams, TupleTypeElement, TypeRef, TypeSegment,
    WhereClause, WhereRequirement,
};

/// A parsed source file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SourceFile {
    pub decls: Vec<Decl>,
}

#[cfg(test)]
mod tests;
