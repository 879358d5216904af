use std::fmt::{self, Display, Formatter};

use crate::{Attribute, Ident, Span};

/// A type expression.
///
/// `TypeRef` is structural but opaque to the generators: they copy it
/// around and print it back. `Display` reproduces the source text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// `Int`, `User.Profile`, `Array<Int>`
    Named(Vec<TypeSegment>),
    /// `T?`
    Optional(Box<TypeRef>),
    /// `T!`
    ImplicitlyUnwrapped(Box<TypeRef>),
    /// `[T]`
    Array(Box<TypeRef>),
    /// `[K: V]`
    Dictionary { key: Box<TypeRef>, value: Box<TypeRef> },
    /// `(a: Int, String)`, `()`
    Tuple(Vec<TupleTypeElement>),
    /// `(Int, String) async throws -> Bool`
    Function(FunctionType),
    /// `@escaping () -> Void`, `@unchecked Sendable`
    Attributed {
        attributes: Vec<Attribute>,
        inner: Box<TypeRef>,
    },
    /// `A & B`
    Composition(Vec<TypeRef>),
    /// `some P`
    Opaque(Box<TypeRef>),
    /// `any P`
    Existential(Box<TypeRef>),
    /// `inout T`
    Inout(Box<TypeRef>),
}

/// One dot-separated component of a named type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeSegment {
    pub name: Ident,
    pub generic_args: Vec<TypeRef>,
}

/// An element of a tuple type or of a function type's parameter list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TupleTypeElement {
    pub label: Option<Ident>,
    pub ty: TypeRef,
    pub variadic: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionType {
    pub params: Vec<TupleTypeElement>,
    pub effects: Effects,
    pub output: Box<TypeRef>,
}

/// Effect specifiers of a signature, accessor or function type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Effects {
    pub is_async: bool,
    pub is_throws: bool,
}

/// `T` or `T: Constraint` inside `<...>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenericParam {
    pub name: Ident,
    pub constraint: Option<TypeRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WhereClause {
    pub requirements: Vec<WhereRequirement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WhereRequirement {
    /// `T: Constraint`
    Conformance { subject: TypeRef, constraint: TypeRef },
    /// `T == U`
    SameType { lhs: TypeRef, rhs: TypeRef },
}

impl TypeRef {
    /// A single-segment named type.
    pub fn named(name: impl Into<Ident>) -> Self {
        TypeRef::Named(vec![TypeSegment {
            name: name.into(),
            generic_args: Vec::new(),
        }])
    }

    /// A dotted path such as `User.Profile`.
    pub fn path<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Ident>,
    {
        TypeRef::Named(
            segments
                .into_iter()
                .map(|name| TypeSegment {
                    name: name.into(),
                    generic_args: Vec::new(),
                })
                .collect(),
        )
    }

    pub fn void() -> Self {
        TypeRef::named("Void")
    }

    pub fn function(params: Vec<TupleTypeElement>, effects: Effects, output: TypeRef) -> Self {
        TypeRef::Function(FunctionType {
            params,
            effects,
            output: Box::new(output),
        })
    }

    pub fn attributed(attributes: Vec<Attribute>, inner: TypeRef) -> Self {
        if attributes.is_empty() {
            return inner;
        }
        TypeRef::Attributed {
            attributes,
            inner: Box::new(inner),
        }
    }

    /// A named type without generic arguments, e.g. `User` or `User.Profile`.
    pub fn is_simple_named(&self) -> bool {
        match self {
            TypeRef::Named(segments) => segments.iter().all(|s| s.generic_args.is_empty()),
            _ => false,
        }
    }

    /// The last path segment of a named type.
    pub fn last_name(&self) -> Option<&Ident> {
        match self {
            TypeRef::Named(segments) => segments.last().map(|s| &s.name),
            TypeRef::Attributed { inner, .. } => inner.last_name(),
            _ => None,
        }
    }

    pub fn is_function(&self) -> bool {
        match self {
            TypeRef::Function(_) => true,
            TypeRef::Attributed { inner, .. } => inner.is_function(),
            _ => false,
        }
    }

    /// Strip type attributes such as `@escaping`.
    pub fn without_attributes(&self) -> &TypeRef {
        match self {
            TypeRef::Attributed { inner, .. } => inner.without_attributes(),
            other => other,
        }
    }

    /// Source span of the first identifier in this type, if parsed.
    pub fn span(&self) -> Span {
        match self {
            TypeRef::Named(segments) => segments
                .iter()
                .fold(Span::DETACHED, |span, s| span.join(s.name.span)),
            TypeRef::Optional(inner)
            | TypeRef::ImplicitlyUnwrapped(inner)
            | TypeRef::Array(inner)
            | TypeRef::Opaque(inner)
            | TypeRef::Existential(inner)
            | TypeRef::Inout(inner) => inner.span(),
            TypeRef::Dictionary { key, value } => key.span().join(value.span()),
            TypeRef::Tuple(elements) => elements
                .iter()
                .fold(Span::DETACHED, |span, e| span.join(e.ty.span())),
            TypeRef::Function(function) => function
                .params
                .iter()
                .fold(function.output.span(), |span, e| span.join(e.ty.span())),
            TypeRef::Attributed { attributes, inner } => attributes
                .iter()
                .fold(inner.span(), |span, a| span.join(a.span)),
            TypeRef::Composition(parts) => parts
                .iter()
                .fold(Span::DETACHED, |span, p| span.join(p.span())),
        }
    }

    fn needs_parens_before_postfix(&self) -> bool {
        matches!(
            self,
            TypeRef::Function(_)
                | TypeRef::Attributed { .. }
                | TypeRef::Composition(_)
                | TypeRef::Opaque(_)
                | TypeRef::Existential(_)
        )
    }

    fn fmt_postfix(&self, f: &mut Formatter<'_>, suffix: &str) -> fmt::Result {
        if self.needs_parens_before_postfix() {
            write!(f, "({}){}", self, suffix)
        } else {
            write!(f, "{}{}", self, suffix)
        }
    }
}

impl TupleTypeElement {
    pub fn new(ty: TypeRef) -> Self {
        Self {
            label: None,
            ty,
            variadic: false,
        }
    }

    pub fn variadic(ty: TypeRef) -> Self {
        Self {
            label: None,
            ty,
            variadic: true,
        }
    }
}

impl Effects {
    pub const NONE: Effects = Effects {
        is_async: false,
        is_throws: false,
    };

    pub fn new(is_async: bool, is_throws: bool) -> Self {
        Self { is_async, is_throws }
    }

    pub fn is_empty(&self) -> bool {
        !self.is_async && !self.is_throws
    }
}

impl GenericParam {
    pub fn new(name: impl Into<Ident>) -> Self {
        Self {
            name: name.into(),
            constraint: None,
        }
    }

    pub fn constrained(name: impl Into<Ident>, constraint: TypeRef) -> Self {
        Self {
            name: name.into(),
            constraint: Some(constraint),
        }
    }
}

impl WhereClause {
    pub fn new(requirements: Vec<WhereRequirement>) -> Self {
        Self { requirements }
    }
}

impl Display for TypeRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(segments) => {
                for (i, segment) in segments.iter().enumerate() {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    write!(f, "{}", segment)?;
                }
                Ok(())
            }
            TypeRef::Optional(inner) => inner.fmt_postfix(f, "?"),
            TypeRef::ImplicitlyUnwrapped(inner) => inner.fmt_postfix(f, "!"),
            TypeRef::Array(element) => write!(f, "[{}]", element),
            TypeRef::Dictionary { key, value } => write!(f, "[{}: {}]", key, value),
            TypeRef::Tuple(elements) => {
                f.write_str("(")?;
                write_separated(f, elements, ", ")?;
                f.write_str(")")
            }
            TypeRef::Function(function) => write!(f, "{}", function),
            TypeRef::Attributed { attributes, inner } => {
                for attribute in attributes {
                    write!(f, "{} ", attribute)?;
                }
                write!(f, "{}", inner)
            }
            TypeRef::Composition(parts) => write_separated(f, parts, " & "),
            TypeRef::Opaque(inner) => write!(f, "some {}", inner),
            TypeRef::Existential(inner) => write!(f, "any {}", inner),
            TypeRef::Inout(inner) => write!(f, "inout {}", inner),
        }
    }
}

impl Display for TypeSegment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.generic_args.is_empty() {
            f.write_str("<")?;
            write_separated(f, &self.generic_args, ", ")?;
            f.write_str(">")?;
        }
        Ok(())
    }
}

impl Display for TupleTypeElement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(label) = &self.label {
            write!(f, "{}: ", label)?;
        }
        write!(f, "{}", self.ty)?;
        if self.variadic {
            f.write_str("...")?;
        }
        Ok(())
    }
}

impl Display for FunctionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        write_separated(f, &self.params, ", ")?;
        f.write_str(")")?;
        if !self.effects.is_empty() {
            write!(f, " {}", self.effects)?;
        }
        write!(f, " -> {}", self.output)
    }
}

impl Display for Effects {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match (self.is_async, self.is_throws) {
            (true, true) => f.write_str("async throws"),
            (true, false) => f.write_str("async"),
            (false, true) => f.write_str("throws"),
            (false, false) => Ok(()),
        }
    }
}

impl Display for GenericParam {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.constraint {
            Some(constraint) => write!(f, "{}: {}", self.name, constraint),
            None => write!(f, "{}", self.name),
        }
    }
}

impl Display for WhereClause {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("where ")?;
        write_separated(f, &self.requirements, ", ")
    }
}

impl Display for WhereRequirement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            WhereRequirement::Conformance {
                subject,
                constraint,
            } => write!(f, "{}: {}", subject, constraint),
            WhereRequirement::SameType { lhs, rhs } => write!(f, "{} == {}", lhs, rhs),
        }
    }
}

/// Render `<A, B: C>`; nothing for an empty list.
pub struct GenericParams<'a>(pub &'a [GenericParam]);

impl Display for GenericParams<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return Ok(());
        }
        f.write_str("<")?;
        write_separated(f, self.0, ", ")?;
        f.write_str(">")
    }
}

pub(crate) fn write_separated<T: Display>(
    f: &mut Formatter<'_>,
    items: &[T],
    separator: &str,
) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}
