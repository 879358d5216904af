use std::fmt::{self, Display, Formatter};

use crate::{
    Attribute, BindingKind, CodeBlock, Effects, Expr, GenericParam, Ident, Modifier, Span,
    TypeRef, WhereClause,
};

/// A declaration, either at file scope or as a member of a type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Decl {
    Type(TypeDecl),
    Function(FunctionDecl),
    Variable(VariableDecl),
    Initializer(InitializerDecl),
    EnumCase(EnumCaseDecl),
    TypeAlias(TypeAliasDecl),
    Import(ImportDecl),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Struct,
    Class,
    Actor,
    Enum,
    Protocol,
    Extension,
}

/// `struct`, `class`, `actor`, `enum`, `protocol` or `extension` with a
/// member block.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDecl {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    pub kind: TypeKind,
    /// For extensions, the extended type as written.
    pub name: Ident,
    pub generic_params: Vec<GenericParam>,
    pub inheritance: Vec<TypeRef>,
    pub where_clause: Option<WhereClause>,
    pub members: Vec<Decl>,
    pub span: Span,
    /// The member block including both braces.
    pub body_span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionDecl {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    pub name: Ident,
    pub generic_params: Vec<GenericParam>,
    pub params: Vec<Param>,
    pub effects: Effects,
    pub output: Option<TypeRef>,
    pub where_clause: Option<WhereClause>,
    pub body: Option<CodeBlock>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InitializerDecl {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    /// `init?`
    pub failable: bool,
    pub generic_params: Vec<GenericParam>,
    pub params: Vec<Param>,
    pub effects: Effects,
    pub where_clause: Option<WhereClause>,
    pub body: Option<CodeBlock>,
    pub span: Span,
}

/// `let`/`var` with one or more bindings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariableDecl {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    pub binding: BindingKind,
    pub bindings: Vec<PatternBinding>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PatternBinding {
    pub name: Ident,
    pub ty: Option<TypeRef>,
    pub initializer: Option<Expr>,
    pub accessors: Option<AccessorBlock>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AccessorBlock {
    /// `var x: Int { 42 }`
    Getter(CodeBlock),
    /// `{ get set }`, `{ get async { ... } }`
    Accessors(Vec<Accessor>),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Accessor {
    pub kind: AccessorKind,
    pub effects: Effects,
    /// `set(newName)`
    pub parameter: Option<Ident>,
    pub body: Option<CodeBlock>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessorKind {
    Get,
    Set,
    WillSet,
    DidSet,
}

/// `case a, b(x: Int)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumCaseDecl {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    pub elements: Vec<EnumCaseElement>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumCaseElement {
    pub name: Ident,
    pub payload: Option<Vec<EnumCaseParam>>,
    pub raw_value: Option<Expr>,
    pub span: Span,
}

/// One associated value of an enum case: `label: Type`, `_ name: Type`
/// or a bare `Type`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumCaseParam {
    pub first_name: Option<Ident>,
    pub second_name: Option<Ident>,
    pub ty: TypeRef,
    pub default: Option<Expr>,
    pub span: Span,
}

/// A function or initializer parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Param {
    /// The argument label, or `_`.
    pub first_name: Ident,
    /// The local name when it differs from the label.
    pub second_name: Option<Ident>,
    pub ty: TypeRef,
    pub variadic: bool,
    pub default: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeAliasDecl {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    pub name: Ident,
    pub generic_params: Vec<GenericParam>,
    pub target: TypeRef,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImportDecl {
    pub path: Vec<Ident>,
    pub span: Span,
}

impl Decl {
    pub fn span(&self) -> Span {
        match self {
            Decl::Type(decl) => decl.span,
            Decl::Function(decl) => decl.span,
            Decl::Variable(decl) => decl.span,
            Decl::Initializer(decl) => decl.span,
            Decl::EnumCase(decl) => decl.span,
            Decl::TypeAlias(decl) => decl.span,
            Decl::Import(decl) => decl.span,
        }
    }

    pub fn attributes(&self) -> &[Attribute] {
        match self {
            Decl::Type(decl) => &decl.attributes,
            Decl::Function(decl) => &decl.attributes,
            Decl::Variable(decl) => &decl.attributes,
            Decl::Initializer(decl) => &decl.attributes,
            Decl::EnumCase(decl) => &decl.attributes,
            Decl::TypeAlias(decl) => &decl.attributes,
            Decl::Import(_) => &[],
        }
    }

    pub fn modifiers(&self) -> &[Modifier] {
        match self {
            Decl::Type(decl) => &decl.modifiers,
            Decl::Function(decl) => &decl.modifiers,
            Decl::Variable(decl) => &decl.modifiers,
            Decl::Initializer(decl) => &decl.modifiers,
            Decl::EnumCase(decl) => &decl.modifiers,
            Decl::TypeAlias(decl) => &decl.modifiers,
            Decl::Import(_) => &[],
        }
    }

    /// A short noun for the kind of declaration, used in messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Decl::Type(decl) => decl.kind.keyword(),
            Decl::Function(_) => "function",
            Decl::Variable(_) => "variable",
            Decl::Initializer(_) => "initializer",
            Decl::EnumCase(_) => "enum case",
            Decl::TypeAlias(_) => "typealias",
            Decl::Import(_) => "import",
        }
    }

    pub fn as_type(&self) -> Option<&TypeDecl> {
        match self {
            Decl::Type(decl) => Some(decl),
            _ => None,
        }
    }
}

impl TypeKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            TypeKind::Struct => "struct",
            TypeKind::Class => "class",
            TypeKind::Actor => "actor",
            TypeKind::Enum => "enum",
            TypeKind::Protocol => "protocol",
            TypeKind::Extension => "extension",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "struct" => TypeKind::Struct,
            "class" => TypeKind::Class,
            "actor" => TypeKind::Actor,
            "enum" => TypeKind::Enum,
            "protocol" => TypeKind::Protocol,
            "extension" => TypeKind::Extension,
            _ => return None,
        })
    }
}

impl Display for TypeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[bon::bon]
impl TypeDecl {
    #[builder]
    pub fn new(
        kind: TypeKind,
        #[builder(into)] name: Ident,
        #[builder(default)] attributes: Vec<Attribute>,
        #[builder(default)] modifiers: Vec<Modifier>,
        #[builder(default)] generic_params: Vec<GenericParam>,
        #[builder(default)] inheritance: Vec<TypeRef>,
        where_clause: Option<WhereClause>,
        #[builder(default)] members: Vec<Decl>,
        #[builder(default)] span: Span,
        #[builder(default)] body_span: Span,
    ) -> Self {
        Self {
            attributes,
            modifiers,
            kind,
            name,
            generic_params,
            inheritance,
            where_clause,
            members,
            span,
            body_span,
        }
    }
}

impl TypeDecl {
    /// Whether the inheritance clause names `marker`, possibly as
    /// `@unchecked marker`.
    pub fn inherits(&self, marker: &str) -> bool {
        self.inheritance
            .iter()
            .any(|ty| ty.without_attributes().last_name().is_some_and(|n| n.as_str() == marker))
    }

    pub fn enum_cases(&self) -> impl Iterator<Item = &EnumCaseDecl> {
        self.members.iter().filter_map(|member| match member {
            Decl::EnumCase(case) => Some(case),
            _ => None,
        })
    }
}

#[bon::bon]
impl FunctionDecl {
    #[builder]
    pub fn new(
        #[builder(into)] name: Ident,
        #[builder(default)] attributes: Vec<Attribute>,
        #[builder(default)] modifiers: Vec<Modifier>,
        #[builder(default)] generic_params: Vec<GenericParam>,
        #[builder(default)] params: Vec<Param>,
        #[builder(default)] effects: Effects,
        output: Option<TypeRef>,
        where_clause: Option<WhereClause>,
        body: Option<CodeBlock>,
        #[builder(default)] span: Span,
    ) -> Self {
        Self {
            attributes,
            modifiers,
            name,
            generic_params,
            params,
            effects,
            output,
            where_clause,
            body,
            span,
        }
    }
}

#[bon::bon]
impl InitializerDecl {
    #[builder]
    pub fn new(
        #[builder(default)] attributes: Vec<Attribute>,
        #[builder(default)] modifiers: Vec<Modifier>,
        #[builder(default)] failable: bool,
        #[builder(default)] generic_params: Vec<GenericParam>,
        #[builder(default)] params: Vec<Param>,
        #[builder(default)] effects: Effects,
        where_clause: Option<WhereClause>,
        body: Option<CodeBlock>,
        #[builder(default)] span: Span,
    ) -> Self {
        Self {
            attributes,
            modifiers,
            failable,
            generic_params,
            params,
            effects,
            where_clause,
            body,
            span,
        }
    }
}

#[bon::bon]
impl VariableDecl {
    /// A declaration with a single binding.
    #[builder]
    pub fn new(
        binding: BindingKind,
        #[builder(into)] name: Ident,
        ty: Option<TypeRef>,
        initializer: Option<Expr>,
        accessors: Option<AccessorBlock>,
        #[builder(default)] attributes: Vec<Attribute>,
        #[builder(default)] modifiers: Vec<Modifier>,
        #[builder(default)] span: Span,
    ) -> Self {
        Self {
            attributes,
            modifiers,
            binding,
            bindings: vec![PatternBinding {
                name,
                ty,
                initializer,
                accessors,
                span,
            }],
            span,
        }
    }
}

impl VariableDecl {
    /// The binding when there is exactly one.
    pub fn single_binding(&self) -> Option<&PatternBinding> {
        match self.bindings.as_slice() {
            [binding] => Some(binding),
            _ => None,
        }
    }
}

impl AccessorBlock {
    pub fn accessor(&self, kind: AccessorKind) -> Option<&Accessor> {
        match self {
            AccessorBlock::Getter(_) => None,
            AccessorBlock::Accessors(accessors) => accessors.iter().find(|a| a.kind == kind),
        }
    }

    /// Whether the block defines a computed property, as opposed to
    /// observers on a stored one.
    pub fn is_computed(&self) -> bool {
        match self {
            AccessorBlock::Getter(_) => true,
            AccessorBlock::Accessors(accessors) => accessors
                .iter()
                .any(|a| matches!(a.kind, AccessorKind::Get | AccessorKind::Set)),
        }
    }
}

impl Accessor {
    /// An accessor without a body, as written in a protocol.
    pub fn requirement(kind: AccessorKind, effects: Effects) -> Self {
        Self {
            kind,
            effects,
            parameter: None,
            body: None,
        }
    }

    pub fn with_body(kind: AccessorKind, body: CodeBlock) -> Self {
        Self {
            kind,
            effects: Effects::NONE,
            parameter: None,
            body: Some(body),
        }
    }
}

impl AccessorKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            AccessorKind::Get => "get",
            AccessorKind::Set => "set",
            AccessorKind::WillSet => "willSet",
            AccessorKind::DidSet => "didSet",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "get" => AccessorKind::Get,
            "set" => AccessorKind::Set,
            "willSet" => AccessorKind::WillSet,
            "didSet" => AccessorKind::DidSet,
            _ => return None,
        })
    }
}

impl Display for Accessor {
    /// The accessor header: keyword, parameter and effects.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.keyword())?;
        if let Some(parameter) = &self.parameter {
            write!(f, "({})", parameter)?;
        }
        if !self.effects.is_empty() {
            write!(f, " {}", self.effects)?;
        }
        Ok(())
    }
}

impl EnumCaseDecl {
    pub fn new(elements: Vec<EnumCaseElement>) -> Self {
        Self {
            attributes: Vec::new(),
            modifiers: Vec::new(),
            elements,
            span: Span::DETACHED,
        }
    }
}

impl EnumCaseElement {
    pub fn new(name: impl Into<Ident>) -> Self {
        Self {
            name: name.into(),
            payload: None,
            raw_value: None,
            span: Span::DETACHED,
        }
    }

    pub fn with_payload(mut self, payload: Vec<EnumCaseParam>) -> Self {
        self.payload = Some(payload);
        self
    }
}

impl EnumCaseParam {
    pub fn labeled(label: impl Into<Ident>, ty: TypeRef) -> Self {
        Self {
            first_name: Some(label.into()),
            second_name: None,
            ty,
            default: None,
            span: Span::DETACHED,
        }
    }

    /// The label, unless absent or `_`.
    pub fn label(&self) -> Option<&Ident> {
        self.first_name.as_ref().filter(|name| !name.is_wildcard())
    }
}

impl Param {
    pub fn new(first_name: impl Into<Ident>, ty: TypeRef) -> Self {
        Self {
            first_name: first_name.into(),
            second_name: None,
            ty,
            variadic: false,
            default: None,
            span: Span::DETACHED,
        }
    }

    pub fn with_default(mut self, default: Expr) -> Self {
        self.default = Some(default);
        self
    }

    /// The argument label callers write, `None` for `_`.
    pub fn label(&self) -> Option<&Ident> {
        Some(&self.first_name).filter(|name| !name.is_wildcard())
    }

    /// The name the parameter is bound to inside the body.
    pub fn binding_name(&self) -> &Ident {
        self.second_name.as_ref().unwrap_or(&self.first_name)
    }
}

impl Display for Param {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.first_name)?;
        if let Some(second) = &self.second_name {
            write!(f, " {}", second)?;
        }
        write!(f, ": {}", self.ty)?;
        if self.variadic {
            f.write_str("...")?;
        }
        if let Some(default) = &self.default {
            write!(f, " = {}", default)?;
        }
        Ok(())
    }
}

impl Display for EnumCaseParam {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match (&self.first_name, &self.second_name) {
            (Some(first), Some(second)) => write!(f, "{} {}: ", first, second)?,
            (Some(first), None) => write!(f, "{}: ", first)?,
            _ => {}
        }
        write!(f, "{}", self.ty)?;
        if let Some(default) = &self.default {
            write!(f, " = {}", default)?;
        }
        Ok(())
    }
}

impl Display for EnumCaseElement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(payload) = &self.payload {
            f.write_str("(")?;
            crate::types::write_separated(f, payload, ", ")?;
            f.write_str(")")?;
        }
        if let Some(raw_value) = &self.raw_value {
            write!(f, " = {}", raw_value)?;
        }
        Ok(())
    }
}

impl Display for ImportDecl {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("import ")?;
        crate::types::write_separated(f, &self.path, ".")
    }
}
