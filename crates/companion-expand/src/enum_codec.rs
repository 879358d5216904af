//! `@EnumCodable`: a tagged-union `Codable` implementation for enums
//! whose cases carry labeled payloads.
//!
//! A value is encoded as one keyed container holding the case name under
//! the discriminator key and every payload field under its label:
//!
//! ```text
//! { "type": "user", "profile": ... }
//! ```

use std::collections::BTreeSet;

use companion_syntax::{
    AccessLevel, Argument, Attribute, BindingKind, CodeBlock, Decl, Effects, EnumCaseDecl, EnumCaseElement,
    Expr, FunctionDecl, Ident, InitializerDecl, Modifier, ModifierList, Param, Pattern, Stmt,
    SwitchCase, TypeDecl, TypeKind, TypeRef,
};

use crate::{
    DiagnosticsError, EnumCodecConfig, ExpansionContext, MemberMacro,
    diagnostic::{Anchor, Diagnostic, DiagnosticMessage, EnumCodecDiagnostic},
    wire::TaggedUnion,
};

/// One payload field: its label and its declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadField {
    pub label: Ident,
    pub ty: TypeRef,
}

/// A validated enum case element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumCaseSpec {
    pub name: Ident,
    pub payload: Option<Vec<PayloadField>>,
}

/// A validated `@EnumCodable` enum.
#[derive(Debug, Clone)]
pub struct EnumCodec<'d> {
    decl: &'d TypeDecl,
    cases: Vec<EnumCaseSpec>,
    diagnostics: Vec<Diagnostic>,
    config: &'d EnumCodecConfig,
}

/// Marker type implementing [`MemberMacro`] for `@EnumCodable`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumCodable;

impl EnumCaseSpec {
    /// Validate one case element.
    ///
    /// The first invalid payload field rejects the whole element; its label
    /// is checked before its type.
    pub fn from_element(element: &EnumCaseElement) -> Result<Self, Diagnostic> {
        let payload = match &element.payload {
            None => None,
            Some(params) => {
                let mut fields = Vec::with_capacity(params.len());
                for param in params {
                    let anchor = Anchor::new("enum case parameter", param.span);
                    let Some(label) = param.label() else {
                        return Err(EnumCodecDiagnostic::MissingCaseLabel {
                            case: element.name.to_string(),
                        }
                        .at(anchor));
                    };
                    if !param.ty.is_simple_named() {
                        return Err(EnumCodecDiagnostic::UnsupportedPayloadType {
                            ty: param.ty.to_string(),
                        }
                        .at(anchor));
                    }
                    fields.push(PayloadField {
                        label: label.clone(),
                        ty: param.ty.clone(),
                    });
                }
                Some(fields)
            }
        };
        Ok(Self {
            name: element.name.clone(),
            payload,
        })
    }

    pub fn fields(&self) -> &[PayloadField] {
        self.payload.as_deref().unwrap_or_default()
    }
}

/// Sort names in reverse byte order, dropping duplicates.
///
/// Generated code has always listed cases and keys this way; changing it
/// would churn every existing expansion.
fn reverse_lexicographic<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<Ident> {
    names
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .rev()
        .map(Ident::new)
        .collect()
}

impl<'d> EnumCodec<'d> {
    /// Validate every case of `decl`. Invalid cases are left out and
    /// explained by [`EnumCodec::diagnostics`].
    pub fn new(decl: &'d TypeDecl, config: &'d EnumCodecConfig) -> Self {
        let mut cases = Vec::new();
        let mut diagnostics = Vec::new();
        for element in decl.enum_cases().flat_map(|case| &case.elements) {
            match EnumCaseSpec::from_element(element) {
                Ok(case) => cases.push(case),
                Err(diagnostic) => diagnostics.push(diagnostic),
            }
        }
        Self {
            decl,
            cases,
            diagnostics,
            config,
        }
    }

    pub fn cases(&self) -> &[EnumCaseSpec] {
        &self.cases
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Case names in the order the discriminator enum lists them.
    pub fn discriminators(&self) -> Vec<Ident> {
        reverse_lexicographic(self.cases.iter().map(|case| case.name.as_str()))
    }

    /// The discriminator key and every payload label, in the order the key
    /// enum lists them.
    pub fn coding_keys(&self) -> Vec<Ident> {
        let labels = self
            .cases
            .iter()
            .flat_map(|case| case.fields())
            .map(|field| field.label.as_str());
        reverse_lexicographic(std::iter::once(self.config.discriminator_key.as_str()).chain(labels))
    }

    /// The wire format the generated code implements.
    pub fn wire_model(&self) -> TaggedUnion {
        TaggedUnion::new(self.config.discriminator_key.as_str(), &self.cases)
    }

    /// The four members, or none when no valid case remains.
    pub fn generate(&self) -> Vec<Decl> {
        if self.cases.is_empty() {
            return Vec::new();
        }
        vec![
            Decl::Type(self.generate_discriminator_enum()),
            Decl::Type(self.generate_keys_enum()),
            Decl::Function(self.generate_encode()),
            Decl::Initializer(self.generate_decode()),
        ]
    }

    /// `enum SubType: String, Codable { case ... }` with the source enum's
    /// access level.
    pub fn generate_discriminator_enum(&self) -> TypeDecl {
        let modifiers = self
            .decl
            .modifiers
            .access_level()
            .map(Modifier::Access)
            .into_iter()
            .collect();
        TypeDecl::builder()
            .kind(TypeKind::Enum)
            .name(self.config.discriminator_enum.as_str())
            .modifiers(modifiers)
            .inheritance(vec![
                TypeRef::named("String"),
                TypeRef::named(self.config.codable_marker.as_str()),
            ])
            .members(vec![case_list(self.discriminators())])
            .build()
    }

    /// `private enum CodingKeys: String, CodingKey { case ... }`
    pub fn generate_keys_enum(&self) -> TypeDecl {
        TypeDecl::builder()
            .kind(TypeKind::Enum)
            .name(self.config.keys_enum.as_str())
            .modifiers(vec![Modifier::Access(AccessLevel::Private)])
            .inheritance(vec![
                TypeRef::named("String"),
                TypeRef::named(self.config.coding_key_marker.as_str()),
            ])
            .members(vec![case_list(self.coding_keys())])
            .build()
    }

    /// `public func encode(to encoder: Encoder) throws`
    pub fn generate_encode(&self) -> FunctionDecl {
        let container = Stmt::binding(
            BindingKind::Var,
            "container",
            Expr::ident("encoder")
                .member("container")
                .call(vec![self.keyed_by()]),
        );
        let cases = self
            .cases
            .iter()
            .map(|case| {
                let pattern = match &case.payload {
                    Some(fields) => Pattern::enum_case_binding(
                        case.name.clone(),
                        fields.iter().map(|field| field.label.clone()).collect(),
                    ),
                    None => Pattern::enum_case(case.name.clone()),
                };
                let discriminator = Expr::ident(self.config.discriminator_enum.as_str())
                    .member(case.name.clone());
                let mut body = vec![self.encode_stmt(
                    discriminator,
                    self.config.discriminator_key.as_str(),
                )];
                for field in case.fields() {
                    body.push(self.encode_stmt(Expr::Ident(field.label.clone()), field.label.clone()));
                }
                SwitchCase::new(vec![pattern], body)
            })
            .collect();

        FunctionDecl::builder()
            .name("encode")
            .modifiers(vec![Modifier::Access(AccessLevel::Public)])
            .params(vec![Param {
                second_name: Some(Ident::new("encoder")),
                ..Param::new("to", TypeRef::named(self.config.encoder_type.as_str()))
            }])
            .effects(Effects::new(false, true))
            .body(CodeBlock::new(vec![
                container,
                Stmt::Switch {
                    subject: Expr::ident("self"),
                    cases,
                },
            ]))
            .build()
    }

    /// `public init(from decoder: Decoder) throws`
    pub fn generate_decode(&self) -> InitializerDecl {
        let container = Stmt::binding(
            BindingKind::Let,
            "container",
            Expr::ident("decoder")
                .member("container")
                .call(vec![self.keyed_by()])
                .with_effects(Effects::new(false, true)),
        );
        let subtype = Stmt::binding(
            BindingKind::Let,
            "subtype",
            self.decode_expr(
                TypeRef::named(self.config.discriminator_enum.as_str()),
                self.config.discriminator_key.as_str(),
            ),
        );
        let cases = self
            .cases
            .iter()
            .map(|case| {
                let mut body: Vec<Stmt> = case
                    .fields()
                    .iter()
                    .map(|field| {
                        Stmt::binding(
                            BindingKind::Let,
                            field.label.clone(),
                            self.decode_expr(field.ty.clone(), field.label.clone()),
                        )
                    })
                    .collect();
                let value = match &case.payload {
                    Some(fields) => Expr::implicit_member(case.name.clone()).call(
                        fields
                            .iter()
                            .map(|field| {
                                Argument::labeled(field.label.clone(), Expr::Ident(field.label.clone()))
                            })
                            .collect(),
                    ),
                    None => Expr::implicit_member(case.name.clone()),
                };
                body.push(Stmt::assign(Expr::ident("self"), value));
                SwitchCase::new(vec![Pattern::enum_case(case.name.clone())], body)
            })
            .collect();

        InitializerDecl::builder()
            .modifiers(vec![Modifier::Access(AccessLevel::Public)])
            .params(vec![Param {
                second_name: Some(Ident::new("decoder")),
                ..Param::new("from", TypeRef::named(self.config.decoder_type.as_str()))
            }])
            .effects(Effects::new(false, true))
            .body(CodeBlock::new(vec![
                container,
                subtype,
                Stmt::Switch {
                    subject: Expr::ident("subtype"),
                    cases,
                },
            ]))
            .build()
    }

    /// `keyedBy: CodingKeys.self`
    fn keyed_by(&self) -> Argument {
        Argument::labeled(
            "keyedBy",
            Expr::ident(self.config.keys_enum.as_str()).member("self"),
        )
    }

    /// `try container.encode(value, forKey: .key)`
    fn encode_stmt(&self, value: Expr, key: impl Into<Ident>) -> Stmt {
        Stmt::Expr(
            Expr::ident("container")
                .member("encode")
                .call(vec![
                    Argument::unlabeled(value),
                    Argument::labeled("forKey", Expr::implicit_member(key)),
                ])
                .with_effects(Effects::new(false, true)),
        )
    }

    /// `try container.decode(Type.self, forKey: .key)`
    fn decode_expr(&self, ty: TypeRef, key: impl Into<Ident>) -> Expr {
        Expr::ident("container")
            .member("decode")
            .call(vec![
                Argument::unlabeled(Expr::Type(ty).member("self")),
                Argument::labeled("forKey", Expr::implicit_member(key)),
            ])
            .with_effects(Effects::new(false, true))
    }
}

/// A single `case a, b, c` member.
fn case_list(names: Vec<Ident>) -> Decl {
    Decl::EnumCase(EnumCaseDecl::new(
        names.into_iter().map(EnumCaseElement::new).collect(),
    ))
}

impl MemberMacro for EnumCodable {
    /// Reports `NotEnum` and produces nothing for non-enums; invalid cases
    /// are reported one by one and left out of the generated members.
    fn expand_members(
        _attribute: &Attribute,
        decl: &Decl,
        context: &mut dyn ExpansionContext,
    ) -> Result<Vec<Decl>, DiagnosticsError> {
        let Some(enum_decl) = decl.as_type().filter(|d| d.kind == TypeKind::Enum) else {
            context.diagnose(EnumCodecDiagnostic::NotEnum.at(Anchor::decl(decl)));
            return Ok(Vec::new());
        };

        let config = context.config().enum_codec.clone();
        let codec = EnumCodec::new(enum_decl, &config);
        tracing::debug!(
            ty = %enum_decl.name,
            cases = codec.cases().len(),
            rejected = codec.diagnostics().len(),
            "expanding @EnumCodable members"
        );
        for diagnostic in codec.diagnostics() {
            context.diagnose(diagnostic.clone());
        }
        Ok(codec.generate())
    }
}
