//! `@AutoDependency`: a protocol listing a type's operations, a mock
//! conforming to it, and the conformance of the original type.

use companion_syntax::{
    AccessLevel, Accessor, AccessorBlock, AccessorKind, Argument, Attribute, BindingKind,
    CodeBlock, Decl, Expr, FunctionDecl, Ident, InitializerDecl, Modifier, ModifierList, Param,
    Stmt, TypeDecl, TypeKind, TypeRef, VariableDecl,
};

use crate::{
    Conformance, ConformanceMacro, DependencyConfig, DiagnosticsError, ExpansionContext,
    PeerMacro,
    diagnostic::{Anchor, DependencyDiagnostic, DiagnosticMessage},
    policy::included,
    requirement::synthesize,
    signature::{Analysis, MemberSignature, PropertyRequirement, analyze},
};

/// The declaration forms `@AutoDependency` accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyKind {
    Struct,
    Class,
    Actor,
}

impl DependencyKind {
    pub fn from_type_kind(kind: TypeKind) -> Option<Self> {
        match kind {
            TypeKind::Struct => Some(DependencyKind::Struct),
            TypeKind::Class => Some(DependencyKind::Class),
            TypeKind::Actor => Some(DependencyKind::Actor),
            TypeKind::Enum | TypeKind::Protocol | TypeKind::Extension => None,
        }
    }

    pub fn type_kind(self) -> TypeKind {
        match self {
            DependencyKind::Struct => TypeKind::Struct,
            DependencyKind::Class => TypeKind::Class,
            DependencyKind::Actor => TypeKind::Actor,
        }
    }
}

/// A classified `@AutoDependency` declaration.
#[derive(Debug, Clone)]
pub struct AutoDependency<'d> {
    decl: &'d TypeDecl,
    kind: DependencyKind,
    is_public: bool,
    is_shareable: bool,
    config: &'d DependencyConfig,
}

/// A mock slot and the initializer parameter that fills it.
struct Slot {
    member: Ident,
    name: Ident,
    ty: TypeRef,
}

impl<'d> AutoDependency<'d> {
    /// Classify `decl`, failing with a diagnostic at `attribute` unless it
    /// is a struct, class or actor.
    pub fn new(
        attribute: &Attribute,
        decl: &'d Decl,
        config: &'d DependencyConfig,
    ) -> Result<Self, DiagnosticsError> {
        let unsupported = || {
            DiagnosticsError::single(
                DependencyDiagnostic::UnsupportedType {
                    kind: decl.kind_name(),
                }
                .at(Anchor::attribute(attribute)),
            )
        };
        let Decl::Type(type_decl) = decl else {
            return Err(unsupported());
        };
        let kind = DependencyKind::from_type_kind(type_decl.kind).ok_or_else(unsupported)?;

        Ok(Self {
            decl: type_decl,
            kind,
            is_public: type_decl.modifiers.is_public(),
            is_shareable: type_decl.inherits(&config.shareable_marker),
            config,
        })
    }

    pub fn kind(&self) -> DependencyKind {
        self.kind
    }

    pub fn is_public(&self) -> bool {
        self.is_public
    }

    pub fn is_shareable(&self) -> bool {
        self.is_shareable
    }

    pub fn protocol_name(&self) -> Ident {
        self.decl.name.suffixed(&self.config.protocol_suffix)
    }

    pub fn mock_name(&self) -> Ident {
        self.decl.name.suffixed(&self.config.mock_suffix)
    }

    /// Analyze every member that passes the filter policy.
    ///
    /// All analysis failures are reported together.
    fn analyzed_members(&self) -> Result<Vec<Analysis>, DiagnosticsError> {
        let mut analyzed = Vec::new();
        let mut diagnostics = Vec::new();
        for member in &self.decl.members {
            if !included(member, self.is_public) {
                tracing::trace!(member = member.kind_name(), "member filtered out");
                continue;
            }
            match analyze(member) {
                Ok(Some(analysis)) => analyzed.push(analysis),
                Ok(None) => {}
                Err(err) => diagnostics.push(err.diagnostic()),
            }
        }
        if diagnostics.is_empty() {
            Ok(analyzed)
        } else {
            Err(DiagnosticsError { diagnostics })
        }
    }

    fn access_modifiers(&self) -> Vec<Modifier> {
        if self.is_public {
            vec![Modifier::Access(AccessLevel::Public)]
        } else {
            Vec::new()
        }
    }

    fn placeholder(&self) -> Expr {
        Expr::ident(self.config.placeholder.as_str()).call(Vec::new())
    }

    pub fn generate_protocol(&self) -> Result<TypeDecl, DiagnosticsError> {
        let members = self.analyzed_members()?;

        let mut inheritance = Vec::new();
        match self.kind {
            DependencyKind::Class => {
                inheritance.push(TypeRef::named(self.config.reference_constraint.as_str()))
            }
            DependencyKind::Actor => {
                inheritance.push(TypeRef::named(self.config.isolated_constraint.as_str()))
            }
            DependencyKind::Struct => {}
        }
        if self.is_shareable {
            inheritance.push(TypeRef::named(self.config.shareable_marker.as_str()));
        }

        Ok(TypeDecl::builder()
            .kind(TypeKind::Protocol)
            .name(self.protocol_name())
            .modifiers(self.access_modifiers())
            .inheritance(inheritance)
            .members(members.iter().map(synthesize).collect())
            .build())
    }

    pub fn generate_mock(&self) -> Result<TypeDecl, DiagnosticsError> {
        let analyzed = self.analyzed_members()?;

        let mut members = Vec::new();
        let mut slots = Vec::new();
        for analysis in &analyzed {
            let slot = match analysis {
                Analysis::Function(signature) => {
                    let slot = self.slot(&signature.name, signature.function_type());
                    members.push(self.slot_decl(&slot));
                    members.push(Decl::Function(self.forwarding_function(signature, &slot)));
                    slot
                }
                Analysis::Property(property) => {
                    let slot = self.slot(&property.name, property.getter_type());
                    members.push(self.slot_decl(&slot));
                    members.push(Decl::Variable(self.forwarding_property(property, &slot)));
                    slot
                }
            };
            slots.push(slot);
        }
        members.push(Decl::Initializer(self.initializer(&slots)));

        let modifiers = match (self.is_public, self.kind) {
            (true, DependencyKind::Class) => vec![Modifier::Access(AccessLevel::Open)],
            _ => self.access_modifiers(),
        };
        let mut inheritance = vec![TypeRef::named(self.protocol_name())];
        if self.is_shareable && self.kind == DependencyKind::Class {
            inheritance.push(TypeRef::attributed(
                vec![Attribute::new("unchecked")],
                TypeRef::named(self.config.shareable_marker.as_str()),
            ));
        }

        Ok(TypeDecl::builder()
            .kind(self.kind.type_kind())
            .name(self.mock_name())
            .modifiers(modifiers)
            .inheritance(inheritance)
            .members(members)
            .build())
    }

    pub fn conformance(&self) -> Conformance {
        Conformance::new(TypeRef::named(self.protocol_name()))
    }

    fn slot(&self, member: &Ident, ty: TypeRef) -> Slot {
        Slot {
            member: member.clone(),
            name: member.prefixed(&self.config.slot_prefix),
            ty,
        }
    }

    /// `var _foo: (A) -> R = unimplemented()`
    fn slot_decl(&self, slot: &Slot) -> Decl {
        Decl::Variable(
            VariableDecl::builder()
                .binding(BindingKind::Var)
                .name(slot.name.clone())
                .ty(slot.ty.clone())
                .initializer(self.placeholder())
                .build(),
        )
    }

    /// The original signature, forwarding its arguments to the slot.
    fn forwarding_function(&self, signature: &MemberSignature, slot: &Slot) -> FunctionDecl {
        let mut modifiers = self.access_modifiers();
        if signature.is_mutating {
            modifiers.push(Modifier::Mutating);
        }
        let call = Expr::Ident(slot.name.clone())
            .call(signature.forwarding_arguments())
            .with_effects(signature.effects);

        FunctionDecl::builder()
            .name(signature.name.clone())
            .modifiers(modifiers)
            .generic_params(signature.generic_params.clone())
            .params(signature.params.clone())
            .effects(signature.effects)
            .maybe_output(signature.output.clone())
            .maybe_where_clause(signature.where_clause.clone())
            .body(CodeBlock::new(vec![Stmt::Return(Some(call))]))
            .build()
    }

    /// A computed property reading the slot; a settable property's setter
    /// replaces the slot with a closure returning the new value.
    fn forwarding_property(&self, property: &PropertyRequirement, slot: &Slot) -> VariableDecl {
        let read = CodeBlock::new(vec![Stmt::Return(Some(
            Expr::Ident(slot.name.clone())
                .call(Vec::new())
                .with_effects(property.effects),
        ))]);

        let accessors = if property.get_only && property.effects.is_empty() {
            AccessorBlock::Getter(read)
        } else {
            let mut getter = Accessor::with_body(AccessorKind::Get, read);
            getter.effects = property.effects;
            let mut accessors = vec![getter];
            if !property.get_only {
                accessors.push(Accessor::with_body(
                    AccessorKind::Set,
                    CodeBlock::new(vec![Stmt::assign(
                        Expr::Ident(slot.name.clone()),
                        Expr::closure(Vec::new(), Expr::ident("newValue")),
                    )]),
                ));
            }
            AccessorBlock::Accessors(accessors)
        };

        VariableDecl::builder()
            .binding(BindingKind::Var)
            .name(property.name.clone())
            .modifiers(self.access_modifiers())
            .ty(property.ty.clone())
            .accessors(accessors)
            .build()
    }

    /// `init(foo: @escaping (A) -> R = unimplemented(), ...)` assigning
    /// every slot.
    fn initializer(&self, slots: &[Slot]) -> InitializerDecl {
        let params = slots
            .iter()
            .map(|slot| {
                Param::new(
                    slot.member.clone(),
                    TypeRef::attributed(vec![Attribute::new("escaping")], slot.ty.clone()),
                )
                .with_default(self.placeholder())
            })
            .collect();
        let assignments = slots
            .iter()
            .map(|slot| {
                Stmt::assign(
                    Expr::ident("self").member(slot.name.clone()),
                    Expr::Ident(slot.member.clone()),
                )
            })
            .collect();

        InitializerDecl::builder()
            .modifiers(self.access_modifiers())
            .params(params)
            .body(CodeBlock::new(assignments))
            .build()
    }
}

impl PeerMacro for AutoDependency<'_> {
    fn expand_peers(
        attribute: &Attribute,
        decl: &Decl,
        context: &mut dyn ExpansionContext,
    ) -> Result<Vec<Decl>, DiagnosticsError> {
        let dependency = AutoDependency::new(attribute, decl, &context.config().dependency)?;
        tracing::debug!(
            ty = %dependency.decl.name,
            kind = ?dependency.kind,
            public = dependency.is_public,
            shareable = dependency.is_shareable,
            "expanding @AutoDependency peers"
        );
        Ok(vec![
            Decl::Type(dependency.generate_protocol()?),
            Decl::Type(dependency.generate_mock()?),
        ])
    }
}

impl ConformanceMacro for AutoDependency<'_> {
    fn expand_conformances(
        attribute: &Attribute,
        decl: &Decl,
        context: &mut dyn ExpansionContext,
    ) -> Result<Vec<Conformance>, DiagnosticsError> {
        let dependency = AutoDependency::new(attribute, decl, &context.config().dependency)?;
        Ok(vec![dependency.conformance()])
    }
}

#[cfg(test)]
mod tests;
