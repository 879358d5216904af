//! Turns analyzed members back into protocol requirements.

use companion_syntax::{
    Accessor, AccessorBlock, AccessorKind, BindingKind, Decl, Effects, FunctionDecl, Modifier,
    VariableDecl,
};

use crate::signature::{Analysis, MemberSignature, PropertyRequirement};

pub fn synthesize(analysis: &Analysis) -> Decl {
    match analysis {
        Analysis::Function(signature) => Decl::Function(function_requirement(signature)),
        Analysis::Property(property) => Decl::Variable(property_requirement(property)),
    }
}

/// `func name<G>(params) effects -> R where ...`, without a body and
/// without modifiers other than `mutating`.
pub fn function_requirement(signature: &MemberSignature) -> FunctionDecl {
    let modifiers = if signature.is_mutating {
        vec![Modifier::Mutating]
    } else {
        Vec::new()
    };
    FunctionDecl::builder()
        .name(signature.name.clone())
        .modifiers(modifiers)
        .generic_params(signature.generic_params.clone())
        .params(signature.params.clone())
        .effects(signature.effects)
        .maybe_output(signature.output.clone())
        .maybe_where_clause(signature.where_clause.clone())
        .build()
}

/// `var name: T { get [async] [throws] [set] }`
pub fn property_requirement(property: &PropertyRequirement) -> VariableDecl {
    let mut accessors = vec![Accessor::requirement(AccessorKind::Get, property.effects)];
    if !property.get_only {
        accessors.push(Accessor::requirement(AccessorKind::Set, Effects::NONE));
    }
    VariableDecl::builder()
        .binding(BindingKind::Var)
        .name(property.name.clone())
        .ty(property.ty.clone())
        .accessors(AccessorBlock::Accessors(accessors))
        .build()
}
