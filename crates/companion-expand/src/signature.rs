//! Normalized signatures of the members a generator looks at.

use companion_syntax::{
    AccessorBlock, AccessorKind, Argument, BindingKind, Decl, Effects, Expr, FunctionDecl,
    GenericParam, Ident, Modifier, ModifierList, Param, Span, TupleTypeElement, TypeRef,
    VariableDecl, WhereClause,
};

use crate::diagnostic::{Anchor, DependencyDiagnostic, Diagnostic, DiagnosticMessage};

/// The abstract shape of a function member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSignature {
    pub name: Ident,
    /// Labels, local names and types; default values are dropped.
    pub params: Vec<Param>,
    pub effects: Effects,
    /// The return type as written; `None` when the function returns `Void`
    /// implicitly.
    pub output: Option<TypeRef>,
    pub generic_params: Vec<GenericParam>,
    pub where_clause: Option<WhereClause>,
    pub is_mutating: bool,
}

/// The abstract shape of a stored or computed property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyRequirement {
    pub name: Ident,
    pub ty: TypeRef,
    pub get_only: bool,
    /// Effects of the getter. Setters never carry effects.
    pub effects: Effects,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Analysis {
    Function(MemberSignature),
    Property(PropertyRequirement),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalyzeError {
    /// The declaration does not have exactly one binding.
    #[error("property declaration has no binding")]
    MissingBinding { span: Span },
    #[error("property '{name}' needs an explicit type annotation")]
    MissingTypeAnnotation { name: Ident, span: Span },
}

/// Analyze a member declaration.
///
/// Returns `Ok(None)` for members that are neither functions nor
/// properties.
pub fn analyze(member: &Decl) -> Result<Option<Analysis>, AnalyzeError> {
    match member {
        Decl::Function(function) => Ok(Some(Analysis::Function(MemberSignature::from_function(
            function,
        )))),
        Decl::Variable(variable) => {
            PropertyRequirement::from_variable(variable).map(|p| Some(Analysis::Property(p)))
        }
        _ => Ok(None),
    }
}

impl MemberSignature {
    pub fn from_function(decl: &FunctionDecl) -> Self {
        let params = decl
            .params
            .iter()
            .map(|param| Param {
                default: None,
                ..param.clone()
            })
            .collect();
        Self {
            name: decl.name.clone(),
            params,
            effects: decl.effects,
            output: decl.output.clone(),
            generic_params: decl.generic_params.clone(),
            where_clause: decl.where_clause.clone(),
            is_mutating: decl.modifiers.contains_modifier(Modifier::Mutating),
        }
    }

    pub fn return_type(&self) -> TypeRef {
        self.output.clone().unwrap_or_else(TypeRef::void)
    }

    /// The equivalent standalone function type, `(A, B) async throws -> R`.
    pub fn function_type(&self) -> TypeRef {
        let params = self
            .params
            .iter()
            .map(|param| {
                if param.variadic {
                    TupleTypeElement::variadic(param.ty.clone())
                } else {
                    TupleTypeElement::new(param.ty.clone())
                }
            })
            .collect();
        TypeRef::function(params, self.effects, self.return_type())
    }

    /// The parameters passed on positionally, as a closure call expects.
    /// `inout` parameters are passed with `&`.
    pub fn forwarding_arguments(&self) -> Vec<Argument> {
        self.params
            .iter()
            .map(|param| {
                let name = param.binding_name();
                let value = match param.ty {
                    TypeRef::Inout(_) => Expr::verbatim(format!("&{}", name)),
                    _ => Expr::Ident(name.clone()),
                };
                Argument::unlabeled(value)
            })
            .collect()
    }
}

impl PropertyRequirement {
    pub fn from_variable(decl: &VariableDecl) -> Result<Self, AnalyzeError> {
        let binding = decl
            .single_binding()
            .ok_or(AnalyzeError::MissingBinding { span: decl.span })?;
        let ty = binding
            .ty
            .clone()
            .ok_or_else(|| AnalyzeError::MissingTypeAnnotation {
                name: binding.name.clone(),
                span: binding.span,
            })?;

        let effects = binding
            .accessors
            .as_ref()
            .and_then(|accessors| accessors.accessor(AccessorKind::Get))
            .map(|getter| getter.effects)
            .unwrap_or(Effects::NONE);

        let get_only = decl.binding == BindingKind::Let
            || decl.modifiers.setter_access_level().is_some()
            || match &binding.accessors {
                None => false,
                Some(accessors @ AccessorBlock::Accessors(_)) if accessors.is_computed() => {
                    accessors.accessor(AccessorKind::Set).is_none()
                }
                // Observers only: still a stored property.
                Some(AccessorBlock::Accessors(_)) => false,
                Some(AccessorBlock::Getter(_)) => true,
            };

        Ok(Self {
            name: binding.name.clone(),
            ty,
            get_only,
            effects,
        })
    }

    /// The type of the mock slot backing the getter, `() async -> T`.
    pub fn getter_type(&self) -> TypeRef {
        TypeRef::function(Vec::new(), self.effects, self.ty.clone())
    }
}

impl AnalyzeError {
    pub fn diagnostic(&self) -> Diagnostic {
        match self {
            AnalyzeError::MissingBinding { span } => {
                DependencyDiagnostic::MissingBinding.at(Anchor::new("variable", *span))
            }
            AnalyzeError::MissingTypeAnnotation { name, span } => {
                DependencyDiagnostic::MissingTypeAnnotation {
                    name: name.to_string(),
                }
                .at(Anchor::new("pattern binding", *span))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use companion_chumsky::parse_decl;

    use super::*;

    fn analyzed(src: &str) -> Result<Option<Analysis>, AnalyzeError> {
        analyze(&parse_decl(src).unwrap())
    }

    #[test]
    fn test_only_functions_and_properties_are_analyzed() {
        assert!(matches!(
            analyzed("func a() {}"),
            Ok(Some(Analysis::Function(_)))
        ));
        assert!(matches!(
            analyzed("var a: Int = 0"),
            Ok(Some(Analysis::Property(_)))
        ));
        assert_eq!(analyzed("init() {}"), Ok(None));
        assert_eq!(analyzed("typealias A = Int"), Ok(None));
    }

    #[test]
    fn test_forwarding_arguments() {
        let Ok(Some(Analysis::Function(signature))) =
            analyzed("func swap(_ a: inout Int, with b: Int, rest: Int...) {}")
        else {
            panic!("expected a function");
        };
        let arguments: Vec<String> = signature
            .forwarding_arguments()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(arguments, ["&a", "b", "rest"]);
        assert_eq!(signature.return_type(), TypeRef::void());
    }

    #[test]
    fn test_getter_effects_reach_the_slot_type() {
        let Ok(Some(Analysis::Property(property))) =
            analyzed("var remote: Int { get async throws { try await fetch() } }")
        else {
            panic!("expected a property");
        };
        assert!(property.get_only);
        assert_eq!(
            property.effects,
            Effects {
                is_async: true,
                is_throws: true
            }
        );
        assert_eq!(property.getter_type().to_string(), "() async throws -> Int");
    }

    #[test]
    fn test_error_diagnostics() {
        let missing_type = analyzed("var count = 0").unwrap_err();
        let diagnostic = missing_type.diagnostic();
        assert_eq!(diagnostic.id.to_string(), "companion.dependency.missing-type-annotation");
        assert_eq!(diagnostic.anchor.kind, "pattern binding");
        assert_eq!(diagnostic.message, "property 'count' needs an explicit type annotation");

        let two_bindings = analyzed("var a: Int = 0, b: Int = 1").unwrap_err();
        assert!(matches!(two_bindings, AnalyzeError::MissingBinding { .. }));
        assert_eq!(two_bindings.diagnostic().anchor.kind, "variable");
    }
}
