use std::fmt::{self, Display, Formatter};

use companion_syntax::{Attribute, Decl, Span};

/// A stable, domain-scoped identifier such as `companion.enum-codec.not-enum`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId {
    pub domain: &'static str,
    pub id: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

/// The syntax node a diagnostic points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Anchor {
    /// A short name for the node kind: `attribute`, `class`, `enum case parameter`, ...
    pub kind: &'static str,
    pub span: Span,
}

/// Something that can be reported as a [`Diagnostic`].
pub trait DiagnosticMessage {
    fn message(&self) -> String;
    fn id(&self) -> MessageId;

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn at(&self, anchor: Anchor) -> Diagnostic {
        Diagnostic {
            message: self.message(),
            id: self.id(),
            severity: self.severity(),
            anchor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    pub message: String,
    pub id: MessageId,
    pub severity: Severity,
    pub anchor: Anchor,
}

/// One or more diagnostics that abort an expansion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", render_all(.diagnostics))]
pub struct DiagnosticsError {
    pub diagnostics: Vec<Diagnostic>,
}

/// Diagnostics of `@AutoDependency`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyDiagnostic {
    /// Applied to something other than a struct, class or actor.
    UnsupportedType { kind: &'static str },
    MissingBinding,
    MissingTypeAnnotation { name: String },
}

/// Diagnostics of `@EnumCodable`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumCodecDiagnostic {
    NotEnum,
    UnsupportedPayloadType { ty: String },
    MissingCaseLabel { case: String },
}

pub const DEPENDENCY_DOMAIN: &str = "companion.dependency";
pub const ENUM_CODEC_DOMAIN: &str = "companion.enum-codec";

impl Display for MessageId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.domain, self.id)
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

impl Anchor {
    pub fn new(kind: &'static str, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn attribute(attribute: &Attribute) -> Self {
        Self::new("attribute", attribute.span)
    }

    pub fn decl(decl: &Decl) -> Self {
        Self::new(decl.kind_name(), decl.span())
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.id, self.message)
    }
}

impl Diagnostic {
    /// `error[<domain>.<id>] <line>:<col>: <message>`, positioned in `src`.
    pub fn render(&self, src: &str) -> String {
        let (line, col) = self.anchor.span.line_col(src);
        format!(
            "{}[{}] {}:{}: {}",
            self.severity, self.id, line, col, self.message
        )
    }
}

impl DiagnosticsError {
    pub fn single(diagnostic: Diagnostic) -> Self {
        Self {
            diagnostics: vec![diagnostic],
        }
    }
}

impl From<Diagnostic> for DiagnosticsError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self::single(diagnostic)
    }
}

fn render_all(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

impl DiagnosticMessage for DependencyDiagnostic {
    fn message(&self) -> String {
        match self {
            DependencyDiagnostic::UnsupportedType { kind } => {
                format!("@AutoDependency cannot be applied to {}", kind)
            }
            DependencyDiagnostic::MissingBinding => "property declaration has no binding".into(),
            DependencyDiagnostic::MissingTypeAnnotation { name } => {
                format!("property '{}' needs an explicit type annotation", name)
            }
        }
    }

    fn id(&self) -> MessageId {
        let id = match self {
            DependencyDiagnostic::UnsupportedType { .. } => "unsupported-type",
            DependencyDiagnostic::MissingBinding => "missing-binding",
            DependencyDiagnostic::MissingTypeAnnotation { .. } => "missing-type-annotation",
        };
        MessageId {
            domain: DEPENDENCY_DOMAIN,
            id,
        }
    }
}

impl DiagnosticMessage for EnumCodecDiagnostic {
    fn message(&self) -> String {
        match self {
            EnumCodecDiagnostic::NotEnum => "@EnumCodable can only be applied to enums".into(),
            EnumCodecDiagnostic::UnsupportedPayloadType { ty } => {
                format!("associated value type '{}' is not supported", ty)
            }
            EnumCodecDiagnostic::MissingCaseLabel { case } => {
                format!("associated value in case '{}' is missing a label", case)
            }
        }
    }

    fn id(&self) -> MessageId {
        let id = match self {
            EnumCodecDiagnostic::NotEnum => "not-enum",
            EnumCodecDiagnostic::UnsupportedPayloadType { .. } => "unsupported-payload-type",
            EnumCodecDiagnostic::MissingCaseLabel { .. } => "missing-case-label",
        };
        MessageId {
            domain: ENUM_CODEC_DOMAIN,
            id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_positions_the_anchor() {
        let src = "import Foundation\n\n  @EnumCodable\nstruct A {}\n";
        let start = src.find('@').unwrap();
        let diagnostic =
            EnumCodecDiagnostic::NotEnum.at(Anchor::new("struct", Span::new(start, src.len())));
        assert_eq!(
            diagnostic.render(src),
            "error[companion.enum-codec.not-enum] 3:3: @EnumCodable can only be applied to enums"
        );
        assert_eq!(
            diagnostic.to_string(),
            "error[companion.enum-codec.not-enum]: @EnumCodable can only be applied to enums"
        );
    }

    #[test]
    fn test_error_lists_every_diagnostic() {
        let anchor = Anchor::new("enum case parameter", Span::new(4, 9));
        let error = DiagnosticsError {
            diagnostics: vec![
                EnumCodecDiagnostic::MissingCaseLabel { case: "a".into() }.at(anchor),
                EnumCodecDiagnostic::UnsupportedPayloadType { ty: "[Int]".into() }.at(anchor),
            ],
        };
        assert_eq!(
            error.to_string(),
            "error[companion.enum-codec.missing-case-label]: associated value in case 'a' is missing a label\n\
             error[companion.enum-codec.unsupported-payload-type]: associated value type '[Int]' is not supported"
        );
    }

    #[test]
    fn test_dependency_messages() {
        let diagnostic = DependencyDiagnostic::UnsupportedType { kind: "extension" }
            .at(Anchor::new("attribute", Span::new(0, 15)));
        assert_eq!(diagnostic.severity, Severity::Error);
        assert_eq!(diagnostic.id.domain, DEPENDENCY_DOMAIN);
        assert_eq!(diagnostic.message, "@AutoDependency cannot be applied to extension");
    }
}
