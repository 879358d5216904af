use std::fmt::{self, Display, Formatter};

use crate::types::write_separated;
use crate::{Ident, TypeRef};

/// Expressions the generators build into function bodies.
///
/// Anything the parser does not need to look into is kept as
/// [`Expr::Verbatim`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    /// `foo`, `self`
    Ident(Ident),
    /// `.type`
    ImplicitMember(Ident),
    /// `base.name`
    Member { base: Box<Expr>, name: Ident },
    /// A type used in expression position, as in `User.Profile.self`.
    Type(TypeRef),
    /// `callee(label: value, ...)`
    Call {
        callee: Box<Expr>,
        arguments: Vec<Argument>,
    },
    /// `try expr`
    Try(Box<Expr>),
    /// `await expr`
    Await(Box<Expr>),
    /// `{ body }` or `{ a, b in body }`
    Closure { params: Vec<Ident>, body: Box<Expr> },
    Verbatim(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Argument {
    pub label: Option<Ident>,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Stmt {
    Expr(Expr),
    Return(Option<Expr>),
    /// `let name = value` / `var name = value`
    Binding {
        kind: BindingKind,
        name: Ident,
        value: Expr,
    },
    /// `target = value`
    Assign { target: Expr, value: Expr },
    Switch {
        subject: Expr,
        cases: Vec<SwitchCase>,
    },
    /// One source line kept as written.
    Verbatim(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    Let,
    Var,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SwitchCase {
    pub label: SwitchLabel,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SwitchLabel {
    Case(Vec<Pattern>),
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Pattern {
    /// `.name` or `.name(let a, let b)`
    EnumCase {
        name: Ident,
        bindings: Option<Vec<Ident>>,
    },
    Expr(Expr),
}

/// The statements between a pair of braces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CodeBlock {
    pub statements: Vec<Stmt>,
}

impl Expr {
    pub fn ident(name: impl Into<Ident>) -> Self {
        Expr::Ident(name.into())
    }

    pub fn implicit_member(name: impl Into<Ident>) -> Self {
        Expr::ImplicitMember(name.into())
    }

    pub fn member(self, name: impl Into<Ident>) -> Self {
        Expr::Member {
            base: Box::new(self),
            name: name.into(),
        }
    }

    pub fn call(self, arguments: Vec<Argument>) -> Self {
        Expr::Call {
            callee: Box::new(self),
            arguments,
        }
    }

    pub fn verbatim(text: impl Into<String>) -> Self {
        Expr::Verbatim(text.into())
    }

    pub fn closure(params: Vec<Ident>, body: Expr) -> Self {
        Expr::Closure {
            params,
            body: Box::new(body),
        }
    }

    /// Wrap in `try`/`await` as required by `effects`, producing
    /// `try await expr` when both apply.
    pub fn with_effects(self, effects: crate::Effects) -> Self {
        let expr = if effects.is_async {
            Expr::Await(Box::new(self))
        } else {
            self
        };
        if effects.is_throws {
            Expr::Try(Box::new(expr))
        } else {
            expr
        }
    }
}

impl Argument {
    pub fn unlabeled(value: Expr) -> Self {
        Self { label: None, value }
    }

    pub fn labeled(label: impl Into<Ident>, value: Expr) -> Self {
        Self {
            label: Some(label.into()),
            value,
        }
    }
}

impl Stmt {
    pub fn binding(kind: BindingKind, name: impl Into<Ident>, value: Expr) -> Self {
        Stmt::Binding {
            kind,
            name: name.into(),
            value,
        }
    }

    pub fn assign(target: Expr, value: Expr) -> Self {
        Stmt::Assign { target, value }
    }
}

impl BindingKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            BindingKind::Let => "let",
            BindingKind::Var => "var",
        }
    }
}

impl SwitchCase {
    pub fn new(patterns: Vec<Pattern>, body: Vec<Stmt>) -> Self {
        Self {
            label: SwitchLabel::Case(patterns),
            body,
        }
    }
}

impl Pattern {
    pub fn enum_case(name: impl Into<Ident>) -> Self {
        Pattern::EnumCase {
            name: name.into(),
            bindings: None,
        }
    }

    pub fn enum_case_binding(name: impl Into<Ident>, bindings: Vec<Ident>) -> Self {
        Pattern::EnumCase {
            name: name.into(),
            bindings: Some(bindings),
        }
    }
}

impl CodeBlock {
    pub fn new(statements: Vec<Stmt>) -> Self {
        Self { statements }
    }

    /// Split a captured body into [`Stmt::Verbatim`] lines.
    ///
    /// Leading and trailing blank lines are dropped and the common
    /// indentation is removed, so the printer can re-indent the body.
    pub fn verbatim(text: &str) -> Self {
        let lines: Vec<&str> = text.lines().collect();
        let first = lines.iter().position(|l| !l.trim().is_empty());
        let last = lines.iter().rposition(|l| !l.trim().is_empty());
        let (Some(first), Some(last)) = (first, last) else {
            return CodeBlock::default();
        };
        let lines = &lines[first..=last];

        let indent = lines
            .iter()
            .filter(|l| !l.trim().is_empty())
            .map(|l| l.len() - l.trim_start().len())
            .min()
            .unwrap_or(0);

        let statements = lines
            .iter()
            .map(|line| {
                let line = line.trim_end();
                let text = line.get(indent..).unwrap_or_else(|| line.trim_start());
                Stmt::Verbatim(text.to_string())
            })
            .collect();
        CodeBlock { statements }
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Ident(name) => write!(f, "{}", name),
            Expr::ImplicitMember(name) => write!(f, ".{}", name),
            Expr::Member { base, name } => write!(f, "{}.{}", base, name),
            Expr::Type(ty) => write!(f, "{}", ty),
            Expr::Call { callee, arguments } => {
                write!(f, "{}(", callee)?;
                write_separated(f, arguments, ", ")?;
                f.write_str(")")
            }
            Expr::Try(inner) => write!(f, "try {}", inner),
            Expr::Await(inner) => write!(f, "await {}", inner),
            Expr::Closure { params, body } => {
                if params.is_empty() {
                    write!(f, "{{ {} }}", body)
                } else {
                    f.write_str("{ ")?;
                    write_separated(f, params, ", ")?;
                    write!(f, " in {} }}", body)
                }
            }
            Expr::Verbatim(text) => f.write_str(text),
        }
    }
}

impl Display for Argument {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{}: {}", label, self.value),
            None => write!(f, "{}", self.value),
        }
    }
}

impl Display for BindingKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl Display for Pattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::EnumCase { name, bindings } => {
                write!(f, ".{}", name)?;
                if let Some(bindings) = bindings {
                    f.write_str("(")?;
                    for (i, binding) in bindings.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "let {}", binding)?;
                    }
                    f.write_str(")")?;
                }
                Ok(())
            }
            Pattern::Expr(expr) => write!(f, "{}", expr),
        }
    }
}

impl Display for SwitchLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SwitchLabel::Case(patterns) => {
                f.write_str("case ")?;
                write_separated(f, patterns, ", ")?;
                f.write_str(":")
            }
            SwitchLabel::Default => f.write_str("default:"),
        }
    }
}

/// Single-line statements print as written; a `switch` prints its header
/// only, the printer lays out the cases.
impl Display for Stmt {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Expr(expr) => write!(f, "{}", expr),
            Stmt::Return(Some(expr)) => write!(f, "return {}", expr),
            Stmt::Return(None) => f.write_str("return"),
            Stmt::Binding { kind, name, value } => write!(f, "{} {} = {}", kind, name, value),
            Stmt::Assign { target, value } => write!(f, "{} = {}", target, value),
            Stmt::Switch { subject, .. } => write!(f, "switch {}", subject),
            Stmt::Verbatim(text) => f.write_str(text),
        }
    }
}
