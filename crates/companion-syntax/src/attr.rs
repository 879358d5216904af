use std::fmt::{self, Display, Formatter};

use crate::{Ident, Span};

/// `@name` or `@name(arguments)`.
///
/// Arguments are kept as the verbatim text between the parentheses.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Attribute {
    pub name: Ident,
    pub arguments: Option<String>,
    pub span: Span,
}

impl Attribute {
    pub fn new(name: impl Into<Ident>) -> Self {
        Self {
            name: name.into(),
            arguments: None,
            span: Span::DETACHED,
        }
    }

    pub fn with_arguments(mut self, arguments: impl Into<String>) -> Self {
        self.arguments = Some(arguments.into());
        self
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name.as_str() == name
    }
}

impl Display for Attribute {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name)?;
        if let Some(arguments) = &self.arguments {
            write!(f, "({})", arguments)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AccessLevel {
    Private,
    Fileprivate,
    Internal,
    Package,
    Public,
    Open,
}

impl AccessLevel {
    pub fn keyword(&self) -> &'static str {
        match self {
            AccessLevel::Private => "private",
            AccessLevel::Fileprivate => "fileprivate",
            AccessLevel::Internal => "internal",
            AccessLevel::Package => "package",
            AccessLevel::Public => "public",
            AccessLevel::Open => "open",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "private" => AccessLevel::Private,
            "fileprivate" => AccessLevel::Fileprivate,
            "internal" => AccessLevel::Internal,
            "package" => AccessLevel::Package,
            "public" => AccessLevel::Public,
            "open" => AccessLevel::Open,
            _ => return None,
        })
    }

    /// `public` or `open`.
    pub fn is_public(&self) -> bool {
        matches!(self, AccessLevel::Public | AccessLevel::Open)
    }
}

impl Display for AccessLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Declaration modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Access(AccessLevel),
    /// `private(set)` and friends.
    SetterAccess(AccessLevel),
    Final,
    Static,
    Class,
    Mutating,
    Nonmutating,
    Nonisolated,
    Override,
    Lazy,
    Weak,
    Unowned,
    Convenience,
    Required,
    Indirect,
}

impl Modifier {
    /// Modifiers spelled as a single keyword; access levels are handled
    /// separately because they may carry a `(set)` suffix.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        if let Some(level) = AccessLevel::from_keyword(keyword) {
            return Some(Modifier::Access(level));
        }
        Some(match keyword {
            "final" => Modifier::Final,
            "static" => Modifier::Static,
            "class" => Modifier::Class,
            "mutating" => Modifier::Mutating,
            "nonmutating" => Modifier::Nonmutating,
            "nonisolated" => Modifier::Nonisolated,
            "override" => Modifier::Override,
            "lazy" => Modifier::Lazy,
            "weak" => Modifier::Weak,
            "unowned" => Modifier::Unowned,
            "convenience" => Modifier::Convenience,
            "required" => Modifier::Required,
            "indirect" => Modifier::Indirect,
            _ => return None,
        })
    }

    pub fn is_access(&self) -> bool {
        matches!(self, Modifier::Access(_) | Modifier::SetterAccess(_))
    }

    /// `static` or `class` on a member.
    pub fn is_type_level(&self) -> bool {
        matches!(self, Modifier::Static | Modifier::Class)
    }
}

impl Display for Modifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Modifier::Access(level) => write!(f, "{}", level),
            Modifier::SetterAccess(level) => write!(f, "{}(set)", level),
            Modifier::Final => f.write_str("final"),
            Modifier::Static => f.write_str("static"),
            Modifier::Class => f.write_str("class"),
            Modifier::Mutating => f.write_str("mutating"),
            Modifier::Nonmutating => f.write_str("nonmutating"),
            Modifier::Nonisolated => f.write_str("nonisolated"),
            Modifier::Override => f.write_str("override"),
            Modifier::Lazy => f.write_str("lazy"),
            Modifier::Weak => f.write_str("weak"),
            Modifier::Unowned => f.write_str("unowned"),
            Modifier::Convenience => f.write_str("convenience"),
            Modifier::Required => f.write_str("required"),
            Modifier::Indirect => f.write_str("indirect"),
        }
    }
}

/// Query helpers over a modifier list.
pub trait ModifierList {
    fn access_level(&self) -> Option<AccessLevel>;
    fn setter_access_level(&self) -> Option<AccessLevel>;
    fn contains_modifier(&self, modifier: Modifier) -> bool;

    fn is_public(&self) -> bool {
        self.access_level().is_some_and(|level| level.is_public())
    }

    fn is_type_level(&self) -> bool;
}

impl ModifierList for [Modifier] {
    fn access_level(&self) -> Option<AccessLevel> {
        self.iter().find_map(|m| match m {
            Modifier::Access(level) => Some(*level),
            _ => None,
        })
    }

    fn setter_access_level(&self) -> Option<AccessLevel> {
        self.iter().find_map(|m| match m {
            Modifier::SetterAccess(level) => Some(*level),
            _ => None,
        })
    }

    fn contains_modifier(&self, modifier: Modifier) -> bool {
        self.contains(&modifier)
    }

    fn is_type_level(&self) -> bool {
        self.iter().any(Modifier::is_type_level)
    }
}

impl ModifierList for Vec<Modifier> {
    fn access_level(&self) -> Option<AccessLevel> {
        self.as_slice().access_level()
    }

    fn setter_access_level(&self) -> Option<AccessLevel> {
        self.as_slice().setter_access_level()
    }

    fn contains_modifier(&self, modifier: Modifier) -> bool {
        self.as_slice().contains_modifier(modifier)
    }

    fn is_type_level(&self) -> bool {
        self.as_slice().is_type_level()
    }
}
