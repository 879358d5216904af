//! The interface between the generators and the host that triggers them.
//!
//! A host calls the traits a generator implements when it meets the
//! generator's attribute. Returned declarations are spliced next to
//! (peers) or inside (members) the annotated declaration; the annotated
//! declaration itself is never modified.

use companion_syntax::{Attribute, Decl, TypeRef, WhereClause};

use crate::{DiagnosticsError, ExpansionContext};

/// A protocol to attach to the annotated type, with an optional `where`
/// clause.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Conformance {
    pub ty: TypeRef,
    pub where_clause: Option<WhereClause>,
}

/// Produces declarations placed next to the annotated declaration.
pub trait PeerMacro {
    fn expand_peers(
        attribute: &Attribute,
        decl: &Decl,
        context: &mut dyn ExpansionContext,
    ) -> Result<Vec<Decl>, DiagnosticsError>;
}

/// Produces declarations placed inside the annotated declaration.
pub trait MemberMacro {
    fn expand_members(
        attribute: &Attribute,
        decl: &Decl,
        context: &mut dyn ExpansionContext,
    ) -> Result<Vec<Decl>, DiagnosticsError>;
}

/// Produces conformances attached to the annotated type.
pub trait ConformanceMacro {
    fn expand_conformances(
        attribute: &Attribute,
        decl: &Decl,
        context: &mut dyn ExpansionContext,
    ) -> Result<Vec<Conformance>, DiagnosticsError>;
}

impl Conformance {
    pub fn new(ty: TypeRef) -> Self {
        Self {
            ty,
            where_clause: None,
        }
    }
}
