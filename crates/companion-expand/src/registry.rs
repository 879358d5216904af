use companion_syntax::{Attribute, Decl};

use crate::{
    AutoDependency, Conformance, ConformanceMacro, DiagnosticsError, EnumCodable,
    ExpansionContext, MemberMacro, PeerMacro,
};

/// The generators a host knows by attribute name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Macro {
    AutoDependency,
    EnumCodable,
}

/// Everything one attribute contributes to the source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expansion {
    pub members: Vec<Decl>,
    pub peers: Vec<Decl>,
    pub conformances: Vec<Conformance>,
}

impl Macro {
    pub const ALL: [Macro; 2] = [Macro::AutoDependency, Macro::EnumCodable];

    pub fn name(self) -> &'static str {
        match self {
            Macro::AutoDependency => "AutoDependency",
            Macro::EnumCodable => "EnumCodable",
        }
    }

    pub fn from_attribute(attribute: &Attribute) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|m| attribute.is_named(m.name()))
    }

    pub fn expand(
        self,
        attribute: &Attribute,
        decl: &Decl,
        context: &mut dyn ExpansionContext,
    ) -> Result<Expansion, DiagnosticsError> {
        match self {
            Macro::AutoDependency => Ok(Expansion {
                peers: AutoDependency::expand_peers(attribute, decl, context)?,
                conformances: AutoDependency::expand_conformances(attribute, decl, context)?,
                ..Default::default()
            }),
            Macro::EnumCodable => Ok(Expansion {
                members: EnumCodable::expand_members(attribute, decl, context)?,
                ..Default::default()
            }),
        }
    }
}

impl Expansion {
    pub fn is_empty(&self) -> bool {
        self.members.is_empty() && self.peers.is_empty() && self.conformances.is_empty()
    }
}
