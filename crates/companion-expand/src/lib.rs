//! Generators deriving companion declarations from annotated ones.
//!
//! - `@AutoDependency` on a struct, class or actor produces a protocol
//!   listing the type's operations, a mock conforming to it and the
//!   conformance of the original type.
//! - `@EnumCodable` on an enum produces the members implementing a
//!   tagged-union `Codable` representation.
//!
//! Generators are driven through the [`PeerMacro`], [`MemberMacro`] and
//! [`ConformanceMacro`] traits; [`host::Host`] applies them to whole source
//! files.

mod config;
mod context;
mod dependency;
pub mod diagnostic;
mod enum_codec;
pub mod host;
mod policy;
mod registry;
mod requirement;
mod signature;
mod traits;
pub mod wire;

pub use config::{ConfigError, DependencyConfig, EnumCodecConfig, ExpansionConfig};
pub use context::{BasicContext, ExpansionContext};
pub use dependency::{AutoDependency, DependencyKind};
pub use diagnostic::{
    Anchor, DependencyDiagnostic, Diagnostic, DiagnosticMessage, DiagnosticsError,
    EnumCodecDiagnostic, MessageId, Severity,
};
pub use enum_codec::{EnumCaseSpec, EnumCodable, EnumCodec, PayloadField};
pub use host::{Host, HostError, HostOutput};
pub use policy::included;
pub use registry::{Expansion, Macro};
pub use requirement::{function_requirement, property_requirement, synthesize};
pub use signature::{Analysis, AnalyzeError, MemberSignature, PropertyRequirement, analyze};
pub use traits::{Conformance, ConformanceMacro, MemberMacro, PeerMacro};
pub use wire::{CaseValue, TaggedUnion, WireError};
