pub use companion_chumsky as parsers;
pub use companion_expand as expand;
pub use companion_prettyless as pretty;
pub use companion_syntax as syntax;

pub mod prelude {
    pub use companion_chumsky::{parse_decl, parse_source, parse_type};
    pub use companion_expand::{
        AutoDependency, BasicContext, ConformanceMacro, Diagnostic, DiagnosticsError,
        EnumCodable, ExpansionConfig, ExpansionContext, Host, HostOutput, MemberMacro, PeerMacro,
    };
    pub use companion_prettyless::{Config, PrettyPrint, PrettyPrintExt};
    pub use companion_syntax::*;
}
