//! Pretty printing for generated declarations.
//!
//! This crate lays out [`companion_syntax`] trees as source text, built on
//! top of the `prettyless` library. It offers:
//!
//! - [`Config`] - Configuration options for formatting output
//! - [`Document`] - A document builder for constructing pretty-printed output
//! - [`PrettyPrint`] - Core trait for defining how nodes render to documents
//! - [`PrettyPrintExt`] - Extension trait with convenience methods
//!
//! # Example
//!
//! ```ignore
//! use companion_prettyless::{Config, PrettyPrintExt};
//!
//! let output = decl.sprint();
//!
//! let config = Config::default().with_tab_spaces(2);
//! let output = decl.sprint_with_config(config);
//! ```

mod config;
mod document;
mod impls;
mod traits;

pub use config::Config;
pub use document::Document;
pub use traits::{PrettyPrint, PrettyPrintExt};

// Re-export from prettyless for convenience
pub use prettyless::{Arena, DocAllocator};
pub type ArenaDoc<'a> = prettyless::DocBuilder<'a, Arena<'a>>;

/// Prelude module for common imports.
pub mod prelude {
    pub use crate::{ArenaDoc, Config, DocAllocator, Document, PrettyPrint, PrettyPrintExt};
    pub use prettyless;
}

#[cfg(test)]
mod tests;
