//! Core traits for pretty printing.

use std::io::{self, Write, stdout};

use crate::{ArenaDoc, Config, Document};

/// Core trait for pretty printing values to a document.
///
/// Inline syntax (types, parameters, expressions) already prints through
/// `Display`; implementations of this trait lay out the multi-line parts
/// such as member blocks and `switch` statements.
///
/// # Example
///
/// ```ignore
/// impl PrettyPrint for MyNode {
///     fn pretty_print<'a>(&self, doc: &'a Document<'a>) -> ArenaDoc<'a> {
///         doc.text(format!("node {}", self.name))
///     }
/// }
/// ```
pub trait PrettyPrint {
    fn pretty_print<'a>(&self, doc: &'a Document<'a>) -> ArenaDoc<'a>;
}

/// Extension trait providing convenience methods for pretty printing.
///
/// # Example
///
/// ```ignore
/// use companion_prettyless::{Config, PrettyPrintExt};
///
/// let output = decl.sprint();
/// let output = decl.sprint_with_config(Config::default().with_tab_spaces(2));
/// ```
pub trait PrettyPrintExt: PrettyPrint {
    /// Render to string with custom config.
    fn sprint_with_config(&self, config: Config) -> String;

    /// Render to string with default config.
    fn sprint(&self) -> String {
        self.sprint_with_config(Config::default())
    }

    /// Write to writer with custom config.
    fn write_with_config(&self, writer: &mut impl Write, config: Config) -> io::Result<()> {
        writer.write_all(self.sprint_with_config(config).as_bytes())
    }

    /// Write to writer with default config.
    fn write(&self, writer: &mut impl Write) -> io::Result<()> {
        self.write_with_config(writer, Config::default())
    }

    /// Print to stdout with default config.
    fn print(&self) -> io::Result<()> {
        self.write(&mut stdout())
    }
}

impl<T: PrettyPrint + ?Sized> PrettyPrintExt for T {
    fn sprint_with_config(&self, config: Config) -> String {
        let doc = Document::new(config);
        // Rendering into a `String` only fails when a `Display` impl does.
        doc.render(self).unwrap_or_default()
    }
}
