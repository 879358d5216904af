//! Splices expansions into a source file.
//!
//! The file is parsed once; every expansion is computed from that tree and
//! turned into a text edit against the original source, so code outside
//! the annotated declarations is kept byte for byte.

use std::ops::Range;

use companion_chumsky::{ParseError, parse_source};
use companion_prettyless::{Config, PrettyPrint, PrettyPrintExt};
use companion_syntax::{Attribute, Decl, Ident, TypeDecl, TypeKind};

use crate::{
    BasicContext, Conformance, Diagnostic, ExpansionConfig, ExpansionContext,
    registry::{Expansion, Macro},
};

/// Expands registered attributes in whole source files.
#[derive(Debug, Clone, Default, bon::Builder)]
pub struct Host {
    #[builder(default)]
    config: ExpansionConfig,
    #[builder(default)]
    printer: Config,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostOutput {
    pub source: String,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("failed to parse source: {0}")]
    Parse(#[from] ParseError),
}

struct Edit {
    range: Range<usize>,
    text: String,
}

struct Splicer<'h> {
    src: &'h str,
    printer: &'h Config,
    context: BasicContext,
    edits: Vec<Edit>,
    /// Extensions of nested types, appended at the end of the file.
    trailing: Vec<String>,
}

impl Host {
    pub fn new(config: ExpansionConfig, printer: Config) -> Self {
        Self { config, printer }
    }

    pub fn config(&self) -> &ExpansionConfig {
        &self.config
    }

    /// Expand every registered attribute in `src`.
    ///
    /// A declaration whose expansion fails keeps its attribute and is left
    /// as written; the failure is reported in
    /// [`HostOutput::diagnostics`].
    pub fn expand_source(&self, src: &str) -> Result<HostOutput, HostError> {
        let file = parse_source(src)?;
        let mut splicer = Splicer {
            src,
            printer: &self.printer,
            context: BasicContext::new(self.config.clone()),
            edits: Vec::new(),
            trailing: Vec::new(),
        };
        for decl in &file.decls {
            splicer.visit(decl, &[]);
        }
        let diagnostics = splicer.context.take_diagnostics();
        tracing::debug!(
            edits = splicer.edits.len(),
            diagnostics = diagnostics.len(),
            "expanded source"
        );
        Ok(HostOutput {
            source: splicer.finish(),
            diagnostics,
        })
    }
}

impl HostOutput {
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

impl Splicer<'_> {
    /// Nested declarations are visited before their parent, so edits at the
    /// same offset keep inner text ahead of outer text.
    fn visit(&mut self, decl: &Decl, scope: &[Ident]) {
        if let Decl::Type(ty) = decl {
            let mut inner = scope.to_vec();
            inner.push(ty.name.clone());
            for member in &ty.members {
                self.visit(member, &inner);
            }
        }

        for attribute in decl.attributes() {
            let Some(generator) = Macro::from_attribute(attribute) else {
                continue;
            };
            tracing::debug!(
                generator = generator.name(),
                decl = decl.kind_name(),
                "expanding attribute"
            );
            match generator.expand(attribute, decl, &mut self.context) {
                Ok(expansion) => self.splice(attribute, decl, scope, expansion),
                Err(err) => {
                    for diagnostic in err.diagnostics {
                        self.context.diagnose(diagnostic);
                    }
                }
            }
        }
    }

    fn splice(&mut self, attribute: &Attribute, decl: &Decl, scope: &[Ident], expansion: Expansion) {
        self.remove_attribute(attribute);
        let indent = line_indent(self.src, decl.span().start).to_string();

        if let (Some(ty), false) = (decl.as_type(), expansion.members.is_empty()) {
            self.insert_members(ty, &indent, &expansion.members);
        }

        let mut after = String::new();
        for peer in &expansion.peers {
            after.push_str("\n\n");
            after.push_str(&self.print(peer, &indent));
        }
        if let Some(ty) = decl.as_type() {
            let mut qualified = scope.iter().map(Ident::as_str).collect::<Vec<_>>();
            qualified.push(ty.name.as_str());
            for conformance in &expansion.conformances {
                let extension = conformance_extension(&qualified.join("."), conformance);
                if scope.is_empty() {
                    after.push_str("\n\n");
                    after.push_str(&self.print(&extension, &indent));
                } else {
                    let text = self.print(&extension, "");
                    self.trailing.push(text);
                }
            }
        }
        if !after.is_empty() {
            let end = decl.span().end;
            self.edits.push(Edit {
                range: end..end,
                text: after,
            });
        }
    }

    /// Drop the attribute and the whitespace after it.
    fn remove_attribute(&mut self, attribute: &Attribute) {
        let Range { start, end } = attribute.span.into_range();
        let rest = &self.src[end..];
        let gap = rest.len() - rest.trim_start().len();
        self.edits.push(Edit {
            range: start..end + gap,
            text: String::new(),
        });
    }

    /// Insert `members` before the closing brace of `ty`.
    fn insert_members(&mut self, ty: &TypeDecl, indent: &str, members: &[Decl]) {
        let body = ty.body_span.into_range();
        let close = body.end.saturating_sub(1);
        let before = &self.src[..close];
        let line_end = before.trim_end_matches([' ', '\t']).len();
        let member_indent = format!("{}{}", indent, " ".repeat(self.printer.tab_spaces));
        let text = self.print(members, &member_indent);

        let inside = self.src.get(body.start + 1..close).unwrap_or("");
        let body_is_blank = inside.trim().is_empty();
        let leading = inside.len() - inside.trim_start().len();
        if !body_is_blank && !inside[..leading].contains('\n') {
            // The first member shares the line of the opening brace.
            let open = body.start + 1;
            self.edits.push(Edit {
                range: open..open + leading,
                text: format!("\n{}", member_indent),
            });
        }
        let lead = if body_is_blank { "" } else { "\n" };
        let edit = if before[..line_end].ends_with('\n') {
            // The brace sits on its own line; keep its indentation.
            Edit {
                range: line_end..line_end,
                text: format!("{}{}\n", lead, text),
            }
        } else {
            Edit {
                range: line_end..close,
                text: format!("\n{}{}\n{}", lead, text, indent),
            }
        };
        self.edits.push(edit);
    }

    /// Print `node` with every non-empty line prefixed by `indent`, without
    /// a final newline.
    fn print<N: PrettyPrint + ?Sized>(&self, node: &N, indent: &str) -> String {
        node.sprint_with_config(self.printer.clone())
            .lines()
            .map(|line| {
                if line.is_empty() {
                    String::new()
                } else {
                    format!("{}{}", indent, line)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn finish(mut self) -> String {
        if !self.trailing.is_empty() {
            let mut text = String::new();
            if !self.src.ends_with('\n') {
                text.push('\n');
            }
            for extension in &self.trailing {
                text.push('\n');
                text.push_str(extension);
                text.push('\n');
            }
            let end = self.src.len();
            self.edits.push(Edit {
                range: end..end,
                text,
            });
        }

        // Stable: edits at the same offset stay in the order they were made.
        self.edits.sort_by_key(|edit| edit.range.start);
        let mut out = String::with_capacity(self.src.len());
        let mut cursor = 0;
        for edit in &self.edits {
            let start = edit.range.start.max(cursor);
            out.push_str(&self.src[cursor..start]);
            out.push_str(&edit.text);
            cursor = cursor.max(edit.range.end);
        }
        out.push_str(&self.src[cursor..]);
        out
    }
}

/// `extension Name: Protocol {}`
fn conformance_extension(name: &str, conformance: &Conformance) -> TypeDecl {
    TypeDecl::builder()
        .kind(TypeKind::Extension)
        .name(name)
        .inheritance(vec![conformance.ty.clone()])
        .maybe_where_clause(conformance.where_clause.clone())
        .build()
}

/// The leading whitespace of the line containing `offset`.
fn line_indent(src: &str, offset: usize) -> &str {
    let line_start = src[..offset].rfind('\n').map_or(0, |i| i + 1);
    let line = &src[line_start..];
    &line[..line.len() - line.trim_start_matches([' ', '\t']).len()]
}
