//! The arena-backed document that [`PrettyPrint`] impls build into.

use std::{borrow::Cow, ops::Deref};

use companion_syntax::{Stmt, SwitchCase};
use prettyless::{Arena, DocAllocator};

use crate::{ArenaDoc, Config, PrettyPrint};

/// Printing state for one render: the layout [`Config`] and the arena the
/// document nodes live in.
///
/// Derefs to the arena, so `doc.text(..)`, `doc.line_()` and friends are
/// available directly.
pub struct Document<'a> {
    config: Config,
    arena: Arena<'a>,
}

impl<'a> Document<'a> {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            arena: Arena::new(),
        }
    }

    /// Nest `doc` one level.
    pub fn indent(&'a self, doc: ArenaDoc<'a>) -> ArenaDoc<'a> {
        doc.nest(self.config.tab_spaces as isize)
    }

    /// `doc` on a new line, nested one level.
    pub fn block_indent(&'a self, doc: ArenaDoc<'a>) -> ArenaDoc<'a> {
        self.indent(self.arena.line_() + doc)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// `f(item)` for every item, joined by `sep`.
    pub fn list<I, U: Clone + Into<Cow<'a, str>>>(
        &'a self,
        items: impl Iterator<Item = I>,
        sep: U,
        f: impl Fn(I) -> ArenaDoc<'a>,
    ) -> ArenaDoc<'a> {
        items.enumerate().fold(self.nil(), |doc, (i, item)| {
            let doc = if i == 0 { doc } else { doc + self.text(sep.clone()) };
            doc + f(item)
        })
    }

    /// A brace-delimited block with one line per item.
    ///
    /// An empty block prints as `{` and `}` on consecutive lines.
    pub fn braced(&'a self, items: impl IntoIterator<Item = ArenaDoc<'a>>) -> ArenaDoc<'a> {
        let mut inner = self.nil();
        let mut empty = true;
        for item in items {
            if !empty {
                inner += self.line_();
            }
            inner += item;
            empty = false;
        }
        if empty {
            return self.text("{") + self.line_() + self.text("}");
        }
        self.text("{") + self.block_indent(inner) + self.line_() + self.text("}")
    }

    /// Pretty print a statement list as a braced block.
    pub fn print_statements(&'a self, statements: &[Stmt]) -> ArenaDoc<'a> {
        self.braced(statements.iter().map(|stmt| stmt.pretty_print(self)))
    }

    /// Pretty print a `switch` with its case labels aligned to the
    /// `switch` keyword and the case bodies indented below them.
    pub fn print_switch(&'a self, header: String, cases: &[SwitchCase]) -> ArenaDoc<'a> {
        let mut doc = self.text(header) + self.text(" {");
        for case in cases {
            doc += self.line_();
            doc += self.text(case.label.to_string());
            let mut body = self.nil();
            for (i, stmt) in case.body.iter().enumerate() {
                if i > 0 {
                    body += self.line_();
                }
                body += stmt.pretty_print(self);
            }
            if !case.body.is_empty() {
                doc += self.block_indent(body);
            }
        }
        doc + self.line_() + self.text("}")
    }

    /// Lay out `node` and render it, one `\n`-terminated line at a time.
    pub fn render<N: PrettyPrint + ?Sized>(&'a self, node: &N) -> Result<String, std::fmt::Error> {
        let arena_doc = node.pretty_print(self);
        let mut buf = String::new();
        arena_doc.render_fmt(self.config.max_width, &mut buf)?;
        Ok(strip_trailing_whitespace(&buf))
    }
}

impl<'a> Deref for Document<'a> {
    type Target = Arena<'a>;

    fn deref(&self) -> &Self::Target {
        &self.arena
    }
}

/// Blank lines inside nested blocks come out of the layout as indentation
/// only; drop it, and end every line with `\n`.
fn strip_trailing_whitespace(s: &str) -> String {
    if s.is_empty() {
        return "\n".to_string();
    }
    s.lines().fold(String::with_capacity(s.len()), |mut out, line| {
        out.push_str(line.trim_end());
        out.push('\n');
        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_render_is_one_line() {
        assert_eq!(strip_trailing_whitespace(""), "\n");
    }

    #[test]
    fn test_blank_lines_lose_indentation() {
        assert_eq!(
            strip_trailing_whitespace("hello   \n\n    \nworld  \n"),
            "hello\n\n\nworld\n"
        );
    }

    #[test]
    fn test_leading_indentation_is_kept() {
        assert_eq!(
            strip_trailing_whitespace("    case a  \n        b \n"),
            "    case a\n        b\n"
        );
    }
}
