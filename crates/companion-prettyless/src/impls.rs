use companion_syntax::{
    Accessor, AccessorBlock, Attribute, CodeBlock, Decl, EnumCaseDecl, FunctionDecl,
    GenericParams, ImportDecl, InitializerDecl, Modifier, PatternBinding, SourceFile, Stmt,
    TypeAliasDecl, TypeDecl, VariableDecl,
};
use prettyless::DocAllocator;

use crate::{ArenaDoc, Document, PrettyPrint};

/// `@attr modifier ` ahead of a declaration keyword.
fn prefix(attributes: &[Attribute], modifiers: &[Modifier]) -> String {
    let mut out = String::new();
    for attribute in attributes {
        out.push_str(&attribute.to_string());
        out.push(' ');
    }
    for modifier in modifiers {
        out.push_str(&modifier.to_string());
        out.push(' ');
    }
    out
}

fn where_suffix(clause: &Option<companion_syntax::WhereClause>) -> String {
    clause
        .as_ref()
        .map(|clause| format!(" {}", clause))
        .unwrap_or_default()
}

impl PrettyPrint for Decl {
    fn pretty_print<'a>(&self, doc: &'a Document<'a>) -> ArenaDoc<'a> {
        match self {
            Decl::Type(decl) => decl.pretty_print(doc),
            Decl::Function(decl) => decl.pretty_print(doc),
            Decl::Variable(decl) => decl.pretty_print(doc),
            Decl::Initializer(decl) => decl.pretty_print(doc),
            Decl::EnumCase(decl) => decl.pretty_print(doc),
            Decl::TypeAlias(decl) => decl.pretty_print(doc),
            Decl::Import(decl) => decl.pretty_print(doc),
        }
    }
}

impl PrettyPrint for TypeDecl {
    fn pretty_print<'a>(&self, doc: &'a Document<'a>) -> ArenaDoc<'a> {
        let mut header = format!(
            "{}{} {}{}",
            prefix(&self.attributes, &self.modifiers),
            self.kind,
            self.name,
            GenericParams(&self.generic_params)
        );
        if !self.inheritance.is_empty() {
            let inherited: Vec<String> = self.inheritance.iter().map(ToString::to_string).collect();
            header.push_str(": ");
            header.push_str(&inherited.join(", "));
        }
        header.push_str(&where_suffix(&self.where_clause));
        header.push(' ');

        doc.text(header) + doc.braced(self.members.iter().map(|member| member.pretty_print(doc)))
    }
}

impl PrettyPrint for FunctionDecl {
    fn pretty_print<'a>(&self, doc: &'a Document<'a>) -> ArenaDoc<'a> {
        let params = doc.list(self.params.iter(), ", ", |param| doc.text(param.to_string()));
        let mut signature = doc.text(format!(
            "{}func {}{}",
            prefix(&self.attributes, &self.modifiers),
            self.name,
            GenericParams(&self.generic_params)
        )) + params.enclose("(", ")");

        let mut tail = String::new();
        if !self.effects.is_empty() {
            tail.push_str(&format!(" {}", self.effects));
        }
        if let Some(output) = &self.output {
            tail.push_str(&format!(" -> {}", output));
        }
        tail.push_str(&where_suffix(&self.where_clause));
        signature += doc.text(tail);

        match &self.body {
            Some(body) => signature + doc.text(" ") + body.pretty_print(doc),
            None => signature,
        }
    }
}

impl PrettyPrint for InitializerDecl {
    fn pretty_print<'a>(&self, doc: &'a Document<'a>) -> ArenaDoc<'a> {
        let params = doc.list(self.params.iter(), ", ", |param| doc.text(param.to_string()));
        let mut signature = doc.text(format!(
            "{}init{}{}",
            prefix(&self.attributes, &self.modifiers),
            if self.failable { "?" } else { "" },
            GenericParams(&self.generic_params)
        )) + params.enclose("(", ")");

        let mut tail = String::new();
        if !self.effects.is_empty() {
            tail.push_str(&format!(" {}", self.effects));
        }
        tail.push_str(&where_suffix(&self.where_clause));
        signature += doc.text(tail);

        match &self.body {
            Some(body) => signature + doc.text(" ") + body.pretty_print(doc),
            None => signature,
        }
    }
}

impl PrettyPrint for VariableDecl {
    fn pretty_print<'a>(&self, doc: &'a Document<'a>) -> ArenaDoc<'a> {
        let head = doc.text(format!(
            "{}{} ",
            prefix(&self.attributes, &self.modifiers),
            self.binding
        ));
        head + doc.list(self.bindings.iter(), ", ", |binding| binding.pretty_print(doc))
    }
}

impl PrettyPrint for PatternBinding {
    fn pretty_print<'a>(&self, doc: &'a Document<'a>) -> ArenaDoc<'a> {
        let mut text = self.name.to_string();
        if let Some(ty) = &self.ty {
            text.push_str(&format!(": {}", ty));
        }
        if let Some(initializer) = &self.initializer {
            text.push_str(&format!(" = {}", initializer));
        }
        let binding = doc.text(text);
        match &self.accessors {
            Some(accessors) => binding + doc.text(" ") + accessors.pretty_print(doc),
            None => binding,
        }
    }
}

impl PrettyPrint for AccessorBlock {
    fn pretty_print<'a>(&self, doc: &'a Document<'a>) -> ArenaDoc<'a> {
        match self {
            AccessorBlock::Getter(body) => body.pretty_print(doc),
            // Requirements stay on one line: `{ get async throws set }`.
            AccessorBlock::Accessors(accessors) if accessors.iter().all(|a| a.body.is_none()) => {
                let list = doc.list(accessors.iter(), " ", |accessor| doc.text(accessor.to_string()));
                doc.text("{ ") + list + doc.text(" }")
            }
            AccessorBlock::Accessors(accessors) => {
                doc.braced(accessors.iter().map(|accessor| accessor.pretty_print(doc)))
            }
        }
    }
}

impl PrettyPrint for Accessor {
    fn pretty_print<'a>(&self, doc: &'a Document<'a>) -> ArenaDoc<'a> {
        let header = doc.text(self.to_string());
        match &self.body {
            Some(body) => header + doc.text(" ") + body.pretty_print(doc),
            None => header,
        }
    }
}

impl PrettyPrint for EnumCaseDecl {
    fn pretty_print<'a>(&self, doc: &'a Document<'a>) -> ArenaDoc<'a> {
        doc.text(format!("{}case ", prefix(&self.attributes, &self.modifiers)))
            + doc.list(self.elements.iter(), ", ", |element| doc.text(element.to_string()))
    }
}

impl PrettyPrint for TypeAliasDecl {
    fn pretty_print<'a>(&self, doc: &'a Document<'a>) -> ArenaDoc<'a> {
        doc.text(format!(
            "{}typealias {}{} = {}",
            prefix(&self.attributes, &self.modifiers),
            self.name,
            GenericParams(&self.generic_params),
            self.target
        ))
    }
}

impl PrettyPrint for ImportDecl {
    fn pretty_print<'a>(&self, doc: &'a Document<'a>) -> ArenaDoc<'a> {
        doc.text(self.to_string())
    }
}

impl PrettyPrint for CodeBlock {
    fn pretty_print<'a>(&self, doc: &'a Document<'a>) -> ArenaDoc<'a> {
        doc.print_statements(&self.statements)
    }
}

impl PrettyPrint for Stmt {
    fn pretty_print<'a>(&self, doc: &'a Document<'a>) -> ArenaDoc<'a> {
        match self {
            Stmt::Switch { cases, .. } => doc.print_switch(self.to_string(), cases),
            _ => doc.text(self.to_string()),
        }
    }
}

/// Declarations separated by a blank line.
impl PrettyPrint for [Decl] {
    fn pretty_print<'a>(&self, doc: &'a Document<'a>) -> ArenaDoc<'a> {
        let mut out = doc.nil();
        for (i, decl) in self.iter().enumerate() {
            if i > 0 {
                out += doc.line_() + doc.line_();
            }
            out += decl.pretty_print(doc);
        }
        out
    }
}

impl PrettyPrint for SourceFile {
    fn pretty_print<'a>(&self, doc: &'a Document<'a>) -> ArenaDoc<'a> {
        self.decls.as_slice().pretty_print(doc)
    }
}
