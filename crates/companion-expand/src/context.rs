use crate::{Diagnostic, ExpansionConfig};

/// What a generator may ask of the host while expanding.
pub trait ExpansionContext {
    /// Report a diagnostic without aborting the expansion.
    fn diagnose(&mut self, diagnostic: Diagnostic);

    fn config(&self) -> &ExpansionConfig;
}

/// A context that collects diagnostics in memory.
#[derive(Debug, Default)]
pub struct BasicContext {
    config: ExpansionConfig,
    diagnostics: Vec<Diagnostic>,
}

impl BasicContext {
    pub fn new(config: ExpansionConfig) -> Self {
        Self {
            config,
            diagnostics: Vec::new(),
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}

impl ExpansionContext for BasicContext {
    fn diagnose(&mut self, diagnostic: Diagnostic) {
        tracing::trace!(id = %diagnostic.id, "diagnostic reported");
        self.diagnostics.push(diagnostic);
    }

    fn config(&self) -> &ExpansionConfig {
        &self.config
    }
}
