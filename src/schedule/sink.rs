use crate::models::Diagnostic;

/// Receives the parser's diagnostics.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn report(&mut self, diagnostic: Diagnostic) {
        (**self).report(diagnostic);
    }
}

/// Emits every diagnostic as a `WARN` tracing event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(kind = diagnostic.kind().as_str(), "{}", diagnostic);
    }
}

/// Counts diagnostics while forwarding them to another sink.
#[derive(Debug, Default)]
pub struct CountingSink<S> {
    inner: S,
    skipped: usize,
    defaulted: usize,
}

impl<S: DiagnosticSink> CountingSink<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            skipped: 0,
            defaulted: 0,
        }
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn defaulted(&self) -> usize {
        self.defaulted
    }
}

impl<S: DiagnosticSink> DiagnosticSink for CountingSink<S> {
    fn report(&mut self, diagnostic: Diagnostic) {
        match diagnostic.kind() {
            crate::models::DiagnosticKind::EntrySkipped => self.skipped += 1,
            crate::models::DiagnosticKind::FieldDefaulted => self.defaulted += 1,
        }
        self.inner.report(diagnostic);
    }
}
