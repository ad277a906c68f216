//! Contract between the compiler and lint provider extensions.
//!
//! A lint extension exports a [`ProviderConstructor`]. The compiler builds one
//! walker per run from it and drives the walker over every node, collecting
//! failures through a [`LintReporter`].

use serde_json::Value;

use crate::diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticCode, TextSpan};
use crate::extensions::types::ExtensionKind;

/// A syntax node as seen by lint walkers.
pub trait LintNode {
    fn kind(&self) -> &str;
    fn start(&self) -> usize;
    fn width(&self) -> usize;
}

/// Walks nodes and reports failures.
pub trait LintWalker {
    /// Called when entering `node`. Return `true` to skip its children.
    fn visit(&mut self, node: &dyn LintNode, reporter: &mut LintReporter) -> bool;

    /// Called when leaving `node`.
    fn after_visit(&mut self, _node: &dyn LintNode, _reporter: &mut LintReporter) {}
}

/// Everything a provider receives when instantiated.
#[derive(Debug, Clone)]
pub struct ProviderState {
    /// Qualified extension name.
    pub name: String,
    pub kind: ExtensionKind,
    /// Argument payload from the configuration, passed through untouched.
    pub args: Option<Value>,
}

/// A validated, constructible lint provider.
pub trait ProviderConstructor: Send + Sync {
    fn construct(&self, state: ProviderState) -> Box<dyn LintWalker>;
}

impl<F> ProviderConstructor for F
where
    F: Fn(ProviderState) -> Box<dyn LintWalker> + Send + Sync,
{
    fn construct(&self, state: ProviderState) -> Box<dyn LintWalker> {
        self(state)
    }
}

/// Collects failures reported by one lint.
#[derive(Debug)]
pub struct LintReporter {
    lint_name: String,
    file: Option<String>,
    failures: Vec<Diagnostic>,
}

impl LintReporter {
    pub fn new(lint_name: impl Into<String>) -> Self {
        Self {
            lint_name: lint_name.into(),
            file: None,
            failures: Vec::new(),
        }
    }

    /// Attach a file name to every span reported from now on.
    pub fn for_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn lint_name(&self) -> &str {
        &self.lint_name
    }

    /// Report a failure without a location.
    pub fn error(&mut self, message: impl Into<String>) -> LintReport<'_> {
        self.push(message.into(), None)
    }

    /// Report a failure spanning `node`.
    pub fn error_at(&mut self, message: impl Into<String>, node: &dyn LintNode) -> LintReport<'_> {
        self.error_span(message, node.start(), node.width())
    }

    /// Report a failure over an explicit range.
    pub fn error_span(
        &mut self,
        message: impl Into<String>,
        start: usize,
        length: usize,
    ) -> LintReport<'_> {
        let mut span = TextSpan::new(start, length);
        span.file = self.file.clone();
        self.push(message.into(), Some(span))
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.failures
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.failures
    }

    fn push(&mut self, message: String, span: Option<TextSpan>) -> LintReport<'_> {
        self.failures.push(Diagnostic {
            category: DiagnosticCategory::Warning,
            code: DiagnosticCode::Named(self.lint_name.clone()),
            message,
            args: Vec::new(),
            span,
        });

        let Self {
            lint_name,
            failures,
            ..
        } = self;
        let index = failures.len() - 1;
        LintReport {
            lint_name: lint_name.as_str(),
            diagnostic: &mut failures[index],
        }
    }
}

/// Handle to the failure just reported, for refining it.
pub struct LintReport<'a> {
    lint_name: &'a str,
    diagnostic: &'a mut Diagnostic,
}

impl LintReport<'_> {
    /// Short code identifying the failure within the lint.
    pub fn with_code(self, shortname: &str) -> Self {
        self.diagnostic.code = DiagnosticCode::Named(format!("{}/{shortname}", self.lint_name));
        self
    }

    pub fn with_category(self, category: DiagnosticCategory) -> Self {
        self.diagnostic.category = category;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Node {
        kind: &'static str,
        start: usize,
        width: usize,
    }

    impl LintNode for Node {
        fn kind(&self) -> &str {
            self.kind
        }
        fn start(&self) -> usize {
            self.start
        }
        fn width(&self) -> usize {
            self.width
        }
    }

    struct NoDebugger;

    impl LintWalker for NoDebugger {
        fn visit(&mut self, node: &dyn LintNode, reporter: &mut LintReporter) -> bool {
            if node.kind() == "DebuggerStatement" {
                reporter
                    .error_at("Debugger statements are forbidden", node)
                    .with_code("debugger");
            }
            false
        }
    }

    #[test]
    fn test_reporter_defaults_to_warning_without_span() {
        let mut reporter = LintReporter::new("no-any");
        assert_eq!(reporter.lint_name(), "no-any");
        reporter.error("found any");

        let diags = reporter.into_diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].category, DiagnosticCategory::Warning);
        assert_eq!(diags[0].code, DiagnosticCode::Named("no-any".to_string()));
        assert_eq!(diags[0].message, "found any");
        assert!(diags[0].span.is_none());
    }

    #[test]
    fn test_reporter_overloads() {
        let mut reporter = LintReporter::new("style").for_file("main.ts");
        reporter
            .error_span("too long", 4, 10)
            .with_code("line-length")
            .with_category(DiagnosticCategory::Error);

        let diag = &reporter.diagnostics()[0];
        assert_eq!(diag.category, DiagnosticCategory::Error);
        assert_eq!(
            diag.code,
            DiagnosticCode::Named("style/line-length".to_string())
        );
        assert_eq!(diag.span, Some(TextSpan::new(4, 10).in_file("main.ts")));
    }

    #[test]
    fn test_closure_provider_constructs_walker() {
        let ctor = |_state: ProviderState| -> Box<dyn LintWalker> { Box::new(NoDebugger) };
        let mut walker = ctor.construct(ProviderState {
            name: "no-debugger".to_string(),
            kind: ExtensionKind::SyntacticLint,
            args: None,
        });

        let mut reporter = LintReporter::new("no-debugger");
        let nodes = [
            Node {
                kind: "Identifier",
                start: 0,
                width: 3,
            },
            Node {
                kind: "DebuggerStatement",
                start: 5,
                width: 9,
            },
        ];
        for node in &nodes {
            walker.visit(node, &mut reporter);
            walker.after_visit(node, &mut reporter);
        }

        let diags = reporter.into_diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(
            diags[0].code,
            DiagnosticCode::Named("no-debugger/debugger".to_string())
        );
        assert_eq!(diags[0].span, Some(TextSpan::new(5, 9)));
    }
}
