//! Lint providers the CLI makes available to JSON extension modules.

use compext_core::{LintNode, LintReporter, LintWalker, ProviderRegistry, ProviderState};

pub const NO_DEBUGGER: &str = "no-debugger";

/// Reports every `DebuggerStatement` node.
struct NoDebugger;

impl LintWalker for NoDebugger {
    fn visit(&mut self, node: &dyn LintNode, reporter: &mut LintReporter) -> bool {
        if node.kind() == "DebuggerStatement" {
            reporter
                .error_at("Unexpected 'debugger' statement.", node)
                .with_code("statement");
        }
        false
    }
}

fn no_debugger(_state: ProviderState) -> Box<dyn LintWalker> {
    Box::new(NoDebugger)
}

pub fn builtin_providers() -> ProviderRegistry {
    ProviderRegistry::new().with_provider(NO_DEBUGGER, no_debugger)
}

#[cfg(test)]
mod tests {
    use super::*;
    use compext_core::ExtensionKind;

    struct Node(&'static str);

    impl LintNode for Node {
        fn kind(&self) -> &str {
            self.0
        }

        fn start(&self) -> usize {
            4
        }

        fn width(&self) -> usize {
            9
        }
    }

    #[test]
    fn test_no_debugger_reports_statement() {
        let registry = builtin_providers();
        assert_eq!(registry.len(), 1);
        let mut walker = registry.get(NO_DEBUGGER).unwrap().construct(ProviderState {
            name: "pack".to_string(),
            kind: ExtensionKind::SyntacticLint,
            args: None,
        });

        let mut reporter = LintReporter::new("pack");
        assert!(!walker.visit(&Node("Identifier"), &mut reporter));
        assert!(!walker.visit(&Node("DebuggerStatement"), &mut reporter));

        let failures = reporter.diagnostics();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].code.to_string(), "pack/statement");
    }
}
