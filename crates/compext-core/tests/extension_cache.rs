use std::path::Path;
use std::sync::Arc;

use compext_core::{
    DiagnosticCode, EXTENSION_EXPORT_TYPE_MISMATCH, EXTENSION_NOT_FOUND, ExtensionCache,
    ExtensionKind, FileSystemHost, JsonModuleLoader, LintNode, LintReporter, LintWalker,
    NodeModuleResolver, Profiler, ProviderRegistry, ProviderState, load_project_config, paths,
};

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

/// Flags every `debugger` statement.
struct NoDebugger;

impl LintWalker for NoDebugger {
    fn visit(&mut self, node: &dyn LintNode, reporter: &mut LintReporter) -> bool {
        if node.kind() == "DebuggerStatement" {
            reporter
                .error_at("Unexpected debugger statement", node)
                .with_code("statement");
        }
        false
    }
}

fn no_debugger(_state: ProviderState) -> Box<dyn LintWalker> {
    Box::new(NoDebugger)
}

fn write(path: &Path, content: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn project(root: &Path, tsconfig: &str) -> ExtensionCache {
    write(&paths::project_file(root), tsconfig);
    let config = load_project_config(&paths::project_file(root)).unwrap();
    let options = config.compiler_options;

    let registry = ProviderRegistry::new().with_provider("no-debugger", no_debugger);
    let host = FileSystemHost::new(root).with_loader(JsonModuleLoader::new(registry));
    let profiler = Profiler::new(options.extended_diagnostics);
    ExtensionCache::new(
        &options,
        Arc::new(host),
        &NodeModuleResolver::default(),
        profiler,
    )
}

#[test]
fn test_end_to_end_lint_pack() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    write(
        &root.join("node_modules/lint-pack/package.json"),
        r#"{"name": "lint-pack", "main": "lib/main.json"}"#,
    );
    write(
        &root.join("node_modules/lint-pack/lib/main.json"),
        r#"{
            "noDebugger": {"extension-kind": "syntactic-lint", "provider": "no-debugger"},
            "helpers": {"version": 1},
            "broken": {"extension-kind": "semantic-lint", "provider": "not-registered"}
        }"#,
    );
    write(
        &root.join("local/format.json"),
        r#"{"default": {"extension-kind": "formatter", "indent": 2}}"#,
    );

    let cache = project(
        root,
        r#"{
            "compilerOptions": {
                "extensions": {
                    "lint-pack": {"strict": true},
                    "./local/format": null,
                    "ghost": {}
                },
                "extendedDiagnostics": true
            }
        }"#,
    );

    assert_eq!(cache.resolved_names().len(), 2);
    assert!(!cache.is_loaded());

    let diagnostics = cache.get_extension_loading_diagnostics();
    assert_eq!(diagnostics.len(), 2);
    assert!(diagnostics[0].is(&EXTENSION_NOT_FOUND));
    assert_eq!(diagnostics[0].args, vec!["ghost"]);
    assert!(diagnostics[1].is(&EXTENSION_EXPORT_TYPE_MISMATCH));
    assert_eq!(
        diagnostics[1].message,
        "Extension 'lint-pack' exported member 'broken' has extension kind 'semantic-lint', but was type 'object' when type 'function' was expected."
    );

    let extensions = cache.get_compiler_extensions();
    assert_eq!(extensions.kinds().collect::<Vec<_>>(), vec!["formatter", "syntactic-lint"]);
    assert!(extensions.semantic_lints().is_empty());

    let lint = &extensions.syntactic_lints()[0];
    assert_eq!(lint.name, "lint-pack[noDebugger]");
    assert_eq!(lint.args, Some(serde_json::json!({"strict": true})));

    let formatter = &extensions.of_kind(&ExtensionKind::Custom("formatter".into()))[0];
    assert_eq!(formatter.name, "./local/format");
    assert_eq!(formatter.args, Some(serde_json::Value::Null));

    let mut walker = lint.provider().unwrap().construct(ProviderState {
        name: lint.name.clone(),
        kind: lint.kind.clone(),
        args: lint.args.clone(),
    });
    let mut reporter = LintReporter::new(&lint.name).for_file("src/app.ts");
    for node in [
        Node {
            kind: "Identifier",
            start: 0,
            width: 3,
        },
        Node {
            kind: "DebuggerStatement",
            start: 10,
            width: 9,
        },
    ] {
        walker.visit(&node, &mut reporter);
    }
    let failures = reporter.into_diagnostics();
    assert_eq!(failures.len(), 1);
    assert_eq!(
        failures[0].code,
        DiagnosticCode::Named("lint-pack[noDebugger]/statement".to_string())
    );
    assert_eq!(failures[0].span.as_ref().unwrap().start, 10);

    assert!(cache.profiler().bucket_total("lint-pack").is_some());
    assert!(cache.profiler().bucket_total("./local/format").is_some());
}

#[test]
fn test_end_to_end_malformed_module() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    write(&root.join("node_modules/bad/index.json"), "{ nope");
    write(
        &root.join("node_modules/good/index.json"),
        r#"{"default": {"extension-kind": "syntactic-lint", "provider": "no-debugger"}}"#,
    );

    let cache = project(
        root,
        r#"{"compilerOptions": {"extensions": ["bad", "good", "good"]}}"#,
    );

    let diagnostics = cache.get_extension_loading_diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, DiagnosticCode::Numeric(6153));
    assert!(diagnostics[0].message.starts_with("Extension loading failed with error 'JSON error:"));

    let lints = cache.get_compiler_extensions().syntactic_lints();
    assert_eq!(lints.len(), 1);
    assert_eq!(lints[0].name, "good");
    assert_eq!(lints[0].args, None);
    assert!(cache.profiler().report().is_empty());
}
