//! Structured diagnostics produced while loading extensions.
//!
//! Every recoverable failure in the extension pipeline is reported as a
//! [`Diagnostic`] built from a fixed [`DiagnosticMessage`] template plus
//! positional arguments.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Message,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DiagnosticCategory::Warning => "warning",
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Message => "message",
        };
        f.write_str(label)
    }
}

/// Either a catalog code or a free-form identifier (used by lint reports).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DiagnosticCode {
    Numeric(u32),
    Named(String),
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCode::Numeric(code) => write!(f, "CE{code}"),
            DiagnosticCode::Named(name) => f.write_str(name),
        }
    }
}

/// A catalog entry. `template` uses `{0}`, `{1}`, ... placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub key: &'static str,
    pub template: &'static str,
}

pub const EXTENSION_NOT_FOUND: DiagnosticMessage = DiagnosticMessage {
    code: 6151,
    category: DiagnosticCategory::Error,
    key: "Host_could_not_locate_extension_0",
    template: "Host could not locate extension '{0}'.",
};

pub const EXTENSION_LOADING_NOT_SUPPORTED: DiagnosticMessage = DiagnosticMessage {
    code: 6152,
    category: DiagnosticCategory::Error,
    key: "Extension_0_could_not_be_loaded_extension_loading_is_not_implemented_in_host",
    template: "Extension '{0}' could not be loaded: extension loading is not implemented in host.",
};

pub const EXTENSION_LOAD_FAILED: DiagnosticMessage = DiagnosticMessage {
    code: 6153,
    category: DiagnosticCategory::Error,
    key: "Extension_loading_failed_with_error_0",
    template: "Extension loading failed with error '{0}'.",
};

pub const EXTENSION_EXPORT_TYPE_MISMATCH: DiagnosticMessage = DiagnosticMessage {
    code: 6154,
    category: DiagnosticCategory::Error,
    key: "Extension_0_exported_member_1_has_extension_kind_2_but_was_type_3_when_type_4_was_expected",
    template: "Extension '{0}' exported member '{1}' has extension kind '{2}', but was type '{3}' when type '{4}' was expected.",
};

/// Location of a diagnostic in a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSpan {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub start: usize,
    pub length: usize,
}

impl TextSpan {
    pub fn new(start: usize, length: usize) -> Self {
        Self {
            file: None,
            start,
            length,
        }
    }

    pub fn in_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: DiagnosticCode,
    /// Fully rendered message text.
    pub message: String,
    /// Positional arguments the message was rendered from.
    pub args: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<TextSpan>,
}

impl Diagnostic {
    /// Build a span-less diagnostic from a catalog entry.
    pub fn compiler(message: &DiagnosticMessage, args: &[&str]) -> Self {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        Self {
            category: message.category,
            code: DiagnosticCode::Numeric(message.code),
            message: format_message(message.template, &args),
            args,
            span: None,
        }
    }

    pub fn with_span(mut self, span: TextSpan) -> Self {
        self.span = Some(span);
        self
    }

    /// Whether this diagnostic was produced from the given catalog entry.
    pub fn is(&self, message: &DiagnosticMessage) -> bool {
        self.code == DiagnosticCode::Numeric(message.code)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(span) = &self.span {
            if let Some(file) = &span.file {
                write!(f, "{file}({}): ", span.start)?;
            }
        }
        write!(f, "{} {}: {}", self.category, self.code, self.message)
    }
}

/// Substitute `{n}` placeholders with positional arguments.
///
/// Placeholders without a matching argument are left untouched.
pub fn format_message(template: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };

        match after[..close].parse::<usize>().ok().and_then(|i| args.get(i)) {
            Some(arg) => out.push_str(arg),
            None => out.push_str(&rest[open..open + close + 2]),
        }
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_message_substitutes_positional_args() {
        let args = vec!["a".to_string(), "b".to_string()];
        assert_eq!(format_message("{1} then {0}", &args), "b then a");
    }

    #[test]
    fn test_format_message_keeps_unknown_placeholders() {
        let args = vec!["x".to_string()];
        assert_eq!(format_message("{0} {3} {name}", &args), "x {3} {name}");
        assert_eq!(format_message("dangling {", &args), "dangling {");
    }

    #[test]
    fn test_compiler_diagnostic_renders_template() {
        let diag = Diagnostic::compiler(&EXTENSION_NOT_FOUND, &["my-lint"]);
        assert_eq!(diag.message, "Host could not locate extension 'my-lint'.");
        assert_eq!(diag.args, vec!["my-lint"]);
        assert_eq!(diag.category, DiagnosticCategory::Error);
        assert!(diag.is(&EXTENSION_NOT_FOUND));
        assert!(!diag.is(&EXTENSION_LOAD_FAILED));
    }

    #[test]
    fn test_type_mismatch_message() {
        let diag = Diagnostic::compiler(
            &EXTENSION_EXPORT_TYPE_MISMATCH,
            &["ext", "lint", "syntactic-lint", "string", "function"],
        );
        assert_eq!(
            diag.message,
            "Extension 'ext' exported member 'lint' has extension kind 'syntactic-lint', but was type 'string' when type 'function' was expected."
        );
    }

    #[test]
    fn test_display_includes_span_file() {
        let diag = Diagnostic::compiler(&EXTENSION_LOAD_FAILED, &["boom"])
            .with_span(TextSpan::new(12, 3).in_file("a.ts"));
        assert_eq!(
            diag.to_string(),
            "a.ts(12): error CE6153: Extension loading failed with error 'boom'."
        );
    }

    #[test]
    fn test_serializes_numeric_code_as_number() {
        let diag = Diagnostic::compiler(&EXTENSION_NOT_FOUND, &["x"]);
        let value = serde_json::to_value(&diag).unwrap();
        assert_eq!(value["code"], 6151);
        assert_eq!(value["category"], "error");
        assert!(value.get("span").is_none());
    }
}
