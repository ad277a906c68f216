#[derive(Debug, Clone, Default)]
pub struct Args {
    pub project: Option<String>,
    pub extended_diagnostics: bool,
    pub json: bool,
    pub verbose: bool,
    pub help: bool,
    pub version: bool,
    pub unknown_flags: Vec<String>,
}

pub fn parse_args(args: &[String]) -> Args {
    let mut result = Args::default();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        match arg.as_str() {
            "--help" | "-h" => result.help = true,
            "--version" | "-v" => result.version = true,
            "--project" | "-p" if i + 1 < args.len() => {
                i += 1;
                result.project = Some(args[i].clone());
            }
            "--extended-diagnostics" => result.extended_diagnostics = true,
            "--json" => result.json = true,
            "--verbose" => result.verbose = true,
            v if v.starts_with('-') => result.unknown_flags.push(v.to_string()),
            v if result.project.is_none() => result.project = Some(v.to_string()),
            _ => {}
        }

        i += 1;
    }

    result
}

pub fn print_help(bin_name: &str) {
    println!(
        "{bin_name} - load and validate compiler extensions\n\n\
         Usage:\n  {bin_name} [options] [project]\n\n\
         Options:\n  --project, -p <path>   tsconfig.json or the directory containing it\n  --extended-diagnostics\n  --json\n  --verbose\n  --help, -h\n  --version, -v"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_flags() {
        let parsed = parse_args(&args(&[
            "--project",
            "app/tsconfig.json",
            "--extended-diagnostics",
            "--json",
            "--verbose",
        ]));
        assert_eq!(parsed.project.as_deref(), Some("app/tsconfig.json"));
        assert!(parsed.extended_diagnostics);
        assert!(parsed.json);
        assert!(parsed.verbose);
        assert!(!parsed.help);
    }

    #[test]
    fn test_positional_project() {
        let parsed = parse_args(&args(&["app", "other"]));
        assert_eq!(parsed.project.as_deref(), Some("app"));
    }

    #[test]
    fn test_missing_project_value_and_unknown_flags() {
        let parsed = parse_args(&args(&["--bogus", "--project"]));
        assert_eq!(parsed.project, None);
        assert_eq!(parsed.unknown_flags, vec!["--bogus", "--project"]);
    }

    #[test]
    fn test_help_and_version() {
        let parsed = parse_args(&args(&["-h", "-v"]));
        assert!(parsed.help);
        assert!(parsed.version);
    }
}
