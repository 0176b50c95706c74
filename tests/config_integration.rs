//! Config discovery and directory scanning on a temporary project.

use std::fs;
use std::path::Path;

use symscan::cli::collect_files;
use symscan::report::{json_report, FileSymbols};
use symscan::{scan, Config, ConfigError, Language, OutputFormat, Query, SymbolKind};

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(
        root,
        "symscan.yaml",
        r#"
version: "1"
excluded_paths:
  - "generated/**"
extensions:
  ".inc": c
kinds: [function, constant]
format: json
"#,
    );
    write(root, "src/app.js", "const PORT = 8080;\nfunction start() {\nlet server = 1;\n}\n");
    write(root, "src/defs.inc", "#define MAX_SIZE 100\nint add(int a, int b) {\n}\n");
    write(root, "generated/out.py", "def skipped():\n    pass\n");
    write(root, "vendor/lib.go", "package lib\n");
    dir
}

#[test]
fn test_discovered_config_drives_collection() {
    let dir = project();
    let root = dir.path();

    let (config, path) = Config::load(None, root).unwrap();
    assert_eq!(path, Some(root.join("symscan.yaml")));
    assert_eq!(config.format, Some(OutputFormat::Json));

    let exclusions = config.exclusions().unwrap();
    let files = collect_files(root, &config, &exclusions, None).unwrap();
    let found: Vec<(String, Language)> = files
        .iter()
        .map(|(p, lang)| {
            let rel = p.strip_prefix(root).unwrap();
            (rel.to_string_lossy().replace('\\', "/"), *lang)
        })
        .collect();
    assert_eq!(
        found,
        vec![
            ("src/app.js".to_string(), Language::JavaScript),
            ("src/defs.inc".to_string(), Language::C),
        ]
    );
}

#[test]
fn test_config_kinds_filter_scan_results() {
    let dir = project();
    let root = dir.path();
    let (config, _) = Config::load(None, root).unwrap();
    let query = Query::new().kinds(config.kinds.clone());

    let exclusions = config.exclusions().unwrap();
    let mut scanned = Vec::new();
    for (path, language) in collect_files(root, &config, &exclusions, None).unwrap() {
        let source = fs::read_to_string(&path).unwrap();
        let symbols = query.apply(&scan(&source, language).unwrap());
        scanned.push(FileSymbols {
            path: path.strip_prefix(root).unwrap().to_path_buf(),
            language,
            symbols,
        });
    }

    let js: Vec<(&str, SymbolKind)> = scanned[0]
        .symbols
        .iter()
        .map(|s| (s.name.as_str(), s.kind))
        .collect();
    assert_eq!(
        js,
        vec![("PORT", SymbolKind::Constant), ("start", SymbolKind::Function)]
    );

    let c: Vec<(&str, SymbolKind)> = scanned[1]
        .symbols
        .iter()
        .map(|s| (s.name.as_str(), s.kind))
        .collect();
    assert_eq!(
        c,
        vec![("MAX_SIZE", SymbolKind::Constant), ("add", SymbolKind::Function)]
    );

    let report = serde_json::to_value(json_report(&scanned, true)).unwrap();
    assert_eq!(report["files_scanned"], 2);
    assert_eq!(report["total_symbols"], 4);
    assert_eq!(report["files"][1]["language"], "c");
}

#[test]
fn test_explicit_config_overrides_discovery() {
    let dir = project();
    let root = dir.path();
    let other = root.join("other.yaml");
    fs::write(&other, "kinds: [import]\n").unwrap();

    let (config, path) = Config::load(Some(other.as_path()), root).unwrap();
    assert_eq!(path, Some(other));
    assert_eq!(config.kinds, vec![SymbolKind::Import]);
    assert!(config.format.is_none());
}

#[test]
fn test_invalid_config_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(".symscan.yaml"), "excluded_paths: [\"a/[\"]\n").unwrap();

    let err = Config::load(None, dir.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Glob { .. }));

    let absent = dir.path().join("absent.yaml");
    let missing = Config::load(Some(absent.as_path()), dir.path()).unwrap_err();
    assert!(matches!(missing, ConfigError::Io { .. }));
}
