//! Command-line interface for symscan.

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use globset::GlobSet;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::Config;
use crate::language::Language;
use crate::query::{Query, SortKey, SortOrder};
use crate::report::{self, FileSymbols, OutputFormat};
use crate::scanner;
use crate::symbol::SymbolKind;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Directories never descended into.
const SKIPPED_DIRS: &[&str] = &[
    "vendor",
    "node_modules",
    "target",
    "__pycache__",
    "venv",
    "bin",
    "obj",
];

/// Heuristic symbol extraction for JavaScript, Python, Java, C, C++, C#, Go
/// and Rust sources.
///
/// Symscan reads source line by line and lists the variables, functions,
/// classes, methods, constants, imports and other declarations it finds,
/// together with their scope and line.
#[derive(Parser)]
#[command(name = "symscan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract symbols from a file or directory
    Scan(ScanArgs),
    /// List supported languages and their example snippets
    Languages(LanguagesArgs),
}

/// Arguments for the scan command.
#[derive(Parser)]
pub struct ScanArgs {
    /// Path to scan (file or directory)
    pub path: PathBuf,

    /// Language id; overrides detection by extension
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Output format: pretty or json
    #[arg(short, long)]
    pub format: Option<String>,

    /// Only report these kinds (repeatable)
    #[arg(short, long = "kind")]
    pub kinds: Vec<String>,

    /// Case-insensitive substring of the symbol name or scope
    #[arg(short, long)]
    pub search: Option<String>,

    /// Sort column: line, name, type, scope or data-type
    #[arg(long, default_value = "line")]
    pub sort: String,

    /// Sort descending
    #[arg(long)]
    pub desc: bool,

    /// Include per-kind counts
    #[arg(long)]
    pub stats: bool,

    /// Exit non-zero when no symbols are reported
    #[arg(long)]
    pub fail_empty: bool,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Arguments for the languages command.
#[derive(Parser)]
pub struct LanguagesArgs {
    /// Print the example snippet for a language
    #[arg(long, value_name = "ID", conflicts_with = "scan_example")]
    pub example: Option<String>,

    /// Scan the example snippet for a language
    #[arg(long, value_name = "ID")]
    pub scan_example: Option<String>,

    /// Output format for --scan-example: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,
}

/// Parse a list of kind names.
fn parse_kinds(names: &[String]) -> Result<Vec<SymbolKind>, String> {
    names.iter().map(|name| name.parse::<SymbolKind>()).collect()
}

/// Build the query from flags, falling back to the config's kind filter.
pub fn build_query(args: &ScanArgs, config: &Config) -> Result<Query, String> {
    let kinds = if args.kinds.is_empty() {
        config.kinds.clone()
    } else {
        parse_kinds(&args.kinds)?
    };
    let order = if args.desc {
        SortOrder::Descending
    } else {
        SortOrder::Ascending
    };
    Ok(Query {
        search: args.search.clone(),
        kinds,
        sort: args.sort.parse::<SortKey>()?,
        order,
    })
}

/// Collect files to scan under `root` along with their language.
///
/// Hidden and dependency directories are skipped, as are paths matching the
/// config exclusions (tested relative to `root`). When `only` is set, files
/// of other languages are left out.
pub fn collect_files(
    root: &Path,
    config: &Config,
    exclusions: &GlobSet,
    only: Option<Language>,
) -> anyhow::Result<Vec<(PathBuf, Language)>> {
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 || !e.file_type().is_dir() {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            !name.starts_with('.') && !SKIPPED_DIRS.contains(&name.as_ref())
        });

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        if exclusions.is_match(relative) {
            tracing::debug!(path = %relative.display(), "excluded by config");
            continue;
        }
        let Some(language) = config.language_for(path) else {
            continue;
        };
        if only.is_some_and(|lang| lang != language) {
            continue;
        }
        files.push((path.to_path_buf(), language));
    }

    Ok(files)
}

/// Read and scan each file in parallel. Unreadable files are skipped.
fn scan_files(files: &[(PathBuf, Language)], root: &Path) -> anyhow::Result<Vec<FileSymbols>> {
    let results: Vec<anyhow::Result<Option<FileSymbols>>> = files
        .par_iter()
        .map(|(path, language)| -> anyhow::Result<Option<FileSymbols>> {
            let source = match std::fs::read(path) {
                Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable file");
                    return Ok(None);
                }
            };
            let symbols = scanner::scan(&source, *language)
                .with_context(|| format!("failed to scan {}", path.display()))?;
            let display = match path.strip_prefix(root) {
                Ok(rel) if !rel.as_os_str().is_empty() => rel.to_path_buf(),
                _ => path.file_name().map(PathBuf::from).unwrap_or_else(|| path.clone()),
            };
            Ok(Some(FileSymbols {
                path: display,
                language: *language,
                symbols,
            }))
        })
        .collect();

    let mut scanned = Vec::with_capacity(results.len());
    for result in results {
        if let Some(file) = result? {
            scanned.push(file);
        }
    }
    Ok(scanned)
}

/// Run the scan command.
pub fn run_scan(args: &ScanArgs) -> anyhow::Result<i32> {
    let cwd = std::env::current_dir().context("cannot determine working directory")?;
    let (config, config_path) = match Config::load(args.config.as_deref(), &cwd) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };
    if let Some(path) = &config_path {
        tracing::debug!(path = %path.display(), "using config");
    }

    let only = match args.lang.as_deref() {
        Some(id) => match Language::from_id(id) {
            Ok(lang) => Some(lang),
            Err(e) => {
                eprintln!("Error: {}", e);
                return Ok(EXIT_ERROR);
            }
        },
        None => None,
    };

    let format = match args.format.as_deref() {
        Some(f) => match f.parse::<OutputFormat>() {
            Ok(format) => format,
            Err(e) => {
                eprintln!("Error: {}", e);
                return Ok(EXIT_ERROR);
            }
        },
        None => config.format.unwrap_or_default(),
    };

    let query = match build_query(args, &config) {
        Ok(q) => q,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    // Resolve path
    let abs_path = match args.path.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: cannot access path {:?}: {}", args.path, e);
            return Ok(EXIT_ERROR);
        }
    };

    let (files, root) = if abs_path.is_dir() {
        let exclusions = config.exclusions()?;
        let files = collect_files(&abs_path, &config, &exclusions, only)?;
        (files, abs_path.clone())
    } else {
        let language = match only.or_else(|| config.language_for(&abs_path)) {
            Some(lang) => lang,
            None => {
                tracing::warn!(path = %abs_path.display(), "no language recognised for file");
                eprintln!(
                    "Error: cannot tell the language of {}, use --lang",
                    args.path.display()
                );
                return Ok(EXIT_ERROR);
            }
        };
        let root = abs_path.parent().map(Path::to_path_buf).unwrap_or_default();
        (vec![(abs_path.clone(), language)], root)
    };

    if files.is_empty() {
        eprintln!("Warning: no files to scan");
        return Ok(if args.fail_empty {
            EXIT_FAILED
        } else {
            EXIT_SUCCESS
        });
    }
    tracing::info!(files = files.len(), "scanning");

    let mut scanned = scan_files(&files, &root)?;
    for file in &mut scanned {
        file.symbols = query.apply(&file.symbols);
    }

    report::write(format, &scanned, args.stats)?;

    let total: usize = scanned.iter().map(|f| f.symbols.len()).sum();
    if args.fail_empty && total == 0 {
        Ok(EXIT_FAILED)
    } else {
        Ok(EXIT_SUCCESS)
    }
}

/// Run the languages command.
pub fn run_languages(args: &LanguagesArgs) -> anyhow::Result<i32> {
    if let Some(id) = &args.example {
        let language = match Language::from_id(id) {
            Ok(lang) => lang,
            Err(e) => {
                eprintln!("Error: {}", e);
                return Ok(EXIT_ERROR);
            }
        };
        println!("{}", language.example());
        return Ok(EXIT_SUCCESS);
    }

    if let Some(id) = &args.scan_example {
        let language = match Language::from_id(id) {
            Ok(lang) => lang,
            Err(e) => {
                eprintln!("Error: {}", e);
                return Ok(EXIT_ERROR);
            }
        };
        let format = match args.format.parse::<OutputFormat>() {
            Ok(format) => format,
            Err(e) => {
                eprintln!("Error: {}", e);
                return Ok(EXIT_ERROR);
            }
        };
        let symbols = scanner::scan(language.example(), language)?;
        let file = FileSymbols {
            path: PathBuf::from(format!("example{}", language.extension())),
            language,
            symbols,
        };
        report::write(format, &[file], true)?;
        return Ok(EXIT_SUCCESS);
    }

    println!("Supported languages:");
    println!();
    for language in Language::ALL {
        println!(
            "  {:<12} {:<12} {}",
            language.id(),
            language.display_name(),
            language.extension()
        );
    }
    println!();
    println!("Usage:");
    println!("  symscan scan <path> --lang <id>");
    println!("  symscan languages --example <id>");

    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn args(path: &str) -> ScanArgs {
        ScanArgs::parse_from(["scan", path])
    }

    #[test]
    fn test_scan_args_parse() {
        let args = ScanArgs::parse_from([
            "scan", "src", "--kind", "function", "-k", "class", "--sort", "name", "--desc",
            "--stats",
        ]);
        assert_eq!(args.kinds, vec!["function", "class"]);
        assert!(args.desc);
        assert!(args.stats);
        assert!(!args.fail_empty);
    }

    #[test]
    fn test_build_query() {
        let mut scan = args(".");
        scan.kinds = vec!["method".to_string()];
        scan.sort = "data-type".to_string();
        scan.desc = true;

        let query = build_query(&scan, &Config::default()).unwrap();
        assert_eq!(query.kinds, vec![SymbolKind::Method]);
        assert_eq!(query.sort, SortKey::DataType);
        assert_eq!(query.order, SortOrder::Descending);
    }

    #[test]
    fn test_build_query_falls_back_to_config_kinds() {
        let config = Config {
            kinds: vec![SymbolKind::Import],
            ..Config::default()
        };
        let query = build_query(&args("."), &config).unwrap();
        assert_eq!(query.kinds, vec![SymbolKind::Import]);
        assert_eq!(query.sort, SortKey::Line);
    }

    #[test]
    fn test_build_query_rejects_bad_values() {
        let mut scan = args(".");
        scan.kinds = vec!["widget".to_string()];
        assert!(build_query(&scan, &Config::default()).is_err());

        let mut scan = args(".");
        scan.sort = "size".to_string();
        assert!(build_query(&scan, &Config::default()).is_err());
    }

    #[test]
    fn test_collect_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::create_dir_all(root.join("node_modules/lib")).unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::create_dir_all(root.join("gen")).unwrap();
        fs::write(root.join("src/main.go"), "package main\n").unwrap();
        fs::write(root.join("src/util.py"), "x = 1\n").unwrap();
        fs::write(root.join("src/notes.txt"), "hello\n").unwrap();
        fs::write(root.join("node_modules/lib/index.js"), "var a = 1;\n").unwrap();
        fs::write(root.join(".git/hook.py"), "y = 2\n").unwrap();
        fs::write(root.join("gen/out.rs"), "fn f() {}\n").unwrap();

        let config = Config {
            excluded_paths: vec!["gen/**".to_string()],
            ..Config::default()
        };
        let exclusions = config.exclusions().unwrap();

        let files = collect_files(root, &config, &exclusions, None).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|(p, _)| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(names, vec!["src/main.go", "src/util.py"]);
        assert_eq!(files[0].1, Language::Go);

        let only_python = collect_files(root, &config, &exclusions, Some(Language::Python)).unwrap();
        assert_eq!(only_python.len(), 1);
        assert_eq!(only_python[0].1, Language::Python);
    }

    #[test]
    fn test_scan_files_skips_nothing_readable() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("app.js");
        fs::write(&file, "const PORT = 8080;\n").unwrap();

        let scanned = scan_files(&[(file, Language::JavaScript)], dir.path()).unwrap();
        assert_eq!(scanned.len(), 1);
        assert_eq!(scanned[0].path, PathBuf::from("app.js"));
        assert_eq!(scanned[0].symbols[0].name, "PORT");
        assert_eq!(scanned[0].symbols[0].kind, SymbolKind::Constant);
    }

    #[test]
    fn test_scan_files_skips_missing() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone.py");
        let scanned = scan_files(&[(missing, Language::Python)], dir.path()).unwrap();
        assert!(scanned.is_empty());
    }
}
