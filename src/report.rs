//! Output formatting for scan results.
//!
//! Two formats are supported:
//! - Pretty: a colored terminal table, one section per file
//! - JSON: symbol records wrapped per file, for programmatic consumption

use colored::*;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::PathBuf;
use std::str::FromStr;

use crate::language::Language;
use crate::query::{kind_stats, KindCount};
use crate::symbol::{Symbol, SymbolKind};

/// How results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Ok(OutputFormat::Pretty),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!(
                "invalid format {:?}, must be one of pretty, json",
                other
            )),
        }
    }
}

/// Symbols found in one file (or one snippet).
#[derive(Debug, Clone)]
pub struct FileSymbols {
    pub path: PathBuf,
    pub language: Language,
    pub symbols: Vec<Symbol>,
}

impl FileSymbols {
    fn display_path(&self) -> String {
        self.path.to_string_lossy().replace('\\', "/")
    }
}

// =============================================================================
// JSON Format
// =============================================================================

#[derive(Serialize, Deserialize)]
pub struct JsonReport {
    pub version: String,
    pub files_scanned: usize,
    pub total_symbols: usize,
    pub files: Vec<JsonFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<Vec<JsonKindCount>>,
}

#[derive(Serialize, Deserialize)]
pub struct JsonFile {
    pub path: String,
    pub language: Language,
    pub symbols: Vec<Symbol>,
}

#[derive(Serialize, Deserialize)]
pub struct JsonKindCount {
    #[serde(rename = "type")]
    pub kind: SymbolKind,
    pub count: usize,
}

impl From<KindCount> for JsonKindCount {
    fn from(c: KindCount) -> Self {
        Self {
            kind: c.kind,
            count: c.count,
        }
    }
}

/// Build the JSON report for a set of scanned files.
pub fn json_report(files: &[FileSymbols], with_stats: bool) -> JsonReport {
    let all: Vec<Symbol> = files.iter().flat_map(|f| f.symbols.iter().cloned()).collect();
    let stats: Option<Vec<JsonKindCount>> =
        with_stats.then(|| kind_stats(&all).into_iter().map(Into::into).collect());

    JsonReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        files_scanned: files.len(),
        total_symbols: all.len(),
        files: files
            .iter()
            .map(|f| JsonFile {
                path: f.display_path(),
                language: f.language,
                symbols: f.symbols.clone(),
            })
            .collect(),
        stats,
    }
}

/// Write results in JSON format.
pub fn write_json(files: &[FileSymbols], with_stats: bool) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&json_report(files, with_stats))?;
    println!("{}", json);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Terminal color for each kind.
pub fn kind_color(kind: SymbolKind) -> Color {
    match kind {
        SymbolKind::Variable => Color::Blue,
        SymbolKind::Function => Color::Green,
        SymbolKind::Class => Color::Magenta,
        SymbolKind::Method => Color::BrightGreen,
        SymbolKind::Parameter => Color::White,
        SymbolKind::Constant => Color::Yellow,
        SymbolKind::Import => Color::Cyan,
        SymbolKind::Builtin => Color::BrightMagenta,
        SymbolKind::Property => Color::BrightBlue,
        SymbolKind::Constructor => Color::Red,
    }
}

/// Render results as a human-readable table.
pub fn render_pretty(files: &[FileSymbols], with_stats: bool) -> String {
    let mut out = String::new();
    let total: usize = files.iter().map(|f| f.symbols.len()).sum();

    // Header
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "  {} v{}",
        "symscan".cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    let _ = writeln!(out);

    for file in files {
        write_file_section(&mut out, file);
    }

    if with_stats && total > 0 {
        let all: Vec<Symbol> = files.iter().flat_map(|f| f.symbols.iter().cloned()).collect();
        write_summary(&mut out, &kind_stats(&all));
        let _ = writeln!(out);
    }

    let plural = if files.len() != 1 { "s" } else { "" };
    let _ = writeln!(
        out,
        "  {}",
        format!("{} symbols in {} file{}", total, files.len(), plural).dimmed()
    );
    out
}

fn write_file_section(out: &mut String, file: &FileSymbols) {
    let _ = writeln!(
        out,
        "  {} {}",
        file.display_path().blue(),
        format!("({})", file.language.display_name()).dimmed()
    );

    if file.symbols.is_empty() {
        let _ = writeln!(out, "    {}", "no symbols found".dimmed());
        let _ = writeln!(out);
        return;
    }

    let _ = writeln!(
        out,
        "    {:>5}  {:<12} {:<28} {:<20} {:<16} {}",
        "LINE".bold(),
        "TYPE".bold(),
        "NAME".bold(),
        "SCOPE".bold(),
        "DATA TYPE".bold(),
        "DESCRIPTION".bold()
    );
    for symbol in &file.symbols {
        let _ = writeln!(
            out,
            "    {:>5}  {:<12} {:<28} {:<20} {:<16} {}",
            symbol.line.to_string().dimmed(),
            symbol.kind.as_str().color(kind_color(symbol.kind)),
            symbol.name,
            symbol.scope,
            symbol.data_type.as_deref().unwrap_or("-"),
            symbol.describe().dimmed()
        );
    }
    let _ = writeln!(out);
}

fn write_summary(out: &mut String, stats: &[KindCount]) {
    let _ = writeln!(out, "  {}", "Summary:".bold());
    for entry in stats {
        let _ = writeln!(
            out,
            "    {:<14} {:>5}",
            entry.kind.label().color(kind_color(entry.kind)),
            entry.count
        );
    }
}

/// Write results in pretty (human-readable) format.
pub fn write_pretty(files: &[FileSymbols], with_stats: bool) {
    print!("{}", render_pretty(files, with_stats));
}

/// Write results in the chosen format.
pub fn write(format: OutputFormat, files: &[FileSymbols], with_stats: bool) -> anyhow::Result<()> {
    match format {
        OutputFormat::Pretty => {
            write_pretty(files, with_stats);
            Ok(())
        }
        OutputFormat::Json => write_json(files, with_stats),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::scan;

    fn sample() -> Vec<FileSymbols> {
        let symbols = scan(Language::Python.example(), Language::Python).unwrap();
        vec![FileSymbols {
            path: PathBuf::from("demo/example.py"),
            language: Language::Python,
            symbols,
        }]
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("pretty".parse::<OutputFormat>(), Ok(OutputFormat::Pretty));
        assert!("sarif".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::default(), OutputFormat::Pretty);
    }

    #[test]
    fn test_json_report_shape() {
        let files = sample();
        let report = json_report(&files, true);
        assert_eq!(report.files_scanned, 1);
        assert_eq!(report.total_symbols, files[0].symbols.len());

        let value = serde_json::to_value(&report).unwrap();
        let file = &value["files"][0];
        assert_eq!(file["path"], "demo/example.py");
        assert_eq!(file["language"], "python");

        let first = &file["symbols"][0];
        assert!(first.get("name").is_some());
        assert!(first.get("type").is_some());
        assert!(first.get("line").is_some());
        assert!(first.get("kind").is_none());

        let stats = value["stats"].as_array().unwrap();
        let counted: u64 = stats.iter().map(|s| s["count"].as_u64().unwrap()).sum();
        assert_eq!(counted as usize, report.total_symbols);
    }

    #[test]
    fn test_json_omits_absent_fields() {
        let report = json_report(&sample(), false);
        let value = serde_json::to_value(&report).unwrap();
        assert!(value.get("stats").is_none());

        let class = value["files"][0]["symbols"]
            .as_array()
            .unwrap()
            .iter()
            .find(|s| s["type"] == "class")
            .unwrap();
        assert!(class.get("dataType").is_none());
    }

    #[test]
    fn test_render_pretty_lists_symbols() {
        let files = sample();
        let text = render_pretty(&files, true);
        assert!(text.contains("demo/example.py"));
        assert!(text.contains("Summary:"));
        for symbol in &files[0].symbols {
            assert!(text.contains(&symbol.name));
        }
        assert!(text.contains(&format!("{} symbols in 1 file", files[0].symbols.len())));
    }

    #[test]
    fn test_render_pretty_empty_file() {
        let files = vec![FileSymbols {
            path: PathBuf::from("empty.go"),
            language: Language::Go,
            symbols: Vec::new(),
        }];
        let text = render_pretty(&files, true);
        assert!(text.contains("no symbols found"));
        assert!(!text.contains("Summary:"));
        assert!(text.contains("0 symbols in 1 file"));
    }

    #[test]
    fn test_kind_colors_are_distinct() {
        let mut seen = Vec::new();
        for kind in SymbolKind::ALL {
            let color = kind_color(kind);
            assert!(!seen.contains(&color), "{} shares a color", kind);
            seen.push(color);
        }
    }
}
