use crate::view::{outline_rows, table};
use nu_ansi_term::Color;
use std::path::{Path, PathBuf};
use tracing::info;
use xtc_api::{CompilationResult, Severity};
use xtc_core::{AdapterKind, select_adapter};

/// Outcome of checking one file.
pub struct CheckReport {
    pub path: PathBuf,
    pub backend: String,
    pub result: CompilationResult,
}

impl CheckReport {
    pub fn has_errors(&self) -> bool {
        self.result
            .diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Diagnostics as `file:line:col: severity: message` (1-based), then the outline.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for d in &self.result.diagnostics {
            let label = match d.severity {
                Severity::Error => Color::Red.bold().paint("error"),
                Severity::Warning => Color::Yellow.bold().paint("warning"),
                Severity::Information => Color::Blue.paint("info"),
                Severity::Hint => Color::LightGray.paint("hint"),
            };
            out.push_str(&format!(
                "{}:{}:{}: {}: {}\n",
                self.path.display(),
                d.location.range.start_line + 1,
                d.location.range.start_col + 1,
                label,
                d.message
            ));
        }
        if !self.result.symbols.is_empty() {
            out.push_str(&table(outline_rows(&self.result.symbols)));
            out.push('\n');
        }
        out.push_str(&format!(
            "{} diagnostics, {} symbols ({})\n",
            self.result.diagnostics.len(),
            self.result.all_symbols().count(),
            self.backend
        ));
        out
    }
}

pub fn check_file(path: &Path, adapter: AdapterKind) -> anyhow::Result<CheckReport> {
    let content = crate::read(path)?;
    let adapter = select_adapter(adapter);
    let absolute = std::fs::canonicalize(path)?;
    let uri = format!("file://{}", absolute.display());

    info!("Checking {} with {}", uri, adapter.display_name());
    let result = adapter.compile(&uri, &content);
    adapter.close_document(&uri);

    Ok(CheckReport {
        path: path.to_path_buf(),
        backend: adapter.display_name().to_string(),
        result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write(source: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".x").tempfile().unwrap();
        file.write_all(source.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_check_clean_file() {
        let file = write("module app {\n    class Person {\n        String name;\n    }\n}\n");
        let report = check_file(file.path(), AdapterKind::Tree).unwrap();

        assert!(!report.has_errors());
        let text = report.render();
        assert!(text.contains("Person"));
        assert!(text.contains("String name"));
        assert!(text.ends_with("0 diagnostics, 3 symbols (Tree (syntax-aware))\n"));
    }

    #[test]
    fn test_check_reports_errors_with_one_based_positions() {
        let file = write("module app {\n    class Person {\n");
        let report = check_file(file.path(), AdapterKind::Mock).unwrap();

        assert!(report.has_errors());
        let text = report.render();
        assert!(text.contains(":3:1: "));
        assert!(text.contains("Unmatched opening brace"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = check_file(&dir.path().join("absent.x"), AdapterKind::Mock)
            .err()
            .unwrap();
        assert!(err.to_string().starts_with("cannot read"));
    }
}
