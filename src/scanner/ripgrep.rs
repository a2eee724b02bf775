//! Production scanner shelling out to ripgrep.

use super::{MarkerOccurrence, MarkerScanner, ScanError};
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Multiline match: a `// TODO` line plus any immediately following comment
/// lines, so a marker's text can continue across lines.
const TODO_PATTERN: &str = r"//\s*TODO.*(\n[\t ]*//.*)*";

/// Scanner backed by `rg`, invoked once per run at the repository root.
///
/// Output is consumed line by line in `path:line:text` shape; each matched
/// line (continuation lines included) becomes its own occurrence.
#[derive(Debug, Clone, Copy, Default)]
pub struct RipgrepScanner;

impl MarkerScanner for RipgrepScanner {
    fn scan(&self, root: &Path) -> Result<Vec<MarkerOccurrence>, ScanError> {
        let rg = which::which("rg")
            .map_err(|_| ScanError::SearchToolMissing("rg".to_string()))?;

        let output = Command::new(rg)
            .args(["--no-config", "-n", "-U", "--trim", "-e", TODO_PATTERN])
            .current_dir(root)
            // Clear GIT_DIR to avoid being affected by git hooks environment
            .env_remove("GIT_DIR")
            .env_remove("GIT_WORK_TREE")
            .output()
            .map_err(|e| ScanError::CommandError(e.to_string()))?;

        // Exit code 1 means no matches, which is a valid empty scan.
        if !output.status.success() && output.status.code() != Some(1) {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ScanError::CommandError(stderr.to_string()));
        }

        let stdout = String::from_utf8(output.stdout).map_err(|_| ScanError::InvalidUtf8)?;
        let occurrences = parse_search_output(&stdout)?;
        debug!(count = occurrences.len(), "Scanned TODO markers");
        Ok(occurrences)
    }
}

/// Parse ripgrep's `path:line:text` output into occurrences, discarding lines
/// whose comment text is empty once marker syntax is stripped.
fn parse_search_output(stdout: &str) -> Result<Vec<MarkerOccurrence>, ScanError> {
    let mut occurrences = Vec::new();
    for line in stdout.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if let Some(occurrence) = parse_line(line)? {
            occurrences.push(occurrence);
        }
    }
    Ok(occurrences)
}

fn parse_line(line: &str) -> Result<Option<MarkerOccurrence>, ScanError> {
    let mut parts = line.splitn(3, ':');
    let (Some(path), Some(line_no), Some(rest)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(ScanError::MalformedLine(line.to_string()));
    };

    let line_no: u32 = line_no
        .trim()
        .parse()
        .map_err(|_| ScanError::MalformedLine(line.to_string()))?;

    let text = strip_marker_syntax(rest);
    if text.is_empty() {
        return Ok(None);
    }

    Ok(Some(MarkerOccurrence {
        path: path.to_string(),
        line: line_no,
        text,
    }))
}

/// Remove the `TODO` keyword and `//` comment delimiters, then trim.
fn strip_marker_syntax(text: &str) -> String {
    text.replace("TODO", "").replace("//", "").trim().to_string()
}

#[cfg(test)]
#[path = "ripgrep_tests.rs"]
mod tests;
