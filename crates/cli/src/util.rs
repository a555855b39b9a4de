//! File and column helpers shared by the subcommands.

use std::io::Write;
use std::path::{Path, PathBuf};

use rostermerge_recon::ReconConfig;
use tempfile::NamedTempFile;
use unicode_width::UnicodeWidthStr;

use crate::CliError;

/// Read a UTF-8 text file. `what` names the file in the error message.
pub fn read_text(path: &Path, what: &str) -> Result<String, CliError> {
    std::fs::read_to_string(path)
        .map_err(|e| CliError::io(format!("cannot read {} {}: {}", what, path.display(), e)))
}

/// A fully written temp file waiting to replace its target.
#[derive(Debug)]
pub struct StagedWrite {
    tmp: NamedTempFile,
    path: PathBuf,
}

/// Write `contents` to a temp file in the target's directory. Nothing is
/// visible at `path` until [`StagedWrite::commit`].
pub fn stage_write(path: &Path, contents: &str) -> Result<StagedWrite, CliError> {
    let dir = parent_dir(path);
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| {
        CliError::io(format!("cannot create temp file in {}: {}", dir.display(), e))
    })?;
    tmp.write_all(contents.as_bytes())
        .and_then(|_| tmp.write_all(b"\n"))
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| CliError::io(format!("cannot write {}: {}", path.display(), e)))?;
    Ok(StagedWrite { tmp, path: path.to_path_buf() })
}

impl StagedWrite {
    /// Rename the temp file over the target.
    pub fn commit(self) -> Result<(), CliError> {
        let path = self.path;
        self.tmp
            .persist(&path)
            .map_err(|e| CliError::io(format!("cannot replace {}: {}", path.display(), e.error)))?;
        Ok(())
    }
}

/// Replace `path` with `contents` via a temp file in the same directory, so
/// a failed write never leaves a half-written member file behind.
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), CliError> {
    stage_write(path, contents)?.commit()
}

/// Whether two output paths name the same file. The file itself may not
/// exist yet, so the parent directory is resolved and the name re-joined.
pub fn same_target(a: &Path, b: &Path) -> bool {
    resolve_target(a) == resolve_target(b)
}

fn resolve_target(path: &Path) -> PathBuf {
    if let Ok(full) = std::fs::canonicalize(path) {
        return full;
    }
    match (std::fs::canonicalize(parent_dir(path)), path.file_name()) {
        (Ok(dir), Some(name)) => dir.join(name),
        _ => path.to_path_buf(),
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Load and validate the TOML config, or fall back to defaults.
pub fn load_config(path: Option<&Path>) -> Result<ReconConfig, CliError> {
    let Some(path) = path else {
        return Ok(ReconConfig::default());
    };
    let text = read_text(path, "config")?;
    ReconConfig::from_toml(&text)
        .map_err(|e| CliError::recon(e).with_hint(format!("check {}", path.display())))
}

/// Fit `s` into exactly `width` terminal columns: pad short text, cut long
/// text with a trailing "…". Width-aware for accented and wide characters.
pub fn fit_column(s: &str, width: usize) -> String {
    let current = s.width();
    if current <= width {
        return format!("{}{}", s, " ".repeat(width - current));
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}
