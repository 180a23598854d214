use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{ReelError, ReelResult};

/// Ordered list of files for ffmpeg's concat demuxer.
///
/// Rendered as one `file '<path>'` line per entry, in playback order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConcatManifest {
    entries: Vec<PathBuf>,
}

impl ConcatManifest {
    /// Empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the next file in playback order.
    pub fn push(&mut self, path: impl Into<PathBuf>) {
        self.entries.push(path.into());
    }

    /// Entries in playback order.
    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when the manifest lists nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Concat demuxer text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str("file '");
            out.push_str(&escape(&entry.to_string_lossy()));
            out.push_str("'\n");
        }
        out
    }

    /// Parse concat demuxer text written by [`ConcatManifest::render`].
    pub fn parse(text: &str) -> ReelResult<Self> {
        let mut manifest = Self::new();
        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let quoted = line
                .strip_prefix("file '")
                .and_then(|rest| rest.strip_suffix('\''))
                .ok_or_else(|| ReelError::input(format!("bad concat manifest line: {line}")))?;
            manifest.push(unescape(quoted));
        }
        Ok(manifest)
    }

    /// Write the manifest to `path`.
    pub fn write_to(&self, path: &Path) -> ReelResult<()> {
        if self.is_empty() {
            return Err(ReelError::input("refusing to write an empty concat manifest"));
        }
        std::fs::write(path, self.render())
            .with_context(|| format!("write concat manifest '{}'", path.display()))?;
        Ok(())
    }

    /// Read a manifest written by [`ConcatManifest::write_to`].
    pub fn read_from(path: &Path) -> ReelResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read concat manifest '{}'", path.display()))?;
        Self::parse(&text)
    }
}

// Inside single quotes the concat demuxer only needs `'` spelled as `'\''`.
fn escape(path: &str) -> String {
    path.replace('\'', r"'\''")
}

fn unescape(quoted: &str) -> String {
    quoted.replace(r"'\''", "'")
}

#[cfg(test)]
#[path = "../../tests/unit/media/manifest.rs"]
mod tests;
