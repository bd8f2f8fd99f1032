//! Artifact writer for the verified proxy lists

use crate::error::{Error, Result};
use crate::proxy::aggregator::CountrySampleMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes the run's three artifacts
pub struct ArtifactWriter;

impl ArtifactWriter {
    /// Save entries one per line, without a trailing newline
    pub fn save_list<S: AsRef<str>, P: AsRef<Path>>(entries: &[S], path: P) -> Result<()> {
        let content = entries
            .iter()
            .map(|e| e.as_ref())
            .collect::<Vec<_>>()
            .join("\n");
        write_replacing(path.as_ref(), content.as_bytes())
    }

    /// Save the sample map as JSON indented by two spaces
    pub fn save_samples<P: AsRef<Path>>(samples: &CountrySampleMap, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(samples)?;
        write_replacing(path.as_ref(), content.as_bytes())
    }

    /// Read the candidate list
    pub fn read_input<P: AsRef<Path>>(path: P) -> Result<String> {
        let path = path.as_ref();
        fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Write to a sibling temp file and rename it over `path`.
fn write_replacing(path: &Path, content: &[u8]) -> Result<()> {
    let tmp = temp_path(path);
    let to_error = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };

    fs::write(&tmp, content).map_err(to_error)?;
    fs::rename(&tmp, path).map_err(|source| {
        let _ = fs::remove_file(&tmp);
        to_error(source)
    })
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
