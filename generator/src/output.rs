use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

/// Writes `document` to `destination`, or to stdout if there is none.
///
/// A file destination is replaced atomically: the document goes to a temporary file in the same
/// directory, which is then renamed over the target. An existing file is left untouched if
/// anything fails.
pub fn write_document(document: &str, destination: Option<&Path>) -> io::Result<()> {
    let Some(path) = destination else {
        let mut stdout = io::stdout().lock();
        stdout.write_all(document.as_bytes())?;
        return stdout.flush();
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(document.as_bytes())?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|err| err.error)?;
    debug!(path = %path.display(), bytes = document.len(), "wrote document");
    Ok(())
}
