use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::Error;

/// Stream `path` through `transform` and atomically replace it with the result.
///
/// The output is written to a temporary file in the same directory, flushed,
/// and renamed over the original only after `transform` succeeds. On any
/// error the temporary file is removed and the original is left as it was.
pub fn replace_atomically<F>(path: &Path, transform: F) -> Result<(), Error>
where
    F: FnOnce(&mut BufReader<File>, &mut BufWriter<&mut File>) -> Result<(), Error>,
{
    write_atomically(path, path, transform)
}

/// Stream `input` through `transform` into `output`.
///
/// `output` only appears once the whole result is on disk; a failed
/// transform leaves no file behind and any existing `output` untouched.
pub fn write_atomically<F>(input: &Path, output: &Path, transform: F) -> Result<(), Error>
where
    F: FnOnce(&mut BufReader<File>, &mut BufWriter<&mut File>) -> Result<(), Error>,
{
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut reader = BufReader::new(File::open(input)?);
    let mut temp = NamedTempFile::new_in(dir)?;

    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        transform(&mut reader, &mut writer)?;
        writer.flush()?;
    }
    temp.as_file().sync_all()?;

    debug!(
        "Moving {} to {}",
        temp.path().display(),
        output.display()
    );
    temp.persist(output).map_err(|e| Error::from(e.error))?;

    Ok(())
}
