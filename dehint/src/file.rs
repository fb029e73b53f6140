//! Dehinting font files on disk

use std::path::{Path, PathBuf};

use crate::{
    error::Error,
    pipeline::{dehint_bytes, Options, Report},
};

/// The path used for the output when none is given.
///
/// This is `<stem>-dehinted.<ext>` next to the input; the extension defaults
/// to `ttf` if the input has none.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let extension = input
        .extension()
        .map(|ext| ext.to_string_lossy())
        .unwrap_or("ttf".into());
    input.with_file_name(format!("{stem}-dehinted.{extension}"))
}

/// Remove all hinting from the font at `input`, writing the result to
/// `output`.
///
/// The output is written to a temporary file next to `output` which is then
/// renamed, so an existing file at `output` is either replaced completely or
/// left untouched. Writing over the input file is an error.
pub fn dehint_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &Options,
) -> Result<Report, Error> {
    let input = input.as_ref();
    let output = output.as_ref();
    if !input.is_file() {
        return Err(Error::InvalidInputPath(input.to_owned()));
    }
    if is_same_file(input, output) {
        return Err(Error::OutputPathConflict(output.to_owned()));
    }
    let data = std::fs::read(input).map_err(io_error(input))?;
    let (bytes, report) = dehint_bytes(&data, options)?;
    write_atomic(output, &bytes)?;
    log::info!(
        "wrote {} bytes to '{}' ({} bytes in)",
        bytes.len(),
        output.display(),
        data.len()
    );
    Ok(report)
}

// an output that doesn't exist yet can't be the input
fn is_same_file(input: &Path, output: &Path) -> bool {
    match (input.canonicalize(), output.canonicalize()) {
        (Ok(input), Ok(output)) => input == output,
        _ => false,
    }
}

fn write_atomic(path: &Path, data: &[u8]) -> Result<(), Error> {
    let file_name = path.file_name().unwrap_or_default().to_string_lossy();
    let temp_path = path.with_file_name(format!(".{file_name}.{}.tmp", std::process::id()));
    std::fs::write(&temp_path, data).map_err(io_error(&temp_path))?;
    if let Err(e) = std::fs::rename(&temp_path, path) {
        if let Err(cleanup) = std::fs::remove_file(&temp_path) {
            log::warn!("failed to remove '{}': {cleanup}", temp_path.display());
        }
        return Err(io_error(path)(e));
    }
    Ok(())
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> Error + '_ {
    move |source| Error::Io {
        path: path.to_owned(),
        source,
    }
}
