//! Errors that occur while dehinting

use std::path::PathBuf;

use font_types::Tag;
use read_fonts::ReadError;

/// An error that aborts dehinting.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// The input path does not reference a readable file.
    InvalidInputPath(PathBuf),
    /// The input does not start with a TrueType signature.
    NotATrueTypeFont,
    /// The requested output path is the input path.
    OutputPathConflict(PathBuf),
    /// The font data could not be decoded.
    MalformedFont(MalformedFont),
    /// A table required by an operation is missing.
    TableNotFound(Tag),
    /// A table was still present after it was removed.
    ///
    /// This indicates a bug in this crate.
    TableRemoval(Tag),
    /// The font could not be encoded.
    Serialization(String),
    /// Reading or writing a file failed.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A structural problem found while decoding a font.
#[derive(Clone, Debug)]
pub struct MalformedFont {
    /// The table in which the error occurred, if any
    pub tag: Option<Tag>,
    message: String,
    source: Option<ReadError>,
}

impl MalformedFont {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        MalformedFont {
            tag: None,
            message: message.into(),
            source: None,
        }
    }

    pub(crate) fn read(message: impl Into<String>, source: ReadError) -> Self {
        MalformedFont {
            source: Some(source),
            ..MalformedFont::new(message)
        }
    }

    pub(crate) fn in_table(mut self, tag: Tag) -> Self {
        self.tag.get_or_insert(tag);
        self
    }

    /// A description of the problem.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<MalformedFont> for Error {
    fn from(src: MalformedFont) -> Error {
        Error::MalformedFont(src)
    }
}

impl std::fmt::Display for MalformedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(tag) = self.tag {
            write!(f, "'{tag}' table: ")?;
        }
        f.write_str(&self.message)?;
        if let Some(source) = &self.source {
            write!(f, " ({source})")?;
        }
        Ok(())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidInputPath(path) => {
                write!(f, "'{}' is not a valid file path", path.display())
            }
            Error::NotATrueTypeFont => write!(f, "data does not appear to be a TrueType font"),
            Error::OutputPathConflict(path) => write!(
                f,
                "output path '{}' would overwrite the input file",
                path.display()
            ),
            Error::MalformedFont(error) => write!(f, "malformed font: {error}"),
            Error::TableNotFound(tag) => write!(f, "the '{tag}' table is missing"),
            Error::TableRemoval(tag) => write!(f, "failed to remove the '{tag}' table"),
            Error::Serialization(msg) => write!(f, "failed to write font: {msg}"),
            Error::Io { path, source } => write!(f, "'{}': {source}", path.display()),
        }
    }
}

impl std::error::Error for MalformedFont {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::MalformedFont(error) => Some(error),
            Error::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
