//! Removing TrueType hints from fonts
//!
//! This crate edits TrueType font files to remove the instruction sets
//! ("hints") they carry, along with the tables that only exist to support
//! hinted rendering. The result is a smaller font that renders without
//! grid-fitting.
//!
//! The work happens in three phases:
//!
//! - the font file is decoded into an owned [`Font`], a map from [`Tag`] to
//!   [`Table`]. The tables this crate edits (`head`, `maxp`, `gasp`, `glyf`
//!   and `loca`) are fully decoded; everything else is kept as raw bytes.
//! - a fixed sequence of edits is applied (see [`dehint()`]), each of which
//!   reports whether it changed anything.
//! - the font is re-encoded with a fresh [table directory], recomputed
//!   offsets, padding and checksums.
//!
//! # Example
//!
//! ```no_run
//! # let path_to_my_font_file = std::path::Path::new("");
//! use dehint::{dehint_bytes, Options};
//! let font_bytes = std::fs::read(path_to_my_font_file).unwrap();
//! let (dehinted, report) = dehint_bytes(&font_bytes, &Options::default()).unwrap();
//! println!("stripped bytecode from {} glyphs", report.glyphs_modified);
//! # let _ = dehinted;
//! ```
//!
//! [table directory]: https://learn.microsoft.com/en-us/typography/opentype/spec/otff#table-directory

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod bits;
mod error;
pub mod file;
mod font;
mod font_builder;
mod pipeline;
pub mod tables;
mod write;

#[cfg(test)]
mod test_helpers;

pub use pipeline::{
    dehint, dehint_bytes, remove_table, strip_glyf_instructions, update_gasp, update_head_flags,
    update_maxp, Options, Outcome, Report,
};
pub use error::{Error, MalformedFont};
pub use file::{default_output_path, dehint_file};
pub use font::{is_truetype, Font, TRUE_SFNT_VERSION, TT_SFNT_VERSION};
pub use tables::Table;

/// Public re-export of the font-types crate.
pub extern crate font_types as types;

pub use font_types::Tag;
