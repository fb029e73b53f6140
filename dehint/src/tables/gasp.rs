//! The [gasp](https://learn.microsoft.com/en-us/typography/opentype/spec/gasp) table

use font_types::Tag;
use read_fonts::{FontData, FontRead};

use super::TopLevelTable;
use crate::{
    error::{Error, MalformedFont},
    write::{FontWrite, TableWriter},
};

/// Use gridfitting.
pub const GASP_GRIDFIT: u16 = 0x0001;
/// Use grayscale rendering.
pub const GASP_DOGRAY: u16 = 0x0002;
/// Use gridfitting with ClearType symmetric smoothing.
pub const GASP_SYMMETRIC_GRIDFIT: u16 = 0x0004;
/// Use smoothing along multiple axes with ClearType.
pub const GASP_SYMMETRIC_SMOOTHING: u16 = 0x0008;

/// The upper ppem limit of the last range in a well-formed table.
pub const MAX_PPEM: u16 = 0xFFFF;

/// The behavior of an unhinted font: grayscale with symmetric smoothing,
/// without gridfitting, at every size.
pub const UNHINTED_BEHAVIOR: u16 = GASP_DOGRAY | GASP_SYMMETRIC_SMOOTHING;

/// The [gasp](https://learn.microsoft.com/en-us/typography/opentype/spec/gasp) table
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gasp {
    pub version: u16,
    /// Sorted by ppem to support binary searching
    pub gasp_ranges: Vec<GaspRange>,
}

/// A single range of sizes and the rendering behavior used for them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GaspRange {
    /// Upper limit of range, in PPEM
    pub range_max_ppem: u16,
    /// Flags describing desired rasterizer behavior.
    pub range_gasp_behavior: u16,
}

impl TopLevelTable for Gasp {
    const TAG: Tag = Tag::new(b"gasp");
}

impl Gasp {
    /// A table applying [`UNHINTED_BEHAVIOR`] to all sizes.
    pub fn unhinted() -> Self {
        Gasp {
            version: 1,
            gasp_ranges: vec![GaspRange::new(MAX_PPEM, UNHINTED_BEHAVIOR)],
        }
    }

    /// Decode the table from its bytes.
    ///
    /// Records are kept exactly as stored, including repeated sizes.
    pub fn read(data: &[u8]) -> Result<Self, MalformedFont> {
        let gasp = read_fonts::tables::gasp::Gasp::read(FontData::new(data))
            .map_err(|e| MalformedFont::read("bad table", e).in_table(Self::TAG))?;
        let gasp_ranges = gasp
            .gasp_ranges()
            .iter()
            .map(|range| {
                GaspRange::new(range.range_max_ppem(), range.range_gasp_behavior().bits())
            })
            .collect::<Vec<_>>();
        if gasp_ranges
            .windows(2)
            .any(|pair| pair[0].range_max_ppem >= pair[1].range_max_ppem)
        {
            log::warn!("gasp ranges are not in ascending order");
        }
        Ok(Gasp {
            version: gasp.version(),
            gasp_ranges,
        })
    }

    /// Returns `true` if this table is exactly [`Gasp::unhinted`].
    pub fn is_unhinted(&self) -> bool {
        *self == Gasp::unhinted()
    }

    /// Check that the number of ranges can be encoded.
    pub(crate) fn check_len(&self) -> Result<(), Error> {
        if self.gasp_ranges.len() > u16::MAX as usize {
            return Err(Error::Serialization(format!(
                "{} gasp ranges do not fit in a uint16 count",
                self.gasp_ranges.len()
            )));
        }
        Ok(())
    }
}

impl GaspRange {
    pub fn new(range_max_ppem: u16, range_gasp_behavior: u16) -> Self {
        GaspRange {
            range_max_ppem,
            range_gasp_behavior,
        }
    }
}

impl FontWrite for Gasp {
    fn write_into(&self, writer: &mut TableWriter) {
        self.version.write_into(writer);
        (self.gasp_ranges.len() as u16).write_into(writer);
        self.gasp_ranges.write_into(writer);
    }
}

impl FontWrite for GaspRange {
    fn write_into(&self, writer: &mut TableWriter) {
        self.range_max_ppem.write_into(writer);
        self.range_gasp_behavior.write_into(writer);
    }
}
