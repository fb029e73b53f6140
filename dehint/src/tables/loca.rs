//! The [loca (Index to Location)][loca] table
//!
//! [loca]: https://docs.microsoft.com/en-us/typography/opentype/spec/loca

use font_types::Tag;

use read_fonts::FontData;

use super::TopLevelTable;
use crate::{
    error::MalformedFont,
    write::{FontWrite, TableWriter},
};

/// The [loca] table.
///
/// When a font contains a `glyf` table, this table is rebuilt from it when
/// the font is written; the stored offsets are only written out for fonts
/// that have a `loca` without a `glyf`.
///
/// [loca]: https://docs.microsoft.com/en-us/typography/opentype/spec/loca
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Loca {
    // we just store u32, and then convert to u16 if needed in the `FontWrite` impl
    pub(crate) offsets: Vec<u32>,
    loca_format: LocaFormat,
}

/// Whether or not the 'loca' table uses short or long offsets.
///
/// This flag is stored in the 'head' table's [indexToLocFormat][locformat] field.
/// See the ['loca' spec][spec] for more information.
///
/// [locformat]: super::head::Head::index_to_loc_format
/// [spec]: https://learn.microsoft.com/en-us/typography/opentype/spec/loca
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LocaFormat {
    Short = 0,
    Long = 1,
}

impl TopLevelTable for Loca {
    const TAG: Tag = Tag::new(b"loca");
}

impl Loca {
    /// Create a new loca table from 32-bit offsets.
    ///
    /// The `preferred` format is used if the offsets can be represented in it;
    /// otherwise the long format is used.
    pub fn new(offsets: Vec<u32>, preferred: LocaFormat) -> Self {
        let loca_format = match preferred {
            LocaFormat::Short if LocaFormat::fits_short(&offsets) => LocaFormat::Short,
            _ => LocaFormat::Long,
        };
        Loca {
            offsets,
            loca_format,
        }
    }

    /// Read the offsets for `num_glyphs` glyphs.
    ///
    /// Entries past the last glyph are ignored.
    pub fn read(
        data: &[u8],
        format: LocaFormat,
        num_glyphs: u16,
    ) -> Result<Self, MalformedFont> {
        let loca = read_fonts::tables::loca::Loca::read(
            FontData::new(data),
            format == LocaFormat::Long,
        )
        .map_err(|e| MalformedFont::read("bad offsets", e).in_table(Self::TAG))?;
        let count = num_glyphs as usize + 1;
        if loca.len() + 1 < count {
            return Err(MalformedFont::new(format!(
                "{} bytes is too short for {num_glyphs} glyphs",
                data.len()
            ))
            .in_table(Self::TAG));
        }
        if loca.len() + 1 > count {
            log::warn!("loca has {} entries, expected {count}", loca.len() + 1);
        }
        let offsets = (0..count)
            .map(|idx| loca.get_raw(idx))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| MalformedFont::new("missing offset").in_table(Self::TAG))?;
        if offsets.windows(2).any(|pair| pair[0] > pair[1]) {
            return Err(MalformedFont::new("offsets are not ascending").in_table(Self::TAG));
        }
        Ok(Loca {
            offsets,
            loca_format: format,
        })
    }

    pub fn format(&self) -> LocaFormat {
        self.loca_format
    }

    /// The byte range of each glyph in the `glyf` table.
    pub fn glyph_ranges(&self) -> impl Iterator<Item = std::ops::Range<usize>> + '_ {
        self.offsets
            .windows(2)
            .map(|pair| pair[0] as usize..pair[1] as usize)
    }
}

impl LocaFormat {
    // https://github.com/fonttools/fonttools/blob/1c283756a5e39d69459eea80ed12792adc4922dd/Lib/fontTools/ttLib/tables/_l_o_c_a.py#L37
    fn fits_short(loca: &[u32]) -> bool {
        const MAX_SHORT_LOCA_VALUE: u32 = 0x20000;
        loca.last().copied().unwrap_or_default() < MAX_SHORT_LOCA_VALUE
            && loca.iter().all(|offset| offset % 2 == 0)
    }

    /// The value of `head.indexToLocFormat` for this format.
    pub fn index_to_loc_format(self) -> i16 {
        self as i16
    }
}

impl FontWrite for Loca {
    fn write_into(&self, writer: &mut TableWriter) {
        match self.loca_format {
            LocaFormat::Long => self.offsets.write_into(writer),
            LocaFormat::Short => self
                .offsets
                .iter()
                .for_each(|off| ((off >> 1) as u16).write_into(writer)),
        }
    }
}
