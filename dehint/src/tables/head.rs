//! The [head (Font Header)](https://docs.microsoft.com/en-us/typography/opentype/spec/head) table

use font_types::{Fixed, LongDateTime, MajorMinor, Scalar, Tag};
use read_fonts::{FontData, FontRead};

use super::{loca::LocaFormat, TopLevelTable};
use crate::{
    bits,
    error::MalformedFont,
    write::{FontWrite, TableWriter},
};

/// The `head` magic number.
pub const MAGIC_NUMBER: u32 = 0x5F0F3CF5;

/// Bit 4 of [`Head::flags`]: instructions may alter advance widths, so the
/// advance widths might not scale linearly.
///
/// The `hdmx` and `LTSH` tables describe exactly this non-linear scaling,
/// so the bit may only be cleared once both are gone.
pub const FLAG_INSTRUCTIONS_ALTER_ADVANCE: u32 = 4;

/// Byte offset of the `checksumAdjustment` field.
pub(crate) const CHECKSUM_ADJUSTMENT_OFFSET: usize = 8;

/// The [head](https://docs.microsoft.com/en-us/typography/opentype/spec/head) table
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Head {
    pub version: MajorMinor,
    pub font_revision: Fixed,
    /// Recomputed when the font is written.
    pub checksum_adjustment: u32,
    pub magic_number: u32,
    pub flags: u16,
    pub units_per_em: u16,
    pub created: LongDateTime,
    pub modified: LongDateTime,
    pub x_min: i16,
    pub y_min: i16,
    pub x_max: i16,
    pub y_max: i16,
    pub mac_style: u16,
    pub lowest_rec_ppem: u16,
    pub font_direction_hint: i16,
    /// 0 for short `loca` offsets, 1 for long.
    pub index_to_loc_format: i16,
    pub glyph_data_format: i16,
}

impl TopLevelTable for Head {
    const TAG: Tag = Tag::new(b"head");
}

impl Head {
    /// Decode the table from its bytes.
    pub fn read(data: &[u8]) -> Result<Self, MalformedFont> {
        let head = read_fonts::tables::head::Head::read(FontData::new(data))
            .map_err(|e| MalformedFont::read("bad header", e).in_table(Self::TAG))?;
        if head.magic_number() != MAGIC_NUMBER {
            log::warn!("unexpected head magic number 0x{:08X}", head.magic_number());
        }
        Ok(Head {
            version: head.version(),
            font_revision: head.font_revision(),
            checksum_adjustment: head.checksum_adjustment(),
            magic_number: head.magic_number(),
            flags: head.flags().bits(),
            units_per_em: head.units_per_em(),
            created: head.created(),
            modified: head.modified(),
            x_min: head.x_min(),
            y_min: head.y_min(),
            x_max: head.x_max(),
            y_max: head.y_max(),
            mac_style: head.mac_style().bits(),
            lowest_rec_ppem: head.lowest_rec_ppem(),
            font_direction_hint: head.font_direction_hint(),
            index_to_loc_format: head.index_to_loc_format(),
            glyph_data_format: head.glyph_data_format(),
        })
    }

    /// The format of the `loca` table, as declared by this table.
    pub fn loca_format(&self) -> LocaFormat {
        if self.index_to_loc_format == 0 {
            LocaFormat::Short
        } else {
            LocaFormat::Long
        }
    }

    /// Returns `true` if flag bit 4 (instructions may alter advance widths) is set.
    pub fn instructions_alter_advance(&self) -> bool {
        bits::is_bit_set(self.flags, FLAG_INSTRUCTIONS_ALTER_ADVANCE)
    }

    /// Clear flag bit 4, returning `true` if it was set.
    pub fn clear_instructions_alter_advance(&mut self) -> bool {
        let flags = bits::clear_bit(self.flags, FLAG_INSTRUCTIONS_ALTER_ADVANCE);
        let changed = flags != self.flags;
        self.flags = flags;
        changed
    }
}

impl Default for Head {
    fn default() -> Self {
        Head {
            version: MajorMinor::VERSION_1_0,
            font_revision: Fixed::from_f64(1.0),
            checksum_adjustment: 0,
            magic_number: MAGIC_NUMBER,
            flags: 0,
            units_per_em: 1000,
            created: LongDateTime::from_raw([0; 8]),
            modified: LongDateTime::from_raw([0; 8]),
            x_min: 0,
            y_min: 0,
            x_max: 0,
            y_max: 0,
            mac_style: 0,
            lowest_rec_ppem: 6,
            font_direction_hint: 2,
            index_to_loc_format: 0,
            glyph_data_format: 0,
        }
    }
}

impl FontWrite for Head {
    fn write_into(&self, writer: &mut TableWriter) {
        self.version.write_into(writer);
        self.font_revision.write_into(writer);
        self.checksum_adjustment.write_into(writer);
        self.magic_number.write_into(writer);
        self.flags.write_into(writer);
        self.units_per_em.write_into(writer);
        self.created.write_into(writer);
        self.modified.write_into(writer);
        [self.x_min, self.y_min, self.x_max, self.y_max].write_into(writer);
        self.mac_style.write_into(writer);
        self.lowest_rec_ppem.write_into(writer);
        [
            self.font_direction_hint,
            self.index_to_loc_format,
            self.glyph_data_format,
        ]
        .write_into(writer);
    }
}
