//!  A builder for top-level font objects

use std::borrow::Cow;
use std::collections::BTreeMap;

use font_types::Tag;

use crate::{
    error::Error,
    tables::head::CHECKSUM_ADJUSTMENT_OFFSET,
    write::{FontWrite, TableWriter},
};

const TABLE_RECORD_LEN: usize = 16;
const HEADER_LEN: usize = 12;

/// The whole-font checksum is this value once `checksumAdjustment` is set.
const CHECKSUM_MAGIC: u32 = 0xB1B0AFBA;

const HEAD: Tag = Tag::new(b"head");

/// The recommended ordering of table data in a TrueType font.
///
/// Tables not listed here follow in tag order.
///
/// See <https://learn.microsoft.com/en-us/typography/opentype/spec/recom#optimized-table-ordering>
const TABLE_ORDER: [Tag; 19] = [
    Tag::new(b"head"),
    Tag::new(b"hhea"),
    Tag::new(b"maxp"),
    Tag::new(b"OS/2"),
    Tag::new(b"hmtx"),
    Tag::new(b"LTSH"),
    Tag::new(b"VDMX"),
    Tag::new(b"hdmx"),
    Tag::new(b"cmap"),
    Tag::new(b"fpgm"),
    Tag::new(b"prep"),
    Tag::new(b"cvt "),
    Tag::new(b"loca"),
    Tag::new(b"glyf"),
    Tag::new(b"kern"),
    Tag::new(b"name"),
    Tag::new(b"post"),
    Tag::new(b"gasp"),
    Tag::new(b"PCLT"),
];

/// Build a font from some set of tables.
#[derive(Debug, Clone)]
pub(crate) struct FontBuilder<'a> {
    sfnt_version: u32,
    tables: BTreeMap<Tag, Cow<'a, [u8]>>,
}

/// The binary search assists of the table directory.
///
/// See <https://learn.microsoft.com/en-us/typography/opentype/spec/otff#table-directory>
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct SearchRange {
    search_range: u16,
    entry_selector: u16,
    range_shift: u16,
}

impl SearchRange {
    fn compute(num_tables: u16) -> Self {
        if num_tables == 0 {
            return SearchRange {
                search_range: 0,
                entry_selector: 0,
                range_shift: 0,
            };
        }
        // the largest power of two <= num_tables
        let entry_selector = num_tables.ilog2() as u16;
        let search_range = (1u32 << entry_selector) * TABLE_RECORD_LEN as u32;
        let range_shift = num_tables as u32 * TABLE_RECORD_LEN as u32 - search_range;
        SearchRange {
            search_range: search_range as u16,
            entry_selector,
            range_shift: range_shift as u16,
        }
    }
}

impl<'a> FontBuilder<'a> {
    /// Create a new builder for a font with this sfnt version.
    pub(crate) fn new(sfnt_version: u32) -> Self {
        FontBuilder {
            sfnt_version,
            tables: BTreeMap::new(),
        }
    }

    /// A builder method to add raw data for the provided tag
    pub(crate) fn add_raw(&mut self, tag: Tag, data: impl Into<Cow<'a, [u8]>>) -> &mut Self {
        self.tables.insert(tag, data.into());
        self
    }

    /// Assemble all the tables into a binary font file with a [Table Directory].
    ///
    /// Table records are sorted by tag, and table data is laid out in the
    /// recommended order. If there is a `head` table, its
    /// `checksumAdjustment` is computed for the finished font.
    ///
    /// [Table Directory]: https://learn.microsoft.com/en-us/typography/opentype/spec/otff#table-directory
    pub(crate) fn build(&mut self) -> Result<Vec<u8>, Error> {
        let num_tables = u16::try_from(self.tables.len()).map_err(|_| {
            Error::Serialization(format!("{} tables is too many", self.tables.len()))
        })?;
        if let Some(head) = self.tables.get_mut(&HEAD) {
            if let Some(adjustment) = head
                .to_mut()
                .get_mut(CHECKSUM_ADJUSTMENT_OFFSET..CHECKSUM_ADJUSTMENT_OFFSET + 4)
            {
                adjustment.fill(0);
            }
        }

        let mut layout: Vec<Tag> = self.tables.keys().copied().collect();
        layout.sort_by_key(|tag| {
            let rank = TABLE_ORDER
                .iter()
                .position(|ordered| ordered == tag)
                .unwrap_or(TABLE_ORDER.len());
            (rank, *tag)
        });

        let mut position = HEADER_LEN + self.tables.len() * TABLE_RECORD_LEN;
        let mut offsets = BTreeMap::new();
        for tag in &layout {
            let len = self.tables[tag].len();
            let offset = u32::try_from(position).map_err(|_| {
                Error::Serialization(format!("'{tag}' table starts past the 4GB limit"))
            })?;
            let length = u32::try_from(len)
                .map_err(|_| Error::Serialization(format!("'{tag}' table exceeds 4GB")))?;
            offsets.insert(*tag, (offset, length));
            position += round4(len);
        }

        let computed = SearchRange::compute(num_tables);
        let mut writer = TableWriter::default();
        self.sfnt_version.write_into(&mut writer);
        num_tables.write_into(&mut writer);
        computed.search_range.write_into(&mut writer);
        computed.entry_selector.write_into(&mut writer);
        computed.range_shift.write_into(&mut writer);
        for (tag, data) in &self.tables {
            let (offset, length) = offsets[tag];
            tag.write_into(&mut writer);
            checksum(data).write_into(&mut writer);
            offset.write_into(&mut writer);
            length.write_into(&mut writer);
        }
        for tag in &layout {
            writer.write_slice(&self.tables[tag]);
            writer.pad_to(4);
        }
        let mut data = writer.into_data();

        if let Some((offset, length)) = offsets.get(&HEAD) {
            let start = *offset as usize + CHECKSUM_ADJUSTMENT_OFFSET;
            if *length as usize >= CHECKSUM_ADJUSTMENT_OFFSET + 4 {
                let adjustment = CHECKSUM_MAGIC.wrapping_sub(checksum(&data));
                data[start..start + 4].copy_from_slice(&adjustment.to_be_bytes());
            } else {
                log::warn!("head table is too short for a checksum adjustment");
            }
        }
        Ok(data)
    }
}

/// <https://github.com/google/woff2/blob/a0d0ed7da27b708c0a4e96ad7a998bddc933c06e/src/round.h#L19>
fn round4(sz: usize) -> usize {
    (sz + 3) & !3
}

/// The sum of the data as big-endian u32s, zero padded to a multiple of four.
pub(crate) fn checksum(data: &[u8]) -> u32 {
    let mut iter = data.chunks_exact(4);
    let sum = (&mut iter).fold(0u32, |sum, quad| {
        sum.wrapping_add(u32::from_be_bytes([quad[0], quad[1], quad[2], quad[3]]))
    });
    let mut rem = [0u8; 4];
    rem[..iter.remainder().len()].copy_from_slice(iter.remainder());
    sum.wrapping_add(u32::from_be_bytes(rem))
}

#[cfg(test)]
mod tests {
    use read_fonts::FontData;

    use super::*;

    fn read_u16(data: &[u8], pos: usize) -> u16 {
        FontData::new(data).read_at(pos).unwrap()
    }

    fn read_u32(data: &[u8], pos: usize) -> u32 {
        FontData::new(data).read_at(pos).unwrap()
    }

    #[test]
    fn sets_binary_search_assists() {
        // Based on Roboto's num tables
        let data = b"doesn't matter".to_vec();
        let mut builder = FontBuilder::new(0x00010000);
        (0..0x16u32).for_each(|i| {
            builder.add_raw(Tag::from_be_bytes(i.to_be_bytes()), &data[..]);
        });
        let bytes = builder.build().unwrap();
        assert_eq!(read_u16(&bytes, 4), 0x16);
        assert_eq!(
            (256, 4, 96),
            (read_u16(&bytes, 6), read_u16(&bytes, 8), read_u16(&bytes, 10))
        );
    }

    #[test]
    fn search_range_small_counts() {
        assert_eq!(
            SearchRange::compute(1),
            SearchRange {
                search_range: 16,
                entry_selector: 0,
                range_shift: 0
            }
        );
        assert_eq!(
            SearchRange::compute(9),
            SearchRange {
                search_range: 128,
                entry_selector: 3,
                range_shift: 16
            }
        );
    }

    #[test]
    fn survives_no_tables() {
        let bytes = FontBuilder::new(0x00010000).build().unwrap();
        assert_eq!(bytes, [0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn pad4() {
        for i in 0..10 {
            let padded = round4(i);
            assert!(padded - i < 4);
            assert!(padded % 4 == 0, "pad {i} to {padded} bytes");
        }
    }

    #[test]
    fn checksum_pads_with_zeros() {
        assert_eq!(checksum(&[]), 0);
        assert_eq!(checksum(&[0, 0, 0, 1, 0, 0, 0, 2]), 3);
        assert_eq!(checksum(&[1]), 0x0100_0000);
        assert_eq!(checksum(&[0xFF; 8]), 0xFFFF_FFFE);
    }

    #[test]
    fn records_sorted_data_in_recommended_order() {
        let mut builder = FontBuilder::new(0x00010000);
        builder
            .add_raw(Tag::new(b"zzzz"), vec![1])
            .add_raw(Tag::new(b"name"), vec![2, 2])
            .add_raw(Tag::new(b"cvt "), vec![3, 3, 3])
            .add_raw(Tag::new(b"cmap"), vec![4, 4, 4, 4, 4]);
        let bytes = builder.build().unwrap();
        let records = (0..4)
            .map(|i| {
                let pos = HEADER_LEN + i * TABLE_RECORD_LEN;
                let tag = Tag::from_be_bytes(bytes[pos..pos + 4].try_into().unwrap());
                (tag, read_u32(&bytes, pos + 8), read_u32(&bytes, pos + 12))
            })
            .collect::<Vec<_>>();
        let data_start = (HEADER_LEN + 4 * TABLE_RECORD_LEN) as u32;
        assert_eq!(
            records,
            [
                (Tag::new(b"cmap"), data_start, 5),
                (Tag::new(b"cvt "), data_start + 8, 3),
                (Tag::new(b"name"), data_start + 12, 2),
                (Tag::new(b"zzzz"), data_start + 16, 1),
            ]
        );
        assert_eq!(bytes.len() as u32, data_start + 20);
    }

    #[test]
    fn head_checksum_adjustment() {
        let mut head = vec![0u8; 54];
        head[8..12].copy_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
        let mut builder = FontBuilder::new(0x00010000);
        builder
            .add_raw(Tag::new(b"head"), head)
            .add_raw(Tag::new(b"name"), vec![9, 8, 7]);
        let bytes = builder.build().unwrap();
        assert_eq!(checksum(&bytes), CHECKSUM_MAGIC);

        // the head record's checksum is computed with a zero adjustment
        let head_offset = read_u32(&bytes, HEADER_LEN + 8) as usize;
        let mut head = bytes[head_offset..head_offset + 54].to_vec();
        assert_ne!(&head[8..12], &[0xDE, 0xAD, 0xBE, 0xEF]);
        head[8..12].fill(0);
        assert_eq!(read_u32(&bytes, HEADER_LEN + 4), checksum(&head));
    }
}
