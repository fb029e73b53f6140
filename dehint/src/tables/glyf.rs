//! The [glyf (Glyph Data)](https://docs.microsoft.com/en-us/typography/opentype/spec/glyf) table

mod composite;
mod simple;

use font_types::Tag;
use read_fonts::{tables::glyf as read_glyf, FontData, FontRead, ReadError};

pub use composite::{Component, CompositeGlyph};
pub use simple::SimpleGlyph;

use super::{
    loca::{Loca, LocaFormat},
    TopLevelTable,
};
use crate::{
    error::{Error, MalformedFont},
    write::{FontWrite, TableWriter},
};

/// The glyf table.
///
/// The glyphs are stored in glyph id order. The matching `loca` table is
/// not stored; it is rebuilt by [`Glyf::build`] whenever the table is
/// written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Glyf {
    pub glyphs: Vec<Glyph>,
    alignment: usize,
}

/// A glyph bounding box, in font units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Bbox {
    pub x_min: i16,
    pub y_min: i16,
    pub x_max: i16,
    pub y_max: i16,
}

/// A glyph, either simple or composite.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Glyph {
    /// A glyph with no outline, which has no data in the table.
    Empty,
    Simple(SimpleGlyph),
    Composite(CompositeGlyph),
}

impl TopLevelTable for Glyf {
    const TAG: Tag = Tag::new(b"glyf");
}

impl Glyf {
    /// The glyph alignment used for tables created with [`Glyf::new`].
    pub const DEFAULT_ALIGNMENT: usize = 2;

    pub fn new(glyphs: Vec<Glyph>) -> Self {
        Glyf {
            glyphs,
            alignment: Self::DEFAULT_ALIGNMENT,
        }
    }

    /// Decode the glyphs at the offsets in `loca`.
    ///
    /// The alignment of the glyph data is inferred from the offsets, and
    /// reused when the table is rebuilt.
    pub fn read(data: &[u8], loca: &Loca) -> Result<Self, MalformedFont> {
        let alignment = guess_alignment(&loca.offsets);
        let glyphs = loca
            .glyph_ranges()
            .enumerate()
            .map(|(gid, range)| {
                let glyph_data = data.get(range.clone()).ok_or_else(|| {
                    MalformedFont::new(format!(
                        "glyph {gid} at {range:?} is outside of {} bytes of glyph data",
                        data.len()
                    ))
                    .in_table(Self::TAG)
                })?;
                let mut glyph = Glyph::read(glyph_data).map_err(|e| {
                    MalformedFont::read(format!("bad glyph {gid}"), e).in_table(Self::TAG)
                })?;
                // zero padding up to the alignment is recreated by `build`
                if let Some(padding) = glyph.padding_mut() {
                    if padding.len() < alignment && padding.iter().all(|byte| *byte == 0) {
                        padding.clear();
                    }
                }
                Ok(glyph)
            })
            .collect::<Result<Vec<_>, MalformedFont>>()?;
        Ok(Glyf { glyphs, alignment })
    }

    /// The alignment of each glyph's data, in bytes.
    pub fn alignment(&self) -> usize {
        self.alignment
    }

    /// Remove the instructions from every glyph.
    ///
    /// Returns the number of glyphs that had instructions.
    pub fn strip_instructions(&mut self) -> usize {
        self.glyphs
            .iter_mut()
            .map(Glyph::strip_instructions)
            .filter(|changed| *changed)
            .count()
    }

    /// Encode the glyphs, returning the table data and the matching loca.
    ///
    /// The loca uses the `preferred` format if the offsets allow it; the
    /// caller is responsible for recording the format actually used in the
    /// `head` table.
    pub(crate) fn build(&self, preferred: LocaFormat) -> Result<(Vec<u8>, Loca), Error> {
        let mut writer = TableWriter::default();
        let mut offsets = Vec::with_capacity(self.glyphs.len() + 1);
        offsets.push(0);
        for (gid, glyph) in self.glyphs.iter().enumerate() {
            let instruction_len = glyph.instruction_len();
            if instruction_len > u16::MAX as usize {
                return Err(Error::Serialization(format!(
                    "glyph {gid} has {instruction_len} bytes of instructions, the limit is {}",
                    u16::MAX
                )));
            }
            glyph.write_into(&mut writer);
            writer.pad_to(self.alignment);
            let offset = u32::try_from(writer.len()).map_err(|_| {
                Error::Serialization(format!("glyph data exceeds {} bytes", u32::MAX))
            })?;
            offsets.push(offset);
        }
        Ok((writer.into_data(), Loca::new(offsets, preferred)))
    }
}

// the largest power of two (up to 4) that divides every offset
fn guess_alignment(offsets: &[u32]) -> usize {
    if offsets.iter().all(|off| off % 4 == 0) {
        4
    } else if offsets.iter().all(|off| off % 2 == 0) {
        2
    } else {
        1
    }
}

impl Glyph {
    /// Decode a glyph from exactly the bytes `loca` assigns to it.
    ///
    /// Any bytes following the glyph description are kept and written back
    /// until the glyph is modified.
    pub fn read(data: &[u8]) -> Result<Self, ReadError> {
        if data.is_empty() {
            return Ok(Glyph::Empty);
        }
        let glyph = read_glyf::Glyph::read(FontData::new(data))?;
        let bbox = Bbox {
            x_min: glyph.x_min(),
            y_min: glyph.y_min(),
            x_max: glyph.x_max(),
            y_max: glyph.y_max(),
        };
        match glyph {
            read_glyf::Glyph::Simple(simple) => {
                SimpleGlyph::from_table(&simple, bbox).map(Glyph::Simple)
            }
            read_glyf::Glyph::Composite(composite) => {
                CompositeGlyph::from_table(&composite, bbox).map(Glyph::Composite)
            }
        }
    }

    /// The length of the glyph program, zero if there is none.
    pub fn instruction_len(&self) -> usize {
        match self {
            Glyph::Empty => 0,
            Glyph::Simple(glyph) => glyph.instructions.len(),
            Glyph::Composite(glyph) => glyph.instruction_len(),
        }
    }

    fn padding_mut(&mut self) -> Option<&mut Vec<u8>> {
        match self {
            Glyph::Empty => None,
            Glyph::Simple(glyph) => Some(&mut glyph.padding),
            Glyph::Composite(glyph) => Some(&mut glyph.padding),
        }
    }

    /// Returns `true` if the glyph has no data.
    pub fn is_empty(&self) -> bool {
        matches!(self, Glyph::Empty)
    }

    /// Remove the glyph's instructions, returning `true` if it had any.
    pub fn strip_instructions(&mut self) -> bool {
        match self {
            Glyph::Empty => false,
            Glyph::Simple(glyph) => glyph.strip_instructions(),
            Glyph::Composite(glyph) => glyph.strip_instructions(),
        }
    }
}

impl FontWrite for Bbox {
    fn write_into(&self, writer: &mut TableWriter) {
        let Bbox {
            x_min,
            y_min,
            x_max,
            y_max,
        } = *self;
        [x_min, y_min, x_max, y_max].write_into(writer)
    }
}

impl FontWrite for Glyph {
    fn write_into(&self, writer: &mut TableWriter) {
        match self {
            Glyph::Empty => (),
            Glyph::Simple(glyph) => glyph.write_into(writer),
            Glyph::Composite(glyph) => glyph.write_into(writer),
        }
    }
}

impl From<SimpleGlyph> for Glyph {
    fn from(src: SimpleGlyph) -> Self {
        Glyph::Simple(src)
    }
}

impl From<CompositeGlyph> for Glyph {
    fn from(src: CompositeGlyph) -> Self {
        Glyph::Composite(src)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_helpers::{composite_glyph_bytes, simple_glyph_bytes, BeBuffer};

    // glyph data padded to `align`, and the long offsets of each glyph
    fn glyph_data(glyphs: &[&[u8]], align: usize) -> (Vec<u8>, Vec<u32>) {
        let mut data = Vec::new();
        let mut offsets = vec![0u32];
        for glyph in glyphs {
            data.extend_from_slice(glyph);
            while data.len() % align != 0 {
                data.push(0);
            }
            offsets.push(data.len() as u32);
        }
        (data, offsets)
    }

    fn long_loca(offsets: &[u32]) -> Loca {
        let buf = BeBuffer::new().extend(offsets.iter().copied());
        Loca::read(&buf, LocaFormat::Long, offsets.len() as u16 - 1).unwrap()
    }

    #[test]
    fn read_glyphs() {
        let simple = simple_glyph_bytes(&[0x2F]);
        let composite = composite_glyph_bytes(Some(&[0xB0, 0x00]));
        let (data, offsets) = glyph_data(&[&[], &simple[..], &composite[..]], 4);
        let glyf = Glyf::read(&data, &long_loca(&offsets)).unwrap();
        assert_eq!(glyf.glyphs.len(), 3);
        assert!(glyf.glyphs[0].is_empty());
        assert!(matches!(glyf.glyphs[1], Glyph::Simple(_)));
        assert!(matches!(glyf.glyphs[2], Glyph::Composite(_)));
        assert_eq!(glyf.alignment(), 4);
    }

    #[test]
    fn rebuild_preserves_alignment() {
        let simple = simple_glyph_bytes(&[0x2F]);
        let composite = composite_glyph_bytes(None);
        for align in [1, 2, 4] {
            let (data, offsets) = glyph_data(&[&simple[..], &[], &composite[..]], align);
            let glyf = Glyf::read(&data, &long_loca(&offsets)).unwrap();
            let (rebuilt, loca) = glyf.build(LocaFormat::Long).unwrap();
            assert_eq!(rebuilt, data, "alignment {align}");
            assert_eq!(loca.offsets, offsets, "alignment {align}");
        }
    }

    #[test]
    fn strip_counts_modified_glyphs() {
        let mut glyf = Glyf::new(vec![
            Glyph::Empty,
            Glyph::read(&simple_glyph_bytes(&[0x2F])).unwrap(),
            Glyph::read(&simple_glyph_bytes(&[])).unwrap(),
            Glyph::read(&composite_glyph_bytes(Some(&[0xB0, 0x00]))).unwrap(),
        ]);
        assert_eq!(glyf.strip_instructions(), 2);
        assert_eq!(glyf.strip_instructions(), 0);

        let (data, loca) = glyf.build(LocaFormat::Short).unwrap();
        assert_eq!(loca.format(), LocaFormat::Short);
        // 20 byte simple glyphs and a 24 byte composite
        assert_eq!(loca.offsets, [0, 0, 20, 40, 64]);
        assert_eq!(data.len(), 64);
    }

    #[test]
    fn glyph_outside_table() {
        let simple = simple_glyph_bytes(&[]);
        let (data, mut offsets) = glyph_data(&[&simple[..]], 2);
        offsets[1] += 2;
        let err = Glyf::read(&data, &long_loca(&offsets)).unwrap_err();
        assert_eq!(err.tag, Some(Glyf::TAG));
    }

    #[test]
    fn truncated_glyph() {
        let composite = composite_glyph_bytes(Some(&[0xB0, 0x00]));
        let (_, offsets) = glyph_data(&[&composite[..]], 1);
        let truncated = &composite[..composite.len() - 1];
        let short_offsets = [offsets[0], offsets[1] - 1];
        assert!(Glyf::read(truncated, &long_loca(&short_offsets)).is_err());
    }

    #[test]
    fn slack_between_glyphs_survives() {
        let simple = simple_glyph_bytes(&[]);
        let data = BeBuffer::new()
            .extend(simple.iter().copied())
            .extend([0u8, 0])
            .extend(simple.iter().copied());
        let offsets = [0u32, 22, 42];
        let glyf = Glyf::read(&data, &long_loca(&offsets)).unwrap();
        assert_eq!(glyf.alignment(), 2);
        let (rebuilt, loca) = glyf.build(LocaFormat::Short).unwrap();
        assert_eq!(rebuilt, &*data);
        assert_eq!(loca.offsets, offsets);
    }

    #[test]
    fn oversized_program() {
        let mut glyph = Glyph::read(&simple_glyph_bytes(&[])).unwrap();
        let Glyph::Simple(simple) = &mut glyph else {
            panic!("not a simple glyph");
        };
        simple.instructions = vec![0x2F; u16::MAX as usize + 1];
        assert_eq!(glyph.instruction_len(), 65536);
        let glyf = Glyf::new(vec![Glyph::Empty, glyph]);
        assert!(matches!(
            glyf.build(LocaFormat::Long),
            Err(Error::Serialization(msg)) if msg.contains("glyph 1")
        ));
    }
}
