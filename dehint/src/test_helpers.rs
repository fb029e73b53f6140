//! small utilities used in tests

use font_types::{Scalar, Tag};

use crate::{
    tables::{
        glyf::{Glyf, Glyph},
        head::Head,
        maxp::Maxp,
        TopLevelTable,
    },
    Font, Table,
};

/// A convenience type for generating a buffer of big-endian bytes.
#[derive(Debug, Clone, Default)]
pub struct BeBuffer {
    data: Vec<u8>,
}

impl BeBuffer {
    pub fn new() -> Self {
        Default::default()
    }

    /// Write any scalar to this buffer.
    pub fn push(mut self, item: impl Scalar) -> Self {
        self.data.extend(item.to_raw().as_ref());
        self
    }

    /// Write multiple scalars into the buffer
    pub fn extend<T: Scalar>(mut self, iter: impl IntoIterator<Item = T>) -> Self {
        for item in iter {
            self.data.extend(item.to_raw().as_ref());
        }
        self
    }
}

impl std::ops::Deref for BeBuffer {
    type Target = [u8];
    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

/// A simple glyph with two points on one contour, carrying `instructions`.
pub fn simple_glyph_bytes(instructions: &[u8]) -> BeBuffer {
    BeBuffer::new()
        .extend([1i16, 0, 0, 100, 100]) // one contour + bbox
        .push(1u16) // end pt of contour 0
        .push(instructions.len() as u16)
        .extend(instructions.iter().copied())
        // on-curve, x short positive, y short positive
        .extend([0x37u8, 0x37])
        .extend([10u8, 90]) // x deltas
        .extend([10u8, 90]) // y deltas
}

/// A composite glyph with two components; the last one carries
/// `WE_HAVE_INSTRUCTIONS` when `instructions` is `Some`.
pub fn composite_glyph_bytes(instructions: Option<&[u8]>) -> BeBuffer {
    let last_flags = if instructions.is_some() {
        0x0102u16 // WE_HAVE_INSTRUCTIONS | ARGS_ARE_XY_VALUES
    } else {
        0x0002
    };
    let buf = BeBuffer::new()
        .extend([-1i16, 0, 0, 200, 100])
        .push(0x0023u16) // ARG_1_AND_2_ARE_WORDS | ARGS_ARE_XY_VALUES | MORE_COMPONENTS
        .push(1u16)
        .extend([0i16, 0])
        .push(last_flags)
        .push(2u16)
        .extend([100u8, 0]);
    match instructions {
        Some(instructions) => buf
            .push(instructions.len() as u16)
            .extend(instructions.iter().copied()),
        None => buf,
    }
}

/// A small hinted TrueType font.
///
/// Contains `cvt `, `fpgm`, `prep`, `hdmx`, `LTSH` and a `head` table with
/// flag bit 4 set, plus four glyphs: an empty notdef, two hinted simple
/// glyphs and a hinted composite.
pub fn hinted_font() -> Font {
    let glyphs = [
        Glyph::Empty,
        Glyph::read(&simple_glyph_bytes(&[0xB0, 0x01, 0x2F])).unwrap(),
        Glyph::read(&simple_glyph_bytes(&[0x2F])).unwrap(),
        Glyph::read(&composite_glyph_bytes(Some(&[0xB0, 0x00]))).unwrap(),
    ];
    let glyf = Glyf::new(glyphs.to_vec());

    let mut head = Head::default();
    head.flags = 0b0001_1011;

    let mut maxp = Maxp::new(glyf.glyphs.len() as u16);
    if let Some(limits) = maxp.limits.as_mut() {
        limits.max_points = 2;
        limits.max_contours = 1;
        limits.max_zones = 2;
        limits.max_twilight_points = 16;
        limits.max_storage = 47;
        limits.max_function_defs = 12;
        limits.max_stack_elements = 200;
        limits.max_size_of_instructions = 300;
        limits.max_component_elements = 2;
        limits.max_component_depth = 1;
    }

    let mut font = Font::default();
    font.insert(Head::TAG, Table::Head(head));
    font.insert(Maxp::TAG, Table::Maxp(maxp));
    font.insert(Glyf::TAG, Table::Glyf(glyf));
    for (tag, data) in [
        (b"cvt ", vec![0u8, 20, 0, 40]),
        (b"fpgm", vec![0xB0, 0x00, 0x2C]),
        (b"prep", vec![0xB8, 0x01, 0xFF, 0x85]),
        (b"hdmx", vec![0, 0, 0, 1, 0, 0, 0, 8, 12, 12, 0, 6, 7, 12, 0, 0]),
        (b"LTSH", vec![0, 0, 0, 4, 1, 1, 1, 1]),
        (b"name", vec![0, 0, 0, 0, 0, 6]),
    ] {
        font.insert(Tag::new(tag), Table::Raw(data));
    }
    font
}

/// Assemble a font file from raw tables, in the order given.
///
/// Checksums are left as zero and the binary search fields are not filled
/// in; each table is padded to four bytes.
pub fn font_file(tables: &[(Tag, &[u8])]) -> Vec<u8> {
    let mut directory = BeBuffer::new()
        .push(crate::TT_SFNT_VERSION)
        .push(tables.len() as u16)
        .extend([0u16; 3]);
    let mut offset = 12 + 16 * tables.len();
    let mut data = Vec::new();
    for (tag, table) in tables {
        directory = directory
            .push(*tag)
            .push(0u32)
            .push(offset as u32)
            .push(table.len() as u32);
        data.extend_from_slice(table);
        data.resize(data.len().next_multiple_of(4), 0);
        offset = 12 + 16 * tables.len() + data.len();
    }
    let mut file = directory.to_vec();
    file.extend(data);
    file
}
