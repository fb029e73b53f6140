//! Simple glyphs (containing contour outlines)

use read_fonts::{tables::glyf::SimpleGlyphFlags, ReadError};

use super::Bbox;
use crate::write::{FontWrite, TableWriter};

/// A single glyph with contours.
///
/// The point flags and coordinates are kept in their encoded form; only the
/// instructions are exposed for editing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimpleGlyph {
    pub bbox: Bbox,
    end_pts_of_contours: Vec<u16>,
    pub instructions: Vec<u8>,
    /// Encoded flags, x coordinates and y coordinates
    points: Vec<u8>,
    /// Bytes following the coordinates, written back unless the glyph is edited
    pub(crate) padding: Vec<u8>,
}

impl SimpleGlyph {
    pub(crate) fn from_table(
        glyph: &read_fonts::tables::glyf::SimpleGlyph,
        bbox: Bbox,
    ) -> Result<Self, ReadError> {
        let glyph_data = glyph.glyph_data();
        let points_len = encoded_points_len(glyph_data, glyph.num_points())?;
        let (points, padding) = glyph_data.split_at(points_len);
        Ok(SimpleGlyph {
            bbox,
            end_pts_of_contours: glyph
                .end_pts_of_contours()
                .iter()
                .map(|end| end.get())
                .collect(),
            instructions: glyph.instructions().to_vec(),
            points: points.to_vec(),
            padding: padding.to_vec(),
        })
    }

    /// The number of contours in this glyph.
    pub fn num_contours(&self) -> usize {
        self.end_pts_of_contours.len()
    }

    /// The total number of points in this glyph.
    pub fn num_points(&self) -> usize {
        self.end_pts_of_contours
            .last()
            .map(|last| *last as usize + 1)
            .unwrap_or_default()
    }

    /// Remove the glyph's instructions, returning `true` if there were any.
    pub fn strip_instructions(&mut self) -> bool {
        if self.instructions.is_empty() {
            return false;
        }
        self.instructions.clear();
        self.padding.clear();
        true
    }
}

/// Walk the flags of `num_points` points to find the length of the encoded
/// flags and coordinates.
fn encoded_points_len(data: &[u8], num_points: usize) -> Result<usize, ReadError> {
    let mut i = 0;
    let mut coord_bytes = 0;
    let mut seen = 0;
    while seen < num_points {
        let flag = SimpleGlyphFlags::from_bits_truncate(*data.get(i).ok_or(ReadError::OutOfBounds)?);
        i += 1;
        let mut repeat = 1;
        if flag.contains(SimpleGlyphFlags::REPEAT_FLAG) {
            repeat += *data.get(i).ok_or(ReadError::OutOfBounds)? as usize;
            i += 1;
        }
        if seen + repeat > num_points {
            return Err(ReadError::MalformedData("flag repeat count overflows points"));
        }
        let x_bytes = coordinate_len(
            flag,
            SimpleGlyphFlags::X_SHORT_VECTOR,
            SimpleGlyphFlags::X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR,
        );
        let y_bytes = coordinate_len(
            flag,
            SimpleGlyphFlags::Y_SHORT_VECTOR,
            SimpleGlyphFlags::Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR,
        );
        coord_bytes += (x_bytes + y_bytes) * repeat;
        seen += repeat;
    }
    let len = i + coord_bytes;
    if len > data.len() {
        return Err(ReadError::OutOfBounds);
    }
    Ok(len)
}

fn coordinate_len(
    flag: SimpleGlyphFlags,
    short: SimpleGlyphFlags,
    same_or_positive: SimpleGlyphFlags,
) -> usize {
    if flag.contains(short) {
        1
    } else if flag.contains(same_or_positive) {
        0
    } else {
        2
    }
}

impl FontWrite for SimpleGlyph {
    fn write_into(&self, writer: &mut TableWriter) {
        (self.end_pts_of_contours.len() as i16).write_into(writer);
        self.bbox.write_into(writer);
        self.end_pts_of_contours.write_into(writer);
        (self.instructions.len() as u16).write_into(writer);
        writer.write_slice(&self.instructions);
        writer.write_slice(&self.points);
        writer.write_slice(&self.padding);
    }
}
