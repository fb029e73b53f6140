//! Composite glyphs (containing other glyphs as components)

use font_types::GlyphId16;
use read_fonts::{tables::glyf::CompositeGlyphFlags, FontData, ReadError};

use super::Bbox;
use crate::write::{FontWrite, TableWriter};

/// A glyph consisting of multiple component sub-glyphs
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompositeGlyph {
    pub bbox: Bbox,
    components: Vec<Component>,
    /// The glyph program, if the glyph has one.
    ///
    /// Its presence is signaled by the `WE_HAVE_INSTRUCTIONS` flag of the
    /// last component, which is derived from this field when writing.
    pub instructions: Option<Vec<u8>>,
    pub(crate) padding: Vec<u8>,
}

/// A single component glyph (part of a [`CompositeGlyph`]).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Component {
    /// The raw component flags.
    ///
    /// `MORE_COMPONENTS` and `WE_HAVE_INSTRUCTIONS` are recomputed when the
    /// glyph is written.
    pub flags: u16,
    pub glyph: GlyphId16,
    /// The encoded arguments and transform
    data: Vec<u8>,
}

impl CompositeGlyph {
    pub(crate) fn from_table(
        glyph: &read_fonts::tables::glyf::CompositeGlyph,
        bbox: Bbox,
    ) -> Result<Self, ReadError> {
        let data = glyph.component_data();
        let mut pos = 0;
        let mut components = Vec::new();
        let mut have_instructions = false;
        loop {
            let component = Component::read(data, &mut pos)?;
            let flags = CompositeGlyphFlags::from_bits_truncate(component.flags);
            have_instructions |= flags.contains(CompositeGlyphFlags::WE_HAVE_INSTRUCTIONS);
            components.push(component);
            if !flags.contains(CompositeGlyphFlags::MORE_COMPONENTS) {
                break;
            }
        }
        let instructions = if have_instructions {
            let len = FontData::new(data).read_at::<u16>(pos)? as usize;
            pos += 2;
            let instructions = data.get(pos..pos + len).ok_or(ReadError::OutOfBounds)?;
            pos += len;
            Some(instructions.to_vec())
        } else {
            None
        };
        Ok(CompositeGlyph {
            bbox,
            components,
            instructions,
            padding: data.get(pos..).unwrap_or_default().to_vec(),
        })
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Detach the glyph program, returning `true` if there was one.
    pub fn strip_instructions(&mut self) -> bool {
        if self.instructions.take().is_none() {
            return false;
        }
        self.padding.clear();
        true
    }

    pub(crate) fn instruction_len(&self) -> usize {
        self.instructions.as_ref().map(Vec::len).unwrap_or_default()
    }
}

impl Component {
    /// Read the component starting at `pos`, advancing past it.
    fn read(data: &[u8], pos: &mut usize) -> Result<Self, ReadError> {
        let font_data = FontData::new(data);
        let flags = font_data.read_at::<u16>(*pos)?;
        let glyph = font_data.read_at::<GlyphId16>(*pos + 2)?;
        *pos += 4;

        let parsed = CompositeGlyphFlags::from_bits_truncate(flags);
        let args_len = if parsed.contains(CompositeGlyphFlags::ARG_1_AND_2_ARE_WORDS) {
            4
        } else {
            2
        };
        let transform_len = if parsed.contains(CompositeGlyphFlags::WE_HAVE_A_SCALE) {
            2
        } else if parsed.contains(CompositeGlyphFlags::WE_HAVE_AN_X_AND_Y_SCALE) {
            4
        } else if parsed.contains(CompositeGlyphFlags::WE_HAVE_A_TWO_BY_TWO) {
            8
        } else {
            0
        };
        let len = args_len + transform_len;
        let args = data.get(*pos..*pos + len).ok_or(ReadError::OutOfBounds)?;
        *pos += len;
        Ok(Component {
            flags,
            glyph,
            data: args.to_vec(),
        })
    }

    /// like `FontWrite` but lets us pass in the flags that must be determined
    /// externally (WE_HAVE_INSTRUCTIONS and MORE_COMPONENTS)
    fn write_into(&self, writer: &mut TableWriter, extra_flags: CompositeGlyphFlags) {
        let computed =
            (CompositeGlyphFlags::MORE_COMPONENTS | CompositeGlyphFlags::WE_HAVE_INSTRUCTIONS).bits();
        let flags = (self.flags & !computed) | extra_flags.bits();
        flags.write_into(writer);
        self.glyph.write_into(writer);
        writer.write_slice(&self.data);
    }
}

impl FontWrite for CompositeGlyph {
    fn write_into(&self, writer: &mut TableWriter) {
        const N_CONTOURS: i16 = -1;
        N_CONTOURS.write_into(writer);
        self.bbox.write_into(writer);
        let last = self.components.len().saturating_sub(1);
        for (i, comp) in self.components.iter().enumerate() {
            let extra_flags = match (i == last, self.instructions.is_some()) {
                (false, _) => CompositeGlyphFlags::MORE_COMPONENTS,
                (true, true) => CompositeGlyphFlags::WE_HAVE_INSTRUCTIONS,
                (true, false) => CompositeGlyphFlags::empty(),
            };
            comp.write_into(writer, extra_flags);
        }

        if let Some(instructions) = &self.instructions {
            (instructions.len() as u16).write_into(writer);
            writer.write_slice(instructions);
        }
        writer.write_slice(&self.padding);
    }
}
