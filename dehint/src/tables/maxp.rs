//! The [maxp (Maximum Profile)](https://docs.microsoft.com/en-us/typography/opentype/spec/maxp) table

use font_types::{Tag, Version16Dot16};
use read_fonts::{FontData, FontRead};

use super::TopLevelTable;
use crate::{
    error::MalformedFont,
    write::{FontWrite, TableWriter},
};

/// The [maxp](https://docs.microsoft.com/en-us/typography/opentype/spec/maxp) table
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maxp {
    pub num_glyphs: u16,
    /// The TrueType limits; only present in version 1.0 tables.
    pub limits: Option<TrueTypeLimits>,
}

/// The fields of a version 1.0 `maxp` table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TrueTypeLimits {
    pub max_points: u16,
    pub max_contours: u16,
    pub max_composite_points: u16,
    pub max_composite_contours: u16,
    pub max_zones: u16,
    pub max_twilight_points: u16,
    pub max_storage: u16,
    pub max_function_defs: u16,
    pub max_instruction_defs: u16,
    pub max_stack_elements: u16,
    pub max_size_of_instructions: u16,
    pub max_component_elements: u16,
    pub max_component_depth: u16,
}

impl TopLevelTable for Maxp {
    const TAG: Tag = Tag::new(b"maxp");
}

impl Maxp {
    /// A version 1.0 table with all limits set to zero.
    pub fn new(num_glyphs: u16) -> Self {
        Maxp {
            num_glyphs,
            limits: Some(TrueTypeLimits::default()),
        }
    }

    /// Decode the table from its bytes.
    pub fn read(data: &[u8]) -> Result<Self, MalformedFont> {
        let maxp = read_fonts::tables::maxp::Maxp::read(FontData::new(data))
            .map_err(|e| MalformedFont::read("bad table", e).in_table(Self::TAG))?;
        let version = maxp.version();
        let limits = if version == Version16Dot16::VERSION_0_5 {
            None
        } else if version == Version16Dot16::VERSION_1_0 {
            Some(TrueTypeLimits::from_table(&maxp))
        } else {
            return Err(
                MalformedFont::new(format!("unknown version {version:?}")).in_table(Self::TAG)
            );
        };
        Ok(Maxp {
            num_glyphs: maxp.num_glyphs(),
            limits,
        })
    }

    pub fn version(&self) -> Version16Dot16 {
        if self.limits.is_some() {
            Version16Dot16::VERSION_1_0
        } else {
            Version16Dot16::VERSION_0_5
        }
    }
}

impl TrueTypeLimits {
    // fields that are absent in the source are left at zero
    fn from_table(maxp: &read_fonts::tables::maxp::Maxp) -> Self {
        TrueTypeLimits {
            max_points: maxp.max_points().unwrap_or_default(),
            max_contours: maxp.max_contours().unwrap_or_default(),
            max_composite_points: maxp.max_composite_points().unwrap_or_default(),
            max_composite_contours: maxp.max_composite_contours().unwrap_or_default(),
            max_zones: maxp.max_zones().unwrap_or_default(),
            max_twilight_points: maxp.max_twilight_points().unwrap_or_default(),
            max_storage: maxp.max_storage().unwrap_or_default(),
            max_function_defs: maxp.max_function_defs().unwrap_or_default(),
            max_instruction_defs: maxp.max_instruction_defs().unwrap_or_default(),
            max_stack_elements: maxp.max_stack_elements().unwrap_or_default(),
            max_size_of_instructions: maxp.max_size_of_instructions().unwrap_or_default(),
            max_component_elements: maxp.max_component_elements().unwrap_or_default(),
            max_component_depth: maxp.max_component_depth().unwrap_or_default(),
        }
    }

    /// The fields that size the resources of the TrueType interpreter.
    fn interpreter_fields_mut(&mut self) -> [&mut u16; 6] {
        [
            &mut self.max_zones,
            &mut self.max_twilight_points,
            &mut self.max_storage,
            &mut self.max_function_defs,
            &mut self.max_stack_elements,
            &mut self.max_size_of_instructions,
        ]
    }

    /// Set the interpreter resource limits to zero.
    ///
    /// These are `maxZones`, `maxTwilightPoints`, `maxStorage`,
    /// `maxFunctionDefs`, `maxStackElements` and `maxSizeOfInstructions`.
    ///
    /// Returns `true` if any of them was nonzero.
    pub fn zero_interpreter_limits(&mut self) -> bool {
        let mut changed = false;
        for field in self.interpreter_fields_mut() {
            if *field != 0 {
                *field = 0;
                changed = true;
            }
        }
        changed
    }
}

impl FontWrite for Maxp {
    fn write_into(&self, writer: &mut TableWriter) {
        self.version().write_into(writer);
        self.num_glyphs.write_into(writer);
        if let Some(limits) = &self.limits {
            limits.write_into(writer);
        }
    }
}

impl FontWrite for TrueTypeLimits {
    fn write_into(&self, writer: &mut TableWriter) {
        [
            self.max_points,
            self.max_contours,
            self.max_composite_points,
            self.max_composite_contours,
            self.max_zones,
            self.max_twilight_points,
            self.max_storage,
            self.max_function_defs,
            self.max_instruction_defs,
            self.max_stack_elements,
            self.max_size_of_instructions,
            self.max_component_elements,
            self.max_component_depth,
        ]
        .write_into(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{test_helpers::BeBuffer, write::dump_table};

    #[test]
    fn maxp_05() {
        let buf = BeBuffer::new().push(0x0000_5000u32).push(5u16);
        let maxp = Maxp::read(&buf).unwrap();
        assert_eq!(maxp.num_glyphs, 5);
        assert_eq!(maxp.limits, None);
        assert_eq!(maxp.version(), Version16Dot16::VERSION_0_5);
        assert_eq!(dump_table(&maxp), &*buf);
    }

    #[test]
    fn maxp_10() {
        let buf = BeBuffer::new()
            .push(0x0001_0000u32)
            .push(5u16)
            .extend(6u16..=18);
        let maxp = Maxp::read(&buf).unwrap();
        let limits = maxp.limits.unwrap();
        assert_eq!(limits.max_composite_contours, 9);
        assert_eq!(limits.max_zones, 10);
        assert_eq!(limits.max_component_depth, 18);
        assert_eq!(dump_table(&maxp), &*buf);
    }

    #[test]
    fn zero_limits() {
        let buf = BeBuffer::new()
            .push(0x0001_0000u32)
            .push(5u16)
            .extend(6u16..=18);
        let mut limits = Maxp::read(&buf).unwrap().limits.unwrap();
        assert!(limits.zero_interpreter_limits());
        assert_eq!(
            limits,
            TrueTypeLimits {
                max_points: 6,
                max_contours: 7,
                max_composite_points: 8,
                max_composite_contours: 9,
                max_instruction_defs: 14,
                max_component_elements: 17,
                max_component_depth: 18,
                ..Default::default()
            }
        );
        assert!(!limits.zero_interpreter_limits());
    }

    #[test]
    fn bad_version() {
        let buf = BeBuffer::new()
            .push(0x0002_0000u32)
            .push(5u16)
            .extend([0u16; 13]);
        assert!(Maxp::read(&buf).is_err());
    }

    #[test]
    fn truncated_limits() {
        let buf = BeBuffer::new().push(0x0001_0000u32).push(5u16).push(6u16);
        let err = Maxp::read(&buf).unwrap_err();
        assert_eq!(err.tag, Some(Maxp::TAG));
    }
}
