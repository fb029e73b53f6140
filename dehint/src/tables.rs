//! A directory of the font tables this crate knows about.
//!
//! The tables that are edited while dehinting have an owned, fully decoded
//! representation in a submodule; every other table is carried through as
//! raw bytes in [`Table::Raw`].

pub mod gasp;
pub mod glyf;
pub mod head;
pub mod loca;
pub mod maxp;

use font_types::Tag;

use self::{gasp::Gasp, glyf::Glyf, head::Head, loca::Loca, maxp::Maxp};

/// A table that has an associated tag.
pub trait TopLevelTable {
    /// The table's tag.
    const TAG: Tag;
}

/// The [cvt (Control Value Table)](https://learn.microsoft.com/en-us/typography/opentype/spec/cvt) tag
pub const CVT: Tag = Tag::new(b"cvt ");
/// The [fpgm (Font Program)](https://learn.microsoft.com/en-us/typography/opentype/spec/fpgm) tag
pub const FPGM: Tag = Tag::new(b"fpgm");
/// The [prep (Control Value Program)](https://learn.microsoft.com/en-us/typography/opentype/spec/prep) tag
pub const PREP: Tag = Tag::new(b"prep");
/// The [hdmx (Horizontal Device Metrics)](https://learn.microsoft.com/en-us/typography/opentype/spec/hdmx) tag
pub const HDMX: Tag = Tag::new(b"hdmx");
/// The [LTSH (Linear Threshold)](https://learn.microsoft.com/en-us/typography/opentype/spec/ltsh) tag
pub const LTSH: Tag = Tag::new(b"LTSH");
/// The [VDMX (Vertical Device Metrics)](https://learn.microsoft.com/en-us/typography/opentype/spec/vdmx) tag
pub const VDMX: Tag = Tag::new(b"VDMX");
/// The [cvar (CVT Variations)](https://learn.microsoft.com/en-us/typography/opentype/spec/cvar) tag
pub const CVAR: Tag = Tag::new(b"cvar");
/// The [fvar (Font Variations)](https://learn.microsoft.com/en-us/typography/opentype/spec/fvar) tag
pub const FVAR: Tag = Tag::new(b"fvar");
/// The private table written by [ttfautohint](https://freetype.org/ttfautohint/)
/// to record its parameters.
pub const TTFA: Tag = Tag::new(b"TTFA");

/// Tables that only exist to support hinted rendering, in the order
/// they are removed.
pub const HINTING_TABLES: [Tag; 7] = [CVT, FPGM, HDMX, LTSH, PREP, TTFA, VDMX];

/// A single table in a [`Font`](crate::Font).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Table {
    Head(Head),
    Maxp(Maxp),
    Gasp(Gasp),
    Glyf(Glyf),
    Loca(Loca),
    /// A table that is not decoded
    Raw(Vec<u8>),
}

impl Table {
    /// The raw bytes of an undecoded table.
    pub fn as_raw(&self) -> Option<&[u8]> {
        match self {
            Table::Raw(data) => Some(data),
            _ => None,
        }
    }
}

impl From<Head> for Table {
    fn from(src: Head) -> Table {
        Table::Head(src)
    }
}

impl From<Maxp> for Table {
    fn from(src: Maxp) -> Table {
        Table::Maxp(src)
    }
}

impl From<Gasp> for Table {
    fn from(src: Gasp) -> Table {
        Table::Gasp(src)
    }
}

impl From<Glyf> for Table {
    fn from(src: Glyf) -> Table {
        Table::Glyf(src)
    }
}

impl From<Vec<u8>> for Table {
    fn from(src: Vec<u8>) -> Table {
        Table::Raw(src)
    }
}
