//! The SFNT container: a font as a map of tags to tables

use std::collections::BTreeMap;

use font_types::Tag;
use read_fonts::{FontData, FontRef};

use crate::{
    error::{Error, MalformedFont},
    font_builder::FontBuilder,
    tables::{
        gasp::Gasp,
        glyf::Glyf,
        head::Head,
        loca::{Loca, LocaFormat},
        maxp::Maxp,
        Table, TopLevelTable, FVAR,
    },
    write::dump_table,
};

/// The sfnt version of fonts with TrueType outlines
pub const TT_SFNT_VERSION: u32 = 0x00010000;
/// The `true` sfnt version used by some older Apple fonts
pub const TRUE_SFNT_VERSION: u32 = 0x74727565;

/// Returns `true` if the data begins with a TrueType sfnt version.
///
/// Only the first four bytes are inspected.
pub fn is_truetype(data: &[u8]) -> bool {
    matches!(
        FontData::new(data).read_at::<u32>(0),
        Ok(TT_SFNT_VERSION | TRUE_SFNT_VERSION)
    )
}

/// An owned, editable TrueType font.
///
/// Tables are keyed by tag; the tables edited while dehinting are decoded,
/// and all others are kept as raw bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Font {
    sfnt_version: u32,
    tables: BTreeMap<Tag, Table>,
}

impl Default for Font {
    fn default() -> Self {
        Font {
            sfnt_version: TT_SFNT_VERSION,
            tables: BTreeMap::new(),
        }
    }
}

macro_rules! typed_accessors {
    ($name:ident, $name_mut:ident, $variant:ident, $ty:ty) => {
        #[doc = concat!("The `", stringify!($name), "` table, if present.")]
        pub fn $name(&self) -> Option<&$ty> {
            match self.tables.get(&<$ty>::TAG) {
                Some(Table::$variant(table)) => Some(table),
                _ => None,
            }
        }

        #[doc = concat!("The `", stringify!($name), "` table, if present, for editing.")]
        pub fn $name_mut(&mut self) -> Option<&mut $ty> {
            match self.tables.get_mut(&<$ty>::TAG) {
                Some(Table::$variant(table)) => Some(table),
                _ => None,
            }
        }
    };
}

impl Font {
    /// Decode a font from the bytes of a TrueType font file.
    pub fn new(data: &[u8]) -> Result<Self, Error> {
        let (sfnt_version, raw) = read_table_directory(data)?;
        log::debug!("read {} table records", raw.len());
        Ok(Font {
            sfnt_version,
            tables: decode_tables(raw)?,
        })
    }

    /// The sfnt version of the font, one of [`TT_SFNT_VERSION`] or
    /// [`TRUE_SFNT_VERSION`].
    pub fn sfnt_version(&self) -> u32 {
        self.sfnt_version
    }

    /// Returns `true` if the font contains a table with this tag.
    pub fn contains(&self, tag: Tag) -> bool {
        self.tables.contains_key(&tag)
    }

    pub fn get(&self, tag: Tag) -> Result<&Table, Error> {
        self.tables.get(&tag).ok_or(Error::TableNotFound(tag))
    }

    pub fn get_mut(&mut self, tag: Tag) -> Result<&mut Table, Error> {
        self.tables.get_mut(&tag).ok_or(Error::TableNotFound(tag))
    }

    /// Add a table, returning the table previously stored with this tag.
    pub fn insert(&mut self, tag: Tag, table: impl Into<Table>) -> Option<Table> {
        self.tables.insert(tag, table.into())
    }

    /// Remove a table, returning it if it was present.
    pub fn remove(&mut self, tag: Tag) -> Option<Table> {
        self.tables.remove(&tag)
    }

    /// The tags of all tables in the font, in ascending order.
    pub fn tags(&self) -> impl Iterator<Item = Tag> + '_ {
        self.tables.keys().copied()
    }

    /// Returns `true` if this is a variable font.
    pub fn is_variable(&self) -> bool {
        self.contains(FVAR)
    }

    typed_accessors!(head, head_mut, Head, Head);
    typed_accessors!(maxp, maxp_mut, Maxp, Maxp);
    typed_accessors!(gasp, gasp_mut, Gasp, Gasp);
    typed_accessors!(glyf, glyf_mut, Glyf, Glyf);

    /// Encode the font as a font file.
    ///
    /// If the font has a `glyf` table, `loca` is regenerated from it. The
    /// `loca` format declared in `head` is kept unless the glyph data no
    /// longer fits in short offsets, in which case the long format is used
    /// and the emitted `head` updated to match.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut builder = FontBuilder::new(self.sfnt_version);
        let mut loca_format = None;
        for (tag, table) in &self.tables {
            match table {
                // written last, once the loca format is known
                Table::Head(_) => continue,
                Table::Glyf(glyf) => {
                    let preferred = self
                        .head()
                        .map(Head::loca_format)
                        .unwrap_or(LocaFormat::Short);
                    let (glyf_data, loca) = glyf.build(preferred)?;
                    if loca.format() != preferred {
                        log::debug!("glyph offsets need {:?} loca format", loca.format());
                    }
                    loca_format = Some(loca.format());
                    builder
                        .add_raw(*tag, glyf_data)
                        .add_raw(Loca::TAG, dump_table(&loca));
                }
                // regenerated along with the glyph data
                _ if *tag == Loca::TAG && self.glyf().is_some() => continue,
                Table::Loca(loca) => {
                    builder.add_raw(*tag, dump_table(loca));
                }
                Table::Maxp(maxp) => {
                    builder.add_raw(*tag, dump_table(maxp));
                }
                Table::Gasp(gasp) => {
                    gasp.check_len()?;
                    builder.add_raw(*tag, dump_table(gasp));
                }
                Table::Raw(data) => {
                    builder.add_raw(*tag, data.as_slice());
                }
            }
        }

        if let Some(head) = self.head() {
            let mut head = head.clone();
            head.checksum_adjustment = 0;
            if let Some(format) = loca_format {
                head.index_to_loc_format = format.index_to_loc_format();
            }
            builder.add_raw(Head::TAG, dump_table(&head));
        }
        builder.build()
    }
}

/// Read the table directory, returning the sfnt version and the data of
/// each table.
fn read_table_directory(data: &[u8]) -> Result<(u32, BTreeMap<Tag, &[u8]>), MalformedFont> {
    let font = FontRef::new(data).map_err(|e| MalformedFont::read("bad table directory", e))?;
    let sfnt_version = font.table_directory.sfnt_version();
    if !matches!(sfnt_version, TT_SFNT_VERSION | TRUE_SFNT_VERSION) {
        return Err(MalformedFont::new(format!(
            "unsupported sfnt version 0x{sfnt_version:08X}"
        )));
    }

    let mut tables = BTreeMap::new();
    for record in font.table_directory.table_records() {
        let tag = record.tag();
        let start = record.offset() as usize;
        let range = start..start + record.length() as usize;
        let table_data = data.get(range.clone()).ok_or_else(|| {
            MalformedFont::new(format!(
                "table data at {range:?} is outside of {} bytes",
                data.len()
            ))
            .in_table(tag)
        })?;
        if tables.insert(tag, table_data).is_some() {
            return Err(MalformedFont::new("duplicate table record").in_table(tag));
        }
    }
    Ok((sfnt_version, tables))
}

/// Decode the tables we edit, keeping everything else as raw bytes.
fn decode_tables(raw: BTreeMap<Tag, &[u8]>) -> Result<BTreeMap<Tag, Table>, MalformedFont> {
    let mut head = raw.get(&Head::TAG).map(|data| Head::read(data)).transpose()?;
    let mut maxp = raw.get(&Maxp::TAG).map(|data| Maxp::read(data)).transpose()?;
    let (mut glyf, mut loca) = match (raw.get(&Glyf::TAG), raw.get(&Loca::TAG)) {
        (Some(glyf_data), Some(loca_data)) => {
            let loca_format = head
                .as_ref()
                .map(Head::loca_format)
                .ok_or_else(|| MalformedFont::new("missing head table").in_table(Glyf::TAG))?;
            let num_glyphs = maxp
                .as_ref()
                .map(|maxp| maxp.num_glyphs)
                .ok_or_else(|| MalformedFont::new("missing maxp table").in_table(Glyf::TAG))?;
            let loca = Loca::read(loca_data, loca_format, num_glyphs)?;
            let glyf = Glyf::read(glyf_data, &loca)?;
            log::debug!(
                "decoded {} glyphs, {}-byte aligned",
                glyf.glyphs.len(),
                glyf.alignment()
            );
            (Some(glyf), Some(loca))
        }
        (Some(_), None) => {
            return Err(MalformedFont::new("missing loca table").in_table(Glyf::TAG));
        }
        // a loca without glyf is kept as is
        (None, _) => (None, None),
    };

    let mut tables = BTreeMap::new();
    for (tag, data) in raw {
        let table = match tag {
            Head::TAG => head.take().map(Table::Head),
            Maxp::TAG => maxp.take().map(Table::Maxp),
            Gasp::TAG => Some(Table::Gasp(Gasp::read(data)?)),
            Glyf::TAG => glyf.take().map(Table::Glyf),
            Loca::TAG => loca.take().map(Table::Loca),
            _ => None,
        };
        tables.insert(tag, table.unwrap_or_else(|| Table::Raw(data.to_vec())));
    }
    Ok(tables)
}
