//! Removing hints from a font
//!
//! Each edit is available as a function that works on a [`Font`] and
//! reports whether it changed anything. [`dehint`] runs all of them in a
//! fixed order.

use font_types::Tag;
use indexmap::IndexMap;

use crate::{
    error::Error,
    font::{is_truetype, Font},
    tables::{
        gasp::Gasp,
        glyf::Glyf,
        head::Head,
        maxp::{Maxp, TrueTypeLimits},
        TopLevelTable, CVAR, CVT, FPGM, HDMX, HINTING_TABLES, LTSH, PREP, TTFA, VDMX,
    },
};

/// Which edits to skip.
///
/// Every field defaults to `false`, so the default options remove all
/// hinting.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Options {
    pub keep_cvar: bool,
    pub keep_cvt: bool,
    pub keep_fpgm: bool,
    pub keep_hdmx: bool,
    pub keep_ltsh: bool,
    pub keep_prep: bool,
    pub keep_ttfa: bool,
    pub keep_vdmx: bool,
    pub keep_glyf: bool,
    pub keep_gasp: bool,
    pub keep_maxp: bool,
    pub keep_head: bool,
}

impl Options {
    /// Returns `true` if the table with this tag should be left untouched.
    pub fn keeps(&self, tag: Tag) -> bool {
        match tag {
            CVAR => self.keep_cvar,
            CVT => self.keep_cvt,
            FPGM => self.keep_fpgm,
            HDMX => self.keep_hdmx,
            LTSH => self.keep_ltsh,
            PREP => self.keep_prep,
            TTFA => self.keep_ttfa,
            VDMX => self.keep_vdmx,
            Glyf::TAG => self.keep_glyf,
            Gasp::TAG => self.keep_gasp,
            Maxp::TAG => self.keep_maxp,
            Head::TAG => self.keep_head,
            _ => false,
        }
    }
}

/// The result of a single edit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Outcome {
    /// The edit was not attempted, because it was disabled or the table
    /// it needs is missing.
    #[default]
    Skipped,
    /// The font was already in the desired state.
    Unchanged,
    Changed,
}

impl Outcome {
    fn from_changed(changed: bool) -> Self {
        if changed {
            Outcome::Changed
        } else {
            Outcome::Unchanged
        }
    }

    pub fn is_changed(self) -> bool {
        self == Outcome::Changed
    }
}

/// A summary of the edits made by [`dehint`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Report {
    /// The outcome of removing each table, in the order they were removed.
    ///
    /// `cvar` is only included for variable fonts.
    pub removed: IndexMap<Tag, Outcome>,
    pub glyf: Outcome,
    /// The number of glyphs that had their instructions removed.
    pub glyphs_modified: usize,
    pub gasp: Outcome,
    /// The final `gasp` table.
    pub gasp_table: Option<Gasp>,
    pub maxp: Outcome,
    /// The final TrueType limits of the `maxp` table.
    pub maxp_limits: Option<TrueTypeLimits>,
    pub head: Outcome,
    /// The final `head` flags.
    pub head_flags: Option<u16>,
}

impl Report {
    /// The tags of the tables that were removed.
    pub fn removed_tables(&self) -> impl Iterator<Item = Tag> + '_ {
        self.removed
            .iter()
            .filter(|(_, outcome)| outcome.is_changed())
            .map(|(tag, _)| *tag)
    }

    /// Returns `true` if any edit changed the font.
    pub fn is_changed(&self) -> bool {
        self.removed_tables().next().is_some()
            || [self.glyf, self.gasp, self.maxp, self.head]
                .iter()
                .any(|outcome| outcome.is_changed())
    }
}

/// Remove a table, returning `true` if it was present.
pub fn remove_table(font: &mut Font, tag: Tag) -> Result<bool, Error> {
    let removed = font.remove(tag).is_some();
    if font.contains(tag) {
        return Err(Error::TableRemoval(tag));
    }
    Ok(removed)
}

/// Remove the instructions from every glyph in the `glyf` table.
///
/// Returns the number of glyphs that had instructions.
pub fn strip_glyf_instructions(font: &mut Font) -> Result<usize, Error> {
    font.glyf_mut()
        .map(Glyf::strip_instructions)
        .ok_or(Error::TableNotFound(Glyf::TAG))
}

/// Replace the `gasp` table with one that requests unhinted rendering at
/// all sizes, adding the table if it is missing.
///
/// Returns `true` if the font changed.
pub fn update_gasp(font: &mut Font) -> bool {
    match font.gasp_mut() {
        Some(gasp) if gasp.is_unhinted() => false,
        Some(gasp) => {
            *gasp = Gasp::unhinted();
            true
        }
        None => {
            font.insert(Gasp::TAG, Gasp::unhinted());
            true
        }
    }
}

/// Zero the interpreter resource limits of the `maxp` table.
///
/// Returns `true` if any limit was nonzero.
pub fn update_maxp(font: &mut Font) -> Result<bool, Error> {
    let maxp = font.maxp_mut().ok_or(Error::TableNotFound(Maxp::TAG))?;
    Ok(maxp
        .limits
        .as_mut()
        .map(TrueTypeLimits::zero_interpreter_limits)
        .unwrap_or(false))
}

/// Clear bit 4 of the `head` flags, unless the font still has an `hdmx` or
/// `LTSH` table.
///
/// Returns `true` if the bit was cleared.
pub fn update_head_flags(font: &mut Font) -> Result<bool, Error> {
    let has_device_metrics = font.contains(HDMX) || font.contains(LTSH);
    let head = font.head_mut().ok_or(Error::TableNotFound(Head::TAG))?;
    if has_device_metrics {
        log::debug!("keeping head flags bit 4, font has hdmx or LTSH");
        return Ok(false);
    }
    Ok(head.clear_instructions_alter_advance())
}

/// Remove all hinting from a font.
///
/// The edits are applied in this order, each unless disabled in `options`:
///
/// 1. for variable fonts, remove the `cvar` table
/// 2. remove the `cvt `, `fpgm`, `hdmx`, `LTSH`, `prep`, `TTFA` and `VDMX`
///    tables
/// 3. remove the instructions of every glyph
/// 4. replace the `gasp` table ([`update_gasp`])
/// 5. zero the interpreter limits in `maxp` ([`update_maxp`])
/// 6. clear bit 4 of the `head` flags ([`update_head_flags`])
///
/// Edits that need a missing table are skipped.
pub fn dehint(font: &mut Font, options: &Options) -> Result<Report, Error> {
    let mut report = Report::default();

    let variable = font.is_variable().then_some(CVAR);
    for tag in variable.into_iter().chain(HINTING_TABLES) {
        let outcome = if options.keeps(tag) {
            Outcome::Skipped
        } else {
            Outcome::from_changed(remove_table(font, tag)?)
        };
        log::debug!("remove '{tag}': {outcome:?}");
        report.removed.insert(tag, outcome);
    }

    if options.keep_glyf {
        log::debug!("keeping glyph instructions");
    } else if font.glyf().is_none() {
        log::info!("no glyf table, skipping glyph instructions");
    } else {
        report.glyphs_modified = strip_glyf_instructions(font)?;
        report.glyf = Outcome::from_changed(report.glyphs_modified > 0);
        log::debug!("stripped {} glyph programs", report.glyphs_modified);
    }

    if !options.keep_gasp {
        report.gasp = Outcome::from_changed(update_gasp(font));
    }
    report.gasp_table = font.gasp().cloned();

    if options.keep_maxp {
        log::debug!("keeping maxp");
    } else if font.maxp().is_none() {
        log::info!("no maxp table, skipping interpreter limits");
    } else {
        report.maxp = Outcome::from_changed(update_maxp(font)?);
    }
    report.maxp_limits = font.maxp().and_then(|maxp| maxp.limits);

    if options.keep_head {
        log::debug!("keeping head flags");
    } else if font.head().is_none() {
        log::warn!("no head table, skipping flags");
    } else {
        report.head = Outcome::from_changed(update_head_flags(font)?);
    }
    report.head_flags = font.head().map(|head| head.flags);

    Ok(report)
}

/// Remove all hinting from the bytes of a font file.
///
/// Returns the new font file and a summary of the changes.
pub fn dehint_bytes(data: &[u8], options: &Options) -> Result<(Vec<u8>, Report), Error> {
    if !is_truetype(data) {
        return Err(Error::NotATrueTypeFont);
    }
    let mut font = Font::new(data)?;
    let report = dehint(&mut font, options)?;
    Ok((font.to_bytes()?, report))
}
