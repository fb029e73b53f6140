//! Remove TrueType instruction sets (hints) from a font file

use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser;
use dehint::{default_output_path, dehint_file, Error, Options, Report};

/// A tool for the removal of TrueType instruction sets (hints) in fonts
#[derive(clap::Parser, Debug)]
#[command(version)]
struct Args {
    /// Out file path (dehinted font)
    #[arg(short, long)]
    out: Option<PathBuf>,
    /// Keep the cvar table (variable fonts)
    #[arg(long)]
    keep_cvar: bool,
    /// Keep the cvt table
    #[arg(long)]
    keep_cvt: bool,
    /// Keep the fpgm table
    #[arg(long)]
    keep_fpgm: bool,
    /// Keep the hdmx table
    #[arg(long)]
    keep_hdmx: bool,
    /// Keep the LTSH table
    #[arg(long)]
    keep_ltsh: bool,
    /// Keep the prep table
    #[arg(long)]
    keep_prep: bool,
    /// Keep the TTFA table
    #[arg(long)]
    keep_ttfa: bool,
    /// Keep the VDMX table
    #[arg(long)]
    keep_vdmx: bool,
    /// Keep the glyph instructions
    #[arg(long)]
    keep_glyf: bool,
    /// Do not modify the gasp table
    #[arg(long)]
    keep_gasp: bool,
    /// Do not modify the maxp table
    #[arg(long)]
    keep_maxp: bool,
    /// Do not modify the head table
    #[arg(long)]
    keep_head: bool,
    /// Do not print the list of changes
    #[arg(short, long)]
    quiet: bool,
    /// In file path (hinted font)
    #[arg(value_name = "INFILE")]
    input: PathBuf,
}

impl Args {
    fn options(&self) -> Options {
        Options {
            keep_cvar: self.keep_cvar,
            keep_cvt: self.keep_cvt,
            keep_fpgm: self.keep_fpgm,
            keep_hdmx: self.keep_hdmx,
            keep_ltsh: self.keep_ltsh,
            keep_prep: self.keep_prep,
            keep_ttfa: self.keep_ttfa,
            keep_vdmx: self.keep_vdmx,
            keep_glyf: self.keep_glyf,
            keep_gasp: self.keep_gasp,
            keep_maxp: self.keep_maxp,
            keep_head: self.keep_head,
        }
    }

    fn output(&self) -> PathBuf {
        self.out
            .clone()
            .unwrap_or_else(|| default_output_path(&self.input))
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[!] Error: {e}");
            eprintln!("[!] Request canceled.");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Error> {
    let output = args.output();
    let report = dehint_file(&args.input, &output, &args.options())?;
    if args.quiet {
        return Ok(());
    }
    for line in report_lines(&report) {
        println!("{line}");
    }
    println!("[+] Saved dehinted font as '{}'", output.display());
    if let (Some(before), Some(after)) = (file_size(&args.input), file_size(&output)) {
        println!("[*] Original font file size: {}", format_size(before));
        println!("[*] Dehinted font file size: {}", format_size(after));
    }
    Ok(())
}

/// Describe the changes made to the font, one line per entry.
fn report_lines(report: &Report) -> Vec<String> {
    let mut lines = Vec::new();
    for tag in report.removed_tables() {
        lines.push(format!("[-] Removed {} table", tag.to_string().trim_end()));
    }
    if report.glyf.is_changed() {
        lines.push(format!(
            "[-] Removed glyf table instruction bytecode from {} glyphs",
            report.glyphs_modified
        ));
    }
    if let (true, Some(gasp)) = (report.gasp.is_changed(), &report.gasp_table) {
        lines.push("[Δ] New gasp table values:".into());
        lines.push(format!("    version: {}", gasp.version));
        for range in &gasp.gasp_ranges {
            lines.push(format!(
                "    ppem {}: 0x{:04X}",
                range.range_max_ppem, range.range_gasp_behavior
            ));
        }
    }
    if let (true, Some(limits)) = (report.maxp.is_changed(), &report.maxp_limits) {
        lines.push("[Δ] New maxp table values:".into());
        for (name, value) in [
            ("maxZones", limits.max_zones),
            ("maxTwilightPoints", limits.max_twilight_points),
            ("maxStorage", limits.max_storage),
            ("maxFunctionDefs", limits.max_function_defs),
            ("maxStackElements", limits.max_stack_elements),
            ("maxSizeOfInstructions", limits.max_size_of_instructions),
        ] {
            lines.push(format!("    {name}: {value}"));
        }
    }
    if report.head.is_changed() {
        lines.push("[Δ] Cleared head table flags bit 4".into());
        if let Some(flags) = report.head_flags {
            lines.push(format!("    flags: 0b{flags:016b}"));
        }
    }
    lines
}

fn file_size(path: &Path) -> Option<u64> {
    match std::fs::metadata(path) {
        Ok(meta) => Some(meta.len()),
        Err(e) => {
            log::warn!("could not read size of '{}': {e}", path.display());
            None
        }
    }
}

/// Format a file size in bytes, kilobytes or megabytes (1 KB = 1024 B).
fn format_size(size: u64) -> String {
    const KB: u64 = 1 << 10;
    const MB: u64 = 1 << 20;
    match size {
        0..KB => format!("{:.2} B", size as f64),
        KB..MB => format!("{:.2} KB", size as f64 / KB as f64),
        _ => format!("{:.2} MB", size as f64 / MB as f64),
    }
}
