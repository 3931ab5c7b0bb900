//! Result export: text (CSV-ish report lines) or JSON, written through a
//! temp file that is promoted only after a complete, flushed write.

use crate::aggregate::RankedEntry;
use crate::filters::{FilterOutcome, FilterShape, FilterSpec};
use crate::route::{Route, RouteField};
use crate::util::{create_with_backoff, remove_with_backoff, replace_file_atomic_backoff, tmp_path_for};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const RESULT_HEADER: &str = "subject,statistic";
pub const NO_RESULTS: &str = "NO RESULTS FOUND.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Text,
    Json,
}

impl FromStr for ExportFormat {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "csv" | "txt" => Ok(ExportFormat::Text),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("expected text or json, got {:?}", other)),
        }
    }
}

/// How a ranked entry becomes a text line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RecordLayout {
    /// `<label><statistic>`, the format existing consumers read.
    #[default]
    Concatenated,
    /// `<label>,<statistic>`
    Delimited,
}

impl FromStr for RecordLayout {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "concat" | "concatenated" => Ok(RecordLayout::Concatenated),
            "delimited" | "comma" => Ok(RecordLayout::Delimited),
            other => Err(format!("expected concat or delimited, got {:?}", other)),
        }
    }
}

// ----------------------------- Line rendering ------------------------------------

pub fn ranked_line(e: &RankedEntry, layout: RecordLayout) -> String {
    match layout {
        RecordLayout::Concatenated => format!("{}{}", e.label, e.statistic),
        RecordLayout::Delimited => format!("{},{}", e.label, e.statistic),
    }
}

/// Context header printed once above the matching routes.
pub fn filter_header(spec: &FilterSpec, first: &Route) -> String {
    let v = |f: RouteField| spec.value_of(f).unwrap_or_default();
    match spec.shape() {
        FilterShape::AirlineToCountry => format!(
            "FLIGHTS TO {} BY {} ({}):",
            v(RouteField::ToCountry),
            first.airline_name(),
            v(RouteField::AirlineCode)
        ),
        FilterShape::CountryToCity => format!(
            "FLIGHTS FROM {} TO {}, {}:",
            v(RouteField::FromCountry),
            v(RouteField::ToCity),
            v(RouteField::ToCountry)
        ),
        FilterShape::CityToCity => format!(
            "FLIGHTS FROM {}, {} TO {}, {}:",
            v(RouteField::FromCity),
            v(RouteField::FromCountry),
            v(RouteField::ToCity),
            v(RouteField::ToCountry)
        ),
    }
}

pub fn filter_line(shape: FilterShape, r: &Route) -> String {
    match shape {
        FilterShape::AirlineToCountry => format!(
            "FROM: {}, {}, {} TO: {} ({}), {}",
            r.from_airport_code(),
            r.from_city(),
            r.from_country(),
            r.to_airport_name(),
            r.to_airport_code(),
            r.to_city()
        ),
        FilterShape::CountryToCity => format!(
            "AIRLINE: {} ({}) ORIGIN: {} ({}), {}",
            r.airline_name(),
            r.airline_code(),
            r.from_airport_name(),
            r.from_airport_code(),
            r.from_city()
        ),
        FilterShape::CityToCity => format!(
            "AIRLINE: {} ({}) ROUTE: {}-{}",
            r.airline_name(),
            r.airline_code(),
            r.from_airport_code(),
            r.to_airport_code()
        ),
    }
}

// ----------------------------- Writers ------------------------------------

pub fn write_ranked<W: Write>(w: &mut W, entries: &[RankedEntry], format: ExportFormat, layout: RecordLayout) -> Result<()> {
    match format {
        ExportFormat::Text => {
            writeln!(w, "{}", RESULT_HEADER)?;
            for e in entries {
                writeln!(w, "{}", ranked_line(e, layout))?;
            }
        }
        ExportFormat::Json => {
            serde_json::to_writer_pretty(&mut *w, entries)?;
            writeln!(w)?;
        }
    }
    Ok(())
}

pub fn write_filtered<W: Write>(w: &mut W, outcome: &FilterOutcome<'_>, spec: &FilterSpec, format: ExportFormat) -> Result<()> {
    let routes = outcome.routes();
    match (format, routes.first()) {
        (ExportFormat::Text, None) => writeln!(w, "{}", NO_RESULTS)?,
        (ExportFormat::Text, Some(first)) => {
            writeln!(w, "{}", filter_header(spec, first))?;
            for r in routes {
                writeln!(w, "{}", filter_line(spec.shape(), r))?;
            }
        }
        (ExportFormat::Json, None) => {
            serde_json::to_writer_pretty(&mut *w, &serde_json::json!({ "message": NO_RESULTS }))?;
            writeln!(w)?;
        }
        (ExportFormat::Json, Some(_)) => {
            serde_json::to_writer_pretty(&mut *w, routes)?;
            writeln!(w)?;
        }
    }
    Ok(())
}

/// Buffered writer over a temp sibling of the destination. `finish` flushes
/// and promotes the temp file; dropping an unfinished writer removes it, so
/// the destination is either fully replaced or left untouched.
pub struct ResultWriter {
    tmp: PathBuf,
    dest: PathBuf,
    w: Option<BufWriter<File>>,
}

impl ResultWriter {
    pub fn create(dest: &Path, buf_bytes: usize) -> io::Result<Self> {
        let tmp = tmp_path_for(dest);
        let f = create_with_backoff(&tmp, 16, 50)?;
        Ok(Self {
            tmp,
            dest: dest.to_path_buf(),
            w: Some(BufWriter::with_capacity(buf_bytes.max(8 * 1024), f)),
        })
    }

    pub fn finish(mut self) -> Result<()> {
        let res = self.promote();
        if res.is_err() {
            let _ = remove_with_backoff(&self.tmp, 4, 25);
        }
        res
    }

    fn promote(&mut self) -> Result<()> {
        if let Some(mut w) = self.w.take() {
            w.flush().with_context(|| format!("flush {}", self.tmp.display()))?;
        }
        replace_file_atomic_backoff(&self.tmp, &self.dest)
            .with_context(|| format!("promote {} -> {}", self.tmp.display(), self.dest.display()))
    }
}

impl Write for ResultWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.w {
            Some(w) => w.write(buf),
            None => Err(io::Error::new(io::ErrorKind::Other, "writer already finished")),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.w {
            Some(w) => w.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for ResultWriter {
    fn drop(&mut self) {
        if self.w.take().is_some() {
            let _ = remove_with_backoff(&self.tmp, 4, 25);
        }
    }
}

pub fn export_ranked(dest: &Path, entries: &[RankedEntry], format: ExportFormat, layout: RecordLayout, buf_bytes: usize) -> Result<()> {
    let mut w = ResultWriter::create(dest, buf_bytes).with_context(|| format!("create {}", dest.display()))?;
    write_ranked(&mut w, entries, format, layout)?;
    w.finish()
}

pub fn export_filtered(dest: &Path, outcome: &FilterOutcome<'_>, spec: &FilterSpec, format: ExportFormat, buf_bytes: usize) -> Result<()> {
    let mut w = ResultWriter::create(dest, buf_bytes).with_context(|| format!("create {}", dest.display()))?;
    write_filtered(&mut w, outcome, spec, format)?;
    w.finish()
}
