//! Record parsing: turns CSV records or indented `key: value` blocks into
//! `Route` values. Values are normalized here, once, so downstream filters
//! and key derivation can compare fields verbatim.

use crate::progress::ProgressScope;
use crate::route::{Route, RouteBuilder, RouteField};
use crate::util::open_with_backoff;
use anyhow::{Context, Result};
use regex::Regex;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::sync::OnceLock;

/// On-disk layout of a routes file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputLayout {
    /// 12 or 13 positional comma-separated fields per line.
    Csv,
    /// One route per `- key: value` block, continuation lines indented.
    Block,
}

impl InputLayout {
    /// Guess from the file extension, falling back to the first non-blank line.
    pub fn detect(path: &Path, first_line: Option<&str>) -> Self {
        match path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase()) {
            Some(ext) if ext == "csv" => return InputLayout::Csv,
            Some(ext) if ext == "yaml" || ext == "yml" => return InputLayout::Block,
            _ => {}
        }
        match first_line.map(str::trim_end) {
            Some(l) if l.starts_with('-') || l.ends_with(':') => InputLayout::Block,
            _ => InputLayout::Csv,
        }
    }
}

// ----------------------------- Normalization ------------------------------------

/// Strip one pair of enclosing quotes (and any whitespace before the closing
/// quote). Inside single quotes a doubled `''` is an escaped quote.
pub fn unquote(value: &str) -> String {
    for q in ['\'', '"'] {
        if value.len() >= 2 && value.starts_with(q) && value.ends_with(q) {
            let inner = value[1..value.len() - 1].trim_end();
            return if q == '\'' { inner.replace("''", "'") } else { inner.to_string() };
        }
    }
    value.to_string()
}

/// Block-layout value: drop exactly one leading indentation character and
/// the line terminator, then unquote.
pub fn normalize_block_value(raw: &str) -> String {
    let mut chars = raw.chars();
    let rest = match chars.next() {
        Some(c) if c.is_whitespace() => chars.as_str(),
        _ => raw,
    };
    unquote(rest.trim_end())
}

/// CSV value: trim surrounding whitespace, then unquote.
pub fn normalize_csv_value(raw: &str) -> String {
    unquote(raw.trim())
}

// ----------------------------- CSV ------------------------------------

fn csv_builder() -> csv::ReaderBuilder {
    let mut b = csv::ReaderBuilder::new();
    b.has_headers(false).flexible(true).trim(csv::Trim::All);
    b
}

/// Build a route from one CSV record. Returns `None` for blank records, the
/// header row and records with an unexpected field count.
fn route_from_record(record: &csv::StringRecord) -> Option<Route> {
    if record.iter().all(str::is_empty) {
        return None;
    }
    if !(record.len() == 12 || record.len() == 13) {
        tracing::debug!(fields = record.len(), "skipping csv line with unexpected field count");
        return None;
    }
    if normalize_csv_value(&record[0]) == RouteField::AirlineName.key() {
        return None;
    }
    let mut b = Route::builder();
    for (field, raw) in RouteField::CSV_ORDER.iter().zip(record.iter()) {
        b.set(*field, normalize_csv_value(raw));
    }
    Some(b.build())
}

/// Parse one CSV line. Returns `None` for blank lines, the header row and
/// lines with an unexpected field count.
pub fn parse_csv_line(line: &str) -> Option<Route> {
    let mut rdr = csv_builder().from_reader(line.as_bytes());
    let mut record = csv::StringRecord::new();
    match rdr.read_record(&mut record) {
        Ok(true) => route_from_record(&record),
        Ok(false) => None,
        Err(e) => {
            tracing::debug!(error = %e, "skipping unreadable csv line");
            None
        }
    }
}
// ----------------------------- Block layout ------------------------------------

fn block_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Pattern is a literal; a failure here would be a programming error caught by any test.
    RE.get_or_init(|| Regex::new(r"^(-)?\s*([A-Za-z_][A-Za-z0-9_]*)\s*:(.*)$").expect("valid block regex"))
}

/// Incremental parser for the block layout. Feed lines in order; a route is
/// returned each time a `-` line closes the previous block, and `finish`
/// returns the trailing one.
#[derive(Default)]
pub struct BlockParser {
    current: RouteBuilder,
}

impl BlockParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, line: &str) -> Option<Route> {
        if line.trim().is_empty() {
            return None;
        }
        let line = line.trim_end_matches(['\r', '\n']);
        let starts_block = line.starts_with('-');
        let done = if starts_block { self.take() } else { None };

        let Some(caps) = block_line_re().captures(line) else {
            tracing::debug!(line, "skipping block line without key");
            return done;
        };
        let key = &caps[2];
        match RouteField::from_key(key) {
            Some(field) => {
                let raw = caps.get(3).map(|m| m.as_str()).unwrap_or("");
                self.current.set(field, normalize_block_value(raw));
            }
            // document headers (`airline_routes:`) and unrelated keys
            None => tracing::trace!(key, "ignoring unknown key"),
        }
        done
    }

    pub fn finish(&mut self) -> Option<Route> {
        self.take()
    }

    fn take(&mut self) -> Option<Route> {
        let b = std::mem::take(&mut self.current);
        if b.is_empty() { None } else { Some(b.build()) }
    }
}

/// Parse a whole block-layout document held in memory.
pub fn parse_block_str(text: &str) -> Vec<Route> {
    let mut p = BlockParser::new();
    let mut out: Vec<Route> = text.lines().filter_map(|l| p.feed(l)).collect();
    out.extend(p.finish());
    out
}

/// Parse a whole CSV document held in memory.
pub fn parse_csv_str(text: &str) -> Vec<Route> {
    csv_builder()
        .from_reader(text.as_bytes())
        .records()
        .filter_map(|r| r.ok())
        .filter_map(|r| route_from_record(&r))
        .collect()
}

// ----------------------------- Reader ------------------------------------

/// Buffered line reader over a routes file. The file handle is owned and
/// released when the reader drops.
pub struct RouteReader {
    rdr: BufReader<File>,
    len: u64,
}

impl RouteReader {
    pub fn open(path: &Path, buf_bytes: usize) -> io::Result<Self> {
        let f = open_with_backoff(path, 16, 50)?;
        let len = f.metadata().map(|m| m.len()).unwrap_or(0);
        Ok(Self { rdr: BufReader::with_capacity(buf_bytes.max(8 * 1024), f), len })
    }

    pub fn len_bytes(&self) -> u64 {
        self.len
    }

    /// Peek the first non-blank line without consuming it from the record stream.
    fn peek_first_line(&mut self) -> io::Result<Option<String>> {
        let buf = self.rdr.fill_buf()?;
        let text = String::from_utf8_lossy(buf);
        Ok(text.lines().find(|l| !l.trim().is_empty()).map(str::to_string))
    }

    /// Read every route in the file. `layout = None` auto-detects.
    pub fn read_all(mut self, path: &Path, layout: Option<InputLayout>, progress: &ProgressScope) -> Result<(InputLayout, Vec<Route>)> {
        let layout = match layout {
            Some(l) => l,
            None => {
                let first = self.peek_first_line().with_context(|| format!("read {}", path.display()))?;
                InputLayout::detect(path, first.as_deref())
            }
        };

        let routes = match layout {
            InputLayout::Csv => self.read_csv(path, progress)?,
            InputLayout::Block => self.read_blocks(path, progress)?,
        };
        Ok((layout, routes))
    }

    fn read_csv(&mut self, path: &Path, progress: &ProgressScope) -> Result<Vec<Route>> {
        let mut rdr = csv_builder().from_reader(&mut self.rdr);
        let mut record = csv::StringRecord::new();
        let mut routes = Vec::new();
        let mut skipped = 0usize;
        let mut seen = 0u64;
        loop {
            match rdr.read_record(&mut record) {
                Ok(false) => break,
                Ok(true) => match route_from_record(&record) {
                    Some(r) => routes.push(r),
                    None if !record.iter().all(str::is_empty) => skipped += 1,
                    None => {}
                },
                Err(e) if e.is_io_error() => {
                    return Err(e).with_context(|| format!("read {}", path.display()));
                }
                Err(e) => {
                    tracing::debug!(error = %e, "skipping unreadable csv record");
                    skipped += 1;
                }
            }
            let pos = rdr.position().byte();
            progress.inc_bytes(pos.saturating_sub(seen));
            seen = pos;
        }
        if skipped > 0 {
            tracing::debug!(skipped, "csv lines skipped (header or malformed)");
        }
        Ok(routes)
    }

    fn read_blocks(&mut self, path: &Path, progress: &ProgressScope) -> Result<Vec<Route>> {
        let mut routes = Vec::new();
        let mut block = BlockParser::new();
        let mut line = String::new();
        loop {
            line.clear();
            let n = self.rdr.read_line(&mut line).with_context(|| format!("read {}", path.display()))?;
            if n == 0 {
                break;
            }
            progress.inc_bytes(n as u64);
            routes.extend(block.feed(&line));
        }
        routes.extend(block.finish());
        Ok(routes)
    }
}
