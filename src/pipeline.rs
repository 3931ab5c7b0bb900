use crate::config::QueryOptions;
use crate::errors::QueryError;
use crate::export::{export_filtered, export_ranked, ExportFormat, RecordLayout};
use crate::filters::filter_routes;
use crate::parse::{InputLayout, RouteReader};
use crate::progress::ProgressScope;
use crate::query::QuerySpec;
use crate::route::Route;
use crate::util::init_tracing_once;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Entry point for running one query over a routes file.
#[derive(Clone, Debug, Default)]
pub struct RouteQuery {
    pub(crate) opts: QueryOptions,
}

/// What a completed run wrote.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryReport {
    /// Filter query; `matched == 0` means the no-results marker was written.
    Filtered { output: PathBuf, matched: usize },
    /// Aggregation query; `rows` excludes the header.
    Ranked { output: PathBuf, rows: usize },
}

impl QueryReport {
    pub fn output(&self) -> &Path {
        match self {
            QueryReport::Filtered { output, .. } | QueryReport::Ranked { output, .. } => output,
        }
    }
}

impl RouteQuery {
    pub fn new() -> Self {
        Self { opts: QueryOptions::default() }
    }

    pub fn from_options(opts: QueryOptions) -> Self {
        Self { opts }
    }

    // -------- Builder methods --------
    pub fn data(mut self, path: impl AsRef<Path>) -> Self { self.opts = self.opts.with_data_path(path); self }
    pub fn output(mut self, path: impl AsRef<Path>) -> Self { self.opts = self.opts.with_output_path(path); self }
    pub fn input_layout(mut self, layout: InputLayout) -> Self { self.opts = self.opts.with_input_layout(layout); self }
    pub fn format(mut self, format: ExportFormat) -> Self { self.opts = self.opts.with_export_format(format); self }
    pub fn record_layout(mut self, layout: RecordLayout) -> Self { self.opts = self.opts.with_record_layout(layout); self }
    pub fn progress(mut self, yes: bool) -> Self { self.opts = self.opts.with_progress(yes); self }
    pub fn progress_label(mut self, label: impl Into<String>) -> Self { self.opts = self.opts.with_progress_label(label); self }
    pub fn io_buffers(mut self, read_bytes: usize, write_bytes: usize) -> Self { self.opts = self.opts.with_io_buffers(read_bytes, write_bytes); self }

    pub fn options(&self) -> &QueryOptions {
        &self.opts
    }

    /// Open and parse the data file. The input handle lives only for the
    /// duration of this call.
    pub fn load_routes(&self) -> Result<Vec<Route>> {
        let path = self.opts.data_path.as_deref().ok_or(QueryError::MissingDataFile)?;
        let reader = RouteReader::open(path, self.opts.read_buffer_bytes)
            .map_err(|source| QueryError::FileOpenFailure { path: path.to_path_buf(), source })?;

        let progress = if self.opts.progress {
            let label = self.opts.progress_label.clone().unwrap_or_else(|| "Reading routes".to_string());
            ProgressScope::bytes(label, reader.len_bytes())
        } else {
            ProgressScope::hidden()
        };
        let (layout, routes) = reader.read_all(path, self.opts.input_layout, &progress)?;
        progress.finish(format!("{} routes", routes.len()));
        tracing::info!(path = %path.display(), ?layout, routes = routes.len(), "loaded routes");
        Ok(routes)
    }

    /// Load, dispatch once on the query kind, export.
    pub fn run(&self, query: &QuerySpec) -> Result<QueryReport> {
        init_tracing_once();
        let routes = self.load_routes()?;
        self.run_on(&routes, query)
    }

    /// Dispatch over routes already in memory.
    pub fn run_on(&self, routes: &[Route], query: &QuerySpec) -> Result<QueryReport> {
        let output = self
            .opts
            .output_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(query.default_output()));
        let write_buf = self.opts.write_buffer_bytes;

        match query {
            QuerySpec::Filter(spec) => {
                let outcome = filter_routes(routes, spec);
                export_filtered(&output, &outcome, spec, self.opts.export_format, write_buf)?;
                tracing::info!(output = %output.display(), matched = outcome.len(), "filter results written");
                Ok(QueryReport::Filtered { output, matched: outcome.len() })
            }
            QuerySpec::Aggregate(spec) => {
                let ranked = spec.evaluate(routes);
                export_ranked(&output, &ranked, self.opts.export_format, self.opts.record_layout, write_buf)?;
                tracing::info!(output = %output.display(), question = %spec.question, rows = ranked.len(), "ranking written");
                Ok(QueryReport::Ranked { output, rows: ranked.len() })
            }
        }
    }
}
