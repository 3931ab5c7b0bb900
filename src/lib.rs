mod config;
mod errors;
mod util;
mod progress;

mod route;
mod parse;
mod filters;
mod key_extractor;
mod aggregate;
mod ranking;
mod query;
mod export;
mod pipeline;

pub mod cli;

pub use crate::config::QueryOptions;
pub use crate::errors::{exit_code_for, QueryError};
pub use crate::pipeline::{QueryReport, RouteQuery};
pub use crate::query::{AggregateSpec, Question, QuerySpec, DEFAULT_COUNTRY};

// record model
pub use crate::route::{Route, RouteBuilder, RouteField};

// parsing adapters
pub use crate::parse::{
    normalize_block_value, normalize_csv_value, parse_block_str, parse_csv_line, parse_csv_str, unquote, BlockParser,
    InputLayout, RouteReader,
};

// filter engine
pub use crate::filters::{filter_routes, matches_all, FilterOutcome, FilterShape, FilterSpec, Predicate};

// grouping, ranking
pub use crate::key_extractor::KeyExtractor;
pub use crate::aggregate::{aggregate_with, count_by_key, Aggregator, AltitudeChangeAggregator, CountAggregator, RankedEntry};
pub use crate::ranking::{compare_entries, top_n, SortDirection};

// export
pub use crate::export::{
    export_filtered, export_ranked, filter_header, filter_line, ranked_line, write_filtered, write_ranked, ExportFormat,
    RecordLayout, ResultWriter, NO_RESULTS, RESULT_HEADER,
};

pub use crate::progress::ProgressScope;
pub use crate::util::{init_tracing_once, replace_file_atomic_backoff};
