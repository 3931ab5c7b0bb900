//! Command-line surface. Flags keep the upper-case `--NAME=value` spelling
//! existing scripts use, e.g.
//!
//! ```text
//! route-manager --DATA=routes.yaml --QUESTION=1 --N=10
//! route-manager --DATA=routes.csv --AIRLINE=ACA --DEST_COUNTRY=Canada
//! ```

use crate::config::QueryOptions;
use crate::errors::{exit_code_for, QueryError};
use crate::export::{ExportFormat, RecordLayout};
use crate::filters::{FilterSpec, Predicate};
use crate::parse::InputLayout;
use crate::pipeline::{QueryReport, RouteQuery};
use crate::query::{AggregateSpec, Question, QuerySpec};
use crate::ranking::SortDirection;
use crate::route::RouteField;
use crate::util::init_tracing_once;
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;
use std::str::FromStr;

/// Route manager - filter and rank airline routes
#[derive(Parser, Debug, Default)]
#[command(name = "route-manager")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Routes data file (.csv or indented .yaml block layout)
    #[arg(long = "DATA", value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Aggregation question (1-5)
    #[arg(long = "QUESTION")]
    pub question: Option<String>,

    /// Number of ranked rows to keep
    #[arg(long = "N")]
    pub n: Option<String>,

    /// Destination country scoping an aggregation
    #[arg(long = "COUNTRY")]
    pub country: Option<String>,

    /// Only count airlines based in this country
    #[arg(long = "AIRLINE_COUNTRY")]
    pub airline_country: Option<String>,

    /// Ranking order override: asc or desc
    #[arg(long = "ORDER")]
    pub order: Option<String>,

    /// Filter: airline ICAO code
    #[arg(long = "AIRLINE")]
    pub airline: Option<String>,

    /// Filter: origin city
    #[arg(long = "SRC_CITY")]
    pub src_city: Option<String>,

    /// Filter: origin country
    #[arg(long = "SRC_COUNTRY")]
    pub src_country: Option<String>,

    /// Filter: destination city
    #[arg(long = "DEST_CITY")]
    pub dest_city: Option<String>,

    /// Filter: destination country
    #[arg(long = "DEST_COUNTRY")]
    pub dest_country: Option<String>,

    /// Output file (default output.csv for questions, output.txt for filters)
    #[arg(long = "OUTPUT", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format: text or json
    #[arg(long = "FORMAT")]
    pub format: Option<String>,

    /// Ranked line layout: concat or delimited
    #[arg(long = "LAYOUT")]
    pub layout: Option<String>,

    /// Force the input layout: csv or block
    #[arg(long = "INPUT")]
    pub input: Option<String>,

    /// Show a progress bar while reading
    #[arg(long = "PROGRESS")]
    pub progress: bool,
}

fn parse_flag<T: FromStr>(name: &'static str, raw: &str) -> Result<T, QueryError> {
    raw.parse::<T>().map_err(|_| QueryError::InvalidArgument { name, value: raw.to_string() })
}

impl Cli {
    fn filter_predicates(&self) -> Vec<Predicate> {
        [
            (RouteField::AirlineCode, &self.airline),
            (RouteField::FromCity, &self.src_city),
            (RouteField::FromCountry, &self.src_country),
            (RouteField::ToCity, &self.dest_city),
            (RouteField::ToCountry, &self.dest_country),
        ]
        .into_iter()
        .filter_map(|(field, v)| v.as_ref().map(|v| Predicate::new(field, v.clone())))
        .collect()
    }

    /// Validate arguments into run options and a query. Nothing is opened or
    /// parsed here.
    pub fn into_request(self) -> Result<(QueryOptions, QuerySpec), QueryError> {
        let data = self.data.clone().ok_or(QueryError::MissingDataFile)?;

        let mut opts = QueryOptions::default().with_data_path(data).with_progress(self.progress);
        if let Some(out) = &self.output {
            opts = opts.with_output_path(out);
        }
        if let Some(f) = &self.format {
            opts = opts.with_export_format(parse_flag::<ExportFormat>("--FORMAT", f)?);
        }
        if let Some(l) = &self.layout {
            opts = opts.with_record_layout(parse_flag::<RecordLayout>("--LAYOUT", l)?);
        }
        if let Some(i) = &self.input {
            let layout = match i.trim().to_ascii_lowercase().as_str() {
                "csv" => InputLayout::Csv,
                "block" | "yaml" | "yml" => InputLayout::Block,
                _ => return Err(QueryError::InvalidArgument { name: "--INPUT", value: i.clone() }),
            };
            opts = opts.with_input_layout(layout);
        }

        let predicates = self.filter_predicates();
        let spec = match &self.question {
            Some(q) => {
                let question: Question = q.parse()?;
                let mut spec = AggregateSpec::new(question);
                if let Some(n) = &self.n {
                    spec = spec.with_limit(parse_flag::<usize>("--N", n)?);
                }
                if let Some(order) = &self.order {
                    spec = spec.with_direction(parse_flag::<SortDirection>("--ORDER", order)?);
                }
                // --DEST_COUNTRY doubles as the scoping country for questions
                if let Some(c) = self.country.as_ref().or(self.dest_country.as_ref()) {
                    spec = spec.with_country(c.clone());
                }
                if let Some(ac) = &self.airline_country {
                    spec = spec.with_airline_country(ac.clone());
                }
                let ignored = predicates.iter().filter(|p| p.field != RouteField::ToCountry).count();
                if ignored > 0 {
                    tracing::warn!(ignored, "filter flags are ignored when --QUESTION is given");
                }
                QuerySpec::Aggregate(spec)
            }
            None => QuerySpec::Filter(FilterSpec::new(predicates)?),
        };
        Ok((opts, spec))
    }
}

/// Validate and run one invocation.
pub fn execute(cli: Cli) -> anyhow::Result<QueryReport> {
    init_tracing_once();
    let (opts, spec) = cli.into_request()?;
    RouteQuery::from_options(opts).run(&spec)
}

/// Parse `args` (including the program name), run, and return the process
/// exit code: 0 for every completed run, non-zero only for failures.
pub fn run_from<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return e.exit_code();
        }
    };
    match execute(cli) {
        Ok(report) => {
            tracing::debug!(?report, "done");
            0
        }
        Err(e) => {
            eprintln!("{:#}", e);
            exit_code_for(&e)
        }
    }
}
