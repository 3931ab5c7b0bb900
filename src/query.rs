//! Query request model: the single discriminated value the pipeline dispatches
//! on, built once by the CLI (or by library callers).

use crate::aggregate::{aggregate_with, AltitudeChangeAggregator, CountAggregator, RankedEntry};
use crate::errors::QueryError;
use crate::filters::{FilterSpec, Predicate};
use crate::key_extractor::KeyExtractor;
use crate::ranking::{top_n, SortDirection};
use crate::route::{Route, RouteField};
use std::fmt;
use std::str::FromStr;

/// Destination country used by questions 1 and 5 when none is given.
pub const DEFAULT_COUNTRY: &str = "Canada";

/// Report questions answerable by aggregation, numbered as on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Question {
    /// 1: airlines with the most routes into a country.
    TopAirlinesToCountry,
    /// 2: destination countries with the fewest routes.
    LeastServedCountries,
    /// 3: most-served destination airports.
    TopDestinationAirports,
    /// 4: most-served destination cities.
    TopDestinationCities,
    /// 5: route pairs into a country with the largest altitude change.
    LargestAltitudeChanges,
}

impl Question {
    pub const ALL: [Question; 5] = [
        Question::TopAirlinesToCountry,
        Question::LeastServedCountries,
        Question::TopDestinationAirports,
        Question::TopDestinationCities,
        Question::LargestAltitudeChanges,
    ];

    pub fn number(self) -> u8 {
        match self {
            Question::TopAirlinesToCountry => 1,
            Question::LeastServedCountries => 2,
            Question::TopDestinationAirports => 3,
            Question::TopDestinationCities => 4,
            Question::LargestAltitudeChanges => 5,
        }
    }

    pub fn key(self) -> KeyExtractor {
        match self {
            Question::TopAirlinesToCountry => KeyExtractor::Airline,
            Question::LeastServedCountries => KeyExtractor::DestinationCountry,
            Question::TopDestinationAirports => KeyExtractor::DestinationAirport,
            Question::TopDestinationCities => KeyExtractor::DestinationCity,
            Question::LargestAltitudeChanges => KeyExtractor::RoutePair,
        }
    }

    pub fn default_direction(self) -> SortDirection {
        match self {
            Question::LeastServedCountries => SortDirection::Asc,
            _ => SortDirection::Desc,
        }
    }

    pub fn default_limit(self) -> usize {
        match self {
            Question::TopAirlinesToCountry => 20,
            Question::LeastServedCountries => 30,
            Question::TopDestinationAirports => 10,
            Question::TopDestinationCities => 15,
            Question::LargestAltitudeChanges => 10,
        }
    }

    /// Whether the question is scoped to a destination country by default.
    fn country_scoped(self) -> bool {
        matches!(self, Question::TopAirlinesToCountry | Question::LargestAltitudeChanges)
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.number())
    }
}

impl FromStr for Question {
    type Err = QueryError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        let t = t.strip_prefix('q').or_else(|| t.strip_prefix('Q')).unwrap_or(t);
        t.parse::<u8>()
            .ok()
            .and_then(|n| Question::ALL.into_iter().find(|q| q.number() == n))
            .ok_or_else(|| QueryError::UnknownQuerySelector(s.to_string()))
    }
}

/// An aggregation request: which question, how many rows, in which order,
/// plus the optional scoping values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AggregateSpec {
    pub question: Question,
    pub limit: usize,
    pub direction: SortDirection,
    pub country: Option<String>,
    pub airline_country: Option<String>,
}

impl AggregateSpec {
    pub fn new(question: Question) -> Self {
        Self {
            question,
            limit: question.default_limit(),
            direction: question.default_direction(),
            country: None,
            airline_country: None,
        }
    }

    pub fn with_limit(mut self, n: usize) -> Self {
        self.limit = n;
        self
    }
    pub fn with_direction(mut self, direction: SortDirection) -> Self {
        self.direction = direction;
        self
    }
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }
    pub fn with_airline_country(mut self, country: impl Into<String>) -> Self {
        self.airline_country = Some(country.into());
        self
    }

    /// Predicates a route must satisfy to be counted.
    pub fn sub_filter(&self) -> Vec<Predicate> {
        let mut out = Vec::new();
        let country = match (&self.country, self.question.country_scoped()) {
            (Some(c), _) => Some(c.clone()),
            (None, true) => Some(DEFAULT_COUNTRY.to_string()),
            (None, false) => None,
        };
        if let Some(c) = country {
            out.push(Predicate::new(RouteField::ToCountry, c));
        }
        if let Some(ac) = &self.airline_country {
            out.push(Predicate::new(RouteField::AirlineCountry, ac.clone()));
        }
        out
    }

    /// Group, rank and truncate.
    pub fn evaluate(&self, routes: &[Route]) -> Vec<RankedEntry> {
        let key = self.question.key();
        let only = self.sub_filter();
        let entries = match self.question {
            Question::LargestAltitudeChanges => aggregate_with(AltitudeChangeAggregator::new(key).only(only), routes),
            _ => aggregate_with(CountAggregator::new(key).only(only), routes),
        };
        let groups = entries.len();
        let ranked = top_n(entries, self.direction, self.limit);
        tracing::debug!(question = %self.question, groups, kept = ranked.len(), "aggregation done");
        ranked
    }
}

/// One query, selected once: either a filter or an aggregation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuerySpec {
    Filter(FilterSpec),
    Aggregate(AggregateSpec),
}

impl QuerySpec {
    /// Output file used when the caller does not name one.
    pub fn default_output(&self) -> &'static str {
        match self {
            QuerySpec::Filter(_) => "output.txt",
            QuerySpec::Aggregate(_) => "output.csv",
        }
    }
}
