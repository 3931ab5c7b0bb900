//! Filter engine: exact-match predicate conjunctions over parsed routes.

use crate::errors::QueryError;
use crate::route::{Route, RouteField};

/// A single `field == value` test. Comparison is exact and case-sensitive on
/// the already-normalized field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Predicate {
    pub field: RouteField,
    pub value: String,
}

impl Predicate {
    pub fn new(field: RouteField, value: impl Into<String>) -> Self {
        Self { field, value: value.into() }
    }

    #[inline]
    pub fn matches(&self, route: &Route) -> bool {
        route.get(self.field) == self.value
    }
}

/// The three supported filter shapes, named after the question they answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterShape {
    /// {airline, destination country}
    AirlineToCountry,
    /// {origin country, destination city, destination country}
    CountryToCity,
    /// {origin city, origin country, destination city, destination country}
    CityToCity,
}

impl FilterShape {
    pub fn fields(self) -> &'static [RouteField] {
        match self {
            FilterShape::AirlineToCountry => &[RouteField::AirlineCode, RouteField::ToCountry],
            FilterShape::CountryToCity => &[RouteField::FromCountry, RouteField::ToCity, RouteField::ToCountry],
            FilterShape::CityToCity => &[RouteField::FromCity, RouteField::FromCountry, RouteField::ToCity, RouteField::ToCountry],
        }
    }

    /// Pick the shape whose field set equals the supplied one (order-insensitive).
    pub fn from_fields(supplied: &[RouteField]) -> Option<Self> {
        let mut s = supplied.to_vec();
        s.sort();
        s.dedup();
        [FilterShape::AirlineToCountry, FilterShape::CountryToCity, FilterShape::CityToCity]
            .into_iter()
            .find(|shape| {
                let mut f = shape.fields().to_vec();
                f.sort();
                f == s
            })
    }
}

/// A validated conjunction of 2–4 predicates in one of the fixed shapes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterSpec {
    shape: FilterShape,
    predicates: Vec<Predicate>,
}

impl FilterSpec {
    pub fn new(predicates: Vec<Predicate>) -> Result<Self, QueryError> {
        if predicates.len() < 2 {
            return Err(QueryError::InsufficientArguments { required: 2, supplied: predicates.len() });
        }
        let fields: Vec<RouteField> = predicates.iter().map(|p| p.field).collect();
        let shape = FilterShape::from_fields(&fields).ok_or_else(|| {
            let names: Vec<&str> = fields.iter().map(|f| f.key()).collect();
            QueryError::UnsupportedFilter(names.join(", "))
        })?;
        Ok(Self { shape, predicates })
    }

    pub fn airline_to_country(airline_code: impl Into<String>, to_country: impl Into<String>) -> Self {
        Self {
            shape: FilterShape::AirlineToCountry,
            predicates: vec![
                Predicate::new(RouteField::AirlineCode, airline_code),
                Predicate::new(RouteField::ToCountry, to_country),
            ],
        }
    }

    pub fn country_to_city(from_country: impl Into<String>, to_city: impl Into<String>, to_country: impl Into<String>) -> Self {
        Self {
            shape: FilterShape::CountryToCity,
            predicates: vec![
                Predicate::new(RouteField::FromCountry, from_country),
                Predicate::new(RouteField::ToCity, to_city),
                Predicate::new(RouteField::ToCountry, to_country),
            ],
        }
    }

    pub fn city_to_city(
        from_city: impl Into<String>,
        from_country: impl Into<String>,
        to_city: impl Into<String>,
        to_country: impl Into<String>,
    ) -> Self {
        Self {
            shape: FilterShape::CityToCity,
            predicates: vec![
                Predicate::new(RouteField::FromCity, from_city),
                Predicate::new(RouteField::FromCountry, from_country),
                Predicate::new(RouteField::ToCity, to_city),
                Predicate::new(RouteField::ToCountry, to_country),
            ],
        }
    }

    pub fn shape(&self) -> FilterShape {
        self.shape
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Value the caller supplied for `field`, if it is part of this filter.
    pub fn value_of(&self, field: RouteField) -> Option<&str> {
        self.predicates.iter().find(|p| p.field == field).map(|p| p.value.as_str())
    }

    pub fn matches(&self, route: &Route) -> bool {
        matches_all(route, &self.predicates)
    }
}

pub fn matches_all(route: &Route, predicates: &[Predicate]) -> bool {
    predicates.iter().all(|p| p.matches(route))
}

/// Result of a filter query. Zero matches is its own state so the exporter
/// can emit the no-results marker instead of an empty file.
#[derive(Debug, PartialEq, Eq)]
pub enum FilterOutcome<'a> {
    Matches(Vec<&'a Route>),
    NoResults,
}

impl<'a> FilterOutcome<'a> {
    pub fn len(&self) -> usize {
        match self {
            FilterOutcome::Matches(v) => v.len(),
            FilterOutcome::NoResults => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn routes(&self) -> &[&'a Route] {
        match self {
            FilterOutcome::Matches(v) => v,
            FilterOutcome::NoResults => &[],
        }
    }
}

/// Select the routes that satisfy every predicate, in input order.
pub fn filter_routes<'a>(routes: &'a [Route], spec: &FilterSpec) -> FilterOutcome<'a> {
    let hits: Vec<&Route> = routes.iter().filter(|r| spec.matches(r)).collect();
    tracing::debug!(shape = ?spec.shape(), scanned = routes.len(), matched = hits.len(), "filter done");
    if hits.is_empty() {
        FilterOutcome::NoResults
    } else {
        FilterOutcome::Matches(hits)
    }
}
