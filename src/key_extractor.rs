use crate::route::{Route, RouteField};
use std::fmt;
use std::sync::Arc;

/// Derives the grouping label for a route.
///
/// The built-in variants format the labels the report questions use;
/// `Field` groups on one raw field and `Custom` takes any closure.
/// An extractor returns `None` (or an empty string) when the route has
/// nothing to contribute, and such routes are not counted.
#[derive(Clone)]
pub enum KeyExtractor {
    /// `{airline_name} ({airline_code})`
    Airline,
    /// `{to_country}`
    DestinationCountry,
    /// `"{to_name} ({to_code}), {to_city}, {to_country}"`, quoted because it holds commas.
    DestinationAirport,
    /// `"{to_city}, {to_country}"`
    DestinationCity,
    /// `{from_code}-{to_code}`
    RoutePair,
    Field(RouteField),
    Custom(Arc<dyn Fn(&Route) -> Option<String> + Send + Sync>),
}

impl fmt::Debug for KeyExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyExtractor::Airline => f.write_str("Airline"),
            KeyExtractor::DestinationCountry => f.write_str("DestinationCountry"),
            KeyExtractor::DestinationAirport => f.write_str("DestinationAirport"),
            KeyExtractor::DestinationCity => f.write_str("DestinationCity"),
            KeyExtractor::RoutePair => f.write_str("RoutePair"),
            KeyExtractor::Field(field) => write!(f, "Field({})", field),
            KeyExtractor::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl KeyExtractor {
    pub fn custom(f: impl Fn(&Route) -> Option<String> + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(f))
    }

    pub fn key_for(&self, r: &Route) -> Option<String> {
        let sources: &[RouteField] = match self {
            KeyExtractor::Airline => &[RouteField::AirlineName, RouteField::AirlineCode],
            KeyExtractor::DestinationCountry => &[RouteField::ToCountry],
            KeyExtractor::DestinationAirport => &[RouteField::ToAirportName, RouteField::ToAirportCode],
            KeyExtractor::DestinationCity => &[RouteField::ToCity],
            KeyExtractor::RoutePair => &[RouteField::FromAirportCode, RouteField::ToAirportCode],
            KeyExtractor::Field(field) => {
                let v = r.get(*field);
                return (!v.is_empty()).then(|| v.to_string());
            }
            KeyExtractor::Custom(f) => return f(r).filter(|k| !k.is_empty()),
        };
        // a route with every source field empty has nothing to group on
        if sources.iter().all(|f| r.get(*f).is_empty()) {
            return None;
        }
        let key = match self {
            KeyExtractor::Airline => format!("{} ({})", r.airline_name(), r.airline_code()),
            KeyExtractor::DestinationCountry => r.to_country().to_string(),
            KeyExtractor::DestinationAirport => format!(
                "\"{} ({}), {}, {}\"",
                r.to_airport_name(),
                r.to_airport_code(),
                r.to_city(),
                r.to_country()
            ),
            KeyExtractor::DestinationCity => format!("\"{}, {}\"", r.to_city(), r.to_country()),
            KeyExtractor::RoutePair => format!("{}-{}", r.from_airport_code(), r.to_airport_code()),
            KeyExtractor::Field(_) | KeyExtractor::Custom(_) => return None,
        };
        Some(key)
    }
}
