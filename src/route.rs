//! Route record model: one directed flight leg plus the field selector used by
//! the filter and key-derivation layers.

use serde::Serialize;
use std::fmt;

/// One directed flight leg (airline + origin + destination).
/// Fields are private so a parsed route cannot be mutated after construction;
/// absent source fields are empty strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Route {
    airline_name: String,
    airline_code: String,
    airline_country: String,
    from_airport_name: String,
    from_airport_city: String,
    from_airport_country: String,
    from_airport_code: String,
    from_airport_altitude: String,
    to_airport_name: String,
    to_airport_city: String,
    to_airport_country: String,
    to_airport_code: String,
    to_airport_altitude: String,
}

/// Selects a single text field of a `Route`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RouteField {
    AirlineName,
    AirlineCode,
    AirlineCountry,
    FromAirportName,
    FromCity,
    FromCountry,
    FromAirportCode,
    FromAltitude,
    ToAirportName,
    ToCity,
    ToCountry,
    ToAirportCode,
    ToAltitude,
}

impl RouteField {
    /// Positional CSV order.
    pub const CSV_ORDER: [RouteField; 13] = [
        RouteField::AirlineName,
        RouteField::AirlineCode,
        RouteField::AirlineCountry,
        RouteField::FromAirportName,
        RouteField::FromCity,
        RouteField::FromCountry,
        RouteField::FromAirportCode,
        RouteField::FromAltitude,
        RouteField::ToAirportName,
        RouteField::ToCity,
        RouteField::ToCountry,
        RouteField::ToAirportCode,
        RouteField::ToAltitude,
    ];

    /// Long key name as used in block-layout files.
    pub fn key(self) -> &'static str {
        match self {
            RouteField::AirlineName => "airline_name",
            RouteField::AirlineCode => "airline_icao_unique_code",
            RouteField::AirlineCountry => "airline_country",
            RouteField::FromAirportName => "from_airport_name",
            RouteField::FromCity => "from_airport_city",
            RouteField::FromCountry => "from_airport_country",
            RouteField::FromAirportCode => "from_airport_icao_unique_code",
            RouteField::FromAltitude => "from_airport_altitude",
            RouteField::ToAirportName => "to_airport_name",
            RouteField::ToCity => "to_airport_city",
            RouteField::ToCountry => "to_airport_country",
            RouteField::ToAirportCode => "to_airport_icao_unique_code",
            RouteField::ToAltitude => "to_airport_altitude",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::CSV_ORDER.iter().copied().find(|f| f.key() == key)
    }
}

impl fmt::Display for RouteField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl Route {
    /// Start an empty route; populate it through `RouteBuilder`.
    pub fn builder() -> RouteBuilder {
        RouteBuilder::default()
    }

    pub fn get(&self, field: RouteField) -> &str {
        match field {
            RouteField::AirlineName => &self.airline_name,
            RouteField::AirlineCode => &self.airline_code,
            RouteField::AirlineCountry => &self.airline_country,
            RouteField::FromAirportName => &self.from_airport_name,
            RouteField::FromCity => &self.from_airport_city,
            RouteField::FromCountry => &self.from_airport_country,
            RouteField::FromAirportCode => &self.from_airport_code,
            RouteField::FromAltitude => &self.from_airport_altitude,
            RouteField::ToAirportName => &self.to_airport_name,
            RouteField::ToCity => &self.to_airport_city,
            RouteField::ToCountry => &self.to_airport_country,
            RouteField::ToAirportCode => &self.to_airport_code,
            RouteField::ToAltitude => &self.to_airport_altitude,
        }
    }

    pub fn airline_name(&self) -> &str { &self.airline_name }
    pub fn airline_code(&self) -> &str { &self.airline_code }
    pub fn airline_country(&self) -> &str { &self.airline_country }
    pub fn from_airport_name(&self) -> &str { &self.from_airport_name }
    pub fn from_city(&self) -> &str { &self.from_airport_city }
    pub fn from_country(&self) -> &str { &self.from_airport_country }
    pub fn from_airport_code(&self) -> &str { &self.from_airport_code }
    pub fn to_airport_name(&self) -> &str { &self.to_airport_name }
    pub fn to_city(&self) -> &str { &self.to_airport_city }
    pub fn to_country(&self) -> &str { &self.to_airport_country }
    pub fn to_airport_code(&self) -> &str { &self.to_airport_code }

    /// Origin altitude in feet, if the field holds a number.
    pub fn from_altitude(&self) -> Option<i64> {
        parse_altitude(&self.from_airport_altitude)
    }

    /// Destination altitude in feet, if the field holds a number.
    pub fn to_altitude(&self) -> Option<i64> {
        parse_altitude(&self.to_airport_altitude)
    }

    /// True when no field carries data.
    pub fn is_blank(&self) -> bool {
        RouteField::CSV_ORDER.iter().all(|f| self.get(*f).is_empty())
    }
}

fn parse_altitude(s: &str) -> Option<i64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite()).map(|v| v.round() as i64)
}

/// Accumulates field values while a record is being parsed, then freezes
/// into a `Route`.
#[derive(Clone, Debug, Default)]
pub struct RouteBuilder {
    route: Route,
}

impl RouteBuilder {
    pub fn set(&mut self, field: RouteField, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        let slot = match field {
            RouteField::AirlineName => &mut self.route.airline_name,
            RouteField::AirlineCode => &mut self.route.airline_code,
            RouteField::AirlineCountry => &mut self.route.airline_country,
            RouteField::FromAirportName => &mut self.route.from_airport_name,
            RouteField::FromCity => &mut self.route.from_airport_city,
            RouteField::FromCountry => &mut self.route.from_airport_country,
            RouteField::FromAirportCode => &mut self.route.from_airport_code,
            RouteField::FromAltitude => &mut self.route.from_airport_altitude,
            RouteField::ToAirportName => &mut self.route.to_airport_name,
            RouteField::ToCity => &mut self.route.to_airport_city,
            RouteField::ToCountry => &mut self.route.to_airport_country,
            RouteField::ToAirportCode => &mut self.route.to_airport_code,
            RouteField::ToAltitude => &mut self.route.to_airport_altitude,
        };
        *slot = value;
        self
    }

    /// Chaining variant of `set`, handy when building fixtures.
    pub fn with(mut self, field: RouteField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.route.is_blank()
    }

    pub fn build(self) -> Route {
        self.route
    }
}
