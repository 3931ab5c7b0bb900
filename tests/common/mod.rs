#![allow(dead_code)]

use route_manager::{Route, RouteField};
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Tiny routes dataset in positional CSV layout (13 fields per line).
///
/// Destinations: 5 routes into Canada (3 Air Canada, 1 WestJet, 1 American),
/// 3 routes into the United States (all to JFK).
pub const SAMPLE_CSV: &[&str] = &[
    "Air Canada,ACA,Canada,Toronto Pearson International Airport,Toronto,Canada,CYYZ,569,Vancouver International Airport,Vancouver,Canada,CYVR,14",
    "Air Canada,ACA,Canada,Montreal / Pierre Elliott Trudeau International Airport,Montreal,Canada,CYUL,118,Vancouver International Airport,Vancouver,Canada,CYVR,14",
    "WestJet,WJA,Canada,Calgary International Airport,Calgary,Canada,CYYC,3557,Toronto Pearson International Airport,Toronto,Canada,CYYZ,569",
    "Air Canada,ACA,Canada,Toronto Pearson International Airport,Toronto,Canada,CYYZ,569,John F Kennedy International Airport,New York,United States,KJFK,13",
    "American Airlines,AAL,United States,John F Kennedy International Airport,New York,United States,KJFK,13,Toronto Pearson International Airport,Toronto,Canada,CYYZ,569",
    "Lufthansa,DLH,Germany,Frankfurt am Main Airport,Frankfurt,Germany,EDDF,364,John F Kennedy International Airport,New York,United States,KJFK,13",
    "British Airways,BAW,United Kingdom,London Heathrow Airport,London,United Kingdom,EGLL,83,John F Kennedy International Airport,New York,United States,KJFK,13",
    "Air Canada,ACA,Canada,London Heathrow Airport,London,United Kingdom,EGLL,83,Toronto Pearson International Airport,Toronto,Canada,CYYZ,569",
];

pub fn sample_csv_text() -> String {
    let mut s = SAMPLE_CSV.join("\n");
    s.push('\n');
    s
}

/// Same dataset as `SAMPLE_CSV`, in the indented block layout with a document
/// header line, blank separator lines and a few quoted values.
pub fn sample_block_text() -> String {
    let mut out = String::from("airline_routes:\n");
    for (i, line) in SAMPLE_CSV.iter().enumerate() {
        let values: Vec<&str> = line.split(',').collect();
        for (j, (field, value)) in RouteField::CSV_ORDER.iter().zip(values).enumerate() {
            let value = if i % 2 == 0 && *field == RouteField::ToCountry {
                format!("'{}  '", value)
            } else {
                value.to_string()
            };
            if j == 0 {
                out.push_str(&format!("- {}: {}\n", field.key(), value));
            } else {
                out.push_str(&format!("  {}: {}\n", field.key(), value));
            }
        }
        out.push('\n');
    }
    out
}

pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let p = dir.join(name);
    fs::write(&p, contents).unwrap();
    p
}

/// Temp dir holding `routes.csv` and `routes.yaml` with the sample data.
pub fn make_dataset() -> (tempfile::TempDir, PathBuf, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_file(dir.path(), "routes.csv", &sample_csv_text());
    let yaml = write_file(dir.path(), "routes.yaml", &sample_block_text());
    (dir, csv, yaml)
}

pub fn sample_routes() -> Vec<Route> {
    route_manager::parse_csv_str(&sample_csv_text())
}

/// Read a text file line-by-line (keeps empty lines so exact output can be asserted).
pub fn read_lines(path: &Path) -> Vec<String> {
    let f = File::open(path).unwrap();
    let r = BufReader::new(f);
    r.lines().map(|l| l.unwrap()).collect()
}

/// Minimal route for engine tests.
pub fn route(airline: &str, code: &str, from_city: &str, from_country: &str, to_city: &str, to_country: &str) -> Route {
    Route::builder()
        .with(RouteField::AirlineName, airline)
        .with(RouteField::AirlineCode, code)
        .with(RouteField::FromCity, from_city)
        .with(RouteField::FromCountry, from_country)
        .with(RouteField::ToCity, to_city)
        .with(RouteField::ToCountry, to_country)
        .build()
}
