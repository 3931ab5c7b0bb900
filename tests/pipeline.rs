#[path = "common/mod.rs"]
mod common;

use common::*;
use route_manager::{
    AggregateSpec, ExportFormat, FilterSpec, QueryError, QueryReport, QuerySpec, Question, RecordLayout, RouteQuery,
    SortDirection, NO_RESULTS, RESULT_HEADER,
};
use std::fs;
use std::path::Path;

fn run_question(data: &Path, out: &Path, spec: AggregateSpec) -> Vec<String> {
    RouteQuery::new()
        .data(data)
        .output(out)
        .progress(false)
        .run(&QuerySpec::Aggregate(spec))
        .unwrap();
    read_lines(out)
}

/// Question 1: airlines into Canada, descending, ties by label.
#[test]
fn question_one_top_airlines_to_canada() {
    let (dir, csv, _) = make_dataset();
    let out = dir.path().join("q1.csv");
    let lines = run_question(&csv, &out, AggregateSpec::new(Question::TopAirlinesToCountry));
    assert_eq!(lines, vec![RESULT_HEADER, "Air Canada (ACA)3", "American Airlines (AAL)1", "WestJet (WJA)1"]);
}

/// Question 2: destination countries, fewest first; optional airline-country scope.
#[test]
fn question_two_least_served_countries() {
    let (dir, csv, _) = make_dataset();
    let out = dir.path().join("q2.csv");
    let lines = run_question(&csv, &out, AggregateSpec::new(Question::LeastServedCountries));
    assert_eq!(lines, vec![RESULT_HEADER, "United States3", "Canada5"]);

    let scoped = AggregateSpec::new(Question::LeastServedCountries).with_airline_country("Canada");
    let lines = run_question(&csv, &out, scoped);
    assert_eq!(lines, vec![RESULT_HEADER, "United States1", "Canada4"]);
}

/// Question 3: quoted airport labels; equal counts ordered by label.
#[test]
fn question_three_destination_airports() {
    let (dir, _, yaml) = make_dataset();
    let out = dir.path().join("q3.csv");
    let lines = run_question(&yaml, &out, AggregateSpec::new(Question::TopDestinationAirports));
    assert_eq!(
        lines,
        vec![
            RESULT_HEADER,
            "\"John F Kennedy International Airport (KJFK), New York, United States\"3",
            "\"Toronto Pearson International Airport (CYYZ), Toronto, Canada\"3",
            "\"Vancouver International Airport (CYVR), Vancouver, Canada\"2",
        ]
    );
}

/// Question 4 with the delimited layout, and question 5 altitude changes.
#[test]
fn questions_four_and_five() {
    let (dir, csv, _) = make_dataset();
    let out = dir.path().join("q4.csv");
    RouteQuery::new()
        .data(&csv)
        .output(&out)
        .record_layout(RecordLayout::Delimited)
        .run(&QuerySpec::Aggregate(AggregateSpec::new(Question::TopDestinationCities).with_limit(2)))
        .unwrap();
    assert_eq!(read_lines(&out), vec![RESULT_HEADER, "\"New York, United States\",3", "\"Toronto, Canada\",3"]);

    let out = dir.path().join("q5.csv");
    let lines = run_question(&csv, &out, AggregateSpec::new(Question::LargestAltitudeChanges));
    assert_eq!(
        lines,
        vec![RESULT_HEADER, "CYYC-CYYZ2988", "KJFK-CYYZ556", "CYYZ-CYVR555", "EGLL-CYYZ486", "CYUL-CYVR104"]
    );
}

/// N = 0 writes only the header; a direction override flips the order.
#[test]
fn header_only_and_direction_override() {
    let (dir, csv, _) = make_dataset();
    let out = dir.path().join("q.csv");
    let lines = run_question(&csv, &out, AggregateSpec::new(Question::TopAirlinesToCountry).with_limit(0));
    assert_eq!(lines, vec![RESULT_HEADER]);

    let lines = run_question(
        &csv,
        &out,
        AggregateSpec::new(Question::LeastServedCountries).with_direction(SortDirection::Desc).with_limit(1),
    );
    assert_eq!(lines, vec![RESULT_HEADER, "Canada5"]);
}

/// Each filter shape renders its context header once, then one line per route.
#[test]
fn filter_queries_render_report_lines() {
    let (dir, csv, _) = make_dataset();
    let out = dir.path().join("filter.txt");
    let q = RouteQuery::new().data(&csv).output(&out);

    let report = q.run(&QuerySpec::Filter(FilterSpec::airline_to_country("ACA", "Canada"))).unwrap();
    assert_eq!(report, QueryReport::Filtered { output: out.clone(), matched: 3 });
    assert_eq!(
        read_lines(&out),
        vec![
            "FLIGHTS TO Canada BY Air Canada (ACA):",
            "FROM: CYYZ, Toronto, Canada TO: Vancouver International Airport (CYVR), Vancouver",
            "FROM: CYUL, Montreal, Canada TO: Vancouver International Airport (CYVR), Vancouver",
            "FROM: EGLL, London, United Kingdom TO: Toronto Pearson International Airport (CYYZ), Toronto",
        ]
    );

    q.run(&QuerySpec::Filter(FilterSpec::country_to_city("United States", "Toronto", "Canada"))).unwrap();
    assert_eq!(
        read_lines(&out),
        vec![
            "FLIGHTS FROM United States TO Toronto, Canada:",
            "AIRLINE: American Airlines (AAL) ORIGIN: John F Kennedy International Airport (KJFK), New York",
        ]
    );

    q.run(&QuerySpec::Filter(FilterSpec::city_to_city("London", "United Kingdom", "New York", "United States")))
        .unwrap();
    assert_eq!(
        read_lines(&out),
        vec!["FLIGHTS FROM London, United Kingdom TO New York, United States:", "AIRLINE: British Airways (BAW) ROUTE: EGLL-KJFK"]
    );
}

/// A filter with zero matches writes exactly the marker line.
#[test]
fn filter_without_matches_writes_marker() {
    let (dir, csv, _) = make_dataset();
    let out = dir.path().join("none.txt");
    let report = RouteQuery::new()
        .data(&csv)
        .output(&out)
        .run(&QuerySpec::Filter(FilterSpec::airline_to_country("AC", "Canada")))
        .unwrap();
    assert_eq!(report, QueryReport::Filtered { output: out.clone(), matched: 0 });
    assert_eq!(fs::read_to_string(&out).unwrap(), format!("{}\n", NO_RESULTS));
}

/// Same input and query twice: byte-identical output, no temp files left behind.
#[test]
fn reruns_are_byte_identical() {
    let (dir, _, yaml) = make_dataset();
    let out = dir.path().join("again.csv");
    let spec = QuerySpec::Aggregate(AggregateSpec::new(Question::TopDestinationAirports));
    let q = RouteQuery::new().data(&yaml).output(&out);

    q.run(&spec).unwrap();
    let first = fs::read(&out).unwrap();
    q.run(&spec).unwrap();
    let second = fs::read(&out).unwrap();
    assert_eq!(first, second);

    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

/// JSON export for both query kinds.
#[test]
fn json_export() {
    let (dir, csv, _) = make_dataset();
    let out = dir.path().join("q1.json");
    RouteQuery::new()
        .data(&csv)
        .output(&out)
        .format(ExportFormat::Json)
        .run(&QuerySpec::Aggregate(AggregateSpec::new(Question::TopAirlinesToCountry).with_limit(1)))
        .unwrap();
    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(v, serde_json::json!([{ "subject": "Air Canada (ACA)", "statistic": 3 }]));

    let out = dir.path().join("filter.json");
    let q = RouteQuery::new().data(&csv).output(&out).format(ExportFormat::Json);
    q.run(&QuerySpec::Filter(FilterSpec::city_to_city("London", "United Kingdom", "New York", "United States")))
        .unwrap();
    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(v[0]["airline_code"], "BAW");
    assert_eq!(v[0]["to_airport_code"], "KJFK");

    q.run(&QuerySpec::Filter(FilterSpec::airline_to_country("ZZZ", "Canada"))).unwrap();
    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(v["message"], NO_RESULTS);
}

/// Missing and unreadable data files fail before any output is written.
#[test]
fn data_file_errors() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.csv");
    let spec = QuerySpec::Aggregate(AggregateSpec::new(Question::TopAirlinesToCountry));

    let err = RouteQuery::new().output(&out).run(&spec).unwrap_err();
    assert!(matches!(err.downcast_ref::<QueryError>(), Some(QueryError::MissingDataFile)));

    let err = RouteQuery::new().data(dir.path().join("missing.csv")).output(&out).run(&spec).unwrap_err();
    assert!(matches!(err.downcast_ref::<QueryError>(), Some(QueryError::FileOpenFailure { .. })));
    assert!(!out.exists());
}

/// When the result cannot be promoted over the destination, the run fails and
/// the temp file is removed.
#[test]
fn failed_promotion_leaves_no_temp_file() {
    let (dir, csv, _) = make_dataset();
    let out = dir.path().join("outdir");
    fs::create_dir(&out).unwrap();

    let spec = QuerySpec::Aggregate(AggregateSpec::new(Question::TopAirlinesToCountry));
    assert!(RouteQuery::new().data(&csv).output(&out).run(&spec).is_err());
    assert!(out.is_dir());

    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}
