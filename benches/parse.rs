use criterion::{Criterion, black_box, criterion_group, criterion_main};
use std::fmt::Write;
use zinc_frame::header::{parse_header_line, tokenize_column};
use zinc_frame::{ParseOptions, parse_zinc};

const COLUMNS: usize = 16;
const ROWS: usize = 288;
const UNITS: [&str; 4] = ["°F", "%", "cfm", "kW"];

fn column_definition(index: usize) -> String {
    format!(
        "v{i} id:@p:demo:r:{i:08x} \"Building One Point {i}\" navName:\"Point {i}\" point his \
         siteRef:@p:demo:r:site \"Building One\" curVal:{i}.5{unit} curStatus:\"ok\" \
         kind:\"Number\" unit:\"{unit}\" tz:\"Los_Angeles\" sensor cur precision:1",
        i = index,
        unit = UNITS[index % UNITS.len()]
    )
}

fn wide_header() -> String {
    let mut header = String::from("ts disKey:\"ui::timestamp\" tz:\"Los_Angeles\"");
    for index in 0..COLUMNS {
        header.push(',');
        header.push_str(&column_definition(index));
    }
    header
}

/// A day of five-minute samples across every column
fn medium_payload() -> String {
    let mut text = String::from("ver:\"3.0\" view:\"chart\" hisLimit:10000\n");
    text.push_str(&wide_header());
    text.push('\n');
    for row in 0..ROWS {
        let minutes = row * 5;
        write!(
            text,
            "2020-05-18T{:02}:{:02}:00-07:00 Los_Angeles",
            minutes / 60,
            minutes % 60
        )
        .unwrap();
        for column in 0..COLUMNS {
            if (row + column) % 7 == 0 {
                text.push_str(",N");
            } else {
                write!(text, ",{}.{}{}", row, column, UNITS[column % UNITS.len()]).unwrap();
            }
        }
        text.push('\n');
    }
    text
}

fn bench_header(c: &mut Criterion) {
    let definition = column_definition(3);
    let header = wide_header();

    c.bench_function("tokenize_column", |b| {
        b.iter(|| tokenize_column(black_box(&definition)))
    });
    c.bench_function("parse_header_line", |b| {
        b.iter(|| parse_header_line(black_box(&header)).unwrap())
    });
}

fn bench_parse(c: &mut Criterion) {
    let payload = medium_payload();
    let options = ParseOptions::default();

    c.bench_function("parse_zinc_16x288", |b| {
        b.iter(|| parse_zinc(black_box(&payload), &options).unwrap())
    });
}

criterion_group!(benches, bench_header, bench_parse);
criterion_main!(benches);
