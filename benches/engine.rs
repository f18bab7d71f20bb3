//! Benchmarks for calendar arithmetic and grid virtualization.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(clippy::expect_used, clippy::cast_precision_loss)]

use std::cell::RefCell;
use std::rc::Rc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gridcal::grid::viewport::ViewportVirtualizer;
use gridcal::grid::{Column, GridHooks, MemorySurface, Surface};
use gridcal::{CalendarKind, Grid, GridOptions, Period};
use serde_json::{json, Value};

/// Convert a run of consecutive Gregorian days into each other calendar
fn bench_conversion(c: &mut Criterion) {
    let start = CalendarKind::Gregorian
        .new_date(2000, 1, 1)
        .expect("valid start date");
    let days: Vec<_> = (0..365)
        .map(|i| start.add(i, Period::Day).expect("in range"))
        .collect();

    let mut group = c.benchmark_group("convert_year");
    group.throughput(Throughput::Elements(days.len() as u64));
    for kind in [CalendarKind::Islamic, CalendarKind::UmmAlQura] {
        group.bench_with_input(BenchmarkId::from_parameter(kind), &days, |b, days| {
            b.iter(|| {
                for d in days {
                    black_box(d.convert(kind).expect("convertible"));
                }
            })
        });
    }
    group.finish();
}

/// Format then parse a date with a name-heavy pattern
fn bench_format_parse(c: &mut Criterion) {
    let date = CalendarKind::UmmAlQura
        .new_date(1445, 9, 1)
        .expect("valid date");
    let pattern = "DD, d MM yyyy";
    let text = date.format(pattern);

    c.bench_function("format_umm_al_qura", |b| {
        b.iter(|| black_box(date.format(black_box(pattern))))
    });
    c.bench_function("parse_umm_al_qura", |b| {
        b.iter(|| {
            CalendarKind::UmmAlQura
                .parse(black_box(pattern), black_box(&text))
                .expect("parses")
        })
    });
}

/// Page switch plus visible range over a paged virtual canvas
fn bench_visible_range(c: &mut Criterion) {
    let mut viewport = ViewportVirtualizer::new(25.0, 1_000_000.0);
    viewport.set_viewport(800.0, 600.0);
    viewport.set_row_count(1_000_000);
    let height = 1_000_000.0 * 25.0;

    c.bench_function("visible_range_1m_rows", |b| {
        let mut y = 0.0;
        b.iter(|| {
            y = (y + 9_973.0) % height;
            black_box(viewport.scroll_to(black_box(y)));
            black_box(viewport.visible_range())
        })
    });
}

fn rows(n: usize) -> Vec<Value> {
    (0..n)
        .map(|i| json!({"id": i, "name": format!("row {i}"), "qty": i % 97}))
        .collect()
}

/// Full invalidate and render of the viewport into a memory surface
fn bench_render(c: &mut Criterion) {
    let surface: Rc<RefCell<dyn Surface>> = Rc::new(RefCell::new(MemorySurface::new()));
    let columns = vec![
        Column::new("id", "ID", "id"),
        Column::new("name", "Name", "name"),
        Column::new("qty", "Qty", "qty"),
    ];
    let grid = Grid::new(
        surface,
        Box::new(rows(100_000)),
        columns,
        GridOptions::default(),
        GridHooks::default(),
    );
    grid.resize_canvas(800.0, 600.0);

    c.bench_function("render_viewport", |b| {
        b.iter(|| grid.invalidate())
    });

    c.bench_function("scroll_and_render", |b| {
        let mut y = 0.0;
        b.iter(|| {
            y = (y + 1_234.0) % 2_000_000.0;
            grid.scroll_to(black_box(y));
        })
    });
}

criterion_group!(
    benches,
    bench_conversion,
    bench_format_parse,
    bench_visible_range,
    bench_render,
);

criterion_main!(benches);
