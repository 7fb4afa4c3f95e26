//! Performance benchmarks for the pose angle pipeline stages

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use opencv::{
    core::{Mat, Scalar, CV_8UC3},
    prelude::*,
};
use pose_angles::{
    annotation::render_overlay,
    codec::{decode_image, encode_data_uri, encode_png},
    geometry::{angle_at_vertex, Point2D},
    joints::{extract_angles, landmark_pixels, REQUIRED_LANDMARKS},
    landmarks::{LandmarkSet, NormalizedLandmark},
    pipeline::analyze_frame,
    provider::StaticProvider,
};
use std::time::Duration;

fn pose() -> LandmarkSet {
    REQUIRED_LANDMARKS
        .iter()
        .enumerate()
        .fold(LandmarkSet::new(), |set, (i, landmark)| {
            let t = i as f32 / 12.0;
            set.with(*landmark, NormalizedLandmark::new(0.3 + 0.4 * (t * 6.0).sin().abs(), 0.1 + 0.8 * t))
        })
}

fn frame(width: i32, height: i32) -> Mat {
    Mat::new_rows_cols_with_default(height, width, CV_8UC3, Scalar::new(90.0, 120.0, 150.0, 0.0)).unwrap()
}

/// Benchmark the raw vertex angle computation
fn bench_geometry(c: &mut Criterion) {
    let points: Vec<(Point2D, Point2D, Point2D)> = (0..1000)
        .map(|i| {
            let t = f64::from(i) * 0.01;
            (
                Point2D::new(t.cos() * 100.0, t.sin() * 100.0),
                Point2D::new(0.0, 0.0),
                Point2D::new((t * 1.7).cos() * 80.0, (t * 1.7).sin() * 80.0),
            )
        })
        .collect();

    c.bench_function("angle_at_vertex_1000", |b| {
        b.iter(|| {
            for &(a, v, c) in &points {
                black_box(angle_at_vertex(a, v, c));
            }
        });
    });
}

/// Benchmark landmark to angle extraction
fn bench_extraction(c: &mut Criterion) {
    let set = pose();
    c.bench_function("extract_angles", |b| {
        b.iter(|| extract_angles(black_box(&set), 1280, 720).unwrap());
    });
}

/// Benchmark overlay drawing and PNG encoding at common frame sizes
fn bench_render_and_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("overlay");
    group.measurement_time(Duration::from_secs(10));

    let set = pose();
    for (width, height) in [(640, 480), (1280, 720), (1920, 1080)] {
        let image = frame(width, height);
        let pixels = landmark_pixels(&set, width, height).unwrap();
        let label = format!("{width}x{height}");

        group.bench_with_input(BenchmarkId::new("render", &label), &image, |b, image| {
            b.iter(|| render_overlay(black_box(image), &pixels).unwrap());
        });

        let overlay = render_overlay(&image, &pixels).unwrap();
        group.bench_with_input(BenchmarkId::new("data_uri", &label), &overlay, |b, overlay| {
            b.iter(|| encode_data_uri(black_box(overlay)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark the full request pipeline with a fixed provider
fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    group.measurement_time(Duration::from_secs(10));

    let factory = StaticProvider::new(Some(pose()));
    let png = encode_png(&frame(640, 480)).unwrap();

    group.bench_function("decode", |b| {
        b.iter(|| decode_image(black_box(&png)).unwrap());
    });
    group.bench_function("analyze_frame", |b| {
        b.iter(|| analyze_frame(&factory, black_box(&png)).unwrap());
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_geometry,
    bench_extraction,
    bench_render_and_encode,
    bench_pipeline
);
criterion_main!(benches);
