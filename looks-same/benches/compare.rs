use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use looks_same::{create_diff, equal, lab, CompareOptions, DiffOptions, Img, ImgVec, RGB8};

/// Gradient with a deterministic sprinkle of small changes.
fn screenshot(width: usize, height: usize, perturb: bool) -> ImgVec<RGB8> {
    let pixels = (0..height)
        .flat_map(|y| {
            (0..width).map(move |x| {
                let v = ((x as f32 / width as f32) * 200.0) as u8;
                let v = if perturb {
                    v.saturating_add(((x * y) % 10) as u8)
                } else {
                    v
                };
                RGB8::new(v, v, v)
            })
        })
        .collect();
    Img::new(pixels, width, height)
}

fn bench_color_distance(c: &mut Criterion) {
    let a = RGB8::new(120, 80, 60);
    let b = RGB8::new(118, 84, 61);
    c.bench_function("ciede2000", |bench| {
        bench.iter(|| lab::distance(black_box(a), black_box(b)));
    });
}

fn bench_compare(c: &mut Criterion) {
    let mut group = c.benchmark_group("compare");
    for size in [128usize, 512] {
        let reference = screenshot(size, size, false);
        let current = screenshot(size, size, true);
        let options = CompareOptions::default();

        group.bench_with_input(BenchmarkId::new("equal_identical", size), &size, |b, _| {
            b.iter(|| equal(black_box(&reference), black_box(&reference), &options));
        });
        group.bench_with_input(BenchmarkId::new("equal", size), &size, |b, _| {
            b.iter(|| equal(black_box(&reference), black_box(&current), &options));
        });
        let diff_options = DiffOptions::new(options.clone());
        group.bench_with_input(BenchmarkId::new("create_diff", size), &size, |b, _| {
            b.iter(|| create_diff(black_box(&reference), black_box(&current), &diff_options));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_color_distance, bench_compare);
criterion_main!(benches);
