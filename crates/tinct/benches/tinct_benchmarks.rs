use criterion::{Criterion, black_box, criterion_group, criterion_main};
use tinct::{
    ColorRole, ComputedDefaults, OverrideSet, Rgb, SurfaceSet, TEXT_CONTRAST, ThemeId,
    contrast_ratio, derive, resolve_against_all, resolve_against_one,
};

fn hex(s: &str) -> Rgb {
    s.parse().unwrap()
}

fn bench_color_math(c: &mut Criterion) {
    let mut group = c.benchmark_group("tinct/color");
    let blue = hex("#3b82f6");

    group.bench_function("parse_hex", |b| {
        b.iter(|| black_box("#3b82f6").parse::<Rgb>());
    });

    group.bench_function("hsl_round_trip", |b| {
        b.iter(|| black_box(blue).to_hsl().to_rgb());
    });

    group.bench_function("contrast_ratio", |b| {
        b.iter(|| contrast_ratio(black_box(blue), black_box(Rgb::WHITE)));
    });

    group.finish();
}

fn bench_contrast_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("tinct/contrast");
    let surfaces = [Rgb::WHITE, hex("#f3f4f6"), hex("#e5e7eb"), hex("#f9fafb")];

    group.bench_function("resolve_against_one/passing", |b| {
        b.iter(|| resolve_against_one(black_box(hex("#111827")), Rgb::WHITE, TEXT_CONTRAST));
    });

    group.bench_function("resolve_against_one/search", |b| {
        b.iter(|| resolve_against_one(black_box(hex("#777777")), Rgb::WHITE, TEXT_CONTRAST));
    });

    group.bench_function("resolve_against_one/unreachable", |b| {
        b.iter(|| resolve_against_one(black_box(hex("#ffff00")), Rgb::WHITE, 21.0));
    });

    group.bench_function("resolve_against_all/4_surfaces", |b| {
        b.iter(|| resolve_against_all(black_box(hex("#9ca3af")), &surfaces, TEXT_CONTRAST));
    });

    group.finish();
}

fn bench_derive(c: &mut Criterion) {
    let mut group = c.benchmark_group("tinct/palette");
    let surfaces = SurfaceSet::from(vec![Rgb::WHITE, hex("#f3f4f6"), hex("#e5e7eb")]);
    let overrides = OverrideSet::new()
        .with(ColorRole::Secondary, hex("#9ca3af"))
        .with(ColorRole::Accent, hex("#fbbf24"));

    group.bench_function("derive/defaults", |b| {
        b.iter(|| {
            derive(
                ThemeId::Light,
                &mut OverrideSet::new(),
                &SurfaceSet::new(),
                &ComputedDefaults::FALLBACK,
            )
        });
    });

    group.bench_function("derive/repairs", |b| {
        b.iter(|| {
            let mut effective = overrides.clone();
            derive(ThemeId::Light, &mut effective, &surfaces, &ComputedDefaults::FALLBACK)
        });
    });

    group.finish();
}

criterion_group!(benches, bench_color_math, bench_contrast_search, bench_derive);
criterion_main!(benches);
