use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use glyphgrid_data::{Atlas, PixelFormat};
use glyphgrid_sprite::{SpriteFace, SpriteMetrics};

fn bench_face() -> SpriteFace {
    SpriteFace::new(SpriteMetrics {
        cell_width: 18,
        cell_height: 36,
        line_thickness: 2,
        heavy_thickness: None,
        underline_position: 32,
        underline_thickness: 2,
    })
}

fn bench_box_drawing(c: &mut Criterion) {
    let face = bench_face();
    c.bench_function("box_drawing_light_cross", |b| {
        b.iter(|| {
            let mut atlas = Atlas::new(64, PixelFormat::Grayscale);
            black_box(face.render_glyph(&mut atlas, black_box(0x253C)).unwrap())
        });
    });
}

fn bench_arc(c: &mut Criterion) {
    let face = bench_face();
    c.bench_function("arc_supersampled", |b| {
        b.iter(|| {
            let mut atlas = Atlas::new(64, PixelFormat::Grayscale);
            black_box(face.render_glyph(&mut atlas, black_box(0x256D)).unwrap())
        });
    });
}

fn bench_braille(c: &mut Criterion) {
    let face = bench_face();
    c.bench_function("braille_full", |b| {
        b.iter(|| {
            let mut atlas = Atlas::new(64, PixelFormat::Grayscale);
            black_box(face.render_glyph(&mut atlas, black_box(0x28FF)).unwrap())
        });
    });
}

criterion_group!(benches, bench_box_drawing, bench_arc, bench_braille);
criterion_main!(benches);
