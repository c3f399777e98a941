//! Benchmarks for editing throughput
//!
//! Covers:
//! - Typing into a growing document
//! - Styling and list numbering over many paragraphs
//! - Combined style resolution
//! - Layout and hit-testing

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use richtext_editor::{
    Buffer, BufferCommandExt, DocumentLayout, FixedPitchMeasurer, LayoutConfig, Point,
    SetStyleFlags, TextAttr, TextRange,
};

/// Build a document of `paragraphs` short paragraphs
fn document(paragraphs: usize) -> Buffer {
    let mut buffer = Buffer::new();
    for i in 0..paragraphs {
        buffer.add_paragraph(&format!("Paragraph {i} holds a little sample text to wrap"));
    }
    buffer.discard_edits();
    buffer
}

fn bold() -> TextAttr {
    let mut style = TextAttr::new();
    style.set_bold(true);
    style
}

fn bench_typing(c: &mut Criterion) {
    c.bench_function("type_200_chars", |b| {
        b.iter(|| {
            let mut buffer = Buffer::new();
            for _ in 0..200 {
                let end = buffer.last_position();
                buffer.write_text(end, black_box("a"));
            }
            buffer
        });
    });
}

fn bench_styling(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_style");
    for size in [10, 100, 500] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter_batched(
                || document(size),
                |mut buffer| {
                    let range = TextRange::new(3, buffer.len() - 3);
                    buffer.set_style_ex(
                        range,
                        &bold(),
                        SetStyleFlags::WITH_UNDO | SetStyleFlags::OPTIMIZE,
                    );
                    buffer
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_numbering(c: &mut Criterion) {
    c.bench_function("number_list_200", |b| {
        b.iter_batched(
            || document(200),
            |mut buffer| {
                let all = TextRange::new(0, buffer.len());
                buffer.number_list(all, "Arabic", 1);
                buffer
            },
            BatchSize::LargeInput,
        );
    });
}

fn bench_resolution(c: &mut Criterion) {
    let mut buffer = document(100);
    buffer.set_style(TextRange::new(0, buffer.len() / 2), &bold());
    c.bench_function("combined_style_scan", |b| {
        b.iter(|| {
            let mut bold_positions = 0;
            for pos in (0..buffer.len()).step_by(7) {
                if buffer.combined_style(black_box(pos)).is_bold() {
                    bold_positions += 1;
                }
            }
            bold_positions
        });
    });
}

fn bench_layout(c: &mut Criterion) {
    let buffer = document(200);
    let measurer = FixedPitchMeasurer::default();
    let config = LayoutConfig::default();
    c.bench_function("layout_200_paragraphs", |b| {
        b.iter(|| DocumentLayout::compute(black_box(&buffer), &measurer, &config));
    });

    let layout = DocumentLayout::compute(&buffer, &measurer, &config);
    c.bench_function("hit_test", |b| {
        b.iter(|| layout.hit_test(black_box(Point::new(120, 900))));
    });
}

criterion_group!(
    benches,
    bench_typing,
    bench_styling,
    bench_numbering,
    bench_resolution,
    bench_layout
);
criterion_main!(benches);
