// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the lembar-render crate: page composition alone and
// the full render (compose, PDF emission, canonical form) for a typical
// multi-page delivery note.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use lembar_core::{DocumentHeader, ItemRow, OrganizationProfile, TemplateConfig, Variant};
use lembar_render::DocumentRenderer;

fn fixture() -> (DocumentHeader, Vec<ItemRow>) {
    let header = DocumentHeader {
        number: "SJ-2026-001".into(),
        date: Some("2026-03-14".into()),
        organization: OrganizationProfile {
            name: Some("PT Sinar Abadi".into()),
            ..Default::default()
        },
        ..Default::default()
    };
    let items = (0..120)
        .map(|i| ItemRow::new(format!("Barang nomor {i}"), (i % 7) as f64 + 0.25).with_unit("pcs"))
        .collect();
    (header, items)
}

/// Compose 120 rows into pages for both variants, no PDF.
fn bench_compose(c: &mut Criterion) {
    let renderer = DocumentRenderer::new(TemplateConfig::default()).unwrap();
    let (header, items) = fixture();
    for variant in Variant::ALL {
        let parties = renderer.template().signatures.parties(variant).to_vec();
        c.bench_function(&format!("compose 120 rows ({variant})"), |b| {
            b.iter(|| {
                let pages = renderer
                    .compose(black_box(&items), &header, variant, &parties)
                    .unwrap();
                black_box(pages);
            });
        });
    }
}

/// Full render of the same document, including the canonicalisation pass.
fn bench_render(c: &mut Criterion) {
    let renderer = DocumentRenderer::new(TemplateConfig::default()).unwrap();
    let (header, items) = fixture();
    for variant in Variant::ALL {
        c.bench_function(&format!("render 120 rows ({variant})"), |b| {
            b.iter(|| {
                let doc = renderer
                    .render(black_box(items.clone()), &header, variant)
                    .unwrap();
                black_box(doc.bytes);
            });
        });
    }
}

criterion_group!(benches, bench_compose, bench_render);
criterion_main!(benches);
