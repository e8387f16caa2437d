// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use galatea::engine::Engine;

mod fixtures;
mod profiler;

// Benchmark identity (keep stable):
// - Group name: `scan.document`
// - Case IDs must remain stable across refactors (`small`, `large`,
//   `rescan_processed`).
fn benches_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan.document");

    for (case_id, messages) in [("small", 50usize), ("large", 2000usize)] {
        let catalog = fixtures::catalog(500);
        group.throughput(Throughput::Elements(messages as u64));
        group.bench_function(case_id, move |b| {
            b.iter_batched(
                || {
                    let (doc, _) = fixtures::document(messages);
                    (doc, Engine::new(catalog.clone()))
                },
                |(mut doc, mut engine)| {
                    engine.document_ready(&mut doc);
                    black_box(doc)
                },
                criterion::BatchSize::SmallInput,
            )
        });
    }

    {
        // Marker-set fast path: everything already substituted.
        let catalog = fixtures::catalog(500);
        let (mut doc, _) = fixtures::document(500);
        let mut engine = Engine::new(catalog);
        engine.document_ready(&mut doc);
        group.bench_function("rescan_processed", move |b| {
            b.iter(|| {
                engine.document_ready(&mut doc);
                black_box(doc.root())
            })
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = profiler::criterion();
    targets = benches_scan
}
criterion_main!(benches);
