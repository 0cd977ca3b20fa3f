use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use catalog_overlay::{
    character::{Character, CharacterDraft, CharacterPatch},
    controller::list::dedupe_by_id,
    core::store::CatalogStore,
    types::CharacterStatus,
};

fn remote(id: u64) -> Character {
    Character {
        id,
        name: format!("Remote {id}"),
        status: CharacterStatus::Alive,
        species: "Human".to_string(),
        image: format!("https://img/{id}.jpeg"),
    }
}

fn draft(name: &str) -> CharacterDraft {
    CharacterDraft {
        name: name.to_string(),
        status: CharacterStatus::Unknown,
        species: "Alien".to_string(),
        image: String::new(),
    }
}

fn bench_creates(c: &mut Criterion) {
    c.bench_function("store_create_5k", |b| {
        b.iter(|| {
            let mut store = CatalogStore::new();
            for i in 0..5_000u64 {
                let _ = store.create_local(draft(&format!("C{i}")));
            }
        });
    });
}

fn bench_updates(c: &mut Criterion) {
    c.bench_function("store_update_2k", |b| {
        b.iter(|| {
            let mut store = CatalogStore::new();
            store.replace_characters((1..=2_000u64).map(remote).collect());
            for id in 1..=2_000u64 {
                let _ = store.update_local(
                    id,
                    &CharacterPatch {
                        species: Some("Cronenberg".to_string()),
                        ..CharacterPatch::default()
                    },
                );
            }
        });
    });
}

fn bench_filtered(c: &mut Criterion) {
    let mut group = c.benchmark_group("filtered");
    for n in [100u64, 1_000, 10_000] {
        let mut store = CatalogStore::new();
        store.replace_characters((1..=n).map(remote).collect());
        for id in (1..=n).step_by(10) {
            store.delete_local(id);
        }
        group.bench_with_input(BenchmarkId::from_parameter(n), &store, |b, store| {
            b.iter(|| {
                let _ = store.filtered();
            });
        });
    }
    group.finish();
}

fn bench_dedupe_append(c: &mut Criterion) {
    let existing: Vec<Character> = (1..=5_000u64).map(remote).collect();
    let page: Vec<Character> = (4_990..5_010u64).map(remote).collect();
    c.bench_function("dedupe_append_page", |b| {
        b.iter(|| {
            let mut merged = existing.clone();
            merged.extend(page.iter().cloned());
            let _ = dedupe_by_id(merged);
        });
    });
}

criterion_group!(benches, bench_creates, bench_updates, bench_filtered, bench_dedupe_append);
criterion_main!(benches);
