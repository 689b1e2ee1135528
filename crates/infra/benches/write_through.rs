use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput,
};

use stockbook_core::{Aggregate, ProductId};
use stockbook_infra::snapshot::{self, PRODUCTS_KEY};
use stockbook_infra::{InMemoryKeyValueStore, InventoryService, KeyValueStore, MovementRequest};
use stockbook_inventory::{
    Inventory, InventoryCommand, MovementType, ProductInput, UpsertProduct,
};

fn seeded_service(products: usize) -> InventoryService<InMemoryKeyValueStore> {
    let mut inventory = Inventory::new();
    for i in 0..products {
        let command = InventoryCommand::UpsertProduct(UpsertProduct {
            new_id: ProductId::from(format!("p-{i}")),
            input: ProductInput::new(format!("Product {i}"), format!("SKU-{i:05}"))
                .with_quantity(100)
                .with_price(12.0),
        });
        for event in inventory.handle(&command).unwrap() {
            inventory.apply(&event);
        }
    }

    let store = InMemoryKeyValueStore::new();
    snapshot::save(&store, &inventory).unwrap();
    InventoryService::open(store)
}

/// Benchmark: latency of one stock movement including the snapshot write.
fn bench_movement_write_through(c: &mut Criterion) {
    let mut group = c.benchmark_group("movement_write_through");

    for products in [10, 100, 1_000] {
        let service = seeded_service(products);
        let product_id = service.products()[0].id_typed().clone();
        let stored = service.store().get(PRODUCTS_KEY).unwrap().unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(products), &stored, |b, stored| {
            b.iter_batched(
                || {
                    InventoryService::open(InMemoryKeyValueStore::with_entries([(
                        PRODUCTS_KEY,
                        stored.clone(),
                    )]))
                },
                |mut service| {
                    service
                        .apply_movement(MovementRequest::new(
                            product_id.clone(),
                            MovementType::Out,
                            1,
                        ))
                        .unwrap()
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

/// Benchmark: rehydrating a session from stored snapshots.
fn bench_snapshot_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot_load");

    for products in [100, 1_000, 10_000] {
        let store = seeded_service(products).into_store();
        group.throughput(Throughput::Elements(products as u64));
        group.bench_with_input(BenchmarkId::from_parameter(products), &store, |b, store| {
            b.iter(|| black_box(snapshot::load(store)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_movement_write_through, bench_snapshot_load);
criterion_main!(benches);
