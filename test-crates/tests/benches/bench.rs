use criterion::BenchmarkId;
use criterion::Throughput;
use criterion::{criterion_group, criterion_main, Criterion};
use test::wasms::TestWasm;
use wasm_marshal_host::prelude::*;

/// compile a module
pub fn wasm_module_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("wasm_module_compile");

    for wasm in [TestWasm::Empty, TestWasm::Marshal] {
        group.bench_function(BenchmarkId::new("wasm_module_compile", wasm.name()), |b| {
            b.iter(|| {
                wasm.module();
            })
        });
    }

    group.finish()
}

/// allocate then free text of various sizes
pub fn allocate_free(c: &mut Criterion) {
    let mut group = c.benchmark_group("allocate_free");
    let mut allocator = TestWasm::Marshal.allocator();

    for n in [0, 1, 1_000, 1_000_000] {
        group.throughput(Throughput::Bytes(n as _));
        let text = "x".repeat(n);
        group.bench_with_input(BenchmarkId::new("text", n), &text, |b, text| {
            b.iter(|| {
                let allocation = allocator.allocate(text.as_str()).unwrap();
                allocator.free(allocation).unwrap();
            });
        });
    }

    group.bench_function("number", |b| {
        b.iter(|| {
            let allocation = allocator.allocate(f64::MAX).unwrap();
            allocator.free(allocation).unwrap();
        });
    });

    group.finish()
}

/// have the guest produce a string and take it
pub fn take_string(c: &mut Criterion) {
    let mut group = c.benchmark_group("take_string");
    let mut allocator = TestWasm::Marshal.allocator();

    group.bench_function("greeting", |b| {
        b.iter(|| {
            let descriptor_ptr = allocator.guest_mut().produce_text().unwrap();
            allocator.take_string(descriptor_ptr).unwrap();
        });
    });

    group.finish()
}

criterion_group!(benches, wasm_module_compile, allocate_free, take_string);

criterion_main!(benches);
