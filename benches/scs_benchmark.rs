//! Manual `Instant`-based benchmarks for construction, `for_each_particle`, and
//! `rebuild`. Run with `cargo run --release --bin scs_benchmark` style timing
//! rather than a criterion harness, matching the rest of the crate's
//! dependency-light test tooling.

use std::sync::atomic::{AtomicI32, Ordering};
use std::time::Instant;

use rand::Rng;
use scs_particles::config::ScsConfig;
use scs_particles::core::{Column, ColumnSchema, ColumnStore, ScsContainer};

#[derive(Clone)]
struct BenchSchema;

impl ColumnSchema for BenchSchema {
    fn empty_columns(&self, len: usize) -> ColumnStore {
        ColumnStore::from_columns(vec![Box::new(vec![0.0f64; len]) as Box<dyn Column>])
    }

    fn num_columns(&self) -> usize {
        1
    }
}

fn random_counts(num_elements: usize, max_per_element: u32) -> Vec<u32> {
    let mut rng = rand::rng();
    (0..num_elements)
        .map(|_| rng.random_range(0..=max_per_element))
        .collect()
}

fn time<F: FnOnce() -> R, R>(label: &str, f: F) -> R {
    let start = Instant::now();
    let result = f();
    println!("{label}: {:?}", start.elapsed());
    result
}

fn main() {
    let num_elements = 50_000;
    let counts = random_counts(num_elements, 40);
    let num_particles: usize = counts.iter().map(|&c| c as usize).sum();

    let mut container = time("construct (C=32, sigma=512, V=32)", || {
        ScsContainer::new(
            ScsConfig::new(32, 512, 32),
            BenchSchema,
            num_elements,
            num_particles,
            &counts,
            None,
        )
        .expect("valid construction")
    });
    println!(
        "  capacity={} rows={} particles={}",
        container.capacity(),
        container.num_rows(),
        container.num_particles()
    );

    time("for_each_particle (read-only pass)", || {
        let mut touched = 0usize;
        container.for_each_particle(|_element_id, _slot, mask| {
            if mask {
                touched += 1;
            }
        });
    });

    let new_element = time("build identity rebuild map", || {
        let out: Vec<AtomicI32> = (0..container.capacity()).map(|_| AtomicI32::new(-1)).collect();
        container.for_each_particle(|element_id, slot, mask| {
            if mask {
                out[slot].store(element_id as i32, Ordering::Relaxed);
            }
        });
        out.into_iter().map(|a| a.into_inner()).collect::<Vec<i32>>()
    });

    time("rebuild (identity, no churn)", || {
        container
            .rebuild(&new_element, None, None)
            .expect("rebuild should succeed")
    });
    println!("  particles after rebuild={}", container.num_particles());
}
