mod common;

use std::sync::Mutex;

use common::ScalarSchema;
use scs_particles::config::ScsConfig;
use scs_particles::core::ScsContainer;
use scs_particles::ColumnSchema;

fn build(counts: &[u32], chunk_size: usize, sigma: usize, slice_width: usize) -> ScsContainer<ScalarSchema> {
    let num_particles: usize = counts.iter().map(|&c| c as usize).sum();
    ScsContainer::new(
        ScsConfig::new(chunk_size, sigma, slice_width),
        ScalarSchema,
        counts.len(),
        num_particles,
        counts,
        None,
    )
    .unwrap()
}

/// Collects `(element_id, slot)` for live slots, via the public `for_each_particle` API.
fn live_slots(container: &ScsContainer<ScalarSchema>) -> Vec<(u32, usize)> {
    let out = Mutex::new(Vec::new());
    container.for_each_particle(|element_id, slot, mask| {
        if mask {
            out.lock().unwrap().push((element_id, slot));
        }
    });
    let mut out = out.into_inner().unwrap();
    out.sort_by_key(|&(_, slot)| slot);
    out
}

/// Invariant 6: rebuilding with every live particle mapped to its current
/// element, and no births, is a no-op on the particle count and payload
/// multiset, reachable only through the public API.
#[test]
fn rebuild_identity_is_idempotent_via_public_api() {
    let mut container = build(&[3, 0, 2, 5], 4, 1, 4);
    for (slot, value) in container.column_mut::<i64>(0).iter_mut().enumerate() {
        *value = (slot * 7 + 1) as i64;
    }

    let mut before: Vec<i64> = live_slots(&container)
        .iter()
        .map(|&(_, slot)| container.column::<i64>(0)[slot])
        .collect();
    before.sort();

    let mut new_element = vec![-1i32; container.capacity()];
    for &(element_id, slot) in &live_slots(&container) {
        new_element[slot] = element_id as i32;
    }
    container.rebuild(&new_element, None, None).unwrap();

    let mut after: Vec<i64> = live_slots(&container)
        .iter()
        .map(|&(_, slot)| container.column::<i64>(0)[slot])
        .collect();
    after.sort();

    assert_eq!(before, after);
    assert_eq!(container.num_particles(), 10);
}

/// Rebuild with a tail of newly born particles appends them and preserves the
/// surviving particles' payload.
#[test]
fn rebuild_with_tail_adds_births() {
    let mut container = build(&[2, 1], 2, 1, 2);
    for (slot, value) in container.column_mut::<i64>(0).iter_mut().enumerate() {
        *value = slot as i64;
    }

    let mut new_element = vec![-1i32; container.capacity()];
    for &(element_id, slot) in &live_slots(&container) {
        new_element[slot] = element_id as i32;
    }

    let tail_elements = [0u32, 1u32];
    let mut tail_columns = container.schema().empty_columns(2);
    tail_columns.column_mut::<i64>(0)[0] = 100;
    tail_columns.column_mut::<i64>(0)[1] = 200;

    container
        .rebuild(&new_element, Some(&tail_elements), Some(&tail_columns))
        .unwrap();

    assert_eq!(container.num_particles(), 5);
    let mut values: Vec<i64> = live_slots(&container)
        .iter()
        .map(|&(_, slot)| container.column::<i64>(0)[slot])
        .collect();
    values.sort();
    assert_eq!(values, vec![0, 1, 2, 100, 200]);
}

/// Dropping every particle assigned to odd slots, via the public API, halves
/// (approximately) the occupancy and never yields a negative or out-of-range
/// element id.
#[test]
fn rebuild_partial_drop_via_public_api() {
    let mut container = build(&[5, 5, 5], 4, 1, 4);
    let mut new_element = vec![-1i32; container.capacity()];
    let mut kept = 0;
    for &(element_id, slot) in &live_slots(&container) {
        if slot % 2 == 0 {
            new_element[slot] = element_id as i32;
            kept += 1;
        }
    }
    container.rebuild(&new_element, None, None).unwrap();
    assert_eq!(container.num_particles(), kept);
    assert_eq!(container.mask().iter().filter(|&&m| m != 0).count(), kept);
}
