//! The SCS container: owns the HCS plus layout tables, and exposes typed column
//! access, parallel iteration, and the two mutators (`rebuild`, `migrate`).
//!
//! Borrowed column views share `&self`'s lifetime, and mutation requires `&mut
//! self`: the borrow checker enforces the "no view survives past the next
//! mutation" rule for free, so there is no runtime generation counter.

use std::sync::atomic::{AtomicU32, Ordering};

use rayon::prelude::*;

use crate::config::ScsConfig;
use crate::core::column_store::{ColumnSchema, ColumnStore};
use crate::core::gid_map::GidMap;
use crate::core::layout::{build_layout, Layout};
use crate::core::sigma_sort::sigma_sort;
use crate::error::ScsError;

pub struct ScsContainer<S: ColumnSchema> {
    config: ScsConfig,
    schema: S,
    num_elements: usize,
    num_particles: usize,
    layout: Layout,
    mask: Vec<u8>,
    columns: ColumnStore,
    gids: Option<GidMap>,
}

impl<S: ColumnSchema> ScsContainer<S> {
    pub fn new(
        config: ScsConfig,
        schema: S,
        num_elements: usize,
        num_particles: usize,
        counts: &[u32],
        gids: Option<&[u64]>,
    ) -> Result<Self, ScsError> {
        config.validate()?;
        if counts.len() != num_elements {
            return Err(ScsError::CountsLengthMismatch {
                counts_len: counts.len(),
                num_elements,
            });
        }
        let summed: usize = counts.iter().map(|&c| c as usize).sum();
        if summed != num_particles {
            return Err(ScsError::CountMismatch {
                summed,
                num_particles,
            });
        }

        let sorted = sigma_sort(counts, config.sigma);
        let layout = build_layout(&sorted, num_elements, config.chunk_size, config.slice_width);
        let capacity = layout.capacity();

        let columns = schema.empty_columns(capacity);
        let mask = fill_mask(&layout, counts, config.chunk_size, num_elements);
        debug_assert_eq!(mask.iter().filter(|&&m| m != 0).count(), num_particles);

        let gid_map = gids.map(GidMap::build);
        tracing::debug!(
            num_elements,
            num_particles,
            num_chunks = layout.num_chunks,
            num_slices = layout.num_slices,
            capacity,
            "constructed SCS container"
        );

        Ok(Self {
            config,
            schema,
            num_elements,
            num_particles,
            layout,
            mask,
            columns,
            gids: gid_map,
        })
    }

    pub fn config(&self) -> ScsConfig {
        self.config
    }

    pub fn schema(&self) -> &S {
        &self.schema
    }

    pub fn capacity(&self) -> usize {
        self.mask.len()
    }

    pub fn num_rows(&self) -> usize {
        self.layout.num_rows()
    }

    pub fn num_chunks(&self) -> usize {
        self.layout.num_chunks
    }

    pub fn num_slices(&self) -> usize {
        self.layout.num_slices
    }

    pub fn num_particles(&self) -> usize {
        self.num_particles
    }

    pub fn num_elements(&self) -> usize {
        self.num_elements
    }

    pub fn mask(&self) -> &[u8] {
        &self.mask
    }

    pub fn row_to_element(&self) -> &[u32] {
        &self.layout.row_to_element
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn column<T: 'static>(&self, index: usize) -> &[T] {
        self.columns.column::<T>(index)
    }

    pub fn column_mut<T: 'static>(&mut self, index: usize) -> &mut [T] {
        self.columns.column_mut::<T>(index)
    }

    pub(crate) fn columns_ref(&self) -> &ColumnStore {
        &self.columns
    }

    pub fn gid_of_element(&self, element: u32) -> Result<u64, ScsError> {
        self.gids
            .as_ref()
            .map(|g| g.gid_of(element))
            .ok_or(ScsError::MissingGidMap)
    }

    pub fn local_element_of_gid(&self, gid: u64) -> Result<u32, ScsError> {
        self.gids
            .as_ref()
            .ok_or(ScsError::MissingGidMap)?
            .element_of(gid)
    }

    /// For every slot (including padding), computes `(element_id, slot_index,
    /// mask)` for slot `slot_index`. Every element id of the `capacity` slots in
    /// the container is visited exactly once, with no ordering guarantee between
    /// slots. `f` must treat concurrent invocations as independent: see the
    /// concurrency model's shared-resource policy.
    pub fn for_each_particle<F>(&self, f: F)
    where
        F: Fn(u32, usize, bool) + Sync,
    {
        let chunk_size = self.config.chunk_size;
        let layout = &self.layout;
        let mask = &self.mask;
        (0..layout.num_slices).into_par_iter().for_each(|slice| {
            let chunk = layout.slice_to_chunk[slice] as usize;
            let start = layout.slice_offsets[slice] as usize;
            let end = layout.slice_offsets[slice + 1] as usize;
            let row_len = (end - start) / chunk_size;
            for slice_row in 0..chunk_size {
                let row = chunk * chunk_size + slice_row;
                let element_id = layout.row_to_element[row];
                for p in 0..row_len {
                    let slot = start + slice_row + p * chunk_size;
                    f(element_id, slot, mask[slot] != 0);
                }
            }
        });
    }

    /// Sequential equivalent of `for_each_particle`, used internally wherever a
    /// mutator needs to scatter into freshly allocated, not-yet-shared storage
    /// (concurrent writes there would need unsynchronized shared mutation, which
    /// safe Rust can't express without per-slot cells).
    pub(crate) fn iter_slots(&self) -> impl Iterator<Item = (u32, usize, bool)> + '_ {
        let chunk_size = self.config.chunk_size;
        let layout = &self.layout;
        let mask = &self.mask;
        (0..layout.num_slices).flat_map(move |slice| {
            let chunk = layout.slice_to_chunk[slice] as usize;
            let start = layout.slice_offsets[slice] as usize;
            let end = layout.slice_offsets[slice + 1] as usize;
            let row_len = (end - start) / chunk_size;
            (0..chunk_size).flat_map(move |slice_row| {
                let row = chunk * chunk_size + slice_row;
                let element_id = layout.row_to_element[row];
                (0..row_len).map(move |p| {
                    let slot = start + slice_row + p * chunk_size;
                    (element_id, slot, mask[slot] != 0)
                })
            })
        })
    }

    /// In-place re-layout after element reassignment, birth, and death.
    /// `new_element[slot] == -1` drops that particle. `tail_elements`/
    /// `tail_columns` append newly born particles (parallel arrays: element id
    /// and attribute payload per new particle).
    pub fn rebuild(
        &mut self,
        new_element: &[i32],
        tail_elements: Option<&[u32]>,
        tail_columns: Option<&ColumnStore>,
    ) -> Result<(), ScsError> {
        let span = tracing::debug_span!("rebuild", prior_particles = self.num_particles);
        let _enter = span.enter();

        let tail_elements = tail_elements.unwrap_or(&[]);
        let chunk_size = self.config.chunk_size;

        // Step 1: count new per-element occupancy by parallel reduction.
        let occupancy: Vec<AtomicU32> = (0..self.num_elements).map(|_| AtomicU32::new(0)).collect();
        self.for_each_particle(|_element_id, slot, mask| {
            if mask {
                let ne = new_element[slot];
                if ne >= 0 {
                    occupancy[ne as usize].fetch_add(1, Ordering::Relaxed);
                }
            }
        });
        for &elem in tail_elements {
            occupancy[elem as usize].fetch_add(1, Ordering::Relaxed);
        }
        let counts: Vec<u32> = occupancy.iter().map(|a| a.load(Ordering::Relaxed)).collect();
        let total_particles: usize = counts.iter().map(|&c| c as usize).sum();

        // Step 2: nothing left -> release and reset.
        if total_particles == 0 {
            self.columns.release();
            self.mask.clear();
            self.layout = build_layout(&[], 0, chunk_size, self.config.slice_width);
            self.num_particles = 0;
            tracing::debug!("rebuild emptied the container");
            return Ok(());
        }

        // Step 3: fresh layout from the new counts.
        let sorted = sigma_sort(&counts, self.config.sigma);
        let new_layout = build_layout(&sorted, self.num_elements, chunk_size, self.config.slice_width);
        let new_num_rows = new_layout.num_rows();

        // Step 4: element -> new row.
        let mut element_to_new_row = vec![0u32; self.num_elements];
        for row in 0..new_num_rows {
            let elem = new_layout.row_to_element[row];
            if (elem as usize) < self.num_elements {
                element_to_new_row[elem as usize] = row as u32;
            }
        }

        // Step 5: fresh storage and per-row write cursors, seeded from each row's
        // chunk's first slice offset.
        let new_capacity = new_layout.capacity();
        let mut new_columns = self.schema.empty_columns(new_capacity);
        let mut new_mask = vec![0u8; new_capacity];

        let mut chunk_first_slice_offset = vec![0u32; new_layout.num_chunks];
        {
            let mut seen = vec![false; new_layout.num_chunks];
            for s in 0..new_layout.num_slices {
                let c = new_layout.slice_to_chunk[s] as usize;
                if !seen[c] {
                    chunk_first_slice_offset[c] = new_layout.slice_offsets[s];
                    seen[c] = true;
                }
            }
        }
        let row_cursor: Vec<AtomicU32> = (0..new_num_rows)
            .map(|row| {
                let chunk = row / chunk_size;
                let slice_row = row % chunk_size;
                AtomicU32::new(chunk_first_slice_offset[chunk] + slice_row as u32)
            })
            .collect();

        // Step 6: scatter live source slots into the new storage.
        for (_old_element_id, slot, mask) in self.iter_slots() {
            if !mask {
                continue;
            }
            let ne = new_element[slot];
            if ne < 0 {
                continue;
            }
            let dest_row = element_to_new_row[ne as usize] as usize;
            let dest_slot = row_cursor[dest_row].fetch_add(chunk_size as u32, Ordering::Relaxed) as usize;
            new_columns.copy_slot(dest_slot, &self.columns, slot);
            new_mask[dest_slot] = 1;
        }

        // Step 7: scatter the tail of newly born particles.
        if let Some(tail_columns) = tail_columns {
            for (i, &elem) in tail_elements.iter().enumerate() {
                let dest_row = element_to_new_row[elem as usize] as usize;
                let dest_slot = row_cursor[dest_row].fetch_add(chunk_size as u32, Ordering::Relaxed) as usize;
                new_columns.copy_slot(dest_slot, tail_columns, i);
                new_mask[dest_slot] = 1;
            }
        }

        // Step 8: atomically (from the caller's point of view) swap the new state in.
        self.columns = new_columns;
        self.mask = new_mask;
        self.layout = new_layout;
        self.num_particles = total_particles;
        tracing::debug!(new_particles = total_particles, "rebuild complete");

        Ok(())
    }

    /// Semantically identical to `rebuild`. This implementation always takes the
    /// full rebuild path; see `SPEC_FULL.md` for the reasoning.
    pub fn reshuffle(
        &mut self,
        new_element: &[i32],
        tail_elements: Option<&[u32]>,
        tail_columns: Option<&ColumnStore>,
    ) -> Result<(), ScsError> {
        self.rebuild(new_element, tail_elements, tail_columns)
    }
}

/// Fills the mask so that for each row `r` mapped to element `e`, the first
/// `counts[e]` column positions of that row are live and the rest are padding.
fn fill_mask(layout: &Layout, counts: &[u32], chunk_size: usize, num_elements: usize) -> Vec<u8> {
    let mut mask = vec![0u8; layout.capacity()];
    for slice in 0..layout.num_slices {
        let chunk = layout.slice_to_chunk[slice] as usize;
        let start = layout.slice_offsets[slice] as usize;
        let end = layout.slice_offsets[slice + 1] as usize;
        let row_len = (end - start) / chunk_size;
        for slice_row in 0..chunk_size {
            let row = chunk * chunk_size + slice_row;
            let element_id = layout.row_to_element[row] as usize;
            let live = if element_id < num_elements {
                counts[element_id]
            } else {
                0
            };
            for p in 0..row_len {
                if (p as u32) < live {
                    let slot = start + slice_row + p * chunk_size;
                    mask[slot] = 1;
                }
            }
        }
    }
    mask
}
