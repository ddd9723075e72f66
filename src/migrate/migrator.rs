//! Migrator: cross-rank particle movement, implemented as `rebuild` preceded by
//! a transport round-trip that relocates departing particles' data to their new
//! owning rank and translates their destination element from global to local id.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::core::column_store::ColumnSchema;
use crate::core::column_store::ColumnStore;
use crate::core::container::ScsContainer;
use crate::error::ScsError;
use crate::migrate::transport::{PeerMessage, Transport};

impl<S: ColumnSchema> ScsContainer<S> {
    /// `new_element`/`new_rank` are defined for every live slot (by slot index,
    /// length `capacity()`). For particles staying on `self_rank`, `new_element`
    /// is this container's own local element numbering; for particles leaving,
    /// it names a local element (typically a ghost/shared element) whose global
    /// id is shipped so the destination rank can resolve its own local id for
    /// the same element. Requires the container to have been built with global
    /// element ids.
    pub fn migrate(
        &mut self,
        transport: &dyn Transport,
        new_element: &[i32],
        new_rank: &[i32],
    ) -> Result<(), ScsError> {
        let world_size = transport.world_size();
        let self_rank = transport.self_rank();
        let span = tracing::debug_span!("migrate", self_rank, world_size);
        let _enter = span.enter();

        // Step 1: count outgoing particles per destination rank, all-to-all the counts.
        let send_counts_atomic: Vec<AtomicU32> = (0..world_size).map(|_| AtomicU32::new(0)).collect();
        self.for_each_particle(|_element_id, slot, mask| {
            if mask {
                let r = new_rank[slot];
                if r >= 0 && r as usize != self_rank {
                    send_counts_atomic[r as usize].fetch_add(1, Ordering::Relaxed);
                }
            }
        });
        let send_counts: Vec<u32> = send_counts_atomic
            .iter()
            .map(|a| a.load(Ordering::Relaxed))
            .collect();
        let recv_counts = transport.all_to_all(&send_counts)?;
        tracing::debug!(?send_counts, ?recv_counts, "migrate counts exchanged");

        // Step 2: gather outgoing buffers, scattering sequentially since the
        // destination buffers are freshly allocated, disjoint-by-cursor storage.
        let mut send_gids: Vec<Vec<u64>> = send_counts.iter().map(|&n| vec![0u64; n as usize]).collect();
        let mut send_columns: Vec<ColumnStore> = send_counts
            .iter()
            .map(|&n| self.schema().empty_columns(n as usize))
            .collect();
        let mut cursors = vec![0u32; world_size];
        let mut departing = new_element.to_vec();

        for (_element_id, slot, mask) in self.iter_slots() {
            if !mask {
                continue;
            }
            let rank = new_rank[slot];
            if rank < 0 || rank as usize == self_rank {
                continue;
            }
            let rank = rank as usize;
            let dest_elem = new_element[slot];
            debug_assert!(dest_elem >= 0, "migrating particle must name a valid destination element");
            let gid = self.gid_of_element(dest_elem as u32)?;
            let idx = cursors[rank] as usize;
            cursors[rank] += 1;
            send_gids[rank][idx] = gid;
            send_columns[rank].copy_slot(idx, self.columns_ref(), slot);
            departing[slot] = -1;
        }

        // Step 3/4/5: post sends, wait for receives.
        let outgoing: Vec<Option<PeerMessage>> = (0..world_size)
            .map(|peer| {
                if peer != self_rank && send_counts[peer] > 0 {
                    Some(PeerMessage {
                        gids: std::mem::take(&mut send_gids[peer]),
                        columns: std::mem::replace(&mut send_columns[peer], ColumnStore::empty()),
                    })
                } else {
                    None
                }
            })
            .collect();
        let incoming = transport.exchange(outgoing, &recv_counts)?;

        let mut recv_gids: Vec<u64> = Vec::new();
        let mut recv_parts: Vec<ColumnStore> = Vec::new();
        for msg in incoming.into_iter().flatten() {
            recv_gids.extend(msg.gids);
            recv_parts.push(msg.columns);
        }
        let recv_columns = ColumnStore::concat(&recv_parts, self.schema());

        // Step 6: translate received global element ids to local ids.
        let mut recv_local_elements = Vec::with_capacity(recv_gids.len());
        for gid in &recv_gids {
            recv_local_elements.push(self.local_element_of_gid(*gid)?);
        }

        // Step 7/8: drop departed slots, rebuild with the received tail.
        tracing::debug!(received = recv_local_elements.len(), "migrate rebuilding with received tail");
        self.rebuild(&departing, Some(&recv_local_elements), Some(&recv_columns))
    }
}
