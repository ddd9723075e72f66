//! The message transport: the external collaborator `migrate` routes particle
//! movement through. Spec'd capabilities only: all-to-all on fixed-size counts,
//! and non-blocking typed peer-to-peer send/recv with wait-all, addressed by
//! rank.
//!
//! `LocalTransport` is an in-process implementation over `std::sync::mpsc`,
//! useful for running multi-rank scenarios (including round-trip migration
//! tests) inside a single test binary without a real MPI installation.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;

use crate::core::ColumnStore;
use crate::error::ScsError;

/// One peer's worth of outgoing/incoming particle data: global element ids plus
/// their attribute payload, parallel arrays.
pub struct PeerMessage {
    pub gids: Vec<u64>,
    pub columns: ColumnStore,
}

pub trait Transport: Send + Sync {
    fn self_rank(&self) -> usize;
    fn world_size(&self) -> usize;

    /// Exchanges one count per peer; `send_counts[self_rank]` is ignored.
    /// Returns the analogous per-peer incoming counts.
    fn all_to_all(&self, send_counts: &[u32]) -> Result<Vec<u32>, ScsError>;

    /// Posts `outgoing[p]` (if `Some`) to peer `p`, then waits for a message
    /// from every peer `p` with `recv_counts[p] > 0`. Entries for `self_rank`
    /// and zero-traffic peers are `None`.
    fn exchange(
        &self,
        outgoing: Vec<Option<PeerMessage>>,
        recv_counts: &[u32],
    ) -> Result<Vec<Option<PeerMessage>>, ScsError>;
}

/// An in-process transport connecting `world_size` simulated ranks via
/// channels. Each rank runs on its own OS thread in tests and owns one handle.
pub struct LocalTransport {
    rank: usize,
    world_size: usize,
    count_senders: Vec<Sender<u32>>,
    count_receivers: Vec<Mutex<Receiver<u32>>>,
    senders: Vec<Sender<PeerMessage>>,
    receivers: Vec<Mutex<Receiver<PeerMessage>>>,
}

/// Builds one `LocalTransport` handle per rank, fully connected.
pub fn local_world(size: usize) -> Vec<LocalTransport> {
    let mut count_chans: Vec<Vec<Option<(Sender<u32>, Receiver<u32>)>>> =
        (0..size).map(|_| (0..size).map(|_| None).collect()).collect();
    let mut chans: Vec<Vec<Option<(Sender<PeerMessage>, Receiver<PeerMessage>)>>> =
        (0..size).map(|_| (0..size).map(|_| None).collect()).collect();
    for i in 0..size {
        for j in 0..size {
            count_chans[i][j] = Some(mpsc::channel());
            chans[i][j] = Some(mpsc::channel());
        }
    }

    let mut count_senders: Vec<Vec<Sender<u32>>> = (0..size).map(|_| Vec::new()).collect();
    let mut count_receivers: Vec<Vec<Receiver<u32>>> = (0..size).map(|_| Vec::new()).collect();
    let mut senders: Vec<Vec<Sender<PeerMessage>>> = (0..size).map(|_| Vec::new()).collect();
    let mut receivers: Vec<Vec<Receiver<PeerMessage>>> = (0..size).map(|_| Vec::new()).collect();
    for i in 0..size {
        for j in 0..size {
            let (ctx, crx) = count_chans[i][j].take().unwrap();
            count_senders[i].push(ctx);
            count_receivers[j].push(crx);
            let (tx, rx) = chans[i][j].take().unwrap();
            senders[i].push(tx);
            receivers[j].push(rx);
        }
    }

    (0..size)
        .map(|r| LocalTransport {
            rank: r,
            world_size: size,
            count_senders: std::mem::take(&mut count_senders[r]),
            count_receivers: std::mem::take(&mut count_receivers[r])
                .into_iter()
                .map(Mutex::new)
                .collect(),
            senders: std::mem::take(&mut senders[r]),
            receivers: std::mem::take(&mut receivers[r])
                .into_iter()
                .map(Mutex::new)
                .collect(),
        })
        .collect()
}

impl Transport for LocalTransport {
    fn self_rank(&self) -> usize {
        self.rank
    }

    fn world_size(&self) -> usize {
        self.world_size
    }

    fn all_to_all(&self, send_counts: &[u32]) -> Result<Vec<u32>, ScsError> {
        for peer in 0..self.world_size {
            if peer != self.rank {
                self.count_senders[peer]
                    .send(send_counts[peer])
                    .map_err(|_| ScsError::TransportFailure(format!("count send to rank {peer} failed")))?;
            }
        }
        let mut recv = vec![0u32; self.world_size];
        recv[self.rank] = send_counts[self.rank];
        for peer in 0..self.world_size {
            if peer != self.rank {
                recv[peer] = self.count_receivers[peer]
                    .lock()
                    .unwrap()
                    .recv()
                    .map_err(|_| ScsError::TransportFailure(format!("count recv from rank {peer} failed")))?;
            }
        }
        Ok(recv)
    }

    fn exchange(
        &self,
        outgoing: Vec<Option<PeerMessage>>,
        recv_counts: &[u32],
    ) -> Result<Vec<Option<PeerMessage>>, ScsError> {
        for (peer, msg) in outgoing.into_iter().enumerate() {
            if let Some(msg) = msg {
                self.senders[peer]
                    .send(msg)
                    .map_err(|_| ScsError::TransportFailure(format!("send to rank {peer} failed")))?;
            }
        }
        let mut incoming: Vec<Option<PeerMessage>> = (0..self.world_size).map(|_| None).collect();
        for peer in 0..self.world_size {
            if recv_counts[peer] > 0 {
                let msg = self.receivers[peer]
                    .lock()
                    .unwrap()
                    .recv()
                    .map_err(|_| ScsError::TransportFailure(format!("recv from rank {peer} failed")))?;
                incoming[peer] = Some(msg);
            }
        }
        Ok(incoming)
    }
}
