use thiserror::Error;

/// Failure modes surfaced synchronously to the caller. None of these are retried
/// or silently recovered from; see the error handling policy table.
#[derive(Debug, Error)]
pub enum ScsError {
    #[error(
        "invalid layout configuration: chunk size, sigma, and slice width must all be positive \
         (got C={chunk_size}, sigma={sigma}, V={slice_width})"
    )]
    InvalidConfig {
        chunk_size: i64,
        sigma: i64,
        slice_width: i64,
    },

    #[error("counts length {counts_len} does not match num_elements {num_elements}")]
    CountsLengthMismatch {
        counts_len: usize,
        num_elements: usize,
    },

    #[error("sum of per-element counts ({summed}) does not match num_particles ({num_particles})")]
    CountMismatch { summed: usize, num_particles: usize },

    #[error("received global element id {gid} has no local element mapping")]
    UnknownGid { gid: u64 },

    #[error("migrate requires the container to have been constructed with global element ids")]
    MissingGidMap,

    #[error("message transport failed: {0}")]
    TransportFailure(String),
}
