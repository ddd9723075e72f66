use crate::error::ScsError;

/// The three parameters that shape a Sell-C-sigma layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScsConfig {
    /// Chunk size (C): rows processed together as a team/vector width.
    pub chunk_size: usize,
    /// Sort-band size (sigma): sigma = 1 disables sorting, sigma >= num_elements sorts globally.
    pub sigma: usize,
    /// Vertical slice width (V): maximum particle columns per slice.
    pub slice_width: usize,
}

impl ScsConfig {
    pub fn new(chunk_size: usize, sigma: usize, slice_width: usize) -> Self {
        Self {
            chunk_size,
            sigma,
            slice_width,
        }
    }

    pub fn validate(&self) -> Result<(), ScsError> {
        if self.chunk_size == 0 || self.sigma == 0 || self.slice_width == 0 {
            return Err(ScsError::InvalidConfig {
                chunk_size: self.chunk_size as i64,
                sigma: self.sigma as i64,
                slice_width: self.slice_width as i64,
            });
        }
        Ok(())
    }
}
