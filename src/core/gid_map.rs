//! The global element id map: a concurrent-safe-to-read table from global id (gid)
//! to local element id. Read-only during iteration; rebuilt only at construction,
//! since the element set itself never changes across `rebuild`/`migrate` (only
//! particle-to-element assignment does).

use indexmap::IndexMap;

use crate::error::ScsError;

#[derive(Debug, Clone)]
pub struct GidMap {
    element_to_gid: Vec<u64>,
    gid_to_element: IndexMap<u64, u32>,
}

impl GidMap {
    pub fn build(gids: &[u64]) -> Self {
        let mut gid_to_element = IndexMap::with_capacity(gids.len());
        for (element, &gid) in gids.iter().enumerate() {
            gid_to_element.insert(gid, element as u32);
        }
        Self {
            element_to_gid: gids.to_vec(),
            gid_to_element,
        }
    }

    pub fn gid_of(&self, element: u32) -> u64 {
        self.element_to_gid[element as usize]
    }

    pub fn element_of(&self, gid: u64) -> Result<u32, ScsError> {
        self.gid_to_element
            .get(&gid)
            .copied()
            .ok_or(ScsError::UnknownGid { gid })
    }
}
