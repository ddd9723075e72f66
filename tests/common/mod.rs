use scs_particles::{Column, ColumnSchema, ColumnStore};

/// A single `i64` payload column, used across integration tests as a stand-in
/// particle attribute (typically holding the particle's originating element).
#[derive(Clone)]
pub struct ScalarSchema;

impl ColumnSchema for ScalarSchema {
    fn empty_columns(&self, len: usize) -> ColumnStore {
        ColumnStore::from_columns(vec![Box::new(vec![0i64; len]) as Box<dyn Column>])
    }

    fn num_columns(&self) -> usize {
        1
    }
}
