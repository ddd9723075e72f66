//! Heterogeneous Column Store (HCS): a tuple of parallel columns, one per declared
//! particle attribute type, each a contiguous array of identical length.
//!
//! Rust has no variadic templates, so the schema is represented as an ordered list
//! of type-erased columns behind a small vtable (`Column`), rather than a
//! compile-time type list. A slot index indexes all columns consistently; the
//! live/dead bit lives in the SCS mask, not here.

use std::any::Any;

/// A single type-erased attribute column. Implemented for `Vec<T>` below.
pub trait Column: Send + Sync {
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn resize(&mut self, new_len: usize);
    /// Copy the value at `src_index` of `src` into `dst_index` of `self`.
    /// Panics if `src` does not hold the same element type as `self`.
    fn copy_slot(&mut self, dst_index: usize, src: &dyn Column, src_index: usize);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn clone_box(&self) -> Box<dyn Column>;
}

impl<T> Column for Vec<T>
where
    T: Clone + Default + Send + Sync + 'static,
{
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn resize(&mut self, new_len: usize) {
        Vec::resize(self, new_len, T::default());
    }

    fn copy_slot(&mut self, dst_index: usize, src: &dyn Column, src_index: usize) {
        let src = src
            .as_any()
            .downcast_ref::<Vec<T>>()
            .expect("column type mismatch during copy_slot");
        self[dst_index] = src[src_index].clone();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn clone_box(&self) -> Box<dyn Column> {
        Box::new(self.clone())
    }
}

/// Describes how to allocate a fresh, empty-valued set of columns for a schema.
/// Implementors are typically unit structs naming the attribute tuple, e.g. a
/// `struct ParticlePayload;` whose `empty_columns` allocates `(mass: f32, velocity:
/// [f32; 2])` style columns.
pub trait ColumnSchema: Send + Sync {
    fn empty_columns(&self, len: usize) -> ColumnStore;
    fn num_columns(&self) -> usize;
}

/// Owns the k parallel columns of a schema. All columns share length N; slot
/// index `i` indexes column `c`'s i-th entry consistently across all columns.
pub struct ColumnStore {
    columns: Vec<Box<dyn Column>>,
}

impl ColumnStore {
    pub fn from_columns(columns: Vec<Box<dyn Column>>) -> Self {
        if let Some((first, rest)) = columns.split_first() {
            let len = first.len();
            debug_assert!(rest.iter().all(|c| c.len() == len), "column length mismatch");
        }
        Self { columns }
    }

    pub fn empty() -> Self {
        Self { columns: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, |c| c.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column<T: 'static>(&self, index: usize) -> &[T] {
        self.columns[index]
            .as_any()
            .downcast_ref::<Vec<T>>()
            .expect("column type mismatch")
            .as_slice()
    }

    pub fn column_mut<T: 'static>(&mut self, index: usize) -> &mut [T] {
        self.columns[index]
            .as_any_mut()
            .downcast_mut::<Vec<T>>()
            .expect("column type mismatch")
            .as_mut_slice()
    }

    /// Copies every column's value at `src_index` of `src` into `dst_index` of
    /// `self`. `self` and `src` must share the same schema.
    pub fn copy_slot(&mut self, dst_index: usize, src: &ColumnStore, src_index: usize) {
        for (dst, src_col) in self.columns.iter_mut().zip(src.columns.iter()) {
            dst.copy_slot(dst_index, src_col.as_ref(), src_index);
        }
    }

    /// Releases all columns, freeing their storage.
    pub fn release(&mut self) {
        self.columns.clear();
    }

    /// Concatenates same-schema parts into one store, in order.
    pub fn concat(parts: &[ColumnStore], schema: &dyn ColumnSchema) -> ColumnStore {
        let total: usize = parts.iter().map(|p| p.len()).sum();
        let mut out = schema.empty_columns(total);
        let mut offset = 0;
        for part in parts {
            for i in 0..part.len() {
                out.copy_slot(offset + i, part, i);
            }
            offset += part.len();
        }
        out
    }
}

impl Clone for ColumnStore {
    fn clone(&self) -> Self {
        Self {
            columns: self.columns.iter().map(|c| c.clone_box()).collect(),
        }
    }
}
