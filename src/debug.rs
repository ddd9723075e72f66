//! Introspection pretty-printer: dumps chunks, their element (and gid)
//! contents, and per-slice masks. Debug tooling only; not on any hot path.

use std::fmt::Write;

use crate::core::column_store::ColumnSchema;
use crate::core::container::ScsContainer;

pub fn format_debug<S: ColumnSchema>(container: &ScsContainer<S>, prefix: &str) -> String {
    let config = container.config();
    let layout = container.layout();
    let mut out = String::new();

    writeln!(out, "{prefix}").unwrap();
    writeln!(
        out,
        "Sell-C-sigma C: {} sigma: {} V: {}.",
        config.chunk_size, config.sigma, config.slice_width
    )
    .unwrap();
    writeln!(
        out,
        "Number of Elements: {}. Number of Particles: {}.",
        container.num_elements(),
        container.num_particles()
    )
    .unwrap();
    writeln!(
        out,
        "Number of Chunks: {}. Number of Slices: {}.",
        container.num_chunks(),
        container.num_slices()
    )
    .unwrap();

    let mut last_chunk: Option<usize> = None;
    let mask = container.mask();
    for slice in 0..layout.num_slices {
        let chunk = layout.slice_to_chunk[slice] as usize;
        if Some(chunk) != last_chunk {
            last_chunk = Some(chunk);
            write!(out, "  Chunk {chunk}. Elements:").unwrap();
            for row in chunk * config.chunk_size..(chunk + 1) * config.chunk_size {
                let elem = layout.row_to_element[row];
                write!(out, " {elem}").unwrap();
                if let Ok(gid) = container.gid_of_element(elem) {
                    write!(out, "({gid})").unwrap();
                }
            }
            writeln!(out).unwrap();
        }
        write!(out, "    Slice {slice}").unwrap();
        let start = layout.slice_offsets[slice] as usize;
        let end = layout.slice_offsets[slice + 1] as usize;
        for j in start..end {
            if (j - start) % config.chunk_size == 0 {
                write!(out, " |").unwrap();
            }
            write!(out, " {}", mask[j]).unwrap();
        }
        writeln!(out).unwrap();
    }

    out
}
