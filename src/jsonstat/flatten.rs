//! Cartesian enumeration of a dataset into CSV rows.

use std::io::Write;

use crate::error::{ToolError, ToolResult};

use super::dataset::{render_cell, JsonStatDataset};

/// Name of the trailing value column in the header row.
pub const VALUE_COLUMN: &str = "value";

/// Index arithmetic for a row-major layout where the last dimension varies fastest.
///
/// `multipliers[i]` is the product of the sizes of every dimension after `i`, so a linear index
/// `r` decomposes into coordinates by repeated division (mixed radix) and
/// `sum(coordinate[i] * multipliers[i]) == r`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatteningContext {
    multipliers: Vec<u64>,
    total: u64,
}

impl FlatteningContext {
    /// Build the context for the given dimension sizes.
    ///
    /// Fails with [`ToolError::MalformedInput`] if the number of combinations does not fit in 64
    /// bits.
    pub fn new(sizes: &[usize]) -> ToolResult<Self> {
        let sizes: Vec<u64> = sizes.iter().map(|&s| s as u64).collect();
        let overflow = || ToolError::malformed("dimension", "category combinations overflow u64");

        let mut multipliers = vec![1u64; sizes.len()];
        for i in (0..sizes.len().saturating_sub(1)).rev() {
            multipliers[i] = multipliers[i + 1]
                .checked_mul(sizes[i + 1])
                .ok_or_else(overflow)?;
        }

        let total = sizes
            .iter()
            .try_fold(1u64, |acc, &s| acc.checked_mul(s))
            .ok_or_else(overflow)?;

        Ok(Self { multipliers, total })
    }

    pub fn multipliers(&self) -> &[u64] {
        &self.multipliers
    }

    /// Number of category combinations (0 if any dimension is empty).
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Decompose linear index `r` into per-dimension coordinates, written into `out`.
    pub fn coordinates(&self, r: u64, out: &mut [usize]) {
        let mut remaining = r;
        for (slot, &m) in out.iter_mut().zip(&self.multipliers) {
            *slot = (remaining / m) as usize;
            remaining %= m;
        }
    }

    /// Recompose coordinates into the linear index of the value array.
    pub fn linear_index(&self, coordinates: &[usize]) -> u64 {
        coordinates
            .iter()
            .zip(&self.multipliers)
            .map(|(&c, &m)| c as u64 * m)
            .sum()
    }
}

/// Write the header and one row per category combination. Returns the number of data rows.
///
/// Dimension cells hold the category label when one exists and the raw key otherwise. A
/// combination with no corresponding entry in the value array gets an empty value cell.
///
/// Empty cells are written unquoted, with one exception: a dataset with no dimensions has
/// single-cell rows, and the `csv` writer quotes a lone empty field (`""`) so the row does not
/// read back as a blank line. A null or missing `value[0]` there therefore comes out as `""`.
pub fn write_rows<W: Write>(
    dataset: &JsonStatDataset,
    writer: &mut csv::Writer<W>,
) -> ToolResult<u64> {
    let dims = &dataset.dimensions;
    let sizes: Vec<usize> = dims.iter().map(|d| d.size()).collect();
    let ctx = FlatteningContext::new(&sizes)?;

    let mut header: Vec<&str> = dims.iter().map(|d| d.name.as_str()).collect();
    header.push(VALUE_COLUMN);
    writer.write_record(&header)?;

    let mut coords = vec![0usize; dims.len()];
    let mut row: Vec<String> = Vec::with_capacity(dims.len() + 1);
    for r in 0..ctx.total() {
        ctx.coordinates(r, &mut coords);
        let index = ctx.linear_index(&coords);

        row.clear();
        row.extend(dims.iter().zip(&coords).map(|(d, &c)| d.cell(c).to_owned()));
        row.push(
            usize::try_from(index)
                .ok()
                .and_then(|i| dataset.values.get(i))
                .map(render_cell)
                .unwrap_or_default(),
        );
        writer.write_record(&row)?;
    }

    Ok(ctx.total())
}
