//! # Paint engine
//!
//! Stateless operations that mutate or query a [`Document`] on behalf of a tool.
//!
//! Hidden layers can't be painted on: every mutating operation on a hidden layer succeeds without
//! doing anything. Likewise, writing a color a cell already holds is not a change. Both report
//! [`Outcome::Unchanged`] so the caller can avoid committing a history entry that does nothing.

use crate::{
    color::{Cell, Color},
    error::EditError,
    state::{Document, LayerID},
};

#[derive(strum::AsRefStr, strum::EnumIter, PartialEq, Eq, Copy, Clone, Hash, Debug)]
pub enum Tool {
    Paint,
    Erase,
    Fill,
    Pick,
}

/// One discrete tool application, already resolved to a grid cell by the caller.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct ToolAction {
    pub layer: LayerID,
    pub x: usize,
    pub y: usize,
    pub tool: Tool,
    /// Used by [`Tool::Paint`] and [`Tool::Fill`], ignored otherwise.
    pub color: Color,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Outcome {
    Changed,
    Unchanged,
    /// Result of [`Tool::Pick`]. `None` if no visible layer has color at the cell, in which case
    /// the caller should leave its current color selection alone.
    Picked(Option<Color>),
}
impl Outcome {
    #[must_use]
    pub fn changed(self) -> bool {
        matches!(self, Self::Changed)
    }
    fn from_changed(changed: bool) -> Self {
        if changed {
            Self::Changed
        } else {
            Self::Unchanged
        }
    }
}

/// Dispatch a tool application.
pub fn apply(document: &mut Document, action: ToolAction) -> Result<Outcome, EditError> {
    let ToolAction {
        layer,
        x,
        y,
        tool,
        color,
    } = action;
    log::trace!("{} on {layer} at ({x}, {y})", tool.as_ref());
    match tool {
        Tool::Paint => paint(document, layer, x, y, Some(color)),
        Tool::Erase => erase(document, layer, x, y),
        Tool::Fill => flood_fill(document, layer, x, y, Some(color)),
        Tool::Pick => pick_color(document, x, y).map(Outcome::Picked),
    }
}

/// Set a single cell on a layer. Out of bounds coordinates are an error.
pub fn paint(
    document: &mut Document,
    layer: LayerID,
    x: usize,
    y: usize,
    cell: Cell,
) -> Result<Outcome, EditError> {
    let layer = document.layer_mut(layer)?;
    if !layer.is_visible() {
        return Ok(Outcome::Unchanged);
    }
    layer.grid_mut().set(x, y, cell).map(Outcome::from_changed)
}

/// Clear a single cell on a layer.
pub fn erase(
    document: &mut Document,
    layer: LayerID,
    x: usize,
    y: usize,
) -> Result<Outcome, EditError> {
    paint(document, layer, x, y, None)
}

/// Recolor the 4-connected region of cells equal to the cell at `(x, y)`.
///
/// Filling outside the grid, or with the color already there, does nothing.
/// The traversal uses an explicit stack and a visited bitmap, so memory is bounded by the grid
/// area regardless of the region's shape.
pub fn flood_fill(
    document: &mut Document,
    layer: LayerID,
    x: usize,
    y: usize,
    replacement: Cell,
) -> Result<Outcome, EditError> {
    let layer = document.layer_mut(layer)?;
    if !layer.is_visible() {
        return Ok(Outcome::Unchanged);
    }
    let grid = layer.grid_mut();
    let Ok(target) = grid.get(x, y) else {
        return Ok(Outcome::Unchanged);
    };
    if target == replacement {
        return Ok(Outcome::Unchanged);
    }

    let size = grid.size();
    let mut visited: bitvec::vec::BitVec = bitvec::vec::BitVec::repeat(false, size * size);
    let mut frontier = Vec::with_capacity(size * 4);
    visited.set(y * size + x, true);
    frontier.push((x, y));

    let mut filled = 0usize;
    while let Some((x, y)) = frontier.pop() {
        // Pushed cells are always in bounds.
        grid.set(x, y, replacement)?;
        filled += 1;

        let neighbors = [
            x.checked_sub(1).map(|x| (x, y)),
            Some((x + 1, y)),
            y.checked_sub(1).map(|y| (x, y)),
            Some((x, y + 1)),
        ];
        for (nx, ny) in neighbors.into_iter().flatten() {
            if !grid.contains(nx, ny) {
                continue;
            }
            let idx = ny * size + nx;
            if visited[idx] {
                continue;
            }
            // Mark on push, not on pop, so no cell is ever queued twice.
            if grid.get(nx, ny)? == target {
                visited.set(idx, true);
                frontier.push((nx, ny));
            }
        }
    }
    log::trace!("Flood filled {filled} cells");
    Ok(Outcome::Changed)
}

/// Find the color shown at `(x, y)` by scanning visible layers from the top down.
///
/// Returns the first non-empty cell, or `None` if no visible layer has color there.
/// Opacity is not considered: the picked color is the stored cell value.
pub fn pick_color(document: &Document, x: usize, y: usize) -> Result<Option<Color>, EditError> {
    let size = document.size();
    if x >= size || y >= size {
        return Err(EditError::OutOfBounds { x, y, size });
    }
    for layer in document.layers().iter().rev() {
        if !layer.is_visible() {
            continue;
        }
        if let Some(color) = layer.grid().get(x, y)? {
            return Ok(Some(color));
        }
    }
    Ok(None)
}
