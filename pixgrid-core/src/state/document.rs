use super::layer::{Layer, LayerID};
use crate::{error::EditError, grid::GridSize};

/// The full editable state: a shared grid size and a non-empty, ordered stack of layers.
///
/// Index 0 is the bottom of the stack, the last index is the top.
#[derive(Clone, PartialEq, Debug)]
pub struct Document {
    size: usize,
    // Never empty, and every grid is `size` wide.
    layers: Vec<Layer>,
}
impl Default for Document {
    fn default() -> Self {
        // Infallible - every GridSize is non-zero.
        Self::from_grid_size(GridSize::default())
    }
}
impl Document {
    /// A document holding one empty layer.
    pub fn new(size: usize) -> Result<Self, EditError> {
        Ok(Self {
            size,
            layers: vec![Layer::new(Self::default_name(0), size)?],
        })
    }
    #[must_use]
    pub fn from_grid_size(size: GridSize) -> Self {
        let size = size.cells();
        Self {
            size,
            layers: vec![Layer::new(Self::default_name(0), size)
                .unwrap_or_else(|_| unreachable!("preset sizes are non-zero"))],
        }
    }
    fn default_name(existing: usize) -> String {
        format!("Layer {}", existing + 1)
    }
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }
    /// Layers, bottom to top.
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }
    #[must_use]
    pub fn top_layer(&self) -> &Layer {
        // Never empty.
        &self.layers[self.layers.len() - 1]
    }
    #[must_use]
    pub fn index_of(&self, id: LayerID) -> Option<usize> {
        self.layers.iter().position(|layer| layer.id() == id)
    }
    #[must_use]
    pub fn contains(&self, id: LayerID) -> bool {
        self.index_of(id).is_some()
    }
    pub fn layer(&self, id: LayerID) -> Result<&Layer, EditError> {
        self.layers
            .iter()
            .find(|layer| layer.id() == id)
            .ok_or(EditError::LayerNotFound(id))
    }
    pub fn layer_mut(&mut self, id: LayerID) -> Result<&mut Layer, EditError> {
        self.layers
            .iter_mut()
            .find(|layer| layer.id() == id)
            .ok_or(EditError::LayerNotFound(id))
    }
    /// Push a new, empty, visible, opaque layer on top of the stack.
    pub fn add_layer(&mut self) -> LayerID {
        let layer = Layer::new(Self::default_name(self.layers.len()), self.size)
            // Size was validated when the document was made.
            .unwrap_or_else(|_| unreachable!("document size is non-zero"));
        let id = layer.id();
        log::debug!("Adding {id} as {:?}", layer.name());
        self.layers.push(layer);
        id
    }
    /// Remove a layer, returning it.
    ///
    /// Fails with [`EditError::LastLayer`] rather than leave the document empty. Choosing a new
    /// active layer is up to the caller.
    pub fn delete_layer(&mut self, id: LayerID) -> Result<Layer, EditError> {
        let idx = self.index_of(id).ok_or(EditError::LayerNotFound(id))?;
        if self.layers.len() == 1 {
            return Err(EditError::LastLayer);
        }
        log::debug!("Deleting {id}");
        Ok(self.layers.remove(idx))
    }
    /// Move a layer to a new stack position. Indices past the top are clamped to the top.
    /// Returns the index the layer landed at.
    pub fn move_layer(&mut self, id: LayerID, to: usize) -> Result<usize, EditError> {
        let from = self.index_of(id).ok_or(EditError::LayerNotFound(id))?;
        let to = to.min(self.layers.len() - 1);
        let layer = self.layers.remove(from);
        self.layers.insert(to, layer);
        Ok(to)
    }
    /// Returns whether the name changed.
    pub fn rename_layer(
        &mut self,
        id: LayerID,
        name: impl Into<String>,
    ) -> Result<bool, EditError> {
        Ok(self.layer_mut(id)?.rename(name))
    }
    pub fn toggle_visible(&mut self, id: LayerID) -> Result<bool, EditError> {
        let layer = self.layer_mut(id)?;
        layer.toggle_visible();
        Ok(layer.is_visible())
    }
    pub fn set_opacity(&mut self, id: LayerID, percent: u8) -> Result<(), EditError> {
        self.layer_mut(id)?.set_opacity(percent)
    }
    /// Resize every layer, anchored top-left. Shrinking permanently drops cells outside the
    /// new bounds (short of undo). Same size is a no-op.
    pub fn resize(&mut self, new_size: usize) -> Result<(), EditError> {
        if new_size == self.size {
            return Ok(());
        }
        if new_size == 0 {
            return Err(EditError::InvalidArgument(
                "grid size must be at least 1".to_owned(),
            ));
        }
        log::debug!("Resizing document {0}x{0} -> {1}x{1}", self.size, new_size);
        for layer in &mut self.layers {
            layer.resize(new_size)?;
        }
        self.size = new_size;
        Ok(())
    }
}
