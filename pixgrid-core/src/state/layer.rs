use crate::{blend::Opacity, error::EditError, grid::Grid};

pub type LayerID = crate::UniqueID<Layer>;

/// A [`Grid`] plus the metadata used to display it.
#[derive(Clone, PartialEq, Debug)]
pub struct Layer {
    id: LayerID,
    name: String,
    visible: bool,
    opacity: Opacity,
    // Not public - replacing the grid could break the document's shared size.
    grid: Grid,
}
impl Layer {
    /// A visible, fully opaque, empty layer.
    pub fn new(name: impl Into<String>, size: usize) -> Result<Self, EditError> {
        Ok(Self {
            id: LayerID::next(),
            name: name.into(),
            visible: true,
            opacity: Opacity::OPAQUE,
            grid: Grid::new(size)?,
        })
    }
    #[must_use]
    pub fn id(&self) -> LayerID {
        self.id
    }
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
    /// Returns whether the name changed.
    pub fn rename(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if name == self.name {
            return false;
        }
        self.name = name;
        true
    }
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
    pub fn toggle_visible(&mut self) {
        self.visible = !self.visible;
    }
    #[must_use]
    pub fn opacity(&self) -> Opacity {
        self.opacity
    }
    /// Set opacity from a percentage. Values above 100 are rejected and the layer is left as-is.
    pub fn set_opacity(&mut self, percent: u8) -> Result<(), EditError> {
        self.opacity = Opacity::new(percent)?;
        Ok(())
    }
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }
    pub(crate) fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }
    /// Swap in a resized grid, keeping identity and metadata.
    pub(crate) fn resize(&mut self, new_size: usize) -> Result<(), EditError> {
        self.grid = self.grid.resized(new_size)?;
        Ok(())
    }
}
