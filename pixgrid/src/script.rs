//! # Edit scripts
//!
//! A script is a TOML file standing in for a user at an editor: a list of steps, each one a tool
//! application, a pointer release, a structural edit, or an undo/redo.
//!
//! ```toml
//! size = 8
//!
//! [[step]]
//! kind = "paint"
//! x = 0
//! y = 0
//! color = "#ff0000"
//!
//! [[step]]
//! kind = "release"
//! ```
//!
//! Layers are named by their stack index at the time the step runs, 0 being the bottom.
//! Grid sizes are limited to the offered presets (8, 16, 32, 64).

use anyhow::Context;
use pixgrid_core::{
    color::Color,
    grid::GridSize,
    paint::{Outcome, Tool},
    session::Session,
    state::{Document, LayerID},
};

#[derive(serde::Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Script {
    /// Grid size of the starting document. Defaults to the preferences.
    pub size: Option<usize>,
    /// Starting color for tools that don't name one.
    pub color: Option<String>,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

#[derive(serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Step {
    Paint {
        x: usize,
        y: usize,
        color: Option<String>,
    },
    Erase {
        x: usize,
        y: usize,
    },
    Fill {
        x: usize,
        y: usize,
        color: Option<String>,
    },
    /// Picks into the current color. Picking an empty cell leaves it alone.
    Pick {
        x: usize,
        y: usize,
    },
    /// Pointer release. Commits the gesture.
    Release,
    AddLayer,
    SelectLayer {
        layer: usize,
    },
    DeleteLayer {
        layer: usize,
    },
    MoveLayer {
        layer: usize,
        to: usize,
    },
    RenameLayer {
        layer: usize,
        name: String,
    },
    ToggleVisible {
        layer: usize,
    },
    /// Slider movement, not committed until the next release.
    SetOpacity {
        layer: usize,
        percent: u8,
    },
    Resize {
        size: usize,
    },
    Undo,
    Redo,
}

#[derive(thiserror::Error, Debug)]
pub enum ReplayError {
    #[error("no layer at stack index {index}, document has {count}")]
    NoLayer { index: usize, count: usize },
    #[error("bad color {0:?}")]
    Color(String, #[source] pixgrid_core::color::ParseColorError),
}

impl Script {
    pub fn from_toml(string: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(string)?)
    }
}

/// Drives a [`Session`] through a script.
pub struct Replayer {
    session: Session,
    color: Color,
}
impl Replayer {
    pub fn new(
        script: &Script,
        default_size: usize,
        history_capacity: usize,
    ) -> anyhow::Result<Self> {
        let size = GridSize::try_from(script.size.unwrap_or(default_size))?;
        let document = Document::from_grid_size(size);
        let color = match &script.color {
            Some(color) => parse_color(color)?,
            None => Color::BLACK,
        };
        Ok(Self {
            session: Session::with_history_capacity(document, history_capacity)?,
            color,
        })
    }
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }
    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }
    /// Run every step in order, then commit any trailing gesture.
    pub fn run(&mut self, script: &Script) -> anyhow::Result<()> {
        for (idx, step) in script.steps.iter().enumerate() {
            self.step(step)
                .with_context(|| format!("step {} ({step:?}) failed", idx + 1))?;
        }
        self.session.end_gesture();
        Ok(())
    }
    fn layer_at(&self, index: usize) -> Result<LayerID, ReplayError> {
        let layers = self.session.document().layers();
        layers
            .get(index)
            .map(pixgrid_core::state::Layer::id)
            .ok_or(ReplayError::NoLayer {
                index,
                count: layers.len(),
            })
    }
    fn tool_color(&mut self, color: Option<&String>) -> Result<Color, ReplayError> {
        if let Some(color) = color {
            self.color = parse_color(color)?;
        }
        Ok(self.color)
    }
    pub fn step(&mut self, step: &Step) -> anyhow::Result<()> {
        match step {
            Step::Paint { x, y, color } => {
                let color = self.tool_color(color.as_ref())?;
                let _ = self.session.apply(Tool::Paint, *x, *y, color)?;
            }
            Step::Fill { x, y, color } => {
                let color = self.tool_color(color.as_ref())?;
                let _ = self.session.apply(Tool::Fill, *x, *y, color)?;
            }
            Step::Erase { x, y } => {
                let _ = self.session.apply(Tool::Erase, *x, *y, self.color)?;
            }
            Step::Pick { x, y } => {
                if let Outcome::Picked(Some(picked)) =
                    self.session.apply(Tool::Pick, *x, *y, self.color)?
                {
                    log::info!("Picked {picked} at ({x}, {y})");
                    self.color = picked;
                } else {
                    log::info!("Nothing to pick at ({x}, {y})");
                }
            }
            Step::Release => {
                self.session.end_gesture();
            }
            Step::AddLayer => {
                self.session.add_layer();
            }
            Step::SelectLayer { layer } => {
                let id = self.layer_at(*layer)?;
                self.session.select_layer(id)?;
            }
            Step::DeleteLayer { layer } => {
                let id = self.layer_at(*layer)?;
                self.session.delete_layer(id)?;
            }
            Step::MoveLayer { layer, to } => {
                let id = self.layer_at(*layer)?;
                self.session.move_layer(id, *to)?;
            }
            Step::RenameLayer { layer, name } => {
                let id = self.layer_at(*layer)?;
                self.session.rename_layer(id, name.clone())?;
            }
            Step::ToggleVisible { layer } => {
                let id = self.layer_at(*layer)?;
                self.session.toggle_visible(id)?;
            }
            Step::SetOpacity { layer, percent } => {
                let id = self.layer_at(*layer)?;
                self.session.set_opacity(id, *percent)?;
            }
            Step::Resize { size } => self.session.resize(GridSize::try_from(*size)?.cells())?,
            Step::Undo => {
                if !self.session.undo() {
                    log::info!("Nothing to undo");
                }
            }
            Step::Redo => {
                if !self.session.redo() {
                    log::info!("Nothing to redo");
                }
            }
        }
        Ok(())
    }
}

fn parse_color(color: &str) -> Result<Color, ReplayError> {
    color
        .parse()
        .map_err(|e| ReplayError::Color(color.to_owned(), e))
}
