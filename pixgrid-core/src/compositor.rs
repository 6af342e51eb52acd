//! # Compositor
//!
//! Flattens the visible layers of a [`Document`] into one [`Image`], bottom to top.

use crate::{
    blend::Premultiplied,
    color::Color,
    error::EditError,
    state::Document,
};

/// A flattened, straight-alpha RGBA8 image, `size` by `size`, row-major.
///
/// Encoding this to a display surface or file is up to the caller.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Image {
    size: usize,
    pixels: Vec<Color>,
}
impl Image {
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }
    pub fn pixel(&self, x: usize, y: usize) -> Result<Color, EditError> {
        if x < self.size && y < self.size {
            Ok(self.pixels[y * self.size + x])
        } else {
            Err(EditError::OutOfBounds {
                x,
                y,
                size: self.size,
            })
        }
    }
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[Color]> + '_ {
        self.pixels.chunks_exact(self.size)
    }
    /// Raw interleaved RGBA bytes, row-major.
    #[must_use]
    pub fn as_rgba8(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}

/// Flatten `document`.
///
/// Hidden layers contribute nothing. Each visible, non-empty cell is blended "over" what is below
/// it, with its alpha scaled by the layer's opacity. Cells no visible layer has painted come out as
/// [`Color::TRANSPARENT`].
#[must_use]
pub fn composite(document: &Document) -> Image {
    let size = document.size();
    let mut accumulator = vec![Premultiplied::TRANSPARENT; size * size];

    for layer in document.layers().iter().filter(|layer| layer.is_visible()) {
        let opacity = layer.opacity();
        for (dst, cell) in accumulator
            .iter_mut()
            .zip(layer.grid().rows().flatten())
        {
            if let Some(color) = cell {
                *dst = Premultiplied::from_color(*color, opacity).over(*dst);
            }
        }
    }

    Image {
        size,
        pixels: accumulator.into_iter().map(Premultiplied::to_color).collect(),
    }
}
