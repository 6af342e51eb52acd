use pixgrid_core::compositor::Image;

/// Widest image [`write_png`] will produce.
pub const MAX_SIDE: u32 = 16384;

/// Nearest-neighbor upscale, each cell becoming a `scale × scale` block. Returns RGBA8 bytes.
/// Callers bound `size × scale` first.
fn upscale(image: &Image, scale: u32) -> Vec<u8> {
    let scale = scale as usize;
    let side = image.size() * scale;
    let mut out = Vec::with_capacity(side * side * 4);
    for row in image.rows() {
        let mut scaled_row = Vec::with_capacity(side * 4);
        for pixel in row {
            for _ in 0..scale {
                scaled_row.extend_from_slice(&pixel.as_array());
            }
        }
        for _ in 0..scale {
            out.extend_from_slice(&scaled_row);
        }
    }
    out
}

/// Encode `image` as an RGBA8 PNG, upscaled by `scale`.
pub fn write_png(image: &Image, scale: u32, into: impl std::io::Write) -> anyhow::Result<()> {
    anyhow::ensure!(scale >= 1, "export scale must be at least 1");
    let side = u32::try_from(image.size())
        .ok()
        .and_then(|size| size.checked_mul(scale))
        .filter(|&side| side <= MAX_SIDE)
        .ok_or_else(|| {
            anyhow::anyhow!(
                "{0}x{0} grid at {1}x exceeds the {MAX_SIDE} pixel export limit",
                image.size(),
                scale
            )
        })?;
    let mut encoder = png::Encoder::new(into, side, side);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&upscale(image, scale))?;
    writer.finish()?;
    Ok(())
}

pub fn save_png(image: &Image, scale: u32, path: &std::path::Path) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)?;
    write_png(image, scale, std::io::BufWriter::new(file))?;
    log::info!(
        "Exported {0}x{0} image at {1}x to {2}",
        image.size(),
        scale,
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod test {
    use super::{upscale, write_png, MAX_SIDE};
    use pixgrid_core::{color::Color, compositor::composite, paint, state::Document};

    fn checker() -> pixgrid_core::compositor::Image {
        let mut doc = Document::new(2).unwrap();
        let id = doc.layers()[0].id();
        paint::paint(&mut doc, id, 0, 0, Some(Color::RED)).unwrap();
        paint::paint(&mut doc, id, 1, 1, Some(Color::BLUE)).unwrap();
        composite(&doc)
    }

    #[test]
    fn upscale_blocks() {
        let bytes = upscale(&checker(), 3);
        assert_eq!(bytes.len(), 6 * 6 * 4);
        let at = |x: usize, y: usize| &bytes[(y * 6 + x) * 4..(y * 6 + x) * 4 + 4];
        assert_eq!(at(0, 0), Color::RED.as_array());
        assert_eq!(at(2, 2), Color::RED.as_array());
        assert_eq!(at(3, 0), [0, 0, 0, 0]);
        assert_eq!(at(5, 5), Color::BLUE.as_array());
    }
    #[test]
    fn png_decodes() {
        let mut encoded = Vec::new();
        write_png(&checker(), 4, &mut encoded).unwrap();

        let decoder = png::Decoder::new(encoded.as_slice());
        let mut reader = decoder.read_info().unwrap();
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).unwrap();
        assert_eq!((info.width, info.height), (8, 8));
        assert_eq!(info.color_type, png::ColorType::Rgba);
        assert_eq!(&buf[..4], &Color::RED.as_array());
        let last = (8 * 8 - 1) * 4;
        assert_eq!(&buf[last..last + 4], &Color::BLUE.as_array());
    }
    #[test]
    fn zero_scale_rejected() {
        let mut encoded = Vec::new();
        assert!(write_png(&checker(), 0, &mut encoded).is_err());
    }
    #[test]
    fn oversized_export_rejected_before_encoding() {
        let mut encoded = Vec::new();
        let err = write_png(&checker(), u32::MAX, &mut encoded).unwrap_err();
        assert!(err.to_string().contains("export limit"));
        assert!(write_png(&checker(), MAX_SIDE / 2 + 1, &mut encoded).is_err());
        assert!(encoded.is_empty());
    }
}
