//! PNG export with embedded metadata (tEXt chunks).

use std::io::BufWriter;
use std::path::Path;

use tracing::debug;

use crate::buffer::RenderBuffer;

/// Metadata to embed in an exported PNG as tEXt chunks.
///
/// Records where the frame was taken so an export can be located again by
/// hand. Nothing here feeds back into the application — view state is
/// never reloaded from disk.
pub struct ExportMetadata {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub max_iterations: u32,
    pub palette_name: String,
}

/// Write an RGBA pixel buffer as a PNG file with embedded viewport metadata.
///
/// Uses the `png` crate directly so custom tEXt chunks end up readable by
/// exiftool and most image viewers.
pub fn export_png(
    buffer: &RenderBuffer,
    path: &Path,
    metadata: &ExportMetadata,
) -> crate::Result<()> {
    let file = std::fs::File::create(path)?;
    let writer = BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, buffer.width, buffer.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Default);

    encoder.add_text_chunk("Software".to_string(), "MandelZoom".to_string())?;
    encoder.add_text_chunk(
        "Description".to_string(),
        format!(
            "Mandelbrot set, x: [{}, {}], y: [{}, {}], {} iterations",
            metadata.x_min, metadata.x_max, metadata.y_min, metadata.y_max, metadata.max_iterations,
        ),
    )?;
    for (key, value) in [
        ("mandelzoom:x_min", metadata.x_min.to_string()),
        ("mandelzoom:x_max", metadata.x_max.to_string()),
        ("mandelzoom:y_min", metadata.y_min.to_string()),
        ("mandelzoom:y_max", metadata.y_max.to_string()),
        (
            "mandelzoom:max_iterations",
            metadata.max_iterations.to_string(),
        ),
        ("mandelzoom:palette", metadata.palette_name.clone()),
    ] {
        encoder.add_text_chunk(key.to_string(), value)?;
    }

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(&buffer.pixels)?;
    png_writer.finish()?;

    debug!(
        width = buffer.width,
        height = buffer.height,
        path = %path.display(),
        "Exported PNG"
    );
    Ok(())
}
