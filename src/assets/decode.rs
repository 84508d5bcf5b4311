use crate::errors::LoadError;
use crate::render::RgbaImage;

/// Decodes PNG bytes into a premultiplied RGBA8 image.
///
/// Palette, grayscale and 16-bit images are normalized to 8-bit RGBA.
pub fn decode_png(bytes: &[u8]) -> Result<RgbaImage, LoadError> {
    let mut decoder = png::Decoder::new(bytes);
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder.read_info()?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    let data = &buf[..info.buffer_size()];

    if info.width == 0 || info.height == 0 {
        return Err(LoadError::Decode("image has no pixels".to_string()));
    }

    let rgba: Vec<u8> = match info.color_type {
        png::ColorType::Rgba => data
            .chunks_exact(4)
            .flat_map(|px| premultiply(px[0], px[1], px[2], px[3]))
            .collect(),
        png::ColorType::Rgb => data
            .chunks_exact(3)
            .flat_map(|px| [px[0], px[1], px[2], 255])
            .collect(),
        png::ColorType::GrayscaleAlpha => data
            .chunks_exact(2)
            .flat_map(|px| premultiply(px[0], px[0], px[0], px[1]))
            .collect(),
        png::ColorType::Grayscale => data.iter().flat_map(|&v| [v, v, v, 255]).collect(),
        png::ColorType::Indexed => {
            return Err(LoadError::Decode("palette was not expanded".to_string()));
        }
    };

    RgbaImage::from_raw(rgba, info.width, info.height)
        .ok_or_else(|| LoadError::Decode(format!("short pixel buffer for {}x{}", info.width, info.height)))
}

fn premultiply(r: u8, g: u8, b: u8, a: u8) -> [u8; 4] {
    let pm = |c: u8| ((c as u16 * a as u16 + 127) / 255) as u8;
    [pm(r), pm(g), pm(b), a]
}
