use anyhow::{ensure, Result};

/// Encodes a straight-alpha RGBA8 buffer as PNG.
pub fn encode_rgba_png(width: u32, height: u32, data: &[u8]) -> Result<Vec<u8>> {
    ensure!(
        data.len() == (width as usize) * (height as usize) * 4,
        "pixel buffer of {} bytes does not match {}x{}",
        data.len(),
        width,
        height
    );

    let mut buf = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(data)?;
    }
    Ok(buf)
}

/// Converts premultiplied RGBA8 to straight alpha.
pub fn demultiply(premultiplied: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(premultiplied.len());
    for px in premultiplied.chunks_exact(4) {
        let a = px[3];
        match a {
            0 => out.extend_from_slice(&[0, 0, 0, 0]),
            255 => out.extend_from_slice(px),
            _ => {
                let un = |c: u8| ((c as u32 * 255 + a as u32 / 2) / a as u32).min(255) as u8;
                out.extend_from_slice(&[un(px[0]), un(px[1]), un(px[2]), a]);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demultiply_restores_straight_alpha() {
        assert_eq!(demultiply(&[10, 20, 30, 255]), vec![10, 20, 30, 255]);
        assert_eq!(demultiply(&[50, 0, 25, 0]), vec![0, 0, 0, 0]);
        assert_eq!(demultiply(&[64, 0, 0, 128]), vec![128, 0, 0, 128]);
    }

    #[test]
    fn encodes_png_signature() {
        let png = encode_rgba_png(2, 1, &[255, 0, 0, 255, 0, 255, 0, 255]).unwrap();
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
    }

    #[test]
    fn rejects_mismatched_buffer() {
        assert!(encode_rgba_png(2, 2, &[0; 4]).is_err());
    }
}
