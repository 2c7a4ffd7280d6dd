//! 1-bit PNG output. The e-ink panel wants true monochrome, so the rendered
//! grayscale canvas is thresholded and bit-packed before encoding with
//! BitDepth::One.

use anyhow::{Context, Result};
use image::GrayImage;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

/// Luma at or above this renders white; below, black. Text and logo are
/// drawn near the extremes so the exact cut barely matters.
const THRESHOLD: u8 = 128;

pub fn save_monochrome_png(img: &GrayImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }

    let (width, height) = img.dimensions();
    let packed = pack_rows(img);

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), width, height);
    encoder.set_color(png::ColorType::Grayscale);
    encoder.set_depth(png::BitDepth::One);
    let mut writer = encoder.write_header().context("writing png header")?;
    writer.write_image_data(&packed).context("writing png data")?;
    writer.finish().context("finishing png")?;
    Ok(())
}

/// Pack each row into MSB-first 1-bit samples, rows padded to a byte boundary.
fn pack_rows(img: &GrayImage) -> Vec<u8> {
    let width = img.width() as usize;
    let row_bytes = width.div_ceil(8);
    let mut packed = vec![0u8; row_bytes * img.height() as usize];
    for (y, row) in img.rows().enumerate() {
        for (x, pixel) in row.enumerate() {
            if pixel.0[0] >= THRESHOLD {
                packed[y * row_bytes + x / 8] |= 0x80 >> (x % 8);
            }
        }
    }
    packed
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn packing_is_msb_first_with_padded_rows() {
        // 10px wide: 2 bytes per row, last 6 bits of the second byte unused.
        let mut img = GrayImage::from_pixel(10, 2, Luma([0u8]));
        img.put_pixel(0, 0, Luma([255]));
        img.put_pixel(9, 0, Luma([255]));
        img.put_pixel(8, 1, Luma([255]));

        let packed = pack_rows(&img);
        assert_eq!(packed.len(), 4);
        assert_eq!(packed[0], 0b1000_0000);
        assert_eq!(packed[1], 0b0100_0000);
        assert_eq!(packed[2], 0b0000_0000);
        assert_eq!(packed[3], 0b1000_0000);
    }

    #[test]
    fn midtones_split_at_the_threshold() {
        let mut img = GrayImage::from_pixel(2, 1, Luma([THRESHOLD]));
        img.put_pixel(1, 0, Luma([THRESHOLD - 1]));
        assert_eq!(pack_rows(&img)[0], 0b1000_0000);
    }

    #[test]
    fn saved_file_appears_on_disk() {
        let dir = std::env::temp_dir().join("trmnl-mlb-eink-test");
        let path = dir.join("card.png");
        let img = GrayImage::from_pixel(16, 8, Luma([255u8]));
        save_monochrome_png(&img, &path).unwrap();
        assert!(path.exists());
        fs::remove_dir_all(&dir).ok();
    }
}
