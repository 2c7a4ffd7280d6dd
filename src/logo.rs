use anyhow::{Context, Result};
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Rgba, RgbaImage};
use log::{info, warn};
use std::time::Duration;

const LOGO_TIMEOUT: Duration = Duration::from_secs(10);

/// Download and prepare the team logo for the 1-bit canvas. Any network or
/// decode failure degrades to `None`; rendering proceeds without a logo.
pub async fn fetch_logo(
    client: &reqwest::Client,
    url: &str,
    size: (u32, u32),
) -> Option<GrayImage> {
    match try_fetch_logo(client, url, size).await {
        Ok(logo) => {
            info!("logo ready ({}x{})", logo.width(), logo.height());
            Some(logo)
        }
        Err(err) => {
            warn!("logo unavailable ({url}): {err:#}");
            None
        }
    }
}

async fn try_fetch_logo(
    client: &reqwest::Client,
    url: &str,
    size: (u32, u32),
) -> Result<GrayImage> {
    let bytes = client
        .get(url)
        .timeout(LOGO_TIMEOUT)
        .send()
        .await
        .context("logo request failed")?
        .error_for_status()
        .context("logo request rejected")?
        .bytes()
        .await
        .context("logo download interrupted")?;
    let decoded = image::load_from_memory(&bytes).context("logo decode failed")?;
    Ok(flatten_to_gray(decoded, size))
}

/// Composite transparency onto white (e-ink has no alpha), grayscale, and
/// resize to the pane size.
fn flatten_to_gray(decoded: DynamicImage, size: (u32, u32)) -> GrayImage {
    let rgba = decoded.to_rgba8();
    let mut flat = RgbaImage::from_pixel(rgba.width(), rgba.height(), Rgba([255, 255, 255, 255]));
    imageops::overlay(&mut flat, &rgba, 0, 0);
    let gray = DynamicImage::ImageRgba8(flat).to_luma8();
    imageops::resize(&gray, size.0, size.1, FilterType::Lanczos3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transparent_pixels_flatten_to_white() {
        let mut src = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 0]));
        src.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
        let gray = flatten_to_gray(DynamicImage::ImageRgba8(src), (4, 4));
        assert_eq!(gray.dimensions(), (4, 4));
        // Fully transparent corner shows the white background.
        assert_eq!(gray.get_pixel(3, 3).0[0], 255);
    }

    #[test]
    fn output_matches_the_requested_pane_size() {
        let src = RgbaImage::from_pixel(500, 500, Rgba([128, 128, 128, 255]));
        let gray = flatten_to_gray(DynamicImage::ImageRgba8(src), (130, 130));
        assert_eq!(gray.dimensions(), (130, 130));
    }
}
