//! Card layout: logo and standings in a left pane, upcoming games in a right
//! pane, refresh footer bottom-right. Overlong text is ellipsized and games
//! that would overflow the canvas are dropped rather than clipped.

use crate::config::Config;
use ab_glyph::{FontVec, PxScale};
use anyhow::{Result, bail};
use chrono::Local;
use image::{GrayImage, Luma, imageops};
use imageproc::drawing::{draw_text_mut, text_size};
use log::{debug, info, warn};
use mlb_api::{Standings, UpcomingGame};
use std::fs;

const WHITE: Luma<u8> = Luma([255]);
const BLACK: Luma<u8> = Luma([0]);

const SIZE_LARGE: f32 = 36.0;
const SIZE_MEDIUM_BOLD: f32 = 28.0;
const SIZE_MEDIUM: f32 = 26.0;
const SIZE_SMALL: f32 = 20.0;
const SIZE_XSMALL: f32 = 16.0;

const EDGE_PAD: i32 = 20;
const MAX_GAMES_ON_CARD: usize = 3;

pub struct Fonts {
    regular: FontVec,
    bold: FontVec,
}

impl Fonts {
    /// Resolve fonts through the configured candidate list. No usable font at
    /// all is fatal — the card cannot be drawn without one.
    pub fn load(cfg: &Config) -> Result<Self> {
        Ok(Self {
            regular: load_first(&cfg.font_regular_candidates)?,
            bold: load_first(&cfg.font_bold_candidates)?,
        })
    }
}

fn load_first(candidates: &[String]) -> Result<FontVec> {
    for path in candidates {
        match fs::read(path) {
            Ok(bytes) => match FontVec::try_from_vec(bytes) {
                Ok(font) => {
                    info!("loaded font {path}");
                    return Ok(font);
                }
                Err(err) => warn!("unusable font {path}: {err}"),
            },
            Err(_) => debug!("font candidate missing: {path}"),
        }
    }
    bail!("no usable font found among {candidates:?}")
}

pub fn render_schedule_card(
    cfg: &Config,
    games: &[UpcomingGame],
    standings: &Standings,
    logo: Option<&GrayImage>,
    fonts: &Fonts,
) -> GrayImage {
    let mut img = GrayImage::from_pixel(cfg.canvas_width, cfg.canvas_height, WHITE);

    let (logo_w, logo_h) = cfg.logo_size;
    if let Some(logo) = logo {
        imageops::replace(&mut img, logo, i64::from(EDGE_PAD), i64::from(EDGE_PAD));
    }
    draw_standings(&mut img, fonts, standings, EDGE_PAD, EDGE_PAD + logo_h as i32 + 25);

    let right_x = logo_w as i32 + EDGE_PAD * 2 + 25;
    draw_games(&mut img, fonts, games, right_x, EDGE_PAD, cfg.canvas_width, cfg.canvas_height);
    draw_footer(&mut img, fonts, cfg.canvas_width, cfg.canvas_height);
    img
}

fn draw_standings(img: &mut GrayImage, fonts: &Fonts, standings: &Standings, x: i32, mut y: i32) {
    draw_text_mut(img, BLACK, x, y, scale(SIZE_MEDIUM), &fonts.regular, "Standings:");
    y += SIZE_MEDIUM as i32 + 10;
    draw_text_mut(img, BLACK, x, y, scale(SIZE_MEDIUM), &fonts.regular, &standings.record);
    y += SIZE_MEDIUM as i32 + 10;
    draw_text_mut(img, BLACK, x, y, scale(SIZE_SMALL), &fonts.regular, &standings.rank);
    y += SIZE_SMALL as i32 + 10;
    draw_text_mut(img, BLACK, x, y, scale(SIZE_SMALL), &fonts.regular, &standings.games_back);
}

fn draw_games(
    img: &mut GrayImage,
    fonts: &Fonts,
    games: &[UpcomingGame],
    x: i32,
    mut y: i32,
    width: u32,
    height: u32,
) {
    draw_text_mut(img, BLACK, x, y, scale(SIZE_LARGE), &fonts.bold, "Upcoming Games:");
    y += SIZE_LARGE as i32 + 20;

    if games.is_empty() {
        draw_text_mut(
            img,
            BLACK,
            x,
            y,
            scale(SIZE_MEDIUM),
            &fonts.regular,
            "No upcoming games found.",
        );
        return;
    }

    let footer_top = height as i32 - EDGE_PAD - SIZE_XSMALL as i32 - 10;
    for (i, game) in games.iter().take(MAX_GAMES_ON_CARD).enumerate() {
        let tv_lines = game.broadcasts.len().max(1) as i32;
        let estimated = SIZE_MEDIUM_BOLD as i32
            + 8
            + SIZE_MEDIUM as i32
            + 10
            + (SIZE_SMALL as i32 + 5) * tv_lines
            + 30;
        if y + estimated > footer_top {
            debug!("not enough vertical space for game {}", i + 1);
            if i == 0 {
                draw_text_mut(
                    img,
                    BLACK,
                    x,
                    y,
                    scale(SIZE_SMALL),
                    &fonts.regular,
                    "Not enough space for game details.",
                );
            }
            break;
        }

        draw_text_mut(img, BLACK, x, y, scale(SIZE_MEDIUM_BOLD), &fonts.bold, &game.game_time);
        y += SIZE_MEDIUM_BOLD as i32 + 8;

        let max_opponent_width = (width as i32 - (x + 10) - 10).max(0) as u32;
        let opponent = ellipsize_with(&game.opponent_display(), max_opponent_width, |s| {
            text_size(scale(SIZE_MEDIUM), &fonts.regular, s).0
        });
        draw_text_mut(img, BLACK, x + 10, y, scale(SIZE_MEDIUM), &fonts.regular, &opponent);
        y += SIZE_MEDIUM as i32 + 10;

        draw_text_mut(img, BLACK, x + 10, y, scale(SIZE_SMALL), &fonts.bold, "TV:");
        let channel_x = x + 10 + text_size(scale(SIZE_SMALL), &fonts.bold, "TV:  ").0 as i32;
        for (k, channel) in game.broadcasts.iter().enumerate() {
            if k > 0 {
                y += SIZE_SMALL as i32 + 5;
            }
            if y > height as i32 - (SIZE_SMALL as i32 + 5) {
                break;
            }
            draw_text_mut(img, BLACK, channel_x, y, scale(SIZE_SMALL), &fonts.regular, channel);
        }
        y += SIZE_SMALL as i32 + 5;
        y += 25;
    }
}

fn draw_footer(img: &mut GrayImage, fonts: &Fonts, width: u32, height: u32) {
    let footer = format!("Data refreshed on {}", Local::now().format("%m-%d-%Y"));
    let text_width = text_size(scale(SIZE_XSMALL), &fonts.regular, &footer).0 as i32;
    let x = width as i32 - text_width - 15;
    let y = height as i32 - SIZE_XSMALL as i32 - 15;
    draw_text_mut(img, BLACK, x, y, scale(SIZE_XSMALL), &fonts.regular, &footer);
}

fn scale(px: f32) -> PxScale {
    PxScale::from(px)
}

/// Trim one character at a time (plus a "..." tail) until the label fits.
/// Width measurement is injected so the policy is testable without a font.
fn ellipsize_with(text: &str, max_width: u32, measure: impl Fn(&str) -> u32) -> String {
    let mut body: Vec<char> = text.chars().collect();
    let mut label = text.to_owned();
    while measure(&label) > max_width && body.len() > 10 {
        body.pop();
        label = body.iter().collect::<String>() + "...";
    }
    label
}

#[cfg(test)]
mod tests {
    use super::*;

    // 10px per character stand-in for real glyph metrics.
    fn char_width(s: &str) -> u32 {
        s.chars().count() as u32 * 10
    }

    #[test]
    fn short_labels_pass_through_untouched() {
        assert_eq!(ellipsize_with("vs Cubs (Home)", 400, char_width), "vs Cubs (Home)");
    }

    #[test]
    fn long_labels_get_a_trailing_ellipsis_within_budget() {
        let label = ellipsize_with("@ Arizona Diamondbacks (Away)", 200, char_width);
        assert!(label.ends_with("..."));
        assert!(char_width(&label) <= 200);
    }

    #[test]
    fn trimming_stops_at_a_readable_minimum() {
        let label = ellipsize_with("@ Arizona Diamondbacks (Away)", 10, char_width);
        // 10 body chars + the ellipsis; never trimmed to nothing.
        assert_eq!(label, "@ Arizona ...");
    }

    #[test]
    fn missing_fonts_are_a_hard_error() {
        let err = load_first(&["/nonexistent/font.ttf".to_owned()]).unwrap_err();
        assert!(err.to_string().contains("no usable font"));
    }
}
