//! Pixel-level logo operations: decoding, grayscale, inversion, colour sampling, text marks and
//! the image + wordmark lockup.

use std::{io::Cursor, sync::Arc};

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage, imageops};
use palette::Srgb;
use tracing::info;

use crate::{
    error::{FallbackReason, Fallible},
    services::{
        color,
        markup::{escape_xml, svg_document},
    },
};

/// Longest side a decoded source is kept at; larger sources are downscaled.
const MAX_SOURCE_SIDE: u32 = 1024;
/// Side of the square abbreviation badge.
pub const BADGE_SIDE: u32 = 512;
/// Side of the square lockup card.
pub const LOCKUP_SIDE: u32 = 1000;
/// Box the source logo is fitted into on the lockup card.
const LOCKUP_LOGO_BOX: u32 = 440;
/// Top edge of the logo box on the lockup card.
const LOCKUP_LOGO_TOP: u32 = 120;
/// Horizontal room for the wordmark inside the card border.
const LOCKUP_TEXT_WIDTH: u32 = 840;
/// Advance of a heavy uppercase glyph as a fraction of the font size.
const LOCKUP_GLYPH_ADVANCE: f32 = 0.72;
/// Extra spacing between wordmark glyphs, in pixels.
const LOCKUP_LETTER_SPACING: u32 = 4;
/// Wordmark size for short names.
const LOCKUP_MAX_FONT: u32 = 120;
/// Below this size a single-line wordmark is wrapped onto two lines.
const LOCKUP_MIN_SINGLE_LINE_FONT: u32 = 48;
/// Pixels with alpha below this are ignored when sampling colours.
const OPAQUE_ALPHA: u8 = 128;
/// Pixels with every channel above this count as background white.
const NEAR_WHITE: u8 = 240;
/// Lightness removed from the sampled primary for the secondary colour.
const SECONDARY_DARKEN: f32 = 0.2;

/// Default pair used when no colour can be sampled from the source.
pub const DEFAULT_PRIMARY: Srgb<u8> = Srgb::new(0x25, 0x63, 0xEB);
/// Secondary half of the default pair.
pub const DEFAULT_SECONDARY: Srgb<u8> = Srgb::new(0x1E, 0x40, 0xAF);

/// Primary/secondary pair sampled from a logo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoColors {
    /// Mean of the opaque, non-white pixels.
    pub primary: Srgb<u8>,
    /// Darkened primary.
    pub secondary: Srgb<u8>,
}

impl Default for LogoColors {
    fn default() -> Self {
        Self {
            primary: DEFAULT_PRIMARY,
            secondary: DEFAULT_SECONDARY,
        }
    }
}

/// Typeface family chosen for the abbreviation mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkFont {
    /// Light samples with little saturation.
    MinimalSans,
    /// Strongly saturated samples.
    GeometricSans,
    /// Dark samples.
    ClassicSans,
    /// Everything else.
    NeutralSans,
}

impl MarkFont {
    /// CSS font stack used in the badge markup.
    pub fn stack(self) -> &'static str {
        match self {
            MarkFont::MinimalSans => "'Helvetica Neue', Arial, sans-serif",
            MarkFont::GeometricSans => "Montserrat, Futura, 'Century Gothic', sans-serif",
            MarkFont::ClassicSans => "Verdana, Tahoma, 'DejaVu Sans', sans-serif",
            MarkFont::NeutralSans => "Inter, Roboto, 'Noto Sans', sans-serif",
        }
    }

    /// Font weight paired with the family.
    pub fn weight(self) -> u16 {
        match self {
            MarkFont::MinimalSans => 300,
            MarkFont::GeometricSans => 700,
            MarkFont::ClassicSans | MarkFont::NeutralSans => 600,
        }
    }
}

/// Pick the badge typeface from the sampled colour's brightness and saturation.
pub fn mark_font(sample: Srgb<u8>) -> MarkFont {
    let hsl = color::to_hsl(sample);
    let brightness = hsl.lightness;
    let saturation = hsl.saturation;
    if brightness > 0.7 && saturation < 0.25 {
        MarkFont::MinimalSans
    } else if saturation > 0.6 {
        MarkFont::GeometricSans
    } else if brightness < 0.3 {
        MarkFont::ClassicSans
    } else {
        MarkFont::NeutralSans
    }
}

/// Up to three initials: first letter of each word, or the first two letters of a single word.
pub fn initials(business_name: &str) -> String {
    let words: Vec<&str> = business_name
        .split_whitespace()
        .filter(|word| word.chars().any(char::is_alphanumeric))
        .collect();

    let letters: String = match words.as_slice() {
        [] => "B".into(),
        [single] => single.chars().filter(|c| c.is_alphanumeric()).take(2).collect(),
        many => many
            .iter()
            .filter_map(|word| word.chars().find(|c| c.is_alphanumeric()))
            .take(3)
            .collect(),
    };
    letters.to_uppercase()
}

/// Decoder and rasterizer sharing one font database.
#[derive(Clone)]
pub struct Imaging {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl Imaging {
    /// Use an already-populated font database.
    pub fn new(fontdb: Arc<usvg::fontdb::Database>) -> Self {
        Self { fontdb }
    }

    /// Load the host's system fonts once.
    pub fn with_system_fonts() -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        info!(faces = db.len(), "loaded system fonts for logo rendering");
        Self::new(Arc::new(db))
    }

    /// Decode a raster image, or rasterize an SVG document.
    pub fn decode_source(&self, bytes: &[u8]) -> Fallible<RgbaImage> {
        let decoded = match image::load_from_memory(bytes) {
            Ok(image) => image,
            Err(raster_err) => {
                let tree = self.parse_svg(bytes).map_err(|svg_err| {
                    FallbackReason::Decode(format!("not a raster ({raster_err}) nor SVG ({svg_err})"))
                })?;
                let size = tree.size();
                let scale = MAX_SOURCE_SIDE as f32 / size.width().max(size.height());
                let width = (size.width() * scale).round().max(1.0) as u32;
                let height = (size.height() * scale).round().max(1.0) as u32;
                return render_tree(&tree, width, height);
            }
        };

        let decoded = if decoded.width().max(decoded.height()) > MAX_SOURCE_SIDE {
            decoded.resize(
                MAX_SOURCE_SIDE,
                MAX_SOURCE_SIDE,
                imageops::FilterType::Lanczos3,
            )
        } else {
            decoded
        };
        Ok(decoded.to_rgba8())
    }

    /// Rasterize SVG markup into an image of exactly `width` x `height` pixels.
    pub fn rasterize_svg(&self, svg: &str, width: u32, height: u32) -> Fallible<RgbaImage> {
        let tree = self
            .parse_svg(svg.as_bytes())
            .map_err(|err| FallbackReason::Render(err.to_string()))?;
        render_tree(&tree, width, height)
    }

    fn parse_svg(&self, bytes: &[u8]) -> Result<usvg::Tree, usvg::Error> {
        let options = usvg::Options {
            fontdb: self.fontdb.clone(),
            ..Default::default()
        };
        usvg::Tree::from_data(bytes, &options)
    }

    /// Circular initials badge filled with the sampled gradient.
    pub fn abbreviation_mark(
        &self,
        business_name: &str,
        colors: LogoColors,
    ) -> Fallible<RgbaImage> {
        let svg = abbreviation_svg(&initials(business_name), colors, mark_font(colors.primary));
        self.rasterize_svg(&svg, BADGE_SIDE, BADGE_SIDE)
    }

    /// Rounded card holding a shrunk copy of `source` above the upper-cased business name.
    pub fn wordmark_lockup(
        &self,
        source: &RgbaImage,
        business_name: &str,
        colors: LogoColors,
    ) -> Fallible<RgbaImage> {
        let mut card = self.rasterize_svg(
            &lockup_svg(business_name, colors),
            LOCKUP_SIDE,
            LOCKUP_SIDE,
        )?;

        let logo = DynamicImage::ImageRgba8(source.clone())
            .resize(
                LOCKUP_LOGO_BOX,
                LOCKUP_LOGO_BOX,
                imageops::FilterType::Lanczos3,
            )
            .to_rgba8();
        let x = (LOCKUP_SIDE - logo.width()) / 2;
        let y = LOCKUP_LOGO_TOP + (LOCKUP_LOGO_BOX - logo.height()) / 2;
        imageops::overlay(&mut card, &logo, i64::from(x), i64::from(y));
        Ok(card)
    }
}

fn render_tree(tree: &usvg::Tree, width: u32, height: u32) -> Fallible<RgbaImage> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| FallbackReason::Render(format!("cannot allocate {width}x{height} pixmap")))?;

    let size = tree.size();
    let transform = resvg::tiny_skia::Transform::from_scale(
        width as f32 / size.width(),
        height as f32 / size.height(),
    );
    resvg::render(tree, transform, &mut pixmap.as_mut());

    let mut image = RgbaImage::new(width, height);
    for (pixel, premultiplied) in image.pixels_mut().zip(pixmap.pixels()) {
        let c = premultiplied.demultiply();
        *pixel = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    Ok(image)
}

/// Luma-only copy of `source`, alpha preserved.
///
/// Uses integer Rec. 709 weights so a second pass leaves the image unchanged.
pub fn grayscale(source: &RgbaImage) -> RgbaImage {
    let mut output = source.clone();
    for pixel in output.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        let luma = (2126 * u32::from(r) + 7152 * u32::from(g) + 722 * u32::from(b) + 5000) / 10_000;
        let luma = luma.min(255) as u8;
        *pixel = Rgba([luma, luma, luma, a]);
    }
    output
}

/// Per-channel negation of `source`, alpha preserved.
pub fn invert(source: &RgbaImage) -> RgbaImage {
    let mut output = source.clone();
    imageops::invert(&mut output);
    output
}

/// Mean colour of the opaque, non-white pixels, and its darkened companion.
pub fn dominant_colors(source: &RgbaImage) -> Fallible<LogoColors> {
    let mut sums = [0u64; 3];
    let mut count = 0u64;
    for pixel in source.pixels() {
        let [r, g, b, a] = pixel.0;
        if a < OPAQUE_ALPHA || (r > NEAR_WHITE && g > NEAR_WHITE && b > NEAR_WHITE) {
            continue;
        }
        sums[0] += u64::from(r);
        sums[1] += u64::from(g);
        sums[2] += u64::from(b);
        count += 1;
    }
    if count == 0 {
        return Err(FallbackReason::NoOpaquePixels);
    }

    let mean = |sum: u64| ((sum + count / 2) / count) as u8;
    let primary = Srgb::new(mean(sums[0]), mean(sums[1]), mean(sums[2]));
    Ok(LogoColors {
        primary,
        secondary: color::darken(primary, SECONDARY_DARKEN),
    })
}

/// Encode as PNG.
pub fn encode_png(image: &RgbaImage) -> Fallible<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(|err| FallbackReason::Encode(err.to_string()))?;
    Ok(buffer.into_inner())
}

fn gradient_defs(id: &str, colors: LogoColors) -> String {
    format!(
        r#"<defs><linearGradient id="{id}" x1="0" y1="0" x2="1" y2="1"><stop offset="0" stop-color="{}"/><stop offset="1" stop-color="{}"/></linearGradient></defs>"#,
        color::to_hex(colors.primary),
        color::to_hex(colors.secondary)
    )
}

/// Badge markup: gradient disc with centred white initials.
pub fn abbreviation_svg(initials: &str, colors: LogoColors, font: MarkFont) -> String {
    let side = BADGE_SIDE;
    let center = side / 2;
    let font_size = match initials.chars().count() {
        0 | 1 => 240,
        2 => 190,
        _ => 140,
    };
    let body = format!(
        r##"{defs}<circle cx="{center}" cy="{center}" r="{radius}" fill="url(#badge)"/><text x="{center}" y="{baseline}" text-anchor="middle" font-family="{family}" font-weight="{weight}" font-size="{font_size}" fill="#FFFFFF">{text}</text>"##,
        defs = gradient_defs("badge", colors),
        radius = center - 8,
        baseline = center + font_size * 7 / 20,
        family = font.stack(),
        weight = font.weight(),
        text = escape_xml(initials),
    );
    svg_document(side, side, &body)
}

/// Lockup card markup without the logo, which is composited afterwards.
pub fn lockup_svg(business_name: &str, colors: LogoColors) -> String {
    let side = LOCKUP_SIDE;
    let name = business_name.trim().to_uppercase();
    let layout = lockup_text(&name);
    let line_height = layout.font_size * 23 / 20;
    let center = side / 2;
    let lines: String = layout
        .lines
        .iter()
        .enumerate()
        .map(|(index, line)| {
            let dy = if index == 0 { 0 } else { line_height };
            format!(
                r#"<tspan x="{center}" dy="{dy}">{text}</tspan>"#,
                text = escape_xml(line)
            )
        })
        .collect();
    let body = format!(
        r##"{defs}<rect x="20" y="20" width="{inner}" height="{inner}" rx="64" fill="#FFFFFF" stroke="{stroke}" stroke-width="4"/><text x="{center}" y="{baseline}" text-anchor="middle" font-family="Montserrat, Inter, 'Helvetica Neue', Arial, sans-serif" font-weight="800" font-size="{font_size}" letter-spacing="{spacing}" fill="url(#wordmark)">{lines}</text>"##,
        defs = gradient_defs("wordmark", colors),
        inner = side - 40,
        stroke = color::to_hex(color::tint(colors.primary)),
        baseline = LOCKUP_LOGO_TOP + LOCKUP_LOGO_BOX + 120 + layout.font_size / 2,
        font_size = layout.font_size,
        spacing = LOCKUP_LETTER_SPACING,
    );
    svg_document(side, side, &body)
}

/// Wordmark lines and the font size at which the widest one fits the card.
#[derive(Debug, PartialEq, Eq)]
struct LockupText {
    lines: Vec<String>,
    font_size: u32,
}

/// One line while it fits at [`LOCKUP_MIN_SINGLE_LINE_FONT`], otherwise two lines split at
/// the space nearest the middle (or the middle itself for a single long word).
fn lockup_text(name: &str) -> LockupText {
    let chars: Vec<char> = name.chars().collect();
    let single = fitting_font_size(chars.len());
    if single >= LOCKUP_MIN_SINGLE_LINE_FONT {
        return LockupText {
            lines: vec![name.to_string()],
            font_size: single,
        };
    }

    let middle = chars.len() / 2;
    let split = chars
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_whitespace())
        .map(|(position, _)| position)
        .min_by_key(|position| position.abs_diff(middle))
        .unwrap_or(middle);
    let first: String = chars[..split].iter().collect::<String>().trim().to_string();
    let second: String = chars[split..].iter().collect::<String>().trim().to_string();
    let widest = first.chars().count().max(second.chars().count());
    LockupText {
        lines: [first, second]
            .into_iter()
            .filter(|line| !line.is_empty())
            .collect(),
        font_size: fitting_font_size(widest),
    }
}

/// Largest font size, capped at [`LOCKUP_MAX_FONT`], at which `chars` glyphs fit the card.
fn fitting_font_size(chars: usize) -> u32 {
    let chars = chars.max(1) as f32;
    let size =
        (LOCKUP_TEXT_WIDTH as f32 / chars - LOCKUP_LETTER_SPACING as f32) / LOCKUP_GLYPH_ADVANCE;
    size.clamp(1.0, LOCKUP_MAX_FONT as f32).floor() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_logo() -> RgbaImage {
        RgbaImage::from_fn(40, 20, |x, y| {
            if x < 20 {
                Rgba([200, 30, 60, 255])
            } else if y < 10 {
                Rgba([20, 120, 240, 200])
            } else {
                Rgba([255, 255, 255, 0])
            }
        })
    }

    fn estimated_width(chars: usize, font_size: u32) -> f32 {
        chars as f32 * (font_size as f32 * LOCKUP_GLYPH_ADVANCE + LOCKUP_LETTER_SPACING as f32)
    }

    fn imaging() -> Imaging {
        Imaging::new(Arc::new(usvg::fontdb::Database::new()))
    }

    #[test]
    fn grayscale_is_idempotent() {
        let once = grayscale(&sample_logo());
        assert_eq!(grayscale(&once), once);
        assert!(once.pixels().all(|p| p.0[0] == p.0[1] && p.0[1] == p.0[2]));
    }

    #[test]
    fn invert_is_an_involution() {
        let source = sample_logo();
        let inverted = invert(&source);
        assert_ne!(inverted, source);
        assert_eq!(invert(&inverted), source);
        assert_eq!(inverted.get_pixel(0, 0).0, [55, 225, 195, 255]);
    }

    #[test]
    fn dominant_colors_skip_transparent_and_white() {
        let image = RgbaImage::from_fn(4, 4, |x, _| {
            if x < 2 {
                Rgba([200, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        });
        let colors = dominant_colors(&image).unwrap();
        assert_eq!(colors.primary, Srgb::new(200, 0, 0));
        assert!(
            color::relative_luminance(colors.secondary)
                < color::relative_luminance(colors.primary)
        );

        let blank = RgbaImage::from_pixel(3, 3, Rgba([0, 0, 0, 0]));
        assert_eq!(dominant_colors(&blank), Err(FallbackReason::NoOpaquePixels));
    }

    #[test]
    fn initials_follow_word_rules() {
        assert_eq!(initials("Acme"), "AC");
        assert_eq!(initials("blue ocean coffee roasters"), "BOC");
        assert_eq!(initials("Вкусная еда"), "ВЕ");
        assert_eq!(initials("  "), "B");
    }

    #[test]
    fn mark_font_heuristic() {
        assert_eq!(mark_font(Srgb::new(0xEE, 0xEE, 0xEE)), MarkFont::MinimalSans);
        assert_eq!(mark_font(Srgb::new(0xFF, 0x00, 0x00)), MarkFont::GeometricSans);
        assert_eq!(mark_font(Srgb::new(0x20, 0x22, 0x28)), MarkFont::ClassicSans);
        assert_eq!(mark_font(Srgb::new(0x70, 0x80, 0x90)), MarkFont::NeutralSans);
    }

    #[test]
    fn decodes_png_and_svg_sources() {
        let imaging = imaging();
        let png = encode_png(&sample_logo()).unwrap();
        let decoded = imaging.decode_source(&png).unwrap();
        assert_eq!(decoded, sample_logo());

        let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="64" height="32"><rect width="64" height="32" fill="#FF0000"/></svg>"##;
        let rasterized = imaging.decode_source(svg).unwrap();
        assert_eq!(rasterized.dimensions(), (1024, 512));
        assert_eq!(rasterized.get_pixel(10, 10).0, [255, 0, 0, 255]);

        assert!(matches!(
            imaging.decode_source(b"definitely not an image"),
            Err(FallbackReason::Decode(_))
        ));
    }

    #[test]
    fn badge_is_filled_with_the_gradient() {
        let badge = imaging()
            .abbreviation_mark("Acme", LogoColors::default())
            .unwrap();
        assert_eq!(badge.dimensions(), (BADGE_SIDE, BADGE_SIDE));
        assert_eq!(badge.get_pixel(256, 40).0[3], 255);
        assert_eq!(badge.get_pixel(2, 2).0[3], 0);
    }

    #[test]
    fn lockup_places_logo_on_the_card() {
        let lockup = imaging()
            .wordmark_lockup(&sample_logo(), "Acme", LogoColors::default())
            .unwrap();
        assert_eq!(lockup.dimensions(), (LOCKUP_SIDE, LOCKUP_SIDE));
        assert_eq!(lockup.get_pixel(500, 50).0, [255, 255, 255, 255]);
        // Left half of the logo is solid red-ish after scaling into the centre box.
        let logo_pixel =
            lockup.get_pixel(LOCKUP_SIDE / 2 - 100, LOCKUP_LOGO_TOP + LOCKUP_LOGO_BOX / 2);
        assert_eq!(logo_pixel.0[3], 255);
        assert!(logo_pixel.0[0] > 150);
    }

    #[test]
    fn markup_escapes_business_names() {
        let svg = lockup_svg("Tom & Jerry", LogoColors::default());
        assert!(svg.contains("TOM &amp; JERRY"));
        assert!(svg.contains("#2563EB"));
    }

    #[test]
    fn short_names_stay_on_one_large_line() {
        let layout = lockup_text("ACME");
        assert_eq!(layout.lines, vec!["ACME"]);
        assert_eq!(layout.font_size, LOCKUP_MAX_FONT);
    }

    #[test]
    fn long_names_wrap_and_shrink_to_the_card() {
        let words = "NORTHWIND TRADING AND LOGISTICS ".repeat(4);
        let name = words.trim();
        let layout = lockup_text(name);
        assert_eq!(layout.lines.len(), 2);
        for line in &layout.lines {
            let width = estimated_width(line.chars().count(), layout.font_size);
            assert!(width <= LOCKUP_TEXT_WIDTH as f32, "{line} is {width}px wide");
        }
        assert_eq!(layout.lines.join(" "), name);
    }

    #[test]
    fn unbroken_names_are_split_in_the_middle() {
        let name = "X".repeat(120);
        let layout = lockup_text(&name);
        assert_eq!(layout.lines, vec!["X".repeat(60), "X".repeat(60)]);
        assert!(estimated_width(60, layout.font_size) <= LOCKUP_TEXT_WIDTH as f32);

        let svg = lockup_svg(&name, LogoColors::default());
        assert_eq!(svg.matches("<tspan").count(), 2);
        assert!(svg.contains(&format!("font-size=\"{}\"", layout.font_size)));
    }
}
