//! Hex parsing, HSL transforms, naming and WCAG contrast helpers.

use palette::{Clamp, Darken, Desaturate, FromColor, Hsl, Lighten, LinSrgb, Saturate, Srgb};

use crate::error::{FallbackReason, Fallible};

/// Substitute used whenever a catalog colour cannot be parsed.
pub const NEUTRAL_GRAY: &str = "#808080";
/// Display name of [`NEUTRAL_GRAY`].
pub const NEUTRAL_GRAY_NAME: &str = "Gray";

/// Lightness added to the primary for the surface tint.
pub const TINT_LIGHTEN: f32 = 0.40;
/// Saturation removed from the primary for the surface tint.
pub const TINT_DESATURATE: f32 = 0.30;
/// Lightness removed from the primary for the emphasis shade.
pub const SHADE_DARKEN: f32 = 0.20;
/// Saturation added to the primary for the emphasis shade.
pub const SHADE_SATURATE: f32 = 0.10;

/// Parse `#RRGGBB` (the leading `#` is optional).
pub fn parse_hex(hex: &str) -> Fallible<Srgb<u8>> {
    let trimmed = hex.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(FallbackReason::MalformedColor(hex.to_string()));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16)
            .map_err(|_| FallbackReason::MalformedColor(hex.to_string()))
    };
    Ok(Srgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Format as upper-case `#RRGGBB`.
pub fn to_hex(color: Srgb<u8>) -> String {
    format!("#{:02X}{:02X}{:02X}", color.red, color.green, color.blue)
}

/// Format as `rgb(r, g, b)`.
pub fn to_rgb_string(color: Srgb<u8>) -> String {
    format!("rgb({}, {}, {})", color.red, color.green, color.blue)
}

/// Normalise any parsable hex to upper-case `#RRGGBB`, or the neutral gray.
pub fn normalize_hex(hex: &str) -> Fallible<String> {
    parse_hex(hex).map(to_hex)
}

/// Convert to HSL (components in `0.0..=1.0`, hue in degrees).
pub fn to_hsl(color: Srgb<u8>) -> Hsl {
    Hsl::from_color(color.into_format::<f32>())
}

fn from_hsl(hsl: Hsl) -> Srgb<u8> {
    Srgb::<f32>::from_color(hsl.clamp()).clamp().into_format()
}

/// Lightened and desaturated variant used for backgrounds and cards.
pub fn tint(color: Srgb<u8>) -> Srgb<u8> {
    let hsl = to_hsl(color)
        .lighten_fixed(TINT_LIGHTEN)
        .desaturate_fixed(TINT_DESATURATE);
    from_hsl(hsl)
}

/// Darkened and saturated variant used for borders and emphasis.
pub fn shade(color: Srgb<u8>) -> Srgb<u8> {
    let hsl = to_hsl(color)
        .darken_fixed(SHADE_DARKEN)
        .saturate_fixed(SHADE_SATURATE);
    from_hsl(hsl)
}

/// Darken by a fixed amount of lightness.
pub fn darken(color: Srgb<u8>, amount: f32) -> Srgb<u8> {
    from_hsl(to_hsl(color).darken_fixed(amount))
}

/// WCAG 2.1 relative luminance in `0.0..=1.0`.
pub fn relative_luminance(color: Srgb<u8>) -> f32 {
    let linear: LinSrgb<f32> = color.into_format::<f32>().into_linear();
    0.2126 * linear.red + 0.7152 * linear.green + 0.0722 * linear.blue
}

/// WCAG contrast ratio between two colours, `1.0..=21.0`.
pub fn contrast_ratio(a: Srgb<u8>, b: Srgb<u8>) -> f32 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    let (light, dark) = if la >= lb { (la, lb) } else { (lb, la) };
    (light + 0.05) / (dark + 0.05)
}

/// Human-readable colour name derived from hue and lightness.
pub fn describe(color: Srgb<u8>) -> String {
    let hsl = to_hsl(color);
    let lightness = hsl.lightness;

    if hsl.saturation < 0.12 {
        let name = match lightness {
            l if l > 0.95 => "White",
            l if l > 0.75 => "Light Gray",
            l if l > 0.35 => "Gray",
            l if l > 0.1 => "Charcoal",
            _ => "Black",
        };
        return name.to_string();
    }

    let hue = hsl.hue.into_positive_degrees();
    let base = match hue {
        h if h < 15.0 => "Red",
        h if h < 40.0 => "Orange",
        h if h < 55.0 => "Amber",
        h if h < 70.0 => "Yellow",
        h if h < 95.0 => "Lime",
        h if h < 150.0 => "Green",
        h if h < 175.0 => "Teal",
        h if h < 195.0 => "Cyan",
        h if h < 215.0 => "Azure",
        h if h < 245.0 => "Blue",
        h if h < 265.0 => "Indigo",
        h if h < 290.0 => "Violet",
        h if h < 330.0 => "Magenta",
        h if h < 350.0 => "Rose",
        _ => "Red",
    };

    if lightness > 0.8 {
        format!("Light {base}")
    } else if lightness < 0.25 {
        format!("Deep {base}")
    } else {
        base.to_string()
    }
}
