//! Ready-to-render mockups parametrized by the bundle's palette, fonts and logos.
//!
//! Every colour and font reference in the markup is read from the [`BundleView`], never
//! hard-coded, so each template stays on-brand by construction.

use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    services::{
        BundleView, FontRef,
        markup::{escape_xml, svg_document},
    },
    state::brand::{ColorRole, LogoVariantKind},
};

/// Which mockup a template renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationKind {
    /// 85 x 55 mm business card.
    BusinessCard,
    /// 16:9 title slide.
    PresentationCover,
    /// 16:9 content slide.
    PresentationSlide,
    /// Square feed post.
    SocialPost,
    /// Vertical story frame.
    SocialStory,
    /// Profile cover banner.
    SocialCover,
    /// HTML email signature.
    EmailSignature,
    /// HTML landing page style guide.
    LandingGuide,
}

/// Markup language of a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MarkupFormat {
    /// Standalone SVG document.
    Svg,
    /// HTML fragment with inline styles.
    Html,
}

/// One rendered mockup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ApplicationTemplate {
    /// Which mockup this is.
    pub kind: ApplicationKind,
    /// Display name.
    pub name: String,
    /// Markup language of `markup`.
    pub format: MarkupFormat,
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Rendered document.
    pub markup: String,
}

/// Colours and fonts every template draws from.
struct Theme<'a> {
    primary: &'a str,
    secondary: &'a str,
    accent: &'a str,
    neutral: &'a str,
    background: &'a str,
    text: &'a str,
    tint: &'a str,
    heading: FontRef<'a>,
    body: FontRef<'a>,
    name: String,
    slogan: String,
    logo: Option<String>,
    mark: Option<String>,
}

impl<'a> Theme<'a> {
    fn new(bundle: &BundleView<'a>) -> Self {
        let has_tint = bundle.colors.iter().any(|c| c.role == ColorRole::Tint);
        let tint = if has_tint {
            bundle.hex(ColorRole::Tint)
        } else {
            bundle.hex(ColorRole::Background)
        };
        Self {
            primary: bundle.hex(ColorRole::Primary),
            secondary: bundle.hex(ColorRole::Secondary),
            accent: bundle.hex(ColorRole::Accent),
            neutral: bundle.hex(ColorRole::Neutral),
            background: bundle.hex(ColorRole::Background),
            text: bundle.hex(ColorRole::Text),
            tint,
            heading: bundle.heading_font(),
            body: bundle.body_font(),
            name: escape_xml(bundle.business_name.trim()),
            slogan: escape_xml(bundle.slogan.trim()),
            logo: bundle.logo_url(LogoVariantKind::Original).map(escape_xml),
            mark: bundle
                .logo_url(LogoVariantKind::Abbreviation)
                .or_else(|| bundle.logo_url(LogoVariantKind::Original))
                .map(escape_xml),
        }
    }

    /// Logo image at the given box, or the business name set in the heading font.
    fn logo_svg(&self, x: u32, y: u32, size: u32, url: Option<&str>) -> String {
        match url {
            Some(url) => format!(
                r#"<image href="{url}" x="{x}" y="{y}" width="{size}" height="{size}" preserveAspectRatio="xMidYMid meet"/>"#
            ),
            None => format!(
                r#"<text x="{x}" y="{baseline}" font-family="{family}" font-weight="700" font-size="{font_size}" fill="{primary}">{name}</text>"#,
                baseline = y + size / 2,
                family = self.heading.family,
                font_size = size / 3,
                primary = self.primary,
                name = self.name,
            ),
        }
    }
}

/// Render every template for `bundle`. Pure: reads nothing but its input.
pub fn compose_applications(bundle: &BundleView<'_>) -> Vec<ApplicationTemplate> {
    let theme = Theme::new(bundle);
    vec![
        business_card(&theme),
        presentation_cover(&theme),
        presentation_slide(&theme),
        social_post(&theme),
        social_story(&theme),
        social_cover(&theme),
        email_signature(&theme),
        landing_guide(&theme),
    ]
}

fn svg_template(
    kind: ApplicationKind,
    name: &str,
    width: u32,
    height: u32,
    body: String,
) -> ApplicationTemplate {
    ApplicationTemplate {
        kind,
        name: name.to_string(),
        format: MarkupFormat::Svg,
        width,
        height,
        markup: svg_document(width, height, &body),
    }
}

fn business_card(t: &Theme<'_>) -> ApplicationTemplate {
    let body = format!(
        r#"<rect width="1050" height="600" fill="{background}"/><rect width="24" height="600" fill="{primary}"/>{logo}<text x="96" y="360" font-family="{heading}" font-weight="700" font-size="56" fill="{text}">{name}</text><text x="96" y="420" font-family="{body}" font-size="28" fill="{neutral}">{slogan}</text><rect x="96" y="470" width="120" height="6" fill="{accent}"/><text x="96" y="540" font-family="{body}" font-size="24" fill="{text}">+1 000 000 00 00 · hello@example.com</text>"#,
        background = t.background,
        primary = t.primary,
        accent = t.accent,
        neutral = t.neutral,
        text = t.text,
        heading = t.heading.family,
        body = t.body.family,
        name = t.name,
        slogan = t.slogan,
        logo = t.logo_svg(96, 72, 160, t.logo.as_deref()),
    );
    svg_template(ApplicationKind::BusinessCard, "Business card", 1050, 600, body)
}

fn presentation_cover(t: &Theme<'_>) -> ApplicationTemplate {
    let body = format!(
        r#"<defs><linearGradient id="cover" x1="0" y1="0" x2="1" y2="1"><stop offset="0" stop-color="{primary}"/><stop offset="1" stop-color="{secondary}"/></linearGradient></defs><rect width="1920" height="1080" fill="url(#cover)"/>{logo}<text x="160" y="560" font-family="{heading}" font-weight="800" font-size="120" fill="{background}">{name}</text><text x="160" y="660" font-family="{body}" font-size="48" fill="{tint}">{slogan}</text><rect x="160" y="720" width="240" height="10" fill="{accent}"/>"#,
        primary = t.primary,
        secondary = t.secondary,
        background = t.background,
        tint = t.tint,
        accent = t.accent,
        heading = t.heading.family,
        body = t.body.family,
        name = t.name,
        slogan = t.slogan,
        logo = t.logo_svg(160, 140, 200, t.logo.as_deref()),
    );
    svg_template(ApplicationKind::PresentationCover, "Presentation cover", 1920, 1080, body)
}

fn presentation_slide(t: &Theme<'_>) -> ApplicationTemplate {
    let bullets: String = ["Key point one", "Key point two", "Key point three"]
        .iter()
        .enumerate()
        .map(|(index, label)| {
            let y = 420 + index as u32 * 110;
            format!(
                r#"<circle cx="176" cy="{cy}" r="14" fill="{accent}"/><text x="220" y="{y}" font-family="{body}" font-size="44" fill="{text}">{label}</text>"#,
                cy = y - 14,
                accent = t.accent,
                body = t.body.family,
                text = t.text,
            )
        })
        .collect();
    let body = format!(
        r#"<rect width="1920" height="1080" fill="{background}"/><rect width="1920" height="200" fill="{primary}"/><text x="160" y="130" font-family="{heading}" font-weight="700" font-size="72" fill="{background}">Slide title</text>{bullets}<rect x="1200" y="340" width="560" height="560" rx="32" fill="{tint}"/>{mark}<text x="160" y="1030" font-family="{body}" font-size="28" fill="{neutral}">{name}</text>"#,
        background = t.background,
        primary = t.primary,
        tint = t.tint,
        neutral = t.neutral,
        heading = t.heading.family,
        body = t.body.family,
        name = t.name,
        mark = t.logo_svg(1680, 960, 80, t.mark.as_deref()),
    );
    svg_template(ApplicationKind::PresentationSlide, "Presentation slide", 1920, 1080, body)
}

fn social_post(t: &Theme<'_>) -> ApplicationTemplate {
    let body = format!(
        r#"<rect width="1080" height="1080" fill="{primary}"/><circle cx="900" cy="180" r="220" fill="{accent}" opacity="0.85"/>{mark}<text x="96" y="640" font-family="{heading}" font-weight="800" font-size="96" fill="{background}">{name}</text><text x="96" y="740" font-family="{body}" font-size="44" fill="{tint}">{slogan}</text>"#,
        primary = t.primary,
        accent = t.accent,
        background = t.background,
        tint = t.tint,
        heading = t.heading.family,
        body = t.body.family,
        name = t.name,
        slogan = t.slogan,
        mark = t.logo_svg(96, 96, 160, t.mark.as_deref()),
    );
    svg_template(ApplicationKind::SocialPost, "Social post", 1080, 1080, body)
}

fn social_story(t: &Theme<'_>) -> ApplicationTemplate {
    let body = format!(
        r#"<rect width="1080" height="1920" fill="{background}"/><rect y="1280" width="1080" height="640" fill="{primary}"/>{logo}<text x="540" y="1000" text-anchor="middle" font-family="{heading}" font-weight="800" font-size="104" fill="{text}">{name}</text><text x="540" y="1500" text-anchor="middle" font-family="{body}" font-size="52" fill="{background}">{slogan}</text><rect x="340" y="1640" width="400" height="110" rx="55" fill="{accent}"/><text x="540" y="1712" text-anchor="middle" font-family="{body}" font-weight="700" font-size="40" fill="{text}">Learn more</text>"#,
        background = t.background,
        primary = t.primary,
        accent = t.accent,
        text = t.text,
        heading = t.heading.family,
        body = t.body.family,
        name = t.name,
        slogan = t.slogan,
        logo = t.logo_svg(340, 360, 400, t.logo.as_deref()),
    );
    svg_template(ApplicationKind::SocialStory, "Social story", 1080, 1920, body)
}

fn social_cover(t: &Theme<'_>) -> ApplicationTemplate {
    let body = format!(
        r#"<rect width="1500" height="500" fill="{tint}"/><path d="M0 380 C300 300 600 460 900 380 S1500 300 1500 300 V500 H0 Z" fill="{primary}"/>{mark}<text x="360" y="230" font-family="{heading}" font-weight="800" font-size="88" fill="{secondary}">{name}</text><text x="360" y="300" font-family="{body}" font-size="36" fill="{text}">{slogan}</text>"#,
        tint = t.tint,
        primary = t.primary,
        secondary = t.secondary,
        text = t.text,
        heading = t.heading.family,
        body = t.body.family,
        name = t.name,
        slogan = t.slogan,
        mark = t.logo_svg(120, 110, 200, t.mark.as_deref()),
    );
    svg_template(ApplicationKind::SocialCover, "Social cover", 1500, 500, body)
}

fn html_template(
    kind: ApplicationKind,
    name: &str,
    width: u32,
    markup: String,
) -> ApplicationTemplate {
    ApplicationTemplate {
        kind,
        name: name.to_string(),
        format: MarkupFormat::Html,
        width,
        height: 0,
        markup,
    }
}

fn email_signature(t: &Theme<'_>) -> ApplicationTemplate {
    let logo = t
        .mark
        .as_deref()
        .map(|url| {
            format!(
                r#"<td style="padding-right:16px"><img src="{url}" width="64" height="64" alt="{}"></td>"#,
                t.name
            )
        })
        .unwrap_or_default();
    let markup = format!(
        r#"<table cellpadding="0" cellspacing="0" style="font-family:{body};color:{text};border-left:4px solid {primary};padding-left:12px"><tr>{logo}<td><div style="font-family:{heading};font-size:18px;font-weight:700;color:{primary}">Your Name</div><div style="font-size:14px;color:{neutral}">Position, {name}</div><div style="font-size:13px;color:{text}">+1 000 000 00 00 · <a href="mailto:hello@example.com" style="color:{accent}">hello@example.com</a></div><div style="font-size:12px;font-style:italic;color:{secondary}">{slogan}</div></td></tr></table>"#,
        body = t.body.family,
        heading = t.heading.family,
        text = t.text,
        primary = t.primary,
        secondary = t.secondary,
        neutral = t.neutral,
        accent = t.accent,
        name = t.name,
        slogan = t.slogan,
    );
    html_template(ApplicationKind::EmailSignature, "Email signature", 600, markup)
}

fn landing_guide(t: &Theme<'_>) -> ApplicationTemplate {
    let sections = [
        ("Hero", "Headline with the slogan, one primary button and the logo."),
        ("Benefits", "Three to six cards with brand icons and short copy."),
        ("Social proof", "Testimonials or client logos on a tinted band."),
        ("Call to action", "Single accent button on the primary background."),
        ("Footer", "Contacts, navigation and the monochrome logo."),
    ];
    let cards: String = sections
        .iter()
        .map(|(title, hint)| {
            format!(
                r#"<section style="background:{tint};border-radius:12px;padding:24px;margin:16px 0"><h2 style="font-family:{heading};color:{primary};margin:0 0 8px">{title}</h2><p style="margin:0">{hint}</p></section>"#,
                tint = t.tint,
                heading = t.heading.family,
                primary = t.primary,
            )
        })
        .collect();
    let markup = format!(
        r#"<!DOCTYPE html><html><head><meta charset="utf-8"><title>{name}: landing page guide</title><style>:root{{--brand-primary:{primary};--brand-secondary:{secondary};--brand-accent:{accent};--brand-text:{text};--brand-background:{background}}}body{{font-family:{body};color:{text};background:{background};max-width:960px;margin:0 auto;padding:32px}}.cta{{background:{accent};color:{text};border:none;border-radius:8px;padding:14px 28px;font-family:{heading};font-weight:700}}</style></head><body><header style="background:{primary};color:{background};border-radius:16px;padding:48px"><h1 style="font-family:{heading};margin:0">{name}</h1><p>{slogan}</p><button class="cta">Get started</button></header>{cards}</body></html>"#,
        primary = t.primary,
        secondary = t.secondary,
        accent = t.accent,
        text = t.text,
        background = t.background,
        heading = t.heading.family,
        body = t.body.family,
        name = t.name,
        slogan = t.slogan,
    );
    html_template(ApplicationKind::LandingGuide, "Landing page guide", 960, markup)
}
