use std::{
    collections::HashSet,
    io::Cursor,
    sync::{Arc, Mutex},
    time::Duration,
};

use brandbook_back::{
    catalog::{Catalog, DecorSlot, StyleBucket},
    dao::{
        asset_store::{AssetStore, MemoryAssetStore},
        error::{LookupError, LookupResult},
        icon_search::IconSearch,
        image_fetch::{HttpImageFetcher, ImageFetcher},
    },
    error::ServiceError,
    services::{
        brandbook_service::{BrandbookService, Collaborators, LookupSettings},
        imaging::Imaging,
    },
    state::brand::{
        BrandBundle, BusinessDescriptor, ColorRole, IconCategory, IconOrigin, LogoVariantKind,
    },
};
use futures::{FutureExt, future::BoxFuture};
use image::{ImageFormat, Rgba, RgbaImage};

const ASSET_BASE: &str = "http://assets.test";
const LOGO_URL: &str = "https://cdn.test/logo.png";

/// Answers every query with one hit per prefix named after the query.
#[derive(Default)]
struct ScriptedSearch {
    queries: Mutex<Vec<String>>,
}

impl IconSearch for ScriptedSearch {
    fn search(
        &self,
        query: &str,
        prefixes: &[String],
        _limit: usize,
    ) -> BoxFuture<'static, LookupResult<Vec<String>>> {
        self.queries.lock().unwrap().push(query.to_string());
        let hits = prefixes
            .iter()
            .map(|prefix| format!("{prefix}:{query}"))
            .collect();
        async move { Ok(hits) }.boxed()
    }

    fn fetch_markup(&self, icon_id: &str) -> BoxFuture<'static, LookupResult<String>> {
        let svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" data-id="{icon_id}"><circle cx="12" cy="12" r="8" fill="currentColor"/></svg>"#
        );
        async move { Ok(svg) }.boxed()
    }
}

/// Never answers, so every lookup runs into the timeout.
struct HangingSearch;

impl IconSearch for HangingSearch {
    fn search(
        &self,
        _query: &str,
        _prefixes: &[String],
        _limit: usize,
    ) -> BoxFuture<'static, LookupResult<Vec<String>>> {
        futures::future::pending().boxed()
    }

    fn fetch_markup(&self, _icon_id: &str) -> BoxFuture<'static, LookupResult<String>> {
        futures::future::pending().boxed()
    }
}

/// Serves the same bytes for every URL, or fails every download.
struct StaticFetcher(Option<Vec<u8>>);

impl ImageFetcher for StaticFetcher {
    fn fetch(&self, url: &str) -> BoxFuture<'static, LookupResult<Vec<u8>>> {
        let result = self
            .0
            .clone()
            .ok_or_else(|| LookupError::Empty { url: url.into() });
        async move { result }.boxed()
    }
}

/// Red disc on a transparent square.
fn logo_png() -> Vec<u8> {
    let image = RgbaImage::from_fn(64, 64, |x, y| {
        let dx = x as i32 - 32;
        let dy = y as i32 - 32;
        if dx * dx + dy * dy < 24 * 24 {
            Rgba([200, 30, 45, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    });
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

struct Harness {
    service: BrandbookService,
    assets: Arc<MemoryAssetStore>,
}

fn harness(search: Arc<dyn IconSearch>, logo: Option<Vec<u8>>, timeout: Duration) -> Harness {
    harness_with(search, Arc::new(StaticFetcher(logo)), timeout)
}

fn harness_with(
    search: Arc<dyn IconSearch>,
    image_fetcher: Arc<dyn ImageFetcher>,
    timeout: Duration,
) -> Harness {
    let assets = Arc::new(MemoryAssetStore::new(ASSET_BASE));
    let service = BrandbookService::new(
        Arc::new(Catalog::bundled()),
        Collaborators {
            icon_search: search,
            image_fetcher,
            slogan_writer: None,
            assets: assets.clone() as Arc<dyn AssetStore>,
            imaging: Imaging::new(Arc::new(usvg::fontdb::Database::new())),
        },
        LookupSettings {
            lookup_timeout: timeout,
            search_limit: 8,
        },
    );
    Harness { service, assets }
}

fn descriptor(name: &str, keywords: &str, industry: &str, style: &str) -> BusinessDescriptor {
    BusinessDescriptor {
        name: name.into(),
        keywords: keywords.into(),
        industry: industry.into(),
        style_label: style.into(),
    }
}

fn acme() -> BusinessDescriptor {
    descriptor("Acme", "technology, startup", "", "modern")
}

fn assert_icon_shape(bundle: &BrandBundle) {
    assert_eq!(bundle.icons.len(), 10);
    let brand = bundle
        .icons
        .iter()
        .filter(|icon| icon.category == IconCategory::Icon)
        .count();
    assert_eq!(brand, 5);
    for slot in DecorSlot::ALL {
        let filled = bundle
            .icons
            .iter()
            .filter(|icon| icon.slot == Some(slot))
            .count();
        assert_eq!(filled, 1, "slot {slot:?}");
    }
    let ids: HashSet<_> = bundle.icons.iter().map(|icon| icon.id.as_str()).collect();
    assert_eq!(ids.len(), bundle.icons.len());
}

fn is_hex(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

#[tokio::test]
async fn fixed_seed_reproduces_colors_fonts_and_icons() {
    let harness = harness(
        Arc::new(ScriptedSearch::default()),
        Some(logo_png()),
        Duration::from_secs(1),
    );
    let first = harness
        .service
        .derive_full_bundle(acme(), LOGO_URL, Some(42))
        .await
        .unwrap();
    let second = harness
        .service
        .derive_full_bundle(acme(), LOGO_URL, Some(42))
        .await
        .unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(first.style, StyleBucket::Modern);
    assert_eq!(first.palette_variant, second.palette_variant);
    assert_eq!(first.colors, second.colors);
    assert_eq!(first.fonts, second.fonts);
    assert_eq!(first.icons, second.icons);

    for (left, right) in first.logo_variants.iter().zip(&second.logo_variants) {
        assert_eq!(left.kind, right.kind);
        assert_ne!(left.url, right.url);
        let left = harness.assets.get_by_url(&left.url).unwrap();
        let right = harness.assets.get_by_url(&right.url).unwrap();
        assert_eq!(left.bytes, right.bytes);
    }
}

#[tokio::test]
async fn full_bundle_satisfies_structural_invariants() {
    let harness = harness(
        Arc::new(ScriptedSearch::default()),
        Some(logo_png()),
        Duration::from_secs(1),
    );
    let bundle = harness
        .service
        .derive_full_bundle(acme(), LOGO_URL, Some(7))
        .await
        .unwrap();

    assert!(bundle.colors.len() >= 7);
    for role in ColorRole::BASE {
        assert!(bundle.colors.iter().any(|color| color.role == role), "{role:?}");
    }
    assert!(bundle.colors.iter().any(|color| color.role == ColorRole::Tint));
    assert!(bundle.colors.iter().any(|color| color.role == ColorRole::Shade));
    assert!(bundle.colors.iter().all(|color| is_hex(&color.hex)));

    assert!((2..=4).contains(&bundle.fonts.len()));
    assert_icon_shape(&bundle);

    let kinds: Vec<_> = bundle.logo_variants.iter().map(|logo| logo.kind).collect();
    assert_eq!(
        kinds,
        [
            LogoVariantKind::Original,
            LogoVariantKind::Monochrome,
            LogoVariantKind::Inverted,
            LogoVariantKind::Abbreviation,
            LogoVariantKind::WordmarkLockup,
        ]
    );
    assert_eq!(harness.assets.len(), 5);
    assert!(!bundle.slogan.is_empty());
    assert!(bundle.guidelines.is_some());
    assert_eq!(bundle.applications.as_ref().map(Vec::len), Some(8));
}

#[tokio::test]
async fn every_application_uses_bundle_colors_and_fonts() {
    let harness = harness(
        Arc::new(ScriptedSearch::default()),
        Some(logo_png()),
        Duration::from_secs(1),
    );
    for (seed, style) in [(1, "Classic"), (2, "Eco"), (3, "Игривый"), (4, "minimal")] {
        let bundle = harness
            .service
            .derive_full_bundle(
                descriptor("Northwind", "consulting, finance", "", style),
                LOGO_URL,
                Some(seed),
            )
            .await
            .unwrap();
        let primary = bundle
            .colors
            .iter()
            .find(|color| color.role == ColorRole::Primary)
            .map(|color| color.hex.clone())
            .unwrap();
        for template in bundle.applications.as_ref().unwrap() {
            assert!(
                template.markup.contains(&primary),
                "{:?} misses {primary}",
                template.kind
            );
            assert!(
                bundle
                    .fonts
                    .iter()
                    .any(|font| template.markup.contains(&font.name)),
                "{:?} uses no bundle font",
                template.kind
            );
        }
    }
}

#[tokio::test]
async fn icon_timeouts_still_yield_ten_synthesized_entries() {
    let harness = harness(
        Arc::new(HangingSearch),
        Some(logo_png()),
        Duration::from_millis(20),
    );
    let bundle = harness
        .service
        .derive_full_bundle(acme(), LOGO_URL, Some(3))
        .await
        .unwrap();

    assert_icon_shape(&bundle);
    assert!(
        bundle
            .icons
            .iter()
            .all(|icon| icon.origin == IconOrigin::Synthesized)
    );
}

#[tokio::test]
async fn playful_restaurant_draws_decoration_from_industry_vocabulary() {
    let search = Arc::new(ScriptedSearch::default());
    let harness = harness(search.clone(), Some(logo_png()), Duration::from_secs(1));
    let bundle = harness
        .service
        .derive_full_bundle(
            descriptor("Уютная кухня", "ресторан, еда, уют", "ресторан", "Игривый"),
            LOGO_URL,
            Some(11),
        )
        .await
        .unwrap();

    assert_eq!(bundle.style, StyleBucket::Playful);
    assert_icon_shape(&bundle);

    let catalog = Catalog::bundled();
    let restaurant = catalog
        .decorative
        .industries
        .iter()
        .find(|industry| industry.name == "restaurant")
        .unwrap();
    let decoration = bundle
        .icons
        .iter()
        .find(|icon| icon.slot == Some(DecorSlot::Decoration))
        .unwrap();
    assert_eq!(decoration.origin, IconOrigin::Library);
    let (_, name) = decoration.id.split_once(':').unwrap();
    assert!(
        restaurant
            .slots
            .get(DecorSlot::Decoration)
            .iter()
            .any(|term| term == name),
        "decoration {} is not restaurant vocabulary",
        decoration.id
    );
}

#[tokio::test]
async fn demo_bundle_has_slogan_and_three_logos() {
    let harness = harness(
        Arc::new(ScriptedSearch::default()),
        Some(logo_png()),
        Duration::from_secs(1),
    );
    let bundle = harness
        .service
        .derive_demo_bundle("  Acme  ", "technology, startup", LOGO_URL)
        .await
        .unwrap();

    assert_eq!(bundle.business_name, "Acme");
    assert!(bundle.slogan.contains("Acme"));
    let kinds: Vec<_> = bundle.logo_variants.iter().map(|logo| logo.kind).collect();
    assert_eq!(
        kinds,
        [
            LogoVariantKind::Original,
            LogoVariantKind::Monochrome,
            LogoVariantKind::Inverted,
        ]
    );
    assert_eq!(harness.assets.len(), 3);
}

#[tokio::test]
async fn failed_download_keeps_the_source_reference() {
    let harness = harness(
        Arc::new(ScriptedSearch::default()),
        None,
        Duration::from_secs(1),
    );
    let bundle = harness
        .service
        .derive_full_bundle(acme(), LOGO_URL, Some(5))
        .await
        .unwrap();

    assert_eq!(bundle.logo_variants.len(), 1);
    assert_eq!(bundle.logo_variants[0].kind, LogoVariantKind::Original);
    assert_eq!(bundle.logo_variants[0].url, LOGO_URL);
    assert!(harness.assets.is_empty());
    assert_icon_shape(&bundle);
}

#[tokio::test]
async fn unreadable_source_image_is_the_only_total_failure() {
    let harness = harness(
        Arc::new(ScriptedSearch::default()),
        Some(b"definitely not an image".to_vec()),
        Duration::from_secs(1),
    );
    let result = harness
        .service
        .derive_full_bundle(acme(), LOGO_URL, Some(5))
        .await;
    assert!(matches!(result, Err(ServiceError::SourceImageUnreadable(_))));

    let demo = harness
        .service
        .derive_demo_bundle("Acme", "", LOGO_URL)
        .await;
    assert!(matches!(demo, Err(ServiceError::SourceImageUnreadable(_))));
}

#[tokio::test]
async fn blank_name_or_url_is_invalid_input() {
    let harness = harness(
        Arc::new(ScriptedSearch::default()),
        Some(logo_png()),
        Duration::from_secs(1),
    );
    let result = harness
        .service
        .derive_full_bundle(descriptor("   ", "tech", "", ""), LOGO_URL, None)
        .await;
    assert!(matches!(result, Err(ServiceError::InvalidInput(_))));

    let result = harness.service.derive_demo_bundle("Acme", "tech", " ").await;
    assert!(matches!(result, Err(ServiceError::InvalidInput(_))));
    assert!(harness.assets.is_empty());
}

#[tokio::test]
async fn server_files_are_not_published_without_a_logo_root() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("private.png");
    std::fs::write(&path, logo_png()).unwrap();
    let fetcher = HttpImageFetcher::new(Duration::from_secs(1), 1024 * 1024).unwrap();
    let harness = harness_with(
        Arc::new(ScriptedSearch::default()),
        Arc::new(fetcher),
        Duration::from_secs(1),
    );

    let source = path.to_str().unwrap();
    let bundle = harness
        .service
        .derive_demo_bundle("Acme", "technology", source)
        .await
        .unwrap();

    assert_eq!(bundle.logo_variants.len(), 1);
    assert_eq!(bundle.logo_variants[0].kind, LogoVariantKind::Original);
    assert_eq!(bundle.logo_variants[0].url, source);
    assert!(harness.assets.is_empty());
}
