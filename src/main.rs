//! brandbook-back binary entrypoint wiring the derivation engine behind the REST layer.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use brandbook_back::{
    catalog::Catalog,
    config::AppConfig,
    dao::{
        asset_store::{AssetStore, LocalAssetStore},
        icon_search::IconifyClient,
        image_fetch::HttpImageFetcher,
        slogan_writer::{ChatSloganWriter, SloganWriter},
    },
    routes,
    services::{
        brandbook_service::{BrandbookService, Collaborators, LookupSettings},
        imaging::Imaging,
    },
    state::{AppState, SharedState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let catalog = Arc::new(Catalog::load(config.catalog_path.as_deref()));

    let assets: Arc<dyn AssetStore> = Arc::new(LocalAssetStore::new(
        config.asset_dir.clone(),
        &config.public_base_url,
    ));
    if let Err(err) = assets.health_check().await {
        warn!(
            error = %err,
            dir = %config.asset_dir.display(),
            "asset directory not writable; starting degraded"
        );
    }

    let icon_search = IconifyClient::new(&config.icon_api_url, config.lookup_timeout)
        .context("building icon search client")?;
    let mut image_fetcher = HttpImageFetcher::new(config.image_timeout, config.max_image_bytes)
        .context("building image fetcher")?;
    if let Some(root) = &config.logo_root {
        info!(root = %root.display(), "local logo sources enabled");
        image_fetcher = image_fetcher.with_local_root(root.clone());
    }
    let slogan_writer = match &config.slogan {
        Some(slogan) => {
            let writer = ChatSloganWriter::new(
                slogan.endpoint.clone(),
                slogan.model.clone(),
                slogan.api_key.clone(),
                config.lookup_timeout,
            )
            .context("building slogan writer")?;
            info!(endpoint = %slogan.endpoint, model = %slogan.model, "slogan generation enabled");
            Some(Arc::new(writer) as Arc<dyn SloganWriter>)
        }
        None => {
            info!("no slogan endpoint configured; using catalog templates");
            None
        }
    };

    // Font discovery is blocking I/O; do it once before serving.
    let imaging = tokio::task::spawn_blocking(Imaging::with_system_fonts)
        .await
        .context("loading system fonts")?;

    let brandbook = BrandbookService::new(
        catalog,
        Collaborators {
            icon_search: Arc::new(icon_search),
            image_fetcher: Arc::new(image_fetcher),
            slogan_writer,
            assets: assets.clone(),
            imaging,
        },
        LookupSettings {
            lookup_timeout: config.lookup_timeout,
            search_limit: config.icon_search_limit,
        },
    );

    let port = config.port;
    let app_state = AppState::new(config, brandbook, assets);
    let app = build_router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler; waiting for Ctrl+C");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
