use std::sync::Arc;

use clap::{Parser, Subcommand};
use davkit_client::transport::{ReqwestTransport, Transport};
use davkit_client::{DavClient, DavConfigStore, property_names};
use davkit_core::config::load_config;
use davkit_rfc::rfc::dav::core::QName;
use davkit_rfc::rfc::dav::model::ChildResource;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

/// `WebDAV` collection browser and synchronizer.
#[derive(Parser)]
#[command(name = "davkit")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the members of a collection (default: `sync.collection`)
    List { path: Option<String> },

    /// Show the properties of a single resource
    Props { path: String },

    /// Run a sync-collection report, starting from `sync.token` if set
    Sync,

    /// List the configuration documents stored in a collection
    Configs { path: Option<String> },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    let config = load_config()?;

    tracing::debug!(config = ?config, "Configuration loaded");

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping info");
    }

    let transport = ReqwestTransport::new(&config.client)?;
    let client = DavClient::from_config(transport, &config.client);
    let properties = property_names(config.sync.properties.as_slice())?;

    tracing::info!(base_url = %config.client.base_url, "Connecting to DAV server");

    match cli.command {
        Command::List { path } => {
            let path = path.unwrap_or_else(|| config.sync.collection.clone());
            list(&client, &path, &properties).await?;
        }
        Command::Props { path } => props(&client, &path, &properties).await?,
        Command::Sync => {
            let token = config.sync.token.as_deref();
            sync(&client, &config.sync.collection, token, &properties).await?;
        }
        Command::Configs { path } => {
            let path = path.unwrap_or_else(|| config.sync.collection.clone());
            let store = DavConfigStore::new(Arc::new(client), &path);
            for name in store.list_configs().await? {
                tracing::info!(name = %name, "Configuration");
            }
        }
    }

    Ok(())
}

async fn list<T: Transport>(client: &DavClient<T>, path: &str, properties: &[QName]) -> anyhow::Result<()> {
    let Some(mut children) = client.list_children(path, properties).await? else {
        tracing::warn!(path, "Collection not found");
        return Ok(());
    };

    children.sort_by(ChildResource::display_order);
    for child in &children {
        log_child(child);
    }
    tracing::info!(path, count = children.len(), "Listed collection");

    Ok(())
}

async fn props<T: Transport>(client: &DavClient<T>, path: &str, properties: &[QName]) -> anyhow::Result<()> {
    let Some(child) = client.get_properties(path, properties).await? else {
        tracing::warn!(path, "Resource not found");
        return Ok(());
    };

    log_child(&child);
    for property in &child.properties {
        tracing::info!(
            name = %property.name,
            status = %property.status,
            value = %property.text(),
            "Property"
        );
    }

    Ok(())
}

async fn sync<T: Transport>(
    client: &DavClient<T>,
    path: &str,
    token: Option<&str>,
    properties: &[QName],
) -> anyhow::Result<()> {
    let Some(result) = client.sync_report(path, token, properties).await? else {
        tracing::warn!(path, "Sync report rejected, start again without a token");
        return Ok(());
    };

    for child in result.changed() {
        tracing::info!(uri = %child.uri, etag = ?child.etag(), "Changed");
    }
    for child in result.removed() {
        tracing::info!(uri = %child.uri, "Removed");
    }

    match &result.sync_token {
        Some(next) => tracing::info!(sync_token = %next, "Next sync token"),
        None => tracing::warn!("Server returned no sync token"),
    }

    Ok(())
}

fn log_child(child: &ChildResource) {
    tracing::info!(
        uri = %child.uri,
        name = child.display_name.as_deref().unwrap_or(""),
        collection = child.is_collection,
        "Resource"
    );
}
