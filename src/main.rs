use ambientcg_fetcher::config::API_BASE_URL;
use ambientcg_fetcher::download::{fetch_download, DownloadProgress};
use ambientcg_fetcher::extract::{extract_zip, ExtractProgress};
use ambientcg_fetcher::{logging, Asset, AssetType, CatalogClient, Method, SearchParameters, Sort};
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use futures_util::StreamExt;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Parser)]
#[command(about = "Search, preview and download ambientCG assets", long_about = None)]
struct Cli {
    /// Search endpoint of the catalog API
    #[arg(long, env = "AMBIENTCG_BASE_URL", default_value = API_BASE_URL, global = true)]
    base_url: String,

    /// Also write log output to this file
    #[arg(long, value_name = "PATH", global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the ids of matching assets as they are found
    Search {
        /// Free-text search terms
        #[arg(short = 'q', long)]
        tags: Option<String>,
        /// Creation methods, comma separated (e.g. PBRPhotogrammetry,3DPhotogrammetry)
        #[arg(long = "method", value_delimiter = ',')]
        methods: Vec<Method>,
        /// Asset types, comma separated (e.g. Material,3DModel)
        #[arg(long = "type", value_delimiter = ',')]
        types: Vec<AssetType>,
        #[arg(long)]
        sort: Option<Sort>,
        /// Assets requested per page
        #[arg(long, default_value_t = ambientcg_fetcher::config::PAGE_LIMIT)]
        page_limit: u32,
        /// Stop after this many ids
        #[arg(long)]
        max: Option<usize>,
    },
    /// Show the preview image and available sizes of an asset
    Info {
        asset_id: String,
    },
    /// Download one size of an asset
    Download {
        asset_id: String,
        /// Download attribute, e.g. 2K-JPG
        size: String,
        /// Target directory (defaults to the user's download directory)
        #[arg(short, long, value_name = "PATH")]
        dest: Option<PathBuf>,
        /// Unpack the archive into <dest>/<asset_id>
        #[arg(long)]
        extract: bool,
        /// Replace existing files when extracting
        #[arg(long)]
        overwrite: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.log_file.as_deref()).map_err(|e| anyhow!(e))?;

    let client = CatalogClient::with_base_url(cli.base_url);

    match cli.command {
        Command::Search {
            tags,
            methods,
            types,
            sort,
            page_limit,
            max,
        } => {
            let params = SearchParameters {
                tags,
                methods: Some(methods),
                types: Some(types),
                sort,
            };
            search(client.page_limit(page_limit), params, max).await
        }
        Command::Info { asset_id } => info(&client, &asset_id).await,
        Command::Download {
            asset_id,
            size,
            dest,
            extract,
            overwrite,
        } => download(&client, &asset_id, &size, dest, extract, overwrite).await,
    }
}

async fn search(client: CatalogClient, params: SearchParameters, max: Option<usize>) -> Result<()> {
    let ids = client.search(&params);
    let mut ids = std::pin::pin!(ids.take(max.unwrap_or(usize::MAX)));

    let mut count = 0usize;
    while let Some(id) = ids.next().await {
        let id = id.context("Search failed")?;
        println!("{}", id);
        count += 1;
    }

    tracing::info!("Listed {} assets", count);
    Ok(())
}

async fn info(client: &CatalogClient, asset_id: &str) -> Result<()> {
    let api_asset = client
        .fetch_asset(asset_id)
        .await
        .with_context(|| format!("Failed to fetch asset {}", asset_id))?;
    let asset = Asset::new(&api_asset);

    println!("{} ({})", asset.name(), asset.id());
    if let Some(category) = &api_asset.category {
        println!("Category: {}", category);
    }
    println!("Preview: {}", asset.preview_image().unwrap_or("none"));

    let sizes = asset.available_sizes();
    if sizes.is_empty() {
        println!("Sizes: none");
    } else {
        println!("Sizes: {}", sizes.join(", "));
    }
    Ok(())
}

async fn download(
    client: &CatalogClient,
    asset_id: &str,
    size: &str,
    dest: Option<PathBuf>,
    extract: bool,
    overwrite: bool,
) -> Result<()> {
    let api_asset = client
        .fetch_asset(asset_id)
        .await
        .with_context(|| format!("Failed to fetch asset {}", asset_id))?;
    let asset = Asset::new(&api_asset);

    let Some(file) = asset.download(size) else {
        let sizes = asset.available_sizes();
        return Err(anyhow!(
            "{} has no '{}' download (available: {})",
            asset_id,
            size,
            if sizes.is_empty() { "none".to_string() } else { sizes.join(", ") }
        ));
    };

    let dest_dir = dest
        .or_else(dirs::download_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    tokio::fs::create_dir_all(&dest_dir)
        .await
        .with_context(|| format!("Failed to create {:?}", dest_dir))?;

    let cancel_token = CancellationToken::new();
    let ctrl_c_token = cancel_token.clone();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c_token.cancel();
        }
    });

    let (tx, mut rx) = mpsc::unbounded_channel::<DownloadProgress>();

    // Spawn download progress handler
    let progress_handle = tokio::spawn(async move {
        let mut last_percent = 0;
        while let Some(progress) = rx.recv().await {
            match progress {
                DownloadProgress::Started { total_bytes } => {
                    tracing::info!("Download started ({} MB)", total_bytes / 1_048_576);
                }
                DownloadProgress::Progress { downloaded, total } if total > 0 => {
                    let percent = downloaded * 100 / total;
                    if percent >= last_percent + 10 {
                        last_percent = percent;
                        tracing::info!("Downloading... {}%", percent);
                    }
                }
                DownloadProgress::Progress { .. } => {}
                DownloadProgress::Completed => tracing::info!("Download complete"),
                DownloadProgress::Cancelled => tracing::info!("Download cancelled"),
            }
        }
    });

    let result = fetch_download(file, &dest_dir, tx, cancel_token).await;
    let _ = progress_handle.await;
    ctrl_c.abort();
    let archive_path = result.with_context(|| format!("Failed to download {} {}", asset_id, file.attribute))?;

    println!("{}", archive_path.display());

    if extract {
        let out_dir = dest_dir.join(asset.id());
        let (tx, mut rx) = mpsc::unbounded_channel::<ExtractProgress>();
        let progress_handle = tokio::spawn(async move {
            while let Some(progress) = rx.recv().await {
                if let ExtractProgress::Extracting { name } = progress {
                    tracing::debug!("Extracting {}", name);
                }
            }
        });

        let written = extract_zip(&archive_path, &out_dir, overwrite, tx).await;
        let _ = progress_handle.await;
        let written = written.with_context(|| format!("Failed to extract {:?}", archive_path))?;

        for path in written {
            println!("{}", path.display());
        }
    }

    Ok(())
}
