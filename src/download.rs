use crate::config::USER_AGENT;
use crate::error::CatalogError;
use crate::model::Download;
use futures_util::StreamExt;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadProgress {
    Started { total_bytes: u64 },
    Progress { downloaded: u64, total: u64 },
    Completed,
    Cancelled,
}

/// Where a download lands inside `dir`.
///
/// Only the last component of the server's file name is used, so a name
/// like `../x.zip` cannot leave the directory.
pub fn destination_for(dir: &Path, download: &Download) -> PathBuf {
    let file_name = download
        .file_name
        .as_deref()
        .and_then(|name| Path::new(name).file_name())
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| "download.zip".into());
    dir.join(file_name)
}

/// Download a catalog file into `dir`, returning the path it was written to.
///
/// Fails with [`CatalogError::MissingDownloadLink`] when the record carries no link.
pub async fn fetch_download(
    download: &Download,
    dir: &Path,
    progress_tx: mpsc::UnboundedSender<DownloadProgress>,
    cancel_token: CancellationToken,
) -> Result<PathBuf, CatalogError> {
    let url = download
        .download_link
        .as_deref()
        .filter(|link| !link.is_empty())
        .ok_or_else(|| CatalogError::MissingDownloadLink(download.attribute.clone()))?;

    let dest_path = destination_for(dir, download);
    download_file(url, download.size, &dest_path, progress_tx, cancel_token).await?;
    Ok(dest_path)
}

/// Stream `url` into `dest_path`, reporting progress on `progress_tx`.
///
/// `expected_size` is used as the total when the server sends no content length.
pub async fn download_file(
    url: &str,
    expected_size: u64,
    dest_path: &Path,
    progress_tx: mpsc::UnboundedSender<DownloadProgress>,
    cancel_token: CancellationToken,
) -> Result<(), CatalogError> {
    // Check for cancellation before starting
    if cancel_token.is_cancelled() {
        let _ = progress_tx.send(DownloadProgress::Cancelled);
        return Err(CatalogError::Cancelled);
    }

    tracing::info!("Downloading {} to {:?}", url, dest_path);

    let client = reqwest::Client::new();
    let response = client
        .get(url)
        .header("User-Agent", USER_AGENT)
        .send()
        .await
        .map_err(|source| CatalogError::Request {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(CatalogError::Status {
            url: url.to_string(),
            status: status.as_u16(),
            body,
        });
    }

    let total_size = response.content_length().unwrap_or(expected_size);
    let _ = progress_tx.send(DownloadProgress::Started { total_bytes: total_size });

    let mut file = File::create(dest_path).await?;

    let mut downloaded: u64 = 0;
    let mut stream = response.bytes_stream();

    loop {
        tokio::select! {
            _ = cancel_token.cancelled() => {
                // Clean up partial file
                drop(file);
                let _ = tokio::fs::remove_file(dest_path).await;
                tracing::info!("Download of {} cancelled", url);
                let _ = progress_tx.send(DownloadProgress::Cancelled);
                return Err(CatalogError::Cancelled);
            }
            chunk_result = stream.next() => {
                match chunk_result {
                    Some(Ok(chunk)) => {
                        file.write_all(&chunk).await?;

                        downloaded += chunk.len() as u64;
                        let _ = progress_tx.send(DownloadProgress::Progress {
                            downloaded,
                            total: total_size,
                        });
                    }
                    Some(Err(source)) => {
                        drop(file);
                        let _ = tokio::fs::remove_file(dest_path).await;
                        return Err(CatalogError::Request {
                            url: url.to_string(),
                            source,
                        });
                    }
                    None => break,
                }
            }
        }
    }

    file.flush().await?;
    tracing::info!("Downloaded {} bytes to {:?}", downloaded, dest_path);
    let _ = progress_tx.send(DownloadProgress::Completed);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn download(file_name: &str) -> Download {
        Download {
            full_download_path: String::new(),
            download_link: Some(format!("https://ambientcg.com/get?file={}", file_name)),
            file_name: Some(file_name.to_string()),
            filetype: "zip".to_string(),
            attribute: "1K-JPG".to_string(),
            size: 4,
            zip_content: None,
        }
    }

    #[test]
    fn test_destination_for() {
        let dir = Path::new("/tmp/assets");
        assert_eq!(
            destination_for(dir, &download("Wood066_1K-JPG.zip")),
            dir.join("Wood066_1K-JPG.zip")
        );
        assert_eq!(
            destination_for(dir, &download("../../etc/evil.zip")),
            dir.join("evil.zip")
        );
        assert_eq!(destination_for(dir, &download("")), dir.join("download.zip"));

        let unnamed = Download {
            file_name: None,
            ..download("x.zip")
        };
        assert_eq!(destination_for(dir, &unnamed), dir.join("download.zip"));
    }

    #[tokio::test]
    async fn test_fetch_download_without_link() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, _rx) = mpsc::unbounded_channel();

        for link in [None, Some(String::new())] {
            let record = Download {
                download_link: link,
                ..download("Wood066_2K-JPG.zip")
            };
            let result = fetch_download(&record, dir.path(), tx.clone(), CancellationToken::new()).await;
            assert!(matches!(result, Err(CatalogError::MissingDownloadLink(ref attribute)) if attribute == "1K-JPG"));
        }
        assert!(!dir.path().join("Wood066_2K-JPG.zip").exists());
    }

    #[tokio::test]
    async fn test_fetch_download_to_directory() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/get"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PK\x03\x04".to_vec()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let record = Download {
            download_link: Some(format!("{}/get", server.uri())),
            ..download("Wood066_1K-JPG.zip")
        };
        let (tx, _rx) = mpsc::unbounded_channel();

        let written = fetch_download(&record, dir.path(), tx, CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(written, dir.path().join("Wood066_1K-JPG.zip"));
        assert_eq!(std::fs::read(&written).unwrap(), b"PK\x03\x04");
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("never.zip");
        let (tx, mut rx) = mpsc::unbounded_channel();
        let token = CancellationToken::new();
        token.cancel();

        // Unroutable URL: the request must not even be attempted
        let result = download_file("http://0.0.0.0:1/never.zip", 0, &dest, tx, token).await;

        assert!(matches!(result, Err(CatalogError::Cancelled)));
        assert_eq!(rx.recv().await, Some(DownloadProgress::Cancelled));
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_download_writes_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/get"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PK\x03\x04".to_vec()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("asset.zip");
        let (tx, mut rx) = mpsc::unbounded_channel();

        download_file(&format!("{}/get", server.uri()), 4, &dest, tx, CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), b"PK\x03\x04");
        assert_eq!(rx.recv().await, Some(DownloadProgress::Started { total_bytes: 4 }));

        let mut last = None;
        while let Some(event) = rx.recv().await {
            last = Some(event);
        }
        assert_eq!(last, Some(DownloadProgress::Completed));
    }

    #[tokio::test]
    async fn test_download_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("missing.zip");
        let (tx, _rx) = mpsc::unbounded_channel();

        let result = download_file(&format!("{}/get", server.uri()), 0, &dest, tx, CancellationToken::new()).await;

        assert!(matches!(result, Err(CatalogError::Status { status: 404, .. })));
        assert!(!dest.exists());
    }
}
