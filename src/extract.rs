use crate::error::CatalogError;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractProgress {
    Started { total_entries: usize },
    Extracting { name: String },
    Completed,
    Error(String),
}

/// Unpack a zip archive into `dest_dir`, returning the files written.
///
/// Existing files are only replaced when `overwrite` is set.
pub async fn extract_zip(
    archive_path: &Path,
    dest_dir: &Path,
    overwrite: bool,
    progress_tx: mpsc::UnboundedSender<ExtractProgress>,
) -> Result<Vec<PathBuf>, CatalogError> {
    let archive_path = archive_path.to_path_buf();
    let dest_dir = dest_dir.to_path_buf();

    // Run extraction in a blocking task since the zip reader is synchronous
    tokio::task::spawn_blocking(move || {
        let result = extract_zip_sync(&archive_path, &dest_dir, overwrite, &progress_tx);
        match &result {
            Ok(_) => {
                let _ = progress_tx.send(ExtractProgress::Completed);
            }
            Err(e) => {
                let _ = progress_tx.send(ExtractProgress::Error(e.to_string()));
            }
        }
        result
    })
    .await?
}

fn extract_zip_sync(
    archive_path: &Path,
    dest_dir: &Path,
    overwrite: bool,
    progress_tx: &mpsc::UnboundedSender<ExtractProgress>,
) -> Result<Vec<PathBuf>, CatalogError> {
    tracing::info!("Extracting {:?} to {:?}", archive_path, dest_dir);

    let archive_file = fs::File::open(archive_path)?;
    let mut archive = zip::ZipArchive::new(io::BufReader::new(archive_file))?;

    let _ = progress_tx.send(ExtractProgress::Started {
        total_entries: archive.len(),
    });

    fs::create_dir_all(dest_dir)?;

    let mut written = Vec::new();

    for i in 0..archive.len() {
        let mut zip_file = archive.by_index(i)?;

        let Some(relative_path) = zip_file.enclosed_name() else {
            tracing::warn!("Skipping zip entry outside the destination: {}", zip_file.name());
            continue;
        };

        let output_path = dest_dir.join(relative_path);

        if zip_file.is_dir() {
            fs::create_dir_all(&output_path)?;
            continue;
        }

        let _ = progress_tx.send(ExtractProgress::Extracting {
            name: zip_file.name().to_string(),
        });

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let output_file = if overwrite {
            fs::File::create(&output_path)?
        } else {
            fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&output_path)
                .map_err(|e| match e.kind() {
                    io::ErrorKind::AlreadyExists => CatalogError::DestinationExists(output_path.clone()),
                    _ => CatalogError::Io(e),
                })?
        };

        let mut writer = io::BufWriter::new(output_file);
        io::copy(&mut zip_file, &mut writer)?;
        writer.flush()?;

        tracing::debug!("Extracted {:?}", output_path);
        written.push(output_path);
    }

    tracing::info!("Extracted {} files", written.len());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use zip::write::SimpleFileOptions;

    fn write_archive(path: &Path, entries: &[(&str, &[u8])]) {
        let file = fs::File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        for (name, data) in entries {
            if name.ends_with('/') {
                writer.add_directory(*name, SimpleFileOptions::default()).unwrap();
            } else {
                writer.start_file(*name, SimpleFileOptions::default()).unwrap();
                writer.write_all(data).unwrap();
            }
        }
        writer.finish().unwrap();
    }

    #[tokio::test]
    async fn test_extracts_all_files() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("Wood066_1K-JPG.zip");
        write_archive(
            &archive,
            &[
                ("Wood066_1K_Color.jpg", b"color".as_slice()),
                ("maps/", b"".as_slice()),
                ("maps/Wood066_1K_NormalGL.jpg", b"normal".as_slice()),
            ],
        );

        let out = dir.path().join("Wood066");
        let (tx, mut rx) = mpsc::unbounded_channel();
        let written = extract_zip(&archive, &out, false, tx).await.unwrap();

        assert_eq!(written.len(), 2);
        assert_eq!(fs::read(out.join("Wood066_1K_Color.jpg")).unwrap(), b"color");
        assert_eq!(fs::read(out.join("maps/Wood066_1K_NormalGL.jpg")).unwrap(), b"normal");

        assert_eq!(rx.recv().await, Some(ExtractProgress::Started { total_entries: 3 }));
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        assert_eq!(events.last(), Some(&ExtractProgress::Completed));
    }

    #[tokio::test]
    async fn test_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("a.zip");
        write_archive(&archive, &[("a.txt", b"new".as_slice())]);
        fs::write(dir.path().join("a.txt"), b"old").unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        let result = extract_zip(&archive, dir.path(), false, tx).await;

        assert!(matches!(result, Err(CatalogError::DestinationExists(_))));
        assert_eq!(fs::read(dir.path().join("a.txt")).unwrap(), b"old");

        let mut last = None;
        while let Some(event) = rx.recv().await {
            last = Some(event);
        }
        assert!(matches!(last, Some(ExtractProgress::Error(_))));

        let (tx, _rx) = mpsc::unbounded_channel();
        extract_zip(&archive, dir.path(), true, tx).await.unwrap();
        assert_eq!(fs::read(dir.path().join("a.txt")).unwrap(), b"new");
    }

    #[tokio::test]
    async fn test_skips_entries_escaping_destination() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("evil.zip");
        write_archive(&archive, &[("../escape.txt", b"x".as_slice()), ("ok.txt", b"y".as_slice())]);

        let out = dir.path().join("out");
        let (tx, _rx) = mpsc::unbounded_channel();
        let written = extract_zip(&archive, &out, false, tx).await.unwrap();

        assert_eq!(written, vec![out.join("ok.txt")]);
        assert!(!dir.path().join("escape.txt").exists());
    }

    #[tokio::test]
    async fn test_missing_archive() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, _rx) = mpsc::unbounded_channel();
        let result = extract_zip(&dir.path().join("nope.zip"), dir.path(), false, tx).await;
        assert!(matches!(result, Err(CatalogError::Io(_))));
    }
}
