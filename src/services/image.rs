use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;
use uuid::Uuid;

/// Stores image assets as files under the configured images directory.
///
/// Files are keyed by a generated name, never by the owning record's id,
/// so renames and re-uploads can't collide with stale assets.
pub struct ImageService {
    images_path: PathBuf,
}

impl ImageService {
    #[must_use]
    pub fn new(images_path: impl Into<PathBuf>) -> Self {
        Self {
            images_path: images_path.into(),
        }
    }

    #[must_use]
    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.images_path.join(filename)
    }

    /// Downloads the asset at `url` into the images directory and returns
    /// the generated filename.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let extension = image_extension(url);
        let filename = format!("{}.{}", Uuid::new_v4(), extension);

        if !self.images_path.exists() {
            fs::create_dir_all(&self.images_path).await?;
        }

        let file_path = self.images_path.join(&filename);

        info!(url = %url, path = %file_path.display(), "Downloading image");

        let response = reqwest::get(url)
            .await
            .with_context(|| format!("Failed to fetch image from {url}"))?;

        if !response.status().is_success() {
            anyhow::bail!("Image fetch from {url} returned {}", response.status());
        }

        let bytes = response.bytes().await?;

        fs::write(&file_path, bytes)
            .await
            .with_context(|| format!("Failed to write image to {}", file_path.display()))?;

        Ok(filename)
    }

    /// Removes a stored asset. Returns `false` when the file was already
    /// gone. Rejects names that would escape the images directory.
    pub async fn remove(&self, filename: &str) -> Result<bool> {
        if filename.contains('/') || filename.contains('\\') || filename.contains("..") {
            anyhow::bail!("Refusing to remove suspicious image filename: {filename}");
        }

        let file_path = self.images_path.join(filename);
        if !file_path.exists() {
            return Ok(false);
        }

        fs::remove_file(&file_path)
            .await
            .with_context(|| format!("Failed to remove image {}", file_path.display()))?;

        info!(path = %file_path.display(), "Removed image");
        Ok(true)
    }
}

fn image_extension(url: &str) -> &str {
    let trimmed = url.split(['?', '#']).next().unwrap_or(url);
    Path::new(trimmed)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| e.len() <= 5 && e.chars().all(char::is_alphanumeric))
        .unwrap_or("jpg")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_extension() {
        assert_eq!(image_extension("https://x.test/a/cover.png"), "png");
        assert_eq!(image_extension("https://x.test/a/cover.webp?size=lg"), "webp");
        assert_eq!(image_extension("https://x.test/a/cover"), "jpg");
        assert_eq!(image_extension("https://x.test/a.b/cover.not-an-ext!"), "jpg");
    }

    #[tokio::test]
    async fn test_remove_rejects_traversal() {
        let service = ImageService::new(std::env::temp_dir());
        assert!(service.remove("../etc/passwd").await.is_err());
        assert!(service.remove("nested/file.jpg").await.is_err());
    }

    #[tokio::test]
    async fn test_remove_missing_file_is_false() {
        let service = ImageService::new(std::env::temp_dir());
        let missing = format!("{}.jpg", Uuid::new_v4());
        assert!(!service.remove(&missing).await.unwrap());
    }
}
