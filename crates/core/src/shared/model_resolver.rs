use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::constants::{WHISPER_MODELS, WHISPER_MODEL_BASE_URL};

#[derive(Error, Debug)]
pub enum ModelResolveError {
    #[error("unknown whisper model '{0}', expected one of: {models}", models = WHISPER_MODELS.join(", "))]
    UnknownModel(String),
    #[error("failed to create cache directory: {0}")]
    CacheDir(#[source] std::io::Error),
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to write model to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not determine cache directory")]
    NoCacheDir,
}

/// Progress callback: `(bytes_downloaded, total_bytes)`.
/// `total_bytes` is 0 if the server didn't provide Content-Length.
pub type ProgressFn = Box<dyn Fn(u64, u64) + Send>;

/// ggml weights file for a Whisper model size, e.g. `ggml-base.bin`.
pub fn model_file_name(model: &str) -> String {
    format!("ggml-{model}.bin")
}

pub fn model_url(model: &str) -> String {
    format!("{WHISPER_MODEL_BASE_URL}/{}", model_file_name(model))
}

/// Locates Whisper model weights, downloading them into a cache on first use.
pub struct ModelResolver {
    cache_dir: PathBuf,
    bundled_dir: Option<PathBuf>,
}

impl ModelResolver {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self {
            cache_dir,
            bundled_dir: None,
        }
    }

    /// Resolver rooted at the platform cache directory.
    pub fn with_default_cache() -> Result<Self, ModelResolveError> {
        Ok(Self::new(model_cache_dir()?))
    }

    pub fn with_bundled_dir(mut self, dir: PathBuf) -> Self {
        self.bundled_dir = Some(dir);
        self
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Resolution order:
    /// 1. Cache directory
    /// 2. Bundled directory (development or pre-packaged installs)
    /// 3. Download into the cache
    pub fn resolve(
        &self,
        model: &str,
        progress: Option<ProgressFn>,
    ) -> Result<PathBuf, ModelResolveError> {
        if !WHISPER_MODELS.contains(&model) {
            return Err(ModelResolveError::UnknownModel(model.to_string()));
        }
        let file_name = model_file_name(model);

        let cached_path = self.cache_dir.join(&file_name);
        if cached_path.exists() {
            return Ok(cached_path);
        }

        if let Some(ref dir) = self.bundled_dir {
            let bundled_path = dir.join(&file_name);
            if bundled_path.exists() {
                return Ok(bundled_path);
            }
        }

        fs::create_dir_all(&self.cache_dir).map_err(ModelResolveError::CacheDir)?;
        log::info!("Downloading Whisper model '{model}'");
        download(&model_url(model), &cached_path, progress)?;
        Ok(cached_path)
    }
}

/// Shorthand for resolving through the platform cache.
pub fn resolve(
    model: &str,
    bundled_dir: Option<&Path>,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, ModelResolveError> {
    let mut resolver = ModelResolver::with_default_cache()?;
    if let Some(dir) = bundled_dir {
        resolver = resolver.with_bundled_dir(dir.to_path_buf());
    }
    resolver.resolve(model, progress)
}

/// Platform-specific model cache directory.
///
/// - macOS: `~/Library/Application Support/Karaoke Sync/models/`
/// - Linux: `$XDG_CACHE_HOME/Karaoke Sync/models/` or `~/.cache/Karaoke Sync/models/`
/// - Windows: `%LOCALAPPDATA%/Karaoke Sync/models/`
pub fn model_cache_dir() -> Result<PathBuf, ModelResolveError> {
    #[cfg(target_os = "macos")]
    let base = dirs::data_dir();
    #[cfg(not(target_os = "macos"))]
    let base = dirs::cache_dir();

    base.map(|d| d.join("Karaoke Sync").join("models"))
        .ok_or(ModelResolveError::NoCacheDir)
}

fn download(url: &str, dest: &Path, progress: Option<ProgressFn>) -> Result<(), ModelResolveError> {
    let download_error = |source| ModelResolveError::Download {
        url: url.to_string(),
        source,
    };

    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(download_error)?;
    let total = response.content_length().unwrap_or(0);
    let bytes = response.bytes().map_err(download_error)?;

    // Write to a temp file first, then rename for atomicity
    let temp_path = dest.with_extension("part");
    let write_error = |source| ModelResolveError::Write {
        path: temp_path.clone(),
        source,
    };
    let mut file = fs::File::create(&temp_path).map_err(write_error)?;

    let mut downloaded: u64 = 0;
    for chunk in bytes.chunks(1024 * 1024) {
        if let Err(e) = file.write_all(chunk) {
            let _ = fs::remove_file(&temp_path);
            return Err(write_error(e));
        }
        downloaded += chunk.len() as u64;
        if let Some(ref cb) = progress {
            cb(downloaded, total);
        }
    }
    file.flush().map_err(write_error)?;
    drop(file);

    fs::rename(&temp_path, dest).map_err(|e| ModelResolveError::Write {
        path: dest.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_model_file_name_and_url() {
        assert_eq!(model_file_name("base"), "ggml-base.bin");
        assert!(model_url("tiny").ends_with("/ggml-tiny.bin"));
    }

    #[test]
    fn test_resolve_unknown_model() {
        let tmp = TempDir::new().unwrap();
        let resolver = ModelResolver::new(tmp.path().to_path_buf());
        let err = resolver.resolve("gigantic", None).unwrap_err();
        assert!(matches!(err, ModelResolveError::UnknownModel(_)));
        assert!(err.to_string().contains("large-v3"));
    }

    #[test]
    fn test_resolve_finds_cached_file() {
        let tmp = TempDir::new().unwrap();
        let cached = tmp.path().join("ggml-tiny.bin");
        fs::write(&cached, b"fake model data").unwrap();

        let resolver = ModelResolver::new(tmp.path().to_path_buf());
        assert_eq!(resolver.resolve("tiny", None).unwrap(), cached);
    }

    #[test]
    fn test_resolve_finds_bundled_file() {
        let tmp = TempDir::new().unwrap();
        let bundled_dir = tmp.path().join("bundled");
        fs::create_dir_all(&bundled_dir).unwrap();
        let bundled = bundled_dir.join("ggml-small.bin");
        fs::write(&bundled, b"bundled model").unwrap();

        let resolver =
            ModelResolver::new(tmp.path().join("cache")).with_bundled_dir(bundled_dir.clone());
        assert_eq!(resolver.resolve("small", None).unwrap(), bundled);
    }

    #[test]
    fn test_cache_takes_precedence_over_bundled() {
        let tmp = TempDir::new().unwrap();
        let cache = tmp.path().join("cache");
        let bundled_dir = tmp.path().join("bundled");
        fs::create_dir_all(&cache).unwrap();
        fs::create_dir_all(&bundled_dir).unwrap();
        fs::write(cache.join("ggml-base.bin"), b"cached").unwrap();
        fs::write(bundled_dir.join("ggml-base.bin"), b"bundled").unwrap();

        let resolver = ModelResolver::new(cache.clone()).with_bundled_dir(bundled_dir);
        assert_eq!(
            resolver.resolve("base", None).unwrap(),
            cache.join("ggml-base.bin")
        );
    }

    #[test]
    fn test_model_cache_dir_returns_path() {
        let path = model_cache_dir().unwrap();
        assert!(path.to_string_lossy().contains("Karaoke Sync"));
        assert!(path.to_string_lossy().contains("models"));
    }

    #[test]
    fn test_download_invalid_url_returns_error() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("model.bin");
        let result = download("http://invalid.nonexistent.example.com/model", &dest, None);
        assert!(result.is_err());
    }

    #[test]
    fn test_download_atomic_no_partial_on_failure() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("model.bin");
        let _ = download("http://invalid.nonexistent.example.com/model", &dest, None);
        assert!(!dest.exists());
        assert!(!dest.with_extension("part").exists());
    }
}
