use crate::assets::decode::decode_png;
use crate::config::RendererConfig;
use crate::errors::LoadError;
use crate::net::{self, Response};
use crate::render::RgbaImage;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use url::Url;

/// Turns an image key into decoded pixels.
///
/// Keys are opaque to the cache; each loader decides what they mean. The returned future
/// must not borrow the loader so it can run on its own task.
pub trait ImageLoader: Send + Sync {
    fn load(&self, key: &str) -> BoxFuture<'static, Result<RgbaImage, LoadError>>;
}

/// Where a key points to.
#[derive(Debug, Clone, PartialEq)]
enum Source {
    Remote(Url),
    File(PathBuf),
}

/// Loads PNG images from the local filesystem or over HTTP(S).
///
/// `http://` and `https://` keys are fetched, `file://` keys and plain paths are read from
/// disk. Relative paths resolve against the base directory when one is set.
#[derive(Clone)]
pub struct SourceLoader {
    client: reqwest::Client,
    base_dir: Option<PathBuf>,
}

impl SourceLoader {
    pub fn new(config: &RendererConfig) -> Result<Self, LoadError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.image_load_timeout)
            .build()?;

        Ok(Self { client, base_dir: None })
    }

    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    fn classify(&self, key: &str) -> Result<Source, LoadError> {
        match Url::parse(key) {
            Ok(url) => match url.scheme() {
                "http" | "https" => Ok(Source::Remote(url)),
                "file" => url
                    .to_file_path()
                    .map(Source::File)
                    .map_err(|_| LoadError::UnsupportedSource(key.to_string())),
                // Windows drive letters parse as one-letter schemes
                scheme if scheme.len() == 1 => Ok(Source::File(self.resolve_path(Path::new(key)))),
                scheme => Err(LoadError::UnsupportedSource(format!("scheme {scheme} in {key}"))),
            },
            Err(_) => Ok(Source::File(self.resolve_path(Path::new(key)))),
        }
    }

    fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl ImageLoader for SourceLoader {
    fn load(&self, key: &str) -> BoxFuture<'static, Result<RgbaImage, LoadError>> {
        let source = self.classify(key);
        let client = self.client.clone();

        async move {
            let bytes = match source? {
                Source::Remote(url) => {
                    let response = net::fetch(&client, url).await?;
                    check_response(&response)?;
                    response.body
                }
                Source::File(path) => match tokio::fs::read(&path).await {
                    Ok(bytes) => bytes,
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(LoadError::NotFound),
                    Err(e) => return Err(e.into()),
                },
            };
            decode_png(&bytes)
        }
        .boxed()
    }
}

/// Rejects error statuses and bodies that are declared as something other than an image.
/// A missing `Content-Type` is accepted and left to the decoder.
fn check_response(response: &Response) -> Result<(), LoadError> {
    if !response.is_success() {
        return Err(LoadError::Status(response.status));
    }
    match response.content_type() {
        Some(mime) if !(mime.starts_with("image/") || mime == "application/octet-stream") => {
            Err(LoadError::ContentType(mime))
        }
        _ => Ok(()),
    }
}

/// Serves encoded PNG bytes registered up front. Unknown keys fail with
/// [`LoadError::NotFound`].
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    images: HashMap<String, Arc<[u8]>>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, png: Vec<u8>) {
        self.images.insert(key.into(), Arc::from(png));
    }

    pub fn with(mut self, key: impl Into<String>, png: Vec<u8>) -> Self {
        self.insert(key, png);
        self
    }
}

impl ImageLoader for MemoryLoader {
    fn load(&self, key: &str) -> BoxFuture<'static, Result<RgbaImage, LoadError>> {
        let bytes = self.images.get(key).cloned();
        async move {
            let bytes = bytes.ok_or(LoadError::NotFound)?;
            decode_png(&bytes)
        }
        .boxed()
    }
}
