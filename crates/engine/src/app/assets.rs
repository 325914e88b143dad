use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::ImageReader;
use tracing::{debug, warn};

use crate::asset_keys::AssetKey;

pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl LoadedImage {
    fn is_consistent(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.rgba.len() >= self.width as usize * self.height as usize * 4
    }
}

/// Shared handle to a decoded image. A handle whose image failed to load stays usable
/// and reports `is_ready() == false`; surfaces skip drawing it.
#[derive(Clone)]
pub struct ImageHandle {
    key: Arc<str>,
    image: Option<Arc<LoadedImage>>,
}

impl ImageHandle {
    pub fn missing(key: &str) -> Self {
        Self {
            key: Arc::from(key),
            image: None,
        }
    }

    pub fn from_rgba(key: &str, width: u32, height: u32, rgba: Vec<u8>) -> Self {
        let image = LoadedImage {
            width,
            height,
            rgba,
        };
        Self {
            key: Arc::from(key),
            image: image.is_consistent().then(|| Arc::new(image)),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_ready(&self) -> bool {
        self.image.is_some()
    }

    pub fn image(&self) -> Option<&LoadedImage> {
        self.image.as_deref()
    }

    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.image.as_ref().map(|image| (image.width, image.height))
    }
}

impl fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageHandle")
            .field("key", &self.key)
            .field("dimensions", &self.dimensions())
            .finish()
    }
}

/// Loads `<asset_root>/<key>.png` once per key and hands out shared handles.
#[derive(Debug)]
pub struct ImageLoader {
    asset_root: PathBuf,
    cache: HashMap<String, ImageHandle>,
    warned_keys: HashSet<String>,
}

impl ImageLoader {
    pub fn new(asset_root: PathBuf) -> Self {
        Self {
            asset_root,
            cache: HashMap::new(),
            warned_keys: HashSet::new(),
        }
    }

    pub fn load(&mut self, key: &str) -> ImageHandle {
        if let Some(handle) = self.cache.get(key) {
            return handle.clone();
        }

        let handle = match resolve_image_path(&self.asset_root, key).and_then(|path| {
            load_rgba(&path).map_err(|reason| (Some(path), reason))
        }) {
            Ok(image) => {
                debug!(asset_key = key, width = image.width, height = image.height, "image_loaded");
                ImageHandle {
                    key: Arc::from(key),
                    image: Some(Arc::new(image)),
                }
            }
            Err((path, reason)) => {
                self.warn_once(key, path.as_deref(), &reason);
                ImageHandle::missing(key)
            }
        };
        self.cache.insert(key.to_string(), handle.clone());
        handle
    }

    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }

    fn warn_once(&mut self, key: &str, path: Option<&Path>, reason: &str) {
        if !self.warned_keys.insert(key.to_string()) {
            return;
        }
        let path_display = path
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "<unresolved>".to_string());
        warn!(
            asset_key = key,
            path = %path_display,
            reason,
            "image_load_failed_skipping_draw"
        );
    }
}

fn resolve_image_path(asset_root: &Path, key: &str) -> Result<PathBuf, (Option<PathBuf>, String)> {
    let key = AssetKey::parse(key).map_err(|error| (None, format!("invalid_key:{error}")))?;
    Ok(asset_root.join(key.image_path()))
}

fn load_rgba(path: &Path) -> Result<LoadedImage, String> {
    let reader = ImageReader::open(path).map_err(|error| format!("file_open_failed:{error}"))?;
    let decoded = reader
        .decode()
        .map_err(|error| format!("decode_failed:{error}"))?;
    let image = decoded.to_rgba8();
    Ok(LoadedImage {
        width: image.width(),
        height: image.height(),
        rgba: image.into_raw(),
    })
}
