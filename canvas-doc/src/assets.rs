//! Asset cache and loader collaborators.
//!
//! The document never loads anything. It only tells an [`AssetCache`] which
//! image ids and font families are still referenced after a structural edit,
//! so the cache can drop the rest. [`MemoryAssetCache`] is a ready-made cache
//! that can be shared with asynchronous loaders; the [`AssetLoader`] trait is
//! what a host implements to actually fetch bytes.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use serde::Serialize;

use crate::error::AssetError;

/// Receiver of the document's asset garbage-collection requests.
pub trait AssetCache {
    /// Drop every cached image whose id is not in `keep`. Returns how many were dropped.
    fn evict_images_not_in(&mut self, keep: &HashSet<String>) -> usize;

    /// Drop every cached font whose family is not in `keep`. Returns how many were dropped.
    fn evict_fonts_not_in(&mut self, keep: &HashSet<String>) -> usize;
}

/// A decoded image with its natural dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageAsset {
    /// Source the image was loaded from.
    pub uri: String,
    /// Natural width in pixels.
    pub width: u32,
    /// Natural height in pixels.
    pub height: u32,
}

/// A loaded font face.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FontHandle {
    /// Font family name.
    pub family: String,
    /// Web font URL, or `None` for a locally installed face.
    pub source: Option<String>,
}

/// Host-provided asset fetcher.
#[async_trait::async_trait]
pub trait AssetLoader: Send + Sync {
    /// Fetch and decode an image.
    async fn load_image(&self, uri: &str, id: &str) -> Result<ImageAsset, AssetError>;

    /// Load a font family, optionally from a web font URL.
    async fn load_font(&self, family: &str, uri: Option<&str>) -> Result<FontHandle, AssetError>;

    /// Whether a load for `id` is in flight in the loader.
    fn is_loading(&self, id: &str) -> bool;

    /// Whether the last load for `id` failed in the loader.
    fn has_error(&self, id: &str) -> bool;
}

/// Counters for debugging and UI feedback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Images held in memory.
    pub loaded_images: usize,
    /// Image loads in flight.
    pub loading_images: usize,
    /// Images whose last load failed.
    pub image_errors: usize,
    /// Fonts held in memory.
    pub loaded_fonts: usize,
    /// Font loads in flight.
    pub loading_fonts: usize,
    /// Fonts whose last load failed.
    pub font_errors: usize,
}

#[derive(Debug)]
struct Slots<T> {
    loaded: HashMap<String, T>,
    loading: HashSet<String>,
    errors: HashMap<String, String>,
}

impl<T> Default for Slots<T> {
    fn default() -> Self {
        Self {
            loaded: HashMap::new(),
            loading: HashSet::new(),
            errors: HashMap::new(),
        }
    }
}

impl<T> Slots<T> {
    fn begin(&mut self, key: &str) -> bool {
        if self.loaded.contains_key(key) {
            return false;
        }
        self.errors.remove(key);
        self.loading.insert(key.to_string())
    }

    /// Settle a load started by `begin`. A key evicted mid-load stays out.
    fn finish(&mut self, key: &str, value: T) -> bool {
        if !self.loading.remove(key) {
            return false;
        }
        self.errors.remove(key);
        self.loaded.insert(key.to_string(), value);
        true
    }

    fn fail(&mut self, key: &str, reason: String) -> bool {
        if !self.loading.remove(key) {
            return false;
        }
        self.errors.insert(key.to_string(), reason);
        true
    }

    fn evict_not_in(&mut self, keep: &HashSet<String>) -> usize {
        let before = self.loaded.len();
        self.loaded.retain(|key, _| keep.contains(key));
        self.loading.retain(|key| keep.contains(key));
        self.errors.retain(|key, _| keep.contains(key));
        before - self.loaded.len()
    }

    fn clear(&mut self) {
        self.loaded.clear();
        self.loading.clear();
        self.errors.clear();
    }
}

#[derive(Debug, Default)]
struct CacheInner {
    images: Slots<ImageAsset>,
    fonts: Slots<FontHandle>,
}

/// In-memory asset cache, cheap to clone and safe to share across tasks.
///
/// Images are keyed by asset id (the owning image element's id), fonts by
/// family name.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssetCache {
    inner: Arc<RwLock<CacheInner>>,
}

impl MemoryAssetCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read<R>(&self, f: impl FnOnce(&CacheInner) -> R) -> R {
        let inner = self
            .inner
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&inner)
    }

    fn write<R>(&self, f: impl FnOnce(&mut CacheInner) -> R) -> R {
        let mut inner = self
            .inner
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&mut inner)
    }

    // Images

    /// Mark an image load as started and clear any previous error.
    ///
    /// Returns `false` if the image is already loaded or already loading.
    pub fn begin_image_load(&self, id: &str) -> bool {
        self.write(|inner| inner.images.begin(id))
    }

    /// Store a loaded image.
    ///
    /// Returns `false` and stores nothing unless a load for `id` is in flight.
    pub fn finish_image_load(&self, id: &str, asset: ImageAsset) -> bool {
        self.write(|inner| inner.images.finish(id, asset))
    }

    /// Record a failed image load.
    ///
    /// Returns `false` and records nothing unless a load for `id` is in flight.
    pub fn fail_image_load(&self, id: &str, reason: impl Into<String>) -> bool {
        self.write(|inner| inner.images.fail(id, reason.into()))
    }

    /// A loaded image, if present.
    #[must_use]
    pub fn image(&self, id: &str) -> Option<ImageAsset> {
        self.read(|inner| inner.images.loaded.get(id).cloned())
    }

    /// Whether an image load is in flight.
    #[must_use]
    pub fn is_image_loading(&self, id: &str) -> bool {
        self.read(|inner| inner.images.loading.contains(id))
    }

    /// Whether the last load of an image failed.
    #[must_use]
    pub fn has_image_error(&self, id: &str) -> bool {
        self.read(|inner| inner.images.errors.contains_key(id))
    }

    /// Error message from the last failed image load.
    #[must_use]
    pub fn image_error(&self, id: &str) -> Option<String> {
        self.read(|inner| inner.images.errors.get(id).cloned())
    }

    // Fonts

    /// Mark a font load as started and clear any previous error.
    ///
    /// Returns `false` if the font is already loaded or already loading.
    pub fn begin_font_load(&self, family: &str) -> bool {
        self.write(|inner| inner.fonts.begin(family))
    }

    /// Store a loaded font. Same rules as [`Self::finish_image_load`].
    pub fn finish_font_load(&self, family: &str, handle: FontHandle) -> bool {
        self.write(|inner| inner.fonts.finish(family, handle))
    }

    /// Record a failed font load. Same rules as [`Self::fail_image_load`].
    pub fn fail_font_load(&self, family: &str, reason: impl Into<String>) -> bool {
        self.write(|inner| inner.fonts.fail(family, reason.into()))
    }

    /// A loaded font, if present.
    #[must_use]
    pub fn font(&self, family: &str) -> Option<FontHandle> {
        self.read(|inner| inner.fonts.loaded.get(family).cloned())
    }

    /// Whether a font is loaded.
    #[must_use]
    pub fn is_font_loaded(&self, family: &str) -> bool {
        self.read(|inner| inner.fonts.loaded.contains_key(family))
    }

    /// Whether a font load is in flight.
    #[must_use]
    pub fn is_font_loading(&self, family: &str) -> bool {
        self.read(|inner| inner.fonts.loading.contains(family))
    }

    /// Whether the last load of a font failed.
    #[must_use]
    pub fn has_font_error(&self, family: &str) -> bool {
        self.read(|inner| inner.fonts.errors.contains_key(family))
    }

    /// Error message from the last failed font load.
    #[must_use]
    pub fn font_error(&self, family: &str) -> Option<String> {
        self.read(|inner| inner.fonts.errors.get(family).cloned())
    }

    // Loading

    /// Load an image through `loader`, recording the outcome.
    ///
    /// A cached image is returned without calling the loader. No lock is held
    /// while the loader runs. If `id` is evicted before the load completes the
    /// asset is still returned but not cached.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::AlreadyLoading`] while another fetch for `id` is
    /// in flight, otherwise the loader's error after recording it against `id`.
    pub async fn fetch_image(
        &self,
        loader: &dyn AssetLoader,
        uri: &str,
        id: &str,
    ) -> Result<ImageAsset, AssetError> {
        if !self.begin_image_load(id) {
            return self
                .image(id)
                .ok_or_else(|| AssetError::AlreadyLoading(id.to_string()));
        }

        match loader.load_image(uri, id).await {
            Ok(asset) => {
                tracing::debug!("Image loaded: {id} ({}x{})", asset.width, asset.height);
                if !self.finish_image_load(id, asset.clone()) {
                    tracing::debug!("Image {id} was evicted while loading, not caching");
                }
                Ok(asset)
            }
            Err(e) => {
                tracing::warn!("Image load failed: {e}");
                self.fail_image_load(id, e.to_string());
                Err(e)
            }
        }
    }

    /// Load a font through `loader`, recording the outcome.
    ///
    /// A cached font is returned without calling the loader.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::AlreadyLoading`] while another fetch for `family`
    /// is in flight, otherwise the loader's error after recording it.
    pub async fn fetch_font(
        &self,
        loader: &dyn AssetLoader,
        family: &str,
        uri: Option<&str>,
    ) -> Result<FontHandle, AssetError> {
        if !self.begin_font_load(family) {
            return self
                .font(family)
                .ok_or_else(|| AssetError::AlreadyLoading(family.to_string()));
        }

        match loader.load_font(family, uri).await {
            Ok(handle) => {
                tracing::debug!("Font loaded: {family}");
                if !self.finish_font_load(family, handle.clone()) {
                    tracing::debug!("Font {family} was evicted while loading, not caching");
                }
                Ok(handle)
            }
            Err(e) => {
                tracing::warn!("Font load failed: {e}");
                self.fail_font_load(family, e.to_string());
                Err(e)
            }
        }
    }

    // Housekeeping

    /// Drop every image not referenced by `keep`, along with its error.
    pub fn clear_unused_images(&self, keep: &HashSet<String>) -> usize {
        let removed = self.write(|inner| inner.images.evict_not_in(keep));
        if removed > 0 {
            tracing::info!("Cleared {removed} unused images from memory");
        }
        removed
    }

    /// Drop every font not referenced by `keep`, along with its error.
    pub fn clear_unused_fonts(&self, keep: &HashSet<String>) -> usize {
        let removed = self.write(|inner| inner.fonts.evict_not_in(keep));
        if removed > 0 {
            tracing::info!("Cleared {removed} unused font references from memory");
        }
        removed
    }

    /// Drop everything, including in-flight markers.
    pub fn clear(&self) {
        let stats = self.stats();
        self.write(|inner| {
            inner.images.clear();
            inner.fonts.clear();
        });
        tracing::info!(
            "Cleared all assets: {} images, {} fonts",
            stats.loaded_images,
            stats.loaded_fonts
        );
    }

    /// Current counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.read(|inner| CacheStats {
            loaded_images: inner.images.loaded.len(),
            loading_images: inner.images.loading.len(),
            image_errors: inner.images.errors.len(),
            loaded_fonts: inner.fonts.loaded.len(),
            loading_fonts: inner.fonts.loading.len(),
            font_errors: inner.fonts.errors.len(),
        })
    }
}

impl AssetCache for MemoryAssetCache {
    fn evict_images_not_in(&mut self, keep: &HashSet<String>) -> usize {
        self.clear_unused_images(keep)
    }

    fn evict_fonts_not_in(&mut self, keep: &HashSet<String>) -> usize {
        self.clear_unused_fonts(keep)
    }
}
