//! Asset cache coordination: loads recorded by the shared cache, evictions
//! triggered by structural document edits.

use std::collections::HashSet;

use canvas_doc::{
    AssetError, AssetLoader, Document, Element, FontHandle, ImageAsset, MemoryAssetCache,
};

/// Loader that serves fixed-size images and fails for `missing://` URIs.
struct StubLoader;

#[async_trait::async_trait]
impl AssetLoader for StubLoader {
    async fn load_image(&self, uri: &str, id: &str) -> Result<ImageAsset, AssetError> {
        if uri.starts_with("missing://") {
            return Err(AssetError::Image {
                id: id.to_string(),
                reason: format!("no such resource {uri}"),
            });
        }
        tokio::task::yield_now().await;
        Ok(ImageAsset {
            uri: uri.to_string(),
            width: 640,
            height: 320,
        })
    }

    async fn load_font(&self, family: &str, uri: Option<&str>) -> Result<FontHandle, AssetError> {
        Ok(FontHandle {
            family: family.to_string(),
            source: uri.map(str::to_string),
        })
    }

    fn is_loading(&self, _id: &str) -> bool {
        false
    }

    fn has_error(&self, _id: &str) -> bool {
        false
    }
}

#[tokio::test]
async fn test_removing_image_evicts_its_asset() {
    let cache = MemoryAssetCache::new();
    let mut doc = Document::new().with_asset_cache(Box::new(cache.clone()));

    let image = doc.add(Element::image("https://cdn/a.png", "a", 0.0, 0.0));
    let kept = doc.add(Element::image("https://cdn/b.png", "b", 0.0, 0.0));
    let image_key = image.to_string();
    let kept_key = kept.to_string();

    let asset = cache
        .fetch_image(&StubLoader, "https://cdn/a.png", &image_key)
        .await
        .expect("loads");
    cache
        .fetch_image(&StubLoader, "https://cdn/b.png", &kept_key)
        .await
        .expect("loads");
    assert!(doc.image_loaded(image, asset.width, asset.height));

    assert!(doc.remove(image));
    assert!(cache.image(&image_key).is_none());
    assert!(cache.image(&kept_key).is_some());
}

#[tokio::test]
async fn test_failed_load_leaves_element_usable() {
    let cache = MemoryAssetCache::new();
    let mut doc = Document::new().with_asset_cache(Box::new(cache.clone()));
    let image = doc.add(Element::image("missing://x", "", 0.0, 0.0));

    let result = cache
        .fetch_image(&StubLoader, "missing://x", &image.to_string())
        .await;
    assert!(result.is_err());
    assert!(cache.has_image_error(&image.to_string()));

    let element = doc.get(image).expect("still present");
    assert!(!element.as_image().expect("image").is_loaded());
    assert!(doc.select(image, false));
    assert!(doc.update_with(image, |e| e.set_position(50.0, 50.0)));

    assert!(doc.remove(image));
    assert!(!cache.has_image_error(&image.to_string()));
}

#[tokio::test]
async fn test_unused_fonts_are_evicted() {
    let cache = MemoryAssetCache::new();
    let mut doc = Document::new().with_asset_cache(Box::new(cache.clone()));

    let text = doc.add(Element::text("Hello", 0.0, 0.0));
    doc.update_with(text, |e| {
        if let Some(data) = e.as_text_mut() {
            data.set_font_family("Georgia");
        }
    });
    for family in ["Georgia", "Impact"] {
        cache
            .fetch_font(&StubLoader, family, None)
            .await
            .expect("font");
    }

    doc.add(Element::button("Go", 0.0, 0.0));
    assert!(cache.is_font_loaded("Georgia"));
    assert!(!cache.is_font_loaded("Impact"));

    let refs = doc.asset_refs();
    let expected: HashSet<_> = ["Georgia", "Arial, sans-serif"]
        .into_iter()
        .map(str::to_string)
        .collect();
    assert_eq!(refs.fonts, expected);
    assert!(refs.images.is_empty());
}

#[tokio::test]
async fn test_cache_is_shared_across_tasks() {
    let cache = MemoryAssetCache::new();
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let cache = cache.clone();
            tokio::spawn(async move {
                cache
                    .fetch_image(&StubLoader, &format!("https://cdn/{i}.png"), &format!("img-{i}"))
                    .await
            })
        })
        .collect();
    for handle in handles {
        handle.await.expect("task").expect("load");
    }
    assert_eq!(cache.stats().loaded_images, 4);
    assert_eq!(cache.stats().loading_images, 0);
}
