use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use crate::{
    infra::{
        config::ImageConfig,
        image_cache::{CachedImage, EvictionPolicy, ImageCache},
    },
    usecases::{contracts::SourceError, projects::ImageSource},
};

use super::{client::parse_response, error::ApiError};

/// Fetches remote images through a bounded cache it owns.
pub struct ImageLoader {
    http: reqwest::Client,
    cache: Mutex<ImageCache<Box<dyn EvictionPolicy>>>,
}

impl ImageLoader {
    pub fn new(http: reqwest::Client, config: &ImageConfig) -> Self {
        Self::with_cache(http, ImageCache::from_config(config))
    }

    pub fn with_cache(http: reqwest::Client, cache: ImageCache<Box<dyn EvictionPolicy>>) -> Self {
        Self {
            http,
            cache: Mutex::new(cache),
        }
    }

    fn cached(&self, url: &str) -> Option<CachedImage> {
        self.cache.lock().ok()?.get(url)
    }

    fn remember(&self, url: &str, image: CachedImage) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(url, image);
            tracing::debug!(url, cached = cache.len(), "image cached");
        }
    }

    pub async fn load(&self, url: &str) -> Result<CachedImage, ApiError> {
        if let Some(image) = self.cached(url) {
            tracing::debug!(url, "image served from cache");
            return Ok(image);
        }

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return match parse_response(status, &body) {
                Err(error) => Err(error),
                Ok(_) => Err(ApiError::Backend {
                    status: status.as_u16(),
                    detail: "unexpected image response".to_owned(),
                }),
            };
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let bytes = response.bytes().await?;

        let image = CachedImage {
            content_type,
            bytes: Arc::from(bytes.as_ref()),
        };
        self.remember(url, image.clone());
        Ok(image)
    }
}

#[async_trait]
impl ImageSource for ImageLoader {
    async fn image(&self, url: &str) -> Result<CachedImage, SourceError> {
        Ok(self.load(url).await?)
    }
}
