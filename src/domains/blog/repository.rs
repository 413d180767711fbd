use super::types::{placeholder_posts, slugify, BlogPost};
use crate::errors::{DomainError, DomainResult};
use crate::gateway::BlogGateway;
use crate::types::ListOrigin;
use crate::validation::ValidationBuilder;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A listing plus where it came from, so the presentation layer can mark
/// stale or placeholder data without branching on errors.
#[derive(Debug, Clone)]
pub struct PostListing {
    pub posts: Vec<BlogPost>,
    pub origin: ListOrigin,
}

/// CRUD surface for blog posts with a read-through cache.
///
/// The cache is only ever updated after a remote call succeeds; failed
/// deletes and updates leave it untouched so the UI never shows a false
/// success state.
pub struct BlogRepository {
    gateway: Arc<dyn BlogGateway>,
    cache: RwLock<Vec<BlogPost>>,
}

impl BlogRepository {
    pub fn new(gateway: Arc<dyn BlogGateway>) -> Self {
        Self {
            gateway,
            cache: RwLock::new(Vec::new()),
        }
    }

    /// List posts in authoritative server order. On failure the stale cache
    /// is served, or the fixed placeholder set when the cache is empty, so a
    /// first load with no connectivity is never blank.
    pub async fn list(&self) -> PostListing {
        match self.gateway.list_posts().await {
            Ok(posts) => {
                *self.cache.write().await = posts.clone();
                PostListing {
                    posts,
                    origin: ListOrigin::Server,
                }
            }
            Err(err) => {
                log::warn!("blog listing failed, serving fallback: {}", err);
                let cache = self.cache.read().await;
                if cache.is_empty() {
                    PostListing {
                        posts: placeholder_posts(),
                        origin: ListOrigin::Placeholder,
                    }
                } else {
                    PostListing {
                        posts: cache.clone(),
                        origin: ListOrigin::StaleCache,
                    }
                }
            }
        }
    }

    /// Fetch-through read. Falls back to the cache when the remote call
    /// fails; `EntityNotFound` only when both miss.
    pub async fn get(&self, id: i64) -> DomainResult<BlogPost> {
        match self.gateway.get_post(id).await {
            Ok(post) => {
                let mut cache = self.cache.write().await;
                if let Some(cached) = cache.iter_mut().find(|p| p.id == id) {
                    *cached = post.clone();
                }
                Ok(post)
            }
            Err(err) => {
                if let Some(cached) = self.cache.read().await.iter().find(|p| p.id == id) {
                    log::warn!("serving post {} from cache: {}", id, err);
                    return Ok(cached.clone());
                }
                if err.is_not_found() {
                    Err(DomainError::EntityNotFound(
                        "BlogPost".to_string(),
                        id.to_string(),
                    ))
                } else {
                    Err(err.into())
                }
            }
        }
    }

    /// Resolve a post by its public URL slug.
    pub async fn get_by_slug(&self, slug: &str) -> DomainResult<BlogPost> {
        let listing = self.list().await;
        listing
            .posts
            .into_iter()
            .find(|post| slugify(&post.title) == slug)
            .ok_or_else(|| DomainError::EntityNotFound("BlogPost".to_string(), slug.to_string()))
    }

    /// Create a post. Both fields are required non-empty and validated
    /// before any network call; the server-assigned post is appended to the
    /// cache.
    pub async fn create(&self, title: &str, content: &str) -> DomainResult<BlogPost> {
        validate_post_fields(title, content)?;
        let post = self.gateway.create_post(title.trim(), content.trim()).await?;
        self.cache.write().await.push(post.clone());
        Ok(post)
    }

    /// Full-replace update, matching the remote endpoint's contract: both
    /// fields must be supplied even when only one changed.
    pub async fn update(&self, id: i64, title: &str, content: &str) -> DomainResult<BlogPost> {
        validate_post_fields(title, content)?;
        let post = self
            .gateway
            .update_post(id, title.trim(), content.trim())
            .await
            .map_err(|err| map_not_found(err, id))?;

        let mut cache = self.cache.write().await;
        if let Some(cached) = cache.iter_mut().find(|p| p.id == id) {
            *cached = post.clone();
        }
        Ok(post)
    }

    /// Delete a post. The cache entry is removed only after the remote
    /// delete succeeds; removal is never optimistic.
    pub async fn remove(&self, id: i64) -> DomainResult<()> {
        self.gateway
            .delete_post(id)
            .await
            .map_err(|err| map_not_found(err, id))?;
        self.cache.write().await.retain(|p| p.id != id);
        Ok(())
    }
}

fn validate_post_fields(title: &str, content: &str) -> DomainResult<()> {
    ValidationBuilder::new("title", Some(title.trim().to_string()))
        .required()
        .validate()?;
    ValidationBuilder::new("content", Some(content.trim().to_string()))
        .required()
        .validate()?;
    Ok(())
}

fn map_not_found(err: crate::errors::GatewayError, id: i64) -> DomainError {
    if err.is_not_found() {
        DomainError::EntityNotFound("BlogPost".to_string(), id.to_string())
    } else {
        err.into()
    }
}
