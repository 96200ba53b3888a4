use async_trait::async_trait;

use crate::filter::ContentFilter;
use crate::models::{Category, ContentItem, ContentKind, Page};
use crate::pagination::PageRequest;

/// Read access to CMS content that never fails outward.
///
/// Any transport error, non-2xx status or malformed payload collapses to the
/// operation's empty result: `Page::empty()`, `None` or an empty list. A
/// missing item and a failed request look the same to callers.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn list_content(
        &self,
        kind: ContentKind,
        request: PageRequest,
        filter: Option<&ContentFilter>,
    ) -> Page<ContentItem>;

    async fn get_content_detail(&self, kind: ContentKind, id: &str) -> Option<ContentItem>;

    async fn list_categories(&self) -> Vec<Category>;

    async fn get_category_detail(&self, id: &str) -> Option<Category>;
}
