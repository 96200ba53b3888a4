use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use std::sync::{Arc, Mutex};

use crate::filter::ContentFilter;
use crate::models::{Category, ContentItem, ContentKind, Page};
use crate::pagination::PageRequest;
use crate::source::ContentSource;

pub fn sample_category(id: &str) -> Category {
    Category {
        id: id.to_string(),
        name: format!("Category {id}"),
        explanation: None,
        image: None,
        created_at: None,
        updated_at: None,
        published_at: None,
        revised_at: None,
    }
}

/// `post-1` .. `post-{count}`, all in `category_id`, one day apart.
pub fn sample_items(count: usize, category_id: &str) -> Vec<ContentItem> {
    let start = Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap();

    (1..=count)
        .map(|n| ContentItem {
            id: format!("post-{n}"),
            title: format!("Post number {n}"),
            description: format!("Summary of post {n}"),
            content: format!("<p>Body of post {n}</p>"),
            date: Some(start + Duration::days(n as i64)),
            eyecatch: None,
            category: Some(sample_category(category_id)),
            created_at: None,
            updated_at: None,
            published_at: Some(start + Duration::days(n as i64)),
            revised_at: None,
        })
        .collect()
}

/// Calls recorded by [`InMemorySource`].
#[derive(Debug, Clone, PartialEq)]
pub enum SourceCall {
    List {
        kind: ContentKind,
        request: PageRequest,
        filter: Option<ContentFilter>,
    },
    Detail {
        kind: ContentKind,
        id: String,
    },
    Categories,
    CategoryDetail {
        id: String,
    },
}

/// A [`ContentSource`] over fixed data, serving the same items for every
/// content kind.
#[derive(Clone, Default)]
pub struct InMemorySource {
    items: Vec<ContentItem>,
    categories: Vec<Category>,
    calls: Arc<Mutex<Vec<SourceCall>>>,
}

impl InMemorySource {
    pub fn new(items: Vec<ContentItem>, categories: Vec<Category>) -> Self {
        Self {
            items,
            categories,
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> Vec<SourceCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: SourceCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn matches(item: &ContentItem, filter: Option<&ContentFilter>) -> bool {
        match filter {
            None => true,
            Some(ContentFilter::Category(id)) => {
                item.category.as_ref().is_some_and(|c| &c.id == id)
            }
            Some(ContentFilter::TitleContains(text)) => item.title.contains(text.as_str()),
        }
    }
}

#[async_trait]
impl ContentSource for InMemorySource {
    async fn list_content(
        &self,
        kind: ContentKind,
        request: PageRequest,
        filter: Option<&ContentFilter>,
    ) -> Page<ContentItem> {
        self.record(SourceCall::List {
            kind,
            request,
            filter: filter.cloned(),
        });

        let matching: Vec<&ContentItem> = self
            .items
            .iter()
            .filter(|item| Self::matches(item, filter))
            .collect();

        Page {
            total_count: matching.len() as u64,
            items: matching
                .into_iter()
                .skip(request.offset() as usize)
                .take(request.limit() as usize)
                .cloned()
                .collect(),
        }
    }

    async fn get_content_detail(&self, kind: ContentKind, id: &str) -> Option<ContentItem> {
        self.record(SourceCall::Detail {
            kind,
            id: id.to_string(),
        });
        self.items.iter().find(|item| item.id == id).cloned()
    }

    async fn list_categories(&self) -> Vec<Category> {
        self.record(SourceCall::Categories);
        self.categories.clone()
    }

    async fn get_category_detail(&self, id: &str) -> Option<Category> {
        self.record(SourceCall::CategoryDetail { id: id.to_string() });
        self.categories.iter().find(|c| c.id == id).cloned()
    }
}
