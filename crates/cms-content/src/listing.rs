//! Headless view state for paginated listings and detail pages.
//!
//! A [`Listing`] keeps what a listing page renders: the current items, the
//! page number, the total count and whether a fetch is outstanding. Every
//! fetch is tagged with a token; a result that settles after a newer fetch
//! was issued is discarded, so the visible page always matches the last
//! page or filter the user asked for.

use tracing::{debug, instrument};

use crate::errors::PaginationError;
use crate::filter::ContentFilter;
use crate::models::{Category, ContentItem, ContentKind, Page};
use crate::pagination::{PageRequest, Pagination};
use crate::source::ContentSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    Applied,
    Superseded,
}

/// A fetch issued by [`Listing::begin`], to be handed back to
/// [`Listing::settle`] together with its result.
#[derive(Debug, Clone)]
pub struct PendingPage {
    token: u64,
    kind: ContentKind,
    request: PageRequest,
    filter: Option<ContentFilter>,
}

impl PendingPage {
    pub fn request(&self) -> PageRequest {
        self.request
    }

    pub fn filter(&self) -> Option<&ContentFilter> {
        self.filter.as_ref()
    }

    pub async fn fetch<S>(&self, source: &S) -> Page<ContentItem>
    where
        S: ContentSource + ?Sized,
    {
        source
            .list_content(self.kind, self.request, self.filter.as_ref())
            .await
    }
}

#[derive(Debug, Clone)]
pub struct Listing {
    kind: ContentKind,
    filter: Option<ContentFilter>,
    page_size: u32,
    current_page: u32,
    items: Vec<ContentItem>,
    total_count: u64,
    loading: bool,
    last_issued: u64,
}

impl Listing {
    pub fn new(
        kind: ContentKind,
        filter: Option<ContentFilter>,
        page_size: u32,
    ) -> Result<Self, PaginationError> {
        PageRequest::first(page_size)?;

        Ok(Self {
            kind,
            filter,
            page_size,
            current_page: 1,
            items: Vec::new(),
            total_count: 0,
            loading: false,
            last_issued: 0,
        })
    }

    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    pub fn filter(&self) -> Option<&ContentFilter> {
        self.filter.as_ref()
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// True once a fetch has settled with nothing to show.
    pub fn is_empty(&self) -> bool {
        !self.loading && self.items.is_empty()
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.current_page, self.total_count, self.page_size)
    }

    /// Switches the predicate and returns to the first page. The next
    /// `begin`/`load` fetches with the new filter; fetches started under the
    /// old one are superseded and the previous items are cleared.
    pub fn set_filter(&mut self, filter: Option<ContentFilter>) {
        self.last_issued += 1;
        self.filter = filter;
        self.current_page = 1;
        self.items.clear();
        self.total_count = 0;
        self.loading = false;
    }

    /// Starts fetching `page`. Any fetch started earlier becomes stale.
    pub fn begin(&mut self, page: u32) -> Result<PendingPage, PaginationError> {
        let request = PageRequest::new(page, self.page_size)?;

        self.last_issued += 1;
        self.current_page = page;
        self.loading = true;

        Ok(PendingPage {
            token: self.last_issued,
            kind: self.kind,
            request,
            filter: self.filter.clone(),
        })
    }

    pub fn settle(&mut self, pending: PendingPage, page: Page<ContentItem>) -> Settled {
        if pending.token != self.last_issued {
            debug!(
                token = pending.token,
                latest = self.last_issued,
                "Discarding superseded listing result"
            );
            return Settled::Superseded;
        }

        self.items = page.items;
        self.total_count = page.total_count;
        self.loading = false;
        Settled::Applied
    }

    #[instrument(skip_all, fields(kind = %self.kind, page = page))]
    pub async fn load<S>(&mut self, source: &S, page: u32) -> Result<Settled, PaginationError>
    where
        S: ContentSource + ?Sized,
    {
        let pending = self.begin(page)?;
        let result = pending.fetch(source).await;
        Ok(self.settle(pending, result))
    }
}

/// Data behind a category page: the category itself and one page of its
/// content.
#[derive(Debug, Clone)]
pub struct CategoryView {
    pub category: Option<Category>,
    pub contents: Page<ContentItem>,
    pub pagination: Pagination,
}

/// Fetches a category and its filtered listing concurrently.
#[instrument(skip(source), fields(page = request.page()))]
pub async fn load_category_view<S>(
    source: &S,
    kind: ContentKind,
    category_id: &str,
    request: PageRequest,
) -> CategoryView
where
    S: ContentSource + ?Sized,
{
    let filter = ContentFilter::category(category_id);
    let (category, contents) = tokio::join!(
        source.get_category_detail(category_id),
        source.list_content(kind, request, Some(&filter)),
    );

    let pagination = Pagination::new(request.page(), contents.total_count, request.page_size());

    CategoryView {
        category,
        contents,
        pagination,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailView {
    Found(ContentItem),
    NotFound,
}

pub async fn load_detail<S>(source: &S, kind: ContentKind, id: &str) -> DetailView
where
    S: ContentSource + ?Sized,
{
    match source.get_content_detail(kind, id).await {
        Some(item) => DetailView::Found(item),
        None => DetailView::NotFound,
    }
}

/// Ids of the default first page, used to pre-render detail pages.
pub async fn detail_paths<S>(source: &S, kind: ContentKind) -> Vec<String>
where
    S: ContentSource + ?Sized,
{
    source
        .list_content(kind, PageRequest::default(), None)
        .await
        .items
        .into_iter()
        .map(|item| item.id)
        .collect()
}
