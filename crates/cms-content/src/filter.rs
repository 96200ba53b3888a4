use std::fmt;

use crate::errors::FetchError;

/// A single listing predicate, compiled to the CMS `field[operator]value`
/// filter syntax. Only one filter is ever sent per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentFilter {
    /// `category[equals]<id>`
    Category(String),
    /// `title[contains]<text>`
    TitleContains(String),
}

impl ContentFilter {
    pub fn category(id: impl Into<String>) -> Self {
        ContentFilter::Category(id.into())
    }

    pub fn title_contains(text: impl Into<String>) -> Self {
        ContentFilter::TitleContains(text.into())
    }

    pub fn value(&self) -> &str {
        match self {
            ContentFilter::Category(id) => id,
            ContentFilter::TitleContains(text) => text,
        }
    }

    /// Value of the `filters` query parameter.
    pub fn to_query_value(&self) -> String {
        self.to_string()
    }

    pub(crate) fn validate(&self) -> Result<(), FetchError> {
        if self.value().trim().is_empty() {
            return Err(FetchError::InvalidRequest(format!(
                "empty value for filter {self}"
            )));
        }
        Ok(())
    }
}

impl fmt::Display for ContentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentFilter::Category(id) => write!(f, "category[equals]{id}"),
            ContentFilter::TitleContains(text) => write!(f, "title[contains]{text}"),
        }
    }
}
