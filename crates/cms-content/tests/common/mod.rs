#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Path, RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use cms_content::{ClientConfig, ContentClient};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

pub const API_KEY: &str = "fixture-key";

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub query: Vec<(String, String)>,
    pub api_key: Option<String>,
}

impl RecordedRequest {
    pub fn params(&self, name: &str) -> Vec<&str> {
        self.query
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Healthy,
    ServerError,
    MalformedJson,
}

#[derive(Debug, Clone, Default)]
pub struct FixtureData {
    pub blog: Vec<Value>,
    pub news: Vec<Value>,
    pub categories: Vec<Value>,
}

impl FixtureData {
    /// `count` blog posts in `category_id`, plus the `tech` and `events`
    /// categories.
    pub fn blog_posts(count: usize, category_id: &str) -> Self {
        Self {
            blog: (1..=count).map(|n| blog_post(n, category_id)).collect(),
            news: Vec::new(),
            categories: vec![category("tech"), category("events")],
        }
    }
}

pub fn category(id: &str) -> Value {
    json!({
        "id": id,
        "name": format!("Category {id}"),
        "explanation": format!("Posts about {id}"),
        "createdAt": "2024-01-10T00:00:00.000Z",
        "updatedAt": "2024-01-10T00:00:00.000Z",
        "publishedAt": "2024-01-10T00:00:00.000Z",
        "revisedAt": "2024-01-10T00:00:00.000Z"
    })
}

pub fn blog_post(n: usize, category_id: &str) -> Value {
    json!({
        "id": format!("post-{n}"),
        "title": format!("Post number {n}"),
        "description": format!("Summary of post {n}"),
        "content": format!("<p>Body of post {n}</p>"),
        "date": "2024-04-01T09:00:00.000Z",
        "eyecatch": { "url": format!("https://images.example.com/{n}.png"), "width": 1200, "height": 630 },
        "category": category(category_id),
        "createdAt": "2024-04-01T09:00:00.000Z",
        "updatedAt": "2024-04-01T09:00:00.000Z",
        "publishedAt": "2024-04-01T09:00:00.000Z",
        "revisedAt": "2024-04-01T09:00:00.000Z"
    })
}

#[derive(Clone)]
struct FixtureState {
    data: Arc<FixtureData>,
    behavior: Behavior,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FixtureState {
    fn collection(&self, name: &str) -> Option<&[Value]> {
        match name {
            "blog" => Some(self.data.blog.as_slice()),
            "news" => Some(self.data.news.as_slice()),
            "categories" => Some(self.data.categories.as_slice()),
            _ => None,
        }
    }

    /// Records the request and answers for the failure modes shared by every
    /// route. Returns the decoded query when the route should serve data.
    fn intercept(
        &self,
        path: String,
        query: Option<String>,
        headers: &HeaderMap,
    ) -> Result<Vec<(String, String)>, Response> {
        let query: Vec<(String, String)> = query
            .map(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect()
            })
            .unwrap_or_default();
        let api_key = headers
            .get("x-api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let authorized = api_key.as_deref() == Some(API_KEY);

        self.requests.lock().unwrap().push(RecordedRequest {
            path,
            query: query.clone(),
            api_key,
        });

        if !authorized {
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "X-API-KEY header is invalid." })),
            )
                .into_response());
        }

        match self.behavior {
            Behavior::Healthy => Ok(query),
            Behavior::ServerError => Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "Internal server error" })),
            )
                .into_response()),
            Behavior::MalformedJson => Err((StatusCode::OK, "{\"contents\": [").into_response()),
        }
    }
}

fn matches_filter(item: &Value, filter: Option<&str>) -> bool {
    let Some(filter) = filter else {
        return true;
    };

    if let Some(id) = filter.strip_prefix("category[equals]") {
        return item["category"]["id"].as_str() == Some(id);
    }
    if let Some(text) = filter.strip_prefix("title[contains]") {
        return item["title"].as_str().is_some_and(|title| title.contains(text));
    }
    false
}

async fn list_collection(
    State(state): State<FixtureState>,
    Path(collection): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    let params = match state.intercept(format!("/api/v1/{collection}"), query, &headers) {
        Ok(params) => params,
        Err(response) => return response,
    };

    let Some(items) = state.collection(&collection) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let param = |name: &str| {
        params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    };

    let offset: usize = param("offset").and_then(|v| v.parse().ok()).unwrap_or(0);
    let limit: usize = param("limit").and_then(|v| v.parse().ok()).unwrap_or(10);
    let filter = param("filters");

    let matching: Vec<&Value> = items
        .iter()
        .filter(|item| matches_filter(item, filter.as_deref()))
        .collect();
    let total_count = matching.len();
    let contents: Vec<Value> = matching
        .into_iter()
        .skip(offset)
        .take(limit)
        .cloned()
        .collect();

    Json(json!({
        "contents": contents,
        "totalCount": total_count,
        "offset": offset,
        "limit": limit,
    }))
    .into_response()
}

async fn get_entry(
    State(state): State<FixtureState>,
    Path((collection, id)): Path<(String, String)>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = state.intercept(format!("/api/v1/{collection}/{id}"), query, &headers) {
        return response;
    }

    let entry = state
        .collection(&collection)
        .and_then(|items| items.iter().find(|item| item["id"].as_str() == Some(id.as_str())));

    match entry {
        Some(item) => Json(item.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// In-process stand-in for the CMS API, serving `data` under `/api/v1`.
pub struct FixtureCms {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FixtureCms {
    pub async fn start(data: FixtureData) -> anyhow::Result<Self> {
        Self::start_with(data, Behavior::Healthy).await
    }

    pub async fn start_with(data: FixtureData, behavior: Behavior) -> anyhow::Result<Self> {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = FixtureState {
            data: Arc::new(data),
            behavior,
            requests: requests.clone(),
        };

        let app = Router::new()
            .route("/api/v1/{collection}", get(list_collection))
            .route("/api/v1/{collection}/{id}", get(get_entry))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url: format!("http://{addr}/api/v1"),
            requests,
        })
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::new("fixture", API_KEY)
            .expect("fixture config is complete")
            .with_base_url(self.base_url.clone())
    }

    pub fn client(&self) -> ContentClient {
        ContentClient::new(&self.config()).expect("fixture client builds")
    }

    pub fn client_with_key(&self, api_key: &str) -> ContentClient {
        let config = ClientConfig::new("fixture", api_key)
            .expect("fixture config is complete")
            .with_base_url(self.base_url.clone());
        ContentClient::new(&config).expect("fixture client builds")
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests()
            .pop()
            .expect("fixture received at least one request")
    }
}

/// A client pointed at a port nobody listens on.
pub async fn unreachable_client() -> anyhow::Result<ContentClient> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    let config = ClientConfig::new("fixture", API_KEY)?.with_base_url(format!("http://{addr}/api/v1"));
    Ok(ContentClient::new(&config)?)
}
