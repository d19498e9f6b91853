use chrono::Utc;
use gloo_net::http::Request;
use log::{info, warn};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::BackendConfig;
use crate::model::{fallback_cats, fallback_matches, Cat, CatRow, Match, MatchRow};

const CATS_COLLECTION: &str = "cats";
const CATS_LIMIT: usize = 10;
const MATCHES_COLLECTION: &str = "matches";
const MATCHES_LIMIT: usize = 20;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("no backend configured")]
    Unavailable,
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP {status} while fetching {collection}")]
    Status { status: u16, collection: String },
    #[error("malformed response: {0}")]
    Parse(String),
}

impl DataError {
    pub(crate) fn network<E: std::fmt::Display>(err: E) -> Self {
        Self::Network(err.to_string())
    }

    pub(crate) fn parse<E: std::fmt::Display>(err: E) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Row selection for one `fetch_rows` call.
#[derive(Debug, Clone)]
pub struct RowQuery<'a> {
    pub select: &'a str,
    pub limit: usize,
    pub order: Option<&'a str>,
}

impl RowQuery<'_> {
    fn to_query_string(&self) -> String {
        let mut query = format!(
            "select={}&limit={}",
            urlencoding::encode(self.select),
            self.limit
        );
        if let Some(order) = self.order {
            query.push_str("&order=");
            query.push_str(&urlencoding::encode(order));
        }
        query
    }
}

/// Reads up to `query.limit` rows of `collection` from the backend.
pub async fn fetch_rows<T: DeserializeOwned>(
    config: Option<&BackendConfig>,
    collection: &str,
    query: &RowQuery<'_>,
) -> Result<Vec<T>, DataError> {
    let config = config.ok_or(DataError::Unavailable)?;
    let url = format!("{}?{}", config.rest_url(collection), query.to_query_string());
    let bearer = format!("Bearer {}", config.anon_key);

    let response = Request::get(&url)
        .header("apikey", &config.anon_key)
        .header("Authorization", &bearer)
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(DataError::network)?;

    if !response.ok() {
        return Err(DataError::Status {
            status: response.status(),
            collection: collection.to_owned(),
        });
    }

    let text = response.text().await.map_err(DataError::network)?;
    serde_json::from_str(&text).map_err(DataError::parse)
}

pub async fn load_cats(config: Option<&BackendConfig>) -> Vec<Cat> {
    let query = RowQuery {
        select: "*",
        limit: CATS_LIMIT,
        order: None,
    };
    resolve_cats(fetch_rows::<CatRow>(config, CATS_COLLECTION, &query).await)
}

pub async fn load_matches(config: Option<&BackendConfig>) -> Vec<Match> {
    let query = RowQuery {
        select: "*,cat:cats(*)",
        limit: MATCHES_LIMIT,
        order: Some("created_at.desc"),
    };
    resolve_matches(fetch_rows::<MatchRow>(config, MATCHES_COLLECTION, &query).await)
}

/// Maps fetched rows into the deck, substituting the built-in cats when the
/// fetch failed or came back empty.
pub fn resolve_cats(fetched: Result<Vec<CatRow>, DataError>) -> Vec<Cat> {
    match fetched {
        Ok(rows) if !rows.is_empty() => {
            info!("Loaded {} cats from backend", rows.len());
            rows.into_iter().map(Cat::from).collect()
        }
        Ok(_) => {
            warn!("Backend returned no cats, using built-in deck");
            fallback_cats()
        }
        Err(err) => {
            warn!("Falling back to built-in deck: {}", err);
            fallback_cats()
        }
    }
}

pub fn resolve_matches(fetched: Result<Vec<MatchRow>, DataError>) -> Vec<Match> {
    let mapped = fetched.and_then(|rows| {
        rows.into_iter()
            .map(Match::try_from)
            .collect::<Result<Vec<_>, _>>()
    });

    match mapped {
        Ok(mut matches) if !matches.is_empty() => {
            matches.sort_by(|a, b| b.matched_at.cmp(&a.matched_at));
            matches
        }
        Ok(_) => {
            warn!("Backend returned no matches, using built-in matches");
            fallback_matches(Utc::now())
        }
        Err(err) => {
            warn!("Falling back to built-in matches: {}", err);
            fallback_matches(Utc::now())
        }
    }
}
