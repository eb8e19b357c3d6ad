use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::core::library::{LibraryError, LibraryResult};
use crate::gateway::lookup::{Author, Edition, MetadataLookup};

// OpenLibraryClient talks to an Open Library compatible service:
//   GET {base}/isbn/{isbn}.json   -> edition
//   GET {base}{author_key}.json   -> author
#[derive(Debug, Clone)]
pub struct OpenLibraryClient {
    client: reqwest::Client,
    base_url: String,
}

impl OpenLibraryClient {
    pub fn new(base_url: &str, timeout: Duration) -> LibraryResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| LibraryError::runtime(format!("http client {}", err).as_str(), None))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn edition_url(&self, isbn: &str) -> LibraryResult<Url> {
        let mut url = Url::parse(self.base_url.as_str())
            .map_err(|err| LibraryError::lookup_failed(format!("invalid lookup url {}: {}", self.base_url, err).as_str(), None))?;
        url.path_segments_mut()
            .map_err(|_| LibraryError::lookup_failed(format!("lookup url cannot be a base {}", self.base_url).as_str(), None))?
            .pop_if_empty()
            .push("isbn")
            .push(format!("{}.json", isbn).as_str());
        Ok(url)
    }

    fn author_url(&self, author_key: &str) -> LibraryResult<Url> {
        let raw = format!("{}{}.json", self.base_url, author_key);
        Url::parse(raw.as_str())
            .map_err(|err| LibraryError::lookup_failed(format!("invalid author url {}: {}", raw, err).as_str(), None))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> LibraryResult<T> {
        debug!("requesting {}", url);
        let resp = self.client.get(url.clone()).send().await?;
        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(LibraryError::not_found(format!("nothing found at {}", url).as_str()));
        }
        if !status.is_success() {
            return Err(LibraryError::lookup_failed(
                format!("unexpected status from {}", url).as_str(), Some(status.as_u16().to_string())));
        }
        resp.json::<T>().await.map_err(|err| LibraryError::lookup_failed(
            format!("unreadable payload from {}: {}", url, err).as_str(), None))
    }
}

#[async_trait]
impl MetadataLookup for OpenLibraryClient {
    async fn find_edition(&self, isbn: &str) -> LibraryResult<Edition> {
        let url = self.edition_url(isbn)?;
        self.get_json(url).await
    }

    async fn find_author(&self, author_key: &str) -> LibraryResult<Author> {
        let url = self.author_url(author_key)?;
        self.get_json(url).await
    }
}
