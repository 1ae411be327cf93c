use crate::config::FetchConfig;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::thread::sleep;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("request to {url} failed after {attempts} attempts")]
    RetriesExhausted { url: String, attempts: u32 },
}

/// Blocking client for the Koios REST API: paginated GETs and batched POSTs,
/// both with a bounded retry on transient failure.
pub struct KoiosClient {
    config: FetchConfig,
    http: reqwest::blocking::Client,
}

impl KoiosClient {
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { config, http })
    }

    /// Fetches every page of a list endpoint. Pagination ends on the first
    /// page shorter than the configured limit.
    pub fn get_paginated<T: DeserializeOwned>(&self, endpoint: &str) -> Result<Vec<T>, Error> {
        let mut rows = Vec::new();
        let mut offset = 0usize;
        // The endpoint may already carry a query string (e.g. a proposal id
        // filter); pagination parameters are appended either way.
        let separator = if endpoint.contains('?') { '&' } else { '?' };
        loop {
            let url = format!(
                "{}/{}{}limit={}&offset={}",
                self.config.base_url, endpoint, separator, self.config.page_limit, offset
            );
            debug!(%url, "fetching page");
            let batch: Vec<T> = self.with_retries(&url, || {
                Ok(self.http.get(&url).send()?.error_for_status()?.json()?)
            })?;
            let page_len = batch.len();
            rows.extend(batch);
            if page_len < self.config.page_limit {
                break;
            }
            offset += self.config.page_limit;
            sleep(self.config.request_pause);
        }
        Ok(rows)
    }

    /// Fetches a single-object endpoint that Koios wraps in a one-element
    /// array; an empty array yields `None`.
    pub fn get_first<T: DeserializeOwned>(&self, endpoint_and_query: &str) -> Result<Option<T>, Error> {
        let url = format!("{}/{}", self.config.base_url, endpoint_and_query);
        let mut batch: Vec<T> = self.with_retries(&url, || {
            Ok(self.http.get(&url).send()?.error_for_status()?.json()?)
        })?;
        Ok(if batch.is_empty() {
            None
        } else {
            Some(batch.remove(0))
        })
    }

    /// Fetches a POST endpoint taking an id list, chunked to the configured
    /// batch size.
    pub fn post_batched<T: DeserializeOwned, I: Serialize>(
        &self,
        endpoint: &str,
        id_key: &str,
        ids: &[I],
    ) -> Result<Vec<T>, Error> {
        let url = format!("{}/{}", self.config.base_url, endpoint);
        let mut rows = Vec::new();
        for (i, chunk) in ids.chunks(self.config.batch_size).enumerate() {
            debug!(endpoint, batch = i + 1, size = chunk.len(), "fetching batch");
            let payload = json!({ id_key: chunk });
            let batch: Vec<T> = self.with_retries(&url, || {
                Ok(self
                    .http
                    .post(&url)
                    .json(&payload)
                    .send()?
                    .error_for_status()?
                    .json()?)
            })?;
            rows.extend(batch);
            sleep(self.config.request_pause);
        }
        Ok(rows)
    }

    fn with_retries<T>(
        &self,
        url: &str,
        mut request: impl FnMut() -> Result<T, Error>,
    ) -> Result<T, Error> {
        let attempts = self.config.retries.max(1);
        for attempt in 1..=attempts {
            match request() {
                Ok(value) => return Ok(value),
                Err(err) if attempt < attempts => {
                    warn!(%url, attempt, %err, "request failed, retrying");
                    sleep(self.config.retry_delay);
                }
                Err(err) => {
                    warn!(%url, attempt, %err, "request failed, giving up");
                    return Err(Error::RetriesExhausted {
                        url: url.to_string(),
                        attempts,
                    });
                }
            }
        }
        unreachable!("retry loop always returns")
    }
}
