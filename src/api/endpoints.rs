// Overseas.ai API endpoint functions.
// Typed, cached accessors for the backend's listing endpoints.

use std::sync::Arc;

use crate::cache::RequestCache;
use crate::error::Result;

use super::client::ApiClient;
use super::types::{Country, DataResponse, Job, JobQuery, Occupation, Paginated};

/// Endpoint names used for cache keys and rate windows.
pub mod names {
    pub const JOBS: &str = "jobs";
    pub const JOB: &str = "job";
    pub const COUNTRIES: &str = "countries";
    pub const OCCUPATIONS: &str = "occupations";
}

/// Backend client whose reads go through a shared `RequestCache`.
pub struct CachedApi {
    client: ApiClient,
    cache: Arc<RequestCache>,
}

impl CachedApi {
    pub fn new(client: ApiClient, cache: Arc<RequestCache>) -> Self {
        Self { client, cache }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn cache(&self) -> &Arc<RequestCache> {
        &self.cache
    }

    /// List jobs matching `query`.
    pub async fn jobs(&self, query: &JobQuery) -> Result<Paginated<Job>> {
        let page: Paginated<Job> = self
            .cache
            .request_with_params(names::JOBS, query, || {
                self.client.get_json_with_params("/jobs", query)
            })
            .await?;
        Ok(page)
    }

    /// Get a single job.
    pub async fn job(&self, id: u64) -> Result<Job> {
        let path = format!("/jobs/{}", id);
        let response: DataResponse<Job> = self
            .cache
            .request_with_params(names::JOB, &id, || self.client.get_json(&path))
            .await?;
        Ok(response.data)
    }

    /// List destination countries.
    pub async fn countries(&self) -> Result<Vec<Country>> {
        let response: DataResponse<Vec<Country>> = self
            .cache
            .request(names::COUNTRIES, || self.client.get_json("/countries"))
            .await?;
        Ok(response.data)
    }

    /// List occupations.
    pub async fn occupations(&self) -> Result<Vec<Occupation>> {
        let response: DataResponse<Vec<Occupation>> = self
            .cache
            .request(names::OCCUPATIONS, || self.client.get_json("/occupations"))
            .await?;
        Ok(response.data)
    }
}
