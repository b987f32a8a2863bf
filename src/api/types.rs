// Overseas.ai API response types.
// Defines structs for deserializing the backend's job listing payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Publication state of a job listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    Open,
    Closed,
    Expired,
    #[serde(other)]
    Unknown,
}

/// A job listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: u64,
    #[serde(alias = "jobTitle")]
    pub title: String,
    pub company_name: Option<String>,
    pub country: Option<String>,
    pub occupation: Option<String>,
    pub salary: Option<String>,
    pub currency: Option<String>,
    pub vacancies: Option<u32>,
    #[serde(default)]
    pub status: JobStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub deadline: Option<DateTime<Utc>>,
}

/// Destination country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub id: u64,
    pub name: String,
    pub code: Option<String>,
}

/// Occupation a job can be filed under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Occupation {
    pub id: u64,
    pub title: String,
}

/// Single-object response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub data: T,
}

/// Paginated list response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    #[serde(alias = "currentPage")]
    pub current_page: u32,
    #[serde(alias = "lastPage")]
    pub last_page: u32,
    pub total: u64,
}

impl<T> Paginated<T> {
    pub fn has_more(&self) -> bool {
        self.current_page < self.last_page
    }
}

/// Filters for the job listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobQuery {
    pub page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupation_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl Default for JobQuery {
    fn default() -> Self {
        Self {
            page: 1,
            country_id: None,
            occupation_id: None,
            search: None,
        }
    }
}

impl JobQuery {
    pub fn page(page: u32) -> Self {
        Self {
            page,
            ..Self::default()
        }
    }
}
