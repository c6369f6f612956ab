//! Reference data for the pet-store API: URL templates, status codes,
//! statuses, payload templates and expected response shapes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dispatch::Payload;
use crate::error::Result;
use crate::http::Headers;

pub const PET: &str = "/pet";
pub const PET_BY_ID: &str = "/pet/{petId}";
pub const FIND_BY_STATUS: &str = "/pet/findByStatus";

pub const STATUS_OK: u16 = 200;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_NOT_FOUND: u16 = 404;

/// Keys every pet object in a response carries.
pub const EXPECTED_PET_KEYS: [&str; 6] = ["id", "category", "name", "photoUrls", "tags", "status"];

/// Headers whose values change between responses; check presence only.
pub const VOLATILE_HEADERS: [&str; 2] = ["date", "server"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetStatus {
    Available,
    Pending,
    Sold,
}

impl PetStatus {
    pub const ALL: [PetStatus; 3] = [PetStatus::Available, PetStatus::Pending, PetStatus::Sold];

    pub fn as_str(&self) -> &'static str {
        match self {
            PetStatus::Available => "available",
            PetStatus::Pending => "pending",
            PetStatus::Sold => "sold",
        }
    }

    /// `{"status": ...}`, the find-by-status query.
    pub fn query(&self) -> Payload {
        Payload::new().with("status", self.as_str())
    }
}

impl fmt::Display for PetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

/// Payload template for creating or updating a pet.
///
/// Every scenario gets its own value; mutate freely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub category: Category,
    pub name: String,
    pub photo_urls: Vec<String>,
    pub tags: Vec<Tag>,
    pub status: PetStatus,
}

impl NewPet {
    pub fn named(name: &str) -> Self {
        Self {
            id: None,
            category: Category {
                id: 1,
                name: "Dogs".to_string(),
            },
            name: name.to_string(),
            photo_urls: vec!["https://example.com/photo.jpg".to_string()],
            tags: vec![Tag {
                id: 1,
                name: "friendly".to_string(),
            }],
            status: PetStatus::Available,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_status(mut self, status: PetStatus) -> Self {
        self.status = status;
        self
    }

    pub fn to_payload(&self) -> Result<Payload> {
        Payload::from_serialize(self)
    }
}

impl Default for NewPet {
    fn default() -> Self {
        Self::named("doggie")
    }
}

/// Header values the pet store sends on every find-by-status response.
pub fn find_by_status_headers() -> Headers {
    Headers::from([
        ("access-control-allow-headers", "Content-Type, api_key, Authorization"),
        ("access-control-allow-methods", "GET, POST, DELETE, PUT"),
        ("access-control-allow-origin", "*"),
        ("content-type", "application/json"),
    ])
}
