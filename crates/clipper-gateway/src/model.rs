use serde::{Deserialize, Serialize};

pub use clipper_core::{BatchRequest, BatchResponse, Stats, UserUrl};

#[derive(Debug, Deserialize, Serialize)]
pub struct ShortenRequest {
    pub url: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ShortenResponse {
    pub result: String,
}
