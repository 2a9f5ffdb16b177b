//! Resupply request handed to the logistics request sink.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticsRequest {
    pub id: String,
    pub originating_unit_id: String,
    pub originating_unit_name: String,
    pub details: String,
    /// Epoch ms
    pub request_timestamp: i64,
    pub status: RequestStatus,
}
