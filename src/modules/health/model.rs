use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

pub const STATUS_OK: &str = "OK";
pub const STATUS_ERROR: &str = "ERROR";

#[derive(Debug, Serialize, ToSchema)]
pub struct LivenessResponse {
    /// Always `ALIVE`
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReadinessResponse {
    /// `READY` or `NOT_READY`
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DatabaseCheck {
    /// `OK` or `ERROR`
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MemoryCheck {
    pub status: String,
    pub total_bytes: u64,
    pub used_bytes: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProcessCheck {
    pub status: String,
    pub pid: u32,
    pub uptime_seconds: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthChecks {
    pub database: DatabaseCheck,
    pub memory: MemoryCheck,
    pub process: ProcessCheck,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `OK` when every check passes, `DEGRADED` otherwise
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub uptime_seconds: u64,
    pub checks: HealthChecks,
}

impl HealthResponse {
    pub fn is_healthy(&self) -> bool {
        self.checks.database.status == STATUS_OK
    }
}
