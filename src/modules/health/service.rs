use std::time::Instant;

use aula_db::{PgPool, ping};
use chrono::Utc;
use sysinfo::System;
use tracing::{instrument, warn};

use super::model::{
    DatabaseCheck, HealthChecks, HealthResponse, LivenessResponse, MemoryCheck, ProcessCheck,
    ReadinessResponse, STATUS_ERROR, STATUS_OK,
};

/// Probes the process and its database. Never fails: a broken database
/// degrades the report instead.
#[derive(Debug)]
pub struct HealthService {
    db: PgPool,
    started_at: Instant,
}

impl HealthService {
    pub fn new(db: PgPool, started_at: Instant) -> Self {
        Self { db, started_at }
    }

    fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn live(&self) -> LivenessResponse {
        LivenessResponse {
            status: "ALIVE".to_string(),
            timestamp: Utc::now(),
        }
    }

    #[instrument(skip(self))]
    pub async fn ready(&self) -> ReadinessResponse {
        match ping(&self.db).await {
            Ok(()) => ReadinessResponse {
                status: "READY".to_string(),
                error: None,
                timestamp: Utc::now(),
            },
            Err(e) => {
                warn!(error = %e, "Readiness probe failed");
                ReadinessResponse {
                    status: "NOT_READY".to_string(),
                    error: Some(e.to_string()),
                    timestamp: Utc::now(),
                }
            }
        }
    }

    async fn check_database(&self) -> DatabaseCheck {
        let started = Instant::now();
        match ping(&self.db).await {
            Ok(()) => DatabaseCheck {
                status: STATUS_OK.to_string(),
                latency_ms: Some(started.elapsed().as_millis() as u64),
                error: None,
            },
            Err(e) => {
                warn!(error = %e, "Database health check failed");
                DatabaseCheck {
                    status: STATUS_ERROR.to_string(),
                    latency_ms: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    fn check_memory(&self) -> MemoryCheck {
        let mut sys = System::new();
        sys.refresh_memory();

        MemoryCheck {
            status: STATUS_OK.to_string(),
            total_bytes: sys.total_memory(),
            used_bytes: sys.used_memory(),
        }
    }

    #[instrument(skip(self))]
    pub async fn health(&self) -> HealthResponse {
        let database = self.check_database().await;
        let uptime_seconds = self.uptime_seconds();

        let status = if database.status == STATUS_OK {
            "OK"
        } else {
            "DEGRADED"
        };

        HealthResponse {
            status: status.to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds,
            checks: HealthChecks {
                database,
                memory: self.check_memory(),
                process: ProcessCheck {
                    status: STATUS_OK.to_string(),
                    pid: std::process::id(),
                    uptime_seconds,
                },
            },
        }
    }
}
