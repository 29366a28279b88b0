//! Liveness and readiness probes.
//!
//! - GET /healthz -> always `{"status":"ok"}`
//! - GET /readyz  -> database reachable and the `entries` schema applied

use crate::services::DriveService;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use std::collections::BTreeMap;

/// `GET /healthz`
pub async fn healthz() -> impl IntoResponse {
    Json(ProbeResponse {
        status: "ok",
        checks: BTreeMap::new(),
    })
}

/// `GET /readyz`
///
/// 503 until the metadata database answers and `--migrate` has been run
/// against it.
pub async fn readyz(State(drive): State<DriveService>) -> impl IntoResponse {
    let database = CheckStatus::from(
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&*drive.db)
            .await
            .map(|_| ()),
    );

    let schema = CheckStatus::from(
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'entries'",
        )
        .fetch_one(&*drive.db)
        .await
        .and_then(|tables| {
            if tables == 1 {
                Ok(())
            } else {
                Err(sqlx::Error::Protocol("entries table missing".into()))
            }
        }),
    );

    let ready = database.ok && schema.ok;
    let checks = BTreeMap::from([("database", database), ("schema", schema)]);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ProbeResponse {
            status: if ready { "ok" } else { "unavailable" },
            checks,
        }),
    )
}

#[derive(Serialize)]
struct ProbeResponse {
    status: &'static str,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    checks: BTreeMap<&'static str, CheckStatus>,
}

#[derive(Serialize)]
struct CheckStatus {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl From<Result<(), sqlx::Error>> for CheckStatus {
    fn from(result: Result<(), sqlx::Error>) -> Self {
        match result {
            Ok(()) => Self {
                ok: true,
                error: None,
            },
            Err(err) => Self {
                ok: false,
                error: Some(err.to_string()),
            },
        }
    }
}
