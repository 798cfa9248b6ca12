//! Manual update handler
//!
//! Update outcomes, including failures, are reported in the body with a
//! `status` of `success` or `error`; the HTTP status stays 200.
//!
//! The cycle runs on its own task while holding the update lock, so a
//! dropped connection never stops it halfway through.

use axum::{
    extract::{Query, State},
    Json,
};
use litgraph_common::errors::{AppError, ErrorCode};
use litgraph_ingestion::{UpdateError, UpdateRange, UpdateReport};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::AppState;

/// Query parameters of `GET /api/update-articles`
#[derive(Debug, Default, Deserialize)]
pub struct UpdateParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum UpdateResponse {
    Success {
        message: String,
        total_articles: usize,
        added: usize,
        sources: Vec<String>,
        skipped: usize,
        failed_queries: usize,
        run_id: Uuid,
    },
    Error {
        message: String,
        code: ErrorCode,
    },
}

impl From<UpdateReport> for UpdateResponse {
    fn from(report: UpdateReport) -> Self {
        UpdateResponse::Success {
            message: report.message(),
            total_articles: report.total_articles,
            added: report.added,
            sources: report.sources,
            skipped: report.skipped,
            failed_queries: report.failed_queries,
            run_id: report.run_id,
        }
    }
}

impl From<UpdateError> for UpdateResponse {
    fn from(e: UpdateError) -> Self {
        let message = e.to_string();
        let code = AppError::from(e).code();
        UpdateResponse::Error { message, code }
    }
}

/// `GET /api/update-articles?start_date=&end_date=`
pub async fn update_articles(
    State(state): State<AppState>,
    Query(params): Query<UpdateParams>,
) -> Json<UpdateResponse> {
    let range = match UpdateRange::parse(params.start_date.as_deref(), params.end_date.as_deref()) {
        Ok(range) => range,
        Err(e) => {
            warn!(error = %e, "Rejected update request");
            return Json(e.into());
        }
    };

    let pipeline = state.updater.clone().lock_owned().await;
    info!(start = %range.start, end = %range.end, "Update lock acquired");

    let cycle = tokio::spawn(async move { pipeline.run(range).await });

    match cycle.await {
        Ok(Ok(report)) => Json(report.into()),
        Ok(Err(e)) => {
            error!(error = %e, "Update failed");
            Json(e.into())
        }
        Err(e) => {
            error!(error = %e, "Update task aborted");
            let err = AppError::Internal {
                message: format!("update task aborted: {}", e),
            };
            Json(UpdateResponse::Error {
                message: err.to_string(),
                code: err.code(),
            })
        }
    }
}
