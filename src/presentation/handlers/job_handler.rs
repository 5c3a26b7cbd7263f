// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::{error, warn};
use uuid::Uuid;
use validator::Validate;

use crate::{
    application::dto::job_request::{
        CreateJobRequestDto, JobListQueryDto, JobListResponseDto, DEFAULT_PAGE_SIZE,
    },
    config::settings::Settings,
    domain::services::job_orchestrator::JobOrchestrator,
    presentation::errors::{AppError, RequestError},
};

/// 创建并在后台运行采集任务
///
/// 任务记录创建后立即返回 202，编排在独立的 tokio 任务中执行。
pub async fn create_job(
    Extension(orchestrator): Extension<Arc<JobOrchestrator>>,
    Extension(settings): Extension<Arc<Settings>>,
    payload: Result<Json<CreateJobRequestDto>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload.map_err(|e| RequestError::BadRequest(e.body_text()))?;
    payload.validate()?;

    let options = payload.into_options(&settings.scraping);
    let prepared = orchestrator.prepare_job(&options).await?;
    let job = prepared.job.clone();

    let runner = orchestrator.clone();
    tokio::spawn(async move {
        let job_id = prepared.job.id;
        if let Err(e) = runner.execute(prepared, &options).await {
            error!(job_id = %job_id, error = %e, "Scraping job aborted");
            if let Err(e) = runner.abort_job(job_id, &e.to_string()).await {
                warn!(job_id = %job_id, error = %e, "Could not mark aborted job as failed");
            }
        }
    });

    Ok((StatusCode::ACCEPTED, Json(job)))
}

/// 获取任务状态
pub async fn get_job(
    Extension(orchestrator): Extension<Arc<JobOrchestrator>>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let job = orchestrator.get_job_status(job_id).await?;
    Ok(Json(job))
}

/// 分页列出任务
pub async fn list_jobs(
    Extension(orchestrator): Extension<Arc<JobOrchestrator>>,
    Query(query): Query<JobListQueryDto>,
) -> Result<impl IntoResponse, AppError> {
    query.validate()?;
    let status = query
        .status_filter()
        .map_err(|s| RequestError::BadRequest(format!("unknown job status '{}'", s)))?;

    let (jobs, total) = orchestrator
        .list_jobs(
            status,
            query.limit.unwrap_or(DEFAULT_PAGE_SIZE),
            query.offset.unwrap_or(0),
        )
        .await?;
    Ok(Json(JobListResponseDto { jobs, total }))
}

/// 取消任务
pub async fn cancel_job(
    Extension(orchestrator): Extension<Arc<JobOrchestrator>>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    if orchestrator.cancel_job(job_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(RequestError::Conflict(format!("Job {} has already finished", job_id)).into())
    }
}
