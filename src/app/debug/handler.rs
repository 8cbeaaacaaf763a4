//! 诊断处理器

use axum::{
    extract::{Query, State},
    response::Html,
};
use serde::Deserialize;
use tracing::error;

use crate::app::AppState;
use crate::core::error::CoreError;
use crate::view;

#[derive(Debug, Deserialize)]
pub struct ExecQuery {
    pub cmd: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FetchQuery {
    pub url: Option<String>,
}

fn ensure_enabled(state: &AppState) -> Result<(), CoreError> {
    if state.diagnostics.enabled() {
        Ok(())
    } else {
        Err(CoreError::NotFound("Not found.".to_string()))
    }
}

/// GET /debug/exec?cmd=
pub async fn exec_diagnostic(
    State(state): State<AppState>,
    Query(query): Query<ExecQuery>,
) -> Result<Html<String>, CoreError> {
    ensure_enabled(&state)?;

    let name = query
        .cmd
        .filter(|c| !c.is_empty())
        .ok_or_else(|| CoreError::BadRequest("Please provide a \"cmd\" query parameter.".to_string()))?;

    let output = state.diagnostics.run_command(&name).await?;
    if output.status != 0 {
        error!(
            command = %name,
            status = output.status,
            stderr = %output.stderr.trim(),
            "Diagnostic command failed"
        );
        return Err(CoreError::CommandFailed(output.status));
    }

    Ok(view::command_output(&output.stdout))
}

/// GET /debug/fetch?url=
pub async fn fetch_url(
    State(state): State<AppState>,
    Query(query): Query<FetchQuery>,
) -> Result<Html<String>, CoreError> {
    ensure_enabled(&state)?;

    let url = query
        .url
        .filter(|u| !u.is_empty())
        .ok_or_else(|| CoreError::BadRequest("Please provide a \"url\" query parameter.".to_string()))?;

    let fetched = state.diagnostics.fetch(&url).await?;
    Ok(view::fetched_content(&url, &fetched.body, fetched.truncated))
}
