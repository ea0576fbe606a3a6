use std::collections::HashMap;
use std::sync::Arc;

use adk_rust::prelude::*;
use adk_session::{CreateRequest, GetRequest, SessionService};
use anyhow::{Context, Result};

pub const APP_NAME: &str = "enrich-cli";
pub const USER_ID: &str = "local-user";

pub async fn ensure_session_exists(
    session_service: &Arc<dyn SessionService>,
    session_id: &str,
) -> Result<()> {
    let session = session_service
        .get(GetRequest {
            app_name: APP_NAME.to_string(),
            user_id: USER_ID.to_string(),
            session_id: session_id.to_string(),
            num_recent_events: None,
            after: None,
        })
        .await;

    if session.is_ok() {
        return Ok(());
    }

    session_service
        .create(CreateRequest {
            app_name: APP_NAME.to_string(),
            user_id: USER_ID.to_string(),
            session_id: Some(session_id.to_string()),
            state: HashMap::new(),
        })
        .await
        .with_context(|| format!("failed to create session '{session_id}'"))?;

    Ok(())
}

/// Builds the ADK runner for one enrichment run. Sessions are in-memory and
/// single-use; nothing about a run persists.
pub async fn build_runner(agent: Arc<dyn Agent>, session_id: &str) -> Result<Runner> {
    let session_service: Arc<dyn SessionService> = Arc::new(InMemorySessionService::new());
    build_runner_with_session_service(agent, session_id, session_service).await
}

pub async fn build_runner_with_session_service(
    agent: Arc<dyn Agent>,
    session_id: &str,
    session_service: Arc<dyn SessionService>,
) -> Result<Runner> {
    ensure_session_exists(&session_service, session_id).await?;
    let artifact_service = Arc::new(InMemoryArtifactService::new());

    Runner::new(RunnerConfig {
        app_name: APP_NAME.to_string(),
        agent,
        session_service,
        artifact_service: Some(artifact_service),
        memory_service: None,
        plugin_manager: None,
        run_config: None,
        compaction_config: None,
        context_cache_config: None,
        cache_capable: None,
        request_context: None,
        cancellation_token: None,
    })
    .context("failed to build ADK runner")
}
