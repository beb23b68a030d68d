//! HTTP handlers for the web UI

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::analysis::{AnalysisKind, Analyzer};
use crate::auth;
use crate::document;
use crate::report::{download_name, production, standards, summary, XLSX_MIME};
use crate::web::error::AppError;
use crate::web::pages::{self, Tab};
use crate::web::session::{self, Level, Notice};
use crate::web::AppState;

const UPLOAD_FIELD: &str = "script";

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiKeyForm {
    api_key: String,
}

#[derive(Debug, Deserialize)]
pub struct TabQuery {
    tab: Option<String>,
}

/// Session id of a logged-in request.
async fn require_session(state: &AppState, headers: &HeaderMap) -> Result<String, AppError> {
    let id = session::session_id(headers).ok_or(AppError::Unauthorized)?;
    match state.sessions.get(&id).await {
        Some(_) => Ok(id),
        None => Err(AppError::Unauthorized),
    }
}

fn upload_tab() -> Redirect {
    Redirect::to("/?tab=upload")
}

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}

pub async fn login_page(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if require_session(&state, &headers).await.is_ok() {
        return Redirect::to("/").into_response();
    }
    Html(pages::login_page(None)).into_response()
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Response {
    let config = &state.config;
    match auth::login(&form.email, &form.password, &config.authorized_domains, &config.admin_emails) {
        Some(user) => {
            info!("Login: {}", user.email);
            if let Some(previous) = session::session_id(&headers) {
                state.sessions.remove(&previous).await;
            }
            let id = state.sessions.create(user).await;
            ([(header::SET_COOKIE, session::set_cookie(&id))], Redirect::to("/")).into_response()
        }
        None => {
            warn!("Rejected login for {}", form.email.trim());
            (
                StatusCode::UNAUTHORIZED,
                Html(pages::login_page(Some("Access denied. Please use an authorized email address."))),
            )
                .into_response()
        }
    }
}

pub async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if let Some(id) = session::session_id(&headers) {
        state.sessions.remove(&id).await;
    }
    ([(header::SET_COOKIE, session::clear_cookie())], Redirect::to("/login")).into_response()
}

pub async fn set_api_key(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<ApiKeyForm>,
) -> Result<Redirect, AppError> {
    let id = require_session(&state, &headers).await?;
    let key = form.api_key.trim().to_string();

    if key.is_empty() {
        state.sessions.notify(&id, Notice::new(Level::Error, "Please enter an API key")).await;
    } else {
        state.sessions.update(&id, |s| {
            s.api_key = Some(key);
            s.notices.push(Notice::new(Level::Success, "API Key configured!"));
        }).await;
    }
    Ok(Redirect::to("/"))
}

pub async fn clear_api_key(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Redirect, AppError> {
    let id = require_session(&state, &headers).await?;
    state.sessions.update(&id, |s| s.api_key = None).await;
    Ok(Redirect::to("/"))
}

pub async fn index(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<TabQuery>,
) -> Result<Html<String>, AppError> {
    let id = require_session(&state, &headers).await?;
    let (session, notices) = state.sessions.take_for_render(&id).await.ok_or(AppError::Unauthorized)?;

    let tab = match query.tab.as_deref() {
        Some("standards") => Tab::Standards,
        Some("production") => Tab::Production,
        _ => Tab::Upload,
    };
    let config_key = !state.config.deepseek_api_key.trim().is_empty();
    Ok(Html(pages::app_page(&session, &notices, tab, config_key)))
}

async fn read_upload(mut multipart: Multipart) -> Result<Option<(String, Vec<u8>)>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let filename = field.file_name().map(str::to_string).unwrap_or_default();
        if filename.is_empty() {
            return Ok(None);
        }
        let data = field.bytes().await?;
        return Ok(Some((filename, data.to_vec())));
    }
    Ok(None)
}

/// Upload → extract → standards analysis → production analysis → results tab.
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    let id = require_session(&state, &headers).await?;
    let sessions = &state.sessions;

    let (filename, data) = match read_upload(multipart).await {
        Ok(Some(upload)) => upload,
        Ok(None) => {
            sessions.notify(&id, Notice::new(Level::Error, "Please choose a script file")).await;
            return Ok(upload_tab());
        }
        Err(err) => {
            warn!("Unreadable upload: {} ({})", err, err.status());
            let message = format!(
                "Error processing file: the upload could not be read. Files must be under {} MB.",
                state.config.max_upload_mb
            );
            sessions.notify(&id, Notice::new(Level::Error, message)).await;
            return Ok(upload_tab());
        }
    };
    info!("File uploaded: {} ({} bytes)", filename, data.len());

    let api_key = sessions.get(&id).await.and_then(|s| s.api_key);
    let client = match (state.clients)(&state.config, api_key.as_deref()) {
        Ok(client) => client,
        Err(err) => {
            warn!("No chat client: {:#}", err);
            sessions
                .notify(&id, Notice::new(Level::Error, "Please configure your DeepSeek API key in the sidebar"))
                .await;
            return Ok(upload_tab());
        }
    };

    let name = filename.clone();
    let extracted = tokio::task::spawn_blocking(move || document::extract_text(&data, &name))
        .await
        .map_err(anyhow::Error::from)
        .and_then(|result| result.map_err(anyhow::Error::from));

    let text = match extracted {
        Ok(text) => text,
        Err(err) => {
            warn!("Extraction failed for {}: {:#}", filename, err);
            sessions
                .notify(&id, Notice::new(Level::Error, format!("Error processing file: {}", err)))
                .await;
            return Ok(upload_tab());
        }
    };

    if text.trim().is_empty() {
        sessions
            .notify(&id, Notice::new(Level::Error, "No text content found in the file"))
            .await;
        return Ok(upload_tab());
    }

    let analysis = Analyzer::new(&*client, &state.config)
        .run(&filename, &text, &AnalysisKind::ALL)
        .await;

    let stored = sessions
        .update(&id, |s| {
            s.notices.push(Notice::new(
                Level::Info,
                format!("Extracted {} characters from script", analysis.char_count),
            ));
            s.notices.push(Notice::new(Level::Success, "Analysis complete! Check the other tabs for results."));
            s.analysis = Some(analysis);
        })
        .await;

    // logged out while the analysis ran
    if stored.is_none() {
        return Err(AppError::Unauthorized);
    }
    Ok(Redirect::to("/?tab=standards"))
}

/// `attachment` disposition with a header-safe filename.
fn attachment(filename: &str) -> String {
    let safe: String = filename
        .chars()
        .map(|c| if c.is_ascii_graphic() && c != '"' && c != '\\' || c == ' ' { c } else { '_' })
        .collect();
    format!("attachment; filename=\"{}\"", safe)
}

pub async fn download(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(kind): Path<String>,
) -> Result<Response, AppError> {
    let id = require_session(&state, &headers).await?;
    let analysis = state
        .sessions
        .get(&id)
        .await
        .and_then(|s| s.analysis)
        .ok_or_else(|| AppError::NotFound("analysis results".to_string()))?;

    let (bytes, mime, suffix) = match kind.as_str() {
        "standards" => {
            let report = analysis
                .standards
                .result()
                .ok_or_else(|| AppError::NotFound("standards results".to_string()))?;
            (standards::generate(&report.violations)?, XLSX_MIME, standards::FILE_SUFFIX)
        }
        "production" => {
            let breakdown = analysis
                .production
                .result()
                .ok_or_else(|| AppError::NotFound("production results".to_string()))?;
            (production::generate(breakdown)?, XLSX_MIME, production::FILE_SUFFIX)
        }
        "summary" => {
            let text = summary::render(
                &analysis.filename,
                &analysis.standards,
                &analysis.production,
                analysis.analyzed_at,
            );
            (text.into_bytes(), summary::MIME, summary::FILE_SUFFIX)
        }
        other => return Err(AppError::NotFound(format!("report '{}'", other))),
    };

    let name = download_name(&analysis.filename, suffix);
    info!("Download: {}", name);
    Ok((
        [
            (header::CONTENT_TYPE, mime.to_string()),
            (header::CONTENT_DISPOSITION, attachment(&name)),
        ],
        bytes,
    )
        .into_response())
}
