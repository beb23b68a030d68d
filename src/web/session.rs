//! Per-browser state, keyed by a cookie and kept in memory only.

use std::collections::HashMap;

use axum::http::{header, HeaderMap};
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::analysis::ScriptAnalysis;
use crate::auth::User;

pub const COOKIE_NAME: &str = "scriptreview_session";
pub const DEFAULT_IDLE_MINUTES: i64 = 720;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: Level,
    pub message: String,
}

impl Notice {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self { level, message: message.into() }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub api_key: Option<String>,
    pub analysis: Option<ScriptAnalysis>,
    /// Shown once on the next page render.
    pub notices: Vec<Notice>,
    pub last_seen: DateTime<Utc>,
}

impl Session {
    pub fn new(user: User) -> Self {
        Self { user, api_key: None, analysis: None, notices: Vec::new(), last_seen: Utc::now() }
    }
}

/// Sessions idle for longer than `idle` are dropped.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    idle: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Duration::minutes(DEFAULT_IDLE_MINUTES))
    }
}

impl SessionStore {
    pub fn new(idle: Duration) -> Self {
        Self { sessions: RwLock::new(HashMap::new()), idle }
    }

    pub async fn create(&self, user: User) -> String {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;

        let before = sessions.len();
        sessions.retain(|_, s| now - s.last_seen < self.idle);
        if sessions.len() < before {
            tracing::debug!("evicted {} idle sessions", before - sessions.len());
        }

        sessions.insert(id.clone(), Session::new(user));
        id
    }

    pub async fn get(&self, id: &str) -> Option<Session> {
        self.update(id, |s| s.clone()).await
    }

    pub async fn remove(&self, id: &str) {
        self.sessions.write().await.remove(id);
    }

    /// Applies `f` to a live session and marks it as seen. Returns `None` when
    /// the session does not exist or has gone idle.
    pub async fn update<R>(&self, id: &str, f: impl FnOnce(&mut Session) -> R) -> Option<R> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        if sessions.get(id).is_some_and(|s| now - s.last_seen >= self.idle) {
            sessions.remove(id);
            return None;
        }
        sessions.get_mut(id).map(|s| {
            s.last_seen = now;
            f(s)
        })
    }

    pub async fn notify(&self, id: &str, notice: Notice) {
        self.update(id, |s| s.notices.push(notice)).await;
    }

    /// The session with its pending notices, which are cleared.
    pub async fn take_for_render(&self, id: &str) -> Option<(Session, Vec<Notice>)> {
        self.update(id, |s| {
            let notices = std::mem::take(&mut s.notices);
            (s.clone(), notices)
        })
        .await
    }
}

/// Value of the session cookie in a request, if any.
pub fn session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key == COOKIE_NAME && !value.is_empty()).then(|| value.to_string())
        })
        .next()
}

pub fn set_cookie(id: &str) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", COOKIE_NAME, id)
}

pub fn clear_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", COOKIE_NAME)
}
