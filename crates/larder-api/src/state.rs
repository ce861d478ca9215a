//! Application state shared across all handlers.

use std::sync::Arc;

use larder_auth::SessionManager;
use larder_cache::CacheManager;
use larder_core::config::AppConfig;
use larder_database::DatabasePool;
use larder_service::{AccountService, AdminAccountService, GroupService};

/// Passed to every handler via `State<AppState>`.
/// All fields are cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Session store backend (Redis or in-memory).
    pub cache: Arc<CacheManager>,
    /// Postgres pool; `None` under the in-memory database profile.
    pub database: Option<DatabasePool>,

    // ── Auth ─────────────────────────────────────────────────
    pub session_manager: Arc<SessionManager>,

    // ── Services ─────────────────────────────────────────────
    pub account_service: Arc<AccountService>,
    pub admin_account_service: Arc<AdminAccountService>,
    pub group_service: Arc<GroupService>,
}
