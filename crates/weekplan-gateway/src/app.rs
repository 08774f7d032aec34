use axum::{
    routing::{get, post},
    Router,
};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use weekplan_core::config::WeekplanConfig;
use weekplan_schedules::ScheduleManager;
use weekplan_users::UserDirectory;

/// Central shared state — passed as Arc<AppState> to all Axum handlers.
pub struct AppState {
    pub config: WeekplanConfig,
    /// Email → user read-through cache; the only path handlers use to find a user.
    pub users: UserDirectory,
    pub schedules: ScheduleManager,
}

impl AppState {
    pub fn new(config: WeekplanConfig, users: UserDirectory, schedules: ScheduleManager) -> Self {
        Self {
            config,
            users,
            schedules,
        }
    }

    /// Build both subsystems over one shared store connection.
    pub fn with_store(config: WeekplanConfig, db: Arc<Mutex<Connection>>) -> Self {
        let users = UserDirectory::new(Arc::clone(&db));
        let schedules = ScheduleManager::new(db);
        Self::new(config, users, schedules)
    }
}

/// Assemble the full Axum router.
pub fn build_router(state: Arc<AppState>) -> Router {
    use crate::http::{checkin, health, schedule};

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/checkin", post(checkin::checkin_handler))
        .route(
            "/schedule",
            get(schedule::list_schedules)
                .post(schedule::add_schedule)
                .patch(schedule::edit_schedule)
                .delete(schedule::delete_schedule),
        )
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}
