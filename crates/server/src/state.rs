use database::services::enrollment::RegistrationRules;
use sea_orm::DatabaseConnection;

/// Shared by every handler; the connection is a pool and cheap to clone
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub rules: RegistrationRules,
}

impl AppState {
    pub fn new(db: DatabaseConnection, rules: RegistrationRules) -> Self {
        Self { db, rules }
    }
}
