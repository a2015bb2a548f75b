use sea_orm::DatabaseConnection;

/// Shared router state; the pool is cheap to clone.
#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
}
