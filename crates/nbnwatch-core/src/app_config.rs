use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub log_level: String,
    pub providers_path: PathBuf,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub fetch_timeout_secs: u64,
    pub fetch_forbidden_retries: u32,
    pub fetch_backoff_base_ms: u64,
    pub updater_batch_size: i64,
    pub updater_max_concurrent: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &"[redacted]")
            .field("log_level", &self.log_level)
            .field("providers_path", &self.providers_path)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("fetch_forbidden_retries", &self.fetch_forbidden_retries)
            .field("fetch_backoff_base_ms", &self.fetch_backoff_base_ms)
            .field("updater_batch_size", &self.updater_batch_size)
            .field("updater_max_concurrent", &self.updater_max_concurrent)
            .finish()
    }
}
