#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub path: String,
    pub max_connections: u32,
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "volleyball_stats.db".to_string()),
            max_connections: 8,
            busy_timeout_ms: 5000,
        }
    }
}

impl DatabaseSettings {
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }
}

#[derive(Debug, Clone)]
pub struct QuerySettings {
    /// Performances listed when the caller gives no `amount`
    pub default_list_amount: usize,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            default_list_amount: 100,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseSettings,
    pub query: QuerySettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            database: DatabaseSettings::default(),
            query: QuerySettings::default(),
        }
    }
}
