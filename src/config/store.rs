//! Store configuration for the in-memory catalog and users

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreConfig {
    /// JSON file loaded into the in-memory catalog and users at startup
    pub seed_path: Option<String>,
}
