//! Configuration of a query service area.

use serde::{Deserialize, Serialize};

use crate::database::DatabaseOptions;

/// Configuration for one query service area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceOptions {
    /// Name of the area, used for thread names and log fields.
    pub area: String,
    /// Options for every database the area's workers create.
    pub database: DatabaseOptions,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            area: "default".to_string(),
            database: DatabaseOptions::default(),
        }
    }
}

impl ServiceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_area(mut self, area: impl Into<String>) -> Self {
        self.area = area.into();
        self
    }

    #[inline]
    pub fn with_database(mut self, database: DatabaseOptions) -> Self {
        self.database = database;
        self
    }
}
