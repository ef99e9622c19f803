//! Config schema - Configuration for insitu

use serde::{Deserialize, Serialize};

/// Record-store backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Single JSON document under the data directory
    #[default]
    Json,
    /// Process-local, discarded on exit
    Memory,
}

/// Row limits applied when loading the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchLimits {
    #[serde(default = "default_delivery_limit")]
    pub deliveries: usize,

    #[serde(default = "default_request_limit")]
    pub requests: usize,

    #[serde(default = "default_notification_limit")]
    pub notifications: usize,
}

fn default_delivery_limit() -> usize {
    50
}

fn default_request_limit() -> usize {
    20
}

fn default_notification_limit() -> usize {
    50
}

impl Default for FetchLimits {
    fn default() -> Self {
        FetchLimits {
            deliveries: 50,
            requests: 20,
            notifications: 50,
        }
    }
}

/// Constraints on request reference images
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePolicy {
    /// Largest accepted payload in bytes
    #[serde(default = "default_max_image_bytes")]
    pub max_bytes: usize,

    /// Accepted MIME types
    #[serde(default = "default_allowed_image_types")]
    pub allowed_types: Vec<String>,
}

fn default_max_image_bytes() -> usize {
    5 * 1024 * 1024
}

fn default_allowed_image_types() -> Vec<String> {
    vec![
        "image/jpeg".to_string(),
        "image/png".to_string(),
        "image/gif".to_string(),
        "image/webp".to_string(),
    ]
}

impl Default for ImagePolicy {
    fn default() -> Self {
        ImagePolicy {
            max_bytes: default_max_image_bytes(),
            allowed_types: default_allowed_image_types(),
        }
    }
}

/// Main configuration for insitu
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Schema version for forward compatibility
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Record-store backend
    #[serde(default)]
    pub store: StoreBackend,

    /// File name of the JSON store inside the data directory
    #[serde(default = "default_store_file")]
    pub store_file: String,

    /// Directory (inside the data directory) holding uploaded objects
    #[serde(default = "default_objects_dir")]
    pub objects_dir: String,

    /// Prefix of the public URLs returned for uploaded objects
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,

    /// Reference image constraints
    #[serde(default)]
    pub images: ImagePolicy,

    /// Dashboard fetch limits
    #[serde(default)]
    pub limits: FetchLimits,
}

fn default_schema_version() -> u32 {
    1
}

fn default_store_file() -> String {
    "records.json".to_string()
}

fn default_objects_dir() -> String {
    "objects".to_string()
}

fn default_public_base_url() -> String {
    "file://objects".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            schema_version: 1,
            store: StoreBackend::Json,
            store_file: default_store_file(),
            objects_dir: default_objects_dir(),
            public_base_url: default_public_base_url(),
            images: ImagePolicy::default(),
            limits: FetchLimits::default(),
        }
    }
}
