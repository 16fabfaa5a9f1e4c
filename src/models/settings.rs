use serde::{Deserialize, Serialize};

/// Global platform branding, fetched once and cached client-side
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformSettings {
    #[serde(default = "default_platform_name")]
    pub platform_name: String,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default = "default_primary_color")]
    pub primary_color: String,
    #[serde(default = "default_secondary_color")]
    pub secondary_color: String,
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            platform_name: default_platform_name(),
            logo_url: None,
            primary_color: default_primary_color(),
            secondary_color: default_secondary_color(),
        }
    }
}

fn default_platform_name() -> String {
    "Competia".to_string()
}

fn default_primary_color() -> String {
    "#1f3a5f".to_string()
}

fn default_secondary_color() -> String {
    "#4a6fa5".to_string()
}
