use serde::{Deserialize, Serialize};

/// Configuration for the plant_care module (`modules.plant_care`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlantCareConfig {
    #[serde(default = "default_plants_per_page")]
    pub plants_per_page: usize,
    /// Relative paths resolve against the server home dir.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    #[serde(default = "default_catalog_search_limit")]
    pub catalog_search_limit: u64,
    #[serde(default = "default_max_label_length")]
    pub max_label_length: usize,
}

impl Default for PlantCareConfig {
    fn default() -> Self {
        Self {
            plants_per_page: default_plants_per_page(),
            upload_dir: default_upload_dir(),
            allowed_extensions: default_allowed_extensions(),
            max_upload_bytes: default_max_upload_bytes(),
            catalog_search_limit: default_catalog_search_limit(),
            max_label_length: default_max_label_length(),
        }
    }
}

fn default_plants_per_page() -> usize {
    3
}

fn default_upload_dir() -> String {
    "uploads".to_string()
}

fn default_allowed_extensions() -> Vec<String> {
    ["png", "jpg", "jpeg", "gif"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_max_upload_bytes() -> usize {
    16 * 1024 * 1024
}

fn default_catalog_search_limit() -> u64 {
    50
}

fn default_max_label_length() -> usize {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_section_keeps_defaults() {
        let cfg: PlantCareConfig =
            serde_json::from_value(serde_json::json!({ "plants_per_page": 10 })).unwrap();
        assert_eq!(cfg.plants_per_page, 10);
        assert_eq!(cfg.upload_dir, "uploads");
        assert_eq!(cfg.max_upload_bytes, 16 * 1024 * 1024);
        assert_eq!(cfg.allowed_extensions, vec!["png", "jpg", "jpeg", "gif"]);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(serde_json::from_value::<PlantCareConfig>(serde_json::json!({ "nope": 1 })).is_err());
    }
}
