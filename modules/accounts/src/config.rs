use serde::{Deserialize, Serialize};

/// Configuration for the accounts module (`modules.accounts`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccountsConfig {
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: u32,
    /// bcrypt work factor, 4..=31.
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
    #[serde(default = "default_max_username_length")]
    pub max_username_length: usize,
    #[serde(default = "default_max_description_length")]
    pub max_description_length: usize,
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            session_ttl_hours: default_session_ttl_hours(),
            bcrypt_cost: default_bcrypt_cost(),
            max_username_length: default_max_username_length(),
            max_description_length: default_max_description_length(),
        }
    }
}

fn default_session_ttl_hours() -> u32 {
    72
}

fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

fn default_max_username_length() -> usize {
    64
}

fn default_max_description_length() -> usize {
    1000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_section_uses_defaults() {
        let cfg: AccountsConfig = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(cfg.session_ttl_hours, 72);
        assert_eq!(cfg.bcrypt_cost, 12);
        assert_eq!(cfg.max_username_length, 64);
        assert_eq!(cfg.max_description_length, 1000);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let res = serde_json::from_value::<AccountsConfig>(serde_json::json!({ "ttl": 1 }));
        assert!(res.is_err());
    }
}
