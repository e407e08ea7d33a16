// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Lookup order: `/etc/yolchi/yolchi.toml`, then `~/.config/yolchi/yolchi.toml`,
//! then `./yolchi.toml`, then `YOLCHI_*` environment variables.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::YolchiConfig;

/// Sections recognised in environment variable names.
const ENV_SECTIONS: &[&str] = &[
    "app", "storage", "gateway", "campaign", "sources", "budget", "reasons",
];

/// Candidate config files, lowest precedence first.
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/etc/yolchi/yolchi.toml")];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("yolchi/yolchi.toml"));
    }
    paths.push(PathBuf::from("yolchi.toml"));
    paths
}

/// Build the merged Figment without extracting it.
pub fn build_figment() -> Figment {
    let mut figment = Figment::new().merge(Serialized::defaults(YolchiConfig::default()));
    for path in config_paths() {
        figment = figment.merge(Toml::file(path));
    }
    figment.merge(env_provider())
}

/// Load configuration from the standard hierarchy.
pub fn load_config() -> Result<YolchiConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from one explicit file plus environment overrides.
pub fn load_config_from_path(path: &Path) -> Result<YolchiConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(YolchiConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Load configuration from an inline TOML string over the defaults.
pub fn load_config_from_str(toml_content: &str) -> Result<YolchiConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(YolchiConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// `YOLCHI_<SECTION>_<KEY>` maps to `<section>.<key>`.
///
/// Only the first underscore after a known section is turned into a dot,
/// so `YOLCHI_STORAGE_DATABASE_PATH` becomes `storage.database_path`.
fn env_provider() -> Env {
    Env::prefixed("YOLCHI_").map(|key| map_env_key(key.as_str()).into())
}

fn map_env_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    for section in ENV_SECTIONS {
        let prefix = format!("{section}_");
        if let Some(rest) = key.strip_prefix(&prefix) {
            return format!("{section}.{rest}");
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_split_on_section_only() {
        assert_eq!(map_env_key("storage_database_path"), "storage.database_path");
        assert_eq!(map_env_key("campaign_utc_offset_hours"), "campaign.utc_offset_hours");
        assert_eq!(map_env_key("unknown_key"), "unknown_key");
    }

    #[test]
    fn env_keys_arrive_in_upper_case() {
        assert_eq!(map_env_key("GATEWAY_PORT"), "gateway.port");
        assert_eq!(map_env_key("Storage_Wal_Mode"), "storage.wal_mode");
    }

    #[test]
    fn local_file_has_highest_file_precedence() {
        let paths = config_paths();
        assert_eq!(paths.first(), Some(&PathBuf::from("/etc/yolchi/yolchi.toml")));
        assert_eq!(paths.last(), Some(&PathBuf::from("yolchi.toml")));
    }
}
