// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for Yolchi.
//!
//! TOML files merged through Figment with `YOLCHI_*` environment overrides,
//! strict key checking and miette diagnostics.
//!
//! ```no_run
//! let config = yolchi_config::load_and_validate().expect("config errors");
//! println!("corridor: {} <-> {}", config.campaign.region_id, config.campaign.city_id);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::YolchiConfig;

/// Load configuration from the standard hierarchy and validate it.
pub fn load_and_validate() -> Result<YolchiConfig, Vec<ConfigError>> {
    finish(loader::load_config())
}

/// Load an explicit file (plus env overrides) and validate it.
pub fn load_and_validate_path(path: &std::path::Path) -> Result<YolchiConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_path(path))
}

/// Load an inline TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<YolchiConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content))
}

#[allow(clippy::result_large_err)]
fn finish(
    loaded: Result<YolchiConfig, figment::Error>,
) -> Result<YolchiConfig, Vec<ConfigError>> {
    let config = loaded.map_err(diagnostic::figment_to_config_errors)?;
    validation::validate_config(&config)?;
    Ok(config)
}
