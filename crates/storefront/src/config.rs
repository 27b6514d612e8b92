//! CLI configuration: thin wrapper around `storefront_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--backend-url, --timeout, --session).

use std::sync::Arc;

use clap::ValueEnum;

use storefront_config::{Config, SessionBackend};
use storefront_core::{SessionStorage, StorefrontConfig};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat, SessionMode};
use crate::error::CliError;

pub use storefront_config::{config_path, init_config, load_config};

/// Everything a storefront-bound command needs to start.
pub struct Resolved {
    pub profile_name: String,
    pub storefront: StorefrontConfig,
    pub storage: Arc<dyn SessionStorage>,
}

/// Fill unset output/color flags from the config file's `[defaults]`.
pub fn apply_defaults(global: &mut GlobalOpts, cfg: &Config) {
    if global.output.is_none() {
        global.output = OutputFormat::from_str(&cfg.defaults.output, true).ok();
    }
    if global.color.is_none() {
        global.color = ColorMode::from_str(&cfg.defaults.color, true).ok();
    }
}

/// Pick the profile and apply flag overrides on top of it.
///
/// Flag > env > profile > built-in default.
pub fn resolve(global: &GlobalOpts, cfg: &Config) -> Result<Resolved, CliError> {
    let (profile_name, mut profile) = cfg.resolve_profile(global.profile.as_deref())?;

    if let Some(ref url) = global.backend_url {
        profile.backend_url.clone_from(url);
    }
    if let Some(secs) = global.timeout {
        profile.timeout_secs = Some(secs);
    }
    if let Some(mode) = global.session {
        profile.session_backend = match mode {
            SessionMode::File => SessionBackend::File,
            SessionMode::Keyring => SessionBackend::Keyring,
            SessionMode::Memory => SessionBackend::Memory,
        };
    }

    let storefront = storefront_config::profile_to_storefront_config(&profile, &cfg.defaults)?;
    let storage = storefront_config::open_session_storage(profile.session_backend, &profile_name);
    tracing::debug!(
        profile = %profile_name,
        backend = %storefront.base_url,
        session = %profile.session_backend,
        "resolved configuration"
    );

    Ok(Resolved {
        profile_name,
        storefront,
        storage,
    })
}
