//! One-shot push registration command.
//!
//! Runs the full registration flow against the configured endpoint. The
//! terminal has no OS push service, so the flow runs on a
//! [`StaticPushPlatform`] that hands out either the given token or a freshly
//! generated one.
//!
//! # Examples
//!
//! ```bash
//! HOMEGUARD_PROJECT_ID=my-project homeguard register --user-id alice
//! ```

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::config::Config;
use crate::notifications::{
    ConsoleReporter, RegistrationResult, StaticPushPlatform, TokenRegistrar,
};

/// Options for a registration run.
#[derive(Debug, Clone, Default)]
pub struct RegisterOptions {
    /// Overrides the configured user id.
    pub user_id: Option<String>,
    /// Push token to submit instead of a generated one.
    pub token: Option<String>,
    /// Behave like a simulated host (registration fails early).
    pub simulator: bool,
}

/// Register once and print the outcome.
pub async fn run(config: &Config, options: RegisterOptions) -> Result<RegistrationResult> {
    let platform = match options.token {
        Some(token) => StaticPushPlatform::new(token),
        None => StaticPushPlatform::with_generated_token(),
    };
    let simulated = options.simulator || crate::env::Environment::current().is_simulator();
    let platform = Arc::new(platform.physical(!simulated));

    let registrar = TokenRegistrar::from_config(config, platform, Arc::new(ConsoleReporter))?;
    let user_id = options.user_id.unwrap_or_else(|| config.user_id.clone());

    println!("Registering push token at {}...", registrar.endpoint());
    let result = registrar
        .register(&user_id, &config.channel)
        .await
        .context("Push registration failed")?;

    println!("Registered {} for user {}", result.push_token, result.user_id);
    Ok(result)
}
