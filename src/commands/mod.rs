//! CLI subcommand implementations for homeguard.
//!
//! - [`keypad`] - replay keypad presses against a security panel
//! - [`register`] - run one push registration against the configured endpoint
//!
//! # Usage
//!
//! ```ignore
//! use homeguard::commands;
//!
//! commands::keypad::run("1234#")?;
//! commands::register::run(&config, RegisterOptions::default()).await?;
//! ```

pub mod keypad;
pub mod register;

#[doc(inline)]
pub use register::RegisterOptions;
