//! headtrack-config: settings for the head-tracked cursor engine
//!
//! Settings are plain serde structs persisted as TOML. Every field carries a
//! default, so partially written files load cleanly and unknown values are
//! rejected by [`Settings::validate`] rather than at use sites.

pub mod error;
pub mod options;
pub mod settings;

pub use error::{ConfigError, Result};
pub use options::{BlinkSensitivityOption, ClickGesture, DwellTimeOption};
pub use settings::{Settings, CONFIG_ENV_VAR, DEFAULT_MINIMUM_ELEMENT_SIZE};
