pub use headtrack_config as config;
pub use headtrack_config::{ClickGesture, Settings};
pub use headtrack_core::*;

pub mod replay;
