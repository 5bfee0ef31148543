use derivative::Derivative;
use log::*;
use scoreboard_common::config::ViewConfig;
use scoreboard_layout::RenderEnvironment;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Derivative, Serialize, Deserialize)]
#[derivative(Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    /// File to read the feed from, stdin when unset
    pub feed: Option<PathBuf>,
    /// See `RenderEnvironment` for the accepted names
    #[derivative(Default(value = "RenderEnvironment::default().to_string()"))]
    pub render_env: String,
    pub view: ViewConfig,
}

impl AppConfig {
    pub fn render_environment(&self) -> RenderEnvironment {
        self.render_env.parse().unwrap_or_else(|e| {
            warn!("{e}, using {}", RenderEnvironment::default());
            RenderEnvironment::default()
        })
    }
}
