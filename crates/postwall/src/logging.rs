//! 🍞 Render logging — one breadcrumb per render, prefixed with whatever the config says.
//!
//! A plain decorator: wrap the render function, log `"{props_message} {component_name}"`,
//! call it, hand back its result.

use tracing::info;

use crate::app_config::LoggingConfig;

/// 🍞 Log that `component_name` is rendering, then render it.
pub fn with_logging<R>(props_message: &str, component_name: &str, render: impl FnOnce() -> R) -> R {
    info!("{} {}", props_message, component_name);
    render()
}

/// 🍞 Holds the configured prefix so pages don't have to pass it around by hand.
#[derive(Debug, Clone)]
pub struct RenderLogger {
    props_message: String,
}

impl Default for RenderLogger {
    fn default() -> Self {
        Self::from_config(&LoggingConfig::default())
    }
}

impl RenderLogger {
    pub fn from_config(config: &LoggingConfig) -> Self {
        Self {
            props_message: config.props_message.clone(),
        }
    }

    pub fn props_message(&self) -> &str {
        &self.props_message
    }

    pub fn render<R>(&self, component_name: &str, render: impl FnOnce() -> R) -> R {
        with_logging(&self.props_message, component_name, render)
    }
}
