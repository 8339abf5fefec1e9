use std::sync::Arc;

use crate::config::Config;
use crate::generation::{DocumentSettings, Toolkit};
use crate::styles::StyleManager;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub settings: DocumentSettings,
    /// Browser and LLM factory. Default: ChromeToolkit.
    pub toolkit: Arc<dyn Toolkit>,
}

impl AppState {
    /// Display names of the styles currently on disk.
    pub fn style_names(&self) -> Vec<String> {
        StyleManager::new(&self.settings.styles_dir)
            .get_styles()
            .into_keys()
            .collect()
    }
}
