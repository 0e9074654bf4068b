use wasm_bindgen::prelude::*;

use crate::domain::logging::LogComponent;
use crate::infrastructure::services::{ConsoleLogger, install_browser_services};

pub mod app;
pub mod application;
pub mod domain;
pub mod event_utils;
pub mod infrastructure;
pub mod presentation;

pub use app::ChartPanel;
pub use application::{BindingState, ChartBackend, ChartBinding, ChartInstance, LifecycleHook, RenderTarget};
pub use presentation::ChartHook;

/// Install the panic hook and browser logging when the module loads.
#[wasm_bindgen(start)]
pub fn initialize() {
    console_error_panic_hook::set_once();

    let logger = if cfg!(debug_assertions) {
        ConsoleLogger::new_development()
    } else {
        ConsoleLogger::new_production()
    };
    install_browser_services(logger);

    log_info!(LogComponent::Presentation("Initialize"), "📈 chart hook ready");
}
