use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::{
    application::{BindingState, ChartBinding, LifecycleHook},
    domain::logging::LogComponent,
    infrastructure::{
        dom::{DEFAULT_CHART_ATTRIBUTE, DomRenderTarget},
        rendering::CanvasChartBackend,
    },
    log_error,
};

/// JS-facing lifecycle hook. A page-level hook object forwards its
/// `mounted` / `updated` callbacks here with its root element:
///
/// ```js
/// const hook = new ChartHook();
/// hook.mounted(this.el);   // first attach
/// hook.updated(this.el);   // every later update
/// hook.free();             // on teardown
/// ```
#[wasm_bindgen]
pub struct ChartHook {
    binding: ChartBinding<CanvasChartBackend>,
    attribute: String,
}

#[wasm_bindgen]
impl ChartHook {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::with_attribute(DEFAULT_CHART_ATTRIBUTE.to_string())
    }

    /// Read the chart JSON from a different attribute than `data-chart`.
    #[wasm_bindgen(js_name = withAttribute)]
    pub fn with_attribute(attribute: String) -> Self {
        Self {
            binding: ChartBinding::new(CanvasChartBackend::new()),
            attribute,
        }
    }

    pub fn mounted(&mut self, el: Element) -> Result<(), JsValue> {
        let target = self.target(el);
        self.binding.on_attach(&target).map_err(|e| self.report(e))
    }

    pub fn updated(&mut self, el: Element) -> Result<(), JsValue> {
        let target = self.target(el);
        self.binding.on_update(&target).map_err(|e| self.report(e))
    }

    #[wasm_bindgen(js_name = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.binding.state() == BindingState::Mounted
    }

    #[wasm_bindgen(js_name = renderCount)]
    pub fn render_count(&self) -> f64 {
        self.binding.render_count() as f64
    }

    #[wasm_bindgen(getter)]
    pub fn attribute(&self) -> String {
        self.attribute.clone()
    }
}

impl ChartHook {
    fn target(&self, el: Element) -> DomRenderTarget {
        DomRenderTarget::with_attribute(el, &self.attribute)
    }

    fn report(&self, err: crate::domain::errors::ChartError) -> JsValue {
        log_error!(LogComponent::Presentation("ChartHook"), "{}", err);
        err.into()
    }
}

impl Default for ChartHook {
    fn default() -> Self {
        Self::new()
    }
}
