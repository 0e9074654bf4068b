use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlCanvasElement};

use crate::application::RenderTarget;

pub const DEFAULT_CHART_ATTRIBUTE: &str = "data-chart";

/// Host element in the live DOM: the chart JSON sits in a `data-*`
/// attribute and the canvas is its first `<canvas>` descendant.
#[derive(Debug, Clone)]
pub struct DomRenderTarget {
    element: Element,
    attribute: String,
}

impl DomRenderTarget {
    pub fn new(element: Element) -> Self {
        Self::with_attribute(element, DEFAULT_CHART_ATTRIBUTE)
    }

    pub fn with_attribute(element: Element, attribute: &str) -> Self {
        Self { element, attribute: attribute.to_string() }
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }
}

impl RenderTarget for DomRenderTarget {
    type Canvas = HtmlCanvasElement;

    fn canvas(&self) -> Option<HtmlCanvasElement> {
        self.element
            .query_selector("canvas")
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
    }

    fn chart_attribute(&self) -> Option<String> {
        self.element.get_attribute(&self.attribute)
    }
}
