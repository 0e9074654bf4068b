use leptos::html::Div;
use leptos::*;
use std::cell::RefCell;
use std::rc::Rc;

use crate::{
    application::{ChartBinding, LifecycleHook},
    domain::logging::LogComponent,
    infrastructure::{
        dom::{DEFAULT_CHART_ATTRIBUTE, DomRenderTarget},
        rendering::CanvasChartBackend,
    },
    log_error, log_warn,
};

/// 📈 Credits & debits chart driven by a JSON specification signal.
///
/// The first effect run with a mounted host attaches the chart; every later
/// change of `spec` updates it.
#[component]
pub fn ChartPanel(
    #[prop(into)] spec: MaybeSignal<String>,
    #[prop(optional, into)] class: Option<String>,
) -> impl IntoView {
    let host_ref = create_node_ref::<Div>();
    // Dropped with the effect when the panel unmounts, which destroys the chart.
    let binding = Rc::new(RefCell::new(ChartBinding::new(CanvasChartBackend::new())));

    create_effect(move |attached: Option<bool>| {
        let raw = spec.get();
        let attached = attached.unwrap_or(false);
        let Some(host) = host_ref.get() else {
            return attached;
        };

        let element: &web_sys::Element = &host;
        if element.set_attribute(DEFAULT_CHART_ATTRIBUTE, &raw).is_err() {
            log_warn!(LogComponent::Presentation("ChartPanel"), "could not set {} on host", DEFAULT_CHART_ATTRIBUTE);
        }
        let target = DomRenderTarget::new(element.clone());

        let mut binding = binding.borrow_mut();
        let result = if attached {
            binding.on_update(&target)
        } else {
            binding.on_attach(&target)
        };
        if let Err(e) = result {
            log_error!(LogComponent::Presentation("ChartPanel"), "{}", e);
        }
        true
    });

    view! {
        <div class=class.unwrap_or_else(|| "chart-panel".to_string()) node_ref=host_ref>
            <canvas width="800" height="400"></canvas>
        </div>
    }
}
