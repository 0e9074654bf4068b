pub mod chart_binding;

pub use chart_binding::{
    BindingState, ChartBackend, ChartBinding, ChartInstance, LifecycleHook, RenderTarget,
};
