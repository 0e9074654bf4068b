use crate::domain::{
    chart::{ChartConfig, ChartSpecification},
    errors::ChartResult,
    logging::LogComponent,
};
use crate::{log_debug, log_info};

/// Host element a binding renders into.
pub trait RenderTarget {
    type Canvas;

    /// The canvas sub-element, if the host currently has one.
    fn canvas(&self) -> Option<Self::Canvas>;

    /// Raw JSON chart specification, if the attribute is set.
    fn chart_attribute(&self) -> Option<String>;
}

/// Seam to the charting library: build a chart on a canvas.
pub trait ChartBackend {
    type Canvas;
    type Instance: ChartInstance;

    fn construct(&mut self, canvas: Self::Canvas, config: ChartConfig) -> ChartResult<Self::Instance>;
}

/// A live chart owning its drawing resources until destroyed.
pub trait ChartInstance {
    fn config(&self) -> &ChartConfig;

    /// Release the canvas context, listeners and timers held by this chart.
    fn destroy(self);
}

/// Framework lifecycle callbacks the binding reacts to.
pub trait LifecycleHook<T> {
    fn on_attach(&mut self, element: &T) -> ChartResult<()>;
    fn on_update(&mut self, element: &T) -> ChartResult<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingState {
    Unmounted,
    Mounted,
}

/// Keeps at most one live chart per host element and rebuilds it on every
/// lifecycle trigger.
pub struct ChartBinding<B: ChartBackend> {
    backend: B,
    instance: Option<B::Instance>,
    renders: u64,
}

impl<B: ChartBackend> ChartBinding<B> {
    pub fn new(backend: B) -> Self {
        Self { backend, instance: None, renders: 0 }
    }

    pub fn state(&self) -> BindingState {
        if self.instance.is_some() {
            BindingState::Mounted
        } else {
            BindingState::Unmounted
        }
    }

    pub fn instance(&self) -> Option<&B::Instance> {
        self.instance.as_ref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Successful render passes so far.
    pub fn render_count(&self) -> u64 {
        self.renders
    }

    /// Read, decode and redraw.
    ///
    /// A missing canvas or a missing attribute is a no-op. The specification
    /// is decoded before the current chart is touched, so a decode failure
    /// leaves the previous chart live.
    pub fn render<T>(&mut self, target: &T) -> ChartResult<()>
    where
        T: RenderTarget<Canvas = B::Canvas>,
    {
        let Some(canvas) = target.canvas() else {
            log_debug!(LogComponent::Application("ChartBinding"), "no canvas in host element, skipping");
            return Ok(());
        };
        let Some(raw) = target.chart_attribute() else {
            log_debug!(LogComponent::Application("ChartBinding"), "no chart attribute, skipping");
            return Ok(());
        };

        let spec = ChartSpecification::decode(&raw)?;

        if let Some(previous) = self.instance.take() {
            previous.destroy();
        }

        let datasets = spec.datasets.len();
        let points = spec.point_count();
        let instance = self.backend.construct(canvas, ChartConfig::line(spec))?;
        self.instance = Some(instance);
        self.renders += 1;

        log_info!(
            LogComponent::Application("ChartBinding"),
            "render #{}: {} datasets, {} points",
            self.renders,
            datasets,
            points
        );
        Ok(())
    }
}

impl<B, T> LifecycleHook<T> for ChartBinding<B>
where
    B: ChartBackend,
    T: RenderTarget<Canvas = B::Canvas>,
{
    fn on_attach(&mut self, element: &T) -> ChartResult<()> {
        self.render(element)
    }

    fn on_update(&mut self, element: &T) -> ChartResult<()> {
        self.render(element)
    }
}

impl<B: ChartBackend> Drop for ChartBinding<B> {
    fn drop(&mut self) {
        if let Some(instance) = self.instance.take() {
            instance.destroy();
        }
    }
}
