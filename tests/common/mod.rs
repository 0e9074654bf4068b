#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use ledger_chart_wasm::application::{ChartBackend, ChartInstance, RenderTarget};
use ledger_chart_wasm::domain::chart::ChartConfig;
use ledger_chart_wasm::domain::errors::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FakeCanvas(pub u32);

/// Host element stand-in: optional canvas, optional attribute.
#[derive(Debug, Clone, Default)]
pub struct FakeHost {
    pub canvas: Option<FakeCanvas>,
    pub attribute: Option<String>,
}

impl FakeHost {
    pub fn with_spec(raw: &str) -> Self {
        Self { canvas: Some(FakeCanvas(1)), attribute: Some(raw.to_string()) }
    }

    pub fn without_canvas(raw: &str) -> Self {
        Self { canvas: None, attribute: Some(raw.to_string()) }
    }

    pub fn without_attribute() -> Self {
        Self { canvas: Some(FakeCanvas(1)), attribute: None }
    }
}

impl RenderTarget for FakeHost {
    type Canvas = FakeCanvas;

    fn canvas(&self) -> Option<FakeCanvas> {
        self.canvas
    }

    fn chart_attribute(&self) -> Option<String> {
        self.attribute.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Constructed { id: usize, datasets: usize },
    Destroyed { id: usize },
}

#[derive(Debug, Default)]
struct JournalState {
    events: Vec<Event>,
    live: usize,
    max_live: usize,
    next_id: usize,
}

/// Shared log of every construct / destroy a backend performed.
#[derive(Debug, Clone, Default)]
pub struct Journal(Rc<RefCell<JournalState>>);

impl Journal {
    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().events.clone()
    }

    pub fn live(&self) -> usize {
        self.0.borrow().live
    }

    pub fn max_live(&self) -> usize {
        self.0.borrow().max_live
    }

    pub fn constructed(&self) -> usize {
        self.count(|e| matches!(e, Event::Constructed { .. }))
    }

    pub fn destroyed(&self) -> usize {
        self.count(|e| matches!(e, Event::Destroyed { .. }))
    }

    fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.0.borrow().events.iter().filter(|e| pred(e)).count()
    }

    fn open(&self, datasets: usize) -> usize {
        let mut state = self.0.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        state.live += 1;
        state.max_live = state.max_live.max(state.live);
        state.events.push(Event::Constructed { id, datasets });
        id
    }

    fn close(&self, id: usize) {
        let mut state = self.0.borrow_mut();
        state.live -= 1;
        state.events.push(Event::Destroyed { id });
    }
}

pub struct RecordingBackend {
    pub journal: Journal,
    /// Zero-based `construct` call that fails with a rendering error.
    pub fail_on_call: Option<usize>,
    calls: usize,
}

impl RecordingBackend {
    pub fn new() -> (Self, Journal) {
        let journal = Journal::default();
        (Self { journal: journal.clone(), fail_on_call: None, calls: 0 }, journal)
    }
}

impl ChartBackend for RecordingBackend {
    type Canvas = FakeCanvas;
    type Instance = RecordingChart;

    fn construct(&mut self, canvas: FakeCanvas, config: ChartConfig) -> ChartResult<RecordingChart> {
        let call = self.calls;
        self.calls += 1;
        if self.fail_on_call == Some(call) {
            return Err(ChartError::Rendering("context lost".to_string()));
        }
        let id = self.journal.open(config.data.datasets.len());
        Ok(RecordingChart { id, canvas, config, journal: self.journal.clone() })
    }
}

pub struct RecordingChart {
    pub id: usize,
    pub canvas: FakeCanvas,
    config: ChartConfig,
    journal: Journal,
}

impl ChartInstance for RecordingChart {
    fn config(&self) -> &ChartConfig {
        &self.config
    }

    fn destroy(self) {
        self.journal.close(self.id);
    }
}

pub const BALANCE_SPEC: &str = r#"{"datasets":[{"label":"Balance","data":[{"x":"2024-01-01","y":100},{"x":"2024-01-02","y":150}]}]}"#;
pub const EMPTY_SPEC: &str = r#"{"datasets":[]}"#;
