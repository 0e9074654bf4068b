use derive_more::Display;

/// Failures a chart render pass can surface to the host.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ChartError {
    /// The chart attribute was present but not a valid chart specification.
    #[display(fmt = "Decode Error: {}", _0)]
    Decode(String),
    /// The backend could not build a chart on the canvas.
    #[display(fmt = "Rendering Error: {}", _0)]
    Rendering(String),
}

impl std::error::Error for ChartError {}

impl From<serde_json::Error> for ChartError {
    fn from(err: serde_json::Error) -> Self {
        ChartError::Decode(err.to_string())
    }
}

impl From<ChartError> for wasm_bindgen::JsValue {
    fn from(err: ChartError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

pub type ChartResult<T> = Result<T, ChartError>;
