use life_common::render::{Rect, Surface};
use tracing::debug;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not initialize: {0}")]
    Initialization(String),
    #[error("js api error")]
    Js(JsValue),
}

pub type Result<T> = std::result::Result<T, Error>;

/// A [`Surface`] backed by a canvas 2d context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        debug!("creating 2d context");
        let context = canvas
            .get_context("2d")
            .map_err(Error::Js)?
            .ok_or_else(|| Error::Initialization("2d context not available".to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| Error::Initialization("context is not a 2d context".to_string()))?;
        Ok(Self { canvas, context })
    }
}

impl Surface for CanvasSurface {
    fn width(&self) -> u32 {
        self.canvas.width()
    }

    fn height(&self) -> u32 {
        self.canvas.height()
    }

    fn set_fill_color(&mut self, color: &str) {
        self.context.set_fill_style(&JsValue::from_str(color));
    }

    fn set_stroke_color(&mut self, color: &str) {
        self.context.set_stroke_style(&JsValue::from_str(color));
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.context
            .fill_rect(rect.x, rect.y, rect.width, rect.height);
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.context
            .clear_rect(rect.x, rect.y, rect.width, rect.height);
    }

    fn stroke_rect(&mut self, rect: Rect) {
        self.context
            .stroke_rect(rect.x, rect.y, rect.width, rect.height);
    }
}
