mod controls;
mod driver;
mod render;

use std::{convert::TryFrom, rc::Rc};

use life_common::{Game, GameConfig, Layout, RunState};
use tracing::{debug, error, info};
use wasm_bindgen::prelude::*;

use crate::{driver::Shared, render::CanvasSurface};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Render(#[from] render::Error),
    #[error(transparent)]
    Common(#[from] life_common::Error),
    #[error("missing {0}")]
    MissingElement(&'static str),
    #[error("invalid config: {0}")]
    Config(String),
}

impl From<Error> for JsValue {
    fn from(error: Error) -> Self {
        JsValue::from_str(&error.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), wasm_bindgen::JsValue> {
    use tracing_subscriber::layer::SubscriberExt;
    console_error_panic_hook::set_once();
    let filter = tracing_subscriber::EnvFilter::try_new("debug")
        .map_err(|error| JsValue::from_str(&error.to_string()))?;
    tracing::subscriber::set_global_default(
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer())
            .with(filter)
            .with(tracing_wasm::WASMLayer::new(
                tracing_wasm::WASMLayerConfig::default(),
            )),
    )
    .map_err(|error| JsValue::from_str(&error.to_string()))?;
    debug!("starting");
    Ok(())
}

/// Handle returned to the page. The game keeps running for as long as the
/// handle is alive; the zero-argument methods mirror the page's buttons.
#[wasm_bindgen]
pub struct GameHandle {
    driver: Shared,
}

#[wasm_bindgen]
impl GameHandle {
    pub fn start(&self) {
        driver::start(&self.driver);
    }

    pub fn pause(&self) {
        self.driver.borrow_mut().pause();
    }

    pub fn reset(&self) {
        self.driver.borrow_mut().reset();
    }

    /// Cancels the tick loop and unbinds the page controls.
    pub fn stop(&self) {
        self.driver.borrow_mut().stop();
    }

    pub fn generation(&self) -> u32 {
        self.driver.borrow().game().generation().0
    }

    pub fn is_running(&self) -> bool {
        self.driver.borrow().game().run_state() == RunState::Running
    }
}

#[wasm_bindgen]
pub fn start(
    canvas: web_sys::HtmlCanvasElement,
    config: JsValue,
) -> Result<GameHandle, JsValue> {
    start_internal(canvas, config).map_err(|error| {
        error!(%error, "failed to start game");
        JsValue::from(error)
    })
}

pub fn start_internal(
    canvas: web_sys::HtmlCanvasElement,
    config: JsValue,
) -> Result<GameHandle, Error> {
    let config = if config.is_undefined() || config.is_null() {
        GameConfig::default()
    } else {
        config
            .into_serde::<GameConfig>()
            .map_err(|error| Error::Config(error.to_string()))?
    };
    config.validate()?;

    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or(Error::MissingElement("document"))?;

    debug!("creating surface");
    let surface = CanvasSurface::new(canvas)?;
    let layout = Layout::of(&surface, config.cell_size);
    info!(
        width = layout.surface_width,
        height = layout.surface_height,
        rows = layout.rows,
        cols = layout.cols,
        "canvas layout"
    );
    controls::write_layout(&document, &layout);

    let game = Game::new(&config, layout.rows, layout.cols)?;
    let period_ms = u32::try_from(config.tick_period_ms)
        .map_err(|_| Error::Config("tick period does not fit a browser timer".to_string()))?;
    let driver = driver::Driver::new(game, surface, period_ms);

    wasm_bindgen_futures::spawn_local(driver::run_intro(
        Rc::downgrade(&driver),
        document,
        config.intro,
    ));

    Ok(GameHandle { driver })
}
