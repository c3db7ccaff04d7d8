use gloo_events::EventListener;
use life_common::Layout;
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlButtonElement};

const BUTTONS_CLASSNAME: &str = "game__button";
const START_CLASSNAME: &str = "game-button--start";
const PAUSE_CLASSNAME: &str = "game-button--pause";
const RESET_CLASSNAME: &str = "game-button--reset";

const LOG_CANVAS_SIZE_ID: &str = "conway-game-life__log-output__canvas--sizes";
const LOG_CELL_SIZE_ID: &str = "conway-game-life__log-output__matrix--cell-size";
const LOG_MATRIX_SIZE_ID: &str = "conway-game-life__log-output__matrix--size";

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Control {
    Start,
    Pause,
    Reset,
}

impl Control {
    fn classname(self) -> &'static str {
        match self {
            Control::Start => START_CLASSNAME,
            Control::Pause => PAUSE_CLASSNAME,
            Control::Reset => RESET_CLASSNAME,
        }
    }
}

fn elements_by_class(document: &Document, classname: &str) -> Vec<Element> {
    let collection = document.get_elements_by_class_name(classname);
    (0..collection.length())
        .filter_map(|index| collection.item(index))
        .collect()
}

pub fn set_buttons_disabled(document: &Document, disabled: bool) {
    let buttons = elements_by_class(document, BUTTONS_CLASSNAME);
    if buttons.is_empty() {
        warn!("missing game control buttons");
        return;
    }
    debug!(disabled, count = buttons.len(), "toggling control buttons");
    for button in buttons {
        if let Some(button) = button.dyn_ref::<HtmlButtonElement>() {
            button.set_disabled(disabled);
        }
    }
}

/// Calls `handler` whenever any button for `control` is clicked. The
/// returned listeners unbind on drop.
pub fn bind<F>(document: &Document, control: Control, handler: F) -> Vec<EventListener>
where
    F: Fn(Control) + Clone + 'static,
{
    let buttons = elements_by_class(document, control.classname());
    if buttons.is_empty() {
        warn!(?control, "missing game control button");
        return Vec::new();
    }
    debug!(?control, count = buttons.len(), "binding control");
    buttons
        .iter()
        .map(|button| {
            let handler = handler.clone();
            EventListener::new(button, "click", move |_event| handler(control))
        })
        .collect()
}

/// Fills the optional on-page log output with the grid layout.
pub fn write_layout(document: &Document, layout: &Layout) {
    let text = layout.to_string();
    let ids = [LOG_CANVAS_SIZE_ID, LOG_CELL_SIZE_ID, LOG_MATRIX_SIZE_ID];
    for (&id, line) in ids.iter().zip(text.lines()) {
        match document.get_element_by_id(id) {
            Some(element) => element.set_text_content(Some(line)),
            None => warn!(id, "missing log output element"),
        }
    }
}
