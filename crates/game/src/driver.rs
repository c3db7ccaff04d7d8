use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use gloo_events::EventListener;
use gloo_timers::{callback::Interval, future::TimeoutFuture};
use life_common::{intro, Game};
use tracing::{debug, trace};
use web_sys::Document;

use crate::{
    controls::{self, Control},
    render::CanvasSurface,
};

pub type Shared = Rc<RefCell<Driver>>;

/// Owns the game and everything that keeps it running in the page.
pub struct Driver {
    game: Game,
    surface: CanvasSurface,
    period_ms: u32,
    ticker: Option<Interval>,
    listeners: Vec<EventListener>,
}

impl Driver {
    /// The game's controls stay locked until `run_intro` finishes.
    pub fn new(mut game: Game, surface: CanvasSurface, period_ms: u32) -> Shared {
        game.lock_controls();
        Rc::new(RefCell::new(Self {
            game,
            surface,
            period_ms,
            ticker: None,
            listeners: Vec::new(),
        }))
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    fn tick(&mut self) {
        let Self { game, surface, .. } = self;
        if game.tick(surface) {
            trace!(generation = game.generation().0, "tick");
        }
    }

    pub fn reset(&mut self) {
        let Self { game, surface, .. } = self;
        game.reset(surface);
    }

    pub fn pause(&mut self) {
        self.game.pause();
    }

    /// Cancels the periodic tick and unbinds the controls.
    pub fn stop(&mut self) {
        debug!("stopping driver");
        self.ticker = None;
        self.listeners.clear();
    }

    fn apply_intro(&mut self, step: intro::IntroStep) {
        let Self { game, surface, .. } = self;
        game.apply_intro(step, surface);
    }
}

/// Starts (or resumes) the game, scheduling the periodic tick on the first
/// start only.
pub fn start(shared: &Shared) {
    let mut driver = shared.borrow_mut();
    if !driver.game.start() {
        return;
    }
    let period_ms = driver.period_ms;
    debug!(period_ms, "starting tick loop");
    let weak = Rc::downgrade(shared);
    driver.ticker = Some(Interval::new(period_ms, move || {
        if let Some(shared) = weak.upgrade() {
            shared.borrow_mut().tick();
        }
    }));
}

fn handle(weak: &Weak<RefCell<Driver>>, control: Control) {
    let shared = match weak.upgrade() {
        Some(shared) => shared,
        None => return,
    };
    debug!(?control, "control clicked");
    match control {
        Control::Start => start(&shared),
        Control::Pause => shared.borrow_mut().pause(),
        Control::Reset => shared.borrow_mut().reset(),
    };
}

/// Plays the intro with controls disabled, then hands the game to the user.
pub async fn run_intro(weak: Weak<RefCell<Driver>>, document: Document, animate: bool) {
    controls::set_buttons_disabled(&document, true);

    if animate {
        for (delay, step) in intro::schedule() {
            TimeoutFuture::new(delay.as_millis() as u32).await;
            match weak.upgrade() {
                Some(shared) => shared.borrow_mut().apply_intro(step),
                None => return,
            }
        }
    } else if let Some(shared) = weak.upgrade() {
        let mut driver = shared.borrow_mut();
        for step in intro::immediate() {
            driver.apply_intro(step);
        }
    }

    let shared = match weak.upgrade() {
        Some(shared) => shared,
        None => return,
    };
    shared.borrow_mut().game.unlock_controls();
    controls::set_buttons_disabled(&document, false);
    let listeners = [Control::Start, Control::Pause, Control::Reset]
        .iter()
        .flat_map(|&control| {
            let weak = weak.clone();
            controls::bind(&document, control, move |control| handle(&weak, control))
        })
        .collect::<Vec<_>>();
    shared.borrow_mut().listeners = listeners;
    debug!("waiting for user to press any button");
}
