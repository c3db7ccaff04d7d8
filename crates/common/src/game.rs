use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, trace};

use crate::{
    config::{GameConfig, Repaint},
    intro::IntroStep,
    render::{Painter, Surface},
    world::{Generation, Grid},
    Error, Result,
};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RunState {
    Unstarted,
    Running,
    Paused,
}

/// Everything a driver needs to run one game: the current generation, the
/// run state toggled by the controls, and how to paint it.
#[derive(Debug)]
pub struct Game {
    grid: Grid,
    run_state: RunState,
    generation: Generation,
    painter: Painter,
    alive_probability: f64,
    repaint: Repaint,
    rng: StdRng,
    controls_locked: bool,
}

impl Game {
    pub fn new(config: &GameConfig, rows: usize, cols: usize) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rows, cols, rng)
    }

    pub fn with_rng(config: &GameConfig, rows: usize, cols: usize, rng: StdRng) -> Result<Self> {
        config.validate()?;
        let grid = Grid::new(rows, cols)?;
        debug!(rows, cols, "created game");
        Ok(Self {
            grid,
            run_state: RunState::Unstarted,
            generation: Generation::zero(),
            painter: config.painter(),
            alive_probability: config.alive_probability,
            repaint: config.repaint,
            rng,
            controls_locked: false,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn painter(&self) -> &Painter {
        &self.painter
    }

    pub fn controls_locked(&self) -> bool {
        self.controls_locked
    }

    /// While locked, `start`, `pause` and `reset` are ignored. Drivers lock
    /// the controls for the length of the intro.
    pub fn lock_controls(&mut self) {
        debug!("controls locked");
        self.controls_locked = true;
    }

    pub fn unlock_controls(&mut self) {
        debug!("controls unlocked");
        self.controls_locked = false;
    }

    /// Moves to `Running`. Returns true only for the first start, which is
    /// when the driver should begin its periodic tick.
    pub fn start(&mut self) -> bool {
        if self.controls_locked {
            debug!("start ignored, controls are locked");
            return false;
        }
        let first = self.run_state == RunState::Unstarted;
        debug!(from = ?self.run_state, "start");
        self.run_state = RunState::Running;
        first
    }

    /// Toggles between `Running` and `Paused`; ignored before the first start.
    pub fn pause(&mut self) {
        if self.controls_locked {
            debug!("pause ignored, controls are locked");
            return;
        }
        self.run_state = match self.run_state {
            RunState::Running => RunState::Paused,
            RunState::Paused => RunState::Running,
            RunState::Unstarted => {
                debug!("pause ignored, game has not started");
                RunState::Unstarted
            }
        };
        debug!(state = ?self.run_state, "pause toggled");
    }

    /// Replaces the grid with a fresh random population. The run state is
    /// left alone.
    pub fn reset<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        if self.controls_locked {
            debug!("reset ignored, controls are locked");
            return;
        }
        debug!("reset");
        self.grid.clear_all();
        self.grid.randomize(&mut self.rng, self.alive_probability);
        self.painter.render_full(surface, &self.grid);
    }

    /// Replaces the grid with `grid`, which must have the same dimensions.
    pub fn load<S: Surface + ?Sized>(&mut self, grid: Grid, surface: &mut S) -> Result<()> {
        if (grid.rows(), grid.cols()) != (self.grid.rows(), self.grid.cols()) {
            return Err(Error::DimensionMismatch {
                expected_rows: self.grid.rows(),
                expected_cols: self.grid.cols(),
                rows: grid.rows(),
                cols: grid.cols(),
            });
        }
        debug!(population = grid.population(), "loaded grid");
        self.grid = grid;
        self.painter.render_full(surface, &self.grid);
        Ok(())
    }

    /// Advances one generation if running.
    pub fn tick<S: Surface + ?Sized>(&mut self, surface: &mut S) -> bool {
        if self.run_state != RunState::Running {
            trace!(state = ?self.run_state, "tick skipped");
            return false;
        }
        self.step(surface);
        true
    }

    /// Advances one generation regardless of the run state.
    pub fn step<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        let next = self.grid.advance();
        match self.repaint {
            Repaint::Full => self.painter.render_full(surface, &next),
            Repaint::Changed => self.painter.render_changes(surface, &self.grid, &next),
        }
        self.grid = next;
        self.generation.increment_self();
        trace!(
            generation = self.generation.0,
            population = self.grid.population(),
            "advanced"
        );
    }

    pub fn apply_intro<S: Surface + ?Sized>(&mut self, step: IntroStep, surface: &mut S) {
        debug!(?step, "intro");
        match step {
            IntroStep::DrawGrid => {
                self.painter
                    .draw_grid_lines(surface, self.grid.rows(), self.grid.cols());
            }
            IntroStep::FillAll => {
                self.grid.fill_all();
                self.painter.render_full(surface, &self.grid);
            }
            IntroStep::ClearAll => {
                self.grid.clear_all();
                self.painter.render_full(surface, &self.grid);
            }
            IntroStep::Populate => {
                self.grid.randomize(&mut self.rng, self.alive_probability);
                self.painter.render_full(surface, &self.grid);
            }
            IntroStep::Advance => self.step(surface),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{intro, render::testing::RecordingSurface, Cell};

    fn game(rows: usize, cols: usize) -> Game {
        let config = GameConfig::default();
        Game::with_rng(&config, rows, cols, StdRng::seed_from_u64(5)).unwrap()
    }

    #[test]
    fn rejects_empty_grid_and_bad_config() {
        assert!(Game::new(&GameConfig::default(), 0, 3).is_err());
        let config = GameConfig {
            cell_size: 1,
            ..GameConfig::default()
        };
        assert!(Game::new(&config, 3, 3).is_err());
    }

    #[test]
    fn start_reports_first_transition_only() {
        let mut game = game(3, 3);
        assert_eq!(game.run_state(), RunState::Unstarted);
        assert!(game.start());
        assert_eq!(game.run_state(), RunState::Running);
        assert!(!game.start());
        game.pause();
        assert!(!game.start());
        assert_eq!(game.run_state(), RunState::Running);
    }

    #[test]
    fn pause_toggles_after_start() {
        let mut game = game(3, 3);
        game.pause();
        assert_eq!(game.run_state(), RunState::Unstarted);
        game.start();
        game.pause();
        assert_eq!(game.run_state(), RunState::Paused);
        game.pause();
        assert_eq!(game.run_state(), RunState::Running);
    }

    #[test]
    fn locked_controls_are_ignored() {
        let mut game = game(4, 4);
        let mut surface = RecordingSurface::new(80, 80);
        game.lock_controls();
        assert!(!game.start());
        game.pause();
        game.reset(&mut surface);
        assert_eq!(game.run_state(), RunState::Unstarted);
        assert!(surface.calls.is_empty());

        for (_, step) in intro::schedule() {
            game.apply_intro(step, &mut surface);
        }
        assert_eq!(game.generation(), Generation(1));

        game.unlock_controls();
        assert!(!game.controls_locked());
        assert!(game.start());
        assert_eq!(game.run_state(), RunState::Running);
    }

    #[test]
    fn tick_only_advances_while_running() {
        let mut game = game(5, 5);
        let mut surface = RecordingSurface::new(100, 100);
        game.grid = Grid::from_rows(&[".....", ".....", ".###.", ".....", "....."]).unwrap();

        assert!(!game.tick(&mut surface));
        assert!(surface.calls.is_empty());

        game.start();
        assert!(game.tick(&mut surface));
        assert_eq!(game.generation(), Generation(1));
        assert_eq!(game.grid().get(1, 2), Cell::Alive);
        assert_eq!(surface.fills().len(), 3);
        assert_eq!(surface.clears().len(), 22);

        game.pause();
        assert!(!game.tick(&mut surface));
        assert_eq!(game.generation(), Generation(1));
    }

    #[test]
    fn changed_repaint_only_touches_flips() {
        let config = GameConfig {
            repaint: Repaint::Changed,
            ..GameConfig::default()
        };
        let mut game = Game::with_rng(&config, 5, 5, StdRng::seed_from_u64(0)).unwrap();
        game.grid = Grid::from_rows(&[".....", ".....", ".###.", ".....", "....."]).unwrap();
        let mut surface = RecordingSurface::new(100, 100);
        game.step(&mut surface);
        assert_eq!(surface.fills().len(), 2);
        assert_eq!(surface.clears().len(), 2);
    }

    #[test]
    fn reset_repopulates_without_touching_run_state() {
        let mut game = game(6, 6);
        let mut surface = RecordingSurface::new(120, 120);
        game.start();
        game.pause();
        game.reset(&mut surface);
        assert_eq!(game.run_state(), RunState::Paused);
        assert_eq!(surface.fills().len() + surface.clears().len(), 36);
        assert_eq!(surface.fills().len(), game.grid().population());
    }

    #[test]
    fn intro_leaves_a_populated_grid_one_generation_in() {
        let mut game = game(4, 5);
        let mut surface = RecordingSurface::new(100, 80);
        for (_, step) in intro::schedule() {
            game.apply_intro(step, &mut surface);
            if step == IntroStep::FillAll {
                assert_eq!(game.grid().population(), 20);
            }
            if step == IntroStep::ClearAll {
                assert_eq!(game.grid().population(), 0);
            }
        }
        assert_eq!(surface.strokes().len(), 20);
        assert_eq!(game.generation(), Generation(1));
        assert_eq!(game.run_state(), RunState::Unstarted);
    }

    #[test]
    fn load_requires_matching_dimensions() {
        let mut game = game(3, 3);
        let mut surface = RecordingSurface::new(60, 60);
        let wide = Grid::from_rows(&["#..#"]).unwrap();
        assert!(matches!(
            game.load(wide, &mut surface),
            Err(Error::DimensionMismatch { rows: 1, cols: 4, .. })
        ));
        assert!(surface.calls.is_empty());

        let glider = Grid::from_rows(&[".#.", "..#", "###"]).unwrap();
        game.load(glider.clone(), &mut surface).unwrap();
        assert_eq!(game.grid(), &glider);
        assert_eq!(surface.fills().len(), 5);
    }

    #[test]
    fn seeded_games_are_reproducible() {
        let config = GameConfig {
            seed: Some(99),
            ..GameConfig::default()
        };
        let mut a = Game::new(&config, 8, 8).unwrap();
        let mut b = Game::new(&config, 8, 8).unwrap();
        let mut surface = RecordingSurface::new(160, 160);
        for step in intro::immediate() {
            a.apply_intro(step, &mut surface);
            b.apply_intro(step, &mut surface);
        }
        assert_eq!(a.grid(), b.grid());
    }
}
