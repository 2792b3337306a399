//! Simulation - top-level context the host drives
//!
//! The host owns a [`Simulation`], feeds it input events and calls
//! [`Simulation::tick`] once per fixed timestep. Every service (board, token
//! pool, presenter, random source, clock) is owned here and handed to tasks by
//! reference, so independent simulations never share state.

use std::cell::Ref;
use std::rc::Rc;

use futures::executor::LocalPool;
use tracing::{debug, info, warn};

use match3_core::{
    fill_vacancies, place_edge_obstacles, Board, BoardSnapshot, PotentialMove, RecyclingPool,
    TokenPool,
};
use match3_types::{Color, InputEvent, Position, TokenKind};

use crate::availability::{cancel_hint, check_availability};
use crate::clock::Clock;
use crate::config::{ObstacleLayout, SimConfig};
use crate::context::{Phase, ProcessingGuard, Services, SimContext};
use crate::error::{InputError, SimError};
use crate::powerup::begin_touch;
use crate::presenter::{InstantPresenter, Presenter};
use crate::stats::SimStats;
use crate::swap::begin_swap;

/// Assembles a [`Simulation`] from its services
pub struct SimulationBuilder {
    config: SimConfig,
    clock: Clock,
    presenter: Option<Box<dyn Presenter>>,
    pool: Option<Box<dyn TokenPool>>,
    layout: Option<(Vec<String>, i32)>,
}

impl SimulationBuilder {
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            clock: Clock::new(),
            presenter: None,
            pool: None,
            layout: None,
        }
    }

    /// Clock the simulation will run on. Timed presenters share it.
    pub fn clock(&self) -> Clock {
        self.clock.clone()
    }

    pub fn presenter(mut self, presenter: impl Presenter + 'static) -> Self {
        self.presenter = Some(Box::new(presenter));
        self
    }

    pub fn pool(mut self, pool: impl TokenPool + 'static) -> Self {
        self.pool = Some(Box::new(pool));
        self
    }

    /// Start from glyph rows (top first) instead of an empty board.
    ///
    /// The layout's size overrides the configured dimensions.
    pub fn layout(mut self, rows: &[&str], play_height: i32) -> Self {
        let rows = rows.iter().map(|row| row.to_string()).collect();
        self.layout = Some((rows, play_height));
        self
    }

    pub fn build(self) -> Result<Simulation, SimError> {
        self.config.validate()?;
        let mut pool = self
            .pool
            .unwrap_or_else(|| Box::new(RecyclingPool::new()));
        let mut presenter = self
            .presenter
            .unwrap_or_else(|| Box::new(InstantPresenter));

        let board = match &self.layout {
            Some((rows, play_height)) => {
                let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
                Board::from_layout(&rows, *play_height, &mut *pool)?
            }
            None => Board::new(
                self.config.width,
                self.config.play_height,
                self.config.spawn_rows,
            )?,
        };
        for (pos, token) in board.tokens() {
            presenter.place_token(token.id(), token.kind(), pos);
        }

        let executor = LocalPool::new();
        let services = Services {
            config: self.config,
            clock: self.clock,
            board,
            pool,
            presenter,
        };
        let ctx = Rc::new(SimContext::new(services, executor.spawner()));
        Ok(Simulation { executor, ctx })
    }
}

/// One independent tile-matching simulation
pub struct Simulation {
    executor: LocalPool,
    ctx: Rc<SimContext>,
}

impl Simulation {
    /// Empty board with default services
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        SimulationBuilder::new(config).build()
    }

    pub fn builder(config: SimConfig) -> SimulationBuilder {
        SimulationBuilder::new(config)
    }

    /// Place obstacles, fill every empty cell in place and run the first
    /// availability check.
    pub fn populate(&mut self) -> Result<(), InputError> {
        let guard = ProcessingGuard::acquire(&self.ctx).ok_or(InputError::Busy)?;
        let ctx = &self.ctx;
        let report = {
            let mut board = ctx.board.borrow_mut();
            let mut pool = ctx.pool.borrow_mut();
            if let ObstacleLayout::EdgeColumns { kind, health } = ctx.config.obstacles {
                let placed = place_edge_obstacles(&mut board, &mut **pool, kind, health);
                debug!(placed, ?kind, "obstacles placed");
            }
            let mut rng = ctx.rng.borrow_mut();
            fill_vacancies(&mut board, &mut **pool, &mut rng, ctx.config.colors)
        };
        {
            let board = ctx.board.borrow();
            let mut presenter = ctx.presenter.borrow_mut();
            for (pos, token) in board.tokens() {
                presenter.place_token(token.id(), token.kind(), pos);
            }
        }
        info!(
            width = ctx.config.width,
            play_height = ctx.config.play_height,
            filled = report.spawned.len(),
            seed = ctx.config.seed,
            "board populated"
        );

        let task_ctx = ctx.clone();
        ctx.spawn(async move {
            let _guard = guard;
            check_availability(&task_ctx).await;
        });
        self.executor.run_until_stalled();
        Ok(())
    }

    /// Request a swap of two adjacent cells
    pub fn handle_swap(&mut self, from: Position, to: Position) -> Result<(), InputError> {
        let accepted = begin_swap(&self.ctx, from, to);
        if let Err(err) = &accepted {
            debug!(%from, %to, %err, "swap rejected");
        }
        self.executor.run_until_stalled();
        accepted
    }

    /// Request activation of the powerup at `pos`
    pub fn handle_touch(&mut self, pos: Position) -> Result<(), InputError> {
        let accepted = begin_touch(&self.ctx, pos);
        if let Err(err) = &accepted {
            debug!(%pos, %err, "touch rejected");
        }
        self.executor.run_until_stalled();
        accepted
    }

    pub fn handle_input(&mut self, event: InputEvent) -> Result<(), InputError> {
        match event {
            InputEvent::Swap { from, to } => self.handle_swap(from, to),
            InputEvent::Touch(pos) => self.handle_touch(pos),
        }
    }

    /// Cycle an idle normal token to the next color. Debugging aid.
    pub fn recolor(&mut self, pos: Position) -> Result<Color, InputError> {
        if self.ctx.is_processing() {
            return Err(InputError::Busy);
        }
        let (id, kind) = {
            let mut board = self.ctx.board.borrow_mut();
            if !board.is_within_bounds(pos) {
                return Err(InputError::OutOfBounds(pos));
            }
            let token = board.token_mut(pos).ok_or(InputError::Empty(pos))?;
            let color = token.color().ok_or(InputError::NotNormal(pos))?;
            if !token.is_idle() {
                return Err(InputError::TokenBusy(pos));
            }
            token.set_kind(TokenKind::Normal(color.next(self.ctx.config.colors)));
            (token.id(), token.kind())
        };
        self.ctx.presenter.borrow_mut().refresh_token(id, kind);
        kind.color().ok_or(InputError::NotNormal(pos))
    }

    /// Advance the clock by one tick and run every task that became ready
    pub fn tick(&mut self) {
        self.ctx.clock.advance(1);
        self.executor.run_until_stalled();
    }

    pub fn advance(&mut self, ticks: u32) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    pub fn run_until_stalled(&mut self) {
        self.executor.run_until_stalled();
    }

    /// Tick until the current transaction finishes.
    ///
    /// Returns `false` if it is still running after `max_ticks`.
    pub fn settle(&mut self, max_ticks: u32) -> bool {
        self.executor.run_until_stalled();
        for _ in 0..max_ticks {
            if !self.ctx.is_processing() {
                return true;
            }
            self.tick();
        }
        !self.ctx.is_processing()
    }

    pub fn is_processing(&self) -> bool {
        self.ctx.is_processing()
    }

    pub fn phase(&self) -> Phase {
        self.ctx.phase()
    }

    pub fn board(&self) -> Ref<'_, Board> {
        self.ctx.board.borrow()
    }

    /// Top-ranked move from the last availability check
    pub fn best_move(&self) -> Option<PotentialMove> {
        self.ctx.best_move.borrow().clone()
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        self.ctx.board.borrow().snapshot()
    }

    pub fn stats(&self) -> SimStats {
        *self.ctx.stats.borrow()
    }

    pub fn clock(&self) -> &Clock {
        &self.ctx.clock
    }

    pub fn config(&self) -> &SimConfig {
        &self.ctx.config
    }

    /// Cancel the hint and return every token to the pool.
    ///
    /// Refused while a transaction is running.
    pub fn teardown(&mut self) -> Result<usize, InputError> {
        if self.ctx.is_processing() {
            warn!("teardown requested during a transaction");
            return Err(InputError::Busy);
        }
        cancel_hint(&self.ctx);
        self.executor.run_until_stalled();
        let tokens = self.ctx.board.borrow_mut().drain();
        let released = tokens.len();
        let mut pool = self.ctx.pool.borrow_mut();
        for token in tokens {
            pool.release(token);
        }
        *self.ctx.best_move.borrow_mut() = None;
        debug!(released, "simulation torn down");
        Ok(released)
    }
}
