//! Simulation context - every service one simulation owns
//!
//! Tasks hold an `Rc<SimContext>` and borrow the pieces they need for the
//! length of a synchronous step. No `RefCell` borrow is ever held across an
//! `.await`.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;

use futures::executor::LocalSpawner;
use futures::future::AbortHandle;
use futures::task::LocalSpawnExt;
use tracing::warn;

use match3_core::{Board, PotentialMove, TileRng, TokenPool};

use crate::barrier::{GroupBarrier, GroupId};
use crate::clock::Clock;
use crate::config::SimConfig;
use crate::presenter::Presenter;
use crate::stats::SimStats;

/// Stage of the current top-level transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Swapping,
    Reverting,
    Resolving,
}

pub(crate) struct SimContext {
    pub config: SimConfig,
    pub clock: Clock,
    pub groups: GroupBarrier,
    spawner: LocalSpawner,
    pub board: RefCell<Board>,
    pub pool: RefCell<Box<dyn TokenPool>>,
    pub presenter: RefCell<Box<dyn Presenter>>,
    pub rng: RefCell<TileRng>,
    pub hint: RefCell<Option<AbortHandle>>,
    pub hint_shown: Cell<bool>,
    pub best_move: RefCell<Option<PotentialMove>>,
    pub stats: RefCell<SimStats>,
    processing: Cell<bool>,
    phase: Cell<Phase>,
}

pub(crate) struct Services {
    pub config: SimConfig,
    pub clock: Clock,
    pub board: Board,
    pub pool: Box<dyn TokenPool>,
    pub presenter: Box<dyn Presenter>,
}

impl SimContext {
    pub fn new(services: Services, spawner: LocalSpawner) -> Self {
        let rng = TileRng::new(services.config.seed);
        Self {
            config: services.config,
            clock: services.clock,
            groups: GroupBarrier::new(),
            spawner,
            board: RefCell::new(services.board),
            pool: RefCell::new(services.pool),
            presenter: RefCell::new(services.presenter),
            rng: RefCell::new(rng),
            hint: RefCell::new(None),
            hint_shown: Cell::new(false),
            best_move: RefCell::new(None),
            stats: RefCell::new(SimStats::default()),
            processing: Cell::new(false),
            phase: Cell::new(Phase::Idle),
        }
    }

    pub fn is_processing(&self) -> bool {
        self.processing.get()
    }

    pub fn phase(&self) -> Phase {
        self.phase.get()
    }

    pub fn set_phase(&self, phase: Phase) {
        self.phase.set(phase);
    }

    pub fn spawn(&self, task: impl Future<Output = ()> + 'static) {
        if let Err(err) = self.spawner.spawn_local(task) {
            warn!(%err, "executor is gone; task dropped");
        }
    }

    /// Spawn `task` as a member of `group`. The membership is counted before
    /// the task first runs and released when it finishes or is dropped.
    pub fn spawn_tracked(&self, group: GroupId, task: impl Future<Output = ()> + 'static) {
        let ticket = self.groups.register(group);
        self.spawn(async move {
            task.await;
            drop(ticket);
        });
    }
}

/// Exclusive right to run one top-level transaction
pub(crate) struct ProcessingGuard {
    ctx: Rc<SimContext>,
}

impl ProcessingGuard {
    pub fn acquire(ctx: &Rc<SimContext>) -> Option<Self> {
        if ctx.processing.replace(true) {
            return None;
        }
        Some(Self { ctx: ctx.clone() })
    }
}

impl Drop for ProcessingGuard {
    fn drop(&mut self) {
        self.ctx.phase.set(Phase::Idle);
        self.ctx.processing.set(false);
    }
}
