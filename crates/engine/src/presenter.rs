//! Presentation adapter contract
//!
//! The engine never inspects visuals. It tells a [`Presenter`] what happened
//! and, where the flow has to wait for an animation, awaits the returned
//! [`Completion`].

use std::cell::RefCell;
use std::rc::Rc;

use futures::future::{self, FutureExt, LocalBoxFuture};

use match3_types::{Color, Position, PowerupKind, TokenId, TokenKind};

use crate::clock::Clock;

/// Signal that an animation or effect has finished
pub type Completion = LocalBoxFuture<'static, ()>;

/// Extra data handed to powerup effects
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectParams {
    pub targets: Vec<Position>,
    /// Bomb half-size
    pub radius: i32,
    /// Color picked by a disco ball
    pub color: Option<Color>,
}

/// Visual side of the simulation
pub trait Presenter {
    /// A token appeared at `at` (initial fill or refill staging)
    fn place_token(&mut self, id: TokenId, kind: TokenKind, at: Position);

    /// The token's kind changed in place (promotion, damage, recolor)
    fn refresh_token(&mut self, id: TokenId, kind: TokenKind);

    /// Put a token at `at` without animating
    fn snap_to(&mut self, id: TokenId, at: Position);

    fn animate_move(&mut self, id: TokenId, to: Position) -> Completion;

    /// Both tokens travel to each other's cell
    fn animate_swap_attempt(
        &mut self,
        first: TokenId,
        first_to: Position,
        second: TokenId,
        second_to: Position,
    ) -> Completion;

    /// The token at `at` is being destroyed
    fn play_resolve_effect(&mut self, id: TokenId, at: Position) -> Completion;

    fn play_powerup_effect(
        &mut self,
        kind: PowerupKind,
        at: Position,
        params: &EffectParams,
    ) -> Completion;

    fn indicate_hint(&mut self, tokens: &[Position]);

    fn cancel_hint(&mut self);
}

fn ready() -> Completion {
    future::ready(()).boxed_local()
}

/// Headless presenter; every completion is ready immediately
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantPresenter;

impl Presenter for InstantPresenter {
    fn place_token(&mut self, _id: TokenId, _kind: TokenKind, _at: Position) {}

    fn refresh_token(&mut self, _id: TokenId, _kind: TokenKind) {}

    fn snap_to(&mut self, _id: TokenId, _at: Position) {}

    fn animate_move(&mut self, _id: TokenId, _to: Position) -> Completion {
        ready()
    }

    fn animate_swap_attempt(
        &mut self,
        _first: TokenId,
        _first_to: Position,
        _second: TokenId,
        _second_to: Position,
    ) -> Completion {
        ready()
    }

    fn play_resolve_effect(&mut self, _id: TokenId, _at: Position) -> Completion {
        ready()
    }

    fn play_powerup_effect(
        &mut self,
        _kind: PowerupKind,
        _at: Position,
        _params: &EffectParams,
    ) -> Completion {
        ready()
    }

    fn indicate_hint(&mut self, _tokens: &[Position]) {}

    fn cancel_hint(&mut self) {}
}

/// Completions fire after fixed tick counts on a shared [`Clock`]
#[derive(Debug, Clone)]
pub struct TimedPresenter {
    clock: Clock,
    move_ticks: u32,
    swap_ticks: u32,
    resolve_ticks: u32,
    powerup_ticks: u32,
}

impl TimedPresenter {
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            move_ticks: 12,
            swap_ticks: 12,
            resolve_ticks: 18,
            powerup_ticks: 24,
        }
    }

    pub fn with_move_ticks(mut self, ticks: u32) -> Self {
        self.move_ticks = ticks;
        self
    }

    pub fn with_swap_ticks(mut self, ticks: u32) -> Self {
        self.swap_ticks = ticks;
        self
    }

    pub fn with_resolve_ticks(mut self, ticks: u32) -> Self {
        self.resolve_ticks = ticks;
        self
    }

    pub fn with_powerup_ticks(mut self, ticks: u32) -> Self {
        self.powerup_ticks = ticks;
        self
    }

    fn after(&self, ticks: u32) -> Completion {
        self.clock.sleep(ticks).boxed_local()
    }
}

impl Presenter for TimedPresenter {
    fn place_token(&mut self, _id: TokenId, _kind: TokenKind, _at: Position) {}

    fn refresh_token(&mut self, _id: TokenId, _kind: TokenKind) {}

    fn snap_to(&mut self, _id: TokenId, _at: Position) {}

    fn animate_move(&mut self, _id: TokenId, _to: Position) -> Completion {
        self.after(self.move_ticks)
    }

    fn animate_swap_attempt(
        &mut self,
        _first: TokenId,
        _first_to: Position,
        _second: TokenId,
        _second_to: Position,
    ) -> Completion {
        self.after(self.swap_ticks)
    }

    fn play_resolve_effect(&mut self, _id: TokenId, _at: Position) -> Completion {
        self.after(self.resolve_ticks)
    }

    fn play_powerup_effect(
        &mut self,
        _kind: PowerupKind,
        _at: Position,
        _params: &EffectParams,
    ) -> Completion {
        self.after(self.powerup_ticks)
    }

    fn indicate_hint(&mut self, _tokens: &[Position]) {}

    fn cancel_hint(&mut self) {}
}

/// One call observed by a [`RecordingPresenter`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentationEvent {
    Placed { id: TokenId, kind: TokenKind, at: Position },
    Refreshed { id: TokenId, kind: TokenKind },
    Snapped { id: TokenId, at: Position },
    Moved { id: TokenId, to: Position },
    SwapAttempt { first: TokenId, second: TokenId },
    Resolved { id: TokenId, at: Position },
    PowerupEffect { kind: PowerupKind, at: Position, targets: usize },
    HintShown(Vec<Position>),
    HintCancelled,
}

/// Shared handle to the events recorded so far
pub type EventLog = Rc<RefCell<Vec<PresentationEvent>>>;

/// Wraps another presenter and logs every call
#[derive(Debug, Clone)]
pub struct RecordingPresenter<P> {
    inner: P,
    log: EventLog,
}

impl<P: Presenter> RecordingPresenter<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            log: EventLog::default(),
        }
    }

    /// Handle that stays valid after the presenter is moved into a simulation
    pub fn log(&self) -> EventLog {
        self.log.clone()
    }

    fn record(&self, event: PresentationEvent) {
        self.log.borrow_mut().push(event);
    }
}

impl<P: Presenter> Presenter for RecordingPresenter<P> {
    fn place_token(&mut self, id: TokenId, kind: TokenKind, at: Position) {
        self.record(PresentationEvent::Placed { id, kind, at });
        self.inner.place_token(id, kind, at);
    }

    fn refresh_token(&mut self, id: TokenId, kind: TokenKind) {
        self.record(PresentationEvent::Refreshed { id, kind });
        self.inner.refresh_token(id, kind);
    }

    fn snap_to(&mut self, id: TokenId, at: Position) {
        self.record(PresentationEvent::Snapped { id, at });
        self.inner.snap_to(id, at);
    }

    fn animate_move(&mut self, id: TokenId, to: Position) -> Completion {
        self.record(PresentationEvent::Moved { id, to });
        self.inner.animate_move(id, to)
    }

    fn animate_swap_attempt(
        &mut self,
        first: TokenId,
        first_to: Position,
        second: TokenId,
        second_to: Position,
    ) -> Completion {
        self.record(PresentationEvent::SwapAttempt { first, second });
        self.inner
            .animate_swap_attempt(first, first_to, second, second_to)
    }

    fn play_resolve_effect(&mut self, id: TokenId, at: Position) -> Completion {
        self.record(PresentationEvent::Resolved { id, at });
        self.inner.play_resolve_effect(id, at)
    }

    fn play_powerup_effect(
        &mut self,
        kind: PowerupKind,
        at: Position,
        params: &EffectParams,
    ) -> Completion {
        self.record(PresentationEvent::PowerupEffect {
            kind,
            at,
            targets: params.targets.len(),
        });
        self.inner.play_powerup_effect(kind, at, params)
    }

    fn indicate_hint(&mut self, tokens: &[Position]) {
        self.record(PresentationEvent::HintShown(tokens.to_vec()));
        self.inner.indicate_hint(tokens);
    }

    fn cancel_hint(&mut self) {
        self.record(PresentationEvent::HintCancelled);
        self.inner.cancel_hint();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::LocalPool;
    use futures::task::LocalSpawnExt;
    use std::cell::Cell;

    #[test]
    fn test_instant_presenter_completes_immediately() {
        let mut presenter = InstantPresenter;
        let mut pool = LocalPool::new();
        pool.run_until(presenter.animate_move(TokenId(0), Position::new(0, 0)));
    }

    #[test]
    fn test_timed_presenter_waits_on_clock() {
        let clock = Clock::new();
        let mut presenter = TimedPresenter::new(clock.clone()).with_move_ticks(2);
        let done = Rc::new(Cell::new(false));
        let flag = done.clone();
        let arrival = presenter.animate_move(TokenId(3), Position::new(1, 1));

        let mut pool = LocalPool::new();
        pool.spawner()
            .spawn_local(async move {
                arrival.await;
                flag.set(true);
            })
            .unwrap();
        pool.run_until_stalled();
        clock.advance(1);
        pool.run_until_stalled();
        assert!(!done.get());
        clock.advance(1);
        pool.run_until_stalled();
        assert!(done.get());
    }

    #[test]
    fn test_recording_presenter_logs_calls() {
        let mut presenter = RecordingPresenter::new(InstantPresenter);
        let log = presenter.log();
        presenter.snap_to(TokenId(1), Position::new(2, 3));
        presenter.indicate_hint(&[Position::new(0, 0)]);
        presenter.cancel_hint();

        assert_eq!(
            *log.borrow(),
            vec![
                PresentationEvent::Snapped {
                    id: TokenId(1),
                    at: Position::new(2, 3)
                },
                PresentationEvent::HintShown(vec![Position::new(0, 0)]),
                PresentationEvent::HintCancelled,
            ]
        );
    }
}
