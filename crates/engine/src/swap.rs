//! Swap coordinator
//!
//! ```text
//!   Idle ──► Swapping ──► Resolving ──► Idle
//!                 │
//!                 └─────► Reverting ──► Idle
//! ```
//!
//! A request is validated synchronously. Once accepted it holds the
//! processing guard until the whole transaction (swap, resolve, cascade,
//! availability check) has finished.

use std::rc::Rc;

use tracing::{debug, warn};

use match3_core::{find_match, MatchTree};
use match3_types::{Position, TokenState};

use crate::availability::{cancel_hint, check_availability};
use crate::cascade::run_cascade;
use crate::context::{Phase, ProcessingGuard, SimContext};
use crate::error::InputError;
use crate::motion::arrive_or_timeout;
use crate::resolve::resolve_tree;

/// Validate a swap and start its transaction
pub(crate) fn begin_swap(
    ctx: &Rc<SimContext>,
    from: Position,
    to: Position,
) -> Result<(), InputError> {
    if ctx.is_processing() {
        return Err(InputError::Busy);
    }
    validate(ctx, from, to)?;
    let guard = ProcessingGuard::acquire(ctx).ok_or(InputError::Busy)?;

    cancel_hint(ctx);
    ctx.stats.borrow_mut().swaps += 1;
    ctx.set_phase(Phase::Swapping);
    debug!(%from, %to, "swap accepted");
    ctx.spawn(run_swap(ctx.clone(), guard, from, to));
    Ok(())
}

fn validate(ctx: &SimContext, from: Position, to: Position) -> Result<(), InputError> {
    let board = ctx.board.borrow();
    for pos in [from, to] {
        if !board.is_within_bounds(pos) {
            return Err(InputError::OutOfBounds(pos));
        }
        if !board.in_play_area(pos) {
            return Err(InputError::OutsidePlayArea(pos));
        }
    }
    if !from.is_adjacent(to) {
        return Err(InputError::NotAdjacent { from, to });
    }
    for pos in [from, to] {
        let token = board.token(pos).ok_or(InputError::Empty(pos))?;
        if token.kind().is_immovable() {
            return Err(InputError::Blocked(pos));
        }
        if !token.is_idle() {
            return Err(InputError::TokenBusy(pos));
        }
    }
    Ok(())
}

async fn run_swap(ctx: Rc<SimContext>, _guard: ProcessingGuard, a: Position, b: Position) {
    exchange(&ctx, a, b).await;

    let trees = matches_after_swap(&ctx, a, b);
    if trees.is_empty() {
        debug!(%a, %b, "no match; reverting swap");
        ctx.set_phase(Phase::Reverting);
        ctx.stats.borrow_mut().reverts += 1;
        exchange(&ctx, a, b).await;
        check_availability(&ctx).await;
        return;
    }

    ctx.set_phase(Phase::Resolving);
    let group = ctx.groups.new_group();
    for tree in &trees {
        resolve_tree(&ctx, group, tree);
    }
    ctx.groups.join(group).await;

    run_cascade(&ctx).await;
    check_availability(&ctx).await;
}

/// Trees rooted at both swapped cells; a tree already covering the other
/// cell is not built twice
fn matches_after_swap(ctx: &SimContext, a: Position, b: Position) -> Vec<MatchTree> {
    let board = ctx.board.borrow();
    let mut trees: Vec<MatchTree> = Vec::new();
    for pos in [a, b] {
        let Some(id) = board.token(pos).map(|t| t.id()) else {
            continue;
        };
        if trees.iter().any(|tree| tree.contains(id)) {
            continue;
        }
        if let Some(tree) = find_match(&board, pos) {
            trees.push(tree);
        }
    }
    trees
}

/// Exchange two cells on the board and animate both tokens across
async fn exchange(ctx: &Rc<SimContext>, a: Position, b: Position) {
    let ids = {
        let mut board = ctx.board.borrow_mut();
        if let Err(err) = board.swap(a, b) {
            warn!(%a, %b, %err, "swap failed");
            return;
        }
        board.set_state(a, TokenState::Busy);
        board.set_state(b, TokenState::Busy);
        board.token(a).map(|t| t.id()).zip(board.token(b).map(|t| t.id()))
    };
    let Some((at_a, at_b)) = ids else {
        return;
    };

    let done = ctx
        .presenter
        .borrow_mut()
        .animate_swap_attempt(at_b, b, at_a, a);
    if !arrive_or_timeout(ctx, done).await {
        warn!(%a, %b, "swap animation timed out; snapping into place");
        let mut presenter = ctx.presenter.borrow_mut();
        presenter.snap_to(at_a, a);
        presenter.snap_to(at_b, b);
    }

    let mut board = ctx.board.borrow_mut();
    board.set_state(a, TokenState::Idle);
    board.set_state(b, TokenState::Idle);
}
