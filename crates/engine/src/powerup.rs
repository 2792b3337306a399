//! Touch activation of powerups

use std::rc::Rc;

use tracing::debug;

use match3_types::Position;

use crate::availability::{cancel_hint, check_availability};
use crate::cascade::run_cascade;
use crate::context::{Phase, ProcessingGuard, SimContext};
use crate::error::InputError;
use crate::resolve::resolve_at;

/// Validate a touch and start the activation transaction
pub(crate) fn begin_touch(ctx: &Rc<SimContext>, pos: Position) -> Result<(), InputError> {
    if ctx.is_processing() {
        return Err(InputError::Busy);
    }
    {
        let board = ctx.board.borrow();
        if !board.is_within_bounds(pos) {
            return Err(InputError::OutOfBounds(pos));
        }
        if !board.in_play_area(pos) {
            return Err(InputError::OutsidePlayArea(pos));
        }
        let token = board.token(pos).ok_or(InputError::Empty(pos))?;
        if !token.kind().is_powerup() {
            return Err(InputError::NotPowerup(pos));
        }
        if !token.is_idle() {
            return Err(InputError::TokenBusy(pos));
        }
    }
    let guard = ProcessingGuard::acquire(ctx).ok_or(InputError::Busy)?;

    cancel_hint(ctx);
    ctx.set_phase(Phase::Resolving);
    debug!(%pos, "powerup touched");
    ctx.spawn(run_activation(ctx.clone(), guard, pos));
    Ok(())
}

async fn run_activation(ctx: Rc<SimContext>, _guard: ProcessingGuard, pos: Position) {
    let group = ctx.groups.new_group();
    resolve_at(&ctx, group, pos);
    ctx.groups.join(group).await;

    run_cascade(&ctx).await;
    check_availability(&ctx).await;
}
