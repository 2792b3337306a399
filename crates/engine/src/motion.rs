//! Token movement with a watchdog
//!
//! Every animated move races the presenter's completion against
//! `move_timeout_ticks`. A move that loses the race is snapped into place.

use std::rc::Rc;

use futures::future::{select, Either};
use tracing::warn;

use match3_core::Relocation;
use match3_types::{Position, TokenId, TokenState};

use crate::context::SimContext;
use crate::presenter::Completion;

/// Await `completion`, giving up after the move timeout.
///
/// Returns `false` when the watchdog fired.
pub(crate) async fn arrive_or_timeout(ctx: &SimContext, completion: Completion) -> bool {
    let watchdog = ctx.clock.sleep(ctx.config.move_timeout_ticks);
    match select(completion, watchdog).await {
        Either::Left(_) => true,
        Either::Right(_) => {
            ctx.stats.borrow_mut().watchdog_snaps += 1;
            false
        }
    }
}

/// Animate token `id` into `to`, then mark it idle if it is still there
pub(crate) async fn move_token(ctx: Rc<SimContext>, id: TokenId, to: Position) {
    let arrival = ctx.presenter.borrow_mut().animate_move(id, to);
    if !arrive_or_timeout(&ctx, arrival).await {
        warn!(token = %id, %to, "token did not arrive in time; snapping into place");
        ctx.presenter.borrow_mut().snap_to(id, to);
    }
    let mut board = ctx.board.borrow_mut();
    if board.token(to).is_some_and(|t| t.id() == id) {
        board.set_state(to, TokenState::Idle);
    }
}

/// Animate a batch of gravity moves as one group and wait for all of them
pub(crate) async fn animate_relocations(ctx: &Rc<SimContext>, moved: &[Relocation]) {
    if moved.is_empty() {
        return;
    }
    let group = ctx.groups.new_group();
    for relocation in moved {
        ctx.board
            .borrow_mut()
            .set_state(relocation.to, TokenState::Busy);
        ctx.spawn_tracked(group, move_token(ctx.clone(), relocation.token, relocation.to));
    }
    ctx.groups.join(group).await;
}
