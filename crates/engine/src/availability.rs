//! Move availability, shuffle fallback and the hint timer

use std::rc::Rc;

use futures::future::{AbortHandle, Abortable};
use tracing::{debug, info};

use match3_core::{scan_moves, shuffle_board};
use match3_types::{Position, TokenState};

use crate::cascade::run_cascade;
use crate::context::SimContext;
use crate::motion::move_token;

/// Scan for moves, shuffle when there are none, then arm the hint
pub(crate) async fn check_availability(ctx: &Rc<SimContext>) {
    let mut moves = scan_moves(&ctx.board.borrow());
    if moves.is_empty() {
        info!("no moves left; shuffling the board");
        let report = {
            let mut board = ctx.board.borrow_mut();
            let mut rng = ctx.rng.borrow_mut();
            shuffle_board(&mut board, &mut rng, ctx.config.shuffle_attempts)
        };
        ctx.stats.borrow_mut().shuffles += 1;

        let group = ctx.groups.new_group();
        for &(id, pos) in &report.placements {
            ctx.board.borrow_mut().set_state(pos, TokenState::Busy);
            ctx.spawn_tracked(group, move_token(ctx.clone(), id, pos));
        }
        ctx.groups.join(group).await;

        if !report.valid {
            run_cascade(ctx).await;
        }
        moves = scan_moves(&ctx.board.borrow());
    }

    let best = moves.into_iter().next();
    match &best {
        Some(best) => {
            debug!(from = %best.from, to = %best.to, length = best.length(), "best move");
            start_hint(ctx, best.tokens.clone());
        }
        None => debug!("board has no move after shuffling"),
    }
    *ctx.best_move.borrow_mut() = best;
}

/// Show `tokens` as a hint after the idle delay, replacing any pending hint
pub(crate) fn start_hint(ctx: &Rc<SimContext>, tokens: Vec<Position>) {
    cancel_hint(ctx);
    let (handle, registration) = AbortHandle::new_pair();
    let delay = ctx.clock.sleep(ctx.config.hint_delay_ticks);
    let task_ctx = ctx.clone();
    let hint = Abortable::new(
        async move {
            delay.await;
            task_ctx.presenter.borrow_mut().indicate_hint(&tokens);
            task_ctx.hint_shown.set(true);
        },
        registration,
    );
    *ctx.hint.borrow_mut() = Some(handle);
    ctx.spawn(async move {
        let _ = hint.await;
    });
}

/// Abort the pending hint and clear an indicator already on screen
pub(crate) fn cancel_hint(ctx: &SimContext) {
    if let Some(handle) = ctx.hint.borrow_mut().take() {
        handle.abort();
    }
    if ctx.hint_shown.replace(false) {
        ctx.presenter.borrow_mut().cancel_hint();
    }
}
