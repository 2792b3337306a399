//! Cascade loop: collapse, refill, rescan until no match is left
//!
//! Each pass ends either by resolving at least one token or by finding no
//! match at all, so the loop always terminates.

use std::rc::Rc;

use tracing::debug;

use match3_core::{compact, fill_vacancies, scan_matches, settle_diagonal};
use match3_types::TokenState;

use crate::context::SimContext;
use crate::motion::{animate_relocations, move_token};
use crate::resolve::resolve_tree;

pub(crate) async fn run_cascade(ctx: &Rc<SimContext>) {
    loop {
        ctx.stats.borrow_mut().cascade_passes += 1;
        collapse_board(ctx).await;
        refill_board(ctx).await;

        let trees = scan_matches(&ctx.board.borrow());
        if trees.is_empty() {
            break;
        }
        debug!(matches = trees.len(), "cascade found new matches");
        let group = ctx.groups.new_group();
        for tree in &trees {
            resolve_tree(ctx, group, tree);
        }
        ctx.groups.join(group).await;
    }
}

/// Compact every column, then slide tokens diagonally one at a time,
/// recompacting after each slide
async fn collapse_board(ctx: &Rc<SimContext>) {
    let moved = compact(&mut ctx.board.borrow_mut());
    animate_relocations(ctx, &moved).await;

    loop {
        let slide = settle_diagonal(&mut ctx.board.borrow_mut());
        let Some(slide) = slide else {
            break;
        };
        ctx.presenter.borrow_mut().snap_to(slide.token, slide.to);
        let moved = compact(&mut ctx.board.borrow_mut());
        animate_relocations(ctx, &moved).await;
    }
}

/// Fill every vacancy and drop the new tokens in from above the grid
async fn refill_board(ctx: &Rc<SimContext>) {
    let report = {
        let mut board = ctx.board.borrow_mut();
        let mut pool = ctx.pool.borrow_mut();
        let mut rng = ctx.rng.borrow_mut();
        fill_vacancies(&mut board, &mut **pool, &mut rng, ctx.config.colors)
    };
    if report.spawned.is_empty() {
        return;
    }
    debug!(spawned = report.spawned.len(), "refilling board");

    let staged: Vec<_> = {
        let mut board = ctx.board.borrow_mut();
        report
            .spawned
            .iter()
            .filter_map(|spawned| {
                board.set_state(spawned.position, TokenState::Busy);
                board
                    .token(spawned.position)
                    .map(|token| (*spawned, token.kind()))
            })
            .collect()
    };

    let group = ctx.groups.new_group();
    for (i, (spawned, kind)) in staged.into_iter().enumerate() {
        if i > 0 && ctx.config.spawn_stagger_ticks > 0 {
            ctx.clock.sleep(ctx.config.spawn_stagger_ticks).await;
        }
        ctx.presenter
            .borrow_mut()
            .place_token(spawned.token, kind, spawned.spawn_from);
        ctx.spawn_tracked(group, move_token(ctx.clone(), spawned.token, spawned.position));
    }
    ctx.groups.join(group).await;
}
