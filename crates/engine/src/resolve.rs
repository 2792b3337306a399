//! Token resolution
//!
//! Resolving a cell is synchronous on the board: the token leaves its cell at
//! once. Only the effect animation and the hand-back to the pool run as a
//! tracked task, so a group join waits for every effect of a round.
//!
//! | Occupant | Outcome |
//! |----------|---------|
//! | normal | destroyed; each adjacent obstacle takes one damage |
//! | powerup | destroyed; its targets are resolved in the same group |
//! | obstacle | one damage; destroyed at zero health |

use std::rc::Rc;

use tracing::{debug, trace};

use match3_core::{select_targets, MatchTree, MatchedToken, ObstacleHit, Token};
use match3_types::{Position, TokenKind};

use crate::barrier::GroupId;
use crate::context::SimContext;
use crate::presenter::{Completion, EffectParams};

/// Resolve every token of `tree` under `group`, promoting its seed first
/// when the match earns a powerup.
pub(crate) fn resolve_tree(ctx: &Rc<SimContext>, group: GroupId, tree: &MatchTree) {
    if let (Some(powerup), Some(seed)) = (tree.powerup(), tree.seed()) {
        let promoted = {
            let mut board = ctx.board.borrow_mut();
            match board.token_mut(seed.position) {
                Some(token) if token.id() == seed.id => {
                    token.upgrade(powerup);
                    Some(token.kind())
                }
                _ => None,
            }
        };
        if let Some(kind) = promoted {
            debug!(token = %seed.id, at = %seed.position, ?powerup, "match promoted seed");
            ctx.stats.borrow_mut().powerups_created += 1;
            ctx.presenter.borrow_mut().refresh_token(seed.id, kind);
        }
    }

    let members = tree.resolve_set();
    debug!(
        count = tree.count(),
        resolving = members.len(),
        orientation = ?tree.orientation(),
        "resolving match"
    );
    for member in members {
        resolve_member(ctx, group, member);
    }
}

/// Resolve a tree member if it is still the same normal token
fn resolve_member(ctx: &Rc<SimContext>, group: GroupId, member: MatchedToken) {
    let unchanged = ctx
        .board
        .borrow()
        .token(member.position)
        .is_some_and(|t| t.id() == member.id && t.color().is_some());
    if unchanged {
        resolve_at(ctx, group, member.position);
    } else {
        trace!(token = %member.id, "match member already gone");
    }
}

/// Resolve whatever idle token sits at `pos`
pub(crate) fn resolve_at(ctx: &Rc<SimContext>, group: GroupId, pos: Position) {
    let kind = match ctx.board.borrow().token(pos) {
        Some(token) if token.is_idle() => token.kind(),
        _ => return,
    };
    match kind {
        TokenKind::Obstacle { .. } => damage_obstacle(ctx, group, pos),
        TokenKind::Powerup(_) => activate_powerup(ctx, group, pos),
        TokenKind::Normal(_) => destroy_normal(ctx, group, pos),
    }
}

fn destroy_normal(ctx: &Rc<SimContext>, group: GroupId, pos: Position) {
    let (token, neighbors) = {
        let mut board = ctx.board.borrow_mut();
        let Some(token) = board.take(pos).ok().flatten() else {
            return;
        };
        (token, board.adjacent_obstacles(pos))
    };
    ctx.stats.borrow_mut().resolved += 1;
    let effect = ctx
        .presenter
        .borrow_mut()
        .play_resolve_effect(token.id(), pos);
    release_after(ctx, group, effect, token);

    for neighbor in neighbors {
        resolve_at(ctx, group, neighbor);
    }
}

fn damage_obstacle(ctx: &Rc<SimContext>, group: GroupId, pos: Position) {
    let hit = ctx.board.borrow_mut().damage_obstacle(pos);
    match hit {
        Some(ObstacleHit::Destroyed(token)) => {
            debug!(token = %token.id(), at = %pos, "obstacle destroyed");
            ctx.stats.borrow_mut().obstacles_destroyed += 1;
            let effect = ctx
                .presenter
                .borrow_mut()
                .play_resolve_effect(token.id(), pos);
            release_after(ctx, group, effect, token);
        }
        Some(ObstacleHit::Damaged { remaining }) => {
            let damaged = ctx.board.borrow().token(pos).map(|t| (t.id(), t.kind()));
            if let Some((id, kind)) = damaged {
                trace!(token = %id, remaining, "obstacle damaged");
                ctx.presenter.borrow_mut().refresh_token(id, kind);
            }
        }
        None => {}
    }
}

fn activate_powerup(ctx: &Rc<SimContext>, group: GroupId, pos: Position) {
    let Some(token) = ctx.board.borrow_mut().take(pos).ok().flatten() else {
        return;
    };
    let Some(kind) = token.kind().powerup() else {
        return;
    };

    let targets = {
        let board = ctx.board.borrow();
        let mut rng = ctx.rng.borrow_mut();
        select_targets(&board, kind, pos, ctx.config.bomb_radius, &mut rng)
    };
    debug!(?kind, at = %pos, targets = targets.positions.len(), "powerup activated");
    ctx.stats.borrow_mut().powerups_activated += 1;

    let params = EffectParams {
        targets: targets.positions.clone(),
        radius: ctx.config.bomb_radius,
        color: targets.color,
    };
    let effect = ctx
        .presenter
        .borrow_mut()
        .play_powerup_effect(kind, pos, &params);
    release_after(ctx, group, effect, token);

    for target in targets.positions {
        resolve_at(ctx, group, target);
    }
}

fn release_after(ctx: &Rc<SimContext>, group: GroupId, effect: Completion, token: Token) {
    let task_ctx = ctx.clone();
    ctx.spawn_tracked(group, async move {
        effect.await;
        task_ctx.pool.borrow_mut().release(token);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Clock;
    use crate::config::SimConfig;
    use crate::context::Services;
    use crate::presenter::InstantPresenter;
    use futures::executor::LocalPool;
    use match3_core::{find_match, Board, RecyclingPool};

    fn context(rows: &[&str], pool: &LocalPool) -> Rc<SimContext> {
        let mut tokens = RecyclingPool::new();
        let board = Board::from_layout(rows, rows.len() as i32, &mut tokens).unwrap();
        let services = Services {
            config: SimConfig::default(),
            clock: Clock::new(),
            board,
            pool: Box::new(tokens),
            presenter: Box::new(InstantPresenter),
        };
        Rc::new(SimContext::new(services, pool.spawner()))
    }

    #[test]
    fn test_resolve_three_damages_neighbors() {
        let mut pool = LocalPool::new();
        let ctx = context(&["b%bc", "aaa#"], &pool);
        let tree = find_match(&ctx.board.borrow(), Position::new(0, 0)).unwrap();
        let group = ctx.groups.new_group();
        resolve_tree(&ctx, group, &tree);
        pool.run_until(ctx.groups.join(group));

        // `#` loses its last point; `%` survives with one
        assert_eq!(ctx.board.borrow().layout(), ["b#bc", "...."]);
        let stats = *ctx.stats.borrow();
        assert_eq!(stats.resolved, 3);
        assert_eq!(stats.obstacles_destroyed, 1);
    }

    #[test]
    fn test_four_promotes_seed() {
        let mut pool = LocalPool::new();
        let ctx = context(&["bcbc", "aaaa"], &pool);
        let tree = find_match(&ctx.board.borrow(), Position::new(1, 0)).unwrap();
        let group = ctx.groups.new_group();
        resolve_tree(&ctx, group, &tree);
        pool.run_until(ctx.groups.join(group));

        assert_eq!(ctx.board.borrow().layout(), ["bcbc", ".V.."]);
        assert_eq!(ctx.stats.borrow().powerups_created, 1);
    }

    #[test]
    fn test_powerups_chain() {
        let mut pool = LocalPool::new();
        let ctx = context(&["aeb", "cgd", "HVf"], &pool);
        let group = ctx.groups.new_group();
        // The row rocket catches the vertical rocket, which clears its column
        resolve_at(&ctx, group, Position::new(0, 0));
        pool.run_until(ctx.groups.join(group));

        assert_eq!(ctx.board.borrow().layout(), ["a.b", "c.d", "..."]);
        let stats = *ctx.stats.borrow();
        assert_eq!(stats.powerups_activated, 2);
        assert_eq!(stats.resolved, 3);
    }
}
