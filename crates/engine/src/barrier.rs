//! Group barrier - join point for concurrently running resolutions
//!
//! Tasks started under one [`GroupId`] each hold a [`GroupTicket`]. Dropping
//! the ticket (the task finished, or was dropped) decrements the group's
//! outstanding count. [`GroupBarrier::join`] resolves once that count reaches
//! zero, so callers wait for the whole group without polling.

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

/// Opaque key of a task group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(u64);

#[derive(Debug, Default)]
struct Group {
    outstanding: usize,
    waiters: Vec<Waker>,
}

#[derive(Debug, Default)]
struct Registry {
    next_id: u64,
    groups: HashMap<GroupId, Group>,
}

/// Counting registry keyed by [`GroupId`]
#[derive(Debug, Clone, Default)]
pub struct GroupBarrier {
    registry: Rc<RefCell<Registry>>,
}

impl GroupBarrier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh key, distinct from every key handed out before
    pub fn new_group(&self) -> GroupId {
        let mut registry = self.registry.borrow_mut();
        let id = GroupId(registry.next_id);
        registry.next_id += 1;
        id
    }

    /// Count one more outstanding task under `id` until the ticket drops
    pub fn register(&self, id: GroupId) -> GroupTicket {
        self.registry
            .borrow_mut()
            .groups
            .entry(id)
            .or_default()
            .outstanding += 1;
        GroupTicket {
            barrier: self.clone(),
            id,
        }
    }

    pub fn outstanding(&self, id: GroupId) -> usize {
        self.registry
            .borrow()
            .groups
            .get(&id)
            .map_or(0, |group| group.outstanding)
    }

    /// Resolves once no task is outstanding under `id`
    pub fn join(&self, id: GroupId) -> Join {
        Join {
            barrier: self.clone(),
            id,
        }
    }

    fn finish(&self, id: GroupId) {
        let wakers = {
            let mut registry = self.registry.borrow_mut();
            let Some(group) = registry.groups.get_mut(&id) else {
                return;
            };
            group.outstanding = group.outstanding.saturating_sub(1);
            if group.outstanding > 0 {
                return;
            }
            registry
                .groups
                .remove(&id)
                .map(|group| group.waiters)
                .unwrap_or_default()
        };
        for waker in wakers {
            waker.wake();
        }
    }
}

/// Membership of one task in a group
#[derive(Debug)]
pub struct GroupTicket {
    barrier: GroupBarrier,
    id: GroupId,
}

impl GroupTicket {
    pub fn group(&self) -> GroupId {
        self.id
    }
}

impl Drop for GroupTicket {
    fn drop(&mut self) {
        self.barrier.finish(self.id);
    }
}

/// Future returned by [`GroupBarrier::join`]
#[derive(Debug)]
pub struct Join {
    barrier: GroupBarrier,
    id: GroupId,
}

impl Future for Join {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let mut registry = self.barrier.registry.borrow_mut();
        match registry.groups.get_mut(&self.id) {
            Some(group) if group.outstanding > 0 => {
                if !group.waiters.iter().any(|w| w.will_wake(cx.waker())) {
                    group.waiters.push(cx.waker().clone());
                }
                Poll::Pending
            }
            _ => Poll::Ready(()),
        }
    }
}
