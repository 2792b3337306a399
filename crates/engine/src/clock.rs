//! Logical clock and timers
//!
//! The host advances time one fixed tick at a time. [`Sleep`] futures resolve
//! once the clock reaches their deadline; nothing here reads wall time.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

#[derive(Debug, Default)]
struct ClockState {
    now: Cell<u64>,
    waiters: RefCell<Vec<(u64, Waker)>>,
}

/// Shared tick counter. Clones observe the same time.
#[derive(Debug, Clone, Default)]
pub struct Clock {
    state: Rc<ClockState>,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticks elapsed since creation
    pub fn now(&self) -> u64 {
        self.state.now.get()
    }

    /// Future that resolves `ticks` ticks from now (immediately for zero)
    pub fn sleep(&self, ticks: u32) -> Sleep {
        Sleep {
            clock: self.clone(),
            deadline: self.now() + u64::from(ticks),
        }
    }

    /// Move time forward and wake every timer that came due
    pub fn advance(&self, ticks: u32) {
        let now = self.now() + u64::from(ticks);
        self.state.now.set(now);
        let due: Vec<Waker> = {
            let mut waiters = self.state.waiters.borrow_mut();
            let (due, pending): (Vec<_>, Vec<_>) =
                waiters.drain(..).partition(|(deadline, _)| *deadline <= now);
            *waiters = pending;
            due.into_iter().map(|(_, waker)| waker).collect()
        };
        for waker in due {
            waker.wake();
        }
    }

    /// Timers still waiting for their deadline
    pub fn pending_timers(&self) -> usize {
        self.state.waiters.borrow().len()
    }

    fn register(&self, deadline: u64, waker: Waker) {
        let mut waiters = self.state.waiters.borrow_mut();
        if let Some(slot) = waiters
            .iter_mut()
            .find(|(d, w)| *d == deadline && w.will_wake(&waker))
        {
            slot.1 = waker;
        } else {
            waiters.push((deadline, waker));
        }
    }
}

/// Timer future returned by [`Clock::sleep`]
#[derive(Debug)]
pub struct Sleep {
    clock: Clock,
    deadline: u64,
}

impl Sleep {
    pub fn deadline(&self) -> u64 {
        self.deadline
    }
}

impl Future for Sleep {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.clock.now() >= self.deadline {
            return Poll::Ready(());
        }
        self.clock.register(self.deadline, cx.waker().clone());
        Poll::Pending
    }
}
