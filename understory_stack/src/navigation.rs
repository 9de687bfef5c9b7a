// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Navigation interruption.
//!
//! ## Overview
//!
//! A controller can carry a [`NavigationGuard`]. While the controller is active, the
//! navigation host's "before navigate" signal consults the guard, which answers with a
//! [`GuardVerdict`]: allow, veto, or a future that decides later (for example after asking the
//! user). The registry folds all verdicts into a [`NavigationCheck`]:
//!
//! - [`NavigationCheck::Proceed`]: nobody objected.
//! - [`NavigationCheck::Vetoed`]: at least one guard vetoed synchronously. The guard effect
//!   has already fired on those controllers.
//! - [`NavigationCheck::Pending`]: some guards are still deciding. The host awaits the
//!   [`PendingNavigation`] future and reports the outcome with
//!   [`Registry::finish_navigation`]. A guard failing with an error fails the whole future
//!   with that error, untouched.
//!
//! "After navigate" force-closes every active controller configured with
//! `close_on_navigation`.
//!
//! Which navigations a guard sees is decided by [`GuardScope`]: every navigation, or only
//! navigations leaving a given route.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};

use futures::future::LocalBoxFuture;

use crate::options::GuardScope;
use crate::registry::Registry;
use crate::types::{CloseOptions, CloseOutcome, CloseReason, StackEvent, StackId};

/// Error type produced by asynchronous guards.
pub type BoxError = Box<dyn core::error::Error>;

/// An asynchronous guard decision. `Ok(true)` allows the navigation.
pub type GuardFuture = LocalBoxFuture<'static, Result<bool, BoxError>>;

/// A guard's answer to a navigation attempt.
pub enum GuardVerdict {
    /// Let the navigation happen.
    Allow,
    /// Block the navigation.
    Veto,
    /// Decide asynchronously.
    Pending(GuardFuture),
}

impl core::fmt::Debug for GuardVerdict {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Allow => f.write_str("Allow"),
            Self::Veto => f.write_str("Veto"),
            Self::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

impl From<bool> for GuardVerdict {
    fn from(allow: bool) -> Self {
        if allow { Self::Allow } else { Self::Veto }
    }
}

/// A caller-supplied guard, called with `(to, from)` route names.
pub type NavigationGuard = Box<dyn FnMut(&str, &str) -> GuardVerdict>;

/// Result of [`Registry::before_navigate`].
#[derive(Debug)]
pub enum NavigationCheck {
    /// No guard objected.
    Proceed,
    /// These controllers vetoed synchronously.
    Vetoed(Vec<StackId>),
    /// At least one guard is still deciding.
    Pending(PendingNavigation),
}

impl NavigationCheck {
    /// Whether the navigation may go ahead without waiting.
    pub fn is_proceed(&self) -> bool {
        matches!(self, Self::Proceed)
    }
}

/// Outstanding asynchronous guard decisions for one navigation.
///
/// Resolves once every guard has answered, or with the first guard error.
pub struct PendingNavigation {
    vetoed: Vec<StackId>,
    waiting: Vec<(StackId, Option<GuardFuture>)>,
    late: Vec<StackId>,
}

impl core::fmt::Debug for PendingNavigation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PendingNavigation")
            .field("vetoed", &self.vetoed)
            .field(
                "waiting",
                &self.waiting.iter().filter(|(_, w)| w.is_some()).count(),
            )
            .finish_non_exhaustive()
    }
}

impl Future for PendingNavigation {
    type Output = Result<NavigationVerdict, BoxError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let mut done = true;
        for (id, slot) in &mut this.waiting {
            let Some(fut) = slot else {
                continue;
            };
            match fut.as_mut().poll(cx) {
                Poll::Ready(Ok(allow)) => {
                    *slot = None;
                    if !allow {
                        this.late.push(*id);
                    }
                }
                Poll::Ready(Err(err)) => {
                    *slot = None;
                    return Poll::Ready(Err(err));
                }
                Poll::Pending => done = false,
            }
        }
        if !done {
            return Poll::Pending;
        }
        Poll::Ready(Ok(NavigationVerdict {
            vetoed: core::mem::take(&mut this.vetoed),
            late: core::mem::take(&mut this.late),
        }))
    }
}

/// Final outcome of a navigation that had to wait for guards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NavigationVerdict {
    vetoed: Vec<StackId>,
    late: Vec<StackId>,
}

impl NavigationVerdict {
    /// Whether the navigation may go ahead.
    pub fn allowed(&self) -> bool {
        self.vetoed.is_empty() && self.late.is_empty()
    }

    /// Every controller that vetoed, synchronous vetoes first.
    pub fn vetoed_by(&self) -> impl Iterator<Item = StackId> + '_ {
        self.vetoed.iter().chain(self.late.iter()).copied()
    }
}

impl<P, E> Registry<P, E> {
    /// Install or clear a controller's navigation guard.
    pub fn set_navigation_guard(&mut self, id: StackId, guard: Option<NavigationGuard>) {
        if let Some(c) = self.get_mut(id) {
            c.guard = guard;
        }
    }

    /// Consult the guards of active controllers before navigating from `from` to `to`.
    ///
    /// Synchronous vetoes fire the guard effect immediately and are reported with
    /// [`StackEvent::NavigationVetoed`].
    pub fn before_navigate(&mut self, to: &str, from: &str) -> NavigationCheck {
        let ids: Vec<StackId> = self
            .registered()
            .filter(|(_, c)| c.is_active() && c.guard.is_some())
            .map(|(id, _)| id)
            .collect();

        let mut vetoed = Vec::new();
        let mut waiting = Vec::new();
        for id in ids {
            let Some(c) = self.get_mut(id) else {
                continue;
            };
            let applies = match &c.options.guard_scope {
                GuardScope::BeforeEach => true,
                GuardScope::Leave(route) => from == route.as_str() && to != route.as_str(),
            };
            if !applies {
                continue;
            }
            let Some(guard) = c.guard.as_mut() else {
                continue;
            };
            match guard(to, from) {
                GuardVerdict::Allow => {}
                GuardVerdict::Veto => vetoed.push(id),
                GuardVerdict::Pending(fut) => waiting.push((id, Some(fut))),
            }
        }

        for &id in &vetoed {
            #[cfg(feature = "tracing")]
            tracing::debug!(?id, to, from, "navigation vetoed");
            self.guard_effect(id);
            self.emit(StackEvent::NavigationVetoed(id));
        }

        if !waiting.is_empty() {
            return NavigationCheck::Pending(PendingNavigation {
                vetoed,
                waiting,
                late: Vec::new(),
            });
        }
        if vetoed.is_empty() {
            NavigationCheck::Proceed
        } else {
            NavigationCheck::Vetoed(vetoed)
        }
    }

    /// Apply the outcome of an awaited [`PendingNavigation`]: controllers whose guard vetoed
    /// asynchronously get the guard effect and a [`StackEvent::NavigationVetoed`].
    pub fn finish_navigation(&mut self, verdict: &NavigationVerdict) {
        for &id in &verdict.late {
            if !self.is_alive(id) {
                continue;
            }
            #[cfg(feature = "tracing")]
            tracing::debug!(?id, "navigation vetoed asynchronously");
            self.guard_effect(id);
            self.emit(StackEvent::NavigationVetoed(id));
        }
    }

    /// Force-close every active controller configured to close on navigation.
    ///
    /// Returns the controllers that closed.
    pub fn after_navigate(&mut self) -> Vec<StackId> {
        let ids: Vec<StackId> = self
            .registered()
            .filter(|(_, c)| c.is_active() && c.options.close_on_navigation)
            .map(|(id, _)| id)
            .collect();
        ids.into_iter()
            .filter(|&id| {
                self.close(id, CloseOptions::forced(CloseReason::Indeterminate))
                    == CloseOutcome::Closed
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::StackOptions;
    use alloc::string::String;
    use alloc::vec;
    use futures::executor::block_on;

    struct NoLock;

    impl crate::host::ScrollLock for NoLock {
        fn acquire(&mut self) {}
        fn release(&mut self) {}
    }

    #[derive(Debug)]
    struct Boom;

    impl core::fmt::Display for Boom {
        fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            f.write_str("boom")
        }
    }

    impl core::error::Error for Boom {}

    fn active(reg: &mut Registry<u32, u32>, options: StackOptions<u32>) -> StackId {
        let id = reg.create(options);
        let _ = reg.add(id);
        let _ = reg.request_show(id, None, None);
        let now = reg.now();
        reg.tick(now, &mut NoLock);
        id
    }

    #[test]
    fn inactive_guards_are_not_consulted() {
        let mut reg = Registry::<u32, u32>::new();
        let id = reg.create(StackOptions::default());
        let _ = reg.add(id);
        reg.set_navigation_guard(id, Some(Box::new(|_: &str, _: &str| GuardVerdict::Veto)));
        assert!(reg.before_navigate("/b", "/a").is_proceed());
    }

    #[test]
    fn sync_veto_pulses_guard_effect() {
        let mut reg = Registry::<u32, u32>::new();
        let id = active(&mut reg, StackOptions::default());
        reg.set_navigation_guard(id, Some(Box::new(|to: &str, _: &str| (to != "/b").into())));
        let _ = reg.drain_events();

        match reg.before_navigate("/b", "/a") {
            NavigationCheck::Vetoed(ids) => assert_eq!(ids, vec![id]),
            other => panic!("expected a veto, got {other:?}"),
        }
        assert!(reg.get(id).is_some_and(|c| c.guard_animating() && c.is_active()));
        assert_eq!(
            reg.drain_events(),
            vec![
                StackEvent::GuardEffect { id, active: true },
                StackEvent::NavigationVetoed(id)
            ]
        );
        assert!(reg.before_navigate("/c", "/a").is_proceed());
    }

    #[test]
    fn leave_scope_only_sees_leaving_navigations() {
        let mut reg = Registry::<u32, u32>::new();
        let id = active(
            &mut reg,
            StackOptions {
                guard_scope: GuardScope::Leave(String::from("/edit")),
                ..StackOptions::default()
            },
        );
        reg.set_navigation_guard(id, Some(Box::new(|_: &str, _: &str| GuardVerdict::Veto)));
        assert!(reg.before_navigate("/edit", "/home").is_proceed());
        assert!(reg.before_navigate("/edit", "/edit").is_proceed());
        assert!(matches!(
            reg.before_navigate("/home", "/edit"),
            NavigationCheck::Vetoed(_)
        ));
    }

    #[test]
    fn async_veto_is_reported_through_finish() {
        let mut reg = Registry::<u32, u32>::new();
        let id = active(&mut reg, StackOptions::default());
        reg.set_navigation_guard(
            id,
            Some(Box::new(|_: &str, _: &str| {
                GuardVerdict::Pending(Box::pin(async { Ok::<_, BoxError>(false) }))
            })),
        );
        let NavigationCheck::Pending(pending) = reg.before_navigate("/b", "/a") else {
            panic!("expected a pending check");
        };
        assert!(!reg.get(id).is_some_and(|c| c.guard_animating()));

        let verdict = block_on(pending).expect("guard does not fail");
        assert!(!verdict.allowed());
        assert_eq!(verdict.vetoed_by().collect::<Vec<_>>(), vec![id]);
        reg.finish_navigation(&verdict);
        assert!(reg.get(id).is_some_and(|c| c.guard_animating()));
    }

    #[test]
    fn guard_errors_propagate() {
        let mut reg = Registry::<u32, u32>::new();
        let id = active(&mut reg, StackOptions::default());
        reg.set_navigation_guard(
            id,
            Some(Box::new(|_: &str, _: &str| {
                GuardVerdict::Pending(Box::pin(async { Err::<bool, BoxError>(Box::new(Boom)) }))
            })),
        );
        let NavigationCheck::Pending(pending) = reg.before_navigate("/b", "/a") else {
            panic!("expected a pending check");
        };
        let err = block_on(pending).expect_err("guard error surfaces");
        assert_eq!(alloc::format!("{err}"), "boom");
    }

    #[test]
    fn after_navigate_force_closes_configured_controllers() {
        let mut reg = Registry::<u32, u32>::new();
        let closes = active(
            &mut reg,
            StackOptions {
                persistent: true,
                ..StackOptions::default()
            },
        );
        let stays = active(
            &mut reg,
            StackOptions {
                close_on_navigation: false,
                ..StackOptions::default()
            },
        );
        assert_eq!(reg.after_navigate(), vec![closes]);
        assert!(reg.get(closes).is_some_and(|c| !c.is_active()));
        assert!(reg.get(stays).is_some_and(|c| c.is_active()));
    }
}
