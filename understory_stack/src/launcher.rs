// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dynamic launcher: imperatively create short-lived surfaces and await their result.
//!
//! ## Overview
//!
//! A [`Launcher`] keeps a list of pending surfaces. [`Launcher::dynamic`] creates and registers
//! a controller, asks a factory for the host view, schedules activation, and returns a
//! [`Launched`] handle. The handle completes with the controller's value when it resolves.
//!
//! When the renderer reports that the surface finished leaving, the host calls
//! [`Launcher::removed`], which drops the pending entry and destroys the controller. If the
//! controller never resolved, the handle completes with [`Dismissed`]. The launcher never
//! fails a handle on its own.
//!
//! ## Roots
//!
//! Launching requires a mounted root (the place the host renders pending surfaces into).
//! Without one, [`Launcher::dynamic`] fails with [`StackError::NoRoot`].

use alloc::vec::Vec;
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};

use futures::channel::oneshot;

use crate::error::{Dismissed, StackError};
use crate::host::ScrollLock;
use crate::options::StackOptions;
use crate::registry::Registry;
use crate::types::StackId;

/// Props that configure a launched surface.
pub trait LaunchProps<P, E> {
    /// Controller configuration for the new surface.
    fn stack_options(&self) -> StackOptions<E>;

    /// Initial payload.
    fn initial_value(&self) -> Option<P> {
        None
    }
}

/// A surface launched through [`Launcher::dynamic`] that has not been removed yet.
#[derive(Clone, Debug)]
pub struct PendingSurface<V, Q, C> {
    /// Launch identity from [`Registry::gen_id`].
    pub key: u64,
    /// The surface's controller.
    pub stack: StackId,
    /// Props it was launched with.
    pub props: Q,
    /// Content or slots passed at launch.
    pub content: Option<C>,
    /// Host view produced by the factory.
    pub view: V,
}

/// Owner of dynamically launched surfaces.
///
/// - `V`: the host view the factory produces.
/// - `Q`: props.
/// - `C`: optional content or slots.
#[derive(Clone, Debug)]
pub struct Launcher<V, Q, C> {
    mounted: bool,
    entries: Vec<PendingSurface<V, Q, C>>,
}

impl<V, Q, C> Default for Launcher<V, Q, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, Q, C> Launcher<V, Q, C> {
    /// Create a launcher with no root mounted.
    pub fn new() -> Self {
        Self {
            mounted: false,
            entries: Vec::new(),
        }
    }

    /// The host mounted the root that renders pending surfaces.
    pub fn mount_root(&mut self) {
        self.mounted = true;
    }

    /// The root went away: destroy every pending surface and settle the scroll lock.
    ///
    /// Handles of surfaces that never resolved complete with [`Dismissed`].
    pub fn unmount_root<P, E, H: ScrollLock + ?Sized>(
        &mut self,
        registry: &mut Registry<P, E>,
        host: &mut H,
    ) {
        self.mounted = false;
        for entry in self.entries.drain(..) {
            let _ = registry.destroy(entry.stack);
        }
        registry.reconcile_scroll_lock(host);
    }

    /// Whether a root is mounted.
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Pending surfaces, in launch order. The host renders these.
    pub fn pending(&self) -> &[PendingSurface<V, Q, C>] {
        &self.entries
    }

    /// The pending entry for `stack`.
    pub fn get(&self, stack: StackId) -> Option<&PendingSurface<V, Q, C>> {
        self.entries.iter().find(|e| e.stack == stack)
    }

    /// The renderer finished removing `stack`: drop its entry and destroy the controller.
    ///
    /// Returns false if `stack` is not pending here.
    pub fn removed<P, E, H: ScrollLock + ?Sized>(
        &mut self,
        registry: &mut Registry<P, E>,
        stack: StackId,
        host: &mut H,
    ) -> bool {
        let Some(pos) = self.entries.iter().position(|e| e.stack == stack) else {
            return false;
        };
        let entry = self.entries.remove(pos);
        let _ = registry.destroy_with(entry.stack, host);
        #[cfg(feature = "tracing")]
        tracing::debug!(key = entry.key, "launched surface removed");
        true
    }

    /// Launch a surface.
    ///
    /// Allocates a launch key, creates and registers a controller from `props`, builds the
    /// host view with `factory`, and schedules activation for the next tick.
    pub fn dynamic<P, E, F>(
        &mut self,
        registry: &mut Registry<P, E>,
        props: Q,
        content: Option<C>,
        factory: F,
    ) -> Result<Launched<P>, StackError>
    where
        P: Clone,
        Q: LaunchProps<P, E>,
        F: FnOnce(StackId, &Q, Option<&C>) -> V,
    {
        if !self.mounted {
            return Err(StackError::NoRoot);
        }
        let key = registry.gen_id();
        let stack = registry.create(props.stack_options());
        registry.set_value(stack, props.initial_value());
        let _ = registry.add(stack);

        let (tx, rx) = oneshot::channel();
        if let Some(c) = registry.get_mut(stack) {
            c.settle = Some(tx);
        }
        let view = factory(stack, &props, content.as_ref());
        let _ = registry.request_show(stack, None, None);
        #[cfg(feature = "tracing")]
        tracing::debug!(key, ?stack, "surface launched");

        self.entries.push(PendingSurface {
            key,
            stack,
            props,
            content,
            view,
        });
        Ok(Launched { key, stack, rx })
    }
}

/// Result handle of a launched surface.
///
/// Completes with the controller's value once it resolves, or with [`Dismissed`] if the
/// surface is removed first.
#[derive(Debug)]
#[must_use = "a launched surface's result is only observable through its handle"]
pub struct Launched<P> {
    key: u64,
    stack: StackId,
    rx: oneshot::Receiver<Option<P>>,
}

impl<P> Launched<P> {
    /// Launch identity.
    pub fn key(&self) -> u64 {
        self.key
    }

    /// The surface's controller.
    pub fn stack(&self) -> StackId {
        self.stack
    }
}

impl<P> Future for Launched<P> {
    type Output = Result<Option<P>, Dismissed>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|r| r.map_err(|_| Dismissed))
    }
}

/// A launcher entry point with a fixed factory and props normalization.
///
/// Built with [`create_launcher`].
pub struct BoundLauncher<F, R> {
    factory: F,
    resolve_props: R,
}

impl<F, R> core::fmt::Debug for BoundLauncher<F, R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BoundLauncher").finish_non_exhaustive()
    }
}

/// Bind a factory and a props resolver, which normalizes caller arguments into props (for
/// example by supplying default actions) before every launch.
pub fn create_launcher<F, R>(factory: F, resolve_props: R) -> BoundLauncher<F, R> {
    BoundLauncher {
        factory,
        resolve_props,
    }
}

impl<F, R> BoundLauncher<F, R> {
    /// Resolve `args` into props and launch through `launcher`.
    pub fn launch<A, P, E, V, Q, C>(
        &mut self,
        launcher: &mut Launcher<V, Q, C>,
        registry: &mut Registry<P, E>,
        args: A,
        content: Option<C>,
    ) -> Result<Launched<P>, StackError>
    where
        P: Clone,
        Q: LaunchProps<P, E>,
        F: FnMut(StackId, &Q, Option<&C>) -> V,
        R: FnMut(A) -> Q,
    {
        let props = (self.resolve_props)(args);
        launcher.dynamic(registry, props, content, &mut self.factory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CloseReason, Instant};
    use alloc::string::String;
    use futures::executor::block_on;

    struct NoLock;

    impl ScrollLock for NoLock {
        fn acquire(&mut self) {}
        fn release(&mut self) {}
    }

    #[derive(Clone, Debug, PartialEq)]
    struct Confirm {
        title: String,
        persistent: bool,
    }

    impl LaunchProps<u32, u32> for Confirm {
        fn stack_options(&self) -> StackOptions<u32> {
            StackOptions {
                persistent: self.persistent,
                ..StackOptions::dialog()
            }
        }

        fn initial_value(&self) -> Option<u32> {
            Some(0)
        }
    }

    type Views = Launcher<String, Confirm, ()>;

    fn confirm(title: &str) -> Confirm {
        Confirm {
            title: title.into(),
            persistent: false,
        }
    }

    #[test]
    fn launching_without_root_fails() {
        let mut reg = Registry::<u32, u32>::new();
        let mut launcher = Views::new();
        let res = launcher.dynamic(&mut reg, confirm("a"), None, |_, p, _| p.title.clone());
        assert_eq!(res.err(), Some(StackError::NoRoot));
        assert!(launcher.pending().is_empty());
    }

    #[test]
    fn resolve_completes_the_handle() {
        let mut reg = Registry::<u32, u32>::new();
        let mut launcher = Views::new();
        launcher.mount_root();
        let handle = launcher
            .dynamic(&mut reg, confirm("Delete?"), None, |_, p, _| p.title.clone())
            .unwrap();
        let stack = handle.stack();
        assert_eq!(handle.key(), 1);
        assert_eq!(launcher.get(stack).map(|e| e.view.as_str()), Some("Delete?"));
        assert!(reg.is_registered(stack));

        reg.tick(Instant(0), &mut NoLock);
        assert!(reg.get(stack).unwrap().is_active());
        let _ = reg.resolve(stack, Some(42));
        assert_eq!(block_on(handle), Ok(Some(42)));

        assert!(launcher.removed(&mut reg, stack, &mut NoLock));
        assert!(launcher.pending().is_empty());
        assert!(reg.is_destroyed(stack));
        assert!(!launcher.removed(&mut reg, stack, &mut NoLock));
    }

    #[test]
    fn removal_without_resolve_dismisses() {
        let mut reg = Registry::<u32, u32>::new();
        let mut launcher = Views::new();
        launcher.mount_root();
        let handle = launcher
            .dynamic(&mut reg, confirm("x"), None, |_, p, _| p.title.clone())
            .unwrap();
        let stack = handle.stack();
        reg.tick(Instant(0), &mut NoLock);
        let _ = reg.cancel(stack, false);
        assert_eq!(reg.get(stack).unwrap().close_reason(), CloseReason::Canceled);
        let _ = launcher.removed(&mut reg, stack, &mut NoLock);
        assert_eq!(block_on(handle), Err(Dismissed));
    }

    #[test]
    fn unmounting_root_dismisses_everything() {
        let mut reg = Registry::<u32, u32>::new();
        let mut launcher = Views::new();
        launcher.mount_root();
        let a = launcher
            .dynamic(&mut reg, confirm("a"), None, |_, p, _| p.title.clone())
            .unwrap();
        let b = launcher
            .dynamic(&mut reg, confirm("b"), None, |_, p, _| p.title.clone())
            .unwrap();
        assert_eq!(launcher.pending().len(), 2);
        launcher.unmount_root(&mut reg, &mut NoLock);
        assert!(!launcher.is_mounted());
        assert_eq!(block_on(a), Err(Dismissed));
        assert_eq!(block_on(b), Err(Dismissed));
    }

    #[test]
    fn bound_launcher_normalizes_props() {
        let mut reg = Registry::<u32, u32>::new();
        let mut launcher = Views::new();
        launcher.mount_root();
        let mut ask = create_launcher(
            |_, p: &Confirm, _: Option<&()>| alloc::format!("[{}]", p.title),
            |title: &str| Confirm {
                title: title.into(),
                persistent: true,
            },
        );
        let handle = ask.launch(&mut launcher, &mut reg, "Sure?", None).unwrap();
        let entry = launcher.get(handle.stack()).unwrap();
        assert_eq!(entry.view, "[Sure?]");
        assert!(entry.props.persistent);
        assert!(reg.get(handle.stack()).unwrap().options().persistent);
        assert_eq!(reg.get(handle.stack()).unwrap().input_value(), Some(&0));
    }

    #[derive(Default)]
    struct Page {
        locked: bool,
    }

    impl ScrollLock for Page {
        fn acquire(&mut self) {
            self.locked = true;
        }
        fn release(&mut self) {
            self.locked = false;
        }
    }

    #[test]
    fn unmounting_root_unlocks_scrolling() {
        let mut reg = Registry::<u32, u32>::new();
        let mut launcher = Views::new();
        let mut page = Page::default();
        launcher.mount_root();
        let _handle = launcher
            .dynamic(&mut reg, confirm("a"), None, |_, p, _| p.title.clone())
            .unwrap();
        reg.tick(Instant(0), &mut page);
        assert!(page.locked);

        launcher.unmount_root(&mut reg, &mut page);
        assert!(!page.locked);
        assert!(!reg.is_scroll_locked());
    }

    #[test]
    fn removing_the_last_locking_surface_unlocks_scrolling() {
        let mut reg = Registry::<u32, u32>::new();
        let mut launcher = Views::new();
        let mut page = Page::default();
        launcher.mount_root();
        let handle = launcher
            .dynamic(&mut reg, confirm("a"), None, |_, p, _| p.title.clone())
            .unwrap();
        let stack = handle.stack();
        reg.tick(Instant(0), &mut page);
        assert!(page.locked);

        assert!(launcher.removed(&mut reg, stack, &mut page));
        assert!(!page.locked);
        assert_eq!(block_on(handle), Err(Dismissed));
    }
}
