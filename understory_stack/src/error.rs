// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration errors.
//!
//! Guard rejections and stale ids are not errors; see [`CloseOutcome`](crate::CloseOutcome)
//! and [`ShowOutcome`](crate::ShowOutcome).

/// A misconfigured call. Fatal to the call, never retried.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, thiserror::Error)]
pub enum StackError {
    /// A dynamic surface was launched while no launcher root is mounted.
    #[error("no launcher root is mounted")]
    NoRoot,
    /// A response was written without a response sink installed.
    #[error("responses are not supported by this host")]
    NoResponseHost,
}

/// A launched surface was removed before it resolved.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, thiserror::Error)]
#[error("surface was dismissed without resolving")]
pub struct Dismissed;
