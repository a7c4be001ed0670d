// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Polling of live objects until wait conditions hold.

pub mod waiter;

pub use waiter::{ConditionWaiter, ResourceReader};
