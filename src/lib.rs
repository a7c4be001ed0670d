// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
pub mod apply;
pub mod config;
pub mod constants;
pub mod error;
pub mod import;
pub mod kubernetes;
pub mod types;
pub mod wait;

#[cfg(test)]
pub(crate) mod test_utils;

pub use apply::ApplyClient;
pub use config::Config;
pub use error::{CrError, Result};
pub use kubernetes::IdentityResolver;
pub use types::{ApplyOptions, ConditionSpec, ResourceDocument, ResourceIdentity, WaitTimeout};
pub use wait::ConditionWaiter;
