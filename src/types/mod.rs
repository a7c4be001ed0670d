// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Data model shared by the apply client, waiter and import codec.

pub mod condition;
pub mod document;
pub mod identity;

pub use condition::{ConditionSpec, FieldPath, PathSegment, WaitTimeout};
pub use document::ResourceDocument;
pub use identity::{ApplyOptions, ResourceIdentity};
