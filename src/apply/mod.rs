// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Server-side apply, read and delete of arbitrary resources.

pub mod client;

pub use client::ApplyClient;
