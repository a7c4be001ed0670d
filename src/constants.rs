// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Default field manager used for server-side apply
pub const DEFAULT_FIELD_MANAGER: &str = "crkit";

/// Namespace used for namespaced kinds when the document does not name one
pub const DEFAULT_NAMESPACE: &str = "default";

/// Condition polling configuration
pub mod wait {
    /// Interval between reads while waiting for a condition
    pub const POLL_INTERVAL_SECS: u64 = 2;
    /// Ceiling applied to "indefinite" waits (one week)
    pub const INDEFINITE_TIMEOUT_SECS: u64 = 7 * 24 * 60 * 60;
}

/// Metadata fields maintained by the API server
pub mod server_fields {
    pub const METADATA: &[&str] = &[
        "resourceVersion",
        "uid",
        "generation",
        "creationTimestamp",
        "managedFields",
        "selfLink",
    ];
}
