// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking Kubernetes API responses.

use bytes::Bytes;
use http::{Request, Response};
use http_body_util::BodyExt;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{APIResource, APIResourceList};
use kube::client::Body;
use kube::Client;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

/// A request seen by the mock
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: String,
    pub body: Bytes,
}

impl RecordedRequest {
    pub fn body_json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

enum Reply {
    /// Responses served in order; the last one repeats
    Sequence(VecDeque<(u16, String)>),
    /// Return the applied body with a fresh resourceVersion
    EchoApply,
}

struct Route {
    method: String,
    path: String,
    query_contains: Option<String>,
    reply: Reply,
}

/// A mock HTTP service that returns scripted responses based on request paths.
#[derive(Clone)]
pub struct MockService {
    routes: Arc<Mutex<Vec<Route>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    resource_version: Arc<AtomicU64>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            routes: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            resource_version: Arc::new(AtomicU64::new(0)),
        }
    }

    fn route(self, method: &str, path: &str, query_contains: Option<&str>, reply: Reply) -> Self {
        self.routes.lock().unwrap().push(Route {
            method: method.to_string(),
            path: path.to_string(),
            query_contains: query_contains.map(String::from),
            reply,
        });
        self
    }

    /// Add a response for GET requests matching the exact path
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on_get_sequence(path, vec![(status, body.to_string())])
    }

    /// Serve GET responses in order, repeating the last one
    pub fn on_get_sequence(self, path: &str, responses: Vec<(u16, String)>) -> Self {
        self.route("GET", path, None, Reply::Sequence(responses.into()))
    }

    pub fn on_patch(self, path: &str, status: u16, body: &str) -> Self {
        self.route(
            "PATCH",
            path,
            None,
            Reply::Sequence(VecDeque::from([(status, body.to_string())])),
        )
    }

    /// Add a PATCH response used only when the query string contains `query`.
    /// Register these before any unconditional route for the same path.
    pub fn on_patch_with_query(self, path: &str, query: &str, status: u16, body: &str) -> Self {
        self.route(
            "PATCH",
            path,
            Some(query),
            Reply::Sequence(VecDeque::from([(status, body.to_string())])),
        )
    }

    /// Answer PATCH requests by echoing the applied object, bumping resourceVersion
    pub fn on_apply_echo(self, path: &str) -> Self {
        self.route("PATCH", path, None, Reply::EchoApply)
    }

    /// Echo applies only when the query string contains `query`
    pub fn on_apply_echo_with_query(self, path: &str, query: &str) -> Self {
        self.route("PATCH", path, Some(query), Reply::EchoApply)
    }

    pub fn on_delete(self, path: &str, status: u16, body: &str) -> Self {
        self.route(
            "DELETE",
            path,
            None,
            Reply::Sequence(VecDeque::from([(status, body.to_string())])),
        )
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    /// All requests received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    fn find_response(&self, method: &str, path: &str, query: &str, body: &[u8]) -> Option<(u16, String)> {
        let mut routes = self.routes.lock().unwrap();

        let route = routes.iter_mut().find(|r| {
            r.method == method
                && r.path == path
                && r.query_contains.as_deref().map_or(true, |q| query.contains(q))
        })?;

        match &mut route.reply {
            Reply::Sequence(responses) => {
                if responses.len() > 1 {
                    responses.pop_front()
                } else {
                    responses.front().cloned()
                }
            }
            Reply::EchoApply => {
                let mut object: serde_json::Value = serde_json::from_slice(body).ok()?;
                let rv = self.resource_version.fetch_add(1, Ordering::SeqCst) + 1;
                object["metadata"]["resourceVersion"] = serde_json::Value::String(rv.to_string());
                Some((200, object.to_string()))
            }
        }
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let this = self.clone();

        Box::pin(async move {
            let (parts, body) = req.into_parts();
            let method = parts.method.to_string();
            let path = parts.uri.path().to_string();
            let query = parts.uri.query().unwrap_or_default().to_string();
            let body = body
                .collect()
                .await
                .map_err(Into::<tower::BoxError>::into)?
                .to_bytes();

            this.requests.lock().unwrap().push(RecordedRequest {
                method: method.clone(),
                path: path.clone(),
                query: query.clone(),
                body: body.clone(),
            });

            let (status, body) = this
                .find_response(&method, &path, &query, &body)
                .unwrap_or_else(|| (404, not_found_json("resource", &path)));

            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

/// Create a mock custom resource JSON document
pub fn widget_json(namespace: &str, name: &str, status: Option<serde_json::Value>) -> String {
    let mut object = serde_json::json!({
        "apiVersion": "example.com/v1",
        "kind": "Widget",
        "metadata": {
            "name": name,
            "namespace": namespace,
            "uid": "test-uid",
            "resourceVersion": "1"
        },
        "spec": {
            "size": 3
        }
    });
    if let Some(status) = status {
        object["status"] = status;
    }
    object.to_string()
}

/// Create a discovery response for a single group version
pub fn api_resource_list_json(group_version: &str, resources: &[(&str, &str, bool)]) -> String {
    let list = APIResourceList {
        group_version: group_version.to_string(),
        resources: resources
            .iter()
            .map(|(kind, plural, namespaced)| APIResource {
                kind: kind.to_string(),
                name: plural.to_string(),
                namespaced: *namespaced,
                singular_name: kind.to_lowercase(),
                verbs: ["get", "list", "patch", "delete"]
                    .iter()
                    .map(|v| v.to_string())
                    .collect(),
                ..Default::default()
            })
            .collect(),
    };
    serde_json::to_string(&list).unwrap()
}

/// Create a Status failure response
pub fn status_json(code: u16, reason: &str, message: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": message,
        "reason": reason,
        "code": code
    })
    .to_string()
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    status_json(404, "NotFound", &format!("{} \"{}\" not found", resource, name))
}

/// Create a 409 apply conflict response
pub fn conflict_json(manager: &str, field: &str) -> String {
    status_json(
        409,
        "Conflict",
        &format!(
            "Apply failed with 1 conflict: conflict with \"{}\": {}",
            manager, field
        ),
    )
}
