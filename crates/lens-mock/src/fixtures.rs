//! Fixture data for the mock API.
//!
//! Fixture files are JSON objects keyed by collection path:
//!
//! ```json
//! {
//!   "http/routers": [{ "name": "api@internal", "status": "enabled", "rule": "PathPrefix(`/api`)" }],
//!   "entrypoints": [{ "name": "web", "address": ":80" }]
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use lens_proto::{
    EntryPoint, Middleware, Resource, ResourceKind, ResourceStatus, Router, RouterTls, Service,
};

use crate::collection::MockCollection;
use crate::error::{MockError, MockResult};

const PROVIDERS: [&str; 3] = ["file", "docker", "internal"];

/// `count` generated resources of `kind`, named `item-00`, `item-01`, ...
///
/// Every fifth item is `warning` and every fifth after that `disabled`;
/// providers and priorities rotate so every sort field has distinct values.
#[must_use]
pub fn numbered_fixture(kind: ResourceKind, count: usize) -> Vec<Resource> {
    let width = count.saturating_sub(1).to_string().len().max(2);
    (0..count)
        .map(|i| {
            let status = match i % 5 {
                3 => ResourceStatus::Warning,
                4 => ResourceStatus::Disabled,
                _ => ResourceStatus::Enabled,
            };
            generated(kind, &format!("item-{i:0width$}"), status, i)
        })
        .collect()
}

fn generated(kind: ResourceKind, name: &str, status: ResourceStatus, index: usize) -> Resource {
    let provider = Some(PROVIDERS[index % PROVIDERS.len()].to_string());
    match kind {
        ResourceKind::HttpRouters | ResourceKind::TcpRouters | ResourceKind::UdpRouters => {
            Resource::Router(Router {
                name: name.to_string(),
                status,
                rule: (kind != ResourceKind::UdpRouters).then(|| format!("Host(`{name}.example.com`)")),
                service: Some(format!("{name}-svc")),
                entry_points: vec!["web".to_string()],
                middlewares: Vec::new(),
                priority: i64::try_from(index).ok().map(|i| (i * 7) % 50),
                provider,
                tls: None,
            })
        }
        ResourceKind::HttpServices | ResourceKind::TcpServices | ResourceKind::UdpServices => {
            Resource::Service(Service {
                name: name.to_string(),
                status,
                service_type: Some("loadbalancer".to_string()),
                servers: vec![format!("http://10.0.0.{}:80", index % 250 + 1)],
                used_by: Vec::new(),
                provider,
            })
        }
        ResourceKind::HttpMiddlewares | ResourceKind::TcpMiddlewares => {
            Resource::Middleware(Middleware {
                name: name.to_string(),
                status,
                middleware_type: Some(["headers", "stripprefix", "ratelimit"][index % 3].to_string()),
                used_by: Vec::new(),
                provider,
            })
        }
        ResourceKind::EntryPoints => Resource::EntryPoint(EntryPoint {
            name: name.to_string(),
            address: format!(":{}", 8000 + index),
            status,
        }),
    }
}

/// A small, realistic dashboard: every collection with a few resources.
#[must_use]
pub fn sample_dashboard() -> Vec<MockCollection> {
    let router = |name: &str, rule: &str, service: &str, status, priority, provider: &str| {
        Resource::Router(Router {
            name: name.to_string(),
            status,
            rule: Some(rule.to_string()),
            service: Some(service.to_string()),
            entry_points: vec!["websecure".to_string()],
            middlewares: Vec::new(),
            priority: Some(priority),
            provider: Some(provider.to_string()),
            tls: Some(RouterTls {
                cert_resolver: Some("letsencrypt".to_string()),
                passthrough: false,
            }),
        })
    };

    let http_routers = vec![
        router("api@internal", "PathPrefix(`/api`)", "api@internal", ResourceStatus::Enabled, 2_147_483_646, "internal"),
        router("dashboard@internal", "PathPrefix(`/`)", "dashboard@internal", ResourceStatus::Enabled, 2_147_483_645, "internal"),
        router("whoami@docker", "Host(`whoami.localhost`)", "whoami@docker", ResourceStatus::Enabled, 28, "docker"),
        router("legacy@file", "Host(`old.example.com`)", "legacy@file", ResourceStatus::Warning, 10, "file"),
        router("broken@file", "Host(`broken.example.com`)", "missing@file", ResourceStatus::Disabled, 0, "file"),
    ];

    let http_services = vec![
        Resource::Service(Service {
            name: "whoami@docker".to_string(),
            status: ResourceStatus::Enabled,
            service_type: Some("loadbalancer".to_string()),
            servers: vec!["http://172.17.0.2:80".to_string(), "http://172.17.0.3:80".to_string()],
            used_by: vec!["whoami@docker".to_string()],
            provider: Some("docker".to_string()),
        }),
        Resource::Service(Service {
            name: "legacy@file".to_string(),
            status: ResourceStatus::Warning,
            service_type: Some("weighted".to_string()),
            servers: Vec::new(),
            used_by: vec!["legacy@file".to_string()],
            provider: Some("file".to_string()),
        }),
    ];

    let http_middlewares = vec![
        Resource::Middleware(Middleware {
            name: "strip-api@file".to_string(),
            status: ResourceStatus::Enabled,
            middleware_type: Some("stripprefix".to_string()),
            used_by: vec!["whoami@docker".to_string()],
            provider: Some("file".to_string()),
        }),
        Resource::Middleware(Middleware {
            name: "auth@file".to_string(),
            status: ResourceStatus::Disabled,
            middleware_type: Some("basicauth".to_string()),
            used_by: Vec::new(),
            provider: Some("file".to_string()),
        }),
    ];

    let entry_points = ["web:80", "websecure:443", "traefik:8080"]
        .iter()
        .filter_map(|entry| entry.split_once(':'))
        .map(|(name, port)| {
            Resource::EntryPoint(EntryPoint {
                name: name.to_string(),
                address: format!(":{port}"),
                status: ResourceStatus::Enabled,
            })
        })
        .collect();

    let mut collections = vec![
        MockCollection::new(ResourceKind::HttpRouters, http_routers),
        MockCollection::new(ResourceKind::HttpServices, http_services),
        MockCollection::new(ResourceKind::HttpMiddlewares, http_middlewares),
        MockCollection::new(ResourceKind::EntryPoints, entry_points),
    ];
    for kind in [
        ResourceKind::TcpRouters,
        ResourceKind::TcpServices,
        ResourceKind::TcpMiddlewares,
        ResourceKind::UdpRouters,
        ResourceKind::UdpServices,
    ] {
        collections.push(MockCollection::new(kind, numbered_fixture(kind, 3)));
    }
    collections
}

/// Parse a fixture document.
///
/// # Errors
///
/// Returns [`MockError::Fixture`] for malformed JSON, unknown collection
/// paths, or resources that do not decode as their collection's kind.
pub fn parse_fixture(json: &str) -> MockResult<Vec<MockCollection>> {
    let document: BTreeMap<String, Vec<serde_json::Value>> = serde_json::from_str(json)?;

    document
        .into_iter()
        .map(|(path, values)| {
            let kind: ResourceKind = path
                .parse::<ResourceKind>()
                .map_err(|e| MockError::Fixture(e.to_string()))?;
            let items = values
                .into_iter()
                .map(|value| kind.decode(value))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| MockError::Fixture(format!("{path}: {e}")))?;
            Ok(MockCollection::new(kind, items))
        })
        .collect()
}

/// Load a fixture file.
///
/// # Errors
///
/// Returns [`MockError::Fixture`] if the file cannot be read or parsed.
pub fn load_fixture_file(path: &Path) -> MockResult<Vec<MockCollection>> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| MockError::Fixture(format!("failed to read {}: {e}", path.display())))?;
    parse_fixture(&json)
}
