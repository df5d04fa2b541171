//! Dashboard resources and the collections they live in.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FetchError;
use crate::query::UnknownVariant;

/// Health of a single resource as reported by the proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceStatus {
    /// Resource is active.
    #[default]
    Enabled,
    /// Resource is active but misconfigured in a non-fatal way.
    Warning,
    /// Resource is inactive.
    Disabled,
}

impl ResourceStatus {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Enabled => "enabled",
            Self::Warning => "warning",
            Self::Disabled => "disabled",
        }
    }
}

impl fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The collections a dashboard can list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// HTTP routers.
    HttpRouters,
    /// HTTP services.
    HttpServices,
    /// HTTP middlewares.
    HttpMiddlewares,
    /// TCP routers.
    TcpRouters,
    /// TCP services.
    TcpServices,
    /// TCP middlewares.
    TcpMiddlewares,
    /// UDP routers.
    UdpRouters,
    /// UDP services.
    UdpServices,
    /// Entry points.
    EntryPoints,
}

impl ResourceKind {
    /// Every collection kind, in dashboard navigation order.
    pub const ALL: [Self; 9] = [
        Self::HttpRouters,
        Self::HttpServices,
        Self::HttpMiddlewares,
        Self::TcpRouters,
        Self::TcpServices,
        Self::TcpMiddlewares,
        Self::UdpRouters,
        Self::UdpServices,
        Self::EntryPoints,
    ];

    /// Path of the collection relative to the API root, e.g. `http/routers`.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::HttpRouters => "http/routers",
            Self::HttpServices => "http/services",
            Self::HttpMiddlewares => "http/middlewares",
            Self::TcpRouters => "tcp/routers",
            Self::TcpServices => "tcp/services",
            Self::TcpMiddlewares => "tcp/middlewares",
            Self::UdpRouters => "udp/routers",
            Self::UdpServices => "udp/services",
            Self::EntryPoints => "entrypoints",
        }
    }

    /// Singular noun used in messages ("router", "service", ...).
    #[must_use]
    pub const fn noun(self) -> &'static str {
        match self {
            Self::HttpRouters | Self::TcpRouters | Self::UdpRouters => "router",
            Self::HttpServices | Self::TcpServices | Self::UdpServices => "service",
            Self::HttpMiddlewares | Self::TcpMiddlewares => "middleware",
            Self::EntryPoints => "entry point",
        }
    }

    /// Decode one JSON object from this collection into a [`Resource`].
    pub fn decode(self, value: serde_json::Value) -> Result<Resource, FetchError> {
        let resource = match self {
            Self::HttpRouters | Self::TcpRouters | Self::UdpRouters => {
                Resource::Router(serde_json::from_value(value)?)
            }
            Self::HttpServices | Self::TcpServices | Self::UdpServices => {
                Resource::Service(serde_json::from_value(value)?)
            }
            Self::HttpMiddlewares | Self::TcpMiddlewares => {
                Resource::Middleware(serde_json::from_value(value)?)
            }
            Self::EntryPoints => Resource::EntryPoint(serde_json::from_value(value)?),
        };
        Ok(resource)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for ResourceKind {
    type Err = UnknownVariant;

    /// Accepts collection paths (`tcp/services`) and, for HTTP, the bare
    /// collection name (`routers`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim_matches('/').to_ascii_lowercase();
        let kind = match normalized.as_str() {
            "http/routers" | "routers" => Self::HttpRouters,
            "http/services" | "services" => Self::HttpServices,
            "http/middlewares" | "middlewares" => Self::HttpMiddlewares,
            "tcp/routers" => Self::TcpRouters,
            "tcp/services" => Self::TcpServices,
            "tcp/middlewares" => Self::TcpMiddlewares,
            "udp/routers" => Self::UdpRouters,
            "udp/services" => Self::UdpServices,
            "entrypoints" | "entry-points" => Self::EntryPoints,
            _ => {
                return Err(UnknownVariant {
                    kind: "resource kind",
                    value: s.to_string(),
                });
            }
        };
        Ok(kind)
    }
}

/// TLS settings attached to a router.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterTls {
    /// Certificate resolver name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert_resolver: Option<String>,
    /// TCP passthrough.
    #[serde(default)]
    pub passthrough: bool,
}

/// A router: matches requests and forwards them to a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Router {
    /// Unique name, e.g. `api@internal`.
    pub name: String,
    /// Health. Required on the wire.
    pub status: ResourceStatus,
    /// Matching rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    /// Target service name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    /// Entry points the router listens on.
    #[serde(default)]
    pub entry_points: Vec<String>,
    /// Middlewares applied in order.
    #[serde(default)]
    pub middlewares: Vec<String>,
    /// Rule priority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    /// Configuration provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// TLS configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<RouterTls>,
}

/// A service: a pool of backend servers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// Unique name.
    pub name: String,
    /// Health. Required on the wire.
    pub status: ResourceStatus,
    /// Service type (`loadbalancer`, `weighted`, `mirroring`, ...).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    /// Backend server URLs or addresses.
    #[serde(default)]
    pub servers: Vec<String>,
    /// Routers that reference this service.
    #[serde(default)]
    pub used_by: Vec<String>,
    /// Configuration provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

/// A middleware applied by routers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Middleware {
    /// Unique name.
    pub name: String,
    /// Health. Required on the wire.
    pub status: ResourceStatus,
    /// Middleware type (`headers`, `stripprefix`, ...).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub middleware_type: Option<String>,
    /// Routers that reference this middleware.
    #[serde(default)]
    pub used_by: Vec<String>,
    /// Configuration provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

/// A listening entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPoint {
    /// Unique name, e.g. `websecure`.
    pub name: String,
    /// Listen address, e.g. `:443`.
    #[serde(default)]
    pub address: String,
    /// Entry points are always reported enabled when the API omits a status.
    #[serde(default)]
    pub status: ResourceStatus,
}

/// Any listable dashboard resource.
///
/// Serialises as the bare kind-specific object, the way the collection
/// endpoints return it. Decoding needs the collection kind; see
/// [`ResourceKind::decode`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Resource {
    /// A router.
    Router(Router),
    /// A service.
    Service(Service),
    /// A middleware.
    Middleware(Middleware),
    /// An entry point.
    EntryPoint(EntryPoint),
}

impl Resource {
    /// Unique name within its collection.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Router(r) => &r.name,
            Self::Service(s) => &s.name,
            Self::Middleware(m) => &m.name,
            Self::EntryPoint(e) => &e.name,
        }
    }

    /// Health status.
    #[must_use]
    pub fn status(&self) -> ResourceStatus {
        match self {
            Self::Router(r) => r.status,
            Self::Service(s) => s.status,
            Self::Middleware(m) => m.status,
            Self::EntryPoint(e) => e.status,
        }
    }

    /// Configuration provider, when the resource has one.
    #[must_use]
    pub fn provider(&self) -> Option<&str> {
        match self {
            Self::Router(r) => r.provider.as_deref(),
            Self::Service(s) => s.provider.as_deref(),
            Self::Middleware(m) => m.provider.as_deref(),
            Self::EntryPoint(_) => None,
        }
    }

    /// Short type/rule summary for list rendering.
    #[must_use]
    pub fn summary(&self) -> &str {
        match self {
            Self::Router(r) => r.rule.as_deref().unwrap_or(""),
            Self::Service(s) => s.service_type.as_deref().unwrap_or(""),
            Self::Middleware(m) => m.middleware_type.as_deref().unwrap_or(""),
            Self::EntryPoint(e) => &e.address,
        }
    }
}
