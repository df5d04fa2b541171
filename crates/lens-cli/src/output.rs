//! Output formatting for CLI commands.
//!
//! Supports table (human-readable) and JSON output formats.

use std::io::Write;

use lens_proto::{Resource, ResourceKind};
use serde::Serialize;

use crate::cli::Format;
use crate::error::CliError;

/// Output formatter that handles both table and JSON output.
#[derive(Debug, Clone)]
pub struct OutputFormat {
    format: Format,
}

impl OutputFormat {
    /// Create a new output formatter.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self { format }
    }

    /// Get the current format.
    #[must_use]
    pub const fn format(&self) -> Format {
        self.format
    }

    /// Check if JSON format is selected.
    #[must_use]
    pub const fn is_json(&self) -> bool {
        matches!(self.format, Format::Json)
    }

    /// Write a serializable value to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write<W, T>(&self, writer: &mut W, value: &T) -> Result<(), CliError>
    where
        W: Write,
        T: Serialize + TableDisplay,
    {
        match self.format {
            Format::Json => {
                serde_json::to_writer_pretty(&mut *writer, value)
                    .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
                writeln!(writer)?;
            }
            Format::Table => {
                value.write_table(writer)?;
            }
        }
        Ok(())
    }

    /// Write a serializable value to a string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_string<T>(&self, value: &T) -> Result<String, CliError>
    where
        T: Serialize + TableDisplay,
    {
        let mut buf = Vec::new();
        self.write(&mut buf, value)?;
        String::from_utf8(buf).map_err(|e| CliError::Format(format!("UTF-8 error: {e}")))
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::new(Format::Table)
    }
}

/// Trait for types that can be displayed as a table.
pub trait TableDisplay {
    /// Write the value as a human-readable table.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError>;
}

/// Listed resources of one collection.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceList {
    /// Collection path.
    pub kind: String,
    /// Resources in server order.
    pub items: Vec<Resource>,
    /// Total matching resources, when reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    /// Page to request for more results; absent once the end is reached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page: Option<u32>,
}

impl ResourceList {
    /// Create a list for `kind`.
    #[must_use]
    pub fn new(kind: ResourceKind, items: Vec<Resource>) -> Self {
        Self {
            kind: kind.path().to_string(),
            items,
            total: None,
            next_page: None,
        }
    }
}

impl TableDisplay for ResourceList {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        if self.items.is_empty() {
            writeln!(writer, "No {} found", self.kind)?;
            return Ok(());
        }

        writeln!(
            writer,
            "{:<36}  {:<9}  {:<10}  {}",
            "NAME", "STATUS", "PROVIDER", "DETAILS"
        )?;
        writeln!(writer, "{}", "─".repeat(96))?;

        for item in &self.items {
            writeln!(
                writer,
                "{:<36}  {:<9}  {:<10}  {}",
                truncate(item.name(), 36),
                item.status().as_str(),
                truncate(item.provider().unwrap_or("-"), 10),
                truncate(item.summary(), 36)
            )?;
        }

        writeln!(writer)?;
        match self.total {
            Some(total) => writeln!(writer, "Showing {} of {total}", self.items.len())?,
            None => writeln!(writer, "Showing {}", self.items.len())?,
        }
        if let Some(page) = self.next_page {
            writeln!(writer, "More results on page {page}; pass --all to fetch everything")?;
        }
        Ok(())
    }
}

/// A single resource.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct ResourceDetail(pub Resource);

impl TableDisplay for ResourceDetail {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        let resource = &self.0;
        writeln!(writer, "{}", resource.name())?;
        writeln!(writer, "══════════════════════════════════")?;
        writeln!(writer, "Status:       {}", resource.status())?;
        if let Some(provider) = resource.provider() {
            writeln!(writer, "Provider:     {provider}")?;
        }

        match resource {
            Resource::Router(r) => {
                writeln!(writer, "Rule:         {}", r.rule.as_deref().unwrap_or("-"))?;
                writeln!(writer, "Service:      {}", r.service.as_deref().unwrap_or("-"))?;
                writeln!(writer, "Entry points: {}", join_or_dash(&r.entry_points))?;
                writeln!(writer, "Middlewares:  {}", join_or_dash(&r.middlewares))?;
                if let Some(priority) = r.priority {
                    writeln!(writer, "Priority:     {priority}")?;
                }
                if let Some(tls) = &r.tls {
                    writeln!(
                        writer,
                        "TLS:          {}{}",
                        tls.cert_resolver.as_deref().unwrap_or("default"),
                        if tls.passthrough { " (passthrough)" } else { "" }
                    )?;
                }
            }
            Resource::Service(s) => {
                writeln!(writer, "Type:         {}", s.service_type.as_deref().unwrap_or("-"))?;
                writeln!(writer, "Servers:      {}", join_or_dash(&s.servers))?;
                writeln!(writer, "Used by:      {}", join_or_dash(&s.used_by))?;
            }
            Resource::Middleware(m) => {
                writeln!(writer, "Type:         {}", m.middleware_type.as_deref().unwrap_or("-"))?;
                writeln!(writer, "Used by:      {}", join_or_dash(&m.used_by))?;
            }
            Resource::EntryPoint(e) => {
                writeln!(writer, "Address:      {}", e.address)?;
            }
        }
        Ok(())
    }
}

fn join_or_dash(values: &[String]) -> String {
    if values.is_empty() {
        "-".to_string()
    } else {
        values.join(", ")
    }
}

/// Truncate to `max_len` characters, marking the cut with `...`.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{kept}...")
    } else {
        s.chars().take(max_len).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lens_proto::{EntryPoint, ResourceStatus, Router};

    fn router() -> Resource {
        Resource::Router(Router {
            name: "api@internal".into(),
            status: ResourceStatus::Enabled,
            rule: Some("PathPrefix(`/api`)".into()),
            service: Some("api@internal".into()),
            entry_points: vec!["traefik".into()],
            middlewares: Vec::new(),
            priority: Some(10),
            provider: Some("internal".into()),
            tls: None,
        })
    }

    #[test]
    fn list_table_has_rows_and_footer() {
        let mut list = ResourceList::new(ResourceKind::HttpRouters, vec![router()]);
        list.total = Some(3);
        list.next_page = Some(2);

        let out = OutputFormat::new(Format::Table).to_string(&list).unwrap();

        assert!(out.contains("NAME"));
        assert!(out.contains("api@internal"));
        assert!(out.contains("PathPrefix(`/api`)"));
        assert!(out.contains("Showing 1 of 3"));
        assert!(out.contains("page 2"));
    }

    #[test]
    fn empty_list_table() {
        let list = ResourceList::new(ResourceKind::TcpServices, Vec::new());

        let out = OutputFormat::default().to_string(&list).unwrap();

        assert_eq!(out, "No tcp/services found\n");
    }

    #[test]
    fn list_json_omits_absent_paging() {
        let list = ResourceList::new(ResourceKind::HttpRouters, vec![router()]);

        let out = OutputFormat::new(Format::Json).to_string(&list).unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(json["kind"], "http/routers");
        assert_eq!(json["items"][0]["name"], "api@internal");
        assert!(json.get("next_page").is_none());
    }

    #[test]
    fn detail_table_for_entry_point() {
        let detail = ResourceDetail(Resource::EntryPoint(EntryPoint {
            name: "websecure".into(),
            address: ":443".into(),
            status: ResourceStatus::Enabled,
        }));

        let out = OutputFormat::default().to_string(&detail).unwrap();

        assert!(out.starts_with("websecure\n"));
        assert!(out.contains("Address:      :443"));
    }

    #[test]
    fn detail_json_is_bare_resource() {
        let out = OutputFormat::new(Format::Json)
            .to_string(&ResourceDetail(router()))
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(json["priority"], 10);
        assert_eq!(json["entryPoints"][0], "traefik");
    }

    #[test]
    fn truncate_long_string() {
        assert_eq!(truncate("hello world", 8), "hello...");
        assert_eq!(truncate("hello", 5), "hello");
        assert_eq!(truncate("hello", 3), "hel");
    }
}
