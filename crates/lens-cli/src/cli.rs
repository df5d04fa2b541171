//! Command-line argument parsing with clap.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use lens_client::config::DEFAULT_PER_PAGE;
use lens_proto::{ListQuery, ResourceKind, SortDirection, StatusFilter};

/// Lens - proxy dashboard collections from the command line.
#[derive(Parser, Debug, Clone)]
#[command(name = "lens")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the proxy API.
    #[arg(short, long, env = "LENS_API_URL", default_value = "http://localhost:8080")]
    pub api: String,

    /// Request timeout in seconds.
    #[arg(long, env = "LENS_TIMEOUT", default_value_t = 30)]
    pub timeout: u64,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    pub format: Format,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, env = "LENS_LOG_JSON")]
    pub log_json: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON output for scripting.
    Json,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List a collection, e.g. `http/routers` or `entrypoints`.
    List(ListArgs),

    /// Show a single resource.
    Get(GetArgs),

    /// Serve the mock collection API.
    ServeMock(ServeMockArgs),
}

/// Arguments for the list command.
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Collection to list.
    pub kind: ResourceKind,

    /// Case-insensitive substring of the resource name.
    #[arg(short, long)]
    pub search: Option<String>,

    /// Status filter.
    #[arg(long, default_value_t = StatusFilter::All)]
    pub status: StatusFilter,

    /// Field to sort by.
    #[arg(long)]
    pub sort_by: Option<String>,

    /// Sort direction.
    #[arg(long)]
    pub direction: Option<SortDirection>,

    /// Items per page.
    #[arg(long, default_value_t = DEFAULT_PER_PAGE)]
    pub per_page: u32,

    /// Fetch every page instead of the first.
    #[arg(long)]
    pub all: bool,
}

impl ListArgs {
    /// The query these arguments describe.
    #[must_use]
    pub fn query(&self) -> ListQuery {
        let mut query = ListQuery::new().with_status(self.status);
        if let Some(search) = &self.search {
            query = query.with_search(search.as_str());
        }
        if let Some(field) = &self.sort_by {
            query = query.with_sort_by(field.as_str());
        }
        if let Some(direction) = self.direction {
            query = query.with_direction(direction);
        }
        query
    }
}

/// Arguments for the get command.
#[derive(Args, Debug, Clone)]
pub struct GetArgs {
    /// Collection the resource belongs to.
    pub kind: ResourceKind,

    /// Resource name, e.g. `api@internal`.
    pub name: String,
}

/// Arguments for the serve-mock command.
#[derive(Args, Debug, Clone)]
pub struct ServeMockArgs {
    /// Address to listen on.
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// JSON fixture file keyed by collection path.
    #[arg(long, conflicts_with = "items")]
    pub fixture: Option<PathBuf>,

    /// Generate this many numbered resources in every collection.
    #[arg(long)]
    pub items: Option<usize>,

    /// Default page size.
    #[arg(long, default_value_t = 100)]
    pub page_size: usize,

    /// Allowed CORS origin (repeatable; none allows all).
    #[arg(long = "cors-origin")]
    pub cors_origins: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_args_build_query() {
        let cli = Cli::parse_from([
            "lens", "list", "http/routers", "--search", "api", "--status", "warning", "--sort-by",
            "priority", "--direction", "desc",
        ]);
        let Commands::List(args) = cli.command else {
            panic!("expected list command");
        };

        assert_eq!(args.kind, ResourceKind::HttpRouters);
        assert_eq!(
            args.query(),
            ListQuery::new()
                .with_search("api")
                .with_status(StatusFilter::Warning)
                .with_sort_by("priority")
                .with_direction(SortDirection::Desc)
        );
        assert_eq!(args.per_page, DEFAULT_PER_PAGE);
        assert!(!args.all);
    }

    #[test]
    fn list_defaults_to_empty_query() {
        let cli = Cli::parse_from(["lens", "list", "entrypoints"]);
        let Commands::List(args) = cli.command else {
            panic!("expected list command");
        };

        assert_eq!(args.query(), ListQuery::new());
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let result = Cli::try_parse_from(["lens", "list", "grpc/routers"]);
        assert!(result.is_err());
    }

    #[test]
    fn serve_mock_fixture_conflicts_with_items() {
        let result = Cli::try_parse_from(["lens", "serve-mock", "--fixture", "f.json", "--items", "5"]);
        assert!(result.is_err());
    }

    #[test]
    fn serve_mock_defaults() {
        let cli = Cli::parse_from(["lens", "serve-mock"]);
        let Commands::ServeMock(args) = cli.command else {
            panic!("expected serve-mock command");
        };

        assert_eq!(args.bind.port(), 8080);
        assert_eq!(args.page_size, 100);
        assert!(args.fixture.is_none());
    }
}
