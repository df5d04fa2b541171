//! List command implementation.

use std::io::Write;
use std::sync::Arc;

use lens_client::{PageFetcher, PagedLoader};
use tracing::debug;

use crate::cli::ListArgs;
use crate::error::CliError;
use crate::output::{OutputFormat, ResourceList};

/// List command executor.
pub struct ListCommand {
    fetcher: Arc<dyn PageFetcher>,
}

impl ListCommand {
    /// Create a new list command.
    #[must_use]
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }

    /// Execute the list command.
    ///
    /// # Errors
    ///
    /// Returns an error if a page cannot be fetched or output fails.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        args: &ListArgs,
    ) -> Result<(), CliError> {
        let list = self.fetch(args).await?;
        format.write(writer, &list)?;
        Ok(())
    }

    /// Fetch the first page, or every page with `--all`.
    ///
    /// # Errors
    ///
    /// Returns an error if a page cannot be fetched.
    pub async fn fetch(&self, args: &ListArgs) -> Result<ResourceList, CliError> {
        let mut loader = PagedLoader::new(self.fetcher.clone(), args.kind, args.query(), args.per_page);

        if args.all {
            loader.load_all().await?;
        } else {
            loader.load_next().await?;
        }

        let state = loader.into_state();
        debug!(kind = %args.kind, items = state.items().len(), end = state.end_reached(), "listed");

        let next_page = (!state.end_reached()).then(|| state.next_page().get());
        let total = state.total();
        let mut list = ResourceList::new(args.kind, state.into_items());
        list.total = total;
        list.next_page = next_page;
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands, Format};
    use clap::Parser;
    use lens_mock::InMemoryFetcher;
    use lens_mock::collection::MockCollection;
    use lens_mock::fixtures::numbered_fixture;
    use lens_proto::ResourceKind;

    fn command() -> ListCommand {
        ListCommand::new(Arc::new(InMemoryFetcher::from_collections(vec![
            MockCollection::new(
                ResourceKind::HttpServices,
                numbered_fixture(ResourceKind::HttpServices, 25),
            ),
        ])))
    }

    fn args(argv: &[&str]) -> ListArgs {
        let mut full = vec!["lens", "list"];
        full.extend_from_slice(argv);
        match Cli::parse_from(full).command {
            Commands::List(args) => args,
            _ => panic!("expected list command"),
        }
    }

    #[tokio::test]
    async fn first_page_only_by_default() {
        let list = command()
            .fetch(&args(&["http/services", "--per-page", "10"]))
            .await
            .unwrap();

        assert_eq!(list.items.len(), 10);
        assert_eq!(list.total, Some(25));
        assert_eq!(list.next_page, Some(2));
    }

    #[tokio::test]
    async fn all_pages_with_flag() {
        let list = command()
            .fetch(&args(&["http/services", "--per-page", "10", "--all"]))
            .await
            .unwrap();

        assert_eq!(list.items.len(), 25);
        assert_eq!(list.next_page, None);
    }

    #[tokio::test]
    async fn filters_are_applied() {
        let list = command()
            .fetch(&args(&["http/services", "--status", "warning", "--all"]))
            .await
            .unwrap();

        assert_eq!(list.items.len(), 5);
        assert!(list.items.iter().all(|r| r.status() == lens_proto::ResourceStatus::Warning));
    }

    #[tokio::test]
    async fn execute_writes_table() {
        let mut buf = Vec::new();

        command()
            .execute(&mut buf, &OutputFormat::new(Format::Table), &args(&["http/services", "--search", "item-2"]))
            .await
            .expect("should execute");

        let output = String::from_utf8(buf).expect("valid utf8");
        assert!(output.contains("item-20"));
        assert!(output.contains("Showing 6 of 6"));
    }

    #[tokio::test]
    async fn empty_collection_lists_nothing() {
        let list = command().fetch(&args(&["udp/routers"])).await.unwrap();

        assert!(list.items.is_empty());
        assert_eq!(list.next_page, None);
    }
}
