//! Get command implementation.

use std::io::Write;
use std::sync::Arc;

use lens_client::PageFetcher;

use crate::cli::GetArgs;
use crate::error::CliError;
use crate::output::{OutputFormat, ResourceDetail};

/// Get command executor.
pub struct GetCommand {
    fetcher: Arc<dyn PageFetcher>,
}

impl GetCommand {
    /// Create a new get command.
    #[must_use]
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }

    /// Execute the get command.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::NotFound`] if the resource does not exist, or
    /// another error if the request or output fails.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        args: &GetArgs,
    ) -> Result<(), CliError> {
        let resource = self.fetcher.fetch_one(args.kind, &args.name).await?;
        format.write(writer, &ResourceDetail(resource))?;
        Ok(())
    }
}
