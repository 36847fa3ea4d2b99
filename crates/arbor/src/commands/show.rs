//! `arbor show` command implementation.

use arbor_client::SitePath;
use arbor_view::{ContentState, Session};
use clap::Args;

use super::{BackendArgs, backend};
use crate::error::CliError;
use crate::output::Output;
use crate::screen::render_screen;

/// Arguments for the show command.
#[derive(Args)]
pub(crate) struct ShowArgs {
    /// Site path to resolve, e.g. /news.
    path: String,

    #[command(flatten)]
    backend: BackendArgs,
}

impl ShowArgs {
    /// Execute the show command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the path is invalid, or the
    /// content area could not be resolved.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.backend.load_config(None, None)?;
        let path = SitePath::parse(&self.path)?;

        let mut session = Session::new(backend(&config), config.view.max_redirects);
        session.navigate(path.clone());
        session.settle().await;

        if let Some(settled) = session.current_path()
            && *settled != path
        {
            output.hint(&format!("{path} -> {settled}"));
        }
        output.page(&render_screen(session.layout()).text);

        if let ContentState::Failed(e) = session.layout().content().state() {
            return Err(CliError::Content(e.to_string()));
        }
        Ok(())
    }
}
