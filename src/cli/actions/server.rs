use crate::cli::{actions::Action, globals::GlobalArgs};
use crate::vetrina::new;
use anyhow::Result;

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server { port, backend_url } => {
            let globals = GlobalArgs::new(backend_url);

            new(port, &globals).await?;
        }
    }

    Ok(())
}
