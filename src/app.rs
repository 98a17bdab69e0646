use std::io;

use anyhow::{anyhow, Result};

use crate::{
    cli::{Cli, Command},
    domain,
    infra::{self, error::AppError},
    ui,
    usecases::{self, bootstrap, context::AppContext},
};

const GROUPS_COMMAND_FAILED: &str = "APP_GROUPS_COMMAND_FAILED";

pub fn run(cli: Cli) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("discovery-chat")
        .build()
        .map_err(AppError::RuntimeStart)?;

    runtime.block_on(run_command(cli))
}

async fn run_command(cli: Cli) -> Result<()> {
    let context = bootstrap::bootstrap(cli.config.as_deref(), cli.email.as_deref()).await?;

    tracing::debug!(
        ui = ui::module_name(),
        domain = domain::module_name(),
        usecases = usecases::module_name(),
        infra = infra::module_name(),
        "module boundaries loaded"
    );

    match cli.command_or_default() {
        Command::Run => ui::shell::start(&context).await?,
        Command::Groups => print_groups(&context).await?,
    }

    Ok(())
}

async fn print_groups(context: &AppContext) -> Result<()> {
    match context.session.load_groups().await {
        Ok(_) => {
            ui::shell::print_groups(&mut io::stdout(), &context.session.groups())?;
            Ok(())
        }
        Err(error) => {
            tracing::error!(code = GROUPS_COMMAND_FAILED, error = ?error, "groups command failed");
            Err(anyhow!("{GROUPS_COMMAND_FAILED}: {}", error.user_message()))
        }
    }
}
