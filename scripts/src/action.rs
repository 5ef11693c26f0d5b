use clap::{Args, Parser, Subcommand};
use envconfig::Envconfig;
use std::path::PathBuf;

use crate::{config, utils};

#[derive(Args, Debug, Clone)]
pub struct RuntimeConfigArgs {
    #[arg(short, long, default_value = "web_app/runtime-config.json")]
    file: PathBuf,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Action {
    /// Write the runtime config from SUPABASE_URL, SUPABASE_ANON_KEY and ENV
    GenRuntimeConfig(RuntimeConfigArgs),
    /// Fail when the runtime config is unreadable or still has placeholders
    CheckRuntimeConfig(RuntimeConfigArgs),
}

/// Build and deploy helpers of the pet mood app
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct AppArgs {
    #[command(subcommand)]
    pub action: Action,
}

impl AppArgs {
    pub fn run(&self) -> anyhow::Result<()> {
        match &self.action {
            Action::GenRuntimeConfig(RuntimeConfigArgs { file }) => {
                let runtime_config: config::RuntimeConfig =
                    config::BuildConfig::init_from_env()?.into();

                for name in runtime_config.missing_values() {
                    eprintln!("warning: {name} not configured, writing a placeholder");
                }
                utils::write_runtime_config(file, &runtime_config)?;
                println!("runtime config written to {}", file.display());

                Ok(())
            }
            Action::CheckRuntimeConfig(RuntimeConfigArgs { file }) => {
                let runtime_config = utils::read_runtime_config(file)?;
                let missing = runtime_config.missing_values();
                if !missing.is_empty() {
                    anyhow::bail!("not configured: {}", missing.join(", "));
                }
                println!("runtime config ok ({})", runtime_config.env);

                Ok(())
            }
        }
    }
}
