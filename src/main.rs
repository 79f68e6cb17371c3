use agent_log_timeline::cli::commands;
use agent_log_timeline::utils::default_log_filter;
use anyhow::Result;
use env_logger::Env;

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or(default_log_filter())).init();
    commands::run()
}
