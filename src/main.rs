use clap::Parser;
use std::process;

use unitrack::cli::Args;
use unitrack::commands::{self, CommandContext};
use unitrack::config::Config;
use unitrack::ui::display_error;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match Config::from_env_and_args(&args) {
        Ok(config) => config,
        Err(e) => {
            display_error(&e.to_string());
            process::exit(1);
        }
    };

    let context = match CommandContext::from_config(config) {
        Ok(context) => context,
        Err(e) => {
            display_error(&e.to_string());
            process::exit(1);
        }
    };

    if let Err(e) = commands::run(&context, args.command).await {
        display_error(&e.to_string());
        process::exit(1);
    }
}
