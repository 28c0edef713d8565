use clap::Parser;

use ascii_noise::cli::{handle_config_action, run_render, Args, Command};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    match args.command {
        Command::Render(render) => {
            if let Err(e) = run_render(render).await {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Command::Config { action, config } => handle_config_action(action, config.as_deref()),
    }
}
