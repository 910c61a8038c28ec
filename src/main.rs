//! The Folio GraphQL server.

use clap::{FromArgMatches, CommandFactory};
use std::{env, sync::Arc};

use crate::{
    args::{Args, Command},
    config::Config,
    model::Store,
    prelude::*,
};

mod api;
mod args;
mod cmd;
mod config;
mod http;
mod logger;
mod model;
mod paginate;
mod prelude;
mod version;


#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        // Log error in case stdout is not connected and it is logged into a file.
        error!("{:?}", e);

        // Show a somewhat nice representation of the error
        eprintln!();
        eprintln!();
        bunt::eprintln!("{$red}▶▶▶ {$bold}Error:{/$}{/$} {[yellow+intense]}", e);
        eprintln!();
        if e.chain().len() > 1 {
            bunt::eprintln!("{$red+italic}Caused by:{/$}");
        }

        for (i, cause) in e.chain().skip(1).enumerate() {
            eprint!(" {: >1$}", "", i * 2);
            eprintln!("‣ {cause}");
        }

        std::process::exit(1);
    }
}

/// Main entry point.
async fn run() -> Result<()> {
    // If `RUST_BACKTRACE` wasn't already set, we default to `1`. We don't
    // expect panics to occur regularly and the backtrace is almost always
    // useful when they do.
    if env::var("RUST_BACKTRACE") == Err(env::VarError::NotPresent) {
        env::set_var("RUST_BACKTRACE", "1");
    }

    // Parse CLI args. This is a bit roundabout because we want to override
    // the version using some runtime code.
    let args = Args::from_arg_matches(
        &Args::command()
            .version(version::full())
            .get_matches(),
    )?;

    // Configure output via `bunt`
    bunt::set_stdout_color_choice(args.stdout_color());
    bunt::set_stderr_color_choice(args.stderr_color());


    // Dispatch subcommand.
    match &args.cmd {
        Command::Serve { shared } => {
            let config = load_config_and_init_logger(shared, &args)?;
            start_server(config).await?;
        }
        Command::Check { shared } => cmd::check::run(shared, &args)?,
        Command::WriteConfig { target } => config::write_template(target.as_ref())?,
        Command::ExportApiSchema { args } => cmd::export_api_schema::run(args)?,
    }

    Ok(())
}

async fn start_server(config: Config) -> Result<()> {
    info!("Starting Folio {} ...", version::identifier());
    trace!("Configuration: {:#?}", config);

    let store = Store::load(&config.data)
        .context("failed to load books and posts")?
        .pipe(Arc::new);
    let ctx = http::Context {
        api_root: api::root_node(),
        api: api::Context {
            store,
            config: Arc::new(config.api.clone()),
        },
        log_headers: config.log.log_http_headers,
    };

    http::serve(&config.http, ctx).await.context("failed to start HTTP server")?;

    Ok(())
}

fn load_config_and_init_logger(shared: &args::Shared, args: &Args) -> Result<Config> {
    // Load configuration.
    let (config, path) = match &shared.config {
        Some(path) => {
            let config = Config::load_from(path)
                .context(format!("failed to load config from '{}'", path.display()))?;
            (config, Some(path.clone()))
        }
        None => Config::from_env_or_default_locations()?,
    };

    // Initialize logger. Unfortunately, we can only do this here
    // after reading the config.
    logger::init(&config.log, args.stdout_color())?;
    match path {
        Some(path) => info!("Loaded config from '{}'", path.display()),
        None => info!("No configuration file found, using default values"),
    }

    Ok(config)
}
