//! A subcommand making sure the configuration and the data are fine. Useful
//! to find problems before actually starting the server.

use crate::{
    args,
    load_config_and_init_logger,
    model::Store,
    prelude::*,
};


pub(crate) fn run(shared: &args::Shared, args: &args::Args) -> Result<()> {
    let config = load_config_and_init_logger(shared, args)
        .context("failed to load config: cannot proceed with `check` command")?;

    info!("Starting to verify various things...");
    let store = Store::load(&config.data);
    let socket_dir = check_unix_socket_dir(config.http.unix_socket.as_deref());
    info!("Done verifying various things");


    // Print summary after all log output
    let mut any_errors = false;
    println!();
    bunt::println!("{$bold+blue+intense}Summary{/$}");
    println!();
    print_outcome(&mut any_errors, "Load configuration", &Ok(()));
    print_outcome(&mut any_errors, "Load books and posts", &store);
    print_outcome(&mut any_errors, "Directory of unix socket", &socket_dir);

    println!();
    if any_errors {
        bunt::println!("{$red+intense}➡  Errors have occured!{/$}");
        std::process::exit(1);
    } else {
        bunt::println!("{$green+intense}⮕  Everything OK{/$} \
            {$dimmed}(Folio probably works in this environment){/$}");
        Ok(())
    }
}

fn print_outcome<T>(any_errors: &mut bool, label: &str, result: &Result<T>) {
    match result {
        Ok(_) => {
            bunt::println!(" ▸ {[bold+intense]}  {$green+bold}✔ ok{/$}", label);
        }
        Err(e) => {
            *any_errors = true;
            bunt::println!(" ▸ {[bold+intense]}  {$red+bold}✘ error{/$}", label);
            bunt::println!("      {$red}▶▶▶ {$bold}Error:{/$}{/$} {[yellow+intense]}", e);
            println!();
            bunt::println!("      {$red+italic}Caused by:{/$}");

            for (i, cause) in e.chain().skip(1).enumerate() {
                print!("       {: >1$}", "", i * 2);
                println!("‣ {cause}");
            }
            println!();
        }
    }
}

/// The socket file itself is created on startup, but its directory has to
/// exist already.
fn check_unix_socket_dir(socket: Option<&std::path::Path>) -> Result<()> {
    let Some(dir) = socket.and_then(|s| s.parent()).filter(|d| !d.as_os_str().is_empty()) else {
        return Ok(());
    };

    debug!("Checking that '{}' is a directory...", dir.display());
    if !dir.is_dir() {
        bail!("'{}' does not exist or is not a directory", dir.display());
    }

    Ok(())
}
