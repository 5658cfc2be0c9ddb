#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]

use std::env;
use std::path::PathBuf;

use dtf_tester::config::{Overrides, SystemEnv, discover_settings};

// Prints the settings source (empty line for built-in defaults) and the
// resolved storage directory.
fn main() {
    let config_file = env::args().nth(1).map(PathBuf::from);
    match discover_settings(&Overrides {
        config_file,
        config_data: None,
    }) {
        Ok(ctx) => {
            match &ctx.source {
                Some(p) => println!("{}", p.display()),
                None => println!(),
            }
            println!("{}", ctx.storage_dir(&SystemEnv).display());
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    }
}
