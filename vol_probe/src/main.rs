use config::Config;

mod args;
mod config;
mod file;
mod generators;
mod header;
mod probe;
mod render;
mod scene;

use crate::{args::get_command, generators::generate_vol, probe::probe, render::render};

pub fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = get_command().get_matches();

    let cfg = match Config::from_args(args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            return;
        }
    };

    let result = match &cfg {
        Config::Generate(c) => generate_vol(c),
        Config::Render(c) => render(c),
        Config::Vmi(c) => probe(c),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
