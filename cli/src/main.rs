//! `mediaplay`: a thin command-line front-end over `mediaplay-core`.

use log::error;

mod cli;
mod logging;
mod runner;

fn main() {
    let args = cli::args::build_cli().get_matches();
    logging::init(args.get_one::<String>("log-level").map(String::as_str));

    let code = match runner::run(&args) {
        Ok(code) => code,
        Err(err) => {
            error!("{}", err.to_string().to_lowercase());
            1
        }
    };

    std::process::exit(code)
}
