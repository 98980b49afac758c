//! CLI argument definitions for `mediaplay`.

use clap::{Arg, Command};

/// Build the CLI argument parser.
pub fn build_cli() -> Command {
    Command::new("mediaplay")
        .version("0.1.0")
        .about("Play a video/audio file and report playback status")
        .arg_required_else_help(true)
        .arg(
            Arg::new("INPUT")
                .help("The input file path, or - to use standard input")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("seek")
                .long("seek")
                .value_name("SECONDS")
                .help("Seek to the given position in seconds once playback starts"),
        )
        .arg(
            Arg::new("volume")
                .long("volume")
                .value_name("0-100")
                .default_value("100")
                .help("Initial playback volume"),
        )
        .arg(
            Arg::new("max-packet-buffer-mib")
                .long("max-packet-buffer-mib")
                .value_name("MIB")
                .help("Maximum combined packet queue size, in MiB"),
        )
        .arg(
            Arg::new("max-buffer-duration-secs")
                .long("max-buffer-duration-secs")
                .value_name("SECONDS")
                .help("Maximum combined packet queue duration, in seconds"),
        )
        .arg(
            Arg::new("max-frame-queue-size")
                .long("max-frame-queue-size")
                .value_name("COUNT")
                .help("Maximum number of decoded frames buffered per stream"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("error|warn|info|debug|trace (falls back to RUST_LOG, then info)"),
        )
}
