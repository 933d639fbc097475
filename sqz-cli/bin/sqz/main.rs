//! Multi-algorithm compression utility
//!
//! Compresses and decompresses files or piped data through pluggable
//! codec backends. Silent on success; failures are reported on stderr
//! with a non-zero exit code.

use std::process;

mod opts;

use clap::Parser;

use opts::SqzOpts;
use sqz_cli::{run, LocalFiles};
use sqz_core::CodecRegistry;

const PROGRAM_NAME: &str = "sqz";

fn main() {
    env_logger::init();

    let opts = SqzOpts::parse();
    let command = opts.command.name();
    let config = opts.command.into_config();

    let registry = CodecRegistry::with_builtin();
    if let Err(err) = run(&config, &registry, &LocalFiles) {
        eprintln!("{PROGRAM_NAME}: {command}: {err}");
        process::exit(1);
    }
}
