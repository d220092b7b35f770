//! Command line front end for the `stepcheck` assertion engine.

mod cli;
mod output;

fn main() -> eyre::Result<()> {
    cli::run()
}
