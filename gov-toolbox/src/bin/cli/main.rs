mod publish;
mod report;

use color_eyre::Report;
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

#[derive(StructOpt)]
#[structopt(rename_all = "kebab-case")]
enum Cli {
    /// Fetch governance data, tally SPO voting power and write the report.
    Report(report::ReportCmd),
    /// Publish a generated report file to an existing GitHub Gist.
    Publish(publish::PublishCmd),
}

fn main() -> Result<(), Report> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match Cli::from_args() {
        Cli::Report(cmd) => cmd.exec(),
        Cli::Publish(cmd) => cmd.exec(),
    }
}
