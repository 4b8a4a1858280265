use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use clap::Parser;

use audiolift::diagnostics;

/// Print what audiolift sees of its environment, for installation bug reports.
#[derive(Parser, Debug)]
#[command(name = "audiolift-doctor")]
#[command(about = "Print environment diagnostics for audiolift")]
struct Params {
    /// Emit the report as JSON instead of text.
    #[arg(long = "json", default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    let params = Params::parse();
    let report = diagnostics::collect();

    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());

    if params.json {
        serde_json::to_writer_pretty(&mut writer, &report).context("failed to encode report")?;
        writeln!(writer)?;
    } else {
        report.render(&mut writer).context("failed to write report")?;
    }

    writer.flush()?;
    Ok(())
}
