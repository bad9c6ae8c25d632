//! `sqt stations` command - Show the station catalog used for sheet matching

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;

#[derive(clap::Args, Debug)]
pub struct StationsArgs {
    /// Check the catalog for ambiguous (overlapping) match keys
    #[arg(long)]
    pub check: bool,
}

pub fn run(args: StationsArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let catalog = config.catalog(global.stations.as_deref())?;

    if args.check {
        let overlaps = catalog.overlapping_keys();
        if overlaps.is_empty() {
            println!("{} No overlapping station keys.", style("✓").green());
            return Ok(());
        }
        for (a, b) in &overlaps {
            println!(
                "{} '{}' overlaps '{}'",
                style("⚠").yellow(),
                style(a).cyan(),
                style(b).cyan()
            );
        }
        return Err(miette::miette!(
            "{} overlapping station key pair(s); sheet matching depends on catalog order",
            overlaps.len()
        ));
    }

    if global.format == OutputFormat::Json {
        let names: Vec<&str> = catalog.names().collect();
        println!("{}", serde_json::to_string_pretty(&names).into_diagnostic()?);
        return Ok(());
    }

    for (index, name) in catalog.names().enumerate() {
        println!("{:>2}  {}", index + 1, style(name).cyan());
    }

    if !global.quiet {
        println!();
        println!("{} station(s)", style(catalog.len()).cyan());
    }

    Ok(())
}
