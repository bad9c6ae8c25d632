use clap::Parser;
use miette::Result;
use sqt::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let mut global = cli.global;
    global.resolve_format(&sqt::core::Config::load());

    match cli.command {
        Commands::Analyze(args) => sqt::cli::commands::analyze::run(args, &global),
        Commands::Yield(args) => sqt::cli::commands::yields::run(args, &global),
        Commands::Cpk(args) => sqt::cli::commands::cpk::run(args, &global),
        Commands::Stations(args) => sqt::cli::commands::stations::run(args, &global),
        Commands::Completions(args) => sqt::cli::commands::completions::run(args),
    }
}
