use clap::Parser;
use miette::Result;
use taskfmt::cli::{logging, Cli, Commands};

fn main() -> Result<()> {
    // Reset SIGPIPE so piping previews into `head` exits quietly
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
    let global = cli.global;
    logging::init(&global);

    match cli.command {
        Commands::Format(args) => taskfmt::cli::commands::format::run(args, &global),
        Commands::Preview(args) => taskfmt::cli::commands::preview::run(args, &global),
        Commands::Config(cmd) => taskfmt::cli::commands::config::run(cmd, &global),
        Commands::Completions(args) => taskfmt::cli::commands::completions::run(args),
    }
}
