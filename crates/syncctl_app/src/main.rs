mod console;

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
enum CliMode {
    Run { config: Option<PathBuf> },
    Help,
}

fn parse_cli_mode<I>(args: I) -> anyhow::Result<CliMode>
where
    I: IntoIterator<Item = String>,
{
    let mut config = None;
    let mut args = args.into_iter().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => match args.next() {
                Some(path) => config = Some(PathBuf::from(path)),
                None => anyhow::bail!("--config needs a file path"),
            },
            "--help" | "-h" => return Ok(CliMode::Help),
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }
    Ok(CliMode::Run { config })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    match parse_cli_mode(std::env::args())? {
        CliMode::Help => {
            println!("Usage: syncctl [--config PATH]");
            println!("  --config PATH   Read settings from PATH instead of ./syncctl.ron");
            println!("  SYNCCTL_BASE_URL overrides the server base url");
            Ok(())
        }
        CliMode::Run { config } => console::run_app(config).await,
    }
}
