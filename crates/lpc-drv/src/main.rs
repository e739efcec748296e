use lpc_drv::{CliError, Config, ConfigAction, Session, VERSION};

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let prog = args.first().cloned().unwrap_or_else(|| "lp".to_string());

    match try_main(&prog, &args[1.min(args.len())..]) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

/// Returns the exit code for the non-error paths (`--version`/`--help`
/// print to stdout/stderr directly and exit `0`); an `Err` always means
/// exit `1` with the error's `Display` on stderr, matching every
/// `E: ...` message this driver produces.
fn try_main(prog: &str, args: &[String]) -> anyhow::Result<i32> {
    let action = match Config::parse(args) {
        Ok(action) => action,
        Err(CliError::NoArguments) => {
            eprint!("{}", lpc_drv::usage(prog));
            return Ok(1);
        }
        Err(CliError::NoInput) => {
            anyhow::bail!("E: no input");
        }
    };

    let config = match action {
        ConfigAction::PrintVersion => {
            println!("Lambda Photon {VERSION}");
            return Ok(0);
        }
        ConfigAction::PrintHelp => {
            eprint!("{}", lpc_drv::usage(prog));
            return Ok(0);
        }
        ConfigAction::Run(config) => config,
    };

    init_logging(config.verbose);

    let mut session = Session::new();
    session.compile(&config)?;
    Ok(0)
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
