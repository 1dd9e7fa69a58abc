use std::env;
use std::io::Write;

use clap::{crate_description, crate_version, Arg, ArgAction, ArgMatches, Command};
use snafu::prelude::*;

use webfaction_dns::common::{Credentials, EncodeSnafu, OverrideRecord, Result, UsageSnafu};
use webfaction_dns::service::{sequence, Report};
use webfaction_dns::Config;

const ACTIONS_HELP: &str = "\
Actions:
  create_dns_override domain[@ip-address] ...
      Creates or updates a DNS override. The domain must be created first.
      If the ip-address is omitted your current external IP is fetched.
  delete_dns_override domain[@ip-address] ...
      Deletes the DNS override. Without an ip-address every override
      for the domain is deleted.
  list_dns_overrides
      Lists the DNS overrides of the account.";

const LOG_TARGET: &str = "webfaction_dns";

/// Filter directives for the logger. `RUST_LOG` wins; otherwise
/// dependencies stay at warn and `-v` only raises this crate.
fn log_filters(rust_log: Option<String>, verbose: bool) -> String {
    match rust_log {
        Some(filters) => filters,
        None if verbose => format!("warn,{LOG_TARGET}=debug"),
        None => "warn".to_string(),
    }
}

fn setup_logger(verbose: bool) {
    let filters = log_filters(env::var("RUST_LOG").ok(), verbose);

    // Adapted from env_logger examples. <3 Systemd support
    let installed = match env::var("RUST_LOG_STYLE") {
        Ok(s) if s == "SYSTEMD" => {
            let mut builder = env_logger::Builder::new();
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "<{}>{}: {}",
                    match record.level() {
                        log::Level::Error => 3,
                        log::Level::Warn => 4,
                        log::Level::Info => 6,
                        log::Level::Debug => 7,
                        log::Level::Trace => 7,
                    },
                    record.target(),
                    record.args()
                )
            });
            builder.parse_filters(&filters).try_init()
        }
        _ => pretty_env_logger::formatted_builder()
            .parse_filters(&filters)
            .try_init(),
    };

    if let Err(err) = installed {
        tracing::debug!(error = %err, "Logger already installed");
    }
}

fn command() -> Command {
    Command::new("webfaction-dns")
        .about(crate_description!())
        .arg(
            Arg::new("verbose")
                .action(ArgAction::SetTrue)
                .short('v')
                .long("verbose")
                .help("Print almost everything that happens"),
        )
        .arg(
            Arg::new("json")
                .action(ArgAction::SetTrue)
                .long("json")
                .help("Print listed overrides as JSON"),
        )
        .arg(
            Arg::new("api-url")
                .long("api-url")
                .value_name("URL")
                .help("Webfaction XML-RPC endpoint"),
        )
        .arg(
            Arg::new("ip-lookup-url")
                .long("ip-lookup-url")
                .value_name("URL")
                .help("Page to fetch your external IP from"),
        )
        .arg(
            Arg::new("credentials")
                .value_name("USERNAME:PASSWORD[@MACHINE]")
                .help("Account login. The machine name is case-sensitive"),
        )
        .arg(
            Arg::new("actions")
                .value_name("ACTION")
                .num_args(1..)
                .help("Actions followed by their arguments"),
        )
        .after_help(ACTIONS_HELP)
        .version(crate_version!())
}

fn print_listing(records: &[OverrideRecord], json: bool) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(records)
            .boxed_local()
            .context(EncodeSnafu {
                message: "Failed to encode overrides",
            })?;
        println!("{out}");
        return Ok(());
    }

    for record in records {
        println!("{}\t{}", record.domain, record.ip.as_deref().unwrap_or("-"));
    }
    Ok(())
}

fn run(args: &ArgMatches) -> Result<()> {
    let credentials: Credentials = args
        .get_one::<String>("credentials")
        .context(UsageSnafu {
            message: "Username and password are not specified: username:password[@machine]",
        })?
        .parse()?;

    tracing::debug!(
        username = credentials.username.as_str(),
        machine = credentials.machine.as_deref(),
        "Using login"
    );

    let tokens = args
        .get_many::<String>("actions")
        .map(|tokens| tokens.collect::<Vec<_>>())
        .unwrap_or_default();
    let actions = sequence(tokens).collect::<Result<Vec<_>>>()?;
    ensure!(
        !actions.is_empty(),
        UsageSnafu {
            message: "No actions specified"
        }
    );

    let config = Config::with_overrides(
        args.get_one::<String>("api-url").map(String::as_str),
        args.get_one::<String>("ip-lookup-url").map(String::as_str),
    )?;

    let json = args.get_flag("json");
    config
        .into_service()
        .run(&credentials, actions, |report| match report {
            Report::Listed(records) => print_listing(&records, json),
            _ => Ok(()),
        })
}

/// Parses `argv`, applies the actions and returns the process exit code.
pub(crate) fn exit_code<I, T>(argv: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let mut cli = command();
    let args = match cli.clone().try_get_matches_from(argv) {
        Ok(args) => args,
        Err(err) => {
            // --help and --version land here with exit code 0.
            if let Err(print_err) = err.print() {
                tracing::warn!(error = %print_err, "Failed to print usage");
            }
            return err.exit_code();
        }
    };

    setup_logger(args.get_flag("verbose"));

    match run(&args) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{err}");
            if err.is_usage() {
                // Help goes to stdout, the error above to stderr.
                if let Err(print_err) = cli.print_help() {
                    tracing::warn!(error = %print_err, "Failed to print help");
                }
            } else {
                println!("For help use --help");
            }
            2
        }
    }
}

pub(crate) fn main() -> i32 {
    exit_code(env::args_os())
}
