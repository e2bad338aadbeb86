use std::ffi::OsString;
use std::path::Path;
use std::sync::Arc;

use clap::{ArgMatches, CommandFactory, FromArgMatches};
use tracing::{info, warn};

use stochast::args::{DEFAULT_CONFIG_FILES, LoadArgs, OutputFormat};
use stochast::config::{apply_config, load_config, resolve_run_config};
use stochast::engine::{RunSummary, Scheduler};
use stochast::error::AppResult;
use stochast::http::{HttpDispatcher, HttpSettings, build_client, validate_headers};
use stochast::metrics::{CountingSink, FanoutSink, TracingSink, open_jsonl_sink};
use stochast::report::{OutcomeLogStats, ReportExtras, SummaryJson, summary_lines};

/// Outcome records buffered between the virtual users and the log writer.
const OUTCOME_CHANNEL_CAPACITY: usize = 16_384;

pub(crate) fn run() -> AppResult<()> {
    let Some((cli_args, matches)) = parse_args()? else {
        return Ok(());
    };
    let args = merge_config(cli_args, &matches)?;

    crate::logger::init_logging(args.verbose, args.no_color);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(args))
}

/// Applies the config file before anything consumes the arguments, logging
/// setup included.
fn merge_config(mut args: LoadArgs, matches: &ArgMatches) -> AppResult<LoadArgs> {
    if let Some(config) = load_config(args.config.as_deref())? {
        apply_config(&mut args, matches, &config)?;
    }
    Ok(args)
}

fn parse_args() -> AppResult<Option<(LoadArgs, ArgMatches)>> {
    let mut cmd = LoadArgs::command();
    let raw_args: Vec<OsString> = std::env::args_os().collect();

    if should_show_help(&raw_args) {
        cmd.print_help()?;
        println!();
        return Ok(None);
    }

    let matches = cmd.get_matches_from(raw_args);
    let args = LoadArgs::from_arg_matches(&matches)?;

    Ok(Some((args, matches)))
}

fn should_show_help(raw_args: &[OsString]) -> bool {
    let treat_as_empty =
        matches!(raw_args, [] | [_]) || matches!(raw_args, [_, second] if second == "--");
    if !treat_as_empty {
        return false;
    }

    !DEFAULT_CONFIG_FILES
        .iter()
        .any(|path| Path::new(path).exists())
}

async fn run_async(args: LoadArgs) -> AppResult<()> {
    let run_config = resolve_run_config(&args)?;
    validate_headers(&run_config.target().headers)?;

    let settings = HttpSettings::from_args(&args);
    let client = build_client(&settings)?;
    let dispatcher = Arc::new(HttpDispatcher::new(client, settings.expected_status));

    let counting = Arc::new(CountingSink::default());
    let mut sink = FanoutSink::default()
        .with(counting.clone())
        .with(Arc::new(TracingSink));
    let outcome_log = match args.output.as_deref() {
        Some(path) => {
            let (jsonl, writer) =
                open_jsonl_sink(Path::new(path), OUTCOME_CHANNEL_CAPACITY).await?;
            sink = sink.with(jsonl.clone());
            Some((jsonl, writer))
        }
        None => None,
    };

    info!(
        "Running {} virtual users against {} {}",
        run_config.user_count(),
        run_config.target().method.as_str(),
        run_config.target().url
    );
    let summary = Scheduler::new(run_config, dispatcher, Arc::new(sink))
        .run()
        .await?;

    let outcome_log = match outcome_log {
        Some((jsonl, writer)) => {
            let report = writer.finish().await?;
            let dropped = jsonl.dropped();
            if dropped > 0 || report.write_failures > 0 {
                warn!(
                    "Outcome log incomplete: {} records dropped, {} write failures",
                    dropped, report.write_failures
                );
            }
            Some(OutcomeLogStats { report, dropped })
        }
        None => None,
    };
    let extras = ReportExtras {
        recorded: counting.counts(),
        outcome_log,
    };

    print_summary(&summary, &extras, args.output_format)
}

fn print_summary(
    summary: &RunSummary,
    extras: &ReportExtras,
    format: OutputFormat,
) -> AppResult<()> {
    match format {
        OutputFormat::Text => {
            for line in summary_lines(summary, extras) {
                println!("{}", line);
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&SummaryJson::new(summary, extras))?;
            println!("{}", json);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn merged(config: &str, extra: &[&str]) -> Result<LoadArgs, String> {
        let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
        let path = dir.path().join("run.toml");
        std::fs::write(&path, config).map_err(|err| format!("write failed: {}", err))?;
        let path_arg = path.to_string_lossy().into_owned();

        let mut argv = vec!["stochast", "--config", path_arg.as_str()];
        argv.extend_from_slice(extra);
        let matches = LoadArgs::command()
            .try_get_matches_from(argv)
            .map_err(|err| format!("parse failed: {}", err))?;
        let args =
            LoadArgs::from_arg_matches(&matches).map_err(|err| format!("from matches: {}", err))?;
        merge_config(args, &matches).map_err(|err| format!("merge failed: {}", err))
    }

    #[test]
    fn config_no_color_reaches_logging_setup() -> Result<(), String> {
        let args = merged("url = \"http://localhost\"\nno_color = true\n", &[])?;
        if !args.no_color {
            return Err("no_color from the config file was not applied".to_owned());
        }
        if args.url.as_deref() != Some("http://localhost") {
            return Err(format!("Unexpected url {:?}", args.url));
        }
        Ok(())
    }

    #[test]
    fn merge_reports_config_errors_before_logging() -> Result<(), String> {
        match merged("users = 0\n", &[]) {
            Err(message) if message.contains("User count") => Ok(()),
            other => Err(format!("Expected a user count error, got {:?}", other)),
        }
    }
}
