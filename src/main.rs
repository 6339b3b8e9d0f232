mod config;
mod diff;
mod pr;
mod report;
mod tools;

use clap::Parser;
use serde_json::{json, Value};
use std::path::PathBuf;
use tracing::{debug, info, info_span};
use tracing_subscriber::EnvFilter;

use pr::{BitbucketClient, DiffSource, FileDiffSource};
use report::OutputFormat;

/// Bitbucket PR tools: fetch a pull request diff from Bitbucket Server and
/// cut oversized files down to a head and tail window.
#[derive(Parser, Debug)]
#[command(name = "bitbucket-pr-tools", version, about)]
struct Cli {
    /// Pull request URL
    /// (e.g., https://bitbucket.example.com/projects/CORE/repos/api/pull-requests/42)
    #[arg(conflicts_with_all = ["args", "diff_file"])]
    pr_url: Option<String>,

    /// Raw JSON arguments for the get_pull_request_diff tool
    /// (e.g., '{"repository":"api","prId":42}')
    #[arg(long, conflicts_with = "diff_file")]
    args: Option<String>,

    /// Truncate a diff saved on disk instead of fetching one (no server needed)
    #[arg(long)]
    diff_file: Option<PathBuf>,

    /// Per-file content-line cap; 0 shows the complete diff
    #[arg(long)]
    max_lines_per_file: Option<usize>,

    /// Context lines around each change
    #[arg(long)]
    context_lines: Option<u32>,

    /// Optional output file path for the diff
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the tool response as JSON instead of raw diff text
    #[arg(long)]
    json: bool,

    /// Config file (defaults to .bitbucket-pr-tools.toml in the current directory)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    info!("loading configuration");
    let config = config::Config::load(cli.config.as_deref())?;
    let settings = tools::DiffSettings::from(&config);

    let (source, args): (Box<dyn DiffSource>, Value) = if let Some(path) = &cli.diff_file {
        info!(path = %path.display(), "using local diff file");
        let source: Box<dyn DiffSource> = Box::new(FileDiffSource::new(path.clone()));
        (source, json!({ "project": "LOCAL", "repository": "local", "prId": 1 }))
    } else if let Some(raw) = &cli.args {
        let args: Value = serde_json::from_str(raw)?;
        let source: Box<dyn DiffSource> = Box::new(BitbucketClient::from_config(&config, None)?);
        (source, args)
    } else {
        let pr_url = cli.pr_url.as_deref().ok_or(
            "a PR URL, --args or --diff-file is required. Usage: bitbucket-pr-tools <URL>",
        )?;
        let _url_span = info_span!("pr_url", pr_url = %pr_url).entered();

        info!("parsing PR URL");
        let parsed = pr::parse_pr_url(pr_url)?;
        debug!(base_url = %parsed.base_url, pr = %parsed.to_ref(), "parsed PR URL");
        let args = json!({
            "project": parsed.project,
            "repository": parsed.repository,
            "prId": parsed.pr_id,
        });
        let source: Box<dyn DiffSource> =
            Box::new(BitbucketClient::from_config(&config, Some(&parsed.base_url))?);
        (source, args)
    };

    let args = with_cli_overrides(args, &cli);

    info!(source = source.name(), "fetching pull request diff");
    let call = tools::call(tools::GET_PULL_REQUEST_DIFF, args, source.as_ref(), &settings).await?;
    info!(pr = %call.pr, files = call.truncated.files.len(), "diff fetched");

    let format = if cli.json { OutputFormat::Json } else { OutputFormat::Text };
    let built_report = report::build(call);
    report::output(&built_report, format, cli.output.as_deref())?;
    info!(truncated = built_report.truncated_count(), "done");

    Ok(())
}

/// Layer the CLI's numeric flags over the tool arguments.
fn with_cli_overrides(mut args: Value, cli: &Cli) -> Value {
    if let Value::Object(map) = &mut args {
        if let Some(n) = cli.max_lines_per_file {
            map.insert("maxLinesPerFile".to_string(), json!(n));
        }
        if let Some(n) = cli.context_lines {
            map.insert("contextLines".to_string(), json!(n));
        }
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_merge_into_args() {
        let cli = Cli::parse_from([
            "bitbucket-pr-tools",
            "--args",
            "{}",
            "--max-lines-per-file",
            "25",
            "--context-lines",
            "4",
        ]);
        let args = with_cli_overrides(json!({ "repository": "api", "prId": 2 }), &cli);
        assert_eq!(args["maxLinesPerFile"], 25);
        assert_eq!(args["contextLines"], 4);
        assert_eq!(args["repository"], "api");
    }

    #[test]
    fn test_cli_url_conflicts_with_diff_file() {
        let parsed = Cli::try_parse_from([
            "bitbucket-pr-tools",
            "https://bb.example.com/projects/CORE/repos/api/pull-requests/1",
            "--diff-file",
            "x.diff",
        ]);
        assert!(parsed.is_err());
    }

    #[tokio::test]
    async fn test_local_diff_file_end_to_end() {
        let cli = Cli::parse_from([
            "bitbucket-pr-tools",
            "--diff-file",
            concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/sample_pr.diff"),
            "--max-lines-per-file",
            "10",
        ]);
        let source = FileDiffSource::new(cli.diff_file.clone().unwrap());
        let args = with_cli_overrides(json!({ "project": "LOCAL", "repository": "local", "prId": 1 }), &cli);
        let call = tools::call(
            tools::GET_PULL_REQUEST_DIFF,
            args,
            &source,
            &tools::DiffSettings::default(),
        )
        .await
        .unwrap();
        assert_eq!(call.truncated.truncated_files().count(), 1);
        assert_eq!(call.budget, Some(10));
        let report = report::build(call);
        assert_eq!(report.hidden_lines(), 10);
    }
}
