use anyhow::Context;
use clap::Parser;
use config::MonitorConfig;
use disastercore::pipeline::{DashboardState, REFRESH_INTERVAL};
use run::{CycleResult, Runner};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;

mod config;
mod run;

#[derive(Parser)]
#[command(author, version, about = "Headless driver for the disaster map pipelines")]
struct Args {
    /// Load monitor settings from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value_t = 3.0)]
    min_magnitude: f64,
    #[arg(long, default_value_t = 50)]
    limit: u32,
    /// News feed API key (falls back to the NEWSAPI_KEY environment variable)
    #[arg(long)]
    news_key: Option<String>,
    /// Keep refreshing on the periodic interval until Ctrl+C
    #[arg(long, default_value_t = false)]
    watch: bool,
    /// Append a one-line cycle report to this file
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = if let Some(path) = args.config {
        MonitorConfig::load(path)?
    } else {
        MonitorConfig::from_args(args.min_magnitude, args.limit, args.news_key.clone())
    };

    let runner = Runner::new(config);
    let runtime = TokioBuilder::new_current_thread()
        .enable_all()
        .build()
        .context("creating monitor runtime")?;

    runtime.block_on(async {
        let mut state = DashboardState::new();
        let result = runner.cycle(&mut state).await;
        println!("{}", result.report_line());
        if let Some(path) = &args.report {
            append_report(path, &result)?;
        }

        if args.watch {
            let mut interval = tokio::time::interval(REFRESH_INTERVAL);
            // the first tick completes immediately and is already covered
            interval.tick().await;
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        let result = runner.cycle(&mut state).await;
                        println!("{}", result.report_line());
                        if let Some(path) = &args.report {
                            append_report(path, &result)?;
                        }
                    }
                    _ = signal::ctrl_c() => break,
                }
            }
        }
        Ok::<(), anyhow::Error>(())
    })?;

    Ok(())
}

fn append_report(path: &Path, result: &CycleResult) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(format!("{}\n", result.report_line()).as_bytes())?;
    Ok(())
}
