#![deny(warnings)]

use anyhow::Context;
use clap::Parser;
use ora_core::companion::{Companion, Reply};
use ora_core::config::{
    resolve_history_capacity, resolve_optional_string, resolve_output_format, AppConfig, Env,
    OutputFormat, StdEnv, ENV_LEXICON_PATH,
};
use ora_core::emotion::{
    EmotionAnalyzer, IntensityPolicy, DEFAULT_INTENSITY_BASE, DEFAULT_INTENSITY_NO_MATCH,
    DEFAULT_INTENSITY_STEP,
};
use ora_core::session::{Session, SessionSummary};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ora")]
#[command(about = "Keyword emotion classification with supportive replies")]
struct Args {
    /// Classify a single utterance instead of reading lines from stdin.
    #[arg(long)]
    text: Option<String>,

    /// JSON lexicon overriding the built-in trigger words.
    #[arg(long)]
    lexicon: Option<String>,

    /// Turns kept for the session summary.
    #[arg(long)]
    history: Option<usize>,

    /// Output format: text or json.
    #[arg(long)]
    format: Option<String>,

    #[arg(long, default_value_t = DEFAULT_INTENSITY_BASE)]
    intensity_base: f32,

    #[arg(long, default_value_t = DEFAULT_INTENSITY_STEP)]
    intensity_step: f32,

    #[arg(long, default_value_t = DEFAULT_INTENSITY_NO_MATCH)]
    intensity_no_match: f32,

    /// Print the session summary after stdin is exhausted.
    #[arg(long)]
    summary: bool,

    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    let text = args.text.clone();
    let print_summary = args.summary;
    let env = StdEnv;
    let cfg = build_config(args, &env)?;

    tracing::info!(
        lexicon = ?cfg.lexicon_path,
        history = cfg.history.get(),
        format = %cfg.output,
        "config loaded"
    );

    let companion = Companion::from_config(&cfg).context("failed to load lexicon")?;
    let mut session = Session::new(cfg.history);

    match text {
        Some(text) => {
            let reply = companion.handle(&mut session, &text);
            println!("{}", render_reply(&reply, cfg.output)?);
        }
        None => {
            run_stdin(&companion, &mut session, cfg.output).await?;
            if print_summary {
                println!("{}", render_summary(&session.summary(), cfg.output)?);
            }
        }
    }

    Ok(())
}

async fn run_stdin<A: EmotionAnalyzer>(
    companion: &Companion<A>,
    session: &mut Session,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let reply = companion.handle(session, line);
        println!("{}", render_reply(&reply, format)?);
    }
    tracing::debug!(turns = session.turn_count(), "stdin closed");
    Ok(())
}

fn init_tracing(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(
            level
                .parse()
                .with_context(|| format!("invalid --log-level: {level}"))?,
        )
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn build_config(args: Args, env: &impl Env) -> anyhow::Result<AppConfig> {
    let lexicon_path = resolve_optional_string(args.lexicon, ENV_LEXICON_PATH, env)
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);
    let intensity = IntensityPolicy::new(
        args.intensity_base,
        args.intensity_step,
        args.intensity_no_match,
    )?;
    let history = resolve_history_capacity(args.history, env)?;
    let output = resolve_output_format(args.format, env)?;

    Ok(AppConfig {
        lexicon_path,
        intensity,
        history,
        output,
    })
}

fn render_reply(reply: &Reply, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(reply)?),
        OutputFormat::Text => {
            let classification = &reply.classification;
            let mut out = format!(
                "{} ({:.2})",
                classification.emotion(),
                classification.intensity()
            );
            if let Some(response) = &reply.response {
                out.push_str("\n  ");
                out.push_str(&response.message);
                if let Some(resources) = &response.resources {
                    for hotline in &resources.hotlines {
                        out.push_str(&format!("\n  {}: {}", hotline.region, hotline.number));
                    }
                    out.push_str(&format!("\n  {}", resources.emergency));
                }
            }
            Ok(out)
        }
    }
}

fn render_summary(summary: &SessionSummary, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(summary)?),
        OutputFormat::Text => Ok(format!(
            "turns: {}, dominant: {}, risk: {}",
            summary.turn_count, summary.dominant_emotion, summary.current_risk_level
        )),
    }
}
