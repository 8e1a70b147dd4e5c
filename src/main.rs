use clap::Parser;
use log::*;

use pr_changelog::{
    Orchestrator, Result,
    cli::Args,
    forge::{github::Github, manager::ForgeManager},
    output::ActionOutput,
};

fn initialize_logger(debug: bool) -> Result<()> {
    let filter = if debug {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };

    let config = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("pr_changelog")
        .build();

    simplelog::TermLogger::init(
        filter,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    Ok(())
}

async fn run(args: &Args, output: &ActionOutput) -> Result<()> {
    let config = args.load_config()?;
    let options = config.run_options()?;
    let remote = args.get_remote()?;

    if remote.dry_run {
        warn!("dry_run: comments and labels will not be written");
    }

    let forge = ForgeManager::new(Box::new(Github::new(remote)?));
    let report = Orchestrator::new(forge, options).run().await?;

    info!(
        "processed {} pull requests",
        report.comment_ids.len()
    );

    output.set_output("time", &report.completion_time())?;
    output.set_output("changelog", &report.changelog)?;

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    initialize_logger(args.debug)?;

    let output = ActionOutput::from_env();

    if let Err(err) = run(&args, &output).await {
        output.set_failed(&err.to_string());
        return Err(err.into());
    }

    Ok(())
}
