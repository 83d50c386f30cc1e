use anyhow::{Context, Result};
use metapipeline::cli::commands::{EnvCommand, MetapipelineCommand, ENV_USAGE};
use metapipeline::cli::output::*;
use metapipeline::cli::{Cli, Command};
use metapipeline::core::{resolve_threads, Configuration, PipelineContext, PipelineMode};
use metapipeline::execution::PipelineOrchestrator;
use metapipeline::{logging, PipelineError, SubprocessRunner};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{} {:#}", CROSS, style(e).red());
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::from_args();

    let loaded = Configuration::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let log = logging::init(&loaded.configuration.log_dir(), cli.verbose)?;
    loaded.report();
    println!("{} Logging to {}", INFO, style(log.path.display()).dim());

    let mut orchestrator = PipelineOrchestrator::new(
        SubprocessRunner::new(),
        PipelineContext::new(loaded.configuration.clone()),
    );
    orchestrator.add_event_handler(|event| println!("{}", format_execution_event(event)));

    let result = match &cli.command {
        Command::Env(cmd) => create_environment(&mut orchestrator, cmd).await,
        Command::Md5(cmd) => orchestrator.check_md5(&cmd.to_check()).await.map(|_| ()),
        Command::Setup(cmd) => orchestrator.setup_project(&cmd.to_setup()).await.map(|_| ()),
        Command::Metapipeline(cmd) => run_pipeline(&mut orchestrator, cmd, &loaded.configuration).await,
    };

    if let Err(e) = &result {
        logging::report_failure(e, &orchestrator.record().failed);
        if matches!(e, PipelineError::MissingDependency { .. }) {
            println!("{} Install the missing tools or run `metapipeline env` first", WARN);
        }
    } else {
        println!("\n{} {}", CHECK, style(orchestrator.context().tracker.summary()).green());
    }

    result.map_err(Into::into)
}

async fn create_environment(
    orchestrator: &mut PipelineOrchestrator<SubprocessRunner>,
    cmd: &EnvCommand,
) -> Result<(), PipelineError> {
    orchestrator
        .create_environment_from(&cmd.package_manager, &cmd.config_file)
        .await
        .map(|_| ())
        .inspect_err(|e| {
            if matches!(e, PipelineError::InvalidPackageManager(_)) {
                eprintln!("{}", ENV_USAGE);
            }
        })
}

async fn run_pipeline(
    orchestrator: &mut PipelineOrchestrator<SubprocessRunner>,
    cmd: &MetapipelineCommand,
    configuration: &Configuration,
) -> Result<(), PipelineError> {
    let mode: PipelineMode = cmd.mode.parse()?;
    let threads = resolve_threads(cmd.threads.as_deref(), configuration);
    orchestrator.run(mode, &cmd.run_context(threads)).await
}
