// src/main.rs
use clap::error::ErrorKind;
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target as ConsoleTarget},
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use std::path::Path;
use std::process::ExitCode;
use svg2vector::{
    AppError, CommandLineInput, InkscapeSvgLoader, Orchestrator, ProcessRunner, ResolvedOptions,
    RunReport, EXIT_HELP, EXIT_SUCCESS, EXIT_USAGE,
};

/// Sets up logging configuration.
fn setup_logging(level: LevelFilter, log_file: Option<&Path>) -> anyhow::Result<()> {
    let pattern = if level >= LevelFilter::Debug {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{l}: {m}{n}"
    };

    let console = ConsoleAppender::builder()
        .target(ConsoleTarget::Stderr)
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let mut builder = Config::builder().appender(
        Appender::builder()
            .filter(Box::new(ThresholdFilter::new(level)))
            .build("console", Box::new(console)),
    );
    let mut root = Root::builder().appender("console");

    if let Some(path) = log_file {
        let file_appender = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new(
                "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}",
            )))
            .build(path)?;
        builder = builder.appender(Appender::builder().build("file", Box::new(file_appender)));
        root = root.appender("file");
    }

    let root_level = if log_file.is_some() {
        LevelFilter::Debug
    } else {
        level
    };
    log4rs::init_config(builder.build(root.build(root_level))?)?;
    log::debug!("Logging initialized at {}", level);
    Ok(())
}

/// Runs one conversion with the real loader and tool runner.
fn execute(options: &ResolvedOptions) -> Result<RunReport, AppError> {
    let runner = ProcessRunner::new(&options.tool)?;
    let mut orchestrator = Orchestrator::new(options, InkscapeSvgLoader::new(), runner);
    orchestrator.run()
}

fn exit_with(code: i32) -> ExitCode {
    // Negative codes wrap to their two's complement byte, as a shell sees them.
    ExitCode::from(code as u8)
}

fn main() -> ExitCode {
    let cli = match CommandLineInput::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => exit_with(EXIT_HELP),
                _ => exit_with(EXIT_USAGE),
            };
        }
    };

    if let Err(err) = setup_logging(cli.log_level(), cli.log_file.as_deref()) {
        eprintln!("could not set up logging: {:#}", err);
        return exit_with(EXIT_USAGE);
    }

    let json = cli.json;
    let result = ResolvedOptions::resolve(cli).and_then(|options| execute(&options));

    match result {
        Ok(report) => {
            if json {
                match serde_json::to_string_pretty(&report) {
                    Ok(text) => println!("{}", text),
                    Err(err) => log::error!("could not serialize run report: {}", err),
                }
            }
            log::info!(
                "{} tool invocations, {} warnings",
                report.steps.len(),
                report.warnings.len()
            );
            exit_with(EXIT_SUCCESS)
        }
        Err(err) => {
            log::error!("{}", err);
            exit_with(err.exit_code())
        }
    }
}
