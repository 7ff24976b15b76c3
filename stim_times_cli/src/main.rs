//! # stim_times_cli
//!
//! Part of the stim_times crate family.
//!
//! Build a Bark stimulus event dataset from a trigger recording, a jstim log and the
//! stimulus WAV files.
//!
//! ## Use
//!
//! ```bash
//! stim_times_cli pulse.dat jstim.log -o stim_times.csv -w stims/*.wav -c 1
//! ```
//!
//! A template configuration can be made with `stim_times_cli new -p config.yml` and then
//! passed back with `--config config.yml`.
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use std::process::ExitCode;

use libstim_times::config::Config;
use libstim_times::error::ProcessorError;
use libstim_times::process::{process, Job};

fn cli() -> Command {
    Command::new("stim_times_cli")
        .about("Combine jill triggers and jstim output to make a stimulus event dataset")
        .arg_required_else_help(true)
        .args_conflicts_with_subcommands(true)
        .subcommand_negates_reqs(true)
        .subcommand(
            Command::new("new")
                .about("Make a template configuration yaml file")
                .arg(
                    Arg::new("path")
                        .short('p')
                        .long("path")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .help("Path to the file"),
                ),
        )
        .arg(
            Arg::new("pulse")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("Bark dataset with the pulse channel"),
        )
        .arg(
            Arg::new("log")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("jstim log file"),
        )
        .arg(
            Arg::new("out")
                .short('o')
                .long("out")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("Output event dataset"),
        )
        .arg(
            Arg::new("wav")
                .short('w')
                .long("wav")
                .num_args(1..)
                .action(ArgAction::Append)
                .value_parser(clap::value_parser!(PathBuf))
                .help("WAV files containing the stimuli"),
        )
        .arg(
            Arg::new("channel")
                .short('c')
                .long("channel")
                .default_value("0")
                .value_parser(clap::value_parser!(usize))
                .help("Channel containing the pulse"),
        )
        .arg(
            Arg::new("threshold")
                .short('t')
                .long("threshold")
                .value_parser(clap::value_parser!(f64))
                .help("Onset threshold, overrides the configuration"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Configuration yaml file"),
        )
}

fn run(matches: &ArgMatches) -> Result<(), ProcessorError> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => {
            log::info!("Loading config from {}...", path.to_string_lossy());
            Config::read_config_file(path)?
        }
        None => Config::default(),
    };
    if let Some(threshold) = matches.get_one::<f64>("threshold") {
        config.threshold = *threshold;
    }

    let job = Job {
        pulse_path: matches.get_one::<PathBuf>("pulse").cloned().unwrap_or_default(),
        log_path: matches.get_one::<PathBuf>("log").cloned().unwrap_or_default(),
        wav_paths: matches
            .get_many::<PathBuf>("wav")
            .map(|paths| paths.cloned().collect())
            .unwrap_or_default(),
        out_path: matches.get_one::<PathBuf>("out").cloned().unwrap_or_default(),
        channel: matches.get_one::<usize>("channel").copied().unwrap_or(0),
    };
    log::info!("Pulse Path: {}", job.pulse_path.to_string_lossy());
    log::info!("Log Path: {}", job.log_path.to_string_lossy());
    log::info!("Output Path: {}", job.out_path.to_string_lossy());
    log::info!("WAV files: {} Channel: {}", job.wav_paths.len(), job.channel);
    log::info!(
        "Threshold: {} Marker: {:?} Token: {}",
        config.threshold,
        config.log_marker,
        config.stim_token
    );

    let intervals = process(&config, &job)?;
    log::info!("Aligned {} stimuli.", intervals.len());
    Ok(())
}

fn main() -> ExitCode {
    let matches = cli().get_matches();

    // Initialize feedback
    if let Err(e) = simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    ) {
        eprintln!("Could not create logging: {e}");
    }

    if let Some(("new", sub)) = matches.subcommand() {
        let path = sub.get_one::<PathBuf>("path").cloned().unwrap_or_default();
        log::info!("Making a template config at {}...", path.to_string_lossy());
        return match Config::default().write_config_file(&path) {
            Ok(()) => {
                log::info!("Done.");
                ExitCode::SUCCESS
            }
            Err(e) => {
                log::error!("{e}");
                ExitCode::FAILURE
            }
        };
    }

    match run(&matches) {
        Ok(()) => {
            log::info!("Done.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Building stimulus times failed with error: {e}");
            ExitCode::FAILURE
        }
    }
}
