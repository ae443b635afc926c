use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::LevelFilter;

use convis::stimuli::StimulusKind;
use convis_cli::demo::{run_demo, DemoOptions};
use convis_cli::simulate::{run_simulation, RunOptions};
use convis_cli::util::default_config_json;

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("CONVIS_LOG", "error,convis=info"))
        .init();

    let matches = Command::new("convis")
        .version(clap::crate_version!())
        .author("Jacob Huth <jahuth@uos.de>")
        .about("Convolutional Vision Model - retina simulation driver")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("demo")
                .about("Run the default retina on full-field light and plot On and Off activity")
                .arg(count_arg("frames", "Frames of the direct call", "100"))
                .arg(count_arg("run_frames", "Frames of the stepped run", "2000").long("run-frames"))
                .arg(count_arg("dt", "Frames per step of the stepped run", "100"))
                .arg(count_arg("stride", "Frame stride of the activity snapshots", "50"))
                .arg(count_arg("size", "Height and width of the stimulus in pixels", "20"))
                .arg(config_arg())
                .arg(
                    Arg::new("output_file")
                        .short('o')
                        .long("output")
                        .help("Path of the HTML report")
                        .default_value("convis_demo_report.html")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(csv_arg())
                .arg(
                    Arg::new("no_report")
                        .long("no-report")
                        .help("Disable HTML report generation.")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("run")
                .about("Drive a model with a synthetic stimulus")
                .arg(
                    Arg::new("stimulus")
                        .short('s')
                        .long("stimulus")
                        .help("Stimulus family")
                        .value_parser(["ones", "flash", "bar", "grating"])
                        .default_value("flash")
                        .value_hint(ValueHint::Other),
                )
                .arg(count_arg("frames", "Number of stimulus frames", "1000"))
                .arg(count_arg("size", "Height and width of the stimulus in pixels", "20"))
                .arg(count_arg("dt", "Frames per simulation step", "100"))
                .arg(model_arg().help(
                    "Model to run. Must match the model of --config when both are given.",
                ))
                .arg(config_arg())
                .arg(
                    Arg::new("output_file")
                        .short('o')
                        .long("output")
                        .help("Path of an HTML report. No report is written without it.")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(csv_arg()),
        )
        .subcommand(
            Command::new("config")
                .about("Print the default configuration of a model as JSON")
                .arg(model_arg().default_value("retina")),
        )
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Written by {author-with-newline}Version {version}\n\n\
             {all-args}{after-help}",
        )
        .get_matches();

    match matches.subcommand() {
        Some(("demo", sub_m)) => handle_demo(sub_m),
        Some(("run", sub_m)) => handle_run(sub_m),
        Some(("config", sub_m)) => handle_config(sub_m),
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn count_arg(name: &'static str, help: &'static str, default: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .help(help)
        .default_value(default)
        .value_parser(clap::value_parser!(usize))
}

fn config_arg() -> Arg {
    Arg::new("config")
        .short('c')
        .long("config")
        .help("Path to a model configuration JSON file")
        .value_parser(clap::value_parser!(PathBuf))
        .value_hint(ValueHint::FilePath)
}

fn model_arg() -> Arg {
    Arg::new("model")
        .short('m')
        .long("model")
        .value_parser(["retina", "ln"])
        .value_hint(ValueHint::Other)
}

fn csv_arg() -> Arg {
    Arg::new("csv")
        .long("csv")
        .help("Also write the mean On and Off activity per frame to this CSV file")
        .value_parser(clap::value_parser!(PathBuf))
        .value_hint(ValueHint::FilePath)
}

fn count(matches: &ArgMatches, name: &str) -> usize {
    // every count argument carries a default value
    *matches.get_one::<usize>(name).unwrap()
}

fn handle_demo(matches: &ArgMatches) -> Result<()> {
    let options = DemoOptions {
        frames: count(matches, "frames"),
        run_frames: count(matches, "run_frames"),
        dt: count(matches, "dt"),
        stride: count(matches, "stride"),
        size: count(matches, "size"),
        config: matches.get_one::<PathBuf>("config").cloned(),
        output: if matches.get_flag("no_report") {
            None
        } else {
            matches.get_one::<PathBuf>("output_file").cloned()
        },
        csv: matches.get_one::<PathBuf>("csv").cloned(),
    };
    log::info!("[convis::demo] {:?}", options);

    match run_demo(&options) {
        Ok(summary) => {
            log::info!(
                "[convis::demo] {} frames, {} On and {} Off spikes",
                summary.frames,
                summary.on_spikes,
                summary.off_spikes
            );
            Ok(())
        }
        Err(e) => {
            log::error!("Demo failed: {:#}", e);
            std::process::exit(1)
        }
    }
}

fn handle_run(matches: &ArgMatches) -> Result<()> {
    let stimulus: &String = matches.get_one("stimulus").unwrap();
    let options = RunOptions {
        stimulus: StimulusKind::from_str(stimulus).map_err(anyhow::Error::msg)?,
        frames: count(matches, "frames"),
        size: count(matches, "size"),
        dt: count(matches, "dt"),
        model: matches.get_one::<String>("model").cloned(),
        config: matches.get_one::<PathBuf>("config").cloned(),
        output: matches.get_one::<PathBuf>("output_file").cloned(),
        csv: matches.get_one::<PathBuf>("csv").cloned(),
    };
    log::info!("[convis::run] {:?}", options);

    match run_simulation(&options) {
        Ok(summary) => {
            println!(
                "{}\t{}\t{:.6}\t{:.6}",
                summary.model, summary.frames, summary.mean_on, summary.mean_off
            );
            Ok(())
        }
        Err(e) => {
            log::error!("Run failed: {:#}", e);
            std::process::exit(1)
        }
    }
}

fn handle_config(matches: &ArgMatches) -> Result<()> {
    let model: &String = matches.get_one("model").unwrap();
    println!("{}", default_config_json(model)?);
    Ok(())
}
