use clap::Parser;
use log::{debug, LevelFilter};

use topsis::{DegenerateScoreMode, TopsisRules, WeightPolicy};
use topsis_rank::app::io_common::delimiter_byte;
use topsis_rank::app::{run_ranking, AppResult, RunSettings};

mod args;

fn settings_from_args(args: &args::Args) -> AppResult<RunSettings> {
    let mut settings = RunSettings::new(&args.input, &args.weights, &args.impacts, &args.output);
    settings.delimiter = delimiter_byte(args.delimiter)?;
    settings.input_type = args.input_type.clone();
    settings.excel_worksheet_name = args.excel_worksheet_name.clone();
    settings.summary = args.summary.clone();
    settings.reference = args.reference.clone();
    settings.rules = TopsisRules {
        degenerate_score: if args.fail_on_degenerate {
            DegenerateScoreMode::Fail
        } else {
            DegenerateScoreMode::Sentinel
        },
        weight_policy: if args.allow_nonpositive_weights {
            WeightPolicy::Permissive
        } else {
            WeightPolicy::RejectNonPositive
        },
    };
    Ok(settings)
}

fn main() {
    let args = args::Args::parse();

    let mut builder = env_logger::Builder::from_default_env();
    if args.verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
    debug!("args: {:?}", args);

    let res = settings_from_args(&args).and_then(|settings| run_ranking(&settings));
    match res {
        Ok(_) => println!("Output saved to {}", args.output),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
