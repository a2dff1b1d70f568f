use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use std::process::ExitCode;

mod anonymize;
mod commands;
mod config;
mod groups;
mod mapping;
mod scoring;
mod token;
mod types;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[clap(subcommand)]
    command: SubCommand,
}

#[derive(Debug, Subcommand)]
enum SubCommand {
    /// Copy sample files into the output directory under random
    /// identifiers, recording the prefix translation in a mapping file
    Anonymize {
        input_dir: Utf8PathBuf,
        output_dir: Utf8PathBuf,
        /// Suffix identifying one marker file per sample group
        #[arg(long, default_value = config::DEFAULT_SUFFIX)]
        suffix: String,
        /// Length of the random part of each generated identifier
        #[arg(long, default_value_t = config::DEFAULT_TOKEN_LENGTH)]
        token_length: usize,
    },
    /// Score a prediction csv against the gold standard solution csv
    Score {
        solution: Utf8PathBuf,
        predictions: Utf8PathBuf,
        /// Save the scores to the specified file as json instead of
        /// printing a table
        #[arg(short = 'O', long)]
        output_file: Option<Utf8PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Args::parse();

    let ok = match cli.command {
        SubCommand::Anonymize {
            input_dir,
            output_dir,
            suffix,
            token_length,
        } => commands::anonymize_directory(
            input_dir.as_std_path(),
            output_dir.as_std_path(),
            &suffix,
            token_length,
        ),
        SubCommand::Score {
            solution,
            predictions,
            output_file,
        } => commands::score_predictions(
            solution.as_std_path(),
            predictions.as_std_path(),
            output_file.as_deref().map(|p| p.as_std_path()),
        ),
    };

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
