use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::anonymize::anonymize;
use crate::config::mapping_file;
use crate::groups::GroupPattern;
use crate::mapping::MappingStore;
use crate::scoring::{score, ScoreReport};
use crate::token::RandomTokens;

pub fn anonymize_directory(
    input_dir: &Path,
    output_dir: &Path,
    suffix: &str,
    token_length: usize,
) -> bool {
    let pattern = match GroupPattern::new(suffix) {
        Some(pattern) => pattern,
        None => {
            eprintln!("suffix must not be empty");
            return false;
        }
    };
    let store = MappingStore::at(&mapping_file(output_dir));
    let mut tokens = RandomTokens::new(token_length);

    match anonymize(input_dir, output_dir, &store, &pattern, &mut tokens) {
        Ok(summary) => {
            if summary.groups == 0 {
                eprintln!(
                    "Warning: no files matching *{} in {}",
                    suffix,
                    input_dir.display()
                );
            } else {
                println!(
                    "Anonymized {} groups ({} files) into {}",
                    summary.groups,
                    summary.files_copied,
                    output_dir.display()
                );
                println!("Mapping recorded in {}", store.path().display());
            }
            true
        }
        Err(e) => {
            eprintln!("Error while anonymizing: {}", e);
            false
        }
    }
}

pub fn score_predictions(
    solution: &Path,
    predictions: &Path,
    output_file: Option<&Path>,
) -> bool {
    let report = match score(solution, predictions) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error while scoring: {}", e);
            return false;
        }
    };
    match output_file {
        Some(path) => write_json_report(&report, path),
        None => {
            print_report(&report);
            true
        }
    }
}

fn print_report(report: &ScoreReport) {
    println!("class pre rec f1");
    for (class, [precision, recall, f1]) in report.classes.iter().zip(&report.per_class) {
        println!("{} {} {} {}", class, precision, recall, f1);
    }
    println!(
        "Overall {} {} {} (jaccard {})",
        report.overall[0], report.overall[1], report.overall[2], report.overall[3]
    );
}

fn write_json_report(report: &ScoreReport, path: &Path) -> bool {
    let file = match File::create(path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed to create {}: {}", path.display(), e);
            return false;
        }
    };
    if let Err(e) = serde_json::to_writer_pretty(BufWriter::new(file), report) {
        eprintln!("Failed to write {}: {}", path.display(), e);
        return false;
    }
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to serialize report: {}", e);
            return false;
        }
    }
    true
}
