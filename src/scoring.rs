use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

const HEADER: [&str; 2] = ["filename", "cell_line"];

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("incorrect header {found:?}, should be: [\"filename\", \"cell_line\"]")]
    BadHeader { found: Vec<String> },

    #[error("bad row length {found}, should be at least 2 for row {row}")]
    BadRow { row: usize, found: usize },

    #[error("unknown class {class:?} in {path}")]
    UnknownClass { class: String, path: String },

    #[error(
        "the IDs in the two files are unordered or non-equal\n\
         IDs only in solution: {only_solution:?}\n\
         IDs only in prediction: {only_prediction:?}"
    )]
    IdMismatch {
        only_solution: Vec<String>,
        only_prediction: Vec<String>,
    },
}

/// Precision/recall/F1 for the whole set and per class, plus the Jaccard
/// index (multi-label accuracy). Serialized shape matches the historical
/// upload format: `data` is the overall block, `additionalData` one
/// `[precision, recall, f1]` triple per class in class order.
#[derive(Debug, Serialize)]
pub struct ScoreReport {
    #[serde(skip)]
    pub classes: Vec<String>,
    #[serde(rename = "data")]
    pub overall: Vec<f64>,
    #[serde(rename = "additionalData")]
    pub per_class: Vec<[f64; 3]>,
}

/// Score a prediction file against a solution file.
///
/// Both are CSVs headed `filename,cell_line`; each row is an identifier
/// followed by one or more class labels. The identifiers must match in
/// content and order. The class universe is whatever the solution file
/// mentions; a prediction label outside it is an error.
pub fn score(solution_path: &Path, prediction_path: &Path) -> Result<ScoreReport, ScoreError> {
    let (solution_ids, solution_labels) = parse_solution_file(solution_path)?;
    let (prediction_ids, prediction_labels) = parse_solution_file(prediction_path)?;

    if solution_ids != prediction_ids {
        let sol: BTreeSet<&String> = solution_ids.iter().collect();
        let pred: BTreeSet<&String> = prediction_ids.iter().collect();
        return Err(ScoreError::IdMismatch {
            only_solution: sol.difference(&pred).map(|s| (*s).clone()).collect(),
            only_prediction: pred.difference(&sol).map(|s| (*s).clone()).collect(),
        });
    }

    let binarizer = Binarizer::new(solution_labels.iter().flatten().cloned());
    let actual = binarizer.binarize(&solution_labels, solution_path)?;
    let predicted = binarizer.binarize(&prediction_labels, prediction_path)?;

    let (precision, recall, f1) = precision_recall_total(&predicted, &actual);
    let mut overall = vec![precision, recall, f1];
    overall.push(jaccard_index(&actual, &predicted));

    let per_class = (0..binarizer.classes.len())
        .map(|class| precision_recall_class(&predicted, &actual, class))
        .collect();

    Ok(ScoreReport {
        classes: binarizer.classes,
        overall,
        per_class,
    })
}

fn parse_solution_file(path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>), ScoreError> {
    let read_err = |source| ScoreError::Read {
        path: path.display().to_string(),
        source,
    };
    let file = File::open(path).map_err(|e| read_err(csv::Error::from(e)))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let mut ids = Vec::new();
    let mut labels = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result.map_err(read_err)?;
        let fields: Vec<String> = record.iter().map(str::to_string).collect();
        if i == 0 {
            if fields != HEADER {
                return Err(ScoreError::BadHeader { found: fields });
            }
            continue;
        }
        if fields.len() < 2 {
            return Err(ScoreError::BadRow {
                row: i,
                found: fields.len(),
            });
        }
        ids.push(fields[0].clone());
        labels.push(fields[1..].to_vec());
    }
    Ok((ids, labels))
}

/// Maps label sets to binary vectors over a sorted class universe.
struct Binarizer {
    classes: Vec<String>,
    index: HashMap<String, usize>,
}

impl Binarizer {
    fn new(classes: impl IntoIterator<Item = String>) -> Self {
        let classes: Vec<String> = classes
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let index = classes
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();
        Binarizer { classes, index }
    }

    fn binarize(&self, rows: &[Vec<String>], path: &Path) -> Result<Vec<Vec<u8>>, ScoreError> {
        let mut binarized = Vec::with_capacity(rows.len());
        for row in rows {
            let mut bits = vec![0u8; self.classes.len()];
            for label in row {
                let i = self
                    .index
                    .get(label)
                    .ok_or_else(|| ScoreError::UnknownClass {
                        class: label.clone(),
                        path: path.display().to_string(),
                    })?;
                bits[*i] = 1;
            }
            binarized.push(bits);
        }
        Ok(binarized)
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn f1_score(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

fn counts(
    predicted: &[Vec<u8>],
    actual: &[Vec<u8>],
    keep: impl Fn(usize) -> bool,
) -> (usize, usize, usize) {
    let mut truepos = 0;
    let mut falsepos = 0;
    let mut falseneg = 0;
    for (pred_row, act_row) in predicted.iter().zip(actual) {
        for (col, (p, a)) in pred_row.iter().zip(act_row).enumerate() {
            if !keep(col) {
                continue;
            }
            match (*p, *a) {
                (1, 1) => truepos += 1,
                (1, 0) => falsepos += 1,
                (0, 1) => falseneg += 1,
                _ => {}
            }
        }
    }
    (truepos, falsepos, falseneg)
}

fn precision_recall_total(predicted: &[Vec<u8>], actual: &[Vec<u8>]) -> (f64, f64, f64) {
    let (tp, fp, fneg) = counts(predicted, actual, |_| true);
    let precision = ratio(tp, tp + fp);
    let recall = ratio(tp, tp + fneg);
    (precision, recall, f1_score(precision, recall))
}

fn precision_recall_class(predicted: &[Vec<u8>], actual: &[Vec<u8>], class: usize) -> [f64; 3] {
    let (tp, fp, fneg) = counts(predicted, actual, |col| col == class);
    let precision = ratio(tp, tp + fp);
    let recall = ratio(tp, tp + fneg);
    [precision, recall, f1_score(precision, recall)]
}

/// |intersection| / |union| over all rows, also known as multi-label
/// accuracy.
fn jaccard_index(actual: &[Vec<u8>], predicted: &[Vec<u8>]) -> f64 {
    let mut intersection = 0;
    let mut union = 0;
    for (act_row, pred_row) in actual.iter().zip(predicted) {
        for (a, p) in act_row.iter().zip(pred_row) {
            if *a == 1 && *p == 1 {
                intersection += 1;
            }
            if *a == 1 || *p == 1 {
                union += 1;
            }
        }
    }
    ratio(intersection, union)
}
