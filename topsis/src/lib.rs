/*!
This crate implements TOPSIS (Technique for Order of Preference by Similarity
to Ideal Solution), a multi-criteria decision analysis method.

Given a table of alternatives scored across several criteria, a weight and an
impact (`+` for a benefit, `-` for a cost) for each criterion, every
alternative receives a score between 0 and 1 that measures how close it is to
the ideal-best point and how far it is from the ideal-worst point. The
alternatives are then ranked by decreasing score, using a dense ranking.

```
use topsis::builder::Builder;
use topsis::{Impact, TopsisRules};

let mut builder = Builder::new(&TopsisRules::DEFAULT_RULES)?
    .criteria(&["Price".to_string(), "Storage".to_string()])?
    .weights(&[1.0, 1.0])?
    .impacts(&[Impact::Cost, Impact::Benefit])?;
builder.add_alternative("A", &[250.0, 16.0])?;
builder.add_alternative("B", &[200.0, 16.0])?;
builder.add_alternative("C", &[300.0, 32.0])?;

let result = builder.compute()?;
assert_eq!(result.best()[0].id, "C");
# Ok::<(), topsis::TopsisError>(())
```

The [manual] has more details about the command line program and the file formats.
*/

mod config;
mod parse;

pub mod builder;
pub mod manual;

use log::{debug, info, warn};

pub use crate::config::*;
pub use crate::parse::{parse_impact, parse_impacts, parse_weights};

// **** Private structures ****

// The numeric part of the decision table, one vector per alternative.
// Invariant: all the rows have `num_criteria` finite values.
#[derive(PartialEq, Debug, Clone)]
struct CriteriaMatrix {
    rows: Vec<Vec<f64>>,
    num_criteria: usize,
}

impl CriteriaMatrix {
    fn column(&self, j: usize) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().map(move |r| r[j])
    }
}

#[derive(PartialEq, Debug, Clone, Copy)]
struct Separation {
    best: f64,
    worst: f64,
}

/// Runs the TOPSIS ranking on the given table.
///
/// Arguments:
/// * `table` the alternatives to rank. The identifier column is passed through untouched.
/// * `weights` one weight per criterion. They do not need to sum to 1.
/// * `impacts` one impact per criterion.
/// * `rules` the policies for non-positive weights and undefined scores.
pub fn run_topsis(
    table: &DecisionTable,
    weights: &[f64],
    impacts: &[Impact],
    rules: &TopsisRules,
) -> Result<TopsisResult, TopsisError> {
    info!(
        "run_topsis: Processing {:?} alternatives, {:?} columns, rules: {:?}",
        table.alternatives.len(),
        table.num_columns(),
        rules
    );
    let matrix = check_table(table)?;
    check_dimensions(matrix.num_criteria, weights.len(), impacts.len())?;
    check_weights(weights, rules)?;
    compute(table, &matrix, weights, impacts, rules)
}

/// Same as [run_topsis], with the weights and the impacts given as comma-separated
/// text, for example `"1,1,2"` and `"+,-,+"`.
///
/// The checks happen in the following order: table shape, numeric cells,
/// weights format, list lengths, impact symbols.
pub fn run_topsis_text(
    table: &DecisionTable,
    weights: &str,
    impacts: &str,
    rules: &TopsisRules,
) -> Result<TopsisResult, TopsisError> {
    info!(
        "run_topsis_text: Processing {:?} alternatives, weights: {:?}, impacts: {:?}",
        table.alternatives.len(),
        weights,
        impacts
    );
    let matrix = check_table(table)?;
    let weights = parse_weights(weights)?;
    check_dimensions(
        matrix.num_criteria,
        weights.len(),
        impacts.split(',').count(),
    )?;
    let impacts = parse_impacts(impacts)?;
    check_weights(&weights, rules)?;
    compute(table, &matrix, &weights, &impacts, rules)
}

fn compute(
    table: &DecisionTable,
    matrix: &CriteriaMatrix,
    weights: &[f64],
    impacts: &[Impact],
    rules: &TopsisRules,
) -> Result<TopsisResult, TopsisError> {
    if matrix.rows.is_empty() {
        warn!("run_topsis: the table has no alternatives, nothing to rank");
        return Ok(TopsisResult {
            header: table.header.clone(),
            alternatives: Vec::new(),
            ideal_best: Vec::new(),
            ideal_worst: Vec::new(),
        });
    }

    let normalized = normalize(matrix);
    debug!("run_topsis: normalized: {:?}", normalized.rows);
    let weighted = apply_weights(&normalized, weights);
    debug!("run_topsis: weighted: {:?}", weighted.rows);
    let (ideal_best, ideal_worst) = ideal_points(&weighted, impacts);
    debug!(
        "run_topsis: ideal best: {:?} ideal worst: {:?}",
        ideal_best, ideal_worst
    );

    let separations: Vec<Separation> = weighted
        .rows
        .iter()
        .map(|row| Separation {
            best: distance(row, &ideal_best),
            worst: distance(row, &ideal_worst),
        })
        .collect();
    let scores = closeness(&separations, rules)?;
    let ranks = dense_ranks(&scores);

    let alternatives: Vec<RankedAlternative> = table
        .alternatives
        .iter()
        .zip(separations.iter())
        .zip(scores.iter().zip(ranks.iter()))
        .map(|((alt, sep), (score, rank))| RankedAlternative {
            id: alt.id.clone(),
            values: alt.values.clone(),
            distance_best: sep.best,
            distance_worst: sep.worst,
            score: *score,
            rank: *rank,
        })
        .collect();

    for ra in alternatives.iter() {
        info!("Alternative {}: score {} rank {}", ra.id, ra.score, ra.rank);
    }

    Ok(TopsisResult {
        header: table.header.clone(),
        alternatives,
        ideal_best,
        ideal_worst,
    })
}

// Checks the shape of the table and converts the criteria to numbers.
fn check_table(table: &DecisionTable) -> Result<CriteriaMatrix, TopsisError> {
    if table.num_columns() < 3 {
        return Err(TopsisError::TooFewColumns {
            found: table.num_columns(),
        });
    }
    let num_criteria = table.num_criteria();
    let criteria_names = table.criteria_names();
    let mut rows: Vec<Vec<f64>> = Vec::with_capacity(table.alternatives.len());
    for (idx, alt) in table.alternatives.iter().enumerate() {
        if alt.values.len() != num_criteria {
            return Err(TopsisError::RaggedRow {
                row: idx + 1,
                expected: num_criteria,
                found: alt.values.len(),
            });
        }
        let mut row: Vec<f64> = Vec::with_capacity(num_criteria);
        for (cell, column) in alt.values.iter().zip(criteria_names.iter()) {
            let x = parse::parse_criterion_value(cell).ok_or_else(|| TopsisError::NonNumeric {
                row: idx + 1,
                column: column.clone(),
                value: cell.clone(),
            })?;
            row.push(x);
        }
        rows.push(row);
    }
    Ok(CriteriaMatrix { rows, num_criteria })
}

fn check_dimensions(criteria: usize, weights: usize, impacts: usize) -> Result<(), TopsisError> {
    if weights != criteria || impacts != criteria {
        return Err(TopsisError::DimensionMismatch {
            criteria,
            weights,
            impacts,
        });
    }
    Ok(())
}

fn check_weights(weights: &[f64], rules: &TopsisRules) -> Result<(), TopsisError> {
    for (idx, w) in weights.iter().enumerate() {
        if !w.is_finite() {
            return Err(TopsisError::InvalidFormat {
                list: ListKind::Weights,
                content: format!("{:?}", weights),
            });
        }
        if rules.weight_policy == WeightPolicy::RejectNonPositive && *w <= 0.0 {
            return Err(TopsisError::NonPositiveWeight {
                position: idx + 1,
                weight: *w,
            });
        }
    }
    Ok(())
}

/// Vector normalization: every column is divided by its Euclidean norm.
/// A column of zeros keeps a norm of 1 and stays a column of zeros.
fn normalize(matrix: &CriteriaMatrix) -> CriteriaMatrix {
    let norms: Vec<f64> = (0..matrix.num_criteria)
        .map(|j| {
            let n = matrix.column(j).map(|x| x * x).sum::<f64>().sqrt();
            if n == 0.0 {
                1.0
            } else {
                n
            }
        })
        .collect();
    CriteriaMatrix {
        rows: matrix
            .rows
            .iter()
            .map(|row| row.iter().zip(norms.iter()).map(|(x, n)| x / n).collect())
            .collect(),
        num_criteria: matrix.num_criteria,
    }
}

fn apply_weights(matrix: &CriteriaMatrix, weights: &[f64]) -> CriteriaMatrix {
    CriteriaMatrix {
        rows: matrix
            .rows
            .iter()
            .map(|row| row.iter().zip(weights.iter()).map(|(x, w)| x * w).collect())
            .collect(),
        num_criteria: matrix.num_criteria,
    }
}

// Requires at least one row.
fn ideal_points(matrix: &CriteriaMatrix, impacts: &[Impact]) -> (Vec<f64>, Vec<f64>) {
    let mut best: Vec<f64> = Vec::with_capacity(matrix.num_criteria);
    let mut worst: Vec<f64> = Vec::with_capacity(matrix.num_criteria);
    for (j, impact) in impacts.iter().enumerate() {
        let max = matrix.column(j).fold(f64::NEG_INFINITY, f64::max);
        let min = matrix.column(j).fold(f64::INFINITY, f64::min);
        match impact {
            Impact::Benefit => {
                best.push(max);
                worst.push(min);
            }
            Impact::Cost => {
                best.push(min);
                worst.push(max);
            }
        }
    }
    (best, worst)
}

fn distance(row: &[f64], point: &[f64]) -> f64 {
    let plain = row
        .iter()
        .zip(point.iter())
        .map(|(x, p)| (x - p) * (x - p))
        .sum::<f64>()
        .sqrt();
    if plain.is_finite() {
        return plain;
    }
    // The squares overflowed: sum them relative to the largest difference.
    let scale = row
        .iter()
        .zip(point.iter())
        .map(|(x, p)| (x - p).abs())
        .fold(0.0, f64::max);
    if !scale.is_finite() {
        return f64::INFINITY;
    }
    let scaled = row
        .iter()
        .zip(point.iter())
        .map(|(x, p)| {
            let d = (x - p) / scale;
            d * d
        })
        .sum::<f64>()
        .sqrt();
    scale * scaled
}

fn closeness(separations: &[Separation], rules: &TopsisRules) -> Result<Vec<f64>, TopsisError> {
    let mut scores: Vec<f64> = Vec::with_capacity(separations.len());
    for (idx, sep) in separations.iter().enumerate() {
        let total = sep.best + sep.worst;
        if total > 0.0 {
            let score = if total.is_finite() {
                sep.worst / total
            } else {
                1.0 / (1.0 + sep.best / sep.worst)
            };
            if !score.is_finite() {
                return Err(TopsisError::NonFiniteScore { row: idx + 1 });
            }
            scores.push(score);
            continue;
        }
        match rules.degenerate_score {
            DegenerateScoreMode::Sentinel => {
                warn!(
                    "closeness: row {}: both separations are zero, assigning score {}",
                    idx + 1,
                    DEGENERATE_SCORE
                );
                scores.push(DEGENERATE_SCORE);
            }
            DegenerateScoreMode::Fail => {
                return Err(TopsisError::DegenerateScore { row: idx + 1 });
            }
        }
    }
    Ok(scores)
}

/// Dense ranking by decreasing score: equal scores share a rank and the ranks
/// have no gaps.
fn dense_ranks(scores: &[f64]) -> Vec<u32> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|a, b| scores[*b].total_cmp(&scores[*a]));
    let mut ranks: Vec<u32> = vec![0; scores.len()];
    let mut current: u32 = 0;
    let mut previous: Option<f64> = None;
    for idx in order {
        if previous != Some(scores[idx]) {
            current += 1;
            previous = Some(scores[idx]);
        }
        ranks[idx] = current;
    }
    ranks
}
