// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// One row of the decision table.
///
/// The values are kept as the raw text of the cells. They are only converted to
/// numbers when the table is checked by the engine, so that the error can point
/// at the exact cell that failed.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Alternative {
    pub id: String,
    pub values: Vec<String>,
}

/// A table of alternatives scored across several criteria.
///
/// The first column of the header is the name of the identifier column, the
/// other ones are the names of the criteria.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct DecisionTable {
    pub header: Vec<String>,
    pub alternatives: Vec<Alternative>,
}

impl DecisionTable {
    pub fn new(header: Vec<String>) -> DecisionTable {
        DecisionTable {
            header,
            alternatives: Vec::new(),
        }
    }

    /// The total number of columns, identifier included.
    pub fn num_columns(&self) -> usize {
        self.header.len()
    }

    pub fn num_criteria(&self) -> usize {
        self.header.len().saturating_sub(1)
    }

    pub fn criteria_names(&self) -> &[String] {
        self.header.get(1..).unwrap_or(&[])
    }

    pub fn push(&mut self, id: &str, values: &[String]) {
        self.alternatives.push(Alternative {
            id: id.to_string(),
            values: values.to_vec(),
        });
    }
}

/// The direction of a criterion.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Impact {
    /// `+`: higher values are preferred.
    Benefit,
    /// `-`: lower values are preferred.
    Cost,
}

impl Impact {
    pub fn symbol(&self) -> &'static str {
        match self {
            Impact::Benefit => "+",
            Impact::Cost => "-",
        }
    }
}

impl Display for Impact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

// ******** Output data structures *********

pub const SCORE_COLUMN: &str = "Topsis Score";
pub const RANK_COLUMN: &str = "Rank";

/// The score assigned to an alternative that sits on both ideal points at once.
pub const DEGENERATE_SCORE: f64 = 0.5;

#[derive(PartialEq, Debug, Clone)]
pub struct RankedAlternative {
    pub id: String,
    pub values: Vec<String>,
    /// Euclidean distance to the ideal-best point.
    pub distance_best: f64,
    /// Euclidean distance to the ideal-worst point.
    pub distance_worst: f64,
    pub score: f64,
    /// Dense rank, 1 is the best alternative.
    pub rank: u32,
}

#[derive(PartialEq, Debug, Clone)]
pub struct TopsisResult {
    /// The header of the input table, without the appended columns.
    pub header: Vec<String>,
    /// The alternatives, in the order of the input table.
    pub alternatives: Vec<RankedAlternative>,
    pub ideal_best: Vec<f64>,
    pub ideal_worst: Vec<f64>,
}

impl TopsisResult {
    /// The header of the result table: the input header followed by the score and the rank.
    pub fn output_header(&self) -> Vec<String> {
        let mut h = self.header.clone();
        h.push(SCORE_COLUMN.to_string());
        h.push(RANK_COLUMN.to_string());
        h
    }

    /// The rows of the result table, rendered as text.
    pub fn output_rows(&self) -> Vec<Vec<String>> {
        self.alternatives
            .iter()
            .map(|ra| {
                let mut row = Vec::with_capacity(ra.values.len() + 3);
                row.push(ra.id.clone());
                row.extend(ra.values.iter().cloned());
                row.push(ra.score.to_string());
                row.push(ra.rank.to_string());
                row
            })
            .collect()
    }

    /// The alternatives holding rank 1.
    pub fn best(&self) -> Vec<&RankedAlternative> {
        self.alternatives.iter().filter(|ra| ra.rank == 1).collect()
    }
}

/// Which list could not be parsed.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum ListKind {
    Weights,
    Impacts,
}

/// Errors that prevent the ranking from completing.
///
/// All of them are caused by the input and are final for the current invocation.
#[derive(PartialEq, Debug, Clone)]
pub enum TopsisError {
    /// The table needs an identifier column and at least two criteria.
    TooFewColumns { found: usize },
    /// A row does not have one value per criterion. `row` is 1-based.
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// A criterion cell is not a finite number. `row` is 1-based.
    NonNumeric {
        row: usize,
        column: String,
        value: String,
    },
    DimensionMismatch {
        criteria: usize,
        weights: usize,
        impacts: usize,
    },
    /// An impact is not `+` or `-`. `position` is 1-based.
    InvalidImpact { position: usize, symbol: String },
    InvalidFormat { list: ListKind, content: String },
    /// Zero or negative weight, under the strict weight policy. `position` is 1-based.
    NonPositiveWeight { position: usize, weight: f64 },
    /// Both separation distances are zero for this row (1-based).
    DegenerateScore { row: usize },
    /// Both separation distances overflow for this row (1-based), so no score can be given.
    NonFiniteScore { row: usize },
}

impl Error for TopsisError {}

impl Display for TopsisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TopsisError::TooFewColumns { found } => write!(
                f,
                "Input file must contain at least 3 columns (found {})",
                found
            ),
            TopsisError::RaggedRow {
                row,
                expected,
                found,
            } => write!(
                f,
                "Row {} has {} criterion values, expected {}",
                row, found, expected
            ),
            TopsisError::NonNumeric { row, column, value } => write!(
                f,
                "Non-numeric value found in criteria columns: {:?} (row {}, column {:?})",
                value, row, column
            ),
            TopsisError::DimensionMismatch {
                criteria,
                weights,
                impacts,
            } => write!(
                f,
                "Number of weights/impacts must match number of criteria: {} criteria, {} weights, {} impacts",
                criteria, weights, impacts
            ),
            TopsisError::InvalidImpact { position, symbol } => write!(
                f,
                "Impacts must be + or -: found {:?} at position {}",
                symbol, position
            ),
            TopsisError::InvalidFormat { list, content } => {
                let name = match list {
                    ListKind::Weights => "weights",
                    ListKind::Impacts => "impacts",
                };
                write!(
                    f,
                    "Invalid {} format {:?}: provide comma-separated values",
                    name, content
                )
            }
            TopsisError::NonPositiveWeight { position, weight } => write!(
                f,
                "Weights must be strictly positive: found {} at position {}",
                weight, position
            ),
            TopsisError::DegenerateScore { row } => write!(
                f,
                "Row {} coincides with both the ideal-best and ideal-worst points, its score is undefined",
                row
            ),
            TopsisError::NonFiniteScore { row } => write!(
                f,
                "The score of row {} is not a finite number: the weighted values are too large",
                row
            ),
        }
    }
}

// ********* Configuration **********

/// What to do when an alternative is at distance zero from both ideal points.
///
/// This only happens in degenerate inputs, for example when all the rows are identical.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum DegenerateScoreMode {
    /// Assign [DEGENERATE_SCORE] to the row.
    Sentinel,
    /// Stop with [TopsisError::DegenerateScore].
    Fail,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum WeightPolicy {
    /// Every weight must be strictly positive.
    RejectNonPositive,
    /// Any finite weight is accepted.
    Permissive,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TopsisRules {
    pub degenerate_score: DegenerateScoreMode,
    pub weight_policy: WeightPolicy,
}

impl TopsisRules {
    pub const DEFAULT_RULES: TopsisRules = TopsisRules {
        degenerate_score: DegenerateScoreMode::Sentinel,
        weight_policy: WeightPolicy::RejectNonPositive,
    };
}

impl Default for TopsisRules {
    fn default() -> Self {
        TopsisRules::DEFAULT_RULES
    }
}
