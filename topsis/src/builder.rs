pub use crate::config::*;

/// A builder for ranking alternatives that are already held in memory as numbers.
///
/// ```
/// pub use topsis::builder::Builder;
/// pub use topsis::{Impact, TopsisRules};
/// # use topsis::TopsisError;
///
/// let mut builder = Builder::new(&TopsisRules::DEFAULT_RULES)?
///     .criteria(&["Price".to_string(), "Speed".to_string()])?
///     .weights(&[2.0, 1.0])?
///     .impacts(&[Impact::Cost, Impact::Benefit])?;
///
/// builder.add_alternative("Alpha", &[120.0, 3.5])?;
/// builder.add_alternative("Beta", &[95.0, 3.1])?;
///
/// let result = builder.compute()?;
/// assert_eq!(result.alternatives.len(), 2);
///
/// # Ok::<(), TopsisError>(())
/// ```
pub struct Builder {
    pub(crate) _rules: TopsisRules,
    pub(crate) _criteria: Option<Vec<String>>,
    pub(crate) _weights: Option<Vec<f64>>,
    pub(crate) _impacts: Option<Vec<Impact>>,
    pub(crate) _alternatives: Vec<(String, Vec<f64>)>,
}

impl Builder {
    pub fn new(rules: &TopsisRules) -> Result<Builder, TopsisError> {
        Ok(Builder {
            _rules: rules.clone(),
            _criteria: None,
            _weights: None,
            _impacts: None,
            _alternatives: Vec::new(),
        })
    }

    /// Names the criteria. There must be at least two of them.
    ///
    /// If not called, the criteria are named `C1`, `C2`, ... after the first alternative.
    pub fn criteria(self, names: &[String]) -> Result<Builder, TopsisError> {
        if names.len() < 2 {
            return Err(TopsisError::TooFewColumns {
                found: names.len() + 1,
            });
        }
        Ok(Builder {
            _criteria: Some(names.to_vec()),
            ..self
        })
    }

    pub fn weights(self, weights: &[f64]) -> Result<Builder, TopsisError> {
        Ok(Builder {
            _weights: Some(weights.to_vec()),
            ..self
        })
    }

    pub fn impacts(self, impacts: &[Impact]) -> Result<Builder, TopsisError> {
        Ok(Builder {
            _impacts: Some(impacts.to_vec()),
            ..self
        })
    }

    /// Adds an alternative.
    ///
    /// The number of values is checked against the criteria if they are already known.
    pub fn add_alternative(&mut self, id: &str, values: &[f64]) -> Result<(), TopsisError> {
        let row = self._alternatives.len() + 1;
        if let Some(names) = self._criteria.as_deref() {
            if names.len() != values.len() {
                return Err(TopsisError::RaggedRow {
                    row,
                    expected: names.len(),
                    found: values.len(),
                });
            }
        }
        if let Some((idx, x)) = values.iter().enumerate().find(|(_, x)| !x.is_finite()) {
            return Err(TopsisError::NonNumeric {
                row,
                column: self.criterion_name(idx),
                value: x.to_string(),
            });
        }
        self._alternatives.push((id.to_string(), values.to_vec()));
        Ok(())
    }

    /// The decision table corresponding to the alternatives added so far.
    pub fn table(&self) -> DecisionTable {
        let num_criteria = match self._criteria.as_deref() {
            Some(names) => names.len(),
            None => self._alternatives.first().map(|(_, v)| v.len()).unwrap_or(0),
        };
        let mut header = vec!["Alternative".to_string()];
        for j in 0..num_criteria {
            header.push(self.criterion_name(j));
        }
        let mut table = DecisionTable::new(header);
        for (id, values) in self._alternatives.iter() {
            let cells: Vec<String> = values.iter().map(|x| x.to_string()).collect();
            table.push(id, &cells);
        }
        table
    }

    pub fn compute(&self) -> Result<TopsisResult, TopsisError> {
        let table = self.table();
        let weights = self._weights.clone().unwrap_or_default();
        let impacts = self._impacts.clone().unwrap_or_default();
        crate::run_topsis(&table, &weights, &impacts, &self._rules)
    }

    fn criterion_name(&self, idx: usize) -> String {
        self._criteria
            .as_deref()
            .and_then(|names| names.get(idx).cloned())
            .unwrap_or_else(|| format!("C{}", idx + 1))
    }
}
