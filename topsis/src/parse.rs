use log::debug;

use crate::config::*;

/// Parses a comma-separated list of weights, for example `1,1,2`.
///
/// Whitespace around each item is ignored. Every item must be a finite number.
pub fn parse_weights(text: &str) -> Result<Vec<f64>, TopsisError> {
    let mut res: Vec<f64> = Vec::new();
    for item in text.split(',') {
        match item.trim().parse::<f64>() {
            Ok(w) if w.is_finite() => res.push(w),
            _ => {
                return Err(TopsisError::InvalidFormat {
                    list: ListKind::Weights,
                    content: text.to_string(),
                })
            }
        }
    }
    debug!("parse_weights: {:?} -> {:?}", text, res);
    Ok(res)
}

/// Parses a comma-separated list of impacts, for example `+,-,+`.
pub fn parse_impacts(text: &str) -> Result<Vec<Impact>, TopsisError> {
    if text.trim().is_empty() {
        return Err(TopsisError::InvalidFormat {
            list: ListKind::Impacts,
            content: text.to_string(),
        });
    }
    let mut res: Vec<Impact> = Vec::new();
    for (idx, item) in text.split(',').enumerate() {
        let impact = parse_impact(item.trim()).ok_or_else(|| TopsisError::InvalidImpact {
            position: idx + 1,
            symbol: item.trim().to_string(),
        })?;
        res.push(impact);
    }
    debug!("parse_impacts: {:?} -> {:?}", text, res);
    Ok(res)
}

pub fn parse_impact(symbol: &str) -> Option<Impact> {
    match symbol {
        "+" => Some(Impact::Benefit),
        "-" => Some(Impact::Cost),
        _ => None,
    }
}

/// Converts one criterion cell to a number.
pub(crate) fn parse_criterion_value(cell: &str) -> Option<f64> {
    match cell.trim().parse::<f64>() {
        Ok(x) if x.is_finite() => Some(x),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_are_trimmed() {
        assert_eq!(parse_weights("1, 2 ,0.5").unwrap(), vec![1.0, 2.0, 0.5]);
    }

    #[test]
    fn weights_reject_garbage() {
        for text in ["", "1,,2", "1;2", "a,b", "1,inf", "NaN,1"] {
            assert!(
                matches!(
                    parse_weights(text),
                    Err(TopsisError::InvalidFormat {
                        list: ListKind::Weights,
                        ..
                    })
                ),
                "{:?} should not parse",
                text
            );
        }
    }

    #[test]
    fn impacts_symbols() {
        assert_eq!(
            parse_impacts("+, -,+").unwrap(),
            vec![Impact::Benefit, Impact::Cost, Impact::Benefit]
        );
        assert_eq!(
            parse_impacts("+,*"),
            Err(TopsisError::InvalidImpact {
                position: 2,
                symbol: "*".to_string()
            })
        );
        assert!(matches!(
            parse_impacts("+,,-"),
            Err(TopsisError::InvalidImpact { position: 2, .. })
        ));
        assert!(matches!(
            parse_impacts("  "),
            Err(TopsisError::InvalidFormat {
                list: ListKind::Impacts,
                ..
            })
        ));
    }

    #[test]
    fn criterion_cells() {
        assert_eq!(parse_criterion_value(" 250 "), Some(250.0));
        assert_eq!(parse_criterion_value("1e3"), Some(1000.0));
        assert_eq!(parse_criterion_value("-0.5"), Some(-0.5));
        assert_eq!(parse_criterion_value(""), None);
        assert_eq!(parse_criterion_value("12kg"), None);
        assert_eq!(parse_criterion_value("inf"), None);
    }
}
