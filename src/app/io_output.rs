// Writing the result table, the JSON summary and checking against a reference.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_json::Value as JSValue;
use snafu::prelude::*;
use std::fs;
use text_diff::print_diff;
use topsis::TopsisResult;

use crate::app::*;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    pub input: String,
    pub output: String,
    pub weights: String,
    pub impacts: String,
    #[serde(rename = "degenerateScore")]
    pub degenerate_score: String,
    #[serde(rename = "weightPolicy")]
    pub weight_policy: String,
}

/// Renders the result table with the given delimiter, header first.
pub fn render_result_csv(result: &TopsisResult, delimiter: u8) -> AppResult<String> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    wtr.write_record(result.output_header())
        .context(RenderingOutputSnafu {})?;
    for row in result.output_rows() {
        wtr.write_record(&row).context(RenderingOutputSnafu {})?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| csv::Error::from(std::io::Error::new(e.error().kind(), e.error().to_string())))
        .context(RenderingOutputSnafu {})?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn write_output(path: &str, rendered: &str) -> AppResult<()> {
    fs::write(path, rendered).context(WritingOutputSnafu { path })
}

pub fn build_summary_js(settings: &RunSettings, result: &TopsisResult) -> JSValue {
    let c = SummaryConfig {
        input: settings.input.clone(),
        output: settings.output.clone(),
        weights: settings.weights.clone(),
        impacts: settings.impacts.clone(),
        degenerate_score: format!("{:?}", settings.rules.degenerate_score),
        weight_policy: format!("{:?}", settings.rules.weight_policy),
    };
    let results: Vec<JSValue> = result
        .alternatives
        .iter()
        .map(|ra| {
            json!({
                "id": ra.id,
                "score": ra.score,
                "rank": ra.rank,
                "distanceBest": ra.distance_best,
                "distanceWorst": ra.distance_worst,
            })
        })
        .collect();
    json!({
        "config": c,
        "criteria": result.header.iter().skip(1).collect::<Vec<_>>(),
        "idealBest": result.ideal_best,
        "idealWorst": result.ideal_worst,
        "results": results,
    })
}

/// Writes the summary to a file, or to the standard output if the destination is `stdout`.
pub fn write_summary(destination: &str, js: &JSValue) -> AppResult<()> {
    let pretty = serde_json::to_string_pretty(js).context(SerializingSummarySnafu {})?;
    if destination == "stdout" {
        println!("{}", pretty);
    } else {
        info!("write_summary: writing summary to {:?}", destination);
        fs::write(destination, pretty).context(WritingSummarySnafu { path: destination })?;
    }
    Ok(())
}

/// Compares the rendered result with a reference file, ignoring line ending styles.
pub fn check_reference(reference_path: &str, rendered: &str) -> AppResult<()> {
    let reference = fs::read_to_string(reference_path).context(ReadingReferenceSnafu {
        path: reference_path,
    })?;
    let expected = normalize_lines(&reference);
    let computed = normalize_lines(rendered);
    debug!("check_reference: reference: {:?}", expected);
    if expected != computed {
        warn!("Found differences with the reference {:?}", reference_path);
        print_diff(expected.as_str(), computed.as_str(), "\n");
        return ReferenceMismatchSnafu {
            path: reference_path,
        }
        .fail();
    }
    Ok(())
}

fn normalize_lines(text: &str) -> String {
    let lines: Vec<&str> = text.lines().map(|l| l.trim_end()).collect();
    lines.join("\n").trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use topsis::{run_topsis_text, DecisionTable, TopsisRules};

    fn result() -> TopsisResult {
        let mut t = DecisionTable::new(vec![
            "Name".to_string(),
            "Cost".to_string(),
            "Quality".to_string(),
        ]);
        t.push("North, Ltd", &["10".to_string(), "3".to_string()]);
        t.push("South", &["12.50".to_string(), "4".to_string()]);
        run_topsis_text(&t, "1,1", "-,+", &TopsisRules::DEFAULT_RULES).unwrap()
    }

    #[test]
    fn render_quotes_when_needed() {
        let text = render_result_csv(&result(), b',').unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Name,Cost,Quality,Topsis Score,Rank");
        assert!(lines[1].starts_with("\"North, Ltd\",10,3,"));
        assert!(lines[2].starts_with("South,12.50,4,"));
        assert!(!text.contains('\r'));
    }

    #[test]
    fn render_with_tabs() {
        let text = render_result_csv(&result(), b'\t').unwrap();
        assert!(text.starts_with("Name\tCost\tQuality\tTopsis Score\tRank\n"));
        assert!(text.contains("North, Ltd\t10\t3\t"));
    }

    #[test]
    fn line_endings_are_ignored() {
        assert_eq!(normalize_lines("a,b\r\nc,d\r\n"), normalize_lines("a,b\nc,d"));
    }

    #[test]
    fn summary_layout() {
        let settings = RunSettings::new("in.csv", "1,1", "-,+", "out.csv");
        let js = build_summary_js(&settings, &result());
        assert_eq!(js["config"]["weights"], "1,1");
        assert_eq!(js["config"]["weightPolicy"], "RejectNonPositive");
        assert_eq!(js["criteria"][1], "Quality");
        assert_eq!(js["idealBest"].as_array().unwrap().len(), 2);
        assert_eq!(js["results"][0]["id"], "North, Ltd");
    }
}
