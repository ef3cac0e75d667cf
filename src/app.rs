use log::{debug, info};

use snafu::{prelude::*, Snafu};
use topsis::*;

use std::path::Path;

pub mod io_common;
pub mod io_csv;
pub mod io_excel;
pub mod io_output;
pub mod service;
pub mod service_config;

use crate::app::io_common::InputType;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum TopsisAppError {
    #[snafu(display("File not found: {path}"))]
    FileAccess { path: String },
    #[snafu(display("Unknown input type {input_type:?}: expected csv or xlsx"))]
    UnknownInputType { input_type: String },
    #[snafu(display("The delimiter must be a single ASCII character, found {delimiter:?}"))]
    InvalidDelimiter { delimiter: char },
    #[snafu(display("Unable to read input file {path}: {source}"))]
    CsvParse { source: csv::Error, path: String },
    #[snafu(display("Unable to open workbook {path}: {source}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The workbook {path} has no data"))]
    EmptyExcel { path: String },
    #[snafu(display("The workbook {path} has no worksheet named {worksheet:?}"))]
    MissingWorksheet { path: String, worksheet: String },
    #[snafu(display("{source}"))]
    Validation { source: TopsisError },
    #[snafu(display("Unable to render the result table: {source}"))]
    RenderingOutput { source: csv::Error },
    #[snafu(display("Unable to write output file {path}: {source}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Unable to serialize the summary: {source}"))]
    SerializingSummary { source: serde_json::Error },
    #[snafu(display("Unable to write summary {path}: {source}"))]
    WritingSummary {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Unable to read reference file {path}: {source}"))]
    ReadingReference {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Difference detected between the computed result and the reference {path}"))]
    ReferenceMismatch { path: String },
}

pub type AppResult<T> = Result<T, TopsisAppError>;

/// Everything needed for one ranking run from files.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub input: String,
    pub weights: String,
    pub impacts: String,
    pub output: String,
    /// The delimiter of the input table, reused for the output table.
    pub delimiter: u8,
    /// `csv`, `xlsx` or nothing to guess from the file extension.
    pub input_type: Option<String>,
    pub excel_worksheet_name: Option<String>,
    /// A file path or `stdout`.
    pub summary: Option<String>,
    pub reference: Option<String>,
    pub rules: TopsisRules,
}

impl RunSettings {
    pub fn new(input: &str, weights: &str, impacts: &str, output: &str) -> RunSettings {
        RunSettings {
            input: input.to_string(),
            weights: weights.to_string(),
            impacts: impacts.to_string(),
            output: output.to_string(),
            delimiter: b',',
            input_type: None,
            excel_worksheet_name: None,
            summary: None,
            reference: None,
            rules: TopsisRules::DEFAULT_RULES,
        }
    }
}

/// Reads the decision table pointed to by the settings.
pub fn read_table(settings: &RunSettings) -> AppResult<DecisionTable> {
    let path = settings.input.as_str();
    ensure!(Path::new(path).is_file(), FileAccessSnafu { path });
    let input_type = InputType::detect(settings.input_type.as_deref(), path)?;
    info!("Attempting to read {:?} as {:?}", path, input_type);
    let table = match input_type {
        InputType::Csv => io_csv::read_csv_table(path, settings.delimiter)?,
        InputType::Excel => {
            io_excel::read_excel_table(path, settings.excel_worksheet_name.as_deref())?
        }
    };
    debug!(
        "read_table: header: {:?} rows: {:?}",
        table.header,
        table.alternatives.len()
    );
    Ok(table)
}

/// Runs the ranking from the input file to the output file.
///
/// Nothing is written if the input fails validation.
pub fn run_ranking(settings: &RunSettings) -> AppResult<TopsisResult> {
    info!("run_ranking: settings: {:?}", settings);
    let table = read_table(settings)?;
    let result = run_topsis_text(&table, &settings.weights, &settings.impacts, &settings.rules)
        .context(ValidationSnafu {})?;

    let rendered = io_output::render_result_csv(&result, settings.delimiter)?;
    io_output::write_output(&settings.output, &rendered)?;
    info!("run_ranking: wrote {:?}", settings.output);

    if let Some(summary_path) = settings.summary.as_deref() {
        let js = io_output::build_summary_js(settings, &result);
        io_output::write_summary(summary_path, &js)?;
    }

    // The reference result, if provided for comparison
    if let Some(reference_path) = settings.reference.as_deref() {
        io_output::check_reference(reference_path, &rendered)?;
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::fs;

    #[derive(Debug, Deserialize)]
    struct CaseConfig {
        input: String,
        weights: String,
        impacts: String,
        delimiter: Option<char>,
    }

    fn data_dir() -> String {
        format!("{}/tests/data", env!("CARGO_MANIFEST_DIR"))
    }

    // Runs the case in tests/data/<test_name> and checks the output against the expected table.
    fn test_wrapper(test_name: &str) {
        let _ = env_logger::builder().is_test(true).try_init();
        let case_dir = format!("{}/{}", data_dir(), test_name);
        let config_str = fs::read_to_string(format!("{}/{}_config.json", case_dir, test_name))
            .expect("missing case configuration");
        let config: CaseConfig = serde_json::from_str(&config_str).unwrap();

        let out_dir = tempfile::tempdir().unwrap();
        let output = out_dir.path().join("result.csv");
        let mut settings = RunSettings::new(
            &format!("{}/{}", case_dir, config.input),
            &config.weights,
            &config.impacts,
            output.to_str().unwrap(),
        );
        if let Some(d) = config.delimiter {
            settings.delimiter = io_common::delimiter_byte(d).unwrap();
        }
        settings.reference = Some(format!("{}/{}_expected.csv", case_dir, test_name));

        if let Err(e) = run_ranking(&settings) {
            panic!("case {} failed: {}", test_name, e);
        }
    }

    #[test]
    fn phones() {
        test_wrapper("phones");
    }

    #[test]
    fn laptops() {
        test_wrapper("laptops");
    }

    #[test]
    fn semicolon_suppliers() {
        test_wrapper("semicolon_suppliers");
    }

    #[test]
    fn excel_phones() {
        test_wrapper("excel_phones");
    }

    fn write_input(dir: &Path, name: &str, content: &str) -> String {
        let p = dir.join(name);
        fs::write(&p, content).unwrap();
        p.to_str().unwrap().to_string()
    }

    #[test]
    fn missing_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("nope.csv");
        let output = dir.path().join("out.csv");
        let settings = RunSettings::new(
            input.to_str().unwrap(),
            "1,1",
            "+,+",
            output.to_str().unwrap(),
        );
        assert!(matches!(
            run_ranking(&settings),
            Err(TopsisAppError::FileAccess { .. })
        ));
        assert!(!output.exists());
    }

    #[test]
    fn ragged_csv_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "in.csv", "Model,Price,Storage\nA,1,2\nB,3\n");
        let output = dir.path().join("out.csv");
        let settings = RunSettings::new(&input, "1,1", "+,+", output.to_str().unwrap());
        assert!(matches!(
            run_ranking(&settings),
            Err(TopsisAppError::CsvParse { .. })
        ));
        assert!(!output.exists());
    }

    #[test]
    fn validation_errors_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(
            dir.path(),
            "in.csv",
            "Model,Price,Storage\nA,250,16\nB,200,sixteen\n",
        );
        let output = dir.path().join("out.csv");
        let settings = RunSettings::new(&input, "1,1", "-,+", output.to_str().unwrap());
        match run_ranking(&settings) {
            Err(TopsisAppError::Validation {
                source: TopsisError::NonNumeric { row, column, value },
            }) => {
                assert_eq!(row, 2);
                assert_eq!(column, "Storage");
                assert_eq!(value, "sixteen");
            }
            other => panic!("unexpected result {:?}", other),
        }
        assert!(!output.exists());

        let input = write_input(dir.path(), "two.csv", "Model,Price\nA,250\n");
        let settings = RunSettings::new(&input, "1", "-", output.to_str().unwrap());
        assert!(matches!(
            run_ranking(&settings),
            Err(TopsisAppError::Validation {
                source: TopsisError::TooFewColumns { found: 2 }
            })
        ));
        assert!(!output.exists());
    }

    #[test]
    fn output_keeps_input_layout() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(
            dir.path(),
            "in.csv",
            "Fund Name,P1,P2,P3\nM 1,0.84,0.71,6.7\nM 2,0.91,0.83,7.0\nM 3,0.79,0.62,4.8\n",
        );
        let output = dir.path().join("out.csv");
        let summary = dir.path().join("summary.json");
        let mut settings = RunSettings::new(&input, "1,2,1", "+,+,-", output.to_str().unwrap());
        settings.summary = Some(summary.to_str().unwrap().to_string());
        let result = run_ranking(&settings).unwrap();

        let written = fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines[0], "Fund Name,P1,P2,P3,Topsis Score,Rank");
        assert!(lines[1].starts_with("M 1,0.84,0.71,6.7,"));
        assert_eq!(lines.len(), 4);

        let js: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&summary).unwrap()).unwrap();
        assert_eq!(js["config"]["impacts"], "+,+,-");
        let results = js["results"].as_array().unwrap();
        assert_eq!(results.len(), 3);
        for (js_row, ra) in results.iter().zip(result.alternatives.iter()) {
            assert_eq!(js_row["id"], ra.id.as_str());
            assert_eq!(js_row["rank"], ra.rank);
        }
    }

    #[test]
    fn reference_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "in.csv", "Model,Price,Storage\nA,250,16\nB,200,16\n");
        let reference = write_input(dir.path(), "ref.csv", "Model,Price,Storage,Topsis Score,Rank\n");
        let output = dir.path().join("out.csv");
        let mut settings = RunSettings::new(&input, "1,1", "-,+", output.to_str().unwrap());
        settings.reference = Some(reference);
        assert!(matches!(
            run_ranking(&settings),
            Err(TopsisAppError::ReferenceMismatch { .. })
        ));
    }

    #[test]
    fn unknown_input_type() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "in.csv", "Model,Price,Storage\nA,250,16\n");
        let mut settings = RunSettings::new(&input, "1,1", "-,+", "unused.csv");
        settings.input_type = Some("parquet".to_string());
        assert!(matches!(
            run_ranking(&settings),
            Err(TopsisAppError::UnknownInputType { .. })
        ));
    }

    #[test]
    fn corrupt_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "in.xlsx", "Model,Price,Storage\nA,250,16\n");
        let settings = RunSettings::new(&input, "1,1", "-,+", "unused.csv");
        assert!(matches!(
            run_ranking(&settings),
            Err(TopsisAppError::OpeningExcel { .. })
        ));
    }
}
