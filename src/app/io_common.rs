use snafu::prelude::*;
use std::path::Path;

use crate::app::*;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum InputType {
    Csv,
    Excel,
}

impl InputType {
    /// Uses the explicit type if provided, otherwise guesses from the extension of the path.
    pub fn detect(explicit: Option<&str>, path: &str) -> AppResult<InputType> {
        match explicit.map(|s| s.to_lowercase()).as_deref() {
            Some("csv") => Ok(InputType::Csv),
            Some("xlsx") | Some("excel") => Ok(InputType::Excel),
            Some(x) => UnknownInputTypeSnafu { input_type: x }.fail(),
            None => {
                let ext = Path::new(path)
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|e| e.to_lowercase());
                match ext.as_deref() {
                    Some("xlsx") | Some("xlsm") => Ok(InputType::Excel),
                    _ => Ok(InputType::Csv),
                }
            }
        }
    }
}

pub fn delimiter_byte(delimiter: char) -> AppResult<u8> {
    ensure!(
        delimiter.is_ascii() && delimiter != '"' && delimiter != '\n',
        InvalidDelimiterSnafu { delimiter }
    );
    Ok(delimiter as u8)
}

/// The last component of a path, if it is valid unicode.
pub fn simplify_file_name(path: &str) -> Option<String> {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_type_detection() {
        assert_eq!(InputType::detect(None, "a/b.csv").unwrap(), InputType::Csv);
        assert_eq!(InputType::detect(None, "b.XLSX").unwrap(), InputType::Excel);
        assert_eq!(InputType::detect(None, "data").unwrap(), InputType::Csv);
        assert_eq!(
            InputType::detect(Some("xlsx"), "b.csv").unwrap(),
            InputType::Excel
        );
        assert!(InputType::detect(Some("ods"), "b.csv").is_err());
    }

    #[test]
    fn delimiters() {
        assert_eq!(delimiter_byte(';').unwrap(), b';');
        assert_eq!(delimiter_byte('\t').unwrap(), b'\t');
        assert!(delimiter_byte('é').is_err());
        assert!(delimiter_byte('"').is_err());
    }

    #[test]
    fn file_names() {
        assert_eq!(
            simplify_file_name("/tmp/x/data.csv"),
            Some("data.csv".to_string())
        );
        assert_eq!(simplify_file_name("/"), None);
    }
}
