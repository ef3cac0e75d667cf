use clap::Parser;

/// Ranks alternatives with the TOPSIS multi-criteria decision method.
///
/// Example: topsis data.csv "1,1,1,2" "+,+,-,+" result.csv
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The decision table. The first row is the header, the first column
    /// identifies the alternatives and every other column is a numeric criterion.
    #[clap(value_parser)]
    pub input: String,

    /// (comma-separated numbers) One weight per criterion, for example "1,1,1,2".
    #[clap(value_parser, allow_hyphen_values = true)]
    pub weights: String,

    /// (comma-separated + or -) One impact per criterion: + when higher is better,
    /// - when lower is better.
    #[clap(value_parser, allow_hyphen_values = true)]
    pub impacts: String,

    /// (file path) Where to write the input table extended with the score and rank columns.
    #[clap(value_parser)]
    pub output: String,

    /// (default ',') The field delimiter of the input table, also used for the output.
    #[clap(short, long, value_parser, default_value_t = ',')]
    pub delimiter: char,

    /// (csv, xlsx or empty) The type of the input. By default it is guessed from the file extension.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// When using an Excel file, the name of the worksheet to use. Defaults to the first one.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (file path, 'stdout' or empty) If specified, a summary of the ranking will be written in JSON
    /// format to the given location.
    #[clap(short, long, value_parser)]
    pub summary: Option<String>,

    /// (file path) A reference result table. If provided, the computed table is checked
    /// against it and differences are reported.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// Accepts zero and negative weights instead of rejecting them.
    #[clap(long, takes_value = false)]
    pub allow_nonpositive_weights: bool,

    /// Fails when the score of an alternative is undefined, instead of giving it 0.5.
    #[clap(long, takes_value = false)]
    pub fail_on_degenerate: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
