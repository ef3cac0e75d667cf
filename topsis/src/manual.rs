/*!

This is the long-form manual for `topsis` and the `topsis` command line program.

## The method

TOPSIS (Technique for Order of Preference by Similarity to Ideal Solution) ranks a set of
alternatives described by numeric criteria. Each criterion has a weight and an impact:
`+` when higher values are better (a benefit), `-` when lower values are better (a cost).

The computation goes as follows:
1. each criterion column is divided by its Euclidean norm. A column of zeros keeps its values.
2. each normalized value is multiplied by the weight of its criterion.
3. the ideal-best point takes the maximum of each benefit column and the minimum of each cost
   column. The ideal-worst point takes the opposite.
4. for each alternative, the Euclidean distances to the ideal-best point (`d+`) and to the
   ideal-worst point (`d-`) are computed.
5. the score is `d- / (d+ + d-)`, between 0 and 1. Higher is better.
6. the alternatives are ranked by decreasing score. Equal scores share the same rank and the
   next score takes the following rank (`1, 2, 2, 3`).

When an alternative sits on both ideal points at once (this happens when every criterion
column is constant), its score is undefined. By default it receives the score `0.5` and a
warning is logged. The rule [crate::DegenerateScoreMode::Fail] turns this case into an error.

Weights must be strictly positive by default. The rule [crate::WeightPolicy::Permissive]
accepts zero and negative weights, with the results that one would expect from the formulas.

## Input formats

The input is a table. The first row is the header, the first column identifies the
alternatives, and every following column is a criterion. There must be at least 3 columns.
All the criterion cells must be numbers: surrounding spaces are accepted, empty cells are not.

### `csv`

A delimited text file. The delimiter is `,` unless another one is given with `--delimiter`.
Fields may be quoted the usual way. All the rows must have the same number of fields.

### `xlsx`

An Excel workbook. The first worksheet is used unless `--excel-worksheet-name` is given.
Rows where every cell is empty are ignored.

By default, files ending with `.xlsx` or `.xlsm` are read as Excel workbooks and all the
other files as delimited text. `--input-type` overrides the guess.

## Weights and impacts

Both are given as comma-separated lists, with exactly one item per criterion:

```text
weights: 1,1,1,2
impacts: +,+,-,+
```

Spaces around the items are ignored.

## Output

The output table is the input table, in the same order and with the same text in each cell,
followed by two columns: `Topsis Score` and `Rank`. It uses the delimiter of the input.

With `--summary <path>` (or `--summary stdout`), a JSON document is also written:

```json
{
  "config": {"input": "data.csv", "output": "result.csv", "weights": "1,1", "impacts": "-,+", ...},
  "criteria": ["Price", "Storage"],
  "idealBest": [0.39, 0.78],
  "idealWorst": [0.59, 0.39],
  "results": [{"id": "M1", "score": 0.35, "rank": 2, "distanceBest": 0.4, "distanceWorst": 0.22}]
}
```

With `--reference <path>`, the computed table is compared with the given file. Differences
are printed and the program fails. This is mostly useful for testing.

## Example

Three phones, compared on price (lower is better) and storage (higher is better), with equal
weights:

| Model | Price | Storage |
|-------|-------|---------|
| A     | 250   | 16      |
| B     | 200   | 16      |
| C     | 300   | 32      |

```text
topsis phones.csv "1,1" "-,+" result.csv
```

| Model | Price | Storage | Topsis Score | Rank |
|-------|-------|---------|--------------|------|
| A     | 250   | 16      | 0.2119       | 3    |
| B     | 200   | 16      | 0.3583       | 2    |
| C     | 300   | 32      | 0.6417       | 1    |

(scores rounded here, the output file carries the full precision)

## Errors

The program prints `Error: <message>` on the standard error and exits with the code 1 when:
- the input file does not exist or cannot be parsed
- the table has fewer than 3 columns, or rows of different lengths
- a criterion cell is not a number
- the weights are not numbers, or an impact is not `+` or `-`
- the numbers of weights, impacts and criteria differ
- a weight is not strictly positive (unless `--allow-nonpositive-weights`)

No output file is written in these cases.
*/
