//! Plain-text sections printed during a session.
//!
//! Every function writes to a caller-supplied sink so the binary can point it
//! at stdout and tests can capture it in a `Vec<u8>`.

use crate::locator::DatasetPaths;
use crate::stats::{
    ColumnInfo, DESCRIBE_ROWS, Describe, GroupRate, NullCount, ValueCount, column_info,
};
use crate::utils::format_cell;
use polars::prelude::*;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::PathBuf;

use super::KEY_INSIGHTS;

pub const SEARCH_HEADER: &str = "--- SEARCHING FOR DATASET FILES ---";
pub const INFO_HEADER: &str = "--- Dataset Info ---";
pub const MISSING_BEFORE_HEADER: &str = "--- Missing Values (Before Cleaning) ---";
pub const MISSING_AFTER_HEADER: &str = "--- Missing Values After Cleaning ---";
pub const SUMMARY_HEADER: &str = "--- Summary Statistics ---";
pub const SURVIVAL_COUNTS_HEADER: &str = "--- Survival Counts ---";
pub const GROUP_RATES_HEADER: &str = "--- Survival Rate by Group ---";
pub const INSIGHTS_HEADER: &str = "--- Key Insights ---";
pub const COMPLETED_BANNER: &str = "Titanic EDA Completed Successfully!";

fn section(out: &mut dyn Write, header: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", header)
}

fn format_stat(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{:.6}", value)
    }
}

pub fn write_search_header(out: &mut dyn Write) -> io::Result<()> {
    section(out, SEARCH_HEADER)
}

/// Diagnostic for unresolved input files. Lists every searched directory.
pub fn write_missing_files(
    out: &mut dyn Write,
    train_file: &str,
    test_file: &str,
    searched: &[PathBuf],
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "ERROR: {} or {} not found!", train_file, test_file)?;
    writeln!(out)?;
    writeln!(out, "Place both files in one of these locations:")?;
    writeln!(out)?;
    for dir in searched {
        writeln!(out, " - {}", dir.display())?;
    }
    writeln!(out)?;
    writeln!(out, "Then run the script again.")
}

pub fn write_found_files(out: &mut dyn Write, paths: &DatasetPaths) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Train file found at: {}", paths.train.display())?;
    writeln!(out, "Test file found at: {}", paths.test.display())
}

/// Row count, one line per column and a dtype tally.
pub fn write_info(out: &mut dyn Write, df: &DataFrame) -> io::Result<()> {
    section(out, INFO_HEADER)?;

    let rows = df.height();
    if rows == 0 {
        writeln!(out, "RangeIndex: 0 entries")?;
    } else {
        writeln!(out, "RangeIndex: {} entries, 0 to {}", rows, rows - 1)?;
    }
    writeln!(out, "Data columns (total {} columns):", df.width())?;

    let info: Vec<ColumnInfo> = column_info(df);
    let name_width = info.iter().map(|c| c.name.len()).max().unwrap_or(0).max(6);
    let count_width = info
        .iter()
        .map(|c| format!("{} non-null", c.non_null).len())
        .max()
        .unwrap_or(0)
        .max(14);

    writeln!(
        out,
        " #   {:<nw$}  {:<cw$}  Dtype",
        "Column",
        "Non-Null Count",
        nw = name_width,
        cw = count_width
    )?;
    writeln!(
        out,
        "---  {:<nw$}  {:<cw$}  -----",
        "------",
        "--------------",
        nw = name_width,
        cw = count_width
    )?;

    for (idx, col) in info.iter().enumerate() {
        writeln!(
            out,
            " {:<3} {:<nw$}  {:<cw$}  {}",
            idx,
            col.name,
            format!("{} non-null", col.non_null),
            col.dtype,
            nw = name_width,
            cw = count_width
        )?;
    }

    let mut tally: BTreeMap<&str, usize> = BTreeMap::new();
    for col in &info {
        *tally.entry(col.dtype.as_str()).or_insert(0) += 1;
    }
    let tally: Vec<String> = tally
        .into_iter()
        .map(|(dtype, count)| format!("{}({})", dtype, count))
        .collect();
    writeln!(out, "dtypes: {}", tally.join(", "))
}

/// First `n` rows, every column, right-aligned like a pandas frame.
pub fn write_head(out: &mut dyn Write, df: &DataFrame, n: usize) -> io::Result<()> {
    section(out, &format!("--- First {} Rows ---", n))?;

    let head = df.head(Some(n));
    let rows = head.height();

    let mut columns: Vec<Vec<String>> = Vec::with_capacity(head.width() + 1);
    columns.push(
        std::iter::once(String::new())
            .chain((0..rows).map(|i| i.to_string()))
            .collect(),
    );

    for col in head.get_columns() {
        let series = col.as_materialized_series();
        let mut cells = Vec::with_capacity(rows + 1);
        cells.push(col.name().to_string());
        for i in 0..rows {
            let cell = series
                .get(i)
                .map(|v| format_cell(&v))
                .unwrap_or_else(|_| "NaN".to_string());
            cells.push(cell);
        }
        columns.push(cells);
    }

    let widths: Vec<usize> = columns
        .iter()
        .map(|cells| cells.iter().map(|c| c.chars().count()).max().unwrap_or(0))
        .collect();

    for row in 0..=rows {
        let line: Vec<String> = columns
            .iter()
            .zip(&widths)
            .map(|(cells, width)| format!("{:>w$}", cells[row], w = width))
            .collect();
        writeln!(out, "{}", line.join("  ").trim_end())?;
    }

    Ok(())
}

fn write_null_table(out: &mut dyn Write, header: &str, counts: &[NullCount]) -> io::Result<()> {
    section(out, header)?;

    let name_width = counts.iter().map(|c| c.column.len()).max().unwrap_or(0);
    let count_width = counts
        .iter()
        .map(|c| c.nulls.to_string().len())
        .max()
        .unwrap_or(0);

    for c in counts {
        writeln!(
            out,
            "{:<nw$}    {:>cw$}",
            c.column,
            c.nulls,
            nw = name_width,
            cw = count_width
        )?;
    }
    Ok(())
}

pub fn write_missing_before(out: &mut dyn Write, counts: &[NullCount]) -> io::Result<()> {
    write_null_table(out, MISSING_BEFORE_HEADER, counts)
}

pub fn write_missing_after(out: &mut dyn Write, counts: &[NullCount]) -> io::Result<()> {
    write_null_table(out, MISSING_AFTER_HEADER, counts)
}

/// Describe table with statistics as rows and numeric columns across.
pub fn write_describe(out: &mut dyn Write, table: &Describe) -> io::Result<()> {
    section(out, SUMMARY_HEADER)?;

    let label_width = DESCRIBE_ROWS.iter().map(|r| r.len()).max().unwrap_or(0);

    let cells: Vec<Vec<String>> = table
        .columns
        .iter()
        .map(|c| c.row_values().iter().map(|v| format_stat(*v)).collect())
        .collect();
    let widths: Vec<usize> = table
        .columns
        .iter()
        .zip(&cells)
        .map(|(c, values)| {
            values
                .iter()
                .map(String::len)
                .chain(std::iter::once(c.name.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut header = format!("{:<w$}", "", w = label_width);
    for (c, width) in table.columns.iter().zip(&widths) {
        header.push_str(&format!("  {:>w$}", c.name, w = width));
    }
    writeln!(out, "{}", header)?;

    for (row, label) in DESCRIBE_ROWS.iter().enumerate() {
        let mut line = format!("{:<w$}", label, w = label_width);
        for (values, width) in cells.iter().zip(&widths) {
            line.push_str(&format!("  {:>w$}", values[row], w = width));
        }
        writeln!(out, "{}", line)?;
    }

    Ok(())
}

pub fn write_value_counts(
    out: &mut dyn Write,
    column: &str,
    counts: &[ValueCount],
) -> io::Result<()> {
    section(out, SURVIVAL_COUNTS_HEADER)?;
    writeln!(out, "{}", column)?;

    let width = counts.iter().map(|c| c.value.len()).max().unwrap_or(0);
    for c in counts {
        writeln!(out, "{:<w$}    {}", c.value, c.count, w = width)?;
    }
    Ok(())
}

/// Survival rate per group for each grouping column, in the order given.
pub fn write_group_rates(out: &mut dyn Write, groups: &[(&str, &[GroupRate])]) -> io::Result<()> {
    section(out, GROUP_RATES_HEADER)?;

    for (column, rates) in groups {
        writeln!(out, "{}", column)?;
        let width = rates.iter().map(|r| r.group.len()).max().unwrap_or(0);
        for r in rates.iter() {
            writeln!(out, "{:<w$}    {}", r.group, format_stat(r.rate), w = width)?;
        }
    }
    Ok(())
}

pub fn write_insights(out: &mut dyn Write) -> io::Result<()> {
    section(out, INSIGHTS_HEADER)?;
    for (idx, line) in KEY_INSIGHTS.iter().enumerate() {
        writeln!(out, "{}. {}", idx + 1, line)?;
    }
    Ok(())
}

pub fn write_completed(out: &mut dyn Write) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", COMPLETED_BANNER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{describe, group_rates, null_counts, value_counts};

    fn sample() -> DataFrame {
        df![
            "PassengerId" => [1i64, 2, 3],
            "Survived" => [0i64, 1, 1],
            "Sex" => ["male", "female", "female"],
            "Age" => [Some(22.0), None, Some(26.0)],
        ]
        .unwrap()
    }

    fn render(f: impl FnOnce(&mut dyn Write) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_missing_files_lists_every_candidate() {
        let searched = vec![
            PathBuf::from("/w"),
            PathBuf::from("/p"),
            PathBuf::from("/w/data"),
            PathBuf::from("/p/data"),
        ];
        let text = render(|out| write_missing_files(out, "train.csv", "test.csv", &searched));

        assert!(text.contains("ERROR: train.csv or test.csv not found!"));
        for dir in &searched {
            assert!(text.contains(&format!(" - {}", dir.display())));
        }
        assert!(text.trim_end().ends_with("Then run the script again."));
    }

    #[test]
    fn test_info_layout() {
        let text = render(|out| write_info(out, &sample()));

        assert!(text.contains(INFO_HEADER));
        assert!(text.contains("RangeIndex: 3 entries, 0 to 2"));
        assert!(text.contains("Data columns (total 4 columns):"));
        assert!(text.contains("2 non-null"));
        assert!(text.contains("dtypes: f64(1), i64(2), str(1)"));
    }

    #[test]
    fn test_head_shows_nan_for_missing() {
        let text = render(|out| write_head(out, &sample(), 5));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[1], "--- First 5 Rows ---");
        assert!(lines[2].contains("PassengerId"));
        assert!(lines[4].contains("NaN"));
        assert!(lines[3].contains("22.0000"));
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn test_null_table() {
        let counts = null_counts(&sample());
        let text = render(|out| write_missing_before(out, &counts));

        assert!(text.contains(MISSING_BEFORE_HEADER));
        assert!(text.lines().any(|l| l.starts_with("Age") && l.ends_with('1')));
        assert!(text.lines().any(|l| l.starts_with("Sex") && l.ends_with('0')));
    }

    #[test]
    fn test_describe_table() {
        let table = describe(&sample()).unwrap();
        let text = render(|out| write_describe(out, &table));

        let header = text.lines().nth(2).unwrap();
        assert!(header.contains("PassengerId"));
        assert!(header.contains("Age"));
        assert!(!header.contains("Sex"));
        assert!(text.contains("count"));
        assert!(text.contains("3.000000"));
        assert!(text.contains("24.000000"));
    }

    #[test]
    fn test_value_counts_and_rates() {
        let df = sample();
        let counts = value_counts(&df, "Survived").unwrap();
        let rates = group_rates(&df, "Sex", "Survived").unwrap();

        let text = render(|out| write_value_counts(out, "Survived", &counts));
        assert!(text.contains("1    2"));
        assert!(text.contains("0    1"));

        let text = render(|out| write_group_rates(out, &[("Sex", rates.as_slice())]));
        assert!(text.contains("female    1.000000"));
        assert!(text.contains("male      0.000000"));
    }

    #[test]
    fn test_insights_and_banner() {
        let text = render(|out| {
            write_insights(out)?;
            write_completed(out)
        });

        assert!(text.contains("1. Females had a significantly higher survival rate than males."));
        assert!(text.contains("4. Fare and passenger class strongly affect survival."));
        assert!(text.trim_end().ends_with(COMPLETED_BANNER));
    }
}
