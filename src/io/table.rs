use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::io::{Format, error::Error};

/// Rows of a delimited text file restricted to a set of columns.
///
/// Cells are stored row-major in the order of [`Table::columns`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.column_index(column)?;
        self.rows.get(row).map(|cells| cells[col].as_str())
    }

    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.rows.iter().map(Vec::as_slice)
    }
}

/// Opens `path` and reads it with [`read`].
pub fn read_path(path: &Path, columns: &[&str]) -> Result<Table, Error> {
    let file = File::open(path)?;
    read(BufReader::new(file), columns)
}

/// Reads a delimited table, keeping only `columns` (all columns if empty).
///
/// The delimiter is a tab when the header line contains a tab but no comma, and a
/// comma otherwise. Fields may be wrapped in double quotes, with `""` standing for a
/// literal quote. Blank lines are skipped.
pub fn read<R: BufRead>(reader: R, columns: &[&str]) -> Result<Table, Error> {
    let mut lines = reader.lines().enumerate();

    let (header_no, header) = loop {
        match lines.next() {
            Some((i, line)) => {
                let line = line?;
                if !line.trim().is_empty() {
                    break (i + 1, line);
                }
            }
            None => {
                return match columns.first() {
                    Some(first) => Err(Error::MissingColumn {
                        column: first.to_string(),
                    }),
                    None => Ok(Table::default()),
                };
            }
        }
    };

    let delimiter = if header.contains('\t') && !header.contains(',') {
        b'\t'
    } else {
        b','
    };

    let names: Vec<String> = split_line(&header, delimiter, header_no)?
        .into_iter()
        .map(|name| name.trim().to_string())
        .collect();

    let selected: Vec<usize> = if columns.is_empty() {
        (0..names.len()).collect()
    } else {
        columns
            .iter()
            .map(|wanted| {
                names
                    .iter()
                    .position(|name| name == wanted)
                    .ok_or_else(|| Error::MissingColumn {
                        column: wanted.to_string(),
                    })
            })
            .collect::<Result<_, _>>()?
    };

    let mut rows = Vec::new();
    for (i, line) in lines {
        let line = line?;
        let line_no = i + 1;
        if line.trim().is_empty() {
            continue;
        }

        let mut cells = split_line(&line, delimiter, line_no)?;
        if cells.len() != names.len() {
            return Err(Error::parse(
                Format::Table,
                line_no,
                format!("expected {} fields, found {}", names.len(), cells.len()),
            ));
        }

        rows.push(
            selected
                .iter()
                .map(|&col| std::mem::take(&mut cells[col]))
                .collect(),
        );
    }

    Ok(Table {
        columns: selected.iter().map(|&col| names[col].clone()).collect(),
        rows,
    })
}

fn split_line(line: &str, delimiter: u8, line_no: usize) -> Result<Vec<String>, Error> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let bytes = line.as_bytes();

    let mut out = Vec::new();
    let mut cur: Vec<u8> = Vec::new();
    let mut in_quotes = false;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if b == b'"' {
            if in_quotes && bytes.get(i + 1) == Some(&b'"') {
                cur.push(b'"');
                i += 2;
                continue;
            }
            in_quotes = !in_quotes;
        } else if b == delimiter && !in_quotes {
            out.push(String::from_utf8_lossy(&cur).into_owned());
            cur.clear();
        } else {
            cur.push(b);
        }
        i += 1;
    }

    if in_quotes {
        return Err(Error::parse(Format::Table, line_no, "unterminated quoted field"));
    }
    out.push(String::from_utf8_lossy(&cur).into_owned());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const CSV: &str = "receptor,drugID,smiles,Hy\n\
                       fgfr1,D1,CCO,0.5\n\
                       \n\
                       fgfr1,D2,\"C(=O)O\",1.25\n";

    #[test]
    fn reads_selected_columns_in_requested_order() {
        let table = read(Cursor::new(CSV), &["smiles", "drugID"]).unwrap();
        assert_eq!(table.columns(), ["smiles", "drugID"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(0, "drugID"), Some("D1"));
        assert_eq!(table.cell(1, "smiles"), Some("C(=O)O"));
        assert_eq!(table.cell(1, "Hy"), None);
    }

    #[test]
    fn empty_allowlist_keeps_every_column() {
        let table = read(Cursor::new(CSV), &[]).unwrap();
        assert_eq!(table.columns().len(), 4);
        assert_eq!(table.cell(0, "Hy"), Some("0.5"));
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let err = read(Cursor::new(CSV), &["vina_score"]).unwrap_err();
        assert!(matches!(err, Error::MissingColumn { ref column } if column == "vina_score"));
    }

    #[test]
    fn ragged_row_reports_line_number() {
        let text = "a,b\n1,2\n3\n";
        match read(Cursor::new(text), &[]).unwrap_err() {
            Error::Parse { position, .. } => assert_eq!(position, 3),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn tab_delimited_header_is_detected() {
        let table = read(Cursor::new("a\tb\r\n1\t2\r\n"), &["b"]).unwrap();
        assert_eq!(table.cell(0, "b"), Some("2"));
    }

    #[test]
    fn quotes_protect_delimiters_and_escape_themselves() {
        let cells = split_line(r#"x,"a,b","say ""hi""""#, b',', 1).unwrap();
        assert_eq!(cells, ["x", "a,b", "say \"hi\""]);
        assert!(split_line("\"open", b',', 4).is_err());
    }

    #[test]
    fn empty_input_has_no_columns() {
        assert!(read(Cursor::new(""), &[]).unwrap().is_empty());
        assert!(matches!(
            read(Cursor::new("\n"), &["a"]),
            Err(Error::MissingColumn { .. })
        ));
    }
}
