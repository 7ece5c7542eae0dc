//! Dense record construction from sparse spreadsheet cells.

/// Cells of one spreadsheet row as `(column index, text)` pairs, in any order.
pub type SparseRow = Vec<(usize, String)>;

/// One output line: a gap-free sequence of field values.
pub type Record = Vec<String>;

/// Places every cell at its column index, fills gaps with empty fields, and
/// pads the result to `min_len`. Rows wider than `min_len` are kept whole.
pub fn normalize(mut cells: SparseRow, min_len: usize) -> Record {
    cells.sort_by_key(|(index, _)| *index);
    let width = cells.last().map_or(0, |(index, _)| index + 1);
    let mut record = Record::with_capacity(width.max(min_len));
    for (index, value) in cells {
        if index < record.len() {
            // duplicate column index: last value wins
            record[index] = value;
            continue;
        }
        record.resize(index, String::new());
        record.push(value);
    }
    if record.len() < min_len {
        record.resize(min_len, String::new());
    }
    record
}
