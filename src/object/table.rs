use super::index::Index;
use super::Value;
use crate::error::{Error, Result};

/// A typed table column
#[derive(Debug, Clone, PartialEq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Column {
    Float(Vec<f64>),
    Int(Vec<i64>),
    Bool(Vec<bool>),
    Str(Vec<String>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Float(v) => v.len(),
            Column::Int(v) => v.len(),
            Column::Bool(v) => v.len(),
            Column::Str(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, i: usize) -> Option<Value> {
        match self {
            Column::Float(v) => v.get(i).map(|&x| Value::Float(x)),
            Column::Int(v) => v.get(i).map(|&x| Value::Int(x)),
            Column::Bool(v) => v.get(i).map(|&x| Value::Bool(x)),
            Column::Str(v) => v.get(i).map(|x| Value::Str(x.clone())),
        }
    }

    /// Gather entries at `positions`, which must be in bounds
    fn take(&self, positions: &[usize]) -> Column {
        fn gather<T: Clone>(v: &[T], positions: &[usize]) -> Vec<T> {
            positions.iter().map(|&i| v[i].clone()).collect()
        }

        match self {
            Column::Float(v) => Column::Float(gather(v, positions)),
            Column::Int(v) => Column::Int(gather(v, positions)),
            Column::Bool(v) => Column::Bool(gather(v, positions)),
            Column::Str(v) => Column::Str(gather(v, positions)),
        }
    }
}

impl From<Vec<f64>> for Column {
    fn from(value: Vec<f64>) -> Self {
        Column::Float(value)
    }
}

impl From<Vec<i64>> for Column {
    fn from(value: Vec<i64>) -> Self {
        Column::Int(value)
    }
}

impl From<Vec<bool>> for Column {
    fn from(value: Vec<bool>) -> Self {
        Column::Bool(value)
    }
}

impl From<Vec<String>> for Column {
    fn from(value: Vec<String>) -> Self {
        Column::Str(value)
    }
}

impl From<Vec<&str>> for Column {
    fn from(value: Vec<&str>) -> Self {
        Column::Str(value.into_iter().map(String::from).collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum TableAxis {
    Rows,
    Columns,
}

/// Two dimensional labeled table
///
/// Rows are labeled by `index`, columns by name, and each column holds
/// values of a single type.
///
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    index: Vec<String>,
    columns: Vec<(String, Column)>,
}

impl Table {
    pub fn new(index: Vec<String>) -> Self {
        Table {
            index,
            columns: Vec::new(),
        }
    }

    /// A table with rows labeled `"0"`, `"1"`, ...
    pub fn with_rows(n: usize) -> Self {
        Table::new((0..n).map(|i| i.to_string()).collect())
    }

    /// Builder-style column insertion
    pub fn with_column(mut self, name: impl Into<String>, column: impl Into<Column>) -> Result<Self> {
        self.set_column(name, column)?;
        Ok(self)
    }

    pub fn nrows(&self) -> usize {
        self.index.len()
    }

    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    pub fn index(&self) -> &[String] {
        &self.index
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }

    /// Look up a value by row label and column name
    pub fn get(&self, row: &str, column: &str) -> Option<Value> {
        let i = self.index.iter().position(|r| r == row)?;
        self.column(column)?.get(i)
    }

    /// Replace a column, or append it if no column has this name
    pub fn set_column(&mut self, name: impl Into<String>, column: impl Into<Column>) -> Result<()> {
        let (name, column) = (name.into(), column.into());
        if column.len() != self.nrows() {
            return Err(Error::ColumnLength {
                name,
                expected: self.nrows(),
                found: column.len(),
            });
        }

        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = column,
            None => self.columns.push((name, column)),
        }
        Ok(())
    }

    /// A new table without the labeled rows or columns
    pub fn drop(&self, labels: &[&str], axis: TableAxis) -> Result<Table> {
        let mut table = self.clone();
        table.drop_inplace(labels, axis)?;
        Ok(table)
    }

    /// Remove the labeled rows or columns; every label must exist
    pub fn drop_inplace(&mut self, labels: &[&str], axis: TableAxis) -> Result<()> {
        let names: Vec<&str> = match axis {
            TableAxis::Rows => self.index.iter().map(String::as_str).collect(),
            TableAxis::Columns => self.column_names(),
        };
        if let Some(missing) = labels.iter().find(|l| !names.contains(*l)) {
            return Err(Error::KeyNotFound(missing.to_string()));
        }

        match axis {
            TableAxis::Rows => {
                let keep: Vec<usize> = (0..self.nrows())
                    .filter(|&i| !labels.contains(&self.index[i].as_str()))
                    .collect();
                *self = self.take_rows(&keep);
            }
            TableAxis::Columns => self.columns.retain(|(n, _)| !labels.contains(&n.as_str())),
        }
        Ok(())
    }

    fn take_rows(&self, positions: &[usize]) -> Table {
        Table {
            index: positions.iter().map(|&i| self.index[i].clone()).collect(),
            columns: self
                .columns
                .iter()
                .map(|(n, c)| (n.clone(), c.take(positions)))
                .collect(),
        }
    }

    /// Subset rows, and optionally columns by position
    pub fn subset(&self, rows: Option<&Index>, cols: Option<&Index>) -> Result<Table> {
        let mut table = match rows {
            Some(rows) => self.take_rows(&rows.positions(self.nrows())?),
            None => self.clone(),
        };

        if let Some(cols) = cols {
            let positions = cols.positions(table.ncols())?;
            table.columns = positions.iter().map(|&i| table.columns[i].clone()).collect();
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells() -> Table {
        Table::new(vec!["c1".into(), "c2".into(), "c3".into()])
            .with_column("n_genes", vec![10_i64, 20, 30])
            .unwrap()
            .with_column("qc", vec![true, false, true])
            .unwrap()
    }

    #[test]
    fn column_length_checked() {
        let res = cells().with_column("bad", vec![1.0]);
        assert_eq!(
            res,
            Err(Error::ColumnLength {
                name: "bad".into(),
                expected: 3,
                found: 1
            })
        );
    }

    #[test]
    fn set_column_replaces() {
        let mut t = cells();
        t.set_column("qc", vec![false, false, false]).unwrap();
        assert_eq!(t.ncols(), 2);
        assert_eq!(t.get("c1", "qc"), Some(Value::Bool(false)));
    }

    #[test]
    fn drop_rows_and_columns() {
        let t = cells();
        let rows = t.drop(&["c2"], TableAxis::Rows).unwrap();
        assert_eq!(rows.index(), &["c1".to_string(), "c3".to_string()]);
        assert_eq!(rows.get("c3", "n_genes"), Some(Value::Int(30)));

        let cols = t.drop(&["qc"], TableAxis::Columns).unwrap();
        assert_eq!(cols.column_names(), vec!["n_genes"]);
        assert_eq!(t.ncols(), 2);
    }

    #[test]
    fn drop_missing_label() {
        let mut t = cells();
        assert_eq!(
            t.drop_inplace(&["nope"], TableAxis::Columns),
            Err(Error::KeyNotFound("nope".into()))
        );
        assert_eq!(t, cells());
    }

    #[test]
    fn subset_rows() {
        let t = cells().subset(Some(&Index::Mask(vec![true, false, true])), None).unwrap();
        assert_eq!(t.nrows(), 2);
        assert_eq!(t.get("c3", "qc"), Some(Value::Bool(true)));
    }
}
