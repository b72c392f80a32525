use colored::*;

/// Left-aligned text table sized to its widest cells
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    /// Indexes of rows printed dimmed
    muted: Vec<usize>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            muted: Vec::new(),
        }
    }

    /// Missing cells render empty, extra cells are dropped
    pub fn row<I, S>(&mut self, cells: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cells: Vec<String> = cells.into_iter().map(Into::into).collect();
        cells.resize(self.headers.len(), String::new());
        self.rows.push(cells);
        self
    }

    /// A row shown dimmed, for entries that no longer count
    pub fn muted_row<I, S>(&mut self, cells: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.muted.push(self.rows.len());
        self.row(cells)
    }

    pub fn is_muted(&self, row: usize) -> bool {
        self.muted.contains(&row)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                self.rows
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    fn render_line(cells: &[String], widths: &[usize]) -> String {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    }

    /// Plain rendering, one string per line including the header rule
    pub fn lines(&self) -> Vec<String> {
        let widths = self.widths();
        let rule_len = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);

        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(Self::render_line(&self.headers, &widths));
        lines.push("-".repeat(rule_len));
        lines.extend(self.rows.iter().map(|row| Self::render_line(row, &widths)));
        lines
    }

    pub fn print(&self) {
        for (i, line) in self.lines().into_iter().enumerate() {
            match i {
                0 => println!("  {}", line.bright_white().bold()),
                1 => println!("  {}", line.dimmed()),
                _ if self.is_muted(i - 2) => println!("  {}", line.dimmed()),
                _ => println!("  {}", line),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_align() {
        let mut table = Table::new(["ID", "Name"]);
        table.row(["1", "Cimentation"]).row(["12", "Tubage"]);
        table.row(["3"]);

        assert_eq!(
            table.lines(),
            vec![
                "ID  Name",
                "-------------",
                "1   Cimentation",
                "12  Tubage",
                "3",
            ]
        );
    }

    #[test]
    fn test_muted_rows_keep_alignment() {
        let mut table = Table::new(["ID", "Status"]);
        table.row(["1", "En cours"]);
        table.muted_row(["22", "Terminé"]);

        assert!(!table.is_muted(0));
        assert!(table.is_muted(1));
        assert_eq!(table.lines()[3], "22  Terminé");
    }
}
