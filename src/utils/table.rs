/// A simple text-based table for terminal output
pub struct Table {
    title: Option<String>,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    col_widths: Vec<usize>,
}

/// Display width; counts chars so accented labels ("Dépôt") line up
fn width_of(s: &str) -> usize {
    s.chars().count()
}

impl Table {
    /// Create a new table with the given headers
    pub fn new(headers: Vec<&str>) -> Self {
        let col_widths = headers.iter().map(|h| width_of(h)).collect();
        let headers = headers.iter().map(|h| h.to_string()).collect();
        Table {
            title: None,
            headers,
            rows: Vec::new(),
            col_widths,
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Add a row; extra cells beyond the header count are dropped
    pub fn add_row(&mut self, row: Vec<String>) {
        let mut row: Vec<String> = row.into_iter().take(self.headers.len()).collect();
        while row.len() < self.headers.len() {
            row.push(String::new());
        }

        for (i, col) in row.iter().enumerate() {
            self.col_widths[i] = self.col_widths[i].max(width_of(col));
        }

        self.rows.push(row);
    }

    /// Render the table as a block of text
    pub fn render(&self) -> String {
        let mut output = String::new();

        if let Some(title) = &self.title {
            output.push_str(title);
            output.push('\n');
        }

        output.push_str(&self.render_row(&self.headers));
        output.push('\n');
        output.push_str(&self.render_separator());
        output.push('\n');

        for row in &self.rows {
            output.push_str(&self.render_row(row));
            output.push('\n');
        }

        output
    }

    fn render_row(&self, row: &[String]) -> String {
        let mut line = String::new();
        for (i, col) in row.iter().enumerate() {
            let pad = self.col_widths[i].saturating_sub(width_of(col));
            line.push_str(col);
            if i < row.len() - 1 {
                line.push_str(&" ".repeat(pad));
                line.push_str(" | ");
            }
        }
        line
    }

    fn render_separator(&self) -> String {
        self.col_widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_table() {
        let mut table = Table::new(vec!["Réf", "Type", "Montant"]).with_title("Transactions");
        table.add_row(vec!["TX-1".into(), "Dépôt".into(), "1 000 FCFA".into()]);
        table.add_row(vec!["TX-22".into(), "Retrait".into(), "50 FCFA".into()]);

        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "Transactions");
        assert_eq!(lines[1], "Réf   | Type    | Montant");
        assert_eq!(lines[3], "TX-1  | Dépôt   | 1 000 FCFA");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let mut table = Table::new(vec!["A", "B"]);
        table.add_row(vec!["only".into()]);
        table.add_row(vec!["1".into(), "2".into(), "3".into()]);
        let rendered = table.render();
        assert!(rendered.contains("only | "));
        assert!(!rendered.contains('3'));
    }
}
