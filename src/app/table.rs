//! 圓角邊框的純文字表格，儲存格內可有多行。

pub struct Table {
    title: Option<String>,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, T>(headers: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            title: None,
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// 欄位不足時補空字串，多出的欄位捨棄
    pub fn add_row<I, T>(&mut self, cells: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut row: Vec<String> = cells.into_iter().map(Into::into).collect();
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    pub fn render(&self) -> String {
        let widths = self.column_widths();
        let mut out = Vec::new();

        if let Some(title) = &self.title {
            let total: usize = widths.iter().map(|w| w + 3).sum::<usize>() + 1;
            let pad = total.saturating_sub(title.chars().count()) / 2;
            out.push(format!("{}{}", " ".repeat(pad), title));
        }

        out.push(border(&widths, '╭', '┬', '╮'));
        out.extend(render_cells(&self.headers, &widths));
        out.push(border(&widths, '├', '┼', '┤'));
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                out.push(border(&widths, '├', '┼', '┤'));
            }
            out.extend(render_cells(row, &widths));
        }
        out.push(border(&widths, '╰', '┴', '╯'));

        out.join("\n")
    }

    fn column_widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(col, header)| {
                self.rows
                    .iter()
                    .flat_map(|row| row[col].lines())
                    .map(|line| line.chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }
}

fn border(widths: &[usize], left: char, mid: char, right: char) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    format!("{}{}{}", left, segments.join(&mid.to_string()), right)
}

fn render_cells(cells: &[String], widths: &[usize]) -> Vec<String> {
    let columns: Vec<Vec<&str>> = cells.iter().map(|c| c.lines().collect()).collect();
    let height = columns.iter().map(Vec::len).max().unwrap_or(0).max(1);

    (0..height)
        .map(|line| {
            let parts: Vec<String> = columns
                .iter()
                .zip(widths)
                .map(|(col, width)| {
                    let text = col.get(line).copied().unwrap_or("");
                    let pad = width - text.chars().count();
                    format!(" {}{} ", text, " ".repeat(pad))
                })
                .collect();
            format!("│{}│", parts.join("│"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_multiline_cells() {
        let mut table = Table::new(["Name", "Phones"]).title("Contacts");
        table.add_row(["Anna", "+380501234567\n+380671234567"]);
        table.add_row(["Bob"]);

        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();

        assert!(lines[0].trim() == "Contacts");
        assert_eq!(lines[1], "╭──────┬───────────────╮");
        assert_eq!(lines[2], "│ Name │ Phones        │");
        assert_eq!(lines[4], "│ Anna │ +380501234567 │");
        assert_eq!(lines[5], "│      │ +380671234567 │");
        assert_eq!(lines[7], "│ Bob  │               │");
        assert_eq!(lines[8], "╰──────┴───────────────╯");
    }
}
