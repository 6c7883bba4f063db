use crate::domain::model::FoodRow;
use serde::Serialize;

pub const TABLE_TITLE: &str = "Food Items";
pub const HEADER: [&str; 4] = ["Food Item", "Vegetable", "Meat", "Total"];

/// View-model for the food table: a title, a fixed header and the data rows in order.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FoodTable {
    pub title: String,
    pub header: [&'static str; 4],
    pub rows: Vec<FoodRow>,
}

impl Default for FoodTable {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// Append `row` at the end; existing rows are left as they are.
pub fn append_row(mut rows: Vec<FoodRow>, row: FoodRow) -> Vec<FoodRow> {
    rows.push(row);
    rows
}

impl FoodTable {
    pub fn new(rows: Vec<FoodRow>) -> Self {
        Self {
            title: TABLE_TITLE.to_string(),
            header: HEADER,
            rows,
        }
    }

    pub fn rows(&self) -> &[FoodRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 清空後換成新的資料列
    pub fn replace_rows(&mut self, rows: Vec<FoodRow>) {
        self.rows = rows;
    }

    pub fn push_row(&mut self, row: FoodRow) {
        let rows = std::mem::take(&mut self.rows);
        self.rows = append_row(rows, row);
    }

    /// Header first, then one entry per data row.
    pub fn display_rows(&self) -> Vec<[&str; 4]> {
        let header: [&str; 4] = self.header;
        std::iter::once(header)
            .chain(self.rows.iter().map(FoodRow::cells))
            .collect()
    }

    pub fn render_text(&self) -> String {
        let display = self.display_rows();

        let mut widths = [0usize; 4];
        for row in &display {
            for (width, cell) in widths.iter_mut().zip(row.iter()) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut lines = Vec::with_capacity(display.len() + 2);
        lines.push(self.title.clone());
        for (index, row) in display.iter().enumerate() {
            let cells: Vec<String> = row
                .iter()
                .zip(widths.iter())
                .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
                .collect();
            lines.push(cells.join(" | ").trim_end().to_string());

            if index == 0 {
                let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
                lines.push(rule.join("-+-"));
            }
        }

        lines.join("\n")
    }
}
