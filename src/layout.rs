//! Grid placement for feed items.
//!
//! Products take a single column and banners stretch across the whole row.
//! Items are packed left to right; an item that does not fit in what is left
//! of the current row starts the next one.

use crate::models::{FeedItem, ModelType};

/// Number of grid columns `item` occupies in a grid of `columns` columns.
pub fn span_of(item: &FeedItem, columns: u16) -> u16 {
    match item.kind() {
        ModelType::Product => 1,
        ModelType::Banner => columns,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Index of the item in the feed.
    pub index: usize,
    /// First column occupied.
    pub column: u16,
    pub span: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Default)]
pub struct GridLayout {
    columns: u16,
    rows: Vec<Vec<Cell>>,
    /// item index -> row
    row_of: Vec<usize>,
}

impl GridLayout {
    pub fn build(items: &[FeedItem], columns: u16) -> Self {
        let columns = columns.max(1);
        let mut rows = Vec::new();
        let mut row_of = Vec::with_capacity(items.len());
        let mut current: Vec<Cell> = Vec::new();
        let mut used = 0u16;

        for (index, item) in items.iter().enumerate() {
            let span = span_of(item, columns).clamp(1, columns);

            if used + span > columns {
                rows.push(std::mem::take(&mut current));
                used = 0;
            }

            current.push(Cell {
                index,
                column: used,
                span,
            });
            row_of.push(rows.len());
            used += span;
        }

        if !current.is_empty() {
            rows.push(current);
        }

        Self {
            columns,
            rows,
            row_of,
        }
    }

    pub fn columns(&self) -> u16 {
        self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_of(&self, index: usize) -> Option<usize> {
        self.row_of.get(index).copied()
    }

    pub fn cell(&self, index: usize) -> Option<Cell> {
        let row = self.row_of(index)?;
        self.rows[row].iter().copied().find(|cell| cell.index == index)
    }

    /// Item reached by moving one step from `index`, if any.
    ///
    /// Vertical moves land on the cell in the next row that covers the same
    /// column, or the last cell of that row when it is shorter.
    pub fn neighbour(&self, index: usize, direction: Direction) -> Option<usize> {
        let cell = self.cell(index)?;
        let row = self.row_of(index)?;

        match direction {
            Direction::Left => index.checked_sub(1),
            Direction::Right => (index + 1 < self.row_of.len()).then_some(index + 1),
            Direction::Up => row
                .checked_sub(1)
                .and_then(|r| self.cell_below_column(r, cell.column)),
            Direction::Down => self.cell_below_column(row + 1, cell.column),
        }
    }

    fn cell_below_column(&self, row: usize, column: u16) -> Option<usize> {
        let cells = self.rows.get(row)?;
        cells
            .iter()
            .find(|cell| column >= cell.column && column < cell.column + cell.span)
            .or_else(|| cells.last())
            .map(|cell| cell.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Banner, Product};
    use serde_json::Map;

    fn banner() -> FeedItem {
        FeedItem::Banner(Banner {
            image: "b.png".into(),
            link: None,
        })
    }

    fn product(id: &str) -> FeedItem {
        FeedItem::Product(Product {
            id: id.into(),
            name: id.to_uppercase(),
            price: 100,
            image: format!("{id}.png"),
            extra: Map::new(),
        })
    }

    fn row_indices(layout: &GridLayout) -> Vec<Vec<usize>> {
        layout
            .rows()
            .iter()
            .map(|row| row.iter().map(|cell| cell.index).collect())
            .collect()
    }

    #[test]
    fn banner_spans_all_columns() {
        for columns in 1..=12 {
            assert_eq!(span_of(&banner(), columns), columns);
        }
    }

    #[test]
    fn product_spans_one_column() {
        for columns in 1..=12 {
            assert_eq!(span_of(&product("p"), columns), 1);
        }
    }

    #[test]
    fn packs_products_into_rows() {
        let items = vec![product("a"), product("b"), product("c")];
        let layout = GridLayout::build(&items, 2);

        assert_eq!(row_indices(&layout), vec![vec![0, 1], vec![2]]);
        assert_eq!(layout.cell(1).unwrap().column, 1);
    }

    #[test]
    fn banner_after_partial_row_starts_new_row() {
        let items = vec![banner(), product("a"), banner(), product("b"), product("c")];
        let layout = GridLayout::build(&items, 2);

        assert_eq!(
            row_indices(&layout),
            vec![vec![0], vec![1], vec![2], vec![3, 4]]
        );
        assert_eq!(layout.cell(2).unwrap().span, 2);
    }

    #[test]
    fn zero_columns_is_treated_as_one() {
        let items = vec![banner(), product("a")];
        let layout = GridLayout::build(&items, 0);

        assert_eq!(layout.columns(), 1);
        assert_eq!(row_indices(&layout), vec![vec![0], vec![1]]);
    }

    #[test]
    fn empty_feed_has_no_rows() {
        let layout = GridLayout::build(&[], 3);
        assert!(layout.rows().is_empty());
        assert_eq!(layout.neighbour(0, Direction::Down), None);
    }

    #[test]
    fn vertical_moves_follow_columns() {
        // row 0: banner, row 1: a b c, row 2: d e
        let items = vec![
            banner(),
            product("a"),
            product("b"),
            product("c"),
            product("d"),
            product("e"),
        ];
        let layout = GridLayout::build(&items, 3);

        assert_eq!(layout.neighbour(0, Direction::Down), Some(1));
        assert_eq!(layout.neighbour(2, Direction::Down), Some(5));
        assert_eq!(layout.neighbour(3, Direction::Down), Some(5));
        assert_eq!(layout.neighbour(5, Direction::Up), Some(2));
        assert_eq!(layout.neighbour(3, Direction::Up), Some(0));
        assert_eq!(layout.neighbour(0, Direction::Up), None);
        assert_eq!(layout.neighbour(5, Direction::Down), None);
    }

    #[test]
    fn horizontal_moves_follow_feed_order() {
        let items = vec![product("a"), banner(), product("b")];
        let layout = GridLayout::build(&items, 2);

        assert_eq!(layout.neighbour(0, Direction::Left), None);
        assert_eq!(layout.neighbour(0, Direction::Right), Some(1));
        assert_eq!(layout.neighbour(2, Direction::Right), None);
    }
}
