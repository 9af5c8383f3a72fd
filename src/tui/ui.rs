use ratatui::prelude::*;
use ratatui::widgets::{Block, Clear, Paragraph, Wrap};

use crate::app::App;
use crate::layout::{Cell, GridLayout};
use crate::models::{Banner, FeedItem, Product};

const BANNER_HEIGHT: u16 = 5;
const PRODUCT_HEIGHT: u16 = 7;

pub fn draw(frame: &mut Frame, app: &App) {
    let [header, body, status] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_header(frame, header, app);
    draw_grid(frame, body, app);
    draw_status(frame, status, app);

    if app.show_help {
        draw_help(frame);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let title = Line::from(vec![
        Span::styled("Feed", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!("  {} items  {} columns", app.feed.items.len(), app.columns)),
    ]);
    frame.render_widget(Paragraph::new(title), area);
}

fn draw_status(frame: &mut Frame, area: Rect, app: &App) {
    let spinner = if app.is_refreshing { "⟳ " } else { "" };
    let line = Line::from(vec![
        Span::raw(spinner),
        Span::raw(app.status.as_str()),
        Span::styled("  ? help", Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn row_height(layout: &GridLayout, row: usize, items: &[FeedItem]) -> u16 {
    layout.rows()[row]
        .iter()
        .map(|cell| match items[cell.index] {
            FeedItem::Banner(_) => BANNER_HEIGHT,
            FeedItem::Product(_) => PRODUCT_HEIGHT,
        })
        .max()
        .unwrap_or(0)
}

/// First row to draw so that `selected_row` is on screen.
fn first_visible_row(heights: &[u16], selected_row: usize, available: u16) -> usize {
    let mut first = selected_row;
    let mut used = heights.get(selected_row).copied().unwrap_or(0);
    while first > 0 && used + heights[first - 1] <= available {
        first -= 1;
        used += heights[first];
    }
    first
}

fn draw_grid(frame: &mut Frame, area: Rect, app: &App) {
    let items = &app.feed.items;
    if items.is_empty() {
        let message = if app.is_refreshing {
            "Loading feed..."
        } else {
            "No items. Press r to refresh."
        };
        frame.render_widget(
            Paragraph::new(message).alignment(Alignment::Center),
            area,
        );
        return;
    }

    let layout = &app.layout;
    let heights: Vec<u16> = (0..layout.rows().len())
        .map(|row| row_height(layout, row, items))
        .collect();
    let selected_row = layout.row_of(app.selected).unwrap_or(0);
    let first = first_visible_row(&heights, selected_row, area.height);

    let mut y = area.y;
    for (row, cells) in layout.rows().iter().enumerate().skip(first) {
        let height = heights[row].min(area.bottom().saturating_sub(y));
        if height == 0 {
            break;
        }
        let row_area = Rect::new(area.x, y, area.width, height);
        draw_row(frame, row_area, cells, layout.columns(), app);
        y += height;
    }
}

fn draw_row(frame: &mut Frame, area: Rect, cells: &[Cell], columns: u16, app: &App) {
    let used: u16 = cells.iter().map(|cell| cell.span).sum();
    let mut constraints: Vec<Constraint> = cells
        .iter()
        .map(|cell| Constraint::Ratio(cell.span.into(), columns.into()))
        .collect();
    if used < columns {
        constraints.push(Constraint::Ratio((columns - used).into(), columns.into()));
    }

    let areas = Layout::horizontal(constraints).split(area);
    for (cell, cell_area) in cells.iter().zip(areas.iter()) {
        let item = &app.feed.items[cell.index];
        draw_card(frame, *cell_area, item, cell.index == app.selected);
    }
}

fn draw_card(frame: &mut Frame, area: Rect, item: &FeedItem, selected: bool) {
    let border_style = if selected {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::bordered().border_style(border_style);
    let inner_width = block.inner(area).width.max(1) as usize;

    let lines = match item {
        FeedItem::Banner(banner) => banner_lines(banner),
        FeedItem::Product(product) => product_lines(product, inner_width),
    };

    frame.render_widget(
        Paragraph::new(lines)
            .block(block.title(item.kind().as_str()))
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn banner_lines(banner: &Banner) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        banner.image.clone(),
        Style::default().fg(Color::Cyan),
    ))];
    if let Some(link) = &banner.link {
        lines.push(Line::from(Span::styled(
            format!("→ {link}"),
            Style::default().fg(Color::Blue),
        )));
    }
    lines
}

fn product_lines(product: &Product, width: usize) -> Vec<Line<'static>> {
    let mut lines: Vec<Line> = textwrap::wrap(&product.name, width)
        .into_iter()
        .take(2)
        .map(|part| {
            Line::from(Span::styled(
                part.into_owned(),
                Style::default().add_modifier(Modifier::BOLD),
            ))
        })
        .collect();
    lines.push(Line::from(Span::styled(
        product.formatted_price(),
        Style::default().fg(Color::Green),
    )));
    lines.push(Line::from(Span::styled(
        product.image.clone(),
        Style::default().fg(Color::DarkGray),
    )));
    lines
}

fn draw_help(frame: &mut Frame) {
    let area = centered(frame.area(), 44, 12);
    let text = vec![
        Line::from("h/j/k/l, arrows   move"),
        Line::from("< / >             first / last item"),
        Line::from("enter, o          open banner link"),
        Line::from("+ / -             more / fewer columns"),
        Line::from("r                 refresh feed"),
        Line::from("q, esc            quit"),
        Line::from(""),
        Line::from(Span::styled(
            "press any key to close",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(text).block(Block::bordered().title("Help")),
        area,
    );
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
