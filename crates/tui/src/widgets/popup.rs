use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

/// A box in the middle of the screen, drawn over everything else
pub fn render_popup(frame: &mut Frame, title: &str, body: Text<'static>, hint: &str) {
    let size = frame.size();
    let width = size.width.saturating_sub(4).min(60);
    let inner_width = width.saturating_sub(2).max(1);
    let mut text = body;
    text.lines.push(Line::raw(""));
    text.lines.push(Line::styled(
        hint.to_string(),
        Style::new().fg(Color::DarkGray),
    ));

    let p = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(title.to_string())
                .borders(Borders::ALL),
        );
    let height = (p.line_count(inner_width) as u16 + 2).min(size.height);

    let area = Rect {
        x: size.x + (size.width.saturating_sub(width)) / 2,
        y: size.y + (size.height.saturating_sub(height)) / 2,
        width,
        height,
    };
    frame.render_widget(Clear, area);
    frame.render_widget(p, area);
}
