use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Edit a string with the given key. Returns false if the key isn't for text entry.
pub fn edit(value: &mut String, key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            value.push(c);
            true
        }
        KeyCode::Backspace => {
            value.pop();
            true
        }
        _ => false,
    }
}

/// A single line of input with a label around it
pub struct TextInput<'a> {
    label: &'a str,
    value: &'a str,
    focused: bool,
    masked: bool,
}

impl<'a> TextInput<'a> {
    pub fn new(label: &'a str, value: &'a str) -> Self {
        Self {
            label,
            value,
            focused: false,
            masked: false,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Show the value as asterisks
    pub fn masked(mut self, masked: bool) -> Self {
        self.masked = masked;
        self
    }
}

impl Widget for TextInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let shown = match self.masked {
            true => "*".repeat(self.value.chars().count()),
            false => self.value.to_string(),
        };
        let mut spans = vec![Span::raw(shown)];
        if self.focused {
            spans.push(Span::styled("_", Style::new().add_modifier(Modifier::SLOW_BLINK)));
        }

        let border = match self.focused {
            true => Style::new().fg(Color::Blue),
            false => Style::new().fg(Color::DarkGray),
        };
        Paragraph::new(Line::from(spans))
            .block(
                Block::default()
                    .title(self.label)
                    .borders(Borders::ALL)
                    .border_style(border),
            )
            .render(area, buf);
    }
}
