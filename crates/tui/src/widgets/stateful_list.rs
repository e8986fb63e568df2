use ratatui::{prelude::*, widgets::*};

/// Selection state for a list whose length is only known when it's drawn
#[derive(Debug, Default)]
pub struct StatefulList {
    state: ListState,
    last_item_count: usize,
}

impl StatefulList {
    /// The selected index, if it is still in range of what was last drawn
    pub fn selected(&self) -> Option<usize> {
        self.state
            .selected()
            .filter(|i| *i < self.last_item_count)
    }

    /// Tell the list how many items it has without drawing it
    pub fn set_item_count(&mut self, count: usize) {
        self.last_item_count = count;
        match self.state.selected() {
            _ if count == 0 => self.state.select(None),
            Some(i) if i >= count => self.state.select(Some(count - 1)),
            None => self.state.select(Some(0)),
            _ => (),
        }
    }

    pub fn next(&mut self) {
        if self.last_item_count == 0 {
            return;
        }

        let i = match self.state.selected() {
            Some(i) if i + 1 < self.last_item_count => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.last_item_count == 0 {
            return;
        }

        let i = match self.state.selected() {
            Some(i) if i > 0 && i < self.last_item_count => i - 1,
            _ => self.last_item_count - 1,
        };
        self.state.select(Some(i));
    }

    pub fn render_to(&mut self, frame: &mut Frame, target: Rect, list: List) {
        self.set_item_count(list.len());
        frame.render_stateful_widget(list, target, &mut self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_around() {
        let mut l = StatefulList::default();
        l.set_item_count(3);
        assert_eq!(l.selected(), Some(0));
        l.previous();
        assert_eq!(l.selected(), Some(2));
        l.next();
        assert_eq!(l.selected(), Some(0));
    }

    #[test]
    fn shrinking_keeps_selection_in_range() {
        let mut l = StatefulList::default();
        l.set_item_count(5);
        l.previous();
        assert_eq!(l.selected(), Some(4));
        l.set_item_count(2);
        assert_eq!(l.selected(), Some(1));
        l.set_item_count(0);
        assert_eq!(l.selected(), None);
        l.next();
        assert_eq!(l.selected(), None);
    }
}
