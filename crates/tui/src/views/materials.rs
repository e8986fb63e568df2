use catalog_client::{course::Course, material::Material};
use crossterm::event::KeyCode;
use ratatui::{
    prelude::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use super::{empty_state, not_loaded, Action, View};
use crate::{
    event::Event,
    store::{DownloadState, Store},
    styles::error_text,
    widgets::StatefulList,
};

/// The downloadable materials of one course
#[derive(Debug, Default)]
pub struct MaterialList {
    list: StatefulList,
}

impl MaterialList {
    fn selected<'a>(&self, store: &'a Store) -> Option<&'a Material> {
        let (_, materials) = store.course_page()?;
        materials.get(self.list.selected()?)
    }
}

impl View for MaterialList {
    fn draw(&mut self, store: &Store, frame: &mut Frame, area: Rect) {
        let Some((course, materials)) = store.course_page() else {
            frame.render_widget(not_loaded(store), area);
            return;
        };

        let header = course_header(course);
        // line_count leaves out the bottom border
        let header_height = header.line_count(area.width) as u16 + 1;
        let layout = Layout::new(
            Direction::Vertical,
            [
                Constraint::Length(header_height),
                Constraint::Length(1),
                Constraint::Min(0),
            ],
        )
        .split(area);

        frame.render_widget(header, layout[0]);
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                "Study Materials".bold(),
                "  d to download, o to open".dark_gray(),
            ])),
            layout[1],
        );

        if materials.is_empty() {
            frame.render_widget(
                empty_state(
                    "No study materials available yet",
                    "Check back later for updates",
                ),
                layout[2],
            );
            return;
        }

        let items = materials
            .iter()
            .map(|m| ListItem::new(material_item(store, m)))
            .collect::<Vec<_>>();
        self.list.render_to(
            frame,
            layout[2],
            List::new(items)
                .highlight_style(Style::new().add_modifier(Modifier::REVERSED))
                .highlight_symbol(">> "),
        );
    }

    fn handle_event(&mut self, store: &mut Store, event: Event) -> Action {
        let Event::Key(key) = event else {
            return Action::None;
        };

        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.list.next(),
            KeyCode::Up | KeyCode::Char('k') => self.list.previous(),
            KeyCode::Char('d') => {
                if let Some(material) = self.selected(store).cloned() {
                    store.download(&material);
                    return Action::Flash(format!("Queued {} for download", material.title).into());
                }
            }
            KeyCode::Char('o') => {
                let Some(material) = self.selected(store) else {
                    return Action::None;
                };
                if let Some((req, DownloadState::Completed)) = store.download_status(&material.id)
                {
                    if let Err(e) = open::that(req.dest.as_std_path()) {
                        return Action::Flash(error_text(format!("Error opening file: {e}")));
                    }
                    return Action::Flash(format!("Opened {}", req.dest).into());
                }
            }
            KeyCode::Char('r') if store.load_failed() => store.refresh(),
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('h') => return Action::Back,
            _ => (),
        };

        Action::None
    }
}

fn course_header(course: &Course) -> Paragraph<'static> {
    let mut title = vec![Span::styled(course.name.clone(), Style::new().blue().bold())];
    if !course.code.is_empty() {
        title.push(Span::styled(format!("  {}", course.code), Style::new().cyan()));
    }

    let mut lines = vec![Line::from(title), Line::raw(course.description.clone())];

    // the college is only named if the backend expanded it
    let facts = [
        ("College", course.college_name()),
        ("Department", course.department.as_deref()),
        ("Duration", course.duration.as_deref()),
    ];
    let facts = facts
        .into_iter()
        .filter_map(|(label, v)| v.map(|v| (label, v)))
        .flat_map(|(label, v)| {
            [
                Span::styled(format!("{label}: "), Style::new().fg(Color::Gray)),
                Span::raw(format!("{v}   ")),
            ]
        })
        .collect::<Vec<_>>();
    if !facts.is_empty() {
        lines.push(Line::from(facts));
    }

    Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::BOTTOM))
}

fn material_item(store: &Store, material: &Material) -> Text<'static> {
    let mut lines = vec![Line::from(Span::styled(
        material.title.clone(),
        Style::new().blue().bold(),
    ))];
    if !material.description.is_empty() {
        lines.push(Line::raw(material.description.clone()));
    }

    let mut facts = vec![material.display_name(), material.display_size()];
    facts.extend(material.display_date().map(|d| format!("Uploaded {d}")));
    lines.push(Line::styled(facts.join(" · "), Style::new().fg(Color::Gray)));

    if let Some((req, state)) = store.download_status(&material.id) {
        lines.push(match state {
            DownloadState::Queued => {
                Line::styled("Queued for download", Style::new().fg(Color::Gray))
            }
            DownloadState::InProgress(p) => Line::styled(
                format!("Downloading - {:.2}%", p * 100.0),
                Style::new().fg(Color::Blue),
            ),
            DownloadState::Completed => Line::styled(
                format!("Downloaded to {}", req.dest),
                Style::new().fg(Color::Green),
            ),
            DownloadState::Errored(e) => {
                Line::styled(format!("Download failed: {e}"), Style::new().fg(Color::Red))
            }
        });
    }

    Text::from(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        route::Route,
        store::{testing::detached, Event as StoreEvent, PageData},
        views::testing::render,
    };
    use crossterm::event::KeyEvent;

    #[test]
    fn header_shows_course_facts() {
        let (mut store, _reqs, _) = detached();
        store.enter(&Route::Materials("k1".into()), None);
        store.event(StoreEvent::Loaded {
            epoch: store.epoch(),
            result: Ok(PageData::Course {
                course: serde_json::from_str(
                    r#"{"_id":"k1","collegeId":{"_id":"c1","name":"Tech U"},"name":"DS",
                        "code":"CS201","description":"Trees","department":"CompSci",
                        "duration":"1 term"}"#,
                )
                .unwrap(),
                materials: vec![],
            }),
        });

        let screen = render(&mut MaterialList::default(), &store, 80, 20);
        assert!(screen.contains("Trees"));
        assert!(screen.contains("College: Tech U"), "{screen}");
        assert!(screen.contains("Department: CompSci"));
        assert!(screen.contains("Duration: 1 term"));
        assert!(screen.contains("No study materials available yet"));
    }

    #[test]
    fn download_key_queues_the_selected_material() {
        let (mut store, _reqs, dl) = detached();
        store.enter(&Route::Materials("k1".into()), None);
        store.event(StoreEvent::Loaded {
            epoch: store.epoch(),
            result: Ok(PageData::Course {
                course: serde_json::from_str(r#"{"_id":"k1","name":"DS","code":"CS201"}"#)
                    .unwrap(),
                materials: serde_json::from_str(
                    r#"[{"_id":"m1","title":"Week 1","fileUrl":"https://f/1","fileType":"pdf"}]"#,
                )
                .unwrap(),
            }),
        });

        let mut view = MaterialList::default();
        view.list.set_item_count(1);
        let action = view.handle_event(&mut store, Event::Key(KeyEvent::from(KeyCode::Char('d'))));

        assert!(matches!(action, Action::Flash(_)));
        assert!(dl.try_recv().is_ok());
        assert!(matches!(
            store.download_status("m1"),
            Some((_, DownloadState::Queued))
        ));
    }
}
