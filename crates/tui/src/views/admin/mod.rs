use catalog_client::{college::College, course::Course, Session};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    prelude::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use super::{empty_state, not_loaded, Action, View};
use crate::{
    event::Event,
    route::Route,
    store::{Mutation, MutationKind, Store},
    widgets::StatefulList,
};

mod forms;

use forms::{Choice, CollegeDraft, CourseDraft, MaterialDraft};
pub(super) use forms::{Form, FormInput, LoginDraft};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Tab {
    #[default]
    Colleges,
    Courses,
    Materials,
}

impl Tab {
    const ALL: [Tab; 3] = [Tab::Colleges, Tab::Courses, Tab::Materials];

    fn title(&self) -> &'static str {
        match self {
            Tab::Colleges => "Colleges",
            Tab::Courses => "Courses",
            Tab::Materials => "Materials",
        }
    }
}

/// Create and delete colleges and courses, and upload materials
#[derive(Debug)]
pub struct AdminPanel {
    session: Session,
    tab: Tab,
    editing: bool,
    list: StatefulList,
    colleges: Form<CollegeDraft>,
    courses: Form<CourseDraft>,
    materials: Form<MaterialDraft>,
}

impl AdminPanel {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            tab: Tab::default(),
            editing: false,
            list: Default::default(),
            colleges: Default::default(),
            courses: Default::default(),
            materials: Default::default(),
        }
    }

    fn switch_to(&mut self, tab: Tab) {
        self.tab = tab;
        self.editing = false;
        self.list = Default::default();
    }

    fn row_count(&self, store: &Store) -> usize {
        match (self.tab, store.admin_page()) {
            (Tab::Colleges, Some((colleges, _))) => colleges.len(),
            (Tab::Courses, Some((_, courses))) => courses.len(),
            _ => 0,
        }
    }

    /// Validate the current form and send it off
    fn submit(&mut self, store: &mut Store) -> Action {
        if store.in_flight() {
            return Action::None;
        }

        let mutation = match self.tab {
            Tab::Colleges => self.colleges.draft.validate().map(Mutation::CreateCollege),
            Tab::Courses => self.courses.draft.validate().map(Mutation::CreateCourse),
            Tab::Materials => self
                .materials
                .draft
                .validate()
                .map(Mutation::UploadMaterial),
        };

        match mutation {
            Ok(m) => {
                store.submit(&self.session, m);
                Action::None
            }
            Err(msg) => Action::Notify(msg),
        }
    }

    /// Ask before deleting the selected row
    fn confirm_delete(&self, store: &Store) -> Action {
        let Some((colleges, courses)) = store.admin_page() else {
            return Action::None;
        };
        let Some(idx) = self.list.selected() else {
            return Action::None;
        };

        match self.tab {
            Tab::Colleges => match colleges.get(idx) {
                Some(c) => Action::Confirm {
                    prompt: format!("Are you sure you want to delete the college {}?", c.name),
                    mutation: Mutation::DeleteCollege(c.id.clone()),
                },
                None => Action::None,
            },
            Tab::Courses => match courses.get(idx) {
                Some(c) => Action::Confirm {
                    prompt: format!("Are you sure you want to delete the course {}?", c.name),
                    mutation: Mutation::DeleteCourse(c.id.clone()),
                },
                None => Action::None,
            },
            Tab::Materials => Action::None,
        }
    }

    fn handle_form_key(&mut self, store: &mut Store, event: &KeyEvent) -> Action {
        let (colleges, courses) = store.admin_page().unwrap_or_default();
        let input = match self.tab {
            Tab::Colleges => self.colleges.handle_key(event, &[]),
            Tab::Courses => self.courses.handle_key(event, &college_choices(colleges)),
            Tab::Materials => self.materials.handle_key(event, &course_choices(courses)),
        };

        match input {
            FormInput::Submit => self.submit(store),
            FormInput::Leave => {
                self.editing = false;
                Action::None
            }
            FormInput::Handled | FormInput::Ignored => Action::None,
        }
    }

    fn draw_tabs(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec!["Admin Panel".blue().bold(), Span::raw("   ")];
        for (i, tab) in Tab::ALL.iter().enumerate() {
            let label = format!(" {} {} ", i + 1, tab.title());
            spans.push(match *tab == self.tab {
                true => Span::styled(label, Style::new().add_modifier(Modifier::REVERSED)),
                false => Span::raw(label),
            });
        }
        spans.push("   L to log out".dark_gray());
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn draw_form(&self, store: &Store, frame: &mut Frame, area: Rect) {
        let (colleges, courses) = store.admin_page().unwrap_or_default();
        let busy = store.in_flight();
        let block = Block::default().borders(Borders::ALL).title(match self.tab {
            Tab::Colleges => "Add New College",
            Tab::Courses => "Add New Course",
            Tab::Materials => "Upload Study Material",
        });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        match self.tab {
            Tab::Colleges => {
                self.colleges
                    .draw(frame, inner, self.editing, "Add College", busy, &[])
            }
            Tab::Courses => self.courses.draw(
                frame,
                inner,
                self.editing,
                "Add Course",
                busy,
                &college_choices(colleges),
            ),
            Tab::Materials => self.materials.draw(
                frame,
                inner,
                self.editing,
                "Upload Material",
                busy,
                &course_choices(courses),
            ),
        }
    }

    fn draw_list(&mut self, store: &Store, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title(match self.tab {
            Tab::Colleges => "Existing Colleges (x to delete)",
            _ => "Existing Courses (x to delete)",
        });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some((colleges, courses)) = store.admin_page() else {
            frame.render_widget(not_loaded(store), inner);
            return;
        };

        let items = match self.tab {
            Tab::Colleges => colleges.iter().map(college_row).collect::<Vec<_>>(),
            _ => courses.iter().map(course_row).collect(),
        };
        if items.is_empty() {
            let what = match self.tab {
                Tab::Colleges => "No colleges yet",
                _ => "No courses yet",
            };
            frame.render_widget(empty_state(what, "Add one with the form"), inner);
            return;
        }

        let highlight = match self.editing {
            true => Style::new().add_modifier(Modifier::BOLD),
            false => Style::new().add_modifier(Modifier::REVERSED),
        };
        self.list.render_to(
            frame,
            inner,
            List::new(items)
                .highlight_style(highlight)
                .highlight_symbol(">> "),
        );
    }
}

impl View for AdminPanel {
    fn draw(&mut self, store: &Store, frame: &mut Frame, area: Rect) {
        let layout = Layout::new(
            Direction::Vertical,
            [Constraint::Length(2), Constraint::Min(0)],
        )
        .split(area);
        self.draw_tabs(frame, layout[0]);

        if self.tab == Tab::Materials {
            self.draw_form(store, frame, layout[1]);
            return;
        }

        let body = Layout::new(
            Direction::Horizontal,
            [Constraint::Percentage(50), Constraint::Percentage(50)],
        )
        .split(layout[1]);
        self.draw_form(store, frame, body[0]);
        self.draw_list(store, frame, body[1]);
    }

    fn handle_event(&mut self, store: &mut Store, event: Event) -> Action {
        let Event::Key(key) = event else {
            return Action::None;
        };

        if self.editing {
            return self.handle_form_key(store, &key);
        }

        self.list.set_item_count(self.row_count(store));
        match key.code {
            KeyCode::Char('1') => self.switch_to(Tab::Colleges),
            KeyCode::Char('2') => self.switch_to(Tab::Courses),
            KeyCode::Char('3') => {
                self.switch_to(Tab::Materials);
                // there's no list on this tab
                self.editing = true;
            }
            KeyCode::Down | KeyCode::Char('j') => self.list.next(),
            KeyCode::Up | KeyCode::Char('k') => self.list.previous(),
            KeyCode::Tab | KeyCode::Char('i') => self.editing = true,
            KeyCode::Char('x') | KeyCode::Delete => return self.confirm_delete(store),
            KeyCode::Char('r') if store.load_failed() => store.refresh(),
            KeyCode::Char('L') => return Action::Logout,
            KeyCode::Esc | KeyCode::Char('q') => return Action::Navigate(Route::Home),
            _ => (),
        };

        Action::None
    }

    fn mutation_finished(&mut self, kind: MutationKind, ok: bool) {
        if !ok {
            return;
        }

        match kind {
            MutationKind::CreateCollege => self.colleges.reset(),
            MutationKind::CreateCourse => self.courses.reset(),
            MutationKind::UploadMaterial => self.materials.reset(),
            MutationKind::DeleteCollege | MutationKind::DeleteCourse => (),
        }
    }
}

fn college_choices(colleges: &[College]) -> Vec<Choice> {
    colleges
        .iter()
        .map(|c| Choice {
            id: &c.id,
            label: c.name.clone(),
        })
        .collect()
}

fn course_choices(courses: &[Course]) -> Vec<Choice> {
    courses
        .iter()
        .map(|c| Choice {
            id: &c.id,
            label: format!("{} ({})", c.name, c.code),
        })
        .collect()
}

fn college_row(college: &College) -> ListItem<'static> {
    let mut lines = vec![Line::from(Span::styled(
        college.name.clone(),
        Style::new().bold(),
    ))];
    if let Some(location) = &college.location {
        lines.push(Line::styled(location.clone(), Style::new().fg(Color::Gray)));
    }
    ListItem::new(Text::from(lines))
}

fn course_row(course: &Course) -> ListItem<'static> {
    let mut lines = vec![Line::from(vec![
        Span::styled(course.name.clone(), Style::new().bold()),
        format!(" ({})", course.code).into(),
    ])];
    if let Some(college) = course.college_name() {
        lines.push(Line::styled(
            college.to_string(),
            Style::new().fg(Color::Gray),
        ));
    }
    ListItem::new(Text::from(lines))
}
