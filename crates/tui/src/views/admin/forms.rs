//! Drafts for the admin forms, and the form widget that edits them
use catalog_client::{
    college::NewCollege, course::NewCourse, material::NewMaterial, Credentials,
};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    prelude::{Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::Line,
    widgets::Paragraph,
    Frame,
};

use crate::widgets::{text_input, TextInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Shown masked
    Secret,
    /// One of a list of entities, picked with ←/→. Holds the entity's ID.
    Choice,
    /// A local file path
    Path,
}

pub struct Field {
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

const fn field(label: &'static str, kind: FieldKind, required: bool) -> Field {
    Field {
        label,
        kind,
        required,
    }
}

/// Unsaved form state. Only ever reset by hand, after the backend accepts it.
pub trait Draft: Default {
    const FIELDS: &'static [Field];

    fn value(&self, idx: usize) -> &str;
    fn value_mut(&mut self, idx: usize) -> &mut String;

    /// The label of the first required field that's empty
    fn missing_required(&self) -> Option<&'static str> {
        Self::FIELDS
            .iter()
            .enumerate()
            .find(|(i, f)| f.required && self.value(*i).trim().is_empty())
            .map(|(_, f)| f.label)
    }
}

fn required(draft: &impl Draft) -> Result<(), String> {
    match draft.missing_required() {
        Some(label) => Err(format!("Please fill in: {}", label)),
        None => Ok(()),
    }
}

fn optional(s: &str) -> Option<String> {
    Some(s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollegeDraft {
    pub name: String,
    pub description: String,
    pub location: String,
    pub established: String,
}

impl Draft for CollegeDraft {
    const FIELDS: &'static [Field] = &[
        field("College Name", FieldKind::Text, true),
        field("Description", FieldKind::Text, true),
        field("Location", FieldKind::Text, false),
        field("Established Year", FieldKind::Text, false),
    ];

    fn value(&self, idx: usize) -> &str {
        match idx {
            0 => &self.name,
            1 => &self.description,
            2 => &self.location,
            _ => &self.established,
        }
    }

    fn value_mut(&mut self, idx: usize) -> &mut String {
        match idx {
            0 => &mut self.name,
            1 => &mut self.description,
            2 => &mut self.location,
            _ => &mut self.established,
        }
    }
}

impl CollegeDraft {
    pub fn validate(&self) -> Result<NewCollege, String> {
        required(self)?;
        let established = match optional(&self.established) {
            Some(y) => Some(
                y.parse()
                    .map_err(|_| "Established year must be a number".to_string())?,
            ),
            None => None,
        };

        Ok(NewCollege {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            location: optional(&self.location),
            established,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseDraft {
    pub college_id: String,
    pub name: String,
    pub code: String,
    pub description: String,
    pub department: String,
    pub duration: String,
}

impl Draft for CourseDraft {
    const FIELDS: &'static [Field] = &[
        field("College", FieldKind::Choice, true),
        field("Course Name", FieldKind::Text, true),
        field("Course Code", FieldKind::Text, true),
        field("Description", FieldKind::Text, true),
        field("Department", FieldKind::Text, false),
        field("Duration", FieldKind::Text, false),
    ];

    fn value(&self, idx: usize) -> &str {
        match idx {
            0 => &self.college_id,
            1 => &self.name,
            2 => &self.code,
            3 => &self.description,
            4 => &self.department,
            _ => &self.duration,
        }
    }

    fn value_mut(&mut self, idx: usize) -> &mut String {
        match idx {
            0 => &mut self.college_id,
            1 => &mut self.name,
            2 => &mut self.code,
            3 => &mut self.description,
            4 => &mut self.department,
            _ => &mut self.duration,
        }
    }
}

impl CourseDraft {
    pub fn validate(&self) -> Result<NewCourse, String> {
        required(self)?;
        Ok(NewCourse {
            college_id: self.college_id.clone(),
            name: self.name.trim().to_string(),
            code: self.code.trim().to_string(),
            description: self.description.trim().to_string(),
            department: optional(&self.department),
            duration: optional(&self.duration),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterialDraft {
    pub course_id: String,
    pub title: String,
    pub description: String,
    pub file: String,
}

impl Draft for MaterialDraft {
    const FIELDS: &'static [Field] = &[
        field("Course", FieldKind::Choice, true),
        field("Title", FieldKind::Text, true),
        field("Description", FieldKind::Text, true),
        field("File (path)", FieldKind::Path, false),
    ];

    fn value(&self, idx: usize) -> &str {
        match idx {
            0 => &self.course_id,
            1 => &self.title,
            2 => &self.description,
            _ => &self.file,
        }
    }

    fn value_mut(&mut self, idx: usize) -> &mut String {
        match idx {
            0 => &mut self.course_id,
            1 => &mut self.title,
            2 => &mut self.description,
            _ => &mut self.file,
        }
    }
}

impl MaterialDraft {
    pub fn validate(&self) -> Result<NewMaterial, String> {
        // checked before anything else, like the web form did
        if self.file.trim().is_empty() {
            return Err("Please select a file".to_string());
        }
        required(self)?;

        Ok(NewMaterial {
            course_id: self.course_id.clone(),
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            file: self.file.trim().into(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginDraft {
    pub username: String,
    pub password: String,
}

impl Draft for LoginDraft {
    const FIELDS: &'static [Field] = &[
        field("Username", FieldKind::Text, false),
        field("Password", FieldKind::Secret, false),
    ];

    fn value(&self, idx: usize) -> &str {
        match idx {
            0 => &self.username,
            _ => &self.password,
        }
    }

    fn value_mut(&mut self, idx: usize) -> &mut String {
        match idx {
            0 => &mut self.username,
            _ => &mut self.password,
        }
    }
}

impl LoginDraft {
    pub fn credentials(&self) -> Credentials {
        Credentials {
            username: self.username.clone(),
            password: self.password.clone().into(),
        }
    }
}

/// An entity that can be picked in a [`FieldKind::Choice`] field
pub struct Choice<'a> {
    pub id: &'a str,
    pub label: String,
}

/// What the form wants done after a key press
#[derive(Debug, PartialEq, Eq)]
pub enum FormInput {
    Handled,
    Submit,
    Leave,
    Ignored,
}

/// Edits a [`Draft`], one field at a time
#[derive(Debug, Default)]
pub struct Form<D> {
    pub draft: D,
    focus: usize,
}

impl<D: Draft> Form<D> {
    pub fn reset(&mut self) {
        self.draft = D::default();
        self.focus = 0;
    }

    pub fn handle_key(&mut self, key: &KeyEvent, choices: &[Choice]) -> FormInput {
        let count = D::FIELDS.len();
        let kind = D::FIELDS[self.focus].kind;
        match key.code {
            KeyCode::Esc => FormInput::Leave,
            KeyCode::Enter => FormInput::Submit,
            KeyCode::Tab | KeyCode::Down => {
                self.focus = (self.focus + 1) % count;
                FormInput::Handled
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = (self.focus + count - 1) % count;
                FormInput::Handled
            }
            KeyCode::Left | KeyCode::Right if kind == FieldKind::Choice => {
                self.cycle_choice(choices, key.code == KeyCode::Right);
                FormInput::Handled
            }
            _ if kind == FieldKind::Choice => FormInput::Ignored,
            _ => match text_input::edit(self.draft.value_mut(self.focus), key) {
                true => FormInput::Handled,
                false => FormInput::Ignored,
            },
        }
    }

    fn cycle_choice(&mut self, choices: &[Choice], forward: bool) {
        if choices.is_empty() {
            return;
        }

        let value = self.draft.value_mut(self.focus);
        let next = match choices.iter().position(|c| c.id == value.as_str()) {
            None => 0,
            Some(i) if forward => (i + 1) % choices.len(),
            Some(i) => (i + choices.len() - 1) % choices.len(),
        };
        *value = choices[next].id.to_string();
    }

    pub fn draw(
        &self,
        frame: &mut Frame,
        area: Rect,
        focused: bool,
        submit: &str,
        busy: bool,
        choices: &[Choice],
    ) {
        let mut constraints = vec![Constraint::Length(3); D::FIELDS.len()];
        constraints.push(Constraint::Length(1));
        constraints.push(Constraint::Min(0));
        let layout = Layout::new(Direction::Vertical, constraints).split(area);

        for (i, field) in D::FIELDS.iter().enumerate() {
            let value = self.draft.value(i);
            let label = match field.required {
                true => format!("{} *", field.label),
                false => field.label.to_string(),
            };
            let shown = match field.kind {
                FieldKind::Choice => choices
                    .iter()
                    .find(|c| c.id == value)
                    .map(|c| format!("◀ {} ▶", c.label))
                    .unwrap_or_else(|| format!("◀ Choose a {} ▶", field.label.to_lowercase())),
                _ => value.to_string(),
            };

            frame.render_widget(
                TextInput::new(&label, &shown)
                    .focused(focused && self.focus == i)
                    .masked(field.kind == FieldKind::Secret),
                layout[i],
            );
        }

        let button = match busy {
            true => Line::from(vec!["⏳ ".into(), "Saving...".gray()]),
            false if focused => Line::from(vec![
                "Enter".blue(),
                format!(": {}", submit).into(),
                "   Tab/↓ next field, Esc done".dark_gray(),
            ]),
            false => Line::styled(
                format!("{} (Tab to edit)", submit),
                Style::new().fg(Color::DarkGray),
            ),
        };
        frame.render_widget(Paragraph::new(button), layout[D::FIELDS.len()]);
    }
}
