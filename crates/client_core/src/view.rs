//! Declarative view of the roster screen, rebuilt from controller state on
//! every render.

use std::fmt;

use shared::domain::{StudentField, StudentId};

use crate::{
    controller::{ModalState, RosterState, UiAction},
    notifications::Toast,
    pagination::{build_pagination, NavButton, PageItem, PaginationControl},
    sort,
    validation::{FieldErrors, StudentForm},
};

pub const EMPTY_STATE: &str = "No students found";

pub fn count_label(count: u64) -> String {
    let plural = if count == 1 { "" } else { "s" };
    format!("{count} student{plural}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub avatar: char,
    pub id: StudentId,
    pub name: String,
    pub email: String,
    pub course: String,
    pub age: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableView {
    Rows(Vec<RowView>),
    Empty(&'static str),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormView {
    pub values: StudentForm,
    pub errors: Vec<(StudentField, String)>,
}

impl FormView {
    fn new(values: &StudentForm, errors: &FieldErrors) -> Self {
        Self {
            values: values.clone(),
            errors: errors
                .iter()
                .map(|(field, message)| (field, message.to_string()))
                .collect(),
        }
    }

    pub fn error(&self, field: StudentField) -> Option<&str> {
        self.errors
            .iter()
            .find(|(candidate, _)| *candidate == field)
            .map(|(_, message)| message.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditModalView {
    pub id: StudentId,
    pub form: FormView,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterView {
    pub table: TableView,
    pub count_label: String,
    pub paginated: bool,
    pub pagination: Option<PaginationControl>,
    pub sort_label: String,
    pub search_name: String,
    pub search_course: String,
    pub add_form: FormView,
    pub modal: Option<EditModalView>,
    pub toasts: Vec<Toast>,
}

/// Page request behind a previous/next button; `None` while it is disabled.
pub fn nav_action(button: &NavButton) -> Option<UiAction> {
    button
        .enabled
        .then_some(UiAction::GoToPage(button.target))
}

pub fn render(state: &RosterState, toasts: Vec<Toast>) -> RosterView {
    let students = match (state.paging.paginated, state.sort.field) {
        (false, Some(field)) => sort::sorted(&state.list.students, field, state.sort.direction),
        _ => state.list.students.clone(),
    };

    let table = if students.is_empty() {
        TableView::Empty(EMPTY_STATE)
    } else {
        TableView::Rows(
            students
                .into_iter()
                .map(|student| RowView {
                    avatar: student
                        .name
                        .chars()
                        .next()
                        .and_then(|c| c.to_uppercase().next())
                        .unwrap_or('?'),
                    id: student.id,
                    name: student.name,
                    email: student.email,
                    course: student.course,
                    age: student.age,
                })
                .collect(),
        )
    };

    let pagination = if state.paging.paginated {
        state
            .list
            .page
            .map(|meta| build_pagination(&meta, state.paging.page_size))
    } else {
        None
    };

    let sort_label = match state.sort.field {
        Some(field) => format!("{} {}", field.as_str(), state.sort.direction.as_str()),
        None if state.paging.paginated => format!("id {}", state.sort.direction.as_str()),
        None => "unsorted".to_string(),
    };

    let modal = match &state.modal {
        ModalState::Closed => None,
        ModalState::Editing(session) => Some(EditModalView {
            id: session.id,
            form: FormView::new(&session.form, &session.errors),
        }),
    };

    RosterView {
        table,
        count_label: count_label(state.list.count()),
        paginated: state.paging.paginated,
        pagination,
        sort_label,
        search_name: state.filter.name.clone(),
        search_course: state.filter.course.clone(),
        add_form: FormView::new(&state.add_form.form, &state.add_form.errors),
        modal,
        toasts,
    }
}

impl fmt::Display for RosterView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = if self.paginated { "paginated" } else { "all" };
        write!(f, "Students [{mode}, sort: {}]", self.sort_label)?;
        if !self.search_name.is_empty() || !self.search_course.is_empty() {
            write!(
                f,
                " search name={:?} course={:?}",
                self.search_name, self.search_course
            )?;
        }
        writeln!(f)?;

        match &self.table {
            TableView::Empty(message) => writeln!(f, "  {message}")?,
            TableView::Rows(rows) => write_table(f, rows)?,
        }
        writeln!(f, "{}", self.count_label)?;

        if let Some(pagination) = &self.pagination {
            write_pagination(f, pagination)?;
        }

        for (field, message) in &self.add_form.errors {
            writeln!(f, "  add form: {}: {message}", field.label())?;
        }

        if let Some(modal) = &self.modal {
            writeln!(f, "-- editing student #{} --", modal.id)?;
            for field in StudentField::ALL {
                write!(f, "  {:<7} {}", field.label(), modal.form.values.value(field))?;
                match modal.form.error(field) {
                    Some(error) => writeln!(f, "  <- {error}")?,
                    None => writeln!(f)?,
                }
            }
        }

        for toast in &self.toasts {
            writeln!(
                f,
                "[{}] {}: {} (#{})",
                toast.kind.icon(),
                toast.title,
                toast.message,
                toast.id.0
            )?;
        }
        Ok(())
    }
}

fn write_table(f: &mut fmt::Formatter<'_>, rows: &[RowView]) -> fmt::Result {
    let ids: Vec<String> = rows.iter().map(|row| row.id.to_string()).collect();
    let id_w = column_width("ID", ids.iter().map(String::as_str));
    let name_w = column_width("Name", rows.iter().map(|row| row.name.as_str()));
    let email_w = column_width("Email", rows.iter().map(|row| row.email.as_str()));
    let course_w = column_width("Course", rows.iter().map(|row| row.course.as_str()));

    writeln!(
        f,
        "    {:<id_w$}  {:<name_w$}  {:<email_w$}  {:<course_w$}  Age",
        "ID", "Name", "Email", "Course"
    )?;
    for (row, id) in rows.iter().zip(&ids) {
        writeln!(
            f,
            "  {} {:<id_w$}  {:<name_w$}  {:<email_w$}  {:<course_w$}  {}",
            row.avatar, id, row.name, row.email, row.course, row.age
        )?;
    }
    Ok(())
}

fn column_width<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values
        .map(|value| value.chars().count())
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(0)
}

fn write_pagination(f: &mut fmt::Formatter<'_>, pagination: &PaginationControl) -> fmt::Result {
    let previous = if pagination.previous.enabled {
        "< Prev"
    } else {
        "  ----"
    };
    let next = if pagination.next.enabled {
        "Next >"
    } else {
        "----  "
    };
    write!(f, "{previous} |")?;
    for item in &pagination.items {
        match item {
            PageItem::Page {
                index,
                active: true,
            } => write!(f, " [{}]", index + 1)?,
            PageItem::Page { index, .. } => write!(f, " {}", index + 1)?,
            PageItem::Ellipsis => write!(f, " ...")?,
            PageItem::Info(text) => write!(f, " {text}")?,
        }
    }
    writeln!(f, " | {next}  ({} / page)", pagination.page_size)
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
