//! Roster view controller.
//!
//! Owns list, filter, sort, paging, and modal state. Every user action comes
//! in as a [`UiAction`], costs at most one API round trip plus one reload,
//! and ends in exactly one toast on failure. The held list is never patched:
//! it is replaced wholesale by whatever the server returns next.

use std::sync::Arc;

use shared::{
    domain::{SortDirection, SortField, Student, StudentField, StudentId},
    protocol::{PageQuery, SearchTerms},
};
use tracing::{debug, info, warn};

use crate::{
    notifications::{ToastId, ToastKind, ToastQueue},
    pagination::{PageMeta, DEFAULT_PAGE_SIZE},
    validation::{validate, FieldErrors, ServerFieldErrors, StudentForm, ValidationMode},
    view::{count_label, render, RosterView},
    ApiFailure, RosterApi,
};

pub const DELETE_PROMPT: &str =
    "Are you sure you want to delete this student? This action cannot be undone.";
pub const CONNECTION_ERROR: &str = "Unable to connect to server. Please check your connection.";
pub const DUPLICATE_EMAIL_INLINE: &str = "This email is already registered";
const DUPLICATE_EMAIL_DEFAULT: &str =
    "Email already exists. Please use a different email address.";
const EDIT_FORM_INVALID: &str = "Please fill in all required fields correctly";

/// Interactive yes/no gate in front of destructive actions.
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The dimmed area around the edit modal.
    Backdrop,
    Content,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    /// Clears the search fields and loads the first page.
    Reload,
    GoToPage(u32),
    ChangePageSize(u32),
    TogglePagination,
    Search { name: String, course: String },
    Sort {
        field: Option<SortField>,
        direction: SortDirection,
    },
    SubmitCreate(StudentForm),
    OpenEdit(StudentId),
    SubmitEdit(StudentForm),
    CloseEdit,
    Click(ClickTarget),
    Delete(StudentId),
    DismissToast(ToastId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Refreshed { count: u64 },
    /// Client-side re-sort of the held list; no request was made.
    Sorted,
    /// Client validation stopped the action before any request.
    Blocked(FieldErrors),
    Created(Student),
    Updated(Student),
    Deleted(StudentId),
    AlreadyDeleted(StudentId),
    EditOpened(StudentId),
    /// The record to edit no longer exists; the list was reloaded instead.
    EditMissing(StudentId),
    EditClosed,
    ToastDismissed(bool),
    Cancelled,
    Ignored,
    Failed(ApiFailure),
}

impl ActionOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, ActionOutcome::Blocked(_) | ActionOutcome::Failed(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerOptions {
    pub paginated: bool,
    pub page_size: u32,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            paginated: true,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListState {
    pub students: Vec<Student>,
    /// Present only for paginated responses.
    pub page: Option<PageMeta>,
}

impl ListState {
    pub fn count(&self) -> u64 {
        match self.page {
            Some(meta) => meta.total_items,
            None => self.students.len() as u64,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub name: String,
    pub course: String,
}

impl FilterState {
    pub fn terms(&self) -> SearchTerms {
        SearchTerms::new(&self.name, &self.course)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortState {
    /// `None` keeps fetch order in non-paginated mode and means `id` on the wire.
    pub field: Option<SortField>,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingState {
    pub paginated: bool,
    pub page: u32,
    pub page_size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub id: StudentId,
    pub form: StudentForm,
    pub errors: FieldErrors,
}

impl EditSession {
    fn new(student: &Student) -> Self {
        Self {
            id: student.id,
            form: StudentForm::from(student),
            errors: FieldErrors::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ModalState {
    #[default]
    Closed,
    Editing(EditSession),
}

impl ModalState {
    pub fn editing_id(&self) -> Option<StudentId> {
        match self {
            ModalState::Closed => None,
            ModalState::Editing(session) => Some(session.id),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddFormState {
    pub form: StudentForm,
    pub errors: FieldErrors,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterState {
    pub list: ListState,
    pub filter: FilterState,
    pub sort: SortState,
    pub paging: PagingState,
    pub modal: ModalState,
    pub add_form: AddFormState,
}

impl RosterState {
    pub fn new(options: ControllerOptions) -> Self {
        Self {
            list: ListState::default(),
            filter: FilterState::default(),
            sort: SortState::default(),
            paging: PagingState {
                paginated: options.paginated,
                page: 0,
                page_size: options.page_size.max(1),
            },
            modal: ModalState::Closed,
            add_form: AddFormState::default(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum LoadKind {
    List,
    Search,
}

impl LoadKind {
    fn failure_title(self) -> &'static str {
        match self {
            LoadKind::List => "Connection Error",
            LoadKind::Search => "Search Error",
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Mutation {
    Create,
    Update,
    Delete,
}

impl Mutation {
    fn error_title(self) -> &'static str {
        match self {
            Mutation::Create => "Error",
            Mutation::Update => "Update Error",
            Mutation::Delete => "Delete Error",
        }
    }

    fn default_message(self) -> &'static str {
        match self {
            Mutation::Create => "Failed to add student",
            Mutation::Update => "Failed to update student",
            Mutation::Delete => "Failed to delete student",
        }
    }
}

pub struct RosterController {
    api: Arc<dyn RosterApi>,
    confirm: Arc<dyn Confirm>,
    toasts: ToastQueue,
    state: RosterState,
}

impl RosterController {
    pub fn new(
        api: Arc<dyn RosterApi>,
        confirm: Arc<dyn Confirm>,
        toasts: ToastQueue,
        options: ControllerOptions,
    ) -> Self {
        Self {
            api,
            confirm,
            toasts,
            state: RosterState::new(options),
        }
    }

    pub fn state(&self) -> &RosterState {
        &self.state
    }

    pub fn toasts(&self) -> &ToastQueue {
        &self.toasts
    }

    pub fn view(&self) -> RosterView {
        render(&self.state, self.toasts.active())
    }

    pub async fn dispatch(&mut self, action: UiAction) -> ActionOutcome {
        debug!(?action, "roster: dispatch");
        match action {
            UiAction::Reload => self.reload().await,
            UiAction::GoToPage(page) => self.change_page(page).await,
            UiAction::ChangePageSize(size) => self.change_page_size(size).await,
            UiAction::TogglePagination => self.toggle_pagination().await,
            UiAction::Search { name, course } => self.search(&name, &course).await,
            UiAction::Sort { field, direction } => self.apply_sort(field, direction).await,
            UiAction::SubmitCreate(form) => self.create(form).await,
            UiAction::OpenEdit(id) => self.open_edit(id).await,
            UiAction::SubmitEdit(form) => self.submit_edit(form).await,
            UiAction::CloseEdit => self.close_edit(),
            UiAction::Click(target) => self.click(target),
            UiAction::Delete(id) => self.delete(id).await,
            UiAction::DismissToast(id) => ActionOutcome::ToastDismissed(self.toasts.dismiss(id)),
        }
    }

    fn notify(&self, kind: ToastKind, title: &str, message: impl Into<String>) -> ToastId {
        self.toasts.push(kind, Some(title), message)
    }

    /// Loads `page` under the current filter and sort. With search terms set
    /// this is a search and reports its match count like one.
    pub async fn refresh(&mut self, page: u32) -> ActionOutcome {
        if self.state.filter.terms().is_empty() {
            self.load(page, LoadKind::List).await
        } else {
            self.run_search(page).await
        }
    }

    /// Drops the search terms and loads the first page.
    pub async fn reload(&mut self) -> ActionOutcome {
        self.state.filter = FilterState::default();
        self.load(0, LoadKind::List).await
    }

    pub async fn change_page(&mut self, page: u32) -> ActionOutcome {
        self.refresh(page).await
    }

    pub async fn change_page_size(&mut self, size: u32) -> ActionOutcome {
        if size == 0 {
            return ActionOutcome::Ignored;
        }
        self.state.paging.page_size = size;
        self.refresh(0).await
    }

    pub async fn toggle_pagination(&mut self) -> ActionOutcome {
        self.state.paging.paginated = !self.state.paging.paginated;
        info!(paginated = self.state.paging.paginated, "roster: pagination toggled");
        self.reload().await
    }

    pub async fn search(&mut self, name: &str, course: &str) -> ActionOutcome {
        if SearchTerms::new(name, course).is_empty() {
            self.notify(
                ToastKind::Warning,
                "Search Required",
                "Please enter a name or course to search",
            );
            return ActionOutcome::Ignored;
        }

        self.state.filter = FilterState {
            name: name.trim().to_string(),
            course: course.trim().to_string(),
        };
        self.run_search(0).await
    }

    async fn run_search(&mut self, page: u32) -> ActionOutcome {
        let outcome = self.load(page, LoadKind::Search).await;
        if let ActionOutcome::Refreshed { count } = outcome {
            if count == 0 {
                self.notify(
                    ToastKind::Info,
                    "No Results",
                    "No students found matching your search criteria",
                );
            } else {
                self.notify(
                    ToastKind::Success,
                    "Search Complete",
                    format!("Found {}", count_label(count)),
                );
            }
        }
        outcome
    }

    /// Paginated mode asks the server to re-sort from the first page; otherwise
    /// the held list is re-sorted locally at render time.
    pub async fn apply_sort(
        &mut self,
        field: Option<SortField>,
        direction: SortDirection,
    ) -> ActionOutcome {
        self.state.sort = SortState { field, direction };
        if self.state.paging.paginated {
            self.refresh(0).await
        } else {
            ActionOutcome::Sorted
        }
    }

    async fn load(&mut self, page: u32, kind: LoadKind) -> ActionOutcome {
        match self.fetch(page).await {
            Ok(list) => {
                self.state.paging.page = list.page.map_or(0, |meta| meta.current_page);
                self.state.list = list;
                let count = self.state.list.count();
                info!(
                    page = self.state.paging.page,
                    count,
                    paginated = self.state.paging.paginated,
                    "roster: list refreshed"
                );
                ActionOutcome::Refreshed { count }
            }
            Err(failure) => {
                warn!(page, %failure, "roster: list load failed");
                self.state.list = ListState::default();
                let message = match &failure {
                    ApiFailure::Transport(_) => CONNECTION_ERROR,
                    other => other.server_message().unwrap_or(CONNECTION_ERROR),
                };
                self.notify(ToastKind::Error, kind.failure_title(), message);
                ActionOutcome::Failed(failure)
            }
        }
    }

    async fn fetch(&self, page: u32) -> Result<ListState, ApiFailure> {
        let terms = self.state.filter.terms();
        if !self.state.paging.paginated {
            let students = if terms.is_empty() {
                self.api.list_students().await?
            } else {
                self.api.search_students(&terms).await?
            };
            return Ok(ListState {
                students,
                page: None,
            });
        }

        let query = PageQuery {
            page,
            size: self.state.paging.page_size,
            sort_by: self.state.sort.field.unwrap_or_default(),
            sort_dir: self.state.sort.direction,
        };
        let result = if terms.is_empty() {
            self.api.list_students_paginated(query).await?
        } else {
            self.api.search_students_paginated(query, &terms).await?
        };
        let meta = PageMeta::from(&result);
        Ok(ListState {
            students: result.students,
            page: Some(meta),
        })
    }

    pub async fn create(&mut self, form: StudentForm) -> ActionOutcome {
        let draft = match validate(&form, ValidationMode::FirstFailure) {
            Ok(draft) => draft,
            Err(errors) => {
                if let Some((_, message)) = errors.first() {
                    self.notify(ToastKind::Error, "Validation Error", message);
                }
                self.state.add_form = AddFormState {
                    form,
                    errors: errors.clone(),
                };
                return ActionOutcome::Blocked(errors);
            }
        };

        self.state.add_form = AddFormState {
            form,
            errors: FieldErrors::default(),
        };
        match self.api.create_student(&draft).await {
            Ok(student) => {
                info!(student_id = student.id.0, "roster: student created");
                self.notify(
                    ToastKind::Success,
                    "Student Added",
                    format!("{} has been added successfully!", draft.name),
                );
                self.state.add_form = AddFormState::default();
                self.reload().await;
                ActionOutcome::Created(student)
            }
            Err(failure) => {
                self.state.add_form.errors = self.report_mutation_failure(&failure, Mutation::Create);
                ActionOutcome::Failed(failure)
            }
        }
    }

    pub async fn open_edit(&mut self, id: StudentId) -> ActionOutcome {
        match self.api.get_student(id).await {
            Ok(student) => {
                self.state.modal = ModalState::Editing(EditSession::new(&student));
                ActionOutcome::EditOpened(id)
            }
            Err(failure) if failure.is_not_found() => {
                self.notify(
                    ToastKind::Info,
                    "Not Found",
                    "Student not found. The record may have been deleted.",
                );
                info!(student_id = id.0, %failure, "roster: student to edit is gone");
                self.state.modal = ModalState::Closed;
                self.reload().await;
                ActionOutcome::EditMissing(id)
            }
            Err(failure) => {
                warn!(student_id = id.0, %failure, "roster: failed to load student for edit");
                self.notify(
                    ToastKind::Error,
                    "Load Error",
                    "Unable to load student data. Please try again.",
                );
                ActionOutcome::Failed(failure)
            }
        }
    }

    pub async fn submit_edit(&mut self, form: StudentForm) -> ActionOutcome {
        let ModalState::Editing(session) = &mut self.state.modal else {
            return ActionOutcome::Ignored;
        };
        let id = session.id;
        session.form = form;
        session.errors.clear();

        let draft = match validate(&session.form, ValidationMode::CollectAll) {
            Ok(draft) => draft,
            Err(errors) => {
                session.errors = errors.clone();
                self.notify(ToastKind::Error, "Validation Error", EDIT_FORM_INVALID);
                return ActionOutcome::Blocked(errors);
            }
        };

        match self.api.update_student(id, &draft).await {
            Ok(student) => {
                info!(student_id = id.0, "roster: student updated");
                self.notify(
                    ToastKind::Success,
                    "Student Updated",
                    format!("{}'s information has been updated successfully!", draft.name),
                );
                self.close_edit();
                self.reload().await;
                ActionOutcome::Updated(student)
            }
            Err(failure) => {
                let errors = self.report_mutation_failure(&failure, Mutation::Update);
                if let ModalState::Editing(session) = &mut self.state.modal {
                    session.errors = errors;
                }
                ActionOutcome::Failed(failure)
            }
        }
    }

    /// Clears error decorations and form values.
    pub fn close_edit(&mut self) -> ActionOutcome {
        self.state.modal = ModalState::Closed;
        ActionOutcome::EditClosed
    }

    pub fn click(&mut self, target: ClickTarget) -> ActionOutcome {
        match (target, &self.state.modal) {
            (ClickTarget::Backdrop, ModalState::Editing(_)) => self.close_edit(),
            _ => ActionOutcome::Ignored,
        }
    }

    pub async fn delete(&mut self, id: StudentId) -> ActionOutcome {
        if !self.confirm.confirm(DELETE_PROMPT) {
            debug!(student_id = id.0, "roster: delete cancelled");
            return ActionOutcome::Cancelled;
        }

        match self.api.delete_student(id).await {
            Ok(()) => {
                info!(student_id = id.0, "roster: student deleted");
                self.notify(
                    ToastKind::Success,
                    "Student Deleted",
                    "Student has been deleted successfully",
                );
                self.reload().await;
                ActionOutcome::Deleted(id)
            }
            Err(failure) if failure.is_not_found() => {
                info!(student_id = id.0, "roster: student already gone");
                self.notify(
                    ToastKind::Info,
                    "Not Found",
                    "Student not found. The record may have already been deleted.",
                );
                self.reload().await;
                ActionOutcome::AlreadyDeleted(id)
            }
            Err(failure) => {
                self.report_mutation_failure(&failure, Mutation::Delete);
                ActionOutcome::Failed(failure)
            }
        }
    }

    /// Single toast per failure; returns the inline errors the form should show.
    fn report_mutation_failure(&self, failure: &ApiFailure, mutation: Mutation) -> FieldErrors {
        warn!(?mutation, %failure, "roster: mutation failed");
        match failure {
            ApiFailure::Validation { errors } => {
                let mapped = ServerFieldErrors::from_map(errors);
                match mapped.summary.as_slice() {
                    [only] => {
                        self.notify(ToastKind::Error, "Validation Error", only.as_str());
                    }
                    all => {
                        self.notify(
                            ToastKind::Error,
                            "Validation Failed",
                            format!("Please fix {} validation errors in the form", all.len()),
                        );
                    }
                }
                mapped.inline
            }
            ApiFailure::Conflict { message } => {
                self.notify(
                    ToastKind::Error,
                    "Duplicate Email",
                    message.as_deref().unwrap_or(DUPLICATE_EMAIL_DEFAULT),
                );
                FieldErrors::single(StudentField::Email, DUPLICATE_EMAIL_INLINE)
            }
            ApiFailure::Transport(_) => {
                self.notify(ToastKind::Error, "Network Error", CONNECTION_ERROR);
                FieldErrors::default()
            }
            other => {
                self.notify(
                    ToastKind::Error,
                    mutation.error_title(),
                    other.server_message().unwrap_or(mutation.default_message()),
                );
                FieldErrors::default()
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
