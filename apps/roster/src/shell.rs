//! Line-oriented interactive front end over the roster controller.

use std::io::{self, Write};

use anyhow::{anyhow, bail, Context};
use client_core::{
    controller::{ClickTarget, ModalState},
    view::nav_action,
    RosterController, StudentForm, ToastId, UiAction,
};
use shared::domain::{SortDirection, SortField, StudentField, StudentId};
use tracing::debug;

pub const HELP: &str = "\
commands:
  list | reload                 clear search and load the first page
  page <n> | next | prev        move between pages
  size <n>                      change page size (5, 10, 20, 50)
  toggle                        switch between paginated and full list
  search [name=..] [course=..]  search by name and/or course
  sort <field|none> [asc|desc]  sort by id, name, email, course or age
  add name=.. email=.. course=.. age=..
  edit <id>                     open a student for editing
  set field=value ...           submit the open edit form with changes
  close | backdrop              close the edit form
  delete <id>                   delete a student
  dismiss <toast>               dismiss a notification
  show | help | quit";

/// Field overrides parsed from `field=value` arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub course: Option<String>,
    pub age: Option<String>,
}

impl FormPatch {
    pub fn from_assignments<S: AsRef<str>>(args: &[S]) -> anyhow::Result<Self> {
        let mut patch = Self::default();
        for arg in args {
            let arg = arg.as_ref();
            let (key, value) = arg
                .split_once('=')
                .ok_or_else(|| anyhow!("expected field=value, got '{arg}'"))?;
            let field: StudentField = key.parse()?;
            patch.set(field, value.to_string());
        }
        Ok(patch)
    }

    pub fn set(&mut self, field: StudentField, value: String) {
        let slot = match field {
            StudentField::Name => &mut self.name,
            StudentField::Email => &mut self.email,
            StudentField::Course => &mut self.course,
            StudentField::Age => &mut self.age,
        };
        *slot = Some(value);
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, base: &StudentForm) -> StudentForm {
        let pick = |patched: &Option<String>, current: &str| {
            patched.clone().unwrap_or_else(|| current.to_string())
        };
        StudentForm {
            name: pick(&self.name, &base.name),
            email: pick(&self.email, &base.email),
            course: pick(&self.course, &base.course),
            age: pick(&self.age, &base.age),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Action(UiAction),
    /// Resolved through the rendered previous/next buttons.
    Next,
    Previous,
    EditFields(FormPatch),
    Show,
    Help,
    Quit,
}

/// Splits on whitespace; single or double quotes group words.
pub fn tokenize(line: &str) -> anyhow::Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                in_token = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if quote.is_some() {
        bail!("unterminated quote");
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

pub fn parse(line: &str) -> anyhow::Result<Option<ShellCommand>> {
    let tokens = tokenize(line)?;
    let Some((head, args)) = tokens.split_first() else {
        return Ok(None);
    };

    let command = match head.to_ascii_lowercase().as_str() {
        "list" | "reload" => ShellCommand::Action(UiAction::Reload),
        "page" => {
            let page: u32 = number(args, "page")?;
            if page == 0 {
                bail!("pages are numbered from 1");
            }
            ShellCommand::Action(UiAction::GoToPage(page - 1))
        }
        "next" => ShellCommand::Next,
        "prev" | "previous" => ShellCommand::Previous,
        "size" => ShellCommand::Action(UiAction::ChangePageSize(number(args, "size")?)),
        "toggle" => ShellCommand::Action(UiAction::TogglePagination),
        "search" => {
            let patch = FormPatch::from_assignments(args)?;
            if patch.email.is_some() || patch.age.is_some() {
                bail!("search accepts only name= and course=");
            }
            ShellCommand::Action(UiAction::Search {
                name: patch.name.unwrap_or_default(),
                course: patch.course.unwrap_or_default(),
            })
        }
        "sort" => {
            let field = match args.first().map(String::as_str) {
                None => bail!("usage: sort <field|none> [asc|desc]"),
                Some("none") => None,
                Some(raw) => Some(raw.parse::<SortField>()?),
            };
            let direction = match args.get(1) {
                Some(raw) => raw.parse::<SortDirection>()?,
                None => SortDirection::Asc,
            };
            ShellCommand::Action(UiAction::Sort { field, direction })
        }
        "add" => {
            let form = FormPatch::from_assignments(args)?.apply(&StudentForm::default());
            ShellCommand::Action(UiAction::SubmitCreate(form))
        }
        "edit" => ShellCommand::Action(UiAction::OpenEdit(StudentId(number(args, "id")?))),
        "set" => {
            let patch = FormPatch::from_assignments(args)?;
            if patch.is_empty() {
                bail!("usage: set field=value ...");
            }
            ShellCommand::EditFields(patch)
        }
        "close" => ShellCommand::Action(UiAction::CloseEdit),
        "backdrop" => ShellCommand::Action(UiAction::Click(ClickTarget::Backdrop)),
        "delete" | "rm" => ShellCommand::Action(UiAction::Delete(StudentId(number(args, "id")?))),
        "dismiss" => ShellCommand::Action(UiAction::DismissToast(ToastId(number(args, "toast")?))),
        "show" => ShellCommand::Show,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => bail!("unknown command '{other}' (try `help`)"),
    };
    Ok(Some(command))
}

fn number<T: std::str::FromStr>(args: &[String], what: &str) -> anyhow::Result<T> {
    let raw = args
        .first()
        .ok_or_else(|| anyhow!("missing {what}"))?;
    raw.parse()
        .map_err(|_| anyhow!("invalid {what} '{raw}'"))
}

/// Reads commands until `quit` or end of input, printing the view after
/// every action.
pub async fn run<W: Write>(
    controller: &mut RosterController,
    lines: impl IntoIterator<Item = io::Result<String>>,
    mut out: W,
) -> anyhow::Result<()> {
    controller.reload().await;
    writeln!(out, "{}", controller.view())?;

    let mut lines = lines.into_iter();
    loop {
        write!(out, "roster> ")?;
        out.flush()?;
        let Some(line) = lines.next() else {
            writeln!(out)?;
            break;
        };
        let line = line.context("failed to read command")?;

        let command = match parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                writeln!(out, "error: {err}")?;
                continue;
            }
        };
        debug!(?command, "shell: command");

        let action = match command {
            ShellCommand::Quit => break,
            ShellCommand::Help => {
                writeln!(out, "{HELP}")?;
                continue;
            }
            ShellCommand::Show => {
                writeln!(out, "{}", controller.view())?;
                continue;
            }
            ShellCommand::Action(action) => action,
            ShellCommand::Next | ShellCommand::Previous => {
                let forward = matches!(command, ShellCommand::Next);
                match step_action(controller, forward) {
                    Some(action) => action,
                    None => {
                        writeln!(out, "no such page")?;
                        continue;
                    }
                }
            }
            ShellCommand::EditFields(patch) => match &controller.state().modal {
                ModalState::Editing(session) => UiAction::SubmitEdit(patch.apply(&session.form)),
                ModalState::Closed => {
                    writeln!(out, "no student is being edited; use `edit <id>` first")?;
                    continue;
                }
            },
        };

        controller.dispatch(action).await;
        writeln!(out, "{}", controller.view())?;
    }
    Ok(())
}

fn step_action(controller: &RosterController, forward: bool) -> Option<UiAction> {
    let pagination = controller.view().pagination?;
    let button = if forward {
        pagination.next
    } else {
        pagination.previous
    };
    nav_action(&button)
}

#[cfg(test)]
#[path = "tests/shell_tests.rs"]
mod tests;
