mod config;
mod shell;

use std::{
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
    sync::Arc,
    time::Duration,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    controller::ModalState, ActionOutcome, AlwaysConfirm, Confirm, ControllerOptions,
    HttpRosterApi, RosterController, StudentForm, ToastQueue,
};
use shared::domain::{SortDirection, SortField, StudentId};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    config::{load_settings, Settings, CONFIG_FILE},
    shell::FormPatch,
};

/// Admin client for the student roster service.
#[derive(Parser, Debug)]
#[command(name = "roster", version)]
struct Args {
    /// Base URL of the students resource.
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long)]
    page_size: Option<u32>,
    /// Fetch the whole roster in one request and sort it locally.
    #[arg(long)]
    no_paginate: bool,
    /// Answer yes to delete confirmations.
    #[arg(short, long)]
    yes: bool,
    #[arg(long, default_value = CONFIG_FILE)]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show a page of students.
    List {
        /// 1-based page number.
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        sort: Option<SortField>,
        #[arg(long, default_value = "asc")]
        dir: SortDirection,
    },
    Search {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        course: String,
    },
    /// Open one student in the edit form.
    Show { id: i64 },
    Add {
        name: String,
        email: String,
        course: String,
        age: String,
    },
    /// Change some fields of a student; unspecified fields keep their value.
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        course: Option<String>,
        #[arg(long)]
        age: Option<String>,
    },
    Delete { id: i64 },
    /// Interactive session.
    Shell,
}

impl Args {
    fn settings(&self) -> Result<Settings> {
        let mut settings = load_settings(&self.config)?;
        if let Some(url) = &self.api_url {
            settings.api_url = url.clone();
        }
        if let Some(size) = self.page_size.filter(|size| *size > 0) {
            settings.page_size = size;
        }
        if self.no_paginate {
            settings.paginated = false;
        }
        Ok(settings)
    }
}

/// Asks on stderr, reads the answer from stdin. Anything but y/yes declines.
struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        eprint!("{prompt} [y/N] ");
        let _ = io::stderr().flush();
        let mut answer = String::new();
        if io::stdin().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();
    let settings = args.settings()?;
    info!(
        api_url = %settings.api_url,
        page_size = settings.page_size,
        paginated = settings.paginated,
        "roster: starting"
    );

    let api = HttpRosterApi::new(&settings.api_url)
        .with_context(|| format!("cannot use api url '{}'", settings.api_url))?;
    info!(base_url = %api.base_url(), "roster: api client ready");
    let confirm: Arc<dyn Confirm> = if args.yes {
        Arc::new(AlwaysConfirm)
    } else {
        Arc::new(StdinConfirm)
    };
    let mut controller = RosterController::new(
        Arc::new(api),
        confirm,
        ToastQueue::new(Duration::from_secs(settings.toast_dismiss_secs)),
        ControllerOptions {
            paginated: settings.paginated,
            page_size: settings.page_size,
        },
    );

    if let Command::Shell = args.command {
        let stdin_lines = std::iter::from_fn(|| {
            let mut line = String::new();
            match io::stdin().read_line(&mut line) {
                Ok(0) => None,
                Ok(_) => Some(Ok(line)),
                Err(err) => Some(Err(err)),
            }
        });
        shell::run(&mut controller, stdin_lines, io::stdout()).await?;
        return Ok(ExitCode::SUCCESS);
    }

    let outcome = run_command(&mut controller, args.command).await;
    println!("{}", controller.view());
    Ok(if outcome.is_failure() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

async fn run_command(controller: &mut RosterController, command: Command) -> ActionOutcome {
    match command {
        Command::List { page, sort, dir } => {
            let page = page.saturating_sub(1);
            if sort.is_some() {
                let outcome = controller.apply_sort(sort, dir).await;
                let loaded_first_page = matches!(outcome, ActionOutcome::Refreshed { .. });
                if outcome.is_failure() || (loaded_first_page && page == 0) {
                    return outcome;
                }
            }
            controller.change_page(page).await
        }
        Command::Search { name, course } => controller.search(&name, &course).await,
        Command::Show { id } => controller.open_edit(StudentId(id)).await,
        Command::Add {
            name,
            email,
            course,
            age,
        } => {
            controller
                .create(StudentForm::new(name, email, course, age))
                .await
        }
        Command::Update {
            id,
            name,
            email,
            course,
            age,
        } => {
            let patch = FormPatch {
                name,
                email,
                course,
                age,
            };
            let opened = controller.open_edit(StudentId(id)).await;
            let form = match &controller.state().modal {
                ModalState::Editing(session) => patch.apply(&session.form),
                ModalState::Closed => return opened,
            };
            controller.submit_edit(form).await
        }
        Command::Delete { id } => controller.delete(StudentId(id)).await,
        Command::Shell => controller.reload().await,
    }
}
