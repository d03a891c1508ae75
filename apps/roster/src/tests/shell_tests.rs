use super::*;
use std::{net::TcpListener, sync::Arc};

use client_core::{AlwaysConfirm, ControllerOptions, HttpRosterApi, ToastQueue};

#[test]
fn tokenizer_groups_quoted_words() {
    assert_eq!(
        tokenize(r#"add name="Ada Lovelace" course='Applied Math'  age=36"#).expect("tokens"),
        ["add", "name=Ada Lovelace", "course=Applied Math", "age=36"]
    );
    assert_eq!(tokenize("   ").expect("tokens"), Vec::<String>::new());
    assert_eq!(tokenize(r#"search name="""#).expect("tokens"), ["search", "name="]);
    assert!(tokenize(r#"add name="Ada"#).is_err());
}

#[test]
fn parses_navigation_commands() {
    assert_eq!(
        parse("page 3").expect("parse"),
        Some(ShellCommand::Action(UiAction::GoToPage(2)))
    );
    assert_eq!(parse("next").expect("parse"), Some(ShellCommand::Next));
    assert_eq!(parse("PREV").expect("parse"), Some(ShellCommand::Previous));
    assert_eq!(
        parse("size 20").expect("parse"),
        Some(ShellCommand::Action(UiAction::ChangePageSize(20)))
    );
    assert_eq!(parse("").expect("parse"), None);
    assert!(parse("page 0").is_err());
    assert!(parse("page two").is_err());
}

#[test]
fn parses_sort_with_optional_direction() {
    assert_eq!(
        parse("sort Name desc").expect("parse"),
        Some(ShellCommand::Action(UiAction::Sort {
            field: Some(SortField::Name),
            direction: SortDirection::Desc,
        }))
    );
    assert_eq!(
        parse("sort none").expect("parse"),
        Some(ShellCommand::Action(UiAction::Sort {
            field: None,
            direction: SortDirection::Asc,
        }))
    );
    assert!(parse("sort height").is_err());
}

#[test]
fn add_builds_form_from_assignments() {
    let Some(ShellCommand::Action(UiAction::SubmitCreate(form))) =
        parse(r#"add name="Grace Hopper" email=grace@example.com course=CS age=30"#)
            .expect("parse")
    else {
        panic!("expected create");
    };
    assert_eq!(
        form,
        StudentForm::new("Grace Hopper", "grace@example.com", "CS", "30")
    );
}

#[test]
fn search_rejects_fields_it_cannot_filter_on() {
    assert_eq!(
        parse("search course=Math").expect("parse"),
        Some(ShellCommand::Action(UiAction::Search {
            name: String::new(),
            course: "Math".into(),
        }))
    );
    assert!(parse("search age=20").is_err());
    assert!(parse("search Math").is_err());
}

#[test]
fn patch_overrides_only_named_fields() {
    let base = StudentForm::new("Ada", "ada@example.com", "Math", "21");
    let patch = FormPatch::from_assignments(&["age=22", "COURSE=Physics"]).expect("patch");

    assert!(!patch.is_empty());
    assert_eq!(
        patch.apply(&base),
        StudentForm::new("Ada", "ada@example.com", "Physics", "22")
    );
    assert!(FormPatch::from_assignments(&["height=2"]).is_err());
    assert!(FormPatch::default().is_empty());
}

#[tokio::test]
async fn shell_reports_unreachable_server_and_stops_on_quit() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr").port()
    };
    let api = HttpRosterApi::new(&format!("http://127.0.0.1:{port}/api/students")).expect("api");
    let mut controller = RosterController::new(
        Arc::new(api),
        Arc::new(AlwaysConfirm),
        ToastQueue::default(),
        ControllerOptions::default(),
    );
    let script = ["help", "bogus", "set age=30", "next", "quit", "list"]
        .into_iter()
        .map(|line| Ok(line.to_string()));
    let mut out = Vec::new();

    run(&mut controller, script, &mut out).await.expect("shell");

    let text = String::from_utf8(out).expect("utf8");
    assert!(text.contains("Connection Error"));
    assert!(text.contains("commands:"));
    assert!(text.contains("unknown command 'bogus'"));
    assert!(text.contains("use `edit <id>` first"));
    assert!(text.contains("no such page"));
    assert_eq!(text.matches("roster> ").count(), 5, "stops reading after quit");
}
