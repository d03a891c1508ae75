//! Client-side form validation and field-error bookkeeping.

use std::{collections::BTreeMap, sync::LazyLock};

use regex_lite::Regex;
use shared::domain::{Student, StudentDraft, StudentField};

/// `local@domain.tld` with no whitespace anywhere. `\s` in regex-lite is
/// ASCII only, so the Unicode space separators are listed explicitly.
pub const EMAIL_PATTERN: &str = concat!(
    r"^[^@\s\x{A0}\x{1680}\x{2000}-\x{200A}\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}\x{FEFF}]+",
    r"@[^@\s\x{A0}\x{1680}\x{2000}-\x{200A}\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}\x{FEFF}]+",
    r"\.[^@\s\x{A0}\x{1680}\x{2000}-\x{200A}\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}\x{FEFF}]+$",
);
/// Ages must be strictly greater than this.
pub const MIN_AGE_EXCLUSIVE: i32 = 18;

pub const NAME_REQUIRED: &str = "Name is required";
pub const EMAIL_REQUIRED: &str = "Email is required";
pub const EMAIL_INVALID: &str = "Please enter a valid email address";
pub const COURSE_REQUIRED: &str = "Course is required";
pub const AGE_TOO_LOW: &str = "Age must be greater than 18";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("email pattern is a valid regex"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Stop at the first failing rule.
    FirstFailure,
    /// Report every failing field.
    CollectAll,
}

/// Raw form input as typed by the user; nothing is trimmed or parsed yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentForm {
    pub name: String,
    pub email: String,
    pub course: String,
    pub age: String,
}

impl StudentForm {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        course: impl Into<String>,
        age: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            course: course.into(),
            age: age.into(),
        }
    }

    pub fn value(&self, field: StudentField) -> &str {
        match field {
            StudentField::Name => &self.name,
            StudentField::Email => &self.email,
            StudentField::Course => &self.course,
            StudentField::Age => &self.age,
        }
    }
}

impl From<&Student> for StudentForm {
    fn from(student: &Student) -> Self {
        Self {
            name: student.name.clone(),
            email: student.email.clone(),
            course: student.course.clone(),
            age: student.age.to_string(),
        }
    }
}

/// Inline error decorations, at most one per field, ordered by field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<StudentField, String>);

impl FieldErrors {
    pub fn single(field: StudentField, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.insert(field, message);
        errors
    }

    /// Replaces any earlier error on the same field.
    pub fn insert(&mut self, field: StudentField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: StudentField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn first(&self) -> Option<(StudentField, &str)> {
        self.0
            .iter()
            .next()
            .map(|(field, message)| (*field, message.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (StudentField, &str)> {
        self.0
            .iter()
            .map(|(field, message)| (*field, message.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// Server-reported field errors mapped onto form fields, plus the
/// `"Field: message"` summary lines for every entry, known field or not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerFieldErrors {
    pub inline: FieldErrors,
    pub summary: Vec<String>,
}

impl ServerFieldErrors {
    pub fn from_map(errors: &BTreeMap<String, String>) -> Self {
        let mut mapped = Self::default();
        for (name, message) in errors {
            mapped
                .summary
                .push(format!("{}: {message}", capitalize(name)));
            if let Ok(field) = name.parse::<StudentField>() {
                mapped.inline.insert(field, message.clone());
            }
        }
        mapped
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Runs the rules in fixed order: name, email presence, email shape, course, age.
pub fn validate(form: &StudentForm, mode: ValidationMode) -> Result<StudentDraft, FieldErrors> {
    let name = form.name.trim();
    let email = form.email.trim();
    let course = form.course.trim();
    let age = form.age.trim().parse::<i32>().ok();

    let mut errors = FieldErrors::default();
    let checks: [(StudentField, Option<&str>); 4] = [
        (StudentField::Name, name.is_empty().then_some(NAME_REQUIRED)),
        (
            StudentField::Email,
            if email.is_empty() {
                Some(EMAIL_REQUIRED)
            } else if !is_valid_email(email) {
                Some(EMAIL_INVALID)
            } else {
                None
            },
        ),
        (
            StudentField::Course,
            course.is_empty().then_some(COURSE_REQUIRED),
        ),
        (
            StudentField::Age,
            match age {
                Some(age) if age > MIN_AGE_EXCLUSIVE => None,
                _ => Some(AGE_TOO_LOW),
            },
        ),
    ];

    for (field, failure) in checks {
        let Some(message) = failure else {
            continue;
        };
        errors.insert(field, message);
        if mode == ValidationMode::FirstFailure {
            break;
        }
    }

    match age {
        Some(age) if errors.is_empty() => Ok(StudentDraft {
            name: name.to_string(),
            email: email.to_string(),
            course: course.to_string(),
            age,
        }),
        _ => Err(errors),
    }
}

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod tests;
