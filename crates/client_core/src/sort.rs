use std::cmp::Ordering;

use shared::domain::{SortDirection, SortField, Student};

/// Orders two students by one column. Text columns ignore case. Equal keys
/// compare `Equal`, so the order is a total preorder and sorting is repeatable.
pub fn compare_students(
    a: &Student,
    b: &Student,
    field: SortField,
    direction: SortDirection,
) -> Ordering {
    let ordering = match field {
        SortField::Id => a.id.cmp(&b.id),
        SortField::Age => a.age.cmp(&b.age),
        SortField::Name => cmp_ignore_case(&a.name, &b.name),
        SortField::Email => cmp_ignore_case(&a.email, &b.email),
        SortField::Course => cmp_ignore_case(&a.course, &b.course),
    };
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

/// Stable in-place sort; ties keep their fetched order.
pub fn sort_students(students: &mut [Student], field: SortField, direction: SortDirection) {
    students.sort_by(|a, b| compare_students(a, b, field, direction));
}

pub fn sorted(students: &[Student], field: SortField, direction: SortDirection) -> Vec<Student> {
    let mut students = students.to_vec();
    sort_students(&mut students, field, direction);
    students
}

#[cfg(test)]
#[path = "tests/sort_tests.rs"]
mod tests;
