use serde::{Deserialize, Serialize};

use crate::domain::{SortDirection, SortField, Student};

/// One page of the roster as served by `/paginated` and `/paginated/search`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedStudents {
    pub students: Vec<Student>,
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    pub has_next: bool,
    pub has_previous: bool,
}

/// Name/course search terms. Blank terms are dropped before they hit the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchTerms {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
}

impl SearchTerms {
    pub fn new(name: &str, course: &str) -> Self {
        Self {
            name: non_blank(name),
            course: non_blank(course),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.course.is_none()
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page: u32,
    pub size: u32,
    pub sort_by: SortField,
    pub sort_dir: SortDirection,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: 0,
            size: 10,
            sort_by: SortField::Id,
            sort_dir: SortDirection::Asc,
        }
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
