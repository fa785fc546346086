use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One card of a remote task list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskItem {
    pub id: String,
    pub name: String,
    #[serde(default, alias = "desc")]
    pub description: String,
    #[serde(default)]
    pub due: Option<DateTime<Utc>>,
    #[serde(default)]
    pub labels: Vec<String>,
}

impl TaskItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            due: None,
            labels: Vec::new(),
        }
    }

    /// `true` once the due date has passed.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.due.is_some_and(|due| due < now)
    }

    /// Labels joined for a single-line display, blanks dropped.
    pub fn labels_text(&self) -> String {
        self.labels
            .iter()
            .filter(|l| !l.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn overdue_only_with_past_due_date() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let mut item = TaskItem::new("c1", "Retouch batch 4");
        assert!(!item.is_overdue(now));

        item.due = Some(Utc.with_ymd_and_hms(2026, 2, 28, 9, 0, 0).unwrap());
        assert!(item.is_overdue(now));

        item.due = Some(Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap());
        assert!(!item.is_overdue(now));
    }

    #[test]
    fn deserializes_minimal_export_entry() {
        let item: TaskItem =
            serde_json::from_str(r#"{ "id": "a1", "name": "Mockup", "desc": "v2", "labels": ["URGENT", ""] }"#)
                .unwrap();
        assert_eq!(item.description, "v2");
        assert_eq!(item.due, None);
        assert_eq!(item.labels_text(), "URGENT");
    }
}
