use crate::ids::IdSource;
use raidguard_types::{Subject, SubjectType};
use std::cell::Cell;
use std::collections::BTreeMap;
use time::OffsetDateTime;
use time::macros::datetime;

/// Deterministic ids: `id-1`, `id-2`, ...
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: Cell<u32>,
}

impl IdSource for SequentialIds {
    fn next_id(&self) -> String {
        let n = self.next.get() + 1;
        self.next.set(n);
        format!("id-{n}")
    }
}

pub fn collected_at() -> OffsetDateTime {
    datetime!(2025-06-01 12:00:00 UTC)
}

pub fn subject(id: &str) -> Subject {
    Subject {
        id: id.to_string(),
        kind: SubjectType::InventoryItem,
        title: "Test Subject".to_string(),
        props: BTreeMap::new(),
    }
}
