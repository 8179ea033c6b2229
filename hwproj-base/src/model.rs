// Copyright 2025 Kore Ledger, SL
// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Model module.
//!

use std::collections::BTreeMap;

use dashmap::DashMap;

/// A single score. No range is enforced.
pub type Mark = i32;

/// Snapshot of a student's marks, keyed by subject.
pub type MarkSheet = BTreeMap<String, Vec<Mark>>;

/// Snapshot of the marks of every student registered on a teacher's
/// subject, keyed by student name.
pub type TeacherRoster = BTreeMap<String, Vec<Mark>>;

/// Append-only marks a student got on each subject. The name is the key
/// the registry stores the student under.
#[derive(Debug, Default)]
pub struct Student {
    marks: DashMap<String, Vec<Mark>>,
}

impl Student {
    /// Creates a student not registered on any subject.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the student on `subject` if they were not already.
    /// Returns `true` when the entry was created by this call.
    pub fn register(&self, subject: &str) -> bool {
        let mut created = false;
        self.marks.entry(subject.to_owned()).or_insert_with(|| {
            created = true;
            Vec::new()
        });
        created
    }

    /// Appends `mark` to the subject's sequence. Returns `false` without
    /// touching anything when the student is not registered on `subject`.
    pub fn push_mark(&self, subject: &str, mark: Mark) -> bool {
        match self.marks.get_mut(subject) {
            Some(mut marks) => {
                marks.push(mark);
                true
            }
            None => false,
        }
    }

    /// Copy of the marks on `subject`.
    pub fn marks_on(&self, subject: &str) -> Option<Vec<Mark>> {
        self.marks.get(subject).map(|marks| marks.clone())
    }

    /// Copy of every subject entry.
    pub fn mark_sheet(&self) -> MarkSheet {
        self.marks
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }
}

/// The one subject a teacher currently teaches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Teacher {
    pub subject: String,
}

impl Teacher {
    pub fn new(subject: &str) -> Self {
        Self {
            subject: subject.to_owned(),
        }
    }
}
