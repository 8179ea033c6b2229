// Copyright 2025 Kore Ledger, SL
// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Registry module.
//!
//! Concurrent store of students and teachers. Entries are created with
//! `entry(..).or_insert_with(..)` so two callers racing on the same key
//! always end up sharing one entry. Nothing is ever removed.

use dashmap::DashMap;
use tracing::{debug, trace};

use crate::model::{Mark, MarkSheet, Student, Teacher, TeacherRoster};

const TARGET_REGISTRY: &str = "Hwproj-Registry";

/// What happened to a mark handed to [`Registry::set_mark_to_student`].
///
/// Only `Recorded` changes state; the rest are silent drops that callers
/// may log or count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkOutcome {
    /// The mark was appended to the student's sequence for `subject`.
    Recorded { subject: String },
    /// No teacher with that name.
    UnknownTeacher,
    /// No student with that name.
    UnknownStudent,
    /// The student exists but is not registered on the teacher's subject.
    NotRegistered { subject: String },
}

impl MarkOutcome {
    pub fn is_recorded(&self) -> bool {
        matches!(self, MarkOutcome::Recorded { .. })
    }
}

/// Students and teachers, each keyed by name.
#[derive(Debug, Default)]
pub struct Registry {
    students: DashMap<String, Student>,
    teachers: DashMap<String, Teacher>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `student` on `subject`, creating the student and the
    /// subject entry when missing. Idempotent.
    pub fn register_student_on_subject(&self, student: &str, subject: &str) {
        let entry = self
            .students
            .entry(student.to_owned())
            .or_insert_with(Student::new)
            .downgrade();

        if entry.register(subject) {
            debug!(
                target: TARGET_REGISTRY,
                student, subject, "Student registered on subject"
            );
        }
    }

    /// Every subject entry of `student`, or `None` if they were never
    /// registered on anything.
    pub fn get_marks(&self, student: &str) -> Option<MarkSheet> {
        self.students.get(student).map(|entry| entry.mark_sheet())
    }

    /// Marks of `student` on `subject`. `None` if the student is unknown or
    /// not registered on the subject.
    pub fn get_marks_from_subject(
        &self,
        student: &str,
        subject: &str,
    ) -> Option<Vec<Mark>> {
        self.students
            .get(student)
            .and_then(|entry| entry.marks_on(subject))
    }

    /// Arithmetic mean of [`Registry::get_marks_from_subject`].
    ///
    /// A registered subject without marks has no average and yields `None`.
    pub fn get_marks_from_subject_avg(
        &self,
        student: &str,
        subject: &str,
    ) -> Option<f64> {
        let marks = self.get_marks_from_subject(student, subject)?;
        if marks.is_empty() {
            return None;
        }

        let sum: i64 = marks.iter().map(|mark| i64::from(*mark)).sum();
        Some(sum as f64 / marks.len() as f64)
    }

    /// Appends `mark` to the student's sequence for the teacher's subject.
    ///
    /// Never registers anything: unknown teachers, unknown students and
    /// students not registered on the subject leave the state untouched.
    pub fn set_mark_to_student(
        &self,
        teacher: &str,
        student: &str,
        mark: Mark,
    ) -> MarkOutcome {
        let Some(subject) = self.get_teacher_subject(teacher) else {
            debug!(
                target: TARGET_REGISTRY,
                teacher, student, mark, "Mark dropped, unknown teacher"
            );
            return MarkOutcome::UnknownTeacher;
        };

        let Some(entry) = self.students.get(student) else {
            debug!(
                target: TARGET_REGISTRY,
                teacher, student, mark, "Mark dropped, unknown student"
            );
            return MarkOutcome::UnknownStudent;
        };

        if entry.push_mark(&subject, mark) {
            trace!(
                target: TARGET_REGISTRY,
                teacher, student, %subject, mark, "Mark recorded"
            );
            MarkOutcome::Recorded { subject }
        } else {
            debug!(
                target: TARGET_REGISTRY,
                teacher, student, %subject, mark,
                "Mark dropped, student not registered on subject"
            );
            MarkOutcome::NotRegistered { subject }
        }
    }

    /// Associates `teacher` with `subject`, replacing any previous subject.
    pub fn add_subject(&self, teacher: &str, subject: &str) {
        if let Some(previous) = self
            .teachers
            .insert(teacher.to_owned(), Teacher::new(subject))
        {
            if previous.subject != subject {
                debug!(
                    target: TARGET_REGISTRY,
                    teacher,
                    previous = %previous.subject,
                    subject,
                    "Teacher subject replaced"
                );
            }
        }
    }

    /// Subject currently associated with `teacher`.
    pub fn get_teacher_subject(&self, teacher: &str) -> Option<String> {
        self.teachers
            .get(teacher)
            .map(|entry| entry.subject.clone())
    }

    /// Marks of every student registered on the teacher's subject. Unknown
    /// teachers get an empty roster. Students are read one at a time, so
    /// the result is not an atomic view across students.
    pub fn get_marks_by_teacher(&self, teacher: &str) -> TeacherRoster {
        let Some(subject) = self.get_teacher_subject(teacher) else {
            return TeacherRoster::new();
        };

        self.students
            .iter()
            .filter_map(|entry| {
                entry
                    .marks_on(&subject)
                    .map(|marks| (entry.key().clone(), marks))
            })
            .collect()
    }

    /// Number of known students.
    pub fn student_count(&self) -> usize {
        self.students.len()
    }

    /// Number of known teachers.
    pub fn teacher_count(&self) -> usize {
        self.teachers.len()
    }
}
