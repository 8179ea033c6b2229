// Copyright 2025 Kore Ledger, SL
// SPDX-License-Identifier: AGPL-3.0-or-later

//! # HwProj base
//!
//! In-memory registry of students, teachers and the marks teachers give
//! to students. Every operation is total: queries return `None` for
//! unknown entities and writes never fail.

pub mod model;
pub mod registry;

pub use model::{Mark, MarkSheet, Student, Teacher, TeacherRoster};
pub use registry::{MarkOutcome, Registry};
