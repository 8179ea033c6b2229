// Copyright 2025 Kore Ledger, SL
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{future::Future, sync::Arc};

pub use hwproj_base::{Mark, MarkOutcome, MarkSheet, Registry, TeacherRoster};
use prometheus::{Metrics, Operation, run_prometheus};
use prometheus_client::registry::Registry as MetricsRegistry;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub mod config;
pub mod error;
pub mod settings;
pub use clap;
pub mod prometheus;

pub use config::{Config, Logging, LoggingOutput, LoggingRotation};
pub use error::Error;

const TARGET_BRIDGE: &str = "Hwproj-Bridge";

/// Handle shared by every request handler. Cloning is cheap and all clones
/// see the same registry.
#[derive(Clone)]
pub struct Bridge {
    registry: Arc<Registry>,
    metrics: Metrics,
    config: Config,
    cancellation: CancellationToken,
}

impl Bridge {
    pub async fn build(
        settings: Config,
        token: Option<CancellationToken>,
    ) -> Result<Self, Error> {
        let mut registry = <MetricsRegistry>::with_prefix("hwproj");
        let metrics = Metrics::register(&mut registry);

        let token = if let Some(token) = token {
            token
        } else {
            CancellationToken::new()
        };

        if !settings.prometheus.is_empty() {
            run_prometheus(registry, &settings.prometheus).await?;
        }

        Self::bind_with_shutdown(token.clone(), tokio::signal::ctrl_c());

        info!(target: TARGET_BRIDGE, "Registry ready");

        Ok(Self {
            registry: Arc::new(Registry::new()),
            metrics,
            config: settings,
            cancellation: token,
        })
    }

    pub fn token(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn config(&self) -> Config {
        self.config.clone()
    }

    fn bind_with_shutdown(
        token: CancellationToken,
        shutdown_signal: impl Future + Send + 'static,
    ) {
        let cancellation_token = token.clone();
        tokio::spawn(async move {
            shutdown_signal.await;
            info!(target: TARGET_BRIDGE, "Shutdown signal received");
            cancellation_token.cancel();
        });
    }

    fn refresh_population(&self) {
        self.metrics.population(
            self.registry.student_count(),
            self.registry.teacher_count(),
        );
    }

    pub fn register_student_on_subject(&self, student: &str, subject: &str) {
        self.metrics.operation(Operation::RegisterStudentOnSubject);
        self.registry.register_student_on_subject(student, subject);
        self.refresh_population();
    }

    pub fn get_marks(&self, student: &str) -> Option<MarkSheet> {
        self.metrics.operation(Operation::GetMarks);
        self.registry.get_marks(student)
    }

    pub fn get_marks_from_subject(
        &self,
        student: &str,
        subject: &str,
    ) -> Option<Vec<Mark>> {
        self.metrics.operation(Operation::GetMarksFromSubject);
        self.registry.get_marks_from_subject(student, subject)
    }

    pub fn get_marks_from_subject_avg(
        &self,
        student: &str,
        subject: &str,
    ) -> Option<f64> {
        self.metrics.operation(Operation::GetMarksFromSubjectAvg);
        self.registry.get_marks_from_subject_avg(student, subject)
    }

    pub fn set_mark_to_student(
        &self,
        teacher: &str,
        student: &str,
        mark: Mark,
    ) -> MarkOutcome {
        self.metrics.operation(Operation::SetMarkToStudent);
        let outcome = self.registry.set_mark_to_student(teacher, student, mark);
        self.metrics.mark(&outcome);
        outcome
    }

    pub fn add_subject(&self, teacher: &str, subject: &str) {
        self.metrics.operation(Operation::AddSubject);
        self.registry.add_subject(teacher, subject);
        self.refresh_population();
    }

    pub fn get_marks_by_teacher(&self, teacher: &str) -> TeacherRoster {
        self.metrics.operation(Operation::GetMarksByTeacher);
        self.registry.get_marks_by_teacher(teacher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    async fn bridge() -> Bridge {
        Bridge::build(Config::default(), None).await.unwrap()
    }

    #[test(tokio::test)]
    async fn test_clones_share_registry() {
        let bridge = bridge().await;
        let other = bridge.clone();

        bridge.register_student_on_subject("alice", "math");
        other.add_subject("bob", "math");
        let outcome = other.set_mark_to_student("bob", "alice", 5);

        assert!(outcome.is_recorded());
        assert_eq!(
            bridge.get_marks_from_subject("alice", "math"),
            Some(vec![5])
        );
        assert_eq!(
            bridge.get_marks_by_teacher("bob"),
            TeacherRoster::from([("alice".to_owned(), vec![5])])
        );
    }

    #[test(tokio::test)]
    async fn test_dropped_mark_keeps_state() {
        let bridge = bridge().await;
        bridge.register_student_on_subject("alice", "math");

        let outcome = bridge.set_mark_to_student("bob", "alice", 5);

        assert_eq!(outcome, MarkOutcome::UnknownTeacher);
        assert_eq!(
            bridge.get_marks("alice"),
            Some(MarkSheet::from([("math".to_owned(), vec![])]))
        );
        assert!(bridge.get_marks_from_subject_avg("alice", "math").is_none());
    }

    #[test(tokio::test)]
    async fn test_external_token_is_used() {
        let token = CancellationToken::new();
        let bridge = Bridge::build(Config::default(), Some(token.clone()))
            .await
            .unwrap();

        token.cancel();
        assert!(bridge.token().is_cancelled());
    }

    #[test(tokio::test)]
    async fn test_config_is_exposed() {
        let config = Config {
            prometheus: String::default(),
            logging: Logging {
                level: "debug".to_owned(),
                ..Default::default()
            },
        };
        let bridge = Bridge::build(config.clone(), None).await.unwrap();
        assert_eq!(bridge.config(), config);
    }
}
