// Copyright 2025 Kore Ledger, SL
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::sync::Arc;

use axum::{Extension, Router, response::IntoResponse, routing::get};
use hwproj_base::MarkOutcome;
use prometheus_client::{
    encoding::{EncodeLabelSet, EncodeLabelValue, text::encode},
    metrics::{counter::Counter, family::Family, gauge::Gauge},
    registry::Registry,
};
use tracing::{error, info};

use crate::error::Error;

const TARGET_PROMETHEUS: &str = "Hwproj-Bridge-Prometheus";

/// Registry operation invoked through the bridge.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelValue)]
pub enum Operation {
    RegisterStudentOnSubject,
    GetMarks,
    GetMarksFromSubject,
    GetMarksFromSubjectAvg,
    SetMarkToStudent,
    AddSubject,
    GetMarksByTeacher,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct OperationLabels {
    pub operation: Operation,
}

/// Fate of a mark sent by a teacher.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelValue)]
pub enum Fact {
    Recorded,
    UnknownTeacher,
    UnknownStudent,
    NotRegistered,
}

impl From<&MarkOutcome> for Fact {
    fn from(value: &MarkOutcome) -> Self {
        match value {
            MarkOutcome::Recorded { .. } => Fact::Recorded,
            MarkOutcome::UnknownTeacher => Fact::UnknownTeacher,
            MarkOutcome::UnknownStudent => Fact::UnknownStudent,
            MarkOutcome::NotRegistered { .. } => Fact::NotRegistered,
        }
    }
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct MarkLabels {
    pub fact: Fact,
}

/// Counters and gauges updated by the bridge.
#[derive(Clone, Debug, Default)]
pub struct Metrics {
    operations: Family<OperationLabels, Counter>,
    marks: Family<MarkLabels, Counter>,
    students: Gauge,
    teachers: Gauge,
}

impl Metrics {
    pub fn register(registry: &mut Registry) -> Self {
        let metrics = Self::default();
        registry.register(
            "operations",
            "Counts registry operations invoked.",
            metrics.operations.clone(),
        );
        registry.register(
            "marks",
            "Counts marks sent by teachers, by outcome.",
            metrics.marks.clone(),
        );
        registry.register(
            "students",
            "Known students.",
            metrics.students.clone(),
        );
        registry.register(
            "teachers",
            "Known teachers.",
            metrics.teachers.clone(),
        );
        metrics
    }

    pub fn operation(&self, operation: Operation) {
        self.operations
            .get_or_create(&OperationLabels { operation })
            .inc();
    }

    pub fn mark(&self, outcome: &MarkOutcome) {
        self.marks
            .get_or_create(&MarkLabels {
                fact: Fact::from(outcome),
            })
            .inc();
    }

    /// Refreshes the population gauges from the registry counts.
    pub fn population(&self, students: usize, teachers: usize) {
        self.students.set(students as i64);
        self.teachers.set(teachers as i64);
    }
}

pub async fn handler_prometheus_data(
    Extension(state): Extension<Arc<Registry>>,
) -> impl IntoResponse {
    let mut body = String::new();
    if let Err(e) = encode(&mut body, &state) {
        return (
            [("Content-Type", "text/plain; charset=utf-8")],
            format!("Error encoding Prometheus metrics: {}", e),
        );
    };

    ([("Content-Type", "text/plain; charset=utf-8")], body)
}

pub fn build_routes(registry: Registry) -> Router {
    let state = Arc::new(registry);

    let endpoints = Router::new()
        .route("/metrics", get(handler_prometheus_data))
        .layer(Extension(state));

    Router::new().merge(endpoints)
}

/// Binds `tcp_listener` and serves `/metrics` in the background.
pub async fn run_prometheus(
    registry: Registry,
    tcp_listener: &str,
) -> Result<(), Error> {
    let routes = build_routes(registry);
    let listener = tokio::net::TcpListener::bind(tcp_listener)
        .await
        .map_err(|e| {
            Error::Prometheus(format!("Can not bind {}: {}", tcp_listener, e))
        })?;

    info!(target: TARGET_PROMETHEUS, "Serving metrics on {}", tcp_listener);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, routes).await {
            error!(target: TARGET_PROMETHEUS, "Prometheus server stopped: {}", e);
        }
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use tower::ServiceExt;

    #[test]
    fn test_counters_are_encoded() {
        let mut registry = Registry::default();
        let metrics = Metrics::register(&mut registry);

        metrics.operation(Operation::SetMarkToStudent);
        metrics.operation(Operation::SetMarkToStudent);
        metrics.mark(&MarkOutcome::UnknownTeacher);

        let mut body = String::new();
        encode(&mut body, &registry).unwrap();

        assert!(body.contains(
            "operations_total{operation=\"SetMarkToStudent\"} 2"
        ));
        assert!(body.contains("marks_total{fact=\"UnknownTeacher\"} 1"));
    }

    #[test]
    fn test_population_gauges_follow_last_value() {
        let mut registry = Registry::default();
        let metrics = Metrics::register(&mut registry);

        metrics.population(3, 1);
        metrics.population(2, 1);

        let mut body = String::new();
        encode(&mut body, &registry).unwrap();

        assert!(body.contains("\nstudents 2\n"));
        assert!(body.contains("\nteachers 1\n"));
    }

    #[tokio::test]
    async fn test_metrics_route_serves_text() {
        let mut registry = Registry::with_prefix("hwproj");
        let metrics = Metrics::register(&mut registry);
        metrics.operation(Operation::GetMarks);
        metrics.mark(&MarkOutcome::Recorded {
            subject: "math".to_owned(),
        });

        let response = build_routes(registry)
            .oneshot(
                Request::builder()
                    .uri("/metrics")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains(
            "hwproj_operations_total{operation=\"GetMarks\"} 1"
        ));
        assert!(body.contains("hwproj_marks_total{fact=\"Recorded\"} 1"));
        assert!(body.ends_with("# EOF\n"));
    }

    #[tokio::test]
    async fn test_bind_error_is_reported() {
        let registry = Registry::default();
        let result = run_prometheus(registry, "not-an-address").await;
        assert!(matches!(result, Err(Error::Prometheus(_))));
    }
}
