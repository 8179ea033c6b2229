use std::collections::BTreeMap;

use hwproj_bridge::{
    Config as ConfigBridge, Logging as LoggingBridge,
    LoggingOutput as LoggingOutputBridge,
    LoggingRotation as LoggingRotationBridge, MarkSheet, TeacherRoster,
};
use serde::Serialize;
use utoipa::ToSchema;

/// Marks of a student, keyed by subject.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(transparent)]
pub struct StudentMarks(pub BTreeMap<String, Vec<i32>>);

impl From<MarkSheet> for StudentMarks {
    fn from(value: MarkSheet) -> Self {
        Self(value)
    }
}

/// Marks of every student on a teacher's subject, keyed by student.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(transparent)]
pub struct TeacherMarks(pub BTreeMap<String, Vec<i32>>);

impl From<TeacherRoster> for TeacherMarks {
    fn from(value: TeacherRoster) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Config {
    pub prometheus: String,
    pub logging: Logging,
}

impl From<ConfigBridge> for Config {
    fn from(value: ConfigBridge) -> Self {
        Self {
            prometheus: value.prometheus,
            logging: Logging::from(value.logging),
        }
    }
}

#[derive(Debug, Serialize, Clone, ToSchema)]
pub struct LoggingOutput {
    pub stdout: bool,
    pub file: bool,
}

impl From<LoggingOutputBridge> for LoggingOutput {
    fn from(value: LoggingOutputBridge) -> Self {
        Self {
            stdout: value.stdout,
            file: value.file,
        }
    }
}

#[derive(Clone, Debug, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LoggingRotation {
    Size,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl From<LoggingRotationBridge> for LoggingRotation {
    fn from(value: LoggingRotationBridge) -> Self {
        match value {
            LoggingRotationBridge::Size => LoggingRotation::Size,
            LoggingRotationBridge::Hourly => LoggingRotation::Hourly,
            LoggingRotationBridge::Daily => LoggingRotation::Daily,
            LoggingRotationBridge::Weekly => LoggingRotation::Weekly,
            LoggingRotationBridge::Monthly => LoggingRotation::Monthly,
            LoggingRotationBridge::Yearly => LoggingRotation::Yearly,
            LoggingRotationBridge::Never => LoggingRotation::Never,
        }
    }
}

#[derive(Debug, Serialize, Clone, ToSchema)]
pub struct Logging {
    pub output: LoggingOutput,
    pub file_path: String,
    pub rotation: LoggingRotation,
    pub max_size: usize,
    pub max_files: usize,
    pub level: String,
}

impl From<LoggingBridge> for Logging {
    fn from(value: LoggingBridge) -> Self {
        Self {
            output: LoggingOutput::from(value.output),
            file_path: value.file_path,
            rotation: LoggingRotation::from(value.rotation),
            max_size: value.max_size,
            max_files: value.max_files,
            level: value.level,
        }
    }
}
