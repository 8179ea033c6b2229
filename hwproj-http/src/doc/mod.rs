use crate::{
    server::*,
    wrappers::{
        Config, Logging, LoggingOutput, LoggingRotation, StudentMarks,
        TeacherMarks,
    },
};
use utoipa::OpenApi;
/// HwProj HTTP
///
/// This API records the marks teachers give to students on their subjects
/// and answers queries over them.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "HwProj HTTP",
        description = "This API keeps a registry of students, teachers, subjects and marks. Students are registered on subjects, each teacher teaches one subject and records marks for the students registered on it.",
        version = "0.1.0",
        contact(
            name = "Kore Information",
            url = "https://www.kore-ledger.net/",
            email = "info@kore-ledger.net"
        ),
        license(
            name = "AGPL-3.0",
            url = "https://www.gnu.org/licenses/agpl-3.0.html"
        )
    ),
    paths(
        register_student_on_subject,
        get_student_marks,
        get_student_marks_on_subject,
        get_student_marks_on_subject_avg,
        set_mark_to_student,
        add_subject,
        get_marks_by_teacher,
        get_config
    ),
    components(
        schemas(
            StudentMarks,
            TeacherMarks,
            Config,
            Logging,
            LoggingOutput,
            LoggingRotation
        )
    ),
    tags(
        (name = "Student", description = "Endpoints for registering students and reading their marks."),
        (name = "Teacher", description = "Endpoints for assigning subjects and recording marks."),
        (name = "Other", description = "Miscellaneous endpoints for service configuration."),
    )
)]
pub struct ApiDoc;
