mod output;

pub use output::{
    colored_status, debug_line, display_error, display_raw_response, display_roster,
    display_session, display_student, display_subject, display_subjects, display_summary,
};
