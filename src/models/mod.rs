mod attendance;
mod auth;
mod subject;

pub use attendance::{AttendanceStatus, ClassSession, NewSession, StudentAttendance};
pub use auth::{LoginRequest, LoginResponse, RefreshRequest, RefreshResponse};
pub use subject::{
    find_group, find_student, find_subject, Group, NewGroup, NewStudent, NewSubject, Student,
    Subject,
};
