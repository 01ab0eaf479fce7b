//! Attendance aggregation for the group summary view.

use crate::models::{ClassSession, Group};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct SessionLine {
    pub session_id: Uuid,
    pub label: String,
    pub present: usize,
    pub roster_size: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub group_id: Uuid,
    pub total_students: usize,
    pub total_sessions: usize,
    pub total_present: usize,
    /// Rounded to the nearest whole percent
    pub overall_percentage: u32,
    /// Most recently recorded session first
    pub sessions: Vec<SessionLine>,
}

impl GroupSummary {
    /// Every session is weighed against the current roster size, so records
    /// for students who later left the group still count as present.
    pub fn from_group(group: &Group) -> Self {
        let total_students = group.students.len();
        let total_sessions = group.sessions.len();

        let total_present: usize = group.sessions.iter().map(ClassSession::present_count).sum();
        let possible = total_sessions * total_students;

        // The server returns sessions in the order they were recorded
        let sessions = group
            .sessions
            .iter()
            .rev()
            .map(|session| SessionLine {
                session_id: session.id,
                label: session.label(),
                present: session.present_count(),
                roster_size: total_students,
            })
            .collect();

        Self {
            group_id: group.id,
            total_students,
            total_sessions,
            total_present,
            overall_percentage: attendance_percentage(total_present, possible),
            sessions,
        }
    }
}

/// `present / possible` as a rounded percentage, 0 when nothing was possible
pub fn attendance_percentage(present: usize, possible: usize) -> u32 {
    if possible == 0 {
        return 0;
    }
    ((present as f64 / possible as f64) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_rounds_half_up() {
        assert_eq!(attendance_percentage(1, 8), 13);
        assert_eq!(attendance_percentage(1, 3), 33);
        assert_eq!(attendance_percentage(2, 3), 67);
    }

    #[test]
    fn test_percentage_zero_when_nothing_possible() {
        assert_eq!(attendance_percentage(0, 0), 0);
        assert_eq!(attendance_percentage(3, 0), 0);
    }
}
