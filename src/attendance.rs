use crate::error::{Result, UnitrackError};
use crate::models::{AttendanceStatus, Group, NewSession, StudentAttendance};
use chrono::{DateTime, FixedOffset, Local};
use std::collections::HashMap;
use uuid::Uuid;

/// Attendance being taken for one class meeting.
///
/// Every student on the roster starts out `Presente`.
#[derive(Debug, Clone)]
pub struct AttendanceSheet {
    group_id: Uuid,
    date: DateTime<FixedOffset>,
    roster: Vec<Uuid>,
    marks: HashMap<Uuid, AttendanceStatus>,
}

impl AttendanceSheet {
    pub fn new(group: &Group) -> Self {
        Self::at(group, Local::now().fixed_offset())
    }

    pub fn at(group: &Group, date: DateTime<FixedOffset>) -> Self {
        let roster: Vec<Uuid> = group.students.iter().map(|s| s.id).collect();
        let marks = roster
            .iter()
            .map(|id| (*id, AttendanceStatus::Presente))
            .collect();

        Self {
            group_id: group.id,
            date,
            roster,
            marks,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.roster.is_empty()
    }

    pub fn status(&self, student_id: Uuid) -> Option<AttendanceStatus> {
        self.marks.get(&student_id).copied()
    }

    pub fn mark(&mut self, student_id: Uuid, status: AttendanceStatus) -> Result<()> {
        if !self.roster.contains(&student_id) {
            return Err(UnitrackError::InvalidInput(format!(
                "student {} is not enrolled in group {}",
                student_id, self.group_id
            )));
        }
        self.marks.insert(student_id, status);
        Ok(())
    }

    /// Build the payload for the new session, one record per roster student
    pub fn finish(self) -> NewSession {
        let attendances = self
            .roster
            .iter()
            .map(|id| StudentAttendance {
                student_id: *id,
                status: self
                    .marks
                    .get(id)
                    .copied()
                    .unwrap_or(AttendanceStatus::Ausente),
            })
            .collect();

        NewSession {
            date: self.date,
            name: None,
            attendances,
            group_id: self.group_id,
        }
    }
}
