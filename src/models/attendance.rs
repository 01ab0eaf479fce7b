use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Presente,
    Ausente,
    Justificado,
    Tarde,
}

impl AttendanceStatus {
    /// Late arrivals count towards attendance
    pub fn counts_as_present(self) -> bool {
        matches!(self, AttendanceStatus::Presente | AttendanceStatus::Tarde)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AttendanceStatus::Presente => "Presente",
            AttendanceStatus::Ausente => "Ausente",
            AttendanceStatus::Justificado => "Justificado",
            AttendanceStatus::Tarde => "Tarde",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "presente" | "present" => Ok(AttendanceStatus::Presente),
            "ausente" | "absent" => Ok(AttendanceStatus::Ausente),
            "justificado" | "excused" => Ok(AttendanceStatus::Justificado),
            "tarde" | "late" => Ok(AttendanceStatus::Tarde),
            other => Err(format!("unknown attendance status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentAttendance {
    #[serde(rename = "studentId")]
    pub student_id: Uuid,
    pub status: AttendanceStatus,
}

/// One class meeting of a group (`sesion`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassSession {
    pub id: Uuid,
    #[serde(rename = "fecha")]
    pub date: DateTime<FixedOffset>,
    /// Blank when the server did not assign one
    #[serde(rename = "nombre", default)]
    pub name: Option<String>,
    #[serde(rename = "asistencias", default)]
    pub attendances: Vec<StudentAttendance>,
    #[serde(rename = "grupo", default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<Uuid>,
}

impl ClassSession {
    /// Display name, falling back to the session date
    pub fn label(&self) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Session of {}", self.date.format("%Y-%m-%d")),
        }
    }

    pub fn status_of(&self, student_id: Uuid) -> Option<AttendanceStatus> {
        self.attendances
            .iter()
            .find(|a| a.student_id == student_id)
            .map(|a| a.status)
    }

    pub fn present_count(&self) -> usize {
        self.attendances
            .iter()
            .filter(|a| a.status.counts_as_present())
            .count()
    }
}

/// Payload for creating a session; the server names it when `name` is absent
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewSession {
    #[serde(rename = "fecha")]
    pub date: DateTime<FixedOffset>,
    #[serde(rename = "nombre", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "asistencias")]
    pub attendances: Vec<StudentAttendance>,
    #[serde(rename = "grupo")]
    pub group_id: Uuid,
}
