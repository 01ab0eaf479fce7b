use super::attendance::ClassSession;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A course taught by the signed-in instructor (`materia`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: Uuid,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "grupos", default)]
    pub groups: Vec<Group>,
}

/// A section of a subject with its own roster and sessions (`grupo`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: Uuid,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "materia")]
    pub subject_id: Uuid,
    #[serde(rename = "estudiantes", default)]
    pub students: Vec<Student>,
    #[serde(rename = "sesiones", default)]
    pub sessions: Vec<ClassSession>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: Uuid,
    #[serde(rename = "nombre")]
    pub name: String,
    /// Institutional enrollment number (`matricula`)
    #[serde(rename = "studentId")]
    pub enrollment: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewSubject {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "codigo")]
    pub code: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewGroup {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "materia")]
    pub subject_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewStudent {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "studentId")]
    pub enrollment: String,
    #[serde(rename = "grupo")]
    pub group_id: Uuid,
}

impl Group {
    pub fn student(&self, student_id: Uuid) -> Option<&Student> {
        self.students.iter().find(|s| s.id == student_id)
    }

    pub fn session(&self, session_id: Uuid) -> Option<&ClassSession> {
        self.sessions.iter().find(|s| s.id == session_id)
    }
}

/// Locate a group and the subject it belongs to
pub fn find_group(subjects: &[Subject], group_id: Uuid) -> Option<(&Subject, &Group)> {
    subjects.iter().find_map(|subject| {
        subject
            .groups
            .iter()
            .find(|g| g.id == group_id)
            .map(|group| (subject, group))
    })
}

pub fn find_subject(subjects: &[Subject], subject_id: Uuid) -> Option<&Subject> {
    subjects.iter().find(|s| s.id == subject_id)
}

pub fn find_student(subjects: &[Subject], group_id: Uuid, student_id: Uuid) -> Option<&Student> {
    find_group(subjects, group_id).and_then(|(_, group)| group.student(student_id))
}
