use crate::api::ApiResponse;
use crate::models::{AttendanceStatus, ClassSession, Group, Student, Subject};
use crate::summary::GroupSummary;
use colored::*;

/// Color an attendance status the way the roster view shows it
pub fn colored_status(status: AttendanceStatus) -> ColoredString {
    match status {
        AttendanceStatus::Presente => status.as_str().green(),
        AttendanceStatus::Ausente => status.as_str().red(),
        AttendanceStatus::Justificado => status.as_str().yellow(),
        AttendanceStatus::Tarde => status.as_str().truecolor(255, 140, 0),
    }
}

/// Verbose-only diagnostic line on stderr
pub fn debug_line(verbose: bool, tag: &str, message: &str) {
    if verbose {
        eprintln!("{}", format!("[{}] {}", tag, message).dimmed());
    }
}

pub fn display_error(message: &str) {
    eprintln!("{} {}", "Error:".red(), message);
}

pub fn display_subjects(subjects: &[Subject]) {
    if subjects.is_empty() {
        println!("{}", "No subjects yet. Add one with `unitrack subjects add`.".dimmed());
        return;
    }

    for subject in subjects {
        println!(
            "{} {} {}",
            subject.name.bold(),
            format!("({})", subject.code).cyan(),
            format!("{} group(s)", subject.groups.len()).dimmed()
        );
        println!("{}", format!("    {}", subject.id).dimmed());
    }
}

pub fn display_subject(subject: &Subject) {
    println!("{} {}", subject.name.bold(), format!("({})", subject.code).cyan());
    if subject.groups.is_empty() {
        println!("{}", "  No groups for this subject.".dimmed());
        return;
    }
    for group in &subject.groups {
        println!(
            "  {} {}",
            group.name,
            format!(
                "{} student(s), {} session(s)",
                group.students.len(),
                group.sessions.len()
            )
            .dimmed()
        );
        println!("{}", format!("      {}", group.id).dimmed());
    }
}

pub fn display_roster(group: &Group) {
    println!("{} {}", "Students of".dimmed(), group.name.bold());
    if group.students.is_empty() {
        println!("{}", "  No students in this group.".dimmed());
        return;
    }
    for student in &group.students {
        display_student(student);
    }
}

pub fn display_student(student: &Student) {
    println!(
        "  {} {} {}",
        student.name,
        format!("[{}]", student.enrollment).cyan(),
        student.id.to_string().dimmed()
    );
}

pub fn display_summary(subject: &Subject, group: &Group, summary: &GroupSummary) {
    println!(
        "{}",
        format!("Summary: {} ({})", group.name, subject.name).bold()
    );
    println!(
        "  Overall attendance: {}",
        format!("{}%", summary.overall_percentage).blue().bold()
    );
    println!(
        "  Sessions: {}   Students: {}",
        summary.total_sessions, summary.total_students
    );

    if summary.sessions.is_empty() {
        println!("{}", "  No sessions recorded for this group.".dimmed());
        return;
    }

    println!();
    for line in &summary.sessions {
        println!(
            "  {} {}",
            line.label,
            format!("{}/{} present", line.present, line.roster_size).dimmed()
        );
        println!("{}", format!("      {}", line.session_id).dimmed());
    }
}

pub fn display_session(subject: &Subject, group: &Group, session: &ClassSession) {
    println!(
        "{}",
        format!("{} - {} ({})", session.label(), group.name, subject.name).bold()
    );
    println!(
        "{}",
        format!("Date: {}", session.date.format("%A, %B %d, %Y")).dimmed()
    );

    if session.attendances.is_empty() {
        println!("{}", "No attendance records for this session.".dimmed());
        return;
    }

    for record in &session.attendances {
        // Records for students no longer on the roster are skipped
        if let Some(student) = group.student(record.student_id) {
            println!("  {:<32} {}", student.name, colored_status(record.status));
        }
    }
}

pub fn display_raw_response(response: &ApiResponse) {
    let status = response.status.to_string();
    if response.is_success() {
        println!("{}", status.green());
    } else {
        println!("{}", status.red());
    }

    let text = response.text();
    match serde_json::from_str::<serde_json::Value>(&text) {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(pretty) => println!("{}", pretty),
            Err(_) => println!("{}", text),
        },
        Err(_) if !text.is_empty() => println!("{}", text),
        Err(_) => {}
    }
}
