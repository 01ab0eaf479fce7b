use crate::api::{
    AuthenticatedClient, AuthenticatedRequest, RefreshFailure, RefreshOutcome, ReqwestTransport,
    UnitrackApi,
};
use crate::attendance::AttendanceSheet;
use crate::cli::{AttendanceCommand, Command, GroupsCommand, StudentsCommand, SubjectsCommand};
use crate::config::Config;
use crate::error::{Result, UnitrackError};
use crate::models::{
    find_group, find_student, find_subject, AttendanceStatus, Group, NewGroup, NewStudent,
    NewSubject, StudentAttendance, Subject,
};
use crate::session::{FilesystemSessionStore, SessionStore};
use crate::summary::GroupSummary;
use crate::ui;
use colored::*;
use reqwest::Method;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub struct CommandContext {
    pub config: Config,
    pub api: UnitrackApi,
    refresh_outcomes: Arc<Mutex<Vec<RefreshOutcome>>>,
}

impl CommandContext {
    /// Wire the reqwest transport and the on-disk session store together
    pub fn from_config(config: Config) -> Result<Self> {
        let store: Arc<dyn SessionStore> = match &config.session_dir {
            Some(dir) => Arc::new(FilesystemSessionStore::with_dir(dir)),
            None => Arc::new(FilesystemSessionStore::new()?),
        };
        let transport = Arc::new(ReqwestTransport::new(config.timeout_secs)?);

        let client = AuthenticatedClient::new(config.api_url.clone(), transport, store)
            .with_refresh_path(config.refresh_path.clone());

        Ok(Self::new(config, client))
    }

    /// Build a context around an existing client, recording its refresh
    /// attempts so `run` can tell a dead session from an unreachable server
    pub fn new(config: Config, client: AuthenticatedClient) -> Self {
        let refresh_outcomes = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&refresh_outcomes);
        let verbose = config.verbose;

        let client = client.with_refresh_observer(move |outcome: &RefreshOutcome| {
            match outcome {
                RefreshOutcome::Refreshed => {
                    ui::debug_line(verbose, "auth", "access token refreshed")
                }
                RefreshOutcome::RefreshedUnsaved { reason } => ui::debug_line(
                    verbose,
                    "auth",
                    &format!("access token refreshed but not saved: {}", reason),
                ),
                RefreshOutcome::Failed(failure) => {
                    ui::debug_line(verbose, "auth", &format!("refresh failed: {}", failure))
                }
            }
            if let Ok(mut outcomes) = recorded.lock() {
                outcomes.push(outcome.clone());
            }
        });

        Self {
            config,
            api: UnitrackApi::new(client),
            refresh_outcomes,
        }
    }

    /// Refresh attempts made so far, oldest first
    pub fn refresh_outcomes(&self) -> Vec<RefreshOutcome> {
        self.refresh_outcomes
            .lock()
            .map(|outcomes| outcomes.clone())
            .unwrap_or_default()
    }

    /// The network error of the most recent refresh that never reached the server
    fn unreachable_refresh(&self) -> Option<String> {
        self.refresh_outcomes().into_iter().rev().find_map(|outcome| match outcome {
            RefreshOutcome::Failed(RefreshFailure::Transport(message)) => Some(message),
            _ => None,
        })
    }

    fn debug(&self, message: &str) {
        ui::debug_line(self.config.verbose, "unitrack", message);
    }
}

/// Run one CLI command.
///
/// A resource call that still fails with 401 after the client's own refresh
/// attempt means the session is unusable: it is cleared and the user is asked
/// to sign in again. When the refresh call itself never reached the server the
/// tokens are kept, since the refresh token may still be valid.
pub async fn run(context: &CommandContext, command: Command) -> Result<()> {
    let is_login = matches!(command, Command::Login { .. });

    match execute(context, command).await {
        Err(err) if err.is_unauthorized() && !is_login => {
            if let Some(message) = context.unreachable_refresh() {
                ui::debug_line(
                    context.config.verbose,
                    "auth",
                    "keeping stored session; refresh endpoint unreachable",
                );
                return Err(UnitrackError::RefreshFailed(message));
            }

            ui::debug_line(
                context.config.verbose,
                "auth",
                &format!("giving up after refresh: {}", err),
            );
            context.api.client().store().clear()?;
            Err(UnitrackError::SessionError(
                "Session expired. Sign in again with `unitrack login`.".to_string(),
            ))
        }
        other => other,
    }
}

async fn execute(context: &CommandContext, command: Command) -> Result<()> {
    let api = &context.api;
    context.debug(&format!("API base URL: {}", context.config.api_url));

    match command {
        Command::Login { email, password } => {
            api.login(&email, &password).await?;
            println!("{}", "Signed in.".green());
        }
        Command::Logout => {
            api.logout().await?;
            println!("{}", "Signed out.".green());
        }
        Command::Status => {
            if !api.client().store().has_session() {
                println!("{}", "Not signed in.".yellow());
                return Ok(());
            }
            let snapshot = api.snapshot().await?;
            println!("{}", "Signed in.".green());
            println!(
                "  {} subject(s), {} group(s), {} session(s)",
                snapshot.subjects.len(),
                snapshot.groups.len(),
                snapshot.sessions.len()
            );
        }
        Command::Subjects(cmd) => run_subjects(context, cmd).await?,
        Command::Groups(GroupsCommand::Add { subject, name }) => {
            let group = api
                .create_group(&NewGroup {
                    name: required("name", name)?,
                    subject_id: subject,
                })
                .await?;
            println!("{} {}", "Created group".green(), group.name.bold());
            println!("{}", format!("    {}", group.id).dimmed());
        }
        Command::Students(cmd) => run_students(context, cmd).await?,
        Command::Attendance(cmd) => run_attendance(context, cmd).await?,
        Command::Summary { group } => {
            let subjects = api.list_subjects().await?;
            let (subject, group) = lookup_group(&subjects, group)?;
            ui::display_summary(subject, group, &GroupSummary::from_group(group));
        }
        Command::Request { method, path, data } => {
            let method = Method::from_bytes(method.to_uppercase().as_bytes())
                .map_err(|_| UnitrackError::InvalidInput(format!("invalid HTTP method: {}", method)))?;
            let mut request = AuthenticatedRequest::new(method, api.client().endpoint(&path));
            if let Some(data) = data {
                let payload: serde_json::Value = serde_json::from_str(&data)?;
                request = request.json(&payload)?;
            }
            context.debug(&format!("{} {}", request.method, request.url));
            let response = api.client().dispatch(request).await?;
            ui::display_raw_response(&response);
        }
    }

    Ok(())
}

async fn run_subjects(context: &CommandContext, cmd: SubjectsCommand) -> Result<()> {
    let api = &context.api;
    match cmd {
        SubjectsCommand::List => {
            ui::display_subjects(&api.list_subjects().await?);
        }
        SubjectsCommand::Add { name, code } => {
            let subject = api
                .create_subject(&NewSubject {
                    name: required("name", name)?,
                    code: required("code", code)?,
                })
                .await?;
            println!("{} {}", "Created subject".green(), subject.name.bold());
            println!("{}", format!("    {}", subject.id).dimmed());
        }
        SubjectsCommand::Show { id } => {
            let subjects = api.list_subjects().await?;
            let subject = find_subject(&subjects, id)
                .ok_or_else(|| UnitrackError::InvalidInput(format!("subject {} not found", id)))?;
            ui::display_subject(subject);
        }
    }
    Ok(())
}

async fn run_students(context: &CommandContext, cmd: StudentsCommand) -> Result<()> {
    let api = &context.api;
    match cmd {
        StudentsCommand::List { group } => {
            let subjects = api.list_subjects().await?;
            let (_, group) = lookup_group(&subjects, group)?;
            ui::display_roster(group);
        }
        StudentsCommand::Add {
            group,
            name,
            enrollment,
        } => {
            let student = api
                .create_student(&NewStudent {
                    name: required("name", name)?,
                    enrollment: required("enrollment", enrollment)?,
                    group_id: group,
                })
                .await?;
            print!("{} ", "Added".green());
            ui::display_student(&student);
        }
    }
    Ok(())
}

async fn run_attendance(context: &CommandContext, cmd: AttendanceCommand) -> Result<()> {
    let api = &context.api;
    match cmd {
        AttendanceCommand::Take {
            group,
            absent,
            late,
            excused,
        } => {
            let subjects = api.list_subjects().await?;
            let (_, group) = lookup_group(&subjects, group)?;

            let mut sheet = AttendanceSheet::new(group);
            if sheet.is_empty() {
                return Err(UnitrackError::InvalidInput(
                    "this group has no students; add students first".to_string(),
                ));
            }
            let mut requested: HashMap<Uuid, AttendanceStatus> = HashMap::new();
            for (ids, status) in [
                (absent, AttendanceStatus::Ausente),
                (late, AttendanceStatus::Tarde),
                (excused, AttendanceStatus::Justificado),
            ] {
                for id in ids {
                    match requested.insert(id, status) {
                        Some(previous) if previous != status => {
                            return Err(UnitrackError::InvalidInput(format!(
                                "student {} is marked both {} and {}",
                                id, previous, status
                            )));
                        }
                        _ => sheet.mark(id, status)?,
                    }
                }
            }

            let session = api.create_session(&sheet.finish()).await?;
            println!(
                "{} {}",
                "Saved attendance for".green(),
                session.label().bold()
            );
        }
        AttendanceCommand::Show { group, session } => {
            let subjects = api.list_subjects().await?;
            let (subject, group) = lookup_group(&subjects, group)?;
            let session = group.session(session).ok_or_else(|| {
                UnitrackError::InvalidInput(format!("session {} not found", session))
            })?;
            ui::display_session(subject, group, session);
        }
        AttendanceCommand::Update {
            group,
            session,
            student,
            status,
        } => {
            let subjects = api.list_subjects().await?;
            let (_, group) = lookup_group(&subjects, group)?;
            if find_student(&subjects, group.id, student).is_none() {
                return Err(UnitrackError::InvalidInput(format!(
                    "student {} is not enrolled in group {}",
                    student, group.id
                )));
            }
            let mut updated = group
                .session(session)
                .cloned()
                .ok_or_else(|| UnitrackError::InvalidInput(format!("session {} not found", session)))?;
            let previous = updated.status_of(student);

            match updated
                .attendances
                .iter_mut()
                .find(|record| record.student_id == student)
            {
                Some(record) => record.status = status,
                None => updated.attendances.push(StudentAttendance {
                    student_id: student,
                    status,
                }),
            }

            api.update_session(group.id, &updated).await?;
            let previous = previous
                .map(|p| ui::colored_status(p).to_string())
                .unwrap_or_else(|| "unmarked".dimmed().to_string());
            println!(
                "{} {}: {} -> {}",
                "Updated".green(),
                updated.label(),
                previous,
                ui::colored_status(status)
            );
        }
    }
    Ok(())
}

fn lookup_group(subjects: &[Subject], group_id: Uuid) -> Result<(&Subject, &Group)> {
    find_group(subjects, group_id)
        .ok_or_else(|| UnitrackError::InvalidInput(format!("group {} not found", group_id)))
}

fn required(field: &str, value: String) -> Result<String> {
    let value = value.trim().to_string();
    if value.is_empty() {
        Err(UnitrackError::InvalidInput(format!("{} must not be empty", field)))
    } else {
        Ok(value)
    }
}
