use super::client::AuthenticatedClient;
use super::request::AuthenticatedRequest;
use super::response::{ensure_success, parse_json};
use crate::error::{Result, UnitrackError};
use crate::models::{
    ClassSession, Group, LoginRequest, LoginResponse, NewGroup, NewSession, NewStudent,
    NewSubject, Student, Subject,
};
use uuid::Uuid;

pub const LOGIN_PATH: &str = "/api/auth/login/";
pub const LOGOUT_PATH: &str = "/api/auth/logout/";
pub const SUBJECTS_PATH: &str = "/api/materias/";
pub const GROUPS_PATH: &str = "/api/grupos/";
pub const STUDENTS_PATH: &str = "/api/estudiantes/";
pub const SESSIONS_PATH: &str = "/api/sesiones/";

/// Everything the dashboard loads after sign-in
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub subjects: Vec<Subject>,
    pub groups: Vec<Group>,
    pub sessions: Vec<ClassSession>,
}

/// Typed access to the UniTrack REST resources
///
/// Every call except `login` goes through the authenticated client, so an
/// expired access token is refreshed transparently.
#[derive(Clone)]
pub struct UnitrackApi {
    client: AuthenticatedClient,
}

impl UnitrackApi {
    pub fn new(client: AuthenticatedClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &AuthenticatedClient {
        &self.client
    }

    /// Exchange credentials for a token pair and persist it
    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(UnitrackError::InvalidInput(
                "email and password are required".to_string(),
            ));
        }

        let request = AuthenticatedRequest::post(self.client.endpoint(LOGIN_PATH)).json(
            &LoginRequest {
                email: email.trim().to_string(),
                password: password.to_string(),
            },
        )?;

        // Sent straight through the transport: no bearer, no refresh path
        let response = self.client.transport().send(&request).await?;
        let tokens: LoginResponse = parse_json(response)?;

        let access = tokens.access_token().ok_or_else(|| {
            UnitrackError::Other("login response did not contain an access token".to_string())
        })?;

        self.client
            .store()
            .save_tokens(access, tokens.refresh.as_deref())
    }

    /// Tell the server we are leaving, then forget the local session.
    /// The local session is cleared even if the server call fails.
    pub async fn logout(&self) -> Result<()> {
        if self.client.store().has_session() {
            let request = AuthenticatedRequest::post(self.client.endpoint(LOGOUT_PATH));
            let _ = self.client.dispatch(request).await;
        }
        self.client.store().clear()
    }

    pub async fn list_subjects(&self) -> Result<Vec<Subject>> {
        self.get_json(SUBJECTS_PATH).await
    }

    pub async fn create_subject(&self, subject: &NewSubject) -> Result<Subject> {
        let request =
            AuthenticatedRequest::post(self.client.endpoint(SUBJECTS_PATH)).json(subject)?;
        parse_json(self.client.dispatch(request).await?)
    }

    pub async fn list_groups(&self) -> Result<Vec<Group>> {
        self.get_json(GROUPS_PATH).await
    }

    pub async fn create_group(&self, group: &NewGroup) -> Result<Group> {
        let request = AuthenticatedRequest::post(self.client.endpoint(GROUPS_PATH)).json(group)?;
        parse_json(self.client.dispatch(request).await?)
    }

    pub async fn list_students(&self) -> Result<Vec<Student>> {
        self.get_json(STUDENTS_PATH).await
    }

    pub async fn create_student(&self, student: &NewStudent) -> Result<Student> {
        let request =
            AuthenticatedRequest::post(self.client.endpoint(STUDENTS_PATH)).json(student)?;
        parse_json(self.client.dispatch(request).await?)
    }

    pub async fn list_sessions(&self) -> Result<Vec<ClassSession>> {
        self.get_json(SESSIONS_PATH).await
    }

    pub async fn create_session(&self, session: &NewSession) -> Result<ClassSession> {
        let request =
            AuthenticatedRequest::post(self.client.endpoint(SESSIONS_PATH)).json(session)?;
        parse_json(self.client.dispatch(request).await?)
    }

    /// Replace a session's record, attaching it to `group_id`
    pub async fn update_session(&self, group_id: Uuid, session: &ClassSession) -> Result<()> {
        let mut payload = session.clone();
        payload.group_id = Some(group_id);

        let path = format!("{}{}/", SESSIONS_PATH, session.id);
        let request = AuthenticatedRequest::put(self.client.endpoint(&path)).json(&payload)?;
        ensure_success(self.client.dispatch(request).await?)?;
        Ok(())
    }

    /// Load subjects, groups and sessions concurrently
    pub async fn snapshot(&self) -> Result<Snapshot> {
        let (subjects, groups, sessions) = futures::try_join!(
            self.list_subjects(),
            self.list_groups(),
            self.list_sessions()
        )?;
        Ok(Snapshot {
            subjects,
            groups,
            sessions,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = AuthenticatedRequest::get(self.client.endpoint(path));
        parse_json(self.client.dispatch(request).await?)
    }
}
