use crate::models::AttendanceStatus;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "unitrack")]
#[command(about = "Class attendance tracking against the UniTrack API", long_about = None)]
pub struct Args {
    #[arg(long = "api-url", global = true, help = "API base URL (e.g., http://localhost:8000)")]
    pub api_url: Option<String>,

    #[arg(long = "timeout", global = true, help = "Request timeout in seconds")]
    pub timeout: Option<u64>,

    #[arg(
        long = "session-dir",
        global = true,
        help = "Directory holding the stored session tokens"
    )]
    pub session_dir: Option<PathBuf>,

    #[arg(short = 'v', long = "verbose", global = true, help = "Print diagnostic output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and store the session tokens
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show whether a session is stored and what it can see
    Status,
    /// Manage subjects
    #[command(subcommand)]
    Subjects(SubjectsCommand),
    /// Manage groups
    #[command(subcommand)]
    Groups(GroupsCommand),
    /// Manage group rosters
    #[command(subcommand)]
    Students(StudentsCommand),
    /// Record and inspect class sessions
    #[command(subcommand)]
    Attendance(AttendanceCommand),
    /// Attendance summary for a group
    Summary {
        #[arg(long)]
        group: Uuid,
    },
    /// Send an authenticated request and print the raw response
    Request {
        #[arg(help = "HTTP method, e.g. GET")]
        method: String,
        #[arg(help = "API path, e.g. /api/materias/")]
        path: String,
        #[arg(long, help = "JSON request body")]
        data: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum SubjectsCommand {
    List,
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        code: String,
    },
    Show {
        id: Uuid,
    },
}

#[derive(Subcommand, Debug)]
pub enum GroupsCommand {
    Add {
        #[arg(long)]
        subject: Uuid,
        #[arg(long)]
        name: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum StudentsCommand {
    List {
        #[arg(long)]
        group: Uuid,
    },
    Add {
        #[arg(long)]
        group: Uuid,
        #[arg(long)]
        name: String,
        #[arg(long, help = "Institutional enrollment number")]
        enrollment: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum AttendanceCommand {
    /// Record a new session; everyone not listed is present
    Take {
        #[arg(long)]
        group: Uuid,
        #[arg(long = "absent")]
        absent: Vec<Uuid>,
        #[arg(long = "late")]
        late: Vec<Uuid>,
        #[arg(long = "excused")]
        excused: Vec<Uuid>,
    },
    Show {
        #[arg(long)]
        group: Uuid,
        #[arg(long)]
        session: Uuid,
    },
    /// Change one student's status in an existing session
    Update {
        #[arg(long)]
        group: Uuid,
        #[arg(long)]
        session: Uuid,
        #[arg(long)]
        student: Uuid,
        #[arg(long, help = "Presente, Ausente, Justificado or Tarde")]
        status: AttendanceStatus,
    },
}
