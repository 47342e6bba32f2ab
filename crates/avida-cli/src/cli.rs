use clap::{Args, Parser, Subcommand, ValueEnum};

use avida_types::models::{RequestStatus, UserType};

/// Top-level CLI parser for the `avida` binary.
#[derive(Debug, Parser)]
#[command(name = "avida", version, about = "Avida - volunteer matching client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend base URL (overrides AVIDA_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Create an account.
    Signup(SignupArgs),
    /// Log in and store the session.
    Login(LoginArgs),
    /// Log out and forget the stored session.
    Logout,
    /// Register the exam a scribe is needed for.
    RegisterExam(ExamArgs),
    /// Register as a volunteer.
    RegisterVolunteer(VolunteerArgs),
    /// Show the volunteer profile.
    Profile,
    /// Show the registered exam.
    Exam,
    /// List volunteers matching the registered exam.
    Match,
    /// Send a connection request to a volunteer.
    SendRequest {
        volunteer_id: String,
    },
    /// Requests waiting for an answer (volunteers).
    Pending,
    /// Accepted connections (disabled users).
    Accepted,
    /// Accept or reject a pending request.
    Respond {
        request_id: String,
        decision: Decision,
    },
    /// Chat over an accepted connection.
    Chat(ChatArgs),
}

#[derive(Clone, Debug, Args)]
pub struct SignupArgs {
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
    #[arg(long)]
    pub confirm_password: String,
    /// volunteer or disabled
    #[arg(long)]
    pub user_type: UserType,
}

#[derive(Clone, Debug, Args)]
pub struct LoginArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
}

#[derive(Clone, Debug, Args)]
pub struct ExamArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub venue: String,
    /// Morning, Afternoon or Evening
    #[arg(long)]
    pub session: String,
    /// YYYY-MM-DD
    #[arg(long)]
    pub date: String,
    #[arg(long, default_value = "")]
    pub qualification: String,
    #[arg(long, default_value = "")]
    pub language: String,
    #[arg(long, default_value = "Female")]
    pub gender: String,
}

#[derive(Clone, Debug, Args)]
pub struct VolunteerArgs {
    #[arg(long)]
    pub state: String,
    #[arg(long)]
    pub city: String,
    #[arg(long)]
    pub languages: String,
    #[arg(long, default_value = "")]
    pub qualification: String,
    /// Available date, YYYY-MM-DD. Repeat for several.
    #[arg(long = "date", required = true)]
    pub dates: Vec<String>,
    #[arg(long, default_value = "")]
    pub session: String,
    #[arg(long, default_value = "no")]
    pub past_experience: String,
    #[arg(long)]
    pub travel_distance: Option<String>,
    #[arg(long)]
    pub aadhar: Option<String>,
    #[arg(long)]
    pub pan: Option<String>,
    #[arg(long, requires = "longitude", allow_negative_numbers = true)]
    pub latitude: Option<f64>,
    #[arg(long, requires = "latitude", allow_negative_numbers = true)]
    pub longitude: Option<f64>,
}

#[derive(Clone, Debug, Args)]
pub struct ChatArgs {
    /// Id of an accepted connection request
    pub request_id: String,
    /// User id of the other party. Skips the request lookup, for volunteers
    /// returning to a connection they accepted earlier.
    #[arg(long)]
    pub with: Option<String>,
    /// Send this message after loading the history
    #[arg(long)]
    pub send: Option<String>,
    /// Keep polling for new messages until interrupted
    #[arg(long)]
    pub follow: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum Decision {
    Accept,
    Reject,
}

impl From<Decision> for RequestStatus {
    fn from(d: Decision) -> Self {
        match d {
            Decision::Accept => RequestStatus::Accepted,
            Decision::Reject => RequestStatus::Rejected,
        }
    }
}
