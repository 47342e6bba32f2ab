use std::sync::Arc;

use anyhow::Context as _;
use tracing::{debug, info};

use avida_client::account::{ExamField, ExamForm, SignupField, SignupForm, VolunteerField, VolunteerForm};
use avida_client::{
    AccountFlow, ChatPeer, ChatSession, ClientConfig, HttpApi, MatchingFlow, Notifier, RequestBoard, SessionFile,
};
use avida_types::models::{ConnectionRequest, Message, UserType};

use crate::cli::{ChatArgs, Commands, ExamArgs, SignupArgs, VolunteerArgs};

pub struct App {
    pub config: ClientConfig,
    pub api: Arc<HttpApi>,
    pub sessions: SessionFile,
    pub notifier: Notifier,
}

impl App {
    pub fn new(config: ClientConfig) -> anyhow::Result<Self> {
        let api = HttpApi::new(config.api_url.clone()).context("building HTTP client")?;
        Ok(Self {
            sessions: SessionFile::new(config.session_path.clone()),
            api: Arc::new(api),
            notifier: Notifier::new(),
            config,
        })
    }

    fn account(&self) -> AccountFlow<HttpApi> {
        AccountFlow::new(self.api.clone(), self.notifier.clone())
    }
}

pub async fn run(app: &App, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Signup(args) => signup(app, args).await,
        Commands::Login(args) => {
            let session = app.account().login(&args.email, &args.password).await?;
            app.sessions.save(&session)?;
            println!("Logged in as {} ({})", session.user_id, session.user_type);
            Ok(())
        }
        Commands::Logout => {
            let session = app.sessions.require()?;
            app.account().logout(&session).await?;
            app.sessions.clear()?;
            println!("Logged out");
            Ok(())
        }
        Commands::RegisterExam(args) => register_exam(app, args).await,
        Commands::RegisterVolunteer(args) => register_volunteer(app, args).await,
        Commands::Profile => {
            let session = app.sessions.require()?;
            let p = app.account().volunteer_profile(&session).await?;
            println!("{} {}", p.first_name, p.last_name);
            println!("  email:         {}", p.email_id);
            println!("  location:      {}, {}", p.city, p.state);
            println!("  languages:     {}", p.languages_known);
            println!("  qualification: {}", p.qualification);
            println!("  session:       {}", p.available_session);
            let dates: Vec<String> = p
                .available_dates
                .iter()
                .map(|d| d.format("%Y-%m-%d").to_string())
                .collect();
            println!("  dates:         {}", dates.join(", "));
            Ok(())
        }
        Commands::Exam => {
            let session = app.sessions.require()?;
            let mut flow = MatchingFlow::new(app.api.clone(), session, app.notifier.clone());
            let exam = flow.load_exam().await?;
            println!("{} [{}]", exam.exam_name, exam.id);
            println!(
                "  {} at {}, {} session",
                exam.exam_date.format("%Y-%m-%d"),
                exam.exam_venue,
                exam.exam_session
            );
            println!(
                "  needs: {} / {} / {}",
                exam.qualification_needed_for_volunteer, exam.language_should_be_known_for_volunteer, exam.gender
            );
            Ok(())
        }
        Commands::Match => {
            let session = app.sessions.require()?;
            let mut flow = MatchingFlow::new(app.api.clone(), session, app.notifier.clone());
            flow.load_exam().await?;
            let candidates = flow.find_candidates().await?;
            if candidates.is_empty() {
                println!("No matching volunteers yet");
            }
            for c in candidates {
                println!("{}  {} {}", c.volunteer_id, c.first_name, c.last_name.as_deref().unwrap_or(""));
            }
            Ok(())
        }
        Commands::SendRequest { volunteer_id } => {
            let session = app.sessions.require()?;
            let mut flow = MatchingFlow::new(app.api.clone(), session, app.notifier.clone());
            let ack = flow.send_request(&volunteer_id).await?;
            println!("{}", ack.message.as_deref().unwrap_or("Request Sent Successfully"));
            Ok(())
        }
        Commands::Pending => {
            let session = app.sessions.require()?;
            let mut board = RequestBoard::new(app.api.clone(), session, app.notifier.clone());
            let pending = board.load_pending().await?;
            if pending.is_empty() {
                println!("No pending requests");
            }
            for r in pending {
                print_request(r, UserType::Volunteer);
            }
            Ok(())
        }
        Commands::Accepted => {
            let session = app.sessions.require()?;
            let mut board = RequestBoard::new(app.api.clone(), session, app.notifier.clone());
            let accepted = board.load_accepted().await?;
            if accepted.is_empty() {
                println!("No accepted requests");
            }
            for r in accepted {
                print_request(r, UserType::Disabled);
            }
            Ok(())
        }
        Commands::Respond { request_id, decision } => {
            let session = app.sessions.require()?;
            let mut board = RequestBoard::new(app.api.clone(), session, app.notifier.clone());
            board.load_pending().await?;
            let r = board.respond(&request_id, decision.into()).await?;
            println!("{} is now {}", r.id, r.status);
            Ok(())
        }
        Commands::Chat(args) => chat(app, args).await,
    }
}

async fn signup(app: &App, args: SignupArgs) -> anyhow::Result<()> {
    let mut form = SignupForm::default();
    form.set(SignupField::FirstName, args.first_name);
    form.set(SignupField::LastName, args.last_name);
    form.set(SignupField::EmailId, args.email);
    form.set(SignupField::Password, args.password);
    form.set(SignupField::ConfirmPassword, args.confirm_password);
    form.set_user_type(args.user_type);

    app.account().signup(&form).await?;
    println!("Account created, log in with `avida login`");
    Ok(())
}

async fn register_exam(app: &App, args: ExamArgs) -> anyhow::Result<()> {
    let session = app.sessions.require()?;
    let mut form = ExamForm::default();
    form.set(ExamField::ExamName, args.name);
    form.set(ExamField::ExamVenue, args.venue);
    form.set(ExamField::ExamSession, args.session);
    form.set(ExamField::ExamDate, args.date);
    form.set(ExamField::Qualification, args.qualification);
    form.set(ExamField::Language, args.language);
    form.set(ExamField::Gender, args.gender);

    app.account().register_exam(&session, &form).await?;
    println!("Exam registered");
    Ok(())
}

async fn register_volunteer(app: &App, args: VolunteerArgs) -> anyhow::Result<()> {
    let session = app.sessions.require()?;
    let mut form = VolunteerForm::default();
    form.set(VolunteerField::State, args.state);
    form.set(VolunteerField::City, args.city);
    form.set(VolunteerField::LanguagesKnown, args.languages);
    form.set(VolunteerField::Qualification, args.qualification);
    form.set(VolunteerField::AvailableSession, args.session);
    form.set(VolunteerField::PastExperience, args.past_experience);
    for date in args.dates {
        form.toggle_available_date(date);
    }
    if let Some(km) = args.travel_distance {
        form.set(VolunteerField::TravelDistanceKm, km);
    }
    if let Some(aadhar) = args.aadhar {
        form.set(VolunteerField::AadharNumber, aadhar);
    }
    if let Some(pan) = args.pan {
        form.set(VolunteerField::PanCardNumber, pan);
    }
    if let (Some(lat), Some(lon)) = (args.latitude, args.longitude) {
        form.set_location(lat, lon);
    }

    app.account().register_volunteer(&session, &form).await?;
    println!("Volunteer registered");
    Ok(())
}

async fn chat(app: &App, args: ChatArgs) -> anyhow::Result<()> {
    let session = app.sessions.require()?;
    let chat = ChatSession::new(app.api.clone(), session.clone(), app.notifier.clone());

    match args.with {
        Some(receiver_id) => {
            chat.open_peer(ChatPeer {
                connection_id: args.request_id.clone(),
                receiver_id,
                receiver_name: None,
            })
            .await?
        }
        None => {
            let mut board = RequestBoard::new(app.api.clone(), session.clone(), app.notifier.clone());
            let request = board.lookup(&args.request_id).await.with_context(|| {
                if session.is_volunteer() {
                    format!(
                        "accepted requests are not listed for volunteers, use `avida chat {} --with <user-id>`",
                        args.request_id
                    )
                } else {
                    format!("looking up request {}", args.request_id)
                }
            })?;
            chat.open(&request).await?;
        }
    }
    let peer = chat.peer().await.context("chat opened without a peer")?;
    let peer_name = peer.receiver_name.clone().unwrap_or_else(|| peer.receiver_id.clone());
    println!("Chat with {} ({})", peer_name, peer.connection_id);

    let mut shown = print_messages(&chat, &peer_name, &chat.messages().await);

    if let Some(content) = args.send {
        chat.send(&content).await?;
        let messages = chat.messages().await;
        shown += print_messages(&chat, &peer_name, &messages[shown..]);
    }

    if args.follow {
        info!("Polling every {:?}, Ctrl-C to stop", app.config.chat_poll_interval);
        let mut ticker = tokio::time::interval(app.config.chat_poll_interval);
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = tokio::signal::ctrl_c() => break,
            }
            // A failed poll is already reported; keep following
            if chat.refresh().await.is_err() {
                continue;
            }
            let messages = chat.messages().await;
            if messages.len() < shown {
                debug!("history shrank from {} to {}", shown, messages.len());
                shown = 0;
            }
            shown += print_messages(&chat, &peer_name, &messages[shown..]);
        }
    }

    chat.close().await;
    Ok(())
}

fn print_messages(chat: &ChatSession<HttpApi>, peer_name: &str, messages: &[Message]) -> usize {
    for m in messages {
        let who = if chat.is_own(m) { "you" } else { peer_name };
        match m.created_at {
            Some(at) => println!("[{}] {}: {}", at.format("%H:%M"), who, m.content),
            None => println!("{}: {}", who, m.content),
        }
    }
    messages.len()
}

/// One line per request, naming the other party from `viewer`'s side.
fn print_request(r: &ConnectionRequest, viewer: UserType) {
    let other = r.counterpart(viewer);
    let name = other.display_name().unwrap_or_else(|| other.id().to_string());
    println!("{}  {}  {}", r.id, r.status, name);
}
