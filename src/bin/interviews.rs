//! Command-line client for the candidate interview API.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use interview_portal::client::{
    Envelope, FileTokenStore, InterviewClient, NoToken, StaticToken, TokenProvider,
};
use interview_portal::dto::interview_dto::{InterviewListResponse, InterviewResponse};
use interview_portal::models::display::StatusDisplay;
use interview_portal::models::interview::InterviewFeedback;
use interview_portal::models::record::InterviewRecord;
use interview_portal::samples::sample_interviews;
use interview_portal::services::session_timer::{format_elapsed, SessionTimer};
use interview_portal::utils::{time, token::issue_candidate_token};
use serde::Serialize;
use tracing::Level;

const DEFAULT_SESSION_MINUTES: u32 = 60;

#[derive(Parser)]
#[command(name = "interviews")]
#[command(about = "Candidate interview API client")]
#[command(version)]
struct Cli {
    /// API root, e.g. http://localhost:8080
    #[arg(long, env = "API_BASE_URL", default_value = "http://localhost:8080")]
    api_base_url: String,

    /// Bearer token (takes precedence over the token file)
    #[arg(long, env = "API_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// File holding the bearer token
    #[arg(long, env = "API_TOKEN_FILE")]
    token_file: Option<PathBuf>,

    /// Substitute sample data when a read request fails
    #[arg(long)]
    fallback: bool,

    /// Print raw response envelopes
    #[arg(long)]
    json: bool,

    /// Log level
    #[arg(short, long, default_value = "warn")]
    log_level: Level,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List interviews
    List,
    /// Show one interview
    Show { id: String },
    /// Join an interview
    Join { id: String },
    /// Mark an interview as completed with feedback
    Complete {
        id: String,
        #[command(flatten)]
        feedback: FeedbackArgs,
    },
    /// Move an interview to a new RFC 3339 date-time
    Reschedule {
        id: String,
        #[arg(value_parser = parse_datetime)]
        new_datetime: DateTime<Utc>,
    },
    /// Cancel an interview
    Cancel {
        id: String,
        #[arg(long)]
        reason: String,
    },
    /// Show submitted feedback
    Feedback { id: String },
    /// Submit feedback for a completed interview
    SubmitFeedback {
        id: String,
        #[command(flatten)]
        feedback: FeedbackArgs,
    },
    /// Show preparation materials
    Prepare { id: String },
    /// Show interview statistics
    Stats,
    /// Show open slots for rescheduling
    Availability { id: String },
    /// Join an interview and keep a session clock running until it ends
    Session { id: String },
    /// Mint a development bearer token
    Token {
        #[arg(long)]
        candidate: String,
        #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
        secret: String,
        #[arg(long, default_value_t = 24)]
        ttl_hours: i64,
        /// Write the token to --token-file instead of printing it
        #[arg(long)]
        save: bool,
    },
}

#[derive(Args)]
struct FeedbackArgs {
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    overall: u8,
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    technical: u8,
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    communication: u8,
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    problem_solving: u8,
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    cultural_fit: u8,
    #[arg(long)]
    comments: Option<String>,
}

impl From<&FeedbackArgs> for InterviewFeedback {
    fn from(args: &FeedbackArgs) -> Self {
        Self {
            overall_rating: args.overall,
            technical_skills: args.technical,
            communication: args.communication,
            problem_solving: args.problem_solving,
            cultural_fit: args.cultural_fit,
            comments: args.comments.clone(),
        }
    }
}

fn parse_datetime(raw: &str) -> Result<DateTime<Utc>, String> {
    time::from_rfc3339(raw).map_err(|e| e.to_string())
}

fn print_envelope<T: Serialize>(envelope: &Envelope<T>) -> anyhow::Result<bool> {
    println!("{}", serde_json::to_string_pretty(envelope)?);
    Ok(envelope.is_success())
}

fn print_interview_row(interview: &InterviewRecord, now: DateTime<Utc>) {
    let status = interview.status();
    let pending = status.is_some_and(|s| s.is_pending());
    let mut flags = Vec::new();
    if pending && interview.is_upcoming(now) {
        flags.push("upcoming");
    }
    if pending && interview.can_join(now) {
        flags.push("joinable");
    }
    println!(
        "{:<12} {:<28} {:<18} {:<20} {:<12} {:<12} {}",
        interview.id().unwrap_or_else(|| "?".to_string()),
        interview.str_field("jobTitle").unwrap_or("-"),
        interview.str_field("company").unwrap_or("-"),
        interview
            .scheduled_date()
            .map(|d| d.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_else(|| "-".to_string()),
        status
            .map(|s| s.display().label)
            .or_else(|| interview.str_field("status"))
            .unwrap_or("-"),
        interview
            .mode()
            .map(|m| m.display().label)
            .or_else(|| interview.str_field("mode"))
            .unwrap_or("-"),
        flags.join(",")
    );
}

fn token_provider(cli: &Cli) -> Box<dyn TokenProvider> {
    if let Some(token) = &cli.token {
        Box::new(StaticToken(token.clone()))
    } else if let Some(path) = &cli.token_file {
        Box::new(FileTokenStore::new(path))
    } else {
        Box::new(NoToken)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .init();

    if let Command::Token {
        candidate,
        secret,
        ttl_hours,
        save,
    } = &cli.command
    {
        let token = issue_candidate_token(candidate, secret, chrono::Duration::hours(*ttl_hours))?;
        match (&cli.token_file, *save) {
            (Some(path), true) => {
                FileTokenStore::new(path).save(&token)?;
                eprintln!("Token written to {}", path.display());
            }
            (None, true) => anyhow::bail!("--save requires --token-file or API_TOKEN_FILE"),
            _ => println!("{}", token),
        }
        return Ok(());
    }

    let client = InterviewClient::new(&cli.api_base_url, token_provider(&cli))?;
    let now = time::now();

    let ok = match &cli.command {
        Command::List => {
            let envelope = client.list_interviews().await;
            let envelope = if cli.fallback && !envelope.is_success() {
                Envelope::Success(envelope.unwrap_or_else(|_| InterviewListResponse {
                    interviews: sample_interviews(now)
                        .iter()
                        .map(InterviewRecord::from)
                        .collect(),
                }))
            } else {
                envelope
            };
            if cli.json {
                print_envelope(&envelope)?
            } else {
                match &envelope {
                    Envelope::Success(list) => {
                        for interview in &list.interviews {
                            print_interview_row(interview, now);
                        }
                        true
                    }
                    Envelope::Failure(message) => {
                        eprintln!("error: {}", message);
                        false
                    }
                }
            }
        }
        Command::Show { id } => {
            let mut envelope = client.interview_details(id).await;
            if cli.fallback && !envelope.is_success() {
                if let Some(interview) = sample_interviews(now).into_iter().find(|i| &i.id == id) {
                    tracing::warn!("showing sample interview {}", id);
                    envelope = Envelope::Success(InterviewResponse {
                        interview: InterviewRecord::from(&interview),
                    });
                }
            }
            print_envelope(&envelope)?
        }
        Command::Join { id } => print_envelope(&client.join_interview(id).await)?,
        Command::Complete { id, feedback } => {
            let feedback = InterviewFeedback::from(feedback);
            print_envelope(&client.complete_interview(id, &feedback).await)?
        }
        Command::Reschedule { id, new_datetime } => {
            print_envelope(&client.reschedule_interview(id, *new_datetime).await)?
        }
        Command::Cancel { id, reason } => {
            print_envelope(&client.cancel_interview(id, reason).await)?
        }
        Command::Feedback { id } => print_envelope(&client.interview_feedback(id).await)?,
        Command::SubmitFeedback { id, feedback } => {
            let feedback = InterviewFeedback::from(feedback);
            print_envelope(&client.submit_feedback(id, &feedback).await)?
        }
        Command::Prepare { id } => print_envelope(&client.preparation_materials(id).await)?,
        Command::Stats => print_envelope(&client.interview_stats().await)?,
        Command::Availability { id } => print_envelope(&client.availability(id).await)?,
        Command::Session { id } => run_session(&client, id).await?,
        Command::Token { .. } => unreachable!("handled above"),
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

async fn run_session(client: &InterviewClient, id: &str) -> anyhow::Result<bool> {
    let interview = match client.join_interview(id).await {
        Envelope::Success(response) => response.interview,
        Envelope::Failure(message) => {
            eprintln!("error: {}", message);
            return Ok(false);
        }
    };

    if let Some(link) = interview.meeting_link() {
        println!("Meeting link: {}", link);
    }
    let duration = interview
        .duration_minutes()
        .unwrap_or(DEFAULT_SESSION_MINUTES);
    let limit = u64::from(duration) * 60;
    println!(
        "Session started for {} at {} ({} min). Press Ctrl-C to leave.",
        interview.str_field("jobTitle").unwrap_or("interview"),
        interview.str_field("company").unwrap_or("-"),
        duration
    );

    let mut timer = SessionTimer::start();
    let mut report = tokio::time::interval(std::time::Duration::from_secs(60));
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = report.tick() => {
                let elapsed = timer.elapsed_secs();
                println!("elapsed {}", format_elapsed(elapsed));
                if elapsed >= limit {
                    break;
                }
            }
        }
    }

    let elapsed = timer.stop();
    println!("Session ended after {}", format_elapsed(elapsed));
    Ok(true)
}
