use std::error::Error;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::warn;

use crate::audio::RodioElement;
use crate::auth::OAuthProvider;
use crate::player::MediaBinding;
use crate::separation::{OutputFormat, Quality, SeparationModel};

mod commands;
mod event_loop;
mod settings;
mod startup;
mod workspace;

pub use workspace::{LOCAL_OWNER, Workspace};

#[derive(Debug, Parser)]
#[command(name = "musicflow", version, about = "Generate, separate and play music from the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the terminal player (the default).
    Play,
    /// Import every audio file under a directory into the library.
    Import { dir: PathBuf },
    /// Generate music from a text prompt.
    Generate(GenerateArgs),
    /// Split an audio file into stems.
    Separate(SeparateArgs),
    /// Sign in with email and password, or print an OAuth sign-in URL.
    Login(LoginArgs),
    /// Create an account and sign in.
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "")]
        name: String,
    },
    /// Sign out and forget the session.
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// List generation and separation projects.
    Projects,
    /// Print the effective settings as TOML.
    Config,
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    #[arg(long)]
    pub prompt: String,
    #[arg(long)]
    pub genre: Option<String>,
    #[arg(long)]
    pub mood: Option<String>,
    /// Seconds: 15, 30, 60, 90 or 120.
    #[arg(long)]
    pub duration: Option<u32>,
    #[arg(long)]
    pub lyrics: Option<String>,
}

#[derive(Debug, Args)]
pub struct SeparateArgs {
    pub file: PathBuf,
    #[arg(long)]
    pub model: Option<SeparationModel>,
    #[arg(long)]
    pub format: Option<OutputFormat>,
    #[arg(long)]
    pub quality: Option<Quality>,
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    #[arg(long, required_unless_present = "oauth")]
    pub email: Option<String>,
    #[arg(long, required_unless_present = "oauth")]
    pub password: Option<String>,
    /// `google` or `github`.
    #[arg(long, conflicts_with_all = ["email", "password"])]
    pub oauth: Option<OAuthProvider>,
}

pub fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let (settings, config_warning) = settings::load_settings();
    let command = cli.command.unwrap_or(Command::Play);

    // The player owns the terminal, so it always logs to a file.
    let log_file = matches!(command, Command::Play).then(|| Workspace::log_path(&settings));
    if let Err(e) = crate::logging::init(&settings.logging, log_file.as_deref()) {
        eprintln!("musicflow: logging disabled: {e}");
    }
    if let Some(msg) = config_warning {
        warn!("{msg}");
    }

    let mut ws = Workspace::open(&settings)?;
    match command {
        Command::Play => run_player(&mut ws, &settings),
        Command::Import { dir } => commands::import(&mut ws, &settings, &dir),
        Command::Generate(args) => commands::generate(&mut ws, &settings, args),
        Command::Separate(args) => commands::separate(&mut ws, &settings, args),
        Command::Login(args) => commands::login(&mut ws, &settings, args),
        Command::Signup { email, password, name } => commands::signup(&mut ws, &settings, &email, &password, &name),
        Command::Logout => commands::logout(&mut ws, &settings),
        Command::Whoami => commands::whoami(&ws, &settings),
        Command::Projects => commands::projects(&ws),
        Command::Config => commands::print_config(&settings),
    }
}

fn run_player(ws: &mut Workspace, settings: &crate::config::Settings) -> Result<(), Box<dyn Error>> {
    let element = RodioElement::open()?;
    let mut binding = MediaBinding::new(element);
    let mut app = startup::build_app(std::mem::take(&mut ws.library), settings);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, settings, &mut app, &mut binding);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Favorites and play counts changed while playing.
    ws.library = app.library;
    ws.save()?;
    run_result
}
