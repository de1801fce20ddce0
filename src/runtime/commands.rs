use std::error::Error;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use crate::auth::AuthBackend;
use crate::config::Settings;
use crate::generation::{GenerationClient, GenerationRequest};
use crate::library::import_dir;
use crate::player::format_time;
use crate::separation::{SeparationOptions, SimulatedProcessor};
use crate::workflow::{run_generation, separate_to_completion, start_separation};

use super::{GenerateArgs, LoginArgs, SeparateArgs, Workspace};

pub fn import(ws: &mut Workspace, settings: &Settings, dir: &Path) -> Result<(), Box<dyn Error>> {
    let owner = ws.owner_id();
    let summary = import_dir(dir, &owner, &settings.library, &ws.objects, &mut ws.library)?;
    ws.save()?;

    println!("imported {} tracks from {}", summary.imported.len(), dir.display());
    for (path, reason) in &summary.failed {
        println!("  skipped {}: {reason}", path.display());
    }
    Ok(())
}

pub fn generate(ws: &mut Workspace, settings: &Settings, args: GenerateArgs) -> Result<(), Box<dyn Error>> {
    let mut request = GenerationRequest::new(args.prompt);
    if let Some(genre) = args.genre {
        request = request.with_genre(genre);
    }
    if let Some(mood) = args.mood {
        request = request.with_mood(mood);
    }
    if let Some(duration) = args.duration {
        request = request.with_duration(duration);
    }
    if let Some(lyrics) = args.lyrics {
        request = request.with_lyrics(lyrics);
    }

    let client = GenerationClient::new(settings.generation.clone())?;
    let owner = ws.owner_id();
    let outcome = run_generation(&client, &ws.objects, &owner, &request, &mut ws.projects, &mut ws.library)?;
    ws.save()?;

    println!("project {}", outcome.project_id);
    for music in &outcome.results {
        println!("  {} [{}] {}", music.title, format_time(f64::from(music.duration)), music.url);
    }
    println!("saved {} tracks to the library", outcome.track_ids.len());
    Ok(())
}

pub fn separate(ws: &mut Workspace, settings: &Settings, args: SeparateArgs) -> Result<(), Box<dyn Error>> {
    let sep = &settings.separation;
    let options = SeparationOptions {
        model: args.model.unwrap_or(sep.default_model),
        format: args.format.unwrap_or(sep.output_format),
        quality: args.quality.unwrap_or(sep.quality),
    };
    let mut processor = SimulatedProcessor::new(Duration::from_millis(sep.simulated_delay_ms));
    let owner = ws.owner_id();

    let job = start_separation(
        &ws.objects,
        &mut processor,
        &owner,
        &args.file,
        &options,
        sep,
        &mut ws.projects,
    )?;
    ws.save()?;
    println!("separating {} ({}), job {}", args.file.display(), options.model, job.job);

    let cancel = AtomicBool::new(false);
    let result = separate_to_completion(
        &mut processor,
        &job,
        Duration::from_millis(sep.poll_interval_ms),
        &cancel,
        &mut ws.projects,
    );
    // The project holds the outcome either way.
    ws.save()?;
    let update = result?;

    for (stem, url) in update.outputs() {
        println!("  {stem}: {url}");
    }
    for (stem, reason) in update.failures() {
        println!("  {stem} failed: {reason}");
    }
    Ok(())
}

pub fn login(ws: &mut Workspace, settings: &Settings, args: LoginArgs) -> Result<(), Box<dyn Error>> {
    let mut accounts = ws.accounts(settings)?;
    if let Some(provider) = args.oauth {
        let redirect = accounts.sign_in_with_oauth(provider)?;
        println!("continue signing in with {provider}: {}", redirect.url);
        return Ok(());
    }

    let email = args.email.unwrap_or_default();
    let password = args.password.unwrap_or_default();
    ws.auth.set_loading(true);
    let result = accounts.sign_in(&email, &password);
    ws.auth.set_loading(false);
    let user = result?;
    println!("signed in as {} <{}>", user.name, user.email);
    ws.auth.set_user(Some(user));
    Ok(())
}

pub fn signup(
    ws: &mut Workspace,
    settings: &Settings,
    email: &str,
    password: &str,
    name: &str,
) -> Result<(), Box<dyn Error>> {
    let mut accounts = ws.accounts(settings)?;
    let user = accounts.sign_up(email, password, name)?;
    println!("account created for {} <{}>", user.name, user.email);
    ws.auth.set_user(Some(user));
    Ok(())
}

pub fn logout(ws: &mut Workspace, settings: &Settings) -> Result<(), Box<dyn Error>> {
    let mut accounts = ws.accounts(settings)?;
    accounts.sign_out()?;
    ws.auth.logout();
    println!("signed out");
    Ok(())
}

pub fn whoami(ws: &Workspace, settings: &Settings) -> Result<(), Box<dyn Error>> {
    let Some(cached) = ws.auth.user() else {
        println!("not signed in");
        return Ok(());
    };
    // Prefer the backend's copy; the session may be stale.
    let user = ws
        .accounts(settings)?
        .fetch_profile(&cached.id)
        .unwrap_or_else(|_| cached.clone());
    println!("{} <{}>", user.name, user.email);
    println!("plan: {}", user.subscription_plan.as_str());
    println!("storage: {} of {} bytes used", user.storage_used, user.storage_limit);
    Ok(())
}

pub fn projects(ws: &Workspace) -> Result<(), Box<dyn Error>> {
    if ws.projects.projects().is_empty() {
        println!("no projects");
        return Ok(());
    }
    for project in ws.projects.projects() {
        println!(
            "{}  {:<10} {:<10} {}  ({})",
            project.created_at.format("%Y-%m-%d %H:%M"),
            project.kind.as_str(),
            project.status.as_str(),
            project.name,
            project.id
        );
        for (name, url) in &project.output_files {
            println!("    {name}: {url}");
        }
        if let Some(error) = &project.error {
            println!("    error: {error}");
        }
    }
    Ok(())
}

pub fn print_config(settings: &Settings) -> Result<(), Box<dyn Error>> {
    print!("{}", toml::to_string_pretty(settings)?);
    Ok(())
}
