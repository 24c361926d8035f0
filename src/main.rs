use sortie::app::{App, AppOptions};
use sortie::cli::{AppConfig, Args};
use sortie::config::UserConfig;
use sortie::domain::discover_clips_with_options;
use sortie::effects::FsExecutor;
use sortie::logging;
use sortie::session::Session;
use sortie::tui;

use crossterm::{
    event::{self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute,
    terminal::{self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Instant;
use tracing::{error, info};

fn main() -> io::Result<()> {
    // Parse command line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Convert to config
    let config: AppConfig = args.into();

    if let Err(e) = logging::init(config.log_file.as_deref()) {
        eprintln!("Warning: Logging disabled: {}", e);
    }

    // Run the app
    run_app_with_config(&config)
}

/// Runs the TUI application with configuration
pub fn run_app_with_config(config: &AppConfig) -> io::Result<()> {
    // Load user configuration
    let user_config = UserConfig::load().unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load user config: {}", e);
        UserConfig::default()
    });

    // Discover clips with options
    let clips = match discover_clips_with_options(&config.directory, &config.discovery_options())
    {
        Ok(clips) => clips,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if clips.is_empty() {
        println!("Nothing to review in {}", config.directory.display());
        return Ok(());
    }

    info!(
        "Reviewing {} clips in {} (dry run: {})",
        clips.len(),
        config.directory.display(),
        config.dry_run
    );

    let mut session = Session::new(FsExecutor::new(config.dry_run), user_config.swipe.clone());
    session.load(&config.directory, clips);

    let options = AppOptions {
        force_welcome: config.force_welcome,
        config_path: UserConfig::config_path(),
        terminal_size: terminal::size()?,
    };
    let mut app = App::new(session, user_config, options)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_loop(&mut terminal, &mut app);
    app.shutdown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableFocusChange,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    // Print summary after exit
    let summary = app.summary();
    let stats = summary.stats;
    let prefix = if summary.dry_run { "[DRY RUN] " } else { "" };
    println!(
        "\n{}Reviewed {} of {} clips",
        prefix,
        stats.moved + stats.deleted + stats.skipped,
        stats.total
    );
    println!("   Moved:   {}", stats.moved);
    println!("   Deleted: {}", stats.deleted);
    println!("   Skipped: {}", stats.skipped);

    if config.system_trash {
        match app.session().commit_deleted() {
            Ok(0) => {}
            Ok(sent) => println!("   Sent {} clips to the system trash", sent),
            Err(e) => {
                error!("{}", e);
                eprintln!("Warning: {}", e);
            }
        }
    }

    result
}

/// Main application loop
fn run_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|frame| tui::render(frame, &app.screen()))?;

        // Handle input, waking up early for card timers and toasts
        if event::poll(app.next_wakeup(Instant::now()))? {
            let event = event::read()?;
            app.handle_event(event, Instant::now());
        }

        app.tick(Instant::now());

        if app.should_quit() {
            break;
        }
    }

    Ok(())
}
