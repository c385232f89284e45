//! Console front-end for the AI Channel client.
//!
//! Reads one command per line from stdin. Plain text on the channel page is
//! sent to the AI agent as a command.

use std::process::ExitCode;

use channel::app::handlers::{auth, dashboard, settings};
use channel::app::router::Route;
use channel::app::state::Notice;
use channel::core::service::Navigator;
use channel::{logging, App, ChannelConfig};
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "\
Commands:
  /login <email> <password>
  /register <name> <email> <password> <confirm>
  /logout
  /dashboard | /settings
  /join <room>            join a named room
  /quick                  start a quick session
  /sessions               list recent sessions
  /profile <name> <email> update profile
  /media <audio|video|screen> <on|off>
  /media-reset | /media-save
  /mic | /cam | /screen   toggle local tracks
  /leave                  leave the channel
  /help | /quit
Any other line on a channel page is sent to the AI agent.";

#[tokio::main]
async fn main() -> ExitCode {
    let config = ChannelConfig::from_env();
    let _log_guard = logging::init(&config);

    if let Err(e) = config.require_endpoints() {
        eprintln!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    tracing::info!(api = %config.api_base_url, "Starting AI Channel client");
    if config.is_debug_enabled() {
        tracing::debug!(
            media = %config.media_server_url,
            agent = %config.websocket_url,
            token_file = ?config.token_file,
            settings_file = ?config.settings_file,
            "Resolved configuration"
        );
    }

    // The console has no media SDK adapter; rooms report a connect failure.
    let mut app = match App::from_config(config, None) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Failed to start: {}", e);
            return ExitCode::FAILURE;
        }
    };

    app.start().await;
    println!("{}", HELP);
    let mut view = View::default();
    render(&app, &mut view);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read stdin");
                break;
            }
        };

        let before = app.route();
        if !handle_line(&mut app, line.trim()).await {
            break;
        }
        app.sync_route().await;
        if app.route() != before {
            view = View::default();
        }
        render(&app, &mut view);
    }

    if let Some(page) = app.channel.as_mut() {
        page.leave_quietly();
    }
    tracing::info!("AI Channel client stopped");
    ExitCode::SUCCESS
}

/// Returns false to quit
async fn handle_line(app: &mut App, line: &str) -> bool {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return true;
    };
    let args: Vec<&str> = words.collect();

    match (command, args.as_slice()) {
        ("/quit", _) => return false,
        ("/help", _) => println!("{}", HELP),
        ("/login", [email, password]) => {
            app.login.email = email.to_string();
            app.login.password = password.to_string();
            auth::submit_login(&app.session, app.router.as_ref(), &mut app.login).await;
            for (field, error) in app.login.errors.iter() {
                println!("  {:?}: {}", field, error);
            }
            if let Some(error) = &app.login.form_error {
                println!("  {}", error);
            }
        }
        ("/register", [name, email, password, confirm]) => {
            app.register.name = name.to_string();
            app.register.email = email.to_string();
            app.register.password = password.to_string();
            app.register.confirm_password = confirm.to_string();
            auth::submit_register(&app.session, app.router.as_ref(), &mut app.register).await;
            for (field, error) in app.register.errors.iter() {
                println!("  {:?}: {}", field, error);
            }
            if let Some(error) = &app.register.form_error {
                println!("  {}", error);
            }
        }
        ("/logout", _) => auth::sign_out(&app.session, app.router.as_ref()).await,
        ("/dashboard", _) => app.router.navigate(Route::Dashboard),
        ("/settings", _) => app.router.navigate(Route::Settings),
        ("/join", room) if !room.is_empty() => {
            dashboard::open_join_dialog(&mut app.dashboard);
            app.dashboard.room_input = room.join(" ");
            dashboard::join_room(app.router.as_ref(), &mut app.dashboard);
        }
        ("/quick", _) => {
            dashboard::quick_start(app.router.as_ref());
        }
        ("/sessions", _) => {
            let rows = dashboard::session_rows(&app.dashboard);
            if rows.is_empty() {
                println!("  No recent sessions");
            }
            for row in rows {
                println!(
                    "  {} ({}) {} participants, started {}",
                    row.room_name,
                    row.duration.as_deref().unwrap_or("ongoing"),
                    row.participants,
                    row.started
                );
            }
        }
        ("/profile", [name, email]) => {
            app.settings.name = name.to_string();
            app.settings.email = email.to_string();
            settings::save_profile(&app.session, &mut app.settings).await;
            print_notice(app.settings.notice.as_ref());
        }
        ("/media", [kind, state]) => {
            let on = *state == "on";
            let change = match *kind {
                "audio" => settings::MediaChange::AudioEnabled(on),
                "video" => settings::MediaChange::VideoEnabled(on),
                "screen" => settings::MediaChange::ScreenShareEnabled(on),
                _ => {
                    println!("  Unknown media kind '{}'", kind);
                    return true;
                }
            };
            settings::set_media(&mut app.settings, change);
        }
        ("/media-reset", _) => {
            settings::reset_media(&mut app.settings);
            print_notice(app.settings.notice.as_ref());
        }
        ("/media-save", _) => {
            let path = app.config.settings_file.clone();
            settings::handle_media_save(&path, &mut app.settings);
            print_notice(app.settings.notice.as_ref());
        }
        ("/mic", _) | ("/cam", _) | ("/screen", _) | ("/leave", _) => {
            let Some(page) = app.channel.as_mut() else {
                println!("  Not in a channel");
                return true;
            };
            match command {
                "/mic" => page.toggle_audio().await,
                "/cam" => page.toggle_video().await,
                "/screen" => page.toggle_screen_share().await,
                _ => page.leave(),
            }
        }
        _ if !command.starts_with('/') => match app.channel.as_mut() {
            Some(page) => {
                page.state.message_input = line.to_string();
                if !page.send_chat() {
                    println!("  AI agent is not connected");
                }
            }
            None => println!("  Type /help for commands"),
        },
        _ => println!("  Unknown command or wrong arguments. Type /help"),
    }
    true
}

fn print_notice(notice: Option<&Notice>) {
    if let Some(notice) = notice {
        println!("  [{:?}] {}", notice.kind, notice.text);
    }
}

/// What has already been printed for the current page
#[derive(Default)]
struct View {
    header_shown: bool,
    shown_messages: usize,
}

fn render(app: &App, view: &mut View) {
    let route = app.route();
    if !view.header_shown {
        view.header_shown = true;
        println!("== {} ==", route.title());
        if let Some(user) = app.session.user() {
            println!("  Signed in as {} <{}>", user.name, user.email);
        }
        if let (Route::Channel(room), Some(page)) = (&route, app.channel.as_ref()) {
            println!("  room: {}", room);
            if let Some(error) = &page.state.connection_error {
                println!("  ! {}", error);
            }
            println!(
                "  media: {}  agent: {}",
                if page.is_room_connected() { "connected" } else { "offline" },
                if page.agent().is_connected() { "connected" } else { "offline" }
            );
        }
    }

    let Some(page) = app.channel.as_ref() else {
        return;
    };
    let messages = page.messages();
    for message in messages.iter().skip(view.shown_messages) {
        println!("  [{}] {}: {}", message.timestamp, message.sender.name, message.content);
    }
    view.shown_messages = messages.len();
    if page.agent().is_processing() {
        println!("  AI is thinking...");
    }
}
