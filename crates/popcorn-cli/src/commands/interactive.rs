use crate::output::Output;
use crate::render;
use crate::ui::{self, Spinner};
use color_eyre::Result;
use owo_colors::OwoColorize;
use popcorn_core::{Selection, ViewController};
use serde_json::json;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

const HELP: &str = "\
Commands:
  /<text> | search <text>   search movies (at least 3 characters)
  select <n|imdb id>        open a search result; again to close it
  open <n>                  open an entry from the watched list
  add <1-10>                rate the open movie and add it to the watched list
  delete <n|imdb id>        remove a watched entry
  close | esc               close the open movie
  results | watched | summary
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Index(usize), // 1-based, as printed in tables
    Id(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Query(String),
    Select(Target),
    OpenWatched(usize),
    Close,
    Cancel,
    Add(u8),
    Delete(Target),
    Results,
    Watched,
    Summary,
    Help,
    Quit,
}

fn parse_target(arg: &str) -> Result<Target, String> {
    if arg.is_empty() {
        return Err("expected a list number or an IMDb id".to_string());
    }
    if arg.chars().all(|c| c.is_ascii_digit()) {
        return match arg.parse::<usize>() {
            Ok(0) | Err(_) => Err(format!("invalid list number: {}", arg)),
            Ok(n) => Ok(Target::Index(n)),
        };
    }
    Ok(Target::Id(arg.to_string()))
}

/// Parse one input line. Blank lines parse to `None`.
pub fn parse_command(line: &str) -> Result<Option<SessionCommand>, String> {
    // A bare Escape keypress arrives as ESC followed by the newline
    if line.trim_end_matches(['\r', '\n']) == "\u{1b}" {
        return Ok(Some(SessionCommand::Cancel));
    }

    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    if let Some(query) = line.strip_prefix('/') {
        return Ok(Some(SessionCommand::Query(query.to_string())));
    }

    let (word, arg) = match line.split_once(char::is_whitespace) {
        Some((word, arg)) => (word, arg.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "search" | "s" => SessionCommand::Query(arg.to_string()),
        "select" | "sel" => SessionCommand::Select(parse_target(arg)?),
        "open" => match parse_target(arg)? {
            Target::Index(n) => SessionCommand::OpenWatched(n),
            Target::Id(id) => SessionCommand::Select(Target::Id(id)),
        },
        "close" | "back" => SessionCommand::Close,
        "esc" | "escape" | "cancel" => SessionCommand::Cancel,
        "add" => {
            let rating = arg
                .parse::<u8>()
                .map_err(|_| format!("rating must be a number from 1 to 10, got {:?}", arg))?;
            SessionCommand::Add(rating)
        }
        "delete" | "rm" => SessionCommand::Delete(parse_target(arg)?),
        "results" | "r" => SessionCommand::Results,
        "watched" | "w" => SessionCommand::Watched,
        "summary" => SessionCommand::Summary,
        "help" | "?" => SessionCommand::Help,
        "quit" | "exit" | "q" => SessionCommand::Quit,
        other => return Err(format!("unknown command: {} (try `help`)", other)),
    };
    Ok(Some(command))
}

/// Line-oriented session over the controller. Reads stdin until EOF or `quit`.
pub async fn run_interactive(mut controller: ViewController, output: &Output) -> Result<()> {
    output.block(format!("{} {}", "🍿", "usePopcorn".bold()));
    output.block(HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        if output.is_human() && ui::is_interactive() {
            print!("{} ", ">".green());
            std::io::stdout().flush()?;
        }

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_command(&line) {
            Ok(None) => continue,
            Ok(Some(SessionCommand::Quit)) => break,
            Ok(Some(command)) => {
                debug!("Session command {:?}", command);
                handle_command(&mut controller, command, output).await;
            }
            Err(msg) => output.error(msg),
        }
    }

    output.block(render::summary_line(&controller.summary()));
    Ok(())
}

async fn handle_command(controller: &mut ViewController, command: SessionCommand, output: &Output) {
    match command {
        SessionCommand::Query(query) => {
            controller.set_query(&query);
            let spinner = Spinner::start(output, "Loading...");
            controller.settle().await;
            spinner.finish();
            show_results(controller, output);
        }
        SessionCommand::Select(target) => {
            let imdb_id = match target {
                Target::Id(id) => Some(id),
                Target::Index(n) => controller
                    .search_state()
                    .movies
                    .get(n - 1)
                    .map(|m| m.imdb_id.clone()),
            };
            match imdb_id {
                Some(id) => open_movie(controller, &id, output).await,
                None => output.error("No search result with that number"),
            }
        }
        SessionCommand::OpenWatched(n) => {
            let imdb_id = controller.watched().as_slice().get(n - 1).map(|m| m.imdb_id.clone());
            match imdb_id {
                Some(id) => open_movie(controller, &id, output).await,
                None => output.error("No watched movie with that number"),
            }
        }
        SessionCommand::Close => {
            controller.close();
            show_watched(controller, output);
        }
        SessionCommand::Cancel => {
            controller.cancel();
            show_watched(controller, output);
        }
        SessionCommand::Add(rating) => match controller.add_watched(rating) {
            Ok(movie) => {
                output.success(format!("Added {} with your rating {}", movie.title, movie.user_rating));
                show_watched(controller, output);
            }
            Err(e) => output.error(e.to_string()),
        },
        SessionCommand::Delete(target) => {
            let imdb_id = match target {
                Target::Id(id) => Some(id),
                Target::Index(n) => controller.watched().as_slice().get(n - 1).map(|m| m.imdb_id.clone()),
            };
            match imdb_id {
                Some(id) if controller.delete_watched(&id) => {
                    output.success(format!("Deleted {}", id));
                    show_watched(controller, output);
                }
                _ => output.error("No watched movie to delete"),
            }
        }
        SessionCommand::Results => show_results(controller, output),
        SessionCommand::Watched => show_watched(controller, output),
        SessionCommand::Summary => {
            let summary = controller.summary();
            output.json(&json!({ "summary": summary }));
            output.block(render::summary_line(&summary));
        }
        SessionCommand::Help => output.block(HELP),
        SessionCommand::Quit => {}
    }
}

async fn open_movie(controller: &mut ViewController, imdb_id: &str, output: &Output) {
    controller.select(imdb_id);
    if controller.selection() == &Selection::None {
        output.info("Closed");
        show_watched(controller, output);
        return;
    }

    let spinner = Spinner::start(output, "Loading...");
    controller.settle().await;
    spinner.finish();

    let state = controller.detail_state();
    match (state.current(), &state.error) {
        (Some(detail), _) => {
            let watched_rating = controller.watched_user_rating(imdb_id);
            output.json(&json!({ "detail": detail, "user_rating": watched_rating }));
            output.block(controller.window_title().bold().to_string());
            output.block(render::detail_block(detail, watched_rating));
        }
        (None, Some(error)) => output.error(error),
        (None, None) => output.error(format!("No details for {}", imdb_id)),
    }
}

fn show_results(controller: &ViewController, output: &Output) {
    let state = controller.search_state();
    if let Some(error) = &state.error {
        output.error(error);
        return;
    }

    output.json(&json!({ "query": state.query, "results": state.movies }));
    if state.query.chars().count() < controller.min_query_length() {
        output.block(format!(
            "Type at least {} characters to search",
            controller.min_query_length()
        ));
        return;
    }
    output.block(render::found_line(state.result_count()));
    output.block(render::results_table(&state.movies).to_string());
}

fn show_watched(controller: &ViewController, output: &Output) {
    let summary = controller.summary();
    output.json(&json!({ "watched": controller.watched().as_slice(), "summary": summary }));
    output.block(render::summary_line(&summary));
    if !controller.watched().is_empty() {
        output.block(render::watched_table(controller.watched().as_slice()).to_string());
    }
}
