//! Search command handler
//!
//! Interactive mode drives the location search component from stdin: each
//! text line is new field content, and `:`-commands stand in for keys.

use crate::cli::open_location_store;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::geo::{get_geocoder, Candidate, GeoBackend};
use crate::search::{LocationSearch, NavKey, Navigator, SearchEvent, SearchState, SearchUpdate};
use crate::store::SelectedLocation;
use clap::Args;
use std::io::BufRead;
use std::sync::Arc;
use tokio::sync::mpsc;

const HELP: &str = "Type to search. Commands: :down, :up, :enter, :pick N, :quit";

/// Search command arguments
#[derive(Args)]
pub struct SearchArgs {
    /// Place to look up; omit for interactive mode
    pub query: Option<String>,

    /// Select the Nth result (1-based)
    #[arg(long, short = 'p', requires = "query", conflicts_with = "first")]
    pub pick: Option<usize>,

    /// Select the top result
    #[arg(long, requires = "query")]
    pub first: bool,
}

/// Tells the user where to go next
struct PrintNavigator;

impl Navigator for PrintNavigator {
    fn navigate(&self, route: &str, location: &SelectedLocation) {
        println!("Selected: {} ({})", location.label, location.coords());
        eprintln!("Next: solarscope {}", route.trim_start_matches('/'));
    }
}

/// One line of interactive input
#[derive(Debug, PartialEq)]
enum LineCommand {
    Event(SearchEvent),
    Quit,
}

fn parse_line(line: &str) -> Option<LineCommand> {
    let trimmed = line.trim();

    let Some(command) = trimmed.strip_prefix(':') else {
        return Some(LineCommand::Event(SearchEvent::Input(line.to_string())));
    };

    let mut parts = command.split_whitespace();
    let event = match (parts.next(), parts.next()) {
        (Some("q" | "quit"), None) => return Some(LineCommand::Quit),
        (Some("d" | "down"), None) => SearchEvent::Key(NavKey::Down),
        (Some("u" | "up"), None) => SearchEvent::Key(NavKey::Up),
        (Some("e" | "enter"), None) => SearchEvent::Key(NavKey::Enter),
        (Some("s" | "submit"), None) => SearchEvent::Submit,
        (Some("p" | "pick"), Some(n)) => {
            let n: usize = n.parse().ok()?;
            SearchEvent::Click(n.checked_sub(1)?)
        }
        _ => return None,
    };
    Some(LineCommand::Event(event))
}

fn render(shown: &mut Vec<Candidate>, update: SearchUpdate) {
    match update {
        SearchUpdate::Candidates(list) => {
            *shown = list;
            if shown.is_empty() {
                println!("(no results)");
            }
            for (i, candidate) in shown.iter().enumerate() {
                println!("  {}. {}", i + 1, candidate.label);
            }
        }
        SearchUpdate::Highlight(index) => {
            if let Some(candidate) = shown.get(index) {
                println!("> {}. {}", index + 1, candidate.label);
            }
        }
        SearchUpdate::Committed(_) => shown.clear(),
    }
}

/// Run the search command
pub async fn run(args: SearchArgs) -> Result<()> {
    let config = Config::load()?;

    match args.query {
        Some(query) => {
            let pick = if args.first { Some(1) } else { args.pick };
            one_shot(&config, &query, pick).await
        }
        None => interactive(&config).await,
    }
}

/// Look up once, list the results, optionally select one
async fn one_shot(config: &Config, query: &str, pick: Option<usize>) -> Result<()> {
    let geocoder = get_geocoder(config)?;
    let mut state = SearchState::new();

    let request = state
        .begin_query(query)
        .ok_or_else(|| Error::InvalidInput("Search query is empty".to_string()))?;
    let candidates = geocoder.search(&request.query).await?;
    state.apply_results(request.seq, candidates);

    let Some(n) = pick else {
        let mut shown = Vec::new();
        render(&mut shown, SearchUpdate::Candidates(state.selection().candidates().to_vec()));
        return Ok(());
    };

    let index = n
        .checked_sub(1)
        .ok_or_else(|| Error::InvalidInput("--pick starts at 1".to_string()))?;
    let location = state
        .commit(Some(index))?
        .ok_or_else(|| Error::InvalidInput(format!("No result #{} for '{}'", n, query)))?;

    open_location_store(config)?.save(&location)?;
    PrintNavigator.navigate(&config.navigation.next_route, &location);
    Ok(())
}

/// Drive the search component from stdin until something is selected
async fn interactive(config: &Config) -> Result<()> {
    let geocoder = Arc::new(get_geocoder(config)?);
    let store = open_location_store(config)?;
    let (event_tx, event_rx) = mpsc::channel(32);
    let (update_tx, mut update_rx) = mpsc::unbounded_channel();

    let component = LocationSearch::new(geocoder, store, Arc::new(PrintNavigator), config)
        .with_updates(update_tx);

    let renderer = tokio::spawn(async move {
        let mut shown = Vec::new();
        while let Some(update) = update_rx.recv().await {
            render(&mut shown, update);
        }
    });

    // Blocking reads get their own thread so they never hold up runtime shutdown
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            match parse_line(&line) {
                Some(LineCommand::Event(event)) => {
                    if event_tx.blocking_send(event).is_err() {
                        break;
                    }
                }
                Some(LineCommand::Quit) => break,
                None => eprintln!("{}", HELP),
            }
        }
    });

    eprintln!("{}", HELP);
    let outcome = component.run(event_rx).await;
    let _ = renderer.await;

    if outcome?.is_none() {
        eprintln!("No location selected");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text_is_input() {
        assert_eq!(
            parse_line("Par"),
            Some(LineCommand::Event(SearchEvent::Input("Par".to_string())))
        );
        assert_eq!(
            parse_line(""),
            Some(LineCommand::Event(SearchEvent::Input(String::new())))
        );
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            parse_line(":down"),
            Some(LineCommand::Event(SearchEvent::Key(NavKey::Down)))
        );
        assert_eq!(
            parse_line(" :u "),
            Some(LineCommand::Event(SearchEvent::Key(NavKey::Up)))
        );
        assert_eq!(
            parse_line(":enter"),
            Some(LineCommand::Event(SearchEvent::Key(NavKey::Enter)))
        );
        assert_eq!(parse_line(":quit"), Some(LineCommand::Quit));
    }

    #[test]
    fn test_parse_pick_is_one_based() {
        assert_eq!(
            parse_line(":pick 2"),
            Some(LineCommand::Event(SearchEvent::Click(1)))
        );
        assert_eq!(parse_line(":pick 0"), None);
        assert_eq!(parse_line(":pick two"), None);
        assert_eq!(parse_line(":teleport"), None);
    }

    #[test]
    fn test_render_tracks_list() {
        let mut shown = Vec::new();
        render(
            &mut shown,
            SearchUpdate::Candidates(vec![Candidate::new("Paris", 48.8566, 2.3522)]),
        );
        assert_eq!(shown.len(), 1);

        render(&mut shown, SearchUpdate::Candidates(Vec::new()));
        assert!(shown.is_empty());
    }
}
