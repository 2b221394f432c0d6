//! Terminal scorer over the oc_core JSON api.
//!
//! Every command round-trips through the same JSON boundary a GUI embedder
//! would use, so the CLI doubles as a smoke test of that surface.

use std::io::{self, BufRead, Write};

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use serde_json::json;

use oc_core::api::MatchResponse;
use oc_core::engine::stats;
use oc_core::models::{BallEvent, MatchState, MatchStatus, Pending};
use oc_core::SCHEMA_VERSION;

#[derive(Parser)]
#[command(name = "oc")]
#[command(about = "Ball-by-ball cricket scorer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a new match
    New {
        /// Team batting in the listed order of the toss
        #[arg(long)]
        team_a: String,

        #[arg(long)]
        team_b: String,

        /// Overs per innings
        #[arg(long, default_value = "20")]
        overs: u16,

        /// Toss winner (must match one of the team names)
        #[arg(long)]
        toss_winner: String,

        /// "bat" or "bowl"
        #[arg(long, default_value = "bat")]
        elected_to: String,

        #[arg(long)]
        striker: String,

        #[arg(long)]
        non_striker: String,

        #[arg(long)]
        bowler: String,
    },

    /// Score deliveries against the saved match
    ///
    /// Tokens: runs (0 1 2 3 4 6), w (wicket), wd (wide), nb (no-ball),
    /// b<runs> (byes). With no tokens an interactive prompt opens, which
    /// also accepts undo / batter <name> / bowler <name|#index> /
    /// innings <striker>, <non-striker>, <bowler> / show / quit.
    /// Names keep their spaces: "batter MS Dhoni".
    Score {
        tokens: Vec<String>,
    },

    /// Print the scoreboard for the saved match
    Show,

    /// Print the analysis brief for the saved match as JSON
    Brief,

    /// List completed matches
    History {
        /// Delete the whole archive
        #[arg(long)]
        clear: bool,

        /// Delete one archived match by id
        #[arg(long)]
        remove: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::New { team_a, team_b, overs, toss_winner, elected_to, striker, non_striker, bowler } => {
            let request = json!({
                "schema_version": SCHEMA_VERSION,
                "config": {
                    "team_a": team_a,
                    "team_b": team_b,
                    "total_overs": overs,
                    "toss_winner": toss_winner,
                    "elected_to": elected_to,
                },
                "opening": {
                    "striker": striker,
                    "non_striker": non_striker,
                    "bowler": bowler,
                },
            });
            let response = call(oc_core::start_match_json(&request.to_string()))?;
            print_scoreboard(&response.state);
        }

        Commands::Score { tokens } => {
            let response = call(oc_core::resume_match_json())?;
            print_scoreboard(&response.state);

            if tokens.is_empty() {
                interactive_loop()?;
            } else {
                for token in &tokens {
                    apply_token(token)?;
                }
                if let Ok(response) = call(oc_core::resume_match_json()) {
                    print_scoreboard(&response.state);
                }
            }
        }

        Commands::Show => {
            let response = call(oc_core::resume_match_json())?;
            print_scoreboard(&response.state);
        }

        Commands::Brief => {
            call(oc_core::resume_match_json())?;
            let brief = oc_core::match_brief_json().map_err(|e| anyhow!(e))?;
            println!("{brief}");
        }

        Commands::History { clear, remove } => {
            let store = oc_core::SaveStore::default_location();
            if clear {
                store.clear_history()?;
                println!("History cleared.");
            } else if let Some(id) = remove {
                if store.remove_from_history(&id)? {
                    println!("Removed {id}.");
                } else {
                    println!("No archived match with id {id}.");
                }
            } else {
                let summaries: serde_json::Value =
                    serde_json::from_str(&oc_core::history_json().map_err(|e| anyhow!(e))?)?;
                let entries = summaries.as_array().cloned().unwrap_or_default();
                if entries.is_empty() {
                    println!("No completed matches.");
                }
                for entry in entries {
                    println!(
                        "{}  {}  {}  [{}]",
                        entry["date"].as_str().unwrap_or("?"),
                        entry["title"].as_str().unwrap_or("?"),
                        entry["result"].as_str().unwrap_or("?"),
                        entry["id"].as_str().unwrap_or("?"),
                    );
                }
            }
        }
    }

    Ok(())
}

fn call(result: std::result::Result<String, String>) -> Result<MatchResponse> {
    let body = result.map_err(|e| anyhow!(e))?;
    Ok(serde_json::from_str(&body)?)
}

/// Apply one scoring token through the JSON api and print the outcome.
fn apply_token(token: &str) -> Result<MatchResponse> {
    let event = BallEvent::parse(token)
        .ok_or_else(|| anyhow!("unrecognized token: {token}"))?;
    let request = json!({
        "schema_version": SCHEMA_VERSION,
        "event": serde_json::to_value(&event)?,
    });
    let response = call(oc_core::score_ball_json(&request.to_string()))?;
    announce(&response.state);
    Ok(response)
}

fn interactive_loop() -> Result<()> {
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let Some((command, rest)) = split_command(&line) else {
            continue;
        };

        let outcome = match command {
            "quit" | "q" => break,
            "show" => {
                if let Ok(response) = call(oc_core::resume_match_json()) {
                    print_scoreboard(&response.state);
                }
                continue;
            }
            "undo" => call(oc_core::undo_json()).map(|r| announce(&r.state)),
            "batter" => resolve_batter(rest),
            "bowler" => resolve_bowler(rest),
            "innings" => start_second_innings(rest),
            _ => line.split_whitespace().try_for_each(|token| apply_token(token).map(|_| ())),
        };

        if let Err(err) = outcome {
            println!("  !! {err}");
        }
    }
    Ok(())
}

/// Split an input line into the command word and the untokenized rest, so
/// name arguments keep their internal spaces ("batter MS Dhoni").
fn split_command(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match line.split_once(char::is_whitespace) {
        Some((command, rest)) => Some((command, rest.trim())),
        None => Some((line, "")),
    }
}

/// Three opening names from the rest of an `innings` line: comma-separated,
/// or whitespace-separated when every name is a single word.
fn opening_names(rest: &str) -> Option<(String, String, String)> {
    let parts: Vec<&str> = if rest.contains(',') {
        rest.split(',').map(str::trim).collect()
    } else {
        rest.split_whitespace().collect()
    };
    match parts.as_slice() {
        [striker, non_striker, bowler]
            if !striker.is_empty() && !non_striker.is_empty() && !bowler.is_empty() =>
        {
            Some((striker.to_string(), non_striker.to_string(), bowler.to_string()))
        }
        _ => None,
    }
}

fn resolve_batter(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("usage: batter <name>");
    }
    let request = json!({"schema_version": SCHEMA_VERSION, "name": name});
    let response = call(oc_core::new_batter_json(&request.to_string()))?;
    announce(&response.state);
    Ok(())
}

fn resolve_bowler(pick: &str) -> Result<()> {
    if pick.is_empty() {
        bail!("usage: bowler <name|#index>");
    }
    let request = match pick.strip_prefix('#') {
        Some(index) => {
            let index: usize = index.parse()?;
            json!({"schema_version": SCHEMA_VERSION, "existing_index": index})
        }
        None => json!({"schema_version": SCHEMA_VERSION, "name": pick}),
    };
    let response = call(oc_core::new_bowler_json(&request.to_string()))?;
    announce(&response.state);
    Ok(())
}

fn start_second_innings(rest: &str) -> Result<()> {
    let Some((striker, non_striker, bowler)) = opening_names(rest) else {
        bail!("usage: innings <striker>, <non-striker>, <bowler>")
    };
    let request = json!({
        "schema_version": SCHEMA_VERSION,
        "opening": {
            "striker": striker,
            "non_striker": non_striker,
            "bowler": bowler,
        },
    });
    let response = call(oc_core::second_innings_json(&request.to_string()))?;
    print_scoreboard(&response.state);
    Ok(())
}

/// One-line status after each action, plus any prompt the state demands.
fn announce(state: &MatchState) {
    let team = &state.batting_team;
    println!(
        "  {} {}/{}  ({} ov)  [{}]",
        team.name,
        team.score,
        team.wickets,
        team.overs_played,
        state.this_over.join(" "),
    );

    if state.status == MatchStatus::Live {
        if let Some(needed) = state.runs_needed() {
            println!("  Need {} from {} balls.", needed, state.balls_remaining());
        }
    }

    match state.pending {
        Pending::NewBatter => println!("  >> Wicket. Name the next batter: batter <name>"),
        Pending::NewBowler => println!("  >> Over complete. Pick a bowler: bowler <name|#index>"),
        Pending::InningsBreak => {
            println!("  >> Innings over. Start the chase: innings <striker> <non-striker> <bowler>")
        }
        Pending::None => {}
    }

    if state.status == MatchStatus::Completed {
        if let Some(margin) = &state.win_margin {
            println!("  == {margin} ==");
        }
    }
}

fn print_scoreboard(state: &MatchState) {
    let batting = &state.batting_team;
    let bowling = &state.bowling_team;

    println!();
    println!("{} vs {}  ({} overs)", state.config.team_a, state.config.team_b, state.config.total_overs);
    println!("{}", "-".repeat(46));
    println!(
        "{}  {}/{}  ({} ov, RR {})",
        batting.name,
        batting.score,
        batting.wickets,
        batting.overs_played,
        stats::run_rate_display(batting.score, batting.overs_played.total_balls()),
    );

    for (index, player) in batting.players.iter().enumerate() {
        let crease = if index == state.striker {
            "*"
        } else if index == state.non_striker {
            "+"
        } else {
            " "
        };
        let status = if player.is_out {
            player.out_by.clone().unwrap_or_else(|| "out".to_string())
        } else if index == state.striker || index == state.non_striker {
            "not out".to_string()
        } else {
            String::new()
        };
        println!(
            "  {crease}{:<16} {:>3} ({:>3})  SR {:>5}  {status}",
            player.name,
            player.runs,
            player.balls,
            stats::strike_rate_display(player.runs, player.balls),
        );
    }
    println!("  extras: {}", batting.extras);

    println!("Bowling ({})", bowling.name);
    for (index, player) in bowling.players.iter().enumerate() {
        if !player.has_bowled() && index != state.bowler {
            continue;
        }
        let mark = if index == state.bowler { "*" } else { " " };
        println!(
            "  {mark}{}  econ {}",
            player.bowling_line(),
            stats::economy_display(player.runs_conceded, player.balls_bowled),
        );
    }

    if let Some(target) = state.target {
        println!("Target: {target}");
    }
    if let Some(margin) = &state.win_margin {
        println!("Result: {margin}");
    }
    println!("This over: [{}]", state.this_over.join(" "));
    println!();
}
