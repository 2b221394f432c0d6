//! Pure rate helpers shared by the scoreboard, the analysis brief, and the
//! CLI. All of them yield 0 when the denominator is 0.

/// Batting strike rate: runs per hundred balls faced.
pub fn strike_rate(runs: u32, balls: u32) -> f64 {
    if balls == 0 {
        0.0
    } else {
        runs as f64 / balls as f64 * 100.0
    }
}

/// Strike rate as the scoreboard shows it (no decimals).
pub fn strike_rate_display(runs: u32, balls: u32) -> String {
    format!("{:.0}", strike_rate(runs, balls))
}

/// Bowling economy: runs conceded per over bowled.
pub fn economy_rate(runs_conceded: u32, balls_bowled: u32) -> f64 {
    if balls_bowled == 0 {
        0.0
    } else {
        runs_conceded as f64 / (balls_bowled as f64 / 6.0)
    }
}

/// Economy as the scoreboard shows it (one decimal).
pub fn economy_display(runs_conceded: u32, balls_bowled: u32) -> String {
    format!("{:.1}", economy_rate(runs_conceded, balls_bowled))
}

/// Current run rate: team runs per over faced so far.
pub fn run_rate(score: u32, legal_balls: u32) -> f64 {
    if legal_balls == 0 {
        0.0
    } else {
        score as f64 / (legal_balls as f64 / 6.0)
    }
}

pub fn run_rate_display(score: u32, legal_balls: u32) -> String {
    format!("{:.2}", run_rate(score, legal_balls))
}
