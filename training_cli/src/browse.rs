//! Interactive browsing of the plan.
//!
//! One screen per navigator view. Input is line-based:
//! - a number opens a mesocycle (dashboard) or a session (mesocycle/session)
//! - `t <n>` toggles the n-th exercise of the open session
//! - `b` goes back, `r` retries a failed load, `q` quits

use std::io::{BufRead, Write};
use training_core::*;

const RULE: &str = "─────────────────────────────────────────";
const BAR_WIDTH: usize = 20;

/// Prints load failures to stderr
struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, message: &str) {
        eprintln!("✗ {}", message);
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Select(u32),
    Toggle(usize),
    Back,
    Retry,
    Help,
    Refresh,
    Quit,
    Unknown(String),
}

impl Command {
    fn parse(line: &str) -> Self {
        let input = line.trim().to_lowercase();
        let mut words = input.split_whitespace();

        match (words.next(), words.next(), words.next()) {
            (None, _, _) => Command::Refresh,
            (Some("q" | "quit" | "exit"), None, _) => Command::Quit,
            (Some("b" | "back"), None, _) => Command::Back,
            (Some("r" | "retry"), None, _) => Command::Retry,
            (Some("h" | "help" | "?"), None, _) => Command::Help,
            (Some("t" | "toggle"), Some(n), None) => match n.parse() {
                Ok(n) => Command::Toggle(n),
                Err(_) => Command::Unknown(input.clone()),
            },
            (Some(n), None, _) => match n.parse() {
                Ok(n) => Command::Select(n),
                Err(_) => Command::Unknown(input.clone()),
            },
            _ => Command::Unknown(input.clone()),
        }
    }
}

/// Run the interactive browser until `q` or end of input
pub async fn run<R: BufRead, W: Write>(
    gateway: &dyn CatalogGateway,
    mut input: R,
    mut out: W,
) -> Result<()> {
    let mut nav = Navigator::new(Box::new(StderrNotifier));
    nav.load(gateway).await?;

    loop {
        write_view(&mut out, &nav)?;
        write_prompt(&mut out, nav.view())?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            break;
        }

        match Command::parse(&line) {
            Command::Quit => break,
            Command::Refresh => {}
            Command::Help => write_help(&mut out)?,
            Command::Back => {
                if nav.back().is_err() {
                    writeln!(out, "Already at the dashboard.")?;
                }
            }
            Command::Retry => {
                if matches!(nav.load_state(), LoadState::Failed { .. }) {
                    nav.retry(gateway).await?;
                } else {
                    writeln!(out, "Nothing to retry.")?;
                }
            }
            Command::Select(n) => select(&mut nav, n, &mut out)?,
            Command::Toggle(n) => toggle(&mut nav, n, &mut out)?,
            Command::Unknown(text) => {
                writeln!(out, "Unknown command '{}'. Type 'h' for help.", text)?;
            }
        }
    }

    writeln!(out, "Bye!")?;
    Ok(())
}

fn select<W: Write>(nav: &mut Navigator, n: u32, out: &mut W) -> Result<()> {
    let outcome = match nav.view() {
        View::Dashboard if nav.snapshot().is_none() => {
            writeln!(out, "The plan is not loaded. Type 'r' to retry.")?;
            return Ok(());
        }
        View::Dashboard => nav.select_mesocycle(n),
        View::Mesocycle { .. } | View::Session { .. } => nav.select_session(n),
    };

    match outcome {
        Ok(()) => {}
        Err(Error::NotFound { entity, id }) => writeln!(out, "No {} {} here.", entity, id)?,
        Err(err) => writeln!(out, "{}", err)?,
    }
    Ok(())
}

fn toggle<W: Write>(nav: &mut Navigator, position: usize, out: &mut W) -> Result<()> {
    let Some(session) = nav.current_session() else {
        writeln!(out, "Open a session first.")?;
        return Ok(());
    };

    // Positions are 1-based on screen
    let exercise = position
        .checked_sub(1)
        .and_then(|i| session.exercises.get(i))
        .map(|e| e.id);

    match exercise {
        Some(id) => {
            nav.toggle_exercise(id);
        }
        None => writeln!(out, "No exercise {} in this session.", position)?,
    }
    Ok(())
}

// ============================================================================
// Screens
// ============================================================================

fn write_title<W: Write>(out: &mut W, title: &str) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "╭{}╮", RULE)?;
    writeln!(out, "│  {}", title)?;
    writeln!(out, "╰{}╯", RULE)?;
    Ok(())
}

fn write_view<W: Write>(out: &mut W, nav: &Navigator) -> Result<()> {
    match nav.view() {
        View::Dashboard => write_dashboard(out, nav.load_state()),
        View::Mesocycle { .. } => match nav.current_mesocycle() {
            Some(detail) => write_mesocycle(out, detail),
            None => Ok(()),
        },
        View::Session { .. } => match (nav.current_session(), nav.progress()) {
            (Some(session), Some(progress)) => {
                write_session(out, session, &progress, nav.tracker())
            }
            _ => Ok(()),
        },
    }
}

fn write_dashboard<W: Write>(out: &mut W, state: &LoadState) -> Result<()> {
    let snapshot = match state {
        LoadState::Idle | LoadState::Loading => {
            writeln!(out, "Loading...")?;
            return Ok(());
        }
        LoadState::Failed { message } => {
            writeln!(out)?;
            writeln!(out, "✗ {}", message)?;
            writeln!(out, "  Type 'r' to retry or 'q' to quit.")?;
            return Ok(());
        }
        LoadState::Ready(snapshot) => snapshot,
    };

    let overview = snapshot.overview();
    write_title(out, &overview.title)?;
    writeln!(out, "  {}", overview.category)?;
    writeln!(
        out,
        "  {} months · {} sessions per week · {} min per session",
        overview.duration_months, overview.sessions_per_week, overview.session_minutes
    )?;
    writeln!(
        out,
        "  {} sessions · {} hours over {} weeks",
        overview.scheduled_sessions, overview.total_hours, overview.total_weeks
    )?;

    writeln!(out)?;
    writeln!(out, "  Mesocycles")?;
    for detail in &snapshot.mesocycles {
        let m = &detail.mesocycle;
        writeln!(out, "  [{}] {} · {} ({} weeks)", m.id, m.month_label, m.name, m.weeks)?;
        writeln!(out, "      {}", m.description)?;
    }

    writeln!(out)?;
    writeln!(out, "  Basic material")?;
    for item in &snapshot.material {
        writeln!(out, "  • {}", item)?;
    }
    writeln!(out)?;
    Ok(())
}

pub fn write_mesocycle_header<W: Write>(out: &mut W, m: &Mesocycle) -> Result<()> {
    write_title(out, &format!("{} · {}", m.month_label, m.name))?;
    writeln!(out, "  {}", m.description)?;
    writeln!(out, "  Objective: {}", m.objective)?;
    writeln!(out, "  {} weeks", m.weeks)?;
    Ok(())
}

pub fn write_mesocycle<W: Write>(out: &mut W, detail: &MesocycleDetail) -> Result<()> {
    write_mesocycle_header(out, &detail.mesocycle)?;

    if !detail.objectives.is_empty() {
        writeln!(out)?;
        writeln!(out, "  Objectives")?;
        for objective in &detail.objectives {
            writeln!(out, "  • {}", objective)?;
        }
    }

    if detail.weekly_blocks.is_empty() {
        writeln!(out)?;
        writeln!(out, "  No sessions planned yet.")?;
    }
    for week in &detail.weekly_blocks {
        write_week(out, week)?;
    }
    writeln!(out)?;
    Ok(())
}

pub fn write_week<W: Write>(out: &mut W, week: &WeeklyBlock) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "  Week {}", week.week_number)?;
    for s in &week.sessions {
        writeln!(
            out,
            "  [{}] {} · {} · {} ({} min, {} exercises)",
            s.id,
            s.day_label,
            s.kind.label(),
            s.name,
            s.duration_minutes,
            s.exercises.len()
        )?;
    }
    Ok(())
}

fn progress_bar(progress: &Progress) -> String {
    let filled = ((progress.ratio * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    format!("[{}{}]", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

fn write_session<W: Write>(
    out: &mut W,
    session: &Session,
    progress: &Progress,
    tracker: &SessionTracker,
) -> Result<()> {
    write_title(out, &session.name)?;
    writeln!(
        out,
        "  {} · {} · {} min · {} exercises",
        session.kind.label(),
        session.day_label,
        session.duration_minutes,
        session.exercises.len()
    )?;
    writeln!(out)?;
    writeln!(
        out,
        "  Progress: {} {}/{} ({}%) · {}/{} min",
        progress_bar(progress),
        progress.completed,
        progress.total,
        progress.percent(),
        progress.completed_minutes,
        progress.total_minutes
    )?;
    writeln!(out)?;

    for (n, e) in session.exercises.iter().enumerate() {
        let mark = if tracker.is_completed(e.id) { "x" } else { " " };
        writeln!(out, "  {}. [{}] {} ({} min)", n + 1, mark, e.name, e.duration_minutes)?;
        writeln!(out, "         {}", e.description)?;
        writeln!(out, "         Material: {} · Objective: {}", e.material, e.objective)?;
    }
    writeln!(out)?;

    if progress.is_complete() {
        writeln!(out, "  ✓ Session complete!")?;
    } else if let Some(next) = tracker.next_pending().and_then(|id| session.exercise(id)) {
        writeln!(out, "  Next: {}", next.name)?;
    }
    Ok(())
}

fn write_prompt<W: Write>(out: &mut W, view: View) -> Result<()> {
    writeln!(out, "{}", RULE)?;
    match view {
        View::Dashboard => writeln!(out, "Number to open a mesocycle, 'q' to quit")?,
        View::Mesocycle { .. } => {
            writeln!(out, "Number to open a session, 'b' to go back, 'q' to quit")?
        }
        View::Session { .. } => writeln!(
            out,
            "'t <n>' to tick exercise n, a number to switch session, 'b' to go back"
        )?,
    }
    write!(out, "> ")?;
    Ok(())
}

fn write_help<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "Commands:")?;
    writeln!(out, "  <n>      open mesocycle or session n")?;
    writeln!(out, "  t <n>    tick or untick exercise n of the open session")?;
    writeln!(out, "  b        back")?;
    writeln!(out, "  r        retry loading the plan")?;
    writeln!(out, "  q        quit")?;
    Ok(())
}
