//! Daily Maze entry point
//!
//! Terminal front end: prints today's maze, a first-person frame from the
//! start cell, and can race an autopilot along the solution.

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::Parser;

use daily_maze::sim::{
    Coord, Direction, Maze, Pose, Projection, RunEvent, RunState, TickInput, WallOrientation,
    project, tick,
};
use daily_maze::{
    DailyLeaderboard, DailyMaze, QualityPreset, Settings, day_key, format_duration,
};

/// Viewport height of the ASCII first-person frame (rows)
const VIEW_ROWS: usize = 21;
/// Fixed frame time for the autopilot (seconds)
const AUTOPILOT_DT: f64 = 1.0 / 60.0;

#[derive(Parser, Debug)]
#[command(name = "daily-maze", version, about = "Today's maze, in your terminal")]
struct Cli {
    /// Day-key to play (YYYY-MM-DD); defaults to today in the configured zone
    #[arg(long)]
    date: Option<String>,

    /// Override the maze size
    #[arg(long)]
    size: Option<usize>,

    /// Settings file (JSON)
    #[arg(long, default_value = "daily-maze.json")]
    config: PathBuf,

    /// Camera quality preset: low, medium or high
    #[arg(long, value_parser = parse_quality)]
    quality: Option<QualityPreset>,

    /// Overlay the solution path on the overview
    #[arg(long)]
    solution: bool,

    /// Print the first-person view from the start cell
    #[arg(long)]
    view: bool,

    /// Drive a run along the solution and report the time
    #[arg(long)]
    autoplay: bool,

    /// Nickname recorded for an autoplay finish
    #[arg(long, default_value = "Autopilot")]
    nickname: String,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut settings = Settings::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(size) = cli.size {
        settings.maze_size = size;
        settings.validate().context("invalid --size")?;
    }
    if let Some(quality) = cli.quality {
        settings.quality = quality;
        settings.column_count = None;
    }

    let key = match cli.date {
        Some(date) => date,
        None => day_key(Utc::now(), settings.day_offset_hours),
    };
    let daily = DailyMaze::build(&key, settings.maze_size)
        .with_context(|| format!("building the maze for {key}"))?;
    let maze = daily.maze();
    log::info!("Daily maze {key} ({0}x{0})", maze.size());

    let solution = daily.solution();
    if solution.is_empty() {
        bail!("maze for {key} has no route to the goal");
    }

    println!("Daily maze for {key}: {} cells on the shortest route", solution.len());
    let highlight: HashSet<Coord> = if cli.solution {
        solution.iter().copied().collect()
    } else {
        HashSet::new()
    };
    print!("{}", render_overview(maze, &highlight));

    if cli.view {
        log::info!(
            "{} quality, {} rays",
            settings.quality.as_str(),
            settings.column_count()
        );
        let view = project(
            maze,
            &Pose::start(),
            settings.field_of_view,
            settings.column_count(),
            settings.max_shade_depth,
        );
        print!("{}", render_view(&view));
    }

    if cli.autoplay {
        let elapsed_ms = autoplay(maze, solution, &settings)?;
        let mut board = DailyLeaderboard::new(&key, settings.leaderboard_limit);
        let submission = board.record(&key, &cli.nickname, Utc::now(), elapsed_ms)?;
        println!(
            "{} reached the goal in {} (rank #{})",
            submission.entry.nickname,
            format_duration(elapsed_ms),
            submission
                .rank
                .map_or_else(|| "-".to_string(), |r| r.to_string())
        );
    }

    Ok(())
}

fn parse_quality(s: &str) -> std::result::Result<QualityPreset, String> {
    QualityPreset::parse(s).ok_or_else(|| format!("unknown quality `{s}` (low, medium, high)"))
}

/// Steer through the route one cell centre at a time using the run update
fn autoplay(maze: &Maze, route: &[Coord], settings: &Settings) -> Result<u64> {
    use std::f64::consts::{PI, TAU};

    // Single-cell maze: already standing on the goal
    if maze.start() == maze.goal() {
        return Ok(0);
    }

    let tuning = settings.motion_tuning();
    let mut state = RunState::new().start();
    let mut waypoints = route.iter().skip(1).peekable();
    let tick_limit = maze.size() * maze.size() * 600;

    for _ in 0..tick_limit {
        let Some(target) = waypoints.peek() else {
            break;
        };
        let centre = glam::DVec2::new(target.col as f64 + 0.5, target.row as f64 + 0.5);
        let to_target = centre - state.pose.position;
        if to_target.length() < 0.15 {
            waypoints.next();
            continue;
        }

        let bearing = to_target.y.atan2(to_target.x);
        let mut turn = (bearing - state.pose.heading).rem_euclid(TAU);
        if turn > PI {
            turn -= TAU;
        }
        let input = TickInput {
            forward: turn.abs() < 0.3,
            backward: false,
            turn_left: turn < -0.05,
            turn_right: turn > 0.05,
        };

        let outcome = tick(&state, maze, &input, AUTOPILOT_DT, &tuning);
        state = outcome.state;
        for event in outcome.events {
            match event {
                RunEvent::EnteredCell(cell) => log::trace!("Entered ({}, {})", cell.row, cell.col),
                RunEvent::Completed { elapsed_ms } => return Ok(elapsed_ms),
            }
        }
    }

    bail!(
        "autopilot stopped at ({:.2}, {:.2}) without reaching the goal",
        state.pose.position.x,
        state.pose.position.y
    )
}

/// ASCII overview of the whole maze
fn render_overview(maze: &Maze, highlight: &HashSet<Coord>) -> String {
    let size = maze.size();
    let mut out = String::new();

    out.push_str(&"+---".repeat(size));
    out.push_str("+\n");
    for row in 0..size {
        let mut line = String::new();
        let mut floor = String::new();
        for col in 0..size {
            let here = Coord::new(row, col);
            line.push(if maze.is_open(here, Direction::West) { ' ' } else { '|' });
            line.push_str(if here == maze.start() {
                " S "
            } else if here == maze.goal() {
                " G "
            } else if highlight.contains(&here) {
                " * "
            } else {
                "   "
            });
            floor.push_str(if maze.is_open(here, Direction::South) {
                "+   "
            } else {
                "+---"
            });
        }
        line.push_str("|\n");
        floor.push_str("+\n");
        out.push_str(&line);
        out.push_str(&floor);
    }
    out
}

/// ASCII first-person frame
fn render_view(view: &Projection) -> String {
    const VERTICAL: [char; 4] = ['█', '▓', '▒', '░'];
    const HORIZONTAL: [char; 4] = ['▓', '▒', '░', '.'];

    let mut grid = vec![vec![' '; view.columns.len()]; VIEW_ROWS];
    for (i, column) in view.columns.iter().enumerate() {
        let height = column.wall_height(VIEW_ROWS as f64).round() as usize;
        let top = (VIEW_ROWS - height) / 2;
        let glyph = match column.orientation {
            WallOrientation::Vertical => VERTICAL[column.shade],
            WallOrientation::Horizontal => HORIZONTAL[column.shade],
            WallOrientation::None => ' ',
        };
        for row in grid.iter_mut().skip(top).take(height) {
            row[i] = glyph;
        }
        for row in grid.iter_mut().skip(top + height) {
            row[i] = '_';
        }
    }
    if let Some(i) = view.goal_column {
        grid[VIEW_ROWS / 2][i] = 'G';
    }

    let mut out = String::new();
    for row in grid {
        out.extend(row);
        out.push('\n');
    }
    if let Some(d) = view.goal_distance() {
        out.push_str(&format!("Goal in sight, {d:.1} cells ahead\n"));
    }
    out
}
