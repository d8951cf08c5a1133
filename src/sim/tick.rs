//! Per-frame run update
//!
//! `tick` is pure: it reads the previous state and the held keys and returns
//! the next state plus any events. The caller owns timing and the key set.

use serde::{Deserialize, Serialize};

use super::maze::Maze;
use super::motion::integrate_motion;
use super::state::{Pose, RunEvent, RunPhase, RunState};
use crate::consts::*;

/// Keys held during a frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub forward: bool,
    pub backward: bool,
    pub turn_left: bool,
    pub turn_right: bool,
}

impl TickInput {
    /// +1 forward, -1 backward, 0 when neither or both
    pub fn forward_axis(&self) -> f64 {
        f64::from(i8::from(self.forward) - i8::from(self.backward))
    }

    /// +1 clockwise (right), -1 counter-clockwise (left)
    pub fn turn_axis(&self) -> f64 {
        f64::from(i8::from(self.turn_right) - i8::from(self.turn_left))
    }

    pub fn is_idle(&self) -> bool {
        self.forward_axis() == 0.0 && self.turn_axis() == 0.0
    }
}

/// Speeds used by `tick`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionTuning {
    /// Cells per second
    pub move_speed: f64,
    /// Radians per second
    pub turn_speed: f64,
    /// Longest frame step applied to movement. The run clock still advances
    /// by the full frame time.
    pub max_frame_dt: f64,
}

impl Default for MotionTuning {
    fn default() -> Self {
        Self {
            move_speed: MOVE_SPEED,
            turn_speed: TURN_SPEED,
            max_frame_dt: MAX_FRAME_DT,
        }
    }
}

/// Result of one tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    pub state: RunState,
    pub events: Vec<RunEvent>,
}

impl TickOutcome {
    fn unchanged(state: &RunState) -> Self {
        Self {
            state: *state,
            events: Vec::new(),
        }
    }

    pub fn completed(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, RunEvent::Completed { .. }))
    }
}

/// Advance a run by `dt` seconds
pub fn tick(
    state: &RunState,
    maze: &Maze,
    input: &TickInput,
    dt: f64,
    tuning: &MotionTuning,
) -> TickOutcome {
    // Nothing moves outside of play, and a completed run stays completed
    if !state.is_playing() || maze.is_empty() {
        return TickOutcome::unchanged(state);
    }

    // The clock runs on wall time; only movement is held to `max_frame_dt`
    let wall_dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    let dt = wall_dt.min(tuning.max_frame_dt);

    let mut next = *state;
    next.elapsed_secs += wall_dt;

    if !input.is_idle() {
        let pose = state
            .pose
            .rotated(input.turn_axis() * tuning.turn_speed * dt);
        let forward = input.forward_axis();
        let position = if forward != 0.0 {
            let delta = pose.forward() * forward * tuning.move_speed * dt;
            integrate_motion(pose.position, delta, maze)
        } else {
            pose.position
        };
        next.pose = Pose::new(position, pose.heading);
    }

    let mut events = Vec::new();
    let cell = next.pose.cell(maze.size());
    if cell != state.cell {
        next.cell = cell;
        events.push(RunEvent::EnteredCell(cell));

        if cell == maze.goal() {
            next.phase = RunPhase::Complete;
            let elapsed_ms = next.elapsed_ms();
            log::info!("Run complete in {elapsed_ms} ms");
            events.push(RunEvent::Completed { elapsed_ms });
        }
    }

    TickOutcome {
        state: next,
        events,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Coord;
    use glam::DVec2;
    use std::f64::consts::FRAC_PI_2;

    const DT: f64 = 1.0 / 60.0;

    fn two_cell_corridor() -> Maze {
        // 2x2 with (0,0)-(0,1)-(1,1) open
        let mut maze = Maze::closed(2).unwrap();
        maze.open_passage(Coord::new(0, 0), Coord::new(0, 1)).unwrap();
        maze.open_passage(Coord::new(0, 1), Coord::new(1, 1)).unwrap();
        maze
    }

    fn forward() -> TickInput {
        TickInput {
            forward: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_ready_phase_ignores_input() {
        let maze = two_cell_corridor();
        let state = RunState::new();
        let out = tick(&state, &maze, &forward(), DT, &MotionTuning::default());
        assert_eq!(out.state, state);
        assert!(out.events.is_empty());
    }

    #[test]
    fn test_forward_moves_along_heading() {
        let maze = two_cell_corridor();
        let state = RunState::new().start();
        let out = tick(&state, &maze, &forward(), 0.1, &MotionTuning::default());
        assert!((out.state.pose.position.x - 0.6).abs() < 1e-9);
        assert!((out.state.pose.position.y - 0.5).abs() < 1e-9);
        assert!((out.state.elapsed_secs - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_turning_does_not_move() {
        let maze = two_cell_corridor();
        let state = RunState::new().start();
        let input = TickInput {
            turn_right: true,
            ..Default::default()
        };
        let out = tick(&state, &maze, &input, 0.1, &MotionTuning::default());
        assert_eq!(out.state.pose.position, state.pose.position);
        assert!((out.state.pose.heading - TURN_SPEED * 0.1).abs() < 1e-12);

        let both = TickInput {
            turn_left: true,
            turn_right: true,
            forward: true,
            backward: true,
        };
        assert!(both.is_idle());
    }

    #[test]
    fn test_frame_dt_clamps_movement_only() {
        let maze = two_cell_corridor();
        let state = RunState::new().start();
        let out = tick(&state, &maze, &forward(), 5.0, &MotionTuning::default());
        assert!((out.state.elapsed_secs - 5.0).abs() < 1e-12);
        assert!((out.state.pose.position.x - (0.5 + MAX_FRAME_DT)).abs() < 1e-9);

        let out = tick(&state, &maze, &forward(), f64::NAN, &MotionTuning::default());
        assert_eq!(out.state.elapsed_secs, 0.0);
        assert_eq!(out.state.pose, state.pose);

        let out = tick(&state, &maze, &forward(), -1.0, &MotionTuning::default());
        assert_eq!(out.state.elapsed_secs, 0.0);
    }

    #[test]
    fn test_slow_frames_keep_full_run_time() {
        let maze = two_cell_corridor();
        let tuning = MotionTuning::default();
        let mut state = RunState::new().start();
        for _ in 0..10 {
            state = tick(&state, &maze, &TickInput::default(), 1.0, &tuning).state;
        }
        assert_eq!(state.elapsed_ms(), 10_000);
        assert_eq!(state.pose, Pose::start());
    }

    #[test]
    fn test_completion_fires_once() {
        let maze = two_cell_corridor();
        let tuning = MotionTuning::default();
        let mut state = RunState::new().start();
        state.pose = Pose::new(DVec2::new(1.5, 0.9), FRAC_PI_2);
        state.cell = Coord::new(0, 1);

        let out = tick(&state, &maze, &forward(), 0.12, &tuning);
        assert_eq!(
            out.events,
            vec![
                RunEvent::EnteredCell(Coord::new(1, 1)),
                RunEvent::Completed { elapsed_ms: 120 }
            ]
        );
        assert_eq!(out.state.phase, RunPhase::Complete);

        // Still inside the goal: no more events, state frozen
        let again = tick(&out.state, &maze, &forward(), 0.12, &tuning);
        assert!(again.events.is_empty());
        assert_eq!(again.state, out.state);
    }

    #[test]
    fn test_walk_the_corridor_to_the_goal() {
        let maze = two_cell_corridor();
        let tuning = MotionTuning::default();
        let mut state = RunState::new().start();
        let mut completions = 0;

        // East along row 0, then turn to face south and walk into the goal
        for _ in 0..90 {
            let out = tick(&state, &maze, &forward(), DT, &tuning);
            state = out.state;
        }
        assert_eq!(state.cell, Coord::new(0, 1));
        assert!(state.pose.position.x < 2.0);

        state.pose = state.pose.rotated(FRAC_PI_2);
        state.pose.position.x = 1.5;
        for _ in 0..120 {
            let out = tick(&state, &maze, &forward(), DT, &tuning);
            if out.completed() {
                completions += 1;
            }
            state = out.state;
        }
        assert_eq!(completions, 1);
        assert_eq!(state.phase, RunPhase::Complete);
        assert_eq!(state.cell, maze.goal());
    }
}
