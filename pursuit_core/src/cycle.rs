//! Deterministic control cycle: poll → clock → target → force → integrate
//! → task update → emit.
//!
//! The runner paces itself on absolute deadlines from a monotonic clock
//! and busy-waits across the remainder of each period, since OS sleep is
//! too coarse at a 1 ms period. All runtime state is pre-allocated; the
//! tick body performs no heap allocation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use pursuit_common::config::{ExperimentConfig, OperatorKind};
use pursuit_common::protocol::TaskState;
use pursuit_common::types::TaskType;

use crate::emitter::{EmitterStats, StateEmitter};
use crate::error::CoreError;
use crate::operator::{AutoPdOperator, KeyboardOperator, OperatorDevice};
use crate::plant::step_rk4;
use crate::state::ExperimentState;
use crate::task::{Task, TaskMetrics};

/// Tick-duration budget before a tick counts as an overrun [µs]
/// (≈ 0.9 · dt at the nominal 1 kHz rate).
pub const OVERRUN_BUDGET_US: u64 = 900;

/// Capacity of the per-tick timing buffer; ticks past this still advance
/// the max/overrun counters but are no longer individually retained.
pub const TIMING_BUFFER_CAP: usize = 10_000;

/// O(1) per-tick timing statistics.
#[derive(Debug)]
pub struct CycleStats {
    /// Ticks executed.
    pub tick_count: u64,
    /// Maximum tick duration [µs].
    pub max_tick_us: u64,
    /// Ticks exceeding [`OVERRUN_BUDGET_US`].
    pub overruns: u64,
    /// Durations of the first [`TIMING_BUFFER_CAP`] ticks [µs].
    pub tick_us: Vec<u64>,
}

impl CycleStats {
    pub fn new() -> Self {
        Self {
            tick_count: 0,
            max_tick_us: 0,
            overruns: 0,
            tick_us: Vec::with_capacity(TIMING_BUFFER_CAP),
        }
    }

    /// Record one tick duration. O(1), no allocation (the buffer is
    /// pre-sized and bounded).
    #[inline]
    pub fn record(&mut self, duration_us: u64) {
        self.tick_count += 1;
        if duration_us > self.max_tick_us {
            self.max_tick_us = duration_us;
        }
        if duration_us > OVERRUN_BUDGET_US {
            self.overruns += 1;
        }
        if self.tick_us.len() < TIMING_BUFFER_CAP {
            self.tick_us.push(duration_us);
        }
    }

    /// Mean over the retained buffer [µs] (0 if empty).
    pub fn avg_tick_us(&self) -> u64 {
        if self.tick_us.is_empty() {
            0
        } else {
            self.tick_us.iter().sum::<u64>() / self.tick_us.len() as u64
        }
    }
}

impl Default for CycleStats {
    fn default() -> Self {
        Self::new()
    }
}

/// The period-accurate control loop.
///
/// Owns every per-run component: experiment state, task, operator,
/// emitter, and timing counters. `run` blocks for the requested duration;
/// `step` executes exactly one tick and is the unit the tests drive.
pub struct CycleRunner {
    config: ExperimentConfig,
    dt: f64,
    period: Duration,
    state: ExperimentState,
    task: Task,
    operator: OperatorDevice,
    emitter: Option<StateEmitter>,
    stats: CycleStats,
    running: Arc<AtomicBool>,
}

impl CycleRunner {
    /// Build a runner: binds the emitter (and the keyboard port when the
    /// keyboard operator is configured). Socket failures here are fatal.
    pub fn new(config: ExperimentConfig, task_type: TaskType) -> Result<Self, CoreError> {
        config.validate()?;

        let emitter = StateEmitter::new(&config.viewer_dest())?;
        let operator = match config.operator {
            OperatorKind::AutoPd => {
                let pd = match config.seed {
                    Some(seed) => AutoPdOperator::with_seed(
                        crate::operator::auto_pd::DEFAULT_KP,
                        crate::operator::auto_pd::DEFAULT_KD,
                        crate::operator::auto_pd::DEFAULT_SIGMA,
                        seed,
                    ),
                    None => AutoPdOperator::with_defaults(),
                };
                OperatorDevice::AutoPd(pd)
            }
            OperatorKind::Keyboard => {
                OperatorDevice::Keyboard(KeyboardOperator::bind(config.keyboard_port)?)
            }
        };

        let task = Task::new(task_type, config.seed);
        let dt = config.dt();
        let mut state = ExperimentState::new();
        state.trial_number = 1;

        Ok(Self {
            period: Duration::from_secs_f64(dt),
            dt,
            config,
            state,
            task,
            operator,
            emitter: Some(emitter),
            stats: CycleStats::new(),
            running: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Replace the operator (primarily for tests and for injecting a
    /// custom-tuned PD).
    pub fn set_operator(&mut self, operator: OperatorDevice) {
        self.operator = operator;
    }

    /// Shared run flag for signal handlers: storing `false` stops the
    /// loop at the head of the next iteration.
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    /// Request the loop to stop.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        self.state.running = false;
    }

    /// Re-create the task. The experiment state is cleared and the trial
    /// number advances. Setting the same type twice is equivalent to
    /// setting it once.
    pub fn set_task(&mut self, task_type: TaskType) {
        let trial = self.state.trial_number;
        self.task = Task::new(task_type, self.config.seed);
        self.state.reset();
        self.state.trial_number = trial + 1;
    }

    /// Experiment state snapshot.
    pub fn state(&self) -> &ExperimentState {
        &self.state
    }

    /// Timing counters.
    pub fn stats(&self) -> &CycleStats {
        &self.stats
    }

    /// Emitter counters, if the emitter is still open.
    pub fn emitter_stats(&self) -> Option<EmitterStats> {
        self.emitter.as_ref().map(|e| e.stats())
    }

    /// Task metrics snapshot.
    pub fn task_metrics(&self) -> TaskMetrics {
        self.task.metrics()
    }

    /// Current task state.
    pub fn task_state(&self) -> TaskState {
        self.task.state()
    }

    /// Execute exactly one tick.
    pub fn step(&mut self) {
        let tick_start = Instant::now();

        // 1. Drain external input before anything reads the operator.
        self.operator.poll();

        // 2. Clock and counter. The first step establishes the monotonic
        //    reference; emitted timestamps are µs since that instant.
        let start = *self.state.start.get_or_insert(tick_start);
        self.state.elapsed_us = start.elapsed().as_micros() as u64;
        self.state.loop_count += 1;

        // 3. Simulation time drives the reference signals: wall-clock
        //    jitter must not leak into the target trajectory.
        let tau = (self.state.loop_count - 1) as f64 * self.dt;

        // 4. Reference.
        let (tx, ty) = self.task.target(tau);
        self.state.target = (tx, ty);

        // 5. Force and integration. A task that owns its plant supplies
        //    the cursor itself; otherwise the default second-order plant
        //    advances under RK4.
        self.operator.set_target(tx, ty);
        if let Some(shadow) = self.task.own_plant() {
            let input = self.operator.compute_input(&shadow);
            self.state.plant = self.task.drive_own_plant(input, self.dt);
            self.state.last_input = input;
        } else {
            let input = self.operator.compute_input(&self.state.plant);
            self.state.plant = step_rk4(
                &self.state.plant,
                &self.config.plant_x,
                &self.config.plant_y,
                input,
                self.dt,
            );
            self.state.last_input = input;
        }

        // 6. Task bookkeeping.
        self.state.task_state = self.task.update(&self.state.plant, self.dt);

        // 7. Emit. Transport failures are counted inside the emitter.
        if let Some(emitter) = self.emitter.as_mut() {
            let frame = self.state.to_frame();
            emitter.send(&frame);
        }

        // 8. Timing.
        self.stats
            .record(tick_start.elapsed().as_micros() as u64);
    }

    /// Run the loop for up to `duration_s` seconds of simulation time.
    ///
    /// Exits when the running flag clears (stop() or a signal handler),
    /// the duration is reached, or the task reaches a terminal state. On
    /// exit a still-Running task is promoted to Completed.
    pub fn run(&mut self, duration_s: f64) {
        self.running.store(true, Ordering::SeqCst);
        self.state.running = true;

        let run_start = Instant::now();
        let mut deadline = run_start;

        while self.running.load(Ordering::SeqCst) {
            if self.state.loop_count as f64 * self.dt >= duration_s {
                break;
            }

            deadline += self.period;
            self.step();

            if self.task.is_complete() {
                break;
            }

            // Spin until the next cycle boundary (absolute time).
            while Instant::now() < deadline {
                std::hint::spin_loop();
            }
        }

        self.running.store(false, Ordering::SeqCst);
        self.state.running = false;

        if self.state.task_state == TaskState::Running {
            self.state.task_state = TaskState::Completed;
        }

        self.report();
    }

    /// Release the emitter socket. Further steps still run but no longer
    /// emit.
    pub fn close(&mut self) {
        self.emitter = None;
    }

    fn report(&self) {
        info!(
            ticks = self.stats.tick_count,
            max_tick_us = self.stats.max_tick_us,
            avg_tick_us = self.stats.avg_tick_us(),
            overruns = self.stats.overruns,
            "cycle stats"
        );
        if self.stats.overruns > 0 {
            warn!(
                overruns = self.stats.overruns,
                budget_us = OVERRUN_BUDGET_US,
                "tick budget exceeded"
            );
        }
        if let Some(stats) = self.emitter_stats() {
            info!(
                sends = stats.send_count,
                errors = stats.error_count,
                error_rate = stats.error_rate,
                "emitter stats"
            );
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
