use std::io::Write;
use std::time::Duration;

use clap::{Args, Subcommand};
use lockin_core::clock::{minutes_to_ms, now_ms};
use lockin_core::display::{format_clock, format_countdown, progress_bar, ProgressBand};
use lockin_core::storage::NotificationsConfig;
use lockin_core::{
    AppState, Coach, Config, ConfigError, Event, LocalCoach, PhaseTimer, SessionInput, TimerConfig,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run a live countdown.
    ///
    /// Commands on stdin: Enter toggles pause, `bg`/`fg` mark the app as
    /// backgrounded/foregrounded, `s` prints the current state. Ctrl-C quits.
    Run {
        #[command(flatten)]
        overrides: Overrides,
        /// Stop after this many phase changes
        #[arg(long)]
        max_phases: Option<u32>,
        /// Print events as JSON lines instead of a status line
        #[arg(long)]
        json: bool,
    },
    /// Replay the phase cycle on a synthetic clock and print every event
    Simulate {
        #[command(flatten)]
        overrides: Overrides,
        /// Number of phase changes to simulate
        #[arg(long, default_value = "8")]
        phases: u32,
    },
}

/// Per-invocation overrides of the configured timer settings.
#[derive(Args, Debug, Default)]
pub struct Overrides {
    /// Work phase length
    #[arg(long)]
    work: Option<u64>,
    /// Short break length
    #[arg(long = "break")]
    short_break: Option<u64>,
    /// Long break length
    #[arg(long)]
    long_break: Option<u64>,
    /// Work sessions per long break
    #[arg(long)]
    cycles: Option<u32>,
    /// Pause after each phase instead of starting the next one
    #[arg(long)]
    no_auto_start: bool,
    /// Read the lengths above as seconds instead of minutes
    #[arg(long)]
    seconds: bool,
}

impl Overrides {
    fn apply(&self, config: &Config) -> Result<TimerConfig, ConfigError> {
        let base = config.timer_config()?;
        let unit_ms = if self.seconds { 1_000 } else { minutes_to_ms(1) };
        let pick = |value: Option<u64>, fallback: u64| {
            value.map(|v| v.saturating_mul(unit_ms)).unwrap_or(fallback)
        };
        Ok(TimerConfig::new(
            pick(self.work, base.work_ms()),
            pick(self.short_break, base.break_ms()),
            pick(self.long_break, base.long_break_ms()),
            self.cycles.unwrap_or(base.cycles_until_long_break()),
        )?
        .with_auto_start_next(base.auto_start_next() && !self.no_auto_start)
        .with_background_policy(base.background_policy()))
    }
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    match action {
        TimerAction::Run {
            overrides,
            max_phases,
            json,
        } => {
            let timer = PhaseTimer::new(overrides.apply(&config)?)?;
            let options = LiveOptions {
                tick_interval: Duration::from_millis(config.timer.tick_interval_ms),
                max_phases,
                json,
                notifications: config.notifications.clone(),
            };
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            let result = runtime.block_on(live_loop(timer, options));
            // A pending stdin read would otherwise hold the runtime open.
            runtime.shutdown_background();
            result
        }
        TimerAction::Simulate { overrides, phases } => {
            let timer = PhaseTimer::new(overrides.apply(&config)?)?;
            simulate(timer, phases)
        }
    }
}

/// Jump the clock to the end of each phase and print what the timer emits.
fn simulate(mut timer: PhaseTimer, phases: u32) -> Result<(), Box<dyn std::error::Error>> {
    let mut out = std::io::stdout().lock();
    let mut now = now_ms();
    let mut changes = 0;

    if let Some(event) = timer.start(now) {
        writeln!(out, "{}", serde_json::to_string(&event)?)?;
    }
    while changes < phases {
        let next = now.saturating_add(timer.remaining_ms());
        if next == now {
            return Err("simulated clock cannot advance past the end of the phase".into());
        }
        now = next;
        for event in timer.tick(now) {
            if event.is_transition() {
                changes += 1;
            }
            writeln!(out, "{}", serde_json::to_string(&event)?)?;
        }
        if !timer.is_running() {
            if let Some(event) = timer.start(now) {
                writeln!(out, "{}", serde_json::to_string(&event)?)?;
            }
        }
    }
    Ok(())
}

struct LiveOptions {
    tick_interval: Duration,
    max_phases: Option<u32>,
    json: bool,
    notifications: NotificationsConfig,
}

async fn live_loop(
    mut timer: PhaseTimer,
    options: LiveOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut interval = tokio::time::interval(options.tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut printer = Printer::new(options.json, options.notifications);
    let mut phase_changes = 0u32;

    if let Some(event) = timer.start(now_ms()) {
        printer.event(&event)?;
    }
    debug!(interval_ms = options.tick_interval.as_millis() as u64, "tick loop started");

    loop {
        tokio::select! {
            _ = interval.tick() => {
                // A backgrounded app gets no ticks; the policy decides what
                // happens to that time on return.
                if timer.app_state() == AppState::Background {
                    continue;
                }
                for event in timer.tick(now_ms()) {
                    printer.event(&event)?;
                    match event {
                        Event::PhaseChanged { .. } => phase_changes += 1,
                        Event::CycleCompleted { .. } => printer.summary(timer.config().work_ms())?,
                        _ => {}
                    }
                }
                if options.max_phases.is_some_and(|max| phase_changes >= max) {
                    break;
                }
                printer.status(&timer)?;
            }
            line = stdin.next_line(), if stdin_open => {
                match line {
                    Ok(Some(line)) => match LiveCommand::parse(&line) {
                        Some(command) => {
                            if let Some(event) = apply_command(&mut timer, command, now_ms()) {
                                printer.event(&event)?;
                            }
                        }
                        None => warn!(input = %line.trim(), "unknown command"),
                    },
                    Ok(None) | Err(_) => stdin_open = false,
                }
            }
            _ = &mut ctrl_c => {
                info!("interrupted");
                break;
            }
        }
    }

    printer.finish()?;
    Ok(())
}

/// Keyboard commands accepted on stdin by `timer run`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LiveCommand {
    Toggle,
    Background,
    Foreground,
    Status,
}

impl LiveCommand {
    fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "" | "p" | "pause" => Some(LiveCommand::Toggle),
            "b" | "bg" | "background" => Some(LiveCommand::Background),
            "f" | "fg" | "foreground" => Some(LiveCommand::Foreground),
            "s" | "status" => Some(LiveCommand::Status),
            _ => None,
        }
    }
}

fn apply_command(timer: &mut PhaseTimer, command: LiveCommand, now: u64) -> Option<Event> {
    match command {
        LiveCommand::Toggle => {
            if timer.is_running() {
                timer.pause(now)
            } else {
                timer.start(now)
            }
        }
        LiveCommand::Background => {
            timer.app_state_changed(AppState::Background, now);
            Some(timer.snapshot(now))
        }
        LiveCommand::Foreground => {
            timer.app_state_changed(AppState::Active, now);
            Some(timer.snapshot(now))
        }
        LiveCommand::Status => Some(timer.snapshot(now)),
    }
}

/// Whole minutes for the session summary, rounding partial minutes up.
fn session_minutes(work_ms: u64) -> u64 {
    work_ms.div_ceil(minutes_to_ms(1))
}

/// Renders timer output either as JSON lines or as a live status line.
struct Printer {
    json: bool,
    notifications: NotificationsConfig,
    status_shown: bool,
}

impl Printer {
    fn new(json: bool, notifications: NotificationsConfig) -> Self {
        Self {
            json,
            notifications,
            status_shown: false,
        }
    }

    fn event(&mut self, event: &Event) -> std::io::Result<()> {
        let mut out = std::io::stdout().lock();
        if self.json {
            let line = serde_json::to_string(event).map_err(std::io::Error::other)?;
            writeln!(out, "{line}")?;
        } else {
            self.clear_status(&mut out)?;
            match event {
                Event::PhaseChanged {
                    phase,
                    cycle,
                    duration_ms,
                    ..
                } if self.notifications.enabled => {
                    writeln!(
                        out,
                        "-> {} (cycle {cycle}, {})",
                        phase.label(),
                        format_countdown(*duration_ms)
                    )?;
                }
                Event::StateSnapshot {
                    phase,
                    cycle,
                    running,
                    remaining_ms,
                    ..
                } => writeln!(
                    out,
                    "{}: {} left, cycle {cycle}{}",
                    phase.label(),
                    format_countdown(*remaining_ms),
                    if *running { "" } else { " (paused)" }
                )?,
                Event::TimerPaused { .. } => writeln!(out, "paused")?,
                Event::TimerStarted { phase, .. } => writeln!(out, "{} running", phase.label())?,
                _ => {}
            }
        }
        if !self.json
            && event.is_transition()
            && self.notifications.enabled
            && self.notifications.haptics
        {
            // Terminal bell stands in for a vibration pulse.
            write!(out, "\x07")?;
        }
        out.flush()
    }

    fn summary(&mut self, work_ms: u64) -> std::io::Result<()> {
        let summary = LocalCoach.summarize_session(&SessionInput {
            duration_minutes: session_minutes(work_ms),
            ..Default::default()
        });
        let mut out = std::io::stdout().lock();
        if self.json {
            let line = serde_json::json!({
                "type": "session_summary",
                "summary": summary.summary,
                "suggestions": summary.suggestions,
            });
            writeln!(out, "{line}")?;
        } else {
            self.clear_status(&mut out)?;
            writeln!(out, "{}", summary.summary)?;
            for suggestion in &summary.suggestions {
                writeln!(out, "  * {suggestion}")?;
            }
        }
        out.flush()
    }

    fn status(&mut self, timer: &PhaseTimer) -> std::io::Result<()> {
        if self.json {
            return Ok(());
        }
        let progress = timer.progress();
        let band = match ProgressBand::from_progress(progress) {
            ProgressBand::Low => ' ',
            ProgressBand::Mid => '~',
            ProgressBand::High => '!',
        };
        let mut out = std::io::stdout().lock();
        write!(
            out,
            "\r{:<12} {} {}{} cycle {}{}{}",
            timer.phase().label(),
            format_clock(timer.remaining_ms()),
            progress_bar(progress, 20),
            band,
            timer.cycle_number(),
            if timer.is_running() { "" } else { " (paused)" },
            if timer.app_state() == AppState::Background { " (background)" } else { "" },
        )?;
        self.status_shown = true;
        out.flush()
    }

    fn clear_status(&mut self, out: &mut impl Write) -> std::io::Result<()> {
        if self.status_shown {
            writeln!(out)?;
            self.status_shown = false;
        }
        Ok(())
    }

    fn finish(&mut self) -> std::io::Result<()> {
        let mut out = std::io::stdout().lock();
        self.clear_status(&mut out)?;
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockin_core::BackgroundPolicy;

    #[test]
    fn overrides_default_to_config() {
        let cfg = Overrides::default().apply(&Config::default()).unwrap();
        assert_eq!(cfg, Config::default().timer_config().unwrap());
    }

    #[test]
    fn overrides_in_seconds() {
        let overrides = Overrides {
            work: Some(3),
            short_break: Some(1),
            seconds: true,
            no_auto_start: true,
            ..Default::default()
        };
        let cfg = overrides.apply(&Config::default()).unwrap();
        assert_eq!(cfg.work_ms(), 3_000);
        assert_eq!(cfg.break_ms(), 1_000);
        assert_eq!(cfg.long_break_ms(), 15 * 60_000);
        assert!(!cfg.auto_start_next());
    }

    #[test]
    fn overrides_reject_overlong_phase() {
        let overrides = Overrides {
            work: Some(u64::MAX),
            seconds: true,
            ..Default::default()
        };
        assert!(overrides.apply(&Config::default()).is_err());
    }

    #[test]
    fn session_minutes_round_up() {
        assert_eq!(session_minutes(1_000), 1);
        assert_eq!(session_minutes(25 * 60_000), 25);
        assert_eq!(session_minutes(25 * 60_000 + 1), 26);
    }

    #[test]
    fn parses_live_commands() {
        assert_eq!(LiveCommand::parse("\n"), Some(LiveCommand::Toggle));
        assert_eq!(LiveCommand::parse(" bg "), Some(LiveCommand::Background));
        assert_eq!(LiveCommand::parse("fg"), Some(LiveCommand::Foreground));
        assert_eq!(LiveCommand::parse("s"), Some(LiveCommand::Status));
        assert_eq!(LiveCommand::parse("quit"), None);
    }

    fn live_timer(policy: BackgroundPolicy) -> PhaseTimer {
        let cfg = Config::default()
            .timer_config()
            .unwrap()
            .with_background_policy(policy);
        PhaseTimer::new(cfg).unwrap()
    }

    #[test]
    fn toggle_starts_and_pauses() {
        let mut timer = live_timer(BackgroundPolicy::Charge);
        let started = apply_command(&mut timer, LiveCommand::Toggle, 0);
        assert!(matches!(started, Some(Event::TimerStarted { .. })));
        let paused = apply_command(&mut timer, LiveCommand::Toggle, 1_000);
        assert!(matches!(paused, Some(Event::TimerPaused { .. })));
        assert!(!timer.is_running());
    }

    #[test]
    fn background_commands_follow_exclude_policy() {
        let mut timer = live_timer(BackgroundPolicy::Exclude);
        apply_command(&mut timer, LiveCommand::Toggle, 0);
        timer.tick(1_000);
        apply_command(&mut timer, LiveCommand::Background, 1_000);
        assert_eq!(timer.app_state(), AppState::Background);
        apply_command(&mut timer, LiveCommand::Foreground, 61_000);
        timer.tick(62_000);
        assert_eq!(timer.remaining_ms(), 25 * 60_000 - 2_000);
    }

    #[test]
    fn background_commands_follow_charge_policy() {
        let mut timer = live_timer(BackgroundPolicy::Charge);
        apply_command(&mut timer, LiveCommand::Toggle, 0);
        timer.tick(1_000);
        apply_command(&mut timer, LiveCommand::Background, 1_000);
        let snapshot = apply_command(&mut timer, LiveCommand::Foreground, 61_000);
        assert!(matches!(snapshot, Some(Event::StateSnapshot { running: true, .. })));
        assert_eq!(timer.app_state(), AppState::Active);
        timer.tick(62_000);
        assert_eq!(timer.remaining_ms(), 25 * 60_000 - 62_000);
    }

    #[test]
    fn overrides_are_validated() {
        let overrides = Overrides {
            cycles: Some(0),
            ..Default::default()
        };
        assert!(overrides.apply(&Config::default()).is_err());
    }
}
