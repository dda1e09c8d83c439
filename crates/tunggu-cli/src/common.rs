//! Shared CLI plumbing: terminal effect implementations and the
//! foreground run loop every timer-running command goes through.

use std::io::Write;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tunggu_core::effects::{Effects, Notifier, SoundKind, SoundPlayer, TitleLabelFn};
use tunggu_core::timer::{Ticker, TICK_PERIOD};
use tunggu_core::util::time::{format_clock, human_duration, parse_clock, ClockFormat};
use tunggu_core::{
    BindOptions, CoreError, HistoryDb, Settings, SettingsHandle, Timer, TimerBinding, TimerMode,
    TimerStore, ValidationError,
};

/// clap value parser for `--duration`-style arguments.
pub fn parse_clock_arg(raw: &str) -> Result<u64, ValidationError> {
    parse_clock(raw).ok_or_else(|| ValidationError::InvalidClock { input: raw.into() })
}

fn read_settings(handle: &SettingsHandle) -> Settings {
    handle
        .read()
        .map(|settings| settings.clone())
        .unwrap_or_default()
}

/// Terminal-bell sound player. The kinds collapse to one or two bells;
/// honors `sound_enabled`.
pub struct TermSound {
    settings: SettingsHandle,
}

impl TermSound {
    pub fn new(settings: SettingsHandle) -> Self {
        Self { settings }
    }
}

impl SoundPlayer for TermSound {
    fn play(&self, kind: SoundKind) {
        if !read_settings(&self.settings).sound_enabled {
            return;
        }
        let bells: &[u8] = match kind {
            SoundKind::TimerComplete | SoundKind::AlertWarning => b"\x07\x07",
            _ => b"\x07",
        };
        let mut out = std::io::stdout();
        let _ = out.write_all(bells);
        let _ = out.flush();
    }
}

/// Desktop notifications plus a live terminal-title ticker, the CLI analog
/// of the browser tab title. All failures are swallowed.
pub struct TermNotifier {
    settings: SettingsHandle,
    title: Mutex<Option<Ticker>>,
}

impl TermNotifier {
    pub fn new(settings: SettingsHandle) -> Self {
        Self {
            settings,
            title: Mutex::new(None),
        }
    }

    fn notifications_enabled(&self) -> bool {
        read_settings(&self.settings).notifications_enabled
    }
}

fn set_terminal_title(text: &str) {
    let mut out = std::io::stdout();
    let _ = write!(out, "\x1b]0;{text}\x07");
    let _ = out.flush();
}

impl Notifier for TermNotifier {
    fn timer_complete(&self, timer_name: &str) {
        if !self.notifications_enabled() {
            return;
        }
        let _ = notify_rust::Notification::new()
            .summary("Timer Complete!")
            .body(&format!("Your {timer_name} timer has finished."))
            .show();
    }

    fn interval_change(&self, from_stage: &str, to_stage: &str) {
        if !self.notifications_enabled() {
            return;
        }
        let _ = notify_rust::Notification::new()
            .summary("Interval Changed")
            .body(&format!("{from_stage} completed. Starting {to_stage}."))
            .show();
    }

    fn start_title_ticker(&self, label: TitleLabelFn, timer_name: &str) {
        self.stop_title_ticker();
        let name = timer_name.to_string();
        let ticker = Ticker::arm(TICK_PERIOD, move || {
            set_terminal_title(&format!("{name} - {}", label()));
            true
        });
        let mut guard = self.title.lock().unwrap_or_else(|e| e.into_inner());
        *guard = Some(ticker);
    }

    fn stop_title_ticker(&self) {
        let mut guard = self.title.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(ticker) = guard.take() {
            ticker.cancel();
            set_terminal_title("tunggu");
        }
    }
}

/// Build the effect bundle over the persisted settings.
pub fn effects() -> Effects {
    let settings = Settings::load_or_default().into_handle();
    Effects::new(
        Arc::new(TermSound::new(Arc::clone(&settings))),
        Arc::new(TermNotifier::new(Arc::clone(&settings))),
        settings,
    )
}

fn render_tick(mode: TimerMode, timer: &Timer) {
    let line = match mode {
        TimerMode::Stopwatch => format!(
            "{}  {}",
            timer.name,
            format_clock(timer.elapsed, ClockFormat::HhMmSs)
        ),
        TimerMode::Countdown => {
            let mut line = format!(
                "{}  {} remaining",
                timer.name,
                format_clock(timer.remaining, ClockFormat::MmSs)
            );
            if let Some(stage) = timer.current_stage() {
                line.push_str(&format!("  [{}]", stage.name));
            }
            line
        }
    };
    let mut out = std::io::stdout();
    let _ = write!(out, "\r\x1b[K{line}");
    let _ = out.flush();
}

fn record_session(timer: &Timer, completed: bool) -> Result<(), CoreError> {
    // Stopwatches have no target length; record what actually ran.
    let duration_secs = if timer.duration > 0 {
        timer.duration
    } else {
        timer.elapsed
    };
    let db = HistoryDb::open()?;
    db.record_session(
        timer.kind.as_slug(),
        &timer.name,
        timer.category.as_str(),
        duration_secs,
        completed,
        timer.started_at.unwrap_or(timer.created_at),
        timer.completed_at.unwrap_or_else(Utc::now),
    )?;
    Ok(())
}

/// Mount a binding, run it until completion or Ctrl-C, record the session,
/// and print a summary (or the final state as JSON).
pub async fn run_foreground(mut options: BindOptions, json: bool) -> Result<(), CoreError> {
    let store = TimerStore::shared();
    let effects = effects();
    let mode = options.mode;

    let done = Arc::new(tokio::sync::Notify::new());
    let completion = Arc::clone(&done);
    options.auto_start = true;
    options.on_complete = Some(Arc::new(move || completion.notify_one()));
    options.on_tick = Some(Arc::new(move |timer: &Timer| render_tick(mode, timer)));

    let binding = TimerBinding::mount(store, effects, options);

    let completed = tokio::select! {
        _ = done.notified() => true,
        _ = tokio::signal::ctrl_c() => false,
    };
    println!();

    if let Some(timer) = binding.snapshot() {
        record_session(&timer, completed)?;
        if json {
            println!("{}", serde_json::to_string_pretty(&timer)?);
        } else if completed {
            println!(
                "{} finished after {}.",
                timer.name,
                human_duration(timer.duration)
            );
        } else {
            println!(
                "{} stopped at {}.",
                timer.name,
                human_duration(timer.elapsed)
            );
        }
    }
    binding.unmount();
    Ok(())
}
