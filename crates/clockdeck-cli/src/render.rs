//! Terminal presentation for `watch`.

use std::io::Write;

use clockdeck_core::{AlarmState, DeckView, Event, Renderer};

const CLEAR: &str = "\x1b[2J\x1b[H";
const RESET: &str = "\x1b[0m";
const LIGHT: &str = "\x1b[30;47m";
const DARK: &str = "\x1b[97;40m";
const BAR_WIDTH: usize = 30;

/// Redraws the whole screen on every frame.
pub struct TerminalRenderer<W: Write> {
    out: W,
    ansi: bool,
    /// Last notice shown under the frame until replaced.
    notice: Option<String>,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, ansi: bool) -> Self {
        Self {
            out,
            ansi,
            notice: None,
        }
    }

    pub fn notice(&mut self, text: impl Into<String>) {
        self.notice = Some(text.into());
    }

    /// Turn an event into a notice, if it deserves one.
    pub fn announce(&mut self, event: &Event) {
        let text = match event {
            Event::TimerFinished { .. } => "Timer finished!".to_string(),
            Event::AlarmRinging { .. } => {
                "Alarm is ringing! Type \"cancel\" to stop it.".to_string()
            }
            Event::AlarmCleared { .. } => "Alarm cleared.".to_string(),
            Event::TimezoneChanged { timezone, .. } => format!("Timezone set to {timezone}."),
            Event::AlarmArmed { .. } => "Alarm set.".to_string(),
            _ => return,
        };
        self.notice(text);
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn frame(&self, view: &DeckView) -> String {
        let mut lines = vec![
            format!("{}  {}", view.clock.time, view.clock.timezone),
            format!("{}, {}", view.clock.day, view.clock.date),
            String::new(),
            format!(
                "Stopwatch  {}  {}  {}",
                view.stopwatch.display,
                if view.stopwatch.running { "running" } else { "stopped" },
                view.stopwatch.summary
            ),
            format!("           {}", bar(view.stopwatch.progress)),
        ];
        lines.extend(view.stopwatch.laps.iter().map(|lap| format!("           {lap}")));
        lines.extend([
            format!(
                "Timer      {}  {}  {}%",
                view.timer.display,
                if view.timer.running { "running" } else { "stopped" },
                view.timer.percentage
            ),
            format!("           {}", bar(view.timer.progress)),
        ]);
        let alarm_line = match view.alarm.state {
            AlarmState::Ringing => format!("Alarm      {}  RINGING", view.alarm.display),
            _ => format!(
                "Alarm      {}  {}  {}",
                view.alarm.display, view.alarm.indicator, view.alarm.countdown
            ),
        };
        lines.push(alarm_line);
        lines.push(String::new());
        let presets: Vec<String> = view.presets.iter().map(|m| m.to_string()).collect();
        lines.push(format!("Presets: {}", presets.join(" ")));
        if let Some(notice) = &self.notice {
            lines.push(notice.clone());
        }
        lines.push("> ".to_string());
        lines.join("\n")
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn display(&mut self, view: &DeckView) {
        let frame = self.frame(view);
        let result = if self.ansi {
            let theme = if view.dark_mode { DARK } else { LIGHT };
            write!(self.out, "{CLEAR}{theme}{frame}{RESET}")
        } else {
            writeln!(self.out, "{frame}")
        };
        if let Err(e) = result.and_then(|()| self.out.flush()) {
            tracing::debug!(error = %e, "could not draw frame");
        }
    }
}

fn bar(progress: f64) -> String {
    let filled = (progress.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}
