//! The interactive session: plan the backlog, then walk through the day.
//!
//! One loop multiplexes keyboard input with a one-second tick. Input
//! drives the rescheduler and the document is written back after every
//! change; the tick redraws the status line and fires start cues.

use std::error::Error;
use std::path::PathBuf;
use std::time::Duration as StdDuration;

use microday_core::document::{format_clock, format_schedule_line};
use microday_core::{
    Config, CueTracker, DayFile, Loaded, RescheduleOutcome, Rescheduler, Timeline,
};
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::clock;
use crate::display::Painter;
use crate::input::{Input, InputEvent};
use crate::speech::{self, Announcer};

type CmdResult<T = ()> = Result<T, Box<dyn Error>>;

const INSTRUCTIONS: &str = "[enter] advance / [t] insert item / [s] skip this one";

pub fn run(file: Option<PathBuf>) -> CmdResult {
    let config = Config::load_or_default();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(session(config, file))
}

async fn session(config: Config, file: Option<PathBuf>) -> CmdResult {
    let painter = Painter::new(config.ui.colors);
    painter.log(&format!("--- microday {} ---", env!("CARGO_PKG_VERSION")));

    let today = clock::now().date();
    let day_file = DayFile::new(super::day_path(&config, file, today)?);
    let mut input = Input::spawn();

    let timeline = match day_file.open(&config.files.fallbacks, today)? {
        Loaded::Found { timeline, source } => {
            if source != day_file.path() {
                painter.log(&format!("Starting from {}", source.display()));
            }
            timeline
        }
        Loaded::Missing => match create(&painter, &mut input).await {
            Some(timeline) => {
                day_file.save(&timeline)?;
                painter.log(&format!("{} created.", day_file.path().display()));
                timeline
            }
            None => {
                painter.log("Never mind then.");
                return Ok(());
            }
        },
    };

    let mut session = Session::new(&config, timeline, day_file, input);
    match session.plan_backlog().await? {
        Flow::Continue => session.walk().await,
        flow => session.conclude(flow).await,
    }
}

/// Collect backlog entries for a brand new document. `None` when the user
/// interrupts.
async fn create(painter: &Painter, input: &mut Input) -> Option<Timeline> {
    painter.info("No document for today yet. Enter todos, empty line to finish.");
    let mut timeline = Timeline::new();
    loop {
        match input.prompt(&painter.accent_prompt("Todo: ")).await {
            InputEvent::Line(text) if text.is_empty() => break,
            InputEvent::Line(text) => timeline.push_backlog(&text),
            InputEvent::Interrupted => return None,
            InputEvent::Closed => break,
        }
    }
    Some(timeline)
}

/// How a step of the session ended.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    /// Every item is done.
    Done,
    /// Ctrl+C: offer to clear the rest of the day, then save and leave.
    Interrupted,
    /// Stdin closed: save and leave.
    Closed,
}

impl From<InputEvent> for Flow {
    fn from(event: InputEvent) -> Self {
        match event {
            InputEvent::Line(_) => Self::Continue,
            InputEvent::Interrupted => Self::Interrupted,
            InputEvent::Closed => Self::Closed,
        }
    }
}

struct Session {
    timeline: Timeline,
    day_file: DayFile,
    rescheduler: Rescheduler,
    painter: Painter,
    input: Input,
    cues: CueTracker,
    announcer: Box<dyn Announcer>,
    tick_every: StdDuration,
}

enum Wake {
    Input(InputEvent),
    Tick,
}

impl Session {
    fn new(config: &Config, timeline: Timeline, day_file: DayFile, input: Input) -> Self {
        Self {
            timeline: timeline.with_grid(config.schedule.grid_minutes),
            rescheduler: Rescheduler::with_config(config.scheduler()),
            painter: Painter::new(config.ui.colors),
            announcer: speech::announcer(&config.announce),
            cues: CueTracker::new(),
            tick_every: StdDuration::from_millis(config.ui.tick_millis.max(1)),
            day_file,
            input,
        }
    }

    /// Offer to schedule every backlog entry.
    async fn plan_backlog(&mut self) -> CmdResult<Flow> {
        if self.timeline.backlog().is_empty() {
            return Ok(Flow::Continue);
        }

        self.print_document();
        let question = self.painter.accent_prompt("Plan the todos now? [Y/n] ");
        match self.input.prompt(&question).await {
            InputEvent::Line(answer) if is_yes(&answer) => {}
            InputEvent::Line(_) => return Ok(Flow::Continue),
            event => return Ok(event.into()),
        }

        let mut index = 0;
        while index < self.timeline.backlog().len() {
            let entry = &self.timeline.backlog()[index];
            let question = self
                .painter
                .accent_prompt(&format!("Minutes for '{entry}' (empty = later): "));

            match self.input.prompt(&question).await {
                InputEvent::Line(answer) if answer.is_empty() => index += 1,
                InputEvent::Line(answer) => match answer.parse::<u32>() {
                    Ok(minutes) => {
                        let item = self.timeline.assign_duration(
                            index,
                            i64::from(minutes),
                            clock::now(),
                        )?;
                        self.painter.log(&format_schedule_line(item));
                    }
                    Err(_) => self.painter.info("Please enter a number of minutes."),
                },
                event => {
                    println!();
                    return Ok(event.into());
                }
            }
        }

        self.save()?;
        Ok(Flow::Continue)
    }

    /// The main loop.
    async fn walk(&mut self) -> CmdResult {
        self.print_document();

        let remaining = self.timeline.select_starting_point(clock::now());
        if self.timeline.scheduled().is_empty() {
            self.painter.info("Nothing scheduled yet.");
            return Ok(());
        }
        if remaining.is_empty() {
            self.painter.info("All items lie in the past.");
            return Ok(());
        }
        self.painter.log(INSTRUCTIONS);

        let mut ticker = tokio::time::interval(self.tick_every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            let wake = tokio::select! {
                event = self.input.next() => Wake::Input(event),
                _ = ticker.tick() => Wake::Tick,
            };

            let flow = match wake {
                Wake::Tick => {
                    self.tick();
                    Flow::Continue
                }
                Wake::Input(InputEvent::Line(line)) => {
                    println!();
                    let flow = self.handle(&line).await?;
                    // Indices may now name different items.
                    self.cues.reset();
                    flow
                }
                Wake::Input(event) => {
                    println!();
                    event.into()
                }
            };

            if flow != Flow::Continue {
                return self.conclude(flow).await;
            }
        }
    }

    /// Leave the session the way `flow` asks for.
    async fn conclude(&mut self, flow: Flow) -> CmdResult {
        match flow {
            Flow::Continue | Flow::Done => Ok(()),
            Flow::Interrupted => self.wrap_up().await,
            Flow::Closed => self.finish(),
        }
    }

    /// React to a command line.
    async fn handle(&mut self, line: &str) -> CmdResult<Flow> {
        match line {
            "" => self.advance()?,
            "t" => match self.insert().await? {
                Some(Flow::Continue) => {}
                Some(flow) => return Ok(flow),
                None => {
                    self.painter.log(INSTRUCTIONS);
                    return Ok(Flow::Continue);
                }
            },
            "s" => {
                let cursor = self.timeline.cursor();
                if let Some(item) = self.timeline.current() {
                    self.painter.log(&format!("Skipping {}..", item.description));
                }
                self.timeline.demote(cursor)?;
            }
            other => {
                debug!(command = other, "unknown command");
                self.painter.info(INSTRUCTIONS);
                return Ok(Flow::Continue);
            }
        }

        self.save()?;
        self.print_document();
        if self.timeline.is_complete() {
            self.painter.accent("Done!");
            return Ok(Flow::Done);
        }
        self.painter.log(INSTRUCTIONS);
        Ok(Flow::Continue)
    }

    fn advance(&mut self) -> CmdResult {
        self.painter.log("Rescheduling..");
        let outcome = self.rescheduler.reschedule(&mut self.timeline, clock::now())?;

        match &outcome {
            RescheduleOutcome::PlanComplete => self.painter.log("Nothing left to reschedule."),
            RescheduleOutcome::GracePeriod {
                description,
                starts_in,
            } => self.painter.info(&format!(
                "Take a short break, then start {description} in {}.",
                format_clock(*starts_in)
            )),
            RescheduleOutcome::PulledForward { description, .. } => self
                .painter
                .log(&format!("Moving {description} up to now..")),
            RescheduleOutcome::Overrun {
                description,
                actual,
                ..
            } => self.painter.log(&format!(
                "Actual time for {description} was {}..",
                format_clock(*actual)
            )),
            RescheduleOutcome::AlreadyStarted { description } => self
                .painter
                .log(&format!("{description} starts right now.")),
        }

        if outcome.advanced() {
            self.painter.log("Next item..");
        }
        Ok(())
    }

    /// Ask for a new item and put it after the current one, or into the
    /// backlog without a duration. `None` when the user changed their mind.
    async fn insert(&mut self) -> CmdResult<Option<Flow>> {
        let question = self.painter.accent_prompt("New item: ");
        let text = match self.input.prompt(&question).await {
            InputEvent::Line(text) if text.is_empty() => {
                self.painter.log("Never mind then.");
                return Ok(None);
            }
            InputEvent::Line(text) => text,
            event => return Ok(Some(event.into())),
        };

        let question = self.painter.accent_prompt("Minutes (empty = backlog): ");
        loop {
            match self.input.prompt(&question).await {
                InputEvent::Line(answer) if answer.is_empty() => {
                    self.timeline.push_backlog(&text);
                    return Ok(Some(Flow::Continue));
                }
                InputEvent::Line(answer) => match answer.parse::<u32>() {
                    Ok(minutes) => {
                        let cursor = self.timeline.cursor();
                        self.timeline
                            .insert_after(cursor, i64::from(minutes), text)?;
                        return Ok(Some(Flow::Continue));
                    }
                    Err(_) => self.painter.info("Please enter a number of minutes."),
                },
                event => {
                    println!();
                    return Ok(Some(event.into()));
                }
            }
        }
    }

    fn tick(&mut self) {
        let status = self
            .timeline
            .status(clock::now(), self.rescheduler.grace());
        if let Err(e) = self.painter.status_line(&status) {
            warn!(error = %e, "failed to draw status line");
        }

        for (cue, countdown) in self.cues.observe(&status.countdowns()) {
            self.announcer.announce(cue, countdown.description);
        }
    }

    /// Ctrl+C: optionally return what is left of the day to the backlog,
    /// then save and leave.
    async fn wrap_up(&mut self) -> CmdResult {
        let now = clock::now();
        let open = self.timeline.remaining(now);

        if open > 0 {
            let question = self
                .painter
                .accent_prompt(&format!("Put {open} open items back to the backlog? [Y/n] "));
            if let InputEvent::Line(answer) = self.input.prompt(&question).await {
                if is_yes(&answer) {
                    self.timeline.demote_remaining(now);
                }
            }
        }

        self.finish()
    }

    fn finish(&self) -> CmdResult {
        self.save()?;
        self.painter.accent("Bye!");
        Ok(())
    }

    fn save(&self) -> CmdResult {
        self.day_file.save(&self.timeline)?;
        self.painter
            .log(&format!("{} saved.", self.day_file.path().display()));
        Ok(())
    }

    fn print_document(&self) {
        println!();
        print!("{}", self.painter.document(&self.timeline));
        println!();
    }
}

fn is_yes(answer: &str) -> bool {
    answer.is_empty() || answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use microday_core::ScheduledItem;

    fn line(text: &str) -> InputEvent {
        InputEvent::Line(text.into())
    }

    fn quiet_config() -> Config {
        let mut config = Config::default();
        config.ui.colors = false;
        config.announce.enabled = false;
        config
    }

    fn session_with(
        dir: &tempfile::TempDir,
        timeline: Timeline,
        events: Vec<InputEvent>,
    ) -> Session {
        let day_file = DayFile::new(dir.path().join("day.md"));
        Session::new(&quiet_config(), timeline, day_file, Input::scripted(events))
    }

    /// One item starting in an hour, so it is still open whenever the test runs.
    fn later_today() -> Timeline {
        let start = clock::now() + Duration::hours(1);
        Timeline::from_parts(
            Vec::new(),
            vec![ScheduledItem::raw(start, Duration::minutes(30), "Email")],
        )
    }

    #[test]
    fn empty_answer_means_yes() {
        assert!(is_yes(""));
        assert!(is_yes("Y"));
        assert!(is_yes("yes"));
        assert!(!is_yes("n"));
        assert!(!is_yes("nope"));
    }

    #[tokio::test]
    async fn interrupt_while_planning_ends_the_session() {
        let dir = tempfile::tempdir().unwrap();
        let timeline = Timeline::from_parts(vec!["Email".into(), "Report".into()], Vec::new());
        let mut session = session_with(
            &dir,
            timeline,
            vec![line(""), line("15"), InputEvent::Interrupted],
        );

        let flow = session.plan_backlog().await.unwrap();
        assert_eq!(flow, Flow::Interrupted);
        assert_eq!(session.timeline.scheduled().len(), 1);
        assert_eq!(session.timeline.backlog(), ["Report".to_string()]);
    }

    #[tokio::test]
    async fn closed_stdin_while_planning_ends_the_session() {
        let dir = tempfile::tempdir().unwrap();
        let timeline = Timeline::from_parts(vec!["Email".into()], Vec::new());
        let mut session = session_with(&dir, timeline, vec![line("y")]);

        assert_eq!(session.plan_backlog().await.unwrap(), Flow::Closed);
    }

    #[tokio::test]
    async fn interrupt_while_inserting_saves_and_leaves() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_with(
            &dir,
            later_today(),
            vec![line("t"), line("Call"), InputEvent::Interrupted, line("n")],
        );

        session.walk().await.unwrap();

        assert_eq!(session.timeline.scheduled().len(), 1);
        let saved = std::fs::read_to_string(dir.path().join("day.md")).unwrap();
        assert!(saved.contains("Email"));
        assert!(!saved.contains("Call"));
    }

    #[tokio::test]
    async fn interrupt_offers_to_clear_the_day() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_with(
            &dir,
            later_today(),
            vec![InputEvent::Interrupted, line("y")],
        );

        session.walk().await.unwrap();

        assert!(session.timeline.scheduled().is_empty());
        assert_eq!(session.timeline.backlog(), ["Email".to_string()]);
        let saved = std::fs::read_to_string(dir.path().join("day.md")).unwrap();
        assert_eq!(saved, "# Todos\n\n- Email\n");
    }

    #[tokio::test]
    async fn inserted_item_is_saved() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_with(&dir, later_today(), vec![line("t"), line("Call"), line("10")]);

        session.walk().await.unwrap();

        let saved = std::fs::read_to_string(dir.path().join("day.md")).unwrap();
        assert!(saved.contains("0:10h Call"));
    }
}
