//! Colorful console output for solution events.
//!
//! Provides a `tracing` layer that formats the structured events emitted by
//! solutions (creation, copies, transactions, monitor attachment) with colors.
//!
//! ## Log Levels
//!
//! - **INFO**: solution lifecycle (created, event meets made, copied)
//! - **DEBUG**: transactions and monitor attachment
//! - **TRACE**: individual edits and refused edits

use std::io::{self, Write};
use std::sync::OnceLock;
use std::time::Instant;

use owo_colors::OwoColorize;
use tracing::field::{Field, Visit};
use tracing::level_filters::LevelFilter;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initializes console output.
///
/// Safe to call multiple times - only the first call has effect. Honors
/// `RUST_LOG`, defaulting to INFO.
pub fn init() {
    INIT.get_or_init(|| {
        EPOCH.get_or_init(Instant::now);
        print_banner();

        let filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::INFO.into())
            .from_env_lossy();

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(SolutionConsoleLayer)
            .try_init();
    });
}

fn print_banner() {
    let mut stdout = io::stdout().lock();
    let _ = writeln!(
        stdout,
        "{} {}",
        "timeforge".bright_cyan().bold(),
        format!("v{}", VERSION).bright_white()
    );
    let _ = stdout.flush();
}

/// A tracing layer that formats solution events with colors.
pub struct SolutionConsoleLayer;

impl<S: Subscriber> Layer<S> for SolutionConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !metadata.target().starts_with("timeforge") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor, *metadata.level());
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    instance: Option<String>,
    cost: Option<String>,
    tag: Option<String>,
    op: Option<String>,
    error: Option<String>,
    meet: Option<String>,
    monitor: Option<String>,
    transaction: Option<String>,
    times: Option<u64>,
    meets: Option<u64>,
    tasks: Option<u64>,
    monitors: Option<u64>,
    operations: Option<u64>,
}

impl EventVisitor {
    fn set_str(&mut self, name: &str, s: String) {
        match name {
            "event" => self.event = Some(s),
            "instance" => self.instance = Some(s),
            "cost" => self.cost = Some(s),
            "tag" => self.tag = Some(s),
            "op" => self.op = Some(s),
            "error" => self.error = Some(s),
            "meet" => self.meet = Some(s),
            "monitor" => self.monitor = Some(s),
            "transaction" => self.transaction = Some(s),
            _ => {}
        }
    }
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        self.set_str(field.name(), s.trim_matches('"').to_string());
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.set_str(field.name(), value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "times" => self.times = Some(value),
            "meets" => self.meets = Some(value),
            "tasks" => self.tasks = Some(value),
            "monitors" => self.monitors = Some(value),
            "operations" => self.operations = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }
}

fn format_event(v: &EventVisitor, level: Level) -> String {
    let body = match v.event.as_deref().unwrap_or("") {
        "solution_created" => format!(
            "solution for {} created: times ({}), monitors ({})",
            v.instance.as_deref().unwrap_or("?").white().bold(),
            v.times.unwrap_or(0).yellow(),
            v.monitors.unwrap_or(0).yellow()
        ),
        "event_meets_made" => format!(
            "event meets made: meets ({}), tasks ({}), cost ({})",
            v.meets.unwrap_or(0).yellow(),
            v.tasks.unwrap_or(0).yellow(),
            format_cost(v.cost.as_deref().unwrap_or("N/A"))
        ),
        "solution_copied" => format!(
            "solution copied: meets ({}), tasks ({}), monitors ({})",
            v.meets.unwrap_or(0).yellow(),
            v.tasks.unwrap_or(0).yellow(),
            v.monitors.unwrap_or(0).yellow()
        ),
        e @ ("transaction_undo" | "transaction_redo" | "transaction_end") => format!(
            "{} {}: operations ({})",
            e.trim_start_matches("transaction_"),
            v.transaction.as_deref().unwrap_or("?").bright_blue(),
            v.operations.unwrap_or(0).yellow()
        ),
        e @ ("monitor_attached" | "monitor_detached") => format!(
            "{} {} {}",
            v.tag.as_deref().unwrap_or("?").white().bold(),
            v.monitor.as_deref().unwrap_or("?").bright_blue(),
            e.trim_start_matches("monitor_")
        ),
        "edit_rejected" => format!(
            "{} refused: {}",
            v.op.as_deref().unwrap_or("?").white().bold(),
            v.error.as_deref().unwrap_or("").bright_red()
        ),
        _ => return String::new(),
    };

    format!(
        "{} {} {} {}",
        timestamp().bright_black(),
        format_level(level),
        "[Solution]".bright_cyan(),
        body
    )
}

fn format_level(level: Level) -> String {
    match level {
        Level::ERROR => "ERROR".bright_red().to_string(),
        Level::WARN => " WARN".yellow().to_string(),
        Level::INFO => " INFO".bright_green().to_string(),
        Level::DEBUG => "DEBUG".bright_blue().to_string(),
        Level::TRACE => "TRACE".bright_black().to_string(),
    }
}

fn timestamp() -> String {
    let secs = EPOCH.get().map_or(0.0, |e| e.elapsed().as_secs_f64());
    format!("{:9.3}", secs)
}

/// Colors a cost like `3hard/12soft`: red while infeasible, yellow soft.
fn format_cost(cost: &str) -> String {
    let Some((hard, soft)) = cost.split_once('/') else {
        return cost.white().to_string();
    };
    let hard_num: i64 = hard.trim_end_matches("hard").parse().unwrap_or(0);
    let soft_num: i64 = soft.trim_end_matches("soft").parse().unwrap_or(0);

    let hard_str = if hard_num > 0 {
        hard.bright_red().to_string()
    } else {
        hard.bright_green().to_string()
    };
    let soft_str = if soft_num > 0 {
        soft.yellow().to_string()
    } else {
        soft.bright_green().to_string()
    };
    format!("{}/{}", hard_str, soft_str)
}
