use chrono::NaiveDate;
use polars::prelude::{DataFrame, PolarsResult};
use station_roadmap::frame::{
    critical_path_frame, delays_frame, milestone_hits_frame, render_text_table,
    station_summary_frame,
};
use station_roadmap::layout::RowKind;
use station_roadmap::persistence::{
    load_dataset_from_json_with, load_layout_config, save_bars_to_csv, save_critical_path_to_csv,
    save_delays_to_csv, save_layout_config, save_layout_to_json, save_milestones_to_csv,
};
use station_roadmap::{
    Clock, Dataset, FixedClock, LayoutConfig, LoadOptions, SystemClock, TimelineLayout,
    build_layout, check_delays, critical_path, format_date, milestones_in_range, parse_date,
    station_status,
};
use std::io::{self, Write};

const DEFAULT_TOP: usize = 5;

struct Session {
    dataset: Option<Dataset>,
    config: LayoutConfig,
    clock: Box<dyn Clock>,
}

impl Session {
    fn dataset(&self) -> Option<&Dataset> {
        if self.dataset.is_none() {
            println!("No dataset loaded. Use: load <path>");
        }
        self.dataset.as_ref()
    }

    fn load(&mut self, path: &str, strict: bool) {
        let options = LoadOptions {
            strict_top_level: strict,
            ..LoadOptions::default()
        };
        match load_dataset_from_json_with(path, &options) {
            Ok(dataset) => {
                println!(
                    "Dataset loaded from {path} ({} stations, {} portions, {} stages, {} milestones).",
                    dataset.stations().len(),
                    dataset.all_portions().len(),
                    dataset.stage_count(),
                    dataset.milestone_count()
                );
                self.dataset = Some(dataset);
            }
            Err(e) => println!("Error loading dataset: {}", e),
        }
    }

    /// Reference date from an optional argument, else the session clock.
    fn reference_date(&self, arg: Option<&str>) -> Option<NaiveDate> {
        match arg {
            Some(s) => match parse_date(s) {
                Ok(d) => Some(d),
                Err(e) => {
                    println!("{}", e);
                    None
                }
            },
            None => Some(self.clock.today()),
        }
    }

    fn layout(&self, arg: Option<&str>) -> Option<TimelineLayout> {
        let dataset = self.dataset()?;
        let now = self.reference_date(arg)?;
        Some(build_layout(dataset, &self.config, now))
    }
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  load <path> [strict]               Load a roadmap JSON file\n  stations                           List stations\n  portions                           List (station, portion) pairs\n  status <station...>                Progress summary for one station\n  milestones <start> <end>           Milestones in an inclusive date range\n  delays [YYYY-MM-DD]                Overdue stages (default: today)\n  critical [n]                       Longest stages (default: top 5)\n  layout [YYYY-MM-DD]                Show timeline rows, span and legend\n  today [YYYY-MM-DD]                 Show or pin the session date\n  export layout <path> [date]        Save the timeline layout as JSON\n  export bars <path> [date]          Save stage bars as CSV\n  export delays <path> [date]        Save overdue stages as CSV\n  export critical <path>             Save the duration ranking as CSV\n  export milestones <start> <end> <path>\n                                     Save milestones in range as CSV\n  config show                        Show layout configuration\n  config set <json_path>             Load layout configuration from JSON\n  config save <json_path>            Save layout configuration to JSON\n  quit|exit                          Exit"
    );
}

fn print_table(frame: PolarsResult<DataFrame>) {
    match frame {
        Ok(df) => println!("{}", render_text_table(&df)),
        Err(e) => println!("Error building table: {}", e),
    }
}

fn print_layout(layout: &TimelineLayout) {
    for row in &layout.rows {
        let bars = layout.bars_on_row(row.index).count();
        let markers = layout.markers_on_row(row.index).count();
        match row.kind {
            RowKind::StationHeader => println!("{:>6.1} {}", row.position, row.label),
            RowKind::Portion => println!(
                "{:>6.1} {:<40} bars={} milestones={}",
                row.position, row.label, bars, markers
            ),
        }
    }
    match layout.span {
        Some(span) => println!(
            "Span: {} .. {} ({} days)",
            format_date(span.start),
            format_date(span.end),
            span.days()
        ),
        None => println!("Span: (no stages)"),
    }
    let legend = layout
        .legend
        .iter()
        .map(|entry| format!("{}={}", entry.label, entry.color))
        .collect::<Vec<_>>()
        .join(", ");
    println!("Legend: {}", legend);
    match &layout.now_marker {
        Some(marker) => println!("{}: {}", marker.label, format_date(marker.date)),
        None => println!("Now marker outside span (omitted)."),
    }
    println!(
        "Chart: {}x{} px, extent {:.1} rows",
        layout.geometry.width, layout.geometry.height, layout.extent
    );
}

fn report_export<E: std::fmt::Display>(result: Result<(), E>, path: &str) {
    match result {
        Ok(()) => println!("Exported to {path}."),
        Err(e) => println!("Export error: {}", e),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let mut session = Session {
        dataset: None,
        config: LayoutConfig::default(),
        clock: Box::new(SystemClock),
    };

    println!("Station Roadmap (CLI) - type 'help' for commands\n");
    if let Some(path) = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("ROADMAP_DATA").ok())
    {
        session.load(&path, false);
    }

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "load" => match parts.next() {
                Some(path) => {
                    let strict = parts.next() == Some("strict");
                    session.load(path, strict);
                }
                None => println!("Usage: load <path> [strict]"),
            },
            "stations" => {
                if let Some(dataset) = session.dataset() {
                    for station in dataset.stations() {
                        println!("  {} ({} portions)", station.name, station.portions.len());
                    }
                }
            }
            "portions" => {
                if let Some(dataset) = session.dataset() {
                    for (station, portion) in dataset.all_portions() {
                        println!("  {station} / {portion}");
                    }
                }
            }
            "status" => {
                let name = parts.collect::<Vec<_>>().join(" ");
                if name.is_empty() {
                    println!("Usage: status <station...>");
                    continue;
                }
                if let Some(dataset) = session.dataset() {
                    match station_status(dataset, &name) {
                        Ok(summary) => {
                            println!(
                                "{}: overall progress {:.1}% ({}/{} stages completed)",
                                summary.station,
                                summary.overall_progress,
                                summary.completed_stages,
                                summary.total_stages
                            );
                            for portion in &summary.portions {
                                println!("  {}: {:.1}%", portion.portion, portion.progress);
                            }
                            print_table(station_summary_frame(&summary));
                        }
                        Err(e) => println!("Error: {}", e),
                    }
                }
            }
            "milestones" => match (parts.next(), parts.next()) {
                (Some(start_s), Some(end_s)) => {
                    let (start, end) = match (parse_date(start_s), parse_date(end_s)) {
                        (Ok(start), Ok(end)) => (start, end),
                        (Err(e), _) | (_, Err(e)) => {
                            println!("{}", e);
                            continue;
                        }
                    };
                    if let Some(dataset) = session.dataset() {
                        let hits = milestones_in_range(dataset, start, end);
                        println!("{} milestone(s) between {start} and {end}:", hits.len());
                        print_table(milestone_hits_frame(&hits));
                    }
                }
                _ => println!("Usage: milestones <YYYY-MM-DD> <YYYY-MM-DD>"),
            },
            "delays" => {
                let Some(reference) = session.reference_date(parts.next()) else {
                    continue;
                };
                if let Some(dataset) = session.dataset() {
                    let delays = check_delays(dataset, reference);
                    if delays.is_empty() {
                        println!("No delays detected as of {reference}.");
                    } else {
                        println!("{} delayed stage(s) as of {reference}:", delays.len());
                        print_table(delays_frame(&delays));
                    }
                }
            }
            "critical" => {
                let top = match parts.next().map(str::parse::<usize>) {
                    None => DEFAULT_TOP,
                    Some(Ok(n)) => n,
                    Some(Err(_)) => {
                        println!("Invalid count");
                        continue;
                    }
                };
                if let Some(dataset) = session.dataset() {
                    let mut ranked = critical_path(dataset);
                    ranked.truncate(top);
                    print_table(critical_path_frame(&ranked));
                }
            }
            "layout" => {
                if let Some(layout) = session.layout(parts.next()) {
                    print_layout(&layout);
                }
            }
            "today" => match parts.next() {
                Some(date_s) => match parse_date(date_s) {
                    Ok(date) => {
                        session.clock = Box::new(FixedClock(date));
                        println!("Session date pinned to {date}.");
                    }
                    Err(e) => println!("{}", e),
                },
                None => println!("Today: {}", format_date(session.clock.today())),
            },
            "export" => {
                let kind = parts.next();
                match kind {
                    Some("layout") | Some("bars") => {
                        let Some(path) = parts.next() else {
                            println!("Usage: export {} <path> [date]", kind.unwrap_or(""));
                            continue;
                        };
                        if let Some(layout) = session.layout(parts.next()) {
                            let result = if kind == Some("layout") {
                                save_layout_to_json(&layout, path)
                            } else {
                                save_bars_to_csv(&layout, path)
                            };
                            report_export(result, path);
                        }
                    }
                    Some("delays") => {
                        let Some(path) = parts.next() else {
                            println!("Usage: export delays <path> [date]");
                            continue;
                        };
                        let Some(reference) = session.reference_date(parts.next()) else {
                            continue;
                        };
                        if let Some(dataset) = session.dataset() {
                            let delays = check_delays(dataset, reference);
                            report_export(save_delays_to_csv(&delays, path), path);
                        }
                    }
                    Some("critical") => {
                        let Some(path) = parts.next() else {
                            println!("Usage: export critical <path>");
                            continue;
                        };
                        if let Some(dataset) = session.dataset() {
                            let ranked = critical_path(dataset);
                            report_export(save_critical_path_to_csv(&ranked, path), path);
                        }
                    }
                    Some("milestones") => match (parts.next(), parts.next(), parts.next()) {
                        (Some(start_s), Some(end_s), Some(path)) => {
                            let (start, end) = match (parse_date(start_s), parse_date(end_s)) {
                                (Ok(start), Ok(end)) => (start, end),
                                (Err(e), _) | (_, Err(e)) => {
                                    println!("{}", e);
                                    continue;
                                }
                            };
                            if let Some(dataset) = session.dataset() {
                                let hits = milestones_in_range(dataset, start, end);
                                report_export(save_milestones_to_csv(&hits, path), path);
                            }
                        }
                        _ => println!("Usage: export milestones <start> <end> <path>"),
                    },
                    _ => println!("Usage: export <layout|bars|delays|critical|milestones> ..."),
                }
            }
            "config" => match (parts.next(), parts.next()) {
                (Some("show"), _) => match serde_json::to_string_pretty(&session.config) {
                    Ok(text) => println!("{}", text),
                    Err(e) => println!("Error: {}", e),
                },
                (Some("set"), Some(path)) => match load_layout_config(path) {
                    Ok(config) => {
                        session.config = config;
                        println!("Layout configuration loaded from {path}.");
                    }
                    Err(e) => println!("Error loading configuration: {}", e),
                },
                (Some("save"), Some(path)) => {
                    report_export(save_layout_config(&session.config, path), path)
                }
                _ => println!("Usage: config <show|set <json_path>|save <json_path>>"),
            },
            _ => println!("Unknown command. Type 'help'."),
        }
    }
}
