//! ANSI-coloured terminal output.

use std::io::{self, Write};

use chrono::{DateTime, Local};

use crate::domain::{Arrival, Disruption, LineStatus, Station};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const WHITE: &str = "\x1b[37m";
const GRAY: &str = "\x1b[90m";

/// Badge colours (background + foreground) for lines with a brand colour.
const LINE_COLOURS: &[(&str, &str)] = &[
    ("bakerloo", "\x1b[48;2;178;99;0m\x1b[97m"),
    ("central", "\x1b[48;2;220;36;31m\x1b[97m"),
    ("circle", "\x1b[48;2;255;211;0m\x1b[30m"),
    ("district", "\x1b[48;2;0;125;50m\x1b[97m"),
    ("hammersmith-city", "\x1b[48;2;244;169;190m\x1b[30m"),
    ("jubilee", "\x1b[48;2;161;165;167m\x1b[30m"),
    ("metropolitan", "\x1b[48;2;155;0;88m\x1b[97m"),
    ("northern", "\x1b[48;2;0;0;0m\x1b[97m"),
    ("piccadilly", "\x1b[48;2;0;54;136m\x1b[97m"),
    ("victoria", "\x1b[48;2;0;160;226m\x1b[97m"),
    ("waterloo-city", "\x1b[48;2;147;206;186m\x1b[30m"),
    ("elizabeth", "\x1b[48;2;107;63;160m\x1b[97m"),
    ("dlr", "\x1b[48;2;0;175;173m\x1b[97m"),
    ("london-overground", "\x1b[48;2;239;123;16m\x1b[30m"),
];

const DEFAULT_LINE_COLOUR: &str = "\x1b[48;2;100;100;100m\x1b[97m";

const LINE_NAME_WIDTH: usize = 14;
const STATUS_WRAP: usize = 60;
const DISRUPTION_WRAP: usize = 70;

pub fn line_colour(line_id: &str) -> &'static str {
    LINE_COLOURS
        .iter()
        .find(|(id, _)| *id == line_id)
        .map(|(_, colour)| *colour)
        .unwrap_or(DEFAULT_LINE_COLOUR)
}

/// Colour for a status severity: 10 is good, 6-9 minor, anything else bad.
pub fn status_colour(severity: i32) -> &'static str {
    match severity {
        10 => GREEN,
        6..=9 => YELLOW,
        _ => RED,
    }
}

/// Line name as a fixed-width badge label.
///
/// Names longer than the badge are cut and marked with "..".
pub fn format_line_name(name: &str) -> String {
    if name.chars().count() > LINE_NAME_WIDTH {
        let cut: String = name.chars().take(LINE_NAME_WIDTH - 2).collect();
        format!(" {cut}.. ")
    } else {
        format!(" {name:<LINE_NAME_WIDTH$} ")
    }
}

/// Time until departure in words: "Due", "1 min", "12 mins", "2h", "1h 5m".
pub fn relative_time(minutes: i64) -> String {
    match minutes {
        m if m <= 0 => "Due".to_string(),
        1 => "1 min".to_string(),
        m if m < 60 => format!("{m} mins"),
        m if m % 60 == 0 => format!("{}h", m / 60),
        m => format!("{}h {}m", m / 60, m % 60),
    }
}

/// Greedy word wrap. Words longer than `width` get a line of their own.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.chars().count() + 1 + word.chars().count() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn clock(t: &DateTime<Local>) -> String {
    t.format("%H:%M").to_string()
}

pub fn print_arrivals(out: &mut impl Write, arrivals: &[Arrival], station: &str) -> io::Result<()> {
    writeln!(out)?;

    if arrivals.is_empty() {
        writeln!(out, "{YELLOW}No arrivals found for {station}{RESET}")?;
        return writeln!(out);
    }

    writeln!(out, "{BOLD}{WHITE} Departures from {station} {RESET}")?;
    writeln!(out)?;

    for arrival in arrivals {
        let minutes = arrival.minutes_away();
        let label = format!("{:<8}", relative_time(minutes));
        let when = match minutes {
            m if m <= 0 => format!("{GREEN}{BOLD}{label}{RESET}"),
            1 => format!("{GREEN}{label}{RESET}"),
            _ => label,
        };

        writeln!(
            out,
            "{}{}{RESET}  {CYAN}{}{RESET}  {when}  {BOLD}{:<28}{RESET}  {GRAY}{}{RESET}",
            line_colour(&arrival.line_id),
            format_line_name(&arrival.line_name),
            clock(&arrival.expected_arrival),
            arrival.destination_name,
            arrival.platform_name.as_deref().unwrap_or("-"),
        )?;
    }

    writeln!(out)
}

pub fn print_stations(out: &mut impl Write, stations: &[Station]) -> io::Result<()> {
    if stations.is_empty() {
        return writeln!(out, "{YELLOW}No stations found{RESET}");
    }

    writeln!(out)?;
    writeln!(out, "{BOLD}{WHITE} Stations found: {RESET}")?;
    writeln!(out)?;

    for station in stations {
        let modes: Vec<&str> = station.modes.iter().map(String::as_str).collect();
        writeln!(
            out,
            "  {CYAN}{:<40}{RESET} Zone: {}  [{}]",
            station.name,
            station.zone.as_deref().unwrap_or("-"),
            modes.join(", "),
        )?;
        writeln!(out, "  {GRAY}ID: {}{RESET}", station.id)?;
        writeln!(out)?;
    }

    Ok(())
}

pub fn print_line_statuses(out: &mut impl Write, lines: &[LineStatus]) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{BOLD}{WHITE} TfL Tube Status {RESET}")?;
    writeln!(out)?;

    for line in lines {
        let Some(status) = line.current() else {
            continue;
        };

        writeln!(
            out,
            "{}{}{RESET} {}{:<20}{RESET}",
            line_colour(&line.id),
            format_line_name(&line.name),
            status_colour(status.severity),
            status.description,
        )?;

        if let Some(reason) = &status.reason {
            for l in wrap_text(reason, STATUS_WRAP) {
                writeln!(out, "  {GRAY}{l}{RESET}")?;
            }
        }
    }

    writeln!(out)
}

pub fn print_disruptions(out: &mut impl Write, disruptions: &[Disruption]) -> io::Result<()> {
    writeln!(out)?;

    if disruptions.is_empty() {
        writeln!(out, "{BOLD}{GREEN} No current disruptions {RESET}")?;
        return writeln!(out);
    }

    writeln!(
        out,
        "{BOLD}{WHITE} Service Disruptions ({}) {RESET}",
        disruptions.len()
    )?;
    writeln!(out)?;

    for d in disruptions {
        let (icon, colour) = match d.category.as_str() {
            "RealTime" => ("!", RED),
            "PlannedWork" => ("W", YELLOW),
            _ => ("i", CYAN),
        };

        writeln!(
            out,
            "{colour}[{icon}]{RESET} {BOLD}{}{RESET}",
            d.category_description
        )?;
        for l in wrap_text(&d.description, DISRUPTION_WRAP) {
            writeln!(out, "    {l}")?;
        }
        writeln!(out)?;
    }

    Ok(())
}

/// Advisory line shown above a text board.
pub fn print_note(out: &mut impl Write, message: &str) -> io::Result<()> {
    writeln!(out, "Note: {message}")
}
