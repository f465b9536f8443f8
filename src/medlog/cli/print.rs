use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone, Utc, Weekday};
use colored::Colorize;
use medlog::api::{CmdMessage, MessageLevel};
use medlog::config::{Clock, MedlogConfig, KEYS};
use medlog::history::{day_label, DayGroup};
use medlog::model::MedicineItem;
use std::collections::BTreeSet;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub(super) fn print_medicines(medicines: &[MedicineItem]) {
    if medicines.is_empty() {
        println!("No medicines yet. Add one with `medlog add <name>`.");
        return;
    }

    for (i, medicine) in medicines.iter().enumerate() {
        let idx_str = format!("{}. ", i + 1);
        let available = LINE_WIDTH.saturating_sub(4 + idx_str.width());
        println!(
            "    {}{}",
            idx_str.yellow(),
            truncate_to_width(&medicine.name, available)
        );
    }
}

pub(super) fn print_history(groups: &[DayGroup], today: NaiveDate, clock: Clock) {
    if groups.is_empty() {
        println!("No intake records.");
        return;
    }

    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{}", day_label(group.day, today).bold());

        for entry in &group.entries {
            let record = &entry.record;
            let idx_str = format!("{}. ", entry.position);
            let time_str = Local
                .timestamp_millis_opt(record.timestamp)
                .single()
                .map(|dt| dt.format(clock.time_format()).to_string())
                .unwrap_or_default();
            let time_str = format!("{:>8}  ", time_str);

            let text = match &record.details {
                Some(details) => format!("{} ({})", record.medicine_name, details),
                None => record.medicine_name.clone(),
            };

            let fixed_width = 4 + idx_str.width() + time_str.width() + TIME_WIDTH;
            let available = LINE_WIDTH.saturating_sub(fixed_width);
            let text_display = truncate_to_width(&text, available);
            let padding = available.saturating_sub(text_display.width());

            println!(
                "    {}{}{}{}{}",
                idx_str.yellow(),
                time_str.cyan(),
                text_display,
                " ".repeat(padding),
                format_time_ago(record.timestamp).dimmed()
            );
        }
    }
}

/// A Monday-first month grid. Days with records are highlighted.
pub(super) fn print_calendar(
    year: i32,
    month: u32,
    marked: &BTreeSet<NaiveDate>,
    today: NaiveDate,
) {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return;
    };

    println!("{}", format!("{:^20}", first.format("%B %Y").to_string()).bold());
    println!("{}", "Mo Tu We Th Fr Sa Su".dimmed());

    let mut line = "   ".repeat(first.weekday().num_days_from_monday() as usize);
    let mut day = Some(first);
    while let Some(d) = day.filter(|d| d.month() == month) {
        let cell = format!("{:>2}", d.day());
        let cell = if marked.contains(&d) {
            cell.green().bold()
        } else {
            cell.normal()
        };
        let cell = if d == today { cell.underline() } else { cell };
        line.push_str(&cell.to_string());

        if d.weekday() == Weekday::Sun {
            println!("{}", line.trim_end());
            line.clear();
        } else {
            line.push(' ');
        }
        day = d.succ_opt();
    }
    if !line.trim().is_empty() {
        println!("{}", line.trim_end());
    }

    let count = marked.len();
    println!();
    println!(
        "{}",
        format!(
            "{} day{} with intake records",
            count,
            if count == 1 { "" } else { "s" }
        )
        .dimmed()
    );
}

pub(super) fn print_config(config: &MedlogConfig) {
    for key in KEYS {
        if let Some(value) = config.get(key) {
            println!("{} = {}", key, value);
        }
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: i64) -> String {
    let Some(taken) = DateTime::<Utc>::from_timestamp_millis(timestamp) else {
        return " ".repeat(TIME_WIDTH);
    };
    let duration = Utc::now().signed_duration_since(taken);

    // Future records (e.g. a dose planned for later today) get no label
    let time_str = match duration.to_std() {
        Ok(elapsed) => Formatter::new().convert(elapsed),
        Err(_) => String::new(),
    };

    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
