//! Terminal output for command results.
//!
//! `format_*` build the text, `print_*` write it to stdout. Columns are
//! padded by display width so titles with wide characters stay aligned.

use colored::*;
use rentstore::commands::{CmdMessage, CopyView, MessageLevel, UnpopularReport};
use rentstore::lifecycle::RentalStatus;
use rentstore::model::{format_date, RentalRecord};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ID_WIDTH: usize = 10;
const PLATFORM_WIDTH: usize = 10;
const GENRE_WIDTH: usize = 12;
const TITLE_WIDTH: usize = 32;

pub fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => eprintln!("{}", message.content.red()),
        }
    }
}

pub fn print_copies(copies: &[CopyView]) {
    print!("{}", format_copies(copies));
}

pub fn print_history(history: &[RentalRecord]) {
    print!("{}", format_history(history));
}

pub fn print_report(report: &UnpopularReport) {
    print!("{}", format_report(report));
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

fn pad(s: &str, width: usize) -> String {
    let cell = truncate_to_width(s, width);
    let fill = width.saturating_sub(cell.width());
    format!("{}{}", cell, " ".repeat(fill))
}

pub fn format_copies(copies: &[CopyView]) -> String {
    let mut out = String::new();
    for copy in copies {
        let status = match copy.status {
            RentalStatus::Available => "available".green(),
            RentalStatus::Rented => "rented".yellow(),
        };
        out.push_str(&format!(
            "{} {} {} {} {}\n",
            pad(&copy.entry.copy_id, ID_WIDTH).bold(),
            pad(&copy.entry.platform, PLATFORM_WIDTH),
            pad(&copy.entry.genre, GENRE_WIDTH),
            pad(&copy.entry.title, TITLE_WIDTH),
            status
        ));
    }
    out
}

pub fn format_history(history: &[RentalRecord]) -> String {
    let mut out = String::new();
    for record in history {
        let returned = match record.returned_on {
            Some(date) => pad(&format_date(date), ID_WIDTH).normal(),
            None => pad("out", ID_WIDTH).yellow(),
        };
        out.push_str(&format!(
            "  {} -> {} {}\n",
            format_date(record.rented_on),
            returned,
            record.renter_id.dimmed()
        ));
    }
    out
}

pub fn format_report(report: &UnpopularReport) -> String {
    let averages = &report.averages;
    let mut out = String::new();
    out.push_str(&format!("{}\n", "Store averages".bold()));
    out.push_str(&format!("  rentals per game: {:.2}\n", averages.times_rented));
    out.push_str(&format!("  reviews per game: {:.2}\n", averages.review_count));
    match averages.rating {
        Some(rating) => out.push_str(&format!("  rating:           {:.2}\n", rating)),
        None => out.push_str(&format!("  rating:           {}\n", "no reviews".dimmed())),
    }

    for (copy_id, stats) in &report.flagged {
        out.push('\n');
        out.push_str(&format!(
            "{} {}\n",
            copy_id.bold(),
            format!("score {}", stats.score()).red()
        ));
        let rating = if stats.review_count == 0 {
            "N/A".to_string()
        } else {
            format!("{:.2}", stats.avg_rating)
        };
        out.push_str(&format!(
            "  reviews: {}  rating: {}  rentals: {}  days since return: {}  days owned: {}\n",
            stats.review_count, rating, stats.times_rented, stats.since_return, stats.days_owned
        ));
        if let Some(advice) = report.advice.get(copy_id) {
            for line in advice.lines() {
                out.push_str(&format!("  - {}\n", line));
            }
        }
    }
    out
}
