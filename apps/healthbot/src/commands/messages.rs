//! Fixed operator-facing texts.

use std::fmt::Write;

use crate::store::Intervals;

pub const NOT_UNDERSTOOD: &str =
    "⚠️ I didn't understand that. Use /help to see the available commands.";

pub const GENERATING_REPORT: &str = "🔄 Generating domain status report...";

pub const HELP: &str = "ℹ️ Available commands:\n\
/set_check_interval <seconds> - Set how often domains are health-checked.\n\
/set_report_interval <seconds> - Set how often the status report is sent.\n\
/add_domain <url> - Add a domain to the check list.\n\
/remove_domain - Remove a domain from the check list. Reply with its number.\n\
/cancel - Abort a pending /remove_domain.\n\
/config - Show the current configuration and domain list.\n\
/status - Check all domains now and send a status report.\n\
/help - Show this list of commands.";

/// Numbered list used by `/remove_domain`, 1-based
pub fn numbered(domains: &[String]) -> String {
    domains
        .iter()
        .enumerate()
        .map(|(i, domain)| format!("{}. {domain}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn removal_prompt(domains: &[String]) -> String {
    format!(
        "🗑️ Select a domain to remove:\n{}\nReply with the matching number, or /cancel.",
        numbered(domains)
    )
}

pub fn configuration(intervals: Intervals, domains: &[String]) -> String {
    let mut text = format!(
        "🛠️ Current configuration:\n\
         Check interval: {} seconds\n\
         Report interval: {} seconds\n\n\
         Monitored domains:",
        intervals.check_seconds, intervals.report_seconds
    );
    if domains.is_empty() {
        text.push_str("\n(none)");
    }
    for domain in domains {
        let _ = write!(text, "\n- {domain}");
    }
    text
}

pub fn welcome(intervals: Intervals, domains: &[String]) -> String {
    let mut text = String::from("👋 Welcome to HealthBot! Starting domain checks...\n\n");
    if domains.is_empty() {
        text.push_str(
            "🔍 This bot checks the health of the configured domains \
             and notifies you about their status.\n\
             ⚠️ No domains are configured yet. Use /add_domain to add one.\n",
        );
    } else {
        text.push_str("🔍 This bot checks the health of the following domains:\n");
        for domain in domains {
            let _ = writeln!(text, " - {domain}");
        }
        text.push('\n');
    }
    let _ = write!(
        text,
        "🕒 Current check interval: {} seconds.\n🕒 Current report interval: {} seconds.",
        intervals.check_seconds, intervals.report_seconds
    );
    text
}
