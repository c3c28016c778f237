/// A chat command with its raw, not yet validated argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    SetCheckInterval(Option<&'a str>),
    SetReportInterval(Option<&'a str>),
    AddDomain(Option<&'a str>),
    RemoveDomain,
    Cancel,
    Status,
    Config,
    Help,
    /// Empty line or anything not listed above
    Unknown,
}

/// Parse one line of text. Only the first argument is kept, and a
/// `@botname` suffix on the command (as sent in group chats) is ignored.
pub fn parse(line: &str) -> Command<'_> {
    let mut parts = line.split_whitespace();
    let Some(head) = parts.next() else {
        return Command::Unknown;
    };
    let name = head.split_once('@').map_or(head, |(name, _)| name);
    let arg = parts.next();

    match name {
        "/set_check_interval" => Command::SetCheckInterval(arg),
        "/set_report_interval" => Command::SetReportInterval(arg),
        "/add_domain" => Command::AddDomain(arg),
        "/remove_domain" => Command::RemoveDomain,
        "/cancel" => Command::Cancel,
        "/status" => Command::Status,
        "/config" => Command::Config,
        "/help" | "/start" => Command::Help,
        _ => Command::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands_with_arguments() {
        assert_eq!(parse("/set_check_interval 30"), Command::SetCheckInterval(Some("30")));
        assert_eq!(parse("/set_report_interval"), Command::SetReportInterval(None));
        assert_eq!(
            parse("  /add_domain   https://example.com  extra"),
            Command::AddDomain(Some("https://example.com"))
        );
    }

    #[test]
    fn test_parse_bare_commands() {
        assert_eq!(parse("/remove_domain"), Command::RemoveDomain);
        assert_eq!(parse("/status"), Command::Status);
        assert_eq!(parse("/config"), Command::Config);
        assert_eq!(parse("/help"), Command::Help);
        assert_eq!(parse("/cancel"), Command::Cancel);
    }

    #[test]
    fn test_parse_strips_bot_mention() {
        assert_eq!(parse("/status@health_bot"), Command::Status);
        assert_eq!(parse("/set_check_interval@health_bot 5"), Command::SetCheckInterval(Some("5")));
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(parse(""), Command::Unknown);
        assert_eq!(parse("   "), Command::Unknown);
        assert_eq!(parse("hello"), Command::Unknown);
        assert_eq!(parse("/STATUS"), Command::Unknown);
        assert_eq!(parse("/statusx"), Command::Unknown);
    }
}
