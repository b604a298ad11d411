use super::SlashCommand;

#[test]
fn it_parse_empty_string() {
    assert!(SlashCommand::parse("").is_none());
}

#[test]
fn it_parse_space_only() {
    assert!(SlashCommand::parse(" ").is_none());
}

#[test]
fn it_parse_free_text() {
    assert!(SlashCommand::parse("hello /help").is_none());
}

#[test]
fn it_parse_invalid_prefix() {
    assert!(SlashCommand::parse("!help").is_none());
}

#[test]
fn it_parse_single_slash() {
    let cmd = SlashCommand::parse("/").unwrap();
    assert_eq!(cmd.name, "");
}

#[test]
fn it_parse_valid_prefix() {
    let cmd = SlashCommand::parse("/help").unwrap();
    assert_eq!(cmd.name, "help");
}

#[test]
fn it_normalizes_case_and_whitespace() {
    let cmd = SlashCommand::parse("   /HeLp  ").unwrap();
    assert_eq!(cmd.name, "help");
}

#[test]
fn it_keeps_trailing_words() {
    let cmd = SlashCommand::parse("/theme dark").unwrap();
    assert_eq!(cmd.name, "theme dark");
}

#[test]
fn it_detects_commands() {
    assert!(SlashCommand::is_command("/clear"));
    assert!(SlashCommand::is_command("  /clear"));
    assert!(!SlashCommand::is_command("clear"));
}
