use super::SlashCommand;

#[test]
fn it_parse_empty_string() {
    let text = "";
    assert!(SlashCommand::parse(text).is_none());
}
#[test]
fn it_parse_space_only() {
    let text = " ";
    assert!(SlashCommand::parse(text).is_none());
}
#[test]
fn it_parse_single_slash() {
    let text = "/";
    assert!(SlashCommand::parse(text).is_none());
}
#[test]
fn it_parse_invalid_prefix() {
    let text = "!q";
    assert!(SlashCommand::parse(text).is_none());
}
#[test]
fn it_parse_question() {
    let text = "What is the refund policy?";
    assert!(SlashCommand::parse(text).is_none());
}
#[test]
fn it_parse_valid_prefix() {
    let text = "/q";
    let cmd = SlashCommand::parse(text);
    assert!(cmd.is_some());
    assert_eq!(cmd.unwrap().command, "/q");
}

#[test]
fn it_is_quit() {
    for text in ["/q", "/quit", "/exit"] {
        assert!(SlashCommand::parse(text).unwrap().is_quit());
    }
}
#[test]
fn it_is_not_quit() {
    let cmd = SlashCommand::parse("/h").unwrap();
    assert!(!cmd.is_quit());
}

#[test]
fn it_is_upload() {
    let cmd = SlashCommand::parse("/upload ./notes.md").unwrap();
    assert!(cmd.is_upload());
    assert_eq!(cmd.args, vec!["./notes.md".to_string()]);
}
#[test]
fn it_is_short_upload() {
    let cmd = SlashCommand::parse("/u ./notes.md").unwrap();
    assert!(cmd.is_upload());
}

#[test]
fn it_is_delete() {
    for text in ["/d 1", "/delete 1"] {
        assert!(SlashCommand::parse(text).unwrap().is_delete());
    }
}
#[test]
fn it_is_not_delete() {
    let cmd = SlashCommand::parse("/docs").unwrap();
    assert!(!cmd.is_delete());
}

#[test]
fn it_is_documents() {
    for text in ["/ls", "/docs", "/documents"] {
        assert!(SlashCommand::parse(text).unwrap().is_documents());
    }
}

#[test]
fn it_is_clear() {
    for text in ["/cl", "/clear"] {
        assert!(SlashCommand::parse(text).unwrap().is_clear());
    }
}

#[test]
fn it_is_history() {
    for text in ["/hi", "/history", "/history 10"] {
        assert!(SlashCommand::parse(text).unwrap().is_history());
    }
}

#[test]
fn it_is_sources() {
    for text in ["/s 3", "/sources 3"] {
        assert!(SlashCommand::parse(text).unwrap().is_sources());
    }
}

#[test]
fn it_is_help() {
    for text in ["/h", "/help"] {
        assert!(SlashCommand::parse(text).unwrap().is_help());
    }
}
#[test]
fn it_is_not_help() {
    let cmd = SlashCommand::parse("/hi").unwrap();
    assert!(!cmd.is_help());
}

#[test]
fn it_parses_number_arg() {
    let cmd = SlashCommand::parse("/delete 3").unwrap();
    assert_eq!(cmd.number_arg().unwrap(), Some(3));
}
#[test]
fn it_parses_missing_number_arg() {
    let cmd = SlashCommand::parse("/history").unwrap();
    assert_eq!(cmd.number_arg().unwrap(), None);
}
#[test]
fn it_rejects_invalid_number_arg() {
    let cmd = SlashCommand::parse("/delete abc").unwrap();
    assert_eq!(
        cmd.number_arg().unwrap_err().to_string(),
        "abc is not a valid number."
    );

    let cmd = SlashCommand::parse("/delete 0").unwrap();
    assert!(cmd.number_arg().is_err());
}
