use std::env;
use std::fs;

use anyhow::bail;
use anyhow::Result;
use ratatui::prelude::Rect;
use test_utils::documents_fixture;
use test_utils::query_response_fixture;
use tokio::sync::mpsc;

use super::AppState;
use crate::domain::models::Action;
use crate::domain::models::Author;
use crate::domain::models::Document;
use crate::domain::models::Event;
use crate::domain::models::HistoryEntry;
use crate::domain::models::MessageType;
use crate::domain::models::NotificationLevel;
use crate::domain::models::QueryResponse;
use crate::domain::models::UploadReceipt;
use crate::domain::services::UploadStatus;

fn app_state() -> Result<AppState> {
    let mut app_state = AppState::new("base16-ocean.dark", "", 5, 50)?;
    app_state.set_rect(Rect::new(0, 0, 100, 300));
    return Ok(app_state);
}

fn app_state_with_documents() -> Result<AppState> {
    let mut app_state = app_state()?;
    let documents: Vec<Document> = serde_json::from_str(documents_fixture())?;
    app_state.documents.replace(documents);
    return Ok(app_state);
}

fn last_text(app_state: &AppState) -> String {
    return app_state
        .conversation
        .messages()
        .last()
        .map(|e| return e.text.to_string())
        .unwrap_or_default();
}

fn pending_request_id(rx: &mut mpsc::UnboundedReceiver<Action>) -> Result<String> {
    match rx.try_recv()? {
        Action::ChatQuery(prompt) => return Ok(prompt.request_id),
        _ => bail!("Wrong enum"),
    }
}

mod handle_slash_commands {
    use super::*;

    #[test]
    fn it_breaks_on_quit() -> Result<()> {
        let (tx, _rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = app_state()?;
        let (should_break, should_continue) = app_state.handle_slash_commands("/q", &tx)?;

        assert!(should_break);
        assert!(!should_continue);

        return Ok(());
    }

    #[test]
    fn it_ignores_questions() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = app_state()?;
        let (should_break, should_continue) =
            app_state.handle_slash_commands("What is /upload for?", &tx)?;

        assert!(!should_break);
        assert!(!should_continue);
        assert!(rx.try_recv().is_err());

        return Ok(());
    }

    #[test]
    fn it_shows_help() -> Result<()> {
        let (tx, _rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = app_state()?;
        let (_, should_continue) = app_state.handle_slash_commands("/help", &tx)?;

        assert!(should_continue);
        let last = app_state.conversation.messages().last().unwrap();
        assert_eq!(last.author, Author::KBChat);
        assert!(last.text.starts_with("COMMANDS:"));

        return Ok(());
    }

    #[test]
    fn it_rejects_unsupported_uploads_before_sending() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = app_state()?;
        let (_, should_continue) = app_state.handle_slash_commands("/upload ./setup.exe", &tx)?;

        assert!(should_continue);
        assert!(rx.try_recv().is_err());
        assert_eq!(app_state.upload.status(), &UploadStatus::Idle);

        let last = app_state.conversation.messages().last().unwrap();
        assert_eq!(last.message_type(), MessageType::Error);
        insta::assert_snapshot!(last.text, @"Unsupported file type for setup.exe. Accepted types are PDF · DOCX · TXT · MD");

        return Ok(());
    }

    #[test]
    fn it_uploads_one_file_at_a_time() -> Result<()> {
        let dir = env::temp_dir().join(format!("kbchat-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir)?;
        let file_path = dir.join("Notes.MD");
        fs::write(&file_path, "# Notes")?;

        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = app_state()?;
        let input = format!("/upload {}", file_path.to_string_lossy());
        app_state.handle_slash_commands(&input, &tx)?;

        match rx.try_recv()? {
            Action::DocumentUpload(upload) => assert_eq!(upload.filename, "Notes.MD"),
            _ => bail!("Wrong enum"),
        }
        assert!(app_state.upload.is_uploading());

        app_state.handle_slash_commands(&input, &tx)?;
        assert!(rx.try_recv().is_err());
        assert!(last_text(&app_state).starts_with("Still uploading Notes.MD."));

        return Ok(());
    }

    #[test]
    fn it_deletes_by_sidebar_position() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = app_state_with_documents()?;
        app_state.handle_slash_commands("/delete 3", &tx)?;

        match rx.try_recv()? {
            Action::DocumentDelete(id) => assert_eq!(id, 7),
            _ => bail!("Wrong enum"),
        }
        assert_eq!(app_state.documents.len(), 2);

        return Ok(());
    }

    #[test]
    fn it_rejects_unknown_positions() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = app_state_with_documents()?;
        app_state.handle_slash_commands("/delete 9", &tx)?;

        assert!(rx.try_recv().is_err());
        assert_eq!(app_state.documents.len(), 3);
        insta::assert_snapshot!(last_text(&app_state), @"9 is not a valid number from the documents list.");

        return Ok(());
    }

    #[test]
    fn it_refreshes_documents() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = app_state()?;
        app_state.handle_slash_commands("/ls", &tx)?;

        assert!(matches!(rx.try_recv()?, Action::DocumentsRefresh()));
        assert!(app_state.documents.is_loading());

        return Ok(());
    }

    #[test]
    fn it_requests_history() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = app_state()?;

        app_state.handle_slash_commands("/history", &tx)?;
        assert!(matches!(rx.try_recv()?, Action::ChatHistory(50)));

        app_state.handle_slash_commands("/hi 3", &tx)?;
        assert!(matches!(rx.try_recv()?, Action::ChatHistory(3)));

        app_state.handle_slash_commands("/hi zero", &tx)?;
        assert!(rx.try_recv().is_err());
        insta::assert_snapshot!(last_text(&app_state), @"zero is not a valid number.");

        return Ok(());
    }

    #[test]
    fn it_sets_sources() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = app_state()?;
        app_state.handle_slash_commands("/sources 2", &tx)?;
        assert_eq!(app_state.num_sources, 2);

        app_state.submit_question("Refunds?", &tx)?;
        match rx.try_recv()? {
            Action::ChatQuery(prompt) => assert_eq!(prompt.num_sources, 2),
            _ => bail!("Wrong enum"),
        }

        return Ok(());
    }

    #[test]
    fn it_clears_conversation_but_not_documents() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = app_state_with_documents()?;
        app_state.submit_question("Refunds?", &tx)?;
        let request_id = pending_request_id(&mut rx)?;
        app_state.handle_event(
            Event::ChatAnswered(request_id, serde_json::from_str(query_response_fixture())?),
            &tx,
        )?;

        app_state.handle_slash_commands("/clear", &tx)?;

        assert!(app_state.conversation.messages().is_empty());
        assert!(app_state.bubble_list.is_empty());
        assert_eq!(app_state.documents.len(), 3);

        return Ok(());
    }
}

mod submit_question {
    use super::*;

    #[test]
    fn it_ignores_blank_input() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = app_state()?;

        assert!(!app_state.submit_question("", &tx)?);
        assert!(!app_state.submit_question("  \n\t ", &tx)?);
        assert!(rx.try_recv().is_err());
        assert!(app_state.conversation.messages().is_empty());

        return Ok(());
    }

    #[test]
    fn it_appends_question_then_answer() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = app_state()?;

        assert!(app_state.submit_question("What is the refund policy?", &tx)?);
        assert!(!app_state.submit_question("And shipping?", &tx)?);
        let request_id = match rx.try_recv()? {
            Action::ChatQuery(prompt) => {
                assert_eq!(prompt.question, "What is the refund policy?");
                assert_eq!(prompt.num_sources, 5);
                prompt.request_id
            }
            _ => bail!("Wrong enum"),
        };
        assert!(rx.try_recv().is_err());
        assert_eq!(request_id, app_state.conversation.messages()[0].id);

        let response: QueryResponse = serde_json::from_str(query_response_fixture())?;
        app_state.handle_event(Event::ChatAnswered(request_id, response), &tx)?;

        let messages = app_state.conversation.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].author, Author::User);
        assert_eq!(messages[1].author, Author::Assistant);
        assert_eq!(messages[1].sources.len(), 2);
        assert!(!app_state.conversation.is_loading());

        return Ok(());
    }

    #[test]
    fn it_shows_failures_inline() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = app_state()?;

        app_state.submit_question("Refunds?", &tx)?;
        let request_id = pending_request_id(&mut rx)?;
        app_state.handle_event(
            Event::ChatFailed(
                request_id,
                "Error processing query: model not loaded".to_string(),
            ),
            &tx,
        )?;

        let last = app_state.conversation.messages().last().unwrap();
        assert!(last.is_error());
        assert_eq!(last.author, Author::Assistant);
        assert_eq!(last.text, "Error processing query: model not loaded");
        assert_eq!(
            app_state.notifications.visible()[0].text,
            "Failed to get a response"
        );

        return Ok(());
    }

    #[test]
    fn it_aborts_pending_questions() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = app_state()?;

        assert!(!app_state.abort(&tx)?);

        app_state.submit_question("Refunds?", &tx)?;
        let request_id = pending_request_id(&mut rx)?;
        assert!(app_state.abort(&tx)?);
        assert!(matches!(rx.try_recv()?, Action::ChatAbort()));
        assert!(!app_state.conversation.is_loading());

        app_state.handle_event(
            Event::ChatAnswered(
                request_id,
                QueryResponse {
                    answer: "Too late".to_string(),
                    sources: vec![],
                },
            ),
            &tx,
        )?;
        insta::assert_snapshot!(last_text(&app_state), @"Request cancelled.");

        return Ok(());
    }

    #[test]
    fn it_ignores_answers_for_a_previous_question() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = app_state()?;

        app_state.submit_question("First?", &tx)?;
        let first_id = pending_request_id(&mut rx)?;
        app_state.abort(&tx)?;
        rx.try_recv()?;

        app_state.submit_question("Second?", &tx)?;
        let second_id = pending_request_id(&mut rx)?;

        app_state.handle_event(
            Event::ChatAnswered(
                first_id.clone(),
                QueryResponse {
                    answer: "Answer to First?".to_string(),
                    sources: vec![],
                },
            ),
            &tx,
        )?;
        app_state.handle_event(Event::ChatFailed(first_id, "Late failure".to_string()), &tx)?;

        assert!(app_state.conversation.is_loading());
        assert!(app_state.notifications.visible().is_empty());
        insta::assert_snapshot!(last_text(&app_state), @"Second?");

        app_state.handle_event(
            Event::ChatAnswered(
                second_id,
                QueryResponse {
                    answer: "Answer to Second?".to_string(),
                    sources: vec![],
                },
            ),
            &tx,
        )?;
        assert!(!app_state.conversation.is_loading());
        insta::assert_snapshot!(last_text(&app_state), @"Answer to Second?");

        return Ok(());
    }
}

mod handle_event {
    use super::*;

    #[test]
    fn it_restores_documents_after_failed_delete() -> Result<()> {
        let (tx, _rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = app_state_with_documents()?;
        let before = app_state.documents.documents().to_vec();

        app_state.handle_slash_commands("/delete 1", &tx)?;
        assert_eq!(app_state.documents.len(), 2);

        app_state.handle_event(
            Event::DocumentDeleteFailed(1, "Document not found".to_string()),
            &tx,
        )?;

        assert_eq!(app_state.documents.documents(), before.as_slice());
        let toast = &app_state.notifications.visible()[0];
        assert_eq!(toast.level, NotificationLevel::Error);
        assert_eq!(toast.text, "Failed to delete document");

        return Ok(());
    }

    #[test]
    fn it_confirms_deletes() -> Result<()> {
        let (tx, _rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = app_state_with_documents()?;

        app_state.handle_slash_commands("/delete 1", &tx)?;
        app_state.handle_event(Event::DocumentDeleted(1), &tx)?;

        assert_eq!(app_state.documents.len(), 2);
        assert_eq!(app_state.notifications.visible()[0].text, "Document deleted");

        return Ok(());
    }

    #[test]
    fn it_refreshes_after_upload() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = app_state()?;

        app_state.handle_event(
            Event::DocumentUploaded("notes.md".to_string(), UploadReceipt::default()),
            &tx,
        )?;

        assert!(matches!(rx.try_recv()?, Action::DocumentsRefresh()));
        assert!(app_state.documents.is_loading());
        assert_eq!(
            app_state.upload.status(),
            &UploadStatus::Success("notes.md".to_string())
        );
        insta::assert_snapshot!(app_state.notifications.visible()[0].text, @r###""notes.md" uploaded successfully"###);

        return Ok(());
    }

    #[test]
    fn it_reports_failed_uploads() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = app_state()?;

        app_state.handle_event(
            Event::DocumentUploadFailed("notes.md".to_string(), "Upload failed".to_string()),
            &tx,
        )?;

        assert!(rx.try_recv().is_err());
        assert_eq!(
            app_state.upload.status(),
            &UploadStatus::Error("Upload failed".to_string())
        );
        assert_eq!(app_state.notifications.visible()[0].text, "Upload failed");

        return Ok(());
    }

    #[test]
    fn it_keeps_documents_when_refresh_fails() -> Result<()> {
        let (tx, _rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = app_state_with_documents()?;
        app_state.refresh_documents(&tx)?;

        app_state.handle_event(Event::DocumentsFailed("boom".to_string()), &tx)?;

        assert!(!app_state.documents.is_loading());
        assert_eq!(app_state.documents.len(), 3);
        assert_eq!(
            app_state.notifications.visible()[0].text,
            "Failed to load documents"
        );

        return Ok(());
    }

    #[test]
    fn it_lists_history() -> Result<()> {
        let (tx, _rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = app_state()?;

        app_state.handle_event(
            Event::ChatHistoryLoaded(vec![
                HistoryEntry {
                    question: "What is the refund policy?".to_string(),
                    timestamp: Some("2024-03-05T08:00:00".to_string()),
                    ..HistoryEntry::default()
                },
                HistoryEntry {
                    question: "Who approves expenses?".to_string(),
                    ..HistoryEntry::default()
                },
            ]),
            &tx,
        )?;

        insta::assert_snapshot!(last_text(&app_state), @r###"
        - What is the refund policy? (2024-03-05T08:00:00)
        - Who approves expenses?
        "###);

        return Ok(());
    }
}
