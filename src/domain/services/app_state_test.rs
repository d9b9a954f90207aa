use ratatui::prelude::Rect;

use super::model_greeting;
use super::AppState;
use super::ANSWER_FAILED;
use super::RESET_FAILED;
use super::RESET_GREETING;
use super::WELCOME_GREETING;
use crate::domain::models::Action;
use crate::domain::models::BackendEvent;
use crate::domain::models::ChatRequest;
use crate::domain::models::ChatResponse;
use crate::domain::models::CollectionStats;
use crate::domain::models::Message;
use crate::domain::models::MessageType;
use crate::domain::models::ModelName;
use crate::domain::models::Role;
use crate::domain::models::SystemStatus;
use crate::domain::models::UploadState;
use crate::domain::models::UploadStatus;

fn answer(text: &str) -> BackendEvent {
    return BackendEvent::AnswerReceived(ChatResponse {
        answer: text.to_string(),
        sources: None,
    });
}

fn snapshot(app_state: &AppState) -> Vec<Message> {
    return app_state.conversation.messages().to_vec();
}

#[test]
fn it_starts_with_the_welcome_greeting() {
    let app_state = AppState::default();
    let messages = app_state.conversation.messages();

    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].role, Role::Assistant);
    assert_eq!(messages[0].text, WELCOME_GREETING);
    assert_eq!(app_state.model, ModelName::OpenAI);
    assert_eq!(app_state.upload, UploadState::default());
    assert!(!app_state.waiting_for_backend);
}

mod submit_question {
    use super::*;

    #[test]
    fn it_ignores_blank_questions() {
        let mut app_state = AppState::default();
        let before = snapshot(&app_state);

        assert_eq!(app_state.submit_question(""), None);
        assert_eq!(app_state.submit_question("   \n  "), None);

        assert_eq!(snapshot(&app_state), before);
        assert!(!app_state.waiting_for_backend);
    }

    #[test]
    fn it_appends_the_question_and_waits() {
        let mut app_state = AppState::new(ModelName::Ollama);
        let action = app_state.submit_question("What is the notice period?");

        assert_eq!(
            action,
            Some(Action::AskQuestion(ChatRequest::new(
                "What is the notice period?",
                ModelName::Ollama
            )))
        );
        assert!(app_state.waiting_for_backend);

        let last = app_state.conversation.last().unwrap();
        assert_eq!(last.role, Role::User);
        assert_eq!(last.text, "What is the notice period?");
    }

    #[test]
    fn it_rejects_questions_while_one_is_pending() {
        let mut app_state = AppState::default();
        app_state.submit_question("First?");
        let before = snapshot(&app_state);

        assert_eq!(app_state.submit_question("Second?"), None);
        assert_eq!(snapshot(&app_state), before);
    }

    #[test]
    fn it_alternates_user_and_assistant_entries() {
        let mut app_state = AppState::default();
        let questions = ["Who signed?", "When does it start?", "Can I cancel?"];

        for (idx, question) in questions.iter().enumerate() {
            assert!(app_state.submit_question(question).is_some());
            assert_eq!(app_state.handle_backend_event(answer(&format!("Answer {idx}"))), None);
        }

        let messages = app_state.conversation.messages();
        assert_eq!(messages.len(), 1 + 2 * questions.len());
        for (idx, question) in questions.iter().enumerate() {
            let user = &messages[1 + 2 * idx];
            let assistant = &messages[2 + 2 * idx];
            assert_eq!(user.role, Role::User);
            assert_eq!(user.text, *question);
            assert_eq!(assistant.role, Role::Assistant);
            assert_eq!(assistant.text, format!("Answer {idx}"));
        }
        assert!(!app_state.waiting_for_backend);
    }

    #[test]
    fn it_keeps_answer_sources() {
        let mut app_state = AppState::default();
        app_state.submit_question("What is the notice period?");
        app_state.handle_backend_event(BackendEvent::AnswerReceived(ChatResponse {
            answer: "Thirty days.".to_string(),
            sources: Some(vec!["contract.pdf".to_string()]),
        }));

        let last = app_state.conversation.last().unwrap();
        assert_eq!(last.cited_sources(), &["contract.pdf".to_string()]);
        assert_eq!(last.message_type(), MessageType::Normal);
    }

    #[test]
    fn it_reports_failed_answers() {
        let mut app_state = AppState::default();
        app_state.submit_question("Who signed?");
        app_state.handle_backend_event(BackendEvent::AnswerFailed());

        let last = app_state.conversation.last().unwrap();
        assert_eq!(last.text, ANSWER_FAILED);
        assert_eq!(last.message_type(), MessageType::Error);
        assert!(!app_state.waiting_for_backend);
        assert!(app_state.submit_question("Who signed?").is_some());
    }

    #[test]
    fn it_treats_blank_answers_as_failures() {
        let mut app_state = AppState::default();
        app_state.submit_question("Who signed?");
        app_state.handle_backend_event(answer("  "));

        let last = app_state.conversation.last().unwrap();
        assert_eq!(last.text, ANSWER_FAILED);
        assert!(!app_state.waiting_for_backend);
    }
}

mod submit_upload {
    use super::*;

    #[test]
    fn it_marks_the_upload_in_flight() {
        let mut app_state = AppState::default();
        let action = app_state.submit_upload("/tmp/docs/contract.pdf");

        assert_eq!(
            action,
            Some(Action::UploadDocument("/tmp/docs/contract.pdf".to_string()))
        );
        assert_eq!(app_state.upload.status, UploadStatus::Uploading);
        assert_eq!(app_state.upload.file_name, "contract.pdf");
        assert_eq!(app_state.conversation.len(), 1);
    }

    #[test]
    fn it_rejects_a_second_upload_while_one_is_in_flight() {
        let mut app_state = AppState::default();
        app_state.submit_upload("/tmp/docs/contract.pdf");
        let before = app_state.upload.clone();

        assert_eq!(app_state.submit_upload("/tmp/docs/manual.pdf"), None);
        assert_eq!(app_state.upload, before);
    }

    #[test]
    fn it_ignores_blank_paths() {
        let mut app_state = AppState::default();
        assert_eq!(app_state.submit_upload("  "), None);
        assert_eq!(app_state.upload, UploadState::default());
    }

    #[test]
    fn it_settles_in_success() {
        let mut app_state = AppState::default();
        app_state.submit_upload("/tmp/docs/contract.pdf");

        let next = app_state
            .handle_backend_event(BackendEvent::UploadSucceeded("contract.pdf".to_string()));

        assert_eq!(next, Some(Action::RefreshCollectionStats()));
        assert_eq!(app_state.upload.status, UploadStatus::Success);
        assert_eq!(app_state.conversation.len(), 2);

        let last = app_state.conversation.last().unwrap();
        assert_eq!(
            last.text,
            "Successfully processed contract.pdf. I'm ready to answer your questions!"
        );
        assert_eq!(last.role, Role::Assistant);
    }

    #[test]
    fn it_settles_in_error() {
        let mut app_state = AppState::default();
        app_state.submit_upload("/tmp/docs/bad.pdf");

        let next =
            app_state.handle_backend_event(BackendEvent::UploadFailed("bad.pdf".to_string()));

        assert_eq!(next, None);
        assert_eq!(app_state.upload.status, UploadStatus::Error);
        assert_eq!(app_state.upload.file_name, "bad.pdf");
        assert_eq!(app_state.conversation.len(), 2);

        let last = app_state.conversation.last().unwrap();
        assert_eq!(last.text, "Failed to upload bad.pdf. Please try again.");
        assert_eq!(last.message_type(), MessageType::Error);
    }

    #[test]
    fn it_allows_a_new_upload_after_settling() {
        let mut app_state = AppState::default();
        app_state.submit_upload("/tmp/docs/bad.pdf");
        app_state.handle_backend_event(BackendEvent::UploadFailed("bad.pdf".to_string()));
        assert!(app_state.submit_upload("/tmp/docs/contract.pdf").is_some());

        app_state.handle_backend_event(BackendEvent::UploadSucceeded("contract.pdf".to_string()));
        assert!(app_state.submit_upload("/tmp/docs/manual.pdf").is_some());
    }

    #[test]
    fn it_keeps_the_upload_guard_across_a_reset() {
        let mut app_state = AppState::default();
        app_state.submit_upload("/tmp/docs/a.pdf");

        app_state.handle_backend_event(BackendEvent::ResetSucceeded());
        assert_eq!(app_state.upload, UploadState::default());
        assert_eq!(app_state.upload_in_flight, Some("a.pdf".to_string()));

        assert_eq!(app_state.submit_upload("/tmp/docs/b.pdf"), None);
        assert_eq!(app_state.upload, UploadState::default());

        app_state.handle_backend_event(BackendEvent::UploadSucceeded("a.pdf".to_string()));
        assert_eq!(app_state.upload_in_flight, None);
        assert_eq!(app_state.upload.status, UploadStatus::Success);
        assert_eq!(app_state.upload.file_name, "a.pdf");

        assert!(app_state.submit_upload("/tmp/docs/b.pdf").is_some());
        assert_eq!(app_state.upload_in_flight, Some("b.pdf".to_string()));
    }
}

mod select_model {
    use super::*;

    #[test]
    fn it_resets_the_conversation() {
        let mut app_state = AppState::default();
        app_state.submit_question("Who signed?");
        app_state.handle_backend_event(answer("Alice and Bob."));

        app_state.select_model(ModelName::Ollama);

        let messages = app_state.conversation.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(
            messages[0].text,
            "Switched to Llama 3. Ready to answer your questions!"
        );
        assert_eq!(app_state.model, ModelName::Ollama);
    }

    #[test]
    fn it_resets_even_when_the_model_is_unchanged() {
        let mut app_state = AppState::new(ModelName::OpenAI);
        app_state.submit_question("Who signed?");

        app_state.select_model(ModelName::OpenAI);

        assert_eq!(app_state.conversation.len(), 1);
        assert_eq!(
            app_state.conversation.messages()[0].text,
            model_greeting(ModelName::OpenAI)
        );
    }

    #[test]
    fn it_uses_the_new_model_for_questions() {
        let mut app_state = AppState::default();
        app_state.select_model(ModelName::Ollama);

        let action = app_state.submit_question("Who signed?");
        assert_eq!(
            action,
            Some(Action::AskQuestion(ChatRequest::new(
                "Who signed?",
                ModelName::Ollama
            )))
        );
    }
}

mod reset_knowledge_base {
    use super::*;

    #[test]
    fn it_does_nothing_when_declined() {
        let mut app_state = AppState::default();
        app_state.submit_upload("/tmp/docs/contract.pdf");
        app_state.handle_backend_event(BackendEvent::UploadSucceeded("contract.pdf".to_string()));
        let before = snapshot(&app_state);

        let mut asked = false;
        let action = app_state.reset_knowledge_base(|| {
            asked = true;
            return false;
        });

        assert!(asked);
        assert_eq!(action, None);
        assert_eq!(snapshot(&app_state), before);
        assert_eq!(app_state.upload.status, UploadStatus::Success);
    }

    #[test]
    fn it_resets_when_confirmed() {
        let mut app_state = AppState::default();
        app_state.submit_upload("/tmp/docs/contract.pdf");
        app_state.handle_backend_event(BackendEvent::UploadSucceeded("contract.pdf".to_string()));

        let action = app_state.reset_knowledge_base(|| return true);
        assert_eq!(action, Some(Action::ResetKnowledgeBase()));

        let next = app_state.handle_backend_event(BackendEvent::ResetSucceeded());
        assert_eq!(next, Some(Action::RefreshCollectionStats()));

        let messages = app_state.conversation.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, RESET_GREETING);
        assert_eq!(app_state.upload.status, UploadStatus::Idle);
        assert_eq!(app_state.upload.file_name, "");
        assert_eq!(app_state.inspected_documents, None);
    }

    #[test]
    fn it_alerts_when_the_reset_fails() {
        let mut app_state = AppState::default();
        app_state.submit_upload("/tmp/docs/contract.pdf");
        app_state.handle_backend_event(BackendEvent::UploadSucceeded("contract.pdf".to_string()));
        let before = snapshot(&app_state);
        let upload_before = app_state.upload.clone();

        let next = app_state.handle_backend_event(BackendEvent::ResetFailed());

        assert_eq!(next, None);
        assert_eq!(app_state.alert, Some(RESET_FAILED.to_string()));
        assert_eq!(snapshot(&app_state), before);
        assert_eq!(app_state.upload, upload_before);
    }
}

mod scrolling {
    use super::*;

    fn long_conversation() -> AppState {
        let mut app_state = AppState::default();
        app_state.set_rect(Rect::new(0, 0, 60, 6));
        for idx in 0..5 {
            app_state.submit_question(&format!("Question {idx}?"));
            app_state.handle_backend_event(answer("Section 4 covers it."));
        }

        return app_state;
    }

    #[test]
    fn it_follows_new_messages_at_the_bottom() {
        let mut app_state = long_conversation();
        assert!(app_state.scroll.is_at_last());

        app_state.handle_backend_event(BackendEvent::UploadFailed("bad.pdf".to_string()));
        assert!(app_state.scroll.is_at_last());
    }

    #[test]
    fn it_keeps_the_position_when_scrolled_up() {
        let mut app_state = long_conversation();
        app_state.scroll.up_page();
        let position = app_state.scroll.position;
        assert!(!app_state.scroll.is_at_last());

        app_state.handle_backend_event(BackendEvent::UploadFailed("bad.pdf".to_string()));
        assert_eq!(app_state.scroll.position, position);
    }

    #[test]
    fn it_jumps_to_the_bottom_when_asking() {
        let mut app_state = long_conversation();
        app_state.scroll.up_page();

        app_state.submit_question("Who signed?");
        assert!(app_state.scroll.is_at_last());
    }
}

mod snapshots {
    use super::*;

    #[test]
    fn it_leaves_the_conversation_untouched() {
        let mut app_state = AppState::default();
        app_state.submit_question("Who signed?");
        let before = snapshot(&app_state);

        app_state.handle_backend_event(BackendEvent::CollectionStatsLoaded(CollectionStats {
            count: 12,
            name: Some("docmind_docs".to_string()),
            status: None,
        }));
        app_state.handle_backend_event(BackendEvent::SystemStatusLoaded(SystemStatus {
            ram_percent: Some(39.3),
            ..SystemStatus::default()
        }));

        assert_eq!(snapshot(&app_state), before);
        assert_eq!(app_state.collection_stats.as_ref().unwrap().count, 12);
        assert_eq!(app_state.system_status.as_ref().unwrap().ram_percent, Some(39.3));
    }

    #[test]
    fn it_keeps_stats_when_an_inspection_could_not_load_them() {
        let mut app_state = AppState::default();
        app_state.handle_backend_event(BackendEvent::CollectionStatsLoaded(CollectionStats {
            count: 12,
            name: None,
            status: None,
        }));

        app_state.handle_backend_event(BackendEvent::DocumentsInspected(None, vec![]));

        assert_eq!(app_state.collection_stats.as_ref().unwrap().count, 12);
        assert_eq!(app_state.inspected_documents, Some(vec![]));
    }

    #[test]
    fn it_never_rewrites_earlier_messages() {
        let mut app_state = AppState::default();
        app_state.submit_question("Who signed?");
        let before = snapshot(&app_state);

        app_state.handle_backend_event(answer("Alice and Bob."));
        app_state.handle_backend_event(BackendEvent::UploadFailed("bad.pdf".to_string()));

        let after = snapshot(&app_state);
        assert_eq!(&after[..before.len()], before.as_slice());
    }
}

mod handle_backend_event {
    use super::*;

    #[test]
    fn it_reports_an_unreachable_backend() {
        let mut app_state = AppState::default();
        app_state.handle_backend_event(BackendEvent::Unreachable("connection refused".to_string()));

        let last = app_state.conversation.last().unwrap();
        assert_eq!(last.message_type(), MessageType::Error);
        assert!(last.text.contains("connection refused"));
    }

    #[test]
    fn it_routes_notices_to_the_alert() {
        let mut app_state = AppState::default();
        app_state.handle_backend_event(BackendEvent::Notice(
            "Copied the last answer to your clipboard.".to_string(),
        ));

        assert_eq!(app_state.conversation.len(), 1);
        assert_eq!(
            app_state.alert,
            Some("Copied the last answer to your clipboard.".to_string())
        );
    }
}

mod handle_slash_commands {
    use super::*;

    #[test]
    fn it_breaks_on_quit() {
        let mut app_state = AppState::default();
        let (should_break, action) = app_state.handle_slash_commands("/q");

        assert!(should_break);
        assert_eq!(action, None);
        assert_eq!(app_state.conversation.len(), 1);
    }

    #[test]
    fn it_ignores_plain_text() {
        let mut app_state = AppState::default();
        let (should_break, action) = app_state.handle_slash_commands("What is /q?");

        assert!(!should_break);
        assert_eq!(action, None);
    }

    #[test]
    fn it_appends_help() {
        let mut app_state = AppState::default();
        app_state.handle_slash_commands("/help");

        let last = app_state.conversation.last().unwrap();
        assert!(last.text.starts_with("COMMANDS:"));
    }

    #[test]
    fn it_uploads_paths_with_spaces() {
        let mut app_state = AppState::default();
        let (_, action) = app_state.handle_slash_commands("/upload /tmp/my docs/contract.pdf");

        assert_eq!(
            action,
            Some(Action::UploadDocument("/tmp/my docs/contract.pdf".to_string()))
        );
        assert_eq!(app_state.upload.file_name, "contract.pdf");
    }

    #[test]
    fn it_requires_an_upload_path() {
        let mut app_state = AppState::default();
        let (_, action) = app_state.handle_slash_commands("/u");

        assert_eq!(action, None);
        assert_eq!(
            app_state.conversation.last().unwrap().message_type(),
            MessageType::Error
        );
        assert_eq!(app_state.upload, UploadState::default());
    }

    #[test]
    fn it_alerts_when_an_upload_is_in_flight() {
        let mut app_state = AppState::default();
        app_state.handle_slash_commands("/u /tmp/docs/contract.pdf");
        let (_, action) = app_state.handle_slash_commands("/u /tmp/docs/manual.pdf");

        assert_eq!(action, None);
        assert_eq!(app_state.upload.file_name, "contract.pdf");
        assert!(app_state.alert.as_ref().unwrap().contains("contract.pdf"));
    }

    #[test]
    fn it_alerts_when_an_upload_outlives_a_reset() {
        let mut app_state = AppState::default();
        app_state.handle_slash_commands("/u /tmp/docs/contract.pdf");
        app_state.handle_backend_event(BackendEvent::ResetSucceeded());

        let (_, action) = app_state.handle_slash_commands("/u /tmp/docs/manual.pdf");

        assert_eq!(action, None);
        assert_eq!(
            app_state.alert,
            Some("Still uploading contract.pdf, wait for it to finish.".to_string())
        );
    }

    #[test]
    fn it_switches_models() {
        let mut app_state = AppState::default();
        let (_, action) = app_state.handle_slash_commands("/model ollama");

        assert_eq!(action, None);
        assert_eq!(app_state.model, ModelName::Ollama);
        assert_eq!(app_state.conversation.len(), 1);
    }

    #[test]
    fn it_rejects_unknown_models() {
        let mut app_state = AppState::default();
        app_state.handle_slash_commands("/m gpt-5");

        let last = app_state.conversation.last().unwrap();
        assert_eq!(
            last.text,
            "No model named gpt-5. Possible values are: openai, ollama"
        );
        assert_eq!(app_state.model, ModelName::OpenAI);
    }

    #[test]
    fn it_asks_before_resetting() {
        let mut app_state = AppState::default();
        let (_, action) = app_state.handle_slash_commands("/reset");

        assert_eq!(action, None);
        assert!(app_state.awaiting_reset_confirmation);

        assert_eq!(
            app_state.confirm_reset(" Y "),
            Some(Action::ResetKnowledgeBase())
        );
        assert!(!app_state.awaiting_reset_confirmation);
    }

    #[test]
    fn it_aborts_the_reset_on_anything_but_yes() {
        let mut app_state = AppState::default();
        app_state.handle_slash_commands("/reset");

        assert_eq!(app_state.confirm_reset("n"), None);
        assert!(!app_state.awaiting_reset_confirmation);
        assert_eq!(app_state.conversation.len(), 1);
    }

    #[test]
    fn it_inspects_documents() {
        let mut app_state = AppState::default();
        let (_, action) = app_state.handle_slash_commands("/i");

        assert_eq!(action, Some(Action::InspectDocuments()));
    }

    #[test]
    fn it_copies_the_last_answer() {
        let mut app_state = AppState::default();
        app_state.submit_question("Who signed?");
        app_state.handle_backend_event(answer("Alice and Bob."));

        let (_, action) = app_state.handle_slash_commands("/copy");

        assert_eq!(action, Some(Action::CopyText("Alice and Bob.".to_string())));
    }
}
