// File: aurora-core/tests/conversation_tests.rs

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use mockall::mock;
use mockall::predicate::eq;

use aurora_common::models::{ChatMessage, ConversationSummary, NewChatMessage, Role};
use aurora_common::traits::repository_traits::ChatHistoryRepository;
use aurora_core::repositories::InMemoryDesk;
use aurora_core::services::{ConversationService, RECENT_CHATS_LIMIT};
use aurora_core::test_utils::helpers::{at, chat_message};
use aurora_core::Error;

mock! {
    ChatRepo {}
    #[async_trait]
    impl ChatHistoryRepository for ChatRepo {
        async fn list_conversation(&self, phone_number: &str) -> Result<Vec<ChatMessage>, Error>;
        async fn latest_per_conversation(
            &self,
            on_date: Option<NaiveDate>,
            limit: i64,
        ) -> Result<Vec<ConversationSummary>, Error>;
        async fn insert_message(&self, msg: &NewChatMessage) -> Result<i32, Error>;
    }
}

fn service_over(desk: Arc<InMemoryDesk>) -> ConversationService {
    ConversationService::new(desk, Duration::seconds(60))
}

#[tokio::test]
async fn conversation_is_oldest_first() -> Result<(), Error> {
    let desk = Arc::new(InMemoryDesk::new());
    desk.push_message(chat_message(2, "+1", Role::Assistant, "second", at(2024, 1, 2, 10, 5)));
    desk.push_message(chat_message(1, "+1", Role::User, "first", at(2024, 1, 2, 10, 0)));
    desk.push_message(chat_message(3, "+2", Role::User, "other chat", at(2024, 1, 2, 9, 0)));

    let messages = service_over(desk).conversation("+1").await?;
    let texts: Vec<&str> = messages.iter().map(|m| m.message.as_str()).collect();
    assert_eq!(texts, vec!["first", "second"]);
    Ok(())
}

#[tokio::test]
async fn recent_conversations_one_row_per_phone_sorted_by_phone() -> Result<(), Error> {
    let desk = Arc::new(InMemoryDesk::new());
    desk.push_message(chat_message(1, "+3", Role::User, "c-old", at(2024, 1, 1, 8, 0)));
    desk.push_message(chat_message(2, "+3", Role::User, "c-new", at(2024, 1, 2, 8, 0)));
    desk.push_message(chat_message(3, "+1", Role::User, "a", at(2024, 1, 2, 7, 0)));
    desk.push_message(chat_message(4, "+2", Role::User, "b", at(2024, 1, 1, 7, 0)));

    let service = service_over(desk);
    let all = service.recent_conversations(None).await?;
    let rows: Vec<(&str, &str)> = all
        .iter()
        .map(|s| (s.phone_number.as_str(), s.last_message.as_str()))
        .collect();
    assert_eq!(rows, vec![("+1", "a"), ("+2", "b"), ("+3", "c-new")]);

    let jan_first = service
        .recent_conversations(NaiveDate::from_ymd_opt(2024, 1, 1))
        .await?;
    let rows: Vec<(&str, &str)> = jan_first
        .iter()
        .map(|s| (s.phone_number.as_str(), s.last_message.as_str()))
        .collect();
    assert_eq!(rows, vec![("+2", "b"), ("+3", "c-old")]);
    Ok(())
}

#[tokio::test]
async fn date_with_no_messages_is_an_empty_list() -> Result<(), Error> {
    let desk = Arc::new(InMemoryDesk::new());
    desk.push_message(chat_message(1, "+1", Role::User, "hola", at(2024, 1, 2, 7, 0)));

    let rows = service_over(desk)
        .recent_conversations(NaiveDate::from_ymd_opt(2030, 6, 1))
        .await?;
    assert!(rows.is_empty());
    Ok(())
}

#[tokio::test]
async fn recent_conversations_are_capped() -> Result<(), Error> {
    let desk = Arc::new(InMemoryDesk::new());
    for i in 0..(RECENT_CHATS_LIMIT as i32 + 10) {
        desk.push_message(chat_message(i + 1, &format!("+1555{i:04}"), Role::User, "hi", at(2024, 1, 2, 7, 0)));
    }
    let rows = service_over(desk).recent_conversations(None).await?;
    assert_eq!(rows.len() as i64, RECENT_CHATS_LIMIT);
    assert_eq!(rows[0].phone_number, "+15550000");
    Ok(())
}

#[tokio::test]
async fn recent_conversations_are_memoized_until_invalidated() -> Result<(), Error> {
    let mut repo = MockChatRepo::new();
    repo.expect_latest_per_conversation()
        .with(eq(None), eq(RECENT_CHATS_LIMIT))
        .times(2)
        .returning(|_, _| Ok(vec![]));
    let service = ConversationService::new(Arc::new(repo), Duration::seconds(60));

    service.recent_conversations(None).await?;
    service.recent_conversations(None).await?;
    service.invalidate_recent();
    service.recent_conversations(None).await?;
    Ok(())
}

#[tokio::test]
async fn thread_resolves_quotes_from_loaded_history() -> Result<(), Error> {
    let desk = Arc::new(InMemoryDesk::new());
    desk.push_message(chat_message(1, "+1", Role::User, "¿precio?", at(2024, 1, 2, 10, 0)));
    let mut reply = chat_message(2, "+1", Role::Assistant, "$20", at(2024, 1, 2, 10, 1));
    reply.quoted_sid = Some("1".into());
    desk.push_message(reply);

    let view = service_over(desk).thread("+1").await?;
    assert_eq!(view.entries.len(), 2);
    assert_eq!(view.entries[1].quote.as_ref().map(|q| q.text.as_str()), Some("¿precio?"));
    Ok(())
}

#[tokio::test]
async fn blank_phone_is_rejected() {
    let service = service_over(Arc::new(InMemoryDesk::new()));
    assert!(service.conversation("  ").await.is_err());
}
