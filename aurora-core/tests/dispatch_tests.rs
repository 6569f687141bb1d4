// File: aurora-core/tests/dispatch_tests.rs

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Duration;
use mockall::mock;

use aurora_common::models::Role;
use aurora_common::traits::provider_traits::{ImageHost, MessagingProvider, OutboundMessage};
use aurora_core::http::{FormRequest, HttpClient, HttpResponse};
use aurora_core::platforms::{ImgbbHost, ImgbbSettings, TwilioMessenger, TwilioSettings};
use aurora_core::repositories::InMemoryDesk;
use aurora_core::services::{ConversationService, DispatchService};
use aurora_core::test_utils::helpers::{at, chat_message};
use aurora_core::{Error, ErrorKind};

mock! {
    Http {}
    #[async_trait]
    impl HttpClient for Http {
        async fn post_form(&self, request: FormRequest) -> Result<HttpResponse, Error>;
    }
}

mock! {
    Messenger {}
    #[async_trait]
    impl MessagingProvider for Messenger {
        async fn send(&self, message: &OutboundMessage) -> Result<String, Error>;
    }
}

mock! {
    Images {}
    #[async_trait]
    impl ImageHost for Images {
        async fn upload(&self, image: &[u8]) -> Result<String, Error>;
    }
}

fn twilio_settings() -> TwilioSettings {
    TwilioSettings {
        account_sid: Some("AC123".into()),
        auth_token: Some("token".into()),
        from_number: Some("+14155238886".into()),
        ..Default::default()
    }
}

fn ok_json(body: &str) -> HttpResponse {
    HttpResponse {
        status: 201,
        body: body.to_string(),
    }
}

/// An HttpClient that records every request and answers with `response`.
fn recording_http(
    sink: Arc<Mutex<Vec<FormRequest>>>,
    response: HttpResponse,
) -> MockHttp {
    let mut http = MockHttp::new();
    http.expect_post_form().returning(move |req| {
        sink.lock().unwrap().push(req);
        Ok(response.clone())
    });
    http
}

#[tokio::test]
async fn recipient_prefix_is_idempotent() -> Result<(), Error> {
    let sink = Arc::new(Mutex::new(Vec::new()));
    let http = recording_http(sink.clone(), ok_json(r#"{"sid":"SM1"}"#));
    let twilio = TwilioMessenger::new(twilio_settings(), Arc::new(http));

    twilio.send(&OutboundMessage::text("whatsapp:+15551234", "hola")).await?;
    twilio.send(&OutboundMessage::text("+15551234", "hola")).await?;

    let sent = sink.lock().unwrap();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].field_value("To"), Some("whatsapp:+15551234"));
    assert_eq!(sent[0].field_value("To"), sent[1].field_value("To"));
    assert_eq!(sent[0].field_value("From"), Some("whatsapp:+14155238886"));
    assert_eq!(sent[0].basic_auth, Some(("AC123".to_string(), "token".to_string())));
    assert!(sent[0].url.ends_with("/2010-04-01/Accounts/AC123/Messages.json"));
    Ok(())
}

#[tokio::test]
async fn provider_rejection_surfaces_code_and_message() {
    let mut http = MockHttp::new();
    http.expect_post_form().times(1).returning(|_| {
        Ok(HttpResponse {
            status: 400,
            body: r#"{"code":21211,"message":"The 'To' number is not a valid phone number.","status":400}"#.into(),
        })
    });
    let twilio = TwilioMessenger::new(twilio_settings(), Arc::new(http));

    let err = twilio
        .send(&OutboundMessage::text("+1", "hola"))
        .await
        .expect_err("rejected send must fail");
    assert_eq!(err.kind(), ErrorKind::ProviderRejection);
    match err {
        Error::Provider { code, message, status, .. } => {
            assert_eq!(status, 400);
            assert_eq!(code, Some(21211));
            assert!(message.contains("not a valid phone number"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn missing_twilio_credentials_never_reach_network() {
    let mut http = MockHttp::new();
    http.expect_post_form().times(0);
    let settings = TwilioSettings {
        auth_token: None,
        ..twilio_settings()
    };
    let twilio = TwilioMessenger::new(settings, Arc::new(http));

    let err = twilio
        .send(&OutboundMessage::text("+15551234", "hola"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingConfiguration);
    assert!(err.to_string().contains("TWILIO_AUTH_TOKEN"));
}

#[tokio::test]
async fn image_send_without_api_key_makes_no_network_call() {
    let mut http = MockHttp::new();
    http.expect_post_form().times(0);
    let images = ImgbbHost::new(ImgbbSettings::default(), Arc::new(http));

    let mut messenger = MockMessenger::new();
    messenger.expect_send().times(0);

    let store = Arc::new(InMemoryDesk::new());
    let dispatch = DispatchService::new(Arc::new(messenger), Arc::new(images), store.clone());

    let err = dispatch
        .send_image("+15551234", b"\x89PNG....", Some("mira"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingConfiguration);
    assert!(store.messages().is_empty());
}

#[tokio::test]
async fn image_send_uploads_delivers_and_records() -> Result<(), Error> {
    let sink = Arc::new(Mutex::new(Vec::new()));
    let http = recording_http(
        sink.clone(),
        HttpResponse {
            status: 200,
            body: r#"{"data":{"url":"https://i.ibb.co/abc/photo.png"},"success":true,"status":200}"#.into(),
        },
    );
    let images = ImgbbHost::new(
        ImgbbSettings {
            api_key: Some("k3y".into()),
            ..Default::default()
        },
        Arc::new(http),
    );

    let mut messenger = MockMessenger::new();
    messenger
        .expect_send()
        .withf(|m: &OutboundMessage| {
            m.media_url.as_deref() == Some("https://i.ibb.co/abc/photo.png")
                && m.body.as_deref() == Some("nuevo modelo")
        })
        .times(1)
        .returning(|_| Ok("SM42".to_string()));

    let store = Arc::new(InMemoryDesk::new());
    let dispatch = DispatchService::new(Arc::new(messenger), Arc::new(images), store.clone());

    let sent = dispatch
        .send_image("+15551234", &[1, 2, 3], Some("  nuevo modelo "))
        .await?;
    assert_eq!(sent.sid, "SM42");
    assert_eq!(sent.media_url.as_deref(), Some("https://i.ibb.co/abc/photo.png"));

    let upload = &sink.lock().unwrap()[0];
    assert_eq!(upload.query, vec![("key".to_string(), "k3y".to_string())]);
    assert_eq!(upload.field_value("image"), Some("AQID"));

    let rows = store.messages();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, sent.message_id);
    assert_eq!(rows[0].role, Role::Assistant);
    assert_eq!(rows[0].message, "nuevo modelo");
    assert_eq!(rows[0].media_url.as_deref(), Some("https://i.ibb.co/abc/photo.png"));
    Ok(())
}

#[tokio::test]
async fn failed_delivery_after_upload_records_nothing() {
    let mut images = MockImages::new();
    images
        .expect_upload()
        .times(1)
        .returning(|_| Ok("https://i.ibb.co/orphan.png".to_string()));

    let mut messenger = MockMessenger::new();
    messenger.expect_send().times(1).returning(|_| {
        Err(Error::Provider {
            provider: "twilio",
            status: 401,
            code: Some(20003),
            message: "Authenticate".into(),
        })
    });

    let store = Arc::new(InMemoryDesk::new());
    let dispatch = DispatchService::new(Arc::new(messenger), Arc::new(images), store.clone());

    let err = dispatch.send_image("+15551234", &[7], None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ProviderRejection);
    assert!(store.messages().is_empty());
}

#[tokio::test]
async fn text_reply_is_sent_and_recorded() -> Result<(), Error> {
    let mut messenger = MockMessenger::new();
    messenger
        .expect_send()
        .withf(|m: &OutboundMessage| m.to == "+15551234" && m.body.as_deref() == Some("Hola!"))
        .times(1)
        .returning(|_| Ok("SM7".to_string()));
    let mut images = MockImages::new();
    images.expect_upload().times(0);

    let store = Arc::new(InMemoryDesk::new());
    let dispatch = DispatchService::new(Arc::new(messenger), Arc::new(images), store.clone());

    let sent = dispatch.send_text(" +15551234 ", " Hola! ").await?;
    assert_eq!(sent.sid, "SM7");
    assert!(sent.media_url.is_none());

    let rows = store.messages();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].phone_number, "+15551234");
    assert_eq!(rows[0].message, "Hola!");
    Ok(())
}

#[tokio::test]
async fn blank_reply_is_rejected_before_sending() {
    let mut messenger = MockMessenger::new();
    messenger.expect_send().times(0);
    let images = MockImages::new();
    let dispatch = DispatchService::new(
        Arc::new(messenger),
        Arc::new(images),
        Arc::new(InMemoryDesk::new()),
    );

    let err = dispatch.send_text("+15551234", "   ").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[tokio::test]
async fn prefixed_recipient_replies_into_the_same_conversation() -> Result<(), Error> {
    let sink = Arc::new(Mutex::new(Vec::new()));
    let http: Arc<dyn HttpClient> = Arc::new(recording_http(sink.clone(), ok_json(r#"{"sid":"SM8"}"#)));
    let twilio = TwilioMessenger::new(twilio_settings(), http);
    let mut images = MockImages::new();
    images
        .expect_upload()
        .returning(|_| Ok("https://i.ibb.co/q/x.png".to_string()));

    let store = Arc::new(InMemoryDesk::new());
    store.push_message(chat_message(1, "+15551234", Role::User, "hola", at(2024, 1, 2, 9, 0)));
    let dispatch = DispatchService::new(Arc::new(twilio), Arc::new(images), store.clone());
    let reader = ConversationService::new(store.clone(), Duration::seconds(60));

    dispatch.send_text("whatsapp:+15551234", "respuesta").await?;
    dispatch.send_image("WhatsApp:+15551234", &[1, 2, 3], None).await?;

    let phones: Vec<String> = store.messages().into_iter().map(|m| m.phone_number).collect();
    assert_eq!(phones, vec!["+15551234", "+15551234", "+15551234"]);
    assert_eq!(sink.lock().unwrap()[0].field_value("To"), Some("whatsapp:+15551234"));

    assert_eq!(reader.conversation("+15551234").await?.len(), 3);
    assert_eq!(reader.conversation("whatsapp:+15551234").await?.len(), 3);
    let listed = reader.recent_conversations(None).await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].phone_number, "+15551234");
    Ok(())
}

#[tokio::test]
async fn prefix_alone_is_not_a_recipient() {
    let mut messenger = MockMessenger::new();
    messenger.expect_send().times(0);
    let mut images = MockImages::new();
    images.expect_upload().times(0);
    let dispatch = DispatchService::new(
        Arc::new(messenger),
        Arc::new(images),
        Arc::new(InMemoryDesk::new()),
    );

    let err = dispatch.send_image("whatsapp:", &[1], None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}
