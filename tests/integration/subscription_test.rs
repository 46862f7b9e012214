//! Integration tests for subscription establishment and filtered delivery.

mod helpers;

use std::collections::HashSet;
use std::time::Duration;

use chatty_auth::AuthContext;
use chatty_core::error::ErrorKind;
use chatty_core::events::{ChatEvent, Topic};
use chatty_core::types::GroupId;
use chatty_realtime::SubscriptionAuthorizer;
use chatty_realtime::filter::authorizer::message_filter;
use chatty_service::CreateMessageInput;

fn authorizer(app: &helpers::TestApp) -> SubscriptionAuthorizer {
    SubscriptionAuthorizer::new(app.store.groups.clone(), app.state.bus.clone())
}

fn ctx(app: &helpers::TestApp, user: &helpers::TestUser) -> AuthContext {
    app.state
        .auth_builder
        .for_request(Some(&format!("Bearer {}", user.token)))
}

async fn post(app: &helpers::TestApp, author: &helpers::TestUser, group: GroupId, text: &str) {
    app.state
        .message_logic
        .create(
            &ctx(app, author),
            CreateMessageInput {
                group_id: group,
                text: text.into(),
            },
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_establishment_requires_every_group() {
    let app = helpers::TestApp::new();
    let alice = app.signup("alice").await;
    let carol = app.signup("carol").await;

    let g1 = app.create_group(&alice, "one", &[]).await;
    let g2 = app.create_group(&alice, "two", &[]).await;
    let g3 = app.create_group(&carol, "three", &[]).await;

    let authorizer = authorizer(&app);
    let alice_ctx = ctx(&app, &alice);

    let denied = authorizer
        .message_created(&alice_ctx, &[g1, g2, g3])
        .await
        .unwrap_err();
    assert_eq!(denied.kind, ErrorKind::Unauthorized);
    assert_eq!(app.state.bus.subscriber_count(Topic::MessageCreated), 0);

    let granted = authorizer.message_created(&alice_ctx, &[g1, g2]).await.unwrap();
    assert_eq!(granted.topic(), Topic::MessageCreated);
    assert_eq!(app.state.bus.subscriber_count(Topic::MessageCreated), 1);

    drop(granted);
    assert_eq!(app.state.bus.subscriber_count(Topic::MessageCreated), 0);
}

#[tokio::test]
async fn test_anonymous_cannot_subscribe() {
    let app = helpers::TestApp::new();
    let alice = app.signup("alice").await;
    let group = app.create_group(&alice, "solo", &[]).await;

    let anonymous = app.state.auth_builder.for_request(None);
    let denied = authorizer(&app)
        .message_created(&anonymous, &[group])
        .await
        .unwrap_err();
    assert_eq!(denied.kind, ErrorKind::Unauthorized);
}

#[tokio::test]
async fn test_member_subscribes_outsider_refused() {
    let app = helpers::TestApp::new();
    let alice = app.signup("alice").await;
    let bob = app.signup("bob").await;
    let carol = app.signup("carol").await;
    app.befriend(&alice, &bob).await;
    let group = app.create_group(&alice, "pair", &[&bob]).await;

    let authorizer = authorizer(&app);
    assert!(
        authorizer
            .message_created(&ctx(&app, &alice), &[group])
            .await
            .is_ok()
    );

    let refused = authorizer
        .message_created(&ctx(&app, &carol), &[group])
        .await
        .unwrap_err();
    assert_eq!(refused.kind, ErrorKind::Unauthorized);
}

#[tokio::test]
async fn test_delivery_reaches_members_only() {
    let app = helpers::TestApp::new();
    let alice = app.signup("alice").await;
    let bob = app.signup("bob").await;
    let carol = app.signup("carol").await;
    app.befriend(&alice, &bob).await;
    let group = app.create_group(&alice, "pair", &[&bob]).await;

    let authorizer = authorizer(&app);
    let mut alice_sub = authorizer
        .message_created(&ctx(&app, &alice), &[group])
        .await
        .unwrap();
    let mut bob_sub = authorizer
        .message_created(&ctx(&app, &bob), &[group])
        .await
        .unwrap();

    // A stale registration that bypassed establishment.
    let requested: HashSet<GroupId> = [group].into_iter().collect();
    let mut carol_sub = app
        .state
        .bus
        .subscribe(Topic::MessageCreated, message_filter(carol.id, requested));

    post(&app, &alice, group, "hello bob").await;

    let event = tokio::time::timeout(Duration::from_secs(1), bob_sub.recv())
        .await
        .expect("Bob never received the message")
        .expect("Subscription closed");
    match event {
        ChatEvent::MessageCreated(created) => {
            assert_eq!(created.group_id, group);
            assert_eq!(created.author_id, alice.id);
            assert_eq!(created.text, "hello bob");
        }
        other => panic!("Unexpected event: {other:?}"),
    }

    assert!(carol_sub.try_recv().is_none());
    // Authors are not echoed their own messages.
    assert!(alice_sub.try_recv().is_none());
}

#[tokio::test]
async fn test_removed_member_stops_receiving() {
    let app = helpers::TestApp::new();
    let alice = app.signup("alice").await;
    let bob = app.signup("bob").await;
    app.befriend(&alice, &bob).await;
    let group = app.create_group(&alice, "pair", &[&bob]).await;

    let mut bob_sub = authorizer(&app)
        .message_created(&ctx(&app, &bob), &[group])
        .await
        .unwrap();

    app.state
        .group_logic
        .leave(&ctx(&app, &bob), group)
        .await
        .unwrap();

    post(&app, &alice, group, "anyone there?").await;
    assert!(bob_sub.try_recv().is_none());
}

#[tokio::test]
async fn test_group_created_reaches_invited_members() {
    let app = helpers::TestApp::new();
    let alice = app.signup("alice").await;
    let bob = app.signup("bob").await;
    let carol = app.signup("carol").await;
    app.befriend(&alice, &bob).await;

    let authorizer = authorizer(&app);

    let denied = authorizer
        .group_created(&ctx(&app, &carol), bob.id)
        .await
        .unwrap_err();
    assert_eq!(denied.kind, ErrorKind::Unauthorized);

    let mut alice_sub = authorizer
        .group_created(&ctx(&app, &alice), alice.id)
        .await
        .unwrap();
    let mut bob_sub = authorizer
        .group_created(&ctx(&app, &bob), bob.id)
        .await
        .unwrap();
    let mut carol_sub = authorizer
        .group_created(&ctx(&app, &carol), carol.id)
        .await
        .unwrap();

    let group = app.create_group(&alice, "pair", &[&bob]).await;

    match bob_sub.try_recv() {
        Some(ChatEvent::GroupCreated(created)) => {
            assert_eq!(created.group_id, group);
            assert_eq!(created.created_by, alice.id);
            assert!(created.member_ids.contains(&bob.id));
        }
        other => panic!("Unexpected delivery: {other:?}"),
    }
    assert!(carol_sub.try_recv().is_none());
    assert!(alice_sub.try_recv().is_none());
}
