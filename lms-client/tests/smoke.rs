use lms_client::models::{CreateCommunityRequest, CreatePostRequest};
use lms_client::{DEFAULT_PAGE_LIMIT, LmsClient, LmsClientError};

fn client_from_env() -> LmsClient {
    let base_url =
        std::env::var("LMS_API_URL").unwrap_or_else(|_| "http://127.0.0.1:8000".to_string());
    let token = std::env::var("LMS_TOKEN").expect("LMS_TOKEN must be set for smoke tests");
    let mut client = LmsClient::new(base_url).expect("client builds");
    client.set_token(token);
    client
}

#[tokio::test]
#[ignore = "requires running LMS API and a valid LMS_TOKEN"]
async fn chat_smoke_flow() {
    let client = client_from_env();

    let session = client
        .create_session()
        .await
        .expect("create_session must succeed");

    let reply = client
        .send_message(session.id, "What is a derivative?")
        .await
        .expect("send_message must succeed");
    assert_eq!(reply.session_id, session.id);
    assert!(reply.sender.is_assistant());

    let fetched = client
        .get_session(session.id)
        .await
        .expect("get_session must succeed");
    assert!(fetched.messages.len() >= 2);

    let renamed = client
        .rename_session(session.id, "Calculus")
        .await
        .expect("rename_session must succeed");
    assert_eq!(renamed.title.as_deref(), Some("Calculus"));

    client
        .delete_session(session.id)
        .await
        .expect("delete_session must succeed");

    let after_delete = client.get_session(session.id).await;
    assert!(matches!(after_delete, Err(LmsClientError::NotFound)));
}

#[tokio::test]
#[ignore = "requires running LMS API and a valid LMS_TOKEN"]
async fn community_smoke_flow() {
    let client = client_from_env();

    let community = client
        .create_community(&CreateCommunityRequest {
            name: "Smoke test community".to_string(),
            description: "created by smoke test".to_string(),
            is_private: Some(false),
        })
        .await
        .expect("create_community must succeed");

    let joined_again = client.join_community(community.id).await;
    assert!(matches!(
        joined_again,
        Err(LmsClientError::InvalidRequest(ref msg)) if msg == "Already a member"
    ));

    let post = client
        .create_post(&CreatePostRequest {
            community_id: community.id,
            title: "Hello".to_string(),
            content: "First post".to_string(),
            media_url: None,
        })
        .await
        .expect("create_post must succeed");

    let posts = client
        .list_community_posts(community.id, 0, DEFAULT_PAGE_LIMIT)
        .await
        .expect("list_community_posts must succeed");
    assert!(posts.iter().any(|p| p.id == post.id));

    let liked = client.like_post(post.id).await.expect("like must succeed");
    assert_eq!(liked.liked(), Some(true));

    let comment = client
        .create_comment(post.id, "Nice")
        .await
        .expect("create_comment must succeed");
    let comments = client
        .list_comments(post.id)
        .await
        .expect("list_comments must succeed");
    assert!(comments.iter().any(|c| c.id == comment.id));

    client
        .delete_community(community.id)
        .await
        .expect("delete_community must succeed");
}
