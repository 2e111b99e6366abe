//! HTTP behaviour against the in-memory repository and stub collaborators.

use std::sync::Arc;
use std::time::Duration;

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use async_trait::async_trait;
use serde_json::{Value, json};

use devlog_core::domain::SeoMetadata;
use devlog_core::ports::{
    AssistantError, ContentAssistant, GeneratePostParams, GeneratedPost, RateLimitError,
    RateLimitResult, RateLimiter,
};
use devlog_infra::InMemoryPostRepository;

use super::configure_routes;
use crate::observability::RequestIdMiddleware;
use crate::state::AppState;

struct StubAssistant {
    fail: bool,
}

impl StubAssistant {
    fn check(&self) -> Result<(), AssistantError> {
        if self.fail {
            Err(AssistantError::Request("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ContentAssistant for StubAssistant {
    async fn generate_post(
        &self,
        params: &GeneratePostParams,
    ) -> Result<GeneratedPost, AssistantError> {
        self.check()?;
        Ok(GeneratedPost {
            title: format!("All About {}!", params.topic),
            excerpt: "A generated excerpt".to_string(),
            content: "## Intro\n\nGenerated body".to_string(),
            suggested_tags: params.tags.clone(),
        })
    }

    async fn explain_code(&self, _code: &str, language: &str) -> Result<String, AssistantError> {
        self.check()?;
        Ok(format!("This {language} snippet prints a value."))
    }

    async fn seo_metadata(
        &self,
        title: &str,
        _content: &str,
    ) -> Result<SeoMetadata, AssistantError> {
        self.check()?;
        Ok(SeoMetadata {
            seo_title: Some(title.to_string()),
            seo_description: Some("Description".to_string()),
            seo_keywords: vec!["rust".to_string()],
        })
    }

    async fn improve_content(
        &self,
        content: &str,
        _improvements: &[String],
    ) -> Result<String, AssistantError> {
        self.check()?;
        Ok(content.to_uppercase())
    }

    async fn related_topics(
        &self,
        topic: &str,
        _category: &str,
    ) -> Result<Vec<String>, AssistantError> {
        self.check()?;
        Ok(vec![format!("Advanced {topic}"), format!("{topic} in practice")])
    }
}

struct DenyAll;

#[async_trait]
impl RateLimiter for DenyAll {
    async fn check(&self, _key: &str) -> Result<RateLimitResult, RateLimitError> {
        Ok(RateLimitResult {
            allowed: false,
            reset_after: Duration::from_secs(30),
        })
    }
}

fn state() -> AppState {
    AppState {
        posts: Arc::new(InMemoryPostRepository::new()),
        assistant: None,
        ai_limiter: None,
    }
}

fn with_assistant(fail: bool) -> AppState {
    AppState {
        assistant: Some(Arc::new(StubAssistant { fail })),
        ..state()
    }
}

macro_rules! app {
    ($state:expr) => {{
        let state: AppState = $state;
        test::init_service(
            App::new()
                .wrap(RequestIdMiddleware)
                .app_data(web::Data::new(state.clone()))
                .configure(configure_routes(state.ai_limiter.clone())),
        )
        .await
    }};
}

fn post_body(slug: &str, status: &str) -> Value {
    json!({
        "title": format!("Title {slug}"),
        "slug": slug,
        "excerpt": "An excerpt",
        "content": format!("Body of {slug}"),
        "category": "Rust",
        "author": { "name": "Ada", "email": "ada@example.com" },
        "tags": ["rust", "async"],
        "status": status,
    })
}

async fn read_json<B: MessageBody>(resp: ServiceResponse<B>) -> Value {
    test::read_body_json(resp).await
}

#[actix_web::test]
async fn test_health_reports_assistant_availability() {
    let app = app!(state());

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = read_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["assistant"], false);
}

#[actix_web::test]
async fn test_create_returns_201_and_echoes_input() {
    let app = app!(state());

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .set_json(post_body("hello-rust", "published"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body = read_json(resp).await;
    assert_eq!(body["slug"], "hello-rust");
    assert_eq!(body["title"], "Title hello-rust");
    assert_eq!(body["content"], "Body of hello-rust");
    assert_eq!(body["views"], 0);
    assert_eq!(body["readTime"], 5);
    assert!(body["_id"].is_string());
    assert!(body["publishedAt"].is_string());
}

#[actix_web::test]
async fn test_create_reports_every_missing_field() {
    let app = app!(state());

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .set_json(json!({ "title": "Only a title", "slug": "  ", "content": "Body" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body = read_json(resp).await;
    assert_eq!(body["status"], 400);
    assert_eq!(
        body["detail"],
        "Missing required fields: slug, excerpt, category, author"
    );
}

#[actix_web::test]
async fn test_duplicate_slug_conflicts() {
    let app = app!(state());

    for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(post_body("same-slug", "draft"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), expected);
    }
}

#[actix_web::test]
async fn test_malformed_json_is_a_problem_document() {
    let app = app!(state());

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body = read_json(resp).await;
    assert_eq!(body["title"], "Bad Request");
    assert!(body["request_id"].is_string());
}

#[actix_web::test]
async fn test_unknown_id_is_404_for_get_put_and_delete() {
    let app = app!(state());
    let uri = "/api/posts/does-not-exist";

    let requests = [
        test::TestRequest::get().uri(uri).to_request(),
        test::TestRequest::put()
            .uri(uri)
            .set_json(json!({ "title": "x" }))
            .to_request(),
        test::TestRequest::delete().uri(uri).to_request(),
        test::TestRequest::post()
            .uri(&format!("{uri}/views"))
            .to_request(),
    ];
    for req in requests {
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}

#[actix_web::test]
async fn test_update_then_delete_then_get_is_404() {
    let app = app!(state());

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .set_json(post_body("lifecycle", "draft"))
        .to_request();
    let created = read_json(test::call_service(&app, req).await).await;
    let uri = format!("/api/posts/{}", created["_id"].as_str().unwrap());

    let req = test::TestRequest::put()
        .uri(&uri)
        .set_json(json!({ "title": "Renamed", "status": "published" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated = read_json(resp).await;
    assert_eq!(updated["title"], "Renamed");
    assert_eq!(updated["slug"], "lifecycle");
    assert_eq!(updated["status"], "published");

    let resp = test::call_service(&app, test::TestRequest::delete().uri(&uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(read_json(resp).await["message"], "Post deleted successfully");

    let resp = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_publishing_a_draft_puts_it_first_on_the_blog() {
    let app = app!(state());

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .set_json(post_body("draft-first", "draft"))
        .to_request();
    let draft = read_json(test::call_service(&app, req).await).await;
    assert!(draft.get("publishedAt").is_none());

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .set_json(post_body("older-pub", "published"))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/posts/{}", draft["_id"].as_str().unwrap()))
        .set_json(json!({ "status": "published" }))
        .to_request();
    let updated = read_json(test::call_service(&app, req).await).await;
    assert!(updated["publishedAt"].is_string());

    let req = test::TestRequest::get().uri("/api/blog").to_request();
    let listing = read_json(test::call_service(&app, req).await).await;
    let order: Vec<&str> = listing["posts"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|p| p["slug"].as_str())
        .collect();
    assert_eq!(order, ["draft-first", "older-pub"]);
}

#[actix_web::test]
async fn test_category_and_tag_filters() {
    let app = app!(state());

    let mut cloud = post_body("cloud-post", "published");
    cloud["category"] = json!("Cloud");
    cloud["tags"] = json!(["aws"]);
    let mut draft = post_body("cloud-draft", "draft");
    draft["category"] = json!("Cloud");
    draft["tags"] = json!(["aws"]);
    for body in [cloud, draft, post_body("rust-post", "published")] {
        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(body)
            .to_request();
        test::call_service(&app, req).await;
    }

    let req = test::TestRequest::get()
        .uri("/api/posts?category=Cloud")
        .to_request();
    let body = read_json(test::call_service(&app, req).await).await;
    assert_eq!(body["total"], 2);
    let posts = body["posts"].as_array().unwrap();
    assert!(posts.iter().all(|p| p["category"] == "Cloud"));

    let req = test::TestRequest::get().uri("/api/blog?tag=aws").to_request();
    let body = read_json(test::call_service(&app, req).await).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["posts"][0]["slug"], "cloud-post");

    let req = test::TestRequest::get()
        .uri("/api/blog?category=Rust&tag=async")
        .to_request();
    let body = read_json(test::call_service(&app, req).await).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["posts"][0]["slug"], "rust-post");
}

#[actix_web::test]
async fn test_create_accepts_author_without_email() {
    let app = app!(state());

    let mut body = post_body("no-email", "draft");
    body["author"] = json!({ "name": "Ada" });
    body["tags"] = Value::Null;
    let req = test::TestRequest::post()
        .uri("/api/posts")
        .set_json(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = read_json(resp).await;
    assert_eq!(created["author"]["name"], "Ada");
    assert_eq!(created["tags"], json!([]));
}

#[actix_web::test]
async fn test_published_filter_never_returns_drafts() {
    let app = app!(state());

    for (slug, status) in [("a", "published"), ("b", "draft"), ("c", "published")] {
        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(post_body(slug, status))
            .to_request();
        test::call_service(&app, req).await;
    }

    let req = test::TestRequest::get()
        .uri("/api/posts?status=published")
        .to_request();
    let body = read_json(test::call_service(&app, req).await).await;
    assert_eq!(body["total"], 2);
    let posts = body["posts"].as_array().unwrap();
    assert!(posts.iter().all(|p| p["status"] == "published"));

    let req = test::TestRequest::get().uri("/api/posts?status=archived").to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );
}

#[actix_web::test]
async fn test_search_matches_content_only_substring() {
    let app = app!(state());

    let mut body = post_body("needle", "published");
    body["content"] = json!("There is a Haystack-Needle hidden here");
    let req = test::TestRequest::post()
        .uri("/api/posts")
        .set_json(body)
        .to_request();
    test::call_service(&app, req).await;
    let req = test::TestRequest::post()
        .uri("/api/posts")
        .set_json(post_body("other", "published"))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get()
        .uri("/api/posts?search=haystack-needle")
        .to_request();
    let body = read_json(test::call_service(&app, req).await).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["posts"][0]["slug"], "needle");
}

#[actix_web::test]
async fn test_second_page_holds_the_remainder() {
    let app = app!(state());

    for i in 0..15 {
        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(post_body(&format!("post-{i}"), "published"))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::CREATED
        );
    }

    let req = test::TestRequest::get()
        .uri("/api/posts?page=2&limit=10")
        .to_request();
    let body = read_json(test::call_service(&app, req).await).await;
    assert_eq!(body["posts"].as_array().map(Vec::len), Some(5));
    assert_eq!(body["total"], 15);
    assert_eq!(body["page"], 2);
    assert_eq!(body["totalPages"], 2);
}

#[actix_web::test]
async fn test_concurrent_view_increments_are_not_lost() {
    let app = app!(state());

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .set_json(post_body("popular", "published"))
        .to_request();
    let created = read_json(test::call_service(&app, req).await).await;
    let id = created["_id"].as_str().unwrap().to_string();
    let views = format!("/api/posts/{id}/views");

    let (a, b) = futures::join!(
        test::call_service(&app, test::TestRequest::post().uri(&views).to_request()),
        test::call_service(&app, test::TestRequest::post().uri(&views).to_request()),
    );
    assert_eq!(a.status(), StatusCode::OK);
    assert_eq!(b.status(), StatusCode::OK);

    let likes = format!("/api/posts/{id}/likes");
    let liked = read_json(
        test::call_service(&app, test::TestRequest::post().uri(&likes).to_request()).await,
    )
    .await;
    assert_eq!(liked["likes"], 1);

    let req = test::TestRequest::get()
        .uri(&format!("/api/posts/{id}"))
        .to_request();
    let post = read_json(test::call_service(&app, req).await).await;
    assert_eq!(post["views"], 2);
}

#[actix_web::test]
async fn test_blog_hides_drafts_and_renders_blocks() {
    let app = app!(state());

    let mut published = post_body("rendered", "published");
    published["content"] = json!("## Setup\n\nRun `cargo new` first.\n\n```bash\ncargo run\n```");
    published["featured"] = json!(true);
    for body in [published, post_body("hidden", "draft")] {
        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(body)
            .to_request();
        test::call_service(&app, req).await;
    }

    let req = test::TestRequest::get().uri("/api/blog/rendered").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = read_json(resp).await;
    assert_eq!(body["post"]["slug"], "rendered");
    assert_eq!(
        body["blocks"],
        json!([
            { "type": "heading", "level": 2, "text": "Setup" },
            { "type": "paragraph", "html": "Run <code>cargo new</code> first." },
            { "type": "code", "language": "bash", "code": "cargo run" },
        ])
    );

    let req = test::TestRequest::get().uri("/api/blog/hidden").to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    let req = test::TestRequest::get().uri("/api/blog").to_request();
    let listing = read_json(test::call_service(&app, req).await).await;
    assert_eq!(listing["total"], 1);

    let req = test::TestRequest::get().uri("/api/blog/featured").to_request();
    let featured = read_json(test::call_service(&app, req).await).await;
    assert_eq!(featured.as_array().map(Vec::len), Some(1));
    assert_eq!(featured[0]["slug"], "rendered");
}

#[actix_web::test]
async fn test_taxonomy_and_stats() {
    let app = app!(state());

    for (slug, status) in [("one", "published"), ("two", "published"), ("three", "draft")] {
        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(post_body(slug, status))
            .to_request();
        test::call_service(&app, req).await;
    }

    let req = test::TestRequest::get().uri("/api/categories").to_request();
    let categories = read_json(test::call_service(&app, req).await).await;
    assert!(categories["known"].as_array().unwrap().contains(&json!("DevOps")));
    assert_eq!(categories["counts"], json!([{ "name": "Rust", "count": 2 }]));

    let req = test::TestRequest::get().uri("/api/tags").to_request();
    let tags = read_json(test::call_service(&app, req).await).await;
    assert_eq!(
        tags,
        json!([{ "name": "async", "count": 2 }, { "name": "rust", "count": 2 }])
    );

    let req = test::TestRequest::get().uri("/api/admin/stats").to_request();
    let stats = read_json(test::call_service(&app, req).await).await;
    assert_eq!(stats["totalPosts"], 3);
    assert_eq!(stats["publishedPosts"], 2);
    assert_eq!(stats["draftPosts"], 1);
    assert_eq!(stats["totalViews"], 0);
}

#[actix_web::test]
async fn test_ai_endpoints_unavailable_without_assistant() {
    let app = app!(state());

    let req = test::TestRequest::post()
        .uri("/api/ai/explain")
        .set_json(json!({ "code": "print(1)", "language": "python" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[actix_web::test]
async fn test_ai_generate_adds_slug() {
    let app = app!(with_assistant(false));

    let req = test::TestRequest::post()
        .uri("/api/ai/generate")
        .set_json(json!({ "topic": "Lifetimes", "tags": ["rust"], "tone": "casual" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = read_json(resp).await;
    assert_eq!(body["title"], "All About Lifetimes!");
    assert_eq!(body["slug"], "all-about-lifetimes");
    assert_eq!(body["suggestedTags"], json!(["rust"]));

    let req = test::TestRequest::post()
        .uri("/api/ai/generate")
        .set_json(json!({ "tone": "casual" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );
}

#[actix_web::test]
async fn test_ai_text_endpoints() {
    let app = app!(with_assistant(false));

    let req = test::TestRequest::post()
        .uri("/api/ai/explain")
        .set_json(json!({ "code": "print(1)", "language": "python" }))
        .to_request();
    let body = read_json(test::call_service(&app, req).await).await;
    assert_eq!(body["explanation"], "This python snippet prints a value.");

    let req = test::TestRequest::post()
        .uri("/api/ai/seo")
        .set_json(json!({ "title": "Ownership", "content": "..." }))
        .to_request();
    let body = read_json(test::call_service(&app, req).await).await;
    assert_eq!(body["seoTitle"], "Ownership");

    let req = test::TestRequest::post()
        .uri("/api/ai/improve")
        .set_json(json!({ "content": "make me louder" }))
        .to_request();
    let body = read_json(test::call_service(&app, req).await).await;
    assert_eq!(body["content"], "MAKE ME LOUDER");

    let req = test::TestRequest::post()
        .uri("/api/ai/related-topics")
        .set_json(json!({ "topic": "Traits", "category": "Rust" }))
        .to_request();
    let body = read_json(test::call_service(&app, req).await).await;
    assert_eq!(body["topics"], json!(["Advanced Traits", "Traits in practice"]));
}

#[actix_web::test]
async fn test_ai_failure_is_a_generic_500() {
    let app = app!(with_assistant(true));

    let req = test::TestRequest::post()
        .uri("/api/ai/generate")
        .set_json(json!({ "topic": "Macros" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = read_json(resp).await;
    assert_eq!(body["detail"], "Post generation failed");
}

#[actix_web::test]
async fn test_ai_scope_is_rate_limited() {
    let app = app!(AppState {
        ai_limiter: Some(Arc::new(DenyAll)),
        ..with_assistant(false)
    });

    let req = test::TestRequest::post()
        .uri("/api/ai/related-topics")
        .set_json(json!({ "topic": "Traits", "category": "Rust" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        resp.headers().get("retry-after").and_then(|v| v.to_str().ok()),
        Some("30")
    );

    let req = test::TestRequest::get().uri("/api/health").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_request_id_is_echoed_or_generated() {
    let app = app!(state());

    let req = test::TestRequest::get()
        .uri("/api/health")
        .insert_header(("X-Request-ID", "abc-123"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(
        resp.headers().get("x-request-id").and_then(|v| v.to_str().ok()),
        Some("abc-123")
    );

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.headers().contains_key("x-request-id"));
}
