// End-to-end tests of the form and JSON endpoints against in-memory doubles

use actix_web::{http::StatusCode, test, web, App};
use async_trait::async_trait;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use yoga_asana_api::{
    error::{ApiError, Result},
    models::{PoseRecord, RecommendationResponse},
    routes::{api_routes, form_routes},
    services::{
        DocumentRenderer, FormController, InMemoryPoseStore, KeywordExtractor, Lexicon, Mailer,
        PoseFilter, PoseStore, RecommendationService, RenderedDocument,
    },
};

struct CountingStore {
    inner: InMemoryPoseStore,
    queries: AtomicUsize,
}

#[async_trait]
impl PoseStore for CountingStore {
    async fn find_poses(&self, filter: &PoseFilter) -> Result<Vec<PoseRecord>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.inner.find_poses(filter).await
    }
}

#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<(String, String, usize)>>,
    fail_with: Option<String>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, recipient: &str, document: &RenderedDocument) -> Result<()> {
        self.sent.lock().unwrap().push((
            recipient.to_string(),
            document.file_name.clone(),
            document.len(),
        ));
        match &self.fail_with {
            Some(message) => Err(ApiError::DeliveryError(message.clone())),
            None => Ok(()),
        }
    }
}

fn pose(name: &str, health_issue: &str, min_age: i32, gender: &str) -> PoseRecord {
    PoseRecord {
        name: name.to_string(),
        health_issue: health_issue.to_string(),
        min_age,
        gender: gender.to_string(),
    }
}

fn stored_poses() -> Vec<PoseRecord> {
    vec![
        pose("Setu Bandhasana", "Back pain relief", 18, "All"),
        pose("Baddha Konasana", "Menstrual cramps and back ache", 16, "Female"),
        pose("Mayurasana", "Digestion", 20, "Male"),
        pose("Balasana", "Anxiety and stress", 5, "All"),
        pose("Sirsasana", "Anxiety, focus", 40, "All"),
    ]
}

struct Harness {
    store: Arc<CountingStore>,
    mailer: Arc<RecordingMailer>,
    controller: FormController,
}

fn harness(poses: Vec<PoseRecord>, mailer: RecordingMailer) -> Harness {
    let store = Arc::new(CountingStore {
        inner: InMemoryPoseStore::new(poses),
        queries: AtomicUsize::new(0),
    });
    let mailer = Arc::new(mailer);
    let service = RecommendationService::new(
        KeywordExtractor::new(Arc::new(Lexicon::builtin().unwrap())),
        store.clone(),
    );
    let controller = FormController::new(service, DocumentRenderer::new(), mailer.clone());

    Harness {
        store,
        mailer,
        controller,
    }
}

macro_rules! app {
    ($controller:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($controller))
                .service(api_routes())
                .configure(form_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn test_form_page_renders() {
    let h = harness(stored_poses(), RecordingMailer::default());
    let app = app!(h.controller.clone());

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("Smart Yoga Asana Recommendation System"));
    assert!(body.contains("Get Recommendations"));
}

#[actix_web::test]
async fn test_pdf_submission_is_emailed() {
    let h = harness(stored_poses(), RecordingMailer::default());
    let app = app!(h.controller.clone());

    let req = test::TestRequest::post()
        .uri("/")
        .set_form([
            ("age", "30"),
            ("gender", "Female"),
            ("health_issue", "I have back pain and anxiety"),
            ("email", "x@y.com"),
            ("format", "PDF"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("<li>Baddha Konasana: Benefits Menstrual cramps and back ache</li>"));
    assert!(body.contains("<li>Balasana: Benefits Anxiety and stress</li>"));
    assert!(body.contains("<li>Setu Bandhasana: Benefits Back pain relief</li>"));
    // Male-only and over-age poses are excluded
    assert!(!body.contains("Mayurasana"));
    assert!(!body.contains("Sirsasana"));
    assert!(body.contains("Recommendations sent to your email!"));

    let sent = h.mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "x@y.com");
    assert_eq!(sent[0].1, "Yoga_Recommendations.pdf");
    assert!(sent[0].2 > 0);
}

#[actix_web::test]
async fn test_blank_health_issue_warns_without_querying() {
    let h = harness(stored_poses(), RecordingMailer::default());
    let app = app!(h.controller.clone());

    let req = test::TestRequest::post()
        .uri("/")
        .set_form([
            ("age", "30"),
            ("gender", "Male"),
            ("health_issue", "   "),
            ("email", "x@y.com"),
            ("format", "Word"),
        ])
        .to_request();
    let body = String::from_utf8(test::call_and_read_body(&app, req).await.to_vec()).unwrap();

    assert!(body.contains("Please provide your health issue and email address."));
    assert_eq!(h.store.queries.load(Ordering::SeqCst), 0);
    assert!(h.mailer.sent.lock().unwrap().is_empty());
}

#[actix_web::test]
async fn test_malformed_age_rerenders_form_with_warning() {
    let h = harness(stored_poses(), RecordingMailer::default());
    let app = app!(h.controller.clone());

    for age in ["", "thirty", "300"] {
        let req = test::TestRequest::post()
            .uri("/")
            .set_form([
                ("age", age),
                ("gender", "Male"),
                ("health_issue", "back pain"),
                ("email", "x@y.com"),
                ("format", "Word"),
            ])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "age {:?}", age);

        let content_type = resp
            .headers()
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(content_type.starts_with("text/html"));

        let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        assert!(body.contains("Please enter your age as a whole number between 0 and 120."));
        assert!(body.contains("Get Recommendations"));
    }

    assert_eq!(h.store.queries.load(Ordering::SeqCst), 0);
    assert!(h.mailer.sent.lock().unwrap().is_empty());
}

#[actix_web::test]
async fn test_depressed_mood_reaches_depression_pose() {
    let h = harness(
        vec![pose("Balasana", "Depression and low mood", 5, "All")],
        RecordingMailer::default(),
    );
    let app = app!(h.controller.clone());

    let req = test::TestRequest::post()
        .uri("/")
        .set_form([
            ("age", "30"),
            ("gender", "Others"),
            ("health_issue", "I feel depressed"),
            ("email", "x@y.com"),
            ("format", "Word"),
        ])
        .to_request();
    let body = String::from_utf8(test::call_and_read_body(&app, req).await.to_vec()).unwrap();

    assert!(body.contains("<li>Balasana: Benefits Depression and low mood</li>"));
    assert_eq!(h.mailer.sent.lock().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_no_matches_never_invokes_mailer() {
    let h = harness(Vec::new(), RecordingMailer::default());
    let app = app!(h.controller.clone());

    let req = test::TestRequest::post()
        .uri("/")
        .set_form([
            ("age", "25"),
            ("gender", "Male"),
            ("health_issue", "back pain"),
            ("email", "x@y.com"),
            ("format", "Word"),
        ])
        .to_request();
    let body = String::from_utf8(test::call_and_read_body(&app, req).await.to_vec()).unwrap();

    assert!(body.contains("No matching asanas found for the given input."));
    assert_eq!(h.store.queries.load(Ordering::SeqCst), 1);
    assert_eq!(h.mailer.sent.lock().unwrap().len(), 0);
}

#[actix_web::test]
async fn test_punctuation_only_input_skips_store() {
    let h = harness(stored_poses(), RecordingMailer::default());
    let app = app!(h.controller.clone());

    let req = test::TestRequest::post()
        .uri("/")
        .set_form([
            ("age", "25"),
            ("gender", "Male"),
            ("health_issue", "?!?! 404 ..."),
            ("email", "x@y.com"),
            ("format", "Word"),
        ])
        .to_request();
    let body = String::from_utf8(test::call_and_read_body(&app, req).await.to_vec()).unwrap();

    assert!(body.contains("No matching asanas found"));
    assert_eq!(h.store.queries.load(Ordering::SeqCst), 0);
    assert!(h.mailer.sent.lock().unwrap().is_empty());
}

#[actix_web::test]
async fn test_json_api_reports_delivery_failure() {
    let h = harness(
        stored_poses(),
        RecordingMailer {
            fail_with: Some("535 authentication failed".to_string()),
            ..Default::default()
        },
    );
    let app = app!(h.controller.clone());

    let req = test::TestRequest::post()
        .uri("/api/recommendations")
        .set_json(serde_json::json!({
            "age": 25,
            "gender": "Male",
            "health_issue": "back pain",
            "email": "x@y.com",
            "format": "Word"
        }))
        .to_request();
    let resp: RecommendationResponse = test::call_and_read_body_json(&app, req).await;

    assert!(!resp.delivered);
    assert_eq!(resp.file_name, "Yoga_Recommendations.docx");
    assert_eq!(
        resp.recommendations,
        vec!["Setu Bandhasana: Benefits Back pain relief".to_string()]
    );
    assert!(resp
        .delivery_error
        .unwrap()
        .contains("535 authentication failed"));
}

#[actix_web::test]
async fn test_json_api_status_codes() {
    let h = harness(stored_poses(), RecordingMailer::default());
    let app = app!(h.controller.clone());

    let blank = test::TestRequest::post()
        .uri("/api/recommendations")
        .set_json(serde_json::json!({
            "age": 25,
            "gender": "Male",
            "health_issue": "back pain",
            "email": "",
            "format": "PDF"
        }))
        .to_request();
    assert_eq!(
        test::call_service(&app, blank).await.status(),
        StatusCode::BAD_REQUEST
    );

    let unmatched = test::TestRequest::post()
        .uri("/api/recommendations")
        .set_json(serde_json::json!({
            "age": 25,
            "gender": "Male",
            "health_issue": "vertigo",
            "email": "x@y.com",
            "format": "PDF"
        }))
        .to_request();
    assert_eq!(
        test::call_service(&app, unmatched).await.status(),
        StatusCode::NOT_FOUND
    );
    assert!(h.mailer.sent.lock().unwrap().is_empty());
}

#[actix_web::test]
async fn test_document_download() {
    let h = harness(stored_poses(), RecordingMailer::default());
    let app = app!(h.controller.clone());

    let req = test::TestRequest::post()
        .uri("/api/documents")
        .set_json(serde_json::json!({
            "age": 30,
            "gender": "Female",
            "health_issue": "stress",
            "format": "PDF"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let disposition = resp
        .headers()
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("Yoga_Recommendations.pdf"));

    let body = test::read_body(resp).await;
    assert!(body.starts_with(b"%PDF-"));
    assert!(h.mailer.sent.lock().unwrap().is_empty());
}

#[actix_web::test]
async fn test_health_check() {
    let h = harness(stored_poses(), RecordingMailer::default());
    let app = app!(h.controller.clone());

    let resp: serde_json::Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/health").to_request(),
    )
    .await;
    assert_eq!(resp["status"], "ok");
}
