use frontdesk_client::{ClientConfig, FrontDeskClient, SessionContext};
use frontdesk_core::models::{InsertEmailRequest, UpdateEmailRequest};
use frontdesk_core::{
    AuthApi, BackendError, Credentials, EntityRequest, MasterDataApi, PatientApi,
    PatientSearchCriteria, Upsert,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

async fn client_for(server: &MockServer) -> FrontDeskClient {
    let config = ClientConfig::new(&server.uri(), Duration::from_secs(5)).expect("valid config");
    FrontDeskClient::new(config).expect("client builds")
}

async fn logged_in_client(server: &MockServer, token: &str) -> FrontDeskClient {
    let client = client_for(server).await;
    client.session().set_token(Some(token.to_string())).await;
    client
}

fn profile_json(id: i64) -> serde_json::Value {
    json!({
        "patientId": id,
        "patientCode": "P000007",
        "firstname": "Asha",
        "lastname": "Rao",
        "genderCode": "F",
        "dateOfBirth": "1990-04-12T00:00:00"
    })
}

fn email_request(existing: Option<i64>) -> EntityRequest {
    EntityRequest::Email(Upsert::plan(
        existing,
        || InsertEmailRequest {
            patient_id: 7,
            email_address: "asha@example.com".into(),
        },
        |patient_email_id| UpdateEmailRequest {
            patient_email_id,
            email_address: "asha@example.com".into(),
        },
    ))
}

#[tokio::test]
async fn bearer_token_is_attached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/master/genders"))
        .and(header("authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "genderId": 1, "genderCode": "F", "genderName": "Female" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in_client(&server, "abc").await;
    let genders = client.genders().await.expect("should list genders");

    assert_eq!(genders.len(), 1);
    assert_eq!(genders[0].gender_code, "F");
}

#[tokio::test]
async fn unauthorised_request_is_refreshed_and_replayed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/patients/7"))
        .and(header("authorization", "Bearer new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_json(7)))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/patients/7"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/users/refreshtoken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("new")))
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in_client(&server, "old").await;
    let profile = client.patient_profile(7).await.expect("replay succeeds");

    assert_eq!(profile.patient_id, 7);
    assert_eq!(client.session().token().await.as_deref(), Some("new"));
}

#[tokio::test]
async fn replay_happens_at_most_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/patients/emails/patient/7"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/users/refreshtoken"))
        .respond_with(ResponseTemplate::new(200).set_body_string("new"))
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in_client(&server, "old").await;
    let err = client.patient_emails(7).await.expect_err("still unauthorised");

    assert!(matches!(err, BackendError::Unauthorised { .. }));
}

#[tokio::test]
async fn rejected_login_is_not_refreshed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/users/login"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/users/refreshtoken"))
        .respond_with(ResponseTemplate::new(200).set_body_string("new"))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let credentials = Credentials::new("HOSP1", "frontdesk", "wrong").expect("valid");

    assert_eq!(client.login(&credentials).await, Ok(None));
    assert!(!client.session().is_authenticated().await);
}

#[tokio::test]
async fn successful_login_starts_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/users/login"))
        .and(body_json(json!({
            "customerCode": "HOSP1",
            "username": "frontdesk",
            "password": "secret"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("tok")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let credentials = Credentials::new("HOSP1", "frontdesk", "secret").expect("valid");

    assert_eq!(client.login(&credentials).await, Ok(Some("tok".to_string())));
    assert_eq!(client.session().username().await.as_deref(), Some("frontdesk"));

    client.logout().await;
    assert_eq!(client.session().token().await, None);
}

#[tokio::test]
async fn concurrent_unauthorised_requests_share_one_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/patients/7"))
        .and(header("authorization", "Bearer new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_json(7)))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/patients/identities/patient/7"))
        .and(header("authorization", "Bearer new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/users/refreshtoken"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!("new"))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in_client(&server, "old").await;
    let (profile, identities) =
        tokio::join!(client.patient_profile(7), client.patient_identities(7));

    assert_eq!(profile.expect("profile replayed").patient_id, 7);
    assert!(identities.expect("identities replayed").is_empty());
}

/// Answers 401 after another caller has already stored a newer token in the session.
struct TokenReplacedMeanwhile {
    session: Arc<SessionContext>,
    token: &'static str,
}

impl Respond for TokenReplacedMeanwhile {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        futures::executor::block_on(self.session.set_token(Some(self.token.to_string())));
        ResponseTemplate::new(401)
    }
}

#[tokio::test]
async fn superseded_token_replays_without_refreshing() {
    let server = MockServer::start().await;
    let session = Arc::new(SessionContext::new());
    session.set_token(Some("old".to_string())).await;

    Mock::given(method("GET"))
        .and(path("/api/patients/7"))
        .and(header("authorization", "Bearer old"))
        .respond_with(TokenReplacedMeanwhile {
            session: Arc::clone(&session),
            token: "new",
        })
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/patients/7"))
        .and(header("authorization", "Bearer new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_json(7)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/users/refreshtoken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("newer")))
        .expect(0)
        .mount(&server)
        .await;

    let config = ClientConfig::new(&server.uri(), Duration::from_secs(5)).expect("valid config");
    let client = FrontDeskClient::with_session(config, session).expect("client builds");
    let profile = client.patient_profile(7).await.expect("replayed with newer token");

    assert_eq!(profile.patient_id, 7);
    assert_eq!(client.session().token().await.as_deref(), Some("new"));
}

#[tokio::test]
async fn failed_refresh_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/master/languages"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/users/refreshtoken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in_client(&server, "old").await;
    let err = client.languages().await.expect_err("refresh failed");

    assert!(matches!(err, BackendError::RefreshFailed(_)));
}

#[tokio::test]
async fn insert_requires_created_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/patients/emails"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "patientEmailId": 31,
            "patientId": 7,
            "emailAddress": "asha@example.com"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in_client(&server, "abc").await;
    let err = client
        .upsert(&email_request(None))
        .await
        .expect_err("200 is not 201");

    assert_eq!(
        err,
        BackendError::UnexpectedStatus {
            path: "/api/patients/emails".into(),
            expected: 201,
            actual: 200
        }
    );
}

#[tokio::test]
async fn update_accepts_accepted_status() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/patients/emails"))
        .and(body_json(json!({
            "patientEmailId": 31,
            "emailAddress": "asha@example.com"
        })))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({
            "patientEmailId": 31,
            "patientId": 7,
            "emailAddress": "asha@example.com"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in_client(&server, "abc").await;
    let record = client
        .upsert(&email_request(Some(31)))
        .await
        .expect("202 is success for an update");

    assert_eq!(
        record.into_email().map(|e| e.patient_email_id),
        Some(31)
    );
}

#[tokio::test]
async fn null_search_body_means_no_results() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/patients/search"))
        .and(body_json(json!({ "lastName": "Rao" })))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in_client(&server, "abc").await;
    let criteria = PatientSearchCriteria {
        last_name: Some("Rao".into()),
        ..Default::default()
    };

    assert_eq!(client.search_patients(&criteria).await, Ok(Vec::new()));
}
