//! REST implementation of the backend traits.

use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::session::SessionContext;
use crate::transport::Transport;
use async_trait::async_trait;
use frontdesk_core::constants::{
    ADDRESSES_PATH, EMAILS_PATH, IDENTITIES_PATH, LOGIN_PATH, MASTER_DATA_PATH,
    PATIENTS_PATH, PATIENT_SEARCH_PATH, PHONES_PATH,
};
use frontdesk_core::master::{
    AddressType, Gender, HealthVital, IdentityType, Language, MasterDataKind, PhoneType,
};
use frontdesk_core::models::{
    PatientAddress, PatientEmail, PatientIdentity, PatientPhone, PatientProfile,
    PatientSearchResult,
};
use frontdesk_core::{
    AuthApi, BackendError, BackendResult, Credentials, EntityRecord, EntityRequest,
    MasterDataApi, Operation, PatientApi, PatientSearchCriteria,
};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Front-desk backend client.
pub struct FrontDeskClient {
    transport: Transport,
}

impl FrontDeskClient {
    /// Creates a client with a fresh, logged-out session.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        Self::with_session(config, Arc::new(SessionContext::new()))
    }

    /// Creates a client that reads and writes the given session.
    pub fn with_session(config: ClientConfig, session: Arc<SessionContext>) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .cookie_store(true)
            .build()?;

        Ok(Self {
            transport: Transport::new(http, config, session),
        })
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        self.transport.session()
    }

    async fn master_list<T: DeserializeOwned>(&self, kind: MasterDataKind) -> BackendResult<Vec<T>> {
        let path = format!("{MASTER_DATA_PATH}/{}", kind.path_segment());
        self.transport.get_json(&path).await
    }
}

#[async_trait]
impl PatientApi for FrontDeskClient {
    async fn search_patients(
        &self,
        criteria: &PatientSearchCriteria,
    ) -> BackendResult<Vec<PatientSearchResult>> {
        let body = serde_json::to_value(criteria)
            .map_err(|e| BackendError::InvalidRequest(e.to_string()))?;
        let reply = self
            .transport
            .send(Method::POST, PATIENT_SEARCH_PATH, Some(&body))
            .await?;
        reply.expect_success(PATIENT_SEARCH_PATH)?;

        let results: Option<Vec<PatientSearchResult>> = reply.decode(PATIENT_SEARCH_PATH)?;
        Ok(results.unwrap_or_default())
    }

    async fn upsert(&self, request: &EntityRequest) -> BackendResult<EntityRecord> {
        let kind = request.kind();
        let operation = request.operation();
        let path = kind.path();
        let method = match operation {
            Operation::Insert => Method::POST,
            Operation::Update => Method::PUT,
        };
        let body = request
            .body()
            .map_err(|e| BackendError::InvalidRequest(e.to_string()))?;

        let reply = self.transport.send(method, path, Some(&body)).await?;
        reply.expect_status(path, operation.expected_status())?;

        kind.decode(reply.decode(path)?)
            .map_err(|e| BackendError::Decode {
                path: path.to_string(),
                message: e.to_string(),
            })
    }

    async fn patient_profile(&self, patient_id: i64) -> BackendResult<PatientProfile> {
        self.transport
            .get_json(&format!("{PATIENTS_PATH}/{patient_id}"))
            .await
    }

    async fn patient_identities(&self, patient_id: i64) -> BackendResult<Vec<PatientIdentity>> {
        self.transport
            .get_json(&format!("{IDENTITIES_PATH}/patient/{patient_id}"))
            .await
    }

    async fn patient_addresses(&self, patient_id: i64) -> BackendResult<Vec<PatientAddress>> {
        self.transport
            .get_json(&format!("{ADDRESSES_PATH}/patient/{patient_id}"))
            .await
    }

    async fn patient_phones(&self, patient_id: i64) -> BackendResult<Vec<PatientPhone>> {
        self.transport
            .get_json(&format!("{PHONES_PATH}/patient/{patient_id}"))
            .await
    }

    async fn patient_emails(&self, patient_id: i64) -> BackendResult<Vec<PatientEmail>> {
        self.transport
            .get_json(&format!("{EMAILS_PATH}/patient/{patient_id}"))
            .await
    }
}

#[async_trait]
impl MasterDataApi for FrontDeskClient {
    async fn languages(&self) -> BackendResult<Vec<Language>> {
        self.master_list(MasterDataKind::Languages).await
    }

    async fn genders(&self) -> BackendResult<Vec<Gender>> {
        self.master_list(MasterDataKind::Genders).await
    }

    async fn identity_types(&self) -> BackendResult<Vec<IdentityType>> {
        self.master_list(MasterDataKind::IdentityTypes).await
    }

    async fn address_types(&self) -> BackendResult<Vec<AddressType>> {
        self.master_list(MasterDataKind::AddressTypes).await
    }

    async fn phone_types(&self) -> BackendResult<Vec<PhoneType>> {
        self.master_list(MasterDataKind::PhoneTypes).await
    }

    async fn health_vitals(&self) -> BackendResult<Vec<HealthVital>> {
        self.master_list(MasterDataKind::HealthVitals).await
    }
}

#[async_trait]
impl AuthApi for FrontDeskClient {
    async fn login(&self, credentials: &Credentials) -> BackendResult<Option<String>> {
        let body = serde_json::to_value(credentials)
            .map_err(|e| BackendError::InvalidRequest(e.to_string()))?;
        let reply = self
            .transport
            .send(Method::POST, LOGIN_PATH, Some(&body))
            .await?;

        match reply.status {
            StatusCode::OK => {
                let token = reply.token().ok_or_else(|| BackendError::Decode {
                    path: LOGIN_PATH.to_string(),
                    message: "empty token".into(),
                })?;
                self.session()
                    .begin(credentials.username(), token.clone())
                    .await;
                tracing::info!("logged in as {}", credentials.username());
                Ok(Some(token))
            }
            StatusCode::UNAUTHORIZED => {
                tracing::warn!("login rejected for {}", credentials.username());
                Ok(None)
            }
            other => Err(BackendError::UnexpectedStatus {
                path: LOGIN_PATH.to_string(),
                expected: StatusCode::OK.as_u16(),
                actual: other.as_u16(),
            }),
        }
    }

    async fn logout(&self) {
        self.session().clear().await;
        tracing::info!("logged out");
    }
}
