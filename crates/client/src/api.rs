//! REST client for the payroll backend.
//!
//! Every call forwards the caller's bearer token. Collection routes use the
//! backend's trailing-slash form so no redirect drops the `Authorization`
//! header.

use std::time::Duration;

use agentpay_core::agent::{Agent, AgentInput};
use agentpay_core::configuration::{
    Establishment, EstablishmentInput, Grade, GradeInput, PayElement, PayElementInput,
    PayElementKind, Province, ProvinceInput,
};
use agentpay_core::debt::Debt;
use agentpay_core::error::CoreError;
use agentpay_core::payment::{Payment, PaymentStatus};
use agentpay_core::payslip::{Payslip, PayslipRequest, PayslipStatus};
use agentpay_core::period::ReportPeriod;
use agentpay_core::teacher::{Teacher, TeacherInput, TeacherUpdate};
use agentpay_core::types::EntityId;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::wire::{
    self, AgentPayload, AgentRecord, DebtPayload, DebtRecord, ElementPayload, ElementRecord,
    EstablishmentPayload, EstablishmentRecord, GradePayload, GradeRecord, LoginRequest,
    LoginResponse, PaymentPayload, PaymentRecord, PayslipPayload, PayslipRecord, ProvincePayload,
    ProvinceRecord, TeacherPayload, TeacherRecord, TeacherUpdatePayload,
};

/// HTTP client for the payroll backend.
pub struct PayrollApi {
    client: reqwest::Client,
    api_url: String,
}

/// Errors from the payroll backend client.
#[derive(Debug, thiserror::Error)]
pub enum PayrollApiError {
    /// The HTTP request itself failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("Payroll API error ({status}): {detail}")]
    Api {
        status: u16,
        /// The backend's `detail` message, or the raw body.
        detail: String,
    },

    /// The backend answered 2xx with a payload the domain cannot represent.
    #[error("Unexpected payroll API payload: {0}")]
    Decode(String),
}

impl PayrollApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Request(err) => err.status().map(|s| s.as_u16()),
            Self::Decode(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND.as_u16())
    }
}

impl From<CoreError> for PayrollApiError {
    fn from(err: CoreError) -> Self {
        Self::Decode(err.to_string())
    }
}

/// A binary document passed through from the backend (PDF reports).
#[derive(Debug, Clone)]
pub struct Document {
    pub content_type: String,
    pub filename: Option<String>,
    pub bytes: Vec<u8>,
}

/// Optional filters for `GET /enseignants/`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TeacherQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(rename = "ecole_id", skip_serializing_if = "Option::is_none")]
    pub establishment_id: Option<EntityId>,
    pub limit: i64,
    #[serde(rename = "skip")]
    pub offset: i64,
}

/// Optional filters for `GET /bulletins/`.
#[derive(Debug, Clone, Default)]
pub struct PayslipQuery {
    pub teacher_id: Option<EntityId>,
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub status: Option<PayslipStatus>,
}

impl PayslipQuery {
    fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(id) = self.teacher_id {
            pairs.push(("enseignant_id", id.to_string()));
        }
        if let Some(month) = self.month {
            pairs.push(("mois", month.to_string()));
        }
        if let Some(year) = self.year {
            pairs.push(("annee", year.to_string()));
        }
        if let Some(status) = self.status {
            pairs.push(("statut", status.upstream_label().to_string()));
        }
        pairs
    }
}

impl PayrollApi {
    /// Create a client for the backend at `api_url` with a per-request timeout.
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Result<Self, PayrollApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, api_url))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self { client, api_url }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Whether the backend answers HTTP at all. Any status counts.
    pub async fn ping(&self) -> bool {
        self.client
            .get(format!("{}/", self.api_url))
            .send()
            .await
            .is_ok()
    }

    // ---- auth ----

    /// `POST /login`. A 401 comes back as [`PayrollApiError::Api`].
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<LoginResponse, PayrollApiError> {
        let response = self
            .client
            .post(self.url("/login"))
            .json(&LoginRequest { email, password })
            .send()
            .await?;
        Self::parse_response(response).await
    }

    // ---- agents ----

    pub async fn list_agents(&self, token: &str) -> Result<Vec<Agent>, PayrollApiError> {
        let records: Vec<AgentRecord> = self.get_json(token, "/agents/", &[]).await?;
        Ok(records.into_iter().map(Agent::from).collect())
    }

    /// Fetch one agent. The backend has no item route for agents, so this
    /// filters the collection.
    pub async fn get_agent(&self, token: &str, id: EntityId) -> Result<Agent, PayrollApiError> {
        self.list_agents(token)
            .await?
            .into_iter()
            .find(|a| a.id == id)
            .ok_or_else(|| not_found("Agent", id))
    }

    pub async fn create_agent(
        &self,
        token: &str,
        input: &AgentInput,
    ) -> Result<Agent, PayrollApiError> {
        let record: AgentRecord = self
            .send_json(token, Method::POST, "/agents/", &AgentPayload::from(input))
            .await?;
        Ok(record.into())
    }

    pub async fn update_agent(
        &self,
        token: &str,
        id: EntityId,
        input: &AgentInput,
    ) -> Result<Agent, PayrollApiError> {
        let record: AgentRecord = self
            .send_json(token, Method::PUT, &format!("/agents/{id}"), &AgentPayload::from(input))
            .await?;
        Ok(record.into())
    }

    pub async fn delete_agent(&self, token: &str, id: EntityId) -> Result<(), PayrollApiError> {
        self.delete(token, &format!("/agents/{id}")).await
    }

    // ---- debts ----

    pub async fn list_debts(&self, token: &str) -> Result<Vec<Debt>, PayrollApiError> {
        let records: Vec<DebtRecord> = self.get_json(token, "/debts/", &[]).await?;
        convert_all(records)
    }

    pub async fn create_debt(
        &self,
        token: &str,
        payload: &DebtPayload<'_>,
    ) -> Result<Debt, PayrollApiError> {
        let record: DebtRecord = self.send_json(token, Method::POST, "/debts/", payload).await?;
        Ok(Debt::try_from(record)?)
    }

    /// The backend answers a missing debt with 200 and an `error` field;
    /// that case is reported as 404.
    pub async fn delete_debt(&self, token: &str, id: EntityId) -> Result<(), PayrollApiError> {
        let response = self
            .authed(Method::DELETE, token, &format!("/debts/{id}"))
            .send()
            .await?;
        let body: serde_json::Value = Self::parse_response(response).await?;
        if body.get("error").is_some() {
            return Err(not_found("Debt", id));
        }
        Ok(())
    }

    // ---- payments ----

    pub async fn list_payments(&self, token: &str) -> Result<Vec<Payment>, PayrollApiError> {
        let records: Vec<PaymentRecord> = self.get_json(token, "/payments/", &[]).await?;
        convert_all(records)
    }

    pub async fn get_payment(&self, token: &str, id: EntityId) -> Result<Payment, PayrollApiError> {
        let record: PaymentRecord = self.get_json(token, &format!("/payments/{id}"), &[]).await?;
        Ok(Payment::try_from(record)?)
    }

    pub async fn create_payment(
        &self,
        token: &str,
        payload: &PaymentPayload,
    ) -> Result<Payment, PayrollApiError> {
        let record: PaymentRecord = self
            .send_json(token, Method::POST, "/payments/", payload)
            .await?;
        Ok(Payment::try_from(record)?)
    }

    /// Replace a payment with the same fields under a new status.
    pub async fn set_payment_status(
        &self,
        token: &str,
        payment: &Payment,
        status: PaymentStatus,
    ) -> Result<Payment, PayrollApiError> {
        let payload = PaymentPayload::with_status(payment, status);
        let record: PaymentRecord = self
            .send_json(token, Method::PUT, &format!("/payments/{}", payment.id), &payload)
            .await?;
        Ok(Payment::try_from(record)?)
    }

    pub async fn delete_payment(&self, token: &str, id: EntityId) -> Result<(), PayrollApiError> {
        self.delete(token, &format!("/payments/{id}")).await
    }

    // ---- grades ----

    pub async fn list_grades(&self, token: &str) -> Result<Vec<Grade>, PayrollApiError> {
        let records: Vec<GradeRecord> = self.get_json(token, "/grades/", &[]).await?;
        Ok(records.into_iter().map(Grade::from).collect())
    }

    pub async fn get_grade(&self, token: &str, id: EntityId) -> Result<Grade, PayrollApiError> {
        let record: GradeRecord = self.get_json(token, &format!("/grades/{id}"), &[]).await?;
        Ok(record.into())
    }

    pub async fn create_grade(
        &self,
        token: &str,
        input: &GradeInput,
    ) -> Result<Grade, PayrollApiError> {
        let record: GradeRecord = self
            .send_json(token, Method::POST, "/grades/", &GradePayload::from(input))
            .await?;
        Ok(record.into())
    }

    pub async fn update_grade(
        &self,
        token: &str,
        id: EntityId,
        input: &GradeInput,
    ) -> Result<Grade, PayrollApiError> {
        let record: GradeRecord = self
            .send_json(token, Method::PUT, &format!("/grades/{id}"), &GradePayload::from(input))
            .await?;
        Ok(record.into())
    }

    pub async fn delete_grade(&self, token: &str, id: EntityId) -> Result<(), PayrollApiError> {
        self.delete(token, &format!("/grades/{id}")).await
    }

    // ---- pay elements ----

    pub async fn list_elements(
        &self,
        token: &str,
        kind: Option<PayElementKind>,
    ) -> Result<Vec<PayElement>, PayrollApiError> {
        let query: Vec<(&str, String)> = kind
            .map(|k| vec![("type_filter", wire::element_kind_label(k).to_string())])
            .unwrap_or_default();
        let records: Vec<ElementRecord> = self.get_json(token, "/elements/", &query).await?;
        convert_all(records)
    }

    pub async fn get_element(
        &self,
        token: &str,
        id: EntityId,
    ) -> Result<PayElement, PayrollApiError> {
        let record: ElementRecord = self.get_json(token, &format!("/elements/{id}"), &[]).await?;
        Ok(PayElement::try_from(record)?)
    }

    pub async fn create_element(
        &self,
        token: &str,
        input: &PayElementInput,
    ) -> Result<PayElement, PayrollApiError> {
        let record: ElementRecord = self
            .send_json(token, Method::POST, "/elements/", &ElementPayload::from(input))
            .await?;
        Ok(PayElement::try_from(record)?)
    }

    // ---- provinces & establishments ----

    pub async fn list_provinces(&self, token: &str) -> Result<Vec<Province>, PayrollApiError> {
        let records: Vec<ProvinceRecord> =
            self.get_json(token, "/etablissements/provinces", &[]).await?;
        Ok(records.into_iter().map(Province::from).collect())
    }

    pub async fn create_province(
        &self,
        token: &str,
        input: &ProvinceInput,
    ) -> Result<Province, PayrollApiError> {
        let record: ProvinceRecord = self
            .send_json(
                token,
                Method::POST,
                "/etablissements/provinces",
                &ProvincePayload::from(input),
            )
            .await?;
        Ok(record.into())
    }

    pub async fn list_establishments(
        &self,
        token: &str,
    ) -> Result<Vec<Establishment>, PayrollApiError> {
        let records: Vec<EstablishmentRecord> =
            self.get_json(token, "/etablissements/", &[]).await?;
        convert_all(records)
    }

    pub async fn get_establishment(
        &self,
        token: &str,
        id: EntityId,
    ) -> Result<Establishment, PayrollApiError> {
        let record: EstablishmentRecord = self
            .get_json(token, &format!("/etablissements/{id}"), &[])
            .await?;
        Ok(Establishment::try_from(record)?)
    }

    pub async fn create_establishment(
        &self,
        token: &str,
        input: &EstablishmentInput,
    ) -> Result<Establishment, PayrollApiError> {
        let record: EstablishmentRecord = self
            .send_json(
                token,
                Method::POST,
                "/etablissements/",
                &EstablishmentPayload::from(input),
            )
            .await?;
        Ok(Establishment::try_from(record)?)
    }

    // ---- teachers ----

    pub async fn list_teachers(
        &self,
        token: &str,
        query: &TeacherQuery,
    ) -> Result<Vec<Teacher>, PayrollApiError> {
        let response = self
            .authed(Method::GET, token, "/enseignants/")
            .query(query)
            .send()
            .await?;
        let records: Vec<TeacherRecord> = Self::parse_response(response).await?;
        Ok(records.into_iter().map(Teacher::from).collect())
    }

    pub async fn get_teacher(&self, token: &str, id: EntityId) -> Result<Teacher, PayrollApiError> {
        let record: TeacherRecord = self.get_json(token, &format!("/enseignants/{id}"), &[]).await?;
        Ok(record.into())
    }

    pub async fn create_teacher(
        &self,
        token: &str,
        input: &TeacherInput,
    ) -> Result<Teacher, PayrollApiError> {
        let record: TeacherRecord = self
            .send_json(token, Method::POST, "/enseignants/", &TeacherPayload::from(input))
            .await?;
        Ok(record.into())
    }

    pub async fn update_teacher(
        &self,
        token: &str,
        id: EntityId,
        update: &TeacherUpdate,
    ) -> Result<Teacher, PayrollApiError> {
        let record: TeacherRecord = self
            .send_json(
                token,
                Method::PUT,
                &format!("/enseignants/{id}"),
                &TeacherUpdatePayload::from(update),
            )
            .await?;
        Ok(record.into())
    }

    pub async fn delete_teacher(&self, token: &str, id: EntityId) -> Result<(), PayrollApiError> {
        self.delete(token, &format!("/enseignants/{id}")).await
    }

    // ---- payslips ----

    /// `POST /bulletins/calculer`: the backend computes and stores the payslip.
    pub async fn compute_payslip(
        &self,
        token: &str,
        request: &PayslipRequest,
    ) -> Result<Payslip, PayrollApiError> {
        let record: PayslipRecord = self
            .send_json(
                token,
                Method::POST,
                "/bulletins/calculer",
                &PayslipPayload::from(request),
            )
            .await?;
        Ok(Payslip::try_from(record)?)
    }

    pub async fn list_payslips(
        &self,
        token: &str,
        query: &PayslipQuery,
    ) -> Result<Vec<Payslip>, PayrollApiError> {
        let records: Vec<PayslipRecord> =
            self.get_json(token, "/bulletins/", &query.pairs()).await?;
        convert_all(records)
    }

    pub async fn get_payslip(&self, token: &str, id: EntityId) -> Result<Payslip, PayrollApiError> {
        let record: PayslipRecord = self.get_json(token, &format!("/bulletins/{id}"), &[]).await?;
        Ok(Payslip::try_from(record)?)
    }

    pub async fn pay_payslip(
        &self,
        token: &str,
        id: EntityId,
        payment_method: &str,
    ) -> Result<Payslip, PayrollApiError> {
        let response = self
            .authed(Method::POST, token, &format!("/bulletins/{id}/payer"))
            .query(&[("mode_paiement", payment_method)])
            .send()
            .await?;
        let record: PayslipRecord = Self::parse_response(response).await?;
        Ok(Payslip::try_from(record)?)
    }

    pub async fn delete_payslip(&self, token: &str, id: EntityId) -> Result<(), PayrollApiError> {
        self.delete(token, &format!("/bulletins/{id}")).await
    }

    pub async fn payslip_pdf(
        &self,
        token: &str,
        id: EntityId,
    ) -> Result<Document, PayrollApiError> {
        self.get_document(token, &format!("/bulletins/{id}/pdf"), &[]).await
    }

    // ---- reports ----

    pub async fn agents_report_pdf(&self, token: &str) -> Result<Document, PayrollApiError> {
        self.get_document(token, "/reports/agents/pdf", &[]).await
    }

    pub async fn debts_report_pdf(&self, token: &str) -> Result<Document, PayrollApiError> {
        self.get_document(token, "/reports/debts/pdf", &[]).await
    }

    pub async fn payslip_report_pdf(
        &self,
        token: &str,
        agent_id: EntityId,
        period: &ReportPeriod,
    ) -> Result<Document, PayrollApiError> {
        let mut query = period.query_pairs();
        query.push(("agent_id", agent_id.to_string()));
        self.get_document(token, "/reports/payslip/pdf", &query).await
    }

    // ---- private helpers ----

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    fn authed(&self, method: Method, token: &str, path: &str) -> RequestBuilder {
        tracing::debug!(method = %method, path, "Upstream request");
        self.client
            .request(method, self.url(path))
            .bearer_auth(token)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        token: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, PayrollApiError> {
        let response = self
            .authed(Method::GET, token, path)
            .query(query)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        token: &str,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, PayrollApiError> {
        let response = self.authed(method, token, path).json(body).send().await?;
        Self::parse_response(response).await
    }

    async fn delete(&self, token: &str, path: &str) -> Result<(), PayrollApiError> {
        let response = self.authed(Method::DELETE, token, path).send().await?;
        Self::check_status(response).await
    }

    async fn get_document(
        &self,
        token: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Document, PayrollApiError> {
        let response = self
            .authed(Method::GET, token, path)
            .query(query)
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;

        let headers = response.headers();
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/pdf")
            .to_string();
        let filename = headers
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(filename_from_disposition);

        let bytes = response.bytes().await?.to_vec();
        Ok(Document {
            content_type,
            filename,
            bytes,
        })
    }

    /// Ensure the response has a success status code. On failure, returns a
    /// [`PayrollApiError::Api`] carrying the backend's `detail` message.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, PayrollApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            let detail = extract_detail(&body);
            tracing::debug!(status = status.as_u16(), %detail, "Upstream error response");
            return Err(PayrollApiError::Api {
                status: status.as_u16(),
                detail,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, PayrollApiError> {
        let response = Self::ensure_success(response).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| PayrollApiError::Decode(e.to_string()))
    }

    async fn check_status(response: reqwest::Response) -> Result<(), PayrollApiError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

fn not_found(entity: &str, id: EntityId) -> PayrollApiError {
    PayrollApiError::Api {
        status: StatusCode::NOT_FOUND.as_u16(),
        detail: format!("{entity} with id {id} not found"),
    }
}

fn convert_all<R, T>(records: Vec<R>) -> Result<Vec<T>, PayrollApiError>
where
    T: TryFrom<R, Error = CoreError>,
{
    records
        .into_iter()
        .map(|r| T::try_from(r).map_err(PayrollApiError::from))
        .collect()
}

/// Pull a readable message out of a FastAPI error body.
///
/// `{"detail": "..."}` yields the string; validation errors
/// (`{"detail": [{"msg": ...}, ...]}`) yield their messages joined with `; `.
/// Anything else yields the raw body.
pub fn extract_detail(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.to_string();
    };
    match value.get("detail") {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
            .collect::<Vec<_>>()
            .join("; "),
        _ => body.to_string(),
    }
}

fn filename_from_disposition(header: &str) -> Option<String> {
    header.split(';').map(str::trim).find_map(|part| {
        part.strip_prefix("filename=")
            .map(|name| name.trim_matches('"').to_string())
            .filter(|name| !name.is_empty())
    })
}
