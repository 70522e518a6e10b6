//! Upstream JSON shapes.
//!
//! The payroll backend uses French field names, loosely typed numbers and
//! dates that are sometimes full timestamps. Records deserialize leniently
//! here and convert into the English [`agentpay_core`] types through
//! `TryFrom`, which rejects payloads the domain cannot represent.

use agentpay_core::agent::{Agent, AgentInput};
use agentpay_core::configuration::{
    Establishment, EstablishmentInput, Grade, GradeInput, PayElement, PayElementInput,
    PayElementKind, PayZone, Province, ProvinceInput,
};
use agentpay_core::debt::Debt;
use agentpay_core::error::CoreError;
use agentpay_core::payment::{Payment, PaymentStatus};
use agentpay_core::payslip::{Payslip, PayslipRequest, PayslipStatus};
use agentpay_core::period::YearMonth;
use agentpay_core::teacher::{Teacher, TeacherInput, TeacherUpdate};
use agentpay_core::types::{Amount, EntityId, Timestamp};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Lenient date handling
// ---------------------------------------------------------------------------

/// Parse `YYYY-MM-DD`, ignoring any time component that follows.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let head = raw.get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

/// Parse an RFC 3339 timestamp, or a naive one assumed to be UTC.
pub fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

mod lenient_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => super::parse_date(&s)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{s}'"))),
        }
    }
}

fn decode(msg: String) -> CoreError {
    CoreError::Internal(msg)
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamUser {
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: UpstreamUser,
}

// ---------------------------------------------------------------------------
// Agents
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct AgentRecord {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, with = "agentpay_core::money::lenient_opt")]
    pub salary: Option<Amount>,
    #[serde(default, with = "lenient_date")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default, alias = "email")]
    pub email_address: Option<String>,
    #[serde(default, alias = "phone")]
    pub phone_number: Option<String>,
}

impl From<AgentRecord> for Agent {
    /// Agents created before salaries were tracked have none; they count as 0.
    fn from(r: AgentRecord) -> Self {
        Agent {
            id: r.id,
            name: r.name,
            role: r.role.unwrap_or_default(),
            salary: r.salary.unwrap_or_default(),
            date_of_birth: r.date_of_birth,
            email: r.email_address,
            phone: r.phone_number,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AgentPayload<'a> {
    pub name: &'a str,
    pub role: &'a str,
    #[serde(with = "agentpay_core::money::lenient")]
    pub salary: Amount,
    pub date_of_birth: Option<NaiveDate>,
    pub email_address: Option<&'a str>,
    pub phone_number: Option<&'a str>,
}

impl<'a> From<&'a AgentInput> for AgentPayload<'a> {
    fn from(input: &'a AgentInput) -> Self {
        Self {
            name: &input.name,
            role: &input.role,
            salary: input.salary,
            date_of_birth: input.date_of_birth,
            email_address: input.email.as_deref(),
            phone_number: input.phone.as_deref(),
        }
    }
}

// ---------------------------------------------------------------------------
// Debts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct DebtRecord {
    pub id: EntityId,
    pub agent_id: EntityId,
    #[serde(with = "agentpay_core::money::lenient")]
    pub amount: Amount,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default, with = "lenient_date")]
    pub debt_date: Option<NaiveDate>,
}

impl TryFrom<DebtRecord> for Debt {
    type Error = CoreError;

    fn try_from(r: DebtRecord) -> Result<Self, Self::Error> {
        let debt_date = r
            .debt_date
            .ok_or_else(|| decode(format!("debt {} has no debt_date", r.id)))?;
        Ok(Debt {
            id: r.id,
            agent_id: r.agent_id,
            amount: r.amount,
            reason: r.reason,
            debt_date,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct DebtPayload<'a> {
    pub agent_id: EntityId,
    #[serde(with = "agentpay_core::money::lenient")]
    pub amount: Amount,
    pub reason: Option<&'a str>,
    pub debt_date: NaiveDate,
}

// ---------------------------------------------------------------------------
// Payments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentRecord {
    pub id: EntityId,
    pub agent_id: EntityId,
    #[serde(with = "agentpay_core::money::lenient")]
    pub amount: Amount,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, with = "lenient_date")]
    pub payment_date: Option<NaiveDate>,
}

impl TryFrom<PaymentRecord> for Payment {
    type Error = CoreError;

    fn try_from(r: PaymentRecord) -> Result<Self, Self::Error> {
        let status = match r.status.as_deref() {
            Some(raw) => PaymentStatus::parse_lenient(raw)?,
            None => PaymentStatus::Pending,
        };
        let payment_date = r
            .payment_date
            .ok_or_else(|| decode(format!("payment {} has no payment_date", r.id)))?;
        Ok(Payment {
            id: r.id,
            agent_id: r.agent_id,
            amount: r.amount,
            status,
            period: YearMonth::from_date(payment_date),
            payment_date: Some(payment_date),
        })
    }
}

/// Body for both creating and replacing a payment.
#[derive(Debug, Serialize)]
pub struct PaymentPayload {
    pub agent_id: EntityId,
    #[serde(with = "agentpay_core::money::lenient")]
    pub amount: Amount,
    pub payment_date: NaiveDate,
    pub status: &'static str,
}

impl PaymentPayload {
    /// Replacement body carrying `payment` with a new status.
    pub fn with_status(payment: &Payment, status: PaymentStatus) -> Self {
        Self {
            agent_id: payment.agent_id,
            amount: payment.amount,
            payment_date: payment.payment_date.unwrap_or_else(|| payment.period.first_day()),
            status: status.as_str(),
        }
    }
}

// ---------------------------------------------------------------------------
// Grades
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct GradeRecord {
    pub id: EntityId,
    pub libelle: String,
    #[serde(with = "agentpay_core::money::lenient")]
    pub salaire_base: Amount,
}

impl From<GradeRecord> for Grade {
    fn from(r: GradeRecord) -> Self {
        Grade {
            id: r.id,
            label: r.libelle,
            base_salary: r.salaire_base,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GradePayload<'a> {
    pub libelle: &'a str,
    #[serde(with = "agentpay_core::money::lenient")]
    pub salaire_base: Amount,
}

impl<'a> From<&'a GradeInput> for GradePayload<'a> {
    fn from(input: &'a GradeInput) -> Self {
        Self {
            libelle: &input.label,
            salaire_base: input.base_salary,
        }
    }
}

// ---------------------------------------------------------------------------
// Pay elements
// ---------------------------------------------------------------------------

/// Upstream spelling of a pay element kind.
pub fn element_kind_label(kind: PayElementKind) -> &'static str {
    match kind {
        PayElementKind::Gain => "Gain",
        PayElementKind::Deduction => "Retenue",
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ElementRecord {
    pub id: EntityId,
    pub nom_element: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, with = "agentpay_core::money::lenient_opt")]
    pub montant_fixe: Option<Amount>,
    #[serde(default)]
    pub description: Option<String>,
}

impl TryFrom<ElementRecord> for PayElement {
    type Error = CoreError;

    fn try_from(r: ElementRecord) -> Result<Self, Self::Error> {
        Ok(PayElement {
            id: r.id,
            kind: PayElementKind::parse_lenient(&r.kind)?,
            name: r.nom_element,
            fixed_amount: r.montant_fixe,
            description: r.description,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ElementPayload<'a> {
    pub nom_element: &'a str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(with = "agentpay_core::money::lenient_opt")]
    pub montant_fixe: Option<Amount>,
    pub description: Option<&'a str>,
}

impl<'a> From<&'a PayElementInput> for ElementPayload<'a> {
    fn from(input: &'a PayElementInput) -> Self {
        Self {
            nom_element: &input.name,
            kind: element_kind_label(input.kind),
            montant_fixe: input.fixed_amount,
            description: input.description.as_deref(),
        }
    }
}

// ---------------------------------------------------------------------------
// Provinces and establishments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ProvinceRecord {
    pub id: EntityId,
    pub nom: String,
}

impl From<ProvinceRecord> for Province {
    fn from(r: ProvinceRecord) -> Self {
        Province { id: r.id, name: r.nom }
    }
}

#[derive(Debug, Serialize)]
pub struct ProvincePayload<'a> {
    pub nom: &'a str,
}

impl<'a> From<&'a ProvinceInput> for ProvincePayload<'a> {
    fn from(input: &'a ProvinceInput) -> Self {
        Self { nom: &input.name }
    }
}

pub fn pay_zone_label(zone: PayZone) -> &'static str {
    match zone {
        PayZone::Urban => "Urbaine",
        PayZone::Rural => "Rurale",
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EstablishmentRecord {
    pub id: EntityId,
    pub nom_ecole: String,
    pub province_id: EntityId,
    pub zone_paie: String,
}

impl TryFrom<EstablishmentRecord> for Establishment {
    type Error = CoreError;

    fn try_from(r: EstablishmentRecord) -> Result<Self, Self::Error> {
        Ok(Establishment {
            id: r.id,
            pay_zone: PayZone::parse_lenient(&r.zone_paie)?,
            name: r.nom_ecole,
            province_id: r.province_id,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct EstablishmentPayload<'a> {
    pub nom_ecole: &'a str,
    pub province_id: EntityId,
    pub zone_paie: &'static str,
}

impl<'a> From<&'a EstablishmentInput> for EstablishmentPayload<'a> {
    fn from(input: &'a EstablishmentInput) -> Self {
        Self {
            nom_ecole: &input.name,
            province_id: input.province_id,
            zone_paie: pay_zone_label(input.pay_zone),
        }
    }
}

// ---------------------------------------------------------------------------
// Teachers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct TeacherRecord {
    pub id: EntityId,
    pub matricule_dinacope: String,
    pub nom: String,
    #[serde(default)]
    pub prenom: Option<String>,
    pub grade_id: EntityId,
    pub ecole_id: EntityId,
    #[serde(default, alias = "telephone")]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl From<TeacherRecord> for Teacher {
    fn from(r: TeacherRecord) -> Self {
        Teacher {
            id: r.id,
            registration_number: r.matricule_dinacope,
            last_name: r.nom,
            first_name: r.prenom.unwrap_or_default(),
            grade_id: r.grade_id,
            establishment_id: r.ecole_id,
            phone: r.phone,
            email: r.email,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TeacherPayload<'a> {
    pub matricule_dinacope: &'a str,
    pub nom: &'a str,
    pub prenom: &'a str,
    pub grade_id: EntityId,
    pub ecole_id: EntityId,
    pub telephone: Option<&'a str>,
    pub email: Option<&'a str>,
}

impl<'a> From<&'a TeacherInput> for TeacherPayload<'a> {
    fn from(input: &'a TeacherInput) -> Self {
        Self {
            matricule_dinacope: &input.registration_number,
            nom: &input.last_name,
            prenom: &input.first_name,
            grade_id: input.grade_id,
            ecole_id: input.establishment_id,
            telephone: input.phone.as_deref(),
            email: input.email.as_deref(),
        }
    }
}

/// Partial update; the backend applies only the fields present.
#[derive(Debug, Serialize)]
pub struct TeacherUpdatePayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nom: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prenom: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ecole_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telephone: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<&'a str>,
}

impl<'a> From<&'a TeacherUpdate> for TeacherUpdatePayload<'a> {
    fn from(update: &'a TeacherUpdate) -> Self {
        Self {
            nom: update.last_name.as_deref(),
            prenom: update.first_name.as_deref(),
            grade_id: update.grade_id,
            ecole_id: update.establishment_id,
            telephone: update.phone.as_deref(),
            email: update.email.as_deref(),
        }
    }
}

// ---------------------------------------------------------------------------
// Payslips
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct PayslipRecord {
    pub id: EntityId,
    pub enseignant_id: EntityId,
    pub mois: u32,
    pub annee: i32,
    #[serde(with = "agentpay_core::money::lenient_signed")]
    pub montant_brut: Amount,
    #[serde(with = "agentpay_core::money::lenient_signed")]
    pub total_gains: Amount,
    #[serde(with = "agentpay_core::money::lenient_signed")]
    pub total_retenues: Amount,
    #[serde(with = "agentpay_core::money::lenient_signed")]
    pub montant_net: Amount,
    #[serde(default)]
    pub statut_paiement: Option<String>,
    #[serde(default)]
    pub mode_paiement: Option<String>,
    #[serde(default)]
    pub date_paiement: Option<String>,
}

impl TryFrom<PayslipRecord> for Payslip {
    type Error = CoreError;

    fn try_from(r: PayslipRecord) -> Result<Self, Self::Error> {
        let status = match r.statut_paiement.as_deref() {
            Some(raw) => PayslipStatus::parse_lenient(raw)?,
            None => PayslipStatus::Pending,
        };
        Ok(Payslip {
            id: r.id,
            teacher_id: r.enseignant_id,
            period: YearMonth::new(r.annee, r.mois)?,
            gross: r.montant_brut,
            total_gains: r.total_gains,
            total_deductions: r.total_retenues,
            net: r.montant_net,
            status,
            payment_method: r.mode_paiement,
            paid_at: r.date_paiement.as_deref().and_then(parse_timestamp),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct PayslipPayload<'a> {
    pub enseignant_id: EntityId,
    pub mois: u32,
    pub annee: i32,
    pub primes: &'a [EntityId],
    pub retenues: &'a [EntityId],
}

impl<'a> From<&'a PayslipRequest> for PayslipPayload<'a> {
    fn from(request: &'a PayslipRequest) -> Self {
        Self {
            enseignant_id: request.teacher_id,
            mois: request.month,
            annee: request.year,
            primes: &request.gains,
            retenues: &request.deductions,
        }
    }
}
