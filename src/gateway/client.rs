//! HTTP client for the external split API (extraction, directory, ledger).
//!
//! The three collaborators live behind one base URL. All wire-shape
//! tolerance lives here: single-vs-batch receipt payloads, numeric or
//! string ids, one-or-many receipt paths.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::multipart;
use rust_decimal::prelude::*;
use serde::Deserialize;
use thiserror::Error;

use crate::allocation::ItemAllocation;
use crate::config::UpstreamConfig;
use crate::models::{ExpenseRequest, Group, TaxInfo, User};
use crate::money;

// ============================================================================
// Errors
// ============================================================================

/// Upstream collaborator failures. How these surface to the user differs
/// per collaborator (directory errors fall back silently, extraction and
/// ledger errors do not); that policy lives in the handlers.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream responded with status {0}")]
    Status(u16),
}

// ============================================================================
// Wire shapes
// ============================================================================

/// Ids arrive as JSON numbers or strings depending on the backend version.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Text(String),
    Number(i64),
}

impl WireId {
    pub fn to_id_string(&self) -> String {
        match self {
            WireId::Text(s) => s.clone(),
            WireId::Number(n) => n.to_string(),
        }
    }
}

/// One extracted receipt line.
#[derive(Debug, Deserialize)]
pub struct ReceiptLine {
    pub name: String,
    #[serde(default)]
    pub cost: f64,
}

/// One extracted receipt.
#[derive(Debug, Deserialize)]
pub struct ReceiptData {
    #[serde(default)]
    pub items: Vec<ReceiptLine>,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub tax: f64,
}

/// The extraction service returns one receipt or a batch.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ReceiptPayload {
    Batch(Vec<ReceiptData>),
    Single(ReceiptData),
}

/// One storage path or several (one per uploaded image).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ReceiptPaths {
    Many(Vec<String>),
    One(String),
}

/// Raw `POST /imageUpload` response.
#[derive(Debug, Deserialize)]
pub struct ExtractionResponse {
    /// Member name → id
    #[serde(default)]
    pub members: BTreeMap<String, WireId>,
    pub receipt_data: ReceiptPayload,
    #[serde(default)]
    pub primary_receipt_path: Option<String>,
    #[serde(default)]
    pub receipt_path: Option<ReceiptPaths>,
}

#[derive(Debug, Deserialize)]
struct GroupWire {
    name: String,
}

#[derive(Debug, Deserialize)]
struct GroupsResponse {
    #[serde(default)]
    groups: BTreeMap<String, GroupWire>,
}

#[derive(Debug, Deserialize)]
pub struct LedgerReceipt {
    #[serde(default)]
    pub id: Option<WireId>,
}

/// An uploaded receipt image forwarded verbatim to the extraction service.
pub struct UploadFile {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub content_type: Option<String>,
}

// ============================================================================
// Session seed derived from an extraction round
// ============================================================================

/// Everything the session needs from one `/imageUpload` round: a colored
/// roster, a flat item list across all receipts, and the summed tax figure.
#[derive(Debug)]
pub struct AnalyzedReceipts {
    pub users: Vec<User>,
    pub items: Vec<ItemAllocation>,
    pub tax_info: TaxInfo,
    pub subtotal: String,
    pub total: String,
    pub primary_receipt_path: Option<String>,
    pub all_receipt_paths: Vec<String>,
}

impl From<ExtractionResponse> for AnalyzedReceipts {
    fn from(resp: ExtractionResponse) -> Self {
        // Roster order is member-name order (BTreeMap), which keeps the
        // palette assignment deterministic across identical uploads.
        let users: Vec<User> = resp
            .members
            .iter()
            .enumerate()
            .map(|(idx, (name, id))| User::new(id.to_id_string(), name.clone(), idx))
            .collect();

        let (receipts, batched) = match resp.receipt_data {
            ReceiptPayload::Batch(list) => (list, true),
            ReceiptPayload::Single(one) => (vec![one], false),
        };

        let mut items = Vec::new();
        let mut subtotal = Decimal::ZERO;
        let mut tax_total = Decimal::ZERO;

        for (ridx, receipt) in receipts.iter().enumerate() {
            for (iidx, line) in receipt.items.iter().enumerate() {
                let id = if batched {
                    format!("{}_{}", ridx, iidx)
                } else {
                    iidx.to_string()
                };
                let cost = Decimal::from_f64(line.cost).unwrap_or(Decimal::ZERO);
                items.push(ItemAllocation::new(
                    id,
                    line.name.clone(),
                    format!("${}", money::format_amount(cost)),
                ));
            }

            let total = Decimal::from_f64(receipt.total).unwrap_or(Decimal::ZERO);
            let tax = Decimal::from_f64(receipt.tax).unwrap_or(Decimal::ZERO);
            subtotal += total - tax;
            tax_total += tax;
        }

        let rate = if subtotal.is_zero() {
            0.0
        } else {
            (tax_total / subtotal).to_f64().unwrap_or_default()
        };

        let all_receipt_paths = match resp.receipt_path {
            Some(ReceiptPaths::Many(paths)) => paths,
            Some(ReceiptPaths::One(path)) => vec![path],
            None => Vec::new(),
        };

        Self {
            users,
            items,
            tax_info: TaxInfo { rate, amount: money::format_amount(tax_total) },
            subtotal: money::format_amount(subtotal),
            total: money::format_amount(subtotal + tax_total),
            primary_receipt_path: resp.primary_receipt_path,
            all_receipt_paths,
        }
    }
}

// ============================================================================
// Client
// ============================================================================

/// Thin typed wrapper over the split API endpoints.
#[derive(Debug, Clone)]
pub struct SplitApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl SplitApiClient {
    pub fn new(config: &UpstreamConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .expect("failed to build upstream HTTP client");

        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Forward receipt images to the extraction service and parse the
    /// combined item/roster/tax payload.
    pub async fn analyze_receipts(
        &self,
        files: Vec<UploadFile>,
        group_id: &str,
    ) -> Result<ExtractionResponse, UpstreamError> {
        let mut form = multipart::Form::new()
            .text("groupId", group_id.to_string())
            .text("multipleReceipts", "true");

        for file in files {
            let mut part = multipart::Part::bytes(file.bytes).file_name(file.file_name);
            if let Some(mime) = file.content_type {
                part = part.mime_str(&mime)?;
            }
            form = form.part("files", part);
        }

        let resp = self
            .http
            .post(format!("{}/imageUpload", self.base_url))
            .multipart(form)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(UpstreamError::Status(resp.status().as_u16()));
        }

        Ok(resp.json::<ExtractionResponse>().await?)
    }

    /// Fetch the raw group directory (sentinel group included).
    pub async fn fetch_groups(&self) -> Result<BTreeMap<String, Group>, UpstreamError> {
        let resp = self
            .http
            .get(format!("{}/groups", self.base_url))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(UpstreamError::Status(resp.status().as_u16()));
        }

        let wire = resp.json::<GroupsResponse>().await?;
        Ok(wire
            .groups
            .into_iter()
            .map(|(id, g)| (id.clone(), Group { id, name: g.name }))
            .collect())
    }

    /// Submit the finalized expense record to the ledger.
    pub async fn create_expense(
        &self,
        expense: &ExpenseRequest,
    ) -> Result<LedgerReceipt, UpstreamError> {
        let resp = self
            .http
            .post(format!("{}/expenses", self.base_url))
            .json(expense)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(UpstreamError::Status(resp.status().as_u16()));
        }

        Ok(resp.json::<LedgerReceipt>().await?)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
