//! Shared fixtures for integration tests

#![allow(dead_code)]

pub mod strategies;

use chrono::{DateTime, TimeZone, Utc};
use kontrak_core::pdf::{DocumentHeader, DocumentMetadata, DocumentRequest, SignatureBlock};
use kontrak_core::rendering::BuiltinBindings;

pub const CONTRACT_NUMBER: &str = "TSC202401150042";

/// 2024-01-15 10:00 WIB
pub fn issued_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 3, 0, 0).unwrap()
}

pub fn herman_bindings() -> BuiltinBindings {
    BuiltinBindings {
        user_name: "Herman Zaldivar".to_string(),
        user_email: "hermanzal@trader.com".to_string(),
        user_phone: "+62812-8888-9999".to_string(),
        trading_id: "TRD001".to_string(),
        contract_number: CONTRACT_NUMBER.to_string(),
        created_at: issued_at(),
        amount: 50_000_000.0,
    }
}

pub fn signature(signed_at: Option<DateTime<Utc>>) -> SignatureBlock {
    SignatureBlock {
        signer_name: "Herman Zaldivar".to_string(),
        trading_id: "TRD001".to_string(),
        signature_present: signed_at.is_some(),
        signed_at,
    }
}

pub fn document_request(text: &str, signed_at: Option<DateTime<Utc>>) -> DocumentRequest {
    DocumentRequest {
        finalized_text: text.to_string(),
        header: None,
        signature: signature(signed_at),
        metadata: DocumentMetadata::for_contract(CONTRACT_NUMBER, "Perjanjian Layanan"),
    }
}

pub fn with_header(mut request: DocumentRequest) -> DocumentRequest {
    request.header = Some(DocumentHeader {
        title: "KONTRAK DIGITAL TRADESTATION".to_string(),
        contract_number: CONTRACT_NUMBER.to_string(),
        created_at: issued_at(),
    });
    request
}
