//! # Contract Service
//!
//! Contract workflows behind the HTTP API: token access, signing, PDF download,
//! creation and link generation. Rendering goes through [`TemplateRenderer`]
//! and document output through [`generate_document`].

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use super::credentials::{
    generate_access_token, generate_contract_number, is_plausible_access_token,
};
use super::ClientInfo;
use crate::config::{DocumentConfig, FrontendConfig, KontrakConfig};
use crate::error::{KontrakError, Result};
use crate::logging::log_contract_operation;
use crate::models::{
    Contract, ContractHistory, ContractSummary, NewContract, NewContractHistory, Template, User,
    LIST_LIMIT,
};
use crate::pdf::{
    document_filename, generate_document, DocumentFormatter, DocumentHeader, DocumentMetadata,
    DocumentRequest, SignatureBlock,
};
use crate::rendering::{
    variables_from_json, variables_to_json, BuiltinBindings, ContractVariables, IndonesianLocale,
    TemplateRenderer,
};
use crate::state_machine::{ContractEvent, ContractStateMachine, ContractStatus, StateMachineError};

/// Payloads must be an embedded image data URL
pub const SIGNATURE_DATA_PREFIX: &str = "data:image/";

/// Contract opened through its access link, with the rendered body
#[derive(Debug, Clone)]
pub struct AccessedContract {
    pub contract: Contract,
    pub owner: User,
    pub template: Option<Template>,
    pub content: String,
}

/// Signature submitted through an access link
#[derive(Debug, Clone, Default)]
pub struct SignatureSubmission {
    pub signature_data: String,
    /// Extra bindings merged over the stored ones; later keys win
    pub variables: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedContract {
    #[serde(skip)]
    pub contract: Contract,
    pub pdf_download_url: String,
    pub signed_at: DateTime<Utc>,
}

/// Rendered PDF ready to be sent as an attachment
#[derive(Debug, Clone)]
pub struct ContractDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Admin request to issue a contract
#[derive(Debug, Clone)]
pub struct CreateContract {
    pub title: String,
    pub template_id: Uuid,
    pub user_id: Uuid,
    pub amount: f64,
    pub variables: Option<serde_json::Value>,
    pub content: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub admin_notes: Option<String>,
    pub send_immediately: bool,
}

#[derive(Debug, Clone)]
pub struct CreatedContract {
    pub contract: Contract,
    pub access_link: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedLink {
    pub access_link: String,
    pub token: String,
    pub status: ContractStatus,
}

#[derive(Clone)]
pub struct ContractService {
    pool: PgPool,
    renderer: TemplateRenderer,
    formatter: DocumentFormatter,
    document: DocumentConfig,
    frontend: FrontendConfig,
}

impl ContractService {
    pub fn new(pool: PgPool, config: &KontrakConfig) -> Result<Self> {
        let locale = IndonesianLocale::new(config.document.utc_offset()?);
        Ok(Self {
            pool,
            renderer: TemplateRenderer::new(locale),
            formatter: DocumentFormatter::new(locale),
            document: config.document.clone(),
            frontend: config.frontend.clone(),
        })
    }

    pub fn renderer(&self) -> &TemplateRenderer {
        &self.renderer
    }

    pub fn access_link(&self, access_token: &str) -> String {
        self.frontend.access_link(access_token)
    }

    /// Open a contract through its access token
    ///
    /// A draft or sent contract read past its expiry is moved to `expired`
    /// and reported as [`KontrakError::Expired`]; so is every later read.
    pub async fn access(&self, token: &str, now: DateTime<Utc>) -> Result<AccessedContract> {
        if !is_plausible_access_token(token) {
            return Err(KontrakError::validation("Invalid access token"));
        }

        let contract = Contract::find_by_access_token(&self.pool, token)
            .await?
            .ok_or_else(|| KontrakError::not_found("Contract not found or access denied"))?;

        let owner = User::find_by_id(&self.pool, contract.user_id)
            .await?
            .filter(|user| user.is_active)
            .ok_or_else(|| KontrakError::not_found("Contract not found or access denied"))?;

        let status = parse_status(&contract)?;
        if ContractStateMachine::is_past_expiry(status, contract.expires_at, now) {
            self.expire(&contract).await?;
            return Err(KontrakError::Expired);
        }
        if status == ContractStatus::Expired {
            return Err(KontrakError::Expired);
        }

        let template = self.load_template(&contract).await?;
        let variables = contract.custom_variables();
        let content = self.render_body(&contract, &owner, template.as_ref(), &variables);

        Ok(AccessedContract {
            contract,
            owner,
            template,
            content,
        })
    }

    /// Sign a sent contract
    ///
    /// The PDF is rendered before anything is stored, so a document failure
    /// leaves the contract untouched. The write itself is conditional on the
    /// contract still being `sent`.
    pub async fn sign(
        &self,
        token: &str,
        submission: SignatureSubmission,
        client: ClientInfo,
        now: DateTime<Utc>,
    ) -> Result<SignedContract> {
        validate_signature_data(&submission.signature_data)?;

        let contract = Contract::find_by_access_token(&self.pool, token)
            .await?
            .ok_or_else(|| KontrakError::not_found("Contract not found"))?;

        let status = parse_status(&contract)?;
        if let Err(e) = ContractStateMachine::check_signable(status, contract.expires_at, now) {
            if e == StateMachineError::Expired && status.can_expire() {
                self.expire(&contract).await?;
            }
            return Err(e.into());
        }

        let owner = User::find_by_id(&self.pool, contract.user_id)
            .await?
            .ok_or_else(|| KontrakError::not_found("Contract not found"))?;

        let variables = merge_variables(contract.custom_variables(), submission.variables.as_ref());
        let template = self.load_template(&contract).await?;
        let body = self.render_body(&contract, &owner, template.as_ref(), &variables);

        let request = self.document_request(&contract, &owner, body, true, Some(now));
        generate_document(self.formatter, request).await?;

        let signed = Contract::record_signature(
            &self.pool,
            contract.id,
            &submission.signature_data,
            &variables_to_json(&variables),
            now,
        )
        .await?;

        let Some(signed) = signed else {
            // Lost a race with another signer or an expiry
            let current = Contract::find_by_id(&self.pool, contract.id)
                .await?
                .ok_or_else(|| KontrakError::not_found("Contract not found"))?;
            let status = parse_status(&current)?;
            warn!(
                contract_number = %current.contract_number,
                status = %status,
                "Signature write rejected by status guard"
            );
            ContractStateMachine::check_signable(status, current.expires_at, now)?;
            return Err(StateMachineError::AlreadySigned.into());
        };

        ContractHistory::create(
            &self.pool,
            NewContractHistory::new(
                signed.id,
                ContractEvent::Sign.history_action(),
                "Contract signed by user with digital signature",
            )
            .performed_by(Some(owner.id))
            .with_client(client.ip_address, client.user_agent),
        )
        .await?;

        log_contract_operation(
            ContractEvent::Sign.event_type(),
            Some(&signed.contract_number),
            ContractStatus::Signed.as_str(),
            None,
        );

        Ok(SignedContract {
            pdf_download_url: format!("/api/contracts/download/{}", signed.id),
            signed_at: now,
            contract: signed,
        })
    }

    /// Render the PDF of a signed or completed contract
    pub async fn download(&self, contract_id: Uuid) -> Result<ContractDocument> {
        let contract = Contract::find_by_id(&self.pool, contract_id)
            .await?
            .ok_or_else(|| KontrakError::not_found("Contract not found"))?;

        if !parse_status(&contract)?.is_signed() {
            return Err(KontrakError::validation("Contract is not signed yet"));
        }

        let owner = User::find_by_id(&self.pool, contract.user_id)
            .await?
            .ok_or_else(|| KontrakError::not_found("Contract not found"))?;

        let template = self.load_template(&contract).await?;
        let variables = contract.custom_variables();
        let body = self.render_body(&contract, &owner, template.as_ref(), &variables);
        let request = self.document_request(
            &contract,
            &owner,
            body,
            contract.signature_data.is_some(),
            contract.signed_at,
        );

        let bytes = generate_document(self.formatter, request).await?;

        Ok(ContractDocument {
            filename: document_filename(&contract.contract_number),
            bytes,
        })
    }

    /// Issue a new contract in `draft`, or `sent` when requested
    pub async fn create(
        &self,
        request: CreateContract,
        created_by: Uuid,
    ) -> Result<CreatedContract> {
        let title = request.title.trim().to_string();
        if title.is_empty() {
            return Err(KontrakError::validation("Missing required fields"));
        }
        if !request.amount.is_finite() || request.amount < 0.0 {
            return Err(KontrakError::validation("Amount must be a non-negative number"));
        }

        if Template::find_by_id(&self.pool, request.template_id).await?.is_none() {
            return Err(KontrakError::not_found("Template not found"));
        }
        if User::find_by_id(&self.pool, request.user_id).await?.is_none() {
            return Err(KontrakError::not_found("User not found"));
        }

        let status = if request.send_immediately {
            ContractStatus::Sent
        } else {
            ContractStatus::Draft
        };

        let variables = request
            .variables
            .as_ref()
            .map(variables_from_json)
            .unwrap_or_default();

        let contract_number = self.unused_contract_number(Utc::now()).await?;
        let access_token = generate_access_token();

        let contract = Contract::create(
            &self.pool,
            NewContract {
                title,
                contract_number,
                user_id: request.user_id,
                template_id: Some(request.template_id),
                content: request.content.unwrap_or_default(),
                amount: request.amount,
                status,
                variables: variables_to_json(&variables),
                expires_at: request.expires_at,
                access_token,
                admin_notes: request.admin_notes.unwrap_or_default(),
                created_by: Some(created_by),
            },
        )
        .await?;

        ContractHistory::create(
            &self.pool,
            NewContractHistory::new(contract.id, "created", "Contract created by administrator")
                .performed_by(Some(created_by)),
        )
        .await?;

        info!(
            contract_number = %contract.contract_number,
            status = %status,
            "Contract created"
        );

        let access_link = self.access_link(&contract.access_token);
        Ok(CreatedContract {
            contract,
            access_link,
        })
    }

    /// Return the access link, moving a draft to `sent` first
    pub async fn generate_link(
        &self,
        contract_id: Uuid,
        performed_by: Uuid,
    ) -> Result<GeneratedLink> {
        let contract = Contract::find_by_id(&self.pool, contract_id)
            .await?
            .ok_or_else(|| KontrakError::not_found("Contract not found"))?;

        let mut status = parse_status(&contract)?;
        if status == ContractStatus::Draft {
            ContractStateMachine::determine_target_state(status, ContractEvent::Send)?;
            if let Some(sent) = Contract::mark_sent(&self.pool, contract.id).await? {
                status = parse_status(&sent)?;
                ContractHistory::create(
                    &self.pool,
                    NewContractHistory::new(
                        sent.id,
                        ContractEvent::Send.history_action(),
                        "Access link generated and contract sent",
                    )
                    .performed_by(Some(performed_by)),
                )
                .await?;
                log_contract_operation(
                    ContractEvent::Send.event_type(),
                    Some(&sent.contract_number),
                    status.as_str(),
                    None,
                );
            }
        }

        Ok(GeneratedLink {
            access_link: self.access_link(&contract.access_token),
            token: contract.access_token,
            status,
        })
    }

    /// Newest contracts visible to `viewer`
    pub async fn list(&self, viewer: &User) -> Result<Vec<ContractSummary>> {
        let owner = if viewer.is_admin() { None } else { Some(viewer.id) };
        Ok(Contract::list_recent(&self.pool, owner, LIST_LIMIT).await?)
    }

    /// Body text with all placeholders resolved; the template body wins over
    /// the contract's own content
    pub fn render_body(
        &self,
        contract: &Contract,
        owner: &User,
        template: Option<&Template>,
        variables: &ContractVariables,
    ) -> String {
        let body = template
            .map(|t| t.content.as_str())
            .filter(|content| !content.is_empty())
            .unwrap_or(contract.content.as_str());

        self.renderer
            .render(body, &builtin_bindings(contract, owner), variables)
    }

    fn document_request(
        &self,
        contract: &Contract,
        owner: &User,
        finalized_text: String,
        signature_present: bool,
        signed_at: Option<DateTime<Utc>>,
    ) -> DocumentRequest {
        DocumentRequest {
            finalized_text,
            header: Some(DocumentHeader {
                title: self.document.header_title.clone(),
                contract_number: contract.contract_number.clone(),
                created_at: contract.created_at,
            }),
            signature: SignatureBlock {
                signer_name: owner.name.clone(),
                trading_id: owner.trading_account.clone(),
                signature_present,
                signed_at,
            },
            metadata: DocumentMetadata {
                title: format!("Kontrak {}", contract.contract_number),
                author: self.document.author.clone(),
                subject: contract.title.clone(),
                creator: self.document.creator.clone(),
            },
        }
    }

    async fn load_template(&self, contract: &Contract) -> Result<Option<Template>> {
        match contract.template_id {
            Some(id) => Ok(Template::find_by_id(&self.pool, id).await?),
            None => Ok(None),
        }
    }

    async fn expire(&self, contract: &Contract) -> Result<()> {
        if let Some(expired) = Contract::mark_expired(&self.pool, contract.id).await? {
            ContractHistory::create(
                &self.pool,
                NewContractHistory::new(
                    expired.id,
                    ContractEvent::Expire.history_action(),
                    "Contract accessed after its expiry date",
                ),
            )
            .await?;
            log_contract_operation(
                ContractEvent::Expire.event_type(),
                Some(&expired.contract_number),
                ContractStatus::Expired.as_str(),
                None,
            );
        }
        Ok(())
    }

    async fn unused_contract_number(&self, now: DateTime<Utc>) -> Result<String> {
        let date = now
            .with_timezone(&self.renderer.locale().offset())
            .date_naive();
        for _ in 0..5 {
            let candidate = generate_contract_number(date);
            if !Contract::contract_number_exists(&self.pool, &candidate).await? {
                return Ok(candidate);
            }
        }
        Err(KontrakError::conflict("Could not allocate a unique contract number"))
    }
}

/// Reject missing or non-image signature payloads
pub fn validate_signature_data(signature_data: &str) -> Result<()> {
    if signature_data.trim().is_empty() {
        return Err(KontrakError::validation("Signature data required"));
    }
    if !signature_data.starts_with(SIGNATURE_DATA_PREFIX) {
        return Err(KontrakError::validation("Invalid signature format"));
    }
    Ok(())
}

/// Stored bindings overlaid with the submitted ones
pub fn merge_variables(
    mut stored: ContractVariables,
    submitted: Option<&serde_json::Value>,
) -> ContractVariables {
    if let Some(submitted) = submitted {
        stored.extend(variables_from_json(submitted));
    }
    stored
}

/// Built-in placeholder values from the contract and its owner
pub fn builtin_bindings(contract: &Contract, owner: &User) -> BuiltinBindings {
    BuiltinBindings {
        user_name: owner.name.clone(),
        user_email: owner.email.clone(),
        user_phone: owner.phone.clone(),
        trading_id: owner.trading_account.clone(),
        contract_number: contract.contract_number.clone(),
        created_at: contract.created_at,
        amount: contract.amount,
    }
}

fn parse_status(contract: &Contract) -> Result<ContractStatus> {
    contract.status().map_err(KontrakError::Internal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_signature_validation() {
        assert!(validate_signature_data("data:image/png;base64,iVBORw0KGgo=").is_ok());
        assert!(matches!(
            validate_signature_data(""),
            Err(KontrakError::ValidationError(msg)) if msg == "Signature data required"
        ));
        assert!(matches!(
            validate_signature_data("javascript:alert(1)"),
            Err(KontrakError::ValidationError(msg)) if msg == "Invalid signature format"
        ));
    }

    #[test]
    fn test_merge_variables_submitted_wins() {
        let mut stored = ContractVariables::new();
        stored.insert("LATE_FEE".to_string(), "Rp50.000".to_string());
        stored.insert("DAYS".to_string(), "14".to_string());

        let merged = merge_variables(stored.clone(), Some(&json!({"DAYS": 30, "NEW": "x"})));
        assert_eq!(merged["LATE_FEE"], "Rp50.000");
        assert_eq!(merged["DAYS"], "30");
        assert_eq!(merged["NEW"], "x");

        assert_eq!(merge_variables(stored.clone(), None), stored);
    }
}
