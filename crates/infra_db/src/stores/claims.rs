//! Claim store adapter

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use core_kernel::{ClaimId, CoreError, CoreResult, Money, PolicyId};
use domain_claims::ports::NewClaim;
use domain_claims::{Claim, ClaimStatus, ClaimStore};

use crate::error::{corrupt_row, map_db_error};

#[derive(Debug, Clone)]
pub struct PgClaimStore {
    pool: PgPool,
}

impl PgClaimStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ClaimRow {
    id: Uuid,
    policy_id: Uuid,
    death_certificate: String,
    affidavit: String,
    status: String,
    reject_reason: Option<String>,
    payout_amount: Option<Decimal>,
    submitted_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_status(raw: &str) -> CoreResult<ClaimStatus> {
    match raw {
        "Submitted" => Ok(ClaimStatus::Submitted),
        "UnderReview" => Ok(ClaimStatus::UnderReview),
        "Approved" => Ok(ClaimStatus::Approved),
        "Rejected" => Ok(ClaimStatus::Rejected),
        "Paid" => Ok(ClaimStatus::Paid),
        other => Err(corrupt_row("Claim", format!("unknown status '{other}'"))),
    }
}

impl TryFrom<ClaimRow> for Claim {
    type Error = CoreError;

    fn try_from(row: ClaimRow) -> CoreResult<Self> {
        let payout_amount = row
            .payout_amount
            .map(|d| Money::new(d).map_err(|e| corrupt_row("Claim", e)))
            .transpose()?;
        Ok(Claim {
            id: ClaimId::from(row.id),
            policy_id: PolicyId::from(row.policy_id),
            death_certificate: row.death_certificate,
            affidavit: row.affidavit,
            status: parse_status(&row.status)?,
            reject_reason: row.reject_reason,
            payout_amount,
            submitted_at: row.submitted_at,
            updated_at: row.updated_at,
        })
    }
}

const CLAIM_COLUMNS: &str = "id, policy_id, death_certificate, affidavit, status, \
                             reject_reason, payout_amount, submitted_at, updated_at";

#[async_trait]
impl ClaimStore for PgClaimStore {
    async fn get(&self, id: ClaimId) -> CoreResult<Claim> {
        let query = format!("SELECT {CLAIM_COLUMNS} FROM claims WHERE id = $1");
        sqlx::query_as::<_, ClaimRow>(&query)
            .bind(Uuid::from(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("Claim", e))?
            .ok_or_else(|| CoreError::not_found("Claim", id))?
            .try_into()
    }

    async fn list(&self) -> CoreResult<Vec<Claim>> {
        let query = format!("SELECT {CLAIM_COLUMNS} FROM claims ORDER BY submitted_at");
        let rows = sqlx::query_as::<_, ClaimRow>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_db_error("Claim", e))?;
        rows.into_iter().map(Claim::try_from).collect()
    }

    async fn list_by_policy(&self, policy_id: PolicyId) -> CoreResult<Vec<Claim>> {
        let query = format!(
            "SELECT {CLAIM_COLUMNS} FROM claims WHERE policy_id = $1 ORDER BY submitted_at"
        );
        let rows = sqlx::query_as::<_, ClaimRow>(&query)
            .bind(Uuid::from(policy_id))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_db_error("Claim", e))?;
        rows.into_iter().map(Claim::try_from).collect()
    }

    async fn create(&self, new: NewClaim, now: DateTime<Utc>) -> CoreResult<Claim> {
        let claim = Claim {
            id: ClaimId::new_v7(),
            policy_id: new.policy_id,
            death_certificate: new.death_certificate,
            affidavit: new.affidavit,
            status: ClaimStatus::Submitted,
            reject_reason: None,
            payout_amount: None,
            submitted_at: now,
            updated_at: now,
        };
        sqlx::query(
            "INSERT INTO claims (id, policy_id, death_certificate, affidavit, status,
                                 reject_reason, payout_amount, submitted_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(Uuid::from(claim.id))
        .bind(Uuid::from(claim.policy_id))
        .bind(&claim.death_certificate)
        .bind(&claim.affidavit)
        .bind(claim.status.to_string())
        .bind(&claim.reject_reason)
        .bind(claim.payout_amount.map(|m| m.amount()))
        .bind(claim.submitted_at)
        .bind(claim.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error("Claim", e))?;
        Ok(claim)
    }

    async fn save(&self, claim: &Claim) -> CoreResult<()> {
        let result = sqlx::query(
            "UPDATE claims SET status = $2, reject_reason = $3, payout_amount = $4,
                               updated_at = $5
             WHERE id = $1",
        )
        .bind(Uuid::from(claim.id))
        .bind(claim.status.to_string())
        .bind(&claim.reject_reason)
        .bind(claim.payout_amount.map(|m| m.amount()))
        .bind(claim.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error("Claim", e))?;
        if result.rows_affected() == 0 {
            return Err(CoreError::not_found("Claim", claim.id));
        }
        Ok(())
    }
}
