//! Policy and payment store adapters

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use core_kernel::{CoreError, CoreResult, MemberId, Money, PaymentId, PolicyId};
use domain_policy::ports::{NewPolicy, PolicyUpdate};
use domain_policy::{Payment, PaymentStore, Policy, PolicyStatus, PolicyStore};

use crate::error::{corrupt_row, map_db_error};

#[derive(Debug, Clone)]
pub struct PgPolicyStore {
    pool: PgPool,
}

impl PgPolicyStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PolicyRow {
    id: Uuid,
    member_id: Uuid,
    plan_type: String,
    cover_level: Decimal,
    premium: Decimal,
    start_date: DateTime<Utc>,
    status: String,
    created_at: DateTime<Utc>,
}

fn parse_status(raw: &str) -> CoreResult<PolicyStatus> {
    match raw {
        "Active" => Ok(PolicyStatus::Active),
        "Lapsed" => Ok(PolicyStatus::Lapsed),
        "Cancelled" => Ok(PolicyStatus::Cancelled),
        other => Err(corrupt_row("Policy", format!("unknown status '{other}'"))),
    }
}

impl TryFrom<PolicyRow> for Policy {
    type Error = CoreError;

    fn try_from(row: PolicyRow) -> CoreResult<Self> {
        Ok(Policy {
            id: PolicyId::from(row.id),
            member_id: MemberId::from(row.member_id),
            plan_type: row.plan_type,
            cover_level: Money::new(row.cover_level)
                .map_err(|e| corrupt_row("Policy", e))?,
            premium: Money::new(row.premium).map_err(|e| corrupt_row("Policy", e))?,
            start_date: row.start_date,
            status: parse_status(&row.status)?,
            created_at: row.created_at,
        })
    }
}

const POLICY_COLUMNS: &str =
    "id, member_id, plan_type, cover_level, premium, start_date, status, created_at";

#[async_trait]
impl PolicyStore for PgPolicyStore {
    async fn get(&self, id: PolicyId) -> CoreResult<Policy> {
        let query = format!("SELECT {POLICY_COLUMNS} FROM policies WHERE id = $1");
        sqlx::query_as::<_, PolicyRow>(&query)
            .bind(Uuid::from(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("Policy", e))?
            .ok_or_else(|| CoreError::not_found("Policy", id))?
            .try_into()
    }

    async fn list(&self) -> CoreResult<Vec<Policy>> {
        let query = format!("SELECT {POLICY_COLUMNS} FROM policies ORDER BY created_at");
        let rows = sqlx::query_as::<_, PolicyRow>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_db_error("Policy", e))?;
        rows.into_iter().map(Policy::try_from).collect()
    }

    async fn list_by_member(&self, member_id: MemberId) -> CoreResult<Vec<Policy>> {
        let query = format!(
            "SELECT {POLICY_COLUMNS} FROM policies WHERE member_id = $1 ORDER BY created_at"
        );
        let rows = sqlx::query_as::<_, PolicyRow>(&query)
            .bind(Uuid::from(member_id))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_db_error("Policy", e))?;
        rows.into_iter().map(Policy::try_from).collect()
    }

    async fn list_active(&self) -> CoreResult<Vec<Policy>> {
        let query = format!(
            "SELECT {POLICY_COLUMNS} FROM policies WHERE status = 'Active' ORDER BY created_at"
        );
        let rows = sqlx::query_as::<_, PolicyRow>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_db_error("Policy", e))?;
        rows.into_iter().map(Policy::try_from).collect()
    }

    async fn create(&self, new: NewPolicy, now: DateTime<Utc>) -> CoreResult<Policy> {
        let policy = Policy {
            id: PolicyId::new_v7(),
            member_id: new.member_id,
            plan_type: new.plan_type,
            cover_level: new.cover_level,
            premium: new.premium,
            start_date: new.start_date.unwrap_or(now),
            status: PolicyStatus::Active,
            created_at: now,
        };
        sqlx::query(
            "INSERT INTO policies (id, member_id, plan_type, cover_level, premium, start_date, status, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(Uuid::from(policy.id))
        .bind(Uuid::from(policy.member_id))
        .bind(&policy.plan_type)
        .bind(policy.cover_level.amount())
        .bind(policy.premium.amount())
        .bind(policy.start_date)
        .bind(policy.status.to_string())
        .bind(policy.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error("Policy", e))?;
        Ok(policy)
    }

    async fn update(&self, id: PolicyId, update: PolicyUpdate) -> CoreResult<Policy> {
        let query = format!(
            "UPDATE policies SET
                plan_type = COALESCE($2, plan_type),
                cover_level = COALESCE($3, cover_level),
                premium = COALESCE($4, premium),
                status = COALESCE($5, status)
             WHERE id = $1
             RETURNING {POLICY_COLUMNS}"
        );
        sqlx::query_as::<_, PolicyRow>(&query)
            .bind(Uuid::from(id))
            .bind(update.plan_type)
            .bind(update.cover_level.map(|m| m.amount()))
            .bind(update.premium.map(|m| m.amount()))
            .bind(update.status.map(|s| s.to_string()))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("Policy", e))?
            .ok_or_else(|| CoreError::not_found("Policy", id))?
            .try_into()
    }

    async fn delete(&self, id: PolicyId) -> CoreResult<()> {
        let result = sqlx::query("DELETE FROM policies WHERE id = $1")
            .bind(Uuid::from(id))
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error("Policy", e))?;
        if result.rows_affected() == 0 {
            return Err(CoreError::not_found("Policy", id));
        }
        Ok(())
    }

    async fn mark_lapsed(&self, id: PolicyId) -> CoreResult<bool> {
        // The status guard rides in the WHERE clause so the transition is
        // atomic under concurrent lapse runs.
        let result = sqlx::query(
            "UPDATE policies SET status = 'Lapsed' WHERE id = $1 AND status = 'Active'",
        )
        .bind(Uuid::from(id))
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error("Policy", e))?;

        if result.rows_affected() == 1 {
            return Ok(true);
        }
        // Distinguish a missing policy from one already out of Active.
        self.get(id).await?;
        Ok(false)
    }
}

#[derive(Debug, Clone)]
pub struct PgPaymentStore {
    pool: PgPool,
}

impl PgPaymentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PaymentRow {
    id: Uuid,
    policy_id: Uuid,
    amount: Decimal,
    paid_at: DateTime<Utc>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = CoreError;

    fn try_from(row: PaymentRow) -> CoreResult<Self> {
        Ok(Payment {
            id: PaymentId::from(row.id),
            policy_id: PolicyId::from(row.policy_id),
            amount: Money::new(row.amount).map_err(|e| corrupt_row("Payment", e))?,
            paid_at: row.paid_at,
        })
    }
}

#[async_trait]
impl PaymentStore for PgPaymentStore {
    async fn append(
        &self,
        policy_id: PolicyId,
        amount: Money,
        now: DateTime<Utc>,
    ) -> CoreResult<Payment> {
        let payment = Payment {
            id: PaymentId::new_v7(),
            policy_id,
            amount,
            paid_at: now,
        };
        sqlx::query(
            "INSERT INTO payments (id, policy_id, amount, paid_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(Uuid::from(payment.id))
        .bind(Uuid::from(payment.policy_id))
        .bind(payment.amount.amount())
        .bind(payment.paid_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error("Payment", e))?;
        Ok(payment)
    }

    async fn list_for(&self, policy_id: PolicyId) -> CoreResult<Vec<Payment>> {
        let rows = sqlx::query_as::<_, PaymentRow>(
            "SELECT id, policy_id, amount, paid_at FROM payments
             WHERE policy_id = $1 ORDER BY paid_at",
        )
        .bind(Uuid::from(policy_id))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error("Payment", e))?;
        rows.into_iter().map(Payment::try_from).collect()
    }
}
