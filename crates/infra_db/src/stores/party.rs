//! Party store adapter

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use core_kernel::{AgentId, CoreError, CoreResult, DependantId, MemberId};
use domain_party::ports::{NewAgent, NewDependant, NewMember, PartyStore};
use domain_party::{Agent, Dependant, Member};

use crate::error::map_db_error;

#[derive(Debug, Clone)]
pub struct PgPartyStore {
    pool: PgPool,
}

impl PgPartyStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn member_exists(&self, id: MemberId) -> CoreResult<()> {
        let found: Option<i32> = sqlx::query_scalar("SELECT 1 FROM members WHERE id = $1")
            .bind(Uuid::from(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("Member", e))?;
        match found {
            Some(_) => Ok(()),
            None => Err(CoreError::not_found("Member", id)),
        }
    }
}

#[derive(sqlx::FromRow)]
struct MemberRow {
    id: Uuid,
    name: String,
    id_number: String,
    address: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<MemberRow> for Member {
    fn from(row: MemberRow) -> Self {
        Member {
            id: MemberId::from(row.id),
            name: row.name,
            id_number: row.id_number,
            address: row.address,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct DependantRow {
    id: Uuid,
    member_id: Uuid,
    name: String,
    date_of_birth: Option<NaiveDate>,
    created_at: DateTime<Utc>,
}

impl From<DependantRow> for Dependant {
    fn from(row: DependantRow) -> Self {
        Dependant {
            id: DependantId::from(row.id),
            member_id: MemberId::from(row.member_id),
            name: row.name,
            date_of_birth: row.date_of_birth,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct AgentRow {
    id: Uuid,
    name: String,
    email: String,
    created_at: DateTime<Utc>,
}

impl From<AgentRow> for Agent {
    fn from(row: AgentRow) -> Self {
        Agent {
            id: AgentId::from(row.id),
            name: row.name,
            email: row.email,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl PartyStore for PgPartyStore {
    async fn get_member(&self, id: MemberId) -> CoreResult<Member> {
        sqlx::query_as::<_, MemberRow>(
            "SELECT id, name, id_number, address, created_at FROM members WHERE id = $1",
        )
        .bind(Uuid::from(id))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error("Member", e))?
        .map(Member::from)
        .ok_or_else(|| CoreError::not_found("Member", id))
    }

    async fn list_members(&self) -> CoreResult<Vec<Member>> {
        let rows = sqlx::query_as::<_, MemberRow>(
            "SELECT id, name, id_number, address, created_at FROM members ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error("Member", e))?;
        Ok(rows.into_iter().map(Member::from).collect())
    }

    async fn create_member(&self, new: NewMember, now: DateTime<Utc>) -> CoreResult<Member> {
        let member = Member::new(MemberId::new_v7(), new.name, new.id_number, new.address, now);
        sqlx::query(
            "INSERT INTO members (id, name, id_number, address, created_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(Uuid::from(member.id))
        .bind(&member.name)
        .bind(&member.id_number)
        .bind(&member.address)
        .bind(member.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error("Member", e))?;
        Ok(member)
    }

    async fn update_member(&self, id: MemberId, new: NewMember) -> CoreResult<Member> {
        sqlx::query_as::<_, MemberRow>(
            "UPDATE members SET name = $2, id_number = $3, address = $4
             WHERE id = $1
             RETURNING id, name, id_number, address, created_at",
        )
        .bind(Uuid::from(id))
        .bind(&new.name)
        .bind(&new.id_number)
        .bind(&new.address)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error("Member", e))?
        .map(Member::from)
        .ok_or_else(|| CoreError::not_found("Member", id))
    }

    async fn delete_member(&self, id: MemberId) -> CoreResult<()> {
        // Dependants, policies and their payments and claims go with the
        // member via ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM members WHERE id = $1")
            .bind(Uuid::from(id))
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error("Member", e))?;
        if result.rows_affected() == 0 {
            return Err(CoreError::not_found("Member", id));
        }
        Ok(())
    }

    async fn list_dependants(&self) -> CoreResult<Vec<Dependant>> {
        let rows = sqlx::query_as::<_, DependantRow>(
            "SELECT id, member_id, name, date_of_birth, created_at
             FROM dependants ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error("Dependant", e))?;
        Ok(rows.into_iter().map(Dependant::from).collect())
    }

    async fn create_dependant(
        &self,
        new: NewDependant,
        now: DateTime<Utc>,
    ) -> CoreResult<Dependant> {
        self.member_exists(new.member_id).await?;
        let dependant = Dependant::new(
            DependantId::new_v7(),
            new.member_id,
            new.name,
            new.date_of_birth,
            now,
        );
        sqlx::query(
            "INSERT INTO dependants (id, member_id, name, date_of_birth, created_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(Uuid::from(dependant.id))
        .bind(Uuid::from(dependant.member_id))
        .bind(&dependant.name)
        .bind(dependant.date_of_birth)
        .bind(dependant.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error("Dependant", e))?;
        Ok(dependant)
    }

    async fn update_dependant(&self, id: DependantId, new: NewDependant) -> CoreResult<Dependant> {
        self.member_exists(new.member_id).await?;
        sqlx::query_as::<_, DependantRow>(
            "UPDATE dependants SET member_id = $2, name = $3, date_of_birth = $4
             WHERE id = $1
             RETURNING id, member_id, name, date_of_birth, created_at",
        )
        .bind(Uuid::from(id))
        .bind(Uuid::from(new.member_id))
        .bind(&new.name)
        .bind(new.date_of_birth)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error("Dependant", e))?
        .map(Dependant::from)
        .ok_or_else(|| CoreError::not_found("Dependant", id))
    }

    async fn delete_dependant(&self, id: DependantId) -> CoreResult<()> {
        let result = sqlx::query("DELETE FROM dependants WHERE id = $1")
            .bind(Uuid::from(id))
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error("Dependant", e))?;
        if result.rows_affected() == 0 {
            return Err(CoreError::not_found("Dependant", id));
        }
        Ok(())
    }

    async fn list_agents(&self) -> CoreResult<Vec<Agent>> {
        let rows = sqlx::query_as::<_, AgentRow>(
            "SELECT id, name, email, created_at FROM agents ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error("Agent", e))?;
        Ok(rows.into_iter().map(Agent::from).collect())
    }

    async fn create_agent(&self, new: NewAgent, now: DateTime<Utc>) -> CoreResult<Agent> {
        let agent = Agent::new(AgentId::new_v7(), new.name, new.email, now);
        sqlx::query(
            "INSERT INTO agents (id, name, email, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(Uuid::from(agent.id))
        .bind(&agent.name)
        .bind(&agent.email)
        .bind(agent.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error("Agent", e))?;
        Ok(agent)
    }

    async fn delete_agent(&self, id: AgentId) -> CoreResult<()> {
        let result = sqlx::query("DELETE FROM agents WHERE id = $1")
            .bind(Uuid::from(id))
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error("Agent", e))?;
        if result.rows_affected() == 0 {
            return Err(CoreError::not_found("Agent", id));
        }
        Ok(())
    }
}
