//! Party DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use domain_party::ports::{NewAgent, NewDependant, NewMember};
use domain_party::{Agent, Dependant, Member};

#[derive(Debug, Deserialize, Validate)]
pub struct MemberRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub id_number: String,
    pub address: Option<String>,
}

impl From<MemberRequest> for NewMember {
    fn from(request: MemberRequest) -> Self {
        Self {
            name: request.name,
            id_number: request.id_number,
            address: request.address,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct DependantRequest {
    pub member_id: Uuid,
    #[validate(length(min = 1))]
    pub name: String,
    pub date_of_birth: Option<NaiveDate>,
}

impl From<DependantRequest> for NewDependant {
    fn from(request: DependantRequest) -> Self {
        Self {
            member_id: request.member_id.into(),
            name: request.name,
            date_of_birth: request.date_of_birth,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct AgentRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
}

impl From<AgentRequest> for NewAgent {
    fn from(request: AgentRequest) -> Self {
        Self {
            name: request.name,
            email: request.email,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub id: Uuid,
    pub name: String,
    pub id_number: String,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Member> for MemberResponse {
    fn from(member: Member) -> Self {
        Self {
            id: member.id.into(),
            name: member.name,
            id_number: member.id_number,
            address: member.address,
            created_at: member.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DependantResponse {
    pub id: Uuid,
    pub member_id: Uuid,
    pub name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl From<Dependant> for DependantResponse {
    fn from(dependant: Dependant) -> Self {
        Self {
            id: dependant.id.into(),
            member_id: dependant.member_id.into(),
            name: dependant.name,
            date_of_birth: dependant.date_of_birth,
            created_at: dependant.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AgentResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<Agent> for AgentResponse {
    fn from(agent: Agent) -> Self {
        Self {
            id: agent.id.into(),
            name: agent.name,
            email: agent.email,
            created_at: agent.created_at,
        }
    }
}
