//! Party domain ports

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use core_kernel::{AgentId, CoreError, CoreResult, DependantId, MemberId};

use crate::agent::Agent;
use crate::member::{Dependant, Member};

/// Data for creating or replacing a member record
#[derive(Debug, Clone)]
pub struct NewMember {
    pub name: String,
    pub id_number: String,
    pub address: Option<String>,
}

/// Data for creating or replacing a dependant record
#[derive(Debug, Clone)]
pub struct NewDependant {
    pub member_id: MemberId,
    pub name: String,
    pub date_of_birth: Option<NaiveDate>,
}

/// Data for creating an agent record
#[derive(Debug, Clone)]
pub struct NewAgent {
    pub name: String,
    pub email: String,
}

/// Persistence port for member, dependant and agent records
///
/// Deleting a member cascades at the storage layer: their dependants go,
/// and persistent implementations drop the member's policies with their
/// payments and claims. Referential integrity lives here, not in the
/// domain services.
#[async_trait]
pub trait PartyStore: Send + Sync {
    async fn get_member(&self, id: MemberId) -> CoreResult<Member>;
    async fn list_members(&self) -> CoreResult<Vec<Member>>;
    /// `DuplicateKey` on an id number already registered
    async fn create_member(&self, new: NewMember, now: DateTime<Utc>) -> CoreResult<Member>;
    async fn update_member(&self, id: MemberId, new: NewMember) -> CoreResult<Member>;
    async fn delete_member(&self, id: MemberId) -> CoreResult<()>;

    async fn list_dependants(&self) -> CoreResult<Vec<Dependant>>;
    async fn create_dependant(&self, new: NewDependant, now: DateTime<Utc>)
        -> CoreResult<Dependant>;
    async fn update_dependant(&self, id: DependantId, new: NewDependant) -> CoreResult<Dependant>;
    async fn delete_dependant(&self, id: DependantId) -> CoreResult<()>;

    async fn list_agents(&self) -> CoreResult<Vec<Agent>>;
    /// `DuplicateKey` on an email already registered
    async fn create_agent(&self, new: NewAgent, now: DateTime<Utc>) -> CoreResult<Agent>;
    async fn delete_agent(&self, id: AgentId) -> CoreResult<()>;
}

/// In-memory implementation for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    #[derive(Debug, Default)]
    pub struct MockPartyStore {
        members: Arc<RwLock<HashMap<MemberId, Member>>>,
        dependants: Arc<RwLock<HashMap<DependantId, Dependant>>>,
        agents: Arc<RwLock<HashMap<AgentId, Agent>>>,
    }

    impl MockPartyStore {
        pub fn new() -> Self {
            Self::default()
        }
    }

    #[async_trait]
    impl PartyStore for MockPartyStore {
        async fn get_member(&self, id: MemberId) -> CoreResult<Member> {
            self.members
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| CoreError::not_found("Member", id))
        }

        async fn list_members(&self) -> CoreResult<Vec<Member>> {
            Ok(self.members.read().await.values().cloned().collect())
        }

        async fn create_member(&self, new: NewMember, now: DateTime<Utc>) -> CoreResult<Member> {
            let mut members = self.members.write().await;
            if members.values().any(|m| m.id_number == new.id_number) {
                return Err(CoreError::duplicate_key("id_number"));
            }
            let member = Member::new(MemberId::new_v7(), new.name, new.id_number, new.address, now);
            members.insert(member.id, member.clone());
            Ok(member)
        }

        async fn update_member(&self, id: MemberId, new: NewMember) -> CoreResult<Member> {
            let mut members = self.members.write().await;
            if members
                .values()
                .any(|m| m.id_number == new.id_number && m.id != id)
            {
                return Err(CoreError::duplicate_key("id_number"));
            }
            let member = members
                .get_mut(&id)
                .ok_or_else(|| CoreError::not_found("Member", id))?;
            member.name = new.name;
            member.id_number = new.id_number;
            member.address = new.address;
            Ok(member.clone())
        }

        async fn delete_member(&self, id: MemberId) -> CoreResult<()> {
            let mut members = self.members.write().await;
            if members.remove(&id).is_none() {
                return Err(CoreError::not_found("Member", id));
            }
            // Cascade: a member's dependants go with them.
            self.dependants
                .write()
                .await
                .retain(|_, d| d.member_id != id);
            Ok(())
        }

        async fn list_dependants(&self) -> CoreResult<Vec<Dependant>> {
            Ok(self.dependants.read().await.values().cloned().collect())
        }

        async fn create_dependant(
            &self,
            new: NewDependant,
            now: DateTime<Utc>,
        ) -> CoreResult<Dependant> {
            if !self.members.read().await.contains_key(&new.member_id) {
                return Err(CoreError::not_found("Member", new.member_id));
            }
            let dependant = Dependant::new(
                DependantId::new_v7(),
                new.member_id,
                new.name,
                new.date_of_birth,
                now,
            );
            self.dependants
                .write()
                .await
                .insert(dependant.id, dependant.clone());
            Ok(dependant)
        }

        async fn update_dependant(
            &self,
            id: DependantId,
            new: NewDependant,
        ) -> CoreResult<Dependant> {
            let mut dependants = self.dependants.write().await;
            let dependant = dependants
                .get_mut(&id)
                .ok_or_else(|| CoreError::not_found("Dependant", id))?;
            dependant.member_id = new.member_id;
            dependant.name = new.name;
            dependant.date_of_birth = new.date_of_birth;
            Ok(dependant.clone())
        }

        async fn delete_dependant(&self, id: DependantId) -> CoreResult<()> {
            self.dependants
                .write()
                .await
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| CoreError::not_found("Dependant", id))
        }

        async fn list_agents(&self) -> CoreResult<Vec<Agent>> {
            Ok(self.agents.read().await.values().cloned().collect())
        }

        async fn create_agent(&self, new: NewAgent, now: DateTime<Utc>) -> CoreResult<Agent> {
            let mut agents = self.agents.write().await;
            if agents.values().any(|a| a.email == new.email) {
                return Err(CoreError::duplicate_key("email"));
            }
            let agent = Agent::new(AgentId::new_v7(), new.name, new.email, now);
            agents.insert(agent.id, agent.clone());
            Ok(agent)
        }

        async fn delete_agent(&self, id: AgentId) -> CoreResult<()> {
            self.agents
                .write()
                .await
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| CoreError::not_found("Agent", id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockPartyStore;
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_duplicate_id_number_rejected() {
        let store = MockPartyStore::new();
        let new = NewMember {
            name: "Sipho".into(),
            id_number: "8001015009087".into(),
            address: None,
        };
        store.create_member(new.clone(), t0()).await.unwrap();
        let err = store.create_member(new, t0()).await.unwrap_err();
        assert!(matches!(err, CoreError::DuplicateKey { .. }));
    }

    #[tokio::test]
    async fn test_member_delete_cascades_dependants() {
        let store = MockPartyStore::new();
        let member = store
            .create_member(
                NewMember {
                    name: "Sipho".into(),
                    id_number: "8001015009087".into(),
                    address: None,
                },
                t0(),
            )
            .await
            .unwrap();
        store
            .create_dependant(
                NewDependant {
                    member_id: member.id,
                    name: "Lindiwe".into(),
                    date_of_birth: None,
                },
                t0(),
            )
            .await
            .unwrap();

        store.delete_member(member.id).await.unwrap();
        assert!(store.list_dependants().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dependant_requires_existing_member() {
        let store = MockPartyStore::new();
        let err = store
            .create_dependant(
                NewDependant {
                    member_id: MemberId::new(),
                    name: "Lindiwe".into(),
                    date_of_birth: None,
                },
                t0(),
            )
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
