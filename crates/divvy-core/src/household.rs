//! Household membership and data scoping
//!
//! Every read and write is scoped: members of a household see the
//! household's shared data, everyone else sees only records they created.
//! Scope resolution goes through the `Membership` index so it is a single
//! equality lookup rather than a scan over every household's member list.

use serde_json::{json, Value};
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::models::Household;
use crate::store::{EntityStore, StoreClient};

/// Data visibility scope for a user
///
/// Carried through every store read/write; see `filter_fields` for the
/// equality fields each variant matches on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Shared scope: all records tagged with this household ID
    Household(String),
    /// Solo scope: records created by this email with no household
    Personal(String),
}

impl Scope {
    /// Equality fields for a hosted-store filter call
    pub fn filter_fields(&self) -> Value {
        match self {
            Scope::Household(id) => json!({ "household_id": id }),
            Scope::Personal(email) => json!({ "created_by": email, "household_id": null }),
        }
    }

    /// Household ID to stamp onto new records in this scope
    pub fn household_id(&self) -> Option<String> {
        match self {
            Scope::Household(id) => Some(id.clone()),
            Scope::Personal(_) => None,
        }
    }
}

/// Resolve a user's scope through the membership index
///
/// No index record means personal scope. More than one record is a data
/// error: silently picking one would show the user a household chosen by
/// record ordering.
pub async fn resolve_scope(store: &StoreClient, email: &str) -> Result<Scope> {
    let memberships = store.memberships_for(email).await?;
    match memberships.as_slice() {
        [] => Ok(Scope::Personal(email.to_string())),
        [m] => Ok(Scope::Household(m.household_id.clone())),
        many => Err(Error::InvalidData(format!(
            "{} has {} membership records; expected at most one",
            email,
            many.len()
        ))),
    }
}

/// Find the household a user belongs to, if any
pub async fn household_for(store: &StoreClient, email: &str) -> Result<Option<Household>> {
    match resolve_scope(store, email).await? {
        Scope::Personal(_) => Ok(None),
        Scope::Household(id) => {
            let households = store.list_households().await?;
            households
                .into_iter()
                .find(|h| h.id == id)
                .map(Some)
                .ok_or_else(|| {
                    Error::InvalidData(format!(
                        "membership index points at missing household {}",
                        id
                    ))
                })
        }
    }
}

/// Create a household with the creator as owner and sole member
pub async fn create_household(
    store: &StoreClient,
    name: &str,
    creator_email: &str,
) -> Result<Household> {
    if let Scope::Household(id) = resolve_scope(store, creator_email).await? {
        return Err(Error::InvalidData(format!(
            "{} already belongs to household {}",
            creator_email, id
        )));
    }
    let household = store.create_household(name, creator_email).await?;
    store
        .create_membership(creator_email, &household.id)
        .await?;
    info!(household = %household.id, "created household");
    Ok(household)
}

/// Add a member to a household
///
/// The new member must not already belong to a household (including this
/// one); membership is exclusive.
pub async fn add_member(
    store: &StoreClient,
    household: &Household,
    email: &str,
) -> Result<Household> {
    if let Scope::Household(id) = resolve_scope(store, email).await? {
        return Err(Error::InvalidData(format!(
            "{} already belongs to household {}",
            email, id
        )));
    }
    let mut members = household.member_emails.clone();
    members.push(email.to_string());
    let updated = store
        .update_household_members(&household.id, &members)
        .await?;
    store.create_membership(email, &household.id).await?;
    Ok(updated)
}

/// Remove a member from a household
///
/// The owner (`created_by`) can never be removed.
pub async fn remove_member(
    store: &StoreClient,
    household: &Household,
    email: &str,
) -> Result<Household> {
    if email == household.created_by {
        return Err(Error::InvalidData(
            "the household owner cannot be removed".to_string(),
        ));
    }
    if !household.member_emails.iter().any(|m| m == email) {
        return Err(Error::NotFound(format!(
            "{} is not a member of {}",
            email, household.name
        )));
    }
    let members: Vec<String> = household
        .member_emails
        .iter()
        .filter(|m| m.as_str() != email)
        .cloned()
        .collect();
    let updated = store
        .update_household_members(&household.id, &members)
        .await?;
    for membership in store.memberships_for(email).await? {
        if membership.household_id == household.id {
            store.delete_membership(&membership.id).await?;
        }
    }
    Ok(updated)
}

/// Backfill the membership index from household member lists
///
/// For stores created before the index existed. Creates one record per
/// (member, household) pair that has none; reports emails that end up
/// indexed into more than one household without touching them.
pub async fn bootstrap_membership_index(store: &StoreClient) -> Result<usize> {
    let households = store.list_households().await?;
    let mut created = 0;
    for household in &households {
        for email in &household.member_emails {
            let existing = store.memberships_for(email).await?;
            if existing.iter().any(|m| m.household_id == household.id) {
                continue;
            }
            if let Some(other) = existing.first() {
                warn!(
                    email = %email,
                    household = %household.id,
                    conflicting = %other.household_id,
                    "member listed in multiple households; index not updated"
                );
                continue;
            }
            store.create_membership(email, &household.id).await?;
            created += 1;
        }
    }
    info!(created, "membership index bootstrap complete");
    Ok(created)
}
