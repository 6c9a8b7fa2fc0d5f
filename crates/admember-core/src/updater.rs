//! Group membership flow
//!
//! Bind, resolve the group, resolve the user, then add the user to the
//! group's `member` attribute unless it is already there. Each stage either
//! hands its result to the next or ends the run with an error; nothing is
//! retried.

use crate::config::MemberConfig;
use crate::directory::{
    group_filter, user_filter, Directory, GroupRecord, MembershipChange, UserRecord, DN_ATTR,
    MEMBER_ATTR,
};
use crate::error::{Error, Result};
use tracing::{debug, info, warn};

/// Successful end states of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The user DN was already listed; nothing was written
    AlreadyMember,
    /// One additive modify was applied
    Added,
}

/// Stage notifications emitted while a run advances
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    Bound,
    GroupResolved(GroupRecord),
    UserResolved(UserRecord),
}

/// Run the whole flow against `directory`
pub async fn run<D, F>(directory: &mut D, config: &MemberConfig, mut observe: F) -> Result<Outcome>
where
    D: Directory + ?Sized,
    F: FnMut(&Progress),
{
    connect(directory, config).await?;
    observe(&Progress::Bound);

    let base = config.search_base();

    let group = resolve_group(directory, &base, &config.group).await?;
    observe(&Progress::GroupResolved(group.clone()));

    let user = resolve_user(directory, &base, &config.target_user).await?;
    observe(&Progress::UserResolved(user.clone()));

    ensure_member(directory, &group, &user).await
}

/// Bind with the configured principal and credential
pub async fn connect<D>(directory: &mut D, config: &MemberConfig) -> Result<()>
where
    D: Directory + ?Sized,
{
    let principal = config.bind_principal();
    debug!(
        "Binding as {} using {}",
        principal,
        config.credential.method()
    );

    directory.bind(&principal, &config.credential).await?;

    info!("Bound to {} as {}", config.domain, principal);
    Ok(())
}

/// Find the group by common name and read its members
pub async fn resolve_group<D>(directory: &mut D, base: &str, name: &str) -> Result<GroupRecord>
where
    D: Directory + ?Sized,
{
    let filter = group_filter(name);
    debug!("Searching group under {} with filter: {}", base, filter);

    let entries = directory.search(base, &filter, &[MEMBER_ATTR]).await?;
    if entries.len() > 1 {
        warn!(
            "{} entries match group {}, using the first",
            entries.len(),
            name
        );
    }

    let entry = entries
        .into_iter()
        .next()
        .ok_or_else(|| Error::GroupNotFound(name.to_string()))?;
    let group = GroupRecord::from_entry(entry);

    info!("Found group {} with {} members", group.dn, group.members.len());
    Ok(group)
}

/// Find the user by account name
pub async fn resolve_user<D>(directory: &mut D, base: &str, name: &str) -> Result<UserRecord>
where
    D: Directory + ?Sized,
{
    let filter = user_filter(name);
    debug!("Searching user under {} with filter: {}", base, filter);

    let entries = directory.search(base, &filter, &[DN_ATTR]).await?;
    if entries.len() > 1 {
        warn!(
            "{} entries match user {}, using the first",
            entries.len(),
            name
        );
    }

    let entry = entries
        .into_iter()
        .next()
        .ok_or_else(|| Error::UserNotFound(name.to_string()))?;
    let user = UserRecord::from_entry(entry);

    info!("Found user {}", user.dn);
    Ok(user)
}

/// Add `user` to `group` unless the DN is already listed
pub async fn ensure_member<D>(
    directory: &mut D,
    group: &GroupRecord,
    user: &UserRecord,
) -> Result<Outcome>
where
    D: Directory + ?Sized,
{
    if group.has_member(&user.dn) {
        info!("{} is already a member of {}", user.dn, group.dn);
        return Ok(Outcome::AlreadyMember);
    }

    let change = MembershipChange::add_member(group, user);
    if directory.modify(&change).await? {
        info!("Added {} to {}", user.dn, group.dn);
        Ok(Outcome::Added)
    } else {
        Err(Error::ModifyRejected(group.dn.clone()))
    }
}
