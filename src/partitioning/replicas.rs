//! Replica selection over the member-name hash space.
//!
//! Replica candidates are chosen on a second, smaller ring built from
//! `hash(member.name)` only, independent of virtual nodes. The partition
//! owner is located on that ring and the walk continues clockwise until
//! enough distinct members are collected.

use crate::error::{Error, Result};
use crate::partitioning::hasher::KeyHasher;
use crate::types::Member;

/// Pick `count` distinct members starting at `owner`.
///
/// The owner, when given and present in `members`, is always first. Without
/// an owner the walk starts at the smallest name hash.
pub(crate) fn closest_n<'a, I>(
    hasher: &dyn KeyHasher,
    members: I,
    owner: Option<&Member>,
    count: usize,
) -> Result<Vec<Member>>
where
    I: IntoIterator<Item = &'a Member>,
{
    let mut ring: Vec<(u64, &Member)> = members
        .into_iter()
        .map(|member| (hasher.hash(member.name().as_bytes()), member))
        .collect();

    if count > ring.len() {
        return Err(Error::InsufficientMemberCount {
            requested: count,
            available: ring.len(),
        });
    }

    // Ties on the hash fall back to the name so the order stays total.
    ring.sort_unstable_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));

    let start = owner
        .and_then(|owner| ring.iter().position(|(_, member)| *member == owner))
        .unwrap_or(0);

    Ok(ring
        .iter()
        .cycle()
        .skip(start)
        .take(count)
        .map(|(_, member)| (*member).clone())
        .collect())
}
