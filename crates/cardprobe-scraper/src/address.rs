//! Candidate address synthesis for the sharded card storage.
//!
//! A card lives at `{host}/vol{volume}/part{part}/{id}/info/ru/card.json`,
//! where `volume` and `part` are prefixes cut from the identifier according
//! to the length-indexed [`ShardRule`] table in [`SourcesConfig`].
//!
//! [`ShardRule`]: cardprobe_core::ShardRule

use cardprobe_core::{ProductId, ShardCutoff, SourcesConfig};

const WHOLE_ID: &[ShardCutoff] = &[ShardCutoff::Whole];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CandidateAddress {
    pub host: String,
    pub path: String,
}

impl CandidateAddress {
    #[must_use]
    pub fn url(&self) -> String {
        format!("{}{}", self.host.trim_end_matches('/'), self.path)
    }
}

/// Cuts the `(volume, part)` shard prefixes from an all-digit identifier.
///
/// An identifier too short for a cutoff uses the whole identifier for that
/// component.
#[must_use]
pub fn shard_prefixes(id: &str, cutoff: ShardCutoff) -> (String, String) {
    match cutoff {
        ShardCutoff::Whole => (id.to_string(), id.to_string()),
        ShardCutoff::Leading { volume, part } => (leading(id, volume), leading(id, part)),
        ShardCutoff::Trim { volume, part } => (trimmed(id, volume), trimmed(id, part)),
    }
}

fn leading(id: &str, digits: usize) -> String {
    if digits == 0 || id.len() <= digits {
        id.to_string()
    } else {
        id[..digits].to_string()
    }
}

fn trimmed(id: &str, digits: usize) -> String {
    if id.len() <= digits {
        id.to_string()
    } else {
        id[..id.len() - digits].to_string()
    }
}

/// Generates the ordered candidate list for `id`.
///
/// Every shard variant for mirror *n* precedes any address on mirror *n+1*;
/// within one mirror, variants keep the order of the matching rule's cutoffs
/// with duplicates removed. Lengths no rule covers use the whole identifier.
#[must_use]
pub fn synthesize(id: &ProductId, sources: &SourcesConfig) -> Vec<CandidateAddress> {
    let cutoffs = sources
        .shard_rule_for(id.len())
        .map_or(WHOLE_ID, |rule| rule.cutoffs.as_slice());

    let mut variants: Vec<(String, String)> = Vec::with_capacity(cutoffs.len());
    for cutoff in cutoffs {
        let prefixes = shard_prefixes(id.as_str(), *cutoff);
        if !variants.contains(&prefixes) {
            variants.push(prefixes);
        }
    }

    sources
        .mirror_hosts
        .iter()
        .flat_map(|host| {
            variants.iter().map(move |(volume, part)| CandidateAddress {
                host: host.clone(),
                path: format!("/vol{volume}/part{part}/{id}/info/ru/card.json"),
            })
        })
        .collect()
}
