//! Broadcast normalization: turn the messy, inconsistently-shaped broadcast
//! records StatsAPI attaches to a game into a short, deduplicated, ordered
//! list of channel labels for the card.
//!
//! Candidates arrive through two substructures — the flat `broadcasts` list
//! and the nested media epg groups — and are merged into one pool before
//! classification. National channels outrank regionals; both buckets are
//! `BTreeSet`s so dedup and the lexicographic tie-break come for free.

use crate::statsapi::{Broadcast, ScheduleGame};
use std::collections::BTreeSet;

/// Hard cap on rendered channel labels. Keeps the card visually stable no
/// matter how many raw candidates a nationally-televised game carries.
const DISPLAY_CAP: usize = 3;

/// Shown when no candidate survives filtering.
const TBD: &str = "TBD";

/// Networks treated as national even when the isNational flag is missing.
const NATIONAL_NETWORKS: [&str; 7] = [
    "ESPN",
    "FOX",
    "FS1",
    "TBS",
    "Apple TV+",
    "Peacock",
    "MLB Network",
];

/// The league's direct-to-consumer streaming brand. Excluded outright: every
/// game is on it, so listing it tells the viewer nothing.
const STREAMING_BRAND: &str = "MLB.TV";
const STREAMING_CALL_TYPE: &str = "MLBTV";

const FANDUEL_FULL: &str = "FanDuel Sports Network";
const FANDUEL_SHORT: &str = "FanDuel";

/// Derive the display list of channel labels for one game.
///
/// Always returns at least one entry; malformed or partial candidates are
/// skipped, never an error. Classification order per candidate: radio and
/// streaming-brand exclusions, then the FanDuel special case, then the
/// national flag/name-list check, then the regional fallback.
pub fn normalize_broadcasts(game: &ScheduleGame) -> Vec<String> {
    let pool = candidate_pool(game);
    if pool.is_empty() {
        return vec![TBD.to_owned()];
    }

    let mut national = BTreeSet::new();
    let mut regional = BTreeSet::new();
    for broadcast in pool {
        classify(broadcast, &mut national, &mut regional);
    }

    let mut display: Vec<String> = national.into_iter().take(DISPLAY_CAP).collect();
    let remaining = DISPLAY_CAP.saturating_sub(display.len());
    display.extend(regional.into_iter().take(remaining));

    if display.is_empty() {
        vec![TBD.to_owned()]
    } else {
        display
    }
}

/// Merge the flat broadcast list with the items of TV-flavored epg groups.
/// Pool order is irrelevant — classification is set-based.
fn candidate_pool(game: &ScheduleGame) -> Vec<&Broadcast> {
    let mut pool: Vec<&Broadcast> = game.broadcasts.iter().flatten().collect();

    let epg = game
        .content
        .as_ref()
        .and_then(|c| c.media.as_ref())
        .and_then(|m| m.epg.as_ref());
    for group in epg.into_iter().flatten() {
        let title = group.title.as_deref().unwrap_or("").to_uppercase();
        if title == "MLBTV" || title == "TV" {
            pool.extend(group.items.iter().flatten());
        }
    }
    pool
}

fn classify(
    broadcast: &Broadcast,
    national: &mut BTreeSet<String>,
    regional: &mut BTreeSet<String>,
) {
    let call_type = broadcast
        .call_type
        .as_deref()
        .unwrap_or("")
        .to_uppercase();
    if call_type == "AM" || call_type == "FM" {
        return;
    }

    let name = broadcast
        .name
        .as_deref()
        .or(broadcast.description.as_deref())
        .unwrap_or("");
    if name.contains(STREAMING_BRAND) || call_type == STREAMING_CALL_TYPE {
        return;
    }

    let is_national = broadcast.is_national.unwrap_or(false);

    if name.contains(FANDUEL_FULL) {
        let label = shorten_fanduel(name);
        if is_national {
            national.insert(label);
        } else {
            regional.insert(label);
        }
        return;
    }

    if is_national || NATIONAL_NETWORKS.contains(&name) {
        if !name.is_empty() {
            national.insert(name.to_owned());
        }
        return;
    }

    let looks_like_tv = call_type == "TV" || (call_type.is_empty() && !name.is_empty());
    if looks_like_tv || !name.is_empty() {
        // Regional network names are long marketing strings; a compact call
        // sign is more recognizable on a 20px line.
        let call_sign = broadcast.call_sign.as_deref().unwrap_or("");
        if !call_sign.is_empty()
            && !name.contains(call_sign)
            && call_sign.len() > 2
            && call_sign.len() < 7
        {
            regional.insert(call_sign.to_owned());
        } else if !name.is_empty() {
            regional.insert(name.to_owned());
        }
    }
}

/// Shorten the FanDuel marketing string: "FanDuel Sports Network Midwest"
/// becomes "FanDuel Midwest"; the bare network name becomes "FanDuel SN".
fn shorten_fanduel(name: &str) -> String {
    let short = name.replace(FANDUEL_FULL, FANDUEL_SHORT).trim().to_owned();
    if short.is_empty() || short == FANDUEL_SHORT {
        "FanDuel SN".to_owned()
    } else if !short.starts_with("FanDuel ") {
        format!("FanDuel {short}")
    } else {
        short
    }
}
