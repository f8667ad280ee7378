use itertools::Itertools;

use crate::{
    core::rates::{Minute, RateTable, Rates},
    quantity::rate::KilowattHourRate,
};

/// Merge the incoming rates into the existing ones.
///
/// Slots before `freeze_before_minute` are frozen: an existing value always wins,
/// and the incoming value only fills a gap. Slots from `freeze_before_minute` onwards
/// are live and take whatever the incoming rates say, including nothing at all.
pub fn merge(existing: &Rates, incoming: &Rates, freeze_before_minute: Minute) -> Rates {
    let minutes = [&existing.import, &existing.export, &incoming.import, &incoming.export]
        .into_iter()
        .map(RateTable::keys)
        .kmerge()
        .dedup()
        .copied()
        .collect_vec();
    let merge_table = |existing: &RateTable, incoming: &RateTable| -> RateTable {
        minutes
            .iter()
            .filter_map(|&minute| {
                resolve(minute, freeze_before_minute, existing, incoming).map(|rate| (minute, rate))
            })
            .collect()
    };
    Rates::new(
        merge_table(&existing.import, &incoming.import),
        merge_table(&existing.export, &incoming.export),
    )
}

fn resolve(
    minute: Minute,
    freeze_before_minute: Minute,
    existing: &RateTable,
    incoming: &RateTable,
) -> Option<KilowattHourRate> {
    if minute < freeze_before_minute {
        existing.get(&minute).or_else(|| incoming.get(&minute)).copied()
    } else {
        incoming.get(&minute).copied()
    }
}
