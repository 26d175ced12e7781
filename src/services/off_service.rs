//! Off-service rotation inference.
//!
//! Non-ED rotation schedules are not reliably available from the calendar
//! source, so presence on the ED calendar is used as a proxy: a resident with
//! at most `threshold` observed shifts starting inside a half-block is taken
//! to be off-service for that entire half-block, and every day of its span is
//! backfilled with a synthetic full-day record. This deliberately overcounts
//! off-service time as full-day busy; that is a documented heuristic limit of
//! the approach, not a defect.
//!
//! The trigger is block-level counting, never gap-length scanning. A resident
//! with large day-to-day gaps but more than `threshold` shifts in the block
//! is not inferred.

use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;
use std::collections::BTreeSet;

use crate::models::{BlockTable, HalfBlock, ShiftRecord, ShiftSource, OFF_SERVICE_CODE};

const OFF_SERVICE_FACILITY: &str = "OS";

fn day_start(tz: Tz, date: NaiveDate) -> Option<chrono::DateTime<Tz>> {
    use chrono::TimeZone;
    NaiveTime::from_hms_opt(0, 0, 0)
        .and_then(|t| tz.from_local_datetime(&date.and_time(t)).earliest())
}

fn day_end(tz: Tz, date: NaiveDate) -> Option<chrono::DateTime<Tz>> {
    use chrono::TimeZone;
    NaiveTime::from_hms_opt(23, 59, 59)
        .and_then(|t| tz.from_local_datetime(&date.and_time(t)).earliest())
}

fn synthesize_days(resident_id: &str, half: &HalfBlock, tz: Tz, out: &mut Vec<ShiftRecord>) {
    for date in half.start.iter_days() {
        if date > half.end {
            break;
        }
        let (Some(start), Some(end)) = (day_start(tz, date), day_end(tz, date)) else {
            log::warn!("skipping off-service day {date}: local midnight does not exist");
            continue;
        };
        out.push(ShiftRecord {
            resident_id: resident_id.to_string(),
            shift_code: OFF_SERVICE_CODE.to_string(),
            start,
            end,
            source: ShiftSource::OffService,
            facility: OFF_SERVICE_FACILITY.to_string(),
        });
    }
}

/// Infer off-service periods for the selected residents over every half-block
/// intersecting the query date range, and synthesize one full-day placeholder
/// record per covered calendar day.
///
/// `observed` must span the full half-block range (fetches are widened to
/// half-block edges) or shift counts would be truncated at the query edges.
pub fn infer_off_service(
    observed: &[ShiftRecord],
    table: &BlockTable,
    residents: &BTreeSet<String>,
    range: (NaiveDate, NaiveDate),
    threshold: usize,
    tz: Tz,
) -> Vec<ShiftRecord> {
    let mut inferred = Vec::new();

    for half in table.halves_intersecting(range.0, range.1) {
        for resident_id in residents {
            let observed_count = observed
                .iter()
                .filter(|r| {
                    r.resident_id == *resident_id
                        && !r.is_off_service()
                        && half.contains(r.start_date())
                })
                .count();

            if observed_count <= threshold {
                log::debug!(
                    "{resident_id} has {observed_count} shifts in block {}; inferring off-service",
                    half.id
                );
                synthesize_days(resident_id, half, tz, &mut inferred);
            }
        }
    }

    inferred
}
