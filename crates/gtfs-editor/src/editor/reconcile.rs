//! Pattern stop reconciliation.
//!
//! When a pattern's stop list is edited, every trip on the pattern keeps
//! one stop time per pattern stop. Only single-change edits can be mapped
//! onto existing trips deterministically, so the stop list may gain one
//! stop, lose one stop, or swap one stop for another per edit. Anything
//! larger is rejected before any trip is touched.

use gtfs_editor_core::{PatternId, PatternStop, StopTime, Trip, TripPattern};
use gtfs_editor_storage::backends::RedbTransaction;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::transaction::FeedTransaction;

use super::Editor;

/// How a new stop list relates to the old one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopSequenceEdit {
    /// The stop ID sequence is unchanged. Per-stop fields such as dwell
    /// times may still differ.
    Unchanged,
    /// One stop was inserted at the given position.
    Insertion(usize),
    /// The stop at the given position was removed.
    Removal(usize),
    /// The stop at the given position was replaced by a different stop.
    Substitution(usize),
}

/// Classify the edit turning `old` into `new`, comparing stop IDs only.
///
/// When the same sequence admits several positions for an edit (a run of
/// equal stops), the first index where the sequences diverge is reported.
///
/// # Errors
///
/// Returns [`Error::UnsupportedEdit`] if the lists differ by more than
/// one insertion, one removal, or one substitution.
pub fn classify_stop_edit(
    old: &[PatternStop],
    new: &[PatternStop],
) -> Result<StopSequenceEdit> {
    let old_ids: Vec<&str> = old.iter().map(|s| s.stop_id.as_str()).collect();
    let new_ids: Vec<&str> = new.iter().map(|s| s.stop_id.as_str()).collect();

    if old_ids == new_ids {
        return Ok(StopSequenceEdit::Unchanged);
    }

    let prefix = old_ids.iter().zip(&new_ids).take_while(|(a, b)| a == b).count();

    match new_ids.len() as isize - old_ids.len() as isize {
        1 => {
            // One stop inserted at the end of the common prefix.
            if old_ids[prefix..] == new_ids[prefix + 1..] {
                Ok(StopSequenceEdit::Insertion(prefix))
            } else {
                Err(Error::UnsupportedEdit(
                    "stop list grew by one, but the surrounding stops changed too".to_string(),
                ))
            }
        }
        -1 => {
            if old_ids[prefix + 1..] == new_ids[prefix..] {
                Ok(StopSequenceEdit::Removal(prefix))
            } else {
                Err(Error::UnsupportedEdit(
                    "stop list shrank by one, but the surrounding stops changed too".to_string(),
                ))
            }
        }
        0 => {
            if old_ids[prefix + 1..] == new_ids[prefix + 1..] {
                Ok(StopSequenceEdit::Substitution(prefix))
            } else {
                Err(Error::UnsupportedEdit(
                    "more than one stop differs; apply the changes one at a time".to_string(),
                ))
            }
        }
        _ => Err(Error::UnsupportedEdit(format!(
            "stop list length changed from {} to {}; apply the changes one at a time",
            old_ids.len(),
            new_ids.len()
        ))),
    }
}

/// Apply a classified edit to one trip's stop times, in place.
fn patch_stop_times(trip: &mut Trip, edit: StopSequenceEdit, new_stops: &[PatternStop]) {
    match edit {
        StopSequenceEdit::Unchanged => {}
        StopSequenceEdit::Insertion(at) => {
            // Seed the inserted entry's times from a neighbor so the trip
            // stays monotone: the preceding entry, or for a head insertion
            // the entry being displaced.
            let seed = if at == 0 { trip.stop_times.first() } else { trip.stop_times.get(at - 1) };
            let mut entry = StopTime::new(new_stops[at].stop_id.clone());
            if let Some(seed) = seed {
                entry.arrival_secs = seed.arrival_secs;
                entry.departure_secs = seed.departure_secs;
            }
            entry.interpolated = true;
            trip.stop_times.insert(at, entry);
        }
        StopSequenceEdit::Removal(at) => {
            trip.stop_times.remove(at);
        }
        StopSequenceEdit::Substitution(at) => {
            // Only the stop reference changes; timings are kept.
            trip.stop_times[at].stop_id = new_stops[at].stop_id.clone();
        }
    }
}

/// Map the stop-list edit `pattern.stops -> new_stops` onto every trip of
/// the pattern. Returns the classified edit and the number of trips
/// patched.
///
/// # Errors
///
/// Returns [`Error::UnsupportedEdit`] for multi-change edits and
/// [`Error::Validation`] if a trip's stop-time count disagrees with the
/// pattern's current stop list (a corrupt feed).
pub(crate) fn reconcile_pattern_stops(
    tx: &mut FeedTransaction<RedbTransaction>,
    pattern: &TripPattern,
    new_stops: &[PatternStop],
) -> Result<(StopSequenceEdit, usize)> {
    let edit = classify_stop_edit(&pattern.stops, new_stops)?;
    if edit == StopSequenceEdit::Unchanged {
        return Ok((edit, 0));
    }

    // Scan the trip map rather than the by-route index: a trip's route may
    // differ from the pattern's after the pattern moved to another route.
    let mut patched = 0usize;
    for mut trip in tx.trips()? {
        if trip.pattern_id != pattern.id {
            continue;
        }
        if trip.stop_times.len() != pattern.stops.len() {
            return Err(Error::Validation(format!(
                "trip {} has {} stop times for a pattern with {} stops",
                trip.id,
                trip.stop_times.len(),
                pattern.stops.len()
            )));
        }
        patch_stop_times(&mut trip, edit, new_stops);
        tx.put_trip(&trip)?;
        patched += 1;
    }
    Ok((edit, patched))
}

/// Delete the pattern's trips that were generated under its previous
/// service modality. Returns the number of trips purged.
///
/// Trips whose own `use_frequency` flag equals the pattern's current
/// (old) value cannot be represented once the pattern flips to
/// `new_use_frequency`; trips already carrying the new value are kept. A
/// no-op when the flag is unchanged.
pub(crate) fn purge_stale_frequency_trips(
    tx: &mut FeedTransaction<RedbTransaction>,
    pattern: &TripPattern,
    new_use_frequency: bool,
) -> Result<usize> {
    if pattern.use_frequency == new_use_frequency {
        return Ok(0);
    }

    let stale_value = pattern.use_frequency;
    let mut purged = 0usize;
    for trip in tx.trips()? {
        if trip.pattern_id == pattern.id && trip.use_frequency == stale_value {
            tx.remove_record::<Trip>(trip.id.as_str())?;
            tx.unindex_trip(trip.route_id.as_str(), trip.id.as_str())?;
            debug!(pattern = %pattern.id, trip = %trip.id, "purged trip left behind by modality change");
            purged += 1;
        }
    }
    Ok(purged)
}

impl Editor<'_> {
    /// Replace a pattern's stop list, reconciling the pattern's trips.
    ///
    /// The edit must be a single insertion, removal, or substitution.
    /// Every trip on the pattern is patched accordingly in the same
    /// transaction: an inserted stop gains a stop time seeded from its
    /// neighbor and marked interpolated, a removed stop loses its entry,
    /// and a substituted stop keeps its timings under the new stop
    /// reference. The stops' `shape_dist_traveled` values are recomputed
    /// after every edit, including dwell- or location-only changes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the pattern does not exist and
    /// [`Error::UnsupportedEdit`] if the edit cannot be mapped onto
    /// existing trips. Rejected edits leave patterns and trips untouched.
    pub fn update_pattern_stops(
        &self,
        id: &PatternId,
        new_stops: Vec<PatternStop>,
    ) -> Result<TripPattern> {
        let (pattern, edit, patched) = self.with_tx(|tx| {
            let mut pattern: TripPattern = tx
                .get_pattern(id.as_str())?
                .ok_or_else(|| Error::NotFound { kind: "trip pattern", id: id.to_string() })?;

            let (edit, patched) = reconcile_pattern_stops(tx, &pattern, &new_stops)?;

            pattern.stops = new_stops;
            pattern.recalculate_shape_dist_traveled();
            tx.put_pattern(&pattern)?;
            Ok((pattern, edit, patched))
        })?;

        info!(
            feed = %self.feed(),
            pattern = %id,
            ?edit,
            trips = patched,
            "reconciled pattern stops"
        );
        Ok(pattern)
    }

    /// Switch a pattern between timetabled and frequency-based service.
    ///
    /// Trips whose own modality flag matches the pattern's previous value
    /// are deleted; trips already carrying the new value are kept.
    /// Setting the flag to its current value is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the pattern does not exist.
    pub fn set_pattern_use_frequency(
        &self,
        id: &PatternId,
        use_frequency: bool,
    ) -> Result<TripPattern> {
        self.with_tx(|tx| {
            let mut pattern: TripPattern = tx
                .get_pattern(id.as_str())?
                .ok_or_else(|| Error::NotFound { kind: "trip pattern", id: id.to_string() })?;

            purge_stale_frequency_trips(tx, &pattern, use_frequency)?;
            pattern.use_frequency = use_frequency;
            tx.put_pattern(&pattern)?;
            Ok(pattern)
        })
    }
}
