// Personal-best detection, run when a workout session is completed

use std::future::Future;

use tracing::{debug, info};

use crate::database::models::WorkoutSet;
use crate::types::ItemType;

/// Parse a weight kept in string form. Non-numeric and non-finite values are `None`.
pub fn parse_weight(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|w| w.is_finite())
}

/// Whether `candidate` is a personal best against prior completed sets of the
/// same exercise.
///
/// Only historical sets with at least as many reps are comparable. With no
/// comparable set, or none with a parsable weight, the candidate is a PB.
/// Otherwise it must meet or beat the heaviest comparable weight. A candidate
/// without a positive weight never counts.
pub fn is_personal_best(candidate: &WorkoutSet, history: &[WorkoutSet]) -> bool {
    let weight = match parse_weight(&candidate.actual_weight_kg) {
        Some(w) if w > 0.0 => w,
        _ => return false,
    };

    let mut comparable = history
        .iter()
        .filter(|set| set.actual_reps >= candidate.actual_reps)
        .peekable();
    if comparable.peek().is_none() {
        return true;
    }

    let best = comparable
        .filter_map(|set| parse_weight(&set.actual_weight_kg))
        .fold(None, |best: Option<f64>, w| Some(best.map_or(w, |b| b.max(w))));

    match best {
        Some(best) => weight >= best,
        None => true,
    }
}

/// Evaluate every performed EXERCISE set of a just-completed session and
/// flag the personal bests.
///
/// Sets are grouped by exercise; `fetch_history` is called once per exercise
/// and its result is narrowed to completed sets outside `session_id`.
/// `flag` is called for each personal best. Flags are never cleared. The
/// first error from either callback aborts the run and is returned as is.
pub async fn evaluate_and_flag_personal_bests<E, H, HFut, F, FFut>(
    session_id: i64,
    user_id: &str,
    completed_sets: &[WorkoutSet],
    mut fetch_history: H,
    mut flag: F,
) -> Result<(), E>
where
    H: FnMut(i64) -> HFut,
    HFut: Future<Output = Result<Vec<WorkoutSet>, E>>,
    F: FnMut(i64) -> FFut,
    FFut: Future<Output = Result<(), E>>,
{
    let mut groups: Vec<(i64, Vec<&WorkoutSet>)> = Vec::new();
    for set in completed_sets
        .iter()
        .filter(|s| s.item_type == ItemType::Exercise && s.actual_reps > 0)
    {
        match groups.iter_mut().find(|(exercise_id, _)| *exercise_id == set.exercise_id) {
            Some((_, sets)) => sets.push(set),
            None => groups.push((set.exercise_id, vec![set])),
        }
    }

    for (exercise_id, sets) in groups {
        let history: Vec<WorkoutSet> = fetch_history(exercise_id)
            .await?
            .into_iter()
            .filter(|h| h.session_id != session_id && h.is_completed())
            .collect();
        debug!(
            "Checking {} set(s) of exercise {} against {} historical set(s)",
            sets.len(),
            exercise_id,
            history.len()
        );

        for set in sets {
            if is_personal_best(set, &history) {
                flag(set.id).await?;
                info!(
                    "Personal best: user={} exercise={} set={} ({} x {}kg)",
                    user_id, exercise_id, set.id, set.actual_reps, set.actual_weight_kg
                );
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::cell::RefCell;

    fn set(id: i64, session_id: i64, exercise_id: i64, reps: i32, weight: &str) -> WorkoutSet {
        WorkoutSet {
            id,
            session_id,
            user_id: "u1".to_string(),
            exercise_id,
            exercise_name: "Bench Press".to_string(),
            item_type: ItemType::Exercise,
            order_in_session: 1,
            set_number: 1,
            planned_reps: reps,
            planned_weight_kg: weight.to_string(),
            actual_reps: reps,
            actual_weight_kg: weight.to_string(),
            duration_seconds: 0,
            distance_km: "0".to_string(),
            rpe: 0,
            is_personal_best: false,
            notes: String::new(),
            completed_at: Some(Utc::now()),
        }
    }

    #[test]
    fn first_performance_is_a_pb() {
        assert!(is_personal_best(&set(1, 1, 1, 5, "60"), &[]));
    }

    #[test]
    fn tie_counts_as_pb() {
        let history = vec![set(9, 2, 1, 5, "60")];
        assert!(is_personal_best(&set(1, 1, 1, 5, "60"), &history));
    }

    #[test]
    fn lighter_at_same_reps_is_not_a_pb() {
        let history = vec![set(9, 2, 1, 5, "65")];
        assert!(!is_personal_best(&set(1, 1, 1, 5, "60"), &history));
    }

    #[test]
    fn fewer_rep_history_is_not_comparable() {
        let history = vec![set(9, 2, 1, 3, "80")];
        assert!(is_personal_best(&set(1, 1, 1, 8, "50"), &history));
    }

    #[test]
    fn higher_rep_history_is_comparable() {
        let history = vec![set(9, 2, 1, 10, "70")];
        assert!(!is_personal_best(&set(1, 1, 1, 5, "60"), &history));
        assert!(is_personal_best(&set(1, 1, 1, 5, "70"), &history));
    }

    #[test]
    fn zero_or_unparsable_candidate_is_never_a_pb() {
        for weight in ["0", "abc", "", "-5", "NaN"] {
            assert!(!is_personal_best(&set(1, 1, 1, 5, weight), &[]), "weight {:?}", weight);
        }
    }

    #[test]
    fn unparsable_history_weights_are_ignored() {
        let only_garbage = vec![set(9, 2, 1, 5, "heavy")];
        assert!(is_personal_best(&set(1, 1, 1, 5, "40"), &only_garbage));

        let mixed = vec![set(9, 2, 1, 5, "heavy"), set(8, 2, 1, 6, "50")];
        assert!(!is_personal_best(&set(1, 1, 1, 5, "45"), &mixed));
    }

    #[test]
    fn parse_weight_accepts_decimals() {
        assert_eq!(parse_weight("62.5"), Some(62.5));
        assert_eq!(parse_weight(" 40 "), Some(40.0));
        assert_eq!(parse_weight("inf"), None);
    }

    #[tokio::test]
    async fn flags_only_qualifying_performed_exercise_sets() {
        let current = vec![
            set(1, 10, 100, 5, "100"),
            set(2, 10, 100, 5, "90"),
            set(3, 10, 200, 0, "50"),
            WorkoutSet { item_type: ItemType::Cardio, ..set(4, 10, 0, 1, "10") },
        ];
        let history = vec![
            set(50, 7, 100, 5, "95"),
            // same-session rows are ignored even if returned by the fetcher
            set(1, 10, 100, 5, "100"),
            WorkoutSet { completed_at: None, ..set(51, 8, 100, 5, "500") },
        ];

        let fetched = RefCell::new(Vec::new());
        let flagged = RefCell::new(Vec::new());
        let result: Result<(), String> = evaluate_and_flag_personal_bests(
            10,
            "u1",
            &current,
            |exercise_id| {
                fetched.borrow_mut().push(exercise_id);
                let rows = history.clone();
                async move { Ok(rows) }
            },
            |set_id| {
                flagged.borrow_mut().push(set_id);
                async { Ok(()) }
            },
        )
        .await;

        assert!(result.is_ok());
        assert_eq!(*fetched.borrow(), vec![100]);
        assert_eq!(*flagged.borrow(), vec![1]);
    }

    #[tokio::test]
    async fn history_errors_propagate() {
        let current = vec![set(1, 10, 100, 5, "100")];
        let flagged = RefCell::new(Vec::new());
        let result = evaluate_and_flag_personal_bests(
            10,
            "u1",
            &current,
            |_| async { Err::<Vec<WorkoutSet>, _>("store offline".to_string()) },
            |set_id| {
                flagged.borrow_mut().push(set_id);
                async { Ok(()) }
            },
        )
        .await;

        assert_eq!(result, Err("store offline".to_string()));
        assert!(flagged.borrow().is_empty());
    }

    #[tokio::test]
    async fn flag_errors_propagate() {
        let current = vec![set(1, 10, 100, 5, "100")];
        let result = evaluate_and_flag_personal_bests(
            10,
            "u1",
            &current,
            |_| async { Ok(Vec::new()) },
            |_| async { Err("write failed".to_string()) },
        )
        .await;

        assert_eq!(result, Err("write failed".to_string()));
    }
}
