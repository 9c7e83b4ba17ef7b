use std::{sync::Arc, thread};

use rubric_verifiers::{Catalog, LoopbackJudge, VerifierKind};
use serde_json::{json, Map, Value};

const SAMPLES: &[&str] = &[
    "",
    "   \n\n  ",
    "An old silent pond\nA frog jumps into the pond—\nSplash! Silence again.",
    "There once was a fellow named Lee\nWho was stung on the arm by a bee\n   When asked, \"Does it hurt?\"\n   \"No, it doesn't,\" he spurt\nIt’s a good thing it wasn’t a flea.\n",
    "<think>plan</think>\n<answer>4</answer>",
    "<think>a</think><answer>b</answer><verifier_think>c</verifier_think><verifier_answer>4</verifier_answer>",
    "The answer is \\boxed{42}.",
    ".... . .-.. .-.. ---",
    "one",
    "Ünïcödé ✓ 🙂 line\nsecond line",
];

fn params_for(kind: VerifierKind) -> Map<String, Value> {
    let value = match kind {
        VerifierKind::VerifierAnswer | VerifierKind::BoxedAnswer => json!({"gold_solution": "42"}),
        VerifierKind::Satisfaction => json!({"question": "2+2?", "gold_answer": "4"}),
        VerifierKind::MorseCode => json!({"original_text": "HELLO"}),
        _ => json!({}),
    };
    value.as_object().cloned().unwrap()
}

fn catalog() -> Catalog {
    Catalog::default().with_judge(Arc::new(LoopbackJudge::new(
        json!({"score": 0.8, "feedback": "fine"}),
    )))
}

#[test]
fn scores_stay_in_unit_interval_and_agree_with_feedback() {
    let catalog = catalog();
    for kind in VerifierKind::ALL {
        let params = params_for(kind);
        for sample in SAMPLES {
            let detailed = catalog.score_with_feedback(kind, sample, &params);
            assert!(
                (0.0..=1.0).contains(&detailed.score),
                "{kind} scored {} on {sample:?}",
                detailed.score
            );
            assert!(!detailed.feedback.is_empty(), "{kind} gave no feedback on {sample:?}");
            assert_eq!(catalog.score(kind, sample, &params), detailed.score);
        }
    }
}

#[test]
fn scoring_is_deterministic() {
    let catalog = catalog();
    for kind in VerifierKind::ALL {
        let params = params_for(kind);
        for sample in SAMPLES {
            assert_eq!(
                catalog.score_with_feedback(kind, sample, &params),
                catalog.score_with_feedback(kind, sample, &params)
            );
        }
    }
}

#[test]
fn concurrent_scoring_matches_sequential() {
    let catalog = catalog();
    let expected: Vec<_> = VerifierKind::ALL
        .into_iter()
        .map(|kind| catalog.score_with_feedback(kind, SAMPLES[3], &params_for(kind)))
        .collect();
    let observed: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = VerifierKind::ALL
            .into_iter()
            .map(|kind| {
                let catalog = &catalog;
                scope.spawn(move || {
                    catalog.score_with_feedback(kind, SAMPLES[3], &params_for(kind))
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(observed, expected);
}

#[test]
fn every_descriptor_declares_its_defaults() {
    let catalog = Catalog::default();
    for descriptor in catalog.describe_all() {
        assert!(!descriptor.description.is_empty(), "{}", descriptor.name);
        let rendered = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(rendered["name"], json!(descriptor.name));
    }
    let haiku = catalog.describe(VerifierKind::Haiku);
    assert_eq!(haiku.parameters["tolerance"].default, Some(json!(1)));
}

#[test]
fn limerick_and_haiku_fixtures_pass() {
    let catalog = Catalog::default();
    assert_eq!(catalog.score(VerifierKind::Haiku, SAMPLES[2], &Map::new()), 1.0);
    assert_eq!(catalog.score(VerifierKind::Limerick, SAMPLES[3], &Map::new()), 1.0);
    assert_eq!(
        catalog.score(VerifierKind::MorseCode, SAMPLES[7], &params_for(VerifierKind::MorseCode)),
        1.0
    );
}
