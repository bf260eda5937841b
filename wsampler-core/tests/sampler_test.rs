//! Integration tests for the weighted sampler lifecycle.
//!
//! Tests:
//! 1. Concrete draw scenarios (A/B/C quota, clamped X/Y)
//! 2. Refresh contract: idempotence, structural change, staleness
//! 3. Manual mode
//! 4. Shared population handles mutated outside the sampler

use std::cell::RefCell;
use std::rc::Rc;
use wsampler_core::{
    choose_weighted_index, FixedSequence, SamplerError, SamplerState, SeedTree, WeightedSampler,
};

#[derive(Debug, Clone, PartialEq)]
struct Loot {
    name: String,
    weight: f64,
}

fn loot(name: &str, weight: f64) -> Loot {
    Loot {
        name: name.to_string(),
        weight,
    }
}

/// Helper: the A/B/C table (1/6, 1/2, 1/3).
fn abc() -> Vec<Loot> {
    vec![loot("A", 200.0), loot("B", 600.0), loot("C", 400.0)]
}

fn count_by_name(names: &[String], name: &str) -> usize {
    names.iter().filter(|n| n.as_str() == name).count()
}

// ── 1. Scenarios ─────────────────────────────────────────────────────

#[test]
fn abc_quota_over_12000_fixed_draws() {
    let rng = FixedSequence::stratified(12_000).unwrap();
    let mut sampler = WeightedSampler::with_rng(abc(), |l: &Loot| l.weight, rng).unwrap();
    assert_eq!(sampler.weight_sum(), 1200.0);

    let names: Vec<String> = (0..12_000)
        .map(|_| sampler.sample_with(|l| l.name.clone()).unwrap())
        .collect();

    assert_eq!(count_by_name(&names, "A"), 2000);
    assert_eq!(count_by_name(&names, "B"), 6000);
    assert_eq!(count_by_name(&names, "C"), 4000);
}

#[test]
fn abc_counts_with_seeded_generator_are_close() {
    let rng = SeedTree::new(2024).source_for("abc", 0);
    let mut sampler = WeightedSampler::with_rng(abc(), |l: &Loot| l.weight, rng).unwrap();
    let counts = sampler.frequencies(12_000).unwrap();

    // ±5 standard deviations of a binomial(12000, p).
    for (count, expected) in counts.iter().zip([2000.0, 6000.0, 4000.0]) {
        let p: f64 = expected / 12_000.0;
        let sd = (12_000.0 * p * (1.0 - p)).sqrt();
        assert!(
            (*count as f64 - expected).abs() < 5.0 * sd,
            "count {count} too far from {expected}"
        );
    }
}

#[test]
fn clamped_negative_weight_is_never_selected() {
    let rng = SeedTree::new(7).source_for("xy", 0);
    let mut sampler =
        WeightedSampler::with_rng(vec![loot("X", -5.0), loot("Y", 10.0)], |l: &Loot| l.weight, rng).unwrap();

    assert_eq!(sampler.weights(), &[0.0, 10.0]);
    assert_eq!(sampler.weight_sum(), 10.0);
    for _ in 0..1_000 {
        assert_eq!(sampler.sample_index().unwrap(), 1);
    }
}

#[test]
fn zero_total_weight_always_selects_last() {
    let rng = SeedTree::new(7).source_for("zero", 0);
    let mut sampler = WeightedSampler::with_rng(vec![0.0, -1.0, 0.0, 0.0, 0.0], |w: &f64| *w, rng).unwrap();
    assert_eq!(sampler.weight_sum(), 0.0);
    for _ in 0..500 {
        assert_eq!(sampler.sample_index().unwrap(), 4);
    }
}

// ── 2. Refresh contract ──────────────────────────────────────────────

#[test]
fn refresh_twice_is_identical() {
    let mut sampler = WeightedSampler::new(abc(), |l: &Loot| l.weight * 0.1).unwrap();
    sampler.refresh_weights().unwrap();
    let weights = sampler.weights().to_vec();
    let sum = sampler.weight_sum();

    sampler.refresh_weights().unwrap();
    assert_eq!(sampler.weights(), weights.as_slice());
    assert_eq!(sampler.weight_sum(), sum);
}

#[test]
fn refresh_after_append_includes_new_weight() {
    let mut sampler = WeightedSampler::new(abc(), |l: &Loot| l.weight).unwrap();
    sampler.source_mut().push(loot("D", 800.0));

    // Not refreshed yet: the snapshot still describes three elements.
    assert_eq!(sampler.state(), SamplerState::Stale);
    assert_eq!(sampler.len(), 3);

    sampler.refresh_weights().unwrap();
    assert_eq!(sampler.len(), sampler.source().len());
    assert_eq!(sampler.weight_sum(), 2000.0);
    assert_eq!(sampler.weights()[3], 800.0);
}

#[test]
fn in_place_edit_needs_refresh_to_take_effect() {
    let rng = FixedSequence::new(vec![0.1]).unwrap();
    let mut sampler = WeightedSampler::with_rng(abc(), |l: &Loot| l.weight, rng).unwrap();
    sampler.source_mut()[0].weight = 0.0;

    // Same length, so the sampler cannot tell; the old snapshot still wins.
    assert_eq!(sampler.state(), SamplerState::Ready);
    assert_eq!(sampler.sample().unwrap().name, "A");

    sampler.refresh_weights().unwrap();
    assert_eq!(sampler.sample().unwrap().name, "B");
}

#[test]
fn refresh_after_clear_leaves_empty_snapshot() {
    let mut sampler = WeightedSampler::new(abc(), |l: &Loot| l.weight).unwrap();
    sampler.source_mut().clear();
    sampler.refresh_weights().unwrap();

    assert!(sampler.is_empty());
    assert_eq!(sampler.weight_sum(), 0.0);
    assert!(matches!(
        sampler.sample_index(),
        Err(SamplerError::InvalidOperation(_))
    ));
}

// ── 3. Manual mode ───────────────────────────────────────────────────

#[test]
fn manual_mode_refresh_fails() {
    let mut sampler = WeightedSampler::manual(abc());
    assert!(matches!(
        sampler.refresh_weights(),
        Err(SamplerError::InvalidArgument(_))
    ));
}

#[test]
fn manual_mode_zero_snapshot_follows_fallback() {
    let mut sampler = WeightedSampler::manual(abc());
    for _ in 0..20 {
        assert_eq!(sampler.sample_index().unwrap(), 2);
    }
}

#[test]
fn manual_mode_caller_resizes_after_growth() {
    let rng = FixedSequence::new(vec![0.9]).unwrap();
    let mut sampler = WeightedSampler::manual_with_rng(abc(), rng);
    sampler.source_mut().push(loot("D", 1.0));
    assert!(sampler.is_stale());

    sampler.assign_weights(vec![1.0, 1.0, 1.0, 7.0]).unwrap();
    assert!(!sampler.is_stale());
    assert_eq!(sampler.sample().unwrap().name, "D");
}

// ── 4. Shared handles ────────────────────────────────────────────────

#[test]
fn shared_population_mutated_by_caller() {
    let shared = Rc::new(RefCell::new(abc()));
    let rng = FixedSequence::new(vec![0.95]).unwrap();
    let mut sampler = WeightedSampler::with_rng(Rc::clone(&shared), |l: &Loot| l.weight, rng).unwrap();

    shared.borrow_mut().pop();
    assert!(sampler.is_stale());
    let err = sampler.sample().unwrap_err();
    assert_eq!(err, SamplerError::IndexOutOfRange { index: 2, len: 2 });

    sampler.refresh_weights().unwrap();
    assert_eq!(sampler.weight_sum(), 800.0);
    assert_eq!(sampler.sample().unwrap().name, "B");
}

#[test]
fn single_call_variant_agrees_with_snapshot_sampler() {
    let items = abc();
    let mut a = FixedSequence::stratified(120).unwrap();
    let mut b = FixedSequence::stratified(120).unwrap();
    let mut sampler = WeightedSampler::with_rng(&items, |l: &Loot| l.weight, &mut b).unwrap();

    for _ in 0..120 {
        let direct = choose_weighted_index(&items, |l: &Loot| l.weight, &mut a).unwrap();
        assert_eq!(direct, sampler.sample_index().unwrap());
    }
}
