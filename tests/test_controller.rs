//! Integration tests for the learning controller.
//!
//! Tests cover:
//! - Expected signal derived from reference equality
//! - Outcome tallies per patch and in total
//! - Independence of patches
//! - A patch whose cycle fails does not stall the others or the step count
//! - Long-run learning: false positives are suppressed, a silent reference
//!   eventually fires

use dendrite_learning::{
    Alphabet, DendriteConfig, DendriteError, LearningController, Outcome, PatchId, Result,
};

fn controller() -> LearningController {
    LearningController::new(Alphabet::dna(), DendriteConfig::default()).unwrap()
}

#[test]
fn test_controller_rejects_invalid_config() {
    let config = DendriteConfig {
        kernel_width: -3.0,
        ..DendriteConfig::default()
    };
    assert!(matches!(
        LearningController::new(Alphabet::dna(), config),
        Err(DendriteError::InvalidConfiguration(_))
    ));
}

#[test]
fn test_expected_from_reference() -> Result<()> {
    let mut c = controller();
    c.add_patch_text("ACGTA", 200, 3)?;

    let outcomes = c.step_text(&["ACGTA"])?;
    assert!(matches!(
        outcomes[0],
        Outcome::TruePositive | Outcome::FalseNegative
    ));

    let outcomes = c.step_text(&["ACGTT"])?;
    assert!(matches!(
        outcomes[0],
        Outcome::TrueNegative | Outcome::FalsePositive
    ));

    Ok(())
}

#[test]
fn test_counts_accumulate() -> Result<()> {
    let mut c = controller();
    let a = c.add_patch_text("GATTA", 120, 1)?;
    let b = c.add_patch_text("CCGTA", 120, 2)?;

    for _ in 0..10 {
        c.step_text(&["GATTA", "CCGTT"])?;
    }

    assert_eq!(c.num_steps(), 10);
    assert_eq!(c.counts(a)?.total(), 10);
    assert_eq!(c.counts(b)?.total(), 10);

    // Patch a always sees its reference, patch b never does
    let ca = c.counts(a)?;
    assert_eq!(ca.true_negatives + ca.false_positives, 0);
    let cb = c.counts(b)?;
    assert_eq!(cb.true_positives + cb.false_negatives, 0);

    assert_eq!(c.total_counts().total(), 20);
    Ok(())
}

#[test]
fn test_patches_are_independent() -> Result<()> {
    // The same patch driven alone or alongside another ends in the same state
    let mut alone = controller();
    let p = alone.add_patch_text("ACGTA", 100, 9)?;

    let mut paired = controller();
    let q = paired.add_patch_text("ACGTA", 100, 9)?;
    paired.add_patch_text("TTTTT", 100, 10)?;

    let windows = ["ACGTA", "ACGTC", "TCGTA", "ACGTA"];
    for w in windows.iter().cycle().take(40) {
        alone.step_text(&[*w])?;
        paired.step_text(&[*w, "TTTTG"])?;
    }

    assert_eq!(alone.dendrite(p)?.weights(), paired.dendrite(q)?.weights());
    assert_eq!(alone.dendrite(p)?.locations(), paired.dendrite(q)?.locations());
    Ok(())
}

#[test]
fn test_step_patch_external_expected() -> Result<()> {
    let mut c = controller();
    let id = c.add_patch(vec![0, 1, 2], 60, 5)?;

    // The reference is ignored when the caller supplies the expected signal
    let outcome = c.step_patch(id, &[3, 3, 3], true)?;
    assert!(matches!(
        outcome,
        Outcome::TruePositive | Outcome::FalseNegative
    ));
    assert_eq!(c.counts(id)?.total(), 1);
    assert_eq!(c.num_steps(), 0);
    Ok(())
}

#[test]
fn test_persistent_false_positive_is_suppressed() -> Result<()> {
    let mut c = controller();
    let id = c.add_patch_text("ACGTA", 200, 17)?;
    let window = c.alphabet().encode("ACGTC")?;

    // Strong weights so the non-matching window fires at first
    {
        let d = c.dendrite_mut(id)?;
        for j in 0..5 {
            for k in 0..4 {
                d.set_weight(j, k, 0.8);
            }
        }
    }

    let first = c.step(&[window.clone()])?;
    assert_eq!(first[0], Outcome::FalsePositive);

    let mut silenced = false;
    for _ in 0..5000 {
        if c.step(&[window.clone()])?[0] == Outcome::TrueNegative {
            silenced = true;
            break;
        }
    }
    assert!(silenced, "dendrite never stopped firing on a non-matching window");

    // Once silent with noise-free input, learning is frozen
    let weights = c.dendrite(id)?.weights();
    let locations = c.dendrite(id)?.locations();
    for _ in 0..10 {
        assert_eq!(c.step(&[window.clone()])?[0], Outcome::TrueNegative);
    }
    assert_eq!(c.dendrite(id)?.weights(), weights);
    assert_eq!(c.dendrite(id)?.locations(), locations);
    Ok(())
}

#[test]
fn test_silent_reference_learns_to_fire() -> Result<()> {
    let mut c = controller();
    let id = c.add_patch_text("GATTA", 200, 23)?;

    {
        let d = c.dendrite_mut(id)?;
        for j in 0..5 {
            for k in 0..4 {
                d.set_weight(j, k, 0.05);
            }
        }
    }

    let mut fired = false;
    for _ in 0..5000 {
        if c.step_text(&["GATTA"])?[0] == Outcome::TruePositive {
            fired = true;
            break;
        }
    }
    assert!(fired, "dendrite never learned to fire on its reference");
    assert!(c.counts(id)?.false_negatives > 0);
    Ok(())
}

fn make_degenerate(c: &mut LearningController, id: PatchId) -> Result<()> {
    // Weak weights keep the dendrite silent on its reference, and a zero
    // weight makes every weight update fail under the default policy
    let d = c.dendrite_mut(id)?;
    for j in 0..5 {
        for k in 0..4 {
            d.set_weight(j, k, 0.05);
        }
    }
    d.set_weight(0, 1, 0.0);
    Ok(())
}

#[test]
fn test_failing_patch_does_not_stall_step() -> Result<()> {
    let mut c = controller();
    let a = c.add_patch_text("ACGTA", 100, 31)?;
    let b = c.add_patch_text("ACGTA", 100, 32)?;
    make_degenerate(&mut c, b)?;
    let weights_b = c.dendrite(b)?.weights();

    c.start_recording();
    for _ in 0..3 {
        assert!(matches!(
            c.step_text(&["ACGTA", "ACGTA"]),
            Err(DendriteError::DegenerateWeight { sensor: 0, detector: 1 })
        ));
    }
    let trace = c.stop_recording().unwrap();

    // The step still counts and records, and the healthy patch keeps learning
    assert_eq!(c.num_steps(), 3);
    assert_eq!(c.counts(a)?.total(), 3);
    assert_eq!(c.counts(b)?.total(), 0);
    assert_eq!(c.dendrite(b)?.weights(), weights_b);

    assert_eq!(trace.steps.len(), 3);
    assert_eq!(trace.steps[2].step_number, 3);
    for step in &trace.steps {
        assert_eq!(step.patches.len(), 2);
        assert_eq!(step.patches[1].outcome, Outcome::FalseNegative);
    }
    Ok(())
}

#[test]
fn test_failing_first_patch_still_steps_rest() -> Result<()> {
    let mut c = controller();
    let a = c.add_patch_text("ACGTA", 100, 41)?;
    let b = c.add_patch_text("GATTA", 100, 42)?;
    make_degenerate(&mut c, a)?;

    for _ in 0..4 {
        assert!(c.step_text(&["ACGTA", "GATTC"]).is_err());
    }

    assert_eq!(c.num_steps(), 4);
    assert_eq!(c.counts(a)?.total(), 0);
    assert_eq!(c.counts(b)?.total(), 4);
    assert_eq!(c.total_counts().total(), 4);
    Ok(())
}
