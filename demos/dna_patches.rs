//! Patches of sensors wander over a random DNA sequence; each patch's dendrite
//! learns to fire only when its window shows the sequence it started on.
//!
//! Every `FRAMES_PER_MOVE` frames each patch steps left, right or stays put.
//! Every frame all dendrites run one learning cycle on their current window.
//!
//! Run: cargo run --example dna_patches
//! Set RUST_LOG=debug to see plasticity events.

use dendrite_learning::{Alphabet, DendriteConfig, LearningController, Outcome, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SEQ_LENGTH: usize = 120;
const NUM_PATCHES: usize = 3;
const NUM_SENSORS: usize = 5;
const AXIS_LENGTH: usize = 400;
const FRAMES_PER_MOVE: usize = 30;
const NUM_FRAMES: usize = 30_000;
const REPORT_EVERY: usize = 3_000;

fn main() -> Result<()> {
    env_logger::init();

    let alphabet = Alphabet::dna();
    let mut rng = StdRng::seed_from_u64(2024);

    let sequence: Vec<usize> = (0..SEQ_LENGTH)
        .map(|_| rng.gen_range(0..alphabet.len()))
        .collect();
    println!("Sequence: {}", alphabet.decode(&sequence));

    let mut controller = LearningController::new(alphabet.clone(), DendriteConfig::default())?;

    // One patch per equal slice of the sequence, starting at a random offset
    let slice = SEQ_LENGTH / NUM_PATCHES;
    let mut positions = Vec::with_capacity(NUM_PATCHES);
    for i in 0..NUM_PATCHES {
        let start = i * slice + rng.gen_range(0..slice - NUM_SENSORS);
        let reference = sequence[start..start + NUM_SENSORS].to_vec();
        println!("Patch {}: start {:3}, reference {}", i, start, alphabet.decode(&reference));
        controller.add_patch(reference, AXIS_LENGTH, 100 + i as u64)?;
        positions.push(start);
    }

    let max_pos = SEQ_LENGTH - NUM_SENSORS - 1;
    let mut windows: Vec<Vec<usize>> = positions
        .iter()
        .map(|&p| sequence[p..p + NUM_SENSORS].to_vec())
        .collect();

    for frame in 1..=NUM_FRAMES {
        if frame % FRAMES_PER_MOVE == 0 {
            for (pos, window) in positions.iter_mut().zip(windows.iter_mut()) {
                let step: i64 = rng.gen_range(-1..=1);
                *pos = (*pos as i64 + step).clamp(0, max_pos as i64) as usize;
                window.copy_from_slice(&sequence[*pos..*pos + NUM_SENSORS]);
            }
        }

        let outcomes = controller.step(&windows)?;

        if frame % REPORT_EVERY == 0 {
            let marks: String = outcomes
                .iter()
                .map(|o| match o {
                    Outcome::TruePositive => '+',
                    Outcome::TrueNegative => '.',
                    Outcome::FalseNegative => 'm',
                    Outcome::FalsePositive => 'x',
                })
                .collect();
            println!("frame {:6}: [{}]", frame, marks);
        }
    }

    println!();
    for id in controller.patch_ids() {
        let counts = controller.counts(id)?;
        let d = controller.dendrite(id)?;
        println!(
            "Patch {}: accuracy {:.3}  tp {:5} fn {:5} tn {:5} fp {:5}  excitation {:.3}",
            id.index(),
            counts.accuracy(),
            counts.true_positives,
            counts.false_negatives,
            counts.true_negatives,
            counts.false_positives,
            d.scalar_excitation(),
        );
    }

    Ok(())
}
