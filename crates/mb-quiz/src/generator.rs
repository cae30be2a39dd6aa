//! Random multiplication and division problems.
//!
//! Division questions are built backwards from a product so the quotient is
//! always a whole number. Distractors are drawn near the correct answer so
//! that wrong options stay plausible.

use std::ops::RangeInclusive;

use rand::Rng;
use rand::seq::SliceRandom;

use mb_core::{Difficulty, OPTION_COUNT, Problem};

/// Chance that a problem is a multiplication rather than a division.
pub const MULTIPLICATION_CHANCE: f64 = 0.6;

/// Chance that a hard problem re-rolls both operands into [`HARD_REROLL_RANGE`].
pub const HARD_REROLL_CHANCE: f64 = 0.7;

/// Operand range used when a hard problem is re-rolled away from trivial products.
pub const HARD_REROLL_RANGE: RangeInclusive<u32> = 3..=9;

/// Distractors are drawn from `answer - SPREAD ..= answer + SPREAD`.
pub const DISTRACTOR_SPREAD: i64 = 5;

/// Lowest upper bound for the fallback draw used when an offset lands at or below zero.
pub const FALLBACK_CEILING: i64 = 10;

/// Random draws allowed before distractors are filled in sequentially.
pub const MAX_DISTRACTOR_ATTEMPTS: usize = 64;

/// Generate a fresh problem for the given difficulty.
pub fn generate_problem<R: Rng + ?Sized>(difficulty: Difficulty, rng: &mut R) -> Problem {
    let range = difficulty.operand_range();
    let mut a = rng.random_range(range.clone());
    let mut b = rng.random_range(range);

    if difficulty == Difficulty::Hard && rng.random_bool(HARD_REROLL_CHANCE) {
        a = rng.random_range(HARD_REROLL_RANGE);
        b = rng.random_range(HARD_REROLL_RANGE);
    }

    if rng.random_bool(MULTIPLICATION_CHANCE) {
        let options = answer_options(a * b, rng);
        Problem::multiplication(a, b, options)
    } else {
        // Divide by the larger factor when one side is 1, so "5 ÷ 1" becomes "5 ÷ 5".
        if a == 1 && b != 1 {
            std::mem::swap(&mut a, &mut b);
        }
        let options = answer_options(b, rng);
        Problem::division(a, b, options)
    }
}

/// Build the shuffled option set for `answer`: the answer plus three
/// distinct positive distractors.
pub fn answer_options<R: Rng + ?Sized>(answer: u32, rng: &mut R) -> [u32; OPTION_COUNT] {
    let mut options = [answer; OPTION_COUNT];
    let mut filled = 1;
    let mut attempts = 0;

    while filled < OPTION_COUNT && attempts < MAX_DISTRACTOR_ATTEMPTS {
        attempts += 1;
        let offset = rng.random_range(-DISTRACTOR_SPREAD..=DISTRACTOR_SPREAD);
        let mut candidate = i64::from(answer) + offset;
        if candidate <= 0 {
            let ceiling = (i64::from(answer) + DISTRACTOR_SPREAD).max(FALLBACK_CEILING);
            candidate = rng.random_range(1..=ceiling);
        }
        let Ok(candidate) = u32::try_from(candidate) else {
            continue;
        };
        if !options[..filled].contains(&candidate) {
            options[filled] = candidate;
            filled += 1;
        }
    }

    fill_sequential(&mut options, filled, answer);
    options.shuffle(rng);
    options
}

/// Fill `options[filled..]` with the next unused integers above `answer`.
/// Only reached when the random draws keep colliding.
fn fill_sequential(options: &mut [u32; OPTION_COUNT], mut filled: usize, answer: u32) {
    let mut next = answer;
    while filled < OPTION_COUNT {
        next = if next == u32::MAX { 1 } else { next + 1 };
        if !options[..filled].contains(&next) {
            options[filled] = next;
            filled += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mb_core::Operation;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn sample(difficulty: Difficulty, seed: u64, n: usize) -> Vec<Problem> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n).map(|_| generate_problem(difficulty, &mut rng)).collect()
    }

    #[test]
    fn easy_operands_stay_small() {
        for p in sample(Difficulty::Easy, 1, 500) {
            let (l, r) = p.operands();
            match p.operation() {
                Operation::Multiplication => {
                    assert!((1..=5).contains(&l) && (1..=5).contains(&r), "{p}");
                }
                Operation::Division => {
                    assert!((1..=5).contains(&r), "{p}");
                    assert!((1..=5).contains(&p.answer()), "{p}");
                }
            }
        }
    }

    #[test]
    fn hard_operands_stay_below_ten() {
        for p in sample(Difficulty::Hard, 2, 500) {
            assert!(p.answer() <= 81, "{p}");
            assert!(p.operands().1 <= 9, "{p}");
        }
    }

    #[test]
    fn hard_is_biased_away_from_small_factors() {
        let problems = sample(Difficulty::Hard, 3, 2000);
        let small = problems
            .iter()
            .filter(|p| p.operation() == Operation::Multiplication)
            .filter(|p| p.operands().0 < 3 || p.operands().1 < 3)
            .count();
        let mults = problems
            .iter()
            .filter(|p| p.operation() == Operation::Multiplication)
            .count();
        // Without the bias roughly 40% of products would involve 1 or 2.
        assert!((small as f64) < mults as f64 * 0.25);
    }

    #[test]
    fn operation_mix_is_roughly_sixty_forty() {
        let problems = sample(Difficulty::Easy, 4, 4000);
        let mults = problems
            .iter()
            .filter(|p| p.operation() == Operation::Multiplication)
            .count();
        let ratio = mults as f64 / problems.len() as f64;
        assert!((0.55..0.65).contains(&ratio), "ratio {ratio}");
    }

    #[test]
    fn division_avoids_dividing_by_one() {
        for p in sample(Difficulty::Easy, 5, 1000) {
            if p.operation() == Operation::Division && p.operands().1 == 1 {
                // Only 1 ÷ 1 is allowed to divide by one.
                assert_eq!(p.operands().0, 1, "{p}");
            }
        }
    }

    #[test]
    fn same_seed_same_questions() {
        let a: Vec<String> = sample(Difficulty::Hard, 9, 20)
            .iter()
            .map(|p| p.question().to_string())
            .collect();
        let b: Vec<String> = sample(Difficulty::Hard, 9, 20)
            .iter()
            .map(|p| p.question().to_string())
            .collect();
        assert_eq!(a, b);
    }

    #[test]
    fn small_answers_get_positive_distractors() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let options = answer_options(1, &mut rng);
            assert!(options.iter().all(|&o| o >= 1));
            assert_eq!(options.iter().filter(|&&o| o == 1).count(), 1);
        }
    }

    #[test]
    fn sequential_fill_skips_taken_values() {
        let mut options = [12, 13, 0, 0];
        fill_sequential(&mut options, 2, 12);
        assert_eq!(options, [12, 13, 14, 15]);
    }

    #[test]
    fn sequential_fill_wraps_at_max() {
        let mut options = [u32::MAX, 0, 0, 0];
        fill_sequential(&mut options, 1, u32::MAX);
        assert_eq!(options, [u32::MAX, 1, 2, 3]);
    }

    proptest! {
        #[test]
        fn generated_problems_are_well_formed(seed in any::<u64>(), hard in any::<bool>()) {
            let difficulty = if hard { Difficulty::Hard } else { Difficulty::Easy };
            let mut rng = StdRng::seed_from_u64(seed);
            for _ in 0..16 {
                let p = generate_problem(difficulty, &mut rng);
                prop_assert!(p.is_well_formed(), "{:?}", p);
                if p.operation() == Operation::Division {
                    let (dividend, divisor) = p.operands();
                    prop_assert_eq!(p.answer() * divisor, dividend);
                }
            }
        }

        #[test]
        fn options_are_distinct_and_contain_answer(answer in 0u32..200, seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let options = answer_options(answer, &mut rng);
            let distinct: std::collections::HashSet<u32> = options.iter().copied().collect();
            prop_assert_eq!(distinct.len(), OPTION_COUNT);
            prop_assert_eq!(options.iter().filter(|&&o| o == answer).count(), 1);
        }
    }
}
