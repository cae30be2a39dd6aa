use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of answer buttons shown for every problem.
pub const OPTION_COUNT: usize = 4;

/// Unique identifier for a generated problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProblemId(pub Uuid);

impl ProblemId {
    /// Generate a new random problem ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ProblemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProblemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// The arithmetic operation a problem asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// `a × b`
    Multiplication,
    /// `dividend ÷ divisor`, always exact.
    Division,
}

impl Operation {
    /// The symbol used when rendering the question.
    pub fn symbol(self) -> char {
        match self {
            Self::Multiplication => '×',
            Self::Division => '÷',
        }
    }
}

/// A single question with one correct answer and three distractors.
///
/// Problems are immutable once built. For division the left operand is the
/// dividend and the right one the divisor, and `answer * divisor == dividend`
/// holds by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    id: ProblemId,
    operation: Operation,
    operands: (u32, u32),
    question: String,
    answer: u32,
    options: [u32; OPTION_COUNT],
}

impl Problem {
    /// Build `a × b = ?` with the given answer options.
    pub fn multiplication(a: u32, b: u32, options: [u32; OPTION_COUNT]) -> Self {
        Self::build(Operation::Multiplication, (a, b), a * b, options)
    }

    /// Build `(divisor × quotient) ÷ divisor = ?` with the given answer options.
    ///
    /// Taking the quotient rather than the dividend keeps the division exact
    /// and rules out a zero-divisor panic at construction time.
    pub fn division(divisor: u32, quotient: u32, options: [u32; OPTION_COUNT]) -> Self {
        Self::build(
            Operation::Division,
            (divisor * quotient, divisor),
            quotient,
            options,
        )
    }

    fn build(
        operation: Operation,
        operands: (u32, u32),
        answer: u32,
        options: [u32; OPTION_COUNT],
    ) -> Self {
        let question = format!("{} {} {} = ?", operands.0, operation.symbol(), operands.1);
        Self {
            id: ProblemId::new(),
            operation,
            operands,
            question,
            answer,
            options,
        }
    }

    /// Unique ID of this problem.
    pub fn id(&self) -> ProblemId {
        self.id
    }

    /// Which operation the question uses.
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Left and right operands as shown in the question.
    pub fn operands(&self) -> (u32, u32) {
        self.operands
    }

    /// Rendered question text, e.g. `"6 × 7 = ?"`.
    pub fn question(&self) -> &str {
        &self.question
    }

    /// The correct answer.
    pub fn answer(&self) -> u32 {
        self.answer
    }

    /// The answer options in display order.
    pub fn options(&self) -> &[u32; OPTION_COUNT] {
        &self.options
    }

    /// The option shown at `index`, if any.
    pub fn option(&self, index: usize) -> Option<u32> {
        self.options.get(index).copied()
    }

    /// Returns true if `selected` is the correct answer.
    pub fn is_correct(&self, selected: u32) -> bool {
        selected == self.answer
    }

    /// Check the structural invariants: the answer appears exactly once, all
    /// options are distinct, and the arithmetic matches the operands.
    pub fn is_well_formed(&self) -> bool {
        let distinct: HashSet<u32> = self.options.iter().copied().collect();
        let answer_count = self.options.iter().filter(|&&o| o == self.answer).count();
        let arithmetic = match self.operation {
            Operation::Multiplication => self.operands.0 * self.operands.1 == self.answer,
            Operation::Division => self.answer * self.operands.1 == self.operands.0,
        };
        distinct.len() == OPTION_COUNT && answer_count == 1 && arithmetic
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.question)
    }
}
