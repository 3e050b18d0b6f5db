//! Questionnaire state: which step the user is on and the answers so far.
//!
//! The form is three steps long. Navigation is bounded at both ends, so
//! `next_step` on the last step and `prev_step` on the first are no-ops.

use std::fmt;

use giftafy_types::query::{AgeRange, GiftQuery, Occasion, Relationship};

/// A step of the questionnaire, in display order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FormStep {
    #[default]
    Recipient,
    Occasion,
    Budget,
}

impl FormStep {
    pub const ALL: [FormStep; 3] = [FormStep::Recipient, FormStep::Occasion, FormStep::Budget];

    pub fn label(&self) -> &'static str {
        match self {
            FormStep::Recipient => "Recipient",
            FormStep::Occasion => "Occasion",
            FormStep::Budget => "Budget",
        }
    }

    /// Zero-based position in the form.
    pub fn index(&self) -> usize {
        match self {
            FormStep::Recipient => 0,
            FormStep::Occasion => 1,
            FormStep::Budget => 2,
        }
    }

    fn next(self) -> Self {
        match self {
            FormStep::Recipient => FormStep::Occasion,
            FormStep::Occasion | FormStep::Budget => FormStep::Budget,
        }
    }

    fn prev(self) -> Self {
        match self {
            FormStep::Recipient | FormStep::Occasion => FormStep::Recipient,
            FormStep::Budget => FormStep::Occasion,
        }
    }
}

impl fmt::Display for FormStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Answers collected on a single step. Fields left `None` keep their
/// current value.
#[derive(Debug, Clone, PartialEq)]
pub enum StepAnswers {
    Recipient {
        relationship: Option<Relationship>,
        age_range: Option<AgeRange>,
    },
    Occasion {
        occasion: Option<Occasion>,
        interests: Option<String>,
    },
    Budget {
        budget_label: Option<String>,
    },
}

/// Multi-step gift finder form.
#[derive(Debug, Clone, Default)]
pub struct GiftFinderForm {
    step: FormStep,
    query: GiftQuery,
}

impl GiftFinderForm {
    /// A form on the first step with the default answers
    /// (Friend / 26-35 / Birthday / no interests / $50-$100).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> FormStep {
        self.step
    }

    pub fn query(&self) -> &GiftQuery {
        &self.query
    }

    pub fn is_last_step(&self) -> bool {
        self.step() == FormStep::Budget
    }

    pub fn next_step(&mut self) {
        self.step = self.step.next();
    }

    pub fn prev_step(&mut self) {
        self.step = self.step.prev();
    }

    /// Merge a step's answers into the query.
    ///
    /// On the budget step this returns the completed query for submission;
    /// on earlier steps it advances and returns `None`.
    pub fn submit_step(&mut self, answers: StepAnswers) -> Option<GiftQuery> {
        self.merge(answers);
        if self.is_last_step() {
            tracing::debug!(query = ?self.query, "gift finder form submitted");
            Some(self.query.clone())
        } else {
            self.next_step();
            None
        }
    }

    /// Back to the first step with the default answers.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn merge(&mut self, answers: StepAnswers) {
        match answers {
            StepAnswers::Recipient {
                relationship,
                age_range,
            } => {
                if let Some(relationship) = relationship {
                    self.query.relationship = relationship;
                }
                if let Some(age_range) = age_range {
                    self.query.age_range = age_range;
                }
            }
            StepAnswers::Occasion {
                occasion,
                interests,
            } => {
                if let Some(occasion) = occasion {
                    self.query.occasion = occasion;
                }
                if let Some(interests) = interests {
                    self.query.interests = interests;
                }
            }
            StepAnswers::Budget { budget_label } => {
                if let Some(budget_label) = budget_label {
                    self.query.budget_label = budget_label;
                }
            }
        }
    }
}
