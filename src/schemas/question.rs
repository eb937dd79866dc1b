use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::db::models::{Choice, Question};

#[derive(Debug, Serialize, Deserialize, Validate)]
pub(crate) struct ChoicePayload {
    #[validate(length(min = 1, max = 1))]
    pub(crate) label: String,
    #[validate(length(min = 1, max = 2000))]
    pub(crate) text: String,
    #[validate(url)]
    pub(crate) image_url: Option<String>,
    pub(crate) is_correct: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct QuestionPayload {
    #[validate(length(min = 1, max = 5000))]
    pub(crate) text: String,
    #[validate(url)]
    pub(crate) image_url: Option<String>,
    #[validate(length(min = 4, max = 4), nested)]
    pub(crate) choices: Vec<ChoicePayload>,
}

impl QuestionPayload {
    /// Choices must carry labels a-d and exactly one correct answer.
    pub(crate) fn check_choices(&self) -> Result<(), &'static str> {
        let mut labels: Vec<String> =
            self.choices.iter().map(|choice| choice.label.to_ascii_lowercase()).collect();
        labels.sort();
        if labels != ["a", "b", "c", "d"] {
            return Err("choices must use labels a, b, c and d");
        }

        let correct = self.choices.iter().filter(|choice| choice.is_correct).count();
        if correct != 1 {
            return Err("exactly one choice must be marked correct");
        }

        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ChoiceResponse {
    pub(crate) id: String,
    pub(crate) label: String,
    pub(crate) text: String,
    pub(crate) image_url: Option<String>,
    pub(crate) is_correct: bool,
}

/// Teacher view of a question, correct answers included.
#[derive(Debug, Serialize)]
pub(crate) struct QuestionResponse {
    pub(crate) id: String,
    pub(crate) quiz_id: String,
    pub(crate) text: String,
    pub(crate) image_url: Option<String>,
    pub(crate) position: i32,
    pub(crate) choices: Vec<ChoiceResponse>,
}

impl QuestionResponse {
    pub(crate) fn from_db(question: Question, choices: Vec<Choice>) -> Self {
        Self {
            id: question.id,
            quiz_id: question.quiz_id,
            text: question.text,
            image_url: question.image_url,
            position: question.position,
            choices: choices
                .into_iter()
                .map(|choice| ChoiceResponse {
                    id: choice.id,
                    label: choice.label,
                    text: choice.text,
                    image_url: choice.image_url,
                    is_correct: choice.is_correct,
                })
                .collect(),
        }
    }
}

/// Student view of a choice. `is_correct` never leaves the server here.
#[derive(Debug, Serialize)]
pub(crate) struct StudentChoice {
    pub(crate) id: String,
    pub(crate) label: String,
    pub(crate) text: String,
    pub(crate) image_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct StudentQuestion {
    pub(crate) id: String,
    pub(crate) text: String,
    pub(crate) image_url: Option<String>,
    pub(crate) choices: Vec<StudentChoice>,
}

impl StudentQuestion {
    pub(crate) fn from_db(question: Question, choices: Vec<Choice>) -> Self {
        Self {
            id: question.id,
            text: question.text,
            image_url: question.image_url,
            choices: choices
                .into_iter()
                .map(|choice| StudentChoice {
                    id: choice.id,
                    label: choice.label,
                    text: choice.text,
                    image_url: choice.image_url,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(labels: [&str; 4], correct: usize) -> QuestionPayload {
        QuestionPayload {
            text: "2 + 2 = ?".to_string(),
            image_url: None,
            choices: labels
                .iter()
                .enumerate()
                .map(|(index, label)| ChoicePayload {
                    label: label.to_string(),
                    text: format!("option {label}"),
                    image_url: None,
                    is_correct: index == correct,
                })
                .collect(),
        }
    }

    #[test]
    fn accepts_four_labeled_choices_with_one_correct() {
        assert!(payload(["a", "b", "c", "d"], 2).check_choices().is_ok());
        assert!(payload(["D", "C", "B", "A"], 0).check_choices().is_ok());
    }

    #[test]
    fn validate_enforces_choice_count() {
        assert!(payload(["a", "b", "c", "d"], 0).validate().is_ok());

        let mut short = payload(["a", "b", "c", "d"], 0);
        short.choices.pop();
        assert!(short.validate().is_err());
    }

    #[test]
    fn rejects_duplicate_labels() {
        assert!(payload(["a", "a", "c", "d"], 0).check_choices().is_err());
    }

    #[test]
    fn rejects_zero_or_multiple_correct() {
        let mut none_correct = payload(["a", "b", "c", "d"], 0);
        none_correct.choices[0].is_correct = false;
        assert!(none_correct.check_choices().is_err());

        let mut two_correct = payload(["a", "b", "c", "d"], 0);
        two_correct.choices[1].is_correct = true;
        assert!(two_correct.check_choices().is_err());
    }
}
