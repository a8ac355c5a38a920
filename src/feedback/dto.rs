use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use validator::Validate;

pub const DEFAULT_EASE_RATING: i32 = 5;

/// Product survey submitted by a signed-in user.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct FeedbackRequest {
    #[validate(length(max = 100))]
    pub profile: Option<String>,
    #[validate(length(max = 255))]
    pub target_sector: Option<String>,
    #[validate(range(min = 1, max = 5))]
    pub ease_rating: Option<i32>,
    #[validate(length(max = 50))]
    pub time_spent: Option<String>,
    pub obstacles: Option<String>,
    #[validate(length(max = 255))]
    pub alternative: Option<String>,
    pub suggestions: Option<String>,
    #[validate(range(min = 0, max = 10))]
    pub nps: Option<i32>,
    pub future_help: Option<String>,
}

impl FeedbackRequest {
    pub fn ease_rating_or_default(&self) -> i32 {
        self.ease_rating.unwrap_or(DEFAULT_EASE_RATING)
    }
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_survey_is_valid_and_defaults_ease_rating() {
        let req = FeedbackRequest::default();
        assert!(req.validate().is_ok());
        assert_eq!(req.ease_rating_or_default(), 5);
    }

    #[test]
    fn out_of_range_scores_are_rejected() {
        let req = FeedbackRequest {
            ease_rating: Some(0),
            ..Default::default()
        };
        assert!(req.validate().is_err());

        let req = FeedbackRequest {
            nps: Some(11),
            ..Default::default()
        };
        assert!(req.validate().is_err());

        let req = FeedbackRequest {
            ease_rating: Some(3),
            nps: Some(0),
            ..Default::default()
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn overlong_text_fields_are_rejected() {
        let req = FeedbackRequest {
            profile: Some("x".repeat(101)),
            ..Default::default()
        };
        let errs = req.validate().unwrap_err();
        assert!(errs.field_errors().contains_key("profile"));

        let req = FeedbackRequest {
            time_spent: Some("x".repeat(51)),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }
}
