//! Input validation applied before store writes.
//!
//! # Responsibility
//! - Check form input for todos and categories.
//! - Provide the user-facing message for each rule.
//!
//! # Invariants
//! - Length rules count characters of the trimmed value.
//! - Stores never call into this module; callers validate first.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

use super::category::{CreateCategoryDto, UpdateCategoryDto, CATEGORY_SWATCHES};
use super::todo::{CreateTodoDto, UpdateTodoDto};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;
const MINUTE_MS: i64 = 60 * 1000;
const MIN_CATEGORY_NAME_LENGTH: usize = 2;

/// Form limits and the user's calendar offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationLimits {
    pub min_title_length: usize,
    pub max_title_length: usize,
    pub max_description_length: usize,
    /// Offset of the user's local day from UTC; decides where "today" starts
    /// for due dates.
    pub utc_offset_minutes: i32,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            min_title_length: 3,
            max_title_length: 100,
            max_description_length: 500,
            utc_offset_minutes: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    TitleRequired,
    TitleTooShort { min: usize },
    TitleTooLong { max: usize },
    DescriptionTooLong { max: usize },
    /// Due date falls before the start of the current day.
    DueDateInPast,
    CategoryNameRequired,
    CategoryNameTooShort { min: usize },
    /// Color is not one of `CATEGORY_SWATCHES`.
    InvalidColor(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TitleRequired => write!(f, "title is required"),
            Self::TitleTooShort { min } => {
                write!(f, "title must be at least {min} characters")
            }
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
            Self::DescriptionTooLong { max } => {
                write!(f, "description must be at most {max} characters")
            }
            Self::DueDateInPast => write!(f, "due date cannot be in the past"),
            Self::CategoryNameRequired => write!(f, "category name is required"),
            Self::CategoryNameTooShort { min } => {
                write!(f, "category name must be at least {min} characters")
            }
            Self::InvalidColor(value) => write!(f, "invalid category color `{value}`"),
        }
    }
}

impl Error for ValidationError {}

pub fn validate_title(title: &str, limits: &ValidationLimits) -> Result<(), ValidationError> {
    let length = title.trim().chars().count();
    if length == 0 {
        return Err(ValidationError::TitleRequired);
    }
    if length < limits.min_title_length {
        return Err(ValidationError::TitleTooShort {
            min: limits.min_title_length,
        });
    }
    if length > limits.max_title_length {
        return Err(ValidationError::TitleTooLong {
            max: limits.max_title_length,
        });
    }
    Ok(())
}

pub fn validate_description(
    description: Option<&str>,
    limits: &ValidationLimits,
) -> Result<(), ValidationError> {
    match description {
        Some(text) if text.trim().chars().count() > limits.max_description_length => {
            Err(ValidationError::DescriptionTooLong {
                max: limits.max_description_length,
            })
        }
        _ => Ok(()),
    }
}

/// Rejects due dates earlier than the start of the current local day.
///
/// The local day is UTC shifted by `utc_offset_minutes`.
pub fn validate_due_date(
    due_date: Option<i64>,
    now_ms: i64,
    utc_offset_minutes: i32,
) -> Result<(), ValidationError> {
    let offset_ms = i64::from(utc_offset_minutes) * MINUTE_MS;
    let local_now = now_ms + offset_ms;
    let start_of_today = local_now - local_now.rem_euclid(DAY_MS) - offset_ms;
    match due_date {
        Some(due) if due < start_of_today => Err(ValidationError::DueDateInPast),
        _ => Ok(()),
    }
}

pub fn validate_create_todo(
    dto: &CreateTodoDto,
    limits: &ValidationLimits,
    now_ms: i64,
) -> Result<(), ValidationError> {
    validate_title(&dto.title, limits)?;
    validate_description(dto.description.as_deref(), limits)?;
    validate_due_date(dto.due_date, now_ms, limits.utc_offset_minutes)
}

/// Validates only the fields an update actually sets.
pub fn validate_update_todo(
    dto: &UpdateTodoDto,
    limits: &ValidationLimits,
    now_ms: i64,
) -> Result<(), ValidationError> {
    if let Some(title) = dto.title.as_deref() {
        validate_title(title, limits)?;
    }
    if let Some(description) = &dto.description {
        validate_description(description.as_deref(), limits)?;
    }
    if let Some(due_date) = dto.due_date {
        validate_due_date(due_date, now_ms, limits.utc_offset_minutes)?;
    }
    Ok(())
}

pub fn validate_category_name(name: &str) -> Result<(), ValidationError> {
    let length = name.trim().chars().count();
    if length == 0 {
        return Err(ValidationError::CategoryNameRequired);
    }
    if length < MIN_CATEGORY_NAME_LENGTH {
        return Err(ValidationError::CategoryNameTooShort {
            min: MIN_CATEGORY_NAME_LENGTH,
        });
    }
    Ok(())
}

/// Accepts only colors from `CATEGORY_SWATCHES` (hex case ignored).
pub fn validate_color(color: &str) -> Result<(), ValidationError> {
    if CATEGORY_SWATCHES
        .iter()
        .any(|swatch| swatch.eq_ignore_ascii_case(color))
    {
        Ok(())
    } else {
        Err(ValidationError::InvalidColor(color.to_string()))
    }
}

pub fn validate_create_category(dto: &CreateCategoryDto) -> Result<(), ValidationError> {
    validate_category_name(&dto.name)?;
    validate_color(&dto.color)
}

pub fn validate_update_category(dto: &UpdateCategoryDto) -> Result<(), ValidationError> {
    if let Some(name) = dto.name.as_deref() {
        validate_category_name(name)?;
    }
    if let Some(color) = dto.color.as_deref() {
        validate_color(color)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOON_MS: i64 = 1_700_000_000_000 - 1_700_000_000_000 % DAY_MS + DAY_MS / 2;

    #[test]
    fn title_rules_use_trimmed_length() {
        let limits = ValidationLimits::default();
        assert_eq!(validate_title("   ", &limits), Err(ValidationError::TitleRequired));
        assert_eq!(
            validate_title(" ab ", &limits),
            Err(ValidationError::TitleTooShort { min: 3 })
        );
        assert!(validate_title("abc", &limits).is_ok());
        assert_eq!(
            validate_title(&"x".repeat(101), &limits),
            Err(ValidationError::TitleTooLong { max: 100 })
        );
    }

    #[test]
    fn description_is_optional_but_bounded() {
        let limits = ValidationLimits::default();
        assert!(validate_description(None, &limits).is_ok());
        assert!(validate_description(Some("d".repeat(500).as_str()), &limits).is_ok());
        assert_eq!(
            validate_description(Some("d".repeat(501).as_str()), &limits),
            Err(ValidationError::DescriptionTooLong { max: 500 })
        );
    }

    #[test]
    fn due_date_earlier_today_is_accepted_yesterday_is_not() {
        let start_of_today = NOON_MS - DAY_MS / 2;
        assert!(validate_due_date(Some(start_of_today), NOON_MS, 0).is_ok());
        assert!(validate_due_date(None, NOON_MS, 0).is_ok());
        assert_eq!(
            validate_due_date(Some(start_of_today - 1), NOON_MS, 0),
            Err(ValidationError::DueDateInPast)
        );
    }

    #[test]
    fn local_day_boundary_follows_utc_offset() {
        let utc_midnight = NOON_MS - DAY_MS / 2;
        // 23:00 UTC is already 01:00 the next day at UTC+2.
        let late_evening = utc_midnight + 23 * 60 * MINUTE_MS;
        let nine_pm = utc_midnight + 21 * 60 * MINUTE_MS;
        let ten_thirty_pm = utc_midnight + 22 * 60 * MINUTE_MS + 30 * MINUTE_MS;

        assert!(validate_due_date(Some(nine_pm), late_evening, 0).is_ok());
        assert_eq!(
            validate_due_date(Some(nine_pm), late_evening, 120),
            Err(ValidationError::DueDateInPast)
        );
        assert!(validate_due_date(Some(ten_thirty_pm), late_evening, 120).is_ok());

        // 01:00 UTC is still the previous evening at UTC-5.
        let early_morning = utc_midnight + 60 * MINUTE_MS;
        let yesterday_eight_pm = utc_midnight - 4 * 60 * MINUTE_MS;
        assert!(validate_due_date(Some(yesterday_eight_pm), early_morning, -300).is_ok());
        assert_eq!(
            validate_due_date(Some(yesterday_eight_pm), early_morning, 0),
            Err(ValidationError::DueDateInPast)
        );
    }

    #[test]
    fn update_validation_skips_absent_fields() {
        let limits = ValidationLimits::default();
        assert!(validate_update_todo(&UpdateTodoDto::completed(true), &limits, NOON_MS).is_ok());
        assert_eq!(
            validate_update_todo(&UpdateTodoDto::title(""), &limits, NOON_MS),
            Err(ValidationError::TitleRequired)
        );
    }

    #[test]
    fn category_color_must_be_a_palette_swatch() {
        assert!(validate_color("#1abc9c").is_ok());
        assert!(validate_color("#1ABC9C").is_ok());
        assert!(CATEGORY_SWATCHES.iter().all(|swatch| validate_color(swatch).is_ok()));
        assert!(matches!(
            validate_color("teal"),
            Err(ValidationError::InvalidColor(_))
        ));
        assert_eq!(
            validate_color("#123456"),
            Err(ValidationError::InvalidColor("#123456".to_string()))
        );
        assert_eq!(
            validate_create_category(&CreateCategoryDto::new("W", "#3498db")),
            Err(ValidationError::CategoryNameTooShort { min: 2 })
        );
    }
}
