//! `Validate` implementations for every curriculum entity.

use super::rules::{
    in_range, is_course_code, is_email, is_present, is_present_opt, is_url, parse_integer,
};
use super::{
    ASSIGNMENT_NAME_PER_COURSE, COURSE_CODE_PER_TERM, Rule, USER_EMAIL, UniqueKey, Validate,
    ValidationErrors,
};
use crate::entities::{
    Assignment, Course, CourseInstructor, CourseStudent, Lesson, Reading, ReadingForm, School,
    Term, User,
};
use crate::enums::EntityType;

const MIN_PERCENT_OF_GRADE: f64 = 0.0;
const MAX_PERCENT_OF_GRADE: f64 = 100.0;

fn require(errors: &mut ValidationErrors, field: &'static str, value: &str) -> bool {
    let present = is_present(value);
    if !present {
        errors.push(field, Rule::Blank);
    }
    present
}

fn require_url(errors: &mut ValidationErrors, field: &'static str, value: &str) {
    if require(errors, field, value) && !is_url(value) {
        errors.push(field, Rule::Invalid);
    }
}

impl Validate for School {
    fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new(EntityType::School);
        require(&mut errors, "name", &self.name);
        errors
    }
}

impl Validate for Term {
    fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new(EntityType::Term);
        if let (Some(starts_on), Some(ends_on)) = (self.starts_on, self.ends_on) {
            if ends_on < starts_on {
                errors.push("ends_on", Rule::BeforeStart);
            }
        }
        errors
    }
}

impl Validate for Course {
    fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new(EntityType::Course);
        require(&mut errors, "name", &self.name);
        if require(&mut errors, "course_code", &self.course_code)
            && !is_course_code(&self.course_code)
        {
            errors.push("course_code", Rule::Invalid);
        }
        errors
    }

    fn unique_keys(&self) -> Vec<UniqueKey<'_>> {
        vec![UniqueKey {
            rule: &COURSE_CODE_PER_TERM,
            value: &self.course_code,
            scope_value: self.term_id.as_deref(),
        }]
    }
}

impl Validate for Lesson {
    fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new(EntityType::Lesson);
        require(&mut errors, "name", &self.name);
        errors
    }
}

impl Validate for ReadingForm {
    fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new(EntityType::Reading);
        if require(&mut errors, "order_number", &self.order_number)
            && parse_integer(&self.order_number).is_none()
        {
            errors.push("order_number", Rule::NotANumber);
        }
        require(&mut errors, "lesson_id", &self.lesson_id);
        require_url(&mut errors, "url", &self.url);
        errors
    }
}

impl Validate for Reading {
    fn validate(&self) -> ValidationErrors {
        ReadingForm::from(self).validate()
    }
}

impl Validate for Assignment {
    fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new(EntityType::Assignment);
        require(&mut errors, "name", &self.name);
        if let Some(percent) = self.percent_of_grade {
            if !in_range(percent, MIN_PERCENT_OF_GRADE, MAX_PERCENT_OF_GRADE) {
                errors.push("percent_of_grade", Rule::OutOfRange);
            }
        }
        errors
    }

    fn unique_keys(&self) -> Vec<UniqueKey<'_>> {
        vec![UniqueKey {
            rule: &ASSIGNMENT_NAME_PER_COURSE,
            value: &self.name,
            scope_value: self.course_id.as_deref(),
        }]
    }
}

impl Validate for User {
    fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new(EntityType::User);
        if require(&mut errors, "email", &self.email) && !is_email(&self.email) {
            errors.push("email", Rule::Invalid);
        }
        if let Some(photo_url) = self.photo_url.as_deref() {
            if is_present(photo_url) && !is_url(photo_url) {
                errors.push("photo_url", Rule::Invalid);
            }
        }
        errors
    }

    fn unique_keys(&self) -> Vec<UniqueKey<'_>> {
        vec![UniqueKey {
            rule: &USER_EMAIL,
            value: &self.email,
            scope_value: None,
        }]
    }
}

impl Validate for CourseStudent {
    fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new(EntityType::CourseStudent);
        require(&mut errors, "course_id", &self.course_id);
        if self.user_id.is_some() && !is_present_opt(self.user_id.as_deref()) {
            errors.push("user_id", Rule::Blank);
        }
        errors
    }
}

impl Validate for CourseInstructor {
    fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new(EntityType::CourseInstructor);
        require(&mut errors, "course_id", &self.course_id);
        if self.user_id.is_some() && !is_present_opt(self.user_id.as_deref()) {
            errors.push("user_id", Rule::Blank);
        }
        errors
    }
}
